use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AxisError {
    #[error("wavelength axis requires at least 2 points, got {actual}")]
    TooShort { actual: usize },
    #[error("wavelength axis entry must be finite at index {index}, got {value}")]
    NonFinite { index: usize, value: f64 },
    #[error(
        "wavelength axis must be strictly increasing, index {index} has {current} after {previous}"
    )]
    NonIncreasing {
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error("axis/value length mismatch: axis={axis}, values={values}")]
    LengthMismatch { axis: usize, values: usize },
    #[error("axis step must be finite and > 0, got {value}")]
    InvalidStep { value: f64 },
}

/// Strictly increasing, finite wavelength grid in nm with at least two points.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WavelengthAxis {
    points: Vec<f64>,
}

impl WavelengthAxis {
    pub fn new(points: Vec<f64>) -> Result<Self, AxisError> {
        validate_axis(&points)?;
        Ok(Self { points })
    }

    /// Evenly stepped axis from `start` up to and including `stop` (within
    /// half a step).
    pub fn stepped(start: f64, stop: f64, step: f64) -> Result<Self, AxisError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(AxisError::InvalidStep { value: step });
        }
        if !start.is_finite() {
            return Err(AxisError::NonFinite {
                index: 0,
                value: start,
            });
        }
        let count = ((stop - start) / step + 0.5).floor();
        if !count.is_finite() || count < 1.0 {
            return Err(AxisError::TooShort {
                actual: (count.max(0.0) as usize) + 1,
            });
        }
        let points = (0..=count as usize)
            .map(|index| start + step * index as f64)
            .collect();
        Self::new(points)
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> f64 {
        self.points[0]
    }

    pub fn last(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    /// Average sample spacing.
    pub fn resolution(&self) -> f64 {
        (self.last() - self.first()) / (self.len() - 1) as f64
    }

    pub fn middle_index(&self) -> usize {
        (self.len() - 1) / 2
    }

    pub fn middle(&self) -> f64 {
        self.points[self.middle_index()]
    }

    /// Index of the sample closest to `value`.
    pub fn nearest_index(&self, value: f64) -> usize {
        let upper = self.points.partition_point(|&point| point < value);
        if upper == 0 {
            return 0;
        }
        if upper >= self.points.len() {
            return self.points.len() - 1;
        }
        if (value - self.points[upper - 1]) <= (self.points[upper] - value) {
            upper - 1
        } else {
            upper
        }
    }

    pub fn into_points(self) -> Vec<f64> {
        self.points
    }
}

impl AsRef<[f64]> for WavelengthAxis {
    fn as_ref(&self) -> &[f64] {
        &self.points
    }
}

pub fn validate_axis(points: &[f64]) -> Result<(), AxisError> {
    if points.len() < 2 {
        return Err(AxisError::TooShort {
            actual: points.len(),
        });
    }

    for (index, value) in points.iter().copied().enumerate() {
        if !value.is_finite() {
            return Err(AxisError::NonFinite { index, value });
        }
        if index > 0 {
            let previous = points[index - 1];
            if value <= previous {
                return Err(AxisError::NonIncreasing {
                    index,
                    previous,
                    current: value,
                });
            }
        }
    }

    Ok(())
}

/// `count` evenly spaced values from `start` to `stop` inclusive.
pub fn linear_grid(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            (0..count)
                .map(|index| {
                    if index == count - 1 {
                        stop
                    } else {
                        start + step * index as f64
                    }
                })
                .collect()
        }
    }
}

/// `count` values spaced evenly in log10 from `10^start` to `10^stop`.
pub fn log_grid(start_exponent: f64, stop_exponent: f64, count: usize) -> Vec<f64> {
    linear_grid(start_exponent, stop_exponent, count)
        .into_iter()
        .map(|exponent| 10f64.powf(exponent))
        .collect()
}

/// Uniform refinement spanning the same range as `axis`, with
/// `(n - 1) * factor + 1` points. Interior caller samples need not lie on it
/// when `axis` is non-uniform.
pub fn upsample_axis(axis: &WavelengthAxis, factor: usize) -> Result<WavelengthAxis, AxisError> {
    let factor = factor.max(1);
    let count = (axis.len() - 1) * factor + 1;
    WavelengthAxis::new(linear_grid(axis.first(), axis.last(), count))
}

#[cfg(test)]
mod tests {
    use super::{AxisError, WavelengthAxis, linear_grid, log_grid, upsample_axis, validate_axis};

    #[test]
    fn axis_validation_reports_first_offending_sample() {
        assert_eq!(
            validate_axis(&[1.0]),
            Err(AxisError::TooShort { actual: 1 })
        );
        assert_eq!(
            validate_axis(&[1.0, 2.0, 2.0]),
            Err(AxisError::NonIncreasing {
                index: 2,
                previous: 2.0,
                current: 2.0,
            })
        );
        match validate_axis(&[1.0, f64::INFINITY]) {
            Err(AxisError::NonFinite { index: 1, .. }) => {}
            other => panic!("expected NonFinite at index 1, got {other:?}"),
        }
    }

    #[test]
    fn stepped_axis_includes_stop_and_reports_resolution() {
        let axis = WavelengthAxis::stepped(655.0, 657.0, 0.1).expect("axis");
        assert_eq!(axis.len(), 21);
        assert!((axis.last() - 657.0).abs() < 1.0e-9);
        assert!((axis.resolution() - 0.1).abs() < 1.0e-12);
        assert_eq!(axis.middle_index(), 10);
        assert!((axis.middle() - 656.0).abs() < 1.0e-9);
    }

    #[test]
    fn nearest_index_picks_closest_sample() {
        let axis = WavelengthAxis::new(vec![0.0, 1.0, 2.0, 4.0]).expect("axis");
        assert_eq!(axis.nearest_index(-3.0), 0);
        assert_eq!(axis.nearest_index(1.4), 1);
        assert_eq!(axis.nearest_index(3.1), 3);
        assert_eq!(axis.nearest_index(10.0), 3);
    }

    #[test]
    fn grids_hit_both_endpoints() {
        let grid = linear_grid(0.1, 0.6, 11);
        assert_eq!(grid.len(), 11);
        assert_eq!(grid[10], 0.6);
        assert!((grid[1] - 0.15).abs() < 1.0e-12);

        let densities = log_grid(20.0, 25.0, 16);
        assert!((densities[0] - 1.0e20).abs() / 1.0e20 < 1.0e-12);
        assert!((densities[15] - 1.0e25).abs() / 1.0e25 < 1.0e-12);
        assert!((densities[3] - 1.0e21).abs() / 1.0e21 < 1.0e-12);
    }

    #[test]
    fn stepped_axis_rejects_bad_steps() {
        assert_eq!(
            WavelengthAxis::stepped(1.0, 2.0, 0.0),
            Err(AxisError::InvalidStep { value: 0.0 })
        );
        assert!(matches!(
            WavelengthAxis::stepped(1.0, 1.0, 0.5),
            Err(AxisError::TooShort { .. })
        ));
    }

    #[test]
    fn uniform_axis_upsamples_to_uniform_axis() {
        let axis = WavelengthAxis::stepped(655.0, 657.0, 0.1).expect("axis");
        let fine = upsample_axis(&axis, 50).expect("fine axis");
        assert_eq!(fine.len(), 20 * 50 + 1);
        assert!((fine.resolution() - 0.002).abs() < 1.0e-12);
        assert!((fine.points()[50] - axis.points()[1]).abs() < 1.0e-9);
        for window in fine.points().windows(2) {
            assert!(((window[1] - window[0]) - 0.002).abs() < 1.0e-9);
        }
    }

    #[test]
    fn non_uniform_axis_upsamples_to_an_evenly_spaced_grid() {
        let axis = WavelengthAxis::new(vec![500.0, 500.1, 510.0]).expect("axis");
        let fine = upsample_axis(&axis, 50).expect("non-uniform axis should refine");
        assert_eq!(fine.len(), 101);
        assert_eq!(fine.first(), 500.0);
        assert_eq!(fine.last(), 510.0);
        for window in fine.points().windows(2) {
            assert!(
                ((window[1] - window[0]) - 0.1).abs() < 1.0e-9,
                "uneven step {window:?}"
            );
        }
    }
}
