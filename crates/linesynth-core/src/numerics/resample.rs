use super::axis::AxisError;

/// Linear interpolation of `(source_x, source_y)` at `target_x`; targets
/// outside `[source_x[0], source_x[last]]` read as zero.
pub fn interpolate_zero_fill(
    source_x: &[f64],
    source_y: &[f64],
    target_x: &[f64],
) -> Result<Vec<f64>, AxisError> {
    if source_x.len() != source_y.len() {
        return Err(AxisError::LengthMismatch {
            axis: source_x.len(),
            values: source_y.len(),
        });
    }
    if source_x.is_empty() {
        return Ok(vec![0.0; target_x.len()]);
    }

    let last = source_x.len() - 1;
    Ok(target_x
        .iter()
        .map(|&x| {
            if x < source_x[0] || x > source_x[last] {
                return 0.0;
            }
            let upper = source_x.partition_point(|&value| value < x);
            if upper == 0 || source_x[upper] == x {
                return source_y[upper];
            }
            let lower = upper - 1;
            let fraction = (x - source_x[lower]) / (source_x[upper] - source_x[lower]);
            source_y[lower] + (source_y[upper] - source_y[lower]) * fraction
        })
        .collect())
}

fn kahan_add(sum: &mut f64, correction: &mut f64, value: f64) {
    let corrected = value - *correction;
    let next = *sum + corrected;
    *correction = (next - *sum) - corrected;
    *sum = next;
}

pub fn stable_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut correction = 0.0;

    for &value in values {
        kahan_add(&mut sum, &mut correction, value);
    }

    sum
}

/// Copy of `values` scaled to a unit maximum. An all-zero input stays zero.
pub fn peak_normalized(values: &[f64]) -> Vec<f64> {
    let peak = values.iter().copied().fold(0.0_f64, f64::max);
    if peak > 0.0 {
        values.iter().map(|value| value / peak).collect()
    } else {
        values.to_vec()
    }
}
