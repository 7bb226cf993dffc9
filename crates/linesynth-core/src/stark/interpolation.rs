//! Grid bracketing and progressive linear interpolation of tabulated
//! Stark profiles.
//!
//! A grid has three axes: electron density (outermost), mass ratio, and an
//! inner axis (Debye ratio for hydrogen, temperature for helium). The inner
//! axis collapses first, then mass ratio, then density. At every step the
//! lower profile is resampled onto the higher profile's offsets before the
//! two are mixed.

use std::fmt::{Display, Formatter};

use super::StarkTableError;
use crate::numerics::interpolate_zero_fill;

const EXACT_MATCH_TOLERANCE: f64 = 1.0e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableAxis {
    ElectronDensity,
    MassRatio,
    DebyeRatio,
    Temperature,
}

impl TableAxis {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ElectronDensity => "electron density",
            Self::MassRatio => "mass ratio",
            Self::DebyeRatio => "Debye ratio",
            Self::Temperature => "temperature",
        }
    }
}

impl Display for TableAxis {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// A query outside the tabulated range that was pinned to the grid edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampNotice {
    pub axis: TableAxis,
    pub requested: f64,
    pub used: f64,
}

impl Display for ClampNotice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} is outside the tabulated range, clamped to {}",
            self.axis, self.requested, self.used
        )
    }
}

/// Stock indices enclosing a query. Both ends coincide on an exact hit or
/// a clamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub low_index: usize,
    pub high_index: usize,
    pub low: f64,
    pub high: f64,
}

impl Bracket {
    fn single(stock: &[f64], index: usize) -> Self {
        Self {
            low_index: index,
            high_index: index,
            low: stock[index],
            high: stock[index],
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.low_index == self.high_index
    }

    /// `(query - low) / (high - low)`, or 1 for a collapsed bracket.
    pub fn fraction(&self, query: f64) -> f64 {
        if self.is_collapsed() {
            1.0
        } else {
            (query - self.low) / (self.high - self.low)
        }
    }

    pub fn indices(&self) -> Vec<usize> {
        if self.is_collapsed() {
            vec![self.low_index]
        } else {
            vec![self.low_index, self.high_index]
        }
    }
}

/// Brackets `query` in the ascending `stock`. Out-of-range queries,
/// infinities included, clamp to the nearest edge.
pub fn bracket(
    stock: &[f64],
    query: f64,
    axis: TableAxis,
) -> Result<(Bracket, Option<ClampNotice>), StarkTableError> {
    if stock.is_empty() {
        return Err(StarkTableError::EmptyStock { axis });
    }
    if query.is_nan() {
        return Err(StarkTableError::InvalidQuery { axis, value: query });
    }

    if let Some(index) = stock
        .iter()
        .position(|&value| (value - query).abs() <= EXACT_MATCH_TOLERANCE * value.abs())
    {
        return Ok((Bracket::single(stock, index), None));
    }

    let last = stock.len() - 1;
    let clamp_to = |index: usize| {
        let notice = ClampNotice {
            axis,
            requested: query,
            used: stock[index],
        };
        Ok((Bracket::single(stock, index), Some(notice)))
    };
    if query < stock[0] {
        return clamp_to(0);
    }
    if query > stock[last] {
        return clamp_to(last);
    }

    let high_index = stock.partition_point(|&value| value <= query);
    Ok((
        Bracket {
            low_index: high_index - 1,
            high_index,
            low: stock[high_index - 1],
            high: stock[high_index],
        },
        None,
    ))
}

/// A profile on its own offset axis, in the table's native units.
#[derive(Debug, Clone, PartialEq)]
pub struct TableProfile {
    pub offsets: Vec<f64>,
    pub values: Vec<f64>,
}

impl TableProfile {
    pub fn new(offsets: Vec<f64>, values: Vec<f64>) -> Self {
        Self { offsets, values }
    }

    /// True when the profile only covers non-negative offsets.
    pub fn is_half_profile(&self) -> bool {
        self.offsets.first().is_some_and(|first| *first >= 0.0)
    }

    /// Reflects a half profile about zero offset. A shared zero offset is
    /// kept once.
    pub fn mirrored(&self) -> TableProfile {
        let skip = usize::from(self.offsets.first() == Some(&0.0));
        let mut offsets: Vec<f64> = self.offsets[skip..]
            .iter()
            .rev()
            .map(|offset| -offset)
            .collect();
        let mut values: Vec<f64> = self.values[skip..].iter().rev().copied().collect();
        offsets.extend_from_slice(&self.offsets);
        values.extend_from_slice(&self.values);
        TableProfile { offsets, values }
    }

    /// Converts to wavelength coordinates: offsets scaled by `offset_scale`
    /// and moved to `center`, values scaled by `value_scale`.
    pub fn to_wavelength(
        &self,
        center: f64,
        offset_scale: f64,
        value_scale: f64,
    ) -> (Vec<f64>, Vec<f64>) {
        (
            self.offsets
                .iter()
                .map(|offset| center + offset * offset_scale)
                .collect(),
            self.values.iter().map(|value| value * value_scale).collect(),
        )
    }
}

/// Mixes two profiles bracketing `query`. The result lives on the higher
/// profile's offsets.
pub fn mix_profiles(
    low: &TableProfile,
    high: &TableProfile,
    bracket: &Bracket,
    query: f64,
) -> Result<TableProfile, StarkTableError> {
    if bracket.is_collapsed() {
        return Ok(high.clone());
    }
    let low_on_high = interpolate_zero_fill(&low.offsets, &low.values, &high.offsets)
        .map_err(|error| StarkTableError::Interpolation {
            message: error.to_string(),
        })?;
    let fraction = bracket.fraction(query);
    let values = low_on_high
        .iter()
        .zip(&high.values)
        .map(|(low, high)| fraction * high + (1.0 - fraction) * low)
        .collect();
    Ok(TableProfile::new(high.offsets.clone(), values))
}

/// Table coordinates of one interpolation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridQuery {
    pub electron_density: f64,
    pub mass_ratio: f64,
    pub inner: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedProfile {
    pub profile: TableProfile,
    pub clamps: Vec<ClampNotice>,
}

/// A tabulated Stark grid. Implementations own their stock values, file
/// layout and native units.
pub trait StarkGrid {
    fn density_stock(&self) -> &[f64];

    fn mass_ratio_stock(&self) -> &[f64];

    fn inner_axis(&self) -> TableAxis;

    /// Inner-axis stock at the density with index `density_index`.
    fn inner_stock(&self, density_index: usize) -> Vec<f64>;

    fn load_profile(
        &self,
        density_index: usize,
        mass_ratio_index: usize,
        inner_index: usize,
    ) -> Result<TableProfile, StarkTableError>;
}

/// Collapses the grid around `query`: inner axis, then mass ratio, then
/// density.
pub fn interpolate_grid<G: StarkGrid + ?Sized>(
    grid: &G,
    query: GridQuery,
) -> Result<InterpolatedProfile, StarkTableError> {
    let mut clamps = Vec::new();
    let (density_bracket, notice) = bracket(
        grid.density_stock(),
        query.electron_density,
        TableAxis::ElectronDensity,
    )?;
    push_notice(&mut clamps, notice);
    let (mass_bracket, notice) =
        bracket(grid.mass_ratio_stock(), query.mass_ratio, TableAxis::MassRatio)?;
    push_notice(&mut clamps, notice);

    let mut per_density = Vec::with_capacity(2);
    for density_index in density_bracket.indices() {
        let inner_stock = grid.inner_stock(density_index);
        let (inner_bracket, notice) = bracket(&inner_stock, query.inner, grid.inner_axis())?;
        push_notice(&mut clamps, notice);

        let mut per_mass = Vec::with_capacity(2);
        for mass_index in mass_bracket.indices() {
            let high = grid.load_profile(density_index, mass_index, inner_bracket.high_index)?;
            let low = if inner_bracket.is_collapsed() {
                high.clone()
            } else {
                grid.load_profile(density_index, mass_index, inner_bracket.low_index)?
            };
            per_mass.push(mix_profiles(&low, &high, &inner_bracket, query.inner)?);
        }
        per_density.push(collapse_pair(
            &per_mass,
            &mass_bracket,
            query.mass_ratio,
            TableAxis::MassRatio,
        )?);
    }

    let profile = collapse_pair(
        &per_density,
        &density_bracket,
        query.electron_density,
        TableAxis::ElectronDensity,
    )?;
    Ok(InterpolatedProfile { profile, clamps })
}

fn collapse_pair(
    profiles: &[TableProfile],
    bracket: &Bracket,
    query: f64,
    axis: TableAxis,
) -> Result<TableProfile, StarkTableError> {
    match profiles {
        [low, high] => mix_profiles(low, high, bracket, query),
        [single] => Ok(single.clone()),
        _ => Err(StarkTableError::EmptyStock { axis }),
    }
}

fn push_notice(clamps: &mut Vec<ClampNotice>, notice: Option<ClampNotice>) {
    if let Some(notice) = notice
        && !clamps.contains(&notice)
    {
        clamps.push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Bracket, GridQuery, StarkGrid, TableAxis, TableProfile, bracket, interpolate_grid,
        mix_profiles,
    };
    use crate::stark::StarkTableError;

    #[test]
    fn bracket_handles_exact_interior_and_clamped_queries() {
        let stock = [1.0, 2.0, 4.0];

        let (exact, notice) = bracket(&stock, 2.0 * (1.0 + 1.0e-12), TableAxis::MassRatio)
            .expect("exact");
        assert!(exact.is_collapsed());
        assert_eq!(exact.low, 2.0);
        assert!(notice.is_none());

        let (interior, notice) = bracket(&stock, 3.0, TableAxis::MassRatio).expect("interior");
        assert_eq!((interior.low_index, interior.high_index), (1, 2));
        assert!((interior.fraction(3.0) - 0.5).abs() < 1.0e-15);
        assert!(notice.is_none());

        let (below, notice) = bracket(&stock, 0.5, TableAxis::MassRatio).expect("below");
        assert_eq!((below.low_index, below.high_index), (0, 0));
        let notice = notice.expect("clamp notice");
        assert_eq!(notice.used, 1.0);
        assert_eq!(notice.requested, 0.5);

        let (above, notice) = bracket(&stock, 9.0, TableAxis::MassRatio).expect("above");
        assert_eq!(above.low_index, 2);
        assert!(notice.is_some());
    }

    #[test]
    fn infinite_queries_clamp_to_the_stock_edges() {
        let stock = [0.1, 0.35, 0.6];

        let (high, notice) =
            bracket(&stock, f64::INFINITY, TableAxis::DebyeRatio).expect("+inf clamps");
        assert_eq!((high.low_index, high.high_index), (2, 2));
        let notice = notice.expect("clamp notice");
        assert_eq!(notice.axis, TableAxis::DebyeRatio);
        assert_eq!(notice.used, 0.6);
        assert_eq!(notice.requested, f64::INFINITY);

        let (low, notice) =
            bracket(&stock, f64::NEG_INFINITY, TableAxis::DebyeRatio).expect("-inf clamps");
        assert_eq!((low.low_index, low.high_index), (0, 0));
        assert_eq!(notice.map(|notice| notice.used), Some(0.1));
    }

    #[test]
    fn bracket_rejects_empty_stock_and_nan_queries() {
        assert!(matches!(
            bracket(&[], 1.0, TableAxis::Temperature),
            Err(StarkTableError::EmptyStock { .. })
        ));
        assert!(matches!(
            bracket(&[1.0], f64::NAN, TableAxis::Temperature),
            Err(StarkTableError::InvalidQuery { .. })
        ));
    }

    #[test]
    fn mirroring_does_not_duplicate_zero_offset() {
        let half = TableProfile::new(vec![0.0, 1.0, 2.0], vec![3.0, 2.0, 1.0]);
        let full = half.mirrored();
        assert_eq!(full.offsets, vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_eq!(full.values, vec![1.0, 2.0, 3.0, 2.0, 1.0]);

        let open = TableProfile::new(vec![0.5, 1.0], vec![2.0, 1.0]);
        assert_eq!(open.mirrored().offsets, vec![-1.0, -0.5, 0.5, 1.0]);
    }

    #[test]
    fn mixing_resamples_low_profile_onto_high_offsets() {
        let low = TableProfile::new(vec![0.0, 2.0], vec![2.0, 0.0]);
        let high = TableProfile::new(vec![0.0, 1.0, 2.0], vec![4.0, 2.0, 0.0]);
        let bracket = Bracket {
            low_index: 0,
            high_index: 1,
            low: 10.0,
            high: 20.0,
        };
        let mixed = mix_profiles(&low, &high, &bracket, 15.0).expect("mix");
        assert_eq!(mixed.offsets, high.offsets);
        assert_eq!(mixed.values, vec![3.0, 1.5, 0.0]);
    }

    struct WidthGrid;

    impl StarkGrid for WidthGrid {
        fn density_stock(&self) -> &[f64] {
            &[1.0, 2.0]
        }

        fn mass_ratio_stock(&self) -> &[f64] {
            &[1.0]
        }

        fn inner_axis(&self) -> TableAxis {
            TableAxis::Temperature
        }

        fn inner_stock(&self, _density_index: usize) -> Vec<f64> {
            vec![10.0, 20.0]
        }

        fn load_profile(
            &self,
            density_index: usize,
            _mass_ratio_index: usize,
            inner_index: usize,
        ) -> Result<TableProfile, StarkTableError> {
            let height = (1 + density_index * 2 + inner_index) as f64;
            Ok(TableProfile::new(vec![0.0, 1.0], vec![height, 0.0]))
        }
    }

    #[test]
    fn grid_collapses_inner_then_mass_then_density() {
        let result = interpolate_grid(
            &WidthGrid,
            GridQuery {
                electron_density: 1.5,
                mass_ratio: 1.0,
                inner: 15.0,
            },
        )
        .expect("interpolate");
        // heights 1,2 at density 1 and 3,4 at density 2, mixed at 0.5 each
        assert!((result.profile.values[0] - 2.5).abs() < 1.0e-12);
        assert!(result.clamps.is_empty());

        let clamped = interpolate_grid(
            &WidthGrid,
            GridQuery {
                electron_density: 5.0,
                mass_ratio: 0.1,
                inner: 20.0,
            },
        )
        .expect("clamped");
        assert_eq!(clamped.profile.values[0], 4.0);
        assert_eq!(clamped.clamps.len(), 2);
    }
}
