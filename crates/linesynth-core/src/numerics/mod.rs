pub mod axis;
pub mod convolution;
pub mod resample;

pub use axis::{AxisError, WavelengthAxis, linear_grid, log_grid, upsample_axis, validate_axis};
pub use convolution::{ConvolutionError, convolve_same, deconvolve_wiener};
pub use resample::{interpolate_zero_fill, peak_normalized, stable_sum};
