use num_complex::Complex64;
use rustfft::FftPlanner;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvolutionError {
    #[error("convolution input '{field}' must not be empty")]
    Empty { field: &'static str },
    #[error("convolution input '{field}' must be finite at index {index}, got {value}")]
    NonFinite {
        field: &'static str,
        index: usize,
        value: f64,
    },
    #[error("deconvolution length mismatch: signal={signal}, kernel={kernel}")]
    LengthMismatch { signal: usize, kernel: usize },
    #[error("deconvolution noise level must be finite and >= 0, got {value}")]
    InvalidNoiseLevel { value: f64 },
}

/// Linear convolution of `signal` with `kernel`, computed by FFT and cropped
/// to the length of `signal` around the centre of the full result (start
/// index `(kernel.len() - 1) / 2`).
pub fn convolve_same(signal: &[f64], kernel: &[f64]) -> Result<Vec<f64>, ConvolutionError> {
    validate_samples("signal", signal)?;
    validate_samples("kernel", kernel)?;

    let full_len = signal.len() + kernel.len() - 1;
    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(full_len);
    let inverse = planner.plan_fft_inverse(full_len);

    let mut signal_spectrum = zero_padded(signal, full_len);
    let mut kernel_spectrum = zero_padded(kernel, full_len);
    forward.process(&mut signal_spectrum);
    forward.process(&mut kernel_spectrum);

    for (lhs, rhs) in signal_spectrum.iter_mut().zip(&kernel_spectrum) {
        *lhs *= rhs;
    }
    inverse.process(&mut signal_spectrum);

    let scale = 1.0 / full_len as f64;
    let start = (kernel.len() - 1) / 2;
    Ok(signal_spectrum[start..start + signal.len()]
        .iter()
        .map(|value| value.re * scale)
        .collect())
}

/// Wiener deconvolution of a measured `signal` by a centred `kernel` of the
/// same length. `noise_level` is 1/SNR; the regularization term is
/// `(max(kernel) * noise_level)^2`.
pub fn deconvolve_wiener(
    signal: &[f64],
    kernel: &[f64],
    noise_level: f64,
) -> Result<Vec<f64>, ConvolutionError> {
    validate_samples("signal", signal)?;
    validate_samples("kernel", kernel)?;
    if signal.len() != kernel.len() {
        return Err(ConvolutionError::LengthMismatch {
            signal: signal.len(),
            kernel: kernel.len(),
        });
    }
    if !noise_level.is_finite() || noise_level < 0.0 {
        return Err(ConvolutionError::InvalidNoiseLevel { value: noise_level });
    }

    let len = signal.len();
    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(len);
    let inverse = planner.plan_fft_inverse(len);

    let mut signal_spectrum = zero_padded(signal, len);
    let mut kernel_spectrum = zero_padded(kernel, len);
    forward.process(&mut signal_spectrum);
    forward.process(&mut kernel_spectrum);

    let peak = kernel.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let regularization = (peak * noise_level).powi(2);
    for (value, response) in signal_spectrum.iter_mut().zip(&kernel_spectrum) {
        let denominator = response.norm_sqr() + regularization;
        *value = if denominator > 0.0 {
            *value * response.conj() / denominator
        } else {
            Complex64::new(0.0, 0.0)
        };
    }
    inverse.process(&mut signal_spectrum);

    // The centred kernel advances the estimate by `center` samples.
    let scale = 1.0 / len as f64;
    let center = (len - 1) / 2;
    Ok((0..len)
        .map(|index| signal_spectrum[(index + len - center) % len].re * scale)
        .collect())
}

fn zero_padded(values: &[f64], len: usize) -> Vec<Complex64> {
    let mut buffer = vec![Complex64::new(0.0, 0.0); len];
    for (slot, value) in buffer.iter_mut().zip(values) {
        slot.re = *value;
    }
    buffer
}

fn validate_samples(field: &'static str, values: &[f64]) -> Result<(), ConvolutionError> {
    if values.is_empty() {
        return Err(ConvolutionError::Empty { field });
    }
    for (index, value) in values.iter().copied().enumerate() {
        if !value.is_finite() {
            return Err(ConvolutionError::NonFinite {
                field,
                index,
                value,
            });
        }
    }
    Ok(())
}
