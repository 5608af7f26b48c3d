use rayon::prelude::*;
use rustfft::{num_complex::Complex, FftPlanner};

use super::decode::AudioBuffer;
use crate::error::{Result, VizError};

pub const DEFAULT_BANDS: usize = 64;
pub const DEFAULT_HOP_LENGTH: usize = 512;
pub const DEFAULT_FFT_SIZE: usize = 2048;

/// Floor for log-power conversion, keeps log10 away from zero.
const POWER_FLOOR: f32 = 1e-10;

/// Short-time analysis parameters for the feature extractor.
#[derive(Clone, Debug)]
pub struct AnalysisParams {
    pub n_bands: usize,
    pub hop_length: usize,
    pub fft_size: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            n_bands: DEFAULT_BANDS,
            hop_length: DEFAULT_HOP_LENGTH,
            fft_size: DEFAULT_FFT_SIZE,
        }
    }
}

impl AnalysisParams {
    /// Reject degenerate analysis geometry before any FFT work starts.
    /// A zero hop has no stride and a window below two samples has no
    /// spectrum; both would otherwise fail arithmetically mid-extraction.
    pub fn validate(&self) -> Result<()> {
        if self.n_bands == 0 {
            return Err(VizError::InvalidConfig("n_bands must be positive".into()));
        }
        if self.hop_length == 0 {
            return Err(VizError::InvalidConfig("hop_length must be positive".into()));
        }
        if self.fft_size < 2 {
            return Err(VizError::InvalidConfig(format!(
                "fft_size must be at least 2, got {}",
                self.fft_size
            )));
        }
        Ok(())
    }
}

/// Mel-band energy matrix: `bands` rows by `columns` time steps.
///
/// Produced once per job and read-only thereafter. Every cell lies in
/// [0,1]; a silent or constant input yields an all-zero matrix. Storage is
/// column-major so one analysis instant is a contiguous slice.
pub struct FeatureMatrix {
    bands: usize,
    columns: usize,
    data: Vec<f32>,
}

impl FeatureMatrix {
    pub fn bands(&self) -> usize {
        self.bands
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// All band values for time step `t`, ordered low to high frequency.
    pub fn column(&self, t: usize) -> &[f32] {
        let start = t * self.bands;
        &self.data[start..start + self.bands]
    }
}

/// Extract a normalized mel-band energy matrix from a mono PCM buffer.
///
/// Pipeline: centered Hann STFT at `hop_length` stride, power spectrum,
/// triangular mel filterbank (0 Hz..Nyquist), log-power referenced to the
/// matrix maximum, then global min-max normalization to [0,1].
pub fn extract_features(audio: &AudioBuffer, params: &AnalysisParams) -> FeatureMatrix {
    let n_bands = params.n_bands;
    let fft_size = params.fft_size;
    let hop = params.hop_length;
    let samples = &audio.samples;
    let columns = samples.len().div_ceil(hop).max(1);

    let hann = hann_window(fft_size);
    let filterbank = mel_filterbank(audio.sample_rate, fft_size, n_bands);

    log::info!(
        "Extracting features: {} bands x {} columns (fft={}, hop={})",
        n_bands, columns, fft_size, hop
    );

    // One power-spectrum FFT per column; windows are centered on t*hop and
    // zero-padded past the signal edges.
    let band_columns: Vec<Vec<f32>> = (0..columns)
        .into_par_iter()
        .map(|t| {
            let center = t * hop;
            let start = center as i64 - (fft_size / 2) as i64;

            let mut buffer: Vec<Complex<f32>> = (0..fft_size)
                .map(|i| {
                    let idx = start + i as i64;
                    let s = if idx >= 0 && (idx as usize) < samples.len() {
                        samples[idx as usize]
                    } else {
                        0.0
                    };
                    Complex::new(s * hann[i], 0.0)
                })
                .collect();

            // Per-thread FFT planner (rayon-safe)
            let mut planner = FftPlanner::<f32>::new();
            planner.plan_fft_forward(fft_size).process(&mut buffer);

            let power: Vec<f32> = buffer[..fft_size / 2 + 1]
                .iter()
                .map(|c| c.norm_sqr())
                .collect();

            filterbank
                .iter()
                .map(|filter| filter.iter().zip(&power).map(|(w, p)| w * p).sum())
                .collect()
        })
        .collect();

    // Log-power referenced to the matrix max, so every value is <= 0 dB.
    let peak = band_columns
        .iter()
        .flatten()
        .copied()
        .fold(0.0f32, f32::max)
        .max(POWER_FLOOR);

    let mut data = Vec::with_capacity(columns * n_bands);
    for col in &band_columns {
        for &p in col {
            data.push(10.0 * (p.max(POWER_FLOOR) / peak).log10());
        }
    }

    normalize_in_place(&mut data);

    FeatureMatrix { bands: n_bands, columns, data }
}

/// Global min-max normalization to [0,1]; degenerate input maps to all zeros.
fn normalize_in_place(data: &mut [f32]) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in data.iter() {
        min = min.min(v);
        max = max.max(v);
    }
    let span = max - min;
    if !(span > 0.0) {
        data.fill(0.0);
        return;
    }
    for v in data.iter_mut() {
        *v = (*v - min) / span;
    }
}

fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos())
        })
        .collect()
}

fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10f32.powf(mel / 2595.0) - 1.0)
}

/// Triangular filterbank on the mel scale spanning 0 Hz to Nyquist.
/// Returns `n_bands` filters over `fft_size / 2 + 1` linear-frequency bins.
fn mel_filterbank(sample_rate: u32, fft_size: usize, n_bands: usize) -> Vec<Vec<f32>> {
    let n_bins = fft_size / 2 + 1;
    let nyquist = sample_rate as f32 / 2.0;

    let mel_max = hz_to_mel(nyquist);
    let hz_points: Vec<f32> = (0..n_bands + 2)
        .map(|i| mel_to_hz(mel_max * i as f32 / (n_bands + 1) as f32))
        .collect();

    let bin_freq = |k: usize| k as f32 * sample_rate as f32 / fft_size as f32;

    let mut filters = vec![vec![0.0f32; n_bins]; n_bands];
    for (m, filter) in filters.iter_mut().enumerate() {
        let (left, center, right) = (hz_points[m], hz_points[m + 1], hz_points[m + 2]);
        for (k, w) in filter.iter_mut().enumerate() {
            let f = bin_freq(k);
            if f >= left && f <= center && center > left {
                *w = (f - left) / (center - left);
            } else if f > center && f <= right && right > center {
                *w = (right - f) / (right - center);
            }
        }
    }

    filters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, seconds: f32) -> AudioBuffer {
        let n = (sample_rate as f32 * seconds) as usize;
        let samples = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
            .collect();
        AudioBuffer { samples, sample_rate }
    }

    #[test]
    fn matrix_shape_matches_params() {
        let audio = sine(440.0, 22050, 1.0);
        let params = AnalysisParams::default();
        let matrix = extract_features(&audio, &params);
        assert_eq!(matrix.bands(), 64);
        assert_eq!(matrix.columns(), audio.samples.len().div_ceil(512));
        assert_eq!(matrix.column(0).len(), 64);
    }

    #[test]
    fn all_cells_in_unit_interval() {
        let audio = sine(440.0, 22050, 0.5);
        let matrix = extract_features(&audio, &AnalysisParams::default());
        for t in 0..matrix.columns() {
            for &v in matrix.column(t) {
                assert!((0.0..=1.0).contains(&v), "cell {} out of range", v);
            }
        }
    }

    #[test]
    fn silence_yields_all_zero_matrix() {
        let audio = AudioBuffer { samples: vec![0.0; 22050], sample_rate: 22050 };
        let matrix = extract_features(&audio, &AnalysisParams::default());
        for t in 0..matrix.columns() {
            assert!(matrix.column(t).iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn sine_energy_concentrates_in_low_bands() {
        let audio = sine(440.0, 22050, 2.0);
        let matrix = extract_features(&audio, &AnalysisParams::default());

        // Average each band across the middle columns and find the peak band.
        let mid = matrix.columns() / 2;
        let col = matrix.column(mid);
        let peak_band = col
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();

        // 440 Hz lands in the lower quarter of a 64-band 0..11025 Hz mel grid.
        assert!(peak_band < 20, "peak band {} unexpectedly high", peak_band);
        assert!(col[peak_band] > 0.5);
    }

    #[test]
    fn zero_hop_length_is_rejected() {
        let params = AnalysisParams { hop_length: 0, ..AnalysisParams::default() };
        assert!(matches!(params.validate(), Err(VizError::InvalidConfig(_))));
    }

    #[test]
    fn degenerate_fft_size_is_rejected() {
        for fft_size in [0, 1] {
            let params = AnalysisParams { fft_size, ..AnalysisParams::default() };
            assert!(matches!(params.validate(), Err(VizError::InvalidConfig(_))));
        }
    }

    #[test]
    fn default_params_are_valid() {
        assert!(AnalysisParams::default().validate().is_ok());
    }

    #[test]
    fn normalize_degenerate_is_zero() {
        let mut data = vec![3.5; 16];
        normalize_in_place(&mut data);
        assert!(data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn filterbank_rows_cover_spectrum() {
        let fb = mel_filterbank(22050, 2048, 64);
        assert_eq!(fb.len(), 64);
        assert_eq!(fb[0].len(), 1025);
        // Every filter carries some weight.
        for (m, filter) in fb.iter().enumerate() {
            assert!(filter.iter().any(|&w| w > 0.0), "empty filter {}", m);
        }
    }
}
