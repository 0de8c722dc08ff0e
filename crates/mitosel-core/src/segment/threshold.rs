use ndarray::Array2;

use crate::consts::THRESHOLD_HISTOGRAM_BINS;
use crate::error::{MitoselError, Result};

use super::config::ThresholdMethod;

/// Intensity histogram over the frame's own value range.
pub struct Histogram {
    pub counts: Vec<u64>,
    pub min: f32,
    pub bin_width: f32,
}

impl Histogram {
    /// Build a histogram with `bins` equal-width bins spanning [min, max].
    ///
    /// Fails on empty or flat frames, where no threshold can separate classes.
    pub fn build(data: &Array2<f32>, bins: usize) -> Result<Self> {
        if data.is_empty() {
            return Err(MitoselError::Segmentation("empty frame".into()));
        }
        let (min, max) = data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if !min.is_finite() || !max.is_finite() {
            return Err(MitoselError::Segmentation(
                "frame contains non-finite intensities".into(),
            ));
        }
        if max <= min {
            return Err(MitoselError::Segmentation(format!(
                "flat frame (all pixels = {min})"
            )));
        }

        let bin_width = (max - min) / bins as f32;
        let mut counts = vec![0u64; bins];
        for &v in data.iter() {
            let bin = (((v - min) / bin_width) as usize).min(bins - 1);
            counts[bin] += 1;
        }

        Ok(Self {
            counts,
            min,
            bin_width,
        })
    }

    pub fn bin_center(&self, bin: usize) -> f32 {
        self.min + (bin as f32 + 0.5) * self.bin_width
    }
}

/// Compute the threshold value using the configured method.
pub fn compute_threshold(data: &Array2<f32>, method: ThresholdMethod) -> Result<f32> {
    match method {
        ThresholdMethod::Yen => yen_threshold(data),
        ThresholdMethod::Otsu => otsu_threshold(data),
    }
}

/// Yen's thresholding: pick the bin that maximizes the entropic
/// correlation `log(1 / (Σp²_bg · Σp²_fg)) + 2·log(P_bg · (1 − P_bg))`.
pub fn yen_threshold(data: &Array2<f32>) -> Result<f32> {
    let histogram = Histogram::build(data, THRESHOLD_HISTOGRAM_BINS)?;
    let total: f64 = histogram.counts.iter().sum::<u64>() as f64;
    let pmf: Vec<f64> = histogram
        .counts
        .iter()
        .map(|&c| c as f64 / total)
        .collect();
    let n = pmf.len();

    let mut cum = vec![0.0f64; n];
    let mut cum_sq = vec![0.0f64; n];
    let mut acc = 0.0;
    let mut acc_sq = 0.0;
    for i in 0..n {
        acc += pmf[i];
        acc_sq += pmf[i] * pmf[i];
        cum[i] = acc;
        cum_sq[i] = acc_sq;
    }

    // Squared mass from each bin to the top.
    let mut tail_sq = vec![0.0f64; n];
    let mut acc_tail = 0.0;
    for i in (0..n).rev() {
        acc_tail += pmf[i] * pmf[i];
        tail_sq[i] = acc_tail;
    }

    let mut best_bin = None;
    let mut best_crit = f64::NEG_INFINITY;
    for i in 0..n - 1 {
        let p = cum[i];
        let sq = cum_sq[i] * tail_sq[i + 1];
        if p <= 0.0 || p >= 1.0 || sq <= 0.0 {
            continue;
        }
        let crit = -sq.ln() + 2.0 * (p * (1.0 - p)).ln();
        if crit > best_crit {
            best_crit = crit;
            best_bin = Some(i);
        }
    }

    best_bin
        .map(|bin| histogram.bin_center(bin))
        .ok_or_else(|| MitoselError::Segmentation("Yen criterion undefined".into()))
}

/// Otsu's thresholding: find the value that maximizes between-class variance.
pub fn otsu_threshold(data: &Array2<f32>) -> Result<f32> {
    let histogram = Histogram::build(data, THRESHOLD_HISTOGRAM_BINS)?;

    let total = data.len() as f64;
    let mut sum_all: f64 = 0.0;
    for (i, &count) in histogram.counts.iter().enumerate() {
        sum_all += i as f64 * count as f64;
    }

    let mut weight_bg: f64 = 0.0;
    let mut sum_bg: f64 = 0.0;
    let mut best_variance = 0.0_f64;
    let mut best_bin = 0usize;

    for (i, &count) in histogram.counts.iter().enumerate() {
        weight_bg += count as f64;
        if weight_bg == 0.0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        if weight_fg == 0.0 {
            break;
        }
        sum_bg += i as f64 * count as f64;
        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum_all - sum_bg) / weight_fg;
        let between_variance = weight_bg * weight_fg * (mean_bg - mean_fg).powi(2);

        if between_variance > best_variance {
            best_variance = between_variance;
            best_bin = i;
        }
    }

    Ok(histogram.bin_center(best_bin))
}
