//! Exposure and contrast heuristics.
//!
//! Statistics are taken over the BT.601 luminance of the image. Exposure and
//! contrast rules decide whether the image needs fixing; clipping rules only
//! add informational lines.

use std::io::Write;

use image::RgbImage;

use crate::color::to_gray;
use crate::config::QualityThresholds;
use crate::histogram::Histogram;

pub const UNDEREXPOSED: &str = "UNDEREXPOSED (too dark).";
pub const OVEREXPOSED: &str = "OVEREXPOSED (too bright).";
pub const EXPOSURE_OK: &str = "Exposure OK.";
pub const VERY_LOW_CONTRAST: &str = "VERY LOW CONTRAST (hazy image).";
pub const MODERATE_CONTRAST: &str = "Moderate contrast.";
pub const GOOD_CONTRAST: &str = "Good contrast.";

/// Outcome of analyzing one image.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityReport {
    /// Mean luminance, 0-255
    pub mean: f64,
    /// Population standard deviation of luminance
    pub std: f64,
    /// Percent of pixels at luminance 0
    pub clipping_shadows: f64,
    /// Percent of pixels at luminance 255
    pub clipping_highlights: f64,
    pub diagnosis: Vec<String>,
    pub needs_fix: bool,
}

pub fn shadow_clipping_message(percent: f64) -> String {
    format!("Shadow detail lost ({percent:.1}% pure black).")
}

pub fn highlight_clipping_message(percent: f64) -> String {
    format!("Highlight detail lost ({percent:.1}% pure white).")
}

/// Mean and population standard deviation of a histogram's samples.
pub fn mean_std(hist: &Histogram) -> (f64, f64) {
    let total = hist.total();
    if total == 0 {
        return (0.0, 0.0);
    }
    let n = total as f64;
    let mean = hist
        .bins()
        .iter()
        .enumerate()
        .map(|(v, &c)| v as f64 * f64::from(c))
        .sum::<f64>()
        / n;
    let variance = hist
        .bins()
        .iter()
        .enumerate()
        .map(|(v, &c)| {
            let d = v as f64 - mean;
            d * d * f64::from(c)
        })
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

pub fn analyze_quality(image: &RgbImage, thresholds: &QualityThresholds) -> QualityReport {
    let gray = to_gray(image);
    let hist = Histogram::from_gray(&gray);
    let (mean, std) = mean_std(&hist);

    let clipping_shadows = hist.percent_at(0);
    let clipping_highlights = hist.percent_at(u8::MAX);

    let mut diagnosis = Vec::new();
    let mut needs_fix = false;

    if mean < thresholds.underexposed_mean {
        diagnosis.push(UNDEREXPOSED.to_string());
        needs_fix = true;
    } else if mean > thresholds.overexposed_mean {
        diagnosis.push(OVEREXPOSED.to_string());
        needs_fix = true;
    } else {
        diagnosis.push(EXPOSURE_OK.to_string());
    }

    if std < thresholds.low_contrast_std {
        diagnosis.push(VERY_LOW_CONTRAST.to_string());
        needs_fix = true;
    } else if std < thresholds.moderate_contrast_std {
        diagnosis.push(MODERATE_CONTRAST.to_string());
    } else {
        diagnosis.push(GOOD_CONTRAST.to_string());
    }

    if clipping_shadows > thresholds.clipping_percent {
        diagnosis.push(shadow_clipping_message(clipping_shadows));
    }
    if clipping_highlights > thresholds.clipping_percent {
        diagnosis.push(highlight_clipping_message(clipping_highlights));
    }

    QualityReport {
        mean,
        std,
        clipping_shadows,
        clipping_highlights,
        diagnosis,
        needs_fix,
    }
}

/// Write the console section for `report`.
pub fn print_report<W: Write + ?Sized>(report: &QualityReport, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Mean brightness: {:.2}", report.mean)?;
    writeln!(out, "Contrast (StdDev): {:.2}", report.std)?;
    writeln!(out, "Diagnosis:")?;
    for line in &report.diagnosis {
        writeln!(out, "  {line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use image::Rgb;

    fn analyze(image: &RgbImage) -> QualityReport {
        analyze_quality(image, &QualityThresholds::default())
    }

    /// Left half `low`, right half `high`.
    fn split(width: u32, height: u32, low: u8, high: u8) -> RgbImage {
        RgbImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Rgb([low; 3])
            } else {
                Rgb([high; 3])
            }
        })
    }

    #[test]
    fn test_uniform_gray() {
        let report = analyze(&RgbImage::from_pixel(4, 4, Rgb([128; 3])));
        assert_abs_diff_eq!(report.mean, 128.0, epsilon = 1e-9);
        assert_abs_diff_eq!(report.std, 0.0, epsilon = 1e-9);
        assert_eq!(report.diagnosis, vec![EXPOSURE_OK, VERY_LOW_CONTRAST]);
        assert!(report.needs_fix);
    }

    #[test]
    fn test_all_black() {
        let report = analyze(&RgbImage::new(2, 2));
        assert_eq!(report.mean, 0.0);
        assert_eq!(report.std, 0.0);
        assert_eq!(report.clipping_shadows, 100.0);
        assert_eq!(report.clipping_highlights, 0.0);
        assert_eq!(
            report.diagnosis,
            vec![
                UNDEREXPOSED.to_string(),
                VERY_LOW_CONTRAST.to_string(),
                "Shadow detail lost (100.0% pure black).".to_string(),
            ]
        );
        assert!(report.needs_fix);
    }

    #[test]
    fn test_overexposed() {
        let report = analyze(&RgbImage::from_pixel(3, 3, Rgb([250; 3])));
        assert_eq!(report.diagnosis[0], OVEREXPOSED);
        assert!(report.needs_fix);
    }

    #[test]
    fn test_clipping_does_not_flag_fix() {
        // mean 127.5, std 127.5, half the pixels clipped at each end
        let report = analyze(&split(10, 4, 0, 255));
        assert_abs_diff_eq!(report.mean, 127.5, epsilon = 1e-9);
        assert_abs_diff_eq!(report.std, 127.5, epsilon = 1e-9);
        assert_eq!(
            report.diagnosis,
            vec![
                EXPOSURE_OK.to_string(),
                GOOD_CONTRAST.to_string(),
                shadow_clipping_message(50.0),
                highlight_clipping_message(50.0),
            ]
        );
        assert!(!report.needs_fix);
    }

    #[test]
    fn test_moderate_contrast() {
        // mean 128, std 40
        let report = analyze(&split(8, 8, 88, 168));
        assert_abs_diff_eq!(report.std, 40.0, epsilon = 1e-9);
        assert_eq!(report.diagnosis, vec![EXPOSURE_OK, MODERATE_CONTRAST]);
        assert!(!report.needs_fix);
    }

    #[test]
    fn test_needs_fix_boundaries() {
        // exactly on the thresholds nothing is flagged
        let at_low = analyze(&split(4, 4, 30, 90));
        assert_abs_diff_eq!(at_low.mean, 60.0, epsilon = 1e-9);
        assert_abs_diff_eq!(at_low.std, 30.0, epsilon = 1e-9);
        assert!(!at_low.needs_fix);

        let just_dark = analyze(&split(4, 4, 29, 89));
        assert!(just_dark.mean < 60.0);
        assert!(just_dark.needs_fix);
    }

    #[test]
    fn test_clipping_percent_rounds_to_one_decimal() {
        // 1 black pixel of 64 = 1.5625%
        let mut image = RgbImage::from_pixel(8, 8, Rgb([128; 3]));
        image.put_pixel(0, 0, Rgb([0; 3]));
        let report = analyze(&image);
        assert_abs_diff_eq!(report.clipping_shadows, 1.5625, epsilon = 1e-9);
        assert!(report
            .diagnosis
            .contains(&"Shadow detail lost (1.6% pure black).".to_string()));
    }

    #[test]
    fn test_print_report() {
        let report = analyze(&RgbImage::from_pixel(4, 4, Rgb([128; 3])));
        let mut out = Vec::new();
        print_report(&report, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Mean brightness: 128.00\n\
             Contrast (StdDev): 0.00\n\
             Diagnosis:\n  Exposure OK.\n  VERY LOW CONTRAST (hazy image).\n"
        );
    }
}
