//! The inspection run once an image is in hand: dashboard, analysis,
//! correction, comparison.

use std::io::Write;

use image::RgbImage;
use log::info;

use crate::config::InspectConfig;
use crate::enhance::enhance_contrast;
use crate::error::PipelineError;
use crate::figure::{comparison, histogram_dashboard};
use crate::quality::{analyze_quality, print_report, QualityReport};
use crate::sink::PlotSink;

pub const ANALYSIS_HEADER: &str = "--- ANALYSIS RESULTS ---";
pub const CORRECTION_BANNER: &str = "--- ISSUES DETECTED - RUNNING CORRECTION ---";

/// The correction runs even for images the analyzer finds acceptable; the
/// verdict only shows up in the log.
pub const ALWAYS_ENHANCE: bool = true;

/// What an inspection produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Inspection {
    pub report: QualityReport,
    /// `None` only if correction was skipped
    pub enhanced: Option<RgbImage>,
}

pub fn should_enhance(report: &QualityReport) -> bool {
    report.needs_fix || ALWAYS_ENHANCE
}

/// Show the histogram dashboard, print the quality report to `out`, then
/// correct the image and show the before/after figure.
pub fn inspect<S, W>(
    image: &RgbImage,
    config: &InspectConfig,
    sink: &mut S,
    out: &mut W,
) -> Result<Inspection, PipelineError>
where
    S: PlotSink + ?Sized,
    W: Write + ?Sized,
{
    sink.show(&histogram_dashboard(image, config.dashboard_size))?;

    writeln!(out, "\n{ANALYSIS_HEADER}")?;
    let report = analyze_quality(image, &config.thresholds);
    print_report(&report, out)?;
    info!(
        "mean {:.2}, std {:.2}, needs fix: {}",
        report.mean, report.std, report.needs_fix
    );

    if !should_enhance(&report) {
        return Ok(Inspection {
            report,
            enhanced: None,
        });
    }

    if !report.needs_fix {
        info!("no issues flagged, correcting anyway");
    }
    writeln!(out, "\n{CORRECTION_BANNER}")?;
    out.flush()?;

    let enhanced = enhance_contrast(image, &config.clahe)?;
    sink.show(&comparison(image, &enhanced, config.comparison_size))?;

    Ok(Inspection {
        report,
        enhanced: Some(enhanced),
    })
}
