//! Hardcoded run settings.
//!
//! Nothing here is read from the command line or the environment; a run is
//! fully described by [`InspectConfig::default`].

/// Image inspected by the binary.
pub const DEFAULT_IMAGE_URL: &str =
    "https://upload.wikimedia.org/wikipedia/commons/c/c0/Foggy_morning_at_Twin_Peaks.jpg";

/// Some image hosts reject requests without a browser-like agent.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// Tiling and clip limit for the contrast-limited equalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClaheParams {
    pub tiles_x: usize,
    pub tiles_y: usize,
    /// Histogram clip limit, relative to a flat histogram (0 disables clipping)
    pub clip_limit: f32,
}

impl Default for ClaheParams {
    fn default() -> Self {
        Self {
            tiles_x: 8,
            tiles_y: 8,
            clip_limit: 3.0,
        }
    }
}

/// Cut-offs used by the quality analyzer. Means and deviations are on the
/// 0-255 luminance scale, clipping is a percentage of all pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityThresholds {
    pub underexposed_mean: f64,
    pub overexposed_mean: f64,
    pub low_contrast_std: f64,
    pub moderate_contrast_std: f64,
    pub clipping_percent: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            underexposed_mean: 60.0,
            overexposed_mean: 195.0,
            low_contrast_std: 30.0,
            moderate_contrast_std: 50.0,
            clipping_percent: 1.0,
        }
    }
}

/// Everything a single inspection run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectConfig {
    pub url: String,
    pub user_agent: String,
    pub clahe: ClaheParams,
    pub thresholds: QualityThresholds,
    /// Pixel size of the 2x2 histogram dashboard
    pub dashboard_size: (u32, u32),
    /// Pixel size of the 1x2 before/after figure
    pub comparison_size: (u32, u32),
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_IMAGE_URL.to_string(),
            user_agent: BROWSER_USER_AGENT.to_string(),
            clahe: ClaheParams::default(),
            thresholds: QualityThresholds::default(),
            dashboard_size: (1200, 900),
            comparison_size: (1200, 600),
        }
    }
}
