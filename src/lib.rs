//! Exposure inspection for a single photo: luminance and RGB histograms,
//! heuristic exposure/contrast diagnosis, and a CLAHE lightness correction
//! shown next to the original.

pub mod clahe;
pub mod color;
pub mod config;
pub mod enhance;
pub mod error;
pub mod fetch;
pub mod figure;
pub mod histogram;
pub mod pipeline;
pub mod quality;
pub mod render;
pub mod sink;
#[cfg(feature = "window")]
pub mod window;

pub use clahe::{clahe_generic, clahe_u8_to_u8};
pub use config::{ClaheParams, InspectConfig, QualityThresholds};
pub use enhance::enhance_contrast;
pub use error::{ClaheError, FetchError, PipelineError, SinkError};
pub use fetch::fetch_image;
pub use figure::{comparison, histogram_dashboard, Figure, Panel};
pub use histogram::{Channel, Histogram};
pub use pipeline::{inspect, Inspection};
pub use quality::{analyze_quality, QualityReport};
pub use sink::{NullSink, PlotSink, RecordingSink, TerminalSink};
