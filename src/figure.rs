//! Backend-independent description of the figures the inspector shows.
//!
//! Builders here only arrange data; turning a [`Figure`] into pixels or
//! terminal output is the job of a [`PlotSink`](crate::sink::PlotSink).

use image::RgbImage;

use crate::color::to_gray;
use crate::histogram::{Channel, Histogram};

/// Line/fill color of a plotted series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesColor(pub u8, pub u8, pub u8);

impl SeriesColor {
    pub const BLACK: SeriesColor = SeriesColor(0, 0, 0);
    pub const GRAY: SeriesColor = SeriesColor(128, 128, 128);
    pub const RED: SeriesColor = SeriesColor(220, 30, 30);
    pub const GREEN: SeriesColor = SeriesColor(30, 160, 30);
    pub const BLUE: SeriesColor = SeriesColor(30, 60, 220);

    pub fn for_channel(channel: Channel) -> Self {
        match channel {
            Channel::Red => Self::RED,
            Channel::Green => Self::GREEN,
            Channel::Blue => Self::BLUE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub color: SeriesColor,
    /// One value per histogram bucket
    pub values: Vec<f64>,
    /// Largest bucket count, used to scale the y axis
    pub peak: f64,
}

impl Series {
    pub fn from_histogram(label: impl Into<String>, color: SeriesColor, hist: &Histogram) -> Self {
        Self {
            label: label.into(),
            color,
            values: hist.to_series(),
            peak: f64::from(hist.max_count()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    /// A picture with a caption and no axes.
    Image { title: String, image: RgbImage },
    /// A single outlined series filled down to zero.
    FilledLine {
        title: String,
        series: Series,
        fill: SeriesColor,
    },
    /// Overlaid series with a legend.
    MultiLine { title: String, series: Vec<Series> },
    /// Free text on an empty panel.
    Text { text: String },
}

impl Panel {
    pub fn title(&self) -> &str {
        match self {
            Panel::Image { title, .. }
            | Panel::FilledLine { title, .. }
            | Panel::MultiLine { title, .. } => title,
            Panel::Text { .. } => "",
        }
    }
}

/// A grid of panels filled row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub rows: usize,
    pub cols: usize,
    /// Pixel size when rasterized
    pub size: (u32, u32),
    pub panels: Vec<Panel>,
}

pub const DASHBOARD_TITLE: &str = "Histogram analysis";
pub const COMPARISON_TITLE: &str = "Before / after correction";

/// 2x2 overview: the photo, its luminance histogram, per-channel histograms
/// and a pointer to the console report.
pub fn histogram_dashboard(image: &RgbImage, size: (u32, u32)) -> Figure {
    let luminance = Histogram::from_gray(&to_gray(image));
    let channels = Channel::ALL
        .iter()
        .map(|&c| {
            Series::from_histogram(
                format!("Channel {}", c.letter()),
                SeriesColor::for_channel(c),
                &Histogram::from_channel(image, c),
            )
        })
        .collect();

    Figure {
        title: DASHBOARD_TITLE.to_string(),
        rows: 2,
        cols: 2,
        size,
        panels: vec![
            Panel::Image {
                title: "Original image".to_string(),
                image: image.clone(),
            },
            Panel::FilledLine {
                title: "Brightness histogram".to_string(),
                series: Series::from_histogram("Luminance", SeriesColor::BLACK, &luminance),
                fill: SeriesColor::GRAY,
            },
            Panel::MultiLine {
                title: "RGB histograms".to_string(),
                series: channels,
            },
            Panel::Text {
                text: "Quality analysis (see console)".to_string(),
            },
        ],
    }
}

/// Side-by-side original and corrected images.
pub fn comparison(before: &RgbImage, after: &RgbImage, size: (u32, u32)) -> Figure {
    Figure {
        title: COMPARISON_TITLE.to_string(),
        rows: 1,
        cols: 2,
        size,
        panels: vec![
            Panel::Image {
                title: "BEFORE (original)".to_string(),
                image: before.clone(),
            },
            Panel::Image {
                title: "AFTER (CLAHE)".to_string(),
                image: after.clone(),
            },
        ],
    }
}
