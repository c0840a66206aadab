//! Where figures go once they are built.
//!
//! [`PlotSink::show`] is modal: it returns only after the viewer has been
//! dismissed, so a pipeline run pauses on every figure.

use std::io::{self, BufRead, Write};

use log::debug;

use crate::error::SinkError;
use crate::figure::{Figure, Panel, Series};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SPARK_WIDTH: usize = 64;

pub trait PlotSink {
    fn show(&mut self, figure: &Figure) -> Result<(), SinkError>;
}

impl<S: PlotSink + ?Sized> PlotSink for &mut S {
    fn show(&mut self, figure: &Figure) -> Result<(), SinkError> {
        (**self).show(figure)
    }
}

/// Discards every figure.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl PlotSink for NullSink {
    fn show(&mut self, figure: &Figure) -> Result<(), SinkError> {
        debug!("discarding figure '{}'", figure.title);
        Ok(())
    }
}

/// Keeps a copy of every figure, for headless runs and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub figures: Vec<Figure>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.figures.iter().map(|f| f.title.as_str()).collect()
    }
}

impl PlotSink for RecordingSink {
    fn show(&mut self, figure: &Figure) -> Result<(), SinkError> {
        self.figures.push(figure.clone());
        Ok(())
    }
}

/// Compress `values` into `width` columns of block characters, each column
/// showing the peak of the buckets it covers.
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }
    let width = width.min(values.len());
    let peaks: Vec<f64> = (0..width)
        .map(|col| {
            let start = col * values.len() / width;
            let end = ((col + 1) * values.len() / width).max(start + 1);
            values[start..end].iter().copied().fold(0.0, f64::max)
        })
        .collect();
    let max = peaks.iter().copied().fold(0.0, f64::max);
    peaks
        .iter()
        .map(|&v| {
            if max <= 0.0 || v <= 0.0 {
                ' '
            } else {
                let level = ((v / max) * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
                SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
            }
        })
        .collect()
}

/// Text rendition of figures on a terminal. After each figure it waits for
/// a line on `input` (Enter, on a real terminal).
pub struct TerminalSink<R, W> {
    input: R,
    output: W,
}

impl TerminalSink<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalSink<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn write_series(&mut self, series: &Series) -> io::Result<()> {
        writeln!(
            self.output,
            "  {:<10} |{}|",
            series.label,
            sparkline(&series.values, SPARK_WIDTH)
        )
    }

    fn write_panel(&mut self, panel: &Panel) -> io::Result<()> {
        match panel {
            Panel::Image { title, image } => {
                writeln!(self.output, "[{title}] {}x{} image", image.width(), image.height())
            }
            Panel::FilledLine { title, series, .. } => {
                writeln!(self.output, "[{title}]")?;
                self.write_series(series)
            }
            Panel::MultiLine { title, series } => {
                writeln!(self.output, "[{title}]")?;
                for s in series {
                    self.write_series(s)?;
                }
                Ok(())
            }
            Panel::Text { text } => writeln!(self.output, "{text}"),
        }
    }
}

impl<R: BufRead, W: Write> PlotSink for TerminalSink<R, W> {
    fn show(&mut self, figure: &Figure) -> Result<(), SinkError> {
        writeln!(self.output, "\n=== {} ===", figure.title)?;
        for panel in &figure.panels {
            self.write_panel(panel)?;
        }
        write!(self.output, "(press Enter to close)")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        writeln!(self.output)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::{comparison, histogram_dashboard};
    use image::{Rgb, RgbImage};
    use std::io::Cursor;

    #[test]
    fn test_recording_sink_keeps_figures() {
        let image = RgbImage::from_pixel(2, 2, Rgb([1, 2, 3]));
        let mut sink = RecordingSink::new();
        sink.show(&histogram_dashboard(&image, (100, 100))).unwrap();
        sink.show(&comparison(&image, &image, (100, 50))).unwrap();
        assert_eq!(
            sink.titles(),
            vec!["Histogram analysis", "Before / after correction"]
        );
    }

    fn show_one<S: PlotSink>(mut sink: S, figure: &Figure) {
        sink.show(figure).unwrap();
    }

    #[test]
    fn test_sink_through_mut_ref() {
        let image = RgbImage::new(1, 1);
        let figure = comparison(&image, &image, (10, 10));
        let mut sink = RecordingSink::new();
        show_one(&mut sink, &figure);
        show_one(&mut sink, &figure);
        assert_eq!(sink.figures.len(), 2);
        show_one(NullSink, &figure);
    }

    #[test]
    fn test_sparkline_shape() {
        let mut values = vec![0.0; 256];
        values[128] = 16.0;
        let line = sparkline(&values, 64);
        assert_eq!(line.chars().count(), 64);
        assert_eq!(line.chars().nth(32), Some('█'));
        assert_eq!(line.chars().filter(|&c| c != ' ').count(), 1);
    }

    #[test]
    fn test_sparkline_degenerate() {
        assert_eq!(sparkline(&[], 10), "");
        assert_eq!(sparkline(&[0.0, 0.0], 10), "  ");
    }

    #[test]
    fn test_terminal_sink_waits_for_enter() {
        let image = RgbImage::from_pixel(4, 3, Rgb([128; 3]));
        let input = Cursor::new(b"\n\n".to_vec());
        let mut sink = TerminalSink::new(input, Vec::new());
        sink.show(&histogram_dashboard(&image, (100, 100))).unwrap();

        let (input, output) = sink.into_inner();
        assert_eq!(input.position(), 1);
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("=== Histogram analysis ==="));
        assert!(text.contains("[Original image] 4x3 image"));
        assert!(text.contains("Channel G"));
        assert!(text.contains("Quality analysis (see console)"));
        assert!(text.contains("(press Enter to close)"));
    }
}
