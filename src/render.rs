//! Rasterize a [`Figure`] into an in-memory RGB image with plotters.

use image::imageops::{self, FilterType};
use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::SinkError;
use crate::figure::{Figure, Panel, Series, SeriesColor};
use crate::histogram::BINS;

const FONT: &str = "sans-serif";
const TITLE_SIZE: u32 = 22;
const CAPTION_SIZE: u32 = 18;

fn render_err<E: std::fmt::Display>(e: E) -> SinkError {
    SinkError::Render(e.to_string())
}

fn rgb(color: SeriesColor) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

fn y_range(series: &[&Series]) -> f64 {
    let peak = series.iter().map(|s| s.peak).fold(0.0, f64::max);
    (peak * 1.05).max(1.0)
}

fn draw_image<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    image: &RgbImage,
) -> Result<(), SinkError> {
    let titled;
    let area = if title.is_empty() {
        area
    } else {
        titled = area.titled(title, (FONT, CAPTION_SIZE)).map_err(render_err)?;
        &titled
    };

    let (avail_w, avail_h) = area.dim_in_pixel();
    if image.width() == 0 || image.height() == 0 || avail_w == 0 || avail_h == 0 {
        return Ok(());
    }

    // fit inside the panel, keeping the aspect ratio
    let scale = f64::min(
        avail_w as f64 / image.width() as f64,
        avail_h as f64 / image.height() as f64,
    );
    let fit_w = ((image.width() as f64 * scale).floor() as u32).max(1);
    let fit_h = ((image.height() as f64 * scale).floor() as u32).max(1);
    let fitted = if (fit_w, fit_h) == image.dimensions() {
        image.clone()
    } else {
        imageops::resize(image, fit_w, fit_h, FilterType::Triangle)
    };

    let off_x = ((avail_w - fit_w) / 2) as i32;
    let off_y = ((avail_h - fit_h) / 2) as i32;
    for (x, y, p) in fitted.enumerate_pixels() {
        area.draw_pixel(
            (off_x + x as i32, off_y + y as i32),
            &RGBColor(p.0[0], p.0[1], p.0[2]),
        )
        .map_err(render_err)?;
    }
    Ok(())
}

fn draw_filled_line<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    series: &Series,
    fill: SeriesColor,
) -> Result<(), SinkError> {
    let mut builder = ChartBuilder::on(area);
    builder
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60);
    if !title.is_empty() {
        builder.caption(title, (FONT, CAPTION_SIZE));
    }
    let mut chart = builder
        .build_cartesian_2d(0f64..BINS as f64, 0f64..y_range(&[series]))
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .draw()
        .map_err(render_err)?;

    let points = series.values.iter().enumerate().map(|(i, &v)| (i as f64, v));
    chart
        .draw_series(
            AreaSeries::new(points, 0.0, rgb(fill).mix(0.5)).border_style(rgb(series.color)),
        )
        .map_err(render_err)?;
    Ok(())
}

fn draw_multi_line<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    series: &[Series],
) -> Result<(), SinkError> {
    let refs: Vec<&Series> = series.iter().collect();
    let mut builder = ChartBuilder::on(area);
    builder
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60);
    if !title.is_empty() {
        builder.caption(title, (FONT, CAPTION_SIZE));
    }
    let mut chart = builder
        .build_cartesian_2d(0f64..BINS as f64, 0f64..y_range(&refs))
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .draw()
        .map_err(render_err)?;

    for s in series {
        let color = rgb(s.color);
        let points = s.values.iter().enumerate().map(|(i, &v)| (i as f64, v));
        chart
            .draw_series(LineSeries::new(points, color))
            .map_err(render_err)?
            .label(s.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;
    Ok(())
}

fn draw_text<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, text: &str) -> Result<(), SinkError> {
    let (_, h) = area.dim_in_pixel();
    area.draw(&Text::new(
        text.to_string(),
        (20, h as i32 / 2),
        (FONT, CAPTION_SIZE),
    ))
    .map_err(render_err)?;
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
) -> Result<(), SinkError> {
    match panel {
        Panel::Image { title, image } => draw_image(area, title, image),
        Panel::FilledLine {
            title,
            series,
            fill,
        } => draw_filled_line(area, title, series, *fill),
        Panel::MultiLine { title, series } => draw_multi_line(area, title, series),
        Panel::Text { text } => draw_text(area, text),
    }
}

/// Draw every panel of `figure` on a white canvas of `figure.size`.
pub fn render_figure(figure: &Figure) -> Result<RgbImage, SinkError> {
    let (width, height) = figure.size;
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;
        let root = if figure.title.is_empty() {
            root
        } else {
            root.titled(&figure.title, (FONT, TITLE_SIZE))
                .map_err(render_err)?
        };

        let areas = root.split_evenly((figure.rows.max(1), figure.cols.max(1)));
        for (area, panel) in areas.iter().zip(figure.panels.iter()) {
            draw_panel(area, panel)?;
        }
        root.present().map_err(render_err)?;
    }
    RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| SinkError::Render("figure buffer has the wrong size".to_string()))
}
