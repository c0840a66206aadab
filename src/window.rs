//! SDL2 viewer: shows each rendered figure in a window until it is closed.

use image::RgbImage;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;

use crate::error::SinkError;
use crate::figure::Figure;
use crate::render::render_figure;
use crate::sink::PlotSink;

fn display_err<E: std::fmt::Display>(e: E) -> SinkError {
    SinkError::Display(e.to_string())
}

/// Rasterize `figure` into the RGB24 frame the window texture is filled from.
pub fn frame(figure: &Figure) -> Result<RgbImage, SinkError> {
    let (width, height) = figure.size;
    if width == 0 || height == 0 {
        return Err(SinkError::Display(format!(
            "cannot open a {width}x{height} window"
        )));
    }
    render_figure(figure)
}

/// Opens one window per figure; Esc, `q` or the close button dismiss it.
#[derive(Debug, Default)]
pub struct WindowSink;

impl WindowSink {
    pub fn new() -> Self {
        Self
    }
}

impl PlotSink for WindowSink {
    fn show(&mut self, figure: &Figure) -> Result<(), SinkError> {
        let rendered = frame(figure)?;
        let (width, height) = rendered.dimensions();

        let sdl_context = sdl2::init().map_err(display_err)?;
        let video = sdl_context.video().map_err(display_err)?;
        let window = video
            .window(&figure.title, width, height)
            .position_centered()
            .build()
            .map_err(display_err)?;
        let mut canvas = window.into_canvas().build().map_err(display_err)?;

        let texture_creator = canvas.texture_creator();
        let mut texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGB24, width, height)
            .map_err(display_err)?;
        texture
            .update(None, rendered.as_raw(), width as usize * 3)
            .map_err(display_err)?;

        let mut event_pump = sdl_context.event_pump().map_err(display_err)?;
        loop {
            canvas.set_draw_color(sdl2::pixels::Color::RGB(255, 255, 255));
            canvas.clear();
            canvas.copy(&texture, None, None).map_err(display_err)?;
            canvas.present();

            match event_pump.wait_event() {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape | Keycode::Q),
                    ..
                } => break,
                _ => {}
            }
        }
        Ok(())
    }
}
