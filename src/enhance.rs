//! Local contrast correction on the lightness plane.

use image::{GrayImage, Luma, Rgb, RgbImage};
use log::debug;

use crate::clahe;
use crate::color::{lab8_to_rgb, rgb_to_lab8};
use crate::config::ClaheParams;
use crate::error::ClaheError;

/// An image split into 8-bit L, a and b planes.
#[derive(Debug, Clone, PartialEq)]
pub struct LabPlanes {
    pub l: GrayImage,
    pub a: GrayImage,
    pub b: GrayImage,
}

impl LabPlanes {
    pub fn from_rgb(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let mut l = GrayImage::new(width, height);
        let mut a = GrayImage::new(width, height);
        let mut b = GrayImage::new(width, height);
        for (x, y, p) in image.enumerate_pixels() {
            let [lv, av, bv] = rgb_to_lab8(p.0);
            l.put_pixel(x, y, Luma([lv]));
            a.put_pixel(x, y, Luma([av]));
            b.put_pixel(x, y, Luma([bv]));
        }
        Self { l, a, b }
    }

    pub fn to_rgb(&self) -> RgbImage {
        let (width, height) = self.l.dimensions();
        RgbImage::from_fn(width, height, |x, y| {
            Rgb(lab8_to_rgb([
                self.l.get_pixel(x, y).0[0],
                self.a.get_pixel(x, y).0[0],
                self.b.get_pixel(x, y).0[0],
            ]))
        })
    }
}

/// Equalize lightness with CLAHE and keep the chroma planes as they are.
pub fn enhance_contrast(image: &RgbImage, params: &ClaheParams) -> Result<RgbImage, ClaheError> {
    debug!(
        "enhancing {}x{} image, {}x{} tiles, clip limit {}",
        image.width(),
        image.height(),
        params.tiles_x,
        params.tiles_y,
        params.clip_limit
    );
    let planes = LabPlanes::from_rgb(image);
    let corrected = LabPlanes {
        l: clahe::equalize(&planes.l, params)?,
        ..planes
    };
    Ok(corrected.to_rgb())
}
