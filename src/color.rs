//! Pixel-level color conversions.
//!
//! Grayscale uses BT.601 weights in 14-bit fixed point. Lab is stored the way
//! 8-bit Lab planes conventionally are: `L * 255 / 100`, `a + 128`, `b + 128`,
//! over sRGB with a D65 white point.

use image::{GrayImage, Luma, RgbImage};

const GRAY_SHIFT: u32 = 14;
const GRAY_R: u32 = 4899; // 0.299
const GRAY_G: u32 = 9617; // 0.587
const GRAY_B: u32 = 1868; // 0.114

// D65 reference white
const XN: f32 = 0.950_456;
const YN: f32 = 1.0;
const ZN: f32 = 1.088_754;

const LAB_EPSILON: f32 = 0.008_856;
const LAB_KAPPA: f32 = 7.787;

/// Perceptual luminance of one RGB pixel.
#[inline]
pub fn rgb_to_gray(rgb: [u8; 3]) -> u8 {
    let [r, g, b] = rgb.map(u32::from);
    ((r * GRAY_R + g * GRAY_G + b * GRAY_B + (1 << (GRAY_SHIFT - 1))) >> GRAY_SHIFT) as u8
}

/// Grayscale version of a whole image.
pub fn to_gray(image: &RgbImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut gray = GrayImage::new(width, height);
    for (src, dst) in image.pixels().zip(gray.pixels_mut()) {
        *dst = Luma([rgb_to_gray(src.0)]);
    }
    gray
}

fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> u8 {
    let c = c.clamp(0.0, 1.0);
    let v = if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

fn lab_f(t: f32) -> f32 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        LAB_KAPPA * t + 16.0 / 116.0
    }
}

fn lab_f_inv(t: f32) -> f32 {
    let t3 = t * t * t;
    if t3 > LAB_EPSILON {
        t3
    } else {
        (t - 16.0 / 116.0) / LAB_KAPPA
    }
}

fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// sRGB pixel to 8-bit `[L, a, b]`.
pub fn rgb_to_lab8(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(srgb_to_linear);

    let x = r * 0.412_453 + g * 0.357_580 + b * 0.180_423;
    let y = r * 0.212_671 + g * 0.715_160 + b * 0.072_169;
    let z = r * 0.019_334 + g * 0.119_193 + b * 0.950_227;

    let fx = lab_f(x / XN);
    let fy = lab_f(y / YN);
    let fz = lab_f(z / ZN);

    let l = (116.0 * fy - 16.0).max(0.0);
    let a = 500.0 * (fx - fy);
    let b = 200.0 * (fy - fz);

    [to_u8(l * 255.0 / 100.0), to_u8(a + 128.0), to_u8(b + 128.0)]
}

/// 8-bit `[L, a, b]` back to an sRGB pixel, clamping out-of-gamut values.
pub fn lab8_to_rgb(lab: [u8; 3]) -> [u8; 3] {
    let l = lab[0] as f32 * 100.0 / 255.0;
    let a = lab[1] as f32 - 128.0;
    let b = lab[2] as f32 - 128.0;

    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;

    let x = lab_f_inv(fx) * XN;
    let y = lab_f_inv(fy) * YN;
    let z = lab_f_inv(fz) * ZN;

    let r = x * 3.240_479 + y * -1.537_150 + z * -0.498_535;
    let g = x * -0.969_256 + y * 1.875_991 + z * 0.041_556;
    let b = x * 0.055_648 + y * -0.204_043 + z * 1.057_311;

    [linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(b)]
}
