//! Contrast-limited adaptive histogram equalization on single-channel images.
//!
//! The image is split into a grid of tiles. Each tile gets its own
//! equalization lookup table built from a clipped histogram, and every output
//! pixel is a bilinear blend of the four nearest tile tables. Images that do
//! not divide evenly into the grid are mirror-padded (reflect-101) before the
//! tables are built.

use std::borrow::Cow;

use image::GenericImageView;
use image::GrayImage;
use image::ImageBuffer;
use image::Luma;
use log::{debug, trace};
use num_traits::cast::{FromPrimitive, ToPrimitive};

use crate::config::ClaheParams;
use crate::error::ClaheError;

/// Mirror an index into `0..len` without repeating the edge sample.
fn reflect_101(i: i64, len: i64) -> i64 {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let m = i.rem_euclid(period);
    if m < len {
        m
    } else {
        period - m
    }
}

fn calc_lut_body<T, const HIST_SIZE: usize>(
    lut: &mut [u32; HIST_SIZE],
    src: &ImageBuffer<Luma<T>, Vec<T>>,
    tile_size_wh: (usize, usize),
    clip_limit: u32,
    lut_scale: f32,
    tile_x: usize,
    tile_y: usize,
) where
    T: image::Primitive,
{
    let tile = src.view(
        (tile_x * tile_size_wh.0) as u32,
        (tile_y * tile_size_wh.1) as u32,
        tile_size_wh.0 as u32,
        tile_size_wh.1 as u32,
    );

    let mut tile_hist: [u32; HIST_SIZE] = [0; HIST_SIZE];
    for (_, _, p) in tile.pixels() {
        let bin = p.0[0].to_usize().unwrap_or(0).min(HIST_SIZE - 1);
        tile_hist[bin] += 1;
    }

    if clip_limit > 0 {
        let mut clipped: usize = 0;
        for count in tile_hist.iter_mut() {
            if *count > clip_limit {
                clipped += (*count - clip_limit) as usize;
                *count = clip_limit;
            }
        }

        // every bin gets the full batch, the remainder is spread evenly
        let redist_batch = clipped / HIST_SIZE;
        let mut residual = clipped - redist_batch * HIST_SIZE;
        for count in tile_hist.iter_mut() {
            *count += redist_batch as u32;
        }

        if residual != 0 {
            let residual_step = (HIST_SIZE / residual).max(1);
            let mut i = 0;
            while i < HIST_SIZE && residual > 0 {
                tile_hist[i] += 1;
                i += residual_step;
                residual -= 1;
            }
        }
    }

    let mut sum = 0;
    for (entry, count) in lut.iter_mut().zip(tile_hist.iter()) {
        sum += count;
        *entry = (sum as f32 * lut_scale)
            .round()
            .clamp(0.0, HIST_SIZE as f32 - 1.0) as u32;
    }
}

#[allow(clippy::too_many_arguments)]
fn interpolate<T, U, const T_MAX: usize, const U_MAX: usize>(
    dst: &mut ImageBuffer<Luma<U>, Vec<U>>,
    input: &ImageBuffer<Luma<T>, Vec<T>>,
    luts: &[[u32; T_MAX]],
    tile_size_wh: (usize, usize),
    n_tiles_wh: (usize, usize),
    tile_xs: (i32, i32),
    tile_ys: (i32, i32),
) where
    T: image::Primitive,
    U: image::Primitive + ToPrimitive + FromPrimitive,
{
    let out_width = dst.width() as i32;
    let out_height = dst.height() as i32;

    // The pair (a, b) covers the band between the centers of tile a and
    // tile b: (-1, 0) is the leading half tile, (n-1, n) the trailing one.
    let (tile_width, tile_height) = (tile_size_wh.0 as i32, tile_size_wh.1 as i32);
    let x_start = (tile_xs.0 * tile_width + tile_width / 2).clamp(0, out_width) as u32;
    let x_end = (tile_xs.1 * tile_width + tile_width / 2).clamp(0, out_width) as u32;
    let y_start = (tile_ys.0 * tile_height + tile_height / 2).clamp(0, out_height) as u32;
    let y_end = (tile_ys.1 * tile_height + tile_height / 2).clamp(0, out_height) as u32;

    trace!("fill: [{x_start}, {x_end}), [{y_start}, {y_end})");

    let lut_left = tile_xs.0.clamp(0, n_tiles_wh.0 as i32 - 1) as usize;
    let lut_right = tile_xs.1.clamp(0, n_tiles_wh.0 as i32 - 1) as usize;
    let lut_top = tile_ys.0.clamp(0, n_tiles_wh.1 as i32 - 1) as usize;
    let lut_bottom = tile_ys.1.clamp(0, n_tiles_wh.1 as i32 - 1) as usize;

    let hist_00 = &luts[lut_left + n_tiles_wh.0 * lut_top];
    let hist_10 = &luts[lut_right + n_tiles_wh.0 * lut_top];
    let hist_01 = &luts[lut_left + n_tiles_wh.0 * lut_bottom];
    let hist_11 = &luts[lut_right + n_tiles_wh.0 * lut_bottom];
    let scale = U_MAX as f32 / T_MAX as f32;
    let out_max = U::max_value().to_f32().unwrap_or(0.0);

    for (yi, y) in (y_start..y_end).enumerate() {
        let yw = yi as f32 / tile_height as f32;
        for (xi, x) in (x_start..x_end).enumerate() {
            let xw = xi as f32 / tile_width as f32;
            let w_00 = (1.0 - xw) * (1.0 - yw);
            let w_10 = xw * (1.0 - yw);
            let w_01 = (1.0 - xw) * yw;
            let w_11 = xw * yw;

            let p: usize = input
                .get_pixel(x, y)
                .0[0]
                .to_usize()
                .unwrap_or(0)
                .min(T_MAX - 1);

            let q = (scale
                * (hist_00[p] as f32 * w_00
                    + hist_01[p] as f32 * w_01
                    + hist_10[p] as f32 * w_10
                    + hist_11[p] as f32 * w_11))
                .round()
                .clamp(0.0, out_max);
            let q: U = U::from_f32(q).unwrap_or(U::zero());

            dst.put_pixel(x, y, Luma([q]));
        }
    }
}

/// Equalize `input` with a `tiles_x` x `tiles_y` grid.
///
/// `T_MAX` and `U_MAX` are the number of representable levels of the input
/// and output sample types (256 for `u8`). A `clip_limit` of zero or less
/// disables clipping and gives plain adaptive equalization.
pub fn clahe_generic<T, U, const T_MAX: usize, const U_MAX: usize>(
    tiles_x: usize,
    tiles_y: usize,
    clip_limit: f32,
    input: &ImageBuffer<Luma<T>, Vec<T>>,
) -> Result<ImageBuffer<Luma<U>, Vec<U>>, ClaheError>
where
    T: image::Primitive,
    U: image::Primitive + ToPrimitive + FromPrimitive,
{
    if tiles_x == 0 || tiles_y == 0 {
        return Err(ClaheError::InvalidTileGrid { tiles_x, tiles_y });
    }
    if input.width() == 0 || input.height() == 0 {
        return Err(ClaheError::EmptyImage {
            width: input.width(),
            height: input.height(),
        });
    }

    let mut dst = ImageBuffer::<Luma<U>, Vec<U>>::new(input.width(), input.height());

    let (tile_size_wh, src_for_lut): ((usize, usize), Cow<ImageBuffer<Luma<T>, Vec<T>>>) =
        if input.width() % tiles_x as u32 == 0 && input.height() % tiles_y as u32 == 0 {
            (
                (
                    input.width() as usize / tiles_x,
                    input.height() as usize / tiles_y,
                ),
                Cow::Borrowed(input),
            )
        } else {
            let tile_width = (input.width() as usize).div_ceil(tiles_x);
            let tile_height = (input.height() as usize).div_ceil(tiles_y);
            let new_width = tile_width * tiles_x;
            let new_height = tile_height * tiles_y;
            debug!(
                "padding {}x{} to {new_width}x{new_height} for a {tiles_x}x{tiles_y} grid",
                input.width(),
                input.height()
            );
            let width = input.width() as i64;
            let height = input.height() as i64;
            let padded = ImageBuffer::from_fn(new_width as u32, new_height as u32, |x, y| {
                let src_x = reflect_101(x as i64, width) as u32;
                let src_y = reflect_101(y as i64, height) as u32;
                *input.get_pixel(src_x, src_y)
            });
            ((tile_width, tile_height), Cow::Owned(padded))
        };

    let tile_size_total = tile_size_wh.0 * tile_size_wh.1;
    let lut_scale = (T_MAX as f32 - 1.0) / tile_size_total as f32;

    let clip_limit = if clip_limit > 0.0 {
        (clip_limit * tile_size_total as f32 / T_MAX as f32).max(1.0) as u32
    } else {
        0
    };
    debug!("tile size {tile_size_wh:?}, clip limit {clip_limit} counts");

    let mut luts: Vec<[u32; T_MAX]> = vec![[0; T_MAX]; tiles_x * tiles_y];
    for tile_y in 0..tiles_y {
        for tile_x in 0..tiles_x {
            calc_lut_body::<T, T_MAX>(
                &mut luts[tile_y * tiles_x + tile_x],
                &src_for_lut,
                tile_size_wh,
                clip_limit,
                lut_scale,
                tile_x,
                tile_y,
            );
        }
    }

    // Pairs (-1, 0), (0, 1) ... (n-1, n) in both directions; the outer
    // pairs clamp to a single tile table.
    for tile_y in 0..=tiles_y {
        for tile_x in 0..=tiles_x {
            interpolate::<T, U, T_MAX, U_MAX>(
                &mut dst,
                &src_for_lut,
                &luts,
                tile_size_wh,
                (tiles_x, tiles_y),
                (tile_x as i32 - 1, tile_x as i32),
                (tile_y as i32 - 1, tile_y as i32),
            );
        }
    }

    Ok(dst)
}

pub fn clahe_u8_to_u8(
    tiles_x: usize,
    tiles_y: usize,
    clip_limit: f32,
    input: &GrayImage,
) -> Result<GrayImage, ClaheError> {
    clahe_generic::<u8, u8, 256, 256>(tiles_x, tiles_y, clip_limit, input)
}

/// [`clahe_u8_to_u8`] with the tiling taken from `params`.
pub fn equalize(input: &GrayImage, params: &ClaheParams) -> Result<GrayImage, ClaheError> {
    clahe_u8_to_u8(params.tiles_x, params.tiles_y, params.clip_limit, input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn striped(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| Luma([100 + ((x + y) % 8) as u8]))
    }

    #[test]
    fn test_reflect_101() {
        let mirrored: Vec<i64> = (0..10).map(|i| reflect_101(i, 4)).collect();
        assert_eq!(mirrored, vec![0, 1, 2, 3, 2, 1, 0, 1, 2, 3]);
        assert_eq!(reflect_101(5, 1), 0);
        assert_eq!(reflect_101(-1, 4), 1);
    }

    #[test]
    fn test_output_keeps_dimensions() {
        let input = striped(37, 21);
        let output = clahe_u8_to_u8(8, 8, 3.0, &input).unwrap();
        assert_eq!(output.dimensions(), (37, 21));
    }

    #[test]
    fn test_image_smaller_than_grid() {
        let input = GrayImage::from_pixel(4, 4, Luma([128]));
        let output = clahe_u8_to_u8(8, 8, 3.0, &input).unwrap();
        assert_eq!(output.dimensions(), (4, 4));
        let first = output.get_pixel(0, 0).0[0];
        assert!(output.pixels().all(|p| p.0[0] == first));
    }

    #[test]
    fn test_uniform_image_stays_uniform() {
        let input = GrayImage::from_pixel(64, 64, Luma([90]));
        let output = clahe_u8_to_u8(8, 8, 3.0, &input).unwrap();
        let first = output.get_pixel(0, 0).0[0];
        assert!(output.pixels().all(|p| p.0[0] == first));
    }

    #[test]
    fn test_lut_entries_round_to_nearest() {
        // one clipped bin per tile: 24 counts at or below 90, 24 * 255 / 64 = 95.625
        let input = GrayImage::from_pixel(64, 64, Luma([90]));
        let output = clahe_u8_to_u8(8, 8, 3.0, &input).unwrap();
        assert!(output.pixels().all(|p| p.0[0] == 96));
    }

    #[test]
    fn test_stretches_narrow_range() {
        let input = striped(64, 64);
        let output = clahe_u8_to_u8(8, 8, 3.0, &input).unwrap();

        let min = output.pixels().map(|p| p.0[0]).min().unwrap();
        let max = output.pixels().map(|p| p.0[0]).max().unwrap();
        assert!(max - min > 7, "range {min}..{max} was not widened");
    }

    #[test]
    fn test_equal_tiles_give_lut_lookup() {
        // every tile holds the same value distribution, so all tables agree
        // and the output is a pure function of the input value
        let input = striped(64, 64);
        let output = clahe_u8_to_u8(8, 8, 3.0, &input).unwrap();
        for value in 100..108u8 {
            let mapped: Vec<u8> = input
                .enumerate_pixels()
                .filter(|(_, _, p)| p.0[0] == value)
                .map(|(x, y, _)| output.get_pixel(x, y).0[0])
                .collect();
            assert!(mapped.iter().all(|&m| m == mapped[0]));
        }
    }

    #[test]
    fn test_rejects_empty_grid() {
        let input = GrayImage::new(8, 8);
        assert_eq!(
            clahe_u8_to_u8(0, 8, 3.0, &input).unwrap_err(),
            ClaheError::InvalidTileGrid {
                tiles_x: 0,
                tiles_y: 8
            }
        );
    }

    #[test]
    fn test_rejects_empty_image() {
        let input = GrayImage::new(0, 5);
        assert_eq!(
            equalize(&input, &ClaheParams::default()).unwrap_err(),
            ClaheError::EmptyImage {
                width: 0,
                height: 5
            }
        );
    }
}
