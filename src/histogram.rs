//! Fixed 256-bucket intensity histograms.

use image::{GrayImage, RgbImage};

pub const BINS: usize = 256;

/// One of the three color planes of an RGB image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }

    /// Single-letter name used in legends.
    pub fn letter(self) -> char {
        match self {
            Channel::Red => 'R',
            Channel::Green => 'G',
            Channel::Blue => 'B',
        }
    }
}

/// Pixel counts per 8-bit intensity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    bins: [u32; BINS],
}

impl Histogram {
    fn from_values(values: impl Iterator<Item = u8>) -> Self {
        let mut bins = [0u32; BINS];
        for v in values {
            bins[usize::from(v)] += 1;
        }
        Self { bins }
    }

    pub fn from_gray(image: &GrayImage) -> Self {
        Self::from_values(image.pixels().map(|p| p.0[0]))
    }

    pub fn from_channel(image: &RgbImage, channel: Channel) -> Self {
        let c = channel.index();
        Self::from_values(image.pixels().map(|p| p.0[c]))
    }

    pub fn bins(&self) -> &[u32; BINS] {
        &self.bins
    }

    pub fn count(&self, value: u8) -> u32 {
        self.bins[usize::from(value)]
    }

    pub fn total(&self) -> u64 {
        self.bins.iter().map(|&c| u64::from(c)).sum()
    }

    pub fn max_count(&self) -> u32 {
        self.bins.iter().copied().max().unwrap_or(0)
    }

    /// Share of all pixels sitting exactly at `value`, in percent.
    pub fn percent_at(&self, value: u8) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        100.0 * f64::from(self.count(value)) / total as f64
    }

    /// Counts as plot-ready values, one per bucket.
    pub fn to_series(&self) -> Vec<f64> {
        self.bins.iter().map(|&c| f64::from(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    #[test]
    fn test_gray_counts_sum_to_pixel_count() {
        let image = GrayImage::from_fn(17, 9, |x, y| Luma([(x * 13 + y * 7) as u8]));
        let hist = Histogram::from_gray(&image);
        assert_eq!(hist.total(), 17 * 9);
    }

    #[test]
    fn test_uniform_gray_fills_one_bucket() {
        let image = GrayImage::from_pixel(4, 4, Luma([128]));
        let hist = Histogram::from_gray(&image);
        assert_eq!(hist.count(128), 16);
        assert_eq!(hist.max_count(), 16);
        assert!(hist
            .bins()
            .iter()
            .enumerate()
            .all(|(i, &c)| i == 128 || c == 0));
    }

    #[test]
    fn test_channel_histograms() {
        let image = RgbImage::from_fn(2, 2, |x, _| {
            if x == 0 {
                Rgb([10, 20, 30])
            } else {
                Rgb([10, 200, 255])
            }
        });
        assert_eq!(Histogram::from_channel(&image, Channel::Red).count(10), 4);
        let green = Histogram::from_channel(&image, Channel::Green);
        assert_eq!((green.count(20), green.count(200)), (2, 2));
        let blue = Histogram::from_channel(&image, Channel::Blue);
        assert_eq!(blue.percent_at(255), 50.0);
    }

    #[test]
    fn test_empty_histogram() {
        let hist = Histogram::from_gray(&GrayImage::new(0, 0));
        assert_eq!(hist.total(), 0);
        assert_eq!(hist.percent_at(0), 0.0);
        assert_eq!(hist.to_series().len(), BINS);
    }
}
