//! Download and decode the image to inspect.

use image::RgbImage;
use log::{info, warn};

use crate::error::FetchError;

/// GET `url` and return the body, failing on any non-2xx status.
pub fn fetch_bytes(url: &str, user_agent: &str) -> Result<Vec<u8>, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(user_agent)
        .build()?;

    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.bytes()?;
    info!("downloaded {} bytes from {url}", body.len());
    Ok(body.to_vec())
}

/// Decode JPEG/PNG bytes into an RGB image, whatever the stored layout.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, FetchError> {
    let decoded = image::load_from_memory(bytes)?;
    Ok(decoded.into_rgb8())
}

pub fn try_fetch_image(url: &str, user_agent: &str) -> Result<RgbImage, FetchError> {
    let bytes = fetch_bytes(url, user_agent)?;
    decode_image(&bytes)
}

/// Fetch boundary: every failure is reported on the console and becomes `None`.
pub fn fetch_image(url: &str, user_agent: &str) -> Option<RgbImage> {
    println!("Downloading: {url} ...");
    match try_fetch_image(url, user_agent) {
        Ok(image) => {
            info!("decoded {}x{} image", image.width(), image.height());
            Some(image)
        }
        Err(e @ FetchError::Decode(_)) => {
            println!("Could not decode the image.");
            warn!("{e}");
            None
        }
        Err(e) => {
            println!("Download failed: {e}");
            warn!("{e}");
            None
        }
    }
}
