use thiserror::Error;

/// Failure while turning a URL into an RGB image.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request could not be sent or the body could not be read.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-2xx status.
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Body is not an image format we can decode.
    #[error("decode error: {0}")]
    Decode(#[from] image::ImageError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClaheError {
    #[error("tile grid must be at least 1x1, got {tiles_x}x{tiles_y}")]
    InvalidTileGrid { tiles_x: usize, tiles_y: usize },

    #[error("cannot equalize an empty {width}x{height} image")]
    EmptyImage { width: u32, height: u32 },
}

/// Failure while rendering or showing a figure.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("render error: {0}")]
    Render(String),

    #[error("display error: {0}")]
    Display(String),

    #[error("console I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Anything that can abort the stages after a successful fetch.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Clahe(#[from] ClaheError),

    #[error("console I/O error: {0}")]
    Io(#[from] std::io::Error),
}
