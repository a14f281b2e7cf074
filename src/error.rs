//! Error type shared by the plotting pipeline.

/// Errors raised while reading, plotting or saving a byte-pair plot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Range {offset}+{count} exceeds file of {len} bytes")]
    OutOfRange { offset: u64, count: usize, len: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("File of {0} bytes is too small, at least two bytes are needed")]
    FileTooSmall(u64),

    #[error("Could not encode image: {0}")]
    Encode(#[from] image::ImageError),
}

pub type Result<T = ()> = std::result::Result<T, Error>;
