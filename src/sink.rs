//! Destinations for finished plots.

use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use image::{codecs::png::PngEncoder, ExtendedColorType, ImageEncoder};

use crate::{
    color::{ColorBuffer, SIDE},
    error::Result,
};

/// Something that takes a finished plot, a screen or an image file.
pub trait ImageSink {
    fn present(&mut self, image: &ColorBuffer) -> Result;
}

/// Writes each presented plot to `path` as a 256×256 RGBA PNG.
pub struct PngSink {
    path: PathBuf,
}

impl PngSink {
    pub fn new<P>(path: P) -> Self
    where
        P: AsRef<Path>,
    {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSink for PngSink {
    fn present(&mut self, image: &ColorBuffer) -> Result {
        let output = BufWriter::new(File::create(&self.path)?);
        PngEncoder::new(output).write_image(
            image.as_rgba(),
            SIDE,
            SIDE,
            ExtendedColorType::Rgba8,
        )?;
        Ok(())
    }
}
