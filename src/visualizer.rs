//! A file opened for plotting, tied to its view and colors.

use std::{
    fs::File,
    io::{Read, Seek},
    path::Path,
    time::Instant,
};

use log::debug;

use crate::{
    color::{self, ChannelCaps, ColorBuffer},
    error::Result,
    sink::{ImageSink, PngSink},
    source::{ByteSource, CachePolicy},
    table::BinaryTable,
    window::ViewWindow,
};

/// A file opened for plotting together with the current view.
///
/// Setters forward to [`ViewWindow`] and report whether anything changed.
/// Each call to [`Visualizer::current_image`] recomputes the plot from
/// scratch; nothing is kept between redraws.
pub struct Visualizer<R = File> {
    source: ByteSource<R>,
    window: ViewWindow,
    caps: ChannelCaps,
}

impl Visualizer<File> {
    pub fn open<P>(path: P, caps: ChannelCaps, policy: CachePolicy) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        Self::new(ByteSource::open(path, policy)?, caps)
    }
}

impl<R> Visualizer<R>
where
    R: Read + Seek,
{
    pub fn new(source: ByteSource<R>, caps: ChannelCaps) -> Result<Self> {
        let window = ViewWindow::new(source.len())?;
        Ok(Self {
            source,
            window,
            caps,
        })
    }

    pub fn window(&self) -> &ViewWindow {
        &self.window
    }

    pub fn caps(&self) -> &ChannelCaps {
        &self.caps
    }

    pub fn is_cached(&self) -> bool {
        self.source.is_cached()
    }

    pub fn set_offset(&mut self, offset: u64) -> bool {
        self.window.set_offset(offset)
    }

    pub fn set_window_length(&mut self, window_length: u64) -> bool {
        self.window.set_window_length(window_length)
    }

    pub fn set_brightness(&mut self, brightness: u32) -> bool {
        self.window.set_brightness(brightness)
    }

    pub fn histogram(&mut self) -> Result<BinaryTable> {
        BinaryTable::compute(&mut self.source, &self.window)
    }

    pub fn current_image(&mut self) -> Result<ColorBuffer> {
        let start = Instant::now();
        let table = self.histogram()?;
        let image = color::map(&table, &self.caps, self.window.brightness());
        debug!(
            "Plotted {} pairs at {} in {:?}",
            self.window.window_length(),
            self.window.offset(),
            start.elapsed()
        );
        Ok(image)
    }

    pub fn present<S>(&mut self, sink: &mut S) -> Result
    where
        S: ImageSink,
    {
        let image = self.current_image()?;
        sink.present(&image)
    }

    pub fn save_image<P>(&mut self, path: P) -> Result
    where
        P: AsRef<Path>,
    {
        self.present(&mut PngSink::new(path))
    }
}
