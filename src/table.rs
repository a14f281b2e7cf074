//! Histogram of adjacent byte pairs within a window of the file.

use std::io::{Read, Seek};

use log::debug;

use crate::{error::Result, source::ByteSource, window::ViewWindow};

/// Most pairs counted from a single read, bounding memory for huge windows.
pub const READ_CHUNK: usize = 1024 * 1024;

/// Counts of adjacent byte pairs, `dots[first][second]`.
///
/// Flattened in row-major order the bucket of a pair is
/// `first * 256 + second`.
pub struct BinaryTable {
    pub dots: Box<[[u64; 256]; 256]>,
}

impl BinaryTable {
    pub fn new() -> Self {
        Self {
            dots: Box::new([[0; 256]; 256]),
        }
    }

    /// Counts every pair in the window of `source` described by `window`.
    pub fn compute<R>(source: &mut ByteSource<R>, window: &ViewWindow) -> Result<Self>
    where
        R: Read + Seek,
    {
        let mut table = Self::new();
        table.accumulate(source, window.offset(), window.window_length())?;
        Ok(table)
    }

    /// Adds the `pairs` pairs starting at `offset`, reading `pairs + 1` bytes.
    ///
    /// Chunks overlap by one byte so pairs straddling a chunk edge are
    /// counted exactly once.
    pub fn accumulate<R>(&mut self, source: &mut ByteSource<R>, offset: u64, pairs: u64) -> Result
    where
        R: Read + Seek,
    {
        let mut done = 0;
        while done < pairs {
            let step = (pairs - done).min(READ_CHUNK as u64) as usize;
            let bytes = source.read(offset.saturating_add(done), step + 1)?;
            self.parse(&bytes);
            done += step as u64;
        }
        debug!("Counted {pairs} pairs from offset {offset}");
        Ok(())
    }

    pub fn clear(&mut self) {
        for dots in self.dots.iter_mut() {
            dots.fill(0);
        }
    }

    pub fn parse(&mut self, bytes: &[u8]) {
        for window in bytes.windows(2) {
            let first = window[0] as usize;
            let second = window[1] as usize;
            self.dots[first][second] += 1;
        }
    }

    pub fn get(&self, first: u8, second: u8) -> u64 {
        self.dots[first as usize][second as usize]
    }

    pub fn total(&self) -> u64 {
        self.dots.iter().flatten().sum()
    }

    pub fn max(&self) -> u64 {
        self.dots.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Counts in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.dots.iter().flatten().copied()
    }
}

impl Default for BinaryTable {
    fn default() -> Self {
        Self::new()
    }
}
