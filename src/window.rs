//! The visible slice of the file and the brightness applied to it.

use crate::error::{Error, Result};

/// Upper bound for [`ViewWindow::brightness`], independent of the file.
pub const MAX_BRIGHTNESS: u32 = 256;
pub const DEFAULT_BRIGHTNESS: u32 = 10;
/// Initial window length, shortened for files smaller than this.
pub const DEFAULT_WINDOW_LENGTH: u64 = 25 * 1024;

/// Offset, window length and brightness, always valid for `file_size`.
///
/// The window covers bytes `offset..=offset + window_length`, so it yields
/// `window_length` adjacent pairs and never reads past the end of the file.
/// Every setter clamps instead of failing and returns `false` when the
/// clamped value leaves the state unchanged, so callers can skip a redraw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewWindow {
    file_size: u64,
    offset: u64,
    window_length: u64,
    brightness: u32,
}

impl ViewWindow {
    pub fn new(file_size: u64) -> Result<Self> {
        if file_size < 2 {
            return Err(Error::FileTooSmall(file_size));
        }
        Ok(Self {
            file_size,
            offset: 0,
            window_length: DEFAULT_WINDOW_LENGTH.min(file_size - 1),
            brightness: DEFAULT_BRIGHTNESS,
        })
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn window_length(&self) -> u64 {
        self.window_length
    }

    pub fn brightness(&self) -> u32 {
        self.brightness
    }

    pub fn max_window_length(&self) -> u64 {
        self.file_size - 1
    }

    /// Largest offset that still fits the current window length.
    pub fn max_offset(&self) -> u64 {
        self.file_size - self.window_length - 1
    }

    pub fn max_brightness(&self) -> u32 {
        MAX_BRIGHTNESS
    }

    pub fn set_offset(&mut self, offset: u64) -> bool {
        let offset = offset.min(self.max_offset());
        if offset == self.offset {
            return false;
        }
        self.offset = offset;
        true
    }

    /// Changes the window length and pulls the offset back if the longer
    /// window would run past the end of the file.
    pub fn set_window_length(&mut self, window_length: u64) -> bool {
        let window_length = window_length.clamp(1, self.max_window_length());
        if window_length == self.window_length {
            return false;
        }
        self.window_length = window_length;
        self.offset = self.offset.min(self.max_offset());
        true
    }

    pub fn set_brightness(&mut self, brightness: u32) -> bool {
        let brightness = brightness.clamp(1, MAX_BRIGHTNESS);
        if brightness == self.brightness {
            return false;
        }
        self.brightness = brightness;
        true
    }
}
