//! Turns pair counts into an RGBA image.
//!
//! Every count is multiplied by the brightness and by a per-channel scale
//! `cap / 255`, floored, and then limited to the channel cap. No gamma or
//! log scaling is applied, so a single very frequent pair saturates while
//! rare pairs stay dark.

use std::str::FromStr;

use crate::{
    error::{Error, Result},
    table::BinaryTable,
};

/// Width and height of the plot in pixels, one per byte value.
pub const SIDE: u32 = 256;

/// Upper intensity for each of red, green and blue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChannelCaps {
    max: [u8; 3],
    scale: [f64; 3],
}

impl ChannelCaps {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        let max = [red, green, blue];
        Self {
            max,
            scale: max.map(|cap| cap as f64 / 255.0),
        }
    }

    /// Caps in red, green, blue order.
    pub fn max(&self) -> [u8; 3] {
        self.max
    }

    fn channel(&self, c: usize, count: u64, brightness: u32) -> u8 {
        let cap = self.max[c];
        let value = (self.scale[c] * count as f64 * brightness as f64).floor();
        if value >= cap as f64 {
            cap
        } else {
            value as u8
        }
    }
}

impl Default for ChannelCaps {
    fn default() -> Self {
        Self::new(0x00, 0xff, 0x00)
    }
}

/// Parses `RRGGBB`, optionally prefixed with `#`.
impl FromStr for ChannelCaps {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        let invalid = || Error::InvalidConfiguration(format!("expected RRGGBB hex color, got `{s}`"));
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let component = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(component(0)?, component(2)?, component(4)?))
    }
}

/// 256×256 RGBA pixels, row-major.
///
/// Row `first`, column `second` holds the pair where byte `first` is
/// immediately followed by byte `second`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorBuffer {
    rgba: Vec<u8>,
}

impl ColorBuffer {
    pub fn pixel(&self, first: u8, second: u8) -> [u8; 4] {
        let i = (first as usize * SIDE as usize + second as usize) * 4;
        [
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ]
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.rgba
    }
}

pub fn map(table: &BinaryTable, caps: &ChannelCaps, brightness: u32) -> ColorBuffer {
    let mut rgba = Vec::with_capacity((SIDE * SIDE * 4) as usize);
    for count in table.iter() {
        rgba.extend([
            caps.channel(0, count, brightness),
            caps.channel(1, count, brightness),
            caps.channel(2, count, brightness),
            0xff,
        ]);
    }
    ColorBuffer { rgba }
}
