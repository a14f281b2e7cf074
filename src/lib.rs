//! Byte-pair plots of arbitrary files.
//!
//! Every pixel `(row, column)` of the 256×256 plot shows how often byte
//! `row` is immediately followed by byte `column` inside a window of the
//! file. Code, text, compressed data and padding all leave distinct shapes.

pub mod color;
pub mod error;
pub mod sink;
pub mod source;
pub mod table;
pub mod visualizer;
pub mod window;

pub use color::{ChannelCaps, ColorBuffer};
pub use error::{Error, Result};
pub use sink::{ImageSink, PngSink};
pub use source::{ByteSource, CachePolicy};
pub use table::BinaryTable;
pub use visualizer::Visualizer;
pub use window::ViewWindow;
