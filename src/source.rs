//! Access to the bytes of the file being plotted.
//!
//! A [`ByteSource`] either holds the whole file in memory or seeks into it
//! for every read. The choice is made once, when the source is created, from
//! a [`CachePolicy`] and the file length.

use std::{
    borrow::Cow,
    fs::File,
    io::{Read, Seek, SeekFrom},
    path::Path,
    str::FromStr,
};

use log::{info, warn};

use crate::error::{Error, Result};

/// Files smaller than this are cached by [`CachePolicy::default`].
pub const DEFAULT_CACHE_THRESHOLD: u64 = 10 * 1024 * 1024;

/// Decides whether a file is buffered in memory or read on demand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CachePolicy {
    /// Always read the whole file into memory.
    Always,
    /// Cache files strictly smaller than the given number of bytes.
    Threshold(u64),
    /// Always seek and read on demand.
    Never,
}

impl CachePolicy {
    pub fn threshold(bytes: u64) -> Result<Self> {
        Self::Threshold(bytes).validate()
    }

    /// Rejects a zero threshold, which could never cache anything.
    pub fn validate(self) -> Result<Self> {
        if self == Self::Threshold(0) {
            return Err(Error::InvalidConfiguration(
                "cache threshold must be at least one byte".into(),
            ));
        }
        Ok(self)
    }

    pub fn should_cache(self, len: u64) -> bool {
        match self {
            Self::Always => true,
            Self::Threshold(threshold) => len < threshold,
            Self::Never => false,
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::Threshold(DEFAULT_CACHE_THRESHOLD)
    }
}

impl FromStr for CachePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "force" | "always" => Ok(Self::Always),
            "never" | "none" | "off" => Ok(Self::Never),
            other => {
                let bytes = other.parse::<u64>().map_err(|_| {
                    Error::InvalidConfiguration(format!(
                        "cache policy must be `force`, `never` or a byte count, got `{s}`"
                    ))
                })?;
                Self::threshold(bytes)
            }
        }
    }
}

/// Read-only byte access with either an in-memory or a seeking backing.
pub enum ByteSource<R = File> {
    Cached(Vec<u8>),
    Streaming { reader: R, len: u64 },
}

impl ByteSource<File> {
    pub fn open<P>(path: P, policy: CachePolicy) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path)?;
        Self::from_reader(file, policy)
    }
}

impl<R> ByteSource<R>
where
    R: Read + Seek,
{
    pub fn from_reader(mut reader: R, policy: CachePolicy) -> Result<Self> {
        let policy = policy.validate()?;
        let len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;
        if !policy.should_cache(len) {
            info!("Streaming {len} bytes from disk");
            return Ok(Self::Streaming { reader, len });
        }
        let Ok(capacity) = usize::try_from(len) else {
            warn!("File of {len} bytes cannot be cached on this platform, streaming instead");
            return Ok(Self::Streaming { reader, len });
        };
        let mut bytes = Vec::with_capacity(capacity);
        reader.read_to_end(&mut bytes)?;
        if bytes.len() as u64 != len {
            warn!("Expected {len} bytes but cached {}", bytes.len());
        }
        info!("Cached {} bytes in memory", bytes.len());
        Ok(Self::Cached(bytes))
    }

    pub fn len(&self) -> u64 {
        match self {
            Self::Cached(bytes) => bytes.len() as u64,
            Self::Streaming { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Cached(_))
    }

    /// Reads exactly `count` bytes starting at `offset`.
    ///
    /// Cached sources hand out a borrowed slice, streaming sources seek and
    /// read into a fresh buffer.
    pub fn read(&mut self, offset: u64, count: usize) -> Result<Cow<'_, [u8]>> {
        let len = self.len();
        let end = offset
            .checked_add(count as u64)
            .filter(|&end| end <= len)
            .ok_or(Error::OutOfRange { offset, count, len })?;
        match self {
            Self::Cached(bytes) => Ok(Cow::Borrowed(&bytes[offset as usize..end as usize])),
            Self::Streaming { reader, .. } => {
                reader.seek(SeekFrom::Start(offset))?;
                let mut buf = vec![0; count];
                reader.read_exact(&mut buf)?;
                Ok(Cow::Owned(buf))
            }
        }
    }
}
