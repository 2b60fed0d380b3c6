use std::{fmt, io};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Which image of an encode call an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The single image of a static PNG.
    Image,
    /// The separate default image of an APNG.
    DefaultImage,
    /// An animation frame, counted from zero.
    Frame(usize),
}
impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Image => write!(f, "image"),
            Origin::DefaultImage => write!(f, "default image"),
            Origin::Frame(index) => write!(f, "frame {index}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported image shape: {reason}")]
    UnsupportedShape { reason: String },

    #[error("{origin}: sample value {value} at row {row}, column {column} does not fit in {bit_depth} bits")]
    SampleOutOfRange {
        origin: Origin,
        row: usize,
        column: usize,
        value: u16,
        bit_depth: u8,
    },

    #[error("{origin}: palette would need more than {max} colors")]
    TooManyColors { origin: Origin, max: usize },

    #[error("{origin}: compression failed")]
    CompressionError {
        origin: Origin,
        #[source]
        source: io::Error,
    },

    #[error("{chunk} payload of {len} bytes exceeds the maximum chunk length")]
    ChunkTooLarge { chunk: String, len: usize },

    #[error("invalid {chunk} data: {reason}")]
    InvalidAncillaryData { chunk: &'static str, reason: String },

    #[error("invalid {option} option: {reason}")]
    InvalidOption { option: &'static str, reason: String },

    #[error("invalid animation: {reason}")]
    InvalidAnimation { reason: String },

    #[error("failed to write to the output")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn shape(reason: impl Into<String>) -> Self {
        Self::UnsupportedShape {
            reason: reason.into(),
        }
    }

    pub(crate) fn ancillary(chunk: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidAncillaryData {
            chunk,
            reason: reason.into(),
        }
    }

    pub(crate) fn animation(reason: impl Into<String>) -> Self {
        Self::InvalidAnimation {
            reason: reason.into(),
        }
    }
}
