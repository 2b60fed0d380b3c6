use std::borrow::Cow;

use crate::error::{Error, Result};

use super::WritableChunk;

#[allow(non_camel_case_types)]
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct gAMAChunk {
    /// Gamma times 100000.
    pub(crate) gamma: u32,
}
impl gAMAChunk {
    pub(crate) fn from_gamma(gamma: f64) -> Result<Self> {
        let scaled = (gamma * 100_000.0 + 0.5).floor();
        if !gamma.is_finite() || gamma <= 0.0 || scaled < 1.0 || scaled > u32::MAX as f64 {
            return Err(Error::ancillary(
                "gAMA",
                format!("gamma {gamma} cannot be stored"),
            ));
        }
        Ok(Self {
            gamma: scaled as u32,
        })
    }
}
impl WritableChunk for gAMAChunk {
    const HEADER: &'static [u8; 4] = b"gAMA";

    fn payload(&self) -> Cow<'_, [u8]> {
        self.gamma.to_be_bytes().to_vec().into()
    }
}
