use std::borrow::Cow;

use crate::error::{Error, Result};

use super::{WritableChunk, MAX_CHUNK_LEN};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    #[default]
    Unknown = 0,
    Meter = 1,
}

/// Intended pixel size or aspect ratio, written as a pHYs chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalDimensions {
    pub x_pixels_per_unit: u32,
    pub y_pixels_per_unit: u32,
    pub unit: Unit,
}
impl PhysicalDimensions {
    /// Square pixels at the given resolution in dots per inch.
    pub fn from_dpi(dpi: f64) -> Self {
        let ppm = (dpi / 0.0254).round() as u32;
        Self {
            x_pixels_per_unit: ppm,
            y_pixels_per_unit: ppm,
            unit: Unit::Meter,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let limit = MAX_CHUNK_LEN as u32;
        if self.x_pixels_per_unit > limit || self.y_pixels_per_unit > limit {
            return Err(Error::ancillary(
                "pHYs",
                "pixels per unit must not exceed 2^31 - 1",
            ));
        }
        Ok(())
    }
}
impl WritableChunk for PhysicalDimensions {
    const HEADER: &'static [u8; 4] = b"pHYs";

    fn payload(&self) -> Cow<'_, [u8]> {
        let mut bytes = Vec::with_capacity(9);
        bytes.extend(self.x_pixels_per_unit.to_be_bytes());
        bytes.extend(self.y_pixels_per_unit.to_be_bytes());
        bytes.push(self.unit as u8);
        bytes.into()
    }
}
