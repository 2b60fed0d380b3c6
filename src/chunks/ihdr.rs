use std::borrow::Cow;

use crate::pixel::{ColorType, PixelDescriptor};

use super::WritableChunk;

#[derive(Debug, Default)]
pub(crate) struct IHDRChunk {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) bit_depth: u8,
    pub(crate) color_type: ColorType,
    pub(crate) compression_method: u8,
    pub(crate) filter_method: u8,
    pub(crate) interlace_method: u8,
}
impl From<&PixelDescriptor> for IHDRChunk {
    fn from(desc: &PixelDescriptor) -> Self {
        Self {
            width: desc.width,
            height: desc.height,
            bit_depth: desc.bit_depth,
            color_type: desc.color_type,
            ..Default::default()
        }
    }
}
impl WritableChunk for IHDRChunk {
    const HEADER: &'static [u8; 4] = b"IHDR";

    fn payload(&self) -> Cow<'_, [u8]> {
        let mut bytes = Vec::with_capacity(13);
        bytes.extend(self.width.to_be_bytes());
        bytes.extend(self.height.to_be_bytes());
        bytes.extend([
            self.bit_depth,
            self.color_type as u8,
            self.compression_method,
            self.filter_method,
            self.interlace_method,
        ]);
        bytes.into()
    }
}
