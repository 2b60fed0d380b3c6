use std::borrow::Cow;

use crate::{
    palette::Palette,
    pixel::{Color, ColorType, PixelDescriptor},
};

use super::WritableChunk;

#[allow(non_camel_case_types)]
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum tRNSChunk {
    Greyscale(u16),
    Truecolor(u16, u16, u16),
    /// Alpha of the leading palette entries.
    Palette(Vec<u8>),
}
impl tRNSChunk {
    /// The transparency chunk an image needs, if any. `transparent` has
    /// already been checked against the descriptor.
    pub(crate) fn for_image(
        desc: &PixelDescriptor,
        palette: Option<&Palette>,
        transparent: Option<Color>,
    ) -> Option<Self> {
        match (desc.color_type, transparent) {
            (ColorType::IndexedColor, transparent) => palette?
                .alpha_bytes(transparent.and_then(|c| c.palette_rgb()))
                .map(Self::Palette),
            (_, Some(Color::Gray(v))) => Some(Self::Greyscale(v)),
            (_, Some(Color::Rgb(r, g, b))) => Some(Self::Truecolor(r, g, b)),
            (_, None) => None,
        }
    }
}
impl WritableChunk for tRNSChunk {
    const HEADER: &'static [u8; 4] = b"tRNS";

    fn payload(&self) -> Cow<'_, [u8]> {
        match self {
            Self::Greyscale(v) => v.to_be_bytes().to_vec().into(),
            Self::Truecolor(r, g, b) => [r, g, b].iter().flat_map(|v| v.to_be_bytes()).collect(),
            Self::Palette(alphas) => Cow::Borrowed(alphas.as_slice()),
        }
    }
}
