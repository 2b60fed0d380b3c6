use std::borrow::Cow;

use crate::{
    error::{Error, Result},
    palette::Palette,
    pixel::{Color, ColorType, PixelDescriptor},
};

use super::WritableChunk;

#[allow(non_camel_case_types)]
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum bKGDChunk {
    Greyscale(u16),
    Truecolor(u16, u16, u16),
    PaletteIndex(u8),
}
impl bKGDChunk {
    pub(crate) fn for_image(
        desc: &PixelDescriptor,
        palette: Option<&Palette>,
        color: Color,
    ) -> Result<Self> {
        let chunk = match (desc.color_type, palette) {
            (ColorType::IndexedColor, Some(palette)) => color
                .palette_rgb()
                .and_then(|rgb| palette.index_of_rgb(rgb))
                .map(Self::PaletteIndex),
            (ColorType::Greyscale | ColorType::GreyscaleWithAlpha, _) => match color {
                Color::Gray(v) if v <= desc.max_sample_value => Some(Self::Greyscale(v)),
                _ => None,
            },
            (ColorType::Truecolor | ColorType::TruecolorWithAlpha, _) => match color {
                Color::Rgb(r, g, b) if color.max_value() <= desc.max_sample_value => {
                    Some(Self::Truecolor(r, g, b))
                }
                _ => None,
            },
            (ColorType::IndexedColor, None) => None,
        };
        chunk.ok_or_else(|| {
            Error::ancillary(
                "bKGD",
                format!(
                    "{color:?} is not a valid {:?} background at bit depth {}",
                    desc.color_type, desc.bit_depth
                ),
            )
        })
    }
}
impl WritableChunk for bKGDChunk {
    const HEADER: &'static [u8; 4] = b"bKGD";

    fn payload(&self) -> Cow<'_, [u8]> {
        match self {
            Self::Greyscale(v) => v.to_be_bytes().to_vec().into(),
            Self::Truecolor(r, g, b) => [r, g, b].iter().flat_map(|v| v.to_be_bytes()).collect(),
            Self::PaletteIndex(index) => vec![*index].into(),
        }
    }
}
