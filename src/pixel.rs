use crate::{
    error::{Error, Result},
    utils::div_ceil,
};

/// Largest width or height a PNG header can carry.
const MAX_DIMENSION: usize = (1 << 31) - 1;

/// An integer sample type that can back an image buffer.
pub trait Sample: Copy {
    /// Width of the element type in bits.
    const BITS: u8;

    fn value(self) -> u16;
}
impl Sample for bool {
    const BITS: u8 = 1;
    fn value(self) -> u16 {
        u16::from(self)
    }
}
impl Sample for u8 {
    const BITS: u8 = 8;
    fn value(self) -> u16 {
        u16::from(self)
    }
}
impl Sample for u16 {
    const BITS: u8 = 16;
    fn value(self) -> u16 {
        self
    }
}

/// Dimensions of a pixel array: `(rows, cols, channels)`.
///
/// A two dimensional array is a shape with a single channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
    pub channels: usize,
}
impl Shape {
    pub fn new(rows: usize, cols: usize, channels: usize) -> Self {
        Self {
            rows,
            cols,
            channels,
        }
    }
}

/// Read-only access to the pixels of one image.
///
/// The encoder never mutates a source and only reads samples inside
/// `shape()`.
pub trait PixelSource {
    fn shape(&self) -> Shape;

    /// Width in bits of the underlying element type (1, 8 or 16).
    fn sample_bits(&self) -> u8;

    fn sample(&self, row: usize, col: usize, channel: usize) -> u16;
}
impl<P: PixelSource + ?Sized> PixelSource for &P {
    fn shape(&self) -> Shape {
        (**self).shape()
    }
    fn sample_bits(&self) -> u8 {
        (**self).sample_bits()
    }
    fn sample(&self, row: usize, col: usize, channel: usize) -> u16 {
        (**self).sample(row, col, channel)
    }
}

/// A dense, row-major, channel-interleaved buffer viewed as an image.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    shape: Shape,
}
impl<'a, T: Sample> ImageView<'a, T> {
    pub fn new(data: &'a [T], rows: usize, cols: usize, channels: usize) -> Result<Self> {
        let expected = rows
            .checked_mul(cols)
            .and_then(|pixels| pixels.checked_mul(channels));
        if expected != Some(data.len()) {
            return Err(Error::shape(format!(
                "{} samples cannot form a {rows}x{cols}x{channels} array",
                data.len()
            )));
        }
        Ok(Self {
            data,
            shape: Shape::new(rows, cols, channels),
        })
    }

    pub fn grayscale(data: &'a [T], rows: usize, cols: usize) -> Result<Self> {
        Self::new(data, rows, cols, 1)
    }
}
impl<T: Sample> PixelSource for ImageView<'_, T> {
    fn shape(&self) -> Shape {
        self.shape
    }
    fn sample_bits(&self) -> u8 {
        T::BITS
    }
    fn sample(&self, row: usize, col: usize, channel: usize) -> u16 {
        let index = (row * self.shape.cols + col) * self.shape.channels + channel;
        self.data[index].value()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ColorType {
    #[default]
    Greyscale = 0,
    Truecolor = 2,
    IndexedColor = 3,
    GreyscaleWithAlpha = 4,
    TruecolorWithAlpha = 6,
}
impl ColorType {
    pub(crate) fn from_channels(channels: usize) -> Option<Self> {
        match channels {
            1 => Some(Self::Greyscale),
            2 => Some(Self::GreyscaleWithAlpha),
            3 => Some(Self::Truecolor),
            4 => Some(Self::TruecolorWithAlpha),
            _ => None,
        }
    }

    /// Samples per pixel as stored in the PNG stream.
    pub fn channel_count(&self) -> u8 {
        match self {
            Self::Greyscale => 1,
            Self::IndexedColor => 1,
            Self::GreyscaleWithAlpha => 2,
            Self::Truecolor => 3,
            Self::TruecolorWithAlpha => 4,
        }
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self, Self::GreyscaleWithAlpha | Self::TruecolorWithAlpha)
    }

    fn allowed_bit_depths(&self) -> &'static [u8] {
        match self {
            Self::Greyscale => &[1, 2, 4, 8, 16],
            Self::IndexedColor => &[1, 2, 4, 8],
            _ => &[8, 16],
        }
    }
}

/// A color given in the sample space of the image it applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Gray(u16),
    Rgb(u16, u16, u16),
}
impl Color {
    /// The 8-bit RGB triple this color matches in a palette, if it has one.
    pub(crate) fn palette_rgb(&self) -> Option<[u8; 3]> {
        let (r, g, b) = match *self {
            Color::Gray(v) => (v, v, v),
            Color::Rgb(r, g, b) => (r, g, b),
        };
        Some([
            u8::try_from(r).ok()?,
            u8::try_from(g).ok()?,
            u8::try_from(b).ok()?,
        ])
    }

    pub(crate) fn max_value(&self) -> u16 {
        match *self {
            Color::Gray(v) => v,
            Color::Rgb(r, g, b) => r.max(g).max(b),
        }
    }
}

/// Everything the encoder needs to know about the layout of the pixels it
/// writes. Derived once per encode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelDescriptor {
    pub width: u32,
    pub height: u32,
    /// Channels of the caller's array. An indexed image stores one sample
    /// per pixel whatever this is.
    pub channels: u8,
    pub bit_depth: u8,
    pub color_type: ColorType,
    pub max_sample_value: u16,
}
impl PixelDescriptor {
    pub fn derive(
        shape: Shape,
        sample_bits: u8,
        bit_depth: Option<u8>,
        use_palette: bool,
        transparent: Option<Color>,
    ) -> Result<Self> {
        if shape.rows == 0 || shape.cols == 0 {
            return Err(Error::shape(format!(
                "{}x{} image has no pixels",
                shape.rows, shape.cols
            )));
        }
        if shape.rows > MAX_DIMENSION || shape.cols > MAX_DIMENSION {
            return Err(Error::shape(format!(
                "{}x{} image exceeds the maximum PNG dimension",
                shape.rows, shape.cols
            )));
        }
        let source_color_type = ColorType::from_channels(shape.channels).ok_or_else(|| {
            Error::shape(format!("{} channels per pixel", shape.channels))
        })?;
        if !matches!(sample_bits, 1 | 8 | 16) {
            return Err(Error::shape(format!("{sample_bits}-bit array elements")));
        }

        let (color_type, bit_depth) = if use_palette {
            if sample_bits != 8 {
                return Err(Error::shape(
                    "a palette can only be built from 8-bit samples",
                ));
            }
            (ColorType::IndexedColor, bit_depth.unwrap_or(8))
        } else {
            (source_color_type, bit_depth.unwrap_or(sample_bits))
        };
        if !color_type.allowed_bit_depths().contains(&bit_depth) {
            return Err(Error::shape(format!(
                "bit depth {bit_depth} is not allowed for {color_type:?}"
            )));
        }
        let max_sample_value = ((1u32 << bit_depth) - 1) as u16;

        if let Some(color) = transparent {
            check_transparent(color, color_type, max_sample_value)?;
        }

        Ok(Self {
            width: shape.cols as u32,
            height: shape.rows as u32,
            channels: shape.channels as u8,
            bit_depth,
            color_type,
            max_sample_value,
        })
    }

    pub fn is_indexed(&self) -> bool {
        self.color_type == ColorType::IndexedColor
    }

    /// Bits used by one pixel in the PNG stream.
    pub(crate) fn pixel_width(&self) -> usize {
        self.color_type.channel_count() as usize * self.bit_depth as usize
    }

    /// Bytes per complete pixel, rounded up to one, as used by the filters.
    pub(crate) fn filter_width(&self) -> usize {
        let sample_width = usize::max(self.bit_depth as usize / 8, 1);
        self.color_type.channel_count() as usize * sample_width
    }

    /// Packed bytes of one row, without the filter type byte.
    pub(crate) fn row_bytes(&self) -> usize {
        div_ceil(self.width as usize * self.pixel_width(), 8)
    }
}

fn check_transparent(color: Color, color_type: ColorType, max_value: u16) -> Result<()> {
    match (color_type, color) {
        (ColorType::GreyscaleWithAlpha | ColorType::TruecolorWithAlpha, _) => Err(
            Error::ancillary("tRNS", "images with an alpha channel cannot declare a transparent color"),
        ),
        (ColorType::IndexedColor, color) => match color.palette_rgb() {
            Some(_) => Ok(()),
            None => Err(Error::ancillary(
                "tRNS",
                format!("{color:?} cannot match an 8-bit palette entry"),
            )),
        },
        (ColorType::Greyscale, Color::Rgb(..)) | (ColorType::Truecolor, Color::Gray(_)) => Err(
            Error::ancillary("tRNS", format!("{color:?} does not match {color_type:?}")),
        ),
        (_, color) if color.max_value() > max_value => Err(Error::ancillary(
            "tRNS",
            format!("{color:?} exceeds the maximum sample value {max_value}"),
        )),
        _ => Ok(()),
    }
}
