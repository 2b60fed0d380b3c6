use std::io::Write;

use log::{debug, info};

use crate::{
    chunks::{
        bkgd::bKGDChunk, gama::gAMAChunk, idat::IDATChunk, iend::IENDChunk, ihdr::IHDRChunk,
        phys::PhysicalDimensions, plte::PLTEChunk, text::TextEntry, time::Timestamp,
        trns::tRNSChunk, ChunkWriter, MAX_CHUNK_LEN,
    },
    error::{Error, Origin, Result},
    filters::FilterStrategy,
    image_data::{compress_data, Compressor, ZlibCompressor},
    palette::{build_palette, Palette},
    pixel::{Color, PixelDescriptor, PixelSource},
    scanlines::Rows,
};

/// Room kept for the sequence number an fdAT chunk puts before its data.
const SEQUENCE_NUMBER_LEN: usize = 4;

/// Options shared by still images and animations.
#[derive(Debug, Clone)]
pub struct PngOptions {
    /// Bit depth to write. Defaults to the width of the array elements, or
    /// 8 for palette images.
    pub bit_depth: Option<u8>,
    /// Store the image as palette indices. Needs `u8` samples. Fails with
    /// [`Error::TooManyColors`] when the image has too many distinct colors.
    pub use_palette: bool,
    /// Color to be shown as fully transparent (tRNS).
    pub transparent: Option<Color>,
    /// Suggested background color (bKGD).
    pub background: Option<Color>,
    /// Image gamma (gAMA), e.g. `1.0 / 2.2`.
    pub gamma: Option<f64>,
    /// Last modification time (tIME).
    pub timestamp: Option<Timestamp>,
    /// Textual metadata, one tEXt chunk per entry.
    pub text: Vec<TextEntry>,
    /// Pixel dimensions (pHYs).
    pub physical_dimensions: Option<PhysicalDimensions>,
    /// Most compressed bytes carried by a single IDAT or fdAT chunk.
    /// `None` puts all of an image's data in one chunk.
    pub max_chunk_len: Option<usize>,
    pub filter: FilterStrategy,
    /// zlib level for the default compressor, 0 to 10.
    pub compression_level: u8,
}
impl Default for PngOptions {
    fn default() -> Self {
        Self {
            bit_depth: None,
            use_palette: false,
            transparent: None,
            background: None,
            gamma: None,
            timestamp: None,
            text: Vec::new(),
            physical_dimensions: None,
            max_chunk_len: None,
            filter: FilterStrategy::None,
            compression_level: 9,
        }
    }
}

/// Writes PNG and APNG files with a given set of options.
#[derive(Debug, Clone)]
pub struct Encoder<C = ZlibCompressor> {
    options: PngOptions,
    compressor: C,
}
impl Encoder<ZlibCompressor> {
    pub fn new(options: PngOptions) -> Self {
        let compressor = ZlibCompressor {
            level: options.compression_level,
        };
        Self {
            options,
            compressor,
        }
    }
}
impl<C: Compressor> Encoder<C> {
    pub fn with_compressor(options: PngOptions, compressor: C) -> Self {
        Self {
            options,
            compressor,
        }
    }

    pub fn options(&self) -> &PngOptions {
        &self.options
    }

    /// Writes `image` as a complete PNG file.
    ///
    /// Chunks are written as soon as they are ready; on error the sink
    /// holds an incomplete file.
    pub fn write_png<W: Write, P: PixelSource>(&self, writer: W, image: &P) -> Result<()> {
        let prepared = self.prepare(vec![(Origin::Image, image as &dyn PixelSource)])?;
        let mut chunks = ChunkWriter::new(writer);
        self.write_header(&mut chunks, &prepared)?;
        let data = self.compress(&prepared, 0)?;
        for piece in self.split(&data) {
            chunks.write(&IDATChunk { data: piece })?;
        }
        chunks.write(&IENDChunk)?;
        chunks.flush()
    }

    /// Derives the descriptor shared by `images` and builds the palette.
    pub(crate) fn prepare<'a>(
        &self,
        images: Vec<(Origin, &'a dyn PixelSource)>,
    ) -> Result<Prepared<'a>> {
        let options = &self.options;
        let (_, first) = images
            .first()
            .copied()
            .ok_or_else(|| Error::animation("no images to encode"))?;
        let (shape, sample_bits) = (first.shape(), first.sample_bits());
        for &(origin, image) in &images[1..] {
            if image.shape() != shape || image.sample_bits() != sample_bits {
                return Err(Error::shape(format!(
                    "{origin} is {:?} with {}-bit samples, expected {shape:?} with {sample_bits}-bit samples",
                    image.shape(),
                    image.sample_bits()
                )));
            }
        }
        if let Some(len) = options.max_chunk_len {
            if len == 0 || len > MAX_CHUNK_LEN - SEQUENCE_NUMBER_LEN {
                return Err(Error::InvalidOption {
                    option: "max_chunk_len",
                    reason: format!("{len} is not between 1 and {}", MAX_CHUNK_LEN - SEQUENCE_NUMBER_LEN),
                });
            }
        }

        let desc = PixelDescriptor::derive(
            shape,
            sample_bits,
            options.bit_depth,
            options.use_palette,
            options.transparent,
        )?;
        info!(
            "Encoding {}x{} {:?} at bit depth {}",
            desc.width, desc.height, desc.color_type, desc.bit_depth
        );
        debug!("{desc:?}");

        let (palette, indexed) = if desc.is_indexed() {
            let background = match options.background {
                Some(color) => Some(color.palette_rgb().ok_or_else(|| {
                    Error::ancillary("bKGD", format!("{color:?} cannot be a palette color"))
                })?),
                None => None,
            };
            let (palette, indexed) = build_palette(&images, desc.bit_depth, background)?;
            (Some(palette), indexed)
        } else {
            (None, vec![])
        };

        Ok(Prepared {
            desc,
            palette,
            images,
            indexed,
        })
    }

    /// Signature, IHDR and every chunk that must precede the image data.
    pub(crate) fn write_header<W: Write>(
        &self,
        chunks: &mut ChunkWriter<W>,
        prepared: &Prepared<'_>,
    ) -> Result<()> {
        let options = &self.options;
        let desc = &prepared.desc;
        let palette = prepared.palette.as_ref();

        chunks.write_signature()?;
        chunks.write(&IHDRChunk::from(desc))?;
        if let Some(timestamp) = &options.timestamp {
            chunks.write(timestamp)?;
        }
        if let Some(gamma) = options.gamma {
            chunks.write(&gAMAChunk::from_gamma(gamma)?)?;
        }
        if let Some(palette) = palette {
            chunks.write(&PLTEChunk { palette })?;
        }
        if let Some(trns) = tRNSChunk::for_image(desc, palette, options.transparent) {
            chunks.write(&trns)?;
        }
        if let Some(color) = options.background {
            chunks.write(&bKGDChunk::for_image(desc, palette, color)?)?;
        }
        if let Some(dims) = &options.physical_dimensions {
            dims.validate()?;
            chunks.write(dims)?;
        }
        for entry in &options.text {
            chunks.write(entry)?;
        }
        Ok(())
    }

    /// Compressed data of the `index`th prepared image.
    pub(crate) fn compress(&self, prepared: &Prepared<'_>, index: usize) -> Result<Vec<u8>> {
        let (origin, image) = prepared.images[index];
        let rows = match prepared.indexed.get(index) {
            Some(indices) => Rows::Indices(indices),
            None => Rows::Samples(image),
        };
        compress_data(
            &rows,
            &prepared.desc,
            self.options.filter,
            &self.compressor,
            origin,
        )
    }

    /// Cuts compressed data into the payloads of consecutive data chunks.
    pub(crate) fn split<'d>(&self, data: &'d [u8]) -> std::slice::Chunks<'d, u8> {
        let limit = self
            .options
            .max_chunk_len
            .unwrap_or(MAX_CHUNK_LEN - SEQUENCE_NUMBER_LEN);
        data.chunks(limit)
    }
}

/// Everything derived from the caller's images before any chunk is written.
pub(crate) struct Prepared<'a> {
    pub(crate) desc: PixelDescriptor,
    pub(crate) palette: Option<Palette>,
    pub(crate) images: Vec<(Origin, &'a dyn PixelSource)>,
    /// Palette indices per image; empty unless the image is indexed.
    pub(crate) indexed: Vec<Vec<u8>>,
}

/// Writes `image` as a PNG file to `writer`.
pub fn write_png<W: Write, P: PixelSource>(
    writer: W,
    image: &P,
    options: &PngOptions,
) -> Result<()> {
    Encoder::new(options.clone()).write_png(writer, image)
}

/// Encodes `image` as an in-memory PNG file.
pub fn encode_png<P: PixelSource>(image: &P, options: &PngOptions) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    write_png(&mut output, image, options)?;
    Ok(output)
}
