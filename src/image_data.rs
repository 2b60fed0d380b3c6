use std::io;

use log::debug;
use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::{
    error::{Error, Origin, Result},
    filters::{filter_scanlines, FilterStrategy},
    pixel::PixelDescriptor,
    scanlines::{pack_image, Rows},
};

/// Turns the filtered scanline stream into a zlib (RFC 1950) stream.
pub trait Compressor {
    fn compress(&self, data: &[u8]) -> io::Result<Vec<u8>>;
}

/// zlib-wrapped deflate backed by `miniz_oxide`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZlibCompressor {
    /// 0 (store) to 10 (slowest).
    pub level: u8,
}
impl Default for ZlibCompressor {
    fn default() -> Self {
        Self { level: 9 }
    }
}
impl Compressor for ZlibCompressor {
    fn compress(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        if self.level > 10 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("compression level {} is above 10", self.level),
            ));
        }
        Ok(compress_to_vec_zlib(data, self.level))
    }
}
impl<C: Compressor + ?Sized> Compressor for &C {
    fn compress(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        (**self).compress(data)
    }
}

/// Packs, filters and compresses one image, giving the bytes to spread
/// over its IDAT or fdAT chunks.
pub(crate) fn compress_data(
    rows: &Rows<'_>,
    desc: &PixelDescriptor,
    strategy: FilterStrategy,
    compressor: &dyn Compressor,
    origin: Origin,
) -> Result<Vec<u8>> {
    let packed = pack_image(rows, desc, origin)?;
    let filtered = filter_scanlines(&packed, desc.row_bytes(), desc.filter_width(), strategy);
    let compressed = compressor
        .compress(&filtered)
        .map_err(|source| Error::CompressionError { origin, source })?;
    debug!(
        "Compressed {origin} from {} to {} bytes",
        filtered.len(),
        compressed.len()
    );
    Ok(compressed)
}
