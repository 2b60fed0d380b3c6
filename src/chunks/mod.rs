use std::{borrow::Cow, io::Write};

use log::trace;

use crate::error::{Error, Result};

mod crc;
pub(crate) mod actl;
pub(crate) mod bkgd;
pub(crate) mod fctl;
pub(crate) mod fdat;
pub(crate) mod gama;
pub(crate) mod idat;
pub(crate) mod iend;
pub(crate) mod ihdr;
pub(crate) mod phys;
pub(crate) mod plte;
pub(crate) mod text;
pub(crate) mod time;
pub(crate) mod trns;

pub(crate) const SIGNATURE: &[u8; 8] = b"\x89PNG\x0d\x0a\x1a\x0a";

/// Largest payload the 31-bit length field of a chunk can describe.
pub const MAX_CHUNK_LEN: usize = (1 << 31) - 1;

pub(crate) trait WritableChunk {
    const HEADER: &'static [u8; 4];

    /// Borrowed when the chunk already holds its bytes.
    fn payload(&self) -> Cow<'_, [u8]>;
}

/// Appends framed chunks to a byte sink, strictly in file order.
///
/// Nothing already written is revisited, so a failed encode leaves a
/// truncated stream that callers must discard.
pub struct ChunkWriter<W> {
    sink: W,
    chunks_written: usize,
}
impl<W: Write> ChunkWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            chunks_written: 0,
        }
    }

    pub fn write_signature(&mut self) -> Result<()> {
        self.sink.write_all(SIGNATURE)?;
        Ok(())
    }

    /// Writes `[length][type][payload][CRC-32 of type and payload]`.
    ///
    /// The type code is not checked against PNG's naming rules.
    pub fn write_chunk(&mut self, chunk_type: &[u8; 4], payload: &[u8]) -> Result<()> {
        if payload.len() > MAX_CHUNK_LEN {
            return Err(Error::ChunkTooLarge {
                chunk: String::from_utf8_lossy(chunk_type).into_owned(),
                len: payload.len(),
            });
        }
        let crc = crc::calculate_crc(chunk_type, payload);
        self.sink.write_all(&(payload.len() as u32).to_be_bytes())?;
        self.sink.write_all(chunk_type)?;
        self.sink.write_all(payload)?;
        self.sink.write_all(&crc.to_be_bytes())?;
        self.chunks_written += 1;
        trace!(
            "Wrote {} chunk with {} bytes of data",
            String::from_utf8_lossy(chunk_type),
            payload.len()
        );
        Ok(())
    }

    pub(crate) fn write<C: WritableChunk>(&mut self, chunk: &C) -> Result<()> {
        self.write_chunk(C::HEADER, &chunk.payload())
    }

    pub fn chunks_written(&self) -> usize {
        self.chunks_written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
