use crate::{
    error::{Error, Origin, Result},
    pixel::{PixelDescriptor, PixelSource},
};

/// A sample that does not fit the bit depth it is packed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OutOfRange {
    /// Position of the sample in the row.
    pub(crate) position: usize,
    pub(crate) value: u16,
}

/// Packs one row of samples into `out` using PNG's scanline layout.
///
/// Depths below 8 are packed MSB first and the last byte is padded with
/// zero bits. 16-bit samples are written big-endian.
pub(crate) fn pack_scanline(
    samples: &[u16],
    bit_depth: u8,
    out: &mut Vec<u8>,
) -> std::result::Result<(), OutOfRange> {
    let max = ((1u32 << bit_depth) - 1) as u16;
    if let Some(position) = samples.iter().position(|&s| s > max) {
        return Err(OutOfRange {
            position,
            value: samples[position],
        });
    }
    match bit_depth {
        16 => {
            for sample in samples {
                out.extend(sample.to_be_bytes());
            }
        }
        8 => out.extend(samples.iter().map(|&s| s as u8)),
        bits => {
            let mut acc = 0u8;
            let mut acc_bits = 0;
            for &sample in samples {
                acc = (acc << bits) | sample as u8;
                acc_bits += bits;
                if acc_bits == 8 {
                    out.push(acc);
                    acc = 0;
                    acc_bits = 0;
                }
            }
            if acc_bits > 0 {
                out.push(acc << (8 - acc_bits));
            }
        }
    }
    Ok(())
}

/// Where the samples of each row come from.
pub(crate) enum Rows<'a> {
    /// Samples read straight from the caller's image.
    Samples(&'a dyn PixelSource),
    /// Palette indices, one per pixel, row-major.
    Indices(&'a [u8]),
}
impl Rows<'_> {
    fn fill(&self, row: usize, desc: &PixelDescriptor, buf: &mut Vec<u16>) {
        buf.clear();
        let width = desc.width as usize;
        match self {
            Rows::Samples(image) => {
                let channels = desc.channels as usize;
                for col in 0..width {
                    for channel in 0..channels {
                        buf.push(image.sample(row, col, channel));
                    }
                }
            }
            Rows::Indices(indices) => {
                let start = row * width;
                buf.extend(indices[start..start + width].iter().map(|&i| u16::from(i)));
            }
        }
    }
}

/// Packs every row of an image; the result holds `height` rows of
/// `desc.row_bytes()` bytes each, without filter type bytes.
pub(crate) fn pack_image(rows: &Rows<'_>, desc: &PixelDescriptor, origin: Origin) -> Result<Vec<u8>> {
    let height = desc.height as usize;
    let channels = desc.color_type.channel_count() as usize;
    let mut packed = Vec::with_capacity(desc.row_bytes() * height);
    let mut buf = Vec::with_capacity(desc.width as usize * channels);
    for row in 0..height {
        rows.fill(row, desc, &mut buf);
        pack_scanline(&buf, desc.bit_depth, &mut packed).map_err(|err| {
            Error::SampleOutOfRange {
                origin,
                row,
                column: err.position / channels,
                value: err.value,
                bit_depth: desc.bit_depth,
            }
        })?;
    }
    Ok(packed)
}
