use std::collections::HashMap;

use log::debug;

use crate::{
    error::{Error, Origin, Result},
    pixel::PixelSource,
};

pub(crate) const MAX_PALETTE_LEN: usize = 256;

/// Grows a palette in first-seen order.
#[derive(Debug, Clone)]
pub(crate) struct PaletteBuilder {
    entries: Vec<[u8; 4]>,
    lookup: HashMap<[u8; 4], u8>,
    limit: usize,
}
impl PaletteBuilder {
    /// `bit_depth` bounds the palette at `2^bit_depth` entries (and never more than 256).
    pub(crate) fn new(bit_depth: u8) -> Self {
        Self {
            entries: Vec::new(),
            lookup: HashMap::new(),
            limit: usize::min(1 << bit_depth, MAX_PALETTE_LEN),
        }
    }

    pub(crate) fn limit(&self) -> usize {
        self.limit
    }

    /// Index of `color`, appending it when it has not been seen yet.
    /// `None` when the palette is full.
    pub(crate) fn insert(&mut self, color: [u8; 4]) -> Option<u8> {
        if let Some(&index) = self.lookup.get(&color) {
            return Some(index);
        }
        if self.entries.len() == self.limit {
            return None;
        }
        let index = self.entries.len() as u8;
        self.entries.push(color);
        self.lookup.insert(color, index);
        Some(index)
    }

    pub(crate) fn finish(self) -> Palette {
        Palette {
            entries: self.entries,
        }
    }
}

/// A frozen color table; entries are RGBA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Palette {
    entries: Vec<[u8; 4]>,
}
impl Palette {
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn index_of_rgb(&self, rgb: [u8; 3]) -> Option<u8> {
        self.entries
            .iter()
            .position(|entry| entry[..3] == rgb)
            .map(|index| index as u8)
    }

    pub(crate) fn rgb_bytes(&self) -> Vec<u8> {
        self.entries.iter().flat_map(|e| [e[0], e[1], e[2]]).collect()
    }

    /// tRNS alphas, cut after the last entry that is not opaque.
    ///
    /// Entries matching `transparent` are made fully transparent. Returns
    /// `None` when every entry is opaque.
    pub(crate) fn alpha_bytes(&self, transparent: Option<[u8; 3]>) -> Option<Vec<u8>> {
        let mut alphas: Vec<u8> = self
            .entries
            .iter()
            .map(|entry| match transparent {
                Some(rgb) if entry[..3] == rgb => 0,
                _ => entry[3],
            })
            .collect();
        let last = alphas.iter().rposition(|&alpha| alpha != u8::MAX)?;
        alphas.truncate(last + 1);
        Some(alphas)
    }
}

fn pixel_color(image: &dyn PixelSource, row: usize, col: usize) -> [u8; 4] {
    let channels = image.shape().channels;
    let sample = |channel| image.sample(row, col, channel) as u8;
    match channels {
        1 => {
            let v = sample(0);
            [v, v, v, u8::MAX]
        }
        2 => {
            let v = sample(0);
            [v, v, v, sample(1)]
        }
        3 => [sample(0), sample(1), sample(2), u8::MAX],
        _ => [sample(0), sample(1), sample(2), sample(3)],
    }
}

/// Builds one palette shared by every image and maps each image to indices.
///
/// Pixels are visited row-major, image by image, so the same input always
/// gives the same palette order. `background` is appended after the pixels
/// when no pixel uses it.
pub(crate) fn build_palette(
    images: &[(Origin, &dyn PixelSource)],
    bit_depth: u8,
    background: Option<[u8; 3]>,
) -> Result<(Palette, Vec<Vec<u8>>)> {
    let mut builder = PaletteBuilder::new(bit_depth);
    let mut indexed = Vec::with_capacity(images.len());
    for &(origin, image) in images {
        let shape = image.shape();
        let mut indices = Vec::with_capacity(shape.rows * shape.cols);
        for row in 0..shape.rows {
            for col in 0..shape.cols {
                let index = builder
                    .insert(pixel_color(image, row, col))
                    .ok_or_else(|| Error::TooManyColors {
                        origin,
                        max: builder.limit(),
                    })?;
                indices.push(index);
            }
        }
        indexed.push(indices);
    }
    if let Some([r, g, b]) = background {
        let present = builder.entries.iter().any(|entry| entry[..3] == [r, g, b]);
        if !present && builder.insert([r, g, b, u8::MAX]).is_none() {
            return Err(Error::ancillary(
                "bKGD",
                "no room left in the palette for the background color",
            ));
        }
    }
    let palette = builder.finish();
    debug!("Built a palette of {} colors", palette.len());
    Ok((palette, indexed))
}
