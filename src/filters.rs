/// How a filter type is chosen for each scanline.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FilterStrategy {
    /// Every row is stored unfiltered.
    #[default]
    None,
    Sub,
    Up,
    Average,
    Paeth,
    /// Per row, the filter whose output has the smallest sum of absolute
    /// values (bytes read as signed).
    Adaptive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Filter {
    None = 0,
    Sub = 1,
    Up = 2,
    Average = 3,
    Paeth = 4,
}
impl Filter {
    const ALL: [Filter; 5] = [
        Filter::None,
        Filter::Sub,
        Filter::Up,
        Filter::Average,
        Filter::Paeth,
    ];

    /// `a` is the byte one pixel to the left, `b` the byte above and `c`
    /// the byte above `a`.
    pub(crate) fn filter(&self, x: u8, a: u8, b: u8, c: u8) -> u8 {
        x.wrapping_sub(self.predict(a, b, c))
    }

    #[cfg(test)]
    pub(crate) fn reconstruct(&self, x: u8, a: u8, b: u8, c: u8) -> u8 {
        x.wrapping_add(self.predict(a, b, c))
    }

    fn predict(&self, a: u8, b: u8, c: u8) -> u8 {
        match self {
            Filter::None => 0,
            Filter::Sub => a,
            Filter::Up => b,
            Filter::Average => ((a as u16 + b as u16) / 2) as u8,
            Filter::Paeth => paeth(a, b, c),
        }
    }
}

fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let p = a as i16 + b as i16 - c as i16;
    let pa = (p - a as i16).abs();
    let pb = (p - b as i16).abs();
    let pc = (p - c as i16).abs();
    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

fn apply(filter: Filter, current: &[u8], previous: &[u8], bpp: usize, out: &mut Vec<u8>) {
    out.push(filter as u8);
    for (i, &x) in current.iter().enumerate() {
        let (a, c) = if i >= bpp {
            (current[i - bpp], previous[i - bpp])
        } else {
            (0, 0)
        };
        out.push(filter.filter(x, a, previous[i], c));
    }
}

fn score(filtered: &[u8]) -> u64 {
    filtered[1..]
        .iter()
        .map(|&byte| (byte as i8).unsigned_abs() as u64)
        .sum()
}

/// Appends the filter type byte and the filtered bytes of `current`.
///
/// `previous` is the packed row above, all zeros for the first row, and
/// `bpp` the filter width in bytes.
pub(crate) fn filter_scanline(
    strategy: FilterStrategy,
    current: &[u8],
    previous: &[u8],
    bpp: usize,
    out: &mut Vec<u8>,
) {
    let filter = match strategy {
        FilterStrategy::None => Filter::None,
        FilterStrategy::Sub => Filter::Sub,
        FilterStrategy::Up => Filter::Up,
        FilterStrategy::Average => Filter::Average,
        FilterStrategy::Paeth => Filter::Paeth,
        FilterStrategy::Adaptive => {
            let mut best: Option<(u64, Vec<u8>)> = None;
            for filter in Filter::ALL {
                let mut candidate = Vec::with_capacity(current.len() + 1);
                apply(filter, current, previous, bpp, &mut candidate);
                let candidate_score = score(&candidate);
                if best.as_ref().map_or(true, |(s, _)| candidate_score < *s) {
                    best = Some((candidate_score, candidate));
                }
            }
            if let Some((_, bytes)) = best {
                out.extend(bytes);
            }
            return;
        }
    };
    apply(filter, current, previous, bpp, out);
}

/// Filters every row of a packed image into one stream.
pub(crate) fn filter_scanlines(
    packed: &[u8],
    row_bytes: usize,
    bpp: usize,
    strategy: FilterStrategy,
) -> Vec<u8> {
    let rows = if row_bytes == 0 { 0 } else { packed.len() / row_bytes };
    let mut out = Vec::with_capacity(packed.len() + rows);
    let zero_row = vec![0; row_bytes];
    let mut previous: &[u8] = &zero_row;
    for current in packed.chunks(row_bytes.max(1)) {
        filter_scanline(strategy, current, previous, bpp, &mut out);
        previous = current;
    }
    out
}
