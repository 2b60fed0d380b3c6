use std::borrow::Cow;

use super::WritableChunk;

/// Frame data: like IDAT, prefixed by its sequence number.
#[allow(non_camel_case_types)]
#[derive(Debug)]
pub(crate) struct fdATChunk<'a> {
    pub(crate) sequence_number: u32,
    pub(crate) data: &'a [u8],
}
impl WritableChunk for fdATChunk<'_> {
    const HEADER: &'static [u8; 4] = b"fdAT";

    fn payload(&self) -> Cow<'_, [u8]> {
        let mut bytes = Vec::with_capacity(4 + self.data.len());
        bytes.extend(self.sequence_number.to_be_bytes());
        bytes.extend(self.data);
        bytes.into()
    }
}
