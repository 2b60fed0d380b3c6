use std::borrow::Cow;

use super::WritableChunk;

pub(crate) struct IENDChunk;
impl WritableChunk for IENDChunk {
    const HEADER: &'static [u8; 4] = b"IEND";

    fn payload(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(&[])
    }
}
