use std::borrow::Cow;

use super::WritableChunk;

#[derive(Debug)]
pub(crate) struct IDATChunk<'a> {
    pub(crate) data: &'a [u8],
}
impl WritableChunk for IDATChunk<'_> {
    const HEADER: &'static [u8; 4] = b"IDAT";

    fn payload(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.data)
    }
}
