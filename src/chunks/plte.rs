use std::borrow::Cow;

use crate::palette::Palette;

use super::WritableChunk;

#[derive(Debug)]
pub(crate) struct PLTEChunk<'a> {
    pub(crate) palette: &'a Palette,
}
impl WritableChunk for PLTEChunk<'_> {
    const HEADER: &'static [u8; 4] = b"PLTE";

    fn payload(&self) -> Cow<'_, [u8]> {
        self.palette.rgb_bytes().into()
    }
}
