use std::borrow::Cow;

use super::WritableChunk;

#[allow(non_camel_case_types)]
#[derive(Debug)]
pub(crate) struct acTLChunk {
    pub(crate) num_frames: u32,
    /// 0 loops forever.
    pub(crate) num_plays: u32,
}
impl WritableChunk for acTLChunk {
    const HEADER: &'static [u8; 4] = b"acTL";

    fn payload(&self) -> Cow<'_, [u8]> {
        let mut bytes = self.num_frames.to_be_bytes().to_vec();
        bytes.extend(self.num_plays.to_be_bytes());
        bytes.into()
    }
}
