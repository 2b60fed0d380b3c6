use std::borrow::Cow;

use crate::apng::FrameControl;

use super::WritableChunk;

#[allow(non_camel_case_types)]
#[derive(Debug)]
pub(crate) struct fcTLChunk {
    pub(crate) sequence_number: u32,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) x_offset: u32,
    pub(crate) y_offset: u32,
    pub(crate) control: FrameControl,
}
impl WritableChunk for fcTLChunk {
    const HEADER: &'static [u8; 4] = b"fcTL";

    fn payload(&self) -> Cow<'_, [u8]> {
        let mut bytes = Vec::with_capacity(26);
        for field in [
            self.sequence_number,
            self.width,
            self.height,
            self.x_offset,
            self.y_offset,
        ] {
            bytes.extend(field.to_be_bytes());
        }
        bytes.extend(self.control.delay.numerator.to_be_bytes());
        bytes.extend(self.control.delay.denominator.to_be_bytes());
        bytes.push(self.control.dispose_op as u8);
        bytes.push(self.control.blend_op as u8);
        bytes.into()
    }
}
