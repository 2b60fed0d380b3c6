const CRC_TABLE: [u32; 256] = {
    let mut table = [0; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut i = 0;
        while i < 8 {
            if c & 1 != 0 {
                c = 0xedb88320 ^ (c >> 1);
            } else {
                c >>= 1;
            }
            i += 1;
        }
        table[n as usize] = c;
        n += 1;
    }
    table
};

/// Running CRC-32 (ISO 3309) over the type and data of a chunk.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Crc32(u32);
impl Crc32 {
    pub(crate) fn new() -> Self {
        Self(0xffffffff)
    }

    pub(crate) fn update(&mut self, data: &[u8]) {
        for &b in data {
            let index = (self.0 ^ b as u32) & 0xff;
            self.0 = CRC_TABLE[index as usize] ^ (self.0 >> 8);
        }
    }

    pub(crate) fn finalize(self) -> u32 {
        self.0 ^ 0xffffffff
    }
}

pub(crate) fn calculate_crc(chunk_type: &[u8; 4], payload: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(chunk_type);
    crc.update(payload);
    crc.finalize()
}
