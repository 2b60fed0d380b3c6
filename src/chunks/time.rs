use std::borrow::Cow;

use ::time::{OffsetDateTime, UtcOffset};

use crate::error::{Error, Result};

use super::WritableChunk;

/// Time of last modification, stored in a tIME chunk. Always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}
impl Timestamp {
    /// `second` may be 60 to allow for leap seconds.
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Result<Self> {
        let fields = [
            ("month", month, 1..=12),
            ("day", day, 1..=31),
            ("hour", hour, 0..=23),
            ("minute", minute, 0..=59),
            ("second", second, 0..=60),
        ];
        for (name, value, range) in fields {
            if !range.contains(&value) {
                return Err(Error::ancillary(
                    "tIME",
                    format!("{name} {value} is outside {range:?}"),
                ));
            }
        }
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    pub fn now() -> Result<Self> {
        OffsetDateTime::now_utc().try_into()
    }

    pub fn year(&self) -> u16 {
        self.year
    }
}
impl TryFrom<OffsetDateTime> for Timestamp {
    type Error = Error;

    fn try_from(value: OffsetDateTime) -> Result<Self> {
        let utc = value.to_offset(UtcOffset::UTC);
        let year = u16::try_from(utc.year())
            .map_err(|_| Error::ancillary("tIME", format!("year {} is negative", utc.year())))?;
        Self::new(
            year,
            u8::from(utc.month()),
            utc.day(),
            utc.hour(),
            utc.minute(),
            utc.second(),
        )
    }
}
impl WritableChunk for Timestamp {
    const HEADER: &'static [u8; 4] = b"tIME";

    fn payload(&self) -> Cow<'_, [u8]> {
        let mut bytes = self.year.to_be_bytes().to_vec();
        bytes.extend([self.month, self.day, self.hour, self.minute, self.second]);
        bytes.into()
    }
}
