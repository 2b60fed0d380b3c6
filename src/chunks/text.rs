use std::borrow::Cow;

use crate::error::{Error, Result};

use super::WritableChunk;

const MAX_KEYWORD_LEN: usize = 79;

/// A Latin-1 keyword/text pair, written as a tEXt chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEntry {
    keyword: Vec<u8>,
    text: Vec<u8>,
}
impl TextEntry {
    pub fn new(keyword: &str, text: &str) -> Result<Self> {
        let keyword = latin1(keyword, "keyword")?;
        let text = latin1(text, "text")?;
        if keyword.is_empty() || keyword.len() > MAX_KEYWORD_LEN {
            return Err(Error::ancillary(
                "tEXt",
                format!("keyword must be 1 to {MAX_KEYWORD_LEN} bytes long"),
            ));
        }
        if !keyword
            .iter()
            .all(|&b| matches!(b, 32..=126 | 161..=255))
        {
            return Err(Error::ancillary(
                "tEXt",
                "keyword may only hold printable Latin-1 characters",
            ));
        }
        if keyword.first() == Some(&b' ')
            || keyword.last() == Some(&b' ')
            || keyword.windows(2).any(|pair| pair == b"  ")
        {
            return Err(Error::ancillary(
                "tEXt",
                "keyword has leading, trailing or consecutive spaces",
            ));
        }
        if text.contains(&0) {
            return Err(Error::ancillary("tEXt", "text contains a NUL byte"));
        }
        Ok(Self { keyword, text })
    }
}

fn latin1(value: &str, what: &str) -> Result<Vec<u8>> {
    value
        .chars()
        .map(|c| u8::try_from(c).ok())
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(|| Error::ancillary("tEXt", format!("{what} {value:?} is not Latin-1")))
}

impl WritableChunk for TextEntry {
    const HEADER: &'static [u8; 4] = b"tEXt";

    fn payload(&self) -> Cow<'_, [u8]> {
        let mut bytes = Vec::with_capacity(self.keyword.len() + 1 + self.text.len());
        bytes.extend(&self.keyword);
        bytes.push(0);
        bytes.extend(&self.text);
        bytes.into()
    }
}
