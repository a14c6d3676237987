use std::borrow::Cow;

use clap::ValueEnum;

/// Longest file name, in encoded bytes, that we are willing to create.
pub const MAX_FILENAME_BYTES: usize = 250;

/// Byte encoding used for everything written to disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputEncoding {
    #[default]
    #[value(name = "utf-8", alias = "utf8")]
    Utf8,
    #[value(name = "latin-1", alias = "latin1", alias = "iso-8859-1")]
    Latin1,
}

impl OutputEncoding {
    /// Name for the HTML charset declaration.
    pub fn label(&self) -> &'static str {
        match self {
            OutputEncoding::Utf8 => "utf-8",
            OutputEncoding::Latin1 => "iso-8859-1",
        }
    }

    /// Latin-1 has no room for most of Unicode; those characters become `?`.
    pub fn encode<'a>(&self, s: &'a str) -> Cow<'a, [u8]> {
        match self {
            OutputEncoding::Utf8 => Cow::Borrowed(s.as_bytes()),
            OutputEncoding::Latin1 => Cow::Owned(
                s.chars()
                    .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                    .collect(),
            ),
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            OutputEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            OutputEncoding::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
        }
    }

    /// True when `byte` starts a character rather than continuing one.
    pub fn is_lead_byte(&self, byte: u8) -> bool {
        match self {
            OutputEncoding::Utf8 => byte & 0xC0 != 0x80,
            OutputEncoding::Latin1 => true,
        }
    }
}

/// Cut `s` so that its encoded form is at most `max_bytes` long without
/// splitting a character. From offset `max_bytes` we walk back to the
/// nearest lead byte and cut there.
pub fn truncate_encoded(s: &str, max_bytes: usize, encoding: OutputEncoding) -> String {
    let bytes = encoding.encode(s);
    if bytes.len() <= max_bytes {
        return encoding.decode(&bytes);
    }

    let mut cut = max_bytes;
    while cut > 0 && !encoding.is_lead_byte(bytes[cut]) {
        cut -= 1;
    }

    encoding.decode(&bytes[..cut])
}
