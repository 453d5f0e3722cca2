//! Regional codepages used by the game client
//!

use derive_more::derive::Display;
use encoding_rs::Encoding;
use tracing::warn;

use crate::error::{Error, Result};

/// Text encoding of the strings stored in a table file
///
/// The client was localized per region and every region wrote its tables in its own
/// codepage. The files carry no marker telling which one was used, so readers try the
/// candidates in [`TextEncoding::FALLBACK_ORDER`] until one of them decodes the whole file.
#[derive(Debug, Display, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// EUC-KR (Korean), the encoding of the original client
    #[default]
    #[display("EUC-KR")]
    Korean,

    /// Shift_JIS (Japanese)
    #[display("Shift_JIS")]
    Japanese,

    /// GB18030 (Chinese)
    #[display("GB18030")]
    Chinese,
}

impl TextEncoding {
    /// Order in which candidates are tried when loading a file
    pub const FALLBACK_ORDER: [TextEncoding; 3] = [
        TextEncoding::Korean,
        TextEncoding::Japanese,
        TextEncoding::Chinese,
    ];

    fn codec(self) -> &'static Encoding {
        match self {
            TextEncoding::Korean => encoding_rs::EUC_KR,
            TextEncoding::Japanese => encoding_rs::SHIFT_JIS,
            TextEncoding::Chinese => encoding_rs::GB18030,
        }
    }

    /// Decode bytes, failing on the first malformed sequence.
    ///
    /// No replacement characters are ever produced: bytes that do not belong to this
    /// codepage mean the file was written with another one.
    pub fn decode(self, bytes: &[u8]) -> Result<String> {
        self.codec()
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
            .ok_or(Error::DecodeFailure { encoding: self })
    }

    /// Encode text into this codepage.
    ///
    /// Characters the codepage can't represent are replaced by the encoder.
    pub fn encode(self, text: &str) -> Vec<u8> {
        let (bytes, _, unmappable) = self.codec().encode(text);
        if unmappable {
            warn!("{text:?} contains characters that can not be represented in {self}");
        }
        bytes.into_owned()
    }
}
