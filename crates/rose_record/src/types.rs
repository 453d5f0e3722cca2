//! Base types shared by the table formats.

use bon::Builder;
use std::fmt::Display;
use tracing::warn;

use crate::encoding::TextEncoding;
use crate::error::{Error, Result};

/// Width of the length that precedes every string
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LengthPrefix {
    /// 7 bits per byte, least significant group first, high bit set while more bytes follow.
    /// At most 4 bytes.
    VarInt,

    /// A little endian `u16`
    U16,
}

impl LengthPrefix {
    /// Largest byte length the prefix can express
    pub const fn max_len(self) -> usize {
        match self {
            LengthPrefix::VarInt => (1 << 28) - 1,
            LengthPrefix::U16 => u16::MAX as usize,
        }
    }
}

/// Options for how a table file should be loaded
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct LoadOptions {
    /// Encodings to try, in order, until one decodes the whole file
    #[builder(default = TextEncoding::FALLBACK_ORDER.to_vec())]
    pub encodings: Vec<TextEncoding>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions::builder().build()
    }
}

/// Outcome of a read that is allowed to degrade to a fallback value
///
/// Corrupted offsets and truncated records only damage the record they belong to, so
/// readers substitute a fallback and continue. The reason is kept so callers and tests can
/// tell a real value from a substituted one.
#[derive(Debug)]
pub enum Recovered<T, E = Error> {
    /// The value was read successfully
    Value(T),

    /// The read failed and `value` was substituted
    Fallback {
        /// Substituted value
        value: T,
        /// Why the read failed
        reason: E,
    },
}

impl<T> Recovered<T, Error> {
    /// Turn a read result into a [`Recovered`].
    ///
    /// Only local damage ([`Error::is_recoverable`]) is replaced with `fallback`; every
    /// other error is returned so the caller can abandon the parse.
    pub fn recover(result: Result<T>, fallback: T) -> Result<Recovered<T>> {
        match result {
            Ok(value) => Ok(Recovered::Value(value)),
            Err(reason) if reason.is_recoverable() => Ok(Recovered::Fallback {
                value: fallback,
                reason,
            }),
            Err(e) => Err(e),
        }
    }
}

impl<T, E: Display> Recovered<T, E> {
    /// Whether the value was substituted
    pub fn is_fallback(&self) -> bool {
        matches!(self, Recovered::Fallback { .. })
    }

    /// The reason a fallback was used, if any
    pub fn reason(&self) -> Option<&E> {
        match self {
            Recovered::Value(_) => None,
            Recovered::Fallback { reason, .. } => Some(reason),
        }
    }

    /// Unwrap the value, whether read or substituted
    pub fn into_value(self) -> T {
        match self {
            Recovered::Value(value) | Recovered::Fallback { value, .. } => value,
        }
    }

    /// Unwrap the value, logging a warning naming `what` if it was substituted
    pub fn logged(self, what: impl Display) -> T {
        if let Recovered::Fallback { reason, .. } = &self {
            warn!(%reason, "using fallback for {what}");
        }
        self.into_value()
    }
}

#[cfg(test)]
mod test {
    use tracing_test::traced_test;

    use crate::encoding::TextEncoding;
    use crate::error::Error;
    use crate::types::{LengthPrefix, LoadOptions, Recovered};

    #[traced_test]
    #[test]
    fn truncation_falls_back() {
        let recovered = Recovered::recover(
            Err(Error::TruncatedRecord {
                needed: 4,
                remaining: 2,
            }),
            0u32,
        )
        .unwrap();

        assert!(recovered.is_fallback());
        assert_eq!(recovered.logged("language offset 2"), 0);
        assert!(logs_contain("using fallback for language offset 2"));
    }

    #[test]
    fn broken_prefix_falls_back() {
        let recovered =
            Recovered::recover(Err(Error::InvalidLengthPrefix), String::from("fallback"))
                .unwrap();

        assert!(matches!(recovered.reason(), Some(Error::InvalidLengthPrefix)));
        assert_eq!(recovered.into_value(), "fallback");
    }

    #[test]
    fn decode_failure_is_not_recovered() {
        let result = Recovered::recover(
            Err(Error::DecodeFailure {
                encoding: Default::default(),
            }),
            String::new(),
        );

        assert!(matches!(result, Err(Error::DecodeFailure { .. })));
    }

    #[test]
    fn value_passes_through() {
        let recovered = Recovered::recover(Ok(7u32), 0).unwrap();
        assert!(!recovered.is_fallback());
        assert!(recovered.reason().is_none());
        assert_eq!(recovered.into_value(), 7);
    }

    #[test]
    fn default_options_try_every_encoding() {
        assert_eq!(
            LoadOptions::default().encodings,
            vec![
                TextEncoding::Korean,
                TextEncoding::Japanese,
                TextEncoding::Chinese
            ]
        );

        let options = LoadOptions::builder()
            .encodings(vec![TextEncoding::Japanese])
            .build();
        assert_eq!(options.encodings, vec![TextEncoding::Japanese]);
    }

    #[test]
    fn prefix_limits() {
        assert_eq!(LengthPrefix::U16.max_len(), 65535);
        assert_eq!(LengthPrefix::VarInt.max_len(), 268_435_455);
    }
}
