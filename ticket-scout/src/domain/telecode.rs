//! Telegraph codes, the station identifiers used on the wire.

use std::fmt;

/// Error returned when text does not form a telecode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTelecode {
    /// Input was not exactly three bytes long.
    #[error("telecode must be three letters, got {0} bytes")]
    Length(usize),
    /// Input contained a byte outside A-Z.
    #[error("telecode must be uppercase ASCII letters")]
    Charset,
}

/// A station telegraph code (电报码).
///
/// 12306 identifies stations on the wire by a three-letter uppercase
/// code rather than by display name: `VNP` is 北京南, `AOH` is 上海虹桥.
/// The station list feed publishes the name-to-code mapping, and both
/// the availability and route endpoints take codes as query parameters.
/// Construction validates the shape, so a `Telecode` can be embedded in
/// a URL without further checks.
///
/// Codes hash and order like their text form.
///
/// # Examples
///
/// ```
/// use ticket_scout::domain::Telecode;
///
/// let changsha_south = Telecode::parse("CWQ")?;
/// assert_eq!(changsha_south.to_string(), "CWQ");
///
/// // Display names and lowercase never reach the wire.
/// assert!(Telecode::parse("长沙南").is_err());
/// assert!(Telecode::parse("cwq").is_err());
/// # Ok::<(), ticket_scout::domain::InvalidTelecode>(())
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Telecode([u8; 3]);

impl Telecode {
    /// Parse a code as the feeds transmit it: exactly three bytes, each
    /// an uppercase ASCII letter.
    pub fn parse(s: &str) -> Result<Self, InvalidTelecode> {
        let bytes: [u8; 3] = s
            .as_bytes()
            .try_into()
            .map_err(|_| InvalidTelecode::Length(s.len()))?;
        if bytes.iter().any(|b| !b.is_ascii_uppercase()) {
            return Err(InvalidTelecode::Charset);
        }
        Ok(Self(bytes))
    }

    /// View the code as text, e.g. for splicing into a query URL.
    pub fn as_str(&self) -> &str {
        // Construction admits ASCII uppercase bytes only, so the UTF-8
        // check cannot fail.
        std::str::from_utf8(&self.0).unwrap_or("")
    }
}

impl fmt::Debug for Telecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Telecode({self})")
    }
}

impl fmt::Display for Telecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        /// Three uppercase ASCII letters assembled byte by byte.
        fn wire_code()(bytes in proptest::array::uniform3(b'A'..=b'Z')) -> String {
            bytes.iter().map(|&b| b as char).collect()
        }
    }

    proptest! {
        #[test]
        fn round_trips_through_text(s in wire_code()) {
            let code = Telecode::parse(&s).unwrap();
            prop_assert_eq!(code.as_str(), s.as_str());
            prop_assert_eq!(code.to_string(), s);
        }

        #[test]
        fn ordering_matches_text_ordering(a in wire_code(), b in wire_code()) {
            let ca = Telecode::parse(&a).unwrap();
            let cb = Telecode::parse(&b).unwrap();
            prop_assert_eq!(ca.cmp(&cb), a.cmp(&b));
        }

        #[test]
        fn other_lengths_are_length_errors(s in "[A-Z]{0,2}|[A-Z]{4,8}") {
            prop_assert_eq!(Telecode::parse(&s), Err(InvalidTelecode::Length(s.len())));
        }

        #[test]
        fn stray_bytes_are_charset_errors(
            s in "[ -~]{3}".prop_filter("needs a non-letter", |s| {
                s.bytes().any(|b| !b.is_ascii_uppercase())
            })
        ) {
            prop_assert_eq!(Telecode::parse(&s), Err(InvalidTelecode::Charset));
        }
    }
}
