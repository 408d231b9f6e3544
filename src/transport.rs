//! Text-safe transport encoding for envelopes.
//!
//! Envelopes are turned into a single line of standard-alphabet, padded Base64. No line breaks
//! are ever inserted, so the result can be dropped into a header or cookie as-is. Callers that
//! need the URL-safe alphabet have to translate it themselves.

use crate::error::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Encode raw envelope bytes as Base64 text.
pub fn to_text(buf: &[u8]) -> String {
    STANDARD.encode(buf)
}

/// Decode Base64 text back into raw envelope bytes. Fails on characters outside the standard
/// alphabet, on missing or misplaced padding, and on embedded whitespace.
pub fn from_text(text: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(text)?)
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::Rng;

    #[test]
    fn known_vectors() {
        assert_eq!(to_text(&[]), "");
        assert_eq!(to_text(&[0x00, 0x01, 0x81, 0xa1, 0x61, 0x01]), "AAGBoWEB");
        assert_eq!(to_text(&[0x00, 0x01, 0xc0]), "AAHA");
        assert_eq!(to_text(&[0x00, 0x11]), "ABE=");
        assert_eq!(from_text("ABE=").unwrap(), &[0x00, 0x11]);
    }

    #[test]
    fn no_line_wrapping() {
        let mut rng = rand::thread_rng();
        let mut data = vec![0u8; 1000];
        rng.fill(&mut data[..]);
        let text = to_text(&data);
        assert!(!text.contains('\n'));
        assert!(!text.contains('\r'));
        assert_eq!(from_text(&text).unwrap(), data);
    }

    #[test]
    fn bad_alphabet() {
        for text in ["AA-B", "AA_B", "AA B", "AA\nBA===", "ÅÅÅÅ"] {
            let err = from_text(text).unwrap_err();
            assert!(err.is_transport(), "{:?} gave {}", text, err);
        }
    }

    #[test]
    fn bad_padding() {
        for text in ["ABE", "ABE==", "A", "AB=E"] {
            let err = from_text(text).unwrap_err();
            assert!(err.is_transport(), "{:?} gave {}", text, err);
        }
    }
}
