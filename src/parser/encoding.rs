use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};

use crate::error::{Error, Result};

/// Resolves a character encoding label, defaulting to UTF-8.
///
/// # Errors
///
/// Returns [`Error::Unsupported`] when the label names no known encoding.
pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    let Some(label) = label.map(str::trim).filter(|label| !label.is_empty()) else {
        return Ok(UTF_8);
    };
    resolve_label(label).ok_or_else(|| Error::Unsupported {
        feature: Cow::Owned(format!("character encoding '{label}'")),
    })
}

fn resolve_label(name: &str) -> Option<&'static Encoding> {
    Encoding::for_label(name.as_bytes()).or_else(|| {
        let lower = name.to_ascii_lowercase();
        Encoding::for_label(lower.replace('_', "-").as_bytes())
    })
}

/// Decodes byte sequences into text, replacing malformed input with U+FFFD.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TextDecoder {
    encoding: &'static Encoding,
}

impl TextDecoder {
    pub(crate) const fn new(encoding: &'static Encoding) -> Self {
        Self { encoding }
    }

    pub(crate) fn decode_into(self, bytes: &[u8], out: &mut String) {
        if self.encoding == UTF_8 {
            match simdutf8::basic::from_utf8(bytes) {
                Ok(text) => out.push_str(text),
                Err(_) => out.push_str(&String::from_utf8_lossy(bytes)),
            }
            return;
        }
        let (text, _) = self.encoding.decode_without_bom_handling(bytes);
        out.push_str(&text);
    }
}
