//! Document identity.
//!
//! The analysis process, the transport and the host editor do not always agree on how a
//! `file://` URI is escaped (`%20` vs a literal space, `%3A` vs `:` after a drive letter,
//! `file://localhost/`). [`DocumentUri`] canonicalizes those spellings so a document always
//! maps to exactly one overlay entry.

use std::fmt;

/// A canonicalized document URI, used as the key for overlay state and host documents.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentUri(String);

impl DocumentUri {
    /// Canonicalize `raw` into a document URI.
    ///
    /// `file://` URIs are percent-decoded and re-encoded with a fixed alphabet, the optional
    /// `localhost` authority is dropped and a Windows drive letter is lower-cased. Any other
    /// scheme (`untitled:`, `vscode-notebook-cell:` ...) is kept verbatim.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref().trim();
        let Some(rest) = raw.strip_prefix("file://") else {
            return Self(raw.to_string());
        };
        let rest = rest.strip_prefix("localhost").unwrap_or(rest);

        let mut path = percent_decode_path(rest);
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        // `/C:/...` -> `/c:/...`
        let bytes = path.as_bytes();
        if bytes.len() >= 3 && bytes[2] == b':' && bytes[1].is_ascii_alphabetic() {
            let drive = (bytes[1] as char).to_ascii_lowercase();
            path.replace_range(1..2, &drive.to_string());
        }

        Self(format!("file://{}", percent_encode_path(&path)))
    }

    /// The canonical URI string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentUri {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DocumentUri {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for DocumentUri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Percent-encode a URI path.
///
/// Unreserved bytes, `/` and the drive-letter `:` survive; everything else is `%XX`-encoded.
pub fn percent_encode_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for (i, &b) in path.as_bytes().iter().enumerate() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(b as char)
            }
            b':' if i == 2 => out.push(':'),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

/// Percent-decode a URI path component.
pub fn percent_decode_path(path: &str) -> String {
    fn hex_val(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(b - b'a' + 10),
            b'A'..=b'F' => Some(b - b'A' + 10),
            _ => None,
        }
    }

    let bytes = path.as_bytes();
    let mut out = Vec::<u8>::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && let (Some(hi), Some(lo)) = (hex_val(bytes[i + 1]), hex_val(bytes[i + 2]))
        {
            out.push((hi << 4) | lo);
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).to_string()
}
