//! Encoded file access: decode and encode document bytes as UTF-8 or GBK,
//! plus the small path helpers both binaries share.

use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use encoding_rs::{Encoding, GBK, UTF_8};
use thiserror::Error;

use crate::protocol::DEFAULT_TITLE;

/// Text encoding used to read and write the backing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TextEncoding {
    #[value(name = "utf-8")]
    Utf8,
    #[value(name = "gbk")]
    Gbk,
}

impl TextEncoding {
    fn codec(self) -> &'static Encoding {
        match self {
            TextEncoding::Utf8 => UTF_8,
            TextEncoding::Gbk => GBK,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unable to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("content contains characters that cannot be encoded as {encoding:?}")]
    Unencodable { encoding: TextEncoding },
}

/// Decodes file bytes with the chosen encoding.
///
/// Decoding is lossy on purpose: erroring out on a wrong encoding guess
/// would surface an empty buffer, and the next save would clobber the file
/// with it. Replacement characters at least keep the rest of the text.
pub fn decode(bytes: &[u8], encoding: TextEncoding) -> String {
    let (decoded, _, _had_errors) = encoding.codec().decode(bytes);
    decoded.into_owned()
}

/// Encodes content with the chosen encoding. Unlike decoding, an
/// unmappable character here is a hard error — writing replacement bytes
/// would silently corrupt the document.
pub fn encode(content: &str, encoding: TextEncoding) -> Result<Vec<u8>, StoreError> {
    let (encoded, _, had_errors) = encoding.codec().encode(content);
    if had_errors {
        return Err(StoreError::Unencodable { encoding });
    }
    Ok(encoded.into_owned())
}

/// Reads and decodes a file in one step (import path of the editor).
pub fn read_to_string(path: &Path, encoding: TextEncoding) -> Result<String, StoreError> {
    let bytes = std::fs::read(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode(&bytes, encoding))
}

/// Encodes and writes a file in one step (export path of the editor).
pub fn write_string(path: &Path, content: &str, encoding: TextEncoding) -> Result<(), StoreError> {
    let bytes = encode(content, encoding)?;
    std::fs::write(path, bytes).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Default title for an imported file: the filename minus its extension.
pub fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}
