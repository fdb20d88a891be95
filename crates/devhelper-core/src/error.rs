//! Error types for devhelper operations.

use crate::convert::Format;
use thiserror::Error;

/// Failures of a single format conversion.
///
/// Every variant is terminal for the invocation; nothing is retried and no
/// partially decoded value ever reaches an encoder.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// A format token outside `json`, `yaml`/`yml`, `xml`. Raised before any I/O.
    #[error("unsupported format: '{token}' (expected json, yaml, yml or xml)")]
    UnsupportedFormat { token: String },

    /// The input stream could not be read to the end.
    #[error("failed to read input: {0}")]
    Read(#[source] std::io::Error),

    /// The input bytes are not well-formed in the source notation.
    #[error("failed to parse {format} input: {source}")]
    Decode {
        format: Format,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The decoded value cannot be represented in the target notation.
    #[error("failed to serialize to {format}: {message}")]
    Encode { format: Format, message: String },

    /// The output sink rejected the write.
    #[error("failed to write output: {0}")]
    Write(#[source] std::io::Error),
}

/// Errors raised by the formatter, encoders, hasher, generator, HTTP client
/// and configuration loader.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input was not valid in the declared notation (formatter path).
    #[error("invalid {format}: {message}")]
    Syntax { format: Format, message: String },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("unsupported hash algorithm: '{0}' (expected md5, sha1, sha256 or sha512)")]
    UnsupportedAlgorithm(String),

    /// Base64 or URL decoding failed.
    #[error("decode error: {0}")]
    Decode(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("config error in {path}: {message}")]
    Config { path: String, message: String },
}

/// Convenience alias used throughout devhelper-core.
pub type Result<T> = std::result::Result<T, Error>;
