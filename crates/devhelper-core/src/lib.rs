//! # devhelper-core
//!
//! The library behind the `devhelper` command-line tool: a structured-data
//! converter plus a handful of small, stateless developer utilities.
//!
//! ## Quick start
//!
//! ```rust
//! use devhelper_core::{convert_bytes, ConvertOptions, Format};
//!
//! // XML -> JSON. Leaf text is always a string.
//! let xml = b"<person><name>John</name><age>30</age></person>";
//! let json = convert_bytes(xml, Format::Xml, Format::Json, &ConvertOptions::with_indent(0)).unwrap();
//! assert_eq!(json, b"{\"name\":\"John\",\"age\":\"30\"}\n");
//! ```
//!
//! ## Modules
//!
//! - [`convert`]: JSON, YAML and XML conversion through one intermediate value
//! - [`xml`]: the XML side of that mapping
//! - [`pretty`] and [`highlight`]: re-indenting and ANSI colouring
//! - [`encoding`]: Base64 and URL encoding
//! - [`hash`]: MD5 and SHA digests
//! - [`generate`]: random UUIDs, strings, numbers and dates
//! - [`http`]: a one-shot HTTP client
//! - [`monitor`]: CPU, memory and disk sampling
//! - [`config`]: the user preference file
//! - [`units`]: byte and duration formatting
//! - [`error`]: error types

pub mod config;
pub mod convert;
pub mod encoding;
pub mod error;
pub mod generate;
pub mod hash;
pub mod highlight;
pub mod http;
pub mod monitor;
pub mod pretty;
pub mod units;
pub mod xml;

pub use convert::{convert, convert_bytes, ConvertOptions, Format};
pub use error::{ConvertError, Error, Result};
