//! Message digests: MD5, SHA-1, SHA-256, SHA-512.

use crate::error::{Error, Result};
use log::debug;
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use std::io::{self, Read};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Md5,
        Algorithm::Sha1,
        Algorithm::Sha256,
        Algorithm::Sha512,
    ];

    /// Length of the hex digest in characters.
    pub fn hex_len(self) -> usize {
        match self {
            Algorithm::Md5 => 32,
            Algorithm::Sha1 => 40,
            Algorithm::Sha256 => 64,
            Algorithm::Sha512 => 128,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::Md5 => "md5",
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha512 => "sha512",
        })
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "md5" => Ok(Algorithm::Md5),
            "sha1" => Ok(Algorithm::Sha1),
            "sha256" => Ok(Algorithm::Sha256),
            "sha512" => Ok(Algorithm::Sha512),
            _ => Err(Error::UnsupportedAlgorithm(name.to_string())),
        }
    }
}

/// Digest everything readable from `reader` and return lowercase hex.
pub fn hash_reader<R: Read>(algorithm: Algorithm, reader: R) -> Result<String> {
    debug!("hashing input with {algorithm}");
    match algorithm {
        Algorithm::Md5 => digest::<Md5, R>(reader),
        Algorithm::Sha1 => digest::<Sha1, R>(reader),
        Algorithm::Sha256 => digest::<Sha256, R>(reader),
        Algorithm::Sha512 => digest::<Sha512, R>(reader),
    }
}

pub fn hash_bytes(algorithm: Algorithm, data: &[u8]) -> String {
    match algorithm {
        Algorithm::Md5 => hex::encode(Md5::digest(data)),
        Algorithm::Sha1 => hex::encode(Sha1::digest(data)),
        Algorithm::Sha256 => hex::encode(Sha256::digest(data)),
        Algorithm::Sha512 => hex::encode(Sha512::digest(data)),
    }
}

/// Case-insensitive comparison against an expected hex digest.
pub fn verify(actual: &str, expected: &str) -> bool {
    actual.eq_ignore_ascii_case(expected.trim())
}

fn digest<D: Digest, R: Read>(mut reader: R) -> Result<String> {
    let mut hasher = D::new();
    let mut buf = [0u8; 8192];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => hasher.update(&buf[..n]),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(hex::encode(hasher.finalize()))
}
