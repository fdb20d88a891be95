//! Base64, URL encoding and digest tests against known vectors.

use devhelper_core::encoding::{base64_decode, base64_encode, url_decode, url_encode};
use devhelper_core::hash::{hash_bytes, hash_reader, verify, Algorithm};
use devhelper_core::Error;
use std::io::Cursor;

// ============================================================================
// Base64
// ============================================================================

#[test]
fn base64_standard_vectors() {
    assert_eq!(base64_encode(b"", false), "");
    assert_eq!(base64_encode(b"f", false), "Zg==");
    assert_eq!(base64_encode(b"foobar", false), "Zm9vYmFy");
    assert_eq!(base64_decode("Zm9vYmE=", false).unwrap(), b"fooba");
}

#[test]
fn base64_url_safe_alphabet() {
    let data = [0xfb, 0xff, 0xbf];
    assert_eq!(base64_encode(&data, false), "+/+/");
    assert_eq!(base64_encode(&data, true), "-_-_");
    assert_eq!(base64_decode("-_-_", true).unwrap(), data);
}

#[test]
fn base64_decode_trims_whitespace() {
    assert_eq!(base64_decode("  aGVsbG8=\n", false).unwrap(), b"hello");
}

#[test]
fn base64_rejects_garbage() {
    let err = base64_decode("not base64!", false).unwrap_err();
    assert!(matches!(err, Error::Decode(_)), "{err:?}");
    assert!(base64_decode("-_-_", false).is_err());
}

// ============================================================================
// URL
// ============================================================================

#[test]
fn url_encode_keeps_unreserved_and_plusses_spaces() {
    assert_eq!(url_encode("AZaz09-_.~"), "AZaz09-_.~");
    assert_eq!(url_encode("a b/c?d=e"), "a+b%2Fc%3Fd%3De");
    assert_eq!(url_encode("café"), "caf%C3%A9");
}

#[test]
fn url_decode_reverses_encode() {
    assert_eq!(url_decode("a+b%2Fc%3Fd%3De").unwrap(), "a b/c?d=e");
    assert_eq!(url_decode("caf%c3%a9\n").unwrap(), "café");
}

#[test]
fn url_decode_rejects_bad_escapes_and_bad_utf8() {
    assert!(url_decode("100%").is_err());
    assert!(url_decode("%zz").is_err());
    assert!(url_decode("%ff%fe").is_err());
}

// ============================================================================
// Hashing
// ============================================================================

#[test]
fn digests_of_hello() {
    assert_eq!(
        hash_bytes(Algorithm::Md5, b"hello"),
        "5d41402abc4b2a76b9719d911017c592"
    );
    assert_eq!(
        hash_bytes(Algorithm::Sha1, b"hello"),
        "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"
    );
    assert_eq!(
        hash_bytes(Algorithm::Sha256, b"hello"),
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
}

#[test]
fn sha512_of_empty_input() {
    assert_eq!(
        hash_bytes(Algorithm::Sha512, b""),
        "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
         47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"
    );
}

#[test]
fn streamed_digest_matches_in_memory_digest() {
    let data = vec![b'x'; 20_000];
    for algorithm in Algorithm::ALL {
        let streamed = hash_reader(algorithm, Cursor::new(&data)).unwrap();
        assert_eq!(streamed, hash_bytes(algorithm, &data), "{algorithm}");
        assert_eq!(streamed.len(), algorithm.hex_len(), "{algorithm}");
    }
}

#[test]
fn algorithm_names_parse_case_insensitively() {
    assert_eq!("SHA256".parse::<Algorithm>().unwrap(), Algorithm::Sha256);
    assert_eq!("md5".parse::<Algorithm>().unwrap(), Algorithm::Md5);
    let err = "crc32".parse::<Algorithm>().unwrap_err();
    assert!(err.to_string().contains("crc32"), "{err}");
}

#[test]
fn verify_ignores_case_and_surrounding_space() {
    let digest = hash_bytes(Algorithm::Md5, b"hello");
    assert!(verify(&digest, " 5D41402ABC4B2A76B9719D911017C592\n"));
    assert!(!verify(&digest, "00000000000000000000000000000000"));
}
