//! # VeilDB Codec
//!
//! Version-tagged canonical serialization for VeilDB.
//!
//! Every payload is a single format byte followed by a CBOR body. The tag
//! lets a store reject data written under a format it does not understand,
//! while the CBOR body keeps encoding generic over arbitrary serde types:
//!
//! - Identical inputs produce identical bytes
//! - Decoding reproduces the original value or fails with a [`CodecError`]
//! - Bytes written under [`FORMAT_VERSION`] stay decodable for the life of
//!   the store
//!
//! ## Usage
//!
//! ```
//! use veildb_codec::{to_tagged_cbor, from_tagged_cbor};
//!
//! let bytes = to_tagged_cbor(&42u64).unwrap();
//! let decoded: u64 = from_tagged_cbor(&bytes).unwrap();
//! assert_eq!(decoded, 42);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;

pub use error::{CodecError, CodecResult};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Format version tag prepended to every encoded payload.
pub const FORMAT_VERSION: u8 = 1;

/// Encodes a value to version-tagged CBOR bytes.
///
/// The output is one format byte followed by the CBOR body. Encoding is
/// total and deterministic for any well-formed serde value.
///
/// # Errors
///
/// Returns an error if the value cannot be represented as CBOR.
pub fn to_tagged_cbor<T: Serialize>(value: &T) -> CodecResult<Vec<u8>> {
    let mut buffer = vec![FORMAT_VERSION];
    ciborium::ser::into_writer(value, &mut buffer)
        .map_err(|e| CodecError::encoding_failed(e.to_string()))?;
    Ok(buffer)
}

/// Decodes a value from version-tagged CBOR bytes.
///
/// # Errors
///
/// Returns [`CodecError::UnexpectedEof`] on empty input,
/// [`CodecError::UnsupportedFormat`] when the tag does not match
/// [`FORMAT_VERSION`], and [`CodecError::DecodingFailed`] when the body is
/// malformed or does not match the requested type.
pub fn from_tagged_cbor<T: DeserializeOwned>(bytes: &[u8]) -> CodecResult<T> {
    let (tag, body) = bytes.split_first().ok_or(CodecError::UnexpectedEof)?;
    if *tag != FORMAT_VERSION {
        return Err(CodecError::UnsupportedFormat {
            found: *tag,
            supported: FORMAT_VERSION,
        });
    }
    ciborium::de::from_reader(body).map_err(|e| CodecError::decoding_failed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde::{Deserialize, Serialize};

    #[test]
    fn roundtrip_unsigned() {
        let bytes = to_tagged_cbor(&42u64).unwrap();
        let decoded: u64 = from_tagged_cbor(&bytes).unwrap();
        assert_eq!(decoded, 42);
    }

    #[test]
    fn roundtrip_negative_integer() {
        let bytes = to_tagged_cbor(&-100i64).unwrap();
        let decoded: i64 = from_tagged_cbor(&bytes).unwrap();
        assert_eq!(decoded, -100);
    }

    #[test]
    fn roundtrip_string() {
        let value = "hello world".to_string();
        let bytes = to_tagged_cbor(&value).unwrap();
        let decoded: String = from_tagged_cbor(&bytes).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn roundtrip_byte_vector() {
        let value = vec![1u8, 2, 3, 4, 5];
        let bytes = to_tagged_cbor(&value).unwrap();
        let decoded: Vec<u8> = from_tagged_cbor(&bytes).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn roundtrip_tuple_key() {
        let value = ("block".to_string(), 7u32);
        let bytes = to_tagged_cbor(&value).unwrap();
        let decoded: (String, u32) = from_tagged_cbor(&bytes).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn roundtrip_struct() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Record {
            name: String,
            height: u64,
            spent: bool,
        }

        let value = Record {
            name: "alpha".to_string(),
            height: 1234,
            spent: false,
        };
        let bytes = to_tagged_cbor(&value).unwrap();
        let decoded: Record = from_tagged_cbor(&bytes).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn encoding_is_deterministic() {
        let value = ("key".to_string(), vec![9u8; 32]);
        assert_eq!(to_tagged_cbor(&value).unwrap(), to_tagged_cbor(&value).unwrap());
    }

    #[test]
    fn payload_starts_with_format_tag() {
        let bytes = to_tagged_cbor(&0u8).unwrap();
        assert_eq!(bytes[0], FORMAT_VERSION);
    }

    #[test]
    fn empty_input_is_eof() {
        let result: CodecResult<u64> = from_tagged_cbor(&[]);
        assert_eq!(result, Err(CodecError::UnexpectedEof));
    }

    #[test]
    fn unknown_format_tag_is_rejected() {
        let mut bytes = to_tagged_cbor(&42u64).unwrap();
        bytes[0] = 0xff;
        let result: CodecResult<u64> = from_tagged_cbor(&bytes);
        assert_eq!(
            result,
            Err(CodecError::UnsupportedFormat {
                found: 0xff,
                supported: FORMAT_VERSION,
            })
        );
    }

    #[test]
    fn truncated_body_fails_to_decode() {
        let bytes = to_tagged_cbor(&"a longer string value".to_string()).unwrap();
        let result: CodecResult<String> = from_tagged_cbor(&bytes[..bytes.len() - 3]);
        assert!(matches!(result, Err(CodecError::DecodingFailed { .. })));
    }

    #[test]
    fn type_mismatch_fails_to_decode() {
        let bytes = to_tagged_cbor(&"text".to_string()).unwrap();
        let result: CodecResult<u64> = from_tagged_cbor(&bytes);
        assert!(matches!(result, Err(CodecError::DecodingFailed { .. })));
    }

    proptest! {
        #[test]
        fn roundtrip_arbitrary_strings(value in ".*") {
            let bytes = to_tagged_cbor(&value).unwrap();
            let decoded: String = from_tagged_cbor(&bytes).unwrap();
            prop_assert_eq!(decoded, value);
        }

        #[test]
        fn roundtrip_arbitrary_bytes(value in prop::collection::vec(any::<u8>(), 0..1024)) {
            let bytes = to_tagged_cbor(&value).unwrap();
            let decoded: Vec<u8> = from_tagged_cbor(&bytes).unwrap();
            prop_assert_eq!(decoded, value);
        }

        #[test]
        fn roundtrip_arbitrary_integers(value in any::<i64>()) {
            let bytes = to_tagged_cbor(&value).unwrap();
            let decoded: i64 = from_tagged_cbor(&bytes).unwrap();
            prop_assert_eq!(decoded, value);
        }
    }
}
