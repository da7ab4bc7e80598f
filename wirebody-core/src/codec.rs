//! Byte-level marshal and unmarshal behind the media-type dispatch.
//!
//! One encode and one decode function per wire format, all over
//! caller-defined serde types. Failures carry the library cause;
//! [`decode_body`](crate::decode_body) and the response writer wrap them
//! into wire [`Error`](crate::Error)s.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Error;

/// Encode-side failure, before being wrapped into the wire envelope.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Xml(#[from] quick_xml::SeError),
}

/// Decode-side failure, before being wrapped into the wire envelope.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Form(#[from] serde_qs::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Xml(#[from] quick_xml::DeError),
}

impl From<EncodeError> for Error {
    fn from(err: EncodeError) -> Self {
        Error::serialization_failed(err)
    }
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Error::deserialization_failed(err)
    }
}

/// Marshal a value as JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, EncodeError> {
    Ok(serde_json::to_vec(value)?)
}

/// Marshal a value as XML. The root element is named after the type.
pub fn to_xml<T: Serialize>(value: &T) -> Result<Vec<u8>, EncodeError> {
    Ok(quick_xml::se::to_string(value)?.into_bytes())
}

/// Unmarshal a URL-encoded form body.
///
/// Keys absent from the form leave the destination's serde defaults in
/// place; a value that doesn't fit its field type fails.
pub fn from_form<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodeError> {
    Ok(serde_qs::from_bytes(body)?)
}

/// Unmarshal a JSON body.
pub fn from_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodeError> {
    Ok(serde_json::from_slice(body)?)
}

/// Unmarshal an XML body.
pub fn from_xml<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodeError> {
    Ok(quick_xml::de::from_reader(body)?)
}

/// Escape `<`, `>` and `&` in marshaled JSON so the bytes are safe to
/// embed in a markup context.
///
/// Those bytes can only occur inside JSON string literals, where a
/// `\u00XX` escape is always valid, so the byte-level rewrite preserves
/// the JSON's meaning exactly.
pub fn html_escape_json(json: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(json.len());
    for &byte in json {
        match byte {
            b'<' => out.extend_from_slice(b"\\u003c"),
            b'>' => out.extend_from_slice(b"\\u003e"),
            b'&' => out.extend_from_slice(b"\\u0026"),
            _ => out.push(byte),
        }
    }
    out
}
