//! # wirebody-axum
//!
//! Content-type driven body decoding and encoding for [axum] services,
//! with a structured error envelope.
//!
//! The request side decodes a body into any serde type according to the
//! declared `Content-Type` (form-urlencoded, JSON, or XML), either through
//! [`read_request`](request::read_request) or the
//! [`Decoded`](request::Decoded) extractor. The response side encodes a
//! tagged [`Payload`](response::Payload) — pre-encoded bytes or text, a
//! byte stream, a filesystem attachment, or a structured value — for a
//! declared media type, degrading to a serialized
//! [`Error`](wirebody_core::Error) envelope when encoding itself fails.
//!
//! Error messages are resolved through code-indexed catalogs; services
//! register their own codes from
//! [`Code::SERVICE_BASE`](wirebody_core::Code::SERVICE_BASE) upward.
//!
//! [axum]: https://github.com/tokio-rs/axum

pub mod request;
pub mod response;

pub use wirebody_core::{Catalog, Code, Error, MediaType, codec, decode_body};

pub mod prelude {
    //! The most common types in one import.
    pub use crate::request::{Decoded, read_request};
    pub use crate::response::{
        Attachment, Payload, Rejection, error_response, write_error, write_response,
    };
    pub use wirebody_core::{Catalog, Code, Error, MediaType};
}
