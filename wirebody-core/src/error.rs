//! The structured error envelope.
//!
//! [`Error`] is the canonical failure representation: every failure path
//! in the decode/encode layer and the surrounding service reports through
//! it, and it serializes to the same wire formats as ordinary payloads.

use std::fmt;

use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Numeric error code carried by an [`Error`].
///
/// Codes below [`Code::SERVICE_BASE`] are reserved for common use;
/// services define their own codes at `SERVICE_BASE` and above, together
/// with a [`Catalog`](crate::Catalog) holding their message templates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Code(pub u32);

impl Code {
    /// Fallback for codes no catalog recognizes.
    pub const UNKNOWN: Code = Code(0);
    /// An unstructured fault surfaced through the encode path.
    pub const INTERNAL: Code = Code(1);
    /// Declared content type outside the recognized set.
    pub const UNSUPPORTED_MEDIA_TYPE: Code = Code(2);
    /// Marshal failure while encoding a response.
    pub const SERIALIZATION_FAILED: Code = Code(3);
    /// Malformed body for a recognized content type.
    pub const DESERIALIZATION_FAILED: Code = Code(4);
    /// Resource identifier in the URL conflicts with the one in the body.
    pub const IDENTIFIER_MISMATCH: Code = Code(5);
    /// First code available to service-specific catalogs.
    pub const SERVICE_BASE: Code = Code(1024);

    /// Whether this code is in the reserved common range.
    pub fn is_common(&self) -> bool {
        self.0 < Self::SERVICE_BASE.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structured error returned as the body of 4xx and 5xx responses.
///
/// The message is fully resolved at construction (see [`Error::new`]) and
/// never re-templated afterwards. Serializes as
/// `{"code": <int>, "message": "<str>"}` plus an optional `stack`, and as
/// `<error><code>..</code><message>..</message></error>` in XML.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "error")]
pub struct Error {
    pub(crate) code: Code,
    pub(crate) message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) stack: Option<String>,
}

impl Error {
    /// Get the error code.
    pub fn code(&self) -> Code {
        self.code
    }

    /// Get the resolved message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the diagnostic stack, if one was attached.
    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    /// Attach a diagnostic stack string.
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Default HTTP status for this error's code.
    ///
    /// Used where no caller-supplied status exists (extractor rejections).
    /// The encode path always takes the caller's status instead.
    pub fn http_status(&self) -> StatusCode {
        match self.code {
            Code::UNSUPPORTED_MEDIA_TYPE => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Code::DESERIALIZATION_FAILED | Code::IDENTIFIER_MISMATCH => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}
