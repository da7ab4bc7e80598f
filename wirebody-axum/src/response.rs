//! Response-side body encoding for axum.
//!
//! [`write_response`] turns a payload into a complete HTTP response for a
//! declared media type. Marshal failures degrade in two steps: a
//! marshaled `SERIALIZATION_FAILED` envelope in the same wire format,
//! then a hardcoded envelope that cannot fail. The status code is written
//! exactly once on every path, and every failure path leaves the response
//! terminal (status already 500).

use std::io;
use std::path::Path;

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures::Stream;
use http::{HeaderValue, StatusCode, header};
use serde::Serialize;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt};
use wirebody_core::{Error, MediaType, codec};

/// Boxed byte source for streamed octet-stream responses.
pub type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;

/// A filesystem-backed payload streamed as a download.
///
/// The filename is captured when the attachment is opened; the size is
/// queried from file metadata at encode time.
#[derive(Debug)]
pub struct Attachment {
    file: File,
    name: String,
}

impl Attachment {
    /// Open a file, deriving the attachment name from the path.
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
        let file = File::open(path).await?;
        Ok(Self { file, name })
    }

    /// Wrap an already-open file under an explicit name.
    pub fn from_file(file: File, name: impl Into<String>) -> Self {
        Self {
            file,
            name: name.into(),
        }
    }

    /// The filename advertised in `Content-Disposition`.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// What a response body is, decided by the handler.
///
/// The encoder dispatches on this tag and the declared media type;
/// every combination is handled explicitly in [`write_response`].
pub enum Payload<T = ()> {
    /// Pre-encoded bytes, written verbatim.
    Bytes(Bytes),
    /// Pre-encoded text, written verbatim.
    Text(String),
    /// An arbitrary-length byte source, copied to the response.
    /// Octet-stream only.
    Reader(BoxedReader),
    /// A filesystem-backed download. Octet-stream only.
    File(Attachment),
    /// A value marshaled according to the media type.
    Structured(T),
}

impl<T> From<Bytes> for Payload<T> {
    fn from(bytes: Bytes) -> Self {
        Payload::Bytes(bytes)
    }
}

impl<T> From<Vec<u8>> for Payload<T> {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Bytes(bytes.into())
    }
}

impl<T> From<String> for Payload<T> {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl<T> From<&str> for Payload<T> {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_owned())
    }
}

impl<T> From<Attachment> for Payload<T> {
    fn from(attachment: Attachment) -> Self {
        Payload::File(attachment)
    }
}

/// Encode a payload as a complete HTTP response for the declared media
/// type.
///
/// `None` writes the status with no body. Json and Xml marshal
/// `Structured` values and pass pre-encoded `Bytes`/`Text` through
/// verbatim; Html escapes marshaled JSON for embedding; octet-stream
/// passes bytes and text through and copies `Reader`/`File` sources,
/// setting `Content-Disposition` and `Content-Length` for attachments.
/// A payload shape the media type cannot carry produces a 500 with no
/// body; a marshal failure produces a 500 carrying the
/// `SERIALIZATION_FAILED` envelope (see [`write_error`]).
///
/// A form-urlencoded response never produces body bytes; only the status
/// is written.
pub async fn write_response<T: Serialize>(
    media: MediaType,
    status: StatusCode,
    payload: Option<Payload<T>>,
) -> Response {
    let Some(payload) = payload else {
        return respond(media, status, Body::empty());
    };

    match media {
        MediaType::Json => match payload {
            Payload::Bytes(bytes) => respond(media, status, Body::from(bytes)),
            Payload::Text(text) => respond(media, status, Body::from(text)),
            Payload::Structured(value) => match codec::to_json(&value) {
                Ok(bytes) => respond(media, status, Body::from(bytes)),
                Err(cause) => marshal_failure(media, &cause),
            },
            Payload::Reader(_) | Payload::File(_) => unencodable(media),
        },
        MediaType::Xml => match payload {
            Payload::Bytes(bytes) => respond(media, status, Body::from(bytes)),
            Payload::Text(text) => respond(media, status, Body::from(text)),
            Payload::Structured(value) => match codec::to_xml(&value) {
                Ok(bytes) => respond(media, status, Body::from(bytes)),
                Err(cause) => marshal_failure(media, &cause),
            },
            Payload::Reader(_) | Payload::File(_) => unencodable(media),
        },
        MediaType::Html => match payload {
            Payload::Bytes(bytes) => respond(media, status, Body::from(bytes)),
            Payload::Text(text) => respond(media, status, Body::from(text)),
            Payload::Structured(value) => match codec::to_json(&value) {
                Ok(bytes) => respond(
                    media,
                    status,
                    Body::from(codec::html_escape_json(&bytes)),
                ),
                Err(cause) => marshal_failure(media, &cause),
            },
            Payload::Reader(_) | Payload::File(_) => unencodable(media),
        },
        MediaType::OctetStream => match payload {
            Payload::Bytes(bytes) => respond(media, status, Body::from(bytes)),
            Payload::Text(text) => respond(media, status, Body::from(text)),
            Payload::Reader(reader) => {
                respond(media, status, Body::from_stream(chunks(reader)))
            }
            Payload::File(attachment) => stream_attachment(status, attachment).await,
            Payload::Structured(_) => unencodable(media),
        },
        // A form-urlencoded response carries no body
        MediaType::FormUrlencoded => respond(media, status, Body::empty()),
    }
}

/// Serialize the canonical error envelope for the declared media type.
///
/// Dispatches exactly like a [`Payload::Structured`] value, so
/// octet-stream and form-urlencoded media produce the same no-body
/// terminal responses they would for any structured payload.
pub async fn write_error(media: MediaType, status: StatusCode, error: &Error) -> Response {
    write_response(media, status, Some(Payload::Structured(error))).await
}

/// Render the JSON envelope with the code's default HTTP status.
///
/// This is the path for errors that never saw a caller-chosen status:
/// extractor rejections and `?`-propagated failures.
pub fn error_response(error: &Error) -> Response {
    match codec::to_json(error) {
        Ok(bytes) => respond(MediaType::Json, error.http_status(), Body::from(bytes)),
        Err(_) => respond(
            MediaType::Json,
            StatusCode::INTERNAL_SERVER_ERROR,
            Body::from(const_envelope(MediaType::Json)),
        ),
    }
}

/// Extractor rejection carrying the wire [`Error`].
///
/// A distinct type because `Error` lives in `wirebody-core` while axum's
/// `IntoResponse` must be implemented here.
#[derive(Debug, Clone)]
pub struct Rejection(pub Error);

impl From<Error> for Rejection {
    fn from(error: Error) -> Self {
        Rejection(error)
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        error_response(&self.0)
    }
}

/// Build the response: status written exactly once, content type from the
/// media, then the body.
fn respond(media: MediaType, status: StatusCode, body: Body) -> Response {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, HeaderValue::from_static(media.as_str()))
        .body(body)
        .unwrap_or_else(|_| {
            let mut response = Response::new(Body::empty());
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        })
}

/// A payload shape the media type cannot carry: 500, no body.
fn unencodable(media: MediaType) -> Response {
    respond(media, StatusCode::INTERNAL_SERVER_ERROR, Body::empty())
}

/// Degradation path for a marshal failure.
///
/// The response becomes a 500 carrying the `SERIALIZATION_FAILED`
/// envelope in the same wire format (Html reports through the JSON
/// envelope). If marshaling the envelope itself fails, a hardcoded
/// envelope with no dynamic content is written instead — the body is
/// never empty after a marshal failure.
fn marshal_failure(media: MediaType, cause: &codec::EncodeError) -> Response {
    tracing::error!(media = %media, error = %cause, "response marshal failed");
    let fallback = Error::serialization_failed(cause);

    let marshaled = match media {
        MediaType::Xml => codec::to_xml(&fallback),
        _ => codec::to_json(&fallback),
    };

    let body = match marshaled {
        Ok(bytes) => Body::from(bytes),
        Err(_) => Body::from(const_envelope(media)),
    };
    respond(media, StatusCode::INTERNAL_SERVER_ERROR, body)
}

/// Last-resort envelopes with no dynamic content.
fn const_envelope(media: MediaType) -> &'static [u8] {
    match media {
        MediaType::Xml => b"<error><code>3</code><message>Serialization failed</message></error>",
        _ => br#"{"code":3,"message":"Serialization failed"}"#,
    }
}

/// Copy an async byte source into a body stream, one buffer at a time.
fn chunks(mut reader: BoxedReader) -> impl Stream<Item = io::Result<Bytes>> + Send + 'static {
    async_stream::stream! {
        let mut buf = vec![0u8; 16 * 1024];
        loop {
            match reader.read(&mut buf).await {
                Ok(0) => return,
                Ok(n) => yield Ok(Bytes::copy_from_slice(&buf[..n])),
                Err(err) => {
                    yield Err(err);
                    return;
                }
            }
        }
    }
}

/// Stream a filesystem-backed attachment with download headers.
///
/// The size and name are settled before any byte is written; if the
/// metadata query fails or the name can't be carried in a header, the
/// response is a 500 with no body.
async fn stream_attachment(status: StatusCode, attachment: Attachment) -> Response {
    let Attachment { file, name } = attachment;

    let size = match file.metadata().await {
        Ok(metadata) => metadata.len(),
        Err(err) => {
            tracing::error!(name = %name, error = %err, "attachment metadata query failed");
            return unencodable(MediaType::OctetStream);
        }
    };
    let Ok(disposition) = HeaderValue::from_str(&format!("attachment; filename={name}")) else {
        tracing::error!(name = %name, "attachment name not representable as a header value");
        return unencodable(MediaType::OctetStream);
    };

    Response::builder()
        .status(status)
        .header(
            header::CONTENT_TYPE,
            HeaderValue::from_static(MediaType::OctetStream.as_str()),
        )
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CONTENT_LENGTH, size)
        .body(Body::from_stream(chunks(Box::new(file))))
        .unwrap_or_else(|_| unencodable(MediaType::OctetStream))
}
