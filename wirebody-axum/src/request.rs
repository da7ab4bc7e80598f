//! Request-side body decoding for axum.

use axum::body::to_bytes;
use axum::extract::{FromRequest, Request};
use http::header;
use serde::de::DeserializeOwned;
use wirebody_core::{Error, decode_body};

use crate::response::Rejection;

/// Decode a request body into `T` according to the request's declared
/// `Content-Type`.
///
/// The body is read to completion first; a read failure reports the same
/// way as a parse failure. No size cap is imposed here — mount a limit
/// layer in front when the transport needs one.
pub async fn read_request<T: DeserializeOwned>(req: Request) -> Result<T, Error> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();

    let body = to_bytes(req.into_body(), usize::MAX)
        .await
        .map_err(Error::deserialization_failed)?;

    decode_body(&content_type, &body).map_err(|err| {
        tracing::debug!(content_type = %content_type, error = %err, "request body rejected");
        err
    })
}

/// Extractor that decodes the request body via [`read_request`].
///
/// The rejection renders the wire envelope as JSON with the code's
/// default HTTP status (415 for an unrecognized content type, 400 for a
/// malformed body).
#[derive(Debug, Clone)]
pub struct Decoded<T>(pub T);

impl<S, T> FromRequest<S> for Decoded<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Rejection;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        read_request(req).await.map(Decoded).map_err(Rejection)
    }
}
