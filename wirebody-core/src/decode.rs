//! Content-type dispatched request body decoding.

use serde::de::DeserializeOwned;

use crate::codec;
use crate::error::Error;
use crate::media::MediaType;

/// Decode a request body according to its declared content type.
///
/// Dispatches on the MIME type portion of `content_type`; parameters such
/// as `charset` are ignored. A parse failure of any kind comes back as
/// `DESERIALIZATION_FAILED` with the underlying cause; a declared type
/// outside the decodable set (including octet-stream and HTML) is
/// `UNSUPPORTED_MEDIA_TYPE` carrying the raw declared string.
///
/// There is no partial-success state: on `Err` no destination value
/// exists.
pub fn decode_body<T: DeserializeOwned>(content_type: &str, body: &[u8]) -> Result<T, Error> {
    match MediaType::from_content_type(content_type) {
        Some(MediaType::FormUrlencoded) => {
            codec::from_form(body).map_err(Error::deserialization_failed)
        }
        Some(MediaType::Json) => codec::from_json(body).map_err(Error::deserialization_failed),
        Some(MediaType::Xml) => codec::from_xml(body).map_err(Error::deserialization_failed),
        _ => Err(Error::unsupported_media_type(content_type)),
    }
}
