//! Media type identification for request and response bodies.
//!
//! [`MediaType`] is the closed set of content types this layer knows how
//! to decode or encode. Exactly one media type governs a given call;
//! values outside the set are a terminal error for the caller, never a
//! default.

use std::fmt;

/// Content types recognized by the body codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// `application/x-www-form-urlencoded`
    FormUrlencoded,
    /// `application/json`
    Json,
    /// `application/xml`
    Xml,
    /// `application/octet-stream`
    OctetStream,
    /// `text/html`
    Html,
}

impl MediaType {
    /// Identify a media type from a raw `Content-Type` header value.
    ///
    /// Only the MIME type portion is considered; parameters such as
    /// `charset` are ignored. Returns `None` for anything outside the
    /// recognized set.
    pub fn from_content_type(value: &str) -> Option<Self> {
        let mime = value.split(';').next().unwrap_or("").trim();
        if mime.eq_ignore_ascii_case("application/x-www-form-urlencoded") {
            Some(Self::FormUrlencoded)
        } else if mime.eq_ignore_ascii_case("application/json") {
            Some(Self::Json)
        } else if mime.eq_ignore_ascii_case("application/xml") {
            Some(Self::Xml)
        } else if mime.eq_ignore_ascii_case("application/octet-stream") {
            Some(Self::OctetStream)
        } else if mime.eq_ignore_ascii_case("text/html") {
            Some(Self::Html)
        } else {
            None
        }
    }

    /// The exact wire constant for this media type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FormUrlencoded => "application/x-www-form-urlencoded",
            Self::Json => "application/json",
            Self::Xml => "application/xml",
            Self::OctetStream => "application/octet-stream",
            Self::Html => "text/html",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_content_type() {
        assert_eq!(
            MediaType::from_content_type("application/json"),
            Some(MediaType::Json)
        );
        assert_eq!(
            MediaType::from_content_type("application/xml"),
            Some(MediaType::Xml)
        );
        assert_eq!(
            MediaType::from_content_type("application/x-www-form-urlencoded"),
            Some(MediaType::FormUrlencoded)
        );
        assert_eq!(
            MediaType::from_content_type("application/octet-stream"),
            Some(MediaType::OctetStream)
        );
        assert_eq!(
            MediaType::from_content_type("text/html"),
            Some(MediaType::Html)
        );
    }

    #[test]
    fn test_from_content_type_ignores_parameters() {
        assert_eq!(
            MediaType::from_content_type("application/json; charset=utf-8"),
            Some(MediaType::Json)
        );
        assert_eq!(
            MediaType::from_content_type("text/html;charset=ISO-8859-4"),
            Some(MediaType::Html)
        );
        assert_eq!(
            MediaType::from_content_type("  application/xml ; q=0.9"),
            Some(MediaType::Xml)
        );
    }

    #[test]
    fn test_from_content_type_case_insensitive() {
        assert_eq!(
            MediaType::from_content_type("Application/JSON"),
            Some(MediaType::Json)
        );
        assert_eq!(
            MediaType::from_content_type("TEXT/HTML"),
            Some(MediaType::Html)
        );
    }

    #[test]
    fn test_from_content_type_unknown() {
        // Unrecognized values are terminal, never a default
        assert_eq!(MediaType::from_content_type("text/plain"), None);
        assert_eq!(MediaType::from_content_type("application/protobuf"), None);
        assert_eq!(MediaType::from_content_type(""), None);
        assert_eq!(MediaType::from_content_type("json"), None);
    }

    #[test]
    fn test_as_str_round_trips() {
        for media in [
            MediaType::FormUrlencoded,
            MediaType::Json,
            MediaType::Xml,
            MediaType::OctetStream,
            MediaType::Html,
        ] {
            assert_eq!(MediaType::from_content_type(media.as_str()), Some(media));
        }
    }
}
