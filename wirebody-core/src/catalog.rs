//! Code-indexed message catalogs and error construction.
//!
//! Messages are resolved when an [`Error`] is built: the caller's catalog
//! is consulted first, then the process-wide common catalog, then a
//! failsafe `Unknown error` template with the arguments discarded so a
//! template/argument mismatch can never produce a malformed message.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::sync::LazyLock;

use crate::error::{Code, Error};

/// Mapping from error code to message template.
///
/// Templates may contain `{}` placeholders, filled positionally by the
/// arguments passed to [`Error::new`].
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    templates: HashMap<Code, Cow<'static, str>>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a template, builder style.
    pub fn with(mut self, code: Code, template: impl Into<Cow<'static, str>>) -> Self {
        self.define(code, template);
        self
    }

    /// Add or replace a template.
    pub fn define(&mut self, code: Code, template: impl Into<Cow<'static, str>>) {
        self.templates.insert(code, template.into());
    }

    /// Look up the template for a code.
    pub fn template(&self, code: Code) -> Option<&str> {
        self.templates.get(&code).map(Cow::as_ref)
    }
}

/// The process-wide catalog for the reserved common codes.
///
/// Initialized on first use and never mutated afterwards, so it can be
/// consulted from any number of request-handling tasks without locking.
pub fn common_catalog() -> &'static Catalog {
    static COMMON: LazyLock<Catalog> = LazyLock::new(|| {
        Catalog::new()
            .with(Code::UNKNOWN, "Unknown error")
            .with(Code::INTERNAL, "Internal error: {}")
            .with(Code::UNSUPPORTED_MEDIA_TYPE, "Unsupported media type: {}")
            .with(Code::SERIALIZATION_FAILED, "Serialization failed: {}")
            .with(Code::DESERIALIZATION_FAILED, "Deserialization failed: {}")
            .with(
                Code::IDENTIFIER_MISMATCH,
                "Resource identifier in URL doesn't match value in body",
            )
    });
    &COMMON
}

/// Fill `{}` placeholders left to right.
///
/// Surplus arguments are ignored and unmatched placeholders are kept
/// verbatim, so expansion cannot fail however the template and argument
/// list line up.
fn expand(template: &str, args: &[&dyn fmt::Display]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut rest = template;
    while let Some(at) = rest.find("{}") {
        out.push_str(&rest[..at]);
        match args.next() {
            Some(arg) => {
                let _ = write!(out, "{arg}");
            }
            None => out.push_str("{}"),
        }
        rest = &rest[at + 2..];
    }
    out.push_str(rest);
    out
}

impl Error {
    /// Build an error, resolving its message through `catalog` and then
    /// the common catalog.
    ///
    /// An unrecognized code falls back to the common `Unknown error`
    /// template with `args` discarded. Never fails, never yields an empty
    /// message, and the same inputs always produce the same message.
    pub fn new(catalog: Option<&Catalog>, code: Code, args: &[&dyn fmt::Display]) -> Self {
        let template = catalog
            .and_then(|c| c.template(code))
            .or_else(|| common_catalog().template(code));

        let message = match template {
            Some(template) => expand(template, args),
            None => expand(
                common_catalog()
                    .template(Code::UNKNOWN)
                    .unwrap_or("Unknown error"),
                &[],
            ),
        };

        Error {
            code,
            message,
            stack: None,
        }
    }

    /// `Unknown(0)`.
    pub fn unknown() -> Self {
        Self::new(None, Code::UNKNOWN, &[])
    }

    /// `Internal(1)`, wrapping an unstructured fault.
    pub fn internal(cause: impl fmt::Display) -> Self {
        Self::new(None, Code::INTERNAL, &[&cause])
    }

    /// `UnsupportedMediaType(2)`, carrying the raw declared type.
    pub fn unsupported_media_type(raw: impl fmt::Display) -> Self {
        Self::new(None, Code::UNSUPPORTED_MEDIA_TYPE, &[&raw])
    }

    /// `SerializationFailed(3)`, carrying the underlying cause.
    pub fn serialization_failed(cause: impl fmt::Display) -> Self {
        Self::new(None, Code::SERIALIZATION_FAILED, &[&cause])
    }

    /// `DeserializationFailed(4)`, carrying the underlying cause.
    pub fn deserialization_failed(cause: impl fmt::Display) -> Self {
        Self::new(None, Code::DESERIALIZATION_FAILED, &[&cause])
    }

    /// `IdentifierMismatch(5)`.
    pub fn identifier_mismatch() -> Self {
        Self::new(None, Code::IDENTIFIER_MISMATCH, &[])
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_messages() {
        assert_eq!(Error::unknown().message(), "Unknown error");
        assert_eq!(Error::internal("boom").message(), "Internal error: boom");
        assert_eq!(
            Error::unsupported_media_type("text/weird").message(),
            "Unsupported media type: text/weird"
        );
        assert_eq!(
            Error::serialization_failed("cause").message(),
            "Serialization failed: cause"
        );
        assert_eq!(
            Error::deserialization_failed("cause").message(),
            "Deserialization failed: cause"
        );
        assert_eq!(
            Error::identifier_mismatch().message(),
            "Resource identifier in URL doesn't match value in body"
        );
    }

    #[test]
    fn test_unknown_code_discards_args() {
        // An unrecognized code must not let the supplied arguments reach
        // (or break) the output
        let err = Error::new(None, Code(99999), &[&"ignored-arg"]);
        assert_eq!(err.code(), Code(99999));
        assert_eq!(err.message(), "Unknown error");
    }

    #[test]
    fn test_deterministic_formatting() {
        let first = Error::new(None, Code::UNSUPPORTED_MEDIA_TYPE, &[&"text/weird"]);
        for _ in 0..3 {
            let again = Error::new(None, Code::UNSUPPORTED_MEDIA_TYPE, &[&"text/weird"]);
            assert_eq!(again.message(), first.message());
        }
    }

    #[test]
    fn test_caller_catalog_wins() {
        let catalog = Catalog::new()
            .with(Code::SERVICE_BASE, "widget {} is on fire")
            .with(Code::INTERNAL, "caller override: {}");

        let err = Error::new(Some(&catalog), Code::SERVICE_BASE, &[&7]);
        assert_eq!(err.message(), "widget 7 is on fire");

        // Caller templates shadow common ones for the same code
        let err = Error::new(Some(&catalog), Code::INTERNAL, &[&"x"]);
        assert_eq!(err.message(), "caller override: x");

        // Codes the caller catalog lacks still resolve through the common one
        let err = Error::new(Some(&catalog), Code::UNKNOWN, &[]);
        assert_eq!(err.message(), "Unknown error");
    }

    #[test]
    fn test_expand_surplus_args_ignored() {
        let err = Error::new(None, Code::IDENTIFIER_MISMATCH, &[&"extra", &"args"]);
        assert_eq!(
            err.message(),
            "Resource identifier in URL doesn't match value in body"
        );
    }

    #[test]
    fn test_expand_missing_args_keep_placeholder() {
        let catalog = Catalog::new().with(Code::SERVICE_BASE, "{} and {}");
        let err = Error::new(Some(&catalog), Code::SERVICE_BASE, &[&"one"]);
        assert_eq!(err.message(), "one and {}");
    }

    #[test]
    fn test_template_verbatim_without_args() {
        let catalog = Catalog::new().with(Code::SERVICE_BASE, "fixed {} message");
        let err = Error::new(Some(&catalog), Code::SERVICE_BASE, &[]);
        assert_eq!(err.message(), "fixed {} message");
    }

    #[test]
    fn test_define_replaces() {
        let mut catalog = Catalog::new();
        catalog.define(Code::SERVICE_BASE, "first");
        catalog.define(Code::SERVICE_BASE, "second");
        assert_eq!(catalog.template(Code::SERVICE_BASE), Some("second"));
    }
}
