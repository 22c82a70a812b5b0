//! Canonical callback URL construction.
//!
//! A callback URL is `{base}/{entity}[/{segment}...][/error]`. Absent or
//! blank segments (for example an optional party sub-identifier) are
//! dropped, and the literal `error` segment is appended exactly once when
//! the callback reports a failure. Building is pure: the same spec always
//! renders the same URL.

use thiserror::Error;
use url::Url;

use crate::EntityCategory;

const ERROR_SEGMENT: &str = "error";

/// Errors raised while assembling a [`UrlSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlSpecError {
    /// The participant base URL was empty after trimming.
    #[error("callback base URL must not be empty")]
    EmptyBaseUrl,
    /// The participant base URL is not an absolute URL.
    #[error("callback base URL {base_url} is invalid: {message}")]
    InvalidBaseUrl {
        /// Rejected base URL.
        base_url: String,
        /// Parser diagnostic.
        message: String,
    },
}

/// Description of a callback resource URL.
///
/// # Examples
/// ```
/// use fspiop::{EntityCategory, UrlSpec};
///
/// let url = UrlSpec::new("http://bankb.example/", EntityCategory::Parties)?
///     .segment("MSISDN")
///     .segment("123456")
///     .optional_segment(None::<String>)
///     .error_path(true)
///     .build();
/// assert_eq!(url, "http://bankb.example/parties/MSISDN/123456/error");
/// # Ok::<(), fspiop::UrlSpecError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlSpec {
    base_url: String,
    entity: EntityCategory,
    segments: Vec<String>,
    is_error_path: bool,
}

impl UrlSpec {
    /// Start a spec rooted at `base_url` for the given resource.
    ///
    /// # Errors
    ///
    /// Returns [`UrlSpecError::EmptyBaseUrl`] for blank input and
    /// [`UrlSpecError::InvalidBaseUrl`] when the value is not absolute.
    pub fn new(base_url: impl Into<String>, entity: EntityCategory) -> Result<Self, UrlSpecError> {
        let raw = base_url.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UrlSpecError::EmptyBaseUrl);
        }
        Url::parse(trimmed).map_err(|error| UrlSpecError::InvalidBaseUrl {
            base_url: raw.clone(),
            message: error.to_string(),
        })?;
        Ok(Self {
            base_url: trimmed.trim_end_matches('/').to_owned(),
            entity,
            segments: Vec::new(),
            is_error_path: false,
        })
    }

    /// Append a path segment; blank values are dropped.
    #[must_use]
    pub fn segment(self, value: impl Into<String>) -> Self {
        self.optional_segment(Some(value))
    }

    /// Append a segment that may be absent.
    #[must_use]
    pub fn optional_segment<S: Into<String>>(mut self, value: Option<S>) -> Self {
        if let Some(value) = value {
            let value = value.into();
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                self.segments.push(trimmed.to_owned());
            }
        }
        self
    }

    /// Append every segment from an ordered list, dropping absent ones.
    #[must_use]
    pub fn segments<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        values
            .into_iter()
            .fold(self, |spec, value| spec.optional_segment(value))
    }

    /// Mark the URL as an error callback.
    #[must_use]
    pub fn error_path(mut self, is_error_path: bool) -> Self {
        self.is_error_path = is_error_path;
        self
    }

    /// Resource category the URL is rooted at.
    #[must_use]
    pub const fn entity(&self) -> EntityCategory {
        self.entity
    }

    /// Whether the URL terminates in the `error` segment.
    #[must_use]
    pub const fn is_error_path(&self) -> bool {
        self.is_error_path
    }

    /// Path portion of the URL (without the base), as declared in the
    /// `fspiop-uri` header.
    #[must_use]
    pub fn path(&self) -> String {
        let mut path = format!("/{}", self.entity.as_path());
        for segment in &self.segments {
            path.push('/');
            path.push_str(segment);
        }
        if self.is_error_path {
            path.push('/');
            path.push_str(ERROR_SEGMENT);
        }
        path
    }

    /// Render the full callback URL.
    #[must_use]
    pub fn build(&self) -> String {
        format!("{}{}", self.base_url, self.path())
    }
}
