// Until std::error::Backtrace is fully stabilized, we can't embed a type named `Backtrace` within
// a thiserror::Error (see https://github.com/dtolnay/thiserror/issues/204).
use backtrace::Backtrace as _Backtrace;
use itertools::Itertools;
use thiserror::Error;

/// Error that occurred while adapting an API Gateway event to or from an application.
///
/// Errors returned by the application itself are never wrapped in this type; they are propagated
/// to the Lambda runtime unchanged.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EventError {
  /// Ran out of distinct header name spellings while renaming duplicate `Set-Cookie` headers.
  #[error(
    "response contains {cookies} `Set-Cookie` headers but only {available} distinct spellings \
     of the header name exist"
  )]
  CookieCasingsExhausted {
    /// Number of `Set-Cookie` headers in the application response.
    cookies: usize,
    /// Number of case-distinct spellings that could be generated.
    available: usize,
    /// Stack trace indicating where the error occurred.
    backtrace: _Backtrace,
  },
  /// The Lambda event payload is not a valid API Gateway proxy event.
  #[error("invalid API Gateway proxy event")]
  InvalidEvent(
    #[source] Box<serde_path_to_error::Error<serde_json::Error>>,
    _Backtrace,
  ),
}

impl EventError {
  /// Return the backtrace associated with the error, if known.
  pub fn backtrace(&self) -> Option<&_Backtrace> {
    match self {
      EventError::CookieCasingsExhausted { backtrace, .. }
      | EventError::InvalidEvent(_, backtrace) => Some(backtrace),
    }
  }

  /// Return the name of the error variant (e.g., `InvalidEvent`).
  pub fn name(&self) -> &str {
    match self {
      EventError::CookieCasingsExhausted { .. } => "CookieCasingsExhausted",
      EventError::InvalidEvent(_, _) => "InvalidEvent",
    }
  }
}

/// Helper function for formatting an error as a string containing a human-readable chain of causes.
///
/// This function will walk over the chain of causes returned by
/// [`Error::source`](std::error::Error::source) and append each underlying error (using the
/// [`Display`](std::fmt::Display) trait).
///
/// # Arguments
///
/// * `err` - Error to format.
/// * `name` - Optional name of the error type/variant (e.g., `EventError::InvalidEvent`).
/// * `backtrace` - Optional [`Backtrace`](backtrace::Backtrace) indicating where the top-level
///   error occurred.
pub fn format_error(
  err: &(dyn std::error::Error),
  name: Option<&str>,
  backtrace: Option<&_Backtrace>,
) -> String {
  let err_line = name
    .map(|n| format!("{}: {}", n, err))
    .unwrap_or_else(|| err.to_string());

  let top_error = if let Some(bt) = backtrace {
    format!("{err_line}\n  stack trace:\n{}", format_backtrace(bt, 4))
  } else {
    err_line
  };

  let cause_str = ErrorCauseIterator(err.source())
    .map(|cause| format!("  caused by: {cause}"))
    .join("\n");

  if !cause_str.is_empty() {
    format!("{top_error}\n{cause_str}")
  } else {
    top_error
  }
}

struct ErrorCauseIterator<'a>(Option<&'a (dyn std::error::Error + 'static)>);

impl<'a> Iterator for ErrorCauseIterator<'a> {
  type Item = &'a (dyn std::error::Error + 'static);

  fn next(&mut self) -> Option<Self::Item> {
    let current = self.0;
    self.0 = current.and_then(|err| err.source());
    current
  }
}

fn format_backtrace(backtrace: &_Backtrace, indent: usize) -> String {
  let indent_str = " ".repeat(indent);
  format!("{backtrace:?}")
    .lines()
    .map(|line| format!("{indent_str}{line}"))
    .join("\n")
}

#[cfg(test)]
mod tests {
  use super::{format_error, EventError};
  use crate::event::GatewayEvent;

  use backtrace::Backtrace;
  use serde_json::json;

  #[test]
  fn test_format_invalid_event() {
    let err = GatewayEvent::from_json(json!({
      "httpMethod": "GET",
      "path": 7,
      "headers": {},
      "requestContext": {},
    }))
    .unwrap_err();
    assert_eq!(err.name(), "InvalidEvent");

    let formatted = format_error(&err, Some(err.name()), None);
    assert!(
      formatted.starts_with("InvalidEvent: invalid API Gateway proxy event\n  caused by: path: "),
      "{formatted}"
    );
  }

  #[test]
  fn test_format_with_backtrace() {
    let err = EventError::CookieCasingsExhausted {
      cookies: 3,
      available: 2,
      backtrace: Backtrace::new(),
    };
    let formatted = format_error(&err, Some(err.name()), err.backtrace());
    assert!(
      formatted.starts_with(
        "CookieCasingsExhausted: response contains 3 `Set-Cookie` headers but only 2 distinct \
         spellings of the header name exist\n  stack trace:\n"
      ),
      "{formatted}"
    );
  }
}
