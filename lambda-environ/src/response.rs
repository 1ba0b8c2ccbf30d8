use crate::application::AppResponse;
use crate::casing::all_casings;
use crate::environ::ErrorSink;
use crate::error::EventError;

use backtrace::Backtrace;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

const SET_COOKIE: &str = "Set-Cookie";

/// Lambda proxy integration response returned to API Gateway.
///
/// Header names are unique, so repeated headers can't be represented directly (see
/// [`translate_response`]).
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
  /// HTTP status code.
  pub status_code: u16,
  /// Response headers.
  pub headers: IndexMap<String, String>,
  /// Response body.
  pub body: String,
}

/// Translate an application response into the API Gateway response format.
///
/// Anything the application wrote to `errors` is logged as a warning.
///
/// A single `Set-Cookie` header is passed through unchanged. Since API Gateway drops all but one
/// header with a given name, two or more `Set-Cookie` headers are each renamed to a different
/// upper/lower-case spelling of `Set-Cookie` (see [`all_casings`]), preserving their order and
/// values. `Set-Cookie` headers are recognized regardless of case and follow all other headers in
/// the output. If any other header name repeats, the last value wins.
///
/// The body is decoded as UTF-8, with invalid sequences replaced by U+FFFD.
pub fn translate_response(
  response: AppResponse,
  errors: &ErrorSink,
) -> Result<GatewayResponse, EventError> {
  if !errors.is_empty() {
    log::warn!("{}", errors.contents());
  }

  let AppResponse {
    status,
    headers,
    body,
  } = response;

  let (cookie_headers, mut new_headers): (Vec<_>, Vec<_>) = headers
    .into_iter()
    .partition(|(name, _)| name.eq_ignore_ascii_case(SET_COOKIE));

  if cookie_headers.len() > 1 {
    new_headers.extend(case_distinct_headers(
      SET_COOKIE,
      cookie_headers.into_iter().map(|(_, value)| value),
    )?);
  } else {
    new_headers.extend(cookie_headers);
  }

  let body = String::from_utf8(body).unwrap_or_else(|err| {
    log::warn!("Response body is not valid UTF-8: {err}");
    String::from_utf8_lossy(err.as_bytes()).into_owned()
  });

  Ok(GatewayResponse {
    status_code: status.as_u16(),
    headers: new_headers.into_iter().collect(),
    body,
  })
}

/// Pair each value with a distinct case variant of `name`, in generation order.
fn case_distinct_headers<I>(name: &str, values: I) -> Result<Vec<(String, String)>, EventError>
where
  I: ExactSizeIterator<Item = String>,
{
  let count = values.len();
  let casings = all_casings(name);

  if let Some(available) = casings.variant_count().filter(|available| *available < count) {
    return Err(EventError::CookieCasingsExhausted {
      cookies: count,
      available,
      backtrace: Backtrace::new(),
    });
  }

  let headers = casings.zip(values).collect::<Vec<_>>();
  log::debug!("Renamed {count} `{name}` headers to distinct case variants");
  Ok(headers)
}

#[cfg(test)]
mod tests {
  use super::{case_distinct_headers, translate_response};
  use crate::application::AppResponse;
  use crate::environ::ErrorSink;
  use crate::error::EventError;

  use http::StatusCode;
  use pretty_assertions::assert_eq;

  use std::collections::HashSet;
  use std::io::Write;

  fn header_pairs(headers: &indexmap::IndexMap<String, String>) -> Vec<(&str, &str)> {
    headers
      .iter()
      .map(|(k, v)| (k.as_str(), v.as_str()))
      .collect()
  }

  #[test]
  fn test_no_cookies() {
    let response = AppResponse::new(StatusCode::OK)
      .with_header("Content-Type", "text/plain")
      .with_body("hello");
    let output = translate_response(response, &ErrorSink::default()).unwrap();

    assert_eq!(output.status_code, 200);
    assert_eq!(
      header_pairs(&output.headers),
      vec![("Content-Type", "text/plain")]
    );
    assert_eq!(output.body, "hello");
  }

  #[test]
  fn test_single_cookie_passthrough() {
    let response = AppResponse::new(StatusCode::FOUND)
      .with_header("Set-Cookie", "a=1")
      .with_header("Location", "/home");
    let output = translate_response(response, &ErrorSink::default()).unwrap();

    assert_eq!(output.status_code, 302);
    assert_eq!(
      header_pairs(&output.headers),
      vec![("Location", "/home"), ("Set-Cookie", "a=1")]
    );

    let response = AppResponse::new(StatusCode::OK).with_header("set-cookie", "a=1");
    let output = translate_response(response, &ErrorSink::default()).unwrap();
    assert_eq!(header_pairs(&output.headers), vec![("set-cookie", "a=1")]);
  }

  #[test]
  fn test_two_cookies() {
    let response = AppResponse::new(StatusCode::OK)
      .with_header("Set-Cookie", "a=1")
      .with_header("Content-Type", "text/html")
      .with_header("Set-Cookie", "b=2");
    let output = translate_response(response, &ErrorSink::default()).unwrap();

    assert_eq!(
      header_pairs(&output.headers),
      vec![
        ("Content-Type", "text/html"),
        ("set-cookie", "a=1"),
        ("Set-cookie", "b=2"),
      ]
    );
  }

  #[test]
  fn test_many_cookies_mixed_case() {
    let cookies = (0..20).map(|i| format!("c{i}={i}")).collect::<Vec<_>>();
    let response = cookies
      .iter()
      .enumerate()
      .fold(AppResponse::new(StatusCode::OK), |response, (i, cookie)| {
        let name = if i % 2 == 0 { "Set-Cookie" } else { "SET-COOKIE" };
        response.with_header(name, cookie.as_str())
      });
    let output = translate_response(response, &ErrorSink::default()).unwrap();

    assert_eq!(output.headers.len(), 20);
    assert_eq!(
      output
        .headers
        .keys()
        .map(|k| k.to_ascii_lowercase())
        .collect::<HashSet<_>>(),
      HashSet::from(["set-cookie".to_string()])
    );
    assert_eq!(output.headers.values().cloned().collect::<Vec<_>>(), cookies);
  }

  #[test]
  fn test_cookie_casings_exhausted() {
    let err = case_distinct_headers(
      "a",
      vec!["1".to_string(), "2".to_string(), "3".to_string()].into_iter(),
    )
    .unwrap_err();
    match err {
      EventError::CookieCasingsExhausted {
        cookies, available, ..
      } => {
        assert_eq!(cookies, 3);
        assert_eq!(available, 2);
      }
      other => panic!("unexpected error: {other:?}"),
    }

    let response = (0..513).fold(AppResponse::new(StatusCode::OK), |response, i| {
      response.with_header("Set-Cookie", format!("c{i}={i}"))
    });
    let err = translate_response(response, &ErrorSink::default()).unwrap_err();
    assert_eq!(err.name(), "CookieCasingsExhausted");
  }

  #[test]
  fn test_duplicate_header_last_wins() {
    let response = AppResponse::new(StatusCode::OK)
      .with_header("X-Id", "1")
      .with_header("Vary", "Accept")
      .with_header("X-Id", "2");
    let output = translate_response(response, &ErrorSink::default()).unwrap();
    assert_eq!(
      header_pairs(&output.headers),
      vec![("X-Id", "2"), ("Vary", "Accept")]
    );
  }

  #[test]
  fn test_errors_do_not_affect_output() {
    let mut errors = ErrorSink::default();
    write!(errors, "something went sideways").unwrap();

    let response = AppResponse::new(StatusCode::OK).with_body("ok");
    let output = translate_response(response, &errors).unwrap();
    assert_eq!(output.status_code, 200);
    assert!(output.headers.is_empty());
    assert_eq!(output.body, "ok");
  }

  #[test]
  fn test_invalid_utf8_body() {
    let response = AppResponse::new(StatusCode::OK).with_body(vec![b'o', 0xff, b'k']);
    let output = translate_response(response, &ErrorSink::default()).unwrap();
    assert_eq!(output.body, "o\u{fffd}k");
  }

  #[test]
  fn test_serialize() {
    let response = AppResponse::new(StatusCode::CREATED)
      .with_header("Set-Cookie", "a=1")
      .with_header("Set-Cookie", "b=2")
      .with_body("done");
    let output = translate_response(response, &ErrorSink::default()).unwrap();
    assert_eq!(
      serde_json::to_string(&output).unwrap(),
      r#"{"statusCode":201,"headers":{"set-cookie":"a=1","Set-cookie":"b=2"},"body":"done"}"#
    );
  }
}
