use crate::environ::Environ;

use http::StatusCode;

/// Synchronous web application invoked once per API Gateway event.
///
/// The application reads the request from the [`Environ`] (including the body via
/// [`Environ::input`]) and may write diagnostics to [`Environ::errors`]. Any error it returns is
/// propagated to the Lambda runtime unchanged.
///
/// This trait is implemented for any `Fn(&mut Environ<C>) -> Result<AppResponse, E>`.
pub trait Application<C> {
  /// Error returned when the application fails to produce a response.
  type Error;

  /// Handle a single request.
  fn call(&self, environ: &mut Environ<C>) -> Result<AppResponse, Self::Error>;
}

impl<C, F, E> Application<C> for F
where
  F: Fn(&mut Environ<C>) -> Result<AppResponse, E>,
{
  type Error = E;

  fn call(&self, environ: &mut Environ<C>) -> Result<AppResponse, Self::Error> {
    self(environ)
  }
}

/// Response produced by an [`Application`].
///
/// Header names are case-preserving and may repeat (e.g., multiple `Set-Cookie` headers).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppResponse {
  /// HTTP status code.
  pub status: StatusCode,
  /// Response headers in the order they were emitted.
  pub headers: Vec<(String, String)>,
  /// Response body.
  pub body: Vec<u8>,
}

impl AppResponse {
  /// Create an empty response with the given status code.
  pub fn new(status: StatusCode) -> Self {
    Self {
      status,
      headers: Vec::new(),
      body: Vec::new(),
    }
  }

  /// Append a header.
  pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.headers.push((name.into(), value.into()));
    self
  }

  /// Replace the body.
  pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
    self.body = body.into();
    self
  }
}
