use lambda_environ::{AppResponse, Application, Environ, StatusCode};
use thiserror::Error;

use std::io::{Read, Write};

/// Example handler error type.
#[derive(Debug, Error)]
pub enum HelloError {
  #[error("failed to read request body")]
  ReadBody(#[source] std::io::Error),
  #[error("request data must be UTF-8 encoded")]
  Utf8(#[source] std::string::FromUtf8Error),
  #[error("failed to write diagnostics")]
  Diagnostics(#[source] std::io::Error),
}

/// Small application demonstrating request parsing, cookies, and error output.
///
/// Routes (relative to `SCRIPT_NAME`):
///  * `GET /` - greeting that includes the mount point and client address.
///  * `POST /echo` - echoes the request body and query string.
///  * `GET /login` - sets two cookies.
///  * anything else - 404, with a diagnostic written to the error sink.
pub struct HelloApp {
  greeting: String,
}

impl HelloApp {
  pub fn new(greeting: impl Into<String>) -> Self {
    Self {
      greeting: greeting.into(),
    }
  }

  fn text(status: StatusCode, body: String) -> AppResponse {
    AppResponse::new(status)
      .with_header("Content-Type", "text/plain; charset=utf-8")
      .with_body(body)
  }
}

impl<C> Application<C> for HelloApp {
  type Error = HelloError;

  fn call(&self, environ: &mut Environ<C>) -> Result<AppResponse, Self::Error> {
    let method = environ.request_method.to_string();
    let path = environ.path_info.decode().map_err(HelloError::Utf8)?;

    match (method.as_str(), path.as_str()) {
      ("GET", "/") => Ok(Self::text(
        StatusCode::OK,
        format!(
          "{}, {}! (mounted at `{}`)",
          self.greeting,
          if environ.remote_addr.is_empty() {
            "stranger"
          } else {
            environ.remote_addr.as_str()
          },
          environ.script_name,
        ),
      )),
      ("POST", "/echo") => {
        let mut body = Vec::new();
        environ
          .input
          .read_to_end(&mut body)
          .map_err(HelloError::ReadBody)?;
        let body = String::from_utf8(body).map_err(HelloError::Utf8)?;
        let query = environ.query_string.decode().map_err(HelloError::Utf8)?;
        Ok(Self::text(StatusCode::OK, format!("{body}\n{query}")))
      }
      ("GET", "/login") => Ok(
        AppResponse::new(StatusCode::NO_CONTENT)
          .with_header("Set-Cookie", "session=abc123; HttpOnly; Secure")
          .with_header("Set-Cookie", "theme=dark"),
      ),
      (method, _) => {
        writeln!(environ.errors, "no route for {method} {path}")
          .map_err(HelloError::Diagnostics)?;
        Ok(Self::text(StatusCode::NOT_FOUND, "Not Found".to_string()))
      }
    }
  }
}
