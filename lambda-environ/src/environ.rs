use crate::config::AdapterConfig;
use crate::encoding::{url_encode, NativeString};
use crate::event::GatewayEvent;

use headers::{ContentLength, ContentType, Header, Host};
use indexmap::IndexMap;
use serde_json::{Map, Value};

use std::borrow::Cow;
use std::io::{Cursor, Write};

const X_FORWARDED_FOR: &str = "X-Forwarded-For";
const X_FORWARDED_PORT: &str = "X-Forwarded-Port";
const X_FORWARDED_PROTO: &str = "X-Forwarded-Proto";

/// Request environment passed to an [`Application`](crate::Application).
///
/// Each field corresponds to a key of the CGI-style environ dictionary (e.g., `PATH_INFO`).
/// String-valued fields can also be looked up by key via [`get`](Environ::get). All fixed string
/// values are [`NativeString`]s; request headers are mirrored unmodified in
/// [`http_headers`](Environ::http_headers).
#[derive(Debug)]
pub struct Environ<C> {
  /// `API_GATEWAY_AUTHORIZER`: output of the API Gateway authorizer, if any.
  pub api_gateway_authorizer: Option<Map<String, Value>>,
  /// `CONTENT_LENGTH`.
  pub content_length: NativeString,
  /// `CONTENT_TYPE`.
  pub content_type: NativeString,
  /// `PATH_INFO`.
  pub path_info: NativeString,
  /// `QUERY_STRING`.
  pub query_string: NativeString,
  /// `REMOTE_ADDR`.
  pub remote_addr: NativeString,
  /// `REMOTE_USER`.
  pub remote_user: NativeString,
  /// `REQUEST_METHOD`.
  pub request_method: NativeString,
  /// `SCRIPT_NAME`: path prefix the application is mounted under.
  pub script_name: NativeString,
  /// `SERVER_NAME`.
  pub server_name: NativeString,
  /// `SERVER_PORT`.
  pub server_port: NativeString,
  /// `SERVER_PROTOCOL`.
  pub server_protocol: NativeString,
  /// `wsgi.url_scheme`.
  pub url_scheme: NativeString,
  /// `context`: the invocation context supplied by the platform.
  pub context: C,
  /// `wsgi.input`: request body.
  pub input: Cursor<Vec<u8>>,
  /// `wsgi.errors`: diagnostic output written by the application.
  pub errors: ErrorSink,
  /// `wsgi.multiprocess`.
  pub multiprocess: bool,
  /// `wsgi.multithread`.
  pub multithread: bool,
  /// `wsgi.run_once`.
  pub run_once: bool,
  /// `wsgi.version`.
  pub version: (u8, u8),
  /// `HTTP_*` keys derived from the request headers, in request order.
  pub http_headers: IndexMap<String, String>,
}

impl<C> Environ<C> {
  /// Look up a string-valued environ key (e.g., `SCRIPT_NAME` or `HTTP_ACCEPT`).
  pub fn get(&self, key: &str) -> Option<&str> {
    let value = match key {
      "CONTENT_LENGTH" => &self.content_length,
      "CONTENT_TYPE" => &self.content_type,
      "PATH_INFO" => &self.path_info,
      "QUERY_STRING" => &self.query_string,
      "REMOTE_ADDR" => &self.remote_addr,
      "REMOTE_USER" => &self.remote_user,
      "REQUEST_METHOD" => &self.request_method,
      "SCRIPT_NAME" => &self.script_name,
      "SERVER_NAME" => &self.server_name,
      "SERVER_PORT" => &self.server_port,
      "SERVER_PROTOCOL" => &self.server_protocol,
      "wsgi.url_scheme" => &self.url_scheme,
      _ => return self.http_headers.get(key).map(String::as_str),
    };
    Some(value.as_str())
  }

  /// Look up a request header by its HTTP name (e.g., `Accept`) through its `HTTP_*` key.
  ///
  /// `Content-Type` and `Content-Length` are only available through
  /// [`content_type`](Environ::content_type) and [`content_length`](Environ::content_length).
  pub fn http_header(&self, name: &str) -> Option<&str> {
    self
      .http_headers
      .get(&header_environ_key(name))
      .map(String::as_str)
  }
}

/// Writable sink collecting diagnostic output from the application (`wsgi.errors`).
#[derive(Debug, Default)]
pub struct ErrorSink(Vec<u8>);

impl ErrorSink {
  /// Return `true` if nothing has been written.
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Return the captured output, replacing any invalid UTF-8.
  pub fn contents(&self) -> Cow<'_, str> {
    String::from_utf8_lossy(&self.0)
  }
}

impl Write for ErrorSink {
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    self.0.write(buf)
  }

  fn flush(&mut self) -> std::io::Result<()> {
    Ok(())
  }
}

/// Derive the environ key for a request header: `HTTP_` followed by the upper-cased name with `-`
/// replaced by `_` (e.g., `X-Forwarded-For` becomes `HTTP_X_FORWARDED_FOR`).
pub fn header_environ_key(name: &str) -> String {
  format!("HTTP_{}", name.to_uppercase().replace('-', "_"))
}

/// Builds an [`Environ`] from a [`GatewayEvent`].
///
/// Each default-resolution rule is exposed as a method returning the untranscoded text value.
/// [`build`](EnvironBuilder::build) computes all of them and then transcodes them into
/// [`NativeString`]s in a single pass.
#[derive(Clone, Copy, Debug)]
pub struct EnvironBuilder<'a> {
  event: &'a GatewayEvent,
  config: &'a AdapterConfig,
}

impl<'a> EnvironBuilder<'a> {
  /// Create a builder for the given event.
  pub fn new(event: &'a GatewayEvent, config: &'a AdapterConfig) -> Self {
    Self { event, config }
  }

  fn header(&self, name: &str) -> Option<&'a str> {
    self.event.headers.get(name)
  }

  fn body(&self) -> &'a str {
    self.event.body.as_deref().unwrap_or_default()
  }

  /// `SCRIPT_NAME`: `/{stage}` for requests through the API Gateway default domain (which prefixes
  /// every path with the stage name), otherwise empty.
  pub fn script_name(&self) -> String {
    let host = self.header(Host::name().as_str()).unwrap_or_default();
    if host.ends_with(self.config.gateway_domain_suffix()) {
      format!(
        "/{}",
        self.event.request_context.stage.as_deref().unwrap_or_default()
      )
    } else {
      String::new()
    }
  }

  /// `CONTENT_LENGTH`: the `Content-Length` header, or else the length of the body in bytes.
  pub fn content_length(&self) -> String {
    self
      .header(ContentLength::name().as_str())
      .map(str::to_owned)
      .unwrap_or_else(|| self.body().len().to_string())
  }

  /// `CONTENT_TYPE`: the `Content-Type` header, or else empty.
  pub fn content_type(&self) -> String {
    self
      .header(ContentType::name().as_str())
      .unwrap_or_default()
      .to_owned()
  }

  /// `PATH_INFO`: the request path, verbatim.
  pub fn path_info(&self) -> String {
    self.event.path.clone()
  }

  /// `QUERY_STRING`: the URL-encoded query string parameters.
  pub fn query_string(&self) -> String {
    url_encode(
      self
        .event
        .query_string_parameters
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str())),
    )
  }

  /// `REMOTE_ADDR`: the first (client) address listed in `X-Forwarded-For`, or else empty.
  pub fn remote_addr(&self) -> String {
    self
      .header(X_FORWARDED_FOR)
      .and_then(|forwarded_for| forwarded_for.split(',').next())
      .unwrap_or_default()
      .trim()
      .to_owned()
  }

  /// `REMOTE_USER`: the authorizer's `principalId`, or else empty.
  pub fn remote_user(&self) -> String {
    self
      .event
      .request_context
      .principal_id()
      .unwrap_or_default()
  }

  /// `REQUEST_METHOD`: the HTTP method, verbatim.
  pub fn request_method(&self) -> String {
    self.event.http_method.clone()
  }

  /// `SERVER_NAME`: the `Host` header, or else the configured default.
  pub fn server_name(&self) -> String {
    self
      .header(Host::name().as_str())
      .unwrap_or(self.config.default_server_name())
      .to_owned()
  }

  /// `SERVER_PORT`: the `X-Forwarded-Port` header, or else the configured default.
  pub fn server_port(&self) -> String {
    self
      .header(X_FORWARDED_PORT)
      .unwrap_or(self.config.default_server_port())
      .to_owned()
  }

  /// `wsgi.url_scheme`: the `X-Forwarded-Proto` header, or else the configured default.
  pub fn url_scheme(&self) -> String {
    self
      .header(X_FORWARDED_PROTO)
      .unwrap_or(self.config.default_url_scheme())
      .to_owned()
  }

  /// `HTTP_*` keys for every request header except `Content-Type` and `Content-Length`.
  pub fn http_headers(&self) -> IndexMap<String, String> {
    let excluded = [
      header_environ_key(ContentType::name().as_str()),
      header_environ_key(ContentLength::name().as_str()),
    ];
    self
      .event
      .headers
      .iter()
      .map(|(name, value)| (header_environ_key(name), value.to_owned()))
      .filter(|(key, _)| !excluded.contains(key))
      .collect()
  }

  /// Build the environ, attaching the platform's invocation `context`.
  pub fn build<C>(&self, context: C) -> Environ<C> {
    let body = NativeString::from_text(self.body());

    Environ {
      api_gateway_authorizer: self.event.request_context.authorizer.clone(),
      content_length: NativeString::from_text(&self.content_length()),
      content_type: NativeString::from_text(&self.content_type()),
      path_info: NativeString::from_text(&self.path_info()),
      query_string: NativeString::from_text(&self.query_string()),
      remote_addr: NativeString::from_text(&self.remote_addr()),
      remote_user: NativeString::from_text(&self.remote_user()),
      request_method: NativeString::from_text(&self.request_method()),
      script_name: NativeString::from_text(&self.script_name()),
      server_name: NativeString::from_text(&self.server_name()),
      server_port: NativeString::from_text(&self.server_port()),
      server_protocol: NativeString::from_text(self.config.server_protocol()),
      url_scheme: NativeString::from_text(&self.url_scheme()),
      context,
      input: Cursor::new(body.to_bytes()),
      errors: ErrorSink::default(),
      multiprocess: false,
      multithread: false,
      run_once: false,
      version: (1, 0),
      http_headers: self.http_headers(),
    }
  }
}

/// Build the [`Environ`] for `event` using the default resolution rules of [`EnvironBuilder`].
pub fn build_environ<C>(event: &GatewayEvent, context: C, config: &AdapterConfig) -> Environ<C> {
  EnvironBuilder::new(event, config).build(context)
}
