/// Adapter settings that control how default environ values are resolved.
///
/// The defaults match a REST API deployed behind the default API Gateway domain:
///
/// | Setting | Default |
/// |---|---|
/// | [`gateway_domain_suffix`](AdapterConfig::gateway_domain_suffix) | `.amazonaws.com` |
/// | [`default_server_name`](AdapterConfig::default_server_name) | `lambda` |
/// | [`default_server_port`](AdapterConfig::default_server_port) | `80` |
/// | [`default_url_scheme`](AdapterConfig::default_url_scheme) | `http` |
/// | [`server_protocol`](AdapterConfig::server_protocol) | `HTTP/1.1` |
///
/// # Example
///
/// ```rust
/// use lambda_environ::AdapterConfig;
///
/// let config = AdapterConfig::default().with_default_url_scheme("https");
/// assert_eq!(config.default_url_scheme(), "https");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdapterConfig {
  gateway_domain_suffix: String,
  default_server_name: String,
  default_server_port: String,
  default_url_scheme: String,
  server_protocol: String,
}

impl AdapterConfig {
  /// Host suffix identifying requests made through the API Gateway default domain.
  ///
  /// When the `Host` header ends with this suffix, the application is assumed to be mounted under
  /// `/{stage}` and `SCRIPT_NAME` is set accordingly. Custom domains see an empty `SCRIPT_NAME`.
  pub fn gateway_domain_suffix(&self) -> &str {
    &self.gateway_domain_suffix
  }

  /// `SERVER_NAME` used when the request has no `Host` header.
  pub fn default_server_name(&self) -> &str {
    &self.default_server_name
  }

  /// `SERVER_PORT` used when the request has no `X-Forwarded-Port` header.
  pub fn default_server_port(&self) -> &str {
    &self.default_server_port
  }

  /// URL scheme used when the request has no `X-Forwarded-Proto` header.
  pub fn default_url_scheme(&self) -> &str {
    &self.default_url_scheme
  }

  /// Value of `SERVER_PROTOCOL`.
  pub fn server_protocol(&self) -> &str {
    &self.server_protocol
  }

  /// Override the host suffix of the API Gateway default domain.
  pub fn with_gateway_domain_suffix(mut self, suffix: impl Into<String>) -> Self {
    self.gateway_domain_suffix = suffix.into();
    self
  }

  /// Override the fallback `SERVER_NAME`.
  pub fn with_default_server_name(mut self, server_name: impl Into<String>) -> Self {
    self.default_server_name = server_name.into();
    self
  }

  /// Override the fallback `SERVER_PORT`.
  pub fn with_default_server_port(mut self, server_port: impl Into<String>) -> Self {
    self.default_server_port = server_port.into();
    self
  }

  /// Override the fallback URL scheme.
  pub fn with_default_url_scheme(mut self, url_scheme: impl Into<String>) -> Self {
    self.default_url_scheme = url_scheme.into();
    self
  }

  /// Override `SERVER_PROTOCOL`.
  pub fn with_server_protocol(mut self, server_protocol: impl Into<String>) -> Self {
    self.server_protocol = server_protocol.into();
    self
  }
}

impl Default for AdapterConfig {
  fn default() -> Self {
    Self {
      gateway_domain_suffix: ".amazonaws.com".to_string(),
      default_server_name: "lambda".to_string(),
      default_server_port: "80".to_string(),
      default_url_scheme: "http".to_string(),
      server_protocol: "HTTP/1.1".to_string(),
    }
  }
}
