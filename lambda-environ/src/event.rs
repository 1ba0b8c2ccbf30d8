use crate::error::EventError;

use backtrace::Backtrace;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Inbound HTTP request delivered by an Amazon API Gateway REST API (Lambda proxy integration).
///
/// Only the fields consumed by the adapter are modeled; any other fields are ignored.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
  /// HTTP request method (e.g., `GET`).
  pub http_method: String,
  /// Request path as seen by API Gateway.
  pub path: String,
  /// Request headers. The field is required, but API Gateway sends `null` when there are none.
  #[serde(deserialize_with = "null_as_default")]
  pub headers: Headers,
  /// Query string parameters (single-valued).
  #[serde(default, deserialize_with = "null_as_default")]
  pub query_string_parameters: IndexMap<String, String>,
  /// Request body, if any.
  #[serde(default)]
  pub body: Option<String>,
  /// API Gateway request context.
  pub request_context: RequestContext,
}

impl GatewayEvent {
  /// Deserialize an event from the raw JSON payload passed to the Lambda function.
  pub fn from_json(payload: Value) -> Result<Self, EventError> {
    serde_path_to_error::deserialize(payload)
      .map_err(|err| EventError::InvalidEvent(Box::new(err), Backtrace::new()))
  }
}

/// Subset of the API Gateway request context used by the adapter.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
  /// Name of the API Gateway deployment stage (e.g., `dev`).
  #[serde(default)]
  pub stage: Option<String>,
  /// Output of the API Gateway authorizer, if the route is protected by one.
  #[serde(default)]
  pub authorizer: Option<Map<String, Value>>,
}

impl RequestContext {
  /// Return the `principalId` reported by the authorizer.
  ///
  /// Non-string values are rendered as JSON.
  pub fn principal_id(&self) -> Option<String> {
    match self.authorizer.as_ref()?.get("principalId")? {
      Value::Null => None,
      Value::String(principal_id) => Some(principal_id.to_owned()),
      other => Some(other.to_string()),
    }
  }
}

/// Ordered request headers with case-insensitive lookup.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Headers(IndexMap<String, String>);

impl Headers {
  /// Return the value of the first header whose name matches `name`, ignoring ASCII case.
  pub fn get(&self, name: &str) -> Option<&str> {
    self
      .0
      .iter()
      .find(|(key, _)| key.eq_ignore_ascii_case(name))
      .map(|(_, value)| value.as_str())
  }

  /// Iterate over the headers in the order they were received.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .0
      .iter()
      .map(|(name, value)| (name.as_str(), value.as_str()))
  }

  /// Return `true` if there are no headers.
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
