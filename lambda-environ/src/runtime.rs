use crate::application::Application;
use crate::config::AdapterConfig;
use crate::environ::build_environ;
use crate::error::{format_error, EventError};
use crate::event::GatewayEvent;
use crate::response::{translate_response, GatewayResponse};

use futures::future;
use lambda_runtime::{service_fn, Context as LambdaContext, LambdaEvent};
use serde_json::Value;

/// Handle a single API Gateway event: build the [`Environ`](crate::Environ), invoke `app` once, and
/// translate its response.
///
/// This is the platform-independent core of [`handle_event`]; `context` may be any value the
/// application expects to find in [`Environ::context`](crate::Environ::context).
///
/// Malformed events and unrepresentable responses fail with an [`EventError`]. Errors returned by
/// the application are propagated as-is.
pub fn handle_request<A, C>(
  app: &A,
  payload: Value,
  context: C,
  config: &AdapterConfig,
) -> Result<GatewayResponse, lambda_runtime::Error>
where
  A: Application<C>,
  A::Error: Into<lambda_runtime::Error>,
{
  log::trace!("Request: {payload:#}");

  let event = GatewayEvent::from_json(payload).map_err(log_event_error)?;
  log::debug!("{} {}", event.http_method, event.path);

  let mut environ = build_environ(&event, context, config);
  let response = app.call(&mut environ).map_err(|err| {
    let err: lambda_runtime::Error = err.into();
    log::error!("Application failed: {}", format_error(&*err, None, None));
    err
  })?;

  Ok(translate_response(response, &environ.errors).map_err(log_event_error)?)
}

/// Handle a Lambda invocation triggered by API Gateway.
///
/// The Lambda [`Context`](lambda_runtime::Context) is exposed to the application as
/// [`Environ::context`](crate::Environ::context).
pub fn handle_event<A>(
  app: &A,
  event: LambdaEvent<Value>,
  config: &AdapterConfig,
) -> Result<GatewayResponse, lambda_runtime::Error>
where
  A: Application<LambdaContext>,
  A::Error: Into<lambda_runtime::Error>,
{
  log::trace!("Lambda context: {:#?}", event.context);
  handle_request(app, event.payload, event.context, config)
}

fn log_event_error(err: EventError) -> EventError {
  log::error!(
    "{}",
    format_error(&err, Some(&format!("EventError::{}", err.name())), err.backtrace()),
  );
  err
}

/// Start the Lambda runtime to serve `app` with the default [`AdapterConfig`].
///
/// # Example
///
/// ```rust,no_run
/// use lambda_environ::{run_lambda, AppResponse, Environ, LambdaContext, StatusCode};
///
/// use std::convert::Infallible;
///
/// fn app(_environ: &mut Environ<LambdaContext>) -> Result<AppResponse, Infallible> {
///   Ok(AppResponse::new(StatusCode::OK).with_body("Hello, world!"))
/// }
///
/// #[tokio::main]
/// pub async fn main() {
///   env_logger::init();
///
///   run_lambda(app).await
/// }
/// ```
pub async fn run_lambda<A>(app: A)
where
  A: Application<LambdaContext>,
  A::Error: Into<lambda_runtime::Error>,
{
  run_lambda_with_config(app, AdapterConfig::default()).await
}

/// Start the Lambda runtime to serve `app` with the specified [`AdapterConfig`].
pub async fn run_lambda_with_config<A>(app: A, config: AdapterConfig)
where
  A: Application<LambdaContext>,
  A::Error: Into<lambda_runtime::Error>,
{
  let app = &app;
  let config = &config;
  lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
    future::ready(handle_event(app, event, config))
  }))
  .await
  .expect("Lambda run loop should never exit")
}
