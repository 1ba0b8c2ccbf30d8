#![doc = include_str!("../../README.md")]
#![warn(missing_docs)]

pub use http::StatusCode;
pub use lambda_runtime::{Context as LambdaContext, LambdaEvent};

mod application;

pub use application::{AppResponse, Application};

/// Case permutations of header names.
pub mod casing;

pub use casing::all_casings;

mod config;

pub use config::AdapterConfig;

/// Byte transcoding and query string encoding.
pub mod encoding;

/// Request environment construction.
pub mod environ;

pub use environ::{build_environ, Environ, EnvironBuilder, ErrorSink};

/// Error handling.
pub mod error;

pub use error::EventError;

/// API Gateway event model.
pub mod event;

pub use event::GatewayEvent;

mod response;

pub use response::{translate_response, GatewayResponse};

mod runtime;

pub use runtime::{handle_event, handle_request, run_lambda, run_lambda_with_config};
