use env_logger::Env;
use hello::HelloApp;
use lambda_environ::{run_lambda_with_config, AdapterConfig};

#[tokio::main]
pub async fn main() {
  // TIP: Use the `log4rs` crate for more fine-grained control over logging.
  env_logger::init_from_env(Env::default().filter_or("RUST_LOG", "info"));

  let greeting = std::env::var("HELLO_GREETING").unwrap_or_else(|_| "Hello".to_string());
  let config = AdapterConfig::default().with_default_url_scheme("https");

  run_lambda_with_config(HelloApp::new(greeting), config).await
}
