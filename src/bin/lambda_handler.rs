//! AWS Lambda handler for bond valuations
//!
//! Accepts a tagged JSON [`ValuationRequest`] through a Lambda Function URL and
//! returns the matching [`ValuationResponse`]. Solver settings come from the
//! BOND_SOLVER_* environment variables unless the request overrides them.

use aws_lambda_events::event::lambda_function_urls::{LambdaFunctionUrlRequest, LambdaFunctionUrlResponse};
use bond_valuation::request::{error_status, ValuationRequest};
use bond_valuation::ValuationConfig;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use serde_json::json;

/// Status code and optional JSON body for one invocation
fn route(method: &str, body: Option<&str>, is_base64_encoded: bool, config: &ValuationConfig) -> (u16, Option<String>) {
    if method.eq_ignore_ascii_case("OPTIONS") {
        return (200, None);
    }

    if is_base64_encoded {
        return error_body(400, "base64-encoded bodies are not supported; send application/json");
    }

    let request: ValuationRequest = match serde_json::from_str(body.unwrap_or("{}")) {
        Ok(request) => request,
        Err(e) => return error_body(400, &format!("Invalid JSON: {}", e)),
    };

    info!("Evaluating {} request", request.operation());

    match request.evaluate(config) {
        Ok(response) => match serde_json::to_string(&response) {
            Ok(text) => (200, Some(text)),
            Err(e) => error_body(500, &format!("Failed to encode response: {}", e)),
        },
        Err(e) => {
            warn!("{} request failed: {}", request.operation(), e);
            error_body(error_status(&e), &e.to_string())
        }
    }
}

fn error_body(status: u16, message: &str) -> (u16, Option<String>) {
    (status, Some(json!({ "error": message }).to_string()))
}

async fn handler(event: LambdaEvent<LambdaFunctionUrlRequest>) -> Result<LambdaFunctionUrlResponse, Error> {
    let request = event.payload;
    let method = request.request_context.http.method.as_deref().unwrap_or("POST");

    let config = ValuationConfig::from_env();
    let (status, body) = route(method, request.body.as_deref(), request.is_base64_encoded, &config);

    let mut response = LambdaFunctionUrlResponse {
        status_code: i64::from(status),
        headers: Default::default(),
        body,
        is_base64_encoded: false,
        cookies: Vec::new(),
    };
    response.headers.insert("Access-Control-Allow-Origin", "*".parse()?);
    response.headers.insert("Access-Control-Allow-Methods", "POST, OPTIONS".parse()?);
    response.headers.insert("Access-Control-Allow-Headers", "Content-Type".parse()?);
    if response.body.is_some() {
        response.headers.insert("Content-Type", "application/json".parse()?);
    }

    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
