use chromiumoxide::Page;
use replay_bridge::{BRIDGE_CHECK, BRIDGE_JS, BridgeRequest, BridgeResponse};
use replay_engine::backend::BackendError;
use std::time::Duration;

/// Bound on a single evaluation; a dialog the page opens can otherwise block the JS thread.
const EVAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum retries for context errors while the page is navigating.
const MAX_CONTEXT_RETRIES: u32 = 10;

const CONTEXT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Whether an evaluation failed because the document went away mid-call.
fn is_context_error(err: &str) -> bool {
    err.contains("Cannot find context")
        || err.contains("Execution context was destroyed")
        || err.contains("-32000")
}

#[derive(Debug)]
enum EvalError {
    Timeout,
    Context(String),
    Other(String),
}

async fn evaluate_with_timeout(
    page: &Page,
    expression: &str,
) -> Result<serde_json::Value, EvalError> {
    match tokio::time::timeout(EVAL_TIMEOUT, page.evaluate(expression)).await {
        Err(_) => Err(EvalError::Timeout),
        Ok(Err(e)) => {
            let err_str = e.to_string();
            if is_context_error(&err_str) {
                Err(EvalError::Context(err_str))
            } else {
                Err(EvalError::Other(err_str))
            }
        }
        Ok(Ok(remote_object)) => remote_object
            .into_value::<serde_json::Value>()
            .map_err(|e| EvalError::Other(format!("Failed to get result: {}", e))),
    }
}

/// Install the bridge unless the current document already has it.
async fn ensure_bridge(page: &Page) -> Result<(), EvalError> {
    let loaded = evaluate_with_timeout(page, BRIDGE_CHECK)
        .await?
        .as_bool()
        .unwrap_or(false);
    if !loaded {
        tracing::debug!("Injecting replay bridge");
        evaluate_with_timeout(page, BRIDGE_JS).await?;
    }
    Ok(())
}

fn bridge_expression(request: &BridgeRequest) -> Result<String, BackendError> {
    let payload = serde_json::to_string(request)?;
    Ok(format!("window.__replayBridge.process({})", payload))
}

/// Send one request to the in-page bridge, re-injecting it and retrying
/// while the page is between documents.
pub async fn call_bridge(
    page: &Page,
    request: &BridgeRequest,
) -> Result<BridgeResponse, BackendError> {
    let expression = bridge_expression(request)?;
    tracing::trace!("Bridge call: {}", expression);

    let mut last_error = None;
    for attempt in 0..MAX_CONTEXT_RETRIES {
        let result = match ensure_bridge(page).await {
            Ok(()) => evaluate_with_timeout(page, &expression).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(value) => return Ok(BridgeResponse::from_value(value)?),
            Err(EvalError::Timeout) => {
                return Err(BackendError::Bridge(format!(
                    "{} timed out - possibly blocked by a dialog",
                    request.op()
                )));
            }
            Err(EvalError::Context(err_str)) => {
                tracing::debug!(
                    "Context error during {} (attempt {}/{}), retrying...",
                    request.op(),
                    attempt + 1,
                    MAX_CONTEXT_RETRIES
                );
                last_error = Some(err_str);
                tokio::time::sleep(CONTEXT_RETRY_DELAY).await;
            }
            Err(EvalError::Other(err_str)) => {
                return Err(BackendError::Script(format!(
                    "{} evaluation failed: {}",
                    request.op(),
                    err_str
                )));
            }
        }
    }

    Err(BackendError::Bridge(last_error.unwrap_or_else(|| {
        format!("{} failed after retries", request.op())
    })))
}
