use std::future::Future;

use futures::future::{select, Either};
use futures::pin_mut;
use serde_json::Value;

use crate::error::AnalysisError;
use crate::response::AnalysisResponse;

/// Maps a finished HTTP exchange on the analyze endpoint to its outcome.
pub fn interpret_http(status: u16, body: &str) -> Result<AnalysisResponse, AnalysisError> {
    if (200..300).contains(&status) {
        return AnalysisResponse::from_body(body);
    }

    Err(AnalysisError::Http {
        status,
        detail: error_detail(body),
    })
}

/// Health is judged on the status code alone.
pub fn interpret_health(status: u16) -> bool {
    (200..300).contains(&status)
}

/// A transport failure that reports an abort is our own deadline firing.
pub fn classify_transport_failure(aborted: bool, detail: &str, timeout_ms: u32) -> AnalysisError {
    if aborted {
        AnalysisError::Timeout { after_ms: timeout_ms }
    } else {
        AnalysisError::Network(detail.to_string())
    }
}

fn error_detail(body: &str) -> Option<String> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map.get("error").map(|e| match e {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }),
        _ => None,
    }
}

/// Runs `work` against `deadline`. Whichever finishes first wins; the loser is
/// dropped. When the deadline wins `on_expiry` runs (to abort the request)
/// and the result is a timeout.
pub async fn race_with_deadline<W, D, T>(
    work: W,
    deadline: D,
    timeout_ms: u32,
    on_expiry: impl FnOnce(),
) -> Result<T, AnalysisError>
where
    W: Future<Output = Result<T, AnalysisError>>,
    D: Future<Output = ()>,
{
    pin_mut!(work);
    pin_mut!(deadline);

    match select(work, deadline).await {
        Either::Left((result, _timer)) => result,
        Either::Right(((), _work)) => {
            log::warn!("Analysis request exceeded {} ms, aborting", timeout_ms);
            on_expiry();
            Err(AnalysisError::Timeout { after_ms: timeout_ms })
        }
    }
}
