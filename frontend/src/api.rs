use gloo_file::File as GlooFile;
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use shared::{
    classify_transport_failure, interpret_health, interpret_http, race_with_deadline,
    AnalysisError, AnalysisResponse, ClientConfig,
};
use web_sys::{AbortController, FormData};

use crate::components::utils::js_error_detail;

/// Posts one image to the analyze endpoint. The request is aborted through
/// `controller` when the configured timeout elapses first.
pub async fn submit(
    config: &ClientConfig,
    file: &GlooFile,
    controller: &AbortController,
) -> Result<AnalysisResponse, AnalysisError> {
    let form_data = FormData::new().map_err(|e| AnalysisError::Network(js_error_detail(&e)))?;
    form_data
        .append_with_blob_and_filename(&config.upload_field, file.as_ref(), &file.name())
        .map_err(|e| AnalysisError::Network(js_error_detail(&e)))?;

    let signal = controller.signal();
    let request = Request::post(&config.analyze_url())
        .abort_signal(Some(&signal))
        .body(form_data)
        .map_err(|e| AnalysisError::Network(e.to_string()))?;

    let timeout_ms = config.timeout_ms;
    log::info!("Submitting {} ({} bytes) to {}", file.name(), file.size(), config.analyze_url());

    let exchange = async move {
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(e, timeout_ms))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, timeout_ms))?;
        interpret_http(status, &body)
    };

    race_with_deadline(exchange, TimeoutFuture::new(timeout_ms), timeout_ms, || controller.abort())
        .await
}

pub async fn health(config: &ClientConfig) -> bool {
    let timeout_ms = config.timeout_ms;
    let check = async {
        Request::get(&config.health_url())
            .send()
            .await
            .map(|response| interpret_health(response.status()))
            .map_err(|e| transport_error(e, timeout_ms))
    };

    match race_with_deadline(check, TimeoutFuture::new(timeout_ms), timeout_ms, || {}).await {
        Ok(online) => online,
        Err(e) => {
            log::warn!("Health check failed: {}", e);
            false
        }
    }
}

fn transport_error(err: gloo_net::Error, timeout_ms: u32) -> AnalysisError {
    let aborted = matches!(&err, gloo_net::Error::JsError(js) if js.name == "AbortError");
    classify_transport_failure(aborted, &err.to_string(), timeout_ms)
}
