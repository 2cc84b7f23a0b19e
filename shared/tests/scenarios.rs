use futures::executor::block_on;
use futures::future::{pending, ready};
use serde_json::json;
use shared::render::{ResultView, ADULT_NOTICE};
use shared::{
    classify_transport_failure, interpret_http, race_with_deadline, transition, AnalysisError,
    AnalysisResponse, ClientConfig, ConfidenceBand, Effect, ImageCandidate, ImageId, ImageSource,
    RequestId, UiEvent, UiState,
};

struct Harness {
    config: ClientConfig,
    state: UiState,
    effects: Vec<Effect>,
}

impl Harness {
    fn new() -> Self {
        Self {
            config: ClientConfig::default().with_api_base("https://svc.test").with_timeout_ms(5_000),
            state: UiState::default(),
            effects: Vec::new(),
        }
    }

    fn send(&mut self, event: UiEvent) {
        let (next, effects) = transition(std::mem::take(&mut self.state), event, &self.config);
        self.state = next;
        self.effects.extend(effects);
    }

    fn select_photo(&mut self) {
        self.send(UiEvent::ImageOffered {
            id: ImageId(1),
            candidate: ImageCandidate::new("kid.jpg", "image/jpeg", 200_000),
            source: ImageSource::DragDrop,
        });
    }

    fn analyze(&mut self) -> RequestId {
        let request = RequestId::new();
        self.send(UiEvent::AnalyzeRequested { request });
        assert!(self.state.is_loading());
        assert!(!self.state.can_analyze());
        request
    }

    fn respond(&mut self, request: RequestId, status: u16, body: serde_json::Value) {
        let event = match interpret_http(status, &body.to_string()) {
            Ok(response) => UiEvent::AnalysisSucceeded { request, response },
            Err(error) => UiEvent::AnalysisFailed { request, error },
        };
        self.send(event);
    }
}

#[test]
fn child_screened_scenario() {
    let mut h = Harness::new();
    h.select_photo();
    let request = h.analyze();
    assert!(h.effects.contains(&Effect::Submit { request, image: ImageId(1) }));

    h.respond(
        request,
        200,
        json!({
            "status": "child_autism_screened",
            "autism_prediction_data": {"results": [
                {"region": "eyes", "label": "typical", "confidence": 82},
                {"final_decision": "Non-Autistic"}
            ]},
            "age_check_summary": {"kids_count": 1, "adults_count": 0,
                "annotations": [{"age": 7, "box": [0, 0, 10, 10]}]}
        }),
    );

    assert!(h.state.can_analyze());
    assert_eq!(h.state.error, None);
    let Some(ResultView::ChildScreened(child)) = &h.state.result else {
        panic!("expected a child result, got {:?}", h.state.result);
    };
    assert_eq!(child.regions.len(), 1);
    assert_eq!(child.regions[0].region, "eyes");
    assert_eq!(child.regions[0].band, ConfidenceBand::High);
    assert_eq!(child.verdict.as_deref(), Some("Non-Autistic"));
    assert_eq!(child.age.as_ref().unwrap().summary_line(), "Kids: 1 | Adults: 0");
}

#[test]
fn adult_invalid_scenario() {
    let mut h = Harness::new();
    h.select_photo();
    let request = h.analyze();
    h.respond(
        request,
        200,
        json!({"status": "adult_invalid", "age_check_summary": {"adults_count": 2, "kids_count": 0}}),
    );

    let result = h.state.result.clone().unwrap();
    assert!(!result.shows_autism_output());
    let ResultView::AdultInvalid(adult) = result else {
        panic!("expected the adult notice");
    };
    assert_eq!(adult.notice, ADULT_NOTICE);
    assert_eq!(adult.age.unwrap().summary_line(), "Kids: 0 | Adults: 2");
}

#[test]
fn timeout_scenario() {
    let mut h = Harness::new();
    h.select_photo();
    let request = h.analyze();
    let timeout_ms = h.config.timeout_ms;

    // The deadline fires while the request hangs; the abort hook runs once.
    let mut aborted = 0;
    let outcome = block_on(race_with_deadline(
        pending::<Result<AnalysisResponse, AnalysisError>>(),
        ready(()),
        timeout_ms,
        || aborted += 1,
    ));
    assert_eq!(aborted, 1);
    let error = outcome.unwrap_err();
    assert_eq!(error, AnalysisError::Timeout { after_ms: 5_000 });

    h.send(UiEvent::AnalysisFailed { request, error });
    assert_eq!(
        h.state.error.as_deref(),
        Some("The analysis timed out after 5 seconds. Please try again.")
    );
    assert!(h.state.can_analyze());
    assert_eq!(h.state.selected.as_ref().map(|s| s.id), Some(ImageId(1)));
}

#[test]
fn aborted_fetch_rejection_reads_as_timeout() {
    let mut h = Harness::new();
    h.select_photo();
    let request = h.analyze();

    let outcome = block_on(race_with_deadline(
        ready(Err::<AnalysisResponse, _>(classify_transport_failure(
            true,
            "AbortError: The user aborted a request.",
            h.config.timeout_ms,
        ))),
        pending::<()>(),
        h.config.timeout_ms,
        || {},
    ));
    h.send(UiEvent::AnalysisFailed { request, error: outcome.unwrap_err() });

    assert!(h.state.error.as_deref().unwrap().contains("timed out"));
    assert!(h.state.can_analyze());
}

#[test]
fn http_failures_surface_as_messages() {
    let mut h = Harness::new();
    h.select_photo();

    let request = h.analyze();
    h.respond(request, 404, json!({"error": "Not Found"}));
    assert!(h.state.error.as_deref().unwrap().contains("endpoint not found"));
    assert!(h.state.result.is_none());

    let request = h.analyze();
    h.respond(request, 200, json!({"error": "No faces found in the image"}));
    assert_eq!(
        h.state.error.as_deref(),
        Some("Invalid response from the analysis service: No faces found in the image")
    );

    let request = h.analyze();
    h.respond(request, 502, json!({}));
    assert!(h.state.error.as_deref().unwrap().starts_with("Server error (502)"));
    assert!(h.state.selected.is_some());
}

#[test]
fn reset_after_result_clears_everything() {
    let mut h = Harness::new();
    h.select_photo();
    let request = h.analyze();
    h.respond(request, 200, json!({"status": "adult_invalid"}));

    h.send(UiEvent::Reset);
    assert_eq!(h.state, UiState::default());
    assert_eq!(
        h.effects.iter().filter(|e| **e == Effect::ReleasePreview(ImageId(1))).count(),
        1
    );
}
