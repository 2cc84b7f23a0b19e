use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display as StrumDisplay};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::AnalysisError;
use crate::render::{render, ResultView};
use crate::response::AnalysisResponse;
use crate::validation::{validate_image, ImageCandidate, ImageId};

pub const NO_IMAGE_MESSAGE: &str = "Please select, drop or capture an image first.";

#[derive(Debug, Display, From, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        RequestId(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, StrumDisplay)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    FileDialog,
    DragDrop,
    Webcam,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedImage {
    pub id: ImageId,
    pub candidate: ImageCandidate,
    pub source: ImageSource,
}

/// The whole screen as data. `UiState::default()` is the empty start screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiState {
    pub selected: Option<SelectedImage>,
    pub pending: Option<RequestId>,
    pub result: Option<ResultView>,
    pub error: Option<String>,
}

impl UiState {
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn can_analyze(&self) -> bool {
        self.selected.is_some() && self.pending.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    ImageOffered {
        id: ImageId,
        candidate: ImageCandidate,
        source: ImageSource,
    },
    AnalyzeRequested {
        request: RequestId,
    },
    AnalysisSucceeded {
        request: RequestId,
        response: AnalysisResponse,
    },
    AnalysisFailed {
        request: RequestId,
        error: AnalysisError,
    },
    /// Problems outside the analysis flow, e.g. the camera refusing to start.
    ErrorReported(String),
    DismissError,
    Reset,
}

/// Work the owner of the state must carry out after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    AcquirePreview(ImageId),
    ReleasePreview(ImageId),
    Submit { request: RequestId, image: ImageId },
    CancelSubmission(RequestId),
}

pub fn transition(mut state: UiState, event: UiEvent, config: &ClientConfig) -> (UiState, Vec<Effect>) {
    let mut effects = Vec::new();

    match event {
        UiEvent::ImageOffered { id, candidate, source } => {
            if state.selected.as_ref().is_some_and(|s| s.id == id) {
                return (state, effects);
            }
            if let Err(rejection) = validate_image(&candidate, config) {
                log::warn!("Rejected {} from {}: {}", candidate.name, source, rejection);
                state.error = Some(AnalysisError::from(rejection).to_string());
                return (state, effects);
            }

            if let Some(previous) = state.selected.take() {
                effects.push(Effect::ReleasePreview(previous.id));
            }
            if let Some(request) = state.pending.take() {
                effects.push(Effect::CancelSubmission(request));
            }
            effects.push(Effect::AcquirePreview(id));

            state.selected = Some(SelectedImage { id, candidate, source });
            state.result = None;
            state.error = None;
        }
        UiEvent::AnalyzeRequested { request } => {
            if state.pending.is_some() {
                return (state, effects);
            }
            match &state.selected {
                Some(image) => {
                    effects.push(Effect::Submit { request, image: image.id });
                    state.pending = Some(request);
                    state.result = None;
                    state.error = None;
                }
                None => state.error = Some(NO_IMAGE_MESSAGE.to_string()),
            }
        }
        UiEvent::AnalysisSucceeded { request, response } => {
            if state.pending != Some(request) {
                log::debug!("Ignoring response for stale request {}", request);
                return (state, effects);
            }
            state.pending = None;
            state.result = Some(render(&response, config));
            state.error = None;
        }
        UiEvent::AnalysisFailed { request, error } => {
            if state.pending != Some(request) {
                log::debug!("Ignoring failure for stale request {}: {}", request, error);
                return (state, effects);
            }
            state.pending = None;
            state.error = Some(error.to_string());
        }
        UiEvent::ErrorReported(message) => state.error = Some(message),
        UiEvent::DismissError => state.error = None,
        UiEvent::Reset => {
            if let Some(image) = state.selected.take() {
                effects.push(Effect::ReleasePreview(image.id));
            }
            if let Some(request) = state.pending.take() {
                effects.push(Effect::CancelSubmission(request));
            }
            state = UiState::default();
        }
    }

    (state, effects)
}
