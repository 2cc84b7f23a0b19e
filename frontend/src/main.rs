mod api;
mod components;
mod config;
mod webcam;

use components::{handlers, header, preview_area, results, upload_section, utils, webcam_panel};
use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::{
    transition, AnalysisError, AnalysisResponse, ClientConfig, ImageId, ImageSource, RequestId,
    UiEvent, UiState,
};
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{AbortController, DragEvent};
use webcam::{CaptureError, StartTracker, WebcamSession};
use yew::prelude::*;

// Yew msg components
pub enum Msg {
    // Image sources
    FileChosen(GlooFile, ImageSource),
    HandleDrop(DragEvent),
    SetDragging(bool),

    // Webcam
    StartWebcam,
    WebcamStarted(u64, WebcamSession),
    WebcamStartFailed(u64, CaptureError),
    WebcamReady,
    CaptureSnapshot,
    StopWebcam,
    CaptureFailed(CaptureError),

    // Analysis operations
    Analyze,
    AnalysisFinished(RequestId, Result<AnalysisResponse, AnalysisError>),
    HealthChecked(bool),

    // UI states
    DismissError,
    Reset,
}

// Main component. `state` is the single source of truth for what is shown;
// the remaining fields own browser resources that state only refers to.
pub struct Model {
    state: UiState,
    config: Rc<ClientConfig>,
    staged: HashMap<ImageId, GlooFile>,
    previews: HashMap<ImageId, ObjectUrl>,
    inflight: Option<(RequestId, AbortController)>,
    is_dragging: bool,
    webcam: Option<WebcamSession>,
    webcam_start: StartTracker,
    webcam_ready: bool,
    video_ref: NodeRef,
    video_listener: Option<EventListener>,
    service_online: Option<bool>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let config = Rc::new(config::load());

        let link = ctx.link().clone();
        let health_config = Rc::clone(&config);
        spawn_local(async move {
            let online = api::health(&health_config).await;
            link.send_message(Msg::HealthChecked(online));
        });

        Self {
            state: UiState::default(),
            config,
            staged: HashMap::new(),
            previews: HashMap::new(),
            inflight: None,
            is_dragging: false,
            webcam: None,
            webcam_start: StartTracker::default(),
            webcam_ready: false,
            video_ref: NodeRef::default(),
            video_listener: None,
            service_online: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // Image sources
            Msg::FileChosen(file, source) => handlers::offer_file(self, ctx, file, source),
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }

            // Webcam
            Msg::StartWebcam => handlers::handle_start_webcam(self, ctx),
            Msg::WebcamStarted(ticket, session) => handlers::handle_webcam_started(self, ticket, session),
            Msg::WebcamStartFailed(ticket, err) => {
                if !self.webcam_start.finish(ticket) {
                    return false;
                }
                log::error!("Webcam error: {}", err);
                self.dispatch(ctx, UiEvent::ErrorReported(err.to_string()))
            }
            Msg::WebcamReady => {
                self.webcam_ready = true;
                true
            }
            Msg::CaptureSnapshot => handlers::handle_capture(self, ctx),
            Msg::StopWebcam => handlers::stop_webcam(self),
            Msg::CaptureFailed(err) => {
                log::error!("Webcam error: {}", err);
                self.dispatch(ctx, UiEvent::ErrorReported(err.to_string()))
            }

            // Analysis operations
            Msg::Analyze => self.dispatch(ctx, UiEvent::AnalyzeRequested { request: RequestId::new() }),
            Msg::AnalysisFinished(request, outcome) => {
                handlers::handle_analysis_finished(self, ctx, request, outcome)
            }
            Msg::HealthChecked(online) => {
                if online {
                    log::info!("Analysis service reachable at {}", self.config.api_base);
                } else {
                    log::warn!("Analysis service health check failed at {}", self.config.health_url());
                }
                self.service_online = Some(online);
                true
            }

            // UI states
            Msg::DismissError => self.dispatch(ctx, UiEvent::DismissError),
            Msg::Reset => {
                handlers::stop_webcam(self);
                self.dispatch(ctx, UiEvent::Reset)
            }
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        handlers::attach_webcam(self, ctx);
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { header::render_header(self.service_online) }

                <main class="main-content">
                { upload_section::render_upload_section(self, ctx) }
                { webcam_panel::render_webcam_panel(self, ctx) }
                { preview_area::render_preview_area(self, ctx) }
                { utils::render_error_message(self, ctx) }
                { results::render_results(self) }
                </main>

                <footer class="app-footer">
                    <p>{"Age Check & Autism Screening | Rust WASM client"}</p>
                </footer>
            </div>
        }
    }
}

impl Model {
    /// Runs one state transition and carries out the effects it asks for.
    pub fn dispatch(&mut self, ctx: &Context<Self>, event: UiEvent) -> bool {
        let state = std::mem::take(&mut self.state);
        let (next, effects) = transition(state, event, &self.config);
        self.state = next;

        for effect in effects {
            handlers::apply_effect(self, ctx, effect);
        }
        true
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
