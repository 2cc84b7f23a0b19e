use super::super::{Model, Msg};
use super::utils::{first_file, generate_id};
use crate::api;
use crate::webcam::{self, CaptureError, WebcamSession};
use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::{
    AnalysisError, AnalysisResponse, Effect, ImageCandidate, ImageId, ImageSource, RequestId,
    UiEvent,
};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{AbortController, DragEvent, HtmlVideoElement};
use yew::prelude::*;

pub fn offer_file(model: &mut Model, ctx: &Context<Model>, file: GlooFile, source: ImageSource) -> bool {
    let id = ImageId(generate_id());
    let candidate = ImageCandidate::new(file.name(), file.raw_mime_type(), file.size());
    log::info!("{} offered via {} ({}, {} bytes)", candidate.name, source, candidate.mime_type, candidate.size);

    model.staged.insert(id, file);
    model.dispatch(ctx, UiEvent::ImageOffered { id, candidate, source });

    // Rejected files never got a preview; forget them.
    if !model.previews.contains_key(&id) {
        model.staged.remove(&id);
    }
    true
}

pub fn apply_effect(model: &mut Model, ctx: &Context<Model>, effect: Effect) {
    match effect {
        Effect::AcquirePreview(id) => {
            if let Some(file) = model.staged.get(&id) {
                model.previews.insert(id, ObjectUrl::from(file.clone()));
            }
        }
        Effect::ReleasePreview(id) => {
            // Dropping the ObjectUrl revokes it.
            model.previews.remove(&id);
            model.staged.remove(&id);
        }
        Effect::Submit { request, image } => send_analysis_request(model, ctx, request, image),
        Effect::CancelSubmission(request) => {
            if let Some((inflight, controller)) = model.inflight.take() {
                if inflight == request {
                    log::info!("Cancelling analysis request {}", request);
                    controller.abort();
                } else {
                    model.inflight = Some((inflight, controller));
                }
            }
        }
    }
}

fn send_analysis_request(model: &mut Model, ctx: &Context<Model>, request: RequestId, image: ImageId) {
    let link = ctx.link().clone();

    let Some(file) = model.staged.get(&image).cloned() else {
        link.send_message(Msg::AnalysisFinished(
            request,
            Err(AnalysisError::Network("the selected image is no longer available".into())),
        ));
        return;
    };
    let controller = match AbortController::new() {
        Ok(controller) => controller,
        Err(e) => {
            link.send_message(Msg::AnalysisFinished(
                request,
                Err(AnalysisError::Network(super::utils::js_error_detail(&e))),
            ));
            return;
        }
    };

    model.inflight = Some((request, controller.clone()));
    let config = Rc::clone(&model.config);

    spawn_local(async move {
        let outcome = api::submit(&config, &file, &controller).await;
        link.send_message(Msg::AnalysisFinished(request, outcome));
    });
}

pub fn handle_analysis_finished(
    model: &mut Model,
    ctx: &Context<Model>,
    request: RequestId,
    outcome: Result<AnalysisResponse, AnalysisError>,
) -> bool {
    if model.inflight.as_ref().is_some_and(|(id, _)| *id == request) {
        model.inflight = None;
    }

    let event = match outcome {
        Ok(response) => {
            log::info!("Analysis {} finished with status \"{}\"", request, response.status().as_str());
            UiEvent::AnalysisSucceeded { request, response }
        }
        Err(error) => {
            log::error!("Analysis {} failed ({}): {}", request, error.kind(), error);
            UiEvent::AnalysisFailed { request, error }
        }
    };
    model.dispatch(ctx, event)
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    if let Some(file) = event
        .data_transfer()
        .and_then(|data_transfer| data_transfer.files())
        .as_ref()
        .and_then(first_file)
    {
        ctx.link().send_message(Msg::FileChosen(file, ImageSource::DragDrop));
    }

    true
}

pub fn handle_start_webcam(model: &mut Model, ctx: &Context<Model>) -> bool {
    if model.webcam.is_some() {
        return false;
    }
    let Some(ticket) = model.webcam_start.begin() else {
        return false;
    };

    let link = ctx.link().clone();
    spawn_local(async move {
        match WebcamSession::start().await {
            Ok(session) => link.send_message(Msg::WebcamStarted(ticket, session)),
            Err(e) => link.send_message(Msg::WebcamStartFailed(ticket, e)),
        }
    });
    true
}

pub fn handle_webcam_started(model: &mut Model, ticket: u64, session: WebcamSession) -> bool {
    if !model.webcam_start.finish(ticket) {
        // Closed or reset while the browser was still asking; drop stops the tracks.
        log::info!("Discarding camera stream from a cancelled start");
        drop(session);
        return false;
    }
    model.webcam = Some(session);
    model.webcam_ready = false;
    true
}

/// Hooks a freshly started stream up to the rendered `<video>` element.
pub fn attach_webcam(model: &mut Model, ctx: &Context<Model>) {
    let Some(session) = model.webcam.as_ref() else {
        return;
    };
    if model.video_listener.is_some() {
        return;
    }
    let Some(video) = model.video_ref.cast::<HtmlVideoElement>() else {
        return;
    };

    let link = ctx.link().clone();
    model.video_listener = Some(EventListener::once(&video, "loadedmetadata", move |_| {
        link.send_message(Msg::WebcamReady)
    }));

    if let Err(e) = session.attach(&video) {
        ctx.link().send_message(Msg::CaptureFailed(e));
    }
}

pub fn handle_capture(model: &mut Model, ctx: &Context<Model>) -> bool {
    let Some(video) = model.video_ref.cast::<HtmlVideoElement>() else {
        ctx.link().send_message(Msg::CaptureFailed(CaptureError::NotReady));
        return false;
    };

    let link = ctx.link().clone();
    spawn_local(async move {
        match webcam::snapshot(&video).await {
            Ok(file) => {
                link.send_message(Msg::StopWebcam);
                link.send_message(Msg::FileChosen(file, ImageSource::Webcam));
            }
            Err(e) => link.send_message(Msg::CaptureFailed(e)),
        }
    });
    false
}

pub fn stop_webcam(model: &mut Model) -> bool {
    model.video_listener = None;
    model.webcam_ready = false;
    let was_starting = model.webcam_start.is_pending();
    model.webcam_start.cancel();
    let was_running = model.webcam.take().is_some();
    was_starting || was_running
}
