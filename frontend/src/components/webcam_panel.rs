use super::super::{Model, Msg};
use yew::prelude::*;

pub fn render_webcam_panel(model: &Model, ctx: &Context<Model>) -> Html {
    if model.webcam_start.is_pending() {
        return html! {
            <div class="webcam-panel loading-preview">
                <i class="fa-solid fa-spinner fa-spin fa-2x"></i>
                <p>{"Starting camera..."}</p>
            </div>
        };
    }
    if model.webcam.is_none() {
        return html! {};
    }

    let link = ctx.link();
    html! {
        <div class="webcam-panel">
            <video
                ref={model.video_ref.clone()}
                class="webcam-video"
                autoplay=true
                muted=true
                playsinline=true
            />
            <div class="button-container">
                <button
                    class="analyze-btn"
                    disabled={!model.webcam_ready}
                    onclick={link.callback(|_| Msg::CaptureSnapshot)}
                >
                    <i class="fa-solid fa-camera-retro"></i>{" Capture"}
                </button>
                <button
                    class="analyze-btn secondary"
                    onclick={link.callback(|_| Msg::StopWebcam)}
                >
                    <i class="fa-solid fa-video-slash"></i>{" Close Camera"}
                </button>
            </div>
        </div>
    }
}
