use gloo_file::File as GlooFile;
use js_sys::{Array, Function, Promise};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, CanvasRenderingContext2d, FilePropertyBag, HtmlCanvasElement, HtmlVideoElement,
    MediaStream, MediaStreamConstraints, MediaStreamTrack,
};

use crate::components::utils::js_error_detail;

pub const SNAPSHOT_NAME: &str = "webcam-capture.jpg";
pub const SNAPSHOT_MIME: &str = "image/jpeg";

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Camera access is not available in this browser")]
    Unavailable,
    #[error("Could not start the camera: {0}")]
    Denied(String),
    #[error("The camera is not ready yet")]
    NotReady,
    #[error("Could not capture a snapshot: {0}")]
    Snapshot(String),
}

/// Tracks the one outstanding `getUserMedia` call. Closing the camera or
/// resetting while it is pending cancels it, so a late stream is dropped.
#[derive(Debug, Default)]
pub struct StartTracker {
    generation: u64,
    pending: Option<u64>,
}

impl StartTracker {
    /// Hands out a ticket for a new start, or `None` if one is already pending.
    pub fn begin(&mut self) -> Option<u64> {
        if self.pending.is_some() {
            return None;
        }
        self.generation += 1;
        self.pending = Some(self.generation);
        self.pending
    }

    /// True only for the ticket of the start still pending.
    pub fn finish(&mut self, ticket: u64) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// A live camera stream. Dropping the session stops every track.
pub struct WebcamSession {
    stream: MediaStream,
}

impl WebcamSession {
    pub async fn start() -> Result<Self, CaptureError> {
        let devices = web_sys::window()
            .ok_or(CaptureError::Unavailable)?
            .navigator()
            .media_devices()
            .map_err(|_| CaptureError::Unavailable)?;

        let constraints = MediaStreamConstraints::new();
        constraints.set_video(&JsValue::TRUE);
        constraints.set_audio(&JsValue::FALSE);

        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(|e| CaptureError::Denied(js_error_detail(&e)))?;
        let stream = JsFuture::from(promise)
            .await
            .map_err(|e| CaptureError::Denied(js_error_detail(&e)))?
            .dyn_into::<MediaStream>()
            .map_err(|_| CaptureError::Denied("no media stream returned".into()))?;

        log::info!("Webcam started");
        Ok(Self { stream })
    }

    pub fn attach(&self, video: &HtmlVideoElement) -> Result<(), CaptureError> {
        video.set_src_object(Some(&self.stream));
        // play() settles asynchronously; readiness is reported by `loadedmetadata`.
        video
            .play()
            .map(|_| ())
            .map_err(|e| CaptureError::Denied(js_error_detail(&e)))
    }

    fn stop(&self) {
        for track in self.stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
    }
}

impl Drop for WebcamSession {
    fn drop(&mut self) {
        self.stop();
        log::info!("Webcam stopped");
    }
}

/// Grabs the current video frame as a JPEG file.
pub async fn snapshot(video: &HtmlVideoElement) -> Result<GlooFile, CaptureError> {
    let (width, height) = (video.video_width(), video.video_height());
    if width == 0 || height == 0 {
        return Err(CaptureError::NotReady);
    }

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or(CaptureError::Unavailable)?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(snapshot_error)?
        .dyn_into()
        .map_err(|_| CaptureError::Snapshot("canvas element unavailable".into()))?;
    canvas.set_width(width);
    canvas.set_height(height);

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(snapshot_error)?
        .ok_or_else(|| CaptureError::Snapshot("2d context unavailable".into()))?
        .dyn_into()
        .map_err(|_| CaptureError::Snapshot("2d context unavailable".into()))?;
    context
        .draw_image_with_html_video_element(video, 0.0, 0.0)
        .map_err(snapshot_error)?;

    let blob = canvas_to_blob(&canvas).await?;
    let options = FilePropertyBag::new();
    options.set_type(SNAPSHOT_MIME);
    let file = web_sys::File::new_with_blob_sequence_and_options(
        &Array::of1(&blob),
        SNAPSHOT_NAME,
        &options,
    )
    .map_err(snapshot_error)?;

    Ok(GlooFile::from(file))
}

async fn canvas_to_blob(canvas: &HtmlCanvasElement) -> Result<Blob, CaptureError> {
    let promise = Promise::new(&mut |resolve: Function, reject: Function| {
        let on_blob = Closure::once_into_js(move |blob: JsValue| {
            let _ = resolve.call1(&JsValue::NULL, &blob);
        });
        if let Err(e) = canvas.to_blob_with_type(on_blob.unchecked_ref(), SNAPSHOT_MIME) {
            let _ = reject.call1(&JsValue::NULL, &e);
        }
    });

    JsFuture::from(promise)
        .await
        .map_err(snapshot_error)?
        .dyn_into::<Blob>()
        .map_err(|_| CaptureError::Snapshot("the browser produced an empty frame".into()))
}

fn snapshot_error(e: JsValue) -> CaptureError {
    CaptureError::Snapshot(js_error_detail(&e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_start_at_a_time() {
        let mut starts = StartTracker::default();
        let ticket = starts.begin().unwrap();
        assert!(starts.is_pending());
        assert_eq!(starts.begin(), None);
        assert!(starts.finish(ticket));
        assert!(!starts.is_pending());
    }

    #[test]
    fn cancelled_start_is_stale() {
        let mut starts = StartTracker::default();
        let ticket = starts.begin().unwrap();
        starts.cancel();
        assert!(!starts.is_pending());
        assert!(!starts.finish(ticket));
    }

    #[test]
    fn late_stream_does_not_satisfy_a_newer_start() {
        let mut starts = StartTracker::default();
        let old = starts.begin().unwrap();
        starts.cancel();
        let new = starts.begin().unwrap();

        assert!(!starts.finish(old));
        assert!(starts.is_pending());
        assert!(starts.finish(new));
        assert!(!starts.finish(new));
    }
}
