use super::super::Model;
use super::super::Msg;
use super::utils::{debounce, first_file};
use shared::ImageSource;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    html! {
        <div class="upload-section">
            { render_file_input_area(model, ctx) }
        </div>
    }
}

fn render_file_input_area(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let handle_change = link.batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let file = input.files().as_ref().and_then(first_file);

        input.set_value("");

        file.map(|file| Msg::FileChosen(file, ImageSource::FileDialog))
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);
    let trigger_file_input = Callback::from(|_| {
        if let Some(input) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("file-input"))
        {
            if let Ok(html_input) = input.dyn_into::<web_sys::HtmlElement>() {
                html_input.click();
            }
        }
    });

    let accept = model.config.allowed_mime_types.join(",");
    let start_webcam = link.callback(|_| Msg::StartWebcam);

    html! {
        <>
            <input
                type="file"
                id="file-input"
                accept={accept}
                style="display: none;"
                onchange={handle_change}
            />

            <div class="button-container">
                <button
                    id="upload-button"
                    class="analyze-btn"
                    disabled={model.state.is_loading()}
                    onclick={debounce(300, {
                        let trigger_file_input = trigger_file_input.clone();
                        move || trigger_file_input.emit(())
                    })}
                >
                    <i class="fa-solid fa-upload"></i> {" Select Image"}
                </button>
                <button
                    id="webcam-button"
                    class="analyze-btn"
                    disabled={model.webcam.is_some() || model.webcam_start.is_pending() || model.state.is_loading()}
                    onclick={start_webcam}
                >
                    <i class="fa-solid fa-camera"></i> {" Use Webcam"}
                </button>
            </div>

            <div
                id="drop-zone"
                class={classes!("upload-area", model.is_dragging.then_some("drag-over"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, {
                    let trigger_file_input = trigger_file_input.clone();
                    move || trigger_file_input.emit(())
                })}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p>{"Drag & drop an image here, or click to browse"}</p>
                    <p class="file-types">
                        { format!("Supported formats: JPG, PNG, WEBP, GIF (max {})", model.config.max_size_label()) }
                    </p>
                </div>
            </div>
        </>
    }
}
