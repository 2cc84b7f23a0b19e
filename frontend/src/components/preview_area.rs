use super::super::{Model, Msg};
use super::utils::{debounce, format_size};
use yew::prelude::*;

pub fn render_preview_area(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(selected) = &model.state.selected else {
        return html! {};
    };

    let link = ctx.link().clone();
    let candidate = &selected.candidate;

    html! {
        <div id="preview-container">
            { render_selected_image_preview(model) }
            <p class="preview-caption" title={candidate.name.clone()}>
                { format!("{} · {} · from {}", display_name(&candidate.name), format_size(candidate.size), selected.source.as_ref().replace('_', " ")) }
            </p>
            <div class="button-container">
                <button
                    id="reset-btn"
                    class="analyze-btn"
                    style="background-color: var(--clear-color);"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::Reset)
                    })}
                >
                    <i class="fa-solid fa-rotate-left"></i>{" Reset"}
                </button>
                <button
                    id="analyze-btn"
                    class="analyze-btn"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::Analyze)
                    })}
                    disabled={!model.state.can_analyze()}
                >
                    { render_analyze_button_content(model) }
                </button>
            </div>
        </div>
    }
}

fn render_selected_image_preview(model: &Model) -> Html {
    let url = model
        .state
        .selected
        .as_ref()
        .and_then(|s| model.previews.get(&s.id));

    match url {
        Some(url) => html! {
            <img id="actual-image-preview"
                src={url.to_string()}
                alt="Image Preview" />
        },
        None => html! {
            <div class="unavailable-preview">
                <p>{"Preview unavailable"}</p>
            </div>
        },
    }
}

fn render_analyze_button_content(model: &Model) -> Html {
    if model.state.is_loading() {
        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Analyzing..."}</> }
    } else {
        html! { <><i class="fa-solid fa-magnifying-glass"></i>{" Analyze"}</> }
    }
}

fn display_name(filename: &str) -> String {
    if filename.chars().count() > 24 {
        let head: String = filename.chars().take(21).collect();
        format!("{}...", head)
    } else {
        filename.to_string()
    }
}
