use super::super::Model;
use shared::render::{AdultInvalidView, AgeSummaryView, ChildScreenedView, RegionRow};
use shared::ResultView;
use yew::prelude::*;

pub fn render_results(model: &Model) -> Html {
    match &model.state.result {
        Some(ResultView::ChildScreened(view)) => render_child(view),
        Some(ResultView::AdultInvalid(view)) => render_adult(view),
        Some(ResultView::Unexpected { notice, detail }) => html! {
            <div class="results-container unexpected">
                <h2><i class="fa-solid fa-triangle-exclamation"></i>{" Unexpected result"}</h2>
                <p>{ notice }</p>
                { for detail.iter().map(|d| html! { <p class="result-detail">{ d }</p> }) }
            </div>
        },
        None => html! {},
    }
}

fn render_child(view: &ChildScreenedView) -> Html {
    html! {
        <div class="results-container child-screened">
            <div class="result-header">
                <h2><i class="fa-solid fa-child"></i>{" Screening Results"}</h2>
                { render_message(&view.message) }
            </div>
            {
                if let Some(url) = &view.autism_image_url {
                    html! { <img class="annotated-image" src={url.clone()} alt="Screening annotations" /> }
                } else {
                    html! {}
                }
            }
            {
                if view.regions.is_empty() {
                    html! {}
                } else {
                    html! {
                        <table class="region-table">
                            <thead>
                                <tr><th>{"Region"}</th><th>{"Label"}</th><th>{"Confidence"}</th></tr>
                            </thead>
                            <tbody>
                                { for view.regions.iter().map(render_region_row) }
                            </tbody>
                        </table>
                    }
                }
            }
            {
                if let Some(verdict) = &view.verdict {
                    html! {
                        <p class="final-decision">
                            <strong>{"Final decision: "}</strong>{ verdict }
                        </p>
                    }
                } else {
                    html! {}
                }
            }
            { for view.age.iter().map(render_age_summary) }
        </div>
    }
}

fn render_region_row(row: &RegionRow) -> Html {
    html! {
        <tr>
            <td>{ &row.region }</td>
            <td>{ &row.label }</td>
            <td class={classes!("confidence", row.band.css_class().to_string())}>
                { row.confidence_label() }
            </td>
        </tr>
    }
}

fn render_adult(view: &AdultInvalidView) -> Html {
    html! {
        <div class="results-container adult-invalid">
            <div class="result-header">
                <h2><i class="fa-solid fa-user"></i>{" Adult Detected"}</h2>
                { render_message(&view.message) }
            </div>
            <p class="adult-notice">{ &view.notice }</p>
            { for view.age.iter().map(render_age_summary) }
        </div>
    }
}

fn render_age_summary(age: &AgeSummaryView) -> Html {
    html! {
        <div class="age-summary">
            <h3>{"Age Check"}</h3>
            {
                if let Some(url) = &age.image_url {
                    html! { <img class="annotated-image" src={url.clone()} alt="Age detection annotations" /> }
                } else {
                    html! {}
                }
            }
            <p class="age-counts">{ age.summary_line() }</p>
            {
                if !age.faces_detected {
                    html! { <p class="no-faces">{"No faces detected"}</p> }
                } else if age.faces.is_empty() {
                    html! {}
                } else {
                    html! {
                        <ul class="face-list">
                            { for age.faces.iter().enumerate().map(|(i, face)| html! {
                                <li>{ format!("Face {}: age {} at {}", i + 1, face.age, face.bbox) }</li>
                            }) }
                        </ul>
                    }
                }
            }
        </div>
    }
}

fn render_message(message: &Option<String>) -> Html {
    match message {
        Some(message) => html! { <p class="result-message">{ message }</p> },
        None => html! {},
    }
}
