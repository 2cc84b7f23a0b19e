use yew::prelude::*;

/// Renders the application header with the service status badge
pub fn render_header(service_online: Option<bool>) -> Html {
    let (class, label) = match service_online {
        Some(true) => ("status-online", "Service online"),
        Some(false) => ("status-offline", "Service unreachable"),
        None => ("status-unknown", "Checking service..."),
    };

    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-child-reaching"></i> {" Age Check & Autism Screening"}</h1>
            <p class="subtitle">{"Upload a photo, drop it here, or take one with your webcam"}</p>
            <span class={classes!("service-status", class)}>{ label }</span>
        </header>
    }
}
