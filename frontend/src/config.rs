use shared::config::PAGE_PARAMS;
use shared::ClientConfig;
use web_sys::UrlSearchParams;

/// Builds the client configuration: built-in defaults, then values baked in at
/// compile time, then `?timeout_ms=` from the page URL. The endpoint itself
/// only comes from the build.
pub fn load() -> ClientConfig {
    let compiled = compiled_config();
    let config = match query_params() {
        Some(params) => apply_query(compiled.clone(), &params),
        None => compiled.clone(),
    };

    let config = match config.validate() {
        Ok(()) => config,
        Err(e) => {
            log::warn!("Ignoring URL configuration overrides: {}", e);
            match compiled.validate() {
                Ok(()) => compiled,
                Err(e) => {
                    log::warn!("Compiled configuration invalid ({}), using defaults", e);
                    ClientConfig::default()
                }
            }
        }
    };

    log::info!(
        "Analysis endpoint: {} (timeout {} ms, max upload {})",
        config.analyze_url(),
        config.timeout_ms,
        config.max_size_label()
    );
    config
}

fn compiled_config() -> ClientConfig {
    let mut config = ClientConfig::default();

    match option_env!("SCREENER_API_BASE") {
        Some(base) => config = config.with_api_base(base),
        None => log::info!("SCREENER_API_BASE not set, using default: {}", config.api_base),
    }
    if let Some(path) = option_env!("SCREENER_ANALYZE_PATH") {
        config = config.with_analyze_path(path);
    }
    if let Some(raw) = option_env!("SCREENER_TIMEOUT_MS") {
        match raw.trim().parse::<u32>() {
            Ok(ms) => config = config.with_timeout_ms(ms),
            Err(e) => log::warn!("Invalid SCREENER_TIMEOUT_MS value: {}", e),
        }
    }

    config
}

fn query_params() -> Option<UrlSearchParams> {
    let search = web_sys::window()?.location().search().ok()?;
    if search.is_empty() {
        return None;
    }
    UrlSearchParams::new_with_str(&search).ok()
}

fn apply_query(mut config: ClientConfig, params: &UrlSearchParams) -> ClientConfig {
    for key in PAGE_PARAMS {
        if let Some(value) = params.get(key) {
            if let Err(e) = config.apply_page_override(key, &value) {
                log::warn!("Ignoring page parameter {}: {}", key, e);
            }
        }
    }
    config
}
