/// Resolves an image path returned by the service. Anything starting with
/// `http` is already absolute; everything else is appended to the base origin.
pub fn resolve_asset_url(api_base: &str, path: &str) -> String {
    if path.starts_with("http") {
        path.to_string()
    } else {
        format!("{}{}", api_base, path)
    }
}

/// Like [`resolve_asset_url`] but treats blank paths as missing.
pub fn resolve_optional(api_base: &str, path: Option<&str>) -> Option<String> {
    path.map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| resolve_asset_url(api_base, p))
}
