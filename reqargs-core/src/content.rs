//! Content type helpers.

/// Returns `true` if `mimetype` denotes a JSON document.
///
/// `application/json` and `application/*+json` are JSON. Media type
/// parameters such as `; charset=utf-8` are ignored.
pub fn is_json(mimetype: &str) -> bool {
    let essence = mimetype.split(';').next().unwrap_or_default().trim();
    if essence.is_empty() {
        return false;
    }
    let essence = essence.to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}
