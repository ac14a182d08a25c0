/// URL matching against the target-site patterns
use crate::tab_data::TabSnapshot;

/// True when the tab's URL contains any pattern, ignoring case.
///
/// An empty pattern list or a tab without a URL never matches; that is the
/// normal "nothing configured yet" or "tab still loading" state, not an error.
pub fn matches(tab: &TabSnapshot, patterns: &[String]) -> bool {
    match tab.url.as_deref() {
        Some(url) if !url.is_empty() => url_matches(url, patterns),
        _ => false,
    }
}

/// Same check on a bare URL string
pub fn url_matches(url: &str, patterns: &[String]) -> bool {
    if url.is_empty() || patterns.is_empty() {
        return false;
    }

    let url = url.to_lowercase();
    patterns
        .iter()
        .any(|pattern| url.contains(pattern.to_lowercase().as_str()))
}
