//! Best-effort extraction of action items from model analysis text.

const SECTION_MARKERS: [&str; 2] = ["recommended actions", "actions:"];
const ITEM_PREFIX_CHARS: &[char] = &[
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '.', '-', '•', ' ',
];
pub const FALLBACK_RECOMMENDATION: &str = "Review anomaly details manually";

/// Collects list items that follow an "actions" heading.
///
/// Every heading line switches collection on (it never switches off). Items
/// are non-empty lines starting with a digit, `-` or `•`, with those markers
/// stripped. Returns the single fallback entry when nothing qualifies.
pub fn extract_recommendations(analysis: &str) -> Vec<String> {
    let mut collecting = false;
    let mut items = Vec::new();

    for line in analysis.split('\n') {
        let line = line.trim();
        let lowered = line.to_lowercase();
        if SECTION_MARKERS.iter().any(|marker| lowered.contains(marker)) {
            collecting = true;
            continue;
        }
        if !collecting || line.is_empty() {
            continue;
        }
        let is_item = line
            .chars()
            .next()
            .is_some_and(|first| first.is_numeric() || first == '-' || first == '•');
        if is_item {
            items.push(line.trim_start_matches(ITEM_PREFIX_CHARS).to_string());
        }
    }

    if items.is_empty() {
        vec![FALLBACK_RECOMMENDATION.to_string()]
    } else {
        items
    }
}
