//! Turns a free-form coaching response into a short list of suggestions.

/// Fewest words a line needs to count as a suggestion.
pub const MIN_SUGGESTION_WORDS: usize = 3;

/// Most words a line may have to count as a suggestion.
pub const MAX_SUGGESTION_WORDS: usize = 25;

/// Characters of raw text kept when no line qualifies.
pub const FALLBACK_CHARS: usize = 120;

/// Default number of suggestions requested by callers.
pub const DEFAULT_SUGGESTION_COUNT: usize = 3;

/// Extract at most `max` suggestions from raw model output.
///
/// Each line is stripped of surrounding whitespace and list markers (`-`, `•`);
/// lines with fewer than [`MIN_SUGGESTION_WORDS`] or more than
/// [`MAX_SUGGESTION_WORDS`] words are dropped. When nothing survives, the
/// first [`FALLBACK_CHARS`] characters of the raw text become the single
/// suggestion, so any model output yields at least one entry.
pub fn extract_suggestions(raw: &str, max: usize) -> Vec<String> {
    if max == 0 {
        return Vec::new();
    }

    let suggestions: Vec<String> = raw
        .lines()
        .map(strip_list_markers)
        .filter(|line| !line.is_empty())
        .filter(|line| {
            let words = line.split_whitespace().count();
            (MIN_SUGGESTION_WORDS..=MAX_SUGGESTION_WORDS).contains(&words)
        })
        .take(max)
        .map(str::to_string)
        .collect();

    if suggestions.is_empty() && !raw.is_empty() {
        return vec![raw.chars().take(FALLBACK_CHARS).collect()];
    }

    suggestions
}

fn strip_list_markers(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || c == '-' || c == '•')
}
