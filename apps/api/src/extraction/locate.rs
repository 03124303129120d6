/// Returns the greedy span from the first `{` to the last `}` in `text`.
///
/// Braces inside string literals are not considered, so prose after the object
/// that itself contains a `}` widens the span. Callers surface that as a
/// parse failure rather than trying to correct it.
pub fn locate_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}
