//! Text rendering utilities for human-friendly error messages.
//!
//! Provides helpers to format resolution chains, union types
//! and "did you mean?" suggestions in error output.

/// Renders a resolution chain as a readable string.
///
/// # Examples
/// ```
/// use dovetail_support::rendering::render_chain;
///
/// let chain = vec!["Engine", "Gearbox", "Engine"];
/// assert_eq!(render_chain(&chain), "Engine → Gearbox → Engine");
/// ```
pub fn render_chain(chain: &[impl AsRef<str>]) -> String {
    chain
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Renders the alternatives of a union type the way they would be written
/// in a signature.
///
/// ```
/// use dovetail_support::rendering::render_union;
///
/// assert_eq!(render_union(&["Cache", "Store"]), "Cache|Store");
/// ```
pub fn render_union(alternatives: &[impl AsRef<str>]) -> String {
    alternatives
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join("|")
}

/// Shortens a fully qualified type name for display.
///
/// ```
/// use dovetail_support::rendering::shorten_type_name;
///
/// let short = shorten_type_name("my_app::services::user::UserService");
/// assert_eq!(short, "UserService");
///
/// let short = shorten_type_name("alloc::sync::Arc<dyn my_app::traits::Logger>");
/// assert_eq!(short, "Arc<dyn Logger>");
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    let mut result = String::with_capacity(full_name.len());
    let mut chars = full_name.chars().peekable();
    let mut current_segment = String::new();

    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                current_segment.clear();
            }
            '<' | '>' | ',' | ' ' => {
                result.push_str(&current_segment);
                result.push(ch);
                current_segment.clear();
            }
            _ => current_segment.push(ch),
        }
    }

    result.push_str(&current_segment);
    result
}

/// Suggests known identifiers that look like `requested`.
///
/// Substring matches rank first, then matches on the shortened name,
/// then identifiers sharing a prefix of at least three characters or
/// differing from `requested` by a couple of typos.
pub fn suggest_similar(
    requested: &str,
    available: &[&str],
    max_suggestions: usize,
) -> Vec<String> {
    let requested_lower = requested.to_lowercase();
    let requested_short = shorten_type_name(requested).to_lowercase();

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .filter(|&&name| name != requested)
        .filter_map(|&name| {
            let name_lower = name.to_lowercase();
            let name_short = shorten_type_name(name).to_lowercase();

            if name_lower.contains(&requested_lower) || requested_lower.contains(&name_lower) {
                return Some((name, 100));
            }

            if name_short.contains(&requested_short) || requested_short.contains(&name_short) {
                return Some((name, 80));
            }

            if close_spelling(&requested_short, &name_short) {
                return Some((name, 60));
            }

            let common = name_short
                .chars()
                .zip(requested_short.chars())
                .take_while(|(a, b)| a == b)
                .count();

            (common >= 3).then_some((name, common * 10))
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Quick typo heuristic: similar length and at least 60% of positions match.
fn close_spelling(a: &str, b: &str) -> bool {
    if a.len().abs_diff(b.len()) > 3 {
        return false;
    }

    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return false;
    }

    let common = a.chars().zip(b.chars()).filter(|(ca, cb)| ca == cb).count();
    common * 100 / max_len >= 60
}
