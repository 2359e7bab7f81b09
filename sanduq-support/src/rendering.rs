//! Text rendering utilities for diagnostics.
//!
//! Helpers to shorten Rust type names for shape-mismatch messages and to
//! propose registered names when a lookup misses.

/// Shortens a fully qualified type name for display.
///
/// Every path segment keeps only its last component, generic and tuple
/// punctuation is preserved.
///
/// ```
/// use sanduq_support::rendering::shorten_type_name;
///
/// assert_eq!(shorten_type_name("my_app::services::UserService"), "UserService");
/// assert_eq!(
///     shorten_type_name("alloc::sync::Arc<dyn my_app::traits::Logger>"),
///     "Arc<dyn Logger>"
/// );
/// assert_eq!(
///     shorten_type_name("(alloc::string::String, core::option::Option<i32>)"),
///     "(String, Option<i32>)"
/// );
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    let mut out = String::with_capacity(full_name.len());
    let mut segment_start = 0;

    for (idx, ch) in full_name.char_indices() {
        match ch {
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' | '*' => {
                out.push_str(last_path_component(&full_name[segment_start..idx]));
                out.push(ch);
                segment_start = idx + ch.len_utf8();
            }
            _ => {}
        }
    }

    out.push_str(last_path_component(&full_name[segment_start..]));
    out
}

fn last_path_component(segment: &str) -> &str {
    segment.rsplit("::").next().unwrap_or(segment)
}

/// Proposes registered names close to `requested`.
///
/// A candidate qualifies when one name contains the other (ignoring case)
/// or when their edit distance is small relative to the requested length.
/// Results are ordered best match first and capped at `max_suggestions`.
///
/// ```
/// use sanduq_support::rendering::suggest_similar;
///
/// let names = ["UserService", "OrderService", "Mailer"];
/// assert_eq!(suggest_similar("UserServise", &names, 2)[0], "UserService");
/// assert!(suggest_similar("Database", &names, 2).is_empty());
/// ```
pub fn suggest_similar<S: AsRef<str>>(
    requested: &str,
    available: &[S],
    max_suggestions: usize,
) -> Vec<String> {
    let wanted = requested.to_lowercase();
    let budget = (wanted.chars().count() / 3).max(1);

    let mut scored: Vec<(usize, &str)> = available
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| *name != requested)
        .filter_map(|name| {
            let candidate = name.to_lowercase();
            if !wanted.is_empty() && (candidate.contains(&wanted) || wanted.contains(&candidate)) {
                return Some((0, name));
            }
            let distance = edit_distance(&wanted, &candidate);
            (distance <= budget).then_some((distance, name))
        })
        .collect();

    scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(_, name)| name.to_string())
        .collect()
}

/// Renders suggestions as a trailing hint, or an empty string when there are none.
///
/// ```
/// use sanduq_support::rendering::render_suggestions;
///
/// assert_eq!(render_suggestions(&["UserService".to_string()]), " (did you mean `UserService`?)");
/// assert_eq!(render_suggestions(&[]), "");
/// ```
pub fn render_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        return String::new();
    }
    let quoted: Vec<String> = suggestions.iter().map(|s| format!("`{s}`")).collect();
    format!(" (did you mean {}?)", quoted.join(" or "))
}

// Levenshtein over chars, single row.
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == *cb {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }

    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorten_simple_path() {
        assert_eq!(shorten_type_name("my_app::services::UserService"), "UserService");
    }

    #[test]
    fn shorten_with_generics() {
        assert_eq!(
            shorten_type_name("alloc::sync::Arc<dyn my_app::traits::Logger>"),
            "Arc<dyn Logger>"
        );
    }

    #[test]
    fn shorten_references_and_slices() {
        assert_eq!(shorten_type_name("&[alloc::string::String]"), "&[String]");
        assert_eq!(shorten_type_name("[u8; 4]"), "[u8; 4]");
    }

    #[test]
    fn shorten_no_path() {
        assert_eq!(shorten_type_name("String"), "String");
        assert_eq!(shorten_type_name(""), "");
    }

    #[test]
    fn suggest_typo() {
        let names = vec!["UserService", "UserRepository", "Database"];
        let suggestions = suggest_similar("UserServise", &names, 3);
        assert_eq!(suggestions.first().map(String::as_str), Some("UserService"));
    }

    #[test]
    fn suggest_substring_ignores_case() {
        let names = vec!["Mailer", "UserService"];
        let suggestions = suggest_similar("service", &names, 3);
        assert_eq!(suggestions, vec!["UserService".to_string()]);
    }

    #[test]
    fn suggest_skips_exact_and_caps() {
        let names = vec!["a1", "a2", "a3", "a"];
        let suggestions = suggest_similar("a", &names, 2);
        assert_eq!(suggestions.len(), 2);
        assert!(!suggestions.contains(&"a".to_string()));
    }

    #[test]
    fn suggest_no_match() {
        let names = vec!["Database"];
        assert!(suggest_similar("XyzAbcDef", &names, 3).is_empty());
    }

    #[test]
    fn edit_distance_basics() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("abc", "abc"), 0);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
    }

    #[test]
    fn render_many_suggestions() {
        let rendered = render_suggestions(&["A".to_string(), "B".to_string()]);
        assert_eq!(rendered, " (did you mean `A` or `B`?)");
    }
}
