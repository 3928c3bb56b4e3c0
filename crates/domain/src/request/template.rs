//! Path template parser for `{name}` placeholders
//!
//! Parses relative paths such as `/api/users/{id}` to find the placeholders
//! the request builder has to substitute.

use std::ops::Range;

/// A placeholder found in a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// The placeholder name (without braces).
    pub name: String,

    /// Byte range in the template covering `{name}`.
    pub span: Range<usize>,
}

impl Placeholder {
    /// Creates a new placeholder.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Parses a path template and returns its placeholders in order.
///
/// Only `{name}` with a valid name counts as a placeholder. An unclosed brace
/// is literal text; a closed group with an invalid name (`{}`, `{1abc}`,
/// `{user id}`) is reported by [`malformed_group`] instead.
///
/// # Examples
///
/// ```
/// use restcheck_domain::request::template::parse_placeholders;
///
/// let found = parse_placeholders("/api/{resource}/{id}?page=2");
/// assert_eq!(found.len(), 2);
/// assert_eq!(found[0].name, "resource");
/// assert_eq!(found[1].name, "id");
/// ```
#[must_use]
pub fn parse_placeholders(template: &str) -> Vec<Placeholder> {
    brace_groups(template)
        .into_iter()
        .filter(|group| is_valid_placeholder_name(&group.name))
        .collect()
}

/// The first closed `{...}` group whose name is not a valid placeholder
/// name, braces included.
#[must_use]
pub fn malformed_group(template: &str) -> Option<&str> {
    brace_groups(template)
        .into_iter()
        .find(|group| !is_valid_placeholder_name(&group.name))
        .map(|group| &template[group.span])
}

/// Every closed brace group. An inner `{` restarts the group.
fn brace_groups(template: &str) -> Vec<Placeholder> {
    let mut groups = Vec::new();
    let mut chars = template.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        if ch != '{' {
            continue;
        }

        let mut name = String::new();
        while let Some(&(idx, next)) = chars.peek() {
            if next == '{' {
                break;
            }
            chars.next();
            if next == '}' {
                groups.push(Placeholder::new(std::mem::take(&mut name), start..idx + 1));
                break;
            }
            name.push(next);
        }
    }

    groups
}

/// Validates a placeholder name.
/// Valid names start with a letter or underscore, followed by alphanumerics,
/// underscores or hyphens.
#[must_use]
pub fn is_valid_placeholder_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

/// Returns the placeholder names of a template, in order of appearance.
#[must_use]
pub fn placeholder_names(template: &str) -> Vec<String> {
    parse_placeholders(template)
        .into_iter()
        .map(|p| p.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_single_placeholder() {
        let found = parse_placeholders("/api/users/{total}");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "total");
        assert_eq!(found[0].span, 11..18);
    }

    #[test]
    fn test_parse_with_query_string() {
        let found = parse_placeholders("/api/{path_parameter}?page=2");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "path_parameter");
    }

    #[test]
    fn test_no_placeholders() {
        assert!(parse_placeholders("/api/users?page=2").is_empty());
    }

    #[test]
    fn test_unclosed_brace_is_literal() {
        assert!(parse_placeholders("/api/{users").is_empty());
    }

    #[test]
    fn test_invalid_names_are_malformed_groups() {
        assert!(parse_placeholders("/api/{}").is_empty());
        assert_eq!(malformed_group("/api/{}"), Some("{}"));
        assert_eq!(malformed_group("/api/{id}/{user id}"), Some("{user id}"));
        assert_eq!(malformed_group("/api/{page.size}"), Some("{page.size}"));
        assert_eq!(malformed_group("/api/{id}?page=2"), None);
        assert_eq!(malformed_group("/api/{users"), None);
    }

    #[test]
    fn test_nested_open_brace_restarts() {
        let found = parse_placeholders("/api/{a{b}");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "b");
    }

    #[test]
    fn test_adjacent_placeholders() {
        assert_eq!(placeholder_names("/{a}{b}/{c}"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_span_covers_braces() {
        let template = "/api/{resource}/list";
        let found = parse_placeholders(template);
        assert_eq!(&template[found[0].span.clone()], "{resource}");
    }

    #[test]
    fn test_placeholder_names_validation() {
        assert!(is_valid_placeholder_name("total"));
        assert!(is_valid_placeholder_name("_id"));
        assert!(is_valid_placeholder_name("user-id2"));
        assert!(!is_valid_placeholder_name(""));
        assert!(!is_valid_placeholder_name("1st"));
        assert!(!is_valid_placeholder_name("a b"));
    }
}
