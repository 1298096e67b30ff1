//! Placeholder extraction from string templates.
//!
//! Two reflective formatting idioms make template keys behave like name
//! usages: `"...%(key)s..." % locals()` and `"...{field}...".format(**locals())`.
//! The extractors here are deliberately lenient: malformed template syntax
//! yields zero names instead of failing the run, unlike the strict
//! parse-or-fail policy for source files.

use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::LazyLock;

static PERCENT_PLACEHOLDER_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"%\((\w+)\)").ok());

static INDEX_SUFFIX_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\[\w*\]").ok());

static IDENTIFIER_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").ok());

/// Whether `text` is a syntactically valid Python identifier.
#[must_use]
pub fn is_identifier(text: &str) -> bool {
    IDENTIFIER_RE
        .as_ref()
        .is_some_and(|re| re.is_match(text))
}

/// The distinct `%(identifier)`-style placeholder names in a percent-format
/// template.
#[must_use]
pub fn percent_placeholders(template: &str) -> FxHashSet<String> {
    let Some(re) = PERCENT_PLACEHOLDER_RE.as_ref() else {
        return FxHashSet::default();
    };
    re.captures_iter(template)
        .filter_map(|captures| captures.get(1))
        .map(|m| m.as_str().to_owned())
        .collect()
}

/// Every identifier referenced by the replacement fields of a `str.format`
/// template: `[...]` indexing suffixes are stripped, dotted paths are split
/// on `.`, and only syntactically valid identifiers survive.
///
/// A malformed template (unbalanced braces) produces an empty result.
#[must_use]
pub fn format_identifiers(template: &str) -> Vec<String> {
    let Some(fields) = parse_replacement_fields(template) else {
        return Vec::new();
    };

    let mut identifiers = Vec::new();
    for field in fields {
        let stripped = match INDEX_SUFFIX_RE.as_ref() {
            Some(re) => re.replace_all(&field, "").into_owned(),
            None => field,
        };
        for segment in stripped.split('.') {
            if is_identifier(segment) {
                identifiers.push(segment.to_owned());
            }
        }
    }
    identifiers
}

/// Parses the replacement-field names out of a format template, honoring
/// `{{`/`}}` escapes and skipping conversion (`!r`) and format-spec (`:>8`)
/// suffixes, including one level of nested fields inside the spec.
///
/// Returns `None` for unbalanced braces, mirroring the host language's
/// formatter which rejects the whole template.
fn parse_replacement_fields(template: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    continue;
                }
                let mut name = String::new();
                let mut terminated = false;
                while let Some(c) = chars.next() {
                    match c {
                        '}' => {
                            terminated = true;
                            break;
                        }
                        '!' | ':' => {
                            let mut depth = 1usize;
                            for rest in chars.by_ref() {
                                match rest {
                                    '{' => depth += 1,
                                    '}' => {
                                        depth -= 1;
                                        if depth == 0 {
                                            break;
                                        }
                                    }
                                    _ => {}
                                }
                            }
                            if depth != 0 {
                                return None;
                            }
                            terminated = true;
                            break;
                        }
                        _ => name.push(c),
                    }
                }
                if !terminated {
                    return None;
                }
                if !name.is_empty() {
                    fields.push(name);
                }
            }
            '}' => {
                // A lone closing brace is malformed; "}}" is an escape.
                if chars.peek() == Some(&'}') {
                    chars.next();
                } else {
                    return None;
                }
            }
            _ => {}
        }
    }
    Some(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_placeholders() {
        let names = percent_placeholders("%(width)s x %(height)s = %(width)s");
        assert_eq!(names.len(), 2);
        assert!(names.contains("width"));
        assert!(names.contains("height"));
    }

    #[test]
    fn test_percent_placeholders_none() {
        assert!(percent_placeholders("100%% done").is_empty());
    }

    #[test]
    fn test_format_identifiers_plain() {
        assert_eq!(format_identifiers("{name} is {age}"), vec!["name", "age"]);
    }

    #[test]
    fn test_format_identifiers_dotted_and_indexed() {
        assert_eq!(
            format_identifiers("{user.email[0]} / {items[2]}"),
            vec!["user", "email", "items"]
        );
    }

    #[test]
    fn test_format_identifiers_skips_spec_and_escapes() {
        assert_eq!(
            format_identifiers("{{literal}} {value:>{width}} {flag!r}"),
            vec!["value", "flag"]
        );
    }

    #[test]
    fn test_format_identifiers_positional_only() {
        assert!(format_identifiers("{} and {0}").is_empty());
    }

    #[test]
    fn test_malformed_template_is_tolerated() {
        assert!(format_identifiers("{unclosed").is_empty());
        assert!(format_identifiers("closed}").is_empty());
    }
}
