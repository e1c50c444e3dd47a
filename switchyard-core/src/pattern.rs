//! Route pattern compilation.
//!
//! A route pattern is a path template with three kinds of tokens:
//!
//! | Token | Example | Matches |
//! |-------|---------|---------|
//! | named | `:type` | one path component, up to the next `/` or `?` |
//! | splat | `*path` | everything, including `/`, as much as possible |
//! | optional group | `(/page:page)` | the literal prefix plus the token, or nothing |
//!
//! All other characters are literals and are escaped in the generated matcher.
//!
//! Captured values are percent-decoded, and [`RoutePattern::render`]
//! percent-encodes them again, so a built path dispatches back to the same
//! values. Splat values keep their `/` separators.
//!
//! # Malformed optional groups
//!
//! An optional group must contain exactly one token. Groups with several
//! tokens are not supported: they compile, every token inside is recorded as
//! optional, and the URL builder renders the group only when its *first* token
//! has a value. Such patterns carry no guarantee of matching or building
//! sensibly. A `(` without a closing `)` is a literal, and parentheses do not
//! nest.

use crate::params::Params;
use crate::query::percent_decode;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParamKind {
    Named,
    Splat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param { kind: ParamKind, name: String },
    Optional(Vec<Segment>),
}

impl Segment {
    fn first_param(segments: &[Segment]) -> Option<&str> {
        segments.iter().find_map(|segment| match segment {
            Segment::Param { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone)]
enum Source {
    Template(Vec<Segment>),
    Regex,
}

/// A compiled route pattern.
///
/// Immutable once built. `param_names` follows the capture-group order of the
/// matcher, which is also the left-to-right order of the tokens in the raw
/// pattern.
#[derive(Clone)]
pub struct RoutePattern {
    raw: String,
    matcher: Regex,
    param_names: Vec<String>,
    optional_param_names: BTreeSet<String>,
    source: Source,
}

impl fmt::Debug for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutePattern")
            .field("raw", &self.raw)
            .field("matcher", &self.matcher.as_str())
            .field("param_names", &self.param_names)
            .field("optional_param_names", &self.optional_param_names)
            .finish()
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl RoutePattern {
    /// Compile a route pattern.
    ///
    /// ```rust
    /// use switchyard_core::RoutePattern;
    ///
    /// let pattern = RoutePattern::compile("search/:type(/p:page)/*rest");
    /// assert_eq!(pattern.param_names(), ["type", "page", "rest"]);
    /// assert!(pattern.is_optional("page"));
    /// assert!(pattern.is_match("search/name/a/b"));
    /// ```
    pub fn compile(pattern: &str) -> Self {
        Self::try_compile(pattern).expect("escaped route pattern is always a valid regex")
    }

    /// Compile a route pattern, reporting regex construction failures (only
    /// possible when the pattern exceeds the regex size limit).
    pub fn try_compile(pattern: &str) -> Result<Self, regex::Error> {
        let segments = scan(pattern, true);

        let mut source = String::from("^");
        write_regex(&segments, &mut source);
        source.push('$');

        let mut param_names = Vec::new();
        let mut optional_param_names = BTreeSet::new();
        collect_names(&segments, false, &mut param_names, &mut optional_param_names);

        Ok(Self {
            raw: pattern.to_string(),
            matcher: Regex::new(&source)?,
            param_names,
            optional_param_names,
            source: Source::Template(segments),
        })
    }

    /// Wrap a raw regular expression as a route.
    ///
    /// Captures are keyed by their zero-based index (`"0"`, `"1"`, ...). Such a
    /// route can be matched but never reverse-built.
    pub fn from_regex(matcher: Regex) -> Self {
        Self {
            raw: matcher.as_str().to_string(),
            matcher,
            param_names: Vec::new(),
            optional_param_names: BTreeSet::new(),
            source: Source::Regex,
        }
    }

    /// The pattern text as registered.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The compiled matcher.
    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    /// Parameter names in token order.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Names of the parameters declared inside optional groups.
    pub fn optional_param_names(&self) -> &BTreeSet<String> {
        &self.optional_param_names
    }

    /// Whether `name` is declared inside an optional group.
    pub fn is_optional(&self, name: &str) -> bool {
        self.optional_param_names.contains(name)
    }

    /// Parameter names that must be supplied to build a URL.
    pub fn required_param_names(&self) -> impl Iterator<Item = &str> {
        self.param_names
            .iter()
            .filter(|name| !self.optional_param_names.contains(*name))
            .map(String::as_str)
    }

    /// Whether URLs can be built from this pattern.
    pub fn is_reverse_routable(&self) -> bool {
        matches!(self.source, Source::Template(_))
    }

    /// Whether `base` (a path without query string) matches.
    pub fn is_match(&self, base: &str) -> bool {
        self.matcher.is_match(base)
    }

    /// Extract parameter values from `base`.
    ///
    /// Captures are zipped with [`param_names`](Self::param_names) in order and
    /// percent-decoded. A capture that did not participate in the match, or
    /// matched the empty string, yields `None`. Captures beyond the known names
    /// are keyed by their index.
    pub fn extract(&self, base: &str) -> Option<Vec<(String, Option<String>)>> {
        let captures = self.matcher.captures(base)?;
        let values = captures
            .iter()
            .skip(1)
            .enumerate()
            .map(|(index, capture)| {
                let key = self
                    .param_names
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| index.to_string());
                let value = capture
                    .map(|m| m.as_str())
                    .filter(|value| !value.is_empty())
                    .map(percent_decode);
                (key, value)
            })
            .collect();
        Some(values)
    }

    /// Render the path for `params`, without a query string.
    ///
    /// Tokens with a string value are substituted, percent-encoded; tokens
    /// without one collapse to nothing, together with their optional group. Returns `None` for
    /// regex routes.
    pub fn render(&self, params: &Params) -> Option<String> {
        match &self.source {
            Source::Template(segments) => {
                let mut path = String::with_capacity(self.raw.len());
                render_segments(segments, params, &mut path);
                Some(path)
            }
            Source::Regex => None,
        }
    }
}

fn scan(input: &str, groups: bool) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = input;

    while let Some(c) = rest.chars().next() {
        let after = &rest[c.len_utf8()..];

        if groups && c == '(' {
            if let Some(end) = after.find(')') {
                flush_literal(&mut literal, &mut segments);
                segments.push(Segment::Optional(scan(&after[..end], false)));
                rest = &after[end + 1..];
                continue;
            }
        }

        let kind = match c {
            ':' => Some(ParamKind::Named),
            '*' => Some(ParamKind::Splat),
            _ => None,
        };
        if let Some(kind) = kind {
            let len = word_len(after);
            if len > 0 {
                flush_literal(&mut literal, &mut segments);
                segments.push(Segment::Param {
                    kind,
                    name: after[..len].to_string(),
                });
                rest = &after[len..];
                continue;
            }
        }

        literal.push(c);
        rest = after;
    }

    flush_literal(&mut literal, &mut segments);
    segments
}

fn word_len(s: &str) -> usize {
    s.bytes()
        .position(|b| !(b.is_ascii_alphanumeric() || b == b'_'))
        .unwrap_or(s.len())
}

fn flush_literal(literal: &mut String, segments: &mut Vec<Segment>) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}

fn write_regex(segments: &[Segment], out: &mut String) {
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(&regex::escape(text)),
            Segment::Param {
                kind: ParamKind::Named,
                ..
            } => out.push_str("([^/?]+)"),
            Segment::Param {
                kind: ParamKind::Splat,
                ..
            } => out.push_str("([^?]*)"),
            Segment::Optional(inner) => {
                out.push_str("(?:");
                write_regex(inner, out);
                out.push_str(")?");
            }
        }
    }
}

fn collect_names(
    segments: &[Segment],
    optional: bool,
    names: &mut Vec<String>,
    optionals: &mut BTreeSet<String>,
) {
    for segment in segments {
        match segment {
            Segment::Literal(_) => {}
            Segment::Param { name, .. } => {
                names.push(name.clone());
                if optional {
                    optionals.insert(name.clone());
                }
            }
            Segment::Optional(inner) => collect_names(inner, true, names, optionals),
        }
    }
}

fn render_segments(segments: &[Segment], params: &Params, out: &mut String) {
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Param { kind, name } => {
                if let Some(value) = params.get(name) {
                    encode_value(*kind, value, out);
                }
            }
            Segment::Optional(inner) => {
                let present = Segment::first_param(inner)
                    .and_then(|name| params.get(name))
                    .is_some();
                if present {
                    render_segments(inner, params, out);
                }
            }
        }
    }
}

fn encode_value(kind: ParamKind, value: &str, out: &mut String) {
    match kind {
        ParamKind::Named => out.push_str(&urlencoding::encode(value)),
        ParamKind::Splat => {
            for (index, part) in value.split('/').enumerate() {
                if index > 0 {
                    out.push('/');
                }
                out.push_str(&urlencoding::encode(part));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    fn extracted(pattern: &RoutePattern, base: &str) -> Vec<(String, Option<String>)> {
        pattern.extract(base).expect("pattern should match")
    }

    #[test]
    fn test_static_pattern_has_no_params() {
        let pattern = RoutePattern::compile("search");
        assert!(pattern.param_names().is_empty());
        assert!(pattern.is_match("search"));
        assert!(!pattern.is_match("search/more"));
        assert!(!pattern.is_match("research"));
    }

    #[test]
    fn test_named_param_stops_at_separator() {
        let pattern = RoutePattern::compile("search/:type");
        assert_eq!(
            extracted(&pattern, "search/name"),
            vec![("type".to_string(), Some("name".to_string()))]
        );
        assert!(!pattern.is_match("search/name/other"));
    }

    #[test]
    fn test_splat_captures_separators() {
        let pattern = RoutePattern::compile("search*splat");
        assert_eq!(
            extracted(&pattern, "search/name/other"),
            vec![("splat".to_string(), Some("/name/other".to_string()))]
        );
    }

    #[test]
    fn test_splat_is_greedy() {
        let pattern = RoutePattern::compile("*a/*b");
        assert_eq!(
            extracted(&pattern, "x/y/z"),
            vec![
                ("a".to_string(), Some("x/y".to_string())),
                ("b".to_string(), Some("z".to_string())),
            ]
        );
    }

    #[test]
    fn test_splat_swallows_trailing_optional_group() {
        let pattern = RoutePattern::compile("docs/*path(/p:page)");
        assert_eq!(
            extracted(&pattern, "docs/guide/intro/p2"),
            vec![
                ("path".to_string(), Some("guide/intro/p2".to_string())),
                ("page".to_string(), None),
            ]
        );
    }

    #[test]
    fn test_optional_group_names() {
        let pattern = RoutePattern::compile("search/:type(/my:optional)/:other");
        assert_eq!(pattern.param_names(), ["type", "optional", "other"]);
        assert!(pattern.is_optional("optional"));
        assert_eq!(
            pattern.required_param_names().collect::<Vec<_>>(),
            vec!["type", "other"]
        );
    }

    #[test]
    fn test_optional_group_matching() {
        let pattern = RoutePattern::compile("search/:type(/my:optional)/:other");

        let without = extracted(&pattern, "search/name/foo");
        assert_eq!(without[0].1.as_deref(), Some("name"));
        assert_eq!(without[1].1, None);
        assert_eq!(without[2].1.as_deref(), Some("foo"));

        let with = extracted(&pattern, "search/name/myfoo/bar");
        assert_eq!(with[1].1.as_deref(), Some("foo"));
        assert_eq!(with[2].1.as_deref(), Some("bar"));
    }

    #[test]
    fn test_literals_are_escaped() {
        let pattern = RoutePattern::compile("files/v1.0/:name+");
        assert!(pattern.is_match("files/v1.0/readme+"));
        assert!(!pattern.is_match("files/v100/readme+"));
    }

    #[test]
    fn test_colon_without_name_is_literal() {
        let pattern = RoutePattern::compile("time/12:/:zone");
        assert_eq!(pattern.param_names(), ["zone"]);
        assert!(pattern.is_match("time/12:/utc"));
    }

    #[test]
    fn test_captures_are_percent_decoded() {
        let pattern = RoutePattern::compile("users/:name");
        assert_eq!(
            extracted(&pattern, "users/Joe%20Strummer")[0].1.as_deref(),
            Some("Joe Strummer")
        );
    }

    #[test]
    fn test_render_percent_encodes_values() {
        let pattern = RoutePattern::compile("files/:name/*rest");
        let params = params! { "name" => "100%25 done", "rest" => "a b/c%d" };
        let path = pattern.render(&params).unwrap();
        assert_eq!(path, "files/100%2525%20done/a%20b/c%25d");

        let values = extracted(&pattern, &path);
        assert_eq!(values[0].1.as_deref(), Some("100%25 done"));
        assert_eq!(values[1].1.as_deref(), Some("a b/c%d"));
    }

    #[test]
    fn test_regex_route_keys_by_index() {
        let pattern = RoutePattern::from_regex(Regex::new(r"^page/(\d+)/(\w+)$").unwrap());
        assert!(!pattern.is_reverse_routable());
        assert_eq!(
            extracted(&pattern, "page/3/intro"),
            vec![
                ("0".to_string(), Some("3".to_string())),
                ("1".to_string(), Some("intro".to_string())),
            ]
        );
        assert_eq!(pattern.render(&Params::new()), None);
    }

    #[test]
    fn test_render_collapses_missing_optional() {
        let pattern = RoutePattern::compile("search/:type(/my:optional)/*other");
        assert_eq!(
            pattern
                .render(&params! { "type" => "name", "optional" => "foo", "other" => "bar" })
                .as_deref(),
            Some("search/name/myfoo/bar")
        );
        assert_eq!(
            pattern
                .render(&params! { "type" => "name", "other" => "bar" })
                .as_deref(),
            Some("search/name/bar")
        );
    }

    #[test]
    fn test_render_blanks_missing_required() {
        let pattern = RoutePattern::compile("users/:id/edit");
        assert_eq!(pattern.render(&Params::new()).as_deref(), Some("users//edit"));
    }

    #[test]
    fn test_malformed_group_marks_every_token_optional() {
        let pattern = RoutePattern::compile("a(/:x/:y)");
        assert_eq!(pattern.param_names(), ["x", "y"]);
        assert!(pattern.is_optional("x"));
        assert!(pattern.is_optional("y"));
        assert_eq!(
            pattern.render(&params! { "y" => "2" }).as_deref(),
            Some("a")
        );
    }
}
