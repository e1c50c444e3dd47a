//! Reverse routing.

use crate::registry::RouteRegistry;
use switchyard_core::{Params, QueryConfig};

/// Builds URLs from route names and parameter mappings.
///
/// Candidates registered under a name are tried most specific first; the
/// first whose required parameters are all present is rendered. Parameters
/// the pattern does not consume are appended as a query string.
#[derive(Debug)]
pub struct UrlBuilder<'a> {
    registry: &'a RouteRegistry,
    query: QueryConfig,
}

impl<'a> UrlBuilder<'a> {
    /// Build against `registry`, encoding leftovers with `query`.
    pub fn new(registry: &'a RouteRegistry, query: QueryConfig) -> Self {
        Self { registry, query }
    }

    /// The URL for route `name`, or `None` when no candidate fits `params`.
    ///
    /// Path values are percent-encoded. Leftover keys go through the
    /// configured encoder; a `?` is added only when it produces something.
    pub fn build(&self, name: &str, params: &Params) -> Option<String> {
        let entry = self.registry.lookup(name).iter().find(|entry| {
            entry
                .pattern()
                .required_param_names()
                .all(|required| params.contains_key(required))
        });

        let Some(entry) = entry else {
            #[cfg(feature = "tracing")]
            tracing::debug!(route = %name, ?params, "No URL candidate for route");
            return None;
        };

        let pattern = entry.pattern();
        let mut url = pattern.render(params)?;

        let mut leftover = params.clone();
        for consumed in pattern.param_names() {
            leftover.remove(consumed);
        }
        let query = self.query.encode(&leftover);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(route = %name, pattern = %pattern, url = %url, "Built URL");

        Some(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchyard_core::params;

    fn search_registry() -> RouteRegistry {
        let mut registry = RouteRegistry::new();
        registry.register("search/:query", Some("search"), None);
        registry.register("search/:query/p:page", Some("search"), None);
        registry.register("search", Some("search"), None);
        registry
    }

    fn build(registry: &RouteRegistry, name: &str, params: &Params) -> Option<String> {
        UrlBuilder::new(registry, QueryConfig::new()).build(name, params)
    }

    #[test]
    fn test_picks_most_specific_candidate() {
        let registry = search_registry();
        assert_eq!(
            build(&registry, "search", &params! { "query" => "joe", "page" => "2" }).as_deref(),
            Some("search/joe/p2")
        );
        assert_eq!(
            build(&registry, "search", &params! { "query" => "joe" }).as_deref(),
            Some("search/joe")
        );
        assert_eq!(build(&registry, "search", &Params::new()).as_deref(), Some("search"));
    }

    #[test]
    fn test_leftovers_become_query() {
        let registry = search_registry();
        assert_eq!(
            build(&registry, "search", &params! { "query" => "joe", "sort" => "new order" })
                .as_deref(),
            Some("search/joe?sort=new+order")
        );
        assert_eq!(
            build(&registry, "search", &params! { "x" => "1" }).as_deref(),
            Some("search?x=1")
        );
    }

    #[test]
    fn test_unknown_name() {
        let registry = search_registry();
        assert_eq!(build(&registry, "missing", &Params::new()), None);
    }

    #[test]
    fn test_missing_required_param() {
        let mut registry = RouteRegistry::new();
        registry.register("users/:id", Some("user"), None);
        assert_eq!(build(&registry, "user", &params! { "name" => "joe" }), None);
    }

    #[test]
    fn test_optional_group_omitted_without_value() {
        let mut registry = RouteRegistry::new();
        registry.register("docs(/:section)", Some("docs"), None);
        assert_eq!(build(&registry, "docs", &Params::new()).as_deref(), Some("docs"));
        assert_eq!(
            build(&registry, "docs", &params! { "section" => "intro" }).as_deref(),
            Some("docs/intro")
        );
    }

    #[test]
    fn test_custom_encoder() {
        let registry = search_registry();
        let query = QueryConfig::new().with_encode(|params: &Params| {
            params.keys().collect::<Vec<_>>().join(",")
        });
        let url = UrlBuilder::new(&registry, query)
            .build("search", &params! { "query" => "joe", "a" => "1", "b" => "2" });
        assert_eq!(url.as_deref(), Some("search/joe?a,b"));
    }
}
