//! Filter scoping by route name.

use std::collections::BTreeSet;

/// Restricts a filter to a subset of routes.
///
/// `only` limits the filter to the listed routes; `except` excludes the listed
/// routes. When both are set and a route appears in both, `except` wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterScope {
    only: Option<BTreeSet<String>>,
    except: Option<BTreeSet<String>>,
}

impl FilterScope {
    /// Applies to every route.
    pub fn all() -> Self {
        Self::default()
    }

    /// Limit to `routes`.
    pub fn only<I, S>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = Some(routes.into_iter().map(Into::into).collect());
        self
    }

    /// Exclude `routes`.
    pub fn except<I, S>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.except = Some(routes.into_iter().map(Into::into).collect());
        self
    }

    /// Whether the filter runs for `route`.
    pub fn applies(&self, route: &str) -> bool {
        if self.except.as_ref().is_some_and(|except| except.contains(route)) {
            return false;
        }
        self.only.as_ref().is_none_or(|only| only.contains(route))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_applies_everywhere() {
        assert!(FilterScope::all().applies("home"));
        assert!(FilterScope::all().applies(""));
    }

    #[test]
    fn test_only() {
        let scope = FilterScope::all().only(["search", "users"]);
        assert!(scope.applies("search"));
        assert!(!scope.applies("home"));
    }

    #[test]
    fn test_except() {
        let scope = FilterScope::all().except(["login"]);
        assert!(scope.applies("home"));
        assert!(!scope.applies("login"));
    }

    #[test]
    fn test_except_wins_over_only() {
        let scope = FilterScope::all().only(["a", "b"]).except(["b"]);
        assert!(scope.applies("a"));
        assert!(!scope.applies("b"));
        assert!(!scope.applies("c"));
    }

    #[test]
    fn test_empty_only_applies_nowhere() {
        let scope = FilterScope::all().only(Vec::<String>::new());
        assert!(!scope.applies("home"));
    }
}
