//! Reverse routing tests.

use switchyard::testing::RecordingHandler;
use switchyard::{Params, QueryConfig, Router, params};

mod common;
use common::{harness, search_routes};

#[test]
fn test_specificity_selection() {
    let mut h = harness();
    h.router.route("search/:type", "search").route("search", "search");

    assert_eq!(
        h.router.url("search", &params! { "type" => "x" }).as_deref(),
        Some("search/x")
    );
    assert_eq!(h.router.url("search", &Params::new()).as_deref(), Some("search"));
}

#[test]
fn test_specificity_ignores_registration_order() {
    let mut h = harness();
    search_routes(&mut h.router, RecordingHandler::new());

    let mut reversed = harness();
    reversed
        .router
        .route("search", "search")
        .route("search/:type", "search")
        .route("search/:type/p:page", "search");

    let params = params! { "type" => "name", "page" => "2" };
    assert_eq!(h.router.url("search", &params).as_deref(), Some("search/name/p2"));
    assert_eq!(reversed.router.url("search", &params), h.router.url("search", &params));
}

#[test]
fn test_optional_collapse() {
    let mut h = harness();
    h.router
        .route("search(/name/:name)/:query", "search");

    assert_eq!(
        h.router
            .url("search", &params! { "name" => "myfoo", "query" => "bar" })
            .as_deref(),
        Some("search/name/myfoo/bar")
    );
    assert_eq!(
        h.router.url("search", &params! { "query" => "bar" }).as_deref(),
        Some("search/bar")
    );
}

#[test]
fn test_leftover_params_become_query() {
    let mut h = harness();
    h.router.route("search/:type", "search");

    assert_eq!(
        h.router
            .url("search", &params! { "type" => "name", "q" => "Joe Strummer", "page" => "2" })
            .as_deref(),
        Some("search/name?page=2&q=Joe+Strummer")
    );
}

#[test]
fn test_undefined_counts_as_present() {
    let mut h = harness();
    h.router.route("users/:id/edit", "edit");

    let mut params = Params::new();
    params.insert_undefined("id");
    assert_eq!(h.router.url("edit", &params).as_deref(), Some("users//edit"));
}

#[test]
fn test_no_candidate() {
    let mut h = harness();
    h.router.route("users/:id", "user");
    h.router.route_unnamed("about", |_: &Params| ());

    assert_eq!(h.router.url("user", &params! { "name" => "joe" }), None);
    assert_eq!(h.router.url("about", &Params::new()), None);
    assert_eq!(h.router.url("missing", &Params::new()), None);
}

#[test]
fn test_per_router_encoder() {
    let query = QueryConfig::new().with_encode(|params: &Params| {
        format!("name={}_strummer", params.get("name").unwrap_or_default())
    });
    let mut router = Router::default().with_query_config(query);
    router.route("search", "search");

    assert_eq!(
        router.url("search", &params! { "name" => "joe" }).as_deref(),
        Some("search?name=joe_strummer")
    );
}

#[test]
fn test_built_url_dispatches_back() {
    let mut h = harness();
    h.router.route("files/:name/*rest", "files");

    let params = params! { "name" => "100%25done", "rest" => "a b/c", "q" => "x%y" };
    let url = h.router.url("files", &params).unwrap();
    assert_eq!(url, "files/100%2525done/a%20b/c?q=x%25y");

    let dispatch = h.router.dispatch(&url).unwrap();
    assert_eq!(dispatch.params(), Some(&params));
}
