//! Navigation tests for `Router::go`.

use switchyard::testing::{CountingHandler, RecordingHandler};
use switchyard::{
    BoxError, Go, History, HistoryError, NavigateOptions, Navigation, Params, RouterError, params,
};

mod common;
use common::{harness, search_routes};

#[test]
fn test_go_navigates_with_trigger() {
    let mut h = harness();
    let handler = RecordingHandler::new();
    h.router.route("search/:type", "search").method("search", handler.clone());

    let go = h
        .router
        .go("search", &params! { "type" => "name", "q" => "Joe" }, NavigateOptions::new())
        .unwrap();

    let Go::Navigated { url, dispatch } = go else {
        panic!("expected a navigation");
    };
    assert_eq!(url, "search/name?q=Joe");
    assert!(dispatch.is_some());
    assert_eq!(
        h.history.navigations(),
        vec![Navigation {
            fragment: "search/name?q=Joe".to_string(),
            options: NavigateOptions::new().trigger(true),
        }]
    );
    assert_eq!(handler.last().unwrap(), params! { "type" => "name", "q" => "Joe" });
}

#[test]
fn test_go_passes_options_through() {
    let mut h = harness();
    let handler = RecordingHandler::new();
    search_routes(&mut h.router, handler.clone());

    let options = NavigateOptions::new().trigger(false).replace(true);
    let go = h.router.go("search", &params! { "type" => "name" }, options).unwrap();

    assert_eq!(
        go,
        Go::Navigated {
            url: "search/name".to_string(),
            dispatch: None,
        }
    );
    assert_eq!(h.history.navigations()[0].options, options);
    assert_eq!(h.history.entries(), vec!["search/name"]);
    assert_eq!(handler.count(), 0);
}

#[test]
fn test_go_to_current_fragment_does_not_dispatch() {
    let mut h = harness();
    let handler = CountingHandler::new();
    h.router.route("about", "about").method("about", handler.clone());

    h.router.go("about", &Params::new(), NavigateOptions::new()).unwrap();
    h.router.go("about", &Params::new(), NavigateOptions::new()).unwrap();
    assert_eq!(handler.count(), 1);
    assert_eq!(h.history.fragment(), "about");
}

#[test]
fn test_go_falls_back_to_method() {
    let mut h = harness();
    let handler = RecordingHandler::new();
    h.router.route("users/:id", "user").method("user", handler.clone());

    // required `id` missing: no URL, so the method runs directly
    let go = h
        .router
        .go("user", &params! { "name" => "joe" }, NavigateOptions::new())
        .unwrap();

    assert_eq!(go, Go::Called);
    assert_eq!(handler.last().unwrap(), params! { "name" => "joe" });
    assert!(h.history.navigations().is_empty());
    assert_eq!(h.events.count(), 0);
}

#[test]
fn test_go_without_route_or_method() {
    let h = harness();
    let err = h
        .router
        .go("nowhere", &Params::new(), NavigateOptions::new())
        .unwrap_err();

    assert!(matches!(&err, RouterError::NoRouteOrMethod(name) if name == "nowhere"));
    assert_eq!(err.to_string(), "no method or matching route exists for `nowhere`");
}

#[test]
fn test_go_method_error() {
    let mut h = harness();
    h.router.method("explode", |_: &Params| -> Result<(), BoxError> {
        Err("kaboom".into())
    });

    let err = h
        .router
        .go("explode", &Params::new(), NavigateOptions::new())
        .unwrap_err();
    let RouterError::Method { name, source } = err else {
        panic!("expected a method error");
    };
    assert_eq!(name, "explode");
    assert_eq!(source.to_string(), "kaboom");
}

#[test]
fn test_go_history_rejected() {
    let mut h = harness();
    let handler = CountingHandler::new();
    h.router.route("about", "about").method("about", handler.clone());
    h.history.block("read only");

    let err = h
        .router
        .go("about", &Params::new(), NavigateOptions::new())
        .unwrap_err();
    assert!(matches!(
        err,
        RouterError::History(HistoryError::Rejected(reason)) if reason == "read only"
    ));
    assert_eq!(handler.count(), 0);
}

#[test]
fn test_go_dispatch_error() {
    let mut h = harness();
    h.router.route_to("fail", "fail", |_: &Params| -> Result<(), BoxError> {
        Err("handler failed".into())
    });

    let err = h
        .router
        .go("fail", &Params::new(), NavigateOptions::new())
        .unwrap_err();
    assert!(matches!(err, RouterError::Dispatch(_)));
    assert_eq!(err.to_string(), "handler failed");
    // the history still moved
    assert_eq!(h.history.fragment(), "fail");
}
