use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use timeside_router::dispatcher::{DispatchError, Dispatcher, HandlerRequest, HandlerResponse};
use timeside_router::middleware::{Middleware, MetricsMiddleware};
use timeside_router::router::Router;
use timeside_router::table::{app_routes, RouteMeta, RouteTable};

fn single_route(pattern: &str, handler: &str) -> (RouteTable, Router) {
    let table = RouteTable::new(vec![RouteMeta::new(pattern, handler)]).unwrap();
    let router = Router::new(&table).unwrap();
    (table, router)
}

#[test]
fn test_dispatch_calls_handler_once() {
    let (_, router) = single_route("reset/:token", "auth_newpassword");
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);

    let mut dispatcher = Dispatcher::new();
    dispatcher.register_handler("auth_newpassword", move |req| {
        seen.fetch_add(1, Ordering::SeqCst);
        HandlerResponse::render_with(
            "auth/new_password",
            serde_json::json!({ "token": req.get_path_param("token") }),
        )
    });

    let response = dispatcher.dispatch(router.route("reset/xyz").unwrap()).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        response,
        HandlerResponse::render_with("auth/new_password", serde_json::json!({ "token": "xyz" }))
    );
}

#[test]
fn test_dispatch_unknown_handler() {
    let (_, router) = single_route("logout", "logout");
    let dispatcher = Dispatcher::new();
    let err = dispatcher.dispatch(router.route("logout").unwrap()).unwrap_err();
    assert_eq!(
        err,
        DispatchError::HandlerNotFound {
            handler_name: "logout".into()
        }
    );
}

#[test]
fn test_verify_lists_missing_handlers() {
    let mut dispatcher = Dispatcher::new();
    dispatcher.register_handler("home", |_| HandlerResponse::render("home"));
    let err = dispatcher.verify(app_routes()).unwrap_err();
    assert_eq!(
        err,
        DispatchError::MissingHandlers {
            handlers: vec![
                "temp_home".into(),
                "auth_forgetpassword".into(),
                "auth_newpassword".into(),
                "logout".into(),
            ]
        }
    );
}

#[test]
fn test_verify_ignores_disabled_routes() {
    let table = RouteTable::new(vec![
        RouteMeta::new("", "home"),
        RouteMeta::disabled("users/list", "list_users"),
    ])
    .unwrap();
    let mut dispatcher = Dispatcher::new();
    dispatcher.register_handler("home", |_| HandlerResponse::render("home"));
    assert!(dispatcher.verify(&table).is_ok());
}

#[test]
fn test_handler_panic_is_contained() {
    let (_, router) = single_route("logout", "logout");
    let mut dispatcher = Dispatcher::new();
    dispatcher.register_handler("logout", |_| panic!("session store unavailable"));
    let err = dispatcher.dispatch(router.route("logout").unwrap()).unwrap_err();
    assert_eq!(
        err,
        DispatchError::HandlerPanicked {
            handler_name: "logout".into(),
            message: "session store unavailable".into()
        }
    );
}

#[test]
fn test_reregistration_replaces_handler() {
    let (_, router) = single_route("", "home");
    let mut dispatcher = Dispatcher::new();
    dispatcher.register_handler("home", |_| HandlerResponse::render("old"));
    dispatcher.register_handler("home", |_| HandlerResponse::render("new"));
    assert_eq!(dispatcher.handlers.len(), 1);
    let response = dispatcher.dispatch(router.route("").unwrap()).unwrap();
    assert_eq!(response, HandlerResponse::render("new"));
}

struct Guard;

impl Middleware for Guard {
    fn before(&self, req: &HandlerRequest) -> Option<HandlerResponse> {
        (req.handler_name == "logout").then(|| HandlerResponse::redirect("auth/forgetpassword"))
    }
}

#[test]
fn test_middleware_short_circuit_and_metrics() {
    let (_, router) = single_route("logout", "logout");
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let metrics = Arc::new(MetricsMiddleware::new());

    let mut dispatcher = Dispatcher::new();
    dispatcher.add_middleware(Arc::new(Guard));
    dispatcher.add_middleware(Arc::clone(&metrics) as Arc<dyn Middleware>);
    dispatcher.register_handler("logout", move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
        HandlerResponse::redirect("")
    });

    let response = dispatcher.dispatch(router.route("logout").unwrap()).unwrap();
    assert_eq!(response, HandlerResponse::redirect("auth/forgetpassword"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(metrics.dispatch_count(), 1);
    assert_eq!(metrics.redirect_count(), 1);
    assert_eq!(metrics.handler_count("logout"), 1);
    assert!(metrics.average_latency() < Duration::from_secs(1));
}
