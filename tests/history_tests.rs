use std::sync::{Arc, Mutex};

use timeside_router::controller::AppController;
use timeside_router::dispatcher::{DispatchError, Dispatcher, HandlerRequest, HandlerResponse};
use timeside_router::history::{History, HistoryConfig, NavigateOptions, Navigation};
use timeside_router::ids::NavigationId;
use timeside_router::middleware::{Middleware, MetricsMiddleware};
use timeside_router::registry::register_all;
use timeside_router::router::Router;
use timeside_router::table::{app_routes, RouteMeta, RouteTable};

fn player() -> (History, Arc<MetricsMiddleware>, Arc<AppController>) {
    let controller = Arc::new(AppController::new());
    let metrics = Arc::new(MetricsMiddleware::new());
    let mut dispatcher = Dispatcher::new();
    dispatcher.add_middleware(Arc::clone(&metrics) as Arc<dyn Middleware>);
    register_all(&mut dispatcher, Arc::clone(&controller));
    let router = Router::new(app_routes()).unwrap();
    let history = History::new(router, dispatcher, app_routes(), HistoryConfig::default()).unwrap();
    (history, metrics, controller)
}

fn dispatched_handler(nav: &Navigation) -> &str {
    match nav {
        Navigation::Dispatched { handler_name, .. } => handler_name,
        other => panic!("expected dispatch, got {other:?}"),
    }
}

#[test]
fn test_each_route_dispatches_exactly_once() {
    let cases = [
        ("", "home"),
        ("temp_hom", "temp_home"),
        ("auth/forgetpassword", "auth_forgetpassword"),
        ("reset/tok", "auth_newpassword"),
    ];
    for (url, handler) in cases {
        let (mut history, metrics, _) = player();
        let nav = history.start(url).unwrap();
        assert_eq!(dispatched_handler(&nav), handler);
        assert_eq!(metrics.dispatch_count(), 1, "{url}");
        assert_eq!(metrics.handler_count(handler), 1, "{url}");
    }
}

#[test]
fn test_logout_clears_user_and_redirects_home() {
    let (mut history, metrics, controller) = player();
    controller.set_user("ada");
    history.start("temp_hom").unwrap();

    let nav = history.navigate("#logout", NavigateOptions::trigger()).unwrap();
    match nav {
        Navigation::Dispatched {
            fragment,
            handler_name,
            response,
            redirects,
            ..
        } => {
            assert_eq!(fragment, "");
            assert_eq!(handler_name, "home");
            assert_eq!(redirects, vec!["".to_string()]);
            assert_eq!(
                response,
                HandlerResponse::render_with("home", serde_json::json!({ "user": null }))
            );
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(controller.current_user(), None);
    assert_eq!(metrics.handler_count("logout"), 1);
    assert_eq!(metrics.handler_count("home"), 1);
    assert_eq!(history.current(), Some(""));
    assert_eq!(history.visited(), vec!["temp_hom", "logout", ""]);
}

#[test]
fn test_reset_renders_token() {
    let (mut history, _, _) = player();
    let nav = history
        .navigate("#reset/a%2Fb%3Fc", NavigateOptions::trigger())
        .unwrap();
    match nav {
        Navigation::Dispatched { response, .. } => assert_eq!(
            response,
            HandlerResponse::render_with(
                "auth/new_password",
                serde_json::json!({ "token": "a/b?c" })
            )
        ),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_same_fragment_is_ignored_unless_forced() {
    let (mut history, metrics, _) = player();
    history.start("auth/forgetpassword").unwrap();

    let nav = history
        .navigate("/auth/forgetpassword", NavigateOptions::trigger())
        .unwrap();
    assert_eq!(
        nav,
        Navigation::Unchanged {
            fragment: "auth/forgetpassword".into()
        }
    );
    assert_eq!(metrics.dispatch_count(), 1);

    history
        .navigate("auth/forgetpassword", NavigateOptions::forced())
        .unwrap();
    assert_eq!(metrics.dispatch_count(), 2);
}

#[test]
fn test_navigate_without_trigger_records_only() {
    let (mut history, metrics, _) = player();
    let nav = history
        .navigate("temp_hom", NavigateOptions::default())
        .unwrap();
    assert_eq!(
        nav,
        Navigation::Recorded {
            fragment: "temp_hom".into()
        }
    );
    assert_eq!(history.current(), Some("temp_hom"));
    assert_eq!(metrics.dispatch_count(), 0);
}

#[test]
fn test_unmatched_and_disabled_are_not_found() {
    let (mut history, metrics, _) = player();
    for url in ["nowhere", "users/list", "users/edit/3"] {
        let nav = history.navigate(url, NavigateOptions::trigger()).unwrap();
        assert!(matches!(nav, Navigation::NotFound { .. }), "{url}");
    }
    assert_eq!(metrics.dispatch_count(), 0);
}

#[test]
fn test_missing_handler_rejected_at_construction() {
    let router = Router::new(app_routes()).unwrap();
    let err = History::new(router, Dispatcher::new(), app_routes(), HistoryConfig::default())
        .unwrap_err();
    assert!(matches!(err, DispatchError::MissingHandlers { ref handlers } if handlers.len() == 5));
}

#[test]
fn test_redirect_loop_is_bounded() {
    let table = RouteTable::new(vec![
        RouteMeta::new("ping", "ping"),
        RouteMeta::new("pong", "pong"),
    ])
    .unwrap();
    let mut dispatcher = Dispatcher::new();
    dispatcher.register_handler("ping", |_| HandlerResponse::redirect("pong"));
    dispatcher.register_handler("pong", |_| HandlerResponse::redirect("#ping"));
    let router = Router::new(&table).unwrap();
    let mut history = History::new(
        router,
        dispatcher,
        &table,
        HistoryConfig {
            max_redirects: 3,
            ..HistoryConfig::default()
        },
    )
    .unwrap();

    let err = history.navigate("ping", NavigateOptions::trigger()).unwrap_err();
    assert_eq!(
        err,
        DispatchError::RedirectLoop {
            fragment: "ping".into(),
            limit: 3
        }
    );
    assert_eq!(history.visited(), vec!["ping", "pong", "ping", "pong"]);
}

#[test]
fn test_navigation_matches_router_for_raw_urls() {
    let router = Router::new(app_routes()).unwrap();
    for url in ["http://player.local/app#reset/ab#cd", "//logout"] {
        let (mut history, _, _) = player();
        let nav = history.navigate(url, NavigateOptions::trigger()).unwrap();
        match router.route(url) {
            Some(m) => match nav {
                Navigation::Dispatched {
                    fragment,
                    handler_name,
                    ..
                } => {
                    assert_eq!(fragment, m.fragment, "{url}");
                    assert_eq!(handler_name, m.handler_name, "{url}");
                }
                other => panic!("{url}: expected dispatch, got {other:?}"),
            },
            None => assert!(matches!(nav, Navigation::NotFound { .. }), "{url}: {nav:?}"),
        }
    }

    let (mut history, _, _) = player();
    let nav = history
        .load_url("http://player.local/app#reset/ab#cd")
        .unwrap();
    match nav {
        Navigation::Dispatched { response, .. } => assert_eq!(
            response,
            HandlerResponse::render_with("auth/new_password", serde_json::json!({ "token": "ab#cd" }))
        ),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(
        history.navigate("//logout", NavigateOptions::trigger()).unwrap(),
        Navigation::NotFound {
            fragment: "/logout".into()
        }
    );
}

#[derive(Default)]
struct IdRecorder {
    seen: Mutex<Vec<NavigationId>>,
}

impl Middleware for IdRecorder {
    fn before(&self, req: &HandlerRequest) -> Option<HandlerResponse> {
        self.seen.lock().unwrap().push(req.navigation_id);
        None
    }
}

#[test]
fn test_navigation_id_is_shared_and_serialized() {
    let recorder = Arc::new(IdRecorder::default());
    let controller = Arc::new(AppController::new());
    let mut dispatcher = Dispatcher::new();
    dispatcher.add_middleware(Arc::clone(&recorder) as Arc<dyn Middleware>);
    register_all(&mut dispatcher, controller);
    let router = Router::new(app_routes()).unwrap();
    let mut history =
        History::new(router, dispatcher, app_routes(), HistoryConfig::default()).unwrap();

    let nav = history.navigate("logout", NavigateOptions::trigger()).unwrap();
    let Navigation::Dispatched { navigation_id, .. } = &nav else {
        panic!("unexpected {nav:?}");
    };

    let seen = recorder.seen.lock().unwrap().clone();
    assert_eq!(seen, vec![*navigation_id, *navigation_id]);

    let value = serde_json::to_value(&nav).unwrap();
    assert_eq!(value["result"], "dispatched");
    assert_eq!(value["navigation_id"], navigation_id.to_string());
    let parsed: NavigationId = serde_json::from_value(value["navigation_id"].clone()).unwrap();
    assert_eq!(parsed, *navigation_id);

    let other = history.navigate("temp_hom", NavigateOptions::trigger()).unwrap();
    assert!(matches!(
        other,
        Navigation::Dispatched { navigation_id: id, .. } if id != seen[0]
    ));
}

#[test]
fn test_visited_log_keeps_most_recent() {
    let router = Router::new(app_routes()).unwrap();
    let mut dispatcher = Dispatcher::new();
    register_all(&mut dispatcher, Arc::new(AppController::new()));
    let mut history = History::new(
        router,
        dispatcher,
        app_routes(),
        HistoryConfig {
            max_visited: 2,
            ..HistoryConfig::default()
        },
    )
    .unwrap();

    for url in ["", "temp_hom", "auth/forgetpassword", "reset/x"] {
        history.navigate(url, NavigateOptions::trigger()).unwrap();
    }
    assert_eq!(history.visited(), vec!["auth/forgetpassword", "reset/x"]);
    assert_eq!(history.current(), Some("reset/x"));
}
