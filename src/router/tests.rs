use super::Router;
use crate::table::{RouteMeta, RouteTable};

fn router(routes: Vec<RouteMeta>) -> Router {
    Router::new(&RouteTable::new(routes).unwrap()).unwrap()
}

#[test]
fn test_declaration_order_wins() {
    let r = router(vec![
        RouteMeta::new("docs/:page", "doc_page"),
        RouteMeta::new("docs/index", "doc_index"),
    ]);
    assert_eq!(r.route("docs/index").unwrap().handler_name, "doc_page");
}

#[test]
fn test_disabled_routes_not_compiled() {
    let r = router(vec![
        RouteMeta::new("", "home"),
        RouteMeta::disabled("users/list", "list_users"),
    ]);
    assert_eq!(r.len(), 1);
    assert!(r.route("users/list").is_none());
}

#[test]
fn test_optional_param_absent() {
    let r = router(vec![RouteMeta::new("docs/:section(/:page)", "docs")]);
    let m = r.route("docs/intro").unwrap();
    assert_eq!(m.get_path_param("section"), Some("intro"));
    assert_eq!(m.get_path_param("page"), None);
    assert_eq!(m.path_params.len(), 1);

    let m = r.route("docs/intro/2").unwrap();
    assert_eq!(m.get_path_param("page"), Some("2"));
}

#[test]
fn test_query_string_parsed() {
    let r = router(vec![RouteMeta::new("logout", "logout")]);
    let m = r.route("logout?next=home&next=reset&msg=bye+now").unwrap();
    assert_eq!(m.query.as_deref(), Some("next=home&next=reset&msg=bye+now"));
    assert_eq!(m.get_query_param("next"), Some("reset"));
    assert_eq!(m.get_query_param("msg"), Some("bye now"));
    assert_eq!(m.query_params_map().len(), 2);
}

#[test]
fn test_invalid_utf8_param_kept_raw() {
    let r = router(vec![RouteMeta::new("reset/:token", "auth_newpassword")]);
    let m = r.route("reset/%FF%FE").unwrap();
    assert_eq!(m.get_path_param("token"), Some("%FF%FE"));
}

#[test]
fn test_patterns_listed_in_order() {
    let r = router(vec![
        RouteMeta::new("", "home"),
        RouteMeta::new("logout", "logout"),
    ]);
    assert_eq!(r.get_all_patterns(), vec!["".to_string(), "logout".to_string()]);
}
