use once_cell::sync::Lazy;

use super::build::RouteTable;
use super::types::RouteMeta;

/// Routes of the Timeside player, in declaration order.
///
/// The user-management block is declared but switched off.
#[must_use]
pub fn app_route_list() -> Vec<RouteMeta> {
    vec![
        RouteMeta::new("", "home"),
        RouteMeta::new("temp_hom", "temp_home"),
        // auth
        RouteMeta::new("auth/forgetpassword", "auth_forgetpassword"),
        RouteMeta::new("reset/:token", "auth_newpassword"),
        RouteMeta::new("logout", "logout"),
        // users
        RouteMeta::disabled("users/list", "list_users"),
        RouteMeta::disabled("users/edit/:id", "edit_user"),
        RouteMeta::disabled("users/editmine", "edit_myprofile"),
        RouteMeta::disabled("users/new", "new_user"),
    ]
}

static APP_ROUTES: Lazy<RouteTable> = Lazy::new(|| {
    RouteTable::new(app_route_list()).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Built-in route table is invalid");
        RouteTable::default()
    })
});

/// The built-in player route table, built once per process.
#[must_use]
pub fn app_routes() -> &'static RouteTable {
    &APP_ROUTES
}
