// Handler registry for the built-in route table

use std::sync::Arc;

use crate::controller::AppController;
use crate::dispatcher::Dispatcher;

/// Bind every handler name of the built-in table to `controller`.
pub fn register_all(dispatcher: &mut Dispatcher, controller: Arc<AppController>) {
    let c = Arc::clone(&controller);
    dispatcher.register_handler("home", move |req| c.home(req));
    let c = Arc::clone(&controller);
    dispatcher.register_handler("temp_home", move |req| c.temp_home(req));
    let c = Arc::clone(&controller);
    dispatcher.register_handler("auth_forgetpassword", move |req| c.auth_forgetpassword(req));
    let c = Arc::clone(&controller);
    dispatcher.register_handler("auth_newpassword", move |req| c.auth_newpassword(req));
    let c = controller;
    dispatcher.register_handler("logout", move |req| c.logout(req));
}
