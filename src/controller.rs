//! The player's navigation controller.
//!
//! One method per handler name in the built-in route table. Views are named,
//! not rendered: the response tells the shell which view to show.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::json;
use tracing::{info, warn};

use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// Controller behind the built-in route table.
#[derive(Debug, Default)]
pub struct AppController {
    user: RwLock<Option<String>>,
}

impl AppController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Poisoning leaves the stored Option intact.
    fn read_user(&self) -> RwLockReadGuard<'_, Option<String>> {
        self.user.read().unwrap_or_else(|poisoned| {
            warn!("Session lock poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }

    fn write_user(&self) -> RwLockWriteGuard<'_, Option<String>> {
        self.user.write().unwrap_or_else(|poisoned| {
            warn!("Session lock poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Record the signed-in user shown by the views.
    pub fn set_user(&self, user: impl Into<String>) {
        *self.write_user() = Some(user.into());
    }

    #[must_use]
    pub fn current_user(&self) -> Option<String> {
        self.read_user().clone()
    }

    pub fn home(&self, _req: &HandlerRequest) -> HandlerResponse {
        HandlerResponse::render_with("home", json!({ "user": self.current_user() }))
    }

    pub fn temp_home(&self, _req: &HandlerRequest) -> HandlerResponse {
        HandlerResponse::render_with("temp_home", json!({ "user": self.current_user() }))
    }

    pub fn auth_forgetpassword(&self, _req: &HandlerRequest) -> HandlerResponse {
        HandlerResponse::render("auth/forget_password")
    }

    pub fn auth_newpassword(&self, req: &HandlerRequest) -> HandlerResponse {
        HandlerResponse::render_with(
            "auth/new_password",
            json!({ "token": req.get_path_param("token") }),
        )
    }

    /// Forget the user and go back to the root fragment.
    pub fn logout(&self, req: &HandlerRequest) -> HandlerResponse {
        let previous = self.write_user().take();
        info!(
            navigation_id = %req.navigation_id,
            had_user = previous.is_some(),
            "Session cleared"
        );
        HandlerResponse::redirect("")
    }
}
