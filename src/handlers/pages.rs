//! Page handlers. Each renders one named template.

use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
    routing::{get, MethodRouter},
    Extension,
};
use serde_json::{json, Value};

use crate::auth::RequestContext;
use crate::http::server::AppState;
use crate::templates::render_response;

/// A renderable application page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    About,
    Login,
    Signup,
    Dashboard,
    SchedulePickup,
}

impl Page {
    /// Template rendered for this page.
    pub const fn template(self) -> &'static str {
        match self {
            Page::Home => "home.page.html",
            Page::About => "about.page.html",
            Page::Login => "login.page.html",
            Page::Signup => "signup.page.html",
            Page::Dashboard => "dashboard.page.html",
            Page::SchedulePickup => "pickup.page.html",
        }
    }

    /// Method router serving this page. HEAD is answered by the GET handler.
    pub fn method_router(self) -> MethodRouter<AppState> {
        get(
            move |State(state): State<AppState>, Extension(ctx): Extension<RequestContext>| async move {
                self.respond(&state, &ctx)
            },
        )
    }

    /// Render this page for an already routed request.
    pub fn respond(self, state: &AppState, ctx: &RequestContext) -> Response {
        tracing::debug!(
            page = ?self,
            method = %ctx.method(),
            path = %ctx.path(),
            request_id = ctx.request_id().unwrap_or("-"),
            authenticated = ctx.is_authenticated(),
            "Rendering page"
        );
        render_response(
            state.renderer.as_ref(),
            StatusCode::OK,
            self.template(),
            &self.data(ctx),
        )
    }

    /// Template data for this page.
    pub fn data(self, ctx: &RequestContext) -> Value {
        match self {
            Page::Home => json!({ "title": "Zingira Tech" }),
            Page::About | Page::Login | Page::Signup => json!({}),
            Page::Dashboard | Page::SchedulePickup => json!({ "user": user_data(ctx) }),
        }
    }
}

/// Template data describing the signed-in user.
fn user_data(ctx: &RequestContext) -> Value {
    match ctx.identity() {
        Some(identity) => json!({
            "subject": identity.subject(),
            "email": identity.claim_str("email"),
            "name": identity.claim_str("displayName"),
            "claims": identity.claims(),
        }),
        None => Value::Null,
    }
}
