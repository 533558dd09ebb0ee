//! Hard-coded error page used when the template cache cannot serve a response.
//!
//! Lives in its own environment so it keeps working when the main cache is
//! empty or failed to load.

use axum::http::StatusCode;
use minijinja::{context, Environment};
use std::sync::OnceLock;

const ERROR_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Error {{ status }}</title></head>
<body>
    <h1>Error {{ status }}</h1>
    <p>{{ message }}</p>
</body>
</html>"#;

fn environment() -> &'static Environment<'static> {
    static ENV: OnceLock<Environment<'static>> = OnceLock::new();
    ENV.get_or_init(|| {
        let mut env = Environment::new();
        // The ".html" suffix turns on HTML auto-escaping for `message`.
        if let Err(e) = env.add_template("error.html", ERROR_TEMPLATE) {
            tracing::error!(error = %e, "Failed to compile fallback error template");
        }
        env
    })
}

/// Render the minimal error page for `status` with a human readable message.
pub fn error_page(status: StatusCode, message: &str) -> String {
    let rendered = environment()
        .get_template("error.html")
        .and_then(|tmpl| tmpl.render(context! { status => status.as_u16(), message => message }));

    match rendered {
        Ok(html) => html,
        Err(e) => {
            tracing::error!(error = %e, "Failed to render fallback error template");
            format!("Error {}", status.as_u16())
        }
    }
}
