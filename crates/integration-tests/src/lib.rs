//! Integration tests for the NFXSELLERAASHU storefront.
//!
//! The tests drive the full router in-process (middleware stack included)
//! with `tower::ServiceExt::oneshot`, carrying the session cookie between
//! requests like a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p nfxseller-integration-tests
//! ```

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use tower::ServiceExt;

use nfxseller_storefront::{app, config::StorefrontConfig, state::AppState};

/// A browser-like client for the storefront router.
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

/// A fully buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The redirect target, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClient {
    /// Client against a storefront with default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration or the embedded catalog is invalid.
    #[must_use]
    pub fn new() -> Self {
        Self::with_env(&[])
    }

    /// Client against a storefront configured from the given variables.
    ///
    /// # Panics
    ///
    /// Panics if the configuration or the embedded catalog is invalid.
    #[must_use]
    pub fn with_env(vars: &[(&str, &str)]) -> Self {
        let config = StorefrontConfig::from_lookup(&|key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        })
        .expect("test configuration is valid");
        let state = AppState::new(config).expect("embedded catalog is valid");

        Self {
            app: app(state),
            cookie: None,
        }
    }

    /// Send a GET request.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = self
            .request("GET", path)
            .body(Body::empty())
            .expect("valid request");
        self.send(request).await
    }

    /// Send a url-encoded form POST.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let request = self
            .request("POST", path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("valid request");
        self.send(request).await
    }

    fn request(&self, method: &str, path: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(path);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
        {
            self.cookie = Some(cookie.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
