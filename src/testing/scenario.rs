//! Fluent HTTP testing utilities for Axum routers
//!
//! Requests are driven through the router with `oneshot`, so no server or
//! socket is needed. Scrape responses can be parsed into an [`Exposition`]
//! and queried by series.
//!
//! # Example
//!
//! ```rust,ignore
//! use kite_exporter::{App, testing};
//!
//! #[tokio::test]
//! async fn test_scrape() {
//!     let exposition = testing::get(App::new().unwrap().into_router(), "/metrics")
//!         .execute()
//!         .await
//!         .assert_ok()
//!         .exposition()
//!         .await;
//!     assert_eq!(exposition.value("http_requests_in_flight"), Some(1.0));
//! }
//! ```

use axum::{
    Router,
    body::Body,
    http::{HeaderName, Method, Request, StatusCode, header},
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tower::ServiceExt;

/// One request against a router
pub struct Scenario {
    app: Router,
    request: Request<Body>,
}

impl Scenario {
    pub fn new(app: Router, method: Method, uri: &str) -> Self {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap_or_else(|e| panic!("invalid request for '{}': {}", uri, e));
        Self { app, request }
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.request.headers_mut().insert(
            HeaderName::from_bytes(key.as_bytes()).unwrap(),
            value.parse().unwrap(),
        );
        self
    }

    /// Serialize `body` as the JSON request body
    pub fn json_body<T: Serialize>(mut self, body: &T) -> Self {
        *self.request.body_mut() = Body::from(serde_json::to_vec(body).unwrap());
        self.request
            .headers_mut()
            .insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        self
    }

    pub async fn execute(self) -> ScenarioAssert {
        let response = self.app.oneshot(self.request).await.unwrap();
        ScenarioAssert { response }
    }
}

/// Assertions over one response
pub struct ScenarioAssert {
    response: Response,
}

impl ScenarioAssert {
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(self.status(), expected, "unexpected status");
        self
    }

    pub fn assert_ok(self) -> Self {
        self.assert_status(StatusCode::OK)
    }

    pub fn assert_bad_request(self) -> Self {
        self.assert_status(StatusCode::BAD_REQUEST)
    }

    pub fn assert_not_found(self) -> Self {
        self.assert_status(StatusCode::NOT_FOUND)
    }

    pub fn assert_server_error(self) -> Self {
        self.assert_status(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Value of a response header, if present and visible ASCII
    pub fn header(&self, key: &str) -> Option<&str> {
        self.response
            .headers()
            .get(key)
            .and_then(|value| value.to_str().ok())
    }

    pub fn assert_header(self, key: &str, expected: &str) -> Self {
        assert_eq!(self.header(key), Some(expected), "header '{}'", key);
        self
    }

    pub fn assert_has_header(self, key: &str) -> Self {
        assert!(self.header(key).is_some(), "header '{}' not found", key);
        self
    }

    /// Assert a JSON content type
    pub fn assert_json(self) -> Self {
        let content_type = self.header(header::CONTENT_TYPE.as_str()).unwrap_or_default();
        assert!(
            content_type.starts_with("application/json"),
            "expected JSON, got '{}'",
            content_type
        );
        self
    }

    pub async fn body_string(self) -> String {
        let bytes = axum::body::to_bytes(self.response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    pub async fn json<T: for<'de> Deserialize<'de>>(self) -> T {
        serde_json::from_str(&self.body_string().await).expect("response body is not JSON")
    }

    /// Parse the body as Prometheus text exposition
    pub async fn exposition(self) -> Exposition {
        Exposition::parse(&self.body_string().await)
    }

    /// Assert the body contains `text`.
    ///
    /// Headers are not preserved; assert on them first.
    pub async fn assert_contains(self, text: &str) -> Self {
        let body = self.body_string().await;
        assert!(body.contains(text), "'{}' not found in:\n{}", text, body);
        Self::from_body(body)
    }

    pub async fn assert_not_contains(self, text: &str) -> Self {
        let body = self.body_string().await;
        assert!(!body.contains(text), "'{}' unexpectedly found in:\n{}", text, body);
        Self::from_body(body)
    }

    fn from_body(body: String) -> Self {
        Self {
            response: Response::new(Body::from(body)),
        }
    }
}

/// A parsed scrape payload.
///
/// Series are keyed exactly as exposed, e.g.
/// `issues_by_namespace{namespace="a",state="active"}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Exposition {
    samples: BTreeMap<String, f64>,
    types: BTreeMap<String, String>,
}

impl Exposition {
    pub fn parse(text: &str) -> Self {
        let mut exposition = Self::default();
        for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
            if let Some(declaration) = line.strip_prefix("# TYPE ") {
                if let Some((name, kind)) = declaration.split_once(' ') {
                    exposition.types.insert(name.to_string(), kind.to_string());
                }
                continue;
            }
            if line.starts_with('#') {
                continue;
            }
            let Some((series, value)) = line.rsplit_once(' ') else {
                panic!("malformed sample line: {}", line);
            };
            let value = match value {
                "+Inf" => f64::INFINITY,
                "-Inf" => f64::NEG_INFINITY,
                other => other
                    .parse()
                    .unwrap_or_else(|_| panic!("malformed sample value: {}", line)),
            };
            exposition.samples.insert(series.to_string(), value);
        }
        exposition
    }

    pub fn value(&self, series: &str) -> Option<f64> {
        self.samples.get(series).copied()
    }

    /// Declared type of a family, when it is exposed at all
    pub fn kind(&self, family: &str) -> Option<&str> {
        self.types.get(family).map(String::as_str)
    }

    /// All series of one family, sorted, with their values
    pub fn family(&self, name: &str) -> Vec<(&str, f64)> {
        self.samples
            .iter()
            .filter(|(series, _)| {
                series.as_str() == name
                    || series
                        .strip_prefix(name)
                        .is_some_and(|rest| rest.starts_with('{'))
            })
            .map(|(series, value)| (series.as_str(), *value))
            .collect()
    }
}

pub fn get(app: Router, uri: &str) -> Scenario {
    Scenario::new(app, Method::GET, uri)
}

pub fn post(app: Router, uri: &str) -> Scenario {
    Scenario::new(app, Method::POST, uri)
}
