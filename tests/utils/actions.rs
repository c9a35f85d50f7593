use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use super::setup::TestSetup;

/// Status and decoded JSON body of one request
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    /// Send a request through the router and decode the JSON response
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> ApiResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        ApiResponse { status, body }
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn register(&self, email: &str, password: &str) -> ApiResponse {
        self.send(
            "POST",
            "/users",
            None,
            Some(json!({ "username": "tester", "email": email, "password": password })),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResponse {
        self.send(
            "POST",
            "/users/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Register and log in, returning the bearer token
    pub async fn signed_up_user(&self, email: &str) -> String {
        let registered = self.register(email, "password1").await;
        assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.body);

        let logged_in = self.login(email, "password1").await;
        assert_eq!(logged_in.status, StatusCode::OK, "{}", logged_in.body);
        logged_in.body["token"].as_str().unwrap().to_string()
    }

    pub async fn create_todo(&self, token: &str, task_name: &str) -> ApiResponse {
        self.send(
            "POST",
            "/todos",
            Some(token),
            Some(json!({
                "task_name": task_name,
                "completed": false,
                "due_date": "2024-11-30T23:59:59Z"
            })),
        )
        .await
    }

    pub async fn list_todos(&self, token: &str) -> ApiResponse {
        self.send("GET", "/todos", Some(token), None).await
    }

    pub async fn update_todo(&self, token: &str, id: i64, body: Value) -> ApiResponse {
        self.send("PUT", &format!("/todos/{}", id), Some(token), Some(body))
            .await
    }

    pub async fn delete_todo(&self, token: &str, id: i64) -> ApiResponse {
        self.send("DELETE", &format!("/todos/{}", id), Some(token), None)
            .await
    }
}
