//! API service routes

use axum::{
    Json, Router, middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde_json::json;

use crate::{middleware::auth_middleware, state::AppState};

pub mod auth;
pub mod dashboard;
pub mod employees;
pub mod export;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/auth/logout", post(auth::logout))
        .route("/employees/add", post(employees::add))
        .route("/employees/list", get(employees::list))
        .route("/employees/count", get(employees::count))
        .route("/employees/:id", get(employees::get))
        .route("/employees/:id", put(employees::update))
        .route("/employees/:id", delete(employees::delete))
        .route("/employees/:id/restore", post(employees::restore))
        .route("/departments", get(employees::departments))
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/dashboard/department-data", get(dashboard::department_data))
        .route("/dashboard/salary-data", get(dashboard::salary_data))
        .route("/dashboard/recent-activities", get(dashboard::recent_activities))
        .route("/export/csv", get(export::csv))
        .route("/export/excel", get(export::excel))
        .route("/export/pdf", get(export::pdf))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(protected_routes);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .with_state(state)
}

/// Service banner
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Employee Management API is running"
    }))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "employee-directory-api"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::jwt::{JwtConfig, JwtService};
    use crate::models::{NewUser, UserRole};
    use crate::schema::test_pool;

    async fn test_state() -> AppState {
        let pool = test_pool().await;
        let jwt_service = JwtService::new(JwtConfig {
            secret: "test-secret".to_string(),
            expiry_hours: 24,
        });
        AppState::new(pool, jwt_service)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_and_root_are_open() {
        let app = create_router(test_state().await);

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_route_rejects_missing_header() {
        let app = create_router(test_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/auth/me")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Missing authorization header");
    }

    #[tokio::test]
    async fn test_protected_route_rejects_garbage_token() {
        let app = create_router(test_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/auth/me")
                    .header(header::AUTHORIZATION, "Bearer not-a-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid token");
    }

    #[tokio::test]
    async fn test_protected_route_accepts_valid_token() {
        let state = test_state().await;
        let user = state
            .user_repository
            .create(&NewUser {
                username: "alice".to_string(),
                password: "secret".to_string(),
                role: UserRole::Admin,
            })
            .await
            .unwrap();
        let token = state.jwt_service.generate_token(&user).unwrap();
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/auth/me")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["username"], "alice");
        assert_eq!(body["role"], "Admin");
    }
}
