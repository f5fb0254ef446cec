// src/presentation/http/routes.rs
use crate::presentation::http::{
    controllers::{admin_articles, auth},
    middleware::lifecycle::lifecycle_middleware,
    state::HttpState,
};
use axum::{
    Extension, Json, Router,
    routing::{get, post},
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/admin/login", get(auth::login_form).post(auth::login))
        .route("/admin/logout", post(auth::logout))
        .route(
            "/admin/articles",
            get(admin_articles::list),
        )
        .route(
            "/admin/articles/new",
            get(admin_articles::new_form).post(admin_articles::create),
        )
        .route("/admin/articles/{id}", get(admin_articles::show))
        .route(
            "/admin/articles/{id}/edit",
            get(admin_articles::edit_form).post(admin_articles::update),
        )
        .route("/admin/articles/{id}/delete", post(admin_articles::delete))
        .layer(axum::middleware::from_fn(lifecycle_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: i64,
}

pub async fn health(Extension(state): Extension<HttpState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        timestamp: state.services.clock().now().timestamp(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{
        ports::{
            security::{CsrfProtection, PasswordHasher, SessionManager},
            time::Clock,
        },
        services::ApplicationServices,
    };
    use crate::infrastructure::{
        database,
        repositories::{
            SqliteArticleReadRepository, SqliteArticleWriteRepository, SqliteUserRepository,
        },
        security::{
            csrf::HmacCsrfTokens, password::Argon2PasswordHasher, session::HmacSessionManager,
        },
        time::SystemClock,
    };
    use crate::presentation::http::middleware::{
        correlation::{CorrelationHook, POWERED_BY_HEADER, REQUEST_ID_HEADER},
        lifecycle::HookRegistry,
        request_log::RequestLogHook,
    };
    use crate::presentation::http::templates::build_environment;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    async fn test_router() -> Router {
        // a single connection so every query sees the same in-memory database
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        database::run_migrations(&pool).await.unwrap();
        let pool = Arc::new(pool);

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher);
        let session_manager: Arc<dyn SessionManager> = Arc::new(
            HmacSessionManager::new(SECRET, Duration::from_secs(3600), Arc::clone(&clock))
                .unwrap(),
        );
        let csrf: Arc<dyn CsrfProtection> = Arc::new(HmacCsrfTokens::new(SECRET).unwrap());

        let services = Arc::new(ApplicationServices::new(
            Arc::new(SqliteUserRepository::new(Arc::clone(&pool))),
            Arc::new(SqliteArticleWriteRepository::new(Arc::clone(&pool))),
            Arc::new(SqliteArticleReadRepository::new(Arc::clone(&pool))),
            password_hasher,
            session_manager,
            csrf,
            clock,
        ));

        services
            .auth
            .seed_default_users(Some("admin-password"), Some("root-password"))
            .await
            .unwrap();

        let mut hooks = HookRegistry::new();
        hooks.register(Box::new(RequestLogHook));
        hooks.register(Box::new(CorrelationHook));

        build_router(HttpState {
            services,
            templates: Arc::new(build_environment().unwrap()),
            hooks: Arc::new(hooks),
        })
    }

    #[tokio::test]
    async fn health_reports_ok_with_unix_timestamp() {
        let app = test_router().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap()
            .to_owned();
        assert!(uuid::Uuid::parse_str(&request_id).is_ok());
        assert!(response.headers().contains_key(POWERED_BY_HEADER));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert!(body["timestamp"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn anonymous_admin_requests_redirect_to_login() {
        let app = test_router().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/admin/articles")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/admin/login"
        );
    }

    #[tokio::test]
    async fn login_sets_session_cookie_that_opens_the_admin() {
        let app = test_router().await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/admin/login")
                    .header(
                        header::CONTENT_TYPE,
                        "application/x-www-form-urlencoded",
                    )
                    .body(Body::from("username=root&password=root-password"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .unwrap();
        assert!(cookie.starts_with("newsdesk_session="));
        let cookie_pair = cookie.split(';').next().unwrap().to_owned();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/admin/articles")
                    .header(header::COOKIE, cookie_pair)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn wrong_password_bounces_back_to_login() {
        let app = test_router().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/admin/login")
                    .header(
                        header::CONTENT_TYPE,
                        "application/x-www-form-urlencoded",
                    )
                    .body(Body::from("username=root&password=wrong"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/admin/login"
        );
    }
}
