// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{auth, history, quiz},
    state::AppState,
    utils::jwt::auth_middleware,
};

async fn health() -> &'static str {
    "ok"
}

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, quiz, history).
/// * Serves the browser UI from the static directory for every other path.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let require_login = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        // Protected auth routes
        .merge(
            Router::new()
                .route("/logout", post(auth::logout))
                .route_layer(require_login.clone()),
        );

    let quiz_routes = Router::new()
        .route("/topics", get(quiz::list_topics))
        // Protected quiz routes
        .merge(
            Router::new()
                .route("/current", get(quiz::current_quiz))
                .route("/answer", post(quiz::answer))
                .route("/submit", post(quiz::submit))
                .route("/result", get(quiz::get_result))
                .route("/retry", post(quiz::retry))
                .route_layer(require_login.clone()),
        );

    let history_routes = Router::new()
        .route("/api/history", get(history::get_history))
        .route_layer(require_login);

    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth_routes)
        .nest("/api/quiz", quiz_routes)
        .merge(history_routes)
        .fallback_service(static_files)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::{config::Config, db, quiz::QuestionSource, repo::UserRepo, utils::jwt::sign_jwt};

    const SECRET: &str = "router_test_secret";

    async fn app() -> Router {
        let pool = db::memory_pool().await.unwrap();
        app_with_pool(pool)
    }

    fn app_with_pool(pool: sqlx::SqlitePool) -> Router {
        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: SECRET.to_string(),
            jwt_expiration: 60,
            rust_log: "error".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            static_dir: "static".to_string(),
            question_source: QuestionSource::Generated,
        };
        create_router(AppState::new(pool, config))
    }

    #[tokio::test]
    async fn topics_are_public() {
        let response = app()
            .await
            .oneshot(Request::get("/api/quiz/topics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let topics: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(topics[0]["name"], "Daily Challenge");
        assert_eq!(topics[0]["daily"], true);
    }

    #[tokio::test]
    async fn quiz_routes_reject_missing_token() {
        let response = app()
            .await
            .oneshot(
                Request::get("/api/quiz/current?mode=Algebra")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn history_rejects_malformed_token() {
        let response = app()
            .await
            .oneshot(
                Request::get("/api/history")
                    .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    fn authorized(method: Method, uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn failed_score_write_can_be_retried() {
        let pool = db::memory_pool().await.unwrap();
        UserRepo::new(pool.clone()).register("amy", "secret1").await.unwrap();
        let token = sign_jwt("amy", SECRET, 60).unwrap();
        let app = app_with_pool(pool.clone());
        let submit = serde_json::json!({ "mode": "Algebra", "source": "bank" });

        let response = app
            .clone()
            .oneshot(authorized(
                Method::GET,
                "/api/quiz/current?mode=Algebra&source=bank",
                &token,
                serde_json::Value::Null,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        sqlx::query("DROP TABLE scores").execute(&pool).await.unwrap();

        let response = app
            .clone()
            .oneshot(authorized(Method::POST, "/api/quiz/submit", &token, submit.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        sqlx::query(
            r#"
            CREATE TABLE scores (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                username   TEXT NOT NULL REFERENCES users(username),
                topic      TEXT NOT NULL,
                score      INTEGER NOT NULL,
                total      INTEGER NOT NULL,
                percentage REAL NOT NULL,
                taken_at   TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        let response = app
            .clone()
            .oneshot(authorized(Method::POST, "/api/quiz/submit", &token, submit.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let result = json_body(response).await;
        assert_eq!(result["recorded"], true);
        assert_eq!(result["total"], 5);

        let response = app
            .oneshot(authorized(Method::POST, "/api/quiz/submit", &token, submit))
            .await
            .unwrap();
        assert_eq!(json_body(response).await["recorded"], false);

        let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM scores")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }
}
