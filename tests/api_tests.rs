// tests/api_tests.rs

use std::collections::HashMap;

use math_hero::{config::Config, db, quiz::QuestionSource, routes, state::AppState};
use serde_json::Value;

/// Spawns the app on a random port with a fresh in-memory database.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    let pool = db::memory_pool()
        .await
        .expect("Failed to create in-memory database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        static_dir: "static".to_string(),
        question_source: QuestionSource::Bank,
    };

    let app = routes::create_router(AppState::new(pool, config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://127.0.0.1:{}", port)
}

fn unique_name() -> String {
    format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8])
}

/// Registers a fresh user and returns its bearer token.
async fn sign_up(client: &reqwest::Client, address: &str) -> String {
    let username = unique_name();
    let credentials = serde_json::json!({ "username": username, "password": "password123" });

    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&credentials)
        .send()
        .await
        .expect("Register failed");
    assert_eq!(response.status().as_u16(), 201);

    let login: Value = client
        .post(format!("{}/api/auth/login", address))
        .json(&credentials)
        .send()
        .await
        .expect("Login failed")
        .json()
        .await
        .expect("Failed to parse login json");

    login["token"].as_str().expect("Token not found").to_string()
}

async fn get_json(client: &reqwest::Client, url: String, token: &str) -> (u16, Value) {
    let response = client
        .get(url)
        .bearer_auth(token)
        .send()
        .await
        .expect("Request failed");
    let status = response.status().as_u16();
    (status, response.json().await.unwrap_or(Value::Null))
}

async fn post_json(client: &reqwest::Client, url: String, token: &str, body: Value) -> (u16, Value) {
    let response = client
        .post(url)
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Request failed");
    let status = response.status().as_u16();
    (status, response.json().await.unwrap_or(Value::Null))
}

fn prompts(quiz: &Value) -> Vec<String> {
    quiz["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["prompt"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_check_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn register_rejects_duplicate_username() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let body = serde_json::json!({ "username": unique_name(), "password": "password123" });

    let first = client
        .post(format!("{}/api/auth/register", address))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(first.status().as_u16(), 201);

    let second = client
        .post(format!("{}/api/auth/register", address))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(second.status().as_u16(), 409);
}

#[tokio::test]
async fn register_fails_validation() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Username too short
    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({ "username": "yo", "password": "password123" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let username = unique_name();

    client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({ "username": username, "password": "password123" }))
        .send()
        .await
        .unwrap();

    let response = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({ "username": username, "password": "wrong-password" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn quiz_requires_login() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/quiz/current?mode=daily", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let topics: Vec<Value> = client
        .get(format!("{}/api/quiz/topics", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(topics.len(), 5);
    assert_eq!(topics[0]["name"], "Daily Challenge");
}

#[tokio::test]
async fn daily_challenge_flow() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = sign_up(&client, &address).await;
    let quiz_url = format!("{}/api/quiz/current?mode=daily&source=bank", address);

    // 1. Reloading shows the same questions
    let (status, quiz) = get_json(&client, quiz_url.clone(), &token).await;
    assert_eq!(status, 200);
    assert_eq!(quiz["questions"].as_array().unwrap().len(), 10);
    assert!(quiz["questions"][0].get("answer").is_none());
    let (_, reloaded) = get_json(&client, quiz_url.clone(), &token).await;
    assert_eq!(prompts(&quiz), prompts(&reloaded));

    // 2. Another user sees the same daily set
    let other_token = sign_up(&client, &address).await;
    let (_, other) = get_json(&client, quiz_url.clone(), &other_token).await;
    assert_eq!(prompts(&quiz), prompts(&other));

    // 3. Submit with nothing answered: everything counts as wrong
    let (status, blank) = post_json(
        &client,
        format!("{}/api/quiz/submit", address),
        &token,
        serde_json::json!({ "mode": "Daily Challenge", "source": "bank" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(blank["score"], 0);
    assert_eq!(blank["total"], 10);
    assert_eq!(blank["recorded"], true);

    let answer_key: HashMap<String, String> = blank["feedback"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| {
            (
                f["question_id"].to_string(),
                f["correct_answer"].as_str().unwrap().to_string(),
            )
        })
        .collect();

    // 4. Retry keeps today's questions, clears selections
    let (status, retried) = post_json(
        &client,
        format!("{}/api/quiz/retry", address),
        &token,
        serde_json::json!({ "mode": "daily", "source": "bank" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(retried["submitted"], false);
    assert_eq!(prompts(&quiz), prompts(&retried));

    // 5. Submitting the stored answers scores full marks
    let (status, perfect) = post_json(
        &client,
        format!("{}/api/quiz/submit", address),
        &token,
        serde_json::json!({ "mode": "daily", "source": "bank", "answers": answer_key }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(perfect["score"], 10);
    assert_eq!(perfect["percentage"], 100.0);
    assert_eq!(perfect["message"], "Amazing job! You are a Math Wizard!");

    // 6. History holds both attempts, newest first, with the right average
    let (status, history) = get_json(&client, format!("{}/api/history", address), &token).await;
    assert_eq!(status, 200);
    let records = history["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["percentage"], 100.0);
    assert_eq!(records[1]["percentage"], 0.0);
    assert_eq!(records[0]["topic"], "Daily Challenge");
    assert_eq!(history["summary"]["average_percentage"], 50.0);
}

#[tokio::test]
async fn score_is_recorded_once_per_quiz() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = sign_up(&client, &address).await;

    get_json(
        &client,
        format!("{}/api/quiz/current?mode=algebra&source=generated", address),
        &token,
    )
    .await;

    let submit = serde_json::json!({ "mode": "Algebra", "source": "generated" });
    let (_, first) = post_json(&client, format!("{}/api/quiz/submit", address), &token, submit.clone()).await;
    assert_eq!(first["recorded"], true);

    let (status, second) = post_json(&client, format!("{}/api/quiz/submit", address), &token, submit).await;
    assert_eq!(status, 200);
    assert_eq!(second["recorded"], false);

    let (status, result) = get_json(
        &client,
        format!("{}/api/quiz/result?mode=algebra&source=generated", address),
        &token,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(result["total"], 10);

    let (_, history) = get_json(&client, format!("{}/api/history", address), &token).await;
    assert_eq!(history["records"].as_array().unwrap().len(), 1);
    assert_eq!(history["records"][0]["topic"], "Algebra");
}

#[tokio::test]
async fn answers_are_validated() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = sign_up(&client, &address).await;
    let answer_url = format!("{}/api/quiz/answer", address);

    // No quiz opened yet
    let (status, _) = post_json(
        &client,
        answer_url.clone(),
        &token,
        serde_json::json!({ "mode": "geometry", "source": "bank", "question_id": 0, "option": "Cube" }),
    )
    .await;
    assert_eq!(status, 404);

    let (_, quiz) = get_json(
        &client,
        format!("{}/api/quiz/current?mode=geometry&source=bank", address),
        &token,
    )
    .await;
    let option = quiz["questions"][0]["options"][0].as_str().unwrap().to_string();

    let (status, _) = post_json(
        &client,
        answer_url.clone(),
        &token,
        serde_json::json!({ "mode": "geometry", "source": "bank", "question_id": 0, "option": "not an option" }),
    )
    .await;
    assert_eq!(status, 400);

    let (status, _) = post_json(
        &client,
        answer_url.clone(),
        &token,
        serde_json::json!({ "mode": "geometry", "source": "bank", "question_id": 9, "option": option }),
    )
    .await;
    assert_eq!(status, 404, "geometry bank only has five questions");

    let (status, view) = post_json(
        &client,
        answer_url.clone(),
        &token,
        serde_json::json!({ "mode": "geometry", "source": "bank", "question_id": 0, "option": option }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(view["answers"]["0"], option);

    // Result is not available before submitting
    let (status, _) = get_json(
        &client,
        format!("{}/api/quiz/result?mode=geometry&source=bank", address),
        &token,
    )
    .await;
    assert_eq!(status, 404);

    post_json(
        &client,
        format!("{}/api/quiz/submit", address),
        &token,
        serde_json::json!({ "mode": "geometry", "source": "bank" }),
    )
    .await;

    let (status, _) = post_json(
        &client,
        answer_url,
        &token,
        serde_json::json!({ "mode": "geometry", "source": "bank", "question_id": 0, "option": option }),
    )
    .await;
    assert_eq!(status, 409);
}

#[tokio::test]
async fn rejected_submit_leaves_quiz_unchanged() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = sign_up(&client, &address).await;
    let current_url = format!("{}/api/quiz/current?mode=number&source=bank", address);

    let (_, quiz) = get_json(&client, current_url.clone(), &token).await;
    let questions = quiz["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 6);

    let mut answers = serde_json::Map::new();
    for q in &questions[..5] {
        answers.insert(q["id"].to_string(), q["options"][0].clone());
    }
    answers.insert("5".to_string(), Value::from("bogus"));

    let (status, _) = post_json(
        &client,
        format!("{}/api/quiz/submit", address),
        &token,
        serde_json::json!({ "mode": "number", "source": "bank", "answers": answers }),
    )
    .await;
    assert_eq!(status, 400);

    let (_, quiz) = get_json(&client, current_url, &token).await;
    assert_eq!(quiz["answers"], serde_json::json!({}));
    assert_eq!(quiz["submitted"], false);

    let (_, history) = get_json(&client, format!("{}/api/history", address), &token).await;
    assert_eq!(history["records"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn practice_retry_draws_new_questions() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = sign_up(&client, &address).await;

    let (_, first) = get_json(
        &client,
        format!("{}/api/quiz/current?mode=number&source=generated", address),
        &token,
    )
    .await;
    assert!(first["questions"]
        .as_array()
        .unwrap()
        .iter()
        .all(|q| q["topic"] == "Number"));

    let (_, second) = post_json(
        &client,
        format!("{}/api/quiz/retry", address),
        &token,
        serde_json::json!({ "mode": "Number", "source": "generated" }),
    )
    .await;

    assert_ne!(prompts(&first), prompts(&second));
}

#[tokio::test]
async fn logout_discards_quiz_sessions() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = sign_up(&client, &address).await;

    get_json(&client, format!("{}/api/quiz/current?mode=daily", address), &token).await;

    let response = client
        .post(format!("{}/api/auth/logout", address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);

    let (status, _) = post_json(
        &client,
        format!("{}/api/quiz/submit", address),
        &token,
        serde_json::json!({ "mode": "daily" }),
    )
    .await;
    assert_eq!(status, 404);
}
