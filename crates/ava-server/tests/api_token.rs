use ava_server::{app, AppState};
use ava_voice::{LiveKitConfig, VoiceService};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{json, Value};
use tower::ServiceExt;

const LIVEKIT_URL: &str = "wss://ava-test.livekit.cloud";
const API_KEY: &str = "devkey";
const API_SECRET: &str = "devsecret";

fn configured_state() -> AppState {
    AppState {
        voice_service: VoiceService::new(LiveKitConfig::new(LIVEKIT_URL, API_KEY, API_SECRET)),
        cors_origins: vec![],
    }
}

fn unconfigured_state() -> AppState {
    AppState {
        voice_service: VoiceService::new(LiveKitConfig::default()),
        cors_origins: vec![],
    }
}

fn token_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/token")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
    let response = app(state).oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn health_check_returns_ok() {
    let response = app(configured_state())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn issues_token_for_phone_number() {
    let (status, body) = send(
        configured_state(),
        token_request(json!({ "phoneNumber": "+15550100" }).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], LIVEKIT_URL);

    #[derive(serde::Deserialize)]
    struct Claims {
        sub: String,
        name: String,
        metadata: String,
        video: Video,
    }

    #[derive(serde::Deserialize)]
    struct Video {
        room: String,
        #[serde(rename = "roomJoin")]
        room_join: bool,
        #[serde(rename = "canPublishData")]
        can_publish_data: bool,
    }

    let token = body["token"].as_str().expect("token should be a string");
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(API_SECRET.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .expect("token should be signed with the configured secret")
    .claims;

    assert_eq!(claims.sub, "user-+15550100");
    assert_eq!(claims.name, "+15550100");
    let metadata: Value = serde_json::from_str(&claims.metadata).unwrap();
    assert_eq!(metadata["phoneNumber"], "+15550100");
    assert!(claims.video.room.starts_with("appointment-"));
    assert!(claims.video.room_join);
    assert!(claims.video.can_publish_data);
}

#[tokio::test]
async fn each_call_gets_its_own_room() {
    let room_of = |body: &Value| {
        let token = body["token"].as_str().unwrap().to_string();
        #[derive(serde::Deserialize)]
        struct Claims {
            video: Video,
        }
        #[derive(serde::Deserialize)]
        struct Video {
            room: String,
        }
        decode::<Claims>(
            &token,
            &DecodingKey::from_secret(API_SECRET.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap()
        .claims
        .video
        .room
    };

    let (_, first) = send(
        configured_state(),
        token_request(json!({ "phoneNumber": "+15550100" }).to_string()),
    )
    .await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let (_, second) = send(
        configured_state(),
        token_request(json!({ "phoneNumber": "+15550100" }).to_string()),
    )
    .await;

    assert_ne!(room_of(&first), room_of(&second));
}

#[tokio::test]
async fn missing_phone_number_is_bad_request() {
    for body in [
        json!({}).to_string(),
        json!({ "phoneNumber": "" }).to_string(),
        json!({ "phoneNumber": "   " }).to_string(),
        json!({ "phoneNumber": 5550100 }).to_string(),
        "not json".to_string(),
    ] {
        let (status, json) = send(configured_state(), token_request(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(json["error"], "Phone number is required");
    }
}

#[tokio::test]
async fn missing_credentials_is_server_error() {
    let (status, json) = send(
        unconfigured_state(),
        token_request(json!({ "phoneNumber": "+15550100" }).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "LiveKit credentials not configured");
}

#[tokio::test]
async fn validation_runs_before_configuration_check() {
    let (status, _) = send(unconfigured_state(), token_request(json!({}).to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cors_allows_configured_origin() {
    let mut state = configured_state();
    state.cors_origins = vec!["http://localhost:5173".to_string()];

    let response = app(state)
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/token")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:5173")
    );
}
