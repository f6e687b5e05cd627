use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use parola_server::config::Config;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const VOCAB: &str = r#"[
    {"italian": "ciao", "chinese": "你好", "partOfSpeech": "int."},
    {"italian": "grazie", "chinese": "谢谢"},
    {"text": "casa", "translation": "房子", "partOfSpeech": "n."}
]"#;

pub fn test_config(dir: &TempDir, vocab: &str) -> Config {
    let source = dir.path().join("vocab.json");
    std::fs::write(&source, vocab).unwrap();

    let mut config = Config::local(
        source.display().to_string(),
        dir.path().join("state"),
    );
    config.scheduler_seed = Some(7);
    config
}

pub async fn create_test_app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir, VOCAB);
    let app = parola_server::create_app(&config).await.unwrap();
    (app, dir)
}

pub async fn app_for(config: &Config) -> Router {
    parola_server::create_app(config).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
