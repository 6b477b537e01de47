//! スタブサービスの結合テスト
//!
//! 実際にポートを開き、reqwestでマルチパート送信して確認する

use meal_ai::stub_server::{router, ANALYZE_PATH};
use meal_ai_common::{FlatNutritionRecord, STUB_MENU};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use std::net::SocketAddr;

async fn spawn_stub() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind失敗");
    let addr = listener.local_addr().expect("アドレス取得失敗");
    tokio::spawn(async move {
        axum::serve(listener, router()).await.expect("サーバー異常終了");
    });
    addr
}

fn image_form() -> Form {
    let part = Part::bytes(vec![0xFF, 0xD8, 0xFF])
        .file_name("meal.jpg")
        .mime_str("image/jpeg")
        .expect("multipart作成失敗");
    Form::new().part("image", part)
}

#[tokio::test]
async fn test_stub_returns_menu_item() {
    let addr = spawn_stub().await;
    let response = reqwest::Client::new()
        .post(format!("http://{}{}", addr, ANALYZE_PATH))
        .multipart(image_form())
        .send()
        .await
        .expect("送信失敗");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("JSONでない");
    for key in ["calories", "protein", "carbs", "fat", "confidence"] {
        assert!(body[key].is_u64(), "{} が整数でない: {}", key, body[key]);
    }

    let record: FlatNutritionRecord = serde_json::from_value(body).expect("レコードとして読めない");
    assert!(STUB_MENU.iter().any(|m| m.name == record.meal_name));
    assert!((80.0..=94.0).contains(&record.confidence));
}

#[tokio::test]
async fn test_stub_root_path_alias() {
    let addr = spawn_stub().await;
    let response = reqwest::Client::new()
        .post(format!("http://{}/", addr))
        .multipart(image_form())
        .send()
        .await
        .expect("送信失敗");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_stub_missing_image() {
    let addr = spawn_stub().await;
    let form = Form::new().text("note", "no image");
    let response = reqwest::Client::new()
        .post(format!("http://{}{}", addr, ANALYZE_PATH))
        .multipart(form)
        .send()
        .await
        .expect("送信失敗");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.expect("JSONでない");
    assert_eq!(body["error"], "No image file provided");
}

#[tokio::test]
async fn test_stub_image_field_without_file_name() {
    let addr = spawn_stub().await;
    let form = Form::new().text("image", "not a file");
    let response = reqwest::Client::new()
        .post(format!("http://{}{}", addr, ANALYZE_PATH))
        .multipart(form)
        .send()
        .await
        .expect("送信失敗");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stub_rejects_get() {
    let addr = spawn_stub().await;
    let response = reqwest::get(format!("http://{}{}", addr, ANALYZE_PATH))
        .await
        .expect("送信失敗");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: serde_json::Value = response.json().await.expect("JSONでない");
    assert_eq!(body["error"], "Method not allowed");
}

#[tokio::test]
async fn test_stub_options_ok_with_cors() {
    let addr = spawn_stub().await;
    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("http://{}{}", addr, ANALYZE_PATH))
        .header("Origin", "http://localhost:8080")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .expect("送信失敗");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_stub_non_multipart_is_internal_error() {
    let addr = spawn_stub().await;
    let response = reqwest::Client::new()
        .post(format!("http://{}{}", addr, ANALYZE_PATH))
        .header("Content-Type", "application/json")
        .body("{}")
        .send()
        .await
        .expect("送信失敗");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json().await.expect("JSONでない");
    assert_eq!(body["error"], "Internal server error");
}

/// CLIの送信処理とスタブを繋いだ場合は平坦レコード形状なので「データなし」になる
#[tokio::test]
async fn test_cli_against_stub_shows_no_data() {
    let addr = spawn_stub().await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let image = dir.path().join("meal.jpg");
    std::fs::write(&image, [0xFF, 0xD8, 0xFF]).unwrap();

    let url = format!("http://{}{}", addr, ANALYZE_PATH);
    let session = meal_ai::upload::analyze_file(&image, None, &url, false)
        .await
        .expect("解析失敗");

    match session.screen() {
        meal_ai_common::Screen::EnvelopeResult(response) => assert!(response.is_no_data()),
        other => panic!("エンベロープ結果になっていない: {:?}", other),
    }
}
