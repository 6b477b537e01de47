//! 解析サービスのスタブ
//!
//! マルチパートの `image` を受け取り、固定メニューからランダムに選んだ
//! 栄養レコードを返す。実際の画像解析は行わない。

use crate::error::{MealAiError, Result};
use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart},
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{post, MethodRouter},
    Json, Router,
};
use meal_ai_common::nutrition::{MenuItem, STUB_CONFIDENCE_RANGE};
use meal_ai_common::upload::IMAGE_FIELD;
use meal_ai_common::{MAX_UPLOAD_BYTES, STUB_MENU};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

pub const ANALYZE_PATH: &str = "/analyze-nutrition";

/// 上限サイズの画像にマルチパートのヘッダ分を加えた量
const BODY_LIMIT: usize = MAX_UPLOAD_BYTES as usize + 1024 * 1024;

/// スタブの応答。数値はすべて整数で送る
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StubMeal {
    pub meal_name: &'static str,
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
    pub confidence: u32,
}

impl StubMeal {
    fn new(item: &MenuItem, confidence: u32) -> Self {
        Self {
            meal_name: item.name,
            calories: item.calories,
            protein: item.protein,
            carbs: item.carbs,
            fat: item.fat,
            confidence,
        }
    }
}

/// メニューから1品選び、信頼度を付ける
pub fn pick_meal<R: Rng + ?Sized>(rng: &mut R) -> StubMeal {
    let item = STUB_MENU.choose(rng).unwrap_or(&STUB_MENU[0]);
    let confidence = rng.gen_range(STUB_CONFIDENCE_RANGE);
    StubMeal::new(item, confidence)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

fn analyze_route() -> MethodRouter {
    post(analyze_nutrition)
        .options(|| async { StatusCode::OK })
        .fallback(method_not_allowed)
}

pub fn router() -> Router {
    Router::new()
        .route("/", analyze_route())
        .route(ANALYZE_PATH, analyze_route())
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(cors_layer())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// 最初の `image` フィールドがファイルかどうか
async fn has_image_file(multipart: &mut Multipart) -> std::result::Result<bool, String> {
    while let Some(field) = multipart.next_field().await.map_err(|e| e.body_text())? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let is_file = field.file_name().is_some();
        let bytes = field.bytes().await.map_err(|e| e.body_text())?;
        info!(size = bytes.len(), "画像を受信");
        return Ok(is_file);
    }
    Ok(false)
}

async fn analyze_nutrition(multipart: std::result::Result<Multipart, MultipartRejection>) -> Response {
    let result = match multipart {
        Ok(mut multipart) => has_image_file(&mut multipart).await,
        Err(rejection) => Err(rejection.body_text()),
    };

    match result {
        Ok(true) => {
            let meal = pick_meal(&mut rand::thread_rng());
            info!(meal = meal.meal_name, confidence = meal.confidence, "スタブ結果を返却");
            Json(meal).into_response()
        }
        Ok(false) => error_response(StatusCode::BAD_REQUEST, "No image file provided"),
        Err(message) => {
            error!("Error processing request: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error",
                    "message": message,
                })),
            )
                .into_response()
        }
    }
}

/// スタブを起動し、Ctrl-Cまで待ち受ける
pub async fn serve(bind_addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|e| MealAiError::Server(format!("{}: {}", bind_addr, e)))?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .map_err(|e| MealAiError::Server(e.to_string()))
}
