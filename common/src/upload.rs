//! 画像アップロード処理
//!
//! 1枚の画像について、検証 → プレビュー読み込み開始 → Webhook送信 →
//! レスポンス解釈 → 正規化 の順に処理する。失敗時は固定のフォールバック
//! レコードを通知し、エラーメッセージを表示側に渡す。

use std::future::Future;

use serde_json::Value;

use crate::error::{Error, Result, ValidationError};
use crate::normalizer::normalize;
use crate::nutrition::fallback_record;
use crate::types::{CanonicalResponse, FlatNutritionRecord};

/// 解析Webhookのエンドポイント
pub const WEBHOOK_URL: &str = "https://vepatib882.app.n8n.cloud/webhook/meal-ai";

/// マルチパートのフィールド名
pub const IMAGE_FIELD: &str = "image";

/// アップロード可能な最大サイズ（10 MiB）
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// サイズとMIMEタイプを検証
pub fn validate_upload(size: u64, mime_type: &str) -> std::result::Result<(), ValidationError> {
    if size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    if !mime_type.starts_with("image/") {
        return Err(ValidationError::NotAnImage {
            mime_type: mime_type.to_string(),
        });
    }
    Ok(())
}

/// アップロード対象のファイル
pub trait UploadSource {
    fn file_name(&self) -> &str;
    fn size(&self) -> u64;
    fn mime_type(&self) -> &str;

    /// プレビュー（Data URL）の読み込みを開始する。
    ///
    /// 完了を待たずに戻ってよい。`on_ready` はネットワーク応答の前後どちらで
    /// 呼ばれてもよい。
    fn read_preview<F>(&self, on_ready: F)
    where
        F: FnOnce(String) + 'static;
}

/// Webhookの生レスポンス
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl WebhookReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn declares_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false)
    }
}

/// 画像をマルチパートでPOSTする送信手段
pub trait WebhookTransport<S: UploadSource> {
    fn post_image(&self, source: &S) -> impl Future<Output = Result<WebhookReply>>;
}

/// レスポンスをJSONとして解釈
///
/// - 2xx以外: `HttpStatus`
/// - Content-TypeがJSON: そのままパース（失敗は `Json`）
/// - それ以外: テキストとしてパースを試み、失敗は `NonJson`
pub fn decode_payload(reply: &WebhookReply) -> Result<Value> {
    if !reply.is_success() {
        return Err(Error::HttpStatus(reply.status));
    }

    if reply.declares_json() {
        return Ok(serde_json::from_str(&reply.body)?);
    }

    serde_json::from_str(&reply.body).map_err(|_| Error::NonJson)
}

/// アップロード処理の通知先
pub trait UploadObserver: Clone + 'static {
    /// 解析開始（前回のエラー表示はここでクリアする）
    fn on_analysis_start(&self);
    fn on_preview(&self, data_url: String);
    fn on_webhook_complete(&self, response: CanonicalResponse);
    /// フォールバックレコードの通知
    fn on_analysis_complete(&self, record: FlatNutritionRecord);
    fn on_error(&self, message: String);
}

/// 1回のアップロードの結果
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Webhook(CanonicalResponse),
    Fallback {
        record: FlatNutritionRecord,
        message: String,
    },
}

/// アップロードコントローラ
pub struct UploadController<T> {
    transport: T,
}

impl<T> UploadController<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn validate<S: UploadSource>(&self, source: &S) -> std::result::Result<(), ValidationError> {
        validate_upload(source.size(), source.mime_type())
    }

    /// 検証してから解析する。検証エラー時は送信しない。
    pub async fn upload<S, O>(
        &self,
        source: &S,
        observer: &O,
    ) -> std::result::Result<UploadOutcome, ValidationError>
    where
        S: UploadSource,
        O: UploadObserver,
        T: WebhookTransport<S>,
    {
        if let Err(e) = self.validate(source) {
            observer.on_error(e.to_string());
            return Err(e);
        }
        Ok(self.analyze(source, observer).await)
    }

    /// 検証済みのファイルを解析する。
    ///
    /// `on_webhook_complete` と `on_analysis_complete` はどちらか一方だけが呼ばれる。
    pub async fn analyze<S, O>(&self, source: &S, observer: &O) -> UploadOutcome
    where
        S: UploadSource,
        O: UploadObserver,
        T: WebhookTransport<S>,
    {
        observer.on_analysis_start();

        let preview_observer = observer.clone();
        source.read_preview(move |data_url| preview_observer.on_preview(data_url));

        match self.fetch(source).await {
            Ok(response) => {
                observer.on_webhook_complete(response.clone());
                UploadOutcome::Webhook(response)
            }
            Err(e) => {
                let message = e.to_string();
                observer.on_error(message.clone());
                let record = fallback_record();
                observer.on_analysis_complete(record.clone());
                UploadOutcome::Fallback { record, message }
            }
        }
    }

    async fn fetch<S>(&self, source: &S) -> Result<CanonicalResponse>
    where
        S: UploadSource,
        T: WebhookTransport<S>,
    {
        let reply = self.transport.post_image(source).await?;
        let payload = decode_payload(&reply)?;
        Ok(normalize(&payload))
    }
}
