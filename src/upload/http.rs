//! Webhookへのマルチパート送信（reqwest）

use super::ImageFile;
use meal_ai_common::upload::IMAGE_FIELD;
use meal_ai_common::{Error, Result, WebhookReply, WebhookTransport};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};

/// タイムアウト・リトライなしでPOSTする
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl WebhookTransport<ImageFile> for HttpTransport {
    async fn post_image(&self, image: &ImageFile) -> Result<WebhookReply> {
        let bytes = tokio::fs::read(&image.path).await?;

        let part = Part::bytes(bytes)
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)
            .map_err(|e| Error::Network(format!("Failed to create multipart: {}", e)))?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(WebhookReply {
            status,
            content_type,
            body,
        })
    }
}
