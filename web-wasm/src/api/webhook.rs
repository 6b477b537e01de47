//! Webhook連携（fetch + FormData）

use crate::api::js_error;
use crate::image::WebImage;
use meal_ai_common::upload::IMAGE_FIELD;
use meal_ai_common::{Result, WebhookReply, WebhookTransport, WEBHOOK_URL};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Request, RequestInit, RequestMode, Response};

/// ブラウザのfetchで送信する
#[derive(Debug, Clone)]
pub struct FetchTransport {
    url: String,
}

impl FetchTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for FetchTransport {
    fn default() -> Self {
        Self::new(WEBHOOK_URL)
    }
}

impl WebhookTransport<WebImage> for FetchTransport {
    async fn post_image(&self, image: &WebImage) -> Result<WebhookReply> {
        post_form(&self.url, image).await.map_err(js_error)
    }
}

/// マルチパートでPOSTし、ステータス・Content-Type・本文を返す
///
/// Content-Typeヘッダはブラウザに任せる（boundaryが付く）。
async fn post_form(url: &str, image: &WebImage) -> std::result::Result<WebhookReply, JsValue> {
    let form = FormData::new()?;
    form.append_with_blob_and_filename(IMAGE_FIELD, image.file(), image.name())?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&form);

    let request = Request::new_with_str_and_init(url, &opts)?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window is not available"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;

    let status = resp.status();
    let content_type = resp.headers().get("content-type")?;
    let body = JsFuture::from(resp.text()?).await?;

    Ok(WebhookReply {
        status,
        content_type,
        body: body.as_string().unwrap_or_default(),
    })
}
