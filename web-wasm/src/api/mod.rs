//! 外部API連携

pub mod webhook;

use meal_ai_common::Error;
use wasm_bindgen::{JsCast, JsValue};

/// JS側の例外を共通エラーに変換
pub fn js_error(value: JsValue) -> Error {
    let message = value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value));
    Error::Network(message)
}
