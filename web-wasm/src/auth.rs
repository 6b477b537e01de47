//! Supabase認証（JSモジュール経由）
//!
//! クライアントの設定（URL・anonキー）はJS側が `window` から読む。

use crate::api::js_error;
use meal_ai_common::{IdentityProvider, OAuthProvider, Result, Subscription};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/js/supabase-auth.js")]
extern "C" {
    #[wasm_bindgen(js_name = "getSession", catch)]
    async fn get_session_js() -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = "onAuthStateChange")]
    fn on_auth_state_change_js(callback: &Closure<dyn FnMut(bool)>) -> JsValue;

    #[wasm_bindgen(js_name = "unsubscribe")]
    fn unsubscribe_js(handle: &JsValue);

    #[wasm_bindgen(js_name = "signInWithOAuth", catch)]
    async fn sign_in_with_oauth_js(provider: &str) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = "signOut", catch)]
    async fn sign_out_js() -> std::result::Result<JsValue, JsValue>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionInfo {
    has_session: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SupabaseAuth;

/// 状態変更リスナーの購読
///
/// コールバックは購読解除まで保持する。
pub struct AuthSubscription {
    handle: JsValue,
    _callback: Closure<dyn FnMut(bool)>,
}

impl Subscription for AuthSubscription {
    fn unsubscribe(self) {
        unsubscribe_js(&self.handle);
    }
}

impl IdentityProvider for SupabaseAuth {
    type Subscription = AuthSubscription;

    async fn get_session(&self) -> Result<bool> {
        let value = get_session_js().await.map_err(js_error)?;
        let info: SessionInfo = serde_wasm_bindgen::from_value(value)
            .map_err(|e| js_error(e.into()))?;
        Ok(info.has_session)
    }

    fn on_session_change<F>(&self, callback: F) -> AuthSubscription
    where
        F: Fn(bool) + 'static,
    {
        let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut(bool)>);
        let handle = on_auth_state_change_js(&closure);
        AuthSubscription {
            handle,
            _callback: closure,
        }
    }

    async fn sign_in_with_oauth(&self, provider: OAuthProvider) -> Result<()> {
        sign_in_with_oauth_js(provider.as_str())
            .await
            .map(|_| ())
            .map_err(js_error)
    }

    async fn sign_out(&self) -> Result<()> {
        sign_out_js().await.map(|_| ()).map_err(js_error)
    }
}
