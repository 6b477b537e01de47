//! 認証ゲート
//!
//! 外部IDプロバイダのセッション有無だけを見て、保護された画面の表示可否を決める。
//! OAuthのトークン処理はプロバイダ側に任せる。

use std::future::Future;

use crate::error::Result;

/// ゲートの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// 初回のセッション確認中
    Loading,
    Unauthenticated,
    Authenticated,
}

/// OAuthプロバイダ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
}

impl OAuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "Google",
        }
    }
}

/// セッション状態の遷移
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthGate {
    loading: bool,
    has_session: bool,
    mounted: bool,
    sign_in_error: Option<String>,
}

impl Default for AuthGate {
    fn default() -> Self {
        Self {
            loading: true,
            has_session: false,
            mounted: true,
            sign_in_error: None,
        }
    }
}

impl AuthGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> AuthStatus {
        if self.loading {
            AuthStatus::Loading
        } else if self.has_session {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Unauthenticated
        }
    }

    /// 直近のサインイン失敗メッセージ
    pub fn sign_in_error(&self) -> Option<&str> {
        self.sign_in_error.as_deref()
    }

    /// サインイン開始。前回の失敗表示を消す
    pub fn begin_sign_in(&mut self) {
        self.sign_in_error = None;
    }

    /// サインインの開始自体が失敗した（ポップアップのブロック、設定不備など）
    pub fn on_sign_in_failed(&mut self, message: impl Into<String>) {
        if !self.mounted {
            return;
        }
        self.sign_in_error = Some(message.into());
    }

    /// 初回のセッション取得が完了
    pub fn on_initial_session(&mut self, has_session: bool) {
        if !self.mounted {
            return;
        }
        self.has_session = has_session;
        self.loading = false;
    }

    /// プロバイダからのセッション変更通知
    ///
    /// 初回取得より先に届いた場合は値だけ記録し、Loadingのままにする。
    pub fn on_session_change(&mut self, has_session: bool) {
        if !self.mounted {
            return;
        }
        self.has_session = has_session;
        if has_session {
            self.sign_in_error = None;
        }
    }

    /// 破棄後の通知はすべて無視する
    pub fn teardown(&mut self) {
        self.mounted = false;
    }
}

/// セッション変更通知の購読
pub trait Subscription {
    fn unsubscribe(self);
}

/// 外部IDプロバイダ
pub trait IdentityProvider {
    type Subscription: Subscription;

    /// 現在セッションがあるか
    fn get_session(&self) -> impl Future<Output = Result<bool>>;

    /// セッション変更を購読する
    fn on_session_change<F>(&self, callback: F) -> Self::Subscription
    where
        F: Fn(bool) + 'static;

    /// リダイレクト型のサインインを開始する。結果は `on_session_change` で届く。
    fn sign_in_with_oauth(&self, provider: OAuthProvider) -> impl Future<Output = Result<()>>;

    fn sign_out(&self) -> impl Future<Output = Result<()>>;
}

/// 購読とゲート状態をまとめて扱う
///
/// 購読を保持し、`unmount` で1回だけ解除する。
pub struct GateLifecycle<S: Subscription> {
    subscription: Option<S>,
}

impl<S: Subscription> GateLifecycle<S> {
    pub fn new(subscription: S) -> Self {
        Self {
            subscription: Some(subscription),
        }
    }

    /// 購読を解除する。2回目以降は何もしない。
    pub fn unmount(&mut self) -> bool {
        match self.subscription.take() {
            Some(subscription) => {
                subscription.unsubscribe();
                true
            }
            None => false,
        }
    }
}
