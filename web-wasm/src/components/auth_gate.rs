//! 認証ゲートコンポーネント
//!
//! セッションが確認できるまで子要素を描画しない。

use crate::auth::SupabaseAuth;
use gloo::console;
use leptos::prelude::*;
use meal_ai_common::auth::{AuthGate as GateState, GateLifecycle};
use meal_ai_common::{AuthStatus, IdentityProvider, OAuthProvider};
use wasm_bindgen_futures::spawn_local;

#[component]
pub fn AuthGate(children: ChildrenFn) -> impl IntoView {
    let gate = RwSignal::new(GateState::new());

    let subscription = SupabaseAuth.on_session_change(move |has_session| {
        gate.try_update(|g| g.on_session_change(has_session));
    });
    let lifecycle = StoredValue::new_local(GateLifecycle::new(subscription));

    spawn_local(async move {
        let has_session = match SupabaseAuth.get_session().await {
            Ok(has_session) => has_session,
            Err(e) => {
                console::error!(format!("セッション取得失敗: {}", e));
                false
            }
        };
        gate.try_update(|g| g.on_initial_session(has_session));
    });

    on_cleanup(move || {
        gate.try_update(|g| g.teardown());
        lifecycle.try_update_value(|l| l.unmount());
    });

    let status = Memo::new(move |_| gate.with(|g| g.status()));

    let sign_in_error = Memo::new(move |_| gate.with(|g| g.sign_in_error().map(str::to_string)));

    let sign_in = move |_| {
        gate.try_update(|g| g.begin_sign_in());
        spawn_local(async move {
            if let Err(e) = SupabaseAuth.sign_in_with_oauth(OAuthProvider::Google).await {
                console::error!(format!("サインイン失敗: {}", e));
                gate.try_update(|g| g.on_sign_in_failed(e.to_string()));
            }
        });
    };

    let sign_out = move |_| {
        spawn_local(async {
            if let Err(e) = SupabaseAuth.sign_out().await {
                console::error!(format!("サインアウト失敗: {}", e));
            }
        });
    };

    move || match status.get() {
        AuthStatus::Loading => view! {
            <div class="auth-screen">"Loading..."</div>
        }
        .into_any(),
        AuthStatus::Unauthenticated => view! {
            <div class="auth-screen">
                <div class="auth-card">
                    <h2>"Sign in to continue"</h2>
                    <button class="btn btn-primary btn-block" on:click=sign_in>
                        {format!("Continue with {}", OAuthProvider::Google.display_name())}
                    </button>
                    {move || {
                        sign_in_error
                            .get()
                            .map(|message| view! { <p class="error-banner">{message}</p> })
                    }}
                </div>
            </div>
        }
        .into_any(),
        AuthStatus::Authenticated => {
            let children = children.clone();
            view! {
                <div>
                    <div class="sign-out">
                        <button class="btn btn-small btn-outline" on:click=sign_out>
                            "Sign out"
                        </button>
                    </div>
                    {children()}
                </div>
            }
            .into_any()
        }
    }
}
