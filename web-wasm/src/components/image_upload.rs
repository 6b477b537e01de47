//! 画像アップロードコンポーネント
//!
//! 「Take Photo」はカメラ指定付き、「Upload Image」は通常のファイル選択。
//! どちらも最初の1ファイルだけを解析に回す。

use crate::api::webhook::FetchTransport;
use crate::image::WebImage;
use crate::session::SessionObserver;
use gloo::console;
use leptos::html::Input;
use leptos::prelude::*;
use meal_ai_common::{AnalysisSession, UploadController};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, File, HtmlInputElement};

#[component]
pub fn ImageUpload(session: RwSignal<AnalysisSession>) -> impl IntoView {
    let camera_ref = NodeRef::<Input>::new();
    let file_ref = NodeRef::<Input>::new();

    let is_analyzing = move || session.with(|s| s.screen().is_analyzing());
    let error = move || session.with(|s| s.error().map(str::to_string));
    let preview = move || session.with(|s| s.preview_url().map(str::to_string));

    let on_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            start_analysis(session, file);
        }
    };

    view! {
        <div class="image-upload">
            {move || error().map(|message| view! {
                <div class="error-banner">{message}</div>
            })}

            {move || preview().map(|url| view! {
                <div class="preview">
                    <img src=url alt="Meal preview" />
                    <Show when=is_analyzing>
                        <div class="preview-overlay">
                            <div class="spinner" />
                            <p>"Analyzing your meal..."</p>
                        </div>
                    </Show>
                </div>
            })}

            <div class="upload-buttons">
                <button
                    class="btn btn-camera"
                    disabled=is_analyzing
                    on:click=move |_| {
                        if let Some(input) = camera_ref.get() {
                            input.click();
                        }
                    }
                >
                    "📷 Take Photo"
                </button>

                <button
                    class="btn btn-upload"
                    disabled=is_analyzing
                    on:click=move |_| {
                        if let Some(input) = file_ref.get() {
                            input.click();
                        }
                    }
                >
                    "⬆ Upload Image"
                </button>
            </div>

            <input
                node_ref=camera_ref
                type="file"
                accept="image/*"
                capture="environment"
                class="hidden"
                on:change=on_change
            />

            <input
                node_ref=file_ref
                type="file"
                accept="image/*"
                class="hidden"
                on:change=on_change
            />
        </div>
    }
}

/// 検証してから送信を開始する
///
/// 検証エラーは画面を変えずにエラー表示だけ行う。
fn start_analysis(session: RwSignal<AnalysisSession>, file: File) {
    let image = WebImage::new(file);
    let controller = UploadController::new(FetchTransport::default());

    if let Err(e) = controller.validate(&image) {
        console::warn!(format!("{}: {}", image.name(), e));
        session.update(|s| s.reject(e.to_string()));
        return;
    }

    let Some(ticket) = session.try_update(|s| s.begin()) else {
        return;
    };
    let observer = SessionObserver::new(session, ticket);

    spawn_local(async move {
        controller.analyze(&image, &observer).await;
    });
}
