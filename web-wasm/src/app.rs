//! メインアプリケーションコンポーネント

use crate::components::{
    auth_gate::AuthGate,
    header::Header,
    image_upload::ImageUpload,
    nutrition_results::NutritionResults,
    preview_carousel::PreviewCarousel,
    webhook_results::WebhookResults,
};
use leptos::prelude::*;
use meal_ai_common::{AnalysisSession, CanonicalResponse, FlatNutritionRecord, Screen};

/// 表示するページ
///
/// 解析中もランディング（アップロードフォーム）を表示し続ける。
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Landing,
    Flat(FlatNutritionRecord),
    Envelope(CanonicalResponse),
}

impl Page {
    pub fn of(screen: &Screen) -> Self {
        match screen {
            Screen::Idle | Screen::Analyzing => Page::Landing,
            Screen::FlatResult(record) => Page::Flat(record.clone()),
            Screen::EnvelopeResult(response) => Page::Envelope(response.clone()),
        }
    }
}

/// 結果画面に出すエラーメッセージ。フォールバック結果のときだけ返す。
pub fn result_notice(session: &AnalysisSession) -> Option<String> {
    match session.screen() {
        Screen::FlatResult(_) => session.error().map(str::to_string),
        _ => None,
    }
}

/// 特徴タイル（値, 見出し, 補足）
const FEATURE_TILES: [(&str, &str, &str); 3] = [
    ("98%", "Accuracy Rate", "Industry-leading precision"),
    ("<1s", "Analysis Time", "Instant results"),
    ("1000+", "Foods Recognized", "Comprehensive database"),
];

#[component]
pub fn App() -> impl IntoView {
    let session = RwSignal::new(AnalysisSession::new());

    // 画面の種類が変わったときだけ描画し直す
    let page = Memo::new(move |_| session.with(|s| Page::of(s.screen())));
    let background = Signal::derive(move || session.with(|s| s.preview_url().map(str::to_string)));
    let notice = Signal::derive(move || session.with(result_notice));

    let on_reset = move |_: ()| session.update(|s| s.reset());

    view! {
        <AuthGate>
            <div class="page">
                <div class="page-overlay" />
                <div class="page-content">
                    {move || match page.get() {
                        Page::Landing => view! { <Landing session=session /> }.into_any(),
                        Page::Flat(record) => view! {
                            <div class="container">
                                <NutritionResults
                                    record=record
                                    notice=notice
                                    background=background
                                    on_reset=on_reset
                                />
                            </div>
                        }
                        .into_any(),
                        Page::Envelope(response) => view! {
                            <div class="container">
                                <WebhookResults response=response background=background on_reset=on_reset />
                            </div>
                        }
                        .into_any(),
                    }}
                </div>
            </div>
        </AuthGate>
    }
}

#[component]
fn Landing(session: RwSignal<AnalysisSession>) -> impl IntoView {
    let tiles = FEATURE_TILES
        .iter()
        .map(|(value, title, note)| view! {
            <div class="card-glow">
                <div class="tile-value">{*value}</div>
                <p>{*title}</p>
                <p class="muted">{*note}</p>
            </div>
        })
        .collect_view();

    view! {
        <div class="container">
            <Header />

            <section id="upload" class="upload-section">
                <ImageUpload session=session />
            </section>

            <section id="details" class="details-section">
                <h2>
                    "See Your Nutrition"
                    <br />
                    <span class="text-glow">"In Beautiful Detail"</span>
                </h2>
                <p class="muted">
                    "Instantly discover calories, macros, and micronutrients with AI precision. Watch as your meal transforms into actionable nutritional insights."
                </p>
                <PreviewCarousel />
            </section>

            <div class="feature-grid">{tiles}</div>

            <footer class="footer">
                <p>"Powered by advanced AI • Nutritional estimates may vary slightly"</p>
            </footer>
        </div>
    }
}
