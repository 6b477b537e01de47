//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <div class="badge">
                <span class="badge-icon">"⚡"</span>
                <span>"Instant AI Analysis"</span>
            </div>

            <h1>
                "Know Your"
                <br />
                <span class="text-glow">"Nutrition Instantly"</span>
            </h1>

            <p class="lead">
                "Snap a meal. Get complete macros. No guessing. No complicated apps. Just real nutritional intelligence powered by AI."
            </p>

            <div class="hero-actions">
                <a href="#upload" class="btn btn-primary btn-glow">"Start Analyzing ▾"</a>
                <a href="#details" class="btn btn-outline">"Learn More"</a>
            </div>
        </header>
    }
}
