//! アップロード結果を画面状態へ反映する

use gloo::console;
use leptos::prelude::*;
use meal_ai_common::{
    AnalysisSession, CanonicalResponse, FlatNutritionRecord, RequestTicket, UploadObserver,
};

/// 1回のアップロードに紐づく通知先
///
/// 古いチケットの通知は `AnalysisSession` 側で捨てられる。
#[derive(Clone, Copy)]
pub struct SessionObserver {
    session: RwSignal<AnalysisSession>,
    ticket: RequestTicket,
}

impl SessionObserver {
    pub fn new(session: RwSignal<AnalysisSession>, ticket: RequestTicket) -> Self {
        Self { session, ticket }
    }

    fn apply(&self, label: &str, update: impl FnOnce(&mut AnalysisSession) -> bool) {
        let applied = self.session.try_update(update).unwrap_or(false);
        if !applied {
            console::debug!(format!(
                "古い結果を破棄: {} (generation {})",
                label,
                self.ticket.generation()
            ));
        }
    }
}

impl UploadObserver for SessionObserver {
    fn on_analysis_start(&self) {
        console::log!(format!("解析開始 (generation {})", self.ticket.generation()));
    }

    fn on_preview(&self, data_url: String) {
        let ticket = self.ticket;
        self.apply("preview", move |s| s.set_preview(ticket, data_url));
    }

    fn on_webhook_complete(&self, response: CanonicalResponse) {
        let ticket = self.ticket;
        self.apply("webhook", move |s| s.show_envelope(ticket, response));
    }

    fn on_analysis_complete(&self, record: FlatNutritionRecord) {
        let ticket = self.ticket;
        self.apply("fallback", move |s| s.show_flat(ticket, record));
    }

    fn on_error(&self, message: String) {
        console::warn!(format!("解析エラー: {}", message));
        let ticket = self.ticket;
        self.apply("error", move |s| s.fail(ticket, message));
    }
}
