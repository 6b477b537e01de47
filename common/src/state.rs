//! 画面状態
//!
//! 表示する画面は `Screen` の1値で表し、フラット結果とエンベロープ結果が
//! 同時に存在しないようにする。各アップロードには世代番号付きのチケットを
//! 発行し、最新のチケットの結果だけを反映する。

use crate::types::{CanonicalResponse, FlatNutritionRecord};
use crate::upload::UploadOutcome;

/// 表示中の画面
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Screen {
    #[default]
    Idle,
    Analyzing,
    FlatResult(FlatNutritionRecord),
    EnvelopeResult(CanonicalResponse),
}

impl Screen {
    pub fn is_analyzing(&self) -> bool {
        matches!(self, Screen::Analyzing)
    }
}

/// アップロード1回分の世代番号
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// 解析セッション
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisSession {
    screen: Screen,
    latest: u64,
    preview_url: Option<String>,
    error: Option<String>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn preview_url(&self) -> Option<&str> {
        self.preview_url.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }

    /// 新しいアップロードを開始。以前のチケットは無効になる。
    pub fn begin(&mut self) -> RequestTicket {
        self.latest += 1;
        self.screen = Screen::Analyzing;
        self.error = None;
        self.preview_url = None;
        RequestTicket(self.latest)
    }

    /// 結果を反映。古いチケットなら何もしない。
    pub fn apply(&mut self, ticket: RequestTicket, outcome: UploadOutcome) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        match outcome {
            UploadOutcome::Webhook(response) => self.screen = Screen::EnvelopeResult(response),
            UploadOutcome::Fallback { record, message } => {
                self.screen = Screen::FlatResult(record);
                self.error = Some(message);
            }
        }
        true
    }

    pub fn show_envelope(&mut self, ticket: RequestTicket, response: CanonicalResponse) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.screen = Screen::EnvelopeResult(response);
        true
    }

    pub fn show_flat(&mut self, ticket: RequestTicket, record: FlatNutritionRecord) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.screen = Screen::FlatResult(record);
        true
    }

    pub fn set_preview(&mut self, ticket: RequestTicket, data_url: String) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.preview_url = Some(data_url);
        true
    }

    pub fn fail(&mut self, ticket: RequestTicket, message: String) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.error = Some(message);
        true
    }

    /// 入力検証エラー（画面は変えない）
    pub fn reject(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// 初期画面に戻す。解析中のアップロードの結果は破棄される。
    pub fn reset(&mut self) {
        self.latest += 1;
        self.screen = Screen::Idle;
        self.preview_url = None;
        self.error = None;
    }
}
