//! 画像アップロード（ネイティブ版）
//!
//! ローカルの画像ファイルを `UploadController` に渡し、結果を
//! `AnalysisSession` に反映する。

mod http;

pub use http::HttpTransport;

use crate::error::{MealAiError, Result};
use base64::Engine;
use indicatif::{ProgressBar, ProgressStyle};
use meal_ai_common::{
    AnalysisSession, CanonicalResponse, FlatNutritionRecord, RequestTicket, UploadController,
    UploadObserver, UploadSource,
};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;
use tokio::task::LocalSet;
use tracing::{debug, info, warn};

const MIME_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("heic", "image/heic"),
    ("bmp", "image/bmp"),
    ("txt", "text/plain"),
    ("json", "application/json"),
];

const FALLBACK_MIME: &str = "application/octet-stream";

/// 拡張子からMIMEタイプを判定
pub fn detect_mime_type(path: &Path) -> &'static str {
    let Some(ext) = path.extension() else {
        return FALLBACK_MIME;
    };
    let ext = ext.to_string_lossy().to_lowercase();
    MIME_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(FALLBACK_MIME)
}

/// Data URLを生成
pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// アップロード対象のローカル画像
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
}

impl ImageFile {
    /// ファイル情報を読み込む（本体は送信時に読む）
    pub fn open(path: &Path, mime_override: Option<&str>) -> Result<Self> {
        if !path.is_file() {
            return Err(MealAiError::FileNotFound(path.display().to_string()));
        }

        let size = std::fs::metadata(path)?.len();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let mime_type = mime_override
            .map(str::to_string)
            .unwrap_or_else(|| detect_mime_type(path).to_string());

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            mime_type,
            size,
        })
    }
}

impl UploadSource for ImageFile {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// 読み込みとエンコードはブロッキングプールで行い、`on_ready` は
    /// 呼び出し元の `LocalSet` 上で呼ぶ。`LocalSet` の外から呼んではいけない。
    fn read_preview<F>(&self, on_ready: F)
    where
        F: FnOnce(String) + 'static,
    {
        let path = self.path.clone();
        let mime_type = self.mime_type.clone();
        tokio::task::spawn_local(async move {
            let path_display = path.display().to_string();
            let encoded = tokio::task::spawn_blocking(move || {
                std::fs::read(&path).map(|bytes| to_data_url(&mime_type, &bytes))
            })
            .await;
            match encoded {
                Ok(Ok(data_url)) => on_ready(data_url),
                Ok(Err(e)) => warn!("プレビュー読み込み失敗: {}: {}", path_display, e),
                Err(e) => warn!("プレビュー読み込みタスク失敗: {}: {}", path_display, e),
            }
        });
    }
}

/// CLI用の通知先。プレビューとエラーをセッションに記録し、スピナーを更新する。
///
/// 最終的な画面は `analyze_file` が結果から反映する。
#[derive(Clone)]
pub struct CliObserver {
    session: Rc<RefCell<AnalysisSession>>,
    ticket: RequestTicket,
    spinner: ProgressBar,
}

impl CliObserver {
    pub fn new(session: Rc<RefCell<AnalysisSession>>, ticket: RequestTicket, show_progress: bool) -> Self {
        let spinner = if show_progress {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("{spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        } else {
            ProgressBar::hidden()
        };
        Self { session, ticket, spinner }
    }
}

impl UploadObserver for CliObserver {
    fn on_analysis_start(&self) {
        info!(generation = self.ticket.generation(), "解析開始");
        self.session.borrow_mut().clear_error();
        self.spinner.set_message("Analyzing your meal...");
        self.spinner.enable_steady_tick(Duration::from_millis(100));
    }

    fn on_preview(&self, data_url: String) {
        debug!("プレビュー生成: {} bytes", data_url.len());
        self.session.borrow_mut().set_preview(self.ticket, data_url);
    }

    fn on_webhook_complete(&self, response: CanonicalResponse) {
        info!(entries = response.len(), "Webhook解析完了");
        self.spinner.finish_and_clear();
    }

    fn on_analysis_complete(&self, record: FlatNutritionRecord) {
        info!(meal = %record.meal_name, "フォールバック結果を表示");
        self.spinner.finish_and_clear();
    }

    fn on_error(&self, message: String) {
        warn!("解析エラー: {}", message);
        self.session.borrow_mut().fail(self.ticket, message);
    }
}

/// 画像1枚を解析し、最終的なセッション状態を返す
///
/// 検証エラーはErrとして返す（送信は行わない）。送信・解釈の失敗は
/// フォールバック結果としてOkで返す。
pub async fn analyze_file(
    path: &Path,
    mime_override: Option<&str>,
    webhook_url: &str,
    show_progress: bool,
) -> Result<AnalysisSession> {
    let image = ImageFile::open(path, mime_override)?;
    let controller = UploadController::new(HttpTransport::new(webhook_url));

    let session = Rc::new(RefCell::new(AnalysisSession::new()));
    let ticket = session.borrow_mut().begin();
    let observer = CliObserver::new(session.clone(), ticket, show_progress);

    debug!(
        file = %image.file_name,
        mime = %image.mime_type,
        size = image.size,
        url = webhook_url,
        "Webhookへ送信"
    );
    let local = LocalSet::new();
    let outcome = local.run_until(controller.upload(&image, &observer)).await?;
    // 残っているプレビュー読み込みを待つ
    local.await;

    session.borrow_mut().apply(ticket, outcome);
    let result = session.borrow().clone();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect_mime_type() {
        assert_eq!(detect_mime_type(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(detect_mime_type(Path::new("a.JPEG")), "image/jpeg");
        assert_eq!(detect_mime_type(Path::new("a.png")), "image/png");
        assert_eq!(detect_mime_type(Path::new("notes.txt")), "text/plain");
        assert_eq!(detect_mime_type(Path::new("noext")), "application/octet-stream");
        assert_eq!(detect_mime_type(Path::new("a.xyz")), "application/octet-stream");
    }

    #[test]
    fn test_to_data_url() {
        assert_eq!(to_data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_open_missing_file() {
        let result = ImageFile::open(Path::new("/nonexistent/meal.jpg"), None);
        assert!(matches!(result, Err(MealAiError::FileNotFound(_))));
    }

    #[test]
    fn test_open_reads_size_and_mime() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("lunch.png");
        std::fs::File::create(&path).unwrap().write_all(b"12345").unwrap();

        let image = ImageFile::open(&path, None).unwrap();
        assert_eq!(image.file_name, "lunch.png");
        assert_eq!(image.size, 5);
        assert_eq!(image.mime_type, "image/png");

        let overridden = ImageFile::open(&path, Some("image/webp")).unwrap();
        assert_eq!(overridden.mime_type, "image/webp");
    }

    #[tokio::test]
    async fn test_read_preview_is_data_url() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("dinner.jpg");
        std::fs::write(&path, b"abc").unwrap();

        let image = ImageFile::open(&path, None).unwrap();
        let captured = Rc::new(RefCell::new(None));
        let sink = captured.clone();

        let local = LocalSet::new();
        local
            .run_until(async {
                image.read_preview(move |url| *sink.borrow_mut() = Some(url));
                // 呼び出し直後にはまだ届かない
                assert!(captured.borrow().is_none());
            })
            .await;
        local.await;

        assert_eq!(captured.borrow().as_deref(), Some("data:image/jpeg;base64,YWJj"));
    }

    // =============================================
    // 送信順序テスト
    // =============================================

    type EventLog = Rc<RefCell<Vec<&'static str>>>;

    struct RecordingTransport {
        events: EventLog,
    }

    impl meal_ai_common::WebhookTransport<ImageFile> for RecordingTransport {
        async fn post_image(&self, _image: &ImageFile) -> meal_ai_common::Result<meal_ai_common::WebhookReply> {
            self.events.borrow_mut().push("post_image");
            tokio::task::yield_now().await;
            Ok(meal_ai_common::WebhookReply {
                status: 200,
                content_type: Some("application/json".to_string()),
                body: r#"{"mealName":"Bento"}"#.to_string(),
            })
        }
    }

    #[derive(Clone)]
    struct RecordingObserver {
        events: EventLog,
    }

    impl UploadObserver for RecordingObserver {
        fn on_analysis_start(&self) {
            self.events.borrow_mut().push("start");
        }

        fn on_preview(&self, _data_url: String) {
            self.events.borrow_mut().push("preview");
        }

        fn on_webhook_complete(&self, _response: CanonicalResponse) {
            self.events.borrow_mut().push("webhook");
        }

        fn on_analysis_complete(&self, _record: FlatNutritionRecord) {
            self.events.borrow_mut().push("fallback");
        }

        fn on_error(&self, _message: String) {
            self.events.borrow_mut().push("error");
        }
    }

    #[tokio::test]
    async fn test_large_preview_does_not_delay_post() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("feast.jpg");
        std::fs::write(&path, vec![0u8; 9 * 1024 * 1024]).unwrap();
        let image = ImageFile::open(&path, None).unwrap();

        let events: EventLog = Rc::default();
        let controller = UploadController::new(RecordingTransport { events: events.clone() });
        let observer = RecordingObserver { events: events.clone() };

        let local = LocalSet::new();
        local.run_until(controller.analyze(&image, &observer)).await;
        local.await;

        let events = events.borrow();
        let position = |name| events.iter().position(|e| *e == name);
        assert_eq!(events.first(), Some(&"start"));
        assert!(position("post_image").unwrap() < position("preview").unwrap());
        assert!(position("webhook").is_some());
        assert!(position("fallback").is_none());
    }
}
