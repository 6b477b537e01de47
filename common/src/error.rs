//! エラー型定義

use thiserror::Error;

/// アップロード前の入力検証エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("File size must be less than 10MB")]
    TooLarge { size: u64, limit: u64 },

    #[error("Please upload an image file")]
    NotAnImage { mime_type: String },
}

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// 2xx以外のHTTPステータス
    #[error("Failed to analyze image")]
    HttpStatus(u16),

    #[error("{0}")]
    Network(String),

    #[error("Webhook returned non-JSON response")]
    NonJson,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// エラー分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 入力検証（パイプライン開始前）
    Validation,
    /// 通信失敗・HTTPステータス異常
    Transport,
    /// レスポンスがJSONとして読めない
    Format,
    /// ローカルの読み込み失敗
    Other,
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Validation(_) => ErrorCategory::Validation,
            Error::HttpStatus(_) | Error::Network(_) => ErrorCategory::Transport,
            Error::NonJson | Error::Json(_) => ErrorCategory::Format,
            Error::Io(_) => ErrorCategory::Other,
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
