use thiserror::Error;

#[derive(Error, Debug)]
pub enum MealAiError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("サーバーエラー: {0}")]
    Server(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] meal_ai_common::Error),
}

impl From<meal_ai_common::ValidationError> for MealAiError {
    fn from(e: meal_ai_common::ValidationError) -> Self {
        MealAiError::Common(e.into())
    }
}

pub type Result<T> = std::result::Result<T, MealAiError>;
