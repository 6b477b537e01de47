//! Meal AI: 食事写真の栄養成分解析
//!
//! - `upload`: 画像をWebhookへ送信し、結果を正規化する
//! - `render`: 結果のテキスト表示
//! - `stub_server`: 解析サービスのスタブ

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod render;
pub mod stub_server;
pub mod upload;
