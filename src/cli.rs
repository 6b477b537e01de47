use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "meal-ai")]
#[command(about = "食事写真の栄養成分AI解析ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 食事写真をWebhookへ送信して栄養成分を表示
    Analyze {
        /// 画像ファイルのパス
        #[arg(required = true)]
        image: PathBuf,

        /// 送信先Webhook URL（設定・環境変数より優先）
        #[arg(short, long)]
        url: Option<String>,

        /// MIMEタイプを指定（省略時は拡張子から判定）
        #[arg(long)]
        mime: Option<String>,

        /// 正規化済みJSONを出力
        #[arg(long)]
        json: bool,
    },

    /// 解析サービスのスタブを起動
    Serve {
        /// 待ち受けアドレス（例: 127.0.0.1:8787）
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// 設定管理
    Config {
        /// Webhook URLを設定
        #[arg(long)]
        set_webhook_url: Option<String>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}
