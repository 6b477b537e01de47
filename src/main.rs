use clap::Parser;
use meal_ai::{cli, config, error, logging, render, stub_server, upload};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use meal_ai_common::Screen;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("✖ {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze { image, url, mime, json } => {
            let webhook_url = config.resolve_webhook_url(url.as_deref());
            if !json {
                println!("📸 meal-ai - 栄養解析\n");
            }

            let session = upload::analyze_file(&image, mime.as_deref(), &webhook_url, !json).await?;

            if let Some(message) = session.error() {
                eprintln!("⚠ {}", message);
            }

            match session.screen() {
                Screen::EnvelopeResult(response) => {
                    if json {
                        println!("{}", response.to_pretty_json());
                    } else {
                        print!("{}", render::render_envelope(response));
                    }
                }
                Screen::FlatResult(record) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(record)?);
                    } else {
                        print!("{}", render::render_flat(record));
                    }
                }
                Screen::Idle | Screen::Analyzing => {}
            }
        }

        Commands::Serve { bind } => {
            let bind_addr = bind.unwrap_or_else(|| config.bind_addr.clone());
            println!("🚀 meal-ai - スタブサービス起動: http://{}{}", bind_addr, stub_server::ANALYZE_PATH);
            stub_server::serve(&bind_addr).await?;
            println!("✔ 停止しました");
        }

        Commands::Config { set_webhook_url, show } => {
            let mut config = config;

            if let Some(url) = set_webhook_url {
                config.set_webhook_url(url)?;
                println!("✔ Webhook URLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  Webhook URL: {}", config.resolve_webhook_url(None));
                println!("  スタブ待受: {}", config.bind_addr);
                if let Ok(path) = Config::config_path() {
                    println!("  設定ファイル: {}", path.display());
                }
            }
        }
    }

    Ok(())
}
