mod common;
mod config;
mod error;
mod network;
mod ui;

use std::error::Error;
use std::time::Duration;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use network::{ChatClient, ClientOptions};
use tokio::sync::mpsc;
use ui::{ChatApp, RenderStrategy};

use crate::common::{NetworkCommand, NetworkEvent};
use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "rust_ws_chat", version, about = "WebSocket chat client")]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Chat page URL; the socket connects to its host at /websocket
    #[arg(long, value_name = "URL")]
    url: Option<String>,
    /// Row layout: table or paragraph
    #[arg(long, value_name = "STRATEGY")]
    render: Option<RenderStrategy>,
    /// Do not stamp outgoing messages with the local time
    #[arg(long)]
    no_time: bool,
    /// Prefill the username field
    #[arg(long)]
    username: Option<String>,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Open the chat window (default)
    Run,
    /// Print incoming messages to stdout without a window
    Tail,
    /// Write a default config file to --config
    InitConfig,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.url {
            config.page_url = url.clone();
        }
        if let Some(render) = self.render {
            config.render = render;
        }
        if self.no_time {
            config.include_time = false;
        }
        if let Some(username) = &self.username {
            config.username = Some(username.clone());
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    // Khởi tạo Logger để debug
    env_logger::init();
    // wss:// needs a process-wide rustls provider.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();

    if cli.mode == Some(Mode::InitConfig) {
        config::save_config(&cli.config, &AppConfig::default())?;
        log::info!("Wrote default config to {}", cli.config);
        return Ok(());
    }

    let mut app_config = config::load_config(&cli.config);
    app_config.apply_env();
    cli.apply(&mut app_config);

    let options = app_config.client_options()?;
    log::info!("Chat socket: {}", options.url);

    match cli.mode {
        Some(Mode::Tail) => run_tail(options, app_config.render).await,
        _ => run_full_client(options, app_config).await,
    }
}

fn spawn_client(
    options: ClientOptions,
) -> (
    mpsc::Sender<NetworkCommand>,
    mpsc::Receiver<NetworkEvent>,
    tokio::task::JoinHandle<()>,
) {
    // 1. Tạo các kênh giao tiếp (Channels)
    // UI -> Network
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // Network -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    // 2. Khởi chạy Network Task (chạy ngầm)
    let client = ChatClient::new(event_tx, cmd_rx, options);
    (cmd_tx, event_rx, tokio::spawn(client.run()))
}

async fn run_full_client(options: ClientOptions, config: AppConfig) -> Result<(), Box<dyn Error>> {
    let (cmd_tx, event_rx, client_task) = spawn_client(options);

    // 3. Khởi chạy UI (chạy trên main thread)
    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Chat",
        native_options,
        Box::new(move |cc| Ok(Box::new(ChatApp::new(cc, &config, cmd_tx, event_rx)))),
    )?;

    // The window owned the command sender; the client is disposing now.
    if tokio::time::timeout(Duration::from_secs(2), client_task)
        .await
        .is_err()
    {
        log::warn!("Network client did not stop in time");
    }
    Ok(())
}

async fn run_tail(options: ClientOptions, render: RenderStrategy) -> Result<(), Box<dyn Error>> {
    let (cmd_tx, mut event_rx, client_task) = spawn_client(options);

    loop {
        tokio::select! {
            event = event_rx.recv() => match event {
                Some(NetworkEvent::MessageReceived(message)) => {
                    println!("{}", render.render(message).line());
                }
                Some(NetworkEvent::Disposed) | None => break,
                Some(event) => log::info!("{event:?}"),
            },
            _ = tokio::signal::ctrl_c() => {
                log::info!("Interrupted, disposing client");
                if let Err(err) = cmd_tx.send(NetworkCommand::Dispose).await {
                    log::warn!("Failed to send dispose command: {err}");
                    break;
                }
            }
        }
    }

    client_task.await?;
    Ok(())
}
