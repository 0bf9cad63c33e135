// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod config;
mod network;
mod server;
mod status;

use clap::{Parser, Subcommand};
use log::{info, warn};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use config::AppConfig;
use network::ApiClient;
use nexus_feed::{ChatSession, EventBus, NexusEvent, Poller, PollerConfig};
use status::Dashboard;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser, Debug)]
#[command(name = "digital-nexus", version, about = "Simulated live-status API and terminal consumer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the API server (default)
    Serve {
        /// Address to bind, overrides the config file
        #[arg(long)]
        bind: Option<String>,
    },
    /// Poll the status and pulse feeds and print a live dashboard
    Watch {
        /// Base URL of the API server, overrides the config file
        #[arg(long)]
        server: Option<String>,
        /// Print one dashboard once both feeds have settled, then exit
        #[arg(long)]
        once: bool,
    },
    /// Send one message to the chat responder
    Chat {
        /// Base URL of the API server, overrides the config file
        #[arg(long)]
        server: Option<String>,
        /// Message text
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Show the config file location
    Config {
        /// Overwrite the config file with defaults
        #[arg(long)]
        reset: bool,
    },
}

/// Cancel the token on Ctrl-C
fn cancel_on_ctrl_c(cancel_token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received");
        }
        cancel_token.cancel();
    });
}

async fn run_serve(config: &AppConfig, bind: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let bind_address = bind.unwrap_or_else(|| config.bind_address.clone());
    let cancel_token = CancellationToken::new();
    cancel_on_ctrl_c(cancel_token.clone());

    server::serve(&bind_address, server::AppState::from_config(config), cancel_token).await?;
    Ok(())
}

async fn run_watch(
    config: &AppConfig,
    server: Option<String>,
    once: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let base_url = server.unwrap_or_else(|| config.server_url.clone());
    let api = ApiClient::new(&base_url, config.request_timeout())?;
    info!("Watching {}", api.base_url());

    let mut status_poller = Poller::spawn(
        api.status_feed(),
        PollerConfig::new("system-status", config.status_poll_interval()),
    );
    let mut pulse_poller = Poller::spawn(
        api.pulse_feed(),
        PollerConfig::new("market-pulse", config.pulse_poll_interval()),
    );

    let cancel_token = CancellationToken::new();
    cancel_on_ctrl_c(cancel_token.clone());
    let mut dashboard = Dashboard::new();

    loop {
        tokio::select! {
            () = cancel_token.cancelled() => break,
            alive = status_poller.changed() => {
                if !alive { break; }
                dashboard.observe_status(&status_poller.view());
            }
            alive = pulse_poller.changed() => {
                if !alive { break; }
            }
        }

        let status_view = status_poller.view();
        let pulse_view = pulse_poller.view();
        if once {
            if !status_view.loading && !pulse_view.loading {
                println!("{}", dashboard.render(&status_view, &pulse_view));
                break;
            }
        } else {
            println!("{}", dashboard.render(&status_view, &pulse_view));
        }
    }

    status_poller.shutdown();
    pulse_poller.shutdown();
    Ok(())
}

async fn run_chat(
    config: &AppConfig,
    server: Option<String>,
    message: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let base_url = server.unwrap_or_else(|| config.server_url.clone());
    let api = ApiClient::new(&base_url, config.request_timeout())?;

    let session_id = Uuid::new_v4();
    info!("Chat session {} against {}", session_id, api.base_url());

    let events = EventBus::default();
    let mut event_rx = events.subscribe();
    let mut session = ChatSession::new(api.chat(), events);

    if let Some(reply) = session.send(&message.join(" ")).await {
        println!("{}", reply.content);
    }

    while let Ok(event) = event_rx.try_recv() {
        match event {
            NexusEvent::HighlightProject { project_id } => {
                println!("-> highlight project #{project_id}");
            }
            NexusEvent::ReportRequested => println!("-> report requested"),
            NexusEvent::SafeModeToggled => println!("-> safe mode toggled"),
        }
    }
    Ok(())
}

fn run_config(reset: bool) -> Result<(), Box<dyn std::error::Error>> {
    if reset {
        AppConfig::default().save()?;
        info!("Configuration reset to defaults");
    }
    println!("{}", AppConfig::get_config_path()?.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!("Could not load configuration, using defaults: {}", e);
        AppConfig::default()
    });

    match cli.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { bind } => run_serve(&config, bind).await,
        Command::Watch { server, once } => run_watch(&config, server, once).await,
        Command::Chat { server, message } => run_chat(&config, server, &message).await,
        Command::Config { reset } => run_config(reset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_is_default() {
        let cli = Cli::try_parse_from(["digital-nexus"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_chat_requires_message() {
        assert!(Cli::try_parse_from(["digital-nexus", "chat"]).is_err());

        let cli = Cli::try_parse_from(["digital-nexus", "chat", "tell", "me", "about", "isdn"]).unwrap();
        match cli.command {
            Some(Command::Chat { message, server }) => {
                assert_eq!(message.join(" "), "tell me about isdn");
                assert!(server.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_watch_flags() {
        let cli = Cli::try_parse_from(["digital-nexus", "watch", "--server", "http://h:1", "--once"]).unwrap();
        match cli.command {
            Some(Command::Watch { server, once }) => {
                assert_eq!(server.as_deref(), Some("http://h:1"));
                assert!(once);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
