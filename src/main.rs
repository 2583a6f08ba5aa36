use openhub::*;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use tokio::runtime::Runtime;

fn main() -> Result<()> {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    // 根据 verbose 标志设置日志级别
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .init();

    // reqwest 使用 rustls-no-provider，需要在创建客户端前安装 crypto provider
    let _ = rustls::crypto::ring::default_provider().install_default();

    let mut config = match config::load_config_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            if let Some(hint) = e.suggestion() {
                eprintln!("{}", hint);
            }
            return Err(e).context("Failed to load configuration");
        }
    };

    match cli.command() {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let state = api::AppState::from_config(config)?;
            let rt = Runtime::new()?;
            rt.block_on(api::serve(state))?;
            Ok(())
        }
        Commands::Config => {
            let rendered =
                toml::to_string_pretty(&config).context("Failed to render configuration")?;
            println!("{}", rendered);
            Ok(())
        }
    }
}
