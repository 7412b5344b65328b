//! # fairwork server binary
//!
//! Parses command-line arguments, assembles the marketplace, juror pool,
//! and arbitration provider chain, then serves the HTTP API.
//!
//! Provider API keys come from the environment
//! (`FAIRWORK_FASTROUTER_API_KEY`, `FAIRWORK_OPENAI_API_KEY`); everything
//! else is a flag. Providers without a key are skipped, and with no keys at
//! all the server still runs, answering 503 on the analyze route only.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fairwork_api::state::AppState;
use fairwork_arbiter::{ArbitrationRouter, ProviderConfig};
use fairwork_core::Address;
use fairwork_engine::{FixedPool, Marketplace};

/// FairWork — escrowed freelance marketplace lifecycle engine.
#[derive(Parser, Debug)]
#[command(name = "fairwork", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API.
    Serve(ServeArgs),
}

#[derive(clap::Args, Debug)]
struct ServeArgs {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// Juror pool member wallet address. Repeat for each member; at least
    /// three are required.
    #[arg(long = "juror", required = true)]
    jurors: Vec<String>,

    /// Primary provider (multi-model router) model.
    #[arg(long, default_value = "anthropic/claude-sonnet-4")]
    fastrouter_model: String,

    /// Primary provider base URL.
    #[arg(long, default_value = "https://go.fastrouter.ai/api/v1")]
    fastrouter_base_url: String,

    /// Primary provider API key.
    #[arg(long, env = "FAIRWORK_FASTROUTER_API_KEY", hide_env_values = true)]
    fastrouter_api_key: Option<String>,

    /// Fallback provider model.
    #[arg(long, default_value = "gpt-4o")]
    openai_model: String,

    /// Fallback provider base URL.
    #[arg(long, default_value = "https://api.openai.com/v1")]
    openai_base_url: String,

    /// Fallback provider API key.
    #[arg(long, env = "FAIRWORK_OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    /// Per-provider request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    provider_timeout_secs: u64,
}

impl ServeArgs {
    /// The ordered provider chain: the multi-model router first, the
    /// direct provider as fallback. Providers without an API key are
    /// dropped.
    fn provider_configs(&self) -> Vec<ProviderConfig> {
        let mut configs = Vec::new();
        if let Some(key) = &self.fastrouter_api_key {
            configs.push(
                ProviderConfig::new(
                    "fastrouter",
                    &self.fastrouter_base_url,
                    key,
                    &self.fastrouter_model,
                )
                .with_timeout_secs(self.provider_timeout_secs),
            );
        }
        if let Some(key) = &self.openai_api_key {
            configs.push(
                ProviderConfig::new("openai", &self.openai_base_url, key, &self.openai_model)
                    .with_timeout_secs(self.provider_timeout_secs),
            );
        }
        configs
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve(args) => serve(args),
    }
}

#[tokio::main]
async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let jurors = args
        .jurors
        .iter()
        .map(|a| Address::new(a).map_err(anyhow::Error::from))
        .collect::<anyhow::Result<Vec<_>>>()
        .context("invalid juror address")?;
    let pool = FixedPool::new(jurors).context("invalid juror pool")?;

    let configs = args.provider_configs();
    let arbiter = if configs.is_empty() {
        tracing::warn!(
            "no arbitration provider API keys configured; the analyze route will return 503"
        );
        None
    } else {
        let names: Vec<&str> = configs.iter().map(|c| c.name.as_str()).collect();
        tracing::info!(providers = ?names, "arbitration provider chain configured");
        Some(Arc::new(
            ArbitrationRouter::new(configs).context("building arbitration router")?,
        ))
    };

    let state = AppState::new(Arc::new(Marketplace::new()), arbiter, Arc::new(pool));
    let app = fairwork_api::app(state);

    tracing::info!("FairWork API listening on {}", args.bind);
    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("binding {}", args.bind))?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn juror_args() -> [String; 6] {
        [
            "--juror".into(),
            format!("0x{:0>40}", "a1"),
            "--juror".into(),
            format!("0x{:0>40}", "a2"),
            "--juror".into(),
            format!("0x{:0>40}", "a3"),
        ]
    }

    fn parse_serve(extra: &[&str]) -> ServeArgs {
        let mut argv: Vec<String> = vec!["fairwork".into(), "serve".into()];
        argv.extend(juror_args());
        argv.extend(extra.iter().map(|s| s.to_string()));
        let cli = Cli::try_parse_from(argv).unwrap();
        let Commands::Serve(args) = cli.command;
        args
    }

    #[test]
    fn serve_requires_jurors() {
        let result = Cli::try_parse_from(["fairwork", "serve"]);
        assert!(result.is_err());
    }

    #[test]
    fn default_bind_and_timeout() {
        let args = parse_serve(&[]);
        assert_eq!(args.bind, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(args.provider_timeout_secs, 30);
        assert_eq!(args.jurors.len(), 3);
    }

    #[test]
    fn providers_without_keys_are_skipped() {
        let args = parse_serve(&[]);
        // keys unset unless the env vars leak into the test
        if args.openai_api_key.is_none() && args.fastrouter_api_key.is_none() {
            assert!(args.provider_configs().is_empty());
        }
    }

    #[test]
    fn provider_order_is_router_then_direct_fallback() {
        let mut args = parse_serve(&["--openai-model", "gpt-4o-mini"]);
        args.fastrouter_api_key = Some("k1".into());
        args.openai_api_key = Some("k2".into());
        let configs = args.provider_configs();
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].name, "fastrouter");
        assert_eq!(configs[1].name, "openai");
        assert_eq!(configs[1].model, "gpt-4o-mini");
    }

    #[test]
    fn fallback_alone_still_forms_a_chain() {
        let mut args = parse_serve(&[]);
        args.fastrouter_api_key = None;
        args.openai_api_key = Some("k2".into());
        let configs = args.provider_configs();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].name, "openai");
    }

    #[test]
    fn verbose_levels_parse() {
        let mut argv: Vec<String> = vec!["fairwork".into(), "-vv".into(), "serve".into()];
        argv.extend(juror_args());
        let cli = Cli::try_parse_from(argv).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
