use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use clap::Parser;
use meeting_notes::{
    ollama::OllamaClient, server::define_routes, tracing::init_tracing_subscriber,
    MeetingAnalyzerBuilder,
};

#[derive(Parser)]
#[command(
    name = "meeting-notes",
    about = "Meeting transcript analyzer backed by a local Ollama runtime"
)]
struct Cli {
    /// Base URL of the Ollama runtime; a bare `host[:port]` means plain HTTP
    #[arg(long, env = "OLLAMA_HOST", default_value = OllamaClient::DEFAULT_BASE_URL)]
    ollama_url: String,

    /// Model used for every analysis
    #[arg(long, env = "OLLAMA_MODEL", default_value = "llama3.2")]
    model: String,

    /// Address to bind the HTTP server to
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    #[arg(long, env = "PORT", default_value = "5000")]
    port: u16,

    /// Sampling temperature sent with each chat request
    #[arg(long, default_value = "0.1")]
    temperature: f32,

    /// Nucleus sampling cutoff sent with each chat request
    #[arg(long, default_value = "0.9")]
    top_p: f32,

    /// Timeout for a single request to the runtime, in seconds
    #[arg(long, default_value = "300")]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let client = OllamaClient::new(&cli.model)
        .with_base_url(&cli.ollama_url)
        .context("Invalid --ollama-url / OLLAMA_HOST")?
        .with_timeout(Duration::from_secs(cli.timeout_secs))
        .context("Failed to build Ollama client")?;

    let client_url = client.base_url().to_string();
    let analyzer = MeetingAnalyzerBuilder::new()
        .model(client)
        .temperature(cli.temperature)
        .top_p(cli.top_p)
        .build();

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", cli.host, cli.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .inspect_err(|e| tracing::error!(error = %e, %addr, "Failed to bind listener"))
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(
        %addr,
        model = %cli.model,
        ollama_url = %client_url,
        "Serving meeting notes API"
    );

    axum::serve(listener, define_routes(analyzer))
        .await
        .context("HTTP server exited with an error")?;

    Ok(())
}
