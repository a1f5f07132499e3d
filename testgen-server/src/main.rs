use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use testgen_server::agent::{split_args, DEFAULT_AGENT_ARGS, DEFAULT_AGENT_PROGRAM, DEFAULT_MAX_BUFFER};
use testgen_server::{build_router, AgentConfig, AppState};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "testgen-server", version, about = "Agent-backed test generation service")]
struct Cli {
    /// Socket address to bind, e.g. 127.0.0.1:3000 (default: 0.0.0.0:$PORT or 0.0.0.0:3000)
    #[arg(long)]
    listen: Option<SocketAddr>,
    /// Port used when --listen is not given
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,
    /// Coding agent executable.
    #[arg(long, env = "TESTGEN_AGENT_BIN", default_value = DEFAULT_AGENT_PROGRAM)]
    agent: String,
    /// Whitespace-separated arguments passed before the prompt.
    #[arg(long, env = "TESTGEN_AGENT_ARGS", default_value = DEFAULT_AGENT_ARGS)]
    agent_args: String,
    /// Agent timeout in seconds.
    #[arg(long, default_value_t = 120)]
    agent_timeout: u64,
    /// Max agent output in bytes.
    #[arg(long, env = "TESTGEN_AGENT_MAX_BUFFER", default_value_t = DEFAULT_MAX_BUFFER)]
    max_buffer: usize,
    /// Parent directory for per-request scratch workspaces (default: system temp dir)
    #[arg(long)]
    scratch_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "testgen_server=info,info".to_string()),
        )
        .init();

    let cli = Cli::parse();
    let config = AgentConfig {
        program: cli.agent,
        args: split_args(&cli.agent_args),
        timeout: Duration::from_secs(cli.agent_timeout),
        max_buffer: cli.max_buffer,
        scratch_root: cli.scratch_dir.unwrap_or_else(std::env::temp_dir),
    };
    info!(agent = %config.program, "agent configured");

    let app = build_router(AppState::new(config));
    let addr = cli
        .listen
        .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], cli.port)));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("testgen-server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
