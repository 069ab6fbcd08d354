use chrono::Utc;
use clap::Parser;
use raft_node::{ClusterConfig, MemberInfo, NodeConfig, NodeOptions, ServerId};
use slog::Drain;
use std::error::Error;
use std::fs::{self, OpenOptions};
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "raft-node", version, about = "A Raft leader-election node")]
struct Cli {
    /// This server's position in `--members`.
    #[arg(long)]
    id: usize,

    /// Directory for this server's persisted state.
    #[arg(long, default_value = "raft-data")]
    data_dir: PathBuf,

    /// Comma separated `server_addr/client_addr` pairs, in server id order.
    #[arg(long, value_delimiter = ',', value_parser = parse_member, required = true)]
    members: Vec<MemberInfo>,

    /// Election timeout base in milliseconds. Timeouts are drawn from [base, 2 * base].
    #[arg(long)]
    election_timeout_ms: Option<u64>,

    /// Also write logs to a timestamped file under this directory.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn parse_member(value: &str) -> Result<MemberInfo, String> {
    let (server_addr, client_addr) = value
        .split_once('/')
        .ok_or_else(|| format!("Expected 'server_addr/client_addr', got '{}'", value))?;

    Ok(MemberInfo {
        server_addr: parse_addr(server_addr)?,
        client_addr: parse_addr(client_addr)?,
    })
}

fn parse_addr(value: &str) -> Result<SocketAddr, String> {
    value
        .parse()
        .map_err(|e| format!("Invalid address '{}': {}", value, e))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let server_id = cli.id.to_string();

    let logger = match &cli.log_dir {
        Some(log_dir) => create_root_logger_for_file(log_dir, &server_id)?,
        None => create_root_logger_for_stdout(&server_id),
    };

    let config = NodeConfig {
        my_server_id: ServerId::new(cli.id),
        cluster: ClusterConfig { members: cli.members },
        data_directory: cli.data_dir,
        logger: logger.clone(),
        options: NodeOptions {
            election_timeout_base: cli.election_timeout_ms.map(Duration::from_millis),
            ..NodeOptions::default()
        },
    };

    let node = raft_node::try_create_grpc_node(config).await?;
    slog::info!(logger, "Server {} started as {:?}", server_id, node.current());

    tokio::signal::ctrl_c().await?;
    slog::info!(logger, "Server {} crashes", server_id);
    node.shutdown().await;

    Ok(())
}

fn create_root_logger_for_file(directory: &Path, server_id: &str) -> io::Result<slog::Logger> {
    let now = Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    let directory = directory.join(format!("info_log_{}", server_id));
    fs::create_dir_all(&directory)?;
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(directory.join(format!("{}_info.log", now)))?;

    let decorator = slog_term::PlainDecorator::new(file);
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    Ok(slog::Logger::root(drain, slog::o!("ServerId" => server_id.to_string())))
}

fn create_root_logger_for_stdout(server_id: &str) -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).use_file_location().build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    slog::Logger::root(drain, slog::o!("ServerId" => server_id.to_string()))
}
