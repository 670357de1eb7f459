//! SealKV server binary.

use clap::Parser;
use sealkv_core::{Database, DbOptions};
use sealkv_server::{KvServer, ServerConfig, ServerResult};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// SealKV key-value server.
#[derive(Parser)]
#[command(name = "sealkv-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:3322")]
    addr: SocketAddr,

    /// Database root directory
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Maximum concurrent write transactions
    #[arg(long, default_value_t = 128)]
    pool_size: usize,

    /// Preallocate the transaction pool at startup
    #[arg(long)]
    preallocated: bool,

    /// Open the database as a read-only replica
    #[arg(long)]
    replica: bool,

    /// Maximum concurrent connections
    #[arg(long, default_value_t = 1000)]
    max_connections: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ServerResult<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let options = DbOptions::default()
        .with_db_root_path(cli.data_dir)
        .with_pool_size(cli.pool_size)
        .with_preallocated(cli.preallocated)
        .as_replica(cli.replica);
    let db = Arc::new(Database::open(options)?);

    let config = ServerConfig::new(cli.addr).with_max_connections(cli.max_connections);
    let server = KvServer::new(config, db);
    server.serve().await
}
