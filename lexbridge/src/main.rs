use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use args::Args;
use clap::Parser;
use config::{Config, Transport};
use server::ServeConfig;
use tokio_util::sync::CancellationToken;

mod args;
mod logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init(&args);

    let config = args.config()?;

    let result = match args.transport(&config) {
        Transport::Stdio => server::serve_stdio(config).await,
        Transport::StreamableHttp => {
            let shutdown = CancellationToken::new();
            tokio::spawn(cancel_on_ctrl_c(shutdown.clone()));

            server::serve(serve_config(&args, config, shutdown)).await
        }
    };

    if let Err(e) = result {
        log::error!("Server failed: {e}");
        std::process::exit(1);
    }

    Ok(())
}

fn serve_config(args: &Args, config: Config, shutdown: CancellationToken) -> ServeConfig {
    let listen_address = args
        .listen_address
        .or(config.server.listen_address)
        .unwrap_or(SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 8000)));

    ServeConfig {
        listen_address,
        config,
        shutdown,
    }
}

async fn cancel_on_ctrl_c(shutdown: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            log::info!("Shutting down");
            shutdown.cancel();
        }
        Err(e) => log::warn!("Cannot listen for the shutdown signal: {e}"),
    }
}
