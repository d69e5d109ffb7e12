use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use folio::server::{self, ServeState};
use folio::store::TextEncoding;

#[derive(Parser)]
#[command(name = "folio-serve", version, about = "File-backed store for the folio editor")]
struct Args {
    /// Path to the text file to serve (first save picks one from the
    /// document title when omitted)
    path: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Encoding used to read and write the file
    #[arg(short, long, default_value = "utf-8")]
    encoding: TextEncoding,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let dir = std::env::current_dir().context("cannot resolve working directory")?;
    let state = ServeState::new(args.path, dir, args.encoding);
    let app = server::router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
            anyhow::bail!("{addr} is already in use; pick another port with --port");
        }
        Err(err) => return Err(err).context(format!("cannot bind {addr}")),
    };

    tracing::info!("encoding: {:?}", args.encoding);
    tracing::info!("serving at http://{addr}");

    axum::serve(listener, app).await.context("server error")
}
