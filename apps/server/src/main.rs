use manifold_logger::Logging;
use manifold_server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log = Logging::builder().name(env!("CARGO_PKG_NAME")).init()?;

    Server::builder().build()?.run().await
}
