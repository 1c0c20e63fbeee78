#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vitae_server::run().await
}
