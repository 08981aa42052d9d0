//! Thin entrypoint for the `assetshift` binary.

#[tokio::main]
async fn main() {
    std::process::exit(assetshift_cli::run().await);
}
