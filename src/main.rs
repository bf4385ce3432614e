//! Marketplace Backend - binary entry point
//! Delegates to the library for all app logic.

#[tokio::main]
async fn main() {
    if let Err(e) = marketplace_backend::run().await {
        eprintln!("marketplace-backend: {e}");
        std::process::exit(1);
    }
}
