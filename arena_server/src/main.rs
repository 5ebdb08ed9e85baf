#[tokio::main]
async fn main() {
    // Delegate to the server framework entry point; failures are logged there.
    if arena_server::run_with_config().await.is_err() {
        std::process::exit(1);
    }
}
