#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = livefft::app::run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
