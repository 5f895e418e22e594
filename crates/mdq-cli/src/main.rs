use mdq_core::logging;

mod cli;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible.
    logging::init();

    if let Err(err) = cli::run().await {
        eprintln!("mdq error: {:#}", err);
        std::process::exit(1);
    }
}
