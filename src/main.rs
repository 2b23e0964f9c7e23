//! descgen CLI binary

use anyhow::Result;

use descgen::cli::CliApp;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so rendered output on stdout stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "descgen=info".into()),
        )
        .init();

    // Parse command line arguments
    let matches = CliApp::app().get_matches();

    // Run the CLI application
    CliApp::run(&matches).await
}
