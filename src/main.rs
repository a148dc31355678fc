use clap::Parser;
use smartsociety_admin::cli::Cli;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up SERVICE_ACCOUNT_PATH, ADMIN_EMAIL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = smartsociety_admin::cli::run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(e.exit_code());
    }
}
