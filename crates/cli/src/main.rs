use anyhow::Context;
use bookshelf_kernel::settings::Settings;
use clap::{Parser, Subcommand};

/// Bookshelf service command line
#[derive(Debug, Parser)]
#[command(name = "bookshelf-cli", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Override `server.host`
        #[arg(long)]
        host: Option<String>,
        /// Override `server.port`
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the effective settings as JSON, secrets redacted
    Settings,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load Bookshelf settings")?;

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }

            bookshelf_telemetry::init(&settings.telemetry);
            tracing::info!(env = ?settings.environment, "bookshelf-cli serve");

            tokio::runtime::Runtime::new()
                .context("failed to start tokio runtime")?
                .block_on(bookshelf_app::run(settings))
        }
        Command::Settings => {
            let rendered = serde_json::to_string_pretty(&settings.redacted())
                .context("failed to render settings")?;
            println!("{rendered}");
            Ok(())
        }
    }
}
