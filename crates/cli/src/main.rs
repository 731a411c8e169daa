use anyhow::Context;
use clap::{Parser, Subcommand};
use owl_kernel::settings::Settings;

/// Owl Bookstore catalog service
#[derive(Debug, Parser)]
#[command(name = "owl", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Address to bind, overriding `server.host`
        #[arg(long)]
        host: Option<String>,
        /// Port to bind, overriding `server.port`
        #[arg(long, short)]
        port: Option<u16>,
    },
    /// Print the OpenAPI document as JSON and exit
    Openapi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load settings")?;

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }

            owl_telemetry::init(&settings.telemetry)?;
            tracing::info!(
                env = ?settings.environment,
                address = %settings.server.bind_address(),
                "owl serve"
            );
            owl_app::run(settings).await
        }
        Command::Openapi => {
            let registry = owl_app::registry()?;
            let document = owl_http::router::openapi_document(&registry);
            let rendered = serde_json::to_string_pretty(&document)
                .context("failed to render OpenAPI document")?;
            println!("{rendered}");
            Ok(())
        }
    }
}
