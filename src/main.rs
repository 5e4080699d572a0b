use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rechart::{config::Config, payload::Processed, routes::create_router, AppState, Reconciler};

#[derive(Parser, Debug)]
#[command(name = "rechart")]
#[command(about = "Turn CSV data and descriptions into chart and diagram payloads")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API (default)
    Serve,

    /// Process CSV or free text into a chart payload
    ProcessData {
        #[arg(long, help = "bar, line, pie, area, scatter or trend")]
        chart_type: String,

        #[arg(long, help = "Treat the input as CSV")]
        csv: bool,

        #[arg(long, help = "Read input from this file instead of stdin")]
        file: Option<PathBuf>,
    },

    /// Process a description into Mermaid diagram code
    ProcessDiagram {
        #[arg(long)]
        diagram_type: String,

        #[arg(long, help = "Diagram description; read from stdin when omitted")]
        description: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so CLI output stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rechart=debug,tower_http=debug,axum=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::ProcessData {
            chart_type,
            csv,
            file,
        } => {
            let data = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => read_stdin()?,
            };
            let reconciler = Reconciler::from_config(&config.llm)?;
            let result = reconciler.process_data(&data, &chart_type, csv).await;
            print_processed(result.payload)
        }
        Command::ProcessDiagram {
            diagram_type,
            description,
        } => {
            let description = match description {
                Some(d) => d,
                None => read_stdin()?,
            };
            let reconciler = Reconciler::from_config(&config.llm)?;
            let result = reconciler.process_diagram(&description, &diagram_type).await;
            print_processed(result.payload)
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Configuration loaded: {:?}", config.server);

    let pool = rechart::db::create_pool(&config.database).await?;
    let reconciler = Reconciler::from_config(&config.llm)?;
    info!(
        xai_configured = reconciler.is_configured(),
        models = ?reconciler.models(),
        "Reconciler ready"
    );

    let state = AppState {
        pool,
        config: config.clone(),
        reconciler: Arc::new(reconciler),
    };
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

fn read_stdin() -> anyhow::Result<String> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

fn print_processed<T: Serialize>(payload: T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&Processed::new(payload))?);
    Ok(())
}
