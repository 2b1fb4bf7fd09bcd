use clap::Parser;
use harmonet_api::RestApi;
use harmonet_core::FilterConfig;
use harmonet_data::{
    BackendClients, DataPaths, GraphService, LayoutClient, PredictionClient, SankeyClient,
    ServiceConfig,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Filtering and aggregation engine for a music influence network
#[derive(Parser, Debug)]
#[command(name = "harmonet")]
#[command(about = "Music influence graph engine", long_about = None)]
struct Args {
    /// Directory holding graph_by_year.json and filter_options.json
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// HTTP API port
    #[arg(long, default_value_t = 7400)]
    http_port: u16,

    /// Entity the initial view centers on
    #[arg(long, default_value = "Sailor Shift")]
    default_center: String,

    /// Layout backend endpoint (omit to disable layout fetches)
    #[arg(long)]
    layout_url: Option<String>,

    /// Prediction backend endpoint
    #[arg(long)]
    predict_url: Option<String>,

    /// Sankey backend endpoint
    #[arg(long)]
    sankey_url: Option<String>,

    /// Trailing-edge delay for time-range changes, in milliseconds
    #[arg(long, default_value_t = 300)]
    debounce_ms: u64,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting harmonet v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);
    info!("HTTP API port: {}", args.http_port);

    let paths = DataPaths {
        yearly: args.data_dir.join("graph_by_year.json"),
        options: args.data_dir.join("filter_options.json"),
    };
    let config = ServiceConfig {
        filter: FilterConfig {
            default_center: Some(args.default_center),
        },
        debounce_delay: Duration::from_millis(args.debounce_ms),
    };
    let clients = BackendClients {
        layout: args.layout_url.map(LayoutClient::new),
        prediction: args.predict_url.map(PredictionClient::new),
        sankey: args.sankey_url.map(SankeyClient::new),
    };

    let service = GraphService::init(paths, config, clients).await?;
    info!("Graph service initialized");

    info!("HTTP API: http://localhost:{}/", args.http_port);
    RestApi::start(service, args.http_port).await?;

    info!("Shutting down...");
    Ok(())
}
