use anyhow::Context;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use newsclass_demo::cli::{render_prediction, Cli, Commands};
use newsclass_demo::server::run_server;
use newsclass_demo::state::{AppState, LogoAsset};
use newsclass_features::{load_artifacts, ClassifyOutcome, NewsClassConfig, SharedArtifacts};
use std::io::Read;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            address,
            port,
            logo,
            verbose,
        } => {
            init_logging(verbose, "info");

            let mut config = NewsClassConfig::load_or_default(&config)?;
            if let Some(logo) = logo {
                config.assets.logo = logo;
            }

            let addr: SocketAddr = format!("{}:{}", address, port).parse()?;
            let metrics = init_metrics()?;

            // Nothing is served until both artifacts are in memory
            let artifacts = SharedArtifacts::new();
            let classifier = artifacts
                .get_or_load(&config)
                .await
                .context("Failed to load model artifacts")?;

            let logo = LogoAsset::load(&config.assets.logo);
            let state = AppState::new(classifier, logo).with_metrics(metrics);

            println!();
            println!("  BBC News Classifier");
            println!("  Categories: Business, Entertainment, Politics, Sport, Tech");
            println!();
            println!("  Open http://{} in your browser", addr);
            println!();

            run_server(state, addr).await?;
        }

        Commands::Classify {
            text,
            config,
            show_tokens,
            verbose,
        } => {
            init_logging(verbose, "warn");

            let text = match text {
                Some(text) => text,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buffer)
                        .context("Failed to read article from stdin")?;
                    buffer
                }
            };

            let config = NewsClassConfig::load_or_default(&config)?;
            let classifier = tokio::task::spawn_blocking(move || load_artifacts(&config))
                .await?
                .context("Failed to load model artifacts")?;

            match classifier.classify(&text).await? {
                ClassifyOutcome::EmptyInput => {
                    eprintln!("{}", newsclass_features::EMPTY_INPUT_WARNING);
                }
                ClassifyOutcome::Predicted { prediction, tokens } => {
                    print!("{}", render_prediction(&prediction, &tokens, show_tokens));
                }
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, default_level: &str) {
    let filter = if verbose {
        "newsclass=debug,newsclass_demo=debug,newsclass_features=debug,tower_http=debug".to_string()
    } else {
        format!(
            "newsclass={lvl},newsclass_demo={lvl},newsclass_features={lvl},tower_http=warn",
            lvl = default_level
        )
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "newsclass_requests_total",
        "Classification requests by outcome"
    );
    metrics::describe_counter!(
        "newsclass_predictions_total",
        "Predicted categories by label"
    );
    metrics::describe_histogram!(
        "newsclass_classify_latency_us",
        metrics::Unit::Microseconds,
        "End-to-end classification latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
