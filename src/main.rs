//! # Terms Guardian Main Driver
//!
//! ## Purpose
//! Main entry point for the analysis server. Orchestrates initialization of
//! all system components and starts the web server for handling analysis
//! requests from the extraction/presentation layer.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files, command line arguments, environment
//!   variables
//! - **Output**: Running web server with analysis API endpoints
//! - **Initialization**: Loads dictionary corpora, wires the pipeline,
//!   health checks
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Build the analyzer (detector, grader, assessor, identifier,
//!    dictionary service)
//! 4. Start web API server
//! 5. Handle shutdown signals gracefully

use clap::{Arg, Command};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use terms_guardian::{
    api::ApiServer,
    config::Config,
    errors::{AnalysisError, Result},
    summarizer::Summarizer,
    vocabulary, Analyzer, AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let matches = Command::new("terms-guardian-server")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Terms Guardian Team")
        .about("Legal document analysis engine: readability, rights and uncommon-term assessment")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Server port")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("check-health")
                .long("check-health")
                .help("Run health checks and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Load configuration
    let config_path = matches.get_one::<String>("config").expect("has default");
    let mut config = Config::from_file(config_path)?;

    // Override port if specified
    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }

    let config = Arc::new(config);

    // Initialize logging
    init_logging(&config)?;

    info!("Starting Terms Guardian v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from: {}", config_path);

    // Run health checks if requested
    if matches.get_flag("check-health") {
        return run_health_checks(&config).await;
    }

    // Initialize application components
    let app_state = initialize_components(config.clone()).await?;

    // Start the API server
    let server = ApiServer::new(app_state).await?;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            error!("Server error: {}", e);
        }
    });

    info!(
        "Terms Guardian started successfully on {}:{}",
        config.server.host, config.server.port
    );

    // Wait for shutdown signal
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = server_handle => {
            warn!("Server stopped unexpectedly");
        }
    }

    info!("Terms Guardian shut down successfully");
    Ok(())
}

/// Initialize logging and tracing
fn init_logging(config: &Config) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    if config.logging.json_format {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }

    info!("Logging initialized with level: {}", config.logging.level);
    Ok(())
}

/// Initialize all application components
async fn initialize_components(config: Arc<Config>) -> Result<AppState> {
    info!("Initializing application components...");

    info!("Initializing analyzer pipeline...");
    let analyzer = Arc::new(Analyzer::new(config.clone()).await?);

    let summarizer = Arc::new(Summarizer::new(vocabulary::default_legal_terms())?);

    let dictionary_stats = analyzer.dictionary().stats();
    info!(
        courts_entries = dictionary_stats.courts_glossary_entries,
        dictionary_entries = dictionary_stats.legal_dictionary_entries,
        "Dictionary service ready"
    );

    info!("All components initialized successfully");
    Ok(AppState {
        config,
        analyzer,
        summarizer,
    })
}

/// Run startup health checks
async fn run_health_checks(config: &Config) -> Result<()> {
    info!("Running health checks...");

    info!("✓ Configuration is valid");

    // Corpora are optional, but their absence is worth surfacing here.
    for path in [
        &config.dictionary.courts_glossary_path,
        &config.dictionary.legal_dictionary_path,
    ] {
        if path.exists() {
            info!("✓ Corpus present: {:?}", path);
        } else {
            warn!("Corpus missing (service degrades to static tables): {:?}", path);
        }
    }

    // Exercise the full pipeline once against a known legal fixture.
    let analyzer = Analyzer::new(Arc::new(config.clone())).await?;
    let fixture = terms_guardian::Document::new(
        "These terms of service include warranty, liability and indemnity provisions. \
         Our privacy policy and cookie policy describe data protection practices. \
         The agreement covers arbitration, termination and intellectual property.",
    );
    match analyzer
        .analyze(fixture, terms_guardian::Trigger::Manual)
        .await?
    {
        terms_guardian::AnalysisOutcome::Completed(_) => {
            info!("✓ Analysis pipeline is healthy");
        }
        other => {
            return Err(AnalysisError::Internal {
                message: format!("Pipeline health check produced {:?}", other),
            });
        }
    }

    info!("All health checks passed!");
    Ok(())
}
