//! notebook-www - Serve a notebook of wiki pages over HTTP.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notebook_www::{
    config::Config,
    server::{create_router, RouterConfig, WwwInterface},
    store::FsNotebook,
    template::load_template,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let notebook = match FsNotebook::open(&config.notebook) {
        Ok(notebook) => notebook,
        Err(e) => {
            error!("Failed to open notebook: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let template = match load_template(&config.template) {
        Ok(template) => template,
        Err(e) => {
            error!("Failed to load template '{}': {}", config.template, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Configuration:");
    info!("  Notebook: {}", config.notebook.display());
    info!("  Template: {}", template.name());
    if template.has_resources() {
        info!("  Template resources: enabled");
    }

    let credentials = config.credentials();
    if credentials.is_some() {
        info!("  Auth: enabled (realm \"{}\")", config.realm);
    } else {
        warn!("  Auth: DISABLED - the notebook is publicly readable");
        warn!("        Enable with --auth-user=<user> --auth-password=<password>");
    }

    let interface = WwwInterface::new(notebook, template)
        .with_realm(config.realm.clone())
        .with_credentials(credentials)
        .with_notebook_name(config.notebook_name());

    let router_config = RouterConfig::new().with_tracing(!config.no_tracing);
    let router = create_router(interface, router_config);

    // Bind and serve
    let addr = config.bind_address();

    info!("");
    info!("  Server listening on: http://{}", addr);
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "notebook_www=debug,tower_http=debug"
    } else {
        "notebook_www=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
