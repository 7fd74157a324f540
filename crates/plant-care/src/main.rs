mod advisor;
mod config;
mod document;
mod error;
mod extract;
mod fetch;
mod locate;
mod page;
mod pipeline;
mod server;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use llm_common::{AnthropicClient, TextGenerator};
use tracing::info;
use tracing_subscriber::EnvFilter;

use advisor::CareAdvisor;
use config::Config;
use document::DocumentStore;
use fetch::PdfFetcher;
use pipeline::CarePipeline;
use server::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting plant-care");

    // 1. Configuration; a missing API key stops the process here.
    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        pdf_url = %config.document.url,
        cache_ttl_secs = config.document.cache_ttl.map(|t| t.as_secs()),
        model = %config.advisor.model,
        llm_base_url = %config.llm.base_url,
        "configuration loaded"
    );

    // 2. One client handle for the process lifetime, passed explicitly to the advisor.
    let generator: Arc<dyn TextGenerator> = Arc::new(AnthropicClient::new(config.llm.clone())?);
    let advisor = CareAdvisor::new(generator, config.advisor.clone());

    let fetcher = PdfFetcher::new(&config.document)?;
    let documents = DocumentStore::new(fetcher, config.document.clone());

    let app = server::create_router(AppState::new(CarePipeline::new(documents, advisor)));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await?;

    info!("plant-care shut down");
    Ok(())
}
