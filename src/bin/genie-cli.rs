use anyhow::Context;
use genie::{config::GenieConfig, render, AppState, Credentials, SearchRequest};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let config = GenieConfig::from_env().context("invalid configuration")?;
    let state = AppState::new(config)?;

    let bundle = state
        .search(SearchRequest {
            query,
            options: None,
            credentials: Credentials::default(),
        })
        .await?;

    for notice in &bundle.notices {
        eprintln!("error: {}", notice.message);
    }

    println!("# {}\n", bundle.query);
    println!("{}", render::render_all(&bundle));
    Ok(())
}
