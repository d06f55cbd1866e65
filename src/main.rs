use gutenberg_catalog::catalog::handlers::router;
use gutenberg_catalog::config::Config;
use gutenberg_catalog::store::{count_books, CatalogStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            let program = std::env::args()
                .next()
                .unwrap_or_else(|| "gutenberg-catalog".to_string());
            eprintln!("Error: {:#}", e);
            eprintln!("Usage: {} [--bind <addr:port>] [--db <path>] [--pool-size <count>]", program);
            eprintln!("Example: {} --bind 127.0.0.1:8000 --db catalog.db", program);
            std::process::exit(1);
        }
    };

    tracing::info!("Opening catalog database {}", config.database.display());
    let store = CatalogStore::open_pooled(&config.database, config.pool_size)?;
    tracing::info!("Store pool holds {} connections", store.pool_size());
    let books = store.with_conn(count_books)?;
    tracing::info!("Catalog holds {} books", books);

    let app = router(store);

    tracing::info!("HTTP server listening on {}", config.bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
