/**
 * XFPad Server Entry Point
 *
 * Serves the document version log over HTTP. Documents are closed on Ctrl-C
 * so parked long-polls and streams end cleanly.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let config = xfpad::backend::server::ServerConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .init();

    tracing::info!("[Startup] Server initialization started");

    let (app, app_state) = xfpad::backend::server::create_app(config.clone());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("[Startup] Listening on {}", addr);
    tracing::info!("[Startup] Clients should connect to http://127.0.0.1:{}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("[Startup] Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("[Startup] Shutting down");
            app_state.collab.shutdown().await;
        })
        .await?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin xfpad-server --features ssr");
    std::process::exit(1);
}
