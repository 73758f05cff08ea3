//! The contact directory service: an axum [`Router`] over a [`ContactsEngine`].
//!
//! Handlers hold no state of their own. Each request gets a clone of the engine handle and
//! performs a single read-modify-write against the store.

use std::future::{pending, Future};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::handler::HandlerWithoutStateExt;
use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{error, info};

use crate::engine::ContactsEngine;
use crate::Result;

mod handlers;
mod logging;
mod response;

pub use handlers::render_info_page;
pub use response::error_status;

/// An HTTP server exposing the phonebook REST API on top of a [`ContactsEngine`].
///
/// # Example
/// Serve an in-memory phonebook on port 3001 until Ctrl+C is received
/// ```rust,no_run
/// use phonebook::{ContactsServer, MemoryContactsEngine};
/// # async fn run() -> phonebook::Result<()> {
/// let server = ContactsServer::new(MemoryContactsEngine::new());
/// server.run("0.0.0.0:3001".parse().unwrap()).await?;
/// # Ok(())
/// # }
/// ```
pub struct ContactsServer<E: ContactsEngine> {
    /// the store of record
    engine: E,
    /// directory of a built front end, served for non-API paths
    static_dir: Option<PathBuf>,
}

impl<E: ContactsEngine> ContactsServer<E> {
    /// Create a new `ContactsServer` using the given [`ContactsEngine`].
    pub fn new(engine: E) -> Self {
        ContactsServer {
            engine,
            static_dir: None,
        }
    }

    /// serve the files of `dir` for any path that is not part of the API
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// builds the router with every endpoint, the request log and the CORS policy
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([CONTENT_TYPE])
            .max_age(Duration::from_secs(60 * 60));

        let router = Router::new()
            .route(
                "/api/persons",
                get(handlers::list_contacts::<E>).post(handlers::create_contact::<E>),
            )
            .route(
                "/api/persons/:id",
                get(handlers::get_contact::<E>)
                    .put(handlers::update_contact::<E>)
                    .delete(handlers::delete_contact::<E>),
            )
            .route("/info", get(handlers::info_page::<E>));

        let router = match &self.static_dir {
            Some(dir) => router.fallback_service(
                ServeDir::new(dir)
                    .call_fallback_on_method_not_allowed(true)
                    .not_found_service(handlers::unknown_endpoint.into_service()),
            ),
            None => router.fallback(handlers::unknown_endpoint),
        };

        router
            .layer(cors)
            .layer(middleware::from_fn(logging::log_request))
            .with_state(self.engine.clone())
    }

    /// starts a server listening on the given address and serves requests until Ctrl+C or
    /// SIGTERM is received
    ///
    /// # Errors
    /// returns [`PhonebookError::Io`] if the address could not be bound
    ///
    /// [`PhonebookError::Io`]: crate::PhonebookError::Io
    pub async fn run(self, addr: SocketAddr) -> Result<()> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server running on {}", listener.local_addr()?);
        self.serve(listener, shutdown_signal()).await?;
        info!("Server shut down");
        Ok(())
    }

    /// serves requests arriving on an already bound `listener` until `shutdown` completes
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                pending::<()>().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
