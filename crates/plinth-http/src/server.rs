//! Server lifecycle coordination.
//!
//! A one-shot coordinator: start the accept loop, run it until it fails
//! on its own or a shutdown is requested, then drain in-flight requests
//! within a bounded window. The accept loop owns every connection as a
//! task in a [`JoinSet`], so when the window elapses the remaining
//! connections really are severed, exactly once. There is no restart
//! path; the coordinator is torn down with the process.

use crate::ServerConfig;
use axum::Router;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use hyper_util::service::TowerToHyperService;
use std::future::Future;
use std::time::Duration;
use std::{fmt, io};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;

/// Error type for server operations.
#[derive(Debug)]
pub enum ServerError {
    /// Failed to bind to address. Fatal; the process should exit non-zero.
    Bind(io::Error),
    /// The accept loop terminated on its own with an error. Fatal.
    Runtime(io::Error),
    /// In-flight requests did not finish within the drain window; the
    /// remaining connections were force-closed. Soft: forced close has
    /// already happened by the time this is returned.
    DrainTimeout(Duration),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind(e) => write!(f, "Failed to bind to address: {}", e),
            Self::Runtime(e) => write!(f, "Server error: {}", e),
            Self::DrainTimeout(t) => {
                write!(f, "Graceful shutdown exceeded {:?}, connections force-closed", t)
            }
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bind(e) | Self::Runtime(e) => Some(e),
            Self::DrainTimeout(_) => None,
        }
    }
}

/// Serve a router on an already-bound listener until it stops on its own
/// or `shutdown` resolves, then drain within `drain_timeout`.
///
/// The accept loop runs on its own task, so the calling task is free to
/// wait on `shutdown` concurrently. The two events race, first-arrived
/// wins; a loop that has already stopped beats a concurrently pending
/// shutdown. When `shutdown` wins, the listener stops accepting, each
/// open connection is told to finish its in-flight request, and the
/// coordinator waits up to `drain_timeout` for them. On overrun the
/// remaining connection tasks are aborted, severing their sockets, and
/// [`ServerError::DrainTimeout`] is returned.
///
/// The `shutdown` future resolving once is what collapses repeated
/// signals into a single drain attempt; the coordinator never looks at
/// it again.
pub async fn serve_with_shutdown(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()>,
    drain_timeout: Duration,
) -> Result<(), ServerError> {
    let (drain_tx, drain_rx) = watch::channel(false);
    let accept = accept_loop(listener, router, drain_rx);
    coordinate(accept, drain_tx, shutdown, drain_timeout).await
}

/// Accepts connections and serves each on its own task until the drain
/// channel fires. Returns the set of still-running connection tasks so
/// the coordinator can wait on them, or force-close them by aborting.
async fn accept_loop(
    listener: TcpListener,
    router: Router,
    mut drain_rx: watch::Receiver<bool>,
) -> io::Result<JoinSet<()>> {
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            biased;
            _ = drain_rx.changed() => {
                // Dropping the listener here is what stops new
                // connections from being accepted.
                return Ok(connections);
            }
            accepted = listener.accept() => {
                let (stream, _remote) = accepted?;
                let service = TowerToHyperService::new(router.clone());
                let mut drain = drain_rx.clone();

                connections.spawn(async move {
                    let conn = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service);
                    tokio::pin!(conn);

                    tokio::select! {
                        result = conn.as_mut() => {
                            if let Err(e) = result {
                                tracing::debug!(error = %e, "Connection closed with error");
                            }
                        }
                        _ = drain.changed() => {
                            // Finish the in-flight request, refuse keep-alive.
                            conn.as_mut().graceful_shutdown();
                            if let Err(e) = conn.as_mut().await {
                                tracing::debug!(error = %e, "Connection closed with error during drain");
                            }
                        }
                    }
                });
            }
        }
    }
}

/// The race-and-drain core, generic over the accept loop so tests can
/// substitute a scripted one.
async fn coordinate<A>(
    accept: A,
    drain_tx: watch::Sender<bool>,
    shutdown: impl Future<Output = ()>,
    drain_timeout: Duration,
) -> Result<(), ServerError>
where
    A: Future<Output = io::Result<JoinSet<()>>> + Send + 'static,
{
    let mut accept_task = tokio::spawn(accept);
    tokio::pin!(shutdown);

    // Single-winner race. Biased so an accept loop that has already
    // stopped wins over a concurrently pending shutdown.
    tokio::select! {
        biased;
        joined = &mut accept_task => {
            let mut connections = accept_result(joined)?;
            drain_connections(&mut connections).await;
            return Ok(());
        }
        () = &mut shutdown => {}
    }

    tracing::info!("Shutdown requested, draining in-flight requests");
    let _ = drain_tx.send(true);

    let mut connections = accept_result((&mut accept_task).await)?;

    match tokio::time::timeout(drain_timeout, drain_connections(&mut connections)).await {
        Ok(()) => {
            tracing::info!("Server exited gracefully");
            Ok(())
        }
        Err(_) => {
            force_close(&mut connections).await;
            tracing::warn!(
                timeout = ?drain_timeout,
                "Drain window elapsed, remaining connections force-closed"
            );
            Err(ServerError::DrainTimeout(drain_timeout))
        }
    }
}

fn accept_result(
    joined: Result<io::Result<JoinSet<()>>, tokio::task::JoinError>,
) -> Result<JoinSet<()>, ServerError> {
    match joined {
        Ok(Ok(connections)) => Ok(connections),
        Ok(Err(e)) => Err(ServerError::Runtime(e)),
        Err(e) => {
            if e.is_panic() {
                tracing::error!(error = %e, "Accept loop panicked");
            }
            Err(ServerError::Runtime(io::Error::other(e)))
        }
    }
}

/// Waits for every connection task to finish on its own.
async fn drain_connections(connections: &mut JoinSet<()>) {
    while let Some(result) = connections.join_next().await {
        if let Err(e) = result {
            if e.is_panic() {
                tracing::error!(error = %e, "Connection task panicked");
            }
        }
    }
}

/// Forced close: abort every remaining connection task and reap them.
/// Best-effort; panics observed while joining are logged, never escalated.
async fn force_close(connections: &mut JoinSet<()>) {
    connections.abort_all();
    while let Some(result) = connections.join_next().await {
        if let Err(e) = result {
            if e.is_panic() {
                tracing::error!(error = %e, "Connection task panicked during forced close");
            }
        }
    }
}

/// Serve a router with graceful shutdown on SIGINT/SIGTERM.
///
/// Binds `config.addr()`, then runs [`serve_with_shutdown`] with
/// [`shutdown_signal`] and the configured drain timeout. A bind failure
/// is returned before any signal handling is installed.
pub async fn serve_router(
    router: Router,
    config: &(impl AsRef<ServerConfig> + Sync),
) -> Result<(), ServerError> {
    let config = config.as_ref();
    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await.map_err(ServerError::Bind)?;

    tracing::info!("Server listening on {}", addr);

    serve_with_shutdown(listener, router, shutdown_signal(), config.drain_timeout()).await
}

/// Waits for shutdown signals (SIGINT or SIGTERM).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::{pending, ready};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    #[tokio::test]
    async fn accept_loop_failure_wins_over_resolved_shutdown() {
        let (drain_tx, _drain_rx) = watch::channel(false);
        let failing = ready(Err(io::Error::other("accept loop died")));

        let result = coordinate(failing, drain_tx, ready(()), Duration::from_secs(5)).await;

        match result {
            Err(ServerError::Runtime(e)) => assert!(e.to_string().contains("accept loop died")),
            other => panic!("expected Runtime error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn clean_accept_loop_exit_returns_ok() {
        let (drain_tx, _drain_rx) = watch::channel(false);

        let result = coordinate(
            ready(Ok(JoinSet::new())),
            drain_tx,
            pending::<()>(),
            Duration::from_secs(5),
        )
        .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn shutdown_triggers_drain_and_returns_clean() {
        let (drain_tx, mut drain_rx) = watch::channel(false);
        // Scripted accept loop: stops accepting once the drain fires,
        // handing back one connection that finishes promptly.
        let accept = async move {
            let _ = drain_rx.changed().await;
            let mut connections = JoinSet::new();
            connections.spawn(async {
                tokio::time::sleep(Duration::from_millis(10)).await;
            });
            Ok(connections)
        };

        let result = coordinate(accept, drain_tx, ready(()), Duration::from_secs(5)).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn drain_overrun_forces_close_at_deadline() {
        let (drain_tx, mut drain_rx) = watch::channel(false);
        let finished = Arc::new(AtomicBool::new(false));
        let finished_in_task = finished.clone();
        // Scripted accept loop handing back a connection that ignores
        // the drain request entirely.
        let accept = async move {
            let _ = drain_rx.changed().await;
            let mut connections = JoinSet::new();
            connections.spawn(async move {
                tokio::time::sleep(Duration::from_secs(60)).await;
                finished_in_task.store(true, Ordering::SeqCst);
            });
            Ok(connections)
        };

        let drain_timeout = Duration::from_millis(100);
        let started = Instant::now();
        let result = coordinate(accept, drain_tx, ready(()), drain_timeout).await;
        let elapsed = started.elapsed();

        match result {
            Err(ServerError::DrainTimeout(t)) => assert_eq!(t, drain_timeout),
            other => panic!("expected DrainTimeout, got {:?}", other),
        }
        assert!(elapsed >= drain_timeout);
        // Returning at all proves the lingering task was aborted: the
        // coordinator reaps every connection task before returning.
        assert!(elapsed < Duration::from_secs(2), "forced close took {:?}", elapsed);
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn accept_loop_error_during_drain_is_surfaced() {
        let (drain_tx, mut drain_rx) = watch::channel(false);
        let accept = async move {
            let _ = drain_rx.changed().await;
            Err(io::Error::other("failed mid-drain"))
        };

        let result = coordinate(accept, drain_tx, ready(()), Duration::from_secs(5)).await;

        assert!(matches!(result, Err(ServerError::Runtime(_))));
    }

    #[test]
    fn server_error_display() {
        let err = ServerError::Bind(io::Error::other("in use"));
        assert!(err.to_string().contains("Failed to bind"));

        let err = ServerError::DrainTimeout(Duration::from_secs(30));
        assert!(err.to_string().contains("force-closed"));
    }
}
