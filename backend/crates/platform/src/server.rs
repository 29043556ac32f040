//! Connection-level HTTP server
//!
//! `axum::serve` leaves every connection on hyper defaults. This accept loop
//! drives each connection through `hyper_util`'s auto builder so that the
//! server-side bounds in [`HttpTimeouts`] apply below the router too:
//! - `read`: the request line and headers must arrive within this bound
//! - `idle`: a keep-alive connection with no request in flight is closed
//!   once it has been quiet this long
//!
//! The peer address is attached as `ConnectInfo<SocketAddr>` on every
//! request, the same extension `into_make_service_with_connect_info` sets.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::ConnectInfo;
use axum::response::Response;
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tower::ServiceExt;

use crate::middleware::HttpTimeouts;

/// Pause after a failed `accept`, e.g. when the process is out of descriptors
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// Serve `router` on `listener` until `signal` resolves.
///
/// After the signal, no new connections are accepted, idle connections are
/// closed, and in-flight requests finish before this returns.
pub async fn serve<F>(listener: TcpListener, router: Router, timeouts: HttpTimeouts, signal: F)
where
    F: Future<Output = ()>,
{
    let (close_tx, close_rx) = watch::channel(());
    let mut signal = pin!(signal);

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(err) => {
                    tracing::warn!(error = %err, "Failed to accept connection");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            },
            () = &mut signal => {
                tracing::info!("Shutdown signal received, no longer accepting connections");
                break;
            }
        };

        tokio::spawn(serve_connection(
            stream,
            peer,
            router.clone(),
            timeouts,
            close_rx.clone(),
        ));
    }

    drop(listener);
    drop(close_rx);

    // Fails only when no connection is open, which is fine
    let _ = close_tx.send(());
    close_tx.closed().await;

    tracing::debug!("All connections drained");
}

async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    router: Router,
    timeouts: HttpTimeouts,
    mut close_rx: watch::Receiver<()>,
) {
    let (activity_tx, mut activity_rx) = watch::channel(0usize);
    let activity_tx = Arc::new(activity_tx);

    let service = service_fn(move |mut request: hyper::Request<Incoming>| {
        request.extensions_mut().insert(ConnectInfo(peer));
        let in_flight = InFlight::begin(activity_tx.clone());
        let router = router.clone();
        async move {
            let response: Result<Response, Infallible> = router.oneshot(request).await;
            drop(in_flight);
            response
        }
    });

    let mut builder = auto::Builder::new(TokioExecutor::new());
    builder
        .http1()
        .timer(TokioTimer::new())
        .header_read_timeout(timeouts.read)
        .keep_alive(true);

    let mut conn = pin!(builder.serve_connection(TokioIo::new(stream), service));
    let mut closing = false;

    loop {
        tokio::select! {
            result = conn.as_mut() => {
                if let Err(err) = result {
                    tracing::debug!(%peer, error = %err, "Connection ended with error");
                }
                break;
            }
            () = quiet_for(&mut activity_rx, timeouts.idle), if !closing => {
                tracing::debug!(%peer, "Closing idle connection");
                conn.as_mut().graceful_shutdown();
                closing = true;
            }
            _ = close_rx.changed(), if !closing => {
                conn.as_mut().graceful_shutdown();
                closing = true;
            }
        }
    }
}

/// Counts one request in flight on its connection for as long as it lives
struct InFlight(Arc<watch::Sender<usize>>);

impl InFlight {
    fn begin(activity: Arc<watch::Sender<usize>>) -> Self {
        activity.send_modify(|n| *n += 1);
        Self(activity)
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.send_modify(|n| *n = n.saturating_sub(1));
    }
}

/// Resolves once no request has been in flight for `idle`.
async fn quiet_for(activity: &mut watch::Receiver<usize>, idle: Duration) {
    loop {
        if activity.wait_for(|in_flight| *in_flight == 0).await.is_err() {
            return std::future::pending().await;
        }
        match tokio::time::timeout(idle, activity.changed()).await {
            Err(_elapsed) => return,
            Ok(Ok(())) => continue,
            Ok(Err(_)) => return std::future::pending().await,
        }
    }
}
