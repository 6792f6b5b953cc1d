//! One-shot OAuth2 redirect listener
//!
//! When the redirect URI points at localhost, `basecamp auth` listens there
//! for the browser's redirect and reads the `code` query parameter.

use crate::error::{Error, Result};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Router;
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};
use url::Url;

/// How long to wait for the browser redirect
pub const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

/// What the redirect carried
#[derive(Debug, Clone, PartialEq, Eq)]
enum CallbackOutcome {
    Code(String),
    Denied { error: String, description: String },
}

/// Local address to listen on for a `http://localhost[:port]/…` redirect URI
pub fn callback_address(redirect_uri: &str) -> Option<SocketAddr> {
    let url = Url::parse(redirect_uri).ok()?;
    if url.scheme() != "http" {
        return None;
    }
    match url.host_str()? {
        "localhost" | "127.0.0.1" => {}
        _ => return None,
    }
    let port = url.port_or_known_default()?;
    Some(SocketAddr::from((Ipv4Addr::LOCALHOST, port)))
}

/// Serve on an already-bound listener until a redirect with `code` or
/// `error` arrives
pub async fn wait_for_code(listener: TcpListener, timeout: Duration) -> Result<String> {
    if let Ok(addr) = listener.local_addr() {
        info!("Waiting for OAuth redirect on http://{addr}");
    }
    let (tx, mut rx) = mpsc::channel::<CallbackOutcome>(1);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new().fallback(handle_callback).with_state(tx);
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    let outcome = tokio::time::timeout(timeout, rx.recv()).await;

    let _ = shutdown_tx.send(());
    if tokio::time::timeout(Duration::from_secs(2), server).await.is_err() {
        debug!("Callback server did not shut down in time");
    }

    match outcome {
        Err(_) => Err(Error::auth(format!(
            "Timed out after {}s waiting for the authorization redirect",
            timeout.as_secs()
        ))),
        Ok(None) => Err(Error::auth("Callback server stopped unexpectedly")),
        Ok(Some(CallbackOutcome::Code(code))) => Ok(code),
        Ok(Some(CallbackOutcome::Denied { error, description })) => Err(Error::OAuth2 {
            message: if description.is_empty() {
                error
            } else {
                format!("{error}: {description}")
            },
        }),
    }
}

async fn handle_callback(
    State(tx): State<mpsc::Sender<CallbackOutcome>>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Html<String>) {
    if let Some(code) = params.get("code") {
        let _ = tx.try_send(CallbackOutcome::Code(code.clone()));
        return (
            StatusCode::OK,
            Html(page(
                "Authorization Successful",
                "<h1>Authorization Successful!</h1>\
                 <p>You can close this window and return to the terminal.</p>",
            )),
        );
    }

    if let Some(error) = params.get("error") {
        let description = params.get("error_description").cloned().unwrap_or_default();
        let body = format!(
            "<h1>Authorization Failed</h1><p>Error: {}</p><p>Description: {}</p>",
            escape_html(error),
            escape_html(&description)
        );
        let _ = tx.try_send(CallbackOutcome::Denied {
            error: error.clone(),
            description,
        });
        return (
            StatusCode::BAD_REQUEST,
            Html(page("Authorization Failed", &body)),
        );
    }

    (
        StatusCode::OK,
        Html(page(
            "Waiting for Authorization",
            "<h1>Waiting for authorization...</h1>\
             <p>Please authorize the application in the other window.</p>",
        )),
    )
}

fn page(title: &str, body: &str) -> String {
    format!("<html><head><title>{title}</title></head><body>{body}</body></html>")
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_address() {
        assert_eq!(
            callback_address("http://localhost:8080/callback"),
            Some(SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)))
        );
        assert_eq!(
            callback_address("http://127.0.0.1/cb"),
            Some(SocketAddr::from((Ipv4Addr::LOCALHOST, 80)))
        );
        assert_eq!(callback_address("https://example.com/callback"), None);
        assert_eq!(callback_address("urn:ietf:wg:oauth:2.0:oob"), None);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>&\""), "&lt;b&gt;&amp;&quot;");
    }
}
