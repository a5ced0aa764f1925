//! Real TCP server for tests that need streaming responses

use std::net::SocketAddr;

use tokio::net::TcpListener;

use super::TestApp;

/// Serve the fixture's router on an ephemeral port and return its base URL
pub async fn spawn_server(app: &TestApp) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    let router = app.router();

    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .expect("Test server failed");
    });

    format!("http://{}", addr)
}
