//! Shared harness: a mock petstore on a random port plus a wired executor.

#![allow(dead_code)]

use petstore_core::{logging, Config, RequestExecutor};

/// Start the mock server on a random port and return its `/v2` base URL.
///
/// The server runs on its own current-thread runtime in a background
/// thread, leaving the test thread free for blocking calls.
pub fn spawn_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}/v2")
}

/// Executor bound to a fresh mock server.
pub fn executor() -> RequestExecutor {
    let config = Config::with_base_url(spawn_server());
    logging::init(&config);
    RequestExecutor::new(config)
}
