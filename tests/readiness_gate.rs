//! End-to-end readiness gate tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use shard_router::config::RouterConfig;
use shard_router::http::HttpServer;
use shard_router::lifecycle::Shutdown;

mod common;

fn gated_config(proxy_addr: SocketAddr, backend: SocketAddr, timeout_ms: u64) -> RouterConfig {
    let mut config = RouterConfig::default();
    config.listener.bind_address = proxy_addr.to_string();
    config.affinity.instance_count = 1;
    config.readiness.timeout_ms = timeout_ms;
    config.readiness.poll_interval_ms = 100;
    config
        .runtime
        .instances
        .insert("client-0".into(), backend.to_string());
    config
}

async fn spawn_router(config: RouterConfig, proxy_addr: SocketAddr) -> Shutdown {
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let listener = tokio::net::TcpListener::bind(proxy_addr).await.unwrap();
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    tokio::time::sleep(Duration::from_millis(300)).await;
    shutdown
}

#[tokio::test]
async fn unreachable_backend_yields_starting_503() {
    // Nothing listens on the backend port.
    let backend: SocketAddr = "127.0.0.1:28511".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:28512".parse().unwrap();

    let config = gated_config(proxy_addr, backend, 1_000);
    let shutdown = spawn_router(config, proxy_addr).await;
    let client = common::test_client();

    let started = Instant::now();
    let res = client
        .get(format!("http://{}", proxy_addr))
        .send()
        .await
        .unwrap();
    let waited = started.elapsed();

    assert_eq!(res.status(), 503);
    assert_eq!(res.headers().get("x-container-state").unwrap(), "starting");
    assert_eq!(res.headers().get("cache-control").unwrap(), "no-store");

    let body = res.text().await.unwrap();
    assert!(body.contains("not ready within"), "diagnostic body: {}", body);
    assert!(body.contains("last error"), "diagnostic body: {}", body);

    // Bounded by the gate timeout plus one poll interval (plus slack
    // for connect attempts).
    assert!(waited >= Duration::from_millis(1_000));
    assert!(waited < Duration::from_millis(2_500), "waited {:?}", waited);

    shutdown.trigger();
}

#[tokio::test]
async fn backend_404_counts_as_listening() {
    let backend: SocketAddr = "127.0.0.1:28521".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:28522".parse().unwrap();

    let calls = Arc::new(AtomicU32::new(0));
    let c = calls.clone();
    common::start_programmable_backend(backend, move || {
        let c = c.clone();
        async move {
            c.fetch_add(1, Ordering::SeqCst);
            (404, "no such page".into())
        }
    })
    .await;

    let config = gated_config(proxy_addr, backend, 1_000);
    let shutdown = spawn_router(config, proxy_addr).await;
    let client = common::test_client();

    let started = Instant::now();
    let res = client
        .get(format!("http://{}", proxy_addr))
        .send()
        .await
        .unwrap();

    // The 404 is the application answering: gate opens, response relays.
    assert_eq!(res.status(), 404);
    assert!(res.headers().get("set-cookie").is_some());
    assert!(started.elapsed() < Duration::from_millis(1_000));
    // One probe plus one forward, no gate retries.
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    shutdown.trigger();
}

#[tokio::test]
async fn cold_backend_is_waited_for() {
    let backend: SocketAddr = "127.0.0.1:28531".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:28532".parse().unwrap();

    // Crash-looping warm-up: two 503 probes before the app listens.
    let calls = Arc::new(AtomicU32::new(0));
    let c = calls.clone();
    common::start_programmable_backend(backend, move || {
        let c = c.clone();
        async move {
            let count = c.fetch_add(1, Ordering::SeqCst);
            if count < 2 {
                (503, "warming up".into())
            } else {
                (200, "warm".into())
            }
        }
    })
    .await;

    let config = gated_config(proxy_addr, backend, 5_000);
    let shutdown = spawn_router(config, proxy_addr).await;
    let client = common::test_client();

    let res = client
        .get(format!("http://{}", proxy_addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "warm");
    assert!(calls.load(Ordering::SeqCst) >= 4, "expected probe retries");

    shutdown.trigger();
}

#[tokio::test]
async fn gating_disabled_forwards_without_probing() {
    let backend: SocketAddr = "127.0.0.1:28541".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:28542".parse().unwrap();

    let calls = Arc::new(AtomicU32::new(0));
    let c = calls.clone();
    common::start_programmable_backend(backend, move || {
        let c = c.clone();
        async move {
            c.fetch_add(1, Ordering::SeqCst);
            (200, "direct".into())
        }
    })
    .await;

    let mut config = gated_config(proxy_addr, backend, 1_000);
    config.readiness.enabled = false;

    let shutdown = spawn_router(config, proxy_addr).await;
    let client = common::test_client();

    let res = client
        .get(format!("http://{}", proxy_addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "direct");
    // Forward only: no synthetic probe traffic.
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    shutdown.trigger();
}
