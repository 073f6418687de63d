use snc_client::{run_sync_loop, ApiCommand, ApiEvent, BotApiClient};
use snc_core::ControlAction;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

const STATUS_BODY: &str = r#"{"is_running":false,"network":"devnet","wallet_balance":1.5,"tokens_scanned":7,"active_trades":2}"#;
const TOKENS_BODY: &str = r#"[{"address":"So11111111111111111111111111111111111111112","symbol":"WSOL","price":142.7,"volume_24h":10500.0,"price_change_1h":-2.4}]"#;
const TRADES_BODY: &str = "[]";

#[derive(Default)]
struct Hits {
    status: AtomicUsize,
    tokens: AtomicUsize,
    trades: AtomicUsize,
    start: AtomicUsize,
    stop: AtomicUsize,
}

struct Endpoint {
    base_url: String,
    hits: Arc<Hits>,
    server: tokio::task::JoinHandle<()>,
}

/// Minimal canned HTTP endpoint standing in for the controller API. Each
/// connection serves one request and closes.
async fn canned_endpoint(tokens_ok: bool, controls_ok: bool) -> Endpoint {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let hits = Arc::new(Hits::default());
    let served = Arc::clone(&hits);
    let server = tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(serve_one(socket, Arc::clone(&served), tokens_ok, controls_ok));
        }
    });
    Endpoint {
        base_url: format!("http://{addr}"),
        hits,
        server,
    }
}

async fn serve_one(mut socket: TcpStream, hits: Arc<Hits>, tokens_ok: bool, controls_ok: bool) {
    let mut buf = vec![0u8; 8192];
    let mut read = 0;
    loop {
        match socket.read(&mut buf[read..]).await {
            Ok(0) => break,
            Ok(n) => {
                read += n;
                if buf[..read].windows(4).any(|window| window == b"\r\n\r\n") {
                    break;
                }
                if read == buf.len() {
                    break;
                }
            }
            Err(_) => return,
        }
    }
    let request = String::from_utf8_lossy(&buf[..read]).into_owned();
    let request_line = request.lines().next().unwrap_or_default();
    let (status_line, body) = respond_to(request_line, &hits, tokens_ok, controls_ok);
    let response = format!(
        "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

fn respond_to(
    request_line: &str,
    hits: &Hits,
    tokens_ok: bool,
    controls_ok: bool,
) -> (&'static str, &'static str) {
    if request_line.starts_with("GET /status") {
        hits.status.fetch_add(1, Ordering::SeqCst);
        ("200 OK", STATUS_BODY)
    } else if request_line.starts_with("GET /tokens") {
        hits.tokens.fetch_add(1, Ordering::SeqCst);
        if tokens_ok {
            ("200 OK", TOKENS_BODY)
        } else {
            ("500 Internal Server Error", "{}")
        }
    } else if request_line.starts_with("GET /trades") {
        hits.trades.fetch_add(1, Ordering::SeqCst);
        ("200 OK", TRADES_BODY)
    } else if request_line.starts_with("POST /start") {
        hits.start.fetch_add(1, Ordering::SeqCst);
        if controls_ok {
            ("200 OK", "{}")
        } else {
            ("500 Internal Server Error", "{}")
        }
    } else if request_line.starts_with("POST /stop") {
        hits.stop.fetch_add(1, Ordering::SeqCst);
        if controls_ok {
            ("200 OK", "{}")
        } else {
            ("500 Internal Server Error", "{}")
        }
    } else if request_line.starts_with("POST /network/") {
        if controls_ok {
            ("200 OK", "{}")
        } else {
            ("500 Internal Server Error", "{}")
        }
    } else {
        ("404 Not Found", "{}")
    }
}

/// Reads events until the initial cycle has fully landed (status, tokens,
/// trades in any order).
async fn drain_initial_cycle(event_rx: &mut mpsc::Receiver<ApiEvent>, expected: usize) {
    timeout(Duration::from_secs(2), async {
        let mut seen = 0;
        while seen < expected {
            if event_rx.recv().await.is_none() {
                break;
            }
            seen += 1;
        }
    })
    .await
    .expect("initial cycle should land in time");
}

#[tokio::test]
async fn failing_tokens_fetch_leaves_status_and_trades_flowing() {
    let endpoint = canned_endpoint(false, true).await;
    let client = BotApiClient::new(endpoint.base_url.clone()).unwrap();
    let (event_tx, mut event_rx) = mpsc::channel(64);
    let (_command_tx, command_rx) = mpsc::channel(8);
    let sync = tokio::spawn(run_sync_loop(
        client,
        Duration::from_secs(60),
        event_tx,
        command_rx,
    ));

    let mut saw_status = false;
    let mut saw_trades = false;
    let mut saw_tokens = false;
    timeout(Duration::from_secs(2), async {
        while let Some(event) = event_rx.recv().await {
            match event {
                ApiEvent::Status { .. } => saw_status = true,
                ApiEvent::Trades { .. } => saw_trades = true,
                ApiEvent::Tokens { .. } => saw_tokens = true,
                ApiEvent::ControlResult { .. } => {}
            }
            if saw_status && saw_trades {
                break;
            }
        }
    })
    .await
    .expect("status and trades should land in time");

    sleep(Duration::from_millis(100)).await;
    while let Ok(event) = event_rx.try_recv() {
        if matches!(event, ApiEvent::Tokens { .. }) {
            saw_tokens = true;
        }
    }

    assert!(saw_status);
    assert!(saw_trades);
    assert!(!saw_tokens, "a failed fetch must not produce an event");
    assert!(endpoint.hits.tokens.load(Ordering::SeqCst) >= 1);

    sync.abort();
    endpoint.server.abort();
}

#[tokio::test]
async fn successful_start_reports_and_refreshes_status_out_of_band() {
    let endpoint = canned_endpoint(true, true).await;
    let client = BotApiClient::new(endpoint.base_url.clone()).unwrap();
    let (event_tx, mut event_rx) = mpsc::channel(64);
    let (command_tx, command_rx) = mpsc::channel(8);
    let sync = tokio::spawn(run_sync_loop(
        client,
        Duration::from_secs(60),
        event_tx,
        command_rx,
    ));

    drain_initial_cycle(&mut event_rx, 3).await;
    assert_eq!(endpoint.hits.status.load(Ordering::SeqCst), 1);

    command_tx
        .send(ApiCommand::Control(ControlAction::Start))
        .await
        .unwrap();

    let result = timeout(Duration::from_secs(2), event_rx.recv())
        .await
        .expect("control result in time")
        .expect("event channel open");
    assert_eq!(
        result,
        ApiEvent::ControlResult {
            action: ControlAction::Start,
            ok: true
        }
    );

    let refreshed = timeout(Duration::from_secs(2), event_rx.recv())
        .await
        .expect("status refresh in time")
        .expect("event channel open");
    match refreshed {
        ApiEvent::Status { cycle, .. } => assert!(cycle > 1, "refresh gets a fresh cycle number"),
        other => panic!("expected status refresh, got {other:?}"),
    }

    assert_eq!(endpoint.hits.start.load(Ordering::SeqCst), 1);
    assert_eq!(endpoint.hits.status.load(Ordering::SeqCst), 2);
    // Only status is re-fetched after an action.
    assert_eq!(endpoint.hits.tokens.load(Ordering::SeqCst), 1);
    assert_eq!(endpoint.hits.trades.load(Ordering::SeqCst), 1);

    sync.abort();
    endpoint.server.abort();
}

#[tokio::test]
async fn failed_stop_reports_failure_and_skips_refresh() {
    let endpoint = canned_endpoint(true, false).await;
    let client = BotApiClient::new(endpoint.base_url.clone()).unwrap();
    let (event_tx, mut event_rx) = mpsc::channel(64);
    let (command_tx, command_rx) = mpsc::channel(8);
    let sync = tokio::spawn(run_sync_loop(
        client,
        Duration::from_secs(60),
        event_tx,
        command_rx,
    ));

    drain_initial_cycle(&mut event_rx, 3).await;

    command_tx
        .send(ApiCommand::Control(ControlAction::Stop))
        .await
        .unwrap();

    let result = timeout(Duration::from_secs(2), event_rx.recv())
        .await
        .expect("control result in time")
        .expect("event channel open");
    assert_eq!(
        result,
        ApiEvent::ControlResult {
            action: ControlAction::Stop,
            ok: false
        }
    );

    sleep(Duration::from_millis(150)).await;
    assert_eq!(endpoint.hits.stop.load(Ordering::SeqCst), 1);
    // No out-of-band refresh after a failed action.
    assert_eq!(endpoint.hits.status.load(Ordering::SeqCst), 1);
    assert!(event_rx.try_recv().is_err());

    sync.abort();
    endpoint.server.abort();
}

#[tokio::test]
async fn aborted_loop_issues_no_further_fetches() {
    let endpoint = canned_endpoint(true, true).await;
    let client = BotApiClient::new(endpoint.base_url.clone()).unwrap();
    let (event_tx, _event_rx) = mpsc::channel(64);
    let (_command_tx, command_rx) = mpsc::channel(8);
    let sync = tokio::spawn(run_sync_loop(
        client,
        Duration::from_millis(100),
        event_tx,
        command_rx,
    ));

    sleep(Duration::from_millis(250)).await;
    sync.abort();
    sleep(Duration::from_millis(50)).await;

    let status_hits = endpoint.hits.status.load(Ordering::SeqCst);
    assert!(status_hits >= 2, "a few cycles should have run before abort");

    sleep(Duration::from_millis(300)).await;
    assert_eq!(
        endpoint.hits.status.load(Ordering::SeqCst),
        status_hits,
        "no fetch may fire after the loop is cancelled"
    );

    endpoint.server.abort();
}
