//! Runs the real router on an ephemeral port and drives it through the
//! console's client, poller and UI state.

use std::net::SocketAddr;
use std::time::Duration;

use grocer_console::ui::Console;
use grocer_console::{
    ApiClient, ClientError, ConsoleConfig, ConsoleState, PollEvent, Poller, PollerControl,
};
use grocer_core::{CheckoutItem, Money, ProductOverrides, ProductUpdate};
use grocer_db::{Database, DbConfig};
use grocer_server::{build_router, AppState};
use tokio::net::TcpListener;
use tokio::sync::watch;

async fn spawn_server() -> SocketAddr {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let app = build_router(AppState::new(db, 2));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn client() -> ApiClient {
    let addr = spawn_server().await;
    ApiClient::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap()
}

fn priced(sell_cents: i64, discount: u32, stock: i64) -> ProductOverrides {
    ProductOverrides {
        name: Some("Oat Milk".to_string()),
        sell_price: Some(Money::from_cents(sell_cents)),
        discount: Some(grocer_core::DiscountRate::from_percent(discount)),
        stock: Some(stock),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_catalog_round_trip() {
    let api = client().await;

    assert_eq!(api.latest().await.unwrap(), None);
    assert_eq!(api.health().await.unwrap().products, 0);

    let created = api
        .register("5012345678900", &ProductOverrides::default())
        .await
        .unwrap();
    assert!(created.needs_pricing());
    assert_eq!(created.name, "Product 67890");

    let fetched = api.get_by_barcode("5012345678900").await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(api.get_by_id(created.id).await.unwrap(), created);
    assert_eq!(api.latest().await.unwrap(), Some(created.clone()));

    let update = ProductUpdate {
        sell_price: Money::from_cents(250),
        ..ProductUpdate::from(&created)
    };
    assert_eq!(api.update(created.id, &update).await.unwrap().message, "Product updated");
    assert_eq!(
        api.get_by_id(created.id).await.unwrap().sell_price,
        Money::from_cents(250)
    );

    assert_eq!(api.list().await.unwrap().len(), 1);
    assert_eq!(api.delete(created.id).await.unwrap().message, "Product deleted");
    assert!(api.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rejections_carry_server_code() {
    let api = client().await;
    api.register("5012345678900", &priced(1000, 10, 5)).await.unwrap();

    let err = api
        .register("5012345678900", &ProductOverrides::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Rejected { status: 409, .. }));
    assert_eq!(err.code(), Some("CONFLICT"));

    let err = api.get_by_barcode("missing").await.unwrap_err();
    assert!(err.is_not_found());

    let err = api
        .checkout(vec![CheckoutItem {
            barcode: "5012345678900".to_string(),
            quantity: 6,
        }])
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some("INSUFFICIENT_STOCK"));
}

#[tokio::test]
async fn test_checkout_and_history() {
    let api = client().await;
    api.register("5012345678900", &priced(1000, 10, 5)).await.unwrap();

    let receipt = api
        .checkout(vec![CheckoutItem {
            barcode: "5012345678900".to_string(),
            quantity: 2,
        }])
        .await
        .unwrap();

    assert_eq!(receipt.total, Money::from_cents(1800));
    assert!(!receipt.qr_code.is_empty());
    assert_eq!(api.get_by_barcode("5012345678900").await.unwrap().stock, 3);

    let history = api.history(10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].reference, receipt.reference);
}

#[tokio::test]
async fn test_unreachable_server_is_transient() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = ApiClient::new(&format!("http://{addr}"), Duration::from_millis(500)).unwrap();
    assert!(api.health().await.unwrap_err().is_transient());
}

#[tokio::test]
async fn test_poller_reports_latest_and_stops() {
    let api = client().await;
    let (mut events, control, handle) = Poller::spawn(api.clone(), Duration::from_millis(20));

    api.register("036000291452", &ProductOverrides::default())
        .await
        .unwrap();

    let event = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Some(PollEvent::Latest(product)) = events.recv().await {
                return product;
            }
        }
    })
    .await
    .unwrap();
    assert_eq!(event.barcode, "036000291452");

    control.send_replace(PollerControl::Pause);
    drop(control);
    drop(events);
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_paused_poller_stays_quiet_until_resumed() {
    let api = client().await;
    let interval = Duration::from_millis(20);
    let (mut events, control, handle) = Poller::spawn(api.clone(), interval);

    control.send_replace(PollerControl::Pause);
    // Let any poll that started before the pause finish against the empty catalog
    tokio::time::sleep(interval * 3).await;

    api.register("036000291452", &ProductOverrides::default())
        .await
        .unwrap();

    let quiet = tokio::time::timeout(interval * 10, async {
        loop {
            if let Some(PollEvent::Latest(product)) = events.recv().await {
                return product;
            }
        }
    })
    .await;
    assert!(quiet.is_err(), "paused poller reported {:?}", quiet.ok());

    control.send_replace(PollerControl::Run);
    let resumed = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Some(PollEvent::Latest(product)) = events.recv().await {
                return product;
            }
        }
    })
    .await
    .unwrap();
    assert_eq!(resumed.barcode, "036000291452");

    drop(control);
    drop(events);
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_console_prices_scan_and_checks_out() {
    let addr = spawn_server().await;
    let receipt_dir = std::env::temp_dir().join(format!("grocer-console-it-{}", addr.port()));
    let config = ConsoleConfig {
        server_url: format!("http://{addr}"),
        receipt_dir: receipt_dir.clone(),
        ..ConsoleConfig::default()
    };
    let api = ApiClient::new(&config.server_url, config.http_timeout).unwrap();
    let (control, control_rx) = watch::channel(PollerControl::Run);
    let mut console = Console::new(api.clone(), config, ConsoleState::new(), control);

    // A phone scan registers an unpriced product; the poller reports it
    let scanned = api
        .register("5012345678900", &ProductOverrides::default())
        .await
        .unwrap();
    assert!(console.handle_event(PollEvent::Latest(scanned)));
    console.sync_poller();
    assert_eq!(*control_rx.borrow(), PollerControl::Pause);

    for answer in ["Oat Milk", "", "10", "10", "5", "y"] {
        console.handle_line(answer).await;
    }
    console.sync_poller();
    assert_eq!(*control_rx.borrow(), PollerControl::Run);
    assert_eq!(console.state().cart().total(), Money::from_cents(900));

    let stored = api.get_by_barcode("5012345678900").await.unwrap();
    assert_eq!(stored.sell_price, Money::from_cents(1000));
    assert_eq!(stored.stock, 5);

    console.handle_line("checkout").await;
    assert!(console.state().cart().is_empty());
    assert_eq!(api.get_by_barcode("5012345678900").await.unwrap().stock, 4);

    let history = api.history(1).await.unwrap();
    let saved = receipt_dir.join(format!("receipt-{}.png", history[0].reference));
    assert!(saved.exists());
    let _ = std::fs::remove_dir_all(&receipt_dir);
}
