mod common;

use std::sync::Arc;
use std::time::Duration;

use common::MockAdapter;
use v2g::can::{AsyncCanAdapter, Identifier};
use v2g::polling::spawn_polling;
use v2g::profile::PollingRequest;
use v2g::vehicles;

#[tokio::test]
#[serial_test::serial]
async fn requests_are_replayed() {
    let mock = MockAdapter::new();
    let sent = mock.sent();
    let adapter = Arc::new(AsyncCanAdapter::new(mock));

    let requests = vehicles::id3_uds().polling_requests;
    let handle = spawn_polling(adapter.clone(), 0, &requests).unwrap();
    assert_eq!(handle.len(), requests.len());

    tokio::time::sleep(Duration::from_millis(500)).await;

    let sent = sent.lock().unwrap().clone();
    for request in &requests {
        assert!(sent.iter().any(|f| f.id == request.id && f.data == request.data));
    }

    // 30 ms steering request against a 300 ms button request
    let count = |request: &PollingRequest| sent.iter().filter(|f| f.data == request.data).count();
    let (steering, buttons) = (&requests[3], &requests[4]);
    assert_eq!(steering.id, Identifier::Standard(0x712));
    assert!(count(steering) > 2 * count(buttons));
}

#[tokio::test]
#[serial_test::serial]
async fn dropping_the_handle_stops_polling() {
    let mock = MockAdapter::new();
    let sent = mock.sent();
    let adapter = Arc::new(AsyncCanAdapter::new(mock));

    let handle = spawn_polling(adapter.clone(), 0, &vehicles::glc_220d().polling_requests).unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    drop(handle);

    // Let frames already handed to the adapter drain
    tokio::time::sleep(Duration::from_millis(50)).await;
    let before = sent.lock().unwrap().len();
    assert!(before > 0);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(sent.lock().unwrap().len(), before);
}

#[tokio::test]
#[serial_test::serial]
async fn zero_interval_is_skipped() {
    let adapter = Arc::new(AsyncCanAdapter::new(MockAdapter::new()));
    let request = PollingRequest::read_data_by_identifier(0x70c, 0x4fe4, 0x55, Duration::ZERO);

    let handle = spawn_polling(adapter, 0, &[request]).unwrap();
    assert!(handle.is_empty());
}

#[tokio::test]
#[serial_test::serial]
async fn keeps_polling_when_sending_fails() {
    let adapter = Arc::new(AsyncCanAdapter::new(MockAdapter::new().failing()));

    let handle = spawn_polling(adapter, 0, &vehicles::id3_uds().polling_requests).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(handle.len(), 7);
    handle.stop();
}

#[tokio::test]
#[serial_test::serial]
async fn invalid_request_starts_nothing() {
    let mock = MockAdapter::new();
    let sent = mock.sent();
    let adapter = Arc::new(AsyncCanAdapter::new(mock));

    let good = PollingRequest::read_data_by_identifier(0x70c, 0x4fe4, 0x55, Duration::from_millis(20));
    let bad = PollingRequest::new(Identifier::Standard(0x800), good.data, Duration::from_millis(20));

    let result = spawn_polling(adapter, 0, &[good, bad]);
    assert_eq!(result.unwrap_err(), v2g::Error::MalformedFrame);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(sent.lock().unwrap().is_empty());
}
