//! Exercise every client operation against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `BlockingClient`
//! over real HTTP through `UreqTransport`. Validates that routing, headers,
//! query encoding and status classification line up with an actual server.

use chrono::NaiveDate;
use pms_core::{ApiError, BlockingClient, ClientConfig, RateEntry, Weekday};

fn start_server() -> String {
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
            mock_server::run(listener, mock_server::app()).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn client(base_url: &str) -> BlockingClient {
    BlockingClient::new(ClientConfig::new(base_url, mock_server::DEFAULT_API_KEY))
}

#[test]
fn read_endpoints() {
    let base_url = start_server();
    let client = client(&base_url);

    let account = client.get_account_information().unwrap();
    assert_eq!(account["id"], "acc_1");

    let ids = client.get_listing_ids().unwrap();
    assert_eq!(ids, serde_json::json!(["lst_1001", "lst_1002"]));

    let listing = client.get_listing_by_id("lst_1001").unwrap();
    assert_eq!(listing["bedrooms"], 2);

    let calendar = client.get_calendar_by_listing_id("lst_1001").unwrap();
    assert_eq!(calendar.as_array().unwrap().len(), 14);

    let reservations = client.get_reservations_by_listing_id("lst_1001", None).unwrap();
    assert_eq!(reservations.as_array().unwrap().len(), 2);

    let reservation = client.get_reservation("res_5001").unwrap();
    assert_eq!(reservation["listingId"], "lst_1001");
}

#[test]
fn checkin_filter_is_sent_as_query() {
    let base_url = start_server();
    let client = client(&base_url);

    let start = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
    let reservations = client
        .get_reservations_by_listing_id("lst_1001", Some(start))
        .unwrap();
    let ids: Vec<&str> = reservations
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["res_5002"]);
}

#[test]
fn not_found_is_distinguished_by_resource() {
    let base_url = start_server();
    let client = client(&base_url);

    let err = client.get_listing_by_id("invalid-id").unwrap_err();
    assert!(matches!(err, ApiError::PropertyNotFound { ref listing_id, .. } if listing_id == "invalid-id"));

    let err = client.get_calendar_by_listing_id("invalid-id").unwrap_err();
    assert!(matches!(err, ApiError::PropertyNotFound { .. }));

    let err = client.get_reservations_by_listing_id("invalid-id", None).unwrap_err();
    assert!(matches!(err, ApiError::PropertyNotFound { .. }));

    let err = client.get_reservation("invalid-id").unwrap_err();
    assert!(matches!(err, ApiError::ReservationNotFound { .. }));
}

#[test]
fn invalid_key_is_rejected() {
    let base_url = start_server();
    let client = BlockingClient::new(ClientConfig::new(&base_url, "invalid-api-key"));

    let err = client.get_account_information().unwrap_err();
    assert!(matches!(err, ApiError::InvalidCredentials { status: 401, .. }));
}

#[test]
fn post_rates_round_trip() {
    let base_url = start_server();
    let client = client(&base_url);

    let tomorrow = chrono::Local::now().date_naive() + chrono::Duration::days(1);
    let rates = vec![RateEntry {
        date: tomorrow,
        daily_price: 296.0,
        min_nights: 3,
        checkin_days: vec![Weekday::Saturday],
        checkout_days: vec![Weekday::Saturday],
        extra_guests: None,
        extra_guest_fee: None,
    }];
    let created = client.post_rates("lst_1001", &rates).unwrap();
    assert!(created.is_empty());

    let calendar = client.get_calendar_by_listing_id("lst_1001").unwrap();
    let posted = calendar
        .as_array()
        .unwrap()
        .iter()
        .find(|day| day["date"] == tomorrow.to_string())
        .unwrap();
    assert_eq!(posted["minNights"], 3);

    let err = client.post_rates("invalid-id", &[]).unwrap_err();
    assert!(matches!(err, ApiError::PropertyNotFound { .. }));
}

#[test]
fn unreachable_server_is_a_transport_error() {
    // Bind then drop to get a port nobody is listening on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let client = client(&format!("http://{addr}"));

    let err = client.get_account_information().unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

/// One-shot HTTP/1.1 server that answers with a zlib-compressed body and
/// hands back the raw request it saw.
fn serve_deflate_once(body: &str) -> (String, std::sync::mpsc::Receiver<String>) {
    use std::io::{Read, Write};

    let mut encoder =
        flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(body.as_bytes()).unwrap();
    let compressed = encoder.finish().unwrap();

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = std::sync::mpsc::channel();

    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        tx.send(String::from_utf8_lossy(&request).into_owned()).unwrap();

        let head = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-encoding: deflate\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
            compressed.len()
        );
        stream.write_all(head.as_bytes()).unwrap();
        stream.write_all(&compressed).unwrap();
        stream.flush().unwrap();
    });

    (format!("http://{addr}"), rx)
}

#[test]
fn deflate_encoded_response_is_decoded() {
    let (base_url, seen) = serve_deflate_once(r#"{"id":"acc_1","name":"Harbour Stays"}"#);
    let client = client(&base_url);

    let account = client.get_account_information().unwrap();
    assert_eq!(account["id"], "acc_1");

    let request = seen.recv().unwrap().to_ascii_lowercase();
    assert!(request.contains("accept-encoding: gzip, deflate"), "{request}");
}
