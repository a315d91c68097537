use anyhow::Result;
use tokio_test::assert_ok;
use whatsapp_service::clients::callmebot::WhatsAppClient;
use whatsapp_service::models::delivery::DeliveryResult;
use whatsapp_service::models::recipient::Role;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::{recipient, test_config, whatsapp_client};

/// Test: A 200 response delivers on the first attempt
#[tokio::test]
async fn test_send_success_single_attempt() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/whatsapp.php"))
        .and(query_param("phone", "201000000001"))
        .and(query_param("apikey", "key-201000000001"))
        .and(query_param("text", "مرحبا"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let config = test_config(&format!("{}/whatsapp.php", server.uri()), 2);
    let client = assert_ok!(WhatsAppClient::new(&config));

    let sent = client.send("201000000001", "key-201000000001", "مرحبا").await;

    assert!(sent);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);

    Ok(())
}

/// Test: A server error is retried and the retry can succeed
#[tokio::test]
async fn test_send_retries_on_server_error() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/whatsapp.php"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/whatsapp.php"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = whatsapp_client(&server.uri(), 2);
    let sent = client.send("201000000001", "key", "hello").await;

    assert!(sent, "Second attempt should succeed");
    assert_eq!(server.received_requests().await.unwrap().len(), 2);

    Ok(())
}

/// Test: Persistent failures stop after max_retries + 1 attempts
#[tokio::test]
async fn test_send_exhausts_retries() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/whatsapp.php"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = whatsapp_client(&server.uri(), 2);
    let sent = client.send("201000000001", "key", "hello").await;

    assert!(!sent);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);

    Ok(())
}

/// Test: Only HTTP 200 counts as delivered
#[tokio::test]
async fn test_send_requires_exact_200() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/whatsapp.php"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let client = whatsapp_client(&server.uri(), 0);
    let sent = client.send("201000000001", "key", "hello").await;

    assert!(!sent, "201 is not a delivery confirmation");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);

    Ok(())
}

/// Test: Missing parameters fail without touching the network
#[tokio::test]
async fn test_send_missing_params_makes_no_request() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = whatsapp_client(&server.uri(), 2);

    assert!(!client.send("", "key", "hello").await);
    assert!(!client.send("201000000001", "", "hello").await);
    assert!(!client.send("201000000001", "key", "").await);

    Ok(())
}

/// Test: Batch results come back in input order with per-recipient status
#[tokio::test]
async fn test_send_batch_order_and_partial_failure() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/whatsapp.php"))
        .and(query_param("phone", "201000000001"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/whatsapp.php"))
        .and(query_param("phone", "201000000002"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = whatsapp_client(&server.uri(), 0);
    let recipients = vec![
        recipient("201000000001", Role::Admin),
        recipient("201000000002", Role::Admin),
    ];

    let results = client.send_batch(&recipients, "hello").await;

    assert_eq!(
        results,
        vec![
            DeliveryResult {
                recipient: "201000000001".to_string(),
                success: true,
            },
            DeliveryResult {
                recipient: "201000000002".to_string(),
                success: false,
            },
        ]
    );

    Ok(())
}

/// Test: Recipients with missing credentials are recorded as failed, not sent
#[tokio::test]
async fn test_send_batch_skips_recipients_without_credentials() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/whatsapp.php"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut keyless = recipient("201000000002", Role::Admin);
    keyless.api_key = String::new();
    let recipients = vec![recipient("201000000001", Role::Admin), keyless];

    let client = whatsapp_client(&server.uri(), 0);
    let results = client.send_batch(&recipients, "hello").await;

    assert_eq!(results.len(), 2);
    assert!(results[0].success);
    assert!(!results[1].success);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "Keyless recipient must not be attempted");

    Ok(())
}

/// Test: An empty batch sends nothing and returns nothing
#[tokio::test]
async fn test_send_batch_empty_input() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = whatsapp_client(&server.uri(), 0);
    let results = client.send_batch(&[], "hello").await;

    assert!(results.is_empty());

    Ok(())
}

/// Test: Arabic message text survives URL encoding intact
#[tokio::test]
async fn test_arabic_text_survives_query_encoding() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/whatsapp.php"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let message = "🆕 *مشروع جديد*\n\n📌 المشروع: تصميم بروشور";
    let client = whatsapp_client(&server.uri(), 0);
    assert!(client.send("201000000001", "key", message).await);

    let requests = server.received_requests().await.unwrap();
    let text = requests[0]
        .url
        .query_pairs()
        .find(|(key, _)| key == "text")
        .map(|(_, value)| value.to_string())
        .unwrap();
    assert_eq!(text, message);

    Ok(())
}
