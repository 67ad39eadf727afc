//! Integration tests for the reqwest transport against a local server.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;
use webcrawler_core::{CrawlerSettings, Credentials, DelayPolicy};
use webcrawler_fetch::{Content, Crawler, FetchError, HttpTransport, Transport};

/// Serves one canned response per connection, returning the raw requests.
async fn serve(responses: Vec<String>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for response in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0_u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            requests.push(String::from_utf8_lossy(&request).into_owned());
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        }
        requests
    });

    (format!("http://{addr}"), handle)
}

fn response(status_line: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut out = format!("HTTP/1.1 {status_line}\r\n");
    for (name, value) in headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    ));
    out
}

fn settings() -> CrawlerSettings {
    CrawlerSettings::new().with_delays(DelayPolicy::none().with_timeout(Duration::from_secs(5)))
}

#[tokio::test]
async fn test_transport_does_not_follow_redirects() {
    let (base, server) = serve(vec![response(
        "302 Found",
        &[("Location", "/next")],
        "",
    )])
    .await;
    let transport = HttpTransport::new(&settings()).unwrap();

    let target = Url::parse(&format!("{base}/old")).unwrap();
    let raw = transport.send(&target, None).await.unwrap();

    assert_eq!(raw.status, StatusCode::FOUND);
    assert_eq!(raw.header_str(&header::LOCATION), Some("/next"));
    assert_eq!(server.await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_transport_sends_basic_auth_only_when_asked() {
    let (base, server) = serve(vec![
        response("200 OK", &[], "anonymous"),
        response("200 OK", &[], "authenticated"),
    ])
    .await;
    let transport = HttpTransport::new(&settings()).unwrap();
    let target = Url::parse(&format!("{base}/private")).unwrap();
    let credentials = Credentials::new("alice", "pw");

    transport.send(&target, None).await.unwrap();
    let raw = transport.send(&target, Some(&credentials)).await.unwrap();
    assert_eq!(raw.body, b"authenticated");

    let requests = server.await.unwrap();
    assert!(!requests[0].to_lowercase().contains("authorization:"));
    assert!(requests[1].to_lowercase().contains("authorization: basic "));
    assert!(requests[1].contains("YWxpY2U6cHc="));
}

#[tokio::test]
async fn test_transport_sends_user_agent() {
    let (base, server) = serve(vec![response("200 OK", &[], "")]).await;
    let mut settings = settings();
    settings.user_agent = "crawler-test/1.0".to_string();
    let transport = HttpTransport::new(&settings).unwrap();

    transport
        .send(&Url::parse(&base).unwrap(), None)
        .await
        .unwrap();

    let requests = server.await.unwrap();
    assert!(requests[0].contains("crawler-test/1.0"));
}

#[tokio::test]
async fn test_crawler_follows_redirect_and_decodes() {
    let (base, server) = serve(vec![
        response("301 Moved Permanently", &[("Location", "/data.csv")], ""),
        response("200 OK", &[("Content-Type", "text/csv")], "a,b\n1,2"),
    ])
    .await;
    let crawler = Crawler::new(settings()).unwrap();

    let decoded = crawler.get(&format!("{base}/old")).await.unwrap();

    match decoded.into_content() {
        Some(Content::Table(rows)) => assert_eq!(rows, vec![vec!["a", "b"], vec!["1", "2"]]),
        other => panic!("unexpected {other:?}"),
    }
    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("GET /old "));
    assert!(requests[1].starts_with("GET /data.csv "));
}

#[tokio::test]
async fn test_crawler_reports_unresolvable_status() {
    let (base, _server) = serve(vec![response("503 Service Unavailable", &[], "down")]).await;
    let crawler = Crawler::new(settings()).unwrap();

    let err = crawler.get(&base).await.unwrap_err();

    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_refused_connection_is_connection_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let crawler = Crawler::new(settings()).unwrap();
    let err = crawler.get(&format!("http://{addr}/")).await.unwrap_err();

    assert!(matches!(err, FetchError::Connection(_)));
}
