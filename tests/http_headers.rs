use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::time::Duration;
use webrequest::RequestBuilder;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_default_user_agent_sent() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header("User-Agent", "Android"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let body = RequestBuilder::new()
        .get()
        .target_url(format!("{}/ua", server.uri()))
        .expect("url")
        .send()
        .await
        .expect("request should succeed");
    assert_eq!(body, "ok");
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_custom_headers_sent() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/headers"))
        .and(header("User-Agent", "webrequest-tests"))
        .and(header("X-Test-Header", "webrequest"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let body = RequestBuilder::new()
        .get()
        .target_url(format!("{}/headers", server.uri()))
        .and_then(|b| b.with_user_agent("webrequest-tests"))
        .and_then(|b| b.with_header("X-Test-Header", "webrequest"))
        .expect("builder")
        .send()
        .await
        .expect("request should succeed");
    assert_eq!(body, "ok");

    let requests = server.received_requests().await.expect("requests");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("accept-encoding").is_none());
}

/// Serves one canned response and hands back the raw request head.
fn capture_one_request(response: &'static str) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let url = format!("http://{}/capture", listener.local_addr().expect("addr"));
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let read = stream.read(&mut buf).expect("read");
            if read == 0 {
                break;
            }
            head.extend_from_slice(&buf[..read]);
        }
        stream.write_all(response.as_bytes()).expect("write");
        tx.send(String::from_utf8_lossy(&head).into_owned())
            .expect("send");
    });
    (url, rx)
}

fn count_header(head: &str, name: &str) -> usize {
    head.lines()
        .filter(|line| {
            line.split_once(':')
                .map(|(key, _)| key.trim().eq_ignore_ascii_case(name))
                .unwrap_or(false)
        })
        .count()
}

#[cfg_attr(miri, ignore)]
#[test]
fn test_builtin_headers_sent_once() {
    if !can_bind_localhost() {
        return;
    }

    let (url, rx) = capture_one_request(
        "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
    );

    let body = RequestBuilder::new()
        .get()
        .target_url(url)
        .and_then(|b| b.with_header("User-Agent", "custom"))
        .and_then(|b| b.with_header("Accept-Encoding", "br"))
        .expect("builder")
        .with_gzip(true)
        .execute_sync()
        .expect("prepared");
    assert_eq!(body.as_deref(), Some("ok"));

    let head = rx.recv_timeout(Duration::from_secs(10)).expect("request head");
    assert_eq!(
        (
            count_header(&head, "user-agent"),
            count_header(&head, "accept-encoding")
        ),
        (1, 1)
    );
    assert!(head.to_ascii_lowercase().contains("user-agent: android"));
    assert!(head.to_ascii_lowercase().contains("accept-encoding: gzip"));
}
