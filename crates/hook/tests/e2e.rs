use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use hookgate_core::Config;
use hookgate_hook::on_finish::{self, Message, NotifyError, NotifyOutcome};

struct Captured {
    request_line: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Captured {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// One-shot webhook endpoint answering every request with `status`.
fn webhook(status: u16) -> (String, mpsc::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/hook", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut headers = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((k, v)) = line.split_once(':') {
                headers.push((k.trim().to_string(), v.trim().to_string()));
            }
        }

        let len: usize = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
            .map_or(0, |(_, v)| v.parse().unwrap());
        let mut body = vec![0; len];
        reader.read_exact(&mut body).unwrap();

        let mut stream = reader.into_inner();
        write!(
            stream,
            "HTTP/1.1 {status} X\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
        )
        .unwrap();
        stream.flush().unwrap();

        let _ = tx.send(Captured {
            request_line: request_line.trim_end().to_string(),
            headers,
            body: String::from_utf8(body).unwrap(),
        });
    });

    (url, rx)
}

fn project_with_payload(payload: &str) -> (tempfile::TempDir, Config) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("payload.json"), payload).unwrap();
    let config = Config::new(dir.path());
    (dir, config)
}

#[test]
fn posts_summary_to_webhook() {
    let (url, rx) = webhook(200);
    let (_dir, config) = project_with_payload(r#"{"modifiedFiles": ["a.ts", "b.ts"]}"#);
    let config = config.with_webhook_url(Some(url));

    let outcome = on_finish::process(Some(Path::new("payload.json")), &config).unwrap();
    assert!(matches!(outcome, NotifyOutcome::Delivered(d) if d.status == 200));

    let req = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(req.request_line, "POST /hook HTTP/1.1");
    assert_eq!(req.header("content-type"), Some("application/json"));
    assert_eq!(
        req.body,
        r#"{"text":"Agent run complete.\nModified files:\n• a.ts\n• b.ts"}"#
    );
}

#[test]
fn empty_run_posts_none() {
    let (url, rx) = webhook(200);
    let (_dir, config) = project_with_payload("{}");
    let config = config.with_webhook_url(Some(url));

    on_finish::process(Some(Path::new("payload.json")), &config).unwrap();

    let req = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    let body: serde_json::Value = serde_json::from_str(&req.body).unwrap();
    assert_eq!(body["text"], "Agent run complete.\nModified files:\nNone");
}

#[test]
fn server_error_is_observable_but_not_fatal() {
    let (url, _rx) = webhook(500);
    let (_dir, config) = project_with_payload("{}");
    let config = config.with_webhook_url(Some(url));

    let outcome = on_finish::process(Some(Path::new("payload.json")), &config).unwrap();
    assert!(matches!(
        outcome,
        NotifyOutcome::Failed(NotifyError::Status(500))
    ));
}

#[test]
fn refused_connection_is_reported() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    drop(listener);

    let message = Message {
        text: "x".to_string(),
    };
    let err = on_finish::send_blocking(&url, &message, Duration::from_secs(2)).unwrap_err();
    assert!(matches!(err, NotifyError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn silent_webhook_times_out() {
    // Accepts the connection, never answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    let holder = tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    let message = Message {
        text: "x".to_string(),
    };
    let err = on_finish::send(&url, &message, Duration::from_millis(300))
        .await
        .unwrap_err();
    assert!(matches!(err, NotifyError::Timeout(_)), "got {err:?}");

    holder.abort();
}
