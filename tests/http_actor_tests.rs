//! Real HTTP actor against a local stub server on 127.0.0.1.

use outreach::actor::{HttpActor, HttpActorConfig};
use outreach::utils::Credentials;
use outreach::{Actor, ActorError, Record, RunScope, SessionKind};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// What the stub answers for a path: status code and delay before answering.
type Route = fn(&str) -> (u16, Duration);

struct Stub {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Stub {
    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Raw requests received so far (head and body, lowercased).
    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn read_request(stream: &mut TcpStream) -> Option<(String, String)> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);
    let mut head = String::new();
    let mut content_length = 0;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).ok()? == 0 {
            return None;
        }
        if line == "\r\n" {
            break;
        }
        let lower = line.to_ascii_lowercase();
        if let Some(v) = lower.strip_prefix("content-length:") {
            content_length = v.trim().parse().unwrap_or(0);
        }
        head.push_str(&lower);
    }
    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).ok()?;
    let path = head.split_whitespace().nth(1)?.to_string();
    Some((path, format!("{head}\r\n{}", String::from_utf8_lossy(&body))))
}

fn handle(mut stream: TcpStream, route: Route, requests: Arc<Mutex<Vec<String>>>) {
    let Some((path, raw)) = read_request(&mut stream) else {
        return;
    };
    requests.lock().unwrap().push(raw);
    let (status, delay) = route(&path);
    thread::sleep(delay);
    let response = format!(
        "HTTP/1.1 {status} Stub\r\nSet-Cookie: session=abc123; Path=/\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
    );
    let _ = stream.write_all(response.as_bytes());
}

fn serve(route: Route) -> Stub {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let seen = Arc::clone(&seen);
            thread::spawn(move || handle(stream, route, seen));
        }
    });
    Stub { addr, requests }
}

fn routes(path: &str) -> (u16, Duration) {
    match path {
        "/login" => (200, Duration::ZERO),
        "/login-denied" => (401, Duration::ZERO),
        "/in/broken" => (500, Duration::ZERO),
        "/in/slow" => (200, Duration::from_secs(3)),
        _ => (200, Duration::ZERO),
    }
}

fn actor_for(stub: &Stub, login_path: &str) -> HttpActor {
    HttpActor::new(HttpActorConfig {
        login_url: stub.url(login_path),
        credentials: Credentials {
            username: "me".into(),
            password: "hunter2".into(),
        },
        followup_message: "Hi, thanks for connecting!".into(),
    })
    .unwrap()
}

fn record(stub: &Stub, id: &str, path: &str) -> Record {
    Record::new(0, id, format!("Lead {id}"), stub.url(path))
}

// --- authentication ---

#[test]
fn test_login_posts_form_credentials() {
    let stub = serve(routes);
    let actor = actor_for(&stub, "/login");
    assert_eq!(actor.session_kind(), SessionKind::Real);
    assert!(!actor.is_authenticated());

    assert_eq!(actor.authenticate(), Ok(()));
    assert!(actor.is_authenticated());
    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("post /login "));
    assert!(requests[0].contains("application/x-www-form-urlencoded"));
    assert!(requests[0].ends_with("username=me&password=hunter2"));
}

#[test]
fn test_login_rejected_status_is_authentication_error() {
    let stub = serve(routes);
    let actor = actor_for(&stub, "/login-denied");
    match actor.authenticate() {
        Err(ActorError::Authentication(msg)) => assert!(msg.contains("401"), "{msg}"),
        other => panic!("expected authentication error, got {other:?}"),
    }
    assert!(!actor.is_authenticated());
}

#[test]
fn test_login_unreachable_is_authentication_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let actor = HttpActor::new(HttpActorConfig {
        login_url: format!("http://{addr}/login"),
        credentials: Credentials {
            username: "me".into(),
            password: "hunter2".into(),
        },
        followup_message: "hello".into(),
    })
    .unwrap();
    assert!(matches!(
        actor.authenticate(),
        Err(ActorError::Authentication(_))
    ));
}

// --- per-record calls ---

#[test]
fn test_visit_sends_session_cookie() {
    let stub = serve(routes);
    let actor = actor_for(&stub, "/login");
    actor.authenticate().unwrap();

    let scope = RunScope::new().child(Duration::from_secs(5));
    assert_eq!(actor.process_one(&record(&stub, "1", "/in/a"), &scope), Ok(()));

    let requests = stub.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[1].starts_with("get /in/a "));
    assert!(requests[1].contains("session=abc123"));
}

#[test]
fn test_error_status_is_remote_failure() {
    let stub = serve(routes);
    let actor = actor_for(&stub, "/login");
    let scope = RunScope::new().child(Duration::from_secs(5));
    match actor.process_one(&record(&stub, "2", "/in/broken"), &scope) {
        Err(ActorError::Remote(msg)) => assert!(msg.contains("500"), "{msg}"),
        other => panic!("expected remote failure, got {other:?}"),
    }
}

#[test]
fn test_late_response_is_timeout() {
    let stub = serve(routes);
    let actor = actor_for(&stub, "/login");
    let timeout = Duration::from_millis(300);
    let scope = RunScope::new().child(timeout);

    let start = Instant::now();
    let result = actor.process_one(&record(&stub, "3", "/in/slow"), &scope);
    assert_eq!(result, Err(ActorError::Timeout(timeout)));
    assert!(start.elapsed() < Duration::from_secs(2), "took {:?}", start.elapsed());
}

#[test]
fn test_cancelled_scope_skips_request() {
    let stub = serve(routes);
    let actor = actor_for(&stub, "/login");
    let run = RunScope::new();
    let scope = run.child(Duration::from_secs(5));
    run.cancel();
    assert_eq!(
        actor.process_one(&record(&stub, "4", "/in/a"), &scope),
        Err(ActorError::Cancelled)
    );
    assert!(stub.requests().is_empty());
}

// --- follow-ups ---

#[test]
fn test_followups_land_in_outbox() {
    let stub = serve(routes);
    let actor = actor_for(&stub, "/login");
    actor.enqueue_followup(&record(&stub, "7", "/in/g"));
    actor.enqueue_followup(&record(&stub, "8", "/in/h"));

    let queued = actor.followups();
    assert_eq!(queued.len(), 2);
    assert_eq!(queued[0].record_id, "7");
    assert_eq!(queued[0].display_name, "Lead 7");
    assert_eq!(queued[1].message, "Hi, thanks for connecting!");
    assert!(stub.requests().is_empty());
}
