use std::{net::SocketAddr, sync::Arc};

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use datebook_lib::{Error, HttpRemote, Meeting, MeetingId, Remote, SyncClient, WriteOutcome};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Stands in for the calendar endpoint: whatever was last posted is what gets served.
#[derive(Clone)]
struct Endpoint {
    body: Arc<Mutex<Value>>,
    posts: Arc<Mutex<Vec<Value>>>,
}

async fn read(State(endpoint): State<Endpoint>) -> Json<Value> {
    Json(endpoint.body.lock().clone())
}

async fn write(State(endpoint): State<Endpoint>, Json(body): Json<Value>) -> StatusCode {
    endpoint.posts.lock().push(body.clone());
    *endpoint.body.lock() = body;
    StatusCode::OK
}

async fn broken() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn serve(initial: Value) -> (SocketAddr, Endpoint) {
    let endpoint = Endpoint {
        body: Arc::new(Mutex::new(initial)),
        posts: Arc::new(Mutex::new(Vec::new())),
    };

    let app = Router::new()
        .route("/calendar", get(read).post(write))
        .route("/broken", get(broken).post(broken))
        .with_state(endpoint.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    (addr, endpoint)
}

fn standup() -> Meeting {
    Meeting {
        id: MeetingId(0),
        name: "Standup".into(),
        start_datetime: "2024-03-04T09:00:00Z".parse().unwrap(),
        end_datetime: "2024-03-04T09:15:00Z".parse().unwrap(),
    }
}

#[tokio::test]
async fn test_fetch_all() {
    let (addr, _) = serve(json!({
        "data": [{
            "id": 0,
            "name": "Standup",
            "startDatetime": "2024-03-04T09:00:00.000Z",
            "endDatetime": "2024-03-04T09:15:00.000Z",
            "editStartDate": "04/03/2024 09:00",
            "editEndDate": "04/03/2024 09:15",
        }]
    }))
    .await;
    let remote = HttpRemote::parse(&format!("http://{addr}/calendar")).unwrap();

    assert_eq!(remote.fetch_all().await.unwrap(), vec![standup()]);
}

#[tokio::test]
async fn test_replace_all_posts_envelope() {
    let (addr, endpoint) = serve(json!({ "data": [] })).await;
    let remote = HttpRemote::parse(&format!("http://{addr}/calendar")).unwrap();

    remote.replace_all(vec![standup()]).await.unwrap();

    let posts = endpoint.posts.lock().clone();
    assert_eq!(
        posts,
        vec![json!({
            "data": [{
                "id": 0,
                "name": "Standup",
                "startDatetime": "2024-03-04T09:00:00.000Z",
                "endDatetime": "2024-03-04T09:15:00.000Z",
            }]
        })]
    );
    assert_eq!(remote.fetch_all().await.unwrap(), vec![standup()]);
}

#[tokio::test]
async fn test_error_status() {
    let (addr, _) = serve(json!({ "data": [] })).await;
    let remote = HttpRemote::parse(&format!("http://{addr}/broken")).unwrap();

    assert!(matches!(
        remote.fetch_all().await,
        Err(Error::Status(status)) if status == StatusCode::INTERNAL_SERVER_ERROR
    ));

    let sync = SyncClient::new(remote);
    assert_eq!(
        sync.replace_all(vec![standup()]).await,
        WriteOutcome::Failed
    );
}

#[tokio::test]
async fn test_malformed_body() {
    let (addr, _) = serve(json!({ "meetings": [] })).await;
    let remote = HttpRemote::parse(&format!("http://{addr}/calendar")).unwrap();

    assert!(matches!(remote.fetch_all().await, Err(Error::Http(_))));
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let sync = SyncClient::new(HttpRemote::parse(&format!("http://{addr}/calendar")).unwrap());

    assert!(matches!(sync.fetch_all().await, Err(Error::Http(_))));
    assert_eq!(sync.replace_all(Vec::new()).await, WriteOutcome::Failed);
}

#[test]
fn test_endpoint() {
    let remote = HttpRemote::parse("http://localhost:8888/calendar").unwrap();

    assert_eq!(remote.endpoint().as_str(), "http://localhost:8888/calendar");
    assert_eq!(remote.endpoint().path(), "/calendar");
}

#[test]
fn test_bad_endpoint() {
    assert!(matches!(
        HttpRemote::parse("not a url"),
        Err(Error::Url(_))
    ));
}
