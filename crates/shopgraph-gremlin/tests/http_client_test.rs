//! HttpClient against an in-process fake Gremlin HTTP endpoint

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Router,
};
use serde_json::{json, Value};
use shopgraph_gremlin::traversal::g;
use shopgraph_gremlin::{Credentials, GremlinClient, GremlinError, HttpClient, Script};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Clone, Default)]
struct Recorded {
    bodies: Arc<Mutex<Vec<Value>>>,
    auth: Arc<Mutex<Vec<String>>>,
}

async fn gremlin_handler(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if let Some(auth) = headers.get("authorization").and_then(|h| h.to_str().ok()) {
        recorded.auth.lock().await.push(auth.to_string());
    }
    let script = body["gremlin"].as_str().unwrap_or_default().to_string();
    recorded.bodies.lock().await.push(body);

    if script.contains("broken") {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "No such property: broken" })),
        )
            .into_response();
    }

    let data = if script.ends_with("count()") {
        json!({"@type": "g:List", "@value": [{"@type": "g:Int64", "@value": 11}]})
    } else {
        json!({
            "@type": "g:List",
            "@value": [{
                "@type": "g:Map",
                "@value": [
                    "name", {"@type": "g:List", "@value": ["Laptop"]},
                    "price", {"@type": "g:List", "@value": [{"@type": "g:Double", "@value": 999.99}]}
                ]
            }]
        })
    };

    Json(json!({
        "requestId": "2d62161b-9544-4f39-af44-62ec49f9a595",
        "status": { "message": "", "code": 200, "attributes": {} },
        "result": { "data": data, "meta": {} }
    }))
    .into_response()
}

async fn spawn_fake_server() -> (String, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/gremlin", post(gremlin_handler))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/gremlin", addr), recorded)
}

#[tokio::test]
async fn test_submit_posts_script_and_bindings() {
    let (url, recorded) = spawn_fake_server().await;
    let client = HttpClient::new(&url, Duration::from_secs(5), None).unwrap();

    let script = g().v().has_labeled("user", "userId", "user1").count().build();
    let values = client.submit(&script).await.unwrap();
    assert_eq!(values, vec![json!(11)]);

    let bodies = recorded.bodies.lock().await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["gremlin"], "g.V().has(_0, _1, _2).count()");
    assert_eq!(bodies[0]["bindings"]["_2"], "user1");
}

#[tokio::test]
async fn test_rows_are_normalized_and_flattened() {
    let (url, _recorded) = spawn_fake_server().await;
    let client = HttpClient::new(&url, Duration::from_secs(5), None).unwrap();

    let rows = client
        .rows(&Script::new("g.V().hasLabel('product').valueMap('name','price')"))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Laptop");
    assert_eq!(rows[0]["price"], json!(999.99));
}

#[tokio::test]
async fn test_server_error_carries_message() {
    let (url, _recorded) = spawn_fake_server().await;
    let client = HttpClient::new(&url, Duration::from_secs(5), None).unwrap();

    let err = client.submit(&Script::new("g.V().broken()")).await.unwrap_err();
    match err {
        GremlinError::Server { code, message } => {
            assert_eq!(code, 500);
            assert!(message.contains("broken"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_basic_auth_is_sent() {
    let (url, recorded) = spawn_fake_server().await;
    let creds = Credentials {
        username: "stephen".to_string(),
        password: "password".to_string(),
    };
    let client = HttpClient::new(&url, Duration::from_secs(5), Some(creds)).unwrap();

    client.ping().await.unwrap();

    let auth = recorded.auth.lock().await;
    assert_eq!(auth.len(), 1);
    assert!(auth[0].starts_with("Basic "));
}

#[tokio::test]
async fn test_unreachable_host_is_an_error() {
    // Port 9 (discard) is never a Gremlin server
    let client = HttpClient::new("http://127.0.0.1:9/gremlin", Duration::from_secs(2), None).unwrap();
    assert!(client.ping().await.is_err());
}
