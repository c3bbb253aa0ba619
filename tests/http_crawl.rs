/*!
 * Integration test: crawl a fake node over HTTP
 */

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;

use dagdump::visited::VisitScope;
use dagdump::{Cid, Crawler, GraphClient, HttpGraphClient, MemorySink, RemoteQueryError};

type Routes = HashMap<String, (u16, String)>;

// Answer with the canned body keyed by "<endpoint> <arg>", or a 500
async fn answer(
    State(routes): State<Arc<Routes>>,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let endpoint = uri.path().trim_start_matches("/api/v0/");
    let arg = params.get("arg").map(String::as_str).unwrap_or_default();

    let (status, body) = routes
        .get(&format!("{} {}", endpoint, arg))
        .cloned()
        .unwrap_or((500, r#"{"Message":"not found","Code":0,"Type":"error"}"#.to_string()));

    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}

// Serve the routes on a background runtime and return the node address
fn spawn_node(routes: Routes) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let address = listener.local_addr().unwrap().to_string();

    let router = Router::new()
        .route("/api/v0/ls", post(answer))
        .route("/api/v0/files/stat", post(answer))
        .route("/api/v0/dag/get", post(answer))
        .with_state(Arc::new(routes));

    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, router).await.unwrap();
        });
    });

    address
}

fn routes() -> Routes {
    let mut routes = Routes::new();
    let mut add = |key: &str, body: &str| {
        routes.insert(key.to_string(), (200, body.to_string()));
    };

    add(
        "ls R",
        r#"{"Objects":[{"Hash":"R","Links":[
            {"Name":"D","Hash":"X","Size":100,"Type":1,"Target":""},
            {"Name":"F","Hash":"Y","Size":50,"Type":2,"Target":""},
            {"Name":"gone","Hash":"Z","Size":9,"Type":2,"Target":""}
        ]}]}"#,
    );
    add("ls X", r#"{"Objects":[{"Hash":"X","Links":[]}]}"#);
    add(
        "files/stat /ipfs/X",
        r#"{"Hash":"X","Size":0,"CumulativeSize":500,"Blocks":3,"Type":"directory"}"#,
    );
    add(
        "files/stat /ipfs/Y",
        r#"{"Hash":"Y","Size":50,"CumulativeSize":50,"Blocks":1,"Type":"file"}"#,
    );
    add(
        "dag/get /ipfs/X",
        r#"{"Data":{"/":{"bytes":"CAE"}},"Links":[{"Hash":{"/":"B1"},"Name":"","Tsize":300}]}"#,
    );
    add("dag/get /ipfs/B1", r#"{"/":{"bytes":"aGVsbG8="}}"#);
    add("dag/get /ipfs/Y", r#"{"Data":{"/":{"bytes":"CAIYMg"}},"Links":[]}"#);

    routes
}

fn client() -> HttpGraphClient {
    let address = spawn_node(routes());
    HttpGraphClient::new(&address, Some(Duration::from_secs(5))).unwrap()
}

#[test]
fn test_http_client_queries() {
    let client = client();

    let listing = client.list_children(&Cid::from("R")).unwrap();
    assert_eq!(listing.entries.len(), 3);

    let stat = client.stat_node(&Cid::from("X")).unwrap();
    assert_eq!(stat.cumulative_size, 500);
    assert_eq!(stat.blocks, 3);

    assert_eq!(client.get_dag_node(&Cid::from("X")).unwrap().num_links(), 1);

    match client.stat_node(&Cid::from("Z")) {
        Err(RemoteQueryError::Status { status, .. }) => assert_eq!(status, 500),
        other => panic!("expected status error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_http_crawl() {
    let client = client();
    let mut sink = MemorySink::new();

    let statistics = Crawler::new(client, VisitScope::PerView)
        .crawl(&Cid::from("R"), &mut sink)
        .unwrap();

    assert_eq!(sink.directories.len(), 1);
    assert_eq!(sink.directories[0].cid, Cid::from("X"));
    assert_eq!(sink.directories[0].cumulative_size, 500);
    assert_eq!(sink.directories[0].index_of_parent, 0);

    // Z fails its stat and leaves no trace
    assert_eq!(sink.files.len(), 1);
    assert_eq!(sink.files[0].cid, Cid::from("Y"));
    assert_eq!(sink.files[0].index, 2);

    let blocks: Vec<(String, String, String, usize, u64)> = sink
        .blocks
        .iter()
        .map(|row| {
            (
                row.cid.to_string(),
                row.parent_cid.to_string(),
                row.final_block_hash.to_string(),
                row.num_links,
                row.size,
            )
        })
        .collect();
    assert_eq!(
        blocks,
        vec![
            ("X".into(), "R".into(), "B1".into(), 1, 300),
            ("B1".into(), "X".into(), "B1".into(), 0, 0),
            ("Y".into(), "R".into(), "Y".into(), 0, 0),
        ]
    );

    assert_eq!(statistics.stats_failed, 1);
    assert_eq!(statistics.failures(), 1);
}
