use super::*;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::{collections::HashMap, sync::Arc};
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

type FieldTx = Arc<Mutex<Option<oneshot::Sender<HashMap<String, String>>>>>;

async fn handle_predict(State(tx): State<FieldTx>, mut multipart: Multipart) -> Json<serde_json::Value> {
    let mut fields = HashMap::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await.unwrap_or_default();
        fields.insert(name, value);
    }
    if let Some(tx) = tx.lock().await.take() {
        let _ = tx.send(fields);
    }
    Json(serde_json::json!({ "estimated_price": 83.2 }))
}

async fn serve(app: Router) -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

async fn spawn_predict_server() -> Result<(String, oneshot::Receiver<HashMap<String, String>>)> {
    let (tx, rx) = oneshot::channel();
    let app = Router::new()
        .route(PREDICT_PATH, post(handle_predict))
        .with_state(Arc::new(Mutex::new(Some(tx))));
    Ok((serve(app).await?, rx))
}

fn sample_request() -> EstimateRequest {
    EstimateRequest {
        total_sqft: 1000.0,
        bhk: 3,
        bath: 2,
        location: "1st Phase JP Nagar".to_string(),
    }
}

#[tokio::test]
async fn estimate_posts_multipart_fields_and_decodes_price() {
    let (server_url, fields_rx) = spawn_predict_server().await.expect("spawn server");
    let client = HttpPriceClient::new(server_url);

    let response = client
        .estimate_price(&sample_request())
        .await
        .expect("estimate");
    assert_eq!(response, EstimateResponse::price(83.2));

    let fields = fields_rx.await.expect("fields");
    assert_eq!(fields.get("total_sqft").map(String::as_str), Some("1000"));
    assert_eq!(fields.get("bhk").map(String::as_str), Some("3"));
    assert_eq!(fields.get("bath").map(String::as_str), Some("2"));
    assert_eq!(
        fields.get("location").map(String::as_str),
        Some("1st Phase JP Nagar")
    );
}

#[tokio::test]
async fn non_success_status_is_reported_with_code() {
    let app = Router::new().route(
        PREDICT_PATH,
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "Invalid input parameters", "estimated_price": "Error" })),
            )
        }),
    );
    let client = HttpPriceClient::new(serve(app).await.expect("spawn server"));

    let err = client
        .estimate_price(&sample_request())
        .await
        .expect_err("must fail");
    assert_eq!(err, FetchError::Status(400));
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let app = Router::new().route(PREDICT_PATH, post(|| async { "<html>oops</html>".into_response() }));
    let client = HttpPriceClient::new(serve(app).await.expect("spawn server"));

    let err = client
        .estimate_price(&sample_request())
        .await
        .expect_err("must fail");
    assert!(matches!(err, FetchError::Decode(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn wrong_json_shape_is_distinguished_from_transport_failure() {
    let app = Router::new()
        .route(PREDICT_PATH, post(|| async { Json(serde_json::json!([1, 2, 3])) }))
        .route(
            LOCATIONS_PATH,
            get(|| async { Json(serde_json::json!({ "locations": "Whitefield" })) }),
        );
    let client = HttpPriceClient::new(serve(app).await.expect("spawn server"));

    let err = client
        .estimate_price(&sample_request())
        .await
        .expect_err("must fail");
    assert!(matches!(err, FetchError::UnexpectedShape(_)), "unexpected error: {err:?}");

    let err = client.location_names().await.expect_err("must fail");
    assert!(matches!(err, FetchError::UnexpectedShape(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn location_names_are_decoded_in_order() {
    let app = Router::new().route(
        LOCATIONS_PATH,
        get(|| async { Json(serde_json::json!({ "locations": ["Whitefield", "HSR Layout"] })) }),
    );
    let client = HttpPriceClient::new(serve(app).await.expect("spawn server"));

    let response = client.location_names().await.expect("locations");
    assert_eq!(response.locations, vec!["Whitefield", "HSR Layout"]);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = HttpPriceClient::new(format!("http://{addr}"));
    let err = client.location_names().await.expect_err("must fail");
    assert!(matches!(err, FetchError::Transport(_)), "unexpected error: {err:?}");
}

#[test]
fn client_from_settings_uses_normalized_url() {
    let settings = ClientSettings {
        server_url: "http://127.0.0.1:5000/".to_string(),
    };
    let client = HttpPriceClient::from_settings(&settings).expect("client");
    assert_eq!(client.server_url(), "http://127.0.0.1:5000");
}
