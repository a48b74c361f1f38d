//! Client behavior against an in-process service double.

use std::sync::{Arc, Mutex};

use almanac_client::{AnalysisClient, Endpoint, ServiceError, WorkState};
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use url::Url;

#[derive(Clone, Default)]
struct Recorded {
	texts: Arc<Mutex<Vec<String>>>,
	content_types: Arc<Mutex<Vec<String>>>,
}

impl Recorded {
	fn record(&self, headers: &HeaderMap, body: &str) -> String {
		let text = String::from_utf8(STANDARD.decode(body).expect("base64 body")).expect("utf8 body");
		self.texts.lock().unwrap().push(text.clone());
		if let Some(ct) = headers.get("content-type") {
			self.content_types.lock().unwrap().push(ct.to_str().unwrap().to_owned());
		}
		text
	}
}

async fn format(State(rec): State<Recorded>, headers: HeaderMap, body: String) -> String {
	let text = rec.record(&headers, &body);
	format!("0,{},cat\r\nbad line\n", text.chars().count())
}

async fn folding(State(rec): State<Recorded>, headers: HeaderMap, body: String) -> String {
	rec.record(&headers, &body);
	"0-3\n".to_owned()
}

async fn preview(State(rec): State<Recorded>, headers: HeaderMap, body: String) -> String {
	rec.record(&headers, &body);
	r#"{"today":[],"week":[],"overview":{"categories":[{"name":"_none","moments":[{"name":"A","workState":"inProgress","docCoords":{"lineNumber":2}}]}]},"calendar":null}"#.to_owned()
}

async fn ok() -> StatusCode {
	StatusCode::OK
}

async fn broken() -> StatusCode {
	StatusCode::INTERNAL_SERVER_ERROR
}

async fn empty(State(rec): State<Recorded>, headers: HeaderMap, body: String) -> String {
	rec.record(&headers, &body);
	String::new()
}

async fn spawn_service(router: Router) -> Url {
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	tokio::spawn(async move {
		axum::serve(listener, router).await.unwrap();
	});
	Url::parse(&format!("http://{addr}")).unwrap()
}

fn healthy_router(rec: Recorded) -> Router {
	Router::new()
		.route("/format", post(format))
		.route("/folding", post(folding))
		.route("/preview", post(preview))
		.route("/clean", post(ok))
		.route("/trash", post(ok))
		.with_state(rec)
}

#[tokio::test]
async fn test_format_sends_base64_text_and_splits_lines() {
	let rec = Recorded::default();
	let client = AnalysisClient::new(spawn_service(healthy_router(rec.clone())).await);

	let lines = client.format("work:\n- [ ] ship it\n").await.unwrap();

	assert_eq!(lines, vec!["0,20,cat", "bad line", ""]);
	assert_eq!(rec.texts.lock().unwrap().as_slice(), ["work:\n- [ ] ship it\n"]);
	assert_eq!(rec.content_types.lock().unwrap().as_slice(), ["text/plain"]);
}

#[tokio::test]
async fn test_every_call_resends_full_text() {
	let rec = Recorded::default();
	let client = AnalysisClient::new(spawn_service(healthy_router(rec.clone())).await);

	client.fold("- [ ] a").await.unwrap();
	client.fold("- [ ] a").await.unwrap();

	assert_eq!(rec.texts.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_preview_decodes_payload() {
	let rec = Recorded::default();
	let client = AnalysisClient::new(spawn_service(healthy_router(rec)).await);

	let payload = client.preview("- [ ] A").await.unwrap();

	let lane = &payload.overview.categories[0];
	assert!(lane.is_uncategorized());
	assert_eq!(lane.moments[0].work_state, WorkState::InProgress);
	assert!(payload.calendar.is_empty());
}

#[tokio::test]
async fn test_clean_and_trash_succeed_on_200() {
	let client = AnalysisClient::new(spawn_service(healthy_router(Recorded::default())).await);

	client.clean().await.unwrap();
	client.trash().await.unwrap();
}

#[tokio::test]
async fn test_non_200_fails_with_status() {
	let router = Router::new().route("/format", post(broken)).route("/clean", post(broken));
	let client = AnalysisClient::new(spawn_service(router).await);

	let err = client.format("x").await.unwrap_err();
	assert!(matches!(err, ServiceError::Status { endpoint: Endpoint::Format, status: 500 }));

	let err = client.clean().await.unwrap_err();
	assert_eq!(err.status(), Some(500));
	assert_eq!(err.endpoint(), Endpoint::Clean);
}

#[tokio::test]
async fn test_empty_body_fails_for_line_endpoints() {
	let router = Router::new()
		.route("/format", post(empty))
		.route("/folding", post(empty))
		.with_state(Recorded::default());
	let client = AnalysisClient::new(spawn_service(router).await);

	assert!(matches!(client.format("x").await, Err(ServiceError::EmptyBody { .. })));
	assert!(matches!(client.fold("x").await, Err(ServiceError::EmptyBody { .. })));
}

#[tokio::test]
async fn test_unreachable_service_is_a_transport_error() {
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	drop(listener);

	let client = AnalysisClient::new(Url::parse(&format!("http://{addr}")).unwrap());
	let err = client.trash().await.unwrap_err();

	assert!(matches!(err, ServiceError::Transport { endpoint: Endpoint::Trash, .. }));
	assert_eq!(err.status(), None);
}
