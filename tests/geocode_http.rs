//! End-to-end geocoding against a local fake Nominatim served by axum.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use mapdraw::geocode::{GeocodeConfig, GeocodeError, NominatimResolver, PlaceResolver};
use mapdraw::session::DrawMode;
use mapdraw::surface::{MapSurface, TileSource};
use mapdraw::view::DrawView;
use mapdraw::viewport::{LonLat, Viewport};
use serde_json::json;

#[derive(Clone, Default)]
struct Seen {
    requests: Arc<Mutex<Vec<(HashMap<String, String>, Option<String>)>>>,
}

impl Seen {
    fn take(&self) -> Vec<(HashMap<String, String>, Option<String>)> {
        std::mem::take(&mut *self.requests.lock().unwrap())
    }
}

async fn reverse(State(seen): State<Seen>, headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> Response {
    let agent = headers.get("user-agent").and_then(|v| v.to_str().ok()).map(str::to_string);
    let lat = params.get("lat").cloned().unwrap_or_default();
    seen.requests.lock().unwrap().push((params, agent));

    // The fake answers by latitude: equator → 500, far north → "unable to geocode", else Paris.
    match lat.parse::<f64>().unwrap_or(f64::NAN) {
        v if v.abs() < 1e-6 => (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response(),
        v if v > 80.0 => Json(json!({ "error": "Unable to geocode" })).into_response(),
        _ => Json(json!({ "place_id": 1, "display_name": "Paris, France" })).into_response(),
    }
}

async fn spawn_fake() -> (String, Seen) {
    let seen = Seen::default();
    let app = Router::new().route("/reverse", get(reverse)).with_state(seen.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/"), seen)
}

fn resolver(base_url: &str) -> NominatimResolver {
    let mut config = GeocodeConfig::default().with_base_url(base_url).unwrap();
    config.user_agent = "mapdraw-test/1".into();
    NominatimResolver::new(&config).unwrap()
}

#[tokio::test]
async fn resolves_display_name_and_sends_expected_query() {
    let (base, seen) = spawn_fake().await;
    let name = resolver(&base).resolve(2.3522, 48.8566).await.unwrap();
    assert_eq!(name, "Paris, France");

    let requests = seen.take();
    assert_eq!(requests.len(), 1);
    let (params, agent) = &requests[0];
    assert_eq!(params.get("format").map(String::as_str), Some("json"));
    assert_eq!(params.get("lat").map(String::as_str), Some("48.8566"));
    assert_eq!(params.get("lon").map(String::as_str), Some("2.3522"));
    assert_eq!(agent.as_deref(), Some("mapdraw-test/1"));
}

#[tokio::test]
async fn server_error_is_status_error() {
    let (base, _) = spawn_fake().await;
    let err = resolver(&base).resolve(10.0, 0.0).await.unwrap_err();
    assert_eq!(err, GeocodeError::Status { status: 500, body: "upstream exploded".into() });
}

#[tokio::test]
async fn nominatim_error_body_is_parse_error() {
    let (base, _) = spawn_fake().await;
    let err = resolver(&base).resolve(0.0, 85.0).await.unwrap_err();
    assert!(matches!(err, GeocodeError::Parse(ref m) if m.contains("Unable to geocode")), "{err:?}");
}

#[tokio::test]
async fn unreachable_service_is_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let err = resolver(&format!("http://{addr}")).resolve(2.0, 48.0).await.unwrap_err();
    assert_eq!(err.error_code(), "E_GEOCODE_REQUEST");
}

#[tokio::test]
async fn drawn_point_is_named_through_http() {
    let (base, seen) = spawn_fake().await;
    let paris = LonLat::new(2.3522, 48.8566);
    let surface = MapSurface::new(TileSource::default(), Viewport::centered_on(paris, 16.0, 800.0, 600.0));
    let mut view = DrawView::mount(surface, Arc::new(resolver(&base)));

    view.begin_draw(DrawMode::Point);
    let screen = view.to_screen(paris).unwrap();
    view.click(screen);
    view.settle().await;

    let result = view.display_state().result.unwrap();
    assert_eq!(result.summary, "Point added: Paris, France (2.3522, 48.8566)");
    assert_eq!(seen.take().len(), 1);
}

#[tokio::test]
async fn drawn_point_falls_back_to_coordinates_on_server_error() {
    let (base, _) = spawn_fake().await;
    let at = LonLat::new(10.0, 0.0);
    let surface = MapSurface::new(TileSource::default(), Viewport::centered_on(at, 16.0, 800.0, 600.0));
    let mut view = DrawView::mount(surface, Arc::new(resolver(&base)));

    view.begin_draw(DrawMode::Point);
    let screen = view.to_screen(at).unwrap();
    view.click(screen);
    view.settle().await;

    assert_eq!(view.display_state().result.unwrap().summary, "Point added: (10, 0)");
}
