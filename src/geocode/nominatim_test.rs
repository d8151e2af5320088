use super::*;

fn resolver(base: &str) -> NominatimResolver {
    let cfg = GeocodeConfig::default().with_base_url(base).unwrap();
    NominatimResolver::new(&cfg).unwrap()
}

// ===== url =====

#[test]
fn reverse_url_carries_format_lat_lon() {
    let r = resolver("https://nominatim.example.test/");
    assert_eq!(
        r.reverse_url(2.3522, 48.8566),
        "https://nominatim.example.test/reverse?format=json&lat=48.8566&lon=2.3522"
    );
}

#[test]
fn reverse_url_negative_coordinates() {
    let r = resolver("http://localhost:9000");
    assert_eq!(r.reverse_url(-73.5, -12.25), "http://localhost:9000/reverse?format=json&lat=-12.25&lon=-73.5");
}

// ===== response parsing =====

#[test]
fn parse_display_name() {
    let json = serde_json::json!({
        "place_id": 12345,
        "lat": "48.8566",
        "lon": "2.3522",
        "display_name": "Paris, Île-de-France, France",
        "address": { "city": "Paris", "country": "France" }
    })
    .to_string();
    assert_eq!(parse_reverse_response(&json).unwrap(), "Paris, Île-de-France, France");
}

#[test]
fn parse_missing_display_name() {
    let json = serde_json::json!({ "place_id": 1 }).to_string();
    let err = parse_reverse_response(&json).unwrap_err();
    assert_eq!(err, GeocodeError::Parse("missing display_name".into()));
}

#[test]
fn parse_non_string_display_name() {
    let json = serde_json::json!({ "display_name": 42 }).to_string();
    assert!(matches!(parse_reverse_response(&json), Err(GeocodeError::Parse(_))));
}

#[test]
fn parse_nominatim_error_string() {
    let json = serde_json::json!({ "error": "Unable to geocode" }).to_string();
    let err = parse_reverse_response(&json).unwrap_err();
    assert!(err.to_string().contains("Unable to geocode"));
}

#[test]
fn parse_nominatim_error_object() {
    let json = serde_json::json!({ "error": { "code": 400, "message": "Invalid coordinates" } }).to_string();
    let err = parse_reverse_response(&json).unwrap_err();
    assert!(err.to_string().contains("Invalid coordinates"));
}

#[test]
fn parse_malformed_body() {
    assert!(matches!(parse_reverse_response("<html>busy</html>"), Err(GeocodeError::Parse(_))));
}

#[test]
fn parse_json_array_body() {
    assert!(matches!(parse_reverse_response("[]"), Err(GeocodeError::Parse(_))));
}

// ===== errors =====

#[test]
fn error_codes_are_distinct() {
    let errors = [
        GeocodeError::ConfigParse(String::new()),
        GeocodeError::HttpClientBuild(String::new()),
        GeocodeError::Request(String::new()),
        GeocodeError::Status { status: 503, body: String::new() },
        GeocodeError::Parse(String::new()),
    ];
    let mut codes: Vec<&str> = errors.iter().map(GeocodeError::error_code).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), errors.len());
}

#[test]
fn status_error_display_includes_code() {
    let err = GeocodeError::Status { status: 429, body: "slow down".into() };
    assert_eq!(err.to_string(), "geocoding response error: status 429");
}
