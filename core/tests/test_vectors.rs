//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results or error variants. Expected detail records are
//! compared as typed values so field order in the JSON does not matter.

use pokedex_core::{ApiError, HttpMethod, HttpResponse, PokeApiClient, PokemonDetail};

const BASE_URL: &str = "http://localhost:3000";

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated_response(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().map(str::to_string),
    }
}

fn assert_error_variant(name: &str, expected: &str, err: &ApiError) {
    let matched = match expected {
        "NotFound" => matches!(err, ApiError::NotFound),
        "HttpError" => matches!(err, ApiError::HttpError { .. }),
        "EmptyBody" => matches!(err, ApiError::EmptyBody),
        "DeserializationError" => matches!(err, ApiError::DeserializationError(_)),
        other => panic!("{name}: unknown expected_error: {other}"),
    };
    assert!(matched, "{name}: expected {expected}, got {err:?}");
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let raw = include_str!("../../test-vectors/list.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let limit = case["input_limit"].as_u64().unwrap() as u32;
        let c = PokeApiClient::new(BASE_URL, limit);
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_list_pokemon();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");
        assert!(req.headers.is_empty(), "{name}: headers");

        // Verify parse
        let result = c.parse_list_pokemon(simulated_response(case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_error_variant(name, expected_error.as_str().unwrap(), &result.unwrap_err());
        } else {
            let expected: Vec<String> = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

#[test]
fn detail_test_vectors() {
    let raw = include_str!("../../test-vectors/detail.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = PokeApiClient::new(BASE_URL, 151);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = case["input_name"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_get_pokemon(input);
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");

        // Verify parse
        let result = c.parse_get_pokemon(simulated_response(case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_error_variant(name, expected_error.as_str().unwrap(), &result.unwrap_err());
        } else {
            let expected: PokemonDetail = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}
