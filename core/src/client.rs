//! Stateless HTTP request builder and response parser for PokeAPI.
//!
//! # Design
//! `PokeApiClient` holds only a base URL and the listing size. Each
//! operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! A `Transport` executes the round-trip in between, so this module stays
//! free of I/O.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{PokemonDetail, PokemonDto, PokemonListDto};

/// Everything but RFC 3986 unreserved characters, so a name is always a
/// single path segment: `?`, `#` and `/` cannot start a query, fragment or
/// new segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Clone)]
pub struct PokeApiClient {
    base_url: String,
    list_limit: u32,
}

impl PokeApiClient {
    pub fn new(base_url: &str, list_limit: u32) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            list_limit,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_pokemon(&self) -> HttpRequest {
        HttpRequest::get(format!("{}/pokemon?limit={}", self.base_url, self.list_limit))
    }

    /// `name` is sent verbatim, percent-encoded as one path segment.
    pub fn build_get_pokemon(&self, name: &str) -> HttpRequest {
        let segment = utf8_percent_encode(name, PATH_SEGMENT);
        HttpRequest::get(format!("{}/pokemon/{segment}", self.base_url))
    }

    /// Names from the listing envelope, in server order.
    pub fn parse_list_pokemon(&self, response: HttpResponse) -> Result<Vec<String>, ApiError> {
        let envelope: PokemonListDto = decode(response)?;
        Ok(envelope.results.into_iter().map(|r| r.name).collect())
    }

    pub fn parse_get_pokemon(&self, response: HttpResponse) -> Result<PokemonDetail, ApiError> {
        let dto: PokemonDto = decode(response)?;
        Ok(dto.into())
    }
}

/// Status check, then body presence, then JSON decode.
fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    let body = match response.body {
        Some(body) if !body.trim().is_empty() => body,
        _ => return Err(ApiError::EmptyBody),
    };
    serde_json::from_str(&body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone().unwrap_or_default(),
    })
}
