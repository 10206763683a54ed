//! Cache-control rewriting applied to every response a transport returns.
//!
//! PokeAPI data is effectively static, so responses are stamped with
//! `Cache-Control: max-age=<secs>` for any HTTP cache sitting in front of the
//! host. A request that asks for `no-cache` gets its response back as the
//! server sent it.
//!
//! The stamp is for hosts that execute or forward `HttpResponse`s
//! themselves; `PokeApiClient::parse_*` ignores headers, and its builders
//! never send `no-cache`, so the bypass only applies to requests a host
//! builds or amends.

use std::time::Duration;

use crate::http::{HttpRequest, HttpResponse};

pub const CACHE_CONTROL_HEADER: &str = "Cache-Control";
pub const CACHE_CONTROL_NO_CACHE: &str = "no-cache";

/// Default lifetime stamped on responses.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub max_age: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            max_age: DEFAULT_MAX_AGE,
        }
    }
}

impl CachePolicy {
    pub fn new(max_age: Duration) -> Self {
        Self { max_age }
    }

    pub fn header_value(&self) -> String {
        format!("max-age={}", self.max_age.as_secs())
    }

    /// Returns true when the response header was rewritten.
    pub fn apply(&self, request: &HttpRequest, response: &mut HttpResponse) -> bool {
        let bypass = request
            .header(CACHE_CONTROL_HEADER)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case(CACHE_CONTROL_NO_CACHE));
        if bypass {
            return false;
        }
        response.set_header(CACHE_CONTROL_HEADER, self.header_value());
        true
    }
}
