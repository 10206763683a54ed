//! Client core for a read-only Pokédex.
//!
//! # Overview
//! Lists Pokémon names from PokeAPI and fetches one detail record per
//! selected name, publishing each as a `Loading / Ready / Error` view-state
//! that presentation renders.
//!
//! # Design
//! - `PokeApiClient` builds `HttpRequest`s and parses `HttpResponse`s
//!   without I/O; a `Transport` executes them.
//! - `ApiRepository` makes one request per call and turns failures into
//!   `ErrorInfo`. A failed listing is reported as an empty one.
//! - `ViewStateStore` owns the list and detail slots, runs fetches on a
//!   tokio runtime and publishes through `watch` channels. The list is
//!   fetched once; details are last-request-wins.
//! - `view` projects slots into render models for native hosts.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod repository;
pub mod state;
pub mod store;
pub mod transport;
pub mod types;
pub mod view;

pub use cache::CachePolicy;
pub use client::PokeApiClient;
pub use config::{Config, ConfigError};
pub use error::{ApiError, ErrorInfo, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use repository::{ApiRepository, PokemonRepository};
pub use state::ViewState;
pub use store::{DetailState, ListState, ViewStateStore};
pub use transport::Transport;
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
pub use types::{PokemonDetail, PokemonStat, PokemonSummary, PokemonType};
