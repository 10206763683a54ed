use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Listing entry in PokeAPI's `NamedAPIResource` shape.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PokemonList {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

/// In-memory Pokédex served by the mock. Insertion order is listing order.
#[derive(Clone, Debug, Default)]
pub struct Dex {
    order: Vec<String>,
    records: HashMap<String, Value>,
    hollow: HashSet<String>,
}

impl Dex {
    pub fn new() -> Self {
        Self::default()
    }

    /// bulbasaur, ivysaur and pikachu with their real PokeAPI values.
    pub fn fixtures() -> Self {
        Self::new()
            .with(pokemon(
                1,
                "bulbasaur",
                7,
                69,
                &["grass", "poison"],
                &[("hp", 45, 0), ("attack", 49, 0), ("special-attack", 65, 1)],
            ))
            .with(pokemon(
                2,
                "ivysaur",
                10,
                130,
                &["grass", "poison"],
                &[("hp", 60, 0), ("special-attack", 80, 1), ("special-defense", 80, 1)],
            ))
            .with(pokemon(
                25,
                "pikachu",
                4,
                60,
                &["electric"],
                &[("hp", 35, 0), ("attack", 55, 0), ("speed", 90, 2)],
            ))
    }

    /// Add a detail record; its `name` field becomes the key.
    pub fn with(mut self, record: Value) -> Self {
        if let Some(name) = record["name"].as_str().map(str::to_string) {
            if !self.records.contains_key(&name) {
                self.order.push(name.clone());
            }
            self.records.insert(name, record);
        }
        self
    }

    /// Answer `name` with `204 No Content`: success with no payload.
    pub fn with_hollow(mut self, name: &str) -> Self {
        self.hollow.insert(name.to_string());
        self
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }
}

/// A detail record in PokeAPI's JSON shape.
pub fn pokemon(
    id: u32,
    name: &str,
    height: u32,
    weight: u32,
    types: &[&str],
    stats: &[(&str, u32, u32)],
) -> Value {
    json!({
        "id": id,
        "name": name,
        "height": height,
        "weight": weight,
        "types": types
            .iter()
            .enumerate()
            .map(|(i, t)| json!({ "slot": i + 1, "type": { "name": t, "url": format!("/type/{t}") } }))
            .collect::<Vec<_>>(),
        "stats": stats
            .iter()
            .map(|(stat, base, effort)| json!({
                "base_stat": base,
                "effort": effort,
                "stat": { "name": stat, "url": format!("/stat/{stat}") }
            }))
            .collect::<Vec<_>>(),
        "sprites": {
            "front_default": format!("https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/{id}.png"),
            "back_default": null
        }
    })
}

pub type Db = Arc<Dex>;

pub fn app() -> Router {
    app_with(Dex::fixtures())
}

pub fn app_with(dex: Dex) -> Router {
    let db: Db = Arc::new(dex);
    Router::new()
        .route("/pokemon", get(list_pokemon))
        .route("/pokemon/{name}", get(get_pokemon))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Dex::fixtures()).await
}

pub async fn run_with(listener: TcpListener, dex: Dex) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(dex)).await
}

async fn list_pokemon(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<PokemonList> {
    let limit = params.limit.unwrap_or(20);
    let results: Vec<NamedResource> = db
        .order
        .iter()
        .take(limit)
        .map(|name| NamedResource {
            name: name.clone(),
            url: format!("/pokemon/{name}"),
        })
        .collect();
    tracing::debug!(limit, returned = results.len(), "list pokemon");
    Json(PokemonList {
        count: db.order.len(),
        next: None,
        previous: None,
        results,
    })
}

async fn get_pokemon(State(db): State<Db>, Path(name): Path<String>) -> Response {
    if db.hollow.contains(&name) {
        tracing::debug!(%name, "hollow pokemon");
        return StatusCode::NO_CONTENT.into_response();
    }
    match db.records.get(&name) {
        Some(record) => Json(record.clone()).into_response(),
        None => {
            tracing::debug!(%name, "unknown pokemon");
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
    }
}
