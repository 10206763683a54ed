use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, pokemon, Dex, PokemonList};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- list ---

#[tokio::test]
async fn list_returns_fixtures_in_order() {
    let resp = app().oneshot(get("/pokemon?limit=151")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let list: PokemonList = body_json(resp).await;
    let names: Vec<_> = list.results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["bulbasaur", "ivysaur", "pikachu"]);
    assert_eq!(list.count, 3);
    assert!(list.next.is_none());
}

#[tokio::test]
async fn list_honours_limit() {
    let resp = app().oneshot(get("/pokemon?limit=2")).await.unwrap();
    let list: PokemonList = body_json(resp).await;
    assert_eq!(list.results.len(), 2);
    assert_eq!(list.results[1].name, "ivysaur");
    assert_eq!(list.results[1].url, "/pokemon/ivysaur");
}

#[tokio::test]
async fn list_of_empty_dex() {
    let resp = app_with(Dex::new()).oneshot(get("/pokemon")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let list: PokemonList = body_json(resp).await;
    assert!(list.results.is_empty());
}

#[tokio::test]
async fn list_bad_limit_returns_400() {
    let resp = app().oneshot(get("/pokemon?limit=lots")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- detail ---

#[tokio::test]
async fn detail_returns_record() {
    let resp = app().oneshot(get("/pokemon/pikachu")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let record: serde_json::Value = body_json(resp).await;
    assert_eq!(record["name"], "pikachu");
    assert_eq!(record["height"], 4);
    assert_eq!(record["weight"], 60);
    assert_eq!(record["types"][0]["type"]["name"], "electric");
}

#[tokio::test]
async fn detail_unknown_name_returns_404() {
    let resp = app().oneshot(get("/pokemon/missingno")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn hollow_detail_returns_204_without_body() {
    let dex = Dex::fixtures().with_hollow("pikachu");
    let resp = app_with(dex).oneshot(get("/pokemon/pikachu")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn custom_records_are_listed_and_served() {
    let dex = Dex::new().with(pokemon(151, "mew", 4, 40, &["psychic"], &[("hp", 100, 3)]));
    let app = app_with(dex);

    let resp = app.clone().oneshot(get("/pokemon")).await.unwrap();
    let list: PokemonList = body_json(resp).await;
    assert_eq!(list.results[0].name, "mew");

    let resp = app.oneshot(get("/pokemon/mew")).await.unwrap();
    let record: serde_json::Value = body_json(resp).await;
    assert_eq!(record["stats"][0]["effort"], 3);
}
