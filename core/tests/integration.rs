//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the production
//! wiring (`ReqwestTransport` + `ApiRepository` + `ViewStateStore`) over real
//! HTTP. Validates that request building, response parsing, error
//! classification and state publication agree with an actual server.

use std::time::Duration;

use mock_server::{pokemon, Dex};
use pokedex_core::cache::{CACHE_CONTROL_HEADER, CACHE_CONTROL_NO_CACHE};
use pokedex_core::{
    ApiRepository, Config, ErrorKind, HttpRequest, PokeApiClient, PokemonRepository,
    ReqwestTransport, Transport, ViewState, ViewStateStore,
};
use tokio::runtime::Handle;

/// Serve `dex` on a background thread and return its base URL.
fn spawn_server(dex: Dex) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with(listener, dex).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// A base URL nothing listens on.
fn dead_server() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn config(base_url: &str) -> Config {
    Config {
        request_timeout: Duration::from_secs(5),
        ..Config::with_base_url(base_url)
    }
}

fn store_for(base_url: &str) -> ViewStateStore<ApiRepository<ReqwestTransport>> {
    let repo = ApiRepository::from_config(&config(base_url)).unwrap();
    ViewStateStore::new(repo, Handle::current())
}

#[tokio::test(flavor = "multi_thread")]
async fn list_scenario_two_names() {
    let dex = Dex::new()
        .with(pokemon(1, "bulbasaur", 7, 69, &["grass"], &[]))
        .with(pokemon(2, "ivysaur", 10, 130, &["grass"], &[]));
    let store = store_for(&spawn_server(dex));

    store.load_list().unwrap().await.unwrap();
    let names: Vec<String> = match store.list_state() {
        Some(ViewState::Ready { data }) => data.into_iter().map(|s| s.name).collect(),
        other => panic!("expected ready list, got {other:?}"),
    };
    assert_eq!(names, vec!["bulbasaur", "ivysaur"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn detail_round_trip_keeps_raw_values() {
    let store = store_for(&spawn_server(Dex::fixtures()));

    store.load_detail("pikachu").await.unwrap();
    let state = store.detail_state().unwrap();
    let detail = state.data().expect("pikachu should load");
    assert_eq!(detail.name, "pikachu");
    assert_eq!(detail.height, 4);
    assert_eq!(detail.weight, 60);
    assert_eq!(detail.types[0].name, "electric");
    assert_eq!(detail.stats[2].name, "speed");
    assert_eq!(detail.stats[2].effort, 2);
    assert!(detail.sprite.as_deref().unwrap().ends_with("/25.png"));
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_name_is_request_failed() {
    let store = store_for(&spawn_server(Dex::fixtures()));

    store.load_detail("missingno").await.unwrap();
    let state = store.detail_state().unwrap();
    assert_eq!(state.error().map(|e| e.kind), Some(ErrorKind::RequestFailed));
}

#[tokio::test(flavor = "multi_thread")]
async fn reserved_characters_never_resolve_to_another_pokemon() {
    let store = store_for(&spawn_server(Dex::fixtures()));

    for name in ["pikachu?x=1", "pikachu#evolved", "../pokemon?limit=1", "pikachu/"] {
        store.load_detail(name).await.unwrap();
        let state = store.detail_state().unwrap();
        assert_eq!(
            state.error().map(|e| e.kind),
            Some(ErrorKind::RequestFailed),
            "{name}: got {state:?}"
        );
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn success_without_body_is_empty_body() {
    let store = store_for(&spawn_server(Dex::fixtures().with_hollow("pikachu")));

    store.load_detail("pikachu").await.unwrap();
    let state = store.detail_state().unwrap();
    assert_eq!(state.error().map(|e| e.kind), Some(ErrorKind::EmptyBody));
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_server_lists_as_empty_and_fails_details() {
    let base = dead_server();
    let store = store_for(&base);

    store.load_list().unwrap().await.unwrap();
    assert_eq!(store.list_state(), Some(ViewState::Ready { data: Vec::new() }));

    store.load_detail("pikachu").await.unwrap();
    let state = store.detail_state().unwrap();
    assert_eq!(state.error().map(|e| e.kind), Some(ErrorKind::RequestFailed));
}

#[tokio::test(flavor = "multi_thread")]
async fn list_limit_is_sent_to_server() {
    let base = spawn_server(Dex::fixtures());
    let repo = ApiRepository::new(
        PokeApiClient::new(&base, 1),
        ReqwestTransport::new(&config(&base)).unwrap(),
    );
    assert_eq!(repo.list_names().await.unwrap(), vec!["bulbasaur"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn transport_stamps_cache_control() {
    let base = spawn_server(Dex::fixtures());
    let transport = ReqwestTransport::new(&config(&base)).unwrap();
    let client = PokeApiClient::new(&base, 151);

    let response = transport
        .execute(client.build_get_pokemon("bulbasaur"))
        .await
        .unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.header(CACHE_CONTROL_HEADER), Some("max-age=600"));

    let mut request: HttpRequest = client.build_get_pokemon("bulbasaur");
    request
        .headers
        .push((CACHE_CONTROL_HEADER.to_string(), CACHE_CONTROL_NO_CACHE.to_string()));
    let response = transport.execute(request).await.unwrap();
    assert_eq!(response.header(CACHE_CONTROL_HEADER), None);
}

#[tokio::test(flavor = "multi_thread")]
async fn hollow_response_has_no_body() {
    let base = spawn_server(Dex::fixtures().with_hollow("ivysaur"));
    let transport = ReqwestTransport::new(&config(&base)).unwrap();
    let client = PokeApiClient::new(&base, 151);

    let response = transport
        .execute(client.build_get_pokemon("ivysaur"))
        .await
        .unwrap();
    assert_eq!(response.status, 204);
    assert!(response.body.is_none());
}
