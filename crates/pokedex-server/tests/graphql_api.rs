//! HTTP-level tests: requests go through the full axum router, including
//! the CORS and trace layers, via `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use pokedex_core::PokedexConfig;
use pokedex_server::{build_router, AppState};
use pokedex_store::Dataset;
use serde_json::{json, Value};
use tower::ServiceExt;

const STARTER_DATA: &str = r#"{
    "1": {
        "id": "1", "num": "001", "name": "Bulbasaur",
        "img": "http://www.serebii.net/pokemongo/pokemon/001.png",
        "types": ["Grass", "Poison"],
        "weaknesses": ["Fire", "Ice", "Flying", "Psychic"],
        "height": "0.71 m", "weight": "6.9 kg", "egg": "2 km",
        "candy": "Bulbasaur Candy", "candyCount": 25,
        "nextEvolutions": [{"num": "002", "name": "Ivysaur"}]
    },
    "2": {
        "id": "2", "num": "002", "name": "Ivysaur",
        "img": "http://www.serebii.net/pokemongo/pokemon/002.png",
        "types": ["Grass", "Poison"],
        "weaknesses": ["Fire", "Ice", "Flying", "Psychic"],
        "height": "0.99 m", "weight": "13.0 kg", "egg": "Not in Eggs",
        "candy": "Bulbasaur Candy", "candyCount": 100,
        "prevEvolutions": [{"num": "001", "name": "Bulbasaur"}]
    }
}"#;

fn app() -> Router {
    app_with(PokedexConfig::with_defaults("data/pokemon.json"))
}

fn app_with(config: PokedexConfig) -> Router {
    let dataset = Dataset::from_json_str(STARTER_DATA).unwrap();
    build_router(Arc::new(AppState::new(config, dataset)))
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_graphql(body: Value) -> (StatusCode, Value) {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/graphql")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, read_json(response).await)
}

#[tokio::test]
async fn test_starter_scenario_end_to_end() {
    let (status, body) = post_graphql(json!({
        "query": r#"
            query Browse($types: [String]) {
                grass: pokemonMany(filters: {types: $types}) { id name }
                bulb: pokemonMany(searchTerm: "bulb") { name }
                page: pokemonMany(skip: 1, limit: 1) { name }
                first: pokemonOne(id: "1") { nextEvolutions { id name types candyCount } }
                options: pokemonFilters { types }
            }
        "#,
        "variables": {"types": ["Grass"]},
        "operationName": "Browse"
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("errors").is_none(), "errors: {}", body);
    let data = &body["data"];
    assert_eq!(
        data["grass"],
        json!([{"id": "1", "name": "Bulbasaur"}, {"id": "2", "name": "Ivysaur"}])
    );
    assert_eq!(data["bulb"], json!([{"name": "Bulbasaur"}]));
    assert_eq!(data["page"], json!([{"name": "Ivysaur"}]));
    assert_eq!(
        data["first"]["nextEvolutions"],
        json!([{"id": "2", "name": "Ivysaur", "types": ["Grass", "Poison"], "candyCount": 100}])
    );
    assert_eq!(data["options"]["types"], json!(["Grass", "Poison"]));
}

#[tokio::test]
async fn test_missing_id_is_null_without_errors() {
    let (status, body) = post_graphql(json!({
        "query": "{ pokemonOne(id: \"151\") { name } }"
    }))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["pokemonOne"].is_null());
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn test_field_error_shape() {
    let (status, body) = post_graphql(json!({
        "query": "{ pokemonOne(id: \"1\") { name evolvesInto } }"
    }))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pokemonOne"]["name"], "Bulbasaur");
    assert_eq!(body["errors"][0]["path"], json!(["pokemonOne", "evolvesInto"]));
    assert!(body["errors"][0]["locations"][0]["line"].is_number());
}

#[tokio::test]
async fn test_parse_error_has_no_data() {
    let (status, body) = post_graphql(json!({ "query": "{ pokemonMany(" })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("data").is_none());
    assert!(body["errors"][0]["message"].is_string());
}

#[tokio::test]
async fn test_configured_depth_limit_rejects_nested_evolutions() {
    let mut config = PokedexConfig::with_defaults("data/pokemon.json");
    config.max_query_depth = 3;
    let query = "{ pokemonOne(id: \"1\") { nextEvolutions { prevEvolutions { id } } } }";
    let response = app_with(config)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/graphql")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "query": query }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert!(body.get("data").is_none());
    assert_eq!(body["errors"][0]["message"], "Query exceeds maximum depth of 3");

    // The same query fits under the default limit.
    let (_, body) = post_graphql(json!({ "query": query })).await;
    assert_eq!(
        body["data"]["pokemonOne"]["nextEvolutions"],
        json!([{"prevEvolutions": [{"id": "1"}]}])
    );
}

#[tokio::test]
async fn test_invalid_json_body_is_rejected() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/graphql")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_get_graphql_with_query_string() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/graphql?query=%7BpokemonSearch(searchTerm:%22ivy%22)%7Bid%7D%7D")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["pokemonSearch"], json!([{"id": "2"}]));
}

#[tokio::test]
async fn test_schema_route_serves_sdl() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/graphql/schema")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain"));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let sdl = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(sdl.contains("pokemonOne(id: ID!): Pokemon"));
}

#[tokio::test]
async fn test_health_reports_record_count() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["records"], 2);
}

#[test]
fn test_bundled_dataset_validates() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/pokemon.json");
    let report = pokedex_server::validate::validate(&path);
    assert!(report.valid, "errors: {:?}", report.errors);
    assert!(report.dangling.is_empty());
    assert!(report.types.contains(&"Electric".to_string()));
}
