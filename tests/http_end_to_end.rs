//! End-to-end tests over HTTP against the in-memory Groups endpoint.

mod common;

use common::fixtures::{self, GROUP_SCHEMA};
use common::{Call, Outcome, Recorder};
use reqwest::{Client, StatusCode, header};
use scim_endpoint::{
    QueryParams, ResourceEndpoint, ScimHttpServer, ScimResponse, ServerConfig, SharedManager,
    http,
};
use serde_json::{Value, json};

const SCIM_JSON: &str = "application/scim+json";

async fn start_in_memory() -> String {
    let server = ScimHttpServer::in_memory(ServerConfig::default()).unwrap();
    let (addr, _handle) = common::spawn(server.router()).await;
    format!("http://{}/scim/v2/Groups", addr)
}

async fn create(client: &Client, base: &str, group: &Value) -> reqwest::Response {
    client
        .post(base)
        .header(header::CONTENT_TYPE, SCIM_JSON)
        .body(group.to_string())
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_create_group_with_two_members() {
    let base = start_in_memory().await;
    let client = Client::new();

    let response = create(&client, &base, &fixtures::doctors()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[header::CONTENT_TYPE], SCIM_JSON);
    let location = response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string();

    let group: Value = response.json().await.unwrap();
    let id = group["id"].as_str().unwrap();
    assert!(!id.is_empty());
    assert!(location.ends_with(id));
    assert_eq!(group["displayName"], "Doctors");
    assert_eq!(group["members"], fixtures::doctors()["members"]);
}

#[tokio::test]
async fn test_get_unknown_group_returns_not_found() {
    let base = start_in_memory().await;
    let response = Client::new()
        .get(format!("{}/{}", base, "does-not-exist"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "404");
    assert_eq!(
        body["schemas"][0],
        "urn:ietf:params:scim:api:messages:2.0:Error"
    );
}

#[tokio::test]
async fn test_group_lifecycle() {
    let base = start_in_memory().await;
    let client = Client::new();

    let created: Value = create(&client, &base, &fixtures::doctors())
        .await
        .json()
        .await
        .unwrap();
    let url = format!("{}/{}", base, created["id"].as_str().unwrap());

    let fetched = client
        .get(&url)
        .query(&[("attributes", "displayName")])
        .send()
        .await
        .unwrap();
    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched: Value = fetched.json().await.unwrap();
    assert_eq!(fetched["displayName"], "Doctors");
    assert!(fetched.get("members").is_none());

    let replaced = client
        .put(&url)
        .header(header::CONTENT_TYPE, SCIM_JSON)
        .body(fixtures::named("Surgeons").to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(replaced.status(), StatusCode::OK);
    let replaced: Value = replaced.json().await.unwrap();
    assert_eq!(replaced["displayName"], "Surgeons");
    assert_eq!(replaced["id"], created["id"]);

    let deleted = client.delete(&url).send().await.unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    assert!(deleted.bytes().await.unwrap().is_empty());

    let again = client.delete(&url).send().await.unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_and_search() {
    let base = start_in_memory().await;
    let client = Client::new();
    for name in ["Doctors", "Nurses", "Porters"] {
        create(&client, &base, &fixtures::named(name)).await;
    }

    let listed: Value = client
        .get(&base)
        .query(&[("startIndex", "2"), ("count", "1")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed["totalResults"], 3);
    assert_eq!(listed["itemsPerPage"], 1);
    assert_eq!(listed["Resources"][0]["displayName"], "Nurses");

    let searched = client
        .post(format!("{}/.search", base))
        .header(header::CONTENT_TYPE, SCIM_JSON)
        .body(fixtures::search(Some(1), Some(2)).to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(searched.status(), StatusCode::OK);
    let searched: Value = searched.json().await.unwrap();
    assert_eq!(searched["Resources"].as_array().unwrap().len(), 2);

    let filtered = client
        .get(&base)
        .query(&[("filter", "displayName eq \"Doctors\"")])
        .send()
        .await
        .unwrap();
    assert_eq!(filtered.status(), StatusCode::BAD_REQUEST);
    let filtered: Value = filtered.json().await.unwrap();
    assert_eq!(filtered["scimType"], "invalidFilter");
}

#[tokio::test]
async fn test_duplicate_display_name_conflicts() {
    let base = start_in_memory().await;
    let client = Client::new();

    create(&client, &base, &fixtures::doctors()).await;
    let response = create(&client, &base, &fixtures::doctors()).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["scimType"], "uniqueness");
}

#[tokio::test]
async fn test_wrong_media_type_rejected() {
    let base = start_in_memory().await;
    let client = Client::new();

    let response = client
        .post(&base)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(fixtures::doctors().to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let listed: Value = client.get(&base).send().await.unwrap().json().await.unwrap();
    assert_eq!(listed["totalResults"], 0);
}

#[tokio::test]
async fn test_malformed_body_is_client_error() {
    let base = start_in_memory().await;
    let client = Client::new();

    for body in ["", "{\"schemas\": ["] {
        let response = client
            .post(&base)
            .header(header::CONTENT_TYPE, SCIM_JSON)
            .body(body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: Value = response.json().await.unwrap();
        assert_eq!(error["scimType"], "invalidSyntax");
    }

    let listed: Value = client.get(&base).send().await.unwrap().json().await.unwrap();
    assert_eq!(listed["totalResults"], 0);
}

#[tokio::test]
async fn test_non_numeric_count_is_format_error() {
    let base = start_in_memory().await;
    let response = Client::new()
        .get(&base)
        .query(&[("count", "ten")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let server = ScimHttpServer::in_memory(ServerConfig::default()).unwrap();
    let (addr, _handle) = common::spawn(server.router()).await;

    let body: Value = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_query_string_reaches_delegate_unmodified() {
    let recorder = Recorder::new();
    let endpoint = ResourceEndpoint::new(
        "Group",
        SharedManager::new(()),
        recorder.factory(Outcome::Respond(
            ScimResponse::new(207)
                .with_header("X-Trace", "abc")
                .with_body("opaque"),
        )),
    );
    let (addr, _handle) = common::spawn(http::app("/Groups", endpoint)).await;

    let response = Client::new()
        .get(format!("http://{}/Groups", addr))
        .query(&[
            ("filter", "displayName sw \"D\""),
            ("startIndex", "5"),
            ("count", "0"),
            ("sortBy", "displayName"),
            ("sortOrder", "descending"),
            ("attributes", "displayName"),
            ("excludedAttributes", "members"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 207);
    assert_eq!(response.headers()["x-trace"], "abc");
    assert_eq!(response.text().await.unwrap(), "opaque");

    let expected = QueryParams::new()
        .with_filter("displayName sw \"D\"")
        .with_pagination(5, 0)
        .with_sort("displayName", "descending")
        .with_projection(Some("displayName"), Some("members"));
    assert_eq!(recorder.calls(), vec![Call::ListByFilter(expected)]);
}

#[tokio::test]
async fn test_get_forwards_only_projection_params() {
    let recorder = Recorder::new();
    let endpoint = ResourceEndpoint::new(
        "Group",
        SharedManager::new(()),
        recorder.factory(Outcome::Respond(ScimResponse::new(200))),
    );
    let (addr, _handle) = common::spawn(http::app("/Groups", endpoint)).await;

    Client::new()
        .get(format!("http://{}/Groups/g-1", addr))
        .query(&[("attributes", "members"), ("filter", "ignored")])
        .send()
        .await
        .unwrap();

    assert_eq!(
        recorder.calls(),
        vec![Call::Get {
            id: "g-1".to_string(),
            attributes: Some("members".to_string()),
            excluded_attributes: None,
        }]
    );
}

#[tokio::test]
async fn test_schema_is_required_on_create() {
    let base = start_in_memory().await;
    let response = create(
        &Client::new(),
        &base,
        &json!({"displayName": "No schema", "schemas": ["urn:example:Other"]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains(GROUP_SCHEMA));
}

#[tokio::test]
async fn test_unrelated_malformed_params_do_not_block_single_resource_routes() {
    let recorder = Recorder::new();
    let endpoint = ResourceEndpoint::new(
        "Group",
        SharedManager::new(()),
        recorder.factory(Outcome::Respond(ScimResponse::new(200))),
    );
    let server =
        ScimHttpServer::new(ServerConfig::default(), http::app("/Groups", endpoint)).unwrap();
    let (addr, _handle) = common::spawn(server.router()).await;
    let client = Client::new();
    let url = format!("http://{}/Groups/g-1", addr);

    let fetched = client
        .get(&url)
        .query(&[("count", "abc"), ("attributes", "members")])
        .send()
        .await
        .unwrap();
    assert_eq!(fetched.status(), StatusCode::OK);

    let replaced = client
        .put(&url)
        .query(&[("startIndex", "first")])
        .header(header::CONTENT_TYPE, SCIM_JSON)
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(replaced.status(), StatusCode::OK);

    assert_eq!(
        recorder.calls(),
        vec![
            Call::Get {
                id: "g-1".to_string(),
                attributes: Some("members".to_string()),
                excluded_attributes: None,
            },
            Call::Replace {
                id: "g-1".to_string(),
                body: "{}".to_string(),
                attributes: None,
                excluded_attributes: None,
            },
        ]
    );
}

#[tokio::test]
async fn test_invalid_utf8_body_is_scim_error() {
    let base = start_in_memory().await;
    let response = Client::new()
        .post(&base)
        .header(header::CONTENT_TYPE, SCIM_JSON)
        .body(vec![0xffu8, 0xfe, b'{'])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()[header::CONTENT_TYPE], SCIM_JSON);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["scimType"], "invalidSyntax");
}

#[tokio::test]
async fn test_media_type_gate_covers_replace_and_search() {
    let base = start_in_memory().await;
    let client = Client::new();
    let created: Value = create(&client, &base, &fixtures::doctors())
        .await
        .json()
        .await
        .unwrap();
    let url = format!("{}/{}", base, created["id"].as_str().unwrap());

    let replaced = client
        .put(&url)
        .header(header::CONTENT_TYPE, "application/json")
        .body(fixtures::named("Surgeons").to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(replaced.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(replaced.headers()[header::CONTENT_TYPE], SCIM_JSON);

    let searched = client
        .post(format!("{}/.search", base))
        .body(fixtures::search(None, None).to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(searched.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let stored: Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(stored["displayName"], "Doctors");
}
