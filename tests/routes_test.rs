// ABOUTME: HTTP-level tests for the REST router using tower oneshot requests
// ABOUTME: Exercises auth, recipe writes, membership toggles, subscriptions, and downloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use pantry_server::{server::build_router, server::ServerResources};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, bytes.to_vec())
}

fn json_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

struct Fixture {
    resources: Arc<ServerResources>,
    app: Router,
}

async fn fixture() -> Fixture {
    let resources = common::create_test_resources().await;
    let app = build_router(&resources);
    Fixture { resources, app }
}

#[tokio::test]
async fn test_health_reports_database() {
    let fx = fixture().await;
    let (status, _, body) = send(&fx.app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["database"], "ok");
}

#[tokio::test]
async fn test_write_without_token_is_unauthorized() {
    let fx = fixture().await;
    let (status, _, body) = send(
        &fx.app,
        Method::POST,
        "/api/recipes",
        None,
        Some(json!({"name": "x", "text": "y", "cooking_time": 1, "ingredients": []})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(&body)["error"]["code"], "AUTH_REQUIRED");

    let (status, _, _) = send(&fx.app, Method::GET, "/api/users/me", Some("Bearer nope"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_recipe_and_read_it_back() {
    let fx = fixture().await;
    let db = &fx.resources.database;
    let chef = common::create_user(db, "chef").await;
    let flour = common::create_ingredient(db, "flour", "g").await;
    let tag = common::create_tag(db, "Breakfast", "#ffaa00").await;
    let token = common::bearer(&fx.resources, &chef);

    let (status, _, body) = send(
        &fx.app,
        Method::POST,
        "/api/recipes",
        Some(token.as_str()),
        Some(json!({
            "name": "Pancakes",
            "text": "Mix and fry",
            "cooking_time": 15,
            "ingredients": [{"id": flour.id, "amount": 200}],
            "tags": [tag.id],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let created = json_body(&body);
    assert_eq!(created["name"], "Pancakes");
    assert_eq!(created["author"]["username"], "chef");
    assert_eq!(created["is_favorited"], false);
    assert_eq!(created["ingredients"][0]["amount"], 200);
    assert_eq!(created["tags"][0]["color"], "#FFAA00");

    let id = created["id"].as_str().unwrap().to_owned();
    let (status, _, body) = send(&fx.app, Method::GET, &format!("/api/recipes/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["cooking_time"], 15);

    let (status, _, body) =
        send(&fx.app, Method::GET, "/api/recipes?tags=breakfast", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["count"], 1);
}

#[tokio::test]
async fn test_validation_errors_are_reported_per_field() {
    let fx = fixture().await;
    let db = &fx.resources.database;
    let chef = common::create_user(db, "chef").await;
    let flour = common::create_ingredient(db, "flour", "g").await;
    let token = common::bearer(&fx.resources, &chef);

    let (status, _, body) = send(
        &fx.app,
        Method::POST,
        "/api/recipes",
        Some(token.as_str()),
        Some(json!({
            "name": "Bread",
            "text": "Bake",
            "cooking_time": 0,
            "ingredients": [{"id": flour.id, "amount": 1}, {"id": flour.id, "amount": 2}],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = &json_body(&body)["error"];
    assert_eq!(error["code"], "INVALID_INPUT");
    assert!(error["details"].to_string().contains("cooking_time"));
    assert!(error["details"].to_string().contains("ingredients"));
}

#[tokio::test]
async fn test_only_author_may_modify_recipe() {
    let fx = fixture().await;
    let db = &fx.resources.database;
    let chef = common::create_user(db, "chef").await;
    let stranger = common::create_user(db, "stranger").await;
    let admin = common::create_admin(db, "boss").await;
    let flour = common::create_ingredient(db, "flour", "g").await;
    let recipe = common::create_recipe(db, &chef, "Bread", &[(flour.id, 500)], &[]).await;

    let patch = json!({"name": "Stolen", "ingredients": [{"id": flour.id, "amount": 1}]});
    let uri = format!("/api/recipes/{}", recipe.id);

    let stranger_token = common::bearer(&fx.resources, &stranger);
    let (status, _, _) = send(&fx.app, Method::PATCH, &uri, Some(stranger_token.as_str()), Some(patch.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = send(&fx.app, Method::DELETE, &uri, Some(stranger_token.as_str()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin_token = common::bearer(&fx.resources, &admin);
    let (status, _, body) = send(&fx.app, Method::PATCH, &uri, Some(admin_token.as_str()), Some(patch)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["name"], "Stolen");

    let chef_token = common::bearer(&fx.resources, &chef);
    let (status, _, _) = send(&fx.app, Method::DELETE, &uri, Some(chef_token.as_str()), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = send(&fx.app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorite_toggle_conflicts_and_missing() {
    let fx = fixture().await;
    let db = &fx.resources.database;
    let chef = common::create_user(db, "chef").await;
    let flour = common::create_ingredient(db, "flour", "g").await;
    let recipe = common::create_recipe(db, &chef, "Bread", &[(flour.id, 500)], &[]).await;
    let token = common::bearer(&fx.resources, &chef);
    let uri = format!("/api/recipes/{}/favorite", recipe.id);

    let (status, _, body) = send(&fx.app, Method::POST, &uri, Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json_body(&body)["name"], "Bread");

    let (status, _, body) = send(&fx.app, Method::POST, &uri, Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json_body(&body)["error"]["code"], "RESOURCE_ALREADY_EXISTS");

    let (status, _, body) = send(
        &fx.app,
        Method::GET,
        "/api/recipes?is_favorited=1",
        Some(token.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let page = json_body(&body);
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["is_favorited"], true);

    let (status, _, _) = send(&fx.app, Method::DELETE, &uri, Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _, _) = send(&fx.app, Method::DELETE, &uri, Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_anonymous_membership_filter_yields_empty_page() {
    let fx = fixture().await;
    let db = &fx.resources.database;
    let chef = common::create_user(db, "chef").await;
    let flour = common::create_ingredient(db, "flour", "g").await;
    common::create_recipe(db, &chef, "Bread", &[(flour.id, 500)], &[]).await;

    let (status, _, body) =
        send(&fx.app, Method::GET, "/api/recipes?is_in_shopping_cart=1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["count"], 0);
}

#[tokio::test]
async fn test_download_shopping_cart() {
    let fx = fixture().await;
    let db = &fx.resources.database;
    let chef = common::create_user(db, "chef").await;
    let flour = common::create_ingredient(db, "flour", "g").await;
    let bread = common::create_recipe(db, &chef, "Bread", &[(flour.id, 100)], &[]).await;
    let buns = common::create_recipe(db, &chef, "Buns", &[(flour.id, 50)], &[]).await;
    let token = common::bearer(&fx.resources, &chef);

    for recipe in [&bread, &buns] {
        let uri = format!("/api/recipes/{}/shopping_cart", recipe.id);
        let (status, _, _) = send(&fx.app, Method::POST, &uri, Some(token.as_str()), None).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, headers, body) = send(
        &fx.app,
        Method::GET,
        "/api/recipes/download_shopping_cart",
        Some(token.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert!(headers[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("attachment"));
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("Flour, g"));
    assert!(text.contains("150"));

    let (status, _, _) = send(
        &fx.app,
        Method::GET,
        "/api/recipes/download_shopping_cart",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_subscription_endpoints() {
    let fx = fixture().await;
    let db = &fx.resources.database;
    let follower = common::create_user(db, "follower").await;
    let author = common::create_user(db, "author").await;
    let flour = common::create_ingredient(db, "flour", "g").await;
    for name in ["One", "Two", "Three"] {
        common::create_recipe(db, &author, name, &[(flour.id, 10)], &[]).await;
    }
    let token = common::bearer(&fx.resources, &follower);

    let uri = format!("/api/users/{}/subscribe?recipes_limit=2", author.id);
    let (status, _, body) = send(&fx.app, Method::POST, &uri, Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::CREATED);
    let view = json_body(&body);
    assert_eq!(view["username"], "author");
    assert_eq!(view["is_subscribed"], true);
    assert_eq!(view["recipes"].as_array().unwrap().len(), 2);
    assert_eq!(view["recipes_count"], 3);

    let (status, _, _) = send(&fx.app, Method::POST, &uri, Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let self_uri = format!("/api/users/{}/subscribe", follower.id);
    let (status, _, body) = send(&fx.app, Method::POST, &self_uri, Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body)["error"]["code"], "SELF_SUBSCRIPTION");

    let (status, _, body) =
        send(&fx.app, Method::GET, "/api/users/subscriptions", Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["count"], 1);

    let (status, _, _) = send(&fx.app, Method::DELETE, &uri, Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _, _) = send(&fx.app, Method::DELETE, &uri, Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_recipes_limit_is_ignored() {
    let fx = fixture().await;
    let db = &fx.resources.database;
    let follower = common::create_user(db, "follower").await;
    let author = common::create_user(db, "author").await;
    let flour = common::create_ingredient(db, "flour", "g").await;
    for name in ["One", "Two", "Three"] {
        common::create_recipe(db, &author, name, &[(flour.id, 10)], &[]).await;
    }
    let token = common::bearer(&fx.resources, &follower);

    let uri = format!("/api/users/{}/subscribe?recipes_limit=lots", author.id);
    let (status, _, body) = send(&fx.app, Method::POST, &uri, Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json_body(&body)["recipes"].as_array().unwrap().len(), 3);

    let (status, _, body) = send(
        &fx.app,
        Method::GET,
        "/api/users/subscriptions?recipes_limit=x",
        Some(token.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["results"][0]["recipes_count"], 3);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let fx = fixture().await;
    let request = Request::builder()
        .uri("/api/tags")
        .header("x-request-id", "req_from_client")
        .body(Body::empty())
        .unwrap();
    let response = fx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req_from_client");

    let (_, headers, _) = send(&fx.app, Method::GET, "/api/tags", None, None).await;
    assert!(headers["x-request-id"]
        .to_str()
        .unwrap()
        .starts_with("req_"));
}

#[tokio::test]
async fn test_malformed_id_is_not_found() {
    let fx = fixture().await;
    let (status, _, _) = send(&fx.app, Method::GET, "/api/recipes/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
