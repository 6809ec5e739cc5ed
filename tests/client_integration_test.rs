use httpmock::prelude::*;
use rawg_client::{
    DefaultRawgClient, GamesQuery, ListQuery, Ordering, RawgConfig, RawgError, ResourceKind,
    SortOrder,
};
use std::sync::Arc;
use std::time::Duration;

const KEY: &str = "integration-key";

fn client_for(server: &MockServer) -> DefaultRawgClient {
    let config = RawgConfig::new(KEY)
        .with_base_url(server.url("/api"))
        .with_max_retries(2)
        .with_retry_delay(Duration::from_millis(1))
        .with_timeout(Duration::from_secs(5));
    DefaultRawgClient::new(config).unwrap()
}

fn game_json(id: u64, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "slug": name.to_lowercase().replace(' ', "-"),
        "name": name,
        "released": "2011-04-18",
        "rating": 4.6,
        "metacritic": 95,
        "platforms": [{"platform": {"id": 4, "name": "PC", "slug": "pc"}}]
    })
}

#[tokio::test]
async fn test_list_games_sends_key_and_filters() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/games")
            .query_param("key", KEY)
            .query_param("search", "portal")
            .query_param("genres", "puzzle,action")
            .query_param("ordering", "-metacritic")
            .query_param("page_size", "40");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "count": 2,
                "next": null,
                "previous": null,
                "results": [game_json(4200, "Portal 2"), game_json(4291, "Portal")]
            }));
    });

    let client = client_for(&server);
    let query = GamesQuery::new()
        .with_search("portal")
        .with_genres(["puzzle", "action"])
        .with_ordering(SortOrder::descending(Ordering::Metacritic))
        .with_page_size(100);

    let page = client.list_games(&query).await.unwrap();

    api_mock.assert();
    assert_eq!(page.count, 2);
    assert!(!page.has_next());
    assert_eq!(page.results[0].name, "Portal 2");
    assert_eq!(page.results[0].platform_names(), vec!["PC"]);
}

#[tokio::test]
async fn test_game_details_by_slug() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/games/portal-2")
            .query_param("key", KEY);
        then.status(200).json_body(serde_json::json!({
            "id": 4200,
            "slug": "portal-2",
            "name": "Portal 2",
            "name_original": "Portal 2",
            "description_raw": "Portal 2 is a puzzle game.",
            "released": "2011-04-18",
            "developers": [{"id": 1612, "name": "Valve Software", "slug": "valve-software"}],
            "publishers": [{"id": 3408, "name": "Valve", "slug": "valve"}],
            "esrb_rating": {"id": 2, "name": "Everyone 10+", "slug": "everyone-10-plus"}
        }));
    });

    let client = client_for(&server);
    let game = client.game("portal-2").await.unwrap();

    api_mock.assert();
    assert_eq!(game.id, 4200);
    assert_eq!(game.publishers[0].name, "Valve");
    assert_eq!(game.esrb_rating.unwrap().slug, "everyone-10-plus");
}

#[tokio::test]
async fn test_not_found_is_mapped_and_redacted() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/games/does-not-exist");
        then.status(404)
            .json_body(serde_json::json!({"detail": "Not found."}));
    });

    let client = client_for(&server);
    let err = client.game("does-not-exist").await.unwrap_err();

    // 4xx responses are never retried
    api_mock.assert_hits(1);
    match err {
        RawgError::NotFound { url } => {
            assert!(url.contains("/api/games/does-not-exist"));
            assert!(!url.contains(KEY));
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unauthorized_key() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/genres");
        then.status(401)
            .json_body(serde_json::json!({"error": "The key parameter is not provided"}));
    });

    let client = client_for(&server);
    let err = client
        .list_resources(ResourceKind::Genres, &ListQuery::new())
        .await
        .unwrap_err();

    assert!(matches!(err, RawgError::Unauthorized { .. }));
    assert!(!err.to_string().contains(KEY));
}

#[tokio::test]
async fn test_server_errors_are_retried_then_reported() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/platforms");
        then.status(503)
            .json_body(serde_json::json!({"detail": "Service unavailable"}));
    });

    let client = client_for(&server);
    let err = client
        .list_resources(ResourceKind::Platforms, &ListQuery::new())
        .await
        .unwrap_err();

    // first attempt plus two retries
    api_mock.assert_hits(3);
    match err {
        RawgError::ApiRequestFailed {
            status, message, ..
        } => {
            assert_eq!(status, 503);
            assert_eq!(message.as_deref(), Some("Service unavailable"));
        }
        other => panic!("expected ApiRequestFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_bad_request_keeps_detail_message() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/games");
        then.status(400)
            .json_body(serde_json::json!({"detail": "Invalid page."}));
    });

    let client = client_for(&server);
    let err = client
        .list_games(&GamesQuery::new().with_page(999))
        .await
        .unwrap_err();

    api_mock.assert_hits(1);
    assert!(err.to_string().contains("Invalid page."));
}

#[tokio::test]
async fn test_rate_limit_honours_retry_after() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/tags");
        then.status(429).header("Retry-After", "0");
    });

    let client = client_for(&server);
    let err = client
        .list_resources(ResourceKind::Tags, &ListQuery::new())
        .await
        .unwrap_err();

    api_mock.assert_hits(3);
    assert!(matches!(
        err,
        RawgError::RateLimited {
            retry_after_secs: Some(0)
        }
    ));
}

#[tokio::test]
async fn test_malformed_json_is_invalid_response() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/creator-roles");
        then.status(200)
            .header("Content-Type", "application/json")
            .body("{\"results\": [oops");
    });

    let client = client_for(&server);
    let err = client.creator_roles(&ListQuery::new()).await.unwrap_err();

    match err {
        RawgError::InvalidResponse { message } => assert!(!message.contains(KEY)),
        other => panic!("expected InvalidResponse, got {:?}", other),
    }
}

#[tokio::test]
async fn test_all_games_follows_next_links() {
    let server = MockServer::start();
    // RAWG echoes the filters in `next`; this one drops them so each mock matches exactly one page
    let next_url = server.url("/api/games?page=2");

    let first_page = server.mock(|when, then| {
        when.method(GET)
            .path("/api/games")
            .query_param("key", KEY)
            .query_param("search", "zelda");
        then.status(200).json_body(serde_json::json!({
            "count": 3,
            "next": next_url,
            "previous": null,
            "results": [game_json(1, "Zelda One"), game_json(2, "Zelda Two")]
        }));
    });
    let second_page = server.mock(|when, then| {
        when.method(GET)
            .path("/api/games")
            .query_param("key", KEY)
            .query_param("page", "2");
        then.status(200).json_body(serde_json::json!({
            "count": 3,
            "next": null,
            "previous": server.url("/api/games?search=zelda"),
            "results": [game_json(3, "Zelda Three")]
        }));
    });

    let client = client_for(&server);
    let games = client
        .all_games(&GamesQuery::new().with_search("zelda"), 10)
        .await
        .unwrap();

    first_page.assert();
    second_page.assert();
    let ids: Vec<u64> = games.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_client_is_shareable_across_tasks() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/stores");
        then.status(200).json_body(serde_json::json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [{"id": 1, "name": "Steam", "slug": "steam", "games_count": 10}]
        }));
    });

    let config = RawgConfig::new(KEY)
        .with_base_url(server.url("/api"))
        .with_max_concurrent_requests(2);
    let client = Arc::new(DefaultRawgClient::new(config).unwrap());

    let mut handles = Vec::new();
    for _ in 0..6 {
        let client = Arc::clone(&client);
        handles.push(tokio::spawn(async move {
            client
                .list_resources(ResourceKind::Stores, &ListQuery::new())
                .await
        }));
    }
    for handle in handles {
        let page = handle.await.unwrap().unwrap();
        assert_eq!(page.results[0].slug, "steam");
    }

    api_mock.assert_hits(6);
    assert_eq!(client.backend().available_permits(), 2);
}

#[tokio::test]
async fn test_concurrent_requests_are_bounded() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/tags");
        then.status(200)
            .delay(Duration::from_millis(200))
            .json_body(serde_json::json!({
                "count": 0,
                "next": null,
                "previous": null,
                "results": []
            }));
    });

    let config = RawgConfig::new(KEY)
        .with_base_url(server.url("/api"))
        .with_max_concurrent_requests(2);
    let client = Arc::new(DefaultRawgClient::new(config).unwrap());

    let started = std::time::Instant::now();
    let mut handles = Vec::new();
    for _ in 0..6 {
        let client = Arc::clone(&client);
        handles.push(tokio::spawn(async move {
            client.list_resources(ResourceKind::Tags, &ListQuery::new()).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // 6 個請求、最多 2 個同時進行：至少三輪 200ms
    assert!(
        started.elapsed() >= Duration::from_millis(550),
        "finished in {:?}",
        started.elapsed()
    );
    api_mock.assert_hits(6);
    assert_eq!(client.backend().available_permits(), 2);
}

#[tokio::test]
async fn test_connection_failure_is_network_error_without_key() {
    let config = RawgConfig::new(KEY)
        .with_base_url("http://127.0.0.1:1/api")
        .with_max_retries(1)
        .with_retry_delay(Duration::from_millis(1))
        .with_timeout(Duration::from_secs(2));
    let client = DefaultRawgClient::new(config).unwrap();

    let err = client
        .resource(ResourceKind::Genres, "action")
        .await
        .unwrap_err();

    assert!(matches!(err, RawgError::Network(_)));
    assert!(err.is_retryable());
    assert!(!err.to_string().contains(KEY));
    assert!(!format!("{:?}", err).contains(KEY));
}
