use anyhow::Result;
use eastgate_site::app::ports::{ContentStore, CreateOutcome, EmailMessage, EmailSender, GeoPoint, Geocoder};
use eastgate_site::cms::ContentQuery;
use eastgate_site::config::{CmsConfig, EmailConfig, GeocodeConfig};
use eastgate_site::error::SiteError;
use eastgate_site::infra::{NominatimGeocoder, ResendMailer, SanityClient};
use httpmock::prelude::*;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const QUERY_PATH: &str = "/v2023-05-03/data/query/production";
const MUTATE_PATH: &str = "/v2023-05-03/data/mutate/production";

fn cms_config(server: &MockServer, token: Option<&str>) -> CmsConfig {
    CmsConfig {
        project_id: "testproj".to_string(),
        api_host: Some(server.base_url()),
        token: token.map(str::to_string),
        max_counter_retries: 3,
        ..CmsConfig::default()
    }
}

#[tokio::test]
async fn sanity_query_sends_groq_and_params() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(QUERY_PATH)
                .query_param_exists("query")
                .query_param("$slug", "\"hello\"");
            then.status(200)
                .json_body(json!({ "ms": 3, "result": { "_id": "post-1", "title": "Hello" } }));
        })
        .await;

    let client = SanityClient::new(cms_config(&server, None))?;
    let result = client
        .fetch(&ContentQuery::BlogPost { slug: "hello".to_string() })
        .await?;

    mock.assert_async().await;
    assert_eq!(result["title"], json!("Hello"));
    Ok(())
}

#[tokio::test]
async fn sanity_error_bodies_become_cms_errors() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(QUERY_PATH);
            then.status(400).json_body(json!({
                "error": { "description": "expected '}' following object body", "type": "queryParseError" }
            }));
        })
        .await;

    let client = SanityClient::new(cms_config(&server, None))?;
    let err = client.fetch(&ContentQuery::Events).await.unwrap_err();
    match err {
        SiteError::Cms { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "expected '}' following object body");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn sanity_like_patches_against_the_read_revision() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(QUERY_PATH)
                .query_param("$eventId", "\"evt_1\"");
            then.status(200)
                .json_body(json!({ "result": { "_id": "evt_1", "_rev": "rev-a", "likes": 5 } }));
        })
        .await;
    let patch = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(MUTATE_PATH)
                .query_param("returnIds", "true")
                .header("authorization", "Bearer write-token")
                .body_contains("\"ifRevisionID\":\"rev-a\"")
                .body_contains("\"likes\":6");
            then.status(200)
                .json_body(json!({ "transactionId": "tx1", "results": [{ "id": "evt_1", "operation": "update" }] }));
        })
        .await;

    let client = SanityClient::new(cms_config(&server, Some("write-token")))?;
    let likes = client.adjust_event_likes("evt_1", 1).await?;

    patch.assert_async().await;
    assert_eq!(likes, Some(6));
    Ok(())
}

#[tokio::test]
async fn sanity_like_on_missing_event_is_none() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(QUERY_PATH);
            then.status(200).json_body(json!({ "result": null }));
        })
        .await;

    let client = SanityClient::new(cms_config(&server, Some("write-token")))?;
    assert_eq!(client.adjust_event_likes("ghost", 1).await?, None);
    Ok(())
}

#[tokio::test]
async fn sanity_like_gives_up_after_repeated_conflicts() -> Result<()> {
    let server = MockServer::start_async().await;
    let read = server
        .mock_async(|when, then| {
            when.method(GET).path(QUERY_PATH);
            then.status(200)
                .json_body(json!({ "result": { "_id": "evt_1", "_rev": "rev-a", "likes": 2 } }));
        })
        .await;
    let patch = server
        .mock_async(|when, then| {
            when.method(POST).path(MUTATE_PATH);
            then.status(409).json_body(json!({
                "error": { "description": "Document has been modified", "type": "mutationError" }
            }));
        })
        .await;

    let client = SanityClient::new(cms_config(&server, Some("write-token")))?;
    let err = client.adjust_event_likes("evt_1", -1).await.unwrap_err();

    assert!(matches!(err, SiteError::Conflict(_)));
    read.assert_hits_async(3).await;
    patch.assert_hits_async(3).await;
    Ok(())
}

/// A CMS stand-in whose first patch loses a revision race and whose later
/// patches succeed.
async fn flaky_patch_server(reads: Arc<AtomicUsize>, patches: Arc<AtomicUsize>) -> Result<String> {
    use axum::{http::StatusCode, routing::{get, post}, Json, Router};

    let app = Router::new()
        .route(
            QUERY_PATH,
            get(move || {
                let reads = reads.clone();
                async move {
                    let n = reads.fetch_add(1, Ordering::SeqCst);
                    let (rev, likes) = if n == 0 { ("rev-a", 5) } else { ("rev-b", 7) };
                    Json(json!({ "result": { "_id": "evt_1", "_rev": rev, "likes": likes } }))
                }
            }),
        )
        .route(
            MUTATE_PATH,
            post(move |Json(body): Json<serde_json::Value>| {
                let patches = patches.clone();
                async move {
                    patches.fetch_add(1, Ordering::SeqCst);
                    let revision = body.pointer("/mutations/0/patch/ifRevisionID").cloned();
                    if revision == Some(json!("rev-a")) {
                        (StatusCode::CONFLICT, Json(json!({
                            "error": { "description": "Document has been modified", "type": "mutationError" }
                        })))
                    } else {
                        (StatusCode::OK, Json(json!({ "transactionId": "tx3", "results": [{ "id": "evt_1" }] })))
                    }
                }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

#[tokio::test]
async fn sanity_like_retries_once_after_a_conflict() -> Result<()> {
    let reads = Arc::new(AtomicUsize::new(0));
    let patches = Arc::new(AtomicUsize::new(0));
    let base_url = flaky_patch_server(reads.clone(), patches.clone()).await?;

    let config = CmsConfig {
        project_id: "testproj".to_string(),
        api_host: Some(base_url),
        token: Some("write-token".to_string()),
        max_counter_retries: 3,
        ..CmsConfig::default()
    };
    let client = SanityClient::new(config)?;

    // the second attempt starts from the re-read count of 7
    assert_eq!(client.adjust_event_likes("evt_1", 1).await?, Some(8));
    assert_eq!(reads.load(Ordering::SeqCst), 2);
    assert_eq!(patches.load(Ordering::SeqCst), 2);
    Ok(())
}

#[tokio::test]
async fn sanity_create_conflict_means_already_exists() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(MUTATE_PATH).body_contains("\"create\"");
            then.status(409).json_body(json!({
                "error": { "description": "Document by ID \"n1\" already exists", "type": "mutationError" }
            }));
        })
        .await;

    let client = SanityClient::new(cms_config(&server, Some("write-token")))?;
    let outcome = client
        .create_if_absent(json!({ "_id": "n1", "_type": "homeGroupNotification" }))
        .await?;
    assert_eq!(outcome, CreateOutcome::AlreadyExists { id: "n1".to_string() });
    Ok(())
}

#[tokio::test]
async fn sanity_create_reports_created_id() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(MUTATE_PATH);
            then.status(200)
                .json_body(json!({ "transactionId": "tx2", "results": [{ "id": "n2", "operation": "create" }] }));
        })
        .await;

    let client = SanityClient::new(cms_config(&server, Some("write-token")))?;
    let outcome = client
        .create_if_absent(json!({ "_id": "n2", "_type": "homeGroupNotification" }))
        .await?;
    assert_eq!(outcome, CreateOutcome::Created { id: "n2".to_string() });
    Ok(())
}

#[tokio::test]
async fn sanity_ping_reflects_endpoint_status() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2021-06-07/ping");
            then.status(200).body("PONG");
        })
        .await;

    let client = SanityClient::new(cms_config(&server, None))?;
    assert!(client.ping().await);
    Ok(())
}

fn email_config(server: &MockServer, api_key: Option<&str>) -> EmailConfig {
    EmailConfig {
        api_base: server.base_url(),
        api_key: api_key.map(str::to_string),
        ..EmailConfig::default()
    }
}

fn message() -> EmailMessage {
    EmailMessage {
        from: "noreply@eastgatejax.com".to_string(),
        to: vec!["leader@example.com".to_string()],
        subject: "New RSVP for Home Group: Riverside".to_string(),
        text: "Name: Sam".to_string(),
    }
}

#[tokio::test]
async fn resend_posts_message_with_bearer_key() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/emails")
                .header("authorization", "Bearer re_test")
                .json_body(json!({
                    "from": "noreply@eastgatejax.com",
                    "to": ["leader@example.com"],
                    "subject": "New RSVP for Home Group: Riverside",
                    "text": "Name: Sam",
                }));
            then.status(200).json_body(json!({ "id": "email_1" }));
        })
        .await;

    let mailer = ResendMailer::new(reqwest::Client::new(), &email_config(&server, Some("re_test")));
    mailer.send(&message()).await?;

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn resend_rejection_is_an_email_error() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/emails");
            then.status(422).json_body(json!({ "message": "invalid from address" }));
        })
        .await;

    let mailer = ResendMailer::new(reqwest::Client::new(), &email_config(&server, Some("re_test")));
    let err = mailer.send(&message()).await.unwrap_err();
    assert!(matches!(err, SiteError::Email(_)));
    Ok(())
}

#[tokio::test]
async fn resend_without_key_never_calls_out() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/emails");
            then.status(200);
        })
        .await;

    let mailer = ResendMailer::new(reqwest::Client::new(), &email_config(&server, None));
    assert!(mailer.send(&message()).await.is_err());
    mock.assert_hits_async(0).await;
    Ok(())
}

fn geocode_config(server: &MockServer) -> GeocodeConfig {
    GeocodeConfig {
        base_url: server.base_url(),
        ..GeocodeConfig::default()
    }
}

#[tokio::test]
async fn nominatim_returns_first_match() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("postalcode", "32207")
                .query_param("country", "US")
                .query_param("format", "json")
                .query_param("limit", "1")
                .header("user-agent", "EastGateChurch/1.0");
            then.status(200)
                .json_body(json!([{ "lat": "30.2921", "lon": "-81.6412", "display_name": "32207, Jacksonville" }]));
        })
        .await;

    let geocoder = NominatimGeocoder::new(reqwest::Client::new(), &geocode_config(&server));
    let point = geocoder.geocode("32207", "US").await?;

    mock.assert_async().await;
    assert_eq!(point, Some(GeoPoint { lon: -81.6412, lat: 30.2921 }));
    Ok(())
}

#[tokio::test]
async fn nominatim_empty_or_failed_lookups_are_none() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/search").query_param("postalcode", "00000");
            then.status(200).json_body(json!([]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/search").query_param("postalcode", "11111");
            then.status(503);
        })
        .await;

    let geocoder = NominatimGeocoder::new(reqwest::Client::new(), &geocode_config(&server));
    assert_eq!(geocoder.geocode("00000", "US").await?, None);
    assert_eq!(geocoder.geocode("11111", "US").await?, None);
    Ok(())
}
