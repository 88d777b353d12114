//! Tests of the REST client, against a mocked backend

use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use events_admin::client::Client;
use events_admin::traits::EventSource;
use events_admin::{EventFields, EventId, EventRecord, VenueId};

const KEY: &str = "test-api-key";

fn gala() -> EventRecord {
    EventRecord::new(EventId::from(1), EventFields {
        name: "Grand Gala".to_string(),
        date: "2024-05-01".to_string(),
        venue_id: VenueId::from(3),
        is_starred: false,
        is_private: false,
        is_cancelled: false,
    })
}

#[tokio::test]
async fn test_list() {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/events"))
        .and(query_param("select", "*"))
        .and(header("apikey", KEY))
        .and(header("Authorization", "Bearer test-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": 2, "name": "Fair", "date": "2024-07-07", "venue_id": 8, "is_starred": true, "private": false, "cancelled": true },
            { "id": 1, "name": "Grand Gala", "date": "2024-05-01", "venue_id": 3, "is_starred": false, "private": false, "cancelled": false },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(server.uri(), KEY).unwrap().with_table("events");
    let events = client.list().await.unwrap();

    let ids: Vec<EventId> = events.iter().map(|ev| *ev.id()).collect();
    assert_eq!(ids, vec![EventId::from(2), EventId::from(1)]);
    assert!(events[0].is_starred());
    assert!(events[0].is_cancelled());
    assert_eq!(events[1], gala());
}

#[tokio::test]
async fn test_list_forwards_the_order() {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/shows"))
        .and(query_param("order", "date.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(server.uri(), KEY).unwrap()
        .with_table("shows")
        .with_order("date.asc");
    assert!(client.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create() {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/events"))
        .and(header("Prefer", "return=representation"))
        .and(header("apikey", KEY))
        .and(body_json(serde_json::json!({
            "name": "", "date": "", "venue_id": "",
            "is_starred": false, "private": false, "cancelled": false,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([
            { "id": 12, "name": "", "date": "", "venue_id": null, "is_starred": false, "private": false, "cancelled": false },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(server.uri(), KEY).unwrap().with_table("events");
    let id = client.create(EventFields::default()).await.unwrap();
    assert_eq!(id, EventId::from(12));
}

#[tokio::test]
async fn test_update_sends_the_full_record() {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/events"))
        .and(query_param("id", "eq.1"))
        .and(header("apikey", KEY))
        .and(body_json(serde_json::json!({
            "id": 1, "name": "Grand Gala", "date": "2024-05-01", "venue_id": 3,
            "is_starred": false, "private": false, "cancelled": false,
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(server.uri(), KEY).unwrap().with_table("events");
    client.update(gala()).await.unwrap();
}

#[tokio::test]
async fn test_delete() {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/events"))
        .and(query_param("id", "eq.5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(server.uri(), KEY).unwrap().with_table("events");
    client.delete(&EventId::from(5)).await.unwrap();
}

#[tokio::test]
async fn test_errors_carry_the_status() {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(403).set_body_string("permission denied for table events"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = Client::new(server.uri(), KEY).unwrap().with_table("events");

    let err = client.delete(&EventId::from(5)).await.unwrap_err().to_string();
    assert!(err.contains("403"));
    assert!(err.contains("permission denied"));

    assert!(client.list().await.is_err());
}
