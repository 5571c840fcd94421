use odc_core::config::SupabaseConfig;
use odc_core::error::OdcError;
use odc_core::image::{ImageFolder, ImageStore, ImageUpload, StoredImage, remove_image, store_image};
use odc_core::store::{RecordStore, load_records};
use odc_core::{City, EventStatus};
use odc_provider_supabase::SupabaseStore;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store(server: &MockServer) -> SupabaseStore {
    SupabaseStore::new(&SupabaseConfig {
        url: format!("{}/", server.uri()),
        anon_key: "anon-key".into(),
        bucket: "odc-images".into(),
    })
    .unwrap()
}

fn formation_row() -> serde_json::Value {
    json!({
        "id": "f-1",
        "title": "Python Basics",
        "category": "ecole-du-code",
        "description": "Intro",
        "date_start": "2024-03-04",
        "date_end": "2024-03-06",
        "time_start": "09:00:00",
        "time_end": "17:00:00",
        "city": "rabat",
        "location": "ODC Rabat",
        "image": null,
        "max_participants": 20,
        "current_participants": 4,
        "registration_link": null,
        "status": "active",
        "created_at": "2024-02-01T10:00:00+00:00"
    })
}

fn event_row() -> serde_json::Value {
    json!({
        "id": "e-1",
        "title": "AI Workshop",
        "category": null,
        "description": "Hands-on",
        "date_start": "2024-03-05",
        "time_start": "14:00:00",
        "time_end": "16:00:00",
        "city": "agadir",
        "location": null,
        "image": null,
        "speaker": "Sara",
        "max_participants": 30,
        "current_participants": 10,
        "price": 0,
        "status": "complet"
    })
}

#[tokio::test]
async fn fetch_sends_auth_headers_and_decodes_rows() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/formations"))
        .and(query_param("select", "*"))
        .and(query_param("order", "date_start.asc"))
        .and(header("apikey", "anon-key"))
        .and(header("Authorization", "Bearer anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([formation_row()])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/events"))
        .and(header("apikey", "anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([event_row()])))
        .expect(1)
        .mount(&server)
        .await;

    let records = load_records(&store(&server)).await;
    assert_eq!(records.formations.len(), 1);
    assert_eq!(records.formations[0].current_participants, 4);
    assert_eq!(records.events[0].city, City::Agadir);
    assert_eq!(records.events[0].status, EventStatus::Full);
    assert_eq!(records.events[0].category, "workshop");
}

#[tokio::test]
async fn malformed_row_is_skipped_and_reported() {
    let server = MockServer::start().await;

    let mut broken = formation_row();
    broken["id"] = json!("f-broken");
    broken["time_start"] = serde_json::Value::Null;
    broken["max_participants"] = serde_json::Value::Null;

    Mock::given(method("GET"))
        .and(path("/rest/v1/formations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([broken, formation_row()])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let records = load_records(&store(&server)).await;
    assert_eq!(records.formations.len(), 1);
    assert_eq!(records.formations[0].id, "f-1");
    assert_eq!(records.rejected.len(), 1);
    assert_eq!(records.rejected[0].record_id, "f-broken");
}

#[tokio::test]
async fn failed_fetch_surfaces_as_store_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/events"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&server)
        .await;

    match store(&server).fetch_events().await {
        Err(OdcError::Store(message)) => assert!(message.contains("401")),
        other => panic!("expected store error, got {:?}", other),
    }
}

#[tokio::test]
async fn save_upserts_and_returns_representation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/formations"))
        .and(header("Prefer", "resolution=merge-duplicates,return=representation"))
        .and(body_partial_json(json!({ "id": "f-1", "city": "rabat" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([formation_row()])))
        .expect(1)
        .mount(&server)
        .await;

    let formation = serde_json::from_value(formation_row()).unwrap();
    let saved = store(&server).save_formation(&formation).await.unwrap();
    assert_eq!(saved.id, "f-1");
}

#[tokio::test]
async fn delete_filters_by_id_and_reports_missing_rows() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/events"))
        .and(query_param("id", "eq.e-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([event_row()])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/events"))
        .and(query_param("id", "eq.gone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = store(&server);
    store.delete_event("e-1").await.unwrap();
    assert!(matches!(store.delete_event("gone").await, Err(OdcError::NotFound(_))));
}

#[tokio::test]
async fn upload_returns_public_url_and_delete_uses_object_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/storage/v1/object/odc-images/events/\d+-[0-9a-f-]+\.png$"))
        .and(header("x-upsert", "true"))
        .and(header("Content-Type", "image/png"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Key": "ok" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path_regex(r"^/storage/v1/object/odc-images/events/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let store = store(&server);
    let upload = ImageUpload {
        file_name: "poster.png".into(),
        content_type: "image/png".into(),
        bytes: vec![1, 2, 3],
    };
    let stored = store_image(&store, &upload, ImageFolder::Events).await.unwrap();
    let StoredImage::Remote(url) = &stored else {
        panic!("expected remote image, got {:?}", stored);
    };
    let prefix = format!("{}/storage/v1/object/public/odc-images/", server.uri());
    assert!(url.starts_with(&prefix));
    assert!(store.path_for_url(url).unwrap().starts_with("events/"));

    assert!(remove_image(&store, url).await.unwrap());
}

#[tokio::test]
async fn missing_bucket_falls_back_to_inline_image() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/storage/v1/object/"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Bucket not found"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/storage/v1/bucket/odc-images"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let store = store(&server);
    assert!(!store.bucket_exists().await.unwrap());

    let upload = ImageUpload {
        file_name: "a.jpg".into(),
        content_type: "image/jpeg".into(),
        bytes: vec![0, 0, 0],
    };
    let stored = store_image(&store, &upload, ImageFolder::Formations).await.unwrap();
    assert_eq!(stored, StoredImage::Inline("data:image/jpeg;base64,AAAA".into()));
}

#[tokio::test]
async fn connection_test_probes_formations() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/formations"))
        .and(query_param("select", "id"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    store(&server).test_connection().await.unwrap();
}
