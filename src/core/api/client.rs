use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;

use super::config::ClientConfig;
use super::envelope::ApiResponse;
use crate::core::content::models::{
    Announcement, AnnouncementCategory, Contact, Event, FooterLink, GalleryItem, Program,
    SiteConfig,
};

pub const SITE_PATH: &str = "/content/site";
pub const EVENTS_PATH: &str = "/events";
pub const PROGRAMS_PATH: &str = "/programs";
pub const CONTACTS_PATH: &str = "/contacts";
pub const GALLERY_PATH: &str = "/gallery";
pub const FOOTER_LINKS_PATH: &str = "/footer-links";
pub const ANNOUNCEMENTS_PATH: &str = "/announcements";
pub const ANNOUNCEMENT_CATEGORIES_PATH: &str = "/announcement-categories";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    HttpStatus(u16),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Read-only client for the public content endpoints.
///
/// Each resource operation performs one GET and never fails: transport
/// errors, non-2xx statuses, bodies that do not decode and envelopes without
/// `data` all settle to `None` or an empty list, with a log line naming the
/// endpoint.
#[derive(Debug, Clone)]
pub struct ContentClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ContentClient {
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn to_absolute_url(&self, url: &str) -> String {
        self.config.to_absolute_url(url)
    }

    /// Fetches and decodes one envelope, surfacing every failure.
    pub async fn fetch_envelope<T>(&self, path: &str) -> Result<ApiResponse<T>, FetchError>
    where
        T: DeserializeOwned,
    {
        let response = self.http.get(self.config.endpoint(path)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn fetch_data<T>(&self, path: &str) -> Result<Option<T>, FetchError>
    where
        T: DeserializeOwned,
    {
        let envelope = self.fetch_envelope::<T>(path).await?;
        Ok(envelope.into_data())
    }

    async fn fetch_one<T>(&self, path: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        settle(path, self.fetch_data(path).await)
    }

    async fn fetch_list<T>(&self, path: &str) -> Vec<T>
    where
        T: DeserializeOwned,
    {
        settle(path, self.fetch_data(path).await).unwrap_or_default()
    }

    pub async fn get_site_config(&self) -> Option<SiteConfig> {
        self.fetch_one(SITE_PATH).await
    }

    pub async fn get_events(&self) -> Vec<Event> {
        self.fetch_list(EVENTS_PATH).await
    }

    pub async fn get_programs(&self) -> Vec<Program> {
        self.fetch_list(PROGRAMS_PATH).await
    }

    pub async fn get_contacts(&self) -> Vec<Contact> {
        self.fetch_list(CONTACTS_PATH).await
    }

    pub async fn get_gallery(&self) -> Vec<GalleryItem> {
        self.fetch_list(GALLERY_PATH).await
    }

    pub async fn get_footer_links(&self) -> Vec<FooterLink> {
        self.fetch_list(FOOTER_LINKS_PATH).await
    }

    pub async fn get_announcements(&self) -> Vec<Announcement> {
        self.fetch_list(ANNOUNCEMENTS_PATH).await
    }

    pub async fn get_announcement_by_slug(&self, slug: &str) -> Option<Announcement> {
        self.fetch_one(&format!("{ANNOUNCEMENTS_PATH}/{slug}")).await
    }

    pub async fn get_announcement_categories(&self) -> Vec<AnnouncementCategory> {
        self.fetch_list(ANNOUNCEMENT_CATEGORIES_PATH).await
    }
}

fn settle<T>(endpoint: &str, result: Result<Option<T>, FetchError>) -> Option<T> {
    match result {
        Ok(Some(data)) => Some(data),
        Ok(None) => {
            tracing::debug!(endpoint, "response carried no data");
            None
        }
        Err(error) => {
            tracing::warn!(endpoint, error = %error, "content request failed");
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap as AxumHeaders, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone, Default)]
    pub(crate) struct AppState {
        pub request_count: Arc<AtomicUsize>,
        pub content_types: Arc<Mutex<Vec<String>>>,
    }

    fn record(state: &AppState, headers: &AxumHeaders) {
        state.request_count.fetch_add(1, Ordering::SeqCst);
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        state
            .content_types
            .lock()
            .expect("lock should not be poisoned")
            .push(content_type);
    }

    async fn site_handler(State(state): State<AppState>, headers: AxumHeaders) -> Json<Value> {
        record(&state, &headers);
        Json(json!({
            "ok": true,
            "data": {
                "id": 1,
                "brand_name": "Masjid Al Taubah",
                "logo_url": "/uploads/logo.png",
                "live_video_url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
            }
        }))
    }

    async fn events_handler(State(state): State<AppState>, headers: AxumHeaders) -> Json<Value> {
        record(&state, &headers);
        Json(json!({
            "ok": true,
            "data": [
                { "id": "1", "title": "Eid", "kind": "oneoff", "event_date": "2026-03-20", "event_time": "07:30", "when_text": "", "note": "Bring a mat", "created_at": "2026-02-01T10:00:00Z" },
                { "id": 2, "title": "Tafseer", "kind": "recurring", "event_date": null, "event_time": null, "when_text": "Mondays after Maghrib", "note": null, "created_at": null },
                { "id": "3", "title": "Quran Competition", "kind": "oneoff", "event_date": "2026-04-11", "event_time": "14:00", "when_text": "", "note": "", "created_at": "2026-02-03T10:00:00Z" },
                { "id": "4", "title": "Fundraiser", "kind": "oneoff", "event_date": "2026-05-02", "event_time": "18:30", "when_text": "", "note": "", "created_at": "2026-02-04T10:00:00Z" }
            ]
        }))
    }

    async fn programs_handler() -> Json<Value> {
        Json(json!({
            "ok": true,
            "data": [
                { "id": "p1", "title": "Madrasah", "grades": "1-7", "description": "Weekday classes", "days": "Mon-Thu", "time": "15:00", "note": null, "created_at": "2026-01-01T00:00:00Z" }
            ]
        }))
    }

    async fn contacts_handler() -> Json<Value> {
        Json(json!({
            "ok": true,
            "data": [
                { "id": "c1", "role": "Imam", "name": "Sheikh Yusuf", "email": "imam@example.org", "phone": "+27 21 000 0000", "created_at": "2026-01-01T00:00:00Z" }
            ]
        }))
    }

    async fn gallery_handler() -> Json<Value> {
        Json(json!({
            "ok": false,
            "error": "gallery disabled"
        }))
    }

    async fn footer_links_handler() -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, "temporary failure").into_response()
    }

    async fn announcements_handler() -> Json<Value> {
        let rows: Vec<Value> = (1..=7)
            .map(|index| {
                let pinned = i64::from(index == 1);
                let excerpt = if index == 2 {
                    "word ".repeat(40)
                } else {
                    String::new()
                };
                json!({
                    "id": format!("a{index}"),
                    "title": format!("Notice {index}"),
                    "slug": format!("notice-{index}"),
                    "content_html": format!("<p>Body <b>{index}</b></p>"),
                    "excerpt": excerpt,
                    "status": "published",
                    "pinned": pinned,
                    "publish_at": null,
                    "created_at": "2026-03-01T08:00:00Z",
                    "updated_at": "2026-03-01T08:00:00Z",
                    "categories": [{ "id": "cat-1", "name": "General", "slug": "general" }]
                })
            })
            .collect();
        Json(json!({ "ok": true, "data": rows }))
    }

    async fn announcement_handler(Path(slug): Path<String>) -> Response {
        if slug != "eid-salah" {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "ok": false, "error": "not found" })),
            )
                .into_response();
        }
        Json(json!({
            "ok": true,
            "data": {
                "id": "a9",
                "title": "Eid Salah",
                "slug": "eid-salah",
                "content_html": "<p>Salah at <b>07:30</b></p>",
                "excerpt": "Salah times",
                "status": "published",
                "pinned": true,
                "publish_at": "2026-03-19T12:00:00Z",
                "created_at": "2026-03-10T12:00:00Z",
                "updated_at": "2026-03-10T12:00:00Z",
                "featured_image_url": "/uploads/eid.jpg"
            }
        }))
        .into_response()
    }

    async fn categories_handler() -> Response {
        (
            [(CONTENT_TYPE, "application/json")],
            "{\"ok\": true, \"data\": [",
        )
            .into_response()
    }

    pub(crate) async fn spawn_test_server() -> (String, AppState, tokio::task::JoinHandle<()>) {
        let state = AppState::default();
        let app = Router::new()
            .route("/api/content/site", get(site_handler))
            .route("/api/events", get(events_handler))
            .route("/api/programs", get(programs_handler))
            .route("/api/contacts", get(contacts_handler))
            .route("/api/gallery", get(gallery_handler))
            .route("/api/footer-links", get(footer_links_handler))
            .route("/api/announcements", get(announcements_handler))
            .route("/api/announcements/{slug}", get(announcement_handler))
            .route("/api/announcement-categories", get(categories_handler))
            .with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let address = listener.local_addr().expect("local addr should exist");
        let join_handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server should run");
        });
        (format!("http://{address}/api"), state, join_handle)
    }

    pub(crate) fn client_for(base_url: &str) -> ContentClient {
        let config = ClientConfig::new(base_url)
            .expect("base url should be valid")
            .with_timeout(Duration::from_secs(5))
            .expect("timeout should be valid");
        ContentClient::new(config).expect("client should build")
    }

    async fn unreachable_base_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let address = listener.local_addr().expect("local addr should exist");
        drop(listener);
        format!("http://{address}/api")
    }

    #[tokio::test]
    async fn events_are_unwrapped_in_server_order() {
        let (base_url, state, server_task) = spawn_test_server().await;
        let client = client_for(&base_url);

        let events = client.get_events().await;
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].id, "1");
        assert_eq!(events[0].title, "Eid");
        assert_eq!(events[0].note.as_deref(), Some("Bring a mat"));
        assert_eq!(events[1].id, "2");
        assert_eq!(events[1].title, "Tafseer");
        assert_eq!(events[1].event_date, "");
        assert_eq!(events[3].title, "Fundraiser");

        let content_types = state.content_types.lock().expect("lock").clone();
        assert_eq!(content_types, vec!["application/json".to_string()]);

        server_task.abort();
    }

    #[tokio::test]
    async fn singleton_and_list_resources_decode() {
        let (base_url, _state, server_task) = spawn_test_server().await;
        let client = client_for(&base_url);

        let site = client.get_site_config().await.expect("site config should load");
        assert_eq!(site.id, 1);
        assert_eq!(site.brand_name.as_deref(), Some("Masjid Al Taubah"));
        assert_eq!(
            client.to_absolute_url(site.logo_url.as_deref().unwrap_or_default()),
            format!("{}/uploads/logo.png", base_url.trim_end_matches("/api"))
        );

        let programs = client.get_programs().await;
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[0].grades, "1-7");

        let contacts = client.get_contacts().await;
        assert_eq!(contacts[0].role, "Imam");

        let announcements = client.get_announcements().await;
        assert_eq!(announcements.len(), 7);
        assert!(announcements[0].is_pinned());
        assert!(!announcements[1].is_pinned());

        server_task.abort();
    }

    #[tokio::test]
    async fn announcement_lookup_by_slug() {
        let (base_url, _state, server_task) = spawn_test_server().await;
        let client = client_for(&base_url);

        let found = client
            .get_announcement_by_slug("eid-salah")
            .await
            .expect("announcement should exist");
        assert_eq!(found.title, "Eid Salah");
        assert!(found.is_pinned());
        assert_eq!(found.featured_image(), Some("/uploads/eid.jpg"));

        assert!(client.get_announcement_by_slug("missing").await.is_none());

        server_task.abort();
    }

    #[tokio::test]
    async fn envelope_without_data_yields_empty_list() {
        let (base_url, _state, server_task) = spawn_test_server().await;
        let client = client_for(&base_url);

        assert!(client.get_gallery().await.is_empty());

        server_task.abort();
    }

    #[tokio::test]
    async fn failures_settle_to_empty_values() {
        let (base_url, _state, server_task) = spawn_test_server().await;
        let client = client_for(&base_url);

        assert!(client.get_footer_links().await.is_empty());
        assert!(client.get_announcement_categories().await.is_empty());

        let status = client
            .fetch_envelope::<Vec<FooterLink>>(FOOTER_LINKS_PATH)
            .await
            .expect_err("500 should be an error");
        assert!(matches!(status, FetchError::HttpStatus(500)));

        let decode = client
            .fetch_envelope::<Vec<AnnouncementCategory>>(ANNOUNCEMENT_CATEGORIES_PATH)
            .await
            .expect_err("truncated json should be an error");
        assert!(matches!(decode, FetchError::Decode(_)));

        server_task.abort();
    }

    #[tokio::test]
    async fn unreachable_host_never_raises() {
        let client = client_for(&unreachable_base_url().await);

        assert!(client.get_site_config().await.is_none());
        assert!(client.get_announcement_by_slug("eid-salah").await.is_none());
        assert!(client.get_events().await.is_empty());
        assert!(client.get_programs().await.is_empty());
        assert!(client.get_contacts().await.is_empty());
        assert!(client.get_gallery().await.is_empty());
        assert!(client.get_footer_links().await.is_empty());
        assert!(client.get_announcements().await.is_empty());
        assert!(client.get_announcement_categories().await.is_empty());

        let error = client
            .fetch_envelope::<Vec<Event>>(EVENTS_PATH)
            .await
            .expect_err("connection should be refused");
        assert!(matches!(error, FetchError::Request(_)));
    }

    #[tokio::test]
    async fn sparse_rows_do_not_empty_the_list() {
        async fn links_handler() -> Json<Value> {
            Json(json!({
                "ok": true,
                "data": [
                    { "id": "l1", "label": "Donate", "url": "/donate", "sort_order": 1, "created_at": "2026-01-01T00:00:00Z" },
                    { "id": 5, "label": "Radio", "url": null, "sort_order": null, "created_at": null },
                    { "id": 6.0, "label": null, "url": "https://radio.example", "sort_order": "3" }
                ]
            }))
        }
        async fn contacts_handler() -> Json<Value> {
            Json(json!({
                "ok": true,
                "data": [
                    { "id": 1, "role": "Imam", "name": "Sheikh Yusuf", "email": null, "phone": 215550100 },
                    { "id": "c2", "role": "Secretary", "name": "Amina", "email": "office@example.org", "phone": "" }
                ]
            }))
        }

        let app = Router::new()
            .route("/api/footer-links", get(links_handler))
            .route("/api/contacts", get(contacts_handler));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let address = listener.local_addr().expect("local addr should exist");
        let server_task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server should run");
        });
        let client = client_for(&format!("http://{address}/api"));

        let links = client.get_footer_links().await;
        assert_eq!(links.len(), 3);
        assert_eq!(links[1].id, "5");
        assert_eq!(links[1].url, "");
        assert_eq!(links[1].sort_order, 0);
        assert_eq!(links[2].id, "6");
        assert_eq!(links[2].sort_order, 3);

        let contacts = client.get_contacts().await;
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].id, "1");
        assert_eq!(contacts[0].email, "");
        assert_eq!(contacts[0].phone, "215550100");
        assert_eq!(contacts[1].name, "Amina");

        server_task.abort();
    }

    #[tokio::test]
    async fn slow_responses_time_out_to_empty() {
        async fn slow_handler() -> Json<Value> {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({ "ok": true, "data": [{ "id": "late" }] }))
        }

        let app = Router::new().route("/api/events", get(slow_handler));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let address = listener.local_addr().expect("local addr should exist");
        let server_task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server should run");
        });

        let config = ClientConfig::new(format!("http://{address}/api"))
            .expect("base url should be valid")
            .with_timeout(Duration::from_millis(200))
            .expect("timeout should be valid");
        let client = ContentClient::new(config).expect("client should build");

        assert!(client.get_events().await.is_empty());

        server_task.abort();
    }
}
