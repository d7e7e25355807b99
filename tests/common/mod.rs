#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;

use announcements_api::{
    config::Config,
    models::announcement::{Announcement, AnnouncementInput},
    routes,
    services::announcements::{AnnouncementStore, StoreError},
    AppState,
};

/// Table stand-in with the same id semantics as a serial column: ids only
/// ever grow, so a deleted id is never handed out again.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<(i64, BTreeMap<i64, Announcement>)>,
    pub calls: AtomicUsize,
}

impl MemoryStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().1.len()
    }
}

#[async_trait]
impl AnnouncementStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Announcement>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.lock().unwrap().1.values().cloned().collect())
    }

    async fn create(&self, input: &AnnouncementInput) -> Result<Announcement, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut guard = self.rows.lock().unwrap();
        guard.0 += 1;
        let row = Announcement {
            id: guard.0,
            title: input.title.clone(),
            description: input.description.clone(),
            date: input.date,
        };
        guard.1.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, input: &AnnouncementInput) -> Result<Announcement, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut guard = self.rows.lock().unwrap();
        let row = guard.1.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        row.title = input.title.clone();
        row.description = input.description.clone();
        row.date = input.date;
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rows
            .lock()
            .unwrap()
            .1
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn ping(&self) -> Result<DateTime<Utc>, StoreError> {
        Ok(Utc::now())
    }
}

/// Store whose every call fails like a dropped database.
pub struct BrokenStore;

#[async_trait]
impl AnnouncementStore for BrokenStore {
    async fn list(&self) -> Result<Vec<Announcement>, StoreError> {
        Err(sqlx::Error::PoolClosed.into())
    }

    async fn create(&self, _input: &AnnouncementInput) -> Result<Announcement, StoreError> {
        Err(sqlx::Error::PoolClosed.into())
    }

    async fn update(&self, id: i64, _input: &AnnouncementInput) -> Result<Announcement, StoreError> {
        Err(StoreError::ReadBack(id))
    }

    async fn delete(&self, _id: i64) -> Result<(), StoreError> {
        Err(sqlx::Error::PoolClosed.into())
    }

    async fn ping(&self) -> Result<DateTime<Utc>, StoreError> {
        Err(sqlx::Error::PoolClosed.into())
    }
}

pub fn app_with(store: Arc<dyn AnnouncementStore>, config: Config) -> Router {
    routes::router(AppState {
        store,
        config: Arc::new(config),
    })
}

pub fn app(store: Arc<MemoryStore>) -> Router {
    app_with(store, Config::default())
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn request_with_headers(method: &str, uri: &str, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).unwrap()
}

/// Send one request and decode the JSON answer.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
