use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::ShiftError,
    models::{
        auth::AuthenticatedUser,
        shift::{CalendarRangeQuery, CreateShiftRequest},
    },
    services::{calendar, shifts::ShiftService},
    AppState,
};

/// POST /shifts — expand a single or weekly pattern and persist every occurrence
pub async fn create_shift(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: Result<Json<CreateShiftRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    // A body that is not JSON of the right shape is a bad request, not an empty expansion.
    let Json(body) = body.map_err(|rejection| ShiftError::validation("body", rejection.body_text()))?;
    let created = ShiftService::create(
        state.store.as_ref(),
        state.group_ids.as_ref(),
        &body,
        user.user_id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(json!(created))))
}

/// GET /shifts/calendar?from=YYYY-MM-DD&to=YYYY-MM-DD — caller's shifts as calendar events
pub async fn get_calendar(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(range): Query<CalendarRangeQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let shifts = ShiftService::list_range(state.store.as_ref(), user.user_id, range).await?;
    Ok(Json(json!(calendar::project(&shifts))))
}

/// DELETE /shifts/{id} — removes this occurrence only, never its series
pub async fn delete_shift(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    ShiftService::delete(state.store.as_ref(), user.user_id, id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request},
        Router,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::{
        config::Config,
        db::memory::MemoryShiftStore,
        middleware::auth::encode_access_token,
        routes::router,
        services::{calendar::ON_DUTY_COLOR, group_ids::SequentialGroupIds},
    };

    const SECRET: &str = "test-secret";

    fn app(store: Arc<MemoryShiftStore>) -> Router {
        app_for(store, "http://localhost")
    }

    fn app_for(store: Arc<MemoryShiftStore>, base_url: &str) -> Router {
        let config = Config {
            database_url: String::new(),
            db_max_connections: 1,
            jwt_secret: SECRET.into(),
            host: "127.0.0.1".into(),
            port: 0,
            app_base_url: base_url.into(),
        };
        let state = AppState {
            store,
            group_ids: Arc::new(SequentialGroupIds::new()),
        };
        router(state, &config)
    }

    fn bearer(user_id: Uuid) -> String {
        format!("Bearer {}", encode_access_token(user_id, SECRET, 300).unwrap())
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_shift(user_id: Uuid, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/shifts")
            .header(header::AUTHORIZATION, bearer(user_id))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn weekly_body(days: Value, until: &str) -> Value {
        json!({
            "date_start": "2026-01-05",
            "time_start": "08:00:00",
            "time_end": "16:00:00",
            "category": "ON_DUTY",
            "description": "Ramp crew",
            "recurrence_frequency": "weekly",
            "recurrence_days": days,
            "recurrence_until": until,
        })
    }

    #[tokio::test]
    async fn test_create_then_render_calendar() {
        let owner = Uuid::new_v4();
        let store = Arc::new(MemoryShiftStore::new().with_assignee(owner, "Alex Martin"));

        let (status, body) = send(app(store.clone()), post_shift(owner, weekly_body(json!([1]), "2026-01-26"))).await;
        assert_eq!(status, StatusCode::CREATED);
        let created = body.as_array().unwrap();
        assert_eq!(created.len(), 4);
        let group = &created[0]["recurring_group_id"];
        assert!(!group.is_null());
        assert!(created.iter().all(|s| &s["recurring_group_id"] == group));

        let req = Request::builder()
            .uri("/shifts/calendar?from=2026-01-01&to=2026-01-31")
            .header(header::AUTHORIZATION, bearer(owner))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(store), req).await;
        assert_eq!(status, StatusCode::OK);
        let events = body.as_array().unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0]["title"], "ON DUTY — Alex Martin (Ramp crew)");
        assert_eq!(events[0]["color"], ON_DUTY_COLOR);
        assert_eq!(events[0]["start"], "2026-01-05T08:00:00");
        assert_eq!(events[3]["end"], "2026-01-26T16:00:00");
        assert_eq!(events[0]["id"], created[0]["id"]);
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let req = Request::builder()
            .method("POST")
            .uri("/shifts")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(weekly_body(json!([1]), "2026-01-26").to_string()))
            .unwrap();
        let resp = app(Arc::new(MemoryShiftStore::new())).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_pattern_is_bad_request() {
        let (status, body) = send(
            app(Arc::new(MemoryShiftStore::new())),
            post_shift(Uuid::new_v4(), weekly_body(json!([]), "2026-01-26")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "recurrence_days");
    }

    #[tokio::test]
    async fn test_malformed_values_are_bad_requests() {
        let store = Arc::new(MemoryShiftStore::new());
        let owner = Uuid::new_v4();

        let (status, body) = send(app(store.clone()), post_shift(owner, weekly_body(json!([1]), "2026-02-30"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "recurrence_until");

        let (status, body) = send(app(store.clone()), post_shift(owner, weekly_body(json!([300]), "2026-01-26"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "recurrence_days");

        let mut lunch = weekly_body(json!([1]), "2026-01-26");
        lunch["category"] = json!("LUNCH");
        let (status, body) = send(app(store.clone()), post_shift(owner, lunch)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "category");

        let (status, body) = send(app(store.clone()), post_shift(owner, weekly_body(json!(["mon"]), "2026-01-26"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "body");

        let list = Request::builder()
            .uri("/shifts/calendar?from=2026-01-01&to=2026-12-31")
            .header(header::AUTHORIZATION, bearer(owner))
            .body(Body::empty())
            .unwrap();
        let (_, body) = send(app(store), list).await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unbounded_recurrence_is_bad_request() {
        let (status, body) = send(
            app(Arc::new(MemoryShiftStore::new())),
            post_shift(Uuid::new_v4(), weekly_body(json!([1]), "9999-12-31")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "recurrence_until");
    }

    #[tokio::test]
    async fn test_cors_allows_exact_origin_only() {
        let from_origin = |origin: &str| {
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, origin)
                .body(Body::empty())
                .unwrap()
        };
        let store = Arc::new(MemoryShiftStore::new());

        let resp = app_for(store.clone(), "https://ops.example.com")
            .oneshot(from_origin("https://ops.example.com"))
            .await
            .unwrap();
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://ops.example.com"
        );

        let resp = app_for(store.clone(), "https://ops.example.com")
            .oneshot(from_origin("http://localhost:5173"))
            .await
            .unwrap();
        assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_some());

        for foreign in [
            "https://evil.ops.example.com",
            "https://example.com",
            "http://ops.example.com",
            "http://localhost.example.com",
        ] {
            let resp = app_for(store.clone(), "https://ops.example.com")
                .oneshot(from_origin(foreign))
                .await
                .unwrap();
            assert!(
                resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none(),
                "{foreign} should not be allowed"
            );
        }
    }

    #[tokio::test]
    async fn test_empty_expansion_is_unprocessable() {
        // 2026-01-05 is a Monday; only Tuesdays selected.
        let body = weekly_body(json!([2]), "2026-01-05");
        let (status, body) = send(app(Arc::new(MemoryShiftStore::new())), post_shift(Uuid::new_v4(), body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("no shift was created"));
    }

    #[tokio::test]
    async fn test_delete_one_occurrence() {
        let owner = Uuid::new_v4();
        let store = Arc::new(MemoryShiftStore::new());
        let single = json!({
            "date_start": "2026-02-01",
            "time_start": "10:00:00",
            "time_end": "14:00:00",
            "category": "TRAINING",
        });
        let (_, body) = send(app(store.clone()), post_shift(owner, single)).await;
        assert!(body[0]["recurring_group_id"].is_null());
        let id = body[0]["id"].as_str().unwrap().to_string();

        let delete = |id: &str| {
            Request::builder()
                .method("DELETE")
                .uri(format!("/shifts/{id}"))
                .header(header::AUTHORIZATION, bearer(owner))
                .body(Body::empty())
                .unwrap()
        };
        let (status, _) = send(app(store.clone()), delete(&id)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(app(store), delete(&id)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Shift not found");
    }

    #[tokio::test]
    async fn test_health_reports_store() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(Arc::new(MemoryShiftStore::new())), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
