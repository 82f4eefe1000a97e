//! HTTP-level integration tests for trips, membership and users.
//!
//! The router runs over a real database and an in-memory sheet. Users are
//! registered through the API, so sheet names resolve through `users`.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with_grid, example_grid, get, post_empty, post_json,
    TestApp,
};
use serde_json::json;
use sqlx::PgPool;

const IVANOV: i64 = 101;
const PETROV: i64 = 102;
const KUROCHKINA: i64 = 103;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn register(app: &TestApp, id: i64, first_name: &str, last_name: &str) {
    let response = post_json(
        app.router.clone(),
        "/api/v1/users",
        json!({ "id": id, "firstName": first_name, "lastName": last_name }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// App over the example sheet with the crew registered and one sync done.
/// Returns the id of the training on 5 March.
async fn synced_app(pool: PgPool) -> (TestApp, String) {
    let app = build_test_app_with_grid(pool, example_grid());
    register(&app, IVANOV, "", "Иванов").await;
    register(&app, PETROV, "", "Петров").await;
    register(&app, KUROCHKINA, "Ольга", "Курочкина").await;

    let response = post_empty(app.router.clone(), "/api/v1/trips/refresh").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let training = json["data"]["trips"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["type"] == "training")
        .unwrap();
    let id = training["id"].as_str().unwrap().to_string();
    (app, id)
}

fn participant(user_id: i64, trip_id: &str, by_captain: bool) -> serde_json::Value {
    json!({ "userId": user_id, "tripId": trip_id, "byCaptain": by_captain })
}

// ---------------------------------------------------------------------------
// Test: listing and sync
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_trips_empty_before_sync(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/v1/trips").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_creates_trips_from_sheet(pool: PgPool) {
    let app = build_test_app_with_grid(pool, example_grid());
    register(&app, IVANOV, "", "Иванов").await;

    let response = post_empty(app.router.clone(), "/api/v1/trips/refresh").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["report"]["tripsSeen"], 2);
    assert_eq!(json["data"]["report"]["tripsCreated"], 2);
    assert_eq!(json["data"]["report"]["membershipsCreated"], 1);

    let json = body_json(get(app.router.clone(), "/api/v1/trips").await).await;
    let trips = json["data"].as_array().unwrap();
    assert_eq!(trips.len(), 2);

    let training = &trips[0];
    assert_eq!(training["type"], "training");
    assert_eq!(training["date"], "2025-03-05");
    assert_eq!(training["departure"], "19:00");
    assert_eq!(training["duration"], "3");
    assert_eq!(training["vessel"], "Orion");
    assert_eq!(training["crew"][0]["id"], IVANOV);
    assert_eq!(training["crew"][0]["position"], "Матрос");

    assert_eq!(trips[1]["type"], "race");
    assert!(trips[1]["crew"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_refresh_creates_nothing(pool: PgPool) {
    let (app, _) = synced_app(pool).await;

    let json = body_json(post_empty(app.router.clone(), "/api/v1/trips/refresh").await).await;
    assert_eq!(json["data"]["report"]["tripsCreated"], 0);
    assert_eq!(json["data"]["report"]["membershipsCreated"], 0);
    assert_eq!(json["data"]["trips"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_with_unavailable_sheet_returns_502(pool: PgPool) {
    let app = build_test_app_with_grid(pool, example_grid());
    app.grid.set_fail_fetch(true);

    let response = post_empty(app.router.clone(), "/api/v1/trips/refresh").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "UPSTREAM_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_and_stats_after_sync(pool: PgPool) {
    let (app, _) = synced_app(pool).await;

    let json = body_json(get(app.router.clone(), "/api/v1/trips/status").await).await;
    assert_eq!(json["data"]["tripCount"], 2);
    assert!(json["data"]["lastUpdated"].is_string());
    assert_eq!(json["data"]["lastReport"]["tripsCreated"], 2);

    let json = body_json(get(app.router.clone(), "/api/v1/trips/stats").await).await;
    assert_eq!(json["data"]["total"], 2);
    assert_eq!(json["data"]["byType"]["training"], 1);
    assert_eq!(json["data"]["byType"]["race"], 1);
    assert_eq!(json["data"]["crewSlots"], 1);
}

// ---------------------------------------------------------------------------
// Test: filters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_filters(pool: PgPool) {
    let (app, _) = synced_app(pool).await;

    let json = body_json(get(app.router.clone(), "/api/v1/trips/date/2025-03-07").await).await;
    let on_date = json["data"].as_array().unwrap();
    assert_eq!(on_date.len(), 1);
    assert_eq!(on_date[0]["type"], "race");

    let json = body_json(get(app.router.clone(), "/api/v1/trips/type/training").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let json = body_json(
        get(
            app.router.clone(),
            "/api/v1/trips/range?from=2025-03-01&to=2025-03-06",
        )
        .await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_filter_validation(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app.clone(), "/api/v1/trips/type/yacht").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let response = get(
        app.clone(),
        "/api/v1/trips/range?from=2025-03-06&to=2025-03-01",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(app, "/api/v1/trips/date/not-a-date").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: join / leave
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_join_adds_crew_and_marks_sheet(pool: PgPool) {
    let (app, id) = synced_app(pool).await;

    let response = post_json(
        app.router.clone(),
        "/api/v1/trips/join",
        participant(PETROV, &id, false),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let crew: Vec<i64> = json["data"]["crew"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert!(crew.contains(&IVANOV));
    assert!(crew.contains(&PETROV));

    let grid = app.grid.snapshot().await;
    let column = grid.find_in_row(4, &id).unwrap();
    assert_eq!(grid.cell(9, column), "1");

    // The cache is refreshed by the mutation.
    let json = body_json(get(app.router.clone(), "/api/v1/trips/date/2025-03-05").await).await;
    assert_eq!(json["data"][0]["crew"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_boatswain_joins_with_boatswain_position(pool: PgPool) {
    let (app, id) = synced_app(pool).await;

    let json = body_json(
        post_json(
            app.router.clone(),
            "/api/v1/trips/join",
            participant(KUROCHKINA, &id, false),
        )
        .await,
    )
    .await;
    let member = json["data"]["crew"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == KUROCHKINA)
        .cloned()
        .unwrap();
    assert_eq!(member["position"], "Боцман");
    assert_eq!(member["name"], "Курочкина Ольга");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_captain_leave_frees_member(pool: PgPool) {
    let (app, id) = synced_app(pool.clone()).await;

    let response = post_json(
        app.router.clone(),
        "/api/v1/trips/leave",
        participant(IVANOV, &id, true),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"]["crew"]
        .as_array()
        .unwrap()
        .is_empty());

    let json = body_json(get(app.router.clone(), &format!("/api/v1/free-crew/{id}")).await).await;
    let free: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_i64().unwrap())
        .collect();
    assert!(free.contains(&IVANOV));

    let (kicked,): (bool,) =
        sqlx::query_as("SELECT kicked FROM trip_users WHERE trip_id = $1 AND user_id = $2")
            .bind(uuid::Uuid::parse_str(&id).unwrap())
            .bind(IVANOV)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(kicked);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_self_leave_deletes_membership(pool: PgPool) {
    let (app, id) = synced_app(pool.clone()).await;

    let response = post_json(
        app.router.clone(),
        "/api/v1/trips/leave",
        participant(IVANOV, &id, false),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM trip_users WHERE trip_id = $1 AND user_id = $2",
    )
    .bind(uuid::Uuid::parse_str(&id).unwrap())
    .bind(IVANOV)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_join_unknown_trip_returns_404(pool: PgPool) {
    let (app, _) = synced_app(pool).await;
    let missing = uuid::Uuid::new_v4().to_string();

    let response = post_json(
        app.router.clone(),
        "/api/v1/trips/join",
        participant(PETROV, &missing, false),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_join_by_unregistered_user_returns_404(pool: PgPool) {
    let (app, id) = synced_app(pool).await;

    let response = post_json(
        app.router.clone(),
        "/api/v1/trips/join",
        participant(999, &id, false),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_join_with_malformed_body_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/trips/join",
        json!({ "userId": "abc", "tripId": "not-a-uuid" }),
    )
    .await;
    assert!(response.status().is_client_error());
}

// ---------------------------------------------------------------------------
// Test: direct trip creation and free crew
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_trip_returns_201(pool: PgPool) {
    let app = build_test_app_with_grid(pool, example_grid());

    let response = post_json(
        app.router.clone(),
        "/api/v1/trip",
        json!({ "type": "ladoga", "departure": "2099-06-01T02:00:00Z" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["type"], "ladoga");
    assert_eq!(json["data"]["status"], "planned");
    assert_eq!(json["data"]["date"], "2099-06-01");
    assert_eq!(json["data"]["departure"], "05:00");
    assert_eq!(json["data"]["duration"], "15");
    assert!(app.grid.writes().await.is_empty());

    let json = body_json(get(app.router.clone(), "/api/v1/trips").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_trip_with_unknown_type_returns_400(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/trip",
        json!({ "type": "cruise", "departure": "2099-06-01T02:00:00Z" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_free_crew_lists_users_not_on_trip(pool: PgPool) {
    let (app, id) = synced_app(pool).await;

    let json = body_json(get(app.router.clone(), &format!("/api/v1/free-crew/{id}")).await).await;
    let free: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_i64().unwrap())
        .collect();
    assert_eq!(free.len(), 2);
    assert!(!free.contains(&IVANOV));
    for member in json["data"].as_array().unwrap() {
        assert_eq!(member["position"], "Матрос");
        assert!(member["vessel"].is_null());
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_free_crew_for_unknown_trip_returns_404(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, &format!("/api/v1/free-crew/{}", uuid::Uuid::new_v4())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_and_fetch_user(pool: PgPool) {
    let app = build_test_app_with_grid(pool, example_grid());
    register(&app, PETROV, "Пётр", "Петров").await;
    // Re-registering refreshes the profile.
    register(&app, PETROV, "", "Петров").await;

    let response = get(app.router.clone(), &format!("/api/v1/users/{PETROV}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["lastName"], "Петров");
    assert_eq!(json["data"]["firstName"], "");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_without_name_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(app, "/api/v1/users", json!({ "id": 5 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_user_returns_404(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/v1/users/424242").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
