mod common;

use axum::http::StatusCode;
use common::{
    build_test_context, login_and_get_token, request_json, request_no_body, thresholds_body,
    SUPERADMIN_EMAIL, SUPERADMIN_PASSWORD,
};
use serde_json::json;

#[tokio::test]
async fn health_reports_ok_when_storage_is_reachable() {
    let ctx = build_test_context().await;
    let (status, body) = request_no_body(&ctx.app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn get_thresholds_is_public_and_returns_seeded_defaults() {
    let ctx = build_test_context().await;

    let (status, body) = request_no_body(&ctx.app, "GET", "/thresholds", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["sal_low"], 8.0);
    assert_eq!(body["sal_high"], 12.0);
    assert_eq!(body["ph_low"], 6.5);
    assert_eq!(body["ph_high"], 8.5);
    assert_eq!(body["temp_low"], 25.0);
    assert_eq!(body["temp_high"], 32.0);
    assert_eq!(body["bat_low"], 20.0);
    assert_eq!(body["offline_minutes"], 10);
    assert!(body["updated_by"].is_null());

    // Repeated access returns the same singleton, not a new row.
    let (status, again) = request_no_body(&ctx.app, "GET", "/thresholds", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["id"], 1);
    assert_eq!(again["updated_at"], body["updated_at"]);
}

#[tokio::test]
async fn put_thresholds_requires_a_token_regardless_of_body() {
    let ctx = build_test_context().await;

    let (status, body) = request_json(
        &ctx.app,
        "PUT",
        "/thresholds",
        None,
        Some(thresholds_body()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing token");

    // A non-Bearer scheme is treated the same as no token.
    let (status, _) = request_json(
        &ctx.app,
        "PUT",
        "/thresholds",
        Some(""),
        Some(thresholds_body()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn put_thresholds_rejects_non_numeric_fields_by_name() {
    let ctx = build_test_context().await;
    let token = login_and_get_token(&ctx.app, SUPERADMIN_EMAIL, SUPERADMIN_PASSWORD).await;

    let mut body = thresholds_body();
    body["sal_low"] = json!("abc");
    let (status, resp) = request_json(&ctx.app, "PUT", "/thresholds", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        resp["error"].as_str().unwrap().contains("sal_low"),
        "error should name the field: {resp}"
    );

    // A missing field is a coercion failure for that field, too.
    let mut body = thresholds_body();
    body.as_object_mut().unwrap().remove("offline_minutes");
    let (status, resp) = request_json(&ctx.app, "PUT", "/thresholds", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["error"].as_str().unwrap().contains("offline_minutes"));
}

#[tokio::test]
async fn put_thresholds_echoes_values_unchanged_and_stamps_author() {
    let ctx = build_test_context().await;
    let token = login_and_get_token(&ctx.app, SUPERADMIN_EMAIL, SUPERADMIN_PASSWORD).await;

    // Negative and zero values are allowed; no range clamping, and no
    // low<high relationship is enforced.
    let body = json!({
        "sal_low": -1.5,
        "sal_high": -2.5,
        "ph_low": 0,
        "ph_high": "9.25",
        "temp_low": 40,
        "temp_high": 10,
        "bat_low": 0.0,
        "offline_minutes": "45"
    });
    let (status, resp) = request_json(&ctx.app, "PUT", "/thresholds", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::OK, "update should succeed: {resp}");
    assert_eq!(resp["sal_low"], -1.5);
    assert_eq!(resp["sal_high"], -2.5);
    assert_eq!(resp["ph_low"], 0.0);
    assert_eq!(resp["ph_high"], 9.25);
    assert_eq!(resp["temp_low"], 40.0);
    assert_eq!(resp["temp_high"], 10.0);
    assert_eq!(resp["bat_low"], 0.0);
    assert_eq!(resp["offline_minutes"], 45);
    assert!(resp["updated_by"].is_number(), "caller id should be stamped");

    // The stamped id belongs to the caller.
    let (_, listed) = request_no_body(&ctx.app, "GET", "/admins", Some(&token)).await;
    let caller_id = listed
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["email"] == SUPERADMIN_EMAIL)
        .unwrap()["id"]
        .clone();
    assert_eq!(resp["updated_by"], caller_id);

    // And the new values persist.
    let (_, current) = request_no_body(&ctx.app, "GET", "/thresholds", None).await;
    assert_eq!(current["sal_low"], -1.5);
    assert_eq!(current["offline_minutes"], 45);
}

#[tokio::test]
async fn admin_routes_enforce_the_superadmin_gate() {
    let ctx = build_test_context().await;
    let super_token = login_and_get_token(&ctx.app, SUPERADMIN_EMAIL, SUPERADMIN_PASSWORD).await;

    // No token at all
    let (status, body) = request_no_body(&ctx.app, "GET", "/admins", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing token");

    // A plain admin is authenticated but forbidden
    let (status, created) = request_json(
        &ctx.app,
        "POST",
        "/admins",
        Some(&super_token),
        Some(json!({"email": "viewer@example.com", "password": "pw123456"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["role"], "admin", "role should default to admin");

    let viewer_token = login_and_get_token(&ctx.app, "viewer@example.com", "pw123456").await;
    for (method, uri) in [
        ("GET", "/admins"),
        ("POST", "/admins"),
        ("DELETE", "/admins/1"),
    ] {
        let (status, body) = request_json(
            &ctx.app,
            method,
            uri,
            Some(&viewer_token),
            Some(json!({"email": "x@example.com", "password": "pw"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
        assert_eq!(body["error"], "Superadmin required");
    }

    // But the viewer's token is still good for threshold updates.
    let (status, _) = request_json(
        &ctx.app,
        "PUT",
        "/thresholds",
        Some(&viewer_token),
        Some(thresholds_body()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn list_admins_is_newest_first_and_never_leaks_hashes() {
    let ctx = build_test_context().await;
    let token = login_and_get_token(&ctx.app, SUPERADMIN_EMAIL, SUPERADMIN_PASSWORD).await;

    for email in ["a@example.com", "b@example.com"] {
        let (status, _) = request_json(
            &ctx.app,
            "POST",
            "/admins",
            Some(&token),
            Some(json!({"email": email, "password": "pw123456"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = request_no_body(&ctx.app, "GET", "/admins", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let admins = body.as_array().expect("response should be an array");
    assert_eq!(admins.len(), 3);
    for admin in admins {
        assert!(admin.get("password_hash").is_none(), "hash must not leak");
        assert!(admin["created_at"].is_string());
        assert!(admin["active"].is_boolean());
    }
    // Newest first: ids are monotonic here, so the order is descending.
    let ids: Vec<i64> = admins.iter().map(|a| a["id"].as_i64().unwrap()).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(ids, sorted);
}

#[tokio::test]
async fn create_admin_validates_input_and_maps_duplicates_to_conflict() {
    let ctx = build_test_context().await;
    let token = login_and_get_token(&ctx.app, SUPERADMIN_EMAIL, SUPERADMIN_PASSWORD).await;

    for body in [
        json!({"password": "pw123456"}),
        json!({"email": "new@example.com"}),
        json!({"email": "", "password": "pw123456"}),
        json!({"email": "new@example.com", "password": ""}),
    ] {
        let (status, resp) =
            request_json(&ctx.app, "POST", "/admins", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{resp}");
        assert_eq!(resp["error"], "Email and password are required");
    }

    let (status, _) = request_json(
        &ctx.app,
        "POST",
        "/admins",
        Some(&token),
        Some(json!({"email": "dup@example.com", "password": "pw123456", "role": "superadmin"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = request_json(
        &ctx.app,
        "POST",
        "/admins",
        Some(&token),
        Some(json!({"email": "dup@example.com", "password": "other", "role": "admin"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already exists");
}

#[tokio::test]
async fn deactivate_admin_is_idempotent_and_skips_existence_checks() {
    let ctx = build_test_context().await;
    let token = login_and_get_token(&ctx.app, SUPERADMIN_EMAIL, SUPERADMIN_PASSWORD).await;

    // A nonexistent id still answers ok
    let (status, body) = request_no_body(&ctx.app, "DELETE", "/admins/424242", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));

    // Deactivate a real account, twice
    let (_, created) = request_json(
        &ctx.app,
        "POST",
        "/admins",
        Some(&token),
        Some(json!({"email": "bye@example.com", "password": "pw123456"})),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    for _ in 0..2 {
        let (status, body) =
            request_no_body(&ctx.app, "DELETE", &format!("/admins/{id}"), Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true}));
    }

    // The deactivated account can no longer authenticate
    let (status, body) = request_json(
        &ctx.app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": "bye@example.com", "password": "pw123456"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}
