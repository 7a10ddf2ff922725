mod common;

use std::collections::HashMap;
use std::process::Command;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use common::MoveMindsTest;
use serde_json::{Value, json};

// ============================================================================
// Completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let output = Command::new(common::moveminds_binary())
        .args(["completions", "bash"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("_moveminds"));
}

#[test]
fn test_completions_zsh() {
    let output = Command::new(common::moveminds_binary())
        .args(["completions", "zsh"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("#compdef moveminds"));
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_config_show_defaults() {
    let mm = MoveMindsTest::new();
    let output = mm.run_success(&["config", "show"]);
    assert!(output.contains("api_base_url"));
    assert!(output.contains("http://localhost:8080/api"));
    assert!(output.contains("page_size"));
}

#[test]
fn test_config_set_then_get() {
    let mm = MoveMindsTest::new();
    mm.run_success(&["config", "set", "page_size", "25"]);
    let output = mm.run_success(&["config", "get", "page_size"]);
    assert_eq!(output.trim(), "25");
    assert!(mm.temp_dir.path().join("config.yaml").exists());
}

#[test]
fn test_config_set_invalid_key() {
    let mm = MoveMindsTest::new();
    let stderr = mm.run_failure(&["config", "set", "theme", "dark"]);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_config_set_rejects_zero_page_size() {
    let mm = MoveMindsTest::new();
    let stderr = mm.run_failure(&["config", "set", "page_size", "0"]);
    assert!(stderr.contains("page_size must be at least 1"));
}

#[test]
fn test_config_get_json() {
    let mm = MoveMindsTest::new();
    mm.write_config("request_timeout: 12\n");
    let output = mm.run_success(&["config", "get", "request_timeout", "--json"]);
    let value: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["value"], "12");
}

// ============================================================================
// Session and roles
// ============================================================================

#[test]
fn test_whoami_signed_out() {
    let mm = MoveMindsTest::new();
    let output = mm.run_success(&["whoami", "--json"]);
    let value: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["signedIn"], false);
}

#[test]
fn test_whoami_reads_stored_session() {
    let mm = MoveMindsTest::new();
    mm.sign_in_as(4, "tharushi", "INSTRUCTOR");
    let output = mm.run_success(&["whoami", "--json"]);
    let value: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["username"], "tharushi");
    assert_eq!(value["role"], "INSTRUCTOR");
}

#[test]
fn test_logout_removes_session_file() {
    let mm = MoveMindsTest::new();
    mm.sign_in_as(4, "tharushi", "USER");
    mm.run_success(&["logout"]);
    assert!(!mm.session_exists());
}

#[test]
fn test_commands_require_sign_in() {
    let mm = MoveMindsTest::new();
    let stderr = mm.run_failure(&["activities", "list"]);
    assert!(stderr.contains("not signed in"));
}

#[test]
fn test_error_output_honours_no_color() {
    let mm = MoveMindsTest::new();
    let stderr = mm.run_failure(&["activities", "list"]);
    assert!(stderr.starts_with("error: "));
    assert!(!stderr.contains('\u{1b}'));
}

#[test]
fn test_admin_commands_require_admin_role() {
    let mm = MoveMindsTest::new();
    mm.sign_in_as(5, "nimal", "USER");
    let stderr = mm.run_failure(&["admin", "users"]);
    assert!(stderr.contains("requires the admin role"));
}

#[test]
fn test_content_commands_accept_instructors_and_admins() {
    let mm = MoveMindsTest::new();
    mm.sign_in_as(5, "nimal", "USER");
    let stderr = mm.run_failure(&["content", "show", "3"]);
    assert!(stderr.contains("instructor or admin"));
}

// ============================================================================
// Against a fake backend
// ============================================================================

fn catalogue_backend() -> String {
    let router = Router::new()
        .route(
            "/programs",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let programs = vec![
                    common::program_json(1, "Morning Yoga", "BEGINNER", 0.0),
                    common::program_json(2, "Strength Block", "ADVANCED", 4500.0),
                    common::program_json(3, "Run Club", "INTERMEDIATE", 1500.0),
                ];
                let matching: Vec<Value> = programs
                    .into_iter()
                    .filter(|p| {
                        params
                            .get("difficulty")
                            .is_none_or(|d| p["difficultyLevel"] == d.as_str())
                    })
                    .collect();
                let page = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
                let size = params.get("size").and_then(|s| s.parse().ok()).unwrap_or(10);
                Json(common::spring_page(&matching, page, size))
            }),
        )
        .route(
            "/admin/users",
            get(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "message": "token expired" })),
                )
            }),
        );
    common::serve_in_background(router)
}

#[test]
fn test_programs_list_json() {
    let mm = MoveMindsTest::with_api(catalogue_backend());
    let output = mm.run_success(&["programs", "list", "--json"]);
    let value: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["totalElements"], 3);
    assert_eq!(value["page"], 1);
    assert_eq!(value["content"].as_array().unwrap().len(), 3);
}

#[test]
fn test_programs_list_table_shows_price_labels() {
    let mm = MoveMindsTest::with_api(catalogue_backend());
    let output = mm.run_success(&["programs", "list", "--difficulty", "advanced"]);
    assert!(output.contains("Strength Block"));
    assert!(output.contains("LKR 4,500.00"));
    assert!(!output.contains("Morning Yoga"));
    assert!(output.contains("Page 1 of 1"));
}

#[test]
fn test_programs_list_labels_free_beginner_program() {
    let mm = MoveMindsTest::with_api(catalogue_backend());
    let output = mm.run_success(&["programs", "list", "--difficulty", "beginner"]);
    assert!(output.contains("Morning Yoga"));
    assert!(output.contains("Free"));
    assert!(output.contains("Beginner"));
    assert!(!output.contains("LKR"));
}

fn registration_backend() -> String {
    let router = Router::new()
        .route(
            "/auth/check-username",
            get(|| async { Json(json!({ "available": true })) }),
        )
        .route(
            "/auth/register",
            post(|Json(body): Json<Value>| async move {
                let username = body["username"].as_str().unwrap_or_default().to_string();
                (
                    StatusCode::CREATED,
                    Json(common::user_json(7, &username, "USER", false)),
                )
            }),
        );
    common::serve_in_background(router)
}

#[test]
fn test_register_with_password_flag_needs_no_stdin() {
    let mm = MoveMindsTest::with_api(registration_backend());
    let output = mm.run_success(&[
        "register",
        "--username",
        "nimal_p",
        "--email",
        "nimal@moveminds.lk",
        "--first-name",
        "Nimal",
        "--last-name",
        "Perera",
        "--password",
        "supersecret1",
        "--json",
    ]);
    let value: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["username"], "nimal_p");
    assert_eq!(value["role"], "USER");
}

#[test]
fn test_delete_comment_reports_missing_comment() {
    let router = Router::new().route(
        "/comments/{id}",
        delete(|Path(id): Path<i64>| async move {
            if id == 5 {
                StatusCode::NO_CONTENT
            } else {
                StatusCode::NOT_FOUND
            }
        }),
    );
    let mm = MoveMindsTest::with_api(common::serve_in_background(router));
    mm.sign_in_as(3, "nimal", "USER");

    let output = mm.run_success(&["programs", "delete-comment", "5"]);
    assert!(output.contains("Comment 5 deleted"));
    let stderr = mm.run_failure(&["programs", "delete-comment", "6"]);
    assert!(stderr.contains("comment 6"));
}

#[test]
fn test_expired_token_signs_out() {
    let mm = MoveMindsTest::with_api(catalogue_backend());
    mm.sign_in_as(1, "admin", "ADMIN");
    let stderr = mm.run_failure(&["admin", "users"]);
    assert!(stderr.contains("session expired"));
    assert!(!mm.session_exists());
}
