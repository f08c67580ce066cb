//! Router tests that need no database: authentication and report rendering.

use axum::http::{StatusCode, header};
use serde_json::json;

use crate::integration::common::{app_without_db, get_request, json_request, login, send};

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_protected_route_without_token_is_401() {
    let app = app_without_db();

    let response = send(&app, get_request("/api/polizas", None)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["error"], "unauthorized");
}

#[tokio::test]
async fn test_protected_route_with_invalid_token_is_401() {
    let app = app_without_db();

    for uri in ["/api/polizas", "/api/polizas/estadisticas", "/api/polizas/1"] {
        let response = send(&app, get_request(uri, Some("not-a-token"))).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{}", uri);
    }
}

#[tokio::test]
async fn test_malformed_date_filter_is_json_400() {
    let app = app_without_db();
    let token = login(&app).await;

    let response = send(
        &app,
        get_request(
            "/api/polizas?fechaInicio=2024-01-01&fechaFin=2024-13-45",
            Some(&token),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "bad_request");
}

#[tokio::test]
async fn test_login_with_wrong_password_is_401() {
    let app = app_without_db();

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({ "email": "admin@test.com", "password": "wrong" }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_login_returns_token_and_sets_cookie() {
    let app = app_without_db();

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({ "email": "admin@test.com", "password": "admin123" }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["id"], "1");
    assert_eq!(body["email"], "admin@test.com");
    let token = body["token"].as_str().unwrap();

    let cookie = response
        .headers
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.starts_with(&format!("authToken={}", token)));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
}

#[tokio::test]
async fn test_login_with_malformed_body_is_400() {
    let app = app_without_db();

    let response = send(
        &app,
        json_request("POST", "/api/auth/login", None, &json!({ "email": 1 })),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_logout_requires_token() {
    let app = app_without_db();

    let response = send(
        &app,
        json_request("POST", "/api/auth/logout", None, &json!({})),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_expires_cookie() {
    let app = app_without_db();
    let token = login(&app).await;

    let response = send(
        &app,
        json_request("POST", "/api/auth/logout", Some(&token), &json!({})),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.json()["message"].is_string());
    let cookie = response
        .headers
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("authToken=;"));
    assert!(cookie.contains("Max-Age=0"));
}

// =============================================================================
// Reports
// =============================================================================

#[tokio::test]
async fn test_excel_report_is_xlsx_attachment() {
    let app = app_without_db();
    let token = login(&app).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/polizas/reportes/excel",
            Some(&token),
            &json!({
                "activeSection": "companies",
                "title": "Pólizas por compañía",
                "labels": ["Compañía1", "Compañía2"],
                "datasets": [{ "label": "Pólizas", "data": [3, 5], "backgroundColor": "#36a2eb" }]
            }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(
        response.headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"reporte-companies.xlsx\""
    );
    assert!(response.body.starts_with(b"PK"));
}

#[tokio::test]
async fn test_pdf_table_report_is_pdf_attachment() {
    let app = app_without_db();
    let token = login(&app).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/polizas/reportes/pdf",
            Some(&token),
            &json!({
                "activeSection": "table",
                "title": "Listado de pólizas",
                "labels": ["Compañía", "Número", "Prima"],
                "datasets": [{ "data": [["Compañía1", 1001, 1500], ["Compañía2", 1002, 800]] }]
            }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"reporte-table.pdf\""
    );
    assert!(response.body.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_malformed_report_request_is_500() {
    let app = app_without_db();
    let token = login(&app).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/polizas/reportes/pdf",
            Some(&token),
            &json!({ "title": "missing fields" }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json()["error"], "internal_error");
}

#[tokio::test]
async fn test_table_report_without_rows_is_500() {
    let app = app_without_db();
    let token = login(&app).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/polizas/reportes/excel",
            Some(&token),
            &json!({ "activeSection": "table", "title": "t", "labels": [], "datasets": [] }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
}
