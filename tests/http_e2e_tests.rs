//! End-to-end tests simulating a client of the bridge
//!
//! The router is wired to an in-memory backend; requests go through axum's
//! full stack, including multipart binding and error rendering.

use axum::http::StatusCode;
use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use erp_bridge::prelude::*;
use serde_json::{Value, json};

// =============================================================================
// Fixtures
// =============================================================================

fn seeded_backend() -> InMemoryBackend {
    let backend = InMemoryBackend::new();
    backend
        .seed(
            "res.partner",
            vec![
                json!({ "id": 1, "name": "Tomás Ruiz", "phone": "555-0101", "mobile": true, "email": "tomas@example.com", "website": false }),
                json!({ "id": 2, "name": "Ana Lima", "phone": false, "mobile": false, "email": false, "website": "https://ana.example.com" }),
            ],
        )
        .seed(
            "res.location",
            vec![
                json!({ "id": 1, "name": "North Warehouse", "company_id": [7, "Acme"], "division_ids": [5, 6], "create_date": "2024-01-01 08:00:00", "write_date": "2024-01-02 08:00:00" }),
                json!({ "id": 2, "name": "South Office", "company_id": false, "division_ids": [], "create_date": "2024-01-03 08:00:00", "write_date": "2024-01-04 08:00:00" }),
                json!({ "id": 3, "name": "Northgate", "company_id": [8, "Globex"], "division_ids": [6], "create_date": "2024-01-05 08:00:00", "write_date": "2024-01-06 08:00:00" }),
            ],
        )
        .seed(
            "res.division",
            vec![
                json!({ "id": 5, "name": "Sales", "create_date": "2024-01-01 08:00:00", "write_date": "2024-01-01 08:00:00" }),
                json!({ "id": 6, "name": "Ops", "create_date": "2024-01-01 08:00:00", "write_date": "2024-01-01 08:00:00" }),
            ],
        );
    backend
}

fn create_test_server() -> (TestServer, InMemoryBackend) {
    let backend = seeded_backend();
    let app = ServerBuilder::new()
        .with_client(RpcRecordClient::new(backend.clone()))
        .build()
        .expect("Failed to build app");
    let server = TestServer::new(app);
    (server, backend)
}

fn partner_form() -> MultipartForm {
    MultipartForm::new()
        .add_text("name", "Nadia Kim")
        .add_text("email", "nadia@example.com")
        .add_text("phone", "555-0199")
        .add_text("mobile", "true")
        .add_text("website", "https://nadia.example.com")
}

// =============================================================================
// Health Check Tests
// =============================================================================

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoint() {
        let (server, _) = create_test_server();

        let response = server.get("/health").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_healthz_endpoint() {
        let (server, backend) = create_test_server();

        server.get("/healthz").await.assert_status_ok();
        assert_eq!(backend.call_count(), 0);
    }
}

// =============================================================================
// Partner Tests
// =============================================================================

mod partner_tests {
    use super::*;

    #[tokio::test]
    async fn test_search_found() {
        let (server, _) = create_test_server();

        let response = server.get("/partner/search").add_query_param("name", "tom").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["message"], "Data found");
        assert_eq!(body["data"][0]["name"], "Tomás Ruiz");
        assert_eq!(body["data"][0]["mobile"], true);
        assert_eq!(body["data"][0]["website"], Value::Null);
    }

    #[tokio::test]
    async fn test_search_not_found_is_404() {
        let (server, _) = create_test_server();

        let response = server
            .get("/partner/search")
            .add_query_param("name", "nobody")
            .expect_failure()
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: Value = response.json();
        assert_eq!(body, json!({ "message": "Data not found" }));
    }

    #[tokio::test]
    async fn test_create_with_image() {
        let (server, backend) = create_test_server();

        let form = partner_form().add_part(
            "file",
            Part::bytes(vec![0x89, 0x50, 0x4e, 0x47])
                .file_name("avatar.png")
                .mime_type("image/png"),
        );
        let response = server.post("/partner").multipart(form).await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body, json!({ "message": "Data created", "data": 3 }));

        let stored = backend.record("res.partner", 3).expect("partner stored");
        assert_eq!(stored["name"], "Nadia Kim");
        assert_eq!(stored["mobile"], true);
        assert_eq!(stored["image_1920"], "iVBORw==");
    }

    #[tokio::test]
    async fn test_create_missing_email_is_400_without_remote_call() {
        let (server, backend) = create_test_server();

        let form = MultipartForm::new()
            .add_text("name", "Nadia Kim")
            .add_text("phone", "555-0199")
            .add_text("mobile", "false");
        let response = server
            .post("/partner")
            .multipart(form)
            .expect_failure()
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "Email is required");
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_gif() {
        let (server, backend) = create_test_server();

        let form = partner_form().add_part(
            "file",
            Part::bytes(b"GIF89a".to_vec())
                .file_name("avatar.gif")
                .mime_type("image/gif"),
        );
        let response = server
            .post("/partner")
            .multipart(form)
            .expect_failure()
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["message"], "File type must be png or jpg");
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_image_over_2mb() {
        let (server, _) = create_test_server();

        let form = partner_form().add_part(
            "file",
            Part::bytes(vec![0u8; 2_097_153])
                .file_name("big.jpg")
                .mime_type("image/jpeg"),
        );
        let response = server
            .post("/partner")
            .multipart(form)
            .expect_failure()
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["message"], "File size must be less than 2MB");
    }

    #[tokio::test]
    async fn test_create_over_body_ceiling_gets_size_message() {
        let (server, backend) = create_test_server();

        let form = partner_form().add_part(
            "file",
            Part::bytes(vec![0u8; 5 * 1024 * 1024])
                .file_name("huge.jpg")
                .mime_type("image/jpeg"),
        );
        let response = server
            .post("/partner")
            .multipart(form)
            .expect_failure()
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "File size must be less than 2MB");
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_unparsable_mobile() {
        let (server, backend) = create_test_server();

        let form = MultipartForm::new()
            .add_text("name", "Nadia Kim")
            .add_text("mobile", "yes");
        let response = server
            .post("/partner")
            .multipart(form)
            .expect_failure()
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "INVALID_REQUEST");
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_update_returns_confirmed_name() {
        let (server, _) = create_test_server();

        let form = partner_form().add_text("id", "2");
        let response = server.put("/partner").multipart(form).await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["message"], "Data updated");
        assert_eq!(body["data"]["name"], "Nadia Kim");
        assert_eq!(body["data"]["email"], Value::Null);
    }

    #[tokio::test]
    async fn test_update_without_id_is_400() {
        let (server, _) = create_test_server();

        let response = server
            .put("/partner")
            .multipart(partner_form())
            .expect_failure()
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["message"], "Id is required");
    }

    #[tokio::test]
    async fn test_delete() {
        let (server, backend) = create_test_server();

        let response = server.delete("/partner").add_query_param("id", 1).await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(
            body,
            json!({ "message": "Record with id: 1 has been deleted" })
        );
        assert!(backend.record("res.partner", 1).is_none());
    }

    #[tokio::test]
    async fn test_delete_without_id_is_400() {
        let (server, _) = create_test_server();

        let response = server.delete("/partner").expect_failure().await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["message"], "Id is required");
    }
}

// =============================================================================
// Location Tests
// =============================================================================

mod location_tests {
    use super::*;

    #[tokio::test]
    async fn test_paged_defaults() {
        let (server, _) = create_test_server();

        let response = server.get("/location").await;
        response.assert_status_ok();

        let body: Value = response.json();
        let ids: Vec<i64> = body["data"]["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(body["data"]["pagination"]["total"], 3);
        assert_eq!(body["data"]["pagination"]["page"], 0);
        assert_eq!(body["data"]["pagination"]["limit"], 10);
    }

    #[tokio::test]
    async fn test_paged_search_and_sort() {
        let (server, _) = create_test_server();

        let response = server
            .get("/location")
            .add_query_param("search", "north")
            .add_query_param("order_by", "id")
            .add_query_param("asc", false)
            .add_query_param("limit", 1)
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["data"]["data"][0]["id"], 3);
        assert_eq!(body["data"]["pagination"]["total"], 2);
        assert_eq!(body["data"]["pagination"]["has_next"], true);
    }

    #[tokio::test]
    async fn test_paged_zero_limit_is_400() {
        let (server, backend) = create_test_server();

        let response = server
            .get("/location")
            .add_query_param("limit", 0)
            .expect_failure()
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_all_newest_first() {
        let (server, _) = create_test_server();

        let body: Value = server.get("/location/all").await.json();
        assert_eq!(body["data"][0]["id"], 3);
        assert_eq!(body["data"][2]["id"], 1);
    }

    #[tokio::test]
    async fn test_search_by_name() {
        let (server, _) = create_test_server();

        let body: Value = server
            .get("/location/search")
            .add_query_param("name", "SOUTH")
            .await
            .json();
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["company_id"], Value::Null);
    }

    #[tokio::test]
    async fn test_by_company() {
        let (server, _) = create_test_server();

        let body: Value = server.get("/location/company/7").await.json();
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["company_name"], "Acme");
    }

    #[tokio::test]
    async fn test_by_id_with_divisions() {
        let (server, backend) = create_test_server();

        let response = server.get("/location/1").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["data"]["name"], "North Warehouse");
        assert_eq!(body["data"]["divisions"][0]["name"], "Sales");
        assert_eq!(body["data"]["divisions"][1]["name"], "Ops");
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_by_id_not_found() {
        let (server, _) = create_test_server();

        let response = server.get("/location/99").expect_failure().await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: Value = response.json();
        assert_eq!(body["code"], "RECORD_NOT_FOUND");
        assert_eq!(body["details"]["id"], 99);
    }

    #[tokio::test]
    async fn test_backend_down_is_503() {
        let (server, backend) = create_test_server();
        backend.fail_on(
            "search_read",
            RemoteError::unavailable("connection refused"),
        );

        let response = server.get("/location/all").expect_failure().await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

        let body: Value = response.json();
        assert_eq!(body["code"], "REMOTE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_malformed_record_is_502() {
        let (server, backend) = create_test_server();
        backend.seed(
            "res.location",
            vec![json!({ "id": 4, "name": "Broken", "company_id": false, "division_ids": [], "create_date": "01/02/2024", "write_date": "2024-01-01 08:00:00" })],
        );

        let response = server.get("/location/all").expect_failure().await;
        response.assert_status(StatusCode::BAD_GATEWAY);
    }
}
