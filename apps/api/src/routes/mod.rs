pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use crate::auth::{self, handlers as auth_handlers};
use crate::export::handlers::{handle_export, MAX_CAPTURE_BYTES};
use crate::preview::handlers as preview_handlers;
use crate::resume::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Everything that touches the document requires a signed-in user.
    let resume = Router::new()
        .route(
            "/api/v1/resume",
            get(handlers::handle_get_resume).delete(handlers::handle_clear_resume),
        )
        .route("/api/v1/resume/save", post(handlers::handle_save_resume))
        .route(
            "/api/v1/resume/personal",
            patch(handlers::handle_update_personal),
        )
        .route(
            "/api/v1/resume/education",
            post(handlers::handle_add_education),
        )
        .route(
            "/api/v1/resume/education/:id",
            patch(handlers::handle_update_education).delete(handlers::handle_remove_education),
        )
        .route(
            "/api/v1/resume/experience",
            post(handlers::handle_add_experience),
        )
        .route(
            "/api/v1/resume/experience/:id",
            patch(handlers::handle_update_experience).delete(handlers::handle_remove_experience),
        )
        .route(
            "/api/v1/resume/skills",
            post(handlers::handle_add_skill).put(handlers::handle_replace_skills),
        )
        .route(
            "/api/v1/resume/skills/import",
            post(handlers::handle_import_skills),
        )
        .route(
            "/api/v1/resume/skills/:skill",
            delete(handlers::handle_remove_skill),
        )
        .route(
            "/api/v1/resume/preview",
            get(preview_handlers::handle_preview),
        )
        .route(
            "/api/v1/resume/preview.txt",
            get(preview_handlers::handle_preview_text),
        )
        .route(
            "/api/v1/resume/export",
            post(handle_export).layer(DefaultBodyLimit::max(MAX_CAPTURE_BYTES)),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/auth/register", post(auth_handlers::handle_register))
        .route("/api/v1/auth/login", post(auth_handlers::handle_login))
        .route("/api/v1/auth/logout", post(auth_handlers::handle_logout))
        .route("/api/v1/auth/me", get(auth_handlers::handle_me))
        .merge(resume)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::auth::{AuthError, AuthProvider, MockAuthProvider};
    use crate::config::{Config, StorageBackend};
    use crate::export::compose::PdfComposer;
    use crate::export::pagination::{PagePlan, A4_PORTRAIT};
    use crate::export::{ExportError, Exporter};
    use crate::models::user::User;
    use crate::store::persistence::MemoryStorage;
    use crate::store::ResumeStore;

    struct StubComposer;

    impl PdfComposer for StubComposer {
        fn compose(&self, plan: &PagePlan, _png: &[u8]) -> Result<Vec<u8>, ExportError> {
            Ok(format!("%PDF-stub {}", plan.page_count()).into_bytes())
        }
    }

    struct BrokenAuth;

    #[async_trait]
    impl AuthProvider for BrokenAuth {
        async fn login(&self, _: &str, _: &str) -> Result<bool, AuthError> {
            Err(AuthError::Unavailable("connection reset".to_string()))
        }
        async fn register(&self, _: &str, _: &str, _: &str) -> Result<bool, AuthError> {
            Err(AuthError::Unavailable("connection reset".to_string()))
        }
        async fn logout(&self) {}
        async fn current_user(&self) -> Option<User> {
            None
        }
    }

    fn test_config() -> Config {
        Config {
            port: 0,
            rust_log: "info".to_string(),
            storage_backend: StorageBackend::Memory,
            storage_dir: "./unused".into(),
            autosave_debounce: Duration::from_millis(1000),
            export_timeout: Duration::from_secs(5),
        }
    }

    async fn app_with(auth: Arc<dyn AuthProvider>) -> Router {
        let store = ResumeStore::hydrate(Arc::new(MemoryStorage::new()), Duration::from_secs(1)).await;
        let exporter = Arc::new(Exporter::new(
            Arc::new(StubComposer),
            A4_PORTRAIT,
            Duration::from_secs(5),
        ));
        build_router(AppState {
            store,
            auth,
            exporter,
            config: test_config(),
        })
    }

    async fn app() -> Router {
        app_with(Arc::new(MockAuthProvider::new())).await
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn signed_in_app() -> Router {
        let app = app().await;
        let response = send(
            &app,
            "POST",
            "/api/v1/auth/register",
            Some(json!({
                "name": "Ada",
                "email": "ada@example.com",
                "password": "secret1",
                "confirmPassword": "secret1"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        app
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let response = send(&app().await, "GET", "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["storage_backend"], "memory");
        assert_eq!(body["autosave_debounce_ms"], 1000);
        assert_eq!(body["export_timeout_secs"], 5);
        assert_eq!(body["export_busy"], false);
    }

    #[tokio::test]
    async fn test_resume_requires_session() {
        let app = app().await;
        let response = send(&app, "GET", "/api/v1/resume", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_logout_closes_the_gate() {
        let app = signed_in_app().await;
        let response = send(&app, "POST", "/api/v1/auth/logout", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let response = send(&app, "GET", "/api/v1/resume", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_register_validation_is_field_scoped() {
        let app = app().await;
        let response = send(
            &app,
            "POST",
            "/api/v1/auth/register",
            Some(json!({
                "name": "",
                "email": "not-an-email",
                "password": "123",
                "confirmPassword": "321"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        let fields = &body["error"]["fields"];
        assert_eq!(fields["name"], "Name is required");
        assert_eq!(fields["email"], "Email is invalid");
        assert_eq!(fields["password"], "Password must be at least 6 characters");
        assert_eq!(fields["confirmPassword"], "Passwords do not match");
    }

    #[tokio::test]
    async fn test_bad_credentials_get_general_message() {
        let app = signed_in_app().await;
        let response = send(
            &app,
            "POST",
            "/api/v1/auth/login",
            Some(json!({ "email": "ada@example.com", "password": "wrong-pass" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await["error"]["message"],
            "Invalid email or password"
        );

        let response = send(
            &app,
            "POST",
            "/api/v1/auth/register",
            Some(json!({
                "name": "Imposter",
                "email": "ada@example.com",
                "password": "secret1",
                "confirmPassword": "secret1"
            })),
        )
        .await;
        assert_eq!(
            json_body(response).await["error"]["message"],
            "Email already exists"
        );
    }

    #[tokio::test]
    async fn test_auth_provider_failure_maps_to_retry_message() {
        let app = app_with(Arc::new(BrokenAuth)).await;
        let response = send(
            &app,
            "POST",
            "/api/v1/auth/login",
            Some(json!({ "email": "ada@example.com", "password": "secret1" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await["error"]["message"],
            "An error occurred. Please try again."
        );
    }

    #[tokio::test]
    async fn test_entry_crud_round_trip() {
        let app = signed_in_app().await;

        let response = send(
            &app,
            "POST",
            "/api/v1/resume/experience",
            Some(json!({ "company": "Acme", "position": "Engineer", "startDate": "2022-01" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = json_body(response).await;
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["endDate"], "");

        let response = send(
            &app,
            "PATCH",
            &format!("/api/v1/resume/experience/{id}"),
            Some(json!({ "description": "Built things" })),
        )
        .await;
        let doc = json_body(response).await;
        assert_eq!(doc["experience"][0]["description"], "Built things");
        assert_eq!(doc["experience"][0]["company"], "Acme");

        let response = send(&app, "GET", "/api/v1/resume/preview", None).await;
        let view = json_body(response).await;
        assert_eq!(view["sections"][0]["kind"], "experience");
        assert_eq!(view["sections"][0]["items"][0]["dates"], "Jan 2022 - Present");

        let response = send(
            &app,
            "DELETE",
            &format!("/api/v1/resume/experience/{id}"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        // Removing again is a no-op, not an error.
        let response = send(
            &app,
            "DELETE",
            &format!("/api/v1/resume/experience/{id}"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_add_education_requires_school_and_degree() {
        let app = signed_in_app().await;
        let response = send(
            &app,
            "POST",
            "/api/v1/resume/education",
            Some(json!({ "school": "MIT" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["fields"]["degree"], "Degree is required");

        let doc = json_body(send(&app, "GET", "/api/v1/resume", None).await).await;
        assert_eq!(doc["education"], json!([]));
    }

    #[tokio::test]
    async fn test_skill_endpoints() {
        let app = signed_in_app().await;

        let body = json_body(
            send(
                &app,
                "POST",
                "/api/v1/resume/skills",
                Some(json!({ "skill": " Go " })),
            )
            .await,
        )
        .await;
        assert_eq!(body["skills"], json!(["Go"]));

        let body = json_body(
            send(
                &app,
                "POST",
                "/api/v1/resume/skills",
                Some(json!({ "skill": "Go" })),
            )
            .await,
        )
        .await;
        assert_eq!(body["skills"], json!(["Go"]));
        assert_eq!(body["rejected"], "duplicate");

        let body = json_body(
            send(
                &app,
                "POST",
                "/api/v1/resume/skills/import",
                Some(json!({ "text": "Rust, Go, , SQL" })),
            )
            .await,
        )
        .await;
        assert_eq!(body["skills"], json!(["Go", "Rust", "SQL"]));

        let body = json_body(send(&app, "DELETE", "/api/v1/resume/skills/Rust", None).await).await;
        assert_eq!(body["skills"], json!(["Go", "SQL"]));

        let body = json_body(
            send(
                &app,
                "PUT",
                "/api/v1/resume/skills",
                Some(json!({ "skills": ["B", "A"] })),
            )
            .await,
        )
        .await;
        assert_eq!(body["skills"], json!(["B", "A"]));
    }

    #[tokio::test]
    async fn test_clear_requires_confirmation() {
        let app = signed_in_app().await;
        send(
            &app,
            "PATCH",
            "/api/v1/resume/personal",
            Some(json!({ "name": "Ada Lovelace" })),
        )
        .await;

        let response = send(&app, "DELETE", "/api/v1/resume", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"]["code"],
            "CONFIRMATION_REQUIRED"
        );

        let response = send(&app, "DELETE", "/api/v1/resume?confirm=true", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["persisted"], true);

        let doc = json_body(send(&app, "GET", "/api/v1/resume", None).await).await;
        assert_eq!(doc["personalInfo"]["name"], "");
    }

    #[tokio::test]
    async fn test_preview_text_placeholder() {
        let app = signed_in_app().await;
        let response = send(&app, "GET", "/api/v1/resume/preview.txt", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("Your resume preview will appear here"));
    }

    fn multipart_request(parts: &[(&str, &[u8])]) -> Request<Body> {
        let boundary = "resume-boundary";
        let mut body = Vec::new();
        for (name, value) in parts {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            );
            body.extend_from_slice(value);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/resume/export")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_export_returns_pdf_attachment() {
        let app = signed_in_app().await;
        let capture = crate::export::png::header(210, 600);
        let request = multipart_request(&[
            ("capture", capture.as_slice()),
            ("width", b"210"),
            ("height", b"600"),
        ]);
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume.pdf\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"%PDF-stub 3");
    }

    #[tokio::test]
    async fn test_export_without_capture_fails_with_single_message() {
        let app = signed_in_app().await;
        let request = multipart_request(&[("width", b"210"), ("height", b"600")]);
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "EXPORT_FAILED");
        assert_eq!(
            body["error"]["message"],
            "There was an error generating the PDF. Please try again."
        );
    }

    async fn assert_export_failed(app: &Router, request: Request<Body>) {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "EXPORT_FAILED");
        assert_eq!(
            body["error"]["message"],
            "There was an error generating the PDF. Please try again."
        );
    }

    #[tokio::test]
    async fn test_export_rejects_bad_dimension_fields() {
        let app = signed_in_app().await;
        let capture = crate::export::png::header(210, 600);

        let non_numeric = multipart_request(&[
            ("capture", capture.as_slice()),
            ("width", b"wide"),
            ("height", b"600"),
        ]);
        assert_export_failed(&app, non_numeric).await;

        let missing_height = multipart_request(&[("capture", capture.as_slice()), ("width", b"210")]);
        assert_export_failed(&app, missing_height).await;
    }

    #[tokio::test]
    async fn test_export_rejects_declared_size_mismatch() {
        let app = signed_in_app().await;
        let capture = crate::export::png::header(1, 1);
        let request = multipart_request(&[
            ("capture", capture.as_slice()),
            ("width", b"1"),
            ("height", b"4294967295"),
        ]);
        assert_export_failed(&app, request).await;

        // The failed attempt does not leave the exporter busy.
        let body = json_body(send(&app, "GET", "/health", None).await).await;
        assert_eq!(body["export_busy"], false);
    }
}
