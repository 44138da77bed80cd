use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use doctor_cell::router::doctor_routes;
use patient_cell::router::patient_routes;

use crate::state::AppServices;

pub fn create_router(services: &AppServices) -> Router {
    Router::new()
        .route("/", get(|| async { "Hospital Portal API is running!" }))
        .nest("/auth", auth_routes(services.auth_state()))
        .nest("/doctors", doctor_routes(services.doctor_state()))
        .nest("/patients", patient_routes(services.patient_state()))
        .nest("/appointments", appointment_routes(services.appointment_state()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use shared_utils::test_utils::TestConfig;

    use crate::seed::seed_demo_data;

    fn seeded_app() -> Router {
        let services = AppServices::new(TestConfig::default().to_app_config());
        seed_demo_data(&services).unwrap();
        create_router(&services)
    }

    async fn body_json(response: Response) -> Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn login(app: &Router, email: &str, password: &str) -> String {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/login")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({ "email": email, "password": password }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await["token"].as_str().unwrap().to_string()
    }

    fn get_with_token(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_liveness_route() {
        let app = seeded_app();
        let response = app.oneshot(get_with_token("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Hospital Portal API is running!");
    }

    #[tokio::test]
    async fn test_public_directory_is_open() {
        let app = seeded_app();
        let response = app
            .clone()
            .oneshot(get_with_token("/doctors?specialty=neurology", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["total"], 1);
        assert_eq!(json["doctors"][0]["name"], "Dr. Michael Chen");

        let response = app.oneshot(get_with_token("/doctors/specialties", None)).await.unwrap();
        let json = body_json(response).await;
        assert_eq!(json["specialties"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_login_then_role_gated_dashboards() {
        let app = seeded_app();

        let anonymous = app
            .clone()
            .oneshot(get_with_token("/appointments/dashboard/admin", None))
            .await
            .unwrap();
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let patient_token = login(&app, "john@example.com", "patient123").await;
        let forbidden = app
            .clone()
            .oneshot(get_with_token("/appointments/dashboard/admin", Some(&patient_token)))
            .await
            .unwrap();
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let admin_token = login(&app, "admin@hospital.com", "admin123").await;
        let response = app
            .clone()
            .oneshot(get_with_token("/appointments/dashboard/admin", Some(&admin_token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["doctors"].as_array().unwrap().len(), 3);
        assert_eq!(json["patients"].as_array().unwrap().len(), 2);

        let me = app
            .oneshot(get_with_token("/auth/me", Some(&patient_token)))
            .await
            .unwrap();
        assert_eq!(me.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let app = seeded_app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/login")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({ "email": "sarah@hospital.com", "password": "nope" }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
