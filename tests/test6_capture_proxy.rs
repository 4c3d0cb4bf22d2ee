use std::sync::Arc;

use actix_web::http::{Method, StatusCode};
use actix_web::web::{self, Data};
use actix_web::{App, test};
use async_trait::async_trait;
use rusty_golf_rounds::capture::{CaptureError, CaptureService, VisionModel};
use rusty_golf_rounds::controller::capture::{MISSING_PARAMETERS, create_round_ai};
use rusty_golf_rounds::paths;
use serde_json::{Value, json};

struct FixedModel(Result<String, CaptureError>);

#[async_trait]
impl VisionModel for FixedModel {
    async fn complete(&self, _prompt: &str, _image_url: &str) -> Result<String, CaptureError> {
        self.0.clone()
    }
}

fn service(reply: Result<String, CaptureError>) -> Data<CaptureService> {
    Data::new(CaptureService::new(Arc::new(FixedModel(reply)), true))
}

fn valid_body() -> Value {
    json!({
        "imageBase64": "data:image/jpeg;base64,abcd",
        "players": [{ "id": "p-1", "first_name": "Alice", "last_name": "Bosch" }],
        "courses": [{ "id": "c-1", "name": "Club de Campo" }]
    })
}

macro_rules! proxy_app {
    ($capture:expr) => {
        test::init_service(
            App::new().app_data($capture).service(
                web::resource(paths::CREATE_ROUND_AI).route(web::route().to(create_round_ai)),
            ),
        )
        .await
    };
}

fn assert_cors<B>(resp: &actix_web::dev::ServiceResponse<B>) {
    let headers = resp.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "*"
    );
    assert_eq!(
        headers.get("access-control-allow-headers").unwrap(),
        "authorization, x-client-info, apikey, content-type"
    );
}

#[actix_web::test]
async fn test6_preflight_and_method_checks() {
    let app = proxy_app!(service(Ok("{}".to_string())));

    let req = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri(paths::CREATE_ROUND_AI)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_cors(&resp);
    assert_eq!(test::read_body(resp).await, "ok");

    let req = test::TestRequest::get().uri(paths::CREATE_ROUND_AI).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_cors(&resp);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Method not allowed" }));
}

#[actix_web::test]
async fn test6_missing_parameters() {
    let app = proxy_app!(service(Ok("{}".to_string())));

    let mut without_image = valid_body();
    without_image.as_object_mut().unwrap().remove("imageBase64");
    let mut without_courses = valid_body();
    without_courses.as_object_mut().unwrap().remove("courses");
    let mut empty_image = valid_body();
    empty_image["imageBase64"] = json!("");

    for body in [without_image, without_courses, empty_image] {
        let req = test::TestRequest::post()
            .uri(paths::CREATE_ROUND_AI)
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
        assert_cors(&resp);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": MISSING_PARAMETERS }));
    }

    let req = test::TestRequest::post()
        .uri(paths::CREATE_ROUND_AI)
        .insert_header(("content-type", "application/json"))
        .set_payload("not json at all")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test6_success_relays_model_json() {
    let reply = "```json\n{\"course_id\": \"c-1\", \"played_at\": \"2024-01-15\", \"round_scores\": []}\n```";
    let app = proxy_app!(service(Ok(reply.to_string())));

    let req = test::TestRequest::post()
        .uri(paths::CREATE_ROUND_AI)
        .set_json(valid_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_cors(&resp);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({ "course_id": "c-1", "played_at": "2024-01-15", "round_scores": [] })
    );
}

#[actix_web::test]
async fn test6_model_failures_are_500s() {
    let cases = [
        (
            Err(CaptureError::Configuration),
            json!({ "error": "OpenAI API key not configured" }),
        ),
        (
            Err(CaptureError::Upstream {
                status: 401,
                body: "invalid key".to_string(),
            }),
            json!({ "error": "Vision model API error (401)", "details": "invalid key" }),
        ),
        (
            Err(CaptureError::EmptyResult),
            json!({ "error": "No analysis result from vision model" }),
        ),
    ];
    for (reply, expected) in cases {
        let app = proxy_app!(service(reply));
        let req = test::TestRequest::post()
            .uri(paths::CREATE_ROUND_AI)
            .set_json(valid_body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&resp);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, expected);
    }

    let app = proxy_app!(service(Ok("The card is too blurry.".to_string())));
    let req = test::TestRequest::post()
        .uri(paths::CREATE_ROUND_AI)
        .set_json(valid_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Vision model returned malformed JSON");
    assert!(body["details"].is_string());
}
