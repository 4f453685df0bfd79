//! HTTP status-code contract, driven through the real routes with HS256 tokens.
mod common;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Value, json};
use uuid::Uuid;

use common::{create_test_db, seed_user};
use petcare_backend::auth::jwt::{Claims, JwtSecret};
use petcare_backend::auth::{Identity, TokenVerifier};
use petcare_backend::handlers;
use petcare_backend::models::users::Roles;

const SECRET: &str = "api-test-secret-at-least-256-bits-long-xxxxxxxxxxxx";

fn token_for(identity: &Identity) -> String {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: identity.user_id.to_string(),
        exp: now + 3600,
        iat: Some(now),
        iss: None,
        email: Some(format!("{}@example.com", identity.user_id)),
        role: Some("authenticated".to_string()),
        user_metadata: None,
    };
    let jwt = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {jwt}")
}

macro_rules! app {
    ($db:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($db.clone()))
                .app_data(web::Data::new(TokenVerifier::Secret(JwtSecret(
                    SECRET.to_string(),
                ))))
                .service(web::scope("/api").configure(handlers::init_routes)),
        )
        .await
    };
}

fn dog_request_body() -> Value {
    json!({
        "start_date": "2024-08-01",
        "end_date": "2024-08-05",
        "pet_type": "Dog",
        "pet_breed": "Labrador",
        "location": "New York",
        "description": "Need dog sitting"
    })
}

#[actix_web::test]
async fn missing_or_bad_tokens_are_401() {
    let t = create_test_db().await;
    let app = app!(t.db);

    let req = test::TestRequest::get().uri("/api/service-requests").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", "Bearer not.a.token"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn first_login_provisions_a_pet_owner() {
    let t = create_test_db().await;
    let app = app!(t.db);
    let newcomer = Identity::new(Uuid::new_v4(), Roles::PetOwner);

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", token_for(&newcomer)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], json!(newcomer.user_id));
    assert_eq!(body["role"], "petowner");

    let req = test::TestRequest::post()
        .uri("/api/auth/complete-profile")
        .insert_header(("Authorization", token_for(&newcomer)))
        .set_json(json!({ "username": "newbie", "role": "staff" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/auth/complete-profile")
        .insert_header(("Authorization", token_for(&newcomer)))
        .set_json(json!({ "username": "newbie", "role": "caregiver" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["role"], "caregiver");
    assert_eq!(body["username"], "newbie");
}

#[actix_web::test]
async fn offer_acceptance_over_http() {
    let t = create_test_db().await;
    let owner = seed_user(&t.db, "owner", Roles::PetOwner).await;
    let caregiver = seed_user(&t.db, "carer", Roles::Caregiver).await;
    let outsider = seed_user(&t.db, "outsider", Roles::PetOwner).await;
    let app = app!(t.db);

    // Caregivers cannot post requests.
    let req = test::TestRequest::post()
        .uri("/api/service-requests")
        .insert_header(("Authorization", token_for(&caregiver)))
        .set_json(dog_request_body())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/service-requests")
        .insert_header(("Authorization", token_for(&owner)))
        .set_json(dog_request_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let request: Value = test::read_body_json(resp).await;
    let request_id = request["id"].as_str().unwrap().to_string();
    assert_eq!(request["owner_display_name"], "owner");

    // Pet owners cannot offer.
    let offer_body = json!({
        "service_request": request_id,
        "price": 50.0,
        "message": "Happy to help",
    });
    let req = test::TestRequest::post()
        .uri("/api/service-offers")
        .insert_header(("Authorization", token_for(&outsider)))
        .set_json(&offer_body)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/service-offers")
        .insert_header(("Authorization", token_for(&caregiver)))
        .set_json(&offer_body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let offer: Value = test::read_body_json(resp).await;
    let offer_id = offer["id"].as_str().unwrap().to_string();
    assert_eq!(offer["status"], "pending");

    // The caregiver cannot accept their own offer.
    let req = test::TestRequest::put()
        .uri(&format!("/api/service-offers/{offer_id}/status"))
        .insert_header(("Authorization", token_for(&caregiver)))
        .set_json(json!({ "status": "accepted" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/api/service-offers/{offer_id}/status"))
        .insert_header(("Authorization", token_for(&owner)))
        .set_json(json!({ "status": "accepted" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let service: Value = test::read_body_json(resp).await;
    assert_eq!(service["pet_owner"], json!(owner.user_id));
    assert_eq!(service["caregiver"], json!(caregiver.user_id));
    let service_id = service["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/service-requests/{request_id}"))
        .insert_header(("Authorization", token_for(&owner)))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["is_active"], false);

    let req = test::TestRequest::get()
        .uri(&format!("/api/services/{service_id}"))
        .insert_header(("Authorization", token_for(&outsider)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    // Reviews: outsiders are refused, bad ratings are 400, good ones 201.
    let req = test::TestRequest::post()
        .uri("/api/reviews")
        .insert_header(("Authorization", token_for(&outsider)))
        .set_json(json!({ "service": service_id, "rating": 5, "comment": "Nice" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/reviews")
        .insert_header(("Authorization", token_for(&owner)))
        .set_json(json!({ "service": service_id, "rating": 6, "comment": "Too good" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());

    let req = test::TestRequest::post()
        .uri("/api/reviews")
        .insert_header(("Authorization", token_for(&owner)))
        .set_json(json!({ "service": service_id, "rating": 5, "comment": "Great carer" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn resubmission_answers_200() {
    let t = create_test_db().await;
    let owner = seed_user(&t.db, "owner", Roles::PetOwner).await;
    let caregiver = seed_user(&t.db, "carer", Roles::Caregiver).await;
    let app = app!(t.db);

    let req = test::TestRequest::post()
        .uri("/api/service-requests")
        .insert_header(("Authorization", token_for(&owner)))
        .set_json(dog_request_body())
        .to_request();
    let request: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/service-offers")
        .insert_header(("Authorization", token_for(&caregiver)))
        .set_json(json!({ "service_request": request["id"], "price": 50.0, "message": "Hi" }))
        .to_request();
    let offer: Value = test::call_and_read_body_json(&app, req).await;
    let offer_id = offer["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/service-offers/{offer_id}/status"))
        .insert_header(("Authorization", token_for(&owner)))
        .set_json(json!({ "status": "rejected" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/service-offers")
        .insert_header(("Authorization", token_for(&caregiver)))
        .set_json(json!({
            "service_request": request["id"],
            "price": 35.0,
            "message": "Lower price",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], offer["id"]);
    assert_eq!(body["status"], "pending");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/service-offers/{offer_id}"))
        .insert_header(("Authorization", token_for(&caregiver)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn messages_cannot_be_edited_or_deleted() {
    let t = create_test_db().await;
    let alice = seed_user(&t.db, "alice", Roles::PetOwner).await;
    let bob = seed_user(&t.db, "bob", Roles::Caregiver).await;
    let app = app!(t.db);

    let req = test::TestRequest::post()
        .uri("/api/messages")
        .insert_header(("Authorization", token_for(&alice)))
        .set_json(json!({ "recipient": bob.user_id, "content": "Hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let message: Value = test::read_body_json(resp).await;
    let message_id = message["id"].as_str().unwrap().to_string();

    // Own message, someone else's, and one that does not exist: always 405.
    for id in [message_id.clone(), Uuid::new_v4().to_string()] {
        for who in [&alice, &bob] {
            for req in [
                test::TestRequest::put(),
                test::TestRequest::patch(),
                test::TestRequest::delete(),
            ] {
                let req = req
                    .uri(&format!("/api/messages/{id}"))
                    .insert_header(("Authorization", token_for(who)))
                    .set_json(json!({ "content": "edited" }))
                    .to_request();
                assert_eq!(
                    test::call_service(&app, req).await.status(),
                    StatusCode::METHOD_NOT_ALLOWED
                );
            }
        }
    }

    let req = test::TestRequest::get()
        .uri("/api/messages/unread-count")
        .insert_header(("Authorization", token_for(&bob)))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["unread"], 1);

    let req = test::TestRequest::post()
        .uri(&format!("/api/messages/{message_id}/read"))
        .insert_header(("Authorization", token_for(&bob)))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["is_read"], true);
}

#[actix_web::test]
async fn users_are_never_deleted_and_bad_json_is_400() {
    let t = create_test_db().await;
    let alice = seed_user(&t.db, "alice", Roles::PetOwner).await;
    let app = app!(t.db);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/users/{}", alice.user_id))
        .insert_header(("Authorization", token_for(&alice)))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::METHOD_NOT_ALLOWED
    );

    let req = test::TestRequest::post()
        .uri("/api/service-requests")
        .insert_header(("Authorization", token_for(&alice)))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}
