//! Bearer token verification with a locally minted HS256 token.
//! No running server or database is needed.
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use petcare_backend::auth::TokenVerifier;
use petcare_backend::auth::jwt::{Claims, UserMetadata, validate_token};
use petcare_backend::config::AuthSettings;

const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

fn claims_for(sub: &str, exp_offset: i64, metadata: Option<UserMetadata>) -> Claims {
    let now = Utc::now().timestamp();
    Claims {
        sub: sub.to_string(),
        exp: (now + exp_offset) as usize,
        iat: Some(now as usize),
        iss: Some("https://example.supabase.co/auth/v1".to_string()),
        email: None,
        role: Some("authenticated".to_string()),
        user_metadata: metadata,
    }
}

fn sign(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to encode test JWT")
}

#[test]
fn test_valid_token_decodes_correctly() {
    let user_id = Uuid::new_v4();
    let mut claims = claims_for(
        &user_id.to_string(),
        3600,
        Some(UserMetadata {
            full_name: None,
            name: Some("Alice".to_string()),
            email: None,
        }),
    );
    claims.email = Some("alice@example.com".to_string());

    let decoded = validate_token(&sign(&claims, TEST_SECRET), TEST_SECRET).expect("valid token");

    assert_eq!(decoded.user_id().unwrap(), user_id);
    assert_eq!(decoded.user_email().unwrap(), "alice@example.com");
    assert_eq!(decoded.display_name().unwrap(), "Alice");
}

#[test]
fn test_expired_token_is_rejected() {
    // Well past the default 60s leeway.
    let claims = claims_for(&Uuid::new_v4().to_string(), -300, None);

    let err = validate_token(&sign(&claims, TEST_SECRET), TEST_SECRET).unwrap_err();
    assert!(err.contains("ExpiredSignature"));
}

#[test]
fn test_wrong_secret_is_rejected() {
    let claims = claims_for(&Uuid::new_v4().to_string(), 3600, None);

    let err = validate_token(
        &sign(&claims, TEST_SECRET),
        "completely-wrong-secret-xxxxxxxxxxxxxxxxxxx",
    )
    .unwrap_err();
    assert!(err.contains("InvalidSignature"));
}

#[test]
fn test_garbage_token_is_rejected() {
    assert!(validate_token("not.a.valid.jwt", TEST_SECRET).is_err());
}

#[test]
fn test_sub_must_be_a_uuid() {
    let claims = claims_for("not-a-uuid", 3600, None);
    assert!(claims.user_id().is_err());
}

#[test]
fn test_email_falls_back_to_metadata() {
    let claims = claims_for(
        &Uuid::new_v4().to_string(),
        3600,
        Some(UserMetadata {
            full_name: Some("Meta Person".to_string()),
            name: Some("meta".to_string()),
            email: Some("meta@example.com".to_string()),
        }),
    );

    assert_eq!(claims.user_email().unwrap(), "meta@example.com");
    // full_name wins over name.
    assert_eq!(claims.display_name().unwrap(), "Meta Person");

    let bare = claims_for(&Uuid::new_v4().to_string(), 3600, None);
    assert!(bare.user_email().is_none());
    assert!(bare.display_name().is_none());
}

#[tokio::test]
async fn test_shared_secret_verifier_checks_signature() {
    let verifier = TokenVerifier::from_settings(&AuthSettings::SharedSecret(TEST_SECRET.into()));
    let user_id = Uuid::new_v4();
    let claims = claims_for(&user_id.to_string(), 3600, None);

    let decoded = verifier.verify(&sign(&claims, TEST_SECRET)).await.unwrap();
    assert_eq!(decoded.sub, user_id.to_string());

    let forged = sign(&claims, "another-secret-entirely-xxxxxxxxxxxxxxxxxxxxxx");
    assert!(verifier.verify(&forged).await.is_err());
}
