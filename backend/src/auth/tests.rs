use super::*;
use jsonwebtoken::{EncodingKey, Header, encode};
use std::env;

fn set_env_vars() {
    unsafe {
        env::set_var("JWT_SECRET", "supersecretjwtsecretforunittesting123");
        env::set_var("JWT_EXPIRY_DAYS", "7");
    }
}

#[test]
fn test_generate_and_validate_token() {
    set_env_vars();
    let user_id = Uuid::new_v4();

    let token = generate_token(user_id, Role::Provider).expect("token should generate");
    let claims = validate_token(&token).expect("freshly issued token should validate");

    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.role, "PROVIDER");
}

#[test]
fn test_validate_token_expired() {
    set_env_vars();
    let my_claims = Claims {
        sub: "123e4567-e89b-12d3-a456-426614174000".to_string(),
        role: "CLIENT".to_string(),
        exp: 1, // past
    };

    let token = encode(
        &Header::default(),
        &my_claims,
        &EncodingKey::from_secret("supersecretjwtsecretforunittesting123".as_bytes()),
    )
    .unwrap();

    assert!(validate_token(&token).is_err());
}

#[test]
fn test_validate_token_invalid_signature() {
    set_env_vars();
    let my_claims = Claims {
        sub: "123e4567-e89b-12d3-a456-426614174000".to_string(),
        role: "CLIENT".to_string(),
        exp: 9999999999,
    };

    let token = encode(
        &Header::default(),
        &my_claims,
        &EncodingKey::from_secret("wrongsecret".as_bytes()),
    )
    .unwrap();

    assert!(validate_token(&token).is_err());
}

#[test]
fn test_password_hash_round_trip() {
    let hash = hash_password("hunter2hunter2").expect("hash should succeed");

    assert_ne!(hash, "hunter2hunter2");
    assert!(verify_password("hunter2hunter2", &hash));
    assert!(!verify_password("wrong-password", &hash));
}

#[test]
fn test_verify_password_rejects_malformed_hash() {
    assert!(!verify_password("whatever", "not-a-phc-string"));
}
