//! Account service tests against the in-memory store.

use std::sync::Arc;

use uuid::Uuid;

use account_service_lib::repository::{InMemoryUserStore, UserRepository};
use account_service_lib::service::{AccountManager, AccountService, TokenIssuer};
use common::AppError;
use domain::{Address, AddressKind, NewUser, OrderRef, User, UserPatch, ROLE_ADMIN};

const SECRET: &str = "test-secret-key-for-testing-only-32chars";

fn setup() -> (Arc<InMemoryUserStore>, AccountManager) {
    let store = Arc::new(InMemoryUserStore::new());
    let service = AccountManager::new(store.clone(), TokenIssuer::new(SECRET));
    (store, service)
}

fn address(city: &str) -> Address {
    Address {
        kind: AddressKind::Shipping,
        line1: "10 Downing Street".to_string(),
        line2: None,
        city: city.to_string(),
        state: None,
        postal_code: "SW1A 2AA".to_string(),
        country: "GB".to_string(),
    }
}

async fn create_user(service: &AccountManager, email: &str, password: &str) -> User {
    let new_user = NewUser {
        first_name: Some("Alan".to_string()),
        last_name: Some("Turing".to_string()),
        orders: vec![OrderRef::new(Uuid::new_v4())],
        ..NewUser::with_email(email)
    };
    service.create(new_user, password).await.unwrap()
}

// =============================================================================
// Create / lookup
// =============================================================================

#[tokio::test]
async fn test_created_user_is_retrievable_by_id_and_email() {
    let (_, service) = setup();
    let user = create_user(&service, "alan@example.com", "enigma-1940").await;

    let by_id = service.get_by_id(user.id).await.unwrap().unwrap();
    let by_email = service.get_by_email("alan@example.com").await.unwrap().unwrap();

    assert_eq!(by_id, user);
    assert_eq!(by_email, user);
    assert_eq!(service.get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_duplicate_email_conflicts() {
    let (store, service) = setup();
    create_user(&service, "alan@example.com", "enigma-1940").await;

    let result = service
        .create(NewUser::with_email("alan@example.com"), "different")
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_create_blank_password_is_invalid_input() {
    let (store, service) = setup();

    let result = service
        .create(NewUser::with_email("alan@example.com"), " \t")
        .await;

    assert!(matches!(result, Err(AppError::InvalidInput(_))));
    assert!(store.is_empty().await);
}

// =============================================================================
// Update merge policy
// =============================================================================

#[tokio::test]
async fn test_update_appends_orders_in_order() {
    let (_, service) = setup();
    let user = create_user(&service, "alan@example.com", "enigma-1940").await;
    let original = user.orders.clone();
    let extra = vec![OrderRef::new(Uuid::new_v4()), OrderRef::new(Uuid::new_v4())];

    let mut patch = UserPatch::for_user(user.id);
    patch.orders = extra.clone();
    let updated = service.update(patch, None).await.unwrap();

    let stored = service.get_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored, updated);
    assert_eq!(stored.orders.len(), original.len() + extra.len());
    assert_eq!(stored.orders, [original, extra].concat());
}

#[tokio::test]
async fn test_update_blank_first_name_leaves_it_unchanged() {
    let (_, service) = setup();
    let user = create_user(&service, "alan@example.com", "enigma-1940").await;

    let mut patch = UserPatch::for_user(user.id);
    patch.first_name = Some("   ".to_string());
    service.update(patch, None).await.unwrap();
    let stored = service.get_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.first_name.as_deref(), Some("Alan"));

    let mut patch = UserPatch::for_user(user.id);
    patch.first_name = Some("Mathison".to_string());
    service.update(patch, None).await.unwrap();
    let stored = service.get_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.first_name.as_deref(), Some("Mathison"));
    assert_eq!(stored.last_name.as_deref(), Some("Turing"));
}

#[tokio::test]
async fn test_update_replaces_addresses_and_role() {
    let (_, service) = setup();
    let user = create_user(&service, "alan@example.com", "enigma-1940").await;

    let mut patch = UserPatch::for_user(user.id);
    patch.addresses = vec![address("Wilmslow"), address("Manchester")];
    patch.role = Some(ROLE_ADMIN.to_string());
    let updated = service.update(patch, None).await.unwrap();

    assert_eq!(updated.addresses, vec![address("Wilmslow"), address("Manchester")]);
    assert!(updated.has_role(ROLE_ADMIN));

    // Empty address list leaves the stored list alone
    let updated = service
        .update(UserPatch::for_user(user.id), None)
        .await
        .unwrap();
    assert_eq!(updated.addresses.len(), 2);
}

#[tokio::test]
async fn test_update_email_to_taken_address_conflicts_and_keeps_record() {
    let (_, service) = setup();
    let alan = create_user(&service, "alan@example.com", "enigma-1940").await;
    create_user(&service, "joan@example.com", "bletchley").await;

    let mut patch = UserPatch::for_user(alan.id);
    patch.email = Some("joan@example.com".to_string());
    patch.first_name = Some("Changed".to_string());
    let result = service.update(patch, None).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    let stored = service.get_by_id(alan.id).await.unwrap().unwrap();
    assert_eq!(stored, alan);
}

#[tokio::test]
async fn test_update_email_to_free_address() {
    let (_, service) = setup();
    let user = create_user(&service, "alan@example.com", "enigma-1940").await;

    let mut patch = UserPatch::for_user(user.id);
    patch.email = Some("turing@example.com".to_string());
    service.update(patch, None).await.unwrap();

    assert!(service.get_by_email("alan@example.com").await.unwrap().is_none());
    let moved = service.get_by_email("turing@example.com").await.unwrap().unwrap();
    assert_eq!(moved.id, user.id);
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let (_, service) = setup();

    let result = service.update(UserPatch::for_user(Uuid::new_v4()), None).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_update_password_changes_login() {
    let (_, service) = setup();
    let user = create_user(&service, "alan@example.com", "enigma-1940").await;

    service
        .update(UserPatch::for_user(user.id), Some("bombe-1939"))
        .await
        .unwrap();

    assert!(service
        .authenticate("alan@example.com", "enigma-1940")
        .await
        .unwrap()
        .is_none());
    assert!(service
        .authenticate("alan@example.com", "bombe-1939")
        .await
        .unwrap()
        .is_some());
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_is_idempotent_and_scoped() {
    let (_, service) = setup();
    let alan = create_user(&service, "alan@example.com", "enigma-1940").await;
    let joan = create_user(&service, "joan@example.com", "bletchley").await;

    service.delete(Uuid::new_v4()).await.unwrap();
    assert_eq!(service.get_all().await.unwrap().len(), 2);

    service.delete(alan.id).await.unwrap();
    service.delete(alan.id).await.unwrap();

    assert!(service.get_by_id(alan.id).await.unwrap().is_none());
    assert_eq!(service.get_by_id(joan.id).await.unwrap(), Some(joan));
}

// =============================================================================
// Authentication and tokens
// =============================================================================

#[tokio::test]
async fn test_authenticate_success() {
    let (_, service) = setup();
    let user = create_user(&service, "alan@example.com", "enigma-1940").await;

    let authenticated = service
        .authenticate("alan@example.com", "enigma-1940")
        .await
        .unwrap();
    assert_eq!(authenticated, Some(user));
}

#[tokio::test]
async fn test_authenticate_failures_are_indistinguishable() {
    let (_, service) = setup();
    create_user(&service, "alan@example.com", "enigma-1940").await;

    let wrong_password = service
        .authenticate("alan@example.com", "wrong")
        .await
        .unwrap();
    let unknown_email = service
        .authenticate("nobody@example.com", "enigma-1940")
        .await
        .unwrap();
    let blank_email = service.authenticate("", "enigma-1940").await.unwrap();
    let blank_password = service.authenticate("alan@example.com", "").await.unwrap();

    assert_eq!(wrong_password, None);
    assert_eq!(unknown_email, None);
    assert_eq!(blank_email, None);
    assert_eq!(blank_password, None);
}

#[tokio::test]
async fn test_login_issues_verifiable_token() {
    let (_, service) = setup();
    let user = create_user(&service, "alan@example.com", "enigma-1940").await;

    let response = service
        .login("alan@example.com", "enigma-1940")
        .await
        .unwrap()
        .unwrap();
    let claims = TokenIssuer::new(SECRET).verify(&response.access_token).unwrap();

    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.role, user.role);
    assert!(service.login("alan@example.com", "nope").await.unwrap().is_none());
}

#[tokio::test]
async fn test_issued_token_rejected_under_other_secret() {
    let (_, service) = setup();
    let user = create_user(&service, "alan@example.com", "enigma-1940").await;

    let token = service.issue_token(&user).unwrap();
    let other = TokenIssuer::new("a-completely-different-secret-value!");

    assert!(matches!(other.verify(&token), Err(AppError::Jwt(_))));
}

// =============================================================================
// Store-level uniqueness
// =============================================================================

#[tokio::test]
async fn test_store_rejects_replace_onto_taken_email() {
    let (store, service) = setup();
    let alan = create_user(&service, "alan@example.com", "enigma-1940").await;
    create_user(&service, "joan@example.com", "bletchley").await;

    let mut clash = alan.clone();
    clash.email = "joan@example.com".to_string();
    let result = store.replace_by_id(alan.id, clash).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}
