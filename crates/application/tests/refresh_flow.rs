//! End-to-end behaviour of the authenticated client against fake ports:
//! bearer attachment, single-flight refresh, retry-once and teardown.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use backoffice_application::{
    ApiError, AuthenticatedClient, CredentialStore, MemoryCredentialStore, RefreshCoordinator,
    RetryExclusions, SessionState, SessionStore,
};
use backoffice_domain::{
    ApiRequest, ClientSettings, CredentialPair, RefreshError, StatusCode, TokenLifetimes,
};
use common::{FakeAuth, FixedClock, FnTransport, WorldBuilder, ana};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_requests_carry_the_stored_token() {
    let world = WorldBuilder::new(
        FnTransport::new(|_| (200, "{}".to_string())),
        FakeAuth::refreshing_to(CredentialPair::new("T2", "R2")),
    )
    .build()
    .await;

    world.client.send(ApiRequest::get("/products")).await.unwrap();
    world.client.send(ApiRequest::get("/orders")).await.unwrap();

    let tokens: Vec<_> = world
        .transport
        .sent()
        .iter()
        .map(|r| r.bearer_token().map(String::from))
        .collect();
    assert_eq!(tokens, vec![Some("T1".to_string()), Some("T1".to_string())]);
}

#[tokio::test]
async fn test_requests_without_a_stored_token_carry_none() {
    let world = WorldBuilder::new(
        FnTransport::new(|_| (200, "{}".to_string())),
        FakeAuth::refreshing_to(CredentialPair::new("T2", "R2")),
    )
    .tokens(None)
    .build()
    .await;

    world.client.send(ApiRequest::get("/brands")).await.unwrap();

    assert!(world.transport.sent()[0].bearer_token().is_none());
}

#[tokio::test]
async fn test_concurrent_401s_share_one_refresh() {
    let world = WorldBuilder::new(
        FnTransport::accepting("T2"),
        FakeAuth::refreshing_to(CredentialPair::new("T2", "R2")),
    )
    .build()
    .await;

    let (a, b) = tokio::join!(
        world.client.send(ApiRequest::get("/orders")),
        world.client.send(ApiRequest::get("/products")),
    );

    assert_eq!(a.unwrap().status, StatusCode::new(200));
    assert_eq!(b.unwrap().status, StatusCode::new(200));
    assert_eq!(world.auth.calls(), 1);

    let retried: Vec<_> = world
        .transport
        .sent()
        .into_iter()
        .filter(|r| r.is_retried())
        .map(|r| {
            let token = r.bearer_token().map(String::from);
            (r.path, token)
        })
        .collect();
    assert_eq!(retried.len(), 2);
    assert!(retried.iter().all(|(_, token)| token.as_deref() == Some("T2")));
}

#[tokio::test]
async fn test_many_concurrent_failures_still_refresh_once() {
    let world = WorldBuilder::new(
        FnTransport::accepting("T2"),
        FakeAuth::refreshing_to(CredentialPair::new("T2", "R2")),
    )
    .build()
    .await;

    let calls = (0..8).map(|i| {
        let client = world.client.clone();
        async move { client.send(ApiRequest::get(format!("/orders/{i}"))).await }
    });
    let results = futures::future::join_all(calls).await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(world.auth.calls(), 1);
    assert!(!world.refresh.is_refreshing());
}

#[tokio::test]
async fn test_refresh_updates_tokens_and_keeps_identity() {
    let world = WorldBuilder::new(
        FnTransport::accepting("T2"),
        FakeAuth::refreshing_to(CredentialPair::new("T2", "R2")),
    )
    .build()
    .await;

    world.client.send(ApiRequest::get("/offers")).await.unwrap();

    assert_eq!(world.store.access_token().await.unwrap().as_deref(), Some("T2"));
    assert_eq!(world.store.refresh_token().await.unwrap().as_deref(), Some("R2"));
    assert_eq!(world.store.identity().await.unwrap(), Some(ana()));
    let session = world.session.snapshot();
    assert_eq!(session.user, Some(ana()));
    assert_eq!(session.access_token.as_deref(), Some("T2"));
    assert_eq!(session.refresh_token.as_deref(), Some("R2"));
    assert_eq!(
        *world.log.lock(),
        vec!["store.save_tokens", "session.set_credentials"]
    );
}

#[tokio::test]
async fn test_retried_request_is_not_refreshed_again() {
    // The refreshed token is rejected too.
    let world = WorldBuilder::new(
        FnTransport::new(|_| (401, r#"{"message":"revoked"}"#.to_string())),
        FakeAuth::refreshing_to(CredentialPair::new("T2", "R2")),
    )
    .build()
    .await;

    let error = world
        .client
        .send(ApiRequest::get("/users"))
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(world.auth.calls(), 1);
    assert_eq!(world.transport.sent().len(), 2);
}

#[tokio::test]
async fn test_already_retried_descriptor_fails_immediately() {
    let world = WorldBuilder::new(
        FnTransport::new(|_| (401, r#"{"message":"jwt expired"}"#.to_string())),
        FakeAuth::refreshing_to(CredentialPair::new("T2", "R2")),
    )
    .build()
    .await;
    let mut request = ApiRequest::get("/notifications");
    request.mark_retried();

    let error = world.client.send(request).await.unwrap_err();

    assert_eq!(error.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(world.auth.calls(), 0);
    assert_eq!(world.transport.sent().len(), 1);
}

#[tokio::test]
async fn test_login_401_is_returned_without_refresh() {
    let world = WorldBuilder::new(
        FnTransport::new(|_| (401, r#"{"message":"invalid password"}"#.to_string())),
        FakeAuth::refreshing_to(CredentialPair::new("T2", "R2")),
    )
    .build()
    .await;

    let error = world
        .client
        .send(ApiRequest::post("/auth/login"))
        .await
        .unwrap_err();

    match error {
        ApiError::Status {
            status, message, ..
        } => {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(message, "invalid password");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(world.auth.calls(), 0);
    assert_eq!(world.expired_count(), 0);
}

#[tokio::test]
async fn test_refresh_endpoint_403_is_returned_without_refresh() {
    let world = WorldBuilder::new(
        FnTransport::new(|_| (403, String::new())),
        FakeAuth::refreshing_to(CredentialPair::new("T2", "R2")),
    )
    .build()
    .await;

    let error = world
        .client
        .send(ApiRequest::post("/auth/refresh"))
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(StatusCode::FORBIDDEN));
    assert_eq!(world.auth.calls(), 0);
}

#[tokio::test]
async fn test_missing_refresh_token_tears_down_the_session() {
    let world = WorldBuilder::new(
        FnTransport::new(|_| (401, String::new())),
        FakeAuth::refreshing_to(CredentialPair::new("T2", "R2")),
    )
    .tokens(None)
    .build()
    .await;

    let error = world
        .client
        .send(ApiRequest::get("/orders"))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        ApiError::Refresh(RefreshError::MissingRefreshToken)
    ));
    assert!(error.is_session_expired());
    assert_eq!(world.auth.calls(), 0);
    assert_eq!(world.expired_count(), 1);
    assert!(!world.session.snapshot().is_authenticated);
    assert_eq!(world.store.identity().await.unwrap(), None);
}

#[tokio::test]
async fn test_failed_refresh_teardown_order() {
    let rejected = RefreshError::Rejected {
        status: 401,
        message: "refresh token expired".to_string(),
    };
    let world = WorldBuilder::new(
        FnTransport::new(|_| (401, String::new())),
        FakeAuth::failing_with(rejected.clone()),
    )
    .build()
    .await;

    let (a, b) = tokio::join!(
        world.client.send(ApiRequest::get("/orders")),
        world.client.send(ApiRequest::get("/brands")),
    );

    for result in [a, b] {
        match result {
            Err(ApiError::Refresh(error)) => assert_eq!(error, rejected),
            other => panic!("expected refresh error, got {other:?}"),
        }
    }
    assert_eq!(world.auth.calls(), 1);
    assert_eq!(world.expired_count(), 1);
    assert_eq!(
        *world.log.lock(),
        vec![
            "session.logout",
            "store.clear_tokens",
            "store.clear_identity",
            "listener.session_expired",
        ]
    );
    assert_eq!(world.store.access_token().await.unwrap(), None);
    assert_eq!(world.store.refresh_token().await.unwrap(), None);
    assert_eq!(world.store.identity().await.unwrap(), None);
}

#[tokio::test]
async fn test_teardown_store_failures_keep_the_refresh_error() {
    let world = WorldBuilder::new(
        FnTransport::new(|_| (401, String::new())),
        FakeAuth::failing_with(RefreshError::Network {
            message: "connection reset".to_string(),
        }),
    )
    .failing_clear()
    .build()
    .await;

    let error = world
        .client
        .send(ApiRequest::get("/categories"))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        ApiError::Refresh(RefreshError::Network { .. })
    ));
    assert_eq!(world.expired_count(), 1);
    assert!(!world.session.snapshot().is_authenticated);
}

#[tokio::test]
async fn test_a_later_failure_starts_a_new_refresh() {
    let world = WorldBuilder::new(
        FnTransport::accepting("T2"),
        FakeAuth::refreshing_to(CredentialPair::new("T2", "R2")),
    )
    .build()
    .await;

    world.client.send(ApiRequest::get("/orders")).await.unwrap();
    world
        .store
        .save_tokens(&CredentialPair::new("T1", "R2"))
        .await
        .unwrap();
    world.client.send(ApiRequest::get("/orders")).await.unwrap();

    assert_eq!(world.auth.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_slow_refresh_times_out() {
    let mut auth = FakeAuth::refreshing_to(CredentialPair::new("T2", "R2"));
    auth.refresh_delay = Duration::from_secs(60);
    let world = WorldBuilder::new(FnTransport::accepting("T2"), auth)
        .build()
        .await;

    let error = world
        .client
        .send(ApiRequest::get("/orders"))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        ApiError::Refresh(RefreshError::Timeout { timeout_ms: 10_000 })
    ));
    assert_eq!(world.expired_count(), 1);
}

#[tokio::test]
async fn test_retry_carries_refreshed_token_when_access_slot_expires_at_once() {
    // Access tokens expire as soon as they are written.
    let store = Arc::new(MemoryCredentialStore::with_lifetimes(
        Arc::new(FixedClock),
        TokenLifetimes::from_secs(0, 600),
    ));
    store
        .save_tokens(&CredentialPair::new("T1", "R1"))
        .await
        .unwrap();
    let transport = Arc::new(FnTransport::accepting("T2"));
    let auth = Arc::new(FakeAuth::refreshing_to(CredentialPair::new("T2", "R2")));
    let refresh = Arc::new(RefreshCoordinator::new(
        store.clone(),
        Arc::new(SessionState::new()),
        auth.clone(),
        Arc::new(|| {}),
    ));
    let client = AuthenticatedClient::new(
        transport.clone(),
        store,
        refresh,
        RetryExclusions::from_settings(&ClientSettings::default()).unwrap(),
    );

    let response = client.send(ApiRequest::get("/orders")).await.unwrap();

    assert_eq!(response.status, StatusCode::new(200));
    assert_eq!(auth.calls(), 1);
    let bearers: Vec<_> = transport
        .sent()
        .iter()
        .map(|r| r.bearer_token().map(String::from))
        .collect();
    assert_eq!(bearers, vec![None, Some("T2".to_string())]);
}
