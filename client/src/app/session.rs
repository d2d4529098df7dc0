//! # Session Manager
//!
//! Owns the access/refresh token pair and the user identity. Every mutation
//! writes durable storage and the in-memory state inside one write-lock
//! critical section, so readers never see one updated without the other.
//!
//! 401 handling is centralised here: controllers that receive
//! [`ApiError::Unauthorized`] call [`SessionManager::handle_session_expired`],
//! which clears the session and requests the login prompt once.

use async_channel::Sender;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;

use shared::{LoginRequest, RegistrationRequest, TokenPair};

use super::events::AppEvent;
use super::publish;
use super::state::{SessionState, UserIdentity};
use crate::core::error::{ApiError, AuthError};
use crate::core::service::{AuthService, UserService};
use crate::services::storage::{TokenStorage, ACCESS_TOKEN_KEY, AUTH_USER_KEY, REFRESH_TOKEN_KEY};
use crate::utils::jwt::decode_claims;
use crate::utils::validation::validate_registration;

/// Message shown when credentials are rejected mid-session
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired, please log in again";

struct SessionInner {
    state: RwLock<SessionState>,
    storage: Arc<dyn TokenStorage>,
    auth: Arc<dyn AuthService>,
    users: Arc<dyn UserService>,
    events: Sender<AppEvent>,
}

/// Shared handle to the authentication session
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

impl SessionManager {
    /// Create a manager, restoring any session found in `storage`.
    pub fn new(
        storage: Arc<dyn TokenStorage>,
        auth: Arc<dyn AuthService>,
        users: Arc<dyn UserService>,
        events: Sender<AppEvent>,
    ) -> Self {
        let state = restore(storage.as_ref());
        if state.is_authenticated() {
            tracing::info!(
                username = state.user.as_ref().map(|u| u.display_name()).unwrap_or_default(),
                "Restored session from storage"
            );
        }

        Self {
            inner: Arc::new(SessionInner {
                state: RwLock::new(state),
                storage,
                auth,
                users,
                events,
            }),
        }
    }

    /// Snapshot of the current session
    pub fn state(&self) -> SessionState {
        self.inner.state.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.read().is_authenticated()
    }

    pub fn user(&self) -> Option<UserIdentity> {
        self.inner.state.read().user.clone()
    }

    pub fn has_access_token(&self) -> bool {
        self.inner
            .state
            .read()
            .access_token
            .as_deref()
            .is_some_and(|token| !token.is_empty())
    }

    pub fn open_login(&self) {
        self.inner.state.write().show_login = true;
        publish(&self.inner.events, AppEvent::LoginPrompt(true));
    }

    /// Hide the login prompt and clear the last error.
    pub fn close_login(&self) {
        {
            let mut state = self.inner.state.write();
            state.show_login = false;
            state.error = None;
        }
        publish(&self.inner.events, AppEvent::LoginPrompt(false));
    }

    /// Exchange credentials for a session.
    ///
    /// Profile enrichment after the token exchange is best-effort: its failure
    /// never fails the login.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<UserIdentity, AuthError> {
        self.begin();
        let start = Instant::now();

        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let pair = match self.inner.auth.login(&request).await {
            Ok(pair) => pair,
            Err(err) => {
                let auth_err = AuthError::from_login(&err);
                tracing::warn!(error = %err, "Login rejected");
                return Err(self.fail(auth_err));
            }
        };

        let identity = identity_from_token(&pair.access_token, username);
        if let Err(err) = self.store_session(&pair, &identity) {
            return Err(self.fail(err));
        }

        let identity = match self.fetch_profile().await {
            Some(enriched) => enriched,
            None => {
                tracing::debug!("Profile enrichment skipped or failed after login");
                identity
            }
        };

        self.inner.state.write().loading = false;
        self.close_login();
        publish(&self.inner.events, AppEvent::SessionChanged);

        tracing::info!(
            user_id = identity.id,
            duration_ms = start.elapsed().as_millis() as u64,
            "Login successful"
        );
        Ok(identity)
    }

    /// Validate locally, create the account, then log in with the same credentials.
    #[tracing::instrument(skip(self, password))]
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<UserIdentity, AuthError> {
        self.begin();

        let validation = validate_registration(username, password, email);
        if let Some(message) = validation.error {
            return Err(self.fail(AuthError::Validation(message)));
        }

        let request = RegistrationRequest {
            username: username.to_string(),
            email: email.filter(|e| !e.is_empty()).map(str::to_string),
            password: password.to_string(),
        };

        match self.inner.users.register(&request).await {
            Ok(profile) => {
                tracing::info!(user_id = profile.id, "Account created");
            }
            Err(err) => {
                tracing::warn!(error = %err, "Registration rejected");
                return Err(self.fail(AuthError::from_register(&err)));
            }
        }

        self.login(username, password).await
    }

    /// Exchange the refresh token for a new pair.
    ///
    /// Any failure, including a missing refresh token, tears the session down.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let refresh_token = self
            .inner
            .state
            .read()
            .refresh_token
            .clone()
            .filter(|token| !token.is_empty());

        let Some(refresh_token) = refresh_token else {
            tracing::info!("No refresh token held, session cannot be renewed");
            self.handle_session_expired(SESSION_EXPIRED_MESSAGE);
            return Err(AuthError::SessionExpired(SESSION_EXPIRED_MESSAGE.to_string()));
        };

        match self.inner.auth.refresh(&refresh_token).await {
            Ok(pair) => {
                let stored = {
                    let mut state = self.inner.state.write();
                    let stored = self.inner.storage.apply(&[
                        (ACCESS_TOKEN_KEY, Some(pair.access_token.as_str())),
                        (REFRESH_TOKEN_KEY, Some(pair.refresh_token.as_str())),
                    ]);
                    if stored.is_ok() {
                        state.access_token = Some(pair.access_token);
                        state.refresh_token = Some(pair.refresh_token);
                    }
                    stored
                };
                if let Err(err) = stored {
                    // The old pair is already revoked server-side
                    tracing::error!(error = %err, "Failed to persist refreshed tokens");
                    self.handle_session_expired(SESSION_EXPIRED_MESSAGE);
                    return Err(AuthError::SessionExpired(SESSION_EXPIRED_MESSAGE.to_string()));
                }
                tracing::info!("Access token refreshed");
                publish(&self.inner.events, AppEvent::SessionChanged);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Token refresh failed");
                self.handle_session_expired(SESSION_EXPIRED_MESSAGE);
                Err(AuthError::SessionExpired(SESSION_EXPIRED_MESSAGE.to_string()))
            }
        }
    }

    /// End the session. The server call is best-effort; local state and all
    /// persisted keys are cleared regardless of its outcome.
    pub async fn logout(&self, skip_server: bool) {
        if !skip_server && self.has_access_token() {
            if let Err(err) = self.inner.auth.logout().await {
                tracing::warn!(error = %err, "Server logout failed, clearing local session anyway");
            }
        }

        self.clear_local();
        publish(&self.inner.events, AppEvent::SessionChanged);
        tracing::info!(skip_server, "Logged out");
    }

    /// Reload the identity from `GET /users/{id}`.
    ///
    /// A 401 triggers one refresh; every failure yields `None`.
    pub async fn fetch_profile(&self) -> Option<UserIdentity> {
        let user_id = self.inner.state.read().user.as_ref().and_then(|u| u.id)?;

        match self.inner.users.get_user(user_id).await {
            Ok(profile) => {
                let updated = {
                    let mut state = self.inner.state.write();
                    let mut identity = state.user.clone().unwrap_or_default();
                    identity.merge_profile(&profile);
                    if let Err(err) = self.persist_identity(&identity) {
                        tracing::error!(error = %err, "Failed to persist profile");
                    }
                    state.user = Some(identity.clone());
                    identity
                };
                publish(&self.inner.events, AppEvent::SessionChanged);
                Some(updated)
            }
            Err(err) => {
                tracing::warn!(user_id, error = %err, "Failed to fetch user profile");
                if err.is_unauthorized() {
                    let _ = self.refresh().await;
                }
                None
            }
        }
    }

    /// Upload a new avatar and merge the returned profile.
    pub async fn update_avatar(&self, file_name: &str, bytes: Vec<u8>) -> Result<UserIdentity, AuthError> {
        if bytes.is_empty() {
            return Err(AuthError::Validation("Please choose an image to upload".to_string()));
        }

        match self.inner.users.upload_avatar(file_name.to_string(), bytes).await {
            Ok(profile) => {
                let identity = {
                    let mut state = self.inner.state.write();
                    let mut identity = state.user.clone().unwrap_or_default();
                    identity.merge_profile(&profile);
                    self.persist_identity(&identity)?;
                    state.user = Some(identity.clone());
                    identity
                };
                publish(&self.inner.events, AppEvent::SessionChanged);
                Ok(identity)
            }
            Err(ApiError::Unauthorized(_)) => {
                self.handle_session_expired(SESSION_EXPIRED_MESSAGE);
                Err(AuthError::SessionExpired(SESSION_EXPIRED_MESSAGE.to_string()))
            }
            Err(err) => {
                tracing::warn!(error = %err, "Avatar upload failed");
                Err(AuthError::Failed(
                    err.server_message()
                        .unwrap_or("Avatar upload failed, please try again later")
                        .to_string(),
                ))
            }
        }
    }

    /// Ask the auth service who the current token belongs to.
    ///
    /// A 401 is answered with one refresh and one retry of the request.
    pub async fn validate(&self) -> Result<String, AuthError> {
        let token = self.current_token()?;

        match self.inner.auth.validate(&token).await {
            Ok(username) => Ok(username),
            Err(ApiError::Unauthorized(_)) => {
                tracing::debug!("Token rejected by validate, refreshing once");
                self.refresh().await?;
                let token = self.current_token()?;
                match self.inner.auth.validate(&token).await {
                    Ok(username) => Ok(username),
                    Err(ApiError::Unauthorized(_)) => {
                        self.handle_session_expired(SESSION_EXPIRED_MESSAGE);
                        Err(AuthError::SessionExpired(SESSION_EXPIRED_MESSAGE.to_string()))
                    }
                    Err(err) => Err(validate_failure(err)),
                }
            }
            Err(err) => Err(validate_failure(err)),
        }
    }

    /// Tear down a session whose credentials were rejected.
    ///
    /// Sets `message` as the session error, clears local state without
    /// contacting the server and requests the login prompt. Repeated calls
    /// while already torn down and prompting are no-ops.
    pub fn handle_session_expired(&self, message: &str) {
        {
            let mut state = self.inner.state.write();
            let had_session = state.access_token.is_some()
                || state.refresh_token.is_some()
                || state.user.is_some();
            if !had_session && state.show_login {
                return;
            }

            if let Err(err) = self.inner.storage.clear_session() {
                tracing::error!(error = %err, "Failed to clear persisted session");
            }
            state.clear_credentials();
            state.error = Some(message.to_string());
            state.show_login = true;
            state.loading = false;
        }

        tracing::warn!("Session expired, login required");
        publish(
            &self.inner.events,
            AppEvent::SessionExpired {
                message: message.to_string(),
            },
        );
        publish(&self.inner.events, AppEvent::LoginPrompt(true));
    }

    fn current_token(&self) -> Result<String, AuthError> {
        self.inner
            .state
            .read()
            .access_token
            .clone()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AuthError::SessionExpired("Not logged in".to_string()))
    }

    fn begin(&self) {
        let mut state = self.inner.state.write();
        state.loading = true;
        state.error = None;
    }

    fn fail(&self, err: AuthError) -> AuthError {
        let mut state = self.inner.state.write();
        state.loading = false;
        state.error = Some(err.to_string());
        err
    }

    fn store_session(&self, pair: &TokenPair, identity: &UserIdentity) -> Result<(), AuthError> {
        let user_json = serde_json::to_string(identity).map_err(|e| AuthError::Storage(e.to_string()))?;

        let mut state = self.inner.state.write();
        self.inner.storage.apply(&[
            (ACCESS_TOKEN_KEY, Some(pair.access_token.as_str())),
            (REFRESH_TOKEN_KEY, Some(pair.refresh_token.as_str())),
            (AUTH_USER_KEY, Some(user_json.as_str())),
        ])?;
        state.access_token = Some(pair.access_token.clone());
        state.refresh_token = Some(pair.refresh_token.clone());
        state.user = Some(identity.clone());
        Ok(())
    }

    fn persist_identity(&self, identity: &UserIdentity) -> Result<(), AuthError> {
        let user_json = serde_json::to_string(identity).map_err(|e| AuthError::Storage(e.to_string()))?;
        self.inner.storage.set(AUTH_USER_KEY, &user_json)?;
        Ok(())
    }

    fn clear_local(&self) {
        let mut state = self.inner.state.write();
        if let Err(err) = self.inner.storage.clear_session() {
            tracing::error!(error = %err, "Failed to clear persisted session");
        }
        state.clear_credentials();
    }
}

fn restore(storage: &dyn TokenStorage) -> SessionState {
    let user = storage.get(AUTH_USER_KEY).and_then(|raw| {
        serde_json::from_str::<UserIdentity>(&raw)
            .map_err(|e| tracing::warn!(error = %e, "Ignoring unreadable stored identity"))
            .ok()
    });

    SessionState {
        access_token: storage.access_token(),
        refresh_token: storage.get(REFRESH_TOKEN_KEY).filter(|token| !token.is_empty()),
        user,
        ..SessionState::default()
    }
}

fn identity_from_token(access_token: &str, fallback_username: &str) -> UserIdentity {
    match decode_claims(access_token) {
        Ok(claims) => {
            let mut identity = UserIdentity::from_claims(&claims);
            if identity.username.is_none() {
                identity.username = Some(fallback_username.to_string());
            }
            identity
        }
        Err(err) => {
            tracing::warn!(error = %err, "Could not read access token claims");
            UserIdentity {
                username: Some(fallback_username.to_string()),
                ..UserIdentity::default()
            }
        }
    }
}

fn validate_failure(err: ApiError) -> AuthError {
    match err {
        ApiError::Network(detail) => AuthError::Network(detail),
        other => AuthError::Failed(
            other
                .server_message()
                .unwrap_or("Token validation failed")
                .to_string(),
        ),
    }
}
