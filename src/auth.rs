//! Registration, login and logout.
//!
//! A successful register or login stores the returned token in the shared
//! [`Session`]; refreshing favorites afterwards is up to the caller (the
//! [`MovieFinder`](crate::app::MovieFinder) facade does it). Failures carry
//! the server's `error` message when there is one, else a generic fallback.
//!
//! No input validation happens here: empty fields are sent as-is and the
//! server decides.

use std::sync::Arc;

use crate::{
    api::MovieApi,
    error::Result,
    session::Session,
    types::{LoginRequest, RegisterRequest, TokenResponse},
};

pub const REGISTER_SUCCESS_MESSAGE: &str = "Registration successful!";
pub const REGISTER_FAILED_MESSAGE: &str = "Registration failed";
pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful!";
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";
pub const LOGOUT_MESSAGE: &str = "Logged out!";

/// How a register or login attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// A token was issued and stored. The message is for the user.
    LoggedIn(String),
    /// No token was stored. The message is for the user.
    Failed(String),
}

impl AuthOutcome {
    pub fn message(&self) -> &str {
        match self {
            AuthOutcome::LoggedIn(message) | AuthOutcome::Failed(message) => message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::LoggedIn(_))
    }
}

/// Account operations bound to one session.
#[derive(Clone)]
pub struct AuthFlow {
    api: Arc<dyn MovieApi>,
    session: Arc<Session>,
}

impl AuthFlow {
    pub fn new(api: Arc<dyn MovieApi>, session: Arc<Session>) -> Self {
        Self { api, session }
    }

    /// Creates an account and logs in with the issued token.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> AuthOutcome {
        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        tracing::debug!(?request, "registering");

        let response = self.api.register(&request).await;
        self.finish(response, REGISTER_SUCCESS_MESSAGE, REGISTER_FAILED_MESSAGE)
    }

    /// Logs in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> AuthOutcome {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        tracing::debug!(?request, "logging in");

        let response = self.api.login(&request).await;
        self.finish(response, LOGIN_SUCCESS_MESSAGE, LOGIN_FAILED_MESSAGE)
    }

    /// Forgets the session token. Never calls the server.
    pub fn logout(&self) -> Result<()> {
        self.session.clear()
    }

    fn finish(
        &self,
        response: Result<TokenResponse>,
        success: &str,
        fallback: &str,
    ) -> AuthOutcome {
        let token = match response.and_then(TokenResponse::into_token) {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(error = %e, "authentication failed");
                return AuthOutcome::Failed(e.user_message(fallback));
            }
        };

        // A token that could not be written to disk still logs this run in.
        if let Err(e) = self.session.set_token(token) {
            tracing::warn!(error = %e, "logged in for this run only");
        }
        AuthOutcome::LoggedIn(success.to_string())
    }
}
