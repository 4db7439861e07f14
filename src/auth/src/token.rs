// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Types to work with access tokens and the authentication collaborator.

use crate::Result;
use tokio::time::Instant;

/// Represents an OAuth access token.
#[derive(Clone, PartialEq)]
pub struct Token {
    /// The actual token string.
    ///
    /// This is the value used in `Authorization:` header.
    pub token: String,

    /// The type of the token, almost always `"bearer"`.
    pub token_type: String,

    /// The refresh token, used to obtain a new access token.
    pub refresh_token: Option<String>,

    /// The instant at which the token expires.
    ///
    /// If `None`, the expiration is unknown. The service reports expired
    /// tokens, and the client refreshes them on demand.
    pub expires_at: Option<Instant>,
}

impl Token {
    /// Creates a bearer token without refresh token or expiration.
    pub fn bearer<T: Into<String>>(token: T) -> Self {
        Self {
            token: token.into(),
            token_type: "bearer".to_string(),
            refresh_token: None,
            expires_at: None,
        }
    }

    /// Sets the refresh token.
    pub fn with_refresh_token<T: Into<String>>(mut self, v: T) -> Self {
        self.refresh_token = Some(v.into());
        self
    }

    /// Sets the expiration time.
    pub fn with_expires_at(mut self, v: Instant) -> Self {
        self.expires_at = Some(v);
        self
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("token", &"[censored]")
            .field("token_type", &self.token_type)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[censored]"),
            )
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// The authentication state of a session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthInfo {
    /// The current access token, if any.
    pub token: Option<Token>,

    /// The id of the authenticated user, if known.
    pub user_id: Option<String>,

    /// The domain used for this user's API calls, if the service assigned one.
    pub base_domain: Option<String>,
}

impl AuthInfo {
    /// Creates the authentication state for a user.
    pub fn new<U: Into<String>>(token: Token, user_id: U) -> Self {
        Self {
            token: Some(token),
            user_id: Some(user_id.into()),
            base_domain: None,
        }
    }

    /// Creates the authentication state from just an access token.
    pub fn from_token(token: Token) -> Self {
        Self {
            token: Some(token),
            user_id: None,
            base_domain: None,
        }
    }

    /// Sets the base domain.
    pub fn with_base_domain<T: Into<String>>(mut self, v: T) -> Self {
        self.base_domain = Some(v.into());
        self
    }

    /// Returns the access token value, if any.
    pub fn access_token(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.token.as_str())
    }
}

/// The interface to the OAuth flows.
///
/// The client libraries never interact with users. Refreshing tokens,
/// storing them, and running the login flow are all delegated to an
/// implementation of this trait.
#[async_trait::async_trait]
pub trait Authenticator: std::fmt::Debug + Send + Sync {
    /// Exchanges the refresh token in `current` for a new access token.
    ///
    /// Implementations should classify failures with
    /// [from_oauth_error][crate::errors::from_oauth_error] so callers can
    /// tell fatal failures (a new login is required) from transient ones.
    async fn refresh(&self, current: &AuthInfo) -> Result<AuthInfo>;

    /// Runs the full login flow.
    ///
    /// The returned state may lack a user, e.g. if the user abandoned the
    /// login.
    async fn authenticate(&self) -> Result<AuthInfo>;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::time::Duration;

    // Used by tests in other modules.
    mockall::mock! {
        #[derive(Debug)]
        pub Authenticator { }

        #[async_trait::async_trait]
        impl Authenticator for Authenticator {
            async fn refresh(&self, current: &AuthInfo) -> Result<AuthInfo>;
            async fn authenticate(&self) -> Result<AuthInfo>;
        }
    }

    #[test]
    fn debug() {
        let expires_at = Instant::now() + Duration::from_secs(3600);
        let token = Token::bearer("token-test-only")
            .with_refresh_token("refresh-test-only")
            .with_expires_at(expires_at);
        let got = format!("{token:?}");
        assert!(!got.contains("token-test-only"), "{got}");
        assert!(!got.contains("refresh-test-only"), "{got}");
        assert!(got.contains("token: \"[censored]\""), "{got}");
        assert!(got.contains("token_type: \"bearer\""), "{got}");
        assert!(
            got.contains(&format!("expires_at: Some({expires_at:?}")),
            "{got}"
        );
    }

    #[test]
    fn auth_info() {
        let info = AuthInfo::new(Token::bearer("abc"), "user-123");
        assert_eq!(info.access_token(), Some("abc"));
        assert_eq!(info.user_id.as_deref(), Some("user-123"));

        let info = AuthInfo::from_token(Token::bearer("abc"));
        assert_eq!(info.user_id, None);
    }
}
