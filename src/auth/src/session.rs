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

//! Sessions carry the authentication state used by each request.
//!
//! A [Session] is passed explicitly to every request. Applications working
//! on behalf of several users keep one session per user in a
//! [SessionManager].

use crate::Result;
use crate::token::{AuthInfo, Authenticator};
use crate::token_cache::TokenCache;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// The name of the header scoping requests to a shared link.
pub const SHARED_LINK_HEADER: &str = "BoxApi";

/// The authentication state for a user, shared by all its requests.
///
/// Cloning a session is cheap, the clones share the same state.
///
/// # Example
/// ```
/// # use cloud_content_auth::session::Session;
/// # use cloud_content_auth::token::{AuthInfo, Authenticator, Token};
/// # use cloud_content_auth::Result;
/// #[derive(Debug)]
/// struct MyAuthenticator;
/// #[async_trait::async_trait]
/// impl Authenticator for MyAuthenticator {
///     async fn refresh(&self, current: &AuthInfo) -> Result<AuthInfo> {
///         # panic!();
///     }
///     async fn authenticate(&self) -> Result<AuthInfo> {
///         # panic!();
///     }
/// }
/// # tokio_test::block_on(async {
/// let session = Session::new(AuthInfo::new(Token::bearer("abc"), "123"), MyAuthenticator);
/// assert_eq!(session.access_token().await.as_deref(), Some("abc"));
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    cache: TokenCache,
    shared_link: Option<SharedLink>,
}

#[derive(Clone, Debug)]
struct SharedLink {
    link: String,
    password: Option<String>,
}

impl Session {
    /// Creates a session from an initial state and an authenticator.
    pub fn new<A>(info: AuthInfo, authenticator: A) -> Self
    where
        A: Authenticator + 'static,
    {
        Self::from_parts(info, Arc::new(authenticator), None)
    }

    /// Creates a session that scopes every request to a shared link.
    pub fn shared_link<A, L>(
        info: AuthInfo,
        authenticator: A,
        link: L,
        password: Option<String>,
    ) -> Self
    where
        A: Authenticator + 'static,
        L: Into<String>,
    {
        let shared = SharedLink {
            link: link.into(),
            password,
        };
        Self::from_parts(info, Arc::new(authenticator), Some(shared))
    }

    fn from_parts(
        info: AuthInfo,
        authenticator: Arc<dyn Authenticator>,
        shared_link: Option<SharedLink>,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                cache: TokenCache::new(info, authenticator),
                shared_link,
            }),
        }
    }

    /// The current access token.
    pub async fn access_token(&self) -> Option<String> {
        self.inner.cache.info().await.access_token().map(str::to_string)
    }

    /// The id of the current user, if known.
    pub async fn user_id(&self) -> Option<String> {
        self.inner.cache.info().await.user_id
    }

    /// A snapshot of the current authentication state.
    pub async fn auth_info(&self) -> AuthInfo {
        self.inner.cache.info().await
    }

    /// Forgets the current user, typically before a new login.
    pub async fn clear_user(&self) {
        self.inner.cache.clear_user().await
    }

    /// Refreshes the access token after a request failed using `stale`.
    ///
    /// Concurrent calls are serialized. If the token was already replaced
    /// since `stale` was used this returns the new state without refreshing
    /// again.
    pub async fn refresh(&self, stale: Option<&str>) -> Result<AuthInfo> {
        self.inner.cache.refresh(stale).await
    }

    /// Runs the full login flow.
    pub async fn authenticate(&self) -> Result<AuthInfo> {
        self.inner.cache.authenticate().await
    }

    /// The value of the [SHARED_LINK_HEADER] for shared link sessions.
    pub fn shared_link_header(&self) -> Option<String> {
        self.inner.shared_link.as_ref().map(|s| match &s.password {
            Some(p) => format!("shared_link={}&shared_link_password={p}", s.link),
            None => format!("shared_link={}", s.link),
        })
    }
}

/// Maps user ids to their sessions.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the session for `user_id`, returning the previous one.
    pub fn insert<T: Into<String>>(&self, user_id: T, session: Session) -> Option<Session> {
        let mut guard = self
            .sessions
            .write()
            .unwrap_or_else(|poison| poison.into_inner());
        guard.insert(user_id.into(), session)
    }

    pub fn get(&self, user_id: &str) -> Option<Session> {
        let guard = self
            .sessions
            .read()
            .unwrap_or_else(|poison| poison.into_inner());
        guard.get(user_id).cloned()
    }

    pub fn remove(&self, user_id: &str) -> Option<Session> {
        let mut guard = self
            .sessions
            .write()
            .unwrap_or_else(|poison| poison.into_inner());
        guard.remove(user_id)
    }

    /// The ids of all users with a session, sorted.
    pub fn user_ids(&self) -> Vec<String> {
        let guard = self
            .sessions
            .read()
            .unwrap_or_else(|poison| poison.into_inner());
        let mut ids = guard.keys().cloned().collect::<Vec<_>>();
        ids.sort();
        ids
    }
}
