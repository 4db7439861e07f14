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

use crate::Result;
use crate::errors::CredentialsError;
use crate::token::{AuthInfo, Authenticator};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Caches the authentication state and serializes refreshes.
///
/// Requests that fail with an expired token all ask for a refresh at about
/// the same time. Only the first one reaches the [Authenticator]. The others
/// wait for it and share its outcome.
#[derive(Debug)]
pub(crate) struct TokenCache {
    // The current state and the outcome of the last refresh.
    state: Mutex<CacheState>,

    // Held for the duration of a refresh or a login.
    refresh_in_progress: Mutex<()>,

    inner: Arc<dyn Authenticator>,
}

#[derive(Debug, Default)]
struct CacheState {
    info: AuthInfo,
    // Incremented after each refresh or login attempt.
    generation: u64,
    last_error: Option<CredentialsError>,
}

impl CacheState {
    fn outcome(&self) -> Result<AuthInfo> {
        match &self.last_error {
            Some(e) => Err(e.clone()),
            None => Ok(self.info.clone()),
        }
    }
}

impl TokenCache {
    pub fn new(info: AuthInfo, inner: Arc<dyn Authenticator>) -> Self {
        Self {
            state: Mutex::new(CacheState {
                info,
                ..CacheState::default()
            }),
            refresh_in_progress: Mutex::new(()),
            inner,
        }
    }

    pub async fn info(&self) -> AuthInfo {
        self.state.lock().await.info.clone()
    }

    pub async fn clear_user(&self) {
        let mut state = self.state.lock().await;
        state.info.user_id = None;
    }

    /// Refreshes the token that failed with `stale`.
    pub async fn refresh(&self, stale: Option<&str>) -> Result<AuthInfo> {
        let generation = {
            let state = self.state.lock().await;
            if state.info.token.is_some() && state.info.access_token() != stale {
                // Some other request already replaced the token.
                return Ok(state.info.clone());
            }
            state.generation
        };

        let _guard = self.refresh_in_progress.lock().await;
        let current = {
            let state = self.state.lock().await;
            if state.generation != generation {
                return state.outcome();
            }
            state.info.clone()
        };

        tracing::info!("refreshing access token");
        let result = self.inner.refresh(&current).await;
        let mut state = self.state.lock().await;
        state.generation += 1;
        match result {
            Ok(mut info) => {
                if info.user_id.is_none() {
                    info.user_id = current.user_id;
                }
                state.info = info;
                state.last_error = None;
            }
            Err(e) => {
                tracing::warn!("cannot refresh access token: {e}");
                state.last_error = Some(e);
            }
        }
        state.outcome()
    }

    /// Runs the full login flow.
    pub async fn authenticate(&self) -> Result<AuthInfo> {
        let generation = self.state.lock().await.generation;
        let _guard = self.refresh_in_progress.lock().await;
        {
            let state = self.state.lock().await;
            if state.generation != generation && state.info.user_id.is_some() {
                return state.outcome();
            }
        }

        tracing::info!("re-authenticating session");
        let result = self.inner.authenticate().await;
        let mut state = self.state.lock().await;
        state.generation += 1;
        match result {
            Ok(info) => {
                state.info = info;
                state.last_error = None;
            }
            Err(e) => {
                tracing::warn!("cannot authenticate: {e}");
                state.last_error = Some(e);
            }
        }
        state.outcome()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;
    use crate::token::tests::MockAuthenticator;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn initial() -> AuthInfo {
        AuthInfo::new(
            Token::bearer("initial-token").with_refresh_token("r1"),
            "user-1",
        )
    }

    #[tokio::test]
    async fn refresh_success() -> anyhow::Result<()> {
        let mut mock = MockAuthenticator::new();
        mock.expect_refresh()
            .times(1)
            .withf(|c| c.access_token() == Some("initial-token"))
            .returning(|_| Ok(AuthInfo::from_token(Token::bearer("fresh-token"))));

        let cache = TokenCache::new(initial(), Arc::new(mock));
        let got = cache.refresh(Some("initial-token")).await?;
        assert_eq!(got.access_token(), Some("fresh-token"));
        // The user survives a refresh that does not report it.
        assert_eq!(got.user_id.as_deref(), Some("user-1"));
        assert_eq!(cache.info().await, got);
        Ok(())
    }

    #[tokio::test]
    async fn refresh_already_replaced() -> anyhow::Result<()> {
        let mut mock = MockAuthenticator::new();
        mock.expect_refresh().never();

        let cache = TokenCache::new(initial(), Arc::new(mock));
        let got = cache.refresh(Some("older-token")).await?;
        assert_eq!(got.access_token(), Some("initial-token"));
        Ok(())
    }

    #[tokio::test]
    async fn refresh_failure() {
        let mut mock = MockAuthenticator::new();
        mock.expect_refresh().times(2).returning(|_| {
            Err(crate::errors::from_oauth_error(
                "invalid_grant",
                Some("Refresh token has expired"),
            ))
        });

        let cache = TokenCache::new(initial(), Arc::new(mock));
        let got = cache.refresh(Some("initial-token")).await;
        assert!(matches!(&got, Err(e) if e.is_fatal()), "{got:?}");
        // A later attempt, not waiting on the first one, tries again.
        let got = cache.refresh(Some("initial-token")).await;
        assert!(got.is_err(), "{got:?}");
    }

    #[tokio::test]
    async fn clear_user_and_authenticate() -> anyhow::Result<()> {
        let mut mock = MockAuthenticator::new();
        mock.expect_authenticate()
            .times(1)
            .returning(|| Ok(AuthInfo::new(Token::bearer("login-token"), "user-2")));

        let cache = TokenCache::new(initial(), Arc::new(mock));
        cache.clear_user().await;
        assert_eq!(cache.info().await.user_id, None);
        let got = cache.authenticate().await?;
        assert_eq!(got.user_id.as_deref(), Some("user-2"));
        assert_eq!(got.access_token(), Some("login-token"));
        Ok(())
    }

    #[tokio::test]
    async fn authenticate_without_user() -> anyhow::Result<()> {
        let mut mock = MockAuthenticator::new();
        mock.expect_authenticate()
            .times(1)
            .returning(|| Ok(AuthInfo::default()));

        let cache = TokenCache::new(initial(), Arc::new(mock));
        cache.clear_user().await;
        let got = cache.authenticate().await?;
        assert_eq!(got.user_id, None);
        Ok(())
    }

    #[derive(Debug)]
    struct FakeAuthenticator {
        result: Result<AuthInfo>,
        calls: AtomicUsize,
    }

    impl FakeAuthenticator {
        fn new(result: Result<AuthInfo>) -> Self {
            Self {
                result,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl Authenticator for FakeAuthenticator {
        async fn refresh(&self, _current: &AuthInfo) -> Result<AuthInfo> {
            // Give the waiters enough time to pile up.
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }

        async fn authenticate(&self) -> Result<AuthInfo> {
            unimplemented!()
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn thundering_herd_success() -> anyhow::Result<()> {
        let fake = Arc::new(FakeAuthenticator::new(Ok(AuthInfo::from_token(
            Token::bearer("fresh-token"),
        ))));
        let cache = Arc::new(TokenCache::new(initial(), fake.clone()));

        let tasks = (0..100)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.refresh(Some("initial-token")).await })
            })
            .collect::<Vec<_>>();
        for task in tasks {
            let got = task.await??;
            assert_eq!(got.access_token(), Some("fresh-token"));
        }
        assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn thundering_herd_failure_shares_error() -> anyhow::Result<()> {
        let fake = Arc::new(FakeAuthenticator::new(Err(
            crate::errors::from_oauth_error("temporarily_unavailable", Some("epic fail")),
        )));
        let cache = Arc::new(TokenCache::new(initial(), fake.clone()));

        let barrier = Arc::new(tokio::sync::Barrier::new(100));
        let tasks = (0..100)
            .map(|_| {
                let cache = cache.clone();
                let barrier = barrier.clone();
                tokio::spawn(async move {
                    barrier.wait().await;
                    cache.refresh(Some("initial-token")).await
                })
            })
            .collect::<Vec<_>>();
        for task in tasks {
            let got = task.await?;
            let e = got.expect_err("refresh should fail");
            assert!(format!("{e}").contains("epic fail"), "{e}");
            assert!(e.is_retryable(), "{e}");
        }
        // Waiters that observed an earlier generation share the outcome. The
        // expectation is loose to avoid races with task startup.
        let calls = fake.calls.load(Ordering::SeqCst);
        assert!(calls < 100, "{calls}");
        Ok(())
    }
}
