//! Per-audience bearer token cache.

use crate::auth::endpoint::TokenEndpoint;
use crate::auth::error::AuthError;
use crate::clock::Clock;
use crate::types::audience::Audience;
use chrono::{DateTime, TimeDelta, Utc};
use log::debug;
use std::sync::Arc;
use tokio::sync::Mutex;

/// How long a freshly minted token is trusted. The provider issues tokens valid for
/// about an hour; we refresh well before that.
pub const DEFAULT_TOKEN_LIFETIME: TimeDelta = TimeDelta::minutes(45);

/// A cached bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub expires_at: DateTime<Utc>,
    pub audience: Audience,
}

impl Token {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Default)]
struct TokenCache {
    observations: Option<Token>,
    conditions: Option<Token>,
}

impl TokenCache {
    fn slot(&mut self, audience: Audience) -> &mut Option<Token> {
        match audience {
            Audience::Observations => &mut self.observations,
            Audience::Conditions => &mut self.conditions,
        }
    }
}

/// Obtains and caches one bearer token per [`Audience`].
///
/// A cached token is handed out only while `now < expires_at`; the first call at or
/// after expiry mints a new one. Failures are not cached and not retried; the next call
/// simply tries again.
///
/// The cache lock is held across the token request, so concurrent callers for the
/// same audience share a single request instead of racing.
pub struct TokenProvider {
    endpoint: Arc<dyn TokenEndpoint>,
    clock: Arc<dyn Clock>,
    lifetime: TimeDelta,
    cache: Mutex<TokenCache>,
}

impl TokenProvider {
    pub fn new(endpoint: Arc<dyn TokenEndpoint>, clock: Arc<dyn Clock>) -> Self {
        Self::with_lifetime(endpoint, clock, DEFAULT_TOKEN_LIFETIME)
    }

    pub fn with_lifetime(
        endpoint: Arc<dyn TokenEndpoint>,
        clock: Arc<dyn Clock>,
        lifetime: TimeDelta,
    ) -> Self {
        Self {
            endpoint,
            clock,
            lifetime,
            cache: Mutex::new(TokenCache::default()),
        }
    }

    /// Returns a valid bearer token for `audience`, requesting one if needed.
    pub async fn token(&self, audience: Audience) -> Result<String, AuthError> {
        let mut cache = self.cache.lock().await;
        let slot = cache.slot(audience);

        if let Some(token) = slot.as_ref() {
            if token.is_valid_at(self.clock.now()) {
                debug!("Reusing cached {} token", audience);
                return Ok(token.value.clone());
            }
            debug!("Cached {} token expired at {}", audience, token.expires_at);
        }

        let value = self.endpoint.authorize(audience).await?;
        let token = Token {
            value: value.clone(),
            expires_at: self.clock.now() + self.lifetime,
            audience,
        };
        *slot = Some(token);
        Ok(value)
    }

    /// Snapshot of the cached token for `audience`, valid or not.
    pub async fn cached(&self, audience: Audience) -> Option<Token> {
        self.cache.lock().await.slot(audience).clone()
    }

    /// Drops both cached tokens.
    pub async fn invalidate(&self) {
        *self.cache.lock().await = TokenCache::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingEndpoint {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingEndpoint {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TokenEndpoint for CountingEndpoint {
        async fn authorize(&self, audience: Audience) -> Result<String, AuthError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(AuthError::MissingAccessToken(audience));
            }
            Ok(format!("{}-{}", audience, n))
        }
    }

    fn setup() -> (Arc<CountingEndpoint>, Arc<FixedClock>, TokenProvider) {
        let endpoint = Arc::new(CountingEndpoint::new());
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        ));
        let provider = TokenProvider::new(endpoint.clone(), clock.clone());
        (endpoint, clock, provider)
    }

    #[tokio::test]
    async fn test_token_reused_until_expiry() -> Result<(), AuthError> {
        let (endpoint, clock, provider) = setup();

        let first = provider.token(Audience::Observations).await?;
        clock.advance(TimeDelta::minutes(44));
        let second = provider.token(Audience::Observations).await?;

        assert_eq!(first, "observations-1");
        assert_eq!(first, second);
        assert_eq!(endpoint.calls(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_exactly_one_refresh_at_expiry() -> Result<(), AuthError> {
        let (endpoint, clock, provider) = setup();

        provider.token(Audience::Observations).await?;
        let expires_at = provider.cached(Audience::Observations).await.unwrap().expires_at;

        clock.set(expires_at);
        let refreshed = provider.token(Audience::Observations).await?;
        let again = provider.token(Audience::Observations).await?;

        assert_eq!(refreshed, "observations-2");
        assert_eq!(again, refreshed);
        assert_eq!(endpoint.calls(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_audiences_are_cached_separately() -> Result<(), AuthError> {
        let (endpoint, _clock, provider) = setup();

        let obs = provider.token(Audience::Observations).await?;
        let cond = provider.token(Audience::Conditions).await?;
        provider.token(Audience::Conditions).await?;

        assert_ne!(obs, cond);
        assert_eq!(endpoint.calls(), 2);
        let cached = provider.cached(Audience::Conditions).await.unwrap();
        assert_eq!(cached.audience, Audience::Conditions);
        assert_eq!(
            cached.expires_at,
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 45, 0).unwrap()
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let endpoint = Arc::new(CountingEndpoint {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let provider = TokenProvider::new(endpoint.clone(), clock);

        assert!(provider.token(Audience::Conditions).await.is_err());
        assert!(provider.token(Audience::Conditions).await.is_err());
        assert!(provider.cached(Audience::Conditions).await.is_none());
        assert_eq!(endpoint.calls(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_new_request() -> Result<(), AuthError> {
        let (endpoint, _clock, provider) = setup();
        provider.token(Audience::Observations).await?;
        provider.invalidate().await;
        provider.token(Audience::Observations).await?;
        assert_eq!(endpoint.calls(), 2);
        Ok(())
    }
}
