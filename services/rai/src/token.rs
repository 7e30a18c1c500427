// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::constants::CLIENT_CREDENTIALS_GRANT;
use crate::{derive_auth_endpoint, ClientCredential};
use bytes::Bytes;
use chrono::TimeDelta;
use http::header::{ACCEPT, CONTENT_TYPE};
use log::{debug, warn};
use raisign_core::time::{now, DateTime};
use raisign_core::utils::Redact;
use raisign_core::{Context, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex, RwLock};

/// A bearer token together with the moment it was acquired.
#[derive(Clone)]
pub struct CachedToken {
    token: String,
    expires_in: i64,
    acquired_at: DateTime,
}

impl CachedToken {
    /// Create a token valid for `expires_in` seconds after `acquired_at`.
    pub fn new(token: &str, expires_in: i64, acquired_at: DateTime) -> Self {
        Self {
            token: token.to_string(),
            expires_in,
            acquired_at,
        }
    }

    /// The bearer token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Lifetime in seconds, as returned by the token endpoint.
    pub fn expires_in(&self) -> i64 {
        self.expires_in
    }

    /// When the token was stored.
    pub fn acquired_at(&self) -> DateTime {
        self.acquired_at
    }

    /// A token is expired once `expires_in` seconds have fully elapsed.
    ///
    /// Lifetimes too large for a `TimeDelta` never expire.
    pub fn is_expired_at(&self, now: DateTime) -> bool {
        TimeDelta::try_seconds(self.expires_in)
            .is_some_and(|lifetime| now - self.acquired_at >= lifetime)
    }

    /// Check expiry against the current time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now())
    }
}

impl Debug for CachedToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedToken")
            .field("token", &Redact::from(&self.token))
            .field("expires_in", &self.expires_in)
            .field("acquired_at", &self.acquired_at)
            .finish()
    }
}

/// Key of a cached token: `<client_id>:<host>`.
pub fn cache_key(client_id: &str, host: &str) -> String {
    format!("{client_id}:{host}")
}

/// Audience sent in the token exchange for the given host.
pub fn audience(host: &str) -> String {
    if host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

/// TokenCache holds bearer tokens obtained through the client credentials
/// grant, keyed by client id and host.
///
/// Share one cache across connections with `Arc`. Lookups of a valid token
/// only take the read lock. On a miss, one exchange runs per key; concurrent
/// callers for the same key wait for it and reuse its result.
#[derive(Default)]
pub struct TokenCache {
    tokens: RwLock<HashMap<String, CachedToken>>,
    inflight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl Debug for TokenCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("tokens", &self.tokens.read().expect("lock poisoned").len())
            .finish()
    }
}

impl TokenCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a valid bearer token for the credential and host.
    ///
    /// Returns the cached token when it's still valid, otherwise exchanges the
    /// client credentials at the endpoint derived from `host`. Failed
    /// exchanges are reported as `AuthExchangeFailed` and leave the cache
    /// untouched.
    pub async fn get_token(
        &self,
        ctx: &Context,
        credential: &ClientCredential,
        host: &str,
    ) -> Result<String> {
        let key = cache_key(&credential.client_id, host);
        if let Some(token) = self.lookup(&key, now()) {
            debug!("bearer token cache hit for {key}");
            return Ok(token);
        }

        let guard = self.flow_guard(&key);
        let result = {
            let _singleflight = guard.lock().await;

            // Another caller may have stored a token while we were waiting.
            match self.lookup(&key, now()) {
                Some(token) => {
                    debug!("bearer token stored by concurrent exchange for {key}");
                    Ok(token)
                }
                None => self.refresh(ctx, credential, host, &key).await,
            }
        };
        self.release_flow_guard(&key, guard);

        result
    }

    /// Drop the cached token for the credential and host.
    ///
    /// Does nothing if no token is cached.
    pub fn invalidate(&self, credential: &ClientCredential, host: &str) {
        let key = cache_key(&credential.client_id, host);
        if self
            .tokens
            .write()
            .expect("lock poisoned")
            .remove(&key)
            .is_some()
        {
            debug!("invalidated bearer token for {key}");
        }
    }

    /// Get the cached entry for the credential and host, expired or not.
    pub fn get(&self, credential: &ClientCredential, host: &str) -> Option<CachedToken> {
        let key = cache_key(&credential.client_id, host);
        self.tokens
            .read()
            .expect("lock poisoned")
            .get(&key)
            .cloned()
    }

    /// Store a token, replacing any previous entry for the same key.
    pub fn insert(&self, credential: &ClientCredential, host: &str, token: CachedToken) {
        let key = cache_key(&credential.client_id, host);
        self.tokens
            .write()
            .expect("lock poisoned")
            .insert(key, token);
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.tokens.read().expect("lock poisoned").len()
    }

    /// Check if the cache holds no entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the valid token for `key`, evicting it if it expired.
    fn lookup(&self, key: &str, now: DateTime) -> Option<String> {
        {
            let tokens = self.tokens.read().expect("lock poisoned");
            match tokens.get(key) {
                None => return None,
                Some(token) if !token.is_expired_at(now) => return Some(token.token.clone()),
                Some(_) => {}
            }
        }

        let mut tokens = self.tokens.write().expect("lock poisoned");
        if tokens.get(key).is_some_and(|t| t.is_expired_at(now)) {
            tokens.remove(key);
            debug!("evicted expired bearer token for {key}");
        }
        None
    }

    async fn refresh(
        &self,
        ctx: &Context,
        credential: &ClientCredential,
        host: &str,
        key: &str,
    ) -> Result<String> {
        let token = exchange_client_credentials(ctx, credential, host)
            .await
            .inspect_err(|e| warn!("bearer token exchange for {key} failed: {e}"))?;

        let value = token.token.clone();
        self.tokens
            .write()
            .expect("lock poisoned")
            .insert(key.to_string(), token);
        Ok(value)
    }

    fn flow_guard(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.inflight
            .lock()
            .expect("lock poisoned")
            .entry(key.to_string())
            .or_default()
            .clone()
    }

    fn release_flow_guard(&self, key: &str, guard: Arc<tokio::sync::Mutex<()>>) {
        let mut inflight = self.inflight.lock().expect("lock poisoned");
        drop(guard);
        // Only the map holds the guard: nobody else is waiting.
        if inflight.get(key).is_some_and(|g| Arc::strong_count(g) == 1) {
            inflight.remove(key);
        }
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    audience: &'a str,
    grant_type: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: ExpiresIn,
}

/// `expires_in` is sent as a number by most servers, as a string by some.
#[derive(Deserialize)]
#[serde(untagged)]
enum ExpiresIn {
    Seconds(i64),
    Text(String),
}

impl ExpiresIn {
    fn seconds(&self) -> Result<i64> {
        let seconds = match self {
            ExpiresIn::Seconds(v) => *v,
            ExpiresIn::Text(v) => v.trim().parse().map_err(|e| {
                Error::auth_exchange_failed(format!("invalid expires_in in token response: {v}"))
                    .with_source(e)
            })?,
        };

        if seconds < 0 || TimeDelta::try_seconds(seconds).is_none() {
            return Err(Error::auth_exchange_failed(format!(
                "expires_in out of range in token response: {seconds}"
            )));
        }
        Ok(seconds)
    }
}

/// Exchange client credentials for a bearer token.
async fn exchange_client_credentials(
    ctx: &Context,
    credential: &ClientCredential,
    host: &str,
) -> Result<CachedToken> {
    let endpoint = derive_auth_endpoint(host);
    let audience = audience(host);
    debug!(
        "exchanging client credentials of {} at {endpoint}",
        credential.client_id
    );

    let body = serde_json::to_vec(&TokenRequest {
        client_id: &credential.client_id,
        client_secret: &credential.client_secret,
        audience: &audience,
        grant_type: CLIENT_CREDENTIALS_GRANT,
    })?;
    let req = http::Request::post(&endpoint)
        .header(CONTENT_TYPE, "application/json")
        .header(ACCEPT, "application/json")
        .body(Bytes::from(body))
        .map_err(|e| Error::auth_exchange_failed("failed to build token request").with_source(e))?;

    let resp = ctx.http_send(req).await.map_err(|e| {
        Error::auth_exchange_failed(format!("failed to send token request to {endpoint}"))
            .with_source(e)
    })?;

    if !resp.status().is_success() {
        return Err(Error::auth_exchange_failed(format!(
            "token request to {endpoint} failed with status {}: {}",
            resp.status(),
            String::from_utf8_lossy(resp.body())
        )));
    }

    let token: TokenResponse = serde_json::from_slice(resp.body()).map_err(|e| {
        Error::auth_exchange_failed("failed to parse token response").with_source(e)
    })?;
    if token.access_token.is_empty() {
        return Err(Error::auth_exchange_failed(
            "token response has an empty access_token",
        ));
    }

    Ok(CachedToken::new(
        &token.access_token,
        token.expires_in.seconds()?,
        now(),
    ))
}
