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

use crate::{Credential, Region, RequestSigner, TokenCache};
use async_trait::async_trait;
use http::request::Parts;
use http::{header, HeaderValue, StatusCode};
use log::debug;
use raisign_core::{Context, Error, Result, SignRequest};
use std::sync::Arc;

/// Authenticator attaches the right `Authorization` header for a credential.
///
/// - Access keys sign the request with [`RequestSigner`].
/// - Client credentials fetch a bearer token from the shared [`TokenCache`].
///
/// It holds no mutable state of its own: the token cache is shared and
/// outlives the authenticator.
#[derive(Debug, Clone)]
pub struct Authenticator {
    host: String,
    signer: RequestSigner,
    tokens: Arc<TokenCache>,
}

impl Authenticator {
    /// Create an authenticator for `host` sharing the given token cache.
    pub fn new(tokens: Arc<TokenCache>, host: &str) -> Self {
        Self {
            host: host.to_string(),
            signer: RequestSigner::default(),
            tokens,
        }
    }

    /// Replace the request signer used for access keys.
    pub fn with_signer(mut self, signer: RequestSigner) -> Self {
        self.signer = signer;
        self
    }

    /// Set the service used in the signature scope.
    pub fn with_service(mut self, service: &str) -> Self {
        self.signer = self.signer.with_service(service);
        self
    }

    /// Set the region used in the signature scope.
    pub fn with_region(mut self, region: Region) -> Self {
        self.signer = self.signer.with_region(region);
        self
    }

    /// Host used as the token audience and cache key.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Token cache shared by this authenticator.
    pub fn token_cache(&self) -> &Arc<TokenCache> {
        &self.tokens
    }
}

#[async_trait]
impl SignRequest for Authenticator {
    type Credential = Credential;

    async fn sign_request(
        &self,
        ctx: &Context,
        req: &mut Parts,
        body: &[u8],
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        match credential {
            None => Ok(()),
            Some(Credential::AccessKey(cred)) => self.signer.sign(req, body, Some(cred)),
            Some(Credential::ClientCredentials(cred)) => {
                let token = self.tokens.get_token(ctx, cred, &self.host).await?;

                let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                    Error::auth_exchange_failed("bearer token is not a valid header value")
                        .with_source(e)
                })?;
                value.set_sensitive(true);
                req.headers.insert(header::AUTHORIZATION, value);
                Ok(())
            }
        }
    }

    async fn handle_response_status(
        &self,
        _: &Context,
        status: StatusCode,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(Credential::ClientCredentials(cred)) = credential else {
            return Ok(());
        };

        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            debug!("request rejected with {status}, dropping cached bearer token");
            self.tokens.invalidate(cred, &self.host);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CachedToken;
    use pretty_assertions::assert_eq;
    use raisign_core::time::now;

    fn parts() -> Parts {
        http::Request::post("https://azure.relationalai.com/transactions")
            .header(header::CONTENT_TYPE, "application/json")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    fn authenticator_with_token() -> (Authenticator, Credential) {
        let cred = Credential::client_credentials("client-id", "client-secret");
        let Credential::ClientCredentials(client) = &cred else {
            unreachable!()
        };

        let tokens = Arc::new(TokenCache::new());
        tokens.insert(
            client,
            "azure.relationalai.com",
            CachedToken::new("cached-token", 3600, now()),
        );
        (Authenticator::new(tokens, "azure.relationalai.com"), cred)
    }

    #[tokio::test]
    async fn test_no_credential_is_noop() {
        let auth = Authenticator::new(Arc::new(TokenCache::new()), "azure.relationalai.com");
        let mut parts = parts();
        let before = parts.headers.clone();

        auth.sign_request(&Context::new(), &mut parts, b"{}", None)
            .await
            .unwrap();

        assert_eq!(parts.headers, before);
    }

    #[tokio::test]
    async fn test_access_key_is_signed() {
        let auth = Authenticator::new(Arc::new(TokenCache::new()), "azure.relationalai.com");
        let cred = Credential::access_key(
            "e3536f8d-cbc6-4ed8-9de6-74cf4cb724a1",
            "krnXRBoE0lX6NddvryxKIE+7RWrkWg6xk8NcGaSOdCo=",
        );
        let mut parts = parts();

        auth.sign_request(&Context::new(), &mut parts, b"{}", Some(&cred))
            .await
            .unwrap();

        let value = parts.headers[header::AUTHORIZATION].to_str().unwrap();
        assert!(value.starts_with(
            "RAI01-ED25519-SHA256 Credential=e3536f8d-cbc6-4ed8-9de6-74cf4cb724a1/"
        ));
        assert!(value.contains("/us-east/transaction/rai01_request, "));
        assert!(auth.token_cache().is_empty());
    }

    #[tokio::test]
    async fn test_client_credentials_use_bearer_token() {
        let (auth, cred) = authenticator_with_token();
        let mut parts = parts();
        parts
            .headers
            .insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer stale"));

        // Cached token: no http client is needed.
        auth.sign_request(&Context::new(), &mut parts, b"{}", Some(&cred))
            .await
            .unwrap();

        assert_eq!(parts.headers[header::AUTHORIZATION], "Bearer cached-token");
        assert!(parts.headers[header::AUTHORIZATION].is_sensitive());
        assert_eq!(parts.headers.get_all(header::AUTHORIZATION).iter().count(), 1);
    }

    #[tokio::test]
    async fn test_rejection_invalidates_token() {
        let (auth, cred) = authenticator_with_token();
        let ctx = Context::new();

        auth.handle_response_status(&ctx, StatusCode::OK, Some(&cred))
            .await
            .unwrap();
        auth.handle_response_status(&ctx, StatusCode::INTERNAL_SERVER_ERROR, Some(&cred))
            .await
            .unwrap();
        assert_eq!(auth.token_cache().len(), 1);

        auth.handle_response_status(&ctx, StatusCode::UNAUTHORIZED, Some(&cred))
            .await
            .unwrap();
        assert!(auth.token_cache().is_empty());

        // Nothing left to drop.
        auth.handle_response_status(&ctx, StatusCode::BAD_REQUEST, Some(&cred))
            .await
            .unwrap();
    }
}
