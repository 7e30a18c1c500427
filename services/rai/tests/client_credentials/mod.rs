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

use crate::{init_logger, MockTokenEndpoint};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::request::Parts;
use http::StatusCode;
use pretty_assertions::assert_eq;
use raisign_core::{Context, ErrorKind, Signer, StaticEnv};
use raisign_rai::{
    Authenticator, ClientCredential, DefaultCredentialProvider, StaticCredentialProvider,
    TokenCache,
};
use std::collections::HashMap;
use std::sync::Arc;

const HOST: &str = "azure.relationalai.com";

fn request() -> Parts {
    http::Request::post("https://azure.relationalai.com/transactions")
        .header(CONTENT_TYPE, "application/json")
        .body(())
        .unwrap()
        .into_parts()
        .0
}

fn signer(
    endpoint: &MockTokenEndpoint,
    tokens: Arc<TokenCache>,
) -> Signer<raisign_rai::Credential> {
    Signer::new(
        Context::new().with_http_send(endpoint.clone()),
        StaticCredentialProvider::client_credentials("client", "secret"),
        Authenticator::new(tokens, HOST),
    )
}

#[tokio::test]
async fn test_token_is_reused_until_rejected() {
    init_logger();

    let endpoint = MockTokenEndpoint::new(&[
        (StatusCode::OK, r#"{"access_token":"first","expires_in":3600}"#),
        (StatusCode::OK, r#"{"access_token":"second","expires_in":3600}"#),
    ]);
    let tokens = Arc::new(TokenCache::new());
    let signer = signer(&endpoint, tokens.clone());

    let mut req = request();
    signer.sign(&mut req, b"{}").await.unwrap();
    assert_eq!(req.headers[AUTHORIZATION], "Bearer first");

    let mut req = request();
    signer.sign(&mut req, b"{}").await.unwrap();
    assert_eq!(req.headers[AUTHORIZATION], "Bearer first");
    assert_eq!(endpoint.calls(), 1);

    // A successful response keeps the token.
    signer.on_response_status(StatusCode::OK).await.unwrap();
    assert_eq!(tokens.len(), 1);

    signer
        .on_response_status(StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
    assert!(tokens.is_empty());

    let mut req = request();
    signer.sign(&mut req, b"{}").await.unwrap();
    assert_eq!(req.headers[AUTHORIZATION], "Bearer second");
    assert_eq!(endpoint.calls(), 2);
}

#[tokio::test]
async fn test_token_is_shared_across_signers() {
    let endpoint = MockTokenEndpoint::new(&[(
        StatusCode::OK,
        r#"{"access_token":"shared","expires_in":"3600"}"#,
    )]);
    let tokens = Arc::new(TokenCache::new());

    for _ in 0..3 {
        let mut req = request();
        signer(&endpoint, tokens.clone())
            .sign(&mut req, b"{}")
            .await
            .unwrap();
        assert_eq!(req.headers[AUTHORIZATION], "Bearer shared");
    }

    assert_eq!(endpoint.calls(), 1);
    assert!(tokens
        .get(
            &ClientCredential {
                client_id: "client".to_string(),
                client_secret: "secret".to_string(),
            },
            HOST
        )
        .is_some());
}

#[tokio::test]
async fn test_rejected_exchange_is_reported() {
    init_logger();

    let endpoint = MockTokenEndpoint::new(&[
        (StatusCode::UNAUTHORIZED, r#"{"error":"access_denied"}"#),
        (StatusCode::OK, r#"{"access_token":"late","expires_in":3600}"#),
    ]);
    let tokens = Arc::new(TokenCache::new());
    let signer = signer(&endpoint, tokens.clone());

    let mut req = request();
    let err = signer.sign(&mut req, b"{}").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthExchangeFailed);
    assert!(req.headers.get(AUTHORIZATION).is_none());
    assert!(tokens.is_empty());

    let mut req = request();
    signer.sign(&mut req, b"{}").await.unwrap();
    assert_eq!(req.headers[AUTHORIZATION], "Bearer late");
}

#[tokio::test]
async fn test_client_credentials_from_env() {
    let endpoint = MockTokenEndpoint::new(&[(
        StatusCode::OK,
        r#"{"access_token":"from-env","expires_in":60}"#,
    )]);
    let ctx = Context::new()
        .with_http_send(endpoint.clone())
        .with_env(StaticEnv {
            home_dir: None,
            envs: HashMap::from_iter([
                ("RAI_CLIENT_ID".to_string(), "env-client".to_string()),
                ("RAI_CLIENT_SECRET".to_string(), "env-secret".to_string()),
            ]),
        });
    let signer = Signer::new(
        ctx,
        DefaultCredentialProvider::new(),
        Authenticator::new(Arc::new(TokenCache::new()), HOST),
    );

    let mut req = request();
    signer.sign(&mut req, b"{}").await.unwrap();
    assert_eq!(req.headers[AUTHORIZATION], "Bearer from-env");
}
