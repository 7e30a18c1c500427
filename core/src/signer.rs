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

use crate::{Context, ProvideCredential, Result, SignRequest, SigningCredential};
use http::StatusCode;
use log::debug;
use std::sync::{Arc, Mutex};

/// Signer is the main struct used to sign the request.
///
/// The credential is loaded lazily on first use and reused until it's no
/// longer valid. Finding no credential is remembered too: the signer then
/// leaves requests unauthenticated without asking the provider again.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    loader: Arc<dyn ProvideCredential<Credential = K>>,
    builder: Arc<dyn SignRequest<Credential = K>>,
    /// `None` until the provider has been asked.
    credential: Arc<Mutex<Option<Option<K>>>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        loader: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,
            loader: Arc::new(loader),
            builder: Arc::new(builder),
            credential: Arc::new(Mutex::new(None)),
        }
    }

    /// Get the context used by this signer.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Sign the request with the payload that will be sent along with it.
    pub async fn sign(&self, req: &mut http::request::Parts, body: &[u8]) -> Result<()> {
        let credential = self.credential().await?;

        self.builder
            .sign_request(&self.ctx, req, body, credential.as_ref())
            .await
    }

    /// Report the status returned by the protected API for a signed request.
    ///
    /// Call this after every response so signers can drop derived state the
    /// server rejected.
    pub async fn on_response_status(&self, status: StatusCode) -> Result<()> {
        let credential = self.credential.lock().expect("lock poisoned").clone().flatten();

        self.builder
            .handle_response_status(&self.ctx, status, credential.as_ref())
            .await
    }

    async fn credential(&self) -> Result<Option<K>> {
        let cached = self.credential.lock().expect("lock poisoned").clone();
        match cached {
            Some(None) => return Ok(None),
            Some(Some(cred)) if cred.is_valid() => return Ok(Some(cred)),
            _ => {}
        }

        let credential = self.loader.provide_credential(&self.ctx).await?;
        if credential.is_none() {
            debug!("no credential found, requests will be sent unauthenticated");
        }
        *self.credential.lock().expect("lock poisoned") = Some(credential.clone());
        Ok(credential)
    }
}
