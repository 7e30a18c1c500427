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

use crate::provide_credential::{ConfigCredentialProvider, EnvCredentialProvider};
use crate::{Config, Credential};
use async_trait::async_trait;
use log::debug;
use raisign_core::{Context, ProvideCredential, Result};
use std::sync::Arc;

/// DefaultCredentialProvider loads the credential from the usual places.
///
/// Resolution order:
///
/// 1. The explicit [`Config`], if any
/// 2. Environment variables
///
/// The first source that yields a credential wins. Errors are returned as is:
/// a broken source never falls through to the next one.
#[derive(Debug, Default)]
pub struct DefaultCredentialProvider {
    config: Option<ConfigCredentialProvider>,
    env: EnvCredentialProvider,
}

impl DefaultCredentialProvider {
    /// Create a new `DefaultCredentialProvider` instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Try the given config before the environment.
    pub fn with_config(mut self, cfg: Arc<Config>) -> Self {
        self.config = Some(ConfigCredentialProvider::new(cfg));
        self
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        if let Some(config) = &self.config {
            if let Some(cred) = config.provide_credential(ctx).await? {
                debug!("loaded credential from config");
                return Ok(Some(cred));
            }
        }

        let cred = self.env.provide_credential(ctx).await?;
        if cred.is_some() {
            debug!("loaded credential from environment");
        }
        Ok(cred)
    }
}
