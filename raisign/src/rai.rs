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

//! RAI service support with convenience APIs.

pub use raisign_rai::*;

#[cfg(feature = "default-context")]
use crate::{default_context, Result, Signer, DEFAULT_TIMEOUT};
#[cfg(feature = "default-context")]
use std::sync::Arc;

/// Signer for RAI requests.
pub type DefaultSigner = crate::Signer<Credential>;

/// Create a signer for `host` with the default context.
///
/// Credentials are loaded from the environment on first use. Pass the same
/// `tokens` to every signer of the process so bearer tokens are shared.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> raisign::Result<()> {
/// use raisign::rai::{default_signer, TokenCache};
/// use std::sync::Arc;
///
/// let signer = default_signer("azure.relationalai.com", Arc::new(TokenCache::new()))?;
///
/// let (mut parts, body) = http::Request::get("https://azure.relationalai.com/database")
///     .body(Vec::new())?
///     .into_parts();
/// signer.sign(&mut parts, &body).await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "default-context")]
pub fn default_signer(host: &str, tokens: Arc<TokenCache>) -> Result<DefaultSigner> {
    let ctx = default_context(DEFAULT_TIMEOUT)?;
    Ok(Signer::new(
        ctx,
        DefaultCredentialProvider::new(),
        Authenticator::new(tokens, host),
    ))
}
