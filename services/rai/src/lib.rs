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

//! RAI request authentication.
//!
//! Requests to the RAI API are authenticated with one of two credentials:
//!
//! - an access key: every request is signed with `RAI01-ED25519-SHA256`,
//! - client credentials: exchanged for a bearer token, cached per client id
//!   and host until it expires or the server rejects it.
//!
//! ## Example
//!
//! ```no_run
//! use raisign_core::{Context, OsEnv, Signer};
//! use raisign_rai::{Authenticator, DefaultCredentialProvider, TokenCache};
//! use std::sync::Arc;
//!
//! # async fn example() -> raisign_core::Result<()> {
//! let ctx = Context::new().with_env(OsEnv);
//! let tokens = Arc::new(TokenCache::new());
//! let signer = Signer::new(
//!     ctx,
//!     DefaultCredentialProvider::new(),
//!     Authenticator::new(tokens, "azure.relationalai.com"),
//! );
//!
//! let (mut parts, body) = http::Request::post("https://azure.relationalai.com/transactions")
//!     .header(http::header::CONTENT_TYPE, "application/json")
//!     .body(b"{}".to_vec())?
//!     .into_parts();
//! signer.sign(&mut parts, &body).await?;
//!
//! // Send the request, then report how the server answered.
//! signer.on_response_status(http::StatusCode::OK).await?;
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::{DEFAULT_HOST, DEFAULT_SERVICE};

mod authenticator;
pub use authenticator::Authenticator;

mod config;
pub use config::Config;

mod credential;
pub use credential::{AccessKeyCredential, ClientCredential, Credential};

mod endpoint;
pub use endpoint::derive_auth_endpoint;

mod provide_credential;
pub use provide_credential::*;

mod region;
pub use region::Region;

mod sign_request;
pub use sign_request::RequestSigner;

mod token;
pub use token::{audience, cache_key, CachedToken, TokenCache};
