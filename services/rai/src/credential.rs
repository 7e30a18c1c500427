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

use ed25519_dalek::{SigningKey, SECRET_KEY_LENGTH};
use raisign_core::hash::base64_decode;
use raisign_core::utils::Redact;
use raisign_core::{Error, Result, SigningCredential};
use std::fmt::{Debug, Formatter};

/// Credential used to authenticate RAI requests.
///
/// The variant decides how every request is authenticated: access keys sign
/// each request, client credentials are exchanged for a bearer token.
#[derive(Clone, Debug)]
pub enum Credential {
    /// Access key id with an Ed25519 private key seed.
    AccessKey(AccessKeyCredential),
    /// OAuth client id and secret.
    ClientCredentials(ClientCredential),
}

impl Credential {
    /// Build an access key credential from the key id and the base64 seed.
    pub fn access_key(access_key_id: &str, private_key: &str) -> Self {
        Credential::AccessKey(AccessKeyCredential {
            access_key_id: access_key_id.to_string(),
            private_key: private_key.to_string(),
        })
    }

    /// Build a client credential from the client id and secret.
    pub fn client_credentials(client_id: &str, client_secret: &str) -> Self {
        Credential::ClientCredentials(ClientCredential {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        })
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        match self {
            Credential::AccessKey(c) => !c.access_key_id.is_empty() && !c.private_key.is_empty(),
            Credential::ClientCredentials(c) => {
                !c.client_id.is_empty() && !c.client_secret.is_empty()
            }
        }
    }
}

/// Access key id and base64 encoded Ed25519 seed.
#[derive(Clone)]
pub struct AccessKeyCredential {
    /// Access key id, sent in the clear in the `Credential=` field.
    pub access_key_id: String,
    /// Base64 encoded 32 bytes Ed25519 seed.
    pub private_key: String,
}

impl AccessKeyCredential {
    /// Decode the seed into an Ed25519 signing key.
    pub fn signing_key(&self) -> Result<SigningKey> {
        let seed = base64_decode(&self.private_key).map_err(|e| {
            Error::invalid_private_key_encoding("private key is not valid base64").with_source(e)
        })?;
        let seed: [u8; SECRET_KEY_LENGTH] = seed.as_slice().try_into().map_err(|_| {
            Error::invalid_private_key_encoding(format!(
                "private key seed must be {SECRET_KEY_LENGTH} bytes, got {}",
                seed.len()
            ))
        })?;

        Ok(SigningKey::from_bytes(&seed))
    }
}

impl Debug for AccessKeyCredential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessKeyCredential")
            .field("access_key_id", &self.access_key_id)
            .field("private_key", &Redact::from(&self.private_key))
            .finish()
    }
}

/// OAuth client id and secret.
#[derive(Clone)]
pub struct ClientCredential {
    /// Client id, also part of the token cache key.
    pub client_id: String,
    /// Client secret.
    pub client_secret: String,
}

impl Debug for ClientCredential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredential")
            .field("client_id", &self.client_id)
            .field("client_secret", &Redact::from(&self.client_secret))
            .finish()
    }
}
