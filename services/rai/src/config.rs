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

use crate::constants::*;
use crate::{AccessKeyCredential, Credential, Region};
use log::debug;
use raisign_core::utils::Redact;
use raisign_core::{Context, Error, Result};
use serde::Deserialize;
use std::fmt::{Debug, Formatter};
use std::path::Path;

/// Config for the RAI client.
///
/// Holds either an access key (`access_key_id` with `private_key` or
/// `private_key_filename`) or client credentials (`client_id` and
/// `client_secret`), never both.
#[derive(Clone, Default)]
pub struct Config {
    /// Access key id.
    pub access_key_id: Option<String>,
    /// Base64 encoded Ed25519 seed.
    pub private_key: Option<String>,
    /// JSON file holding the seed as `{"sodium": {"seed": "..."}}`.
    ///
    /// Relative paths are resolved against `~/.rai`.
    pub private_key_filename: Option<String>,
    /// OAuth client id.
    pub client_id: Option<String>,
    /// OAuth client secret.
    pub client_secret: Option<String>,
    /// API host, `azure.relationalai.com` by default.
    pub host: Option<String>,
    /// Region tag, `us-east` by default.
    pub region: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_key_id", &self.access_key_id)
            .field("private_key", &Redact::from(&self.private_key))
            .field("private_key_filename", &self.private_key_filename)
            .field("client_id", &self.client_id)
            .field("client_secret", &Redact::from(&self.client_secret))
            .field("host", &self.host)
            .field("region", &self.region)
            .finish()
    }
}

impl Config {
    /// Load config from environment variables.
    pub fn from_env(ctx: &Context) -> Self {
        Self {
            access_key_id: ctx.env_var(RAI_ACCESS_KEY),
            private_key: ctx.env_var(RAI_PRIVATE_KEY),
            private_key_filename: ctx.env_var(RAI_PRIVATE_KEY_FILENAME),
            client_id: ctx.env_var(RAI_CLIENT_ID),
            client_secret: ctx.env_var(RAI_CLIENT_SECRET),
            host: ctx.env_var(RAI_HOST),
            region: ctx.env_var(RAI_REGION),
        }
    }

    /// Fill unset fields from environment variables.
    pub fn merge_env(self, ctx: &Context) -> Self {
        let env = Self::from_env(ctx);
        Self {
            access_key_id: self.access_key_id.or(env.access_key_id),
            private_key: self.private_key.or(env.private_key),
            private_key_filename: self.private_key_filename.or(env.private_key_filename),
            client_id: self.client_id.or(env.client_id),
            client_secret: self.client_secret.or(env.client_secret),
            host: self.host.or(env.host),
            region: self.region.or(env.region),
        }
    }

    /// The configured host, or the default one.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// The configured region, or the default one.
    pub fn region(&self) -> Result<Region> {
        match &self.region {
            Some(v) => v.parse(),
            None => Ok(Region::default()),
        }
    }

    /// Check if any access key field is set.
    pub fn has_access_key(&self) -> bool {
        self.access_key_id.is_some()
            || self.private_key.is_some()
            || self.private_key_filename.is_some()
    }

    /// Check if any client credentials field is set.
    pub fn has_client_credentials(&self) -> bool {
        self.client_id.is_some() || self.client_secret.is_some()
    }

    /// Resolve the credential described by this config.
    ///
    /// - Both credential families set: `AmbiguousCredentials`.
    /// - A family with a missing field: `MissingCredentialField`.
    /// - A seed that doesn't decode to 32 bytes: `InvalidPrivateKeyEncoding`.
    /// - Nothing set: `Ok(None)`, requests go out unauthenticated.
    pub async fn resolve(&self, ctx: &Context) -> Result<Option<Credential>> {
        match (self.has_access_key(), self.has_client_credentials()) {
            (true, true) => Err(Error::ambiguous_credentials(
                "both access key and client credentials are configured",
            )),
            (true, false) => {
                let access_key_id = self.access_key_id.as_deref().ok_or_else(|| {
                    Error::missing_credential_field("access_key_id is required for access key")
                })?;
                let private_key = match (&self.private_key, &self.private_key_filename) {
                    (Some(v), _) => v.clone(),
                    (None, Some(path)) => load_private_key(ctx, path).await?,
                    (None, None) => {
                        return Err(Error::missing_credential_field(
                            "private_key or private_key_filename is required for access key",
                        ))
                    }
                };

                let cred = AccessKeyCredential {
                    access_key_id: access_key_id.to_string(),
                    private_key,
                };
                // Fail early instead of on the first request.
                cred.signing_key()?;
                Ok(Some(Credential::AccessKey(cred)))
            }
            (false, true) => {
                let client_id = self.client_id.as_deref().ok_or_else(|| {
                    Error::missing_credential_field("client_id is required for client credentials")
                })?;
                let client_secret = self.client_secret.as_deref().ok_or_else(|| {
                    Error::missing_credential_field(
                        "client_secret is required for client credentials",
                    )
                })?;
                Ok(Some(Credential::client_credentials(client_id, client_secret)))
            }
            (false, false) => Ok(None),
        }
    }
}

#[derive(Deserialize)]
struct PrivateKeyFile {
    sodium: SodiumKey,
}

#[derive(Deserialize)]
struct SodiumKey {
    seed: String,
}

async fn load_private_key(ctx: &Context, path: &str) -> Result<String> {
    let path = resolve_key_path(ctx, path)?;
    debug!("loading private key from {path}");

    let content = ctx.file_read(&path).await?;
    let file: PrivateKeyFile = serde_json::from_slice(&content).map_err(|e| {
        Error::config_invalid(format!("private key file {path} is not valid")).with_source(e)
    })?;
    Ok(file.sodium.seed)
}

fn resolve_key_path(ctx: &Context, path: &str) -> Result<String> {
    let expanded = ctx
        .expand_home_dir(path)
        .ok_or_else(|| Error::config_invalid(format!("can't expand home dir in {path}")))?;
    if Path::new(&expanded).is_absolute() {
        return Ok(expanded);
    }

    let home = ctx.home_dir().ok_or_else(|| {
        Error::config_invalid(format!("can't resolve {path}: home dir is unknown"))
    })?;
    Ok(home
        .join(RAI_CONFIG_DIR)
        .join(expanded)
        .to_string_lossy()
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use raisign_core::{ErrorKind, StaticEnv};
    use raisign_file_read_tokio::TokioFileRead;
    use std::collections::HashMap;
    use std::io::Write;
    use test_case::test_case;

    const SEED: &str = "krnXRBoE0lX6NddvryxKIE+7RWrkWg6xk8NcGaSOdCo=";

    fn ctx(envs: &[(&str, &str)]) -> Context {
        Context::new().with_file_read(TokioFileRead).with_env(StaticEnv {
            home_dir: None,
            envs: envs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        })
    }

    #[test]
    fn test_from_env() {
        let ctx = ctx(&[
            (RAI_CLIENT_ID, "client-id"),
            (RAI_CLIENT_SECRET, "client-secret"),
            (RAI_HOST, "azure-dev.relationalai.com"),
        ]);

        let cfg = Config::from_env(&ctx);
        assert_eq!(cfg.client_id.as_deref(), Some("client-id"));
        assert_eq!(cfg.client_secret.as_deref(), Some("client-secret"));
        assert_eq!(cfg.host(), "azure-dev.relationalai.com");
        assert_eq!(cfg.region().unwrap(), Region::UsEast);
        assert_eq!(cfg.access_key_id, None);
    }

    #[test]
    fn test_merge_env_keeps_explicit_values() {
        let ctx = ctx(&[(RAI_HOST, "azure-dev.relationalai.com"), (RAI_REGION, "us-east")]);

        let cfg = Config {
            host: Some("azure.relationalai.com".to_string()),
            ..Default::default()
        }
        .merge_env(&ctx);

        assert_eq!(cfg.host(), "azure.relationalai.com");
        assert_eq!(cfg.region.as_deref(), Some("us-east"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let cfg = Config {
            private_key: Some(SEED.to_string()),
            client_secret: Some("client-secret-value".to_string()),
            ..Default::default()
        };
        let output = format!("{cfg:?}");

        assert!(!output.contains(SEED));
        assert!(!output.contains("client-secret-value"));
    }

    #[tokio::test]
    async fn test_resolve_access_key() {
        let cfg = Config {
            access_key_id: Some("e3536f8d".to_string()),
            private_key: Some(SEED.to_string()),
            ..Default::default()
        };

        let cred = cfg.resolve(&ctx(&[])).await.unwrap();
        let Some(Credential::AccessKey(cred)) = cred else {
            panic!("expected access key");
        };
        assert_eq!(cred.access_key_id, "e3536f8d");
        assert_eq!(cred.private_key, SEED);
    }

    #[tokio::test]
    async fn test_resolve_client_credentials() {
        let cfg = Config {
            client_id: Some("client-id".to_string()),
            client_secret: Some("client-secret".to_string()),
            ..Default::default()
        };

        let cred = cfg.resolve(&ctx(&[])).await.unwrap();
        let Some(Credential::ClientCredentials(cred)) = cred else {
            panic!("expected client credentials");
        };
        assert_eq!(cred.client_id, "client-id");
        assert_eq!(cred.client_secret, "client-secret");
    }

    #[tokio::test]
    async fn test_resolve_nothing() {
        let cred = Config::default().resolve(&ctx(&[])).await.unwrap();
        assert!(cred.is_none());
    }

    #[test_case(Some("e3536f8d"), Some(SEED), Some("client-id"), Some("secret"), ErrorKind::AmbiguousCredentials ; "both families")]
    #[test_case(Some("e3536f8d"), None, Some("client-id"), None, ErrorKind::AmbiguousCredentials ; "access key and client id")]
    #[test_case(Some("e3536f8d"), None, None, None, ErrorKind::MissingCredentialField ; "missing private key")]
    #[test_case(None, Some(SEED), None, None, ErrorKind::MissingCredentialField ; "missing access key id")]
    #[test_case(None, None, Some("client-id"), None, ErrorKind::MissingCredentialField ; "missing client secret")]
    #[test_case(None, None, None, Some("secret"), ErrorKind::MissingCredentialField ; "missing client id")]
    #[test_case(Some("e3536f8d"), Some("not-base64!"), None, None, ErrorKind::InvalidPrivateKeyEncoding ; "bad seed")]
    #[tokio::test]
    async fn test_resolve_errors(
        access_key_id: Option<&str>,
        private_key: Option<&str>,
        client_id: Option<&str>,
        client_secret: Option<&str>,
        expected: ErrorKind,
    ) {
        let cfg = Config {
            access_key_id: access_key_id.map(String::from),
            private_key: private_key.map(String::from),
            client_id: client_id.map(String::from),
            client_secret: client_secret.map(String::from),
            ..Default::default()
        };

        let err = cfg.resolve(&ctx(&[])).await.unwrap_err();
        assert_eq!(err.kind(), expected);
    }

    #[tokio::test]
    async fn test_resolve_private_key_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"sodium": {{"seed": "{SEED}"}}}}"#).unwrap();

        let cfg = Config {
            access_key_id: Some("e3536f8d".to_string()),
            private_key_filename: Some(file.path().to_string_lossy().to_string()),
            ..Default::default()
        };

        let Some(Credential::AccessKey(cred)) = cfg.resolve(&ctx(&[])).await.unwrap() else {
            panic!("expected access key");
        };
        assert_eq!(cred.private_key, SEED);
    }

    #[tokio::test]
    async fn test_resolve_relative_private_key_file() {
        let home = tempfile::tempdir().unwrap();
        std::fs::create_dir(home.path().join(RAI_CONFIG_DIR)).unwrap();
        std::fs::write(
            home.path().join(RAI_CONFIG_DIR).join("default_privatekey.json"),
            format!(r#"{{"sodium": {{"seed": "{SEED}"}}}}"#),
        )
        .unwrap();

        let ctx = Context::new().with_file_read(TokioFileRead).with_env(StaticEnv {
            home_dir: Some(home.path().to_path_buf()),
            envs: HashMap::from_iter([
                (RAI_ACCESS_KEY.to_string(), "e3536f8d".to_string()),
                (
                    RAI_PRIVATE_KEY_FILENAME.to_string(),
                    "default_privatekey.json".to_string(),
                ),
            ]),
        });

        let cred = Config::from_env(&ctx).resolve(&ctx).await.unwrap();
        assert!(matches!(cred, Some(Credential::AccessKey(_))));
    }

    #[tokio::test]
    async fn test_resolve_invalid_private_key_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"seed": "{SEED}"}}"#).unwrap();

        let cfg = Config {
            access_key_id: Some("e3536f8d".to_string()),
            private_key_filename: Some(file.path().to_string_lossy().to_string()),
            ..Default::default()
        };

        let err = cfg.resolve(&ctx(&[])).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }
}
