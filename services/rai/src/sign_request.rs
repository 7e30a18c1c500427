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

use crate::constants::{
    CONTENT_ENCODING, DEFAULT_SERVICE, DEFAULT_SIGNED_HEADERS, RAI_ALGORITHM,
    RAI_PATH_ENCODE_SET, RAI_SCOPE_TERMINATOR, X_RAI_DATE,
};
use crate::{AccessKeyCredential, Region};
use ed25519_dalek::Signer as _;
use http::request::Parts;
use http::{header, HeaderValue};
use log::debug;
use percent_encoding::utf8_percent_encode;
use raisign_core::hash::hex_sha256;
use raisign_core::time::{format_date, format_iso8601, now, DateTime};
use raisign_core::{Error, Result, SigningRequest};
use std::fmt::Write;

/// RequestSigner implements the `RAI01-ED25519-SHA256` request signature.
///
/// A canonical form of the request is hashed, wrapped into a string to sign
/// together with the date and scope, and signed with the Ed25519 key derived
/// from the credential's seed. The result goes into `Authorization`:
///
/// ```text
/// RAI01-ED25519-SHA256 Credential=<id>/<date>/<region>/<service>/rai01_request, SignedHeaders=<h1;h2>, Signature=<hex>
/// ```
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    region: Region,
    signed_headers: Vec<String>,

    time: Option<DateTime>,
}

impl Default for RequestSigner {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE, Region::default())
    }
}

impl RequestSigner {
    /// Create a new signer for the given service and region.
    pub fn new(service: &str, region: Region) -> Self {
        Self {
            service: service.to_string(),
            region,
            signed_headers: DEFAULT_SIGNED_HEADERS
                .iter()
                .map(|v| v.to_string())
                .collect(),

            time: None,
        }
    }

    /// Replace the set of headers included in the signature.
    ///
    /// Names are matched case-insensitively. Headers in the set but missing
    /// from the request are skipped.
    pub fn with_signed_headers(mut self, headers: &[&str]) -> Self {
        self.signed_headers = headers.iter().map(|v| v.to_lowercase()).collect();
        self
    }

    /// Replace the service used in the scope.
    pub fn with_service(mut self, service: &str) -> Self {
        self.service = service.to_string();
        self
    }

    /// Replace the region used in the scope.
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Service used in the scope.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Region used in the scope.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Sign the request with the configured time, or the current time.
    pub fn sign(
        &self,
        req: &mut Parts,
        body: &[u8],
        credential: Option<&AccessKeyCredential>,
    ) -> Result<()> {
        self.sign_at(req, body, credential, self.time.unwrap_or_else(now))
    }

    /// Sign the request as of `now`.
    ///
    /// `body` must be the exact bytes sent on the wire, after any compression.
    /// Any existing `Authorization` header is replaced. `x-rai-date` and
    /// `host` are added when absent; other headers and the URI are untouched.
    pub fn sign_at(
        &self,
        req: &mut Parts,
        body: &[u8],
        credential: Option<&AccessKeyCredential>,
        now: DateTime,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Ok(());
        };
        let signing_key = cred.signing_key()?;

        let original_headers = req.headers.clone();
        let mut signed_req = SigningRequest::build(req)?;
        let authorization = canonicalize_header(&mut signed_req, now).and_then(|_| {
            let signed_headers = self.signed_header_names(&signed_req);

            // build canonical request and string to sign.
            let creq = canonical_request_string(&signed_req, &signed_headers, body)?;
            debug!("calculated canonical request: {creq}");
            let encoded_req = hex_sha256(creq.as_bytes());

            // Scope: "20200504/<region>/<service>/rai01_request"
            let scope = format!(
                "{}/{}/{}/{}",
                format_date(now),
                self.region,
                self.service,
                RAI_SCOPE_TERMINATOR
            );
            debug!("calculated scope: {scope}");

            // StringToSign:
            //
            // RAI01-ED25519-SHA256
            // 20200504T103600Z
            // 20200504/<region>/<service>/rai01_request
            // <hashed_canonical_request>
            let string_to_sign = {
                let mut f = String::new();
                writeln!(f, "{RAI_ALGORITHM}")?;
                writeln!(f, "{}", format_iso8601(now))?;
                writeln!(f, "{}", &scope)?;
                write!(f, "{}", &encoded_req)?;
                f
            };
            debug!("calculated string to sign: {string_to_sign}");

            let signature = hex::encode(signing_key.sign(string_to_sign.as_bytes()).to_bytes());

            let mut authorization = HeaderValue::from_str(&format!(
                "{} Credential={}/{}, SignedHeaders={}, Signature={}",
                RAI_ALGORITHM,
                cred.access_key_id,
                scope,
                signed_headers.join(";"),
                signature
            ))
            .map_err(|e| {
                Error::request_invalid("failed to create authorization header").with_source(e)
            })?;
            authorization.set_sensitive(true);
            Ok(authorization)
        });

        match authorization {
            Ok(value) => {
                signed_req.headers.insert(header::AUTHORIZATION, value);
                signed_req.apply(req)
            }
            Err(err) => {
                // Leave the request exactly as the caller built it.
                req.headers = original_headers;
                Err(err)
            }
        }
    }

    /// Names of the signed headers present on the request, sorted.
    ///
    /// `content-encoding` is always signed when present so a compressed body
    /// can't be replayed as plain.
    fn signed_header_names(&self, req: &SigningRequest) -> Vec<String> {
        let mut names: Vec<String> = self
            .signed_headers
            .iter()
            .map(|v| v.as_str())
            .chain(std::iter::once(CONTENT_ENCODING))
            .filter(|name| req.headers.contains_key(*name))
            .map(|name| name.to_string())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

fn canonicalize_header(req: &mut SigningRequest, now: DateTime) -> Result<()> {
    req.headers.remove(header::AUTHORIZATION);

    // Insert HOST header if not present.
    if req.headers.get(header::HOST).is_none() {
        req.headers.insert(
            header::HOST,
            req.authority.as_str().parse().map_err(|e| {
                Error::request_invalid("failed to parse authority as header value").with_source(e)
            })?,
        );
    }

    // Insert DATE header if not present.
    if req.headers.get(X_RAI_DATE).is_none() {
        req.headers
            .insert(X_RAI_DATE, HeaderValue::try_from(format_iso8601(now))?);
    }

    Ok(())
}

fn canonical_request_string(
    req: &SigningRequest,
    signed_headers: &[String],
    body: &[u8],
) -> Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    // Insert method
    writeln!(f, "{}", req.method)?;
    // Insert encoded path
    let path = if req.path.is_empty() { "/" } else { &req.path };
    writeln!(f, "{}", utf8_percent_encode(path, &RAI_PATH_ENCODE_SET))?;
    // Insert query
    writeln!(f, "{}", canonicalize_query(&req.query))?;
    // Insert signed headers
    for name in signed_headers {
        let value = req.header_value_joined(name)?.unwrap_or_default();
        writeln!(f, "{name}:{value}")?;
    }
    writeln!(f)?;
    writeln!(f, "{}", signed_headers.join(";"))?;
    // Insert content hash
    write!(f, "{}", hex_sha256(body))?;

    Ok(f)
}

/// Sort decoded query pairs by key then value, and re-encode them.
fn canonicalize_query(query: &[(String, String)]) -> String {
    let mut query = query.iter().collect::<Vec<_>>();
    query.sort();

    query
        .into_iter()
        .map(|(k, v)| format!("{}={}", url_encode(k), url_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Form style encoding: space becomes `+`, hex digits are lowercase, and
/// `-_.!*()` are left as is.
fn url_encode(s: &str) -> String {
    let mut encoded = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'a'..=b'z'
            | b'A'..=b'Z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'*'
            | b'('
            | b')' => encoded.push(b as char),
            b' ' => encoded.push('+'),
            _ => {
                let _ = write!(encoded, "%{b:02x}");
            }
        }
    }
    encoded
}
