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

use crate::{init_logger, ACCESS_KEY_ID, PRIVATE_KEY};
use chrono::TimeZone;
use http::header::{AUTHORIZATION, CONTENT_ENCODING, CONTENT_TYPE, HOST};
use http::request::Parts;
use http::Request;
use pretty_assertions::assert_eq;
use raisign_core::time::DateTime;
use raisign_core::{Context, Signer};
use raisign_rai::{
    AccessKeyCredential, Authenticator, Region, RequestSigner, StaticCredentialProvider, TokenCache,
};
use std::sync::Arc;

fn credential() -> AccessKeyCredential {
    AccessKeyCredential {
        access_key_id: ACCESS_KEY_ID.to_string(),
        private_key: PRIVATE_KEY.to_string(),
    }
}

fn time(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime {
    chrono::Utc
        .with_ymd_and_hms(y, mo, d, h, mi, s)
        .single()
        .expect("time must be valid")
}

fn database_list_request() -> (Parts, Vec<u8>) {
    let (parts, body) = Request::get("https://127.0.0.1:8443/database")
        .header(HOST, "127.0.0.1")
        .header(CONTENT_TYPE, "application/json")
        .body(b"{}".to_vec())
        .expect("request must be valid")
        .into_parts();
    (parts, body)
}

#[test]
fn test_known_signature() {
    init_logger();

    let (mut parts, body) = database_list_request();
    RequestSigner::new("database+list", Region::UsEast)
        .sign_at(&mut parts, &body, Some(&credential()), time(2020, 5, 4, 10, 36, 0))
        .unwrap();

    assert_eq!(parts.headers["x-rai-date"], "20200504T103600Z");
    assert_eq!(
        parts.headers[AUTHORIZATION],
        "RAI01-ED25519-SHA256 \
         Credential=e3536f8d-cbc6-4ed8-9de6-74cf4cb724a1/20200504/us-east/database+list/rai01_request, \
         SignedHeaders=content-type;host;x-rai-date, \
         Signature=77d211417454ded42dc931d25c57af6cab6cbc70f75bef4c849d37585188d659158c8c944eab866e3147bbcde21257ae0a1dfece3c0f3f43a838b3f9524e0f0a"
    );
}

#[test]
fn test_known_signature_with_query_and_compression() {
    init_logger();

    let (mut parts, body) = Request::post(
        "https://azure.relationalai.com/transactions?open_mode=OPEN&dbname=my%20db&compute_name=c1",
    )
    .header(HOST, "azure.relationalai.com")
    .header(CONTENT_TYPE, "application/json; charset=utf-8")
    .header(CONTENT_ENCODING, "gzip")
    .body(br#"{"readonly":true}"#.to_vec())
    .unwrap()
    .into_parts();

    RequestSigner::default()
        .sign_at(&mut parts, &body, Some(&credential()), time(2022, 3, 13, 7, 20, 4))
        .unwrap();

    assert_eq!(
        parts.headers[AUTHORIZATION],
        "RAI01-ED25519-SHA256 \
         Credential=e3536f8d-cbc6-4ed8-9de6-74cf4cb724a1/20220313/us-east/transaction/rai01_request, \
         SignedHeaders=content-encoding;content-type;host;x-rai-date, \
         Signature=380f0546f32bcb6fbc27018b04ab3db8363f1f1e4528ad00f9ccd8ce54ddf661a7d65f464642d9b9ca9c52e53a9aa45f6f9b3d45b18dfd3d1f5fbd2110a08a06"
    );
    assert_eq!(
        parts.uri.to_string(),
        "https://azure.relationalai.com/transactions?open_mode=OPEN&dbname=my%20db&compute_name=c1"
    );
}

#[test]
fn test_signature_is_deterministic() {
    let signer = RequestSigner::default().with_time(time(2022, 3, 13, 7, 20, 4));

    let mut signatures = Vec::new();
    for _ in 0..2 {
        let (mut parts, body) = database_list_request();
        signer.sign(&mut parts, &body, Some(&credential())).unwrap();
        signatures.push(parts.headers[AUTHORIZATION].clone());
    }

    assert_eq!(signatures[0], signatures[1]);
}

#[test]
fn test_signature_ignores_query_order() {
    let signer = RequestSigner::default().with_time(time(2022, 3, 13, 7, 20, 4));

    let sign = |uri: &str| {
        let (mut parts, body) = Request::get(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Vec::<u8>::new())
            .unwrap()
            .into_parts();
        signer.sign(&mut parts, &body, Some(&credential())).unwrap();
        parts.headers[AUTHORIZATION].clone()
    };

    let a = sign("https://azure.relationalai.com/transactions?b=2&a=1&a=0");
    let b = sign("https://azure.relationalai.com/transactions?a=0&b=2&a=1");
    let c = sign("https://azure.relationalai.com/transactions?a=1&b=2");

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_signature_depends_on_body() {
    let signer = RequestSigner::default().with_time(time(2022, 3, 13, 7, 20, 4));

    let (mut first, _) = database_list_request();
    signer.sign(&mut first, b"{}", Some(&credential())).unwrap();
    let (mut second, _) = database_list_request();
    signer.sign(&mut second, b"{ }", Some(&credential())).unwrap();

    assert_ne!(first.headers[AUTHORIZATION], second.headers[AUTHORIZATION]);
}

#[tokio::test]
async fn test_signer_with_access_key() {
    init_logger();

    let authenticator = Authenticator::new(Arc::new(TokenCache::new()), "127.0.0.1")
        .with_signer(
            RequestSigner::new("database+list", Region::UsEast)
                .with_time(time(2020, 5, 4, 10, 36, 0)),
        );
    let signer = Signer::new(
        Context::new(),
        StaticCredentialProvider::access_key(ACCESS_KEY_ID, PRIVATE_KEY),
        authenticator,
    );

    let (mut parts, body) = database_list_request();
    signer.sign(&mut parts, &body).await.unwrap();

    let value = parts.headers[AUTHORIZATION].to_str().unwrap();
    assert!(value.ends_with(
        "Signature=77d211417454ded42dc931d25c57af6cab6cbc70f75bef4c849d37585188d659158c8c944eab866e3147bbcde21257ae0a1dfece3c0f3f43a838b3f9524e0f0a"
    ));
}
