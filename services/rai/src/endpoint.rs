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

use crate::constants::DEFAULT_AUTH_ENDPOINT;
use std::net::IpAddr;

/// Derive the OAuth token endpoint from the API host.
///
/// - `azure-dev.example.com` => `https://login-dev.example.com/oauth/token`
/// - `azure.example.com` => `https://login.example.com/oauth/token`
/// - `example.com` => `https://login.example.com/oauth/token`
///
/// The environment tag is the text between the first `-` of the host and the
/// next `.`. The result is lower-cased. Hosts without a domain (empty, single label or IP literal) get
/// the production endpoint.
pub fn derive_auth_endpoint(host: &str) -> String {
    let host = bare_host(host).to_ascii_lowercase();

    let labels = host.split('.').collect::<Vec<_>>();
    if labels.len() < 2 || labels.iter().any(|v| v.is_empty()) || is_ip_literal(&host) {
        return DEFAULT_AUTH_ENDPOINT.to_string();
    }

    let env = host
        .split_once('-')
        .map(|(_, rest)| rest.split('.').next().unwrap_or_default())
        .filter(|v| !v.is_empty());

    let base_domain = if labels.len() >= 3 {
        labels[1..].join(".")
    } else {
        host.clone()
    };

    match env {
        Some(env) => format!("https://login-{env}.{base_domain}/oauth/token"),
        None => format!("https://login.{base_domain}/oauth/token"),
    }
}

/// Strip scheme, userinfo, path and port from the host.
fn bare_host(host: &str) -> &str {
    let host = host.trim();
    let host = host.split_once("://").map_or(host, |(_, rest)| rest);
    let host = host.split(['/', '?', '#']).next().unwrap_or_default();
    let host = host.rsplit_once('@').map_or(host, |(_, rest)| rest);

    if host.starts_with('[') {
        // IPv6 literal, keep the brackets out of the port split.
        return host.split(']').next().map_or(host, |v| &v[1..]);
    }
    host.split(':').next().unwrap_or_default()
}

fn is_ip_literal(host: &str) -> bool {
    host.parse::<IpAddr>().is_ok()
}
