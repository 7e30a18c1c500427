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

use percent_encoding::AsciiSet;
use percent_encoding::CONTROLS;

// Headers used by the RAI signing protocol.
pub const X_RAI_DATE: &str = "x-rai-date";
pub const CONTENT_ENCODING: &str = "content-encoding";

/// Headers signed when the caller doesn't specify any.
pub const DEFAULT_SIGNED_HEADERS: [&str; 3] = ["host", "content-type", X_RAI_DATE];

pub const RAI_ALGORITHM: &str = "RAI01-ED25519-SHA256";
pub const RAI_SCOPE_TERMINATOR: &str = "rai01_request";

/// Service used in the signing scope for transaction requests.
pub const DEFAULT_SERVICE: &str = "transaction";
pub const DEFAULT_HOST: &str = "azure.relationalai.com";

/// Token endpoint used when the host carries no usable domain.
pub const DEFAULT_AUTH_ENDPOINT: &str = "https://login.relationalai.com/oauth/token";
pub const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";

// Env values used to configure the RAI client.
pub const RAI_ACCESS_KEY: &str = "RAI_ACCESS_KEY";
pub const RAI_PRIVATE_KEY: &str = "RAI_PRIVATE_KEY";
pub const RAI_PRIVATE_KEY_FILENAME: &str = "RAI_PRIVATE_KEY_FILENAME";
pub const RAI_CLIENT_ID: &str = "RAI_CLIENT_ID";
pub const RAI_CLIENT_SECRET: &str = "RAI_CLIENT_SECRET";
pub const RAI_HOST: &str = "RAI_HOST";
pub const RAI_REGION: &str = "RAI_REGION";

/// Directory, relative to home, holding private key files.
pub const RAI_CONFIG_DIR: &str = ".rai";

/// AsciiSet for the canonical path.
///
/// The path is already escaped by `http::Uri`, only spaces and control bytes
/// are left to encode. `%` is kept so existing escapes are not doubled.
pub static RAI_PATH_ENCODE_SET: AsciiSet = CONTROLS.add(b' ');
