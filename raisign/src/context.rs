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

use raisign_core::{Context, OsEnv, Result};
use raisign_file_read_tokio::TokioFileRead;
use raisign_http_send_reqwest::ReqwestHttpSend;
use std::time::Duration;

/// Timeout applied to every request sent through the default context.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Create a context that reads files with tokio, sends requests with reqwest
/// and reads the process environment.
///
/// Requests sent through the context, including bearer token exchanges, fail
/// after `timeout`.
pub fn default_context(timeout: Duration) -> Result<Context> {
    Ok(Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::with_timeout(timeout)?)
        .with_env(OsEnv))
}
