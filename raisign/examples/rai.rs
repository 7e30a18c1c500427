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

use log::info;
use raisign::rai::{Authenticator, Config, DefaultCredentialProvider, TokenCache};
use raisign::{default_context, Result, Signer, DEFAULT_TIMEOUT};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();

    let ctx = default_context(DEFAULT_TIMEOUT)?;
    let config = Arc::new(Config::from_env(&ctx));
    let host = config.host();

    let signer = Signer::new(
        ctx.clone(),
        DefaultCredentialProvider::new().with_config(config.clone()),
        Authenticator::new(Arc::new(TokenCache::new()), host).with_region(config.region()?),
    );

    let (mut parts, body) = http::Request::get(format!("https://{host}/database"))
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(b"{}".to_vec())?
        .into_parts();
    signer.sign(&mut parts, &body).await?;

    let resp = ctx
        .http_send(http::Request::from_parts(parts, bytes::Bytes::from(body)))
        .await?;
    info!("list databases: {}", resp.status());
    signer.on_response_status(resp.status()).await?;

    println!("{}", String::from_utf8_lossy(resp.body()));
    Ok(())
}
