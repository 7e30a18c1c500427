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

use raisign_core::{Error, Result};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Region an RAI deployment runs in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// `us-east`
    #[default]
    UsEast,
}

impl Region {
    /// The tag used in signing scopes and query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::UsEast => "us-east",
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "us-east" => Ok(Region::UsEast),
            v => Err(Error::config_invalid(format!("unknown region: {v}"))),
        }
    }
}
