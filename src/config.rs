// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;

/// Contents of the optional TOML config file. Every field may be omitted.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub database: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub open_browser: Option<bool>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Fallible<Self> {
        if !path.exists() {
            return fail(format!("config file {} does not exist.", path.display()));
        }
        let content = read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Values given on the command line. These take precedence over the file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub database: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub no_open: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database: String,
    pub host: String,
    pub port: u16,
    pub open_browser: bool,
}

impl Config {
    pub fn resolve(file: ConfigFile, overrides: Overrides) -> Self {
        let defaults = Config::default();
        Self {
            database: overrides
                .database
                .or(file.database)
                .unwrap_or(defaults.database),
            host: overrides.host.or(file.host).unwrap_or(defaults.host),
            port: overrides.port.or(file.port).unwrap_or(defaults.port),
            open_browser: !overrides.no_open
                && file.open_browser.unwrap_or(defaults.open_browser),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: "foldercards.db".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            open_browser: true,
        }
    }
}
