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

//! Settings read from `lrn.toml`. Every key is optional.

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::analysis::options::Options;
use crate::error::Fallible;
use crate::error::fail;
use crate::scheduler::Policy;
use crate::scheduler::RETRY_TIMES;

pub const CONFIG_FILE: &str = "lrn.toml";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub session: SessionConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub case_insensitive: bool,
    pub punct_insensitive: bool,
    pub total_recall: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Right answers needed before a problem is retired.
    pub repeat: u32,
    /// Right answers needed again after a wrong one.
    pub retry: u32,
    pub policy: Policy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            repeat: 1,
            retry: RETRY_TIMES,
            policy: Policy::default(),
        }
    }
}

impl Config {
    pub fn parse(content: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(content)?;
        if config.session.repeat == 0 {
            return fail("invalid configuration: session.repeat must be at least 1.");
        }
        if config.session.retry == 0 {
            return fail("invalid configuration: session.retry must be at least 1.");
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Fallible<Self> {
        log::debug!("Loading configuration from {}.", path.display());
        let content = read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn options(&self) -> Options {
        let mut options = Options::empty();
        options.set(Options::CASE_INSENSITIVE, self.analysis.case_insensitive);
        options.set(Options::PUNCT_INSENSITIVE, self.analysis.punct_insensitive);
        options.set(Options::TOTAL_RECALL, self.analysis.total_recall);
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config() -> Fallible<()> {
        let config = Config::parse("")?;
        assert_eq!(config, Config::default());
        assert_eq!(config.session.repeat, 1);
        assert_eq!(config.session.retry, 2);
        assert_eq!(config.options(), Options::empty());
        Ok(())
    }

    #[test]
    fn test_full_config() -> Fallible<()> {
        let content = r#"
[analysis]
case_insensitive = true
total_recall = true

[session]
repeat = 3
retry = 4
policy = "rotate"
"#;
        let config = Config::parse(content)?;
        assert_eq!(
            config.options(),
            Options::CASE_INSENSITIVE | Options::TOTAL_RECALL
        );
        assert_eq!(config.session.repeat, 3);
        assert_eq!(config.session.retry, 4);
        assert_eq!(config.session.policy, Policy::Rotate);
        Ok(())
    }

    #[test]
    fn test_unknown_key() {
        assert!(Config::parse("[analysis]\nfuzzy = true\n").is_err());
        assert!(Config::parse("[sesion]\nrepeat = 2\n").is_err());
    }

    #[test]
    fn test_zero_counters() {
        assert!(Config::parse("[session]\nrepeat = 0\n").is_err());
        assert!(Config::parse("[session]\nretry = 0\n").is_err());
    }

    #[test]
    fn test_unknown_policy() {
        assert!(Config::parse("[session]\npolicy = \"shuffle\"\n").is_err());
    }
}
