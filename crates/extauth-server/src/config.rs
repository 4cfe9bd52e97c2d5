//! Service configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What to do with a frame whose length prefix is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyFramePolicy {
    /// Send nothing back. Matches the behaviour XMPP servers have been
    /// deployed against, but a peer that expects one answer per frame will
    /// keep waiting.
    #[default]
    Ignore,
    /// Answer with a failure response.
    RespondFailure,
}

impl EmptyFramePolicy {
    /// Returns the name used in config files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::RespondFailure => "respond-failure",
        }
    }
}

impl fmt::Display for EmptyFramePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmptyFramePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignore" => Ok(Self::Ignore),
            "respond-failure" => Ok(Self::RespondFailure),
            other => Err(format!(
                "unknown empty frame policy '{other}' (expected ignore or respond-failure)"
            )),
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// Handling of zero-length frames.
    pub empty_frame: EmptyFramePolicy,
}

impl ServiceConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the empty frame policy.
    pub fn with_empty_frame(mut self, policy: EmptyFramePolicy) -> Self {
        self.empty_frame = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.empty_frame, EmptyFramePolicy::Ignore);
    }

    #[test]
    fn custom_config() {
        let config = ServiceConfig::new().with_empty_frame(EmptyFramePolicy::RespondFailure);
        assert_eq!(config.empty_frame, EmptyFramePolicy::RespondFailure);
    }

    #[test]
    fn policy_names() {
        for policy in [EmptyFramePolicy::Ignore, EmptyFramePolicy::RespondFailure] {
            assert_eq!(policy.as_str().parse::<EmptyFramePolicy>(), Ok(policy));
        }
        assert!("drop".parse::<EmptyFramePolicy>().is_err());
    }
}
