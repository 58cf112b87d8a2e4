// govcheck-core/src/domain/governance/severity.rs

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// Declaration order gives Info < Warning < Error, so renderers can sort by
// gravity with plain comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    #[default]
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "info" | "notice" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(format!(
                "Unknown severity: '{}' (expected error, warning or info)",
                s
            )),
        }
    }
}

// Case-insensitive on input, like the CLI flags.
impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_display_and_parsing_consistency() -> anyhow::Result<()> {
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(
            Severity::from_str("ERROR").map_err(|e| anyhow::anyhow!(e))?,
            Severity::Error
        );
        assert!(Severity::from_str("fatal").is_err());
        Ok(())
    }

    #[test]
    fn test_yaml_deserialization() -> anyhow::Result<()> {
        let severity: Severity = serde_yaml::from_str("warning")?;
        assert_eq!(severity, Severity::Warning);
        let severity: Severity = serde_yaml::from_str("ERROR")?;
        assert_eq!(severity, Severity::Error);
        Ok(())
    }
}
