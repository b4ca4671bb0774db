//! Capability value object for LLM routing

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Capability class of an LLM call (Value Object)
///
/// The orchestration core never names concrete models; it requests a
/// capability class and leaves model selection to the gateway adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Multi-step reasoning and synthesis
    Reason,
    /// Structured extraction over provided data
    Extract,
}

impl Capability {
    /// Get the string identifier for this capability
    pub fn as_str(&self) -> &str {
        match self {
            Capability::Reason => "reason",
            Capability::Extract => "extract",
        }
    }
}

impl Default for Capability {
    fn default() -> Self {
        Capability::Reason
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "reason" => Ok(Capability::Reason),
            "extract" => Ok(Capability::Extract),
            other => Err(format!("unknown capability: {}", other)),
        }
    }
}

impl Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Capability {
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

    #[test]
    fn test_capability_roundtrip() {
        for capability in [Capability::Reason, Capability::Extract] {
            let s = capability.to_string();
            let parsed: Capability = s.parse().unwrap();
            assert_eq!(capability, parsed);
        }
    }

    #[test]
    fn test_unknown_capability_rejected() {
        let result: Result<Capability, _> = "paint".parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_capability_default() {
        assert_eq!(Capability::default(), Capability::Reason);
    }
}
