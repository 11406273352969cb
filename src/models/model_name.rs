//! Model name enumeration
//!
//! A closed set of languages accepted by `/models/{model_name}`. Wire values
//! are the lowercase names and matching is case-sensitive.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelName {
    Java,
    Php,
    Python,
}

impl ModelName {
    /// All members, in declaration order
    pub const ALL: [ModelName; 3] = [ModelName::Java, ModelName::Php, ModelName::Python];

    /// Wire value of the member
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelName::Java => "java",
            ModelName::Php => "php",
            ModelName::Python => "python",
        }
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Invalid model name: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_name_display() {
        assert_eq!(ModelName::Java.to_string(), "java");
        assert_eq!(ModelName::Php.to_string(), "php");
        assert_eq!(ModelName::Python.to_string(), "python");
    }

    #[test]
    fn test_model_name_from_str_is_case_sensitive() {
        assert_eq!(ModelName::from_str("java").unwrap(), ModelName::Java);
        assert_eq!(ModelName::from_str("python").unwrap(), ModelName::Python);
        assert!(ModelName::from_str("Java").is_err());
        assert!(ModelName::from_str("PHP").is_err());
        assert!(ModelName::from_str("rust").is_err());
    }

    #[test]
    fn test_model_name_serde_matches_display() {
        for model in ModelName::ALL {
            let value = serde_json::to_value(model).unwrap();
            assert_eq!(value, model.as_str());
            let back: ModelName = serde_json::from_value(value).unwrap();
            assert_eq!(back, model);
        }
        assert!(serde_json::from_str::<ModelName>("\"Python\"").is_err());
    }
}
