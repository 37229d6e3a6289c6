//! Identifier naming policy.
//!
//! Styles are applied to generated method names only. Interface names, data
//! type names, parameter names, and wire names always keep their declared
//! spelling.

use serde::{Deserialize, Serialize};

/// Identifier case convention.
///
/// Only the leading character is touched, so `GetURL` becomes `getURL` and
/// `Get_Item` becomes `get_Item`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NamingStyle {
    /// Keep the declared spelling.
    #[serde(rename = "none")]
    None,
    /// `lowerCamelCase`
    #[default]
    #[serde(rename = "camelCase")]
    CamelCase,
    /// `UpperCamelCase`
    #[serde(rename = "PascalCase")]
    PascalCase,
}

impl NamingStyle {
    /// Transform an identifier into this style.
    pub fn apply(self, name: &str) -> String {
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return String::new();
        };

        match self {
            NamingStyle::None => name.to_string(),
            NamingStyle::CamelCase => first.to_lowercase().chain(chars).collect(),
            NamingStyle::PascalCase => first.to_uppercase().chain(chars).collect(),
        }
    }
}

/// Naming policy for one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NamingPolicy {
    /// Style for method names.
    pub method: NamingStyle,
}

impl NamingPolicy {
    pub fn new(method: NamingStyle) -> Self {
        Self { method }
    }

    /// Local name of a generated method.
    pub fn method_name(&self, name: &str) -> String {
        self.method.apply(name)
    }
}
