//! Generation options.
//!
//! Options can be built in code or loaded from a `hubgen.toml` file. Every
//! section and every key is optional; anything left out keeps its default.

use crate::error::ConfigError;
use crate::naming::{NamingPolicy, NamingStyle};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "hubgen.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Output layout and formatting.
    pub output: OutputConfig,

    /// Naming conventions.
    pub naming: NamingConfig,

    /// Transpilation behavior.
    pub transpile: TranspileConfig,

    /// Metadata names of the well-known types.
    pub symbols: WellKnownNames,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// End-of-line sequence.
    pub eol: NewLine,

    /// Spaces per indentation level.
    pub indent: usize,

    /// Subdirectory holding the interface files and the aggregate file.
    pub directory: String,

    /// Module the generated code imports the transport from.
    pub transport_module: String,

    /// Whether to emit JSDoc blocks on interface members.
    pub emit_docs: bool,
}

/// Naming convention configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Member style shared with the data-type transpiler, which applies it to
    /// properties. Method names use it unless `method_style` is set.
    pub naming_style: NamingStyle,

    /// Style for method names.
    pub method_style: Option<NamingStyle>,

    /// Style for enum members, consumed by the data-type transpiler.
    pub enum_naming_style: NamingStyle,
}

/// Transpilation configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TranspileConfig {
    /// Wire serializer, consumed by the data-type transpiler.
    pub serializer: SerializerMode,

    /// Also discover marked interfaces declared in referenced modules.
    pub include_referenced_modules: bool,

    /// Metadata name -> literal target type text.
    pub type_overrides: BTreeMap<String, String>,
}

/// Metadata names of the well-known types that drive classification.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WellKnownNames {
    pub task: String,
    pub generic_task: String,
    pub async_enumerable: String,
    pub channel_reader: String,
    pub cancellation_token: String,
    pub hub_attribute: String,
    pub receiver_attribute: String,
    pub transpilation_source_attribute: String,
}

/// End-of-line sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewLine {
    #[default]
    Lf,
    Cr,
    CrLf,
}

impl NewLine {
    /// Get the line ending string.
    pub fn as_str(&self) -> &'static str {
        match self {
            NewLine::Lf => "\n",
            NewLine::Cr => "\r",
            NewLine::CrLf => "\r\n",
        }
    }
}

/// Wire serializer of the transport connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializerMode {
    #[default]
    Json,
    MessagePack,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            eol: NewLine::Lf,
            indent: 4,
            directory: "hubs".to_string(),
            transport_module: "@microsoft/signalr".to_string(),
            emit_docs: true,
        }
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            naming_style: NamingStyle::CamelCase,
            method_style: None,
            enum_naming_style: NamingStyle::PascalCase,
        }
    }
}

impl Default for WellKnownNames {
    fn default() -> Self {
        Self {
            task: "System.Threading.Tasks.Task".to_string(),
            generic_task: "System.Threading.Tasks.Task`1".to_string(),
            async_enumerable: "System.Collections.Generic.IAsyncEnumerable`1".to_string(),
            channel_reader: "System.Threading.Channels.ChannelReader`1".to_string(),
            cancellation_token: "System.Threading.CancellationToken".to_string(),
            hub_attribute: "TypedSignalR.Client.HubAttribute".to_string(),
            receiver_attribute: "TypedSignalR.Client.ReceiverAttribute".to_string(),
            transpilation_source_attribute: "Tapper.TranspilationSourceAttribute".to_string(),
        }
    }
}

impl Options {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the end-of-line sequence.
    pub fn with_eol(mut self, eol: NewLine) -> Self {
        self.output.eol = eol;
        self
    }

    /// Set the indentation width.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.output.indent = indent;
        self
    }

    /// Set the naming style for properties and methods.
    pub fn with_naming_style(mut self, style: NamingStyle) -> Self {
        self.naming.naming_style = style;
        self
    }

    /// Set a separate naming style for methods.
    pub fn with_method_style(mut self, style: NamingStyle) -> Self {
        self.naming.method_style = Some(style);
        self
    }

    /// Set whether referenced modules are scanned.
    pub fn with_include_referenced_modules(mut self, include: bool) -> Self {
        self.transpile.include_referenced_modules = include;
        self
    }

    /// Set whether JSDoc blocks are emitted.
    pub fn with_emit_docs(mut self, emit: bool) -> Self {
        self.output.emit_docs = emit;
        self
    }

    /// Add a literal type override.
    pub fn with_type_override(
        mut self,
        metadata_name: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.transpile
            .type_overrides
            .insert(metadata_name.into(), target.into());
        self
    }

    /// Naming policy derived from the naming section.
    pub fn naming_policy(&self) -> NamingPolicy {
        NamingPolicy::new(self.naming.method_style.unwrap_or(self.naming.naming_style))
    }

    /// Indentation string for one level.
    pub fn indent_str(&self) -> String {
        " ".repeat(self.output.indent)
    }
}

/// Configuration manager for loading and validating options.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// If the path is None, attempts to load from the default location.
    /// If no config file exists, returns default configuration.
    pub fn load(path: Option<&Path>) -> Result<Options, ConfigError> {
        let config_path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

        if !config_path.exists() {
            return Ok(Options::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let options: Options = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path, e.to_string()))?;

        Self::validate(&options)?;
        Ok(options)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Options, ConfigError> {
        let options: Options = toml::from_str(content)
            .map_err(|e| ConfigError::invalid_toml(PathBuf::from("<string>"), e.to_string()))?;

        Self::validate(&options)?;
        Ok(options)
    }

    /// Check option values that deserialization alone cannot reject.
    pub fn validate(options: &Options) -> Result<(), ConfigError> {
        if !(1..=16).contains(&options.output.indent) {
            return Err(ConfigError::invalid_value(
                "output.indent",
                format!("must be between 1 and 16, got {}", options.output.indent),
            ));
        }

        if options.output.directory.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "output.directory",
                "must not be empty",
            ));
        }

        Ok(())
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# hubgen configuration file

[output]
# End-of-line sequence (lf, cr, crlf)
eol = "lf"

# Spaces per indentation level
indent = 4

# Subdirectory for interface files and index.ts
directory = "hubs"

# Module the transport types are imported from
transport_module = "@microsoft/signalr"

# Whether to generate JSDoc comments on interface members
emit_docs = true

[naming]
# Style for properties and methods (none, camelCase, PascalCase)
naming_style = "camelCase"

# Style for method names only; defaults to naming_style
# method_style = "camelCase"

# Style for enum members (none, camelCase, PascalCase)
enum_naming_style = "PascalCase"

[transpile]
# Transport serializer (json, messagepack)
serializer = "json"

# Also generate bindings for marked interfaces in referenced modules
include_referenced_modules = false

[transpile.type_overrides]
# "System.Numerics.BigInteger" = "bigint"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_options() {
        let options = Options::default();
        assert_eq!(options.output.eol, NewLine::Lf);
        assert_eq!(options.output.indent, 4);
        assert_eq!(options.output.directory, "hubs");
        assert_eq!(options.output.transport_module, "@microsoft/signalr");
        assert!(options.output.emit_docs);
        assert_eq!(options.naming.naming_style, NamingStyle::CamelCase);
        assert_eq!(options.naming.method_style, None);
        assert_eq!(options.naming.enum_naming_style, NamingStyle::PascalCase);
        assert_eq!(options.transpile.serializer, SerializerMode::Json);
        assert!(!options.transpile.include_referenced_modules);
        assert!(options.transpile.type_overrides.is_empty());
        assert_eq!(options.symbols.hub_attribute, "TypedSignalR.Client.HubAttribute");
    }

    #[test]
    fn test_parse_toml_config() {
        let toml = r#"
[output]
eol = "crlf"
indent = 2
directory = "signalr"
emit_docs = false

[naming]
naming_style = "none"
method_style = "PascalCase"

[transpile]
serializer = "messagepack"
include_referenced_modules = true

[transpile.type_overrides]
"System.Numerics.BigInteger" = "bigint"
"#;

        let options = ConfigManager::from_toml_str(toml).unwrap();
        assert_eq!(options.output.eol, NewLine::CrLf);
        assert_eq!(options.output.indent, 2);
        assert_eq!(options.output.directory, "signalr");
        assert_eq!(options.output.transport_module, "@microsoft/signalr");
        assert!(!options.output.emit_docs);
        assert_eq!(options.naming.naming_style, NamingStyle::None);
        assert_eq!(options.naming.method_style, Some(NamingStyle::PascalCase));
        assert_eq!(options.transpile.serializer, SerializerMode::MessagePack);
        assert!(options.transpile.include_referenced_modules);
        assert_eq!(
            options.transpile.type_overrides.get("System.Numerics.BigInteger"),
            Some(&"bigint".to_string())
        );
    }

    #[test]
    fn test_naming_policy_falls_back_to_naming_style() {
        let options = Options::new().with_naming_style(NamingStyle::PascalCase);
        assert_eq!(options.naming_policy().method, NamingStyle::PascalCase);

        let options = options.with_method_style(NamingStyle::None);
        assert_eq!(options.naming_policy().method, NamingStyle::None);
        assert_eq!(options.naming.naming_style, NamingStyle::PascalCase);
    }

    #[test]
    fn test_invalid_indent_is_rejected() {
        let err = ConfigManager::from_toml_str("[output]\nindent = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "output.indent"));
    }

    #[test]
    fn test_invalid_eol_is_rejected() {
        let err = ConfigManager::from_toml_str("[output]\neol = \"unix\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidToml { .. }));
    }

    #[test]
    fn test_default_config_content_parses() {
        let options = ConfigManager::from_toml_str(ConfigManager::default_config_content()).unwrap();
        assert_eq!(options, Options::default());
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let options = ConfigManager::load(Some(&dir.path().join("missing.toml"))).unwrap();
        assert_eq!(options, Options::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nindent = 8").unwrap();

        let options = ConfigManager::load(Some(file.path())).unwrap();
        assert_eq!(options.output.indent, 8);
        assert_eq!(options.indent_str(), "        ");
    }

    #[test]
    fn test_load_invalid_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output").unwrap();

        let err = ConfigManager::load(Some(file.path())).unwrap_err();
        match err {
            ConfigError::InvalidToml { path, .. } => assert_eq!(path, file.path()),
            other => panic!("unexpected error: {other}"),
        }
    }
}
