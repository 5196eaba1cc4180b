//! JSON build configuration.
//!
//! ```json
//! {
//!   "compilerOptions": { "module": "commonjs", "declaration": true },
//!   "tsickle": { "googmodule": true, "transformTypesToClosure": true }
//! }
//! ```
//!
//! Unknown keys are ignored and missing ones keep their defaults, so the
//! text of a plain `tsconfig.json` parses as well. Reading it is up to the
//! caller.

use serde::Deserialize;
use thiserror::Error;
use tsickle_common::CompilerOptions;
use tsickle_emitter::{HostOptions, TsickleHost};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TsickleConfig {
    pub compiler_options: CompilerOptions,
    #[serde(rename = "tsickle")]
    pub host: HostOptions,
}

impl TsickleConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// A host with these options and default callbacks.
    pub fn host(&self) -> TsickleHost {
        TsickleHost::new(self.host.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsickle_common::ModuleKind;

    #[test]
    fn loads_compiler_and_host_options() {
        let config = TsickleConfig::from_json(
            r#"{
                "compilerOptions": { "module": "es2015", "declaration": true, "outDir": "dist" },
                "tsickle": { "googmodule": true, "baseDir": "/work" },
                "include": ["src"]
            }"#,
        )
        .unwrap();
        assert_eq!(config.compiler_options.module, ModuleKind::ES2015);
        assert!(config.compiler_options.declaration);
        assert_eq!(config.compiler_options.out_dir.as_deref(), Some("dist"));
        assert!(config.host.googmodule);
        assert!(!config.host.transform_types_to_closure);
        assert_eq!(config.host().options.base_dir, "/work");
    }

    #[test]
    fn empty_object_is_all_defaults() {
        assert_eq!(TsickleConfig::from_json("{}").unwrap(), TsickleConfig::default());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = TsickleConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid configuration:"), "{err}");
    }
}
