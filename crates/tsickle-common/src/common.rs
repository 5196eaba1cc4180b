//! Compiler options the pipeline reads from the external program.
//!
//! Only the handful of options that change emitted output are modelled;
//! everything else belongs to the front end.

use serde::{Deserialize, Serialize};

/// Output module system.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    #[default]
    #[serde(alias = "commonjs")]
    CommonJS,
    #[serde(alias = "es2015", alias = "es6")]
    ES2015,
    #[serde(alias = "esnext")]
    ESNext,
}

impl ModuleKind {
    /// ES module syntax (`import` / `export`) is preserved in the output.
    pub const fn is_es_module(self) -> bool {
        matches!(self, Self::ES2015 | Self::ESNext)
    }
}

/// Language level of the emitted JavaScript.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScriptTarget {
    #[serde(alias = "es5")]
    ES5,
    #[default]
    #[serde(alias = "es2015", alias = "es6")]
    ES2015,
    #[serde(alias = "es2017")]
    ES2017,
    #[serde(alias = "es2020")]
    ES2020,
    #[serde(alias = "esnext")]
    ESNext,
}

impl ScriptTarget {
    pub const fn supports_es2015(self) -> bool {
        !matches!(self, Self::ES5)
    }
}

/// The subset of `tsconfig` compiler options that influences emit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerOptions {
    pub module: ModuleKind,
    pub target: ScriptTarget,
    /// Emit a `.d.ts` per source file.
    pub declaration: bool,
    /// Keep runtime objects for `const enum` declarations.
    pub preserve_const_enums: bool,
    /// Import helpers from `tslib` instead of inlining them.
    pub import_helpers: bool,
    pub root_dir: Option<String>,
    pub out_dir: Option<String>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            module: ModuleKind::CommonJS,
            target: ScriptTarget::ES2015,
            declaration: false,
            preserve_const_enums: false,
            import_helpers: true,
            root_dir: None,
            out_dir: None,
        }
    }
}

impl CompilerOptions {
    pub fn with_module(mut self, module: ModuleKind) -> Self {
        self.module = module;
        self
    }

    pub fn with_target(mut self, target: ScriptTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_declaration(mut self, declaration: bool) -> Self {
        self.declaration = declaration;
        self
    }

    pub fn with_preserve_const_enums(mut self, preserve: bool) -> Self {
        self.preserve_const_enums = preserve;
        self
    }

    pub fn with_root_dir(mut self, root_dir: impl Into<String>) -> Self {
        self.root_dir = Some(root_dir.into());
        self
    }

    pub fn with_out_dir(mut self, out_dir: impl Into<String>) -> Self {
        self.out_dir = Some(out_dir.into());
        self
    }
}

#[cfg(test)]
#[path = "../tests/common.rs"]
mod tests;
