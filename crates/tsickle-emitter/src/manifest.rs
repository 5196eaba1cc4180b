//! Module id ↔ file name mapping produced by goog.module output.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModulesManifest {
    module_to_file_name: IndexMap<String, String>,
    /// File name → ids of the modules it references, first reference first.
    referenced_modules: IndexMap<String, IndexSet<String>>,
}

impl ModulesManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_module(&mut self, file_name: impl Into<String>, module: impl Into<String>) {
        let file_name = file_name.into();
        self.module_to_file_name.insert(module.into(), file_name.clone());
        self.referenced_modules.entry(file_name).or_default();
    }

    pub fn add_referenced_module(&mut self, file_name: impl Into<String>, module: impl Into<String>) {
        self.referenced_modules
            .entry(file_name.into())
            .or_default()
            .insert(module.into());
    }

    pub fn merge(&mut self, other: ModulesManifest) {
        self.module_to_file_name.extend(other.module_to_file_name);
        for (file, modules) in other.referenced_modules {
            self.referenced_modules.entry(file).or_default().extend(modules);
        }
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.module_to_file_name.keys().map(String::as_str)
    }

    pub fn file_name_from_module_name(&self, module: &str) -> Option<&str> {
        self.module_to_file_name.get(module).map(String::as_str)
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.referenced_modules.keys().map(String::as_str)
    }

    pub fn referenced_modules(&self, file_name: &str) -> Vec<&str> {
        self.referenced_modules
            .get(file_name)
            .map(|modules| modules.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.module_to_file_name.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/manifest.rs"]
mod tests;
