//! Model discovery and the model registry.
//!
//! Discovery keeps the directory-scan contract (recursively enumerate the
//! `models/` subtree) but as an explicit function returning dotted module
//! identifiers; turning an identifier into descriptors goes through the
//! resolver like every other component.

use crate::error::ComposeError;
use manifold_domain::constants::MODELS_DIR;
use manifold_domain::model::ModelDescriptor;
use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// The model registry: module identifier → descriptors, populated exclusively
/// during the model-loading stage.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    modules: BTreeMap<String, Vec<ModelDescriptor>>,
}

impl ModelRegistry {
    pub(crate) fn merge(&mut self, module: impl Into<String>, models: Vec<ModelDescriptor>) {
        self.modules.entry(module.into()).or_default().extend(models);
    }

    #[must_use]
    pub fn contains_module(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }

    #[must_use]
    pub fn models(&self, id: &str) -> Option<&[ModelDescriptor]> {
        self.modules.get(id).map(Vec::as_slice)
    }

    pub fn modules(&self) -> impl Iterator<Item = (&str, &[ModelDescriptor])> {
        self.modules.iter().map(|(id, models)| (id.as_str(), models.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Recursively enumerates model source files under `<root>/models` and maps
/// them to dotted module identifiers (`models/billing/mod.rs` collapses to
/// `models.billing`). Returns a sorted list; a missing subtree is simply
/// empty.
///
/// # Errors
/// [`ComposeError::ModelScan`] when the walk fails below an existing root.
pub fn scan_model_sources(root: &Path) -> Result<Vec<String>, ComposeError> {
    let base = root.join(MODELS_DIR);
    if !base.is_dir() {
        return Ok(Vec::new());
    }

    let mut ids = Vec::new();
    for entry in WalkDir::new(&base).follow_links(false) {
        let entry = entry.map_err(|e| {
            let message = e.to_string();
            ComposeError::ModelScan {
                path: base.clone(),
                source: e.into_io_error().unwrap_or_else(|| io::Error::other(message)),
            }
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("rs") {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path).with_extension("");
        let mut segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        // A mod.rs names its directory, like the source's __init__ collapsing.
        if segments.last().is_some_and(|s| s == "mod") {
            segments.pop();
        }
        ids.push(segments.join("."));
    }

    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn scan_collapses_mod_rs_and_sorts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let base = dir.path().join("models");
        fs::create_dir_all(base.join("billing")).expect("mkdir");
        fs::write(base.join("user.rs"), "").expect("write");
        fs::write(base.join("billing").join("mod.rs"), "").expect("write");
        fs::write(base.join("notes.txt"), "").expect("write");

        let ids = scan_model_sources(dir.path()).expect("scan");
        assert_eq!(ids, vec!["models.billing".to_owned(), "models.user".to_owned()]);
    }

    #[test]
    fn missing_subtree_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(scan_model_sources(dir.path()).expect("scan").is_empty());
    }

    #[test]
    fn registry_merges_by_module() {
        let mut registry = ModelRegistry::default();
        registry.merge("models.user", vec![ModelDescriptor::new("User", ["id", "email"])]);
        registry.merge("models.user", vec![ModelDescriptor::new("Log", ["id", "login_at"])]);

        assert!(registry.contains_module("models.user"));
        assert_eq!(registry.models("models.user").map(<[_]>::len), Some(2));
    }
}
