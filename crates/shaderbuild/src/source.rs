//! Shader source loading.
//!
//! `ShaderSourceLoader` turns a resource name into an owned
//! [`ShaderStagePayload`]. Names are resolved against an ordered list of search
//! roots so a project directory can shadow bundled shaders, the same way shader
//! packs are looked up across config, data, and share directories.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::BuildError;
use crate::types::StageKind;

/// Owned shader text for exactly one stage.
///
/// Created by the loader and consumed by [`crate::compile_stage`], which drops
/// it once the stage object exists.
#[derive(Debug, PartialEq, Eq)]
pub struct ShaderStagePayload {
    kind: StageKind,
    name: String,
    text: String,
}

impl ShaderStagePayload {
    /// Wraps in-memory source text, e.g. a shader embedded with `include_str!`.
    pub fn from_source(
        kind: StageKind,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self, BuildError> {
        let name = name.into();
        let text = normalize_line_endings(text.into());
        if text.is_empty() {
            return Err(BuildError::ResourceEmpty { name });
        }
        Ok(Self { kind, name, text })
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShaderSourceLoader {
    roots: Vec<PathBuf>,
}

impl ShaderSourceLoader {
    /// Builds a loader searching `roots` in order. With no roots, relative
    /// names resolve against the working directory.
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Returns the first existing file that `name` refers to.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let path = Path::new(name);
        if path.is_absolute() || self.roots.is_empty() {
            return path.is_file().then(|| path.to_path_buf());
        }
        self.roots
            .iter()
            .map(|root| root.join(path))
            .find(|candidate| candidate.is_file())
    }

    /// Reads `name` in full.
    ///
    /// Missing or unreadable resources (including non-UTF-8 text) yield
    /// [`BuildError::ResourceUnavailable`]; zero-length resources yield
    /// [`BuildError::ResourceEmpty`].
    pub fn load(&self, kind: StageKind, name: &str) -> Result<ShaderStagePayload, BuildError> {
        let Some(path) = self.resolve(name) else {
            tracing::debug!(name, roots = ?self.roots, "shader resource not found");
            return Err(BuildError::ResourceUnavailable {
                name: name.to_string(),
                source: None,
            });
        };

        let bytes = fs::read(&path).map_err(|err| BuildError::ResourceUnavailable {
            name: name.to_string(),
            source: Some(err),
        })?;
        let text = String::from_utf8(bytes).map_err(|err| BuildError::ResourceUnavailable {
            name: name.to_string(),
            source: Some(io::Error::new(io::ErrorKind::InvalidData, err)),
        })?;

        tracing::debug!(name, path = %path.display(), bytes = text.len(), stage = %kind, "loaded shader source");
        ShaderStagePayload::from_source(kind, name, text)
    }
}

fn normalize_line_endings(text: String) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_full_contents_from_first_matching_root() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(second.path().join("water.vert"), "#version 410 core\nvoid main() {}\n").unwrap();

        let loader = ShaderSourceLoader::new(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        let payload = loader.load(StageKind::Vertex, "water.vert").unwrap();
        assert_eq!(payload.kind(), StageKind::Vertex);
        assert_eq!(payload.name(), "water.vert");
        assert_eq!(payload.text(), "#version 410 core\nvoid main() {}\n");
    }

    #[test]
    fn earlier_roots_shadow_later_ones() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(first.path().join("sky.frag"), "first").unwrap();
        fs::write(second.path().join("sky.frag"), "second").unwrap();

        let loader = ShaderSourceLoader::new(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        assert_eq!(loader.load(StageKind::Fragment, "sky.frag").unwrap().text(), "first");
    }

    #[test]
    fn missing_resource_is_unavailable() {
        let root = TempDir::new().unwrap();
        let loader = ShaderSourceLoader::new(vec![root.path().to_path_buf()]);
        let err = loader.load(StageKind::Vertex, "nope.vert").unwrap_err();
        assert!(matches!(err, BuildError::ResourceUnavailable { ref name, .. } if name == "nope.vert"));
    }

    #[test]
    fn empty_resource_is_reported_separately() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("empty.frag"), "").unwrap();
        let loader = ShaderSourceLoader::new(vec![root.path().to_path_buf()]);
        let err = loader.load(StageKind::Fragment, "empty.frag").unwrap_err();
        assert!(matches!(err, BuildError::ResourceEmpty { .. }));
    }

    #[test]
    fn non_utf8_resource_is_unavailable_with_cause() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("binary.frag"), [0xff, 0xfe, 0x00]).unwrap();
        let loader = ShaderSourceLoader::new(vec![root.path().to_path_buf()]);
        let err = loader.load(StageKind::Fragment, "binary.frag").unwrap_err();
        assert!(matches!(
            err,
            BuildError::ResourceUnavailable { source: Some(_), .. }
        ));
    }

    #[test]
    fn absolute_names_bypass_roots() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("abs.tesc");
        fs::write(&path, "layout(vertices = 3) out;").unwrap();
        let loader = ShaderSourceLoader::new(vec![PathBuf::from("/definitely/not/here")]);
        let payload = loader
            .load(StageKind::TessControl, path.to_str().unwrap())
            .unwrap();
        assert_eq!(payload.len(), "layout(vertices = 3) out;".len());
    }

    #[test]
    fn crlf_line_endings_are_normalised() {
        let payload =
            ShaderStagePayload::from_source(StageKind::Vertex, "inline", "a\r\nb\r\n").unwrap();
        assert_eq!(payload.text(), "a\nb\n");
    }
}
