use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const ANY_FILE_PATTERN: &str = "**/*";

pub type GlobResult<T> = std::result::Result<T, GlobError>;

#[derive(Debug, Error)]
pub enum GlobError {
    #[error("content pattern #{index} is empty")]
    Empty { index: usize },
    #[error("content pattern `{pattern}` uses `\\` separators; use `/` instead")]
    Backslash { pattern: String },
    #[error("content pattern `{pattern}` is absolute but `relative` is enabled")]
    MixedAbsolute { pattern: String },
    #[error("invalid content pattern `{pattern}`")]
    Syntax {
        pattern: String,
        source: globset::Error,
    },
    #[error("project root is not an absolute path: {path}")]
    RelativeRoot { path: PathBuf },
    #[error("failed to build content matcher")]
    Matcher(#[from] globset::Error),
}

/// The `content` key of a project configuration.
///
/// Either a bare list of patterns, or `{ "relative": bool, "files": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentConfig {
    Files(Vec<String>),
    Structured {
        #[serde(default)]
        relative: bool,
        files: Vec<String>,
    },
}

impl ContentConfig {
    pub fn relative(&self) -> bool {
        match self {
            Self::Files(_) => false,
            Self::Structured { relative, .. } => *relative,
        }
    }

    pub fn files(&self) -> &[String] {
        match self {
            Self::Files(files) | Self::Structured { files, .. } => files,
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self::Files(Vec::new())
    }
}

impl From<&GlobSpec> for ContentConfig {
    fn from(spec: &GlobSpec) -> Self {
        Self::Structured {
            relative: spec.relative,
            files: spec.patterns.clone(),
        }
    }
}

/// Normalized content-scan descriptor handed to the file scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobSpec {
    base_path: PathBuf,
    relative: bool,
    patterns: Vec<String>,
}

impl GlobSpec {
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn relative(&self) -> bool {
        self.relative
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Patterns joined onto the base path; absolute patterns are returned as-is.
    /// Glob metacharacters in the base path are escaped.
    pub fn anchored_patterns(&self) -> Vec<String> {
        let base = self.base_path.to_string_lossy().replace('\\', "/");
        let base = globset::escape(base.trim_end_matches('/'));
        self.patterns
            .iter()
            .map(|pattern| {
                if pattern.starts_with('/') {
                    pattern.clone()
                } else {
                    format!("{base}/{pattern}")
                }
            })
            .collect()
    }

    /// Compiles the anchored patterns into a matcher where `*` never crosses `/`.
    pub fn matcher(&self) -> GlobResult<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in self.anchored_patterns() {
            let glob = GlobBuilder::new(&pattern)
                .literal_separator(true)
                .build()
                .map_err(|source| GlobError::Syntax { pattern, source })?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }
}

pub fn normalize(content: &ContentConfig, project_root: &Path) -> GlobResult<GlobSpec> {
    if !project_root.is_absolute() {
        return Err(GlobError::RelativeRoot {
            path: project_root.to_path_buf(),
        });
    }

    let relative = content.relative();
    let patterns = content
        .files()
        .iter()
        .enumerate()
        .map(|(index, pattern)| normalize_pattern(index, pattern, relative))
        .collect::<GlobResult<Vec<_>>>()?;

    if patterns.is_empty() {
        tracing::warn!("no content patterns configured; nothing will be scanned");
    }

    let base_path = clean_root(project_root);
    tracing::debug!(
        base = %base_path.display(),
        relative,
        count = patterns.len(),
        "normalized content patterns"
    );
    Ok(GlobSpec {
        base_path,
        relative,
        patterns,
    })
}

fn normalize_pattern(index: usize, raw: &str, relative: bool) -> GlobResult<String> {
    if raw.trim().is_empty() {
        return Err(GlobError::Empty { index });
    }
    if raw.contains('\\') {
        return Err(GlobError::Backslash {
            pattern: raw.to_string(),
        });
    }
    if relative && raw.starts_with('/') {
        return Err(GlobError::MixedAbsolute {
            pattern: raw.to_string(),
        });
    }

    let pattern = clean_pattern(raw);
    GlobBuilder::new(&pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| GlobError::Syntax {
            pattern: raw.to_string(),
            source,
        })?;
    Ok(pattern)
}

/// Drops `.` segments and empty segments; a directory pattern (trailing `/`)
/// is widened to every file below it.
fn clean_pattern(pattern: &str) -> String {
    let absolute = pattern.starts_with('/');
    let segments: Vec<&str> = pattern
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();

    let mut cleaned = segments.join("/");
    if pattern.ends_with('/') || cleaned.is_empty() {
        if cleaned.is_empty() {
            cleaned.push_str(ANY_FILE_PATTERN);
        } else {
            cleaned.push('/');
            cleaned.push_str(ANY_FILE_PATTERN);
        }
    }

    if absolute {
        format!("/{cleaned}")
    } else {
        cleaned
    }
}

fn clean_root(root: &Path) -> PathBuf {
    root.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structured(relative: bool, files: &[&str]) -> ContentConfig {
        ContentConfig::Structured {
            relative,
            files: files.iter().map(|file| file.to_string()).collect(),
        }
    }

    #[test]
    fn relative_content_strips_leading_dot_segments() {
        let spec = normalize(
            &structured(true, &["*.html", "./src/**/*.ext"]),
            Path::new("/proj"),
        )
        .expect("relative content should normalize");

        assert_eq!(spec.base_path(), Path::new("/proj"));
        assert!(spec.relative());
        assert_eq!(spec.patterns(), ["*.html", "src/**/*.ext"]);
    }

    #[test]
    fn bare_list_defaults_to_non_relative_and_keeps_absolute_patterns() {
        let content = ContentConfig::Files(vec![
            "/shared/components/**/*.html".to_string(),
            "src//pages/./*.html".to_string(),
        ]);
        let spec = normalize(&content, Path::new("/proj")).expect("bare list should normalize");

        assert!(!spec.relative());
        assert_eq!(
            spec.patterns(),
            ["/shared/components/**/*.html", "src/pages/*.html"]
        );
    }

    #[test]
    fn normalize_rejects_empty_and_whitespace_patterns() {
        let err = normalize(&structured(true, &["*.html", "   "]), Path::new("/proj"))
            .expect_err("whitespace pattern should fail");
        assert!(matches!(err, GlobError::Empty { index: 1 }));

        let err = normalize(&structured(false, &[""]), Path::new("/proj"))
            .expect_err("empty pattern should fail");
        assert!(matches!(err, GlobError::Empty { index: 0 }));
    }

    #[test]
    fn normalize_rejects_backslash_separators() {
        let err = normalize(&structured(true, &["src\\**\\*.rs"]), Path::new("/proj"))
            .expect_err("backslash pattern should fail");
        assert!(matches!(err, GlobError::Backslash { ref pattern } if pattern == "src\\**\\*.rs"));
    }

    #[test]
    fn normalize_rejects_absolute_patterns_when_relative() {
        let err = normalize(
            &structured(true, &["src/**/*.rs", "/etc/**/*.html"]),
            Path::new("/proj"),
        )
        .expect_err("mixed relative and absolute should fail");
        assert!(matches!(err, GlobError::MixedAbsolute { ref pattern } if pattern == "/etc/**/*.html"));
    }

    #[test]
    fn normalize_rejects_unbalanced_glob_syntax() {
        let err = normalize(&structured(true, &["src/**/*.{rs,html"]), Path::new("/proj"))
            .expect_err("unclosed brace should fail");
        assert!(matches!(err, GlobError::Syntax { .. }));
    }

    #[test]
    fn normalize_requires_absolute_project_root() {
        let err = normalize(&structured(true, &["*.html"]), Path::new("proj"))
            .expect_err("relative root should fail");
        assert!(matches!(err, GlobError::RelativeRoot { .. }));
    }

    #[test]
    fn directory_patterns_widen_to_every_file() {
        let spec = normalize(&structured(true, &["templates/", "./"]), Path::new("/proj/./"))
            .expect("directory patterns should normalize");
        assert_eq!(spec.base_path(), Path::new("/proj"));
        assert_eq!(spec.patterns(), ["templates/**/*", "**/*"]);
    }

    #[test]
    fn renormalizing_a_spec_is_stable() {
        let spec = normalize(
            &structured(true, &["./index.html", "./src/**/*.rs", "docs/"]),
            Path::new("/proj"),
        )
        .expect("first pass should normalize");
        let again = normalize(&ContentConfig::from(&spec), spec.base_path())
            .expect("second pass should normalize");
        assert_eq!(spec, again);
    }

    #[test]
    fn matcher_anchors_patterns_to_base_path() {
        let spec = normalize(
            &structured(true, &["*.html", "./src/**/*.rs"]),
            Path::new("/proj"),
        )
        .expect("content should normalize");

        assert_eq!(
            spec.anchored_patterns(),
            ["/proj/*.html", "/proj/src/**/*.rs"]
        );

        let matcher = spec.matcher().expect("matcher should build");
        assert!(matcher.is_match("/proj/index.html"));
        assert!(matcher.is_match("/proj/src/app/terminal.rs"));
        assert!(!matcher.is_match("/proj/src/index.html"));
        assert!(!matcher.is_match("/other/index.html"));
    }

    #[test]
    fn matcher_treats_base_path_metacharacters_literally() {
        let spec = normalize(&structured(true, &["*.html"]), Path::new("/srv/site[1]"))
            .expect("content should normalize");
        let matcher = spec.matcher().expect("matcher should build");
        assert!(matcher.is_match("/srv/site[1]/index.html"));
        assert!(!matcher.is_match("/srv/site1/index.html"));

        let spec = normalize(&structured(true, &["*.html"]), Path::new("/srv/a{b"))
            .expect("content should normalize");
        let matcher = spec.matcher().expect("brace in root should not break the matcher");
        assert!(matcher.is_match("/srv/a{b/index.html"));
    }

    #[test]
    fn content_config_parses_both_shapes() {
        let bare: ContentConfig =
            serde_json::from_str(r#"["*.html"]"#).expect("bare list should parse");
        assert_eq!(bare, ContentConfig::Files(vec!["*.html".to_string()]));

        let nested: ContentConfig =
            serde_json::from_str(r#"{"relative": true, "files": ["*.html"]}"#)
                .expect("structured content should parse");
        assert!(nested.relative());
        assert_eq!(nested.files(), ["*.html"]);

        let implicit: ContentConfig = serde_json::from_str(r#"{"files": ["*.html"]}"#)
            .expect("relative flag should default");
        assert!(!implicit.relative());
    }
}
