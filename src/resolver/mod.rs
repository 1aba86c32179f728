//! Top-level resolution: content globs, then the theme, then animations.
//!
//! Each stage either advances the [`ResolveMachine`] or moves it to
//! `Failed(stage)`; the first failure is returned and no partial
//! [`ResolvedConfig`] is ever built.

mod error;
mod machine;

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

use crate::animation::{self, Animation, AnimationTable, KeyframeSet};
use crate::config::RawConfig;
use crate::content::{self, GlobSpec};
use crate::theme::{self, default_theme, ThemeResult, ThemeTree, TokenTable};

pub use error::{ErrorKind, ResolveError, ResolveResult, StageError, StateError, StateResult};
pub use machine::{ResolveEvent, ResolveMachine, ResolveStage, ResolveState, StateTransition};

/// The immutable outcome of one resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    content: GlobSpec,
    theme: ThemeTree,
    colors: TokenTable,
    #[serde(flatten)]
    animations: AnimationTable,
    plugins: Vec<serde_json::Value>,
    #[serde(flatten)]
    options: IndexMap<String, serde_json::Value>,
}

impl ResolvedConfig {
    pub fn content(&self) -> &GlobSpec {
        &self.content
    }

    /// The merged theme with every `extend` layer folded in.
    pub fn theme(&self) -> &ThemeTree {
        &self.theme
    }

    pub fn colors(&self) -> &TokenTable {
        &self.colors
    }

    pub fn keyframes(&self) -> &IndexMap<String, KeyframeSet> {
        self.animations.keyframes()
    }

    pub fn animations(&self) -> &IndexMap<String, Animation> {
        self.animations.animations()
    }

    pub fn plugins(&self) -> &[serde_json::Value] {
        &self.plugins
    }

    /// Framework keys such as `darkMode`, passed through untouched.
    pub fn options(&self) -> &IndexMap<String, serde_json::Value> {
        &self.options
    }
}

/// Resolves `raw` against the process-wide default theme.
pub fn resolve(raw: &RawConfig, project_root: &Path) -> ResolveResult<ResolvedConfig> {
    resolve_with_defaults(raw, project_root, default_theme())
}

pub fn resolve_with_defaults(
    raw: &RawConfig,
    project_root: &Path,
    defaults: &ThemeTree,
) -> ResolveResult<ResolvedConfig> {
    let mut machine = ResolveMachine::new();

    let content = run_stage(
        &mut machine,
        ResolveStage::Content,
        content::normalize(&raw.content, project_root),
    )?;
    let (theme, colors) = run_stage(
        &mut machine,
        ResolveStage::Theme,
        merge_theme(defaults, &raw.theme),
    )?;
    let animations = run_stage(
        &mut machine,
        ResolveStage::Animations,
        animation::compile(&theme),
    )?;
    machine.transition(ResolveEvent::Finish)?;

    Ok(ResolvedConfig {
        content,
        theme,
        colors,
        animations,
        plugins: raw.plugins.clone(),
        options: raw.options.clone(),
    })
}

fn merge_theme(defaults: &ThemeTree, user: &ThemeTree) -> ThemeResult<(ThemeTree, TokenTable)> {
    let merged = theme::merge(defaults, user)?;
    let colors = TokenTable::colors(&merged)?;
    Ok((merged, colors))
}

fn run_stage<T, E>(
    machine: &mut ResolveMachine,
    stage: ResolveStage,
    outcome: Result<T, E>,
) -> ResolveResult<T>
where
    E: Into<StageError>,
{
    match outcome {
        Ok(value) => {
            machine.transition(stage.completion())?;
            Ok(value)
        }
        Err(err) => {
            let source = err.into();
            tracing::warn!(%stage, error = %source, "configuration resolution failed");
            machine.transition(ResolveEvent::Fail(stage))?;
            Err(ResolveError::Stage { stage, source })
        }
    }
}
