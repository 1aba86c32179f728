//! Compiles the `keyframes` and `animation` groups of a merged theme.
//!
//! Keyframe sets are parsed first; every animation is then checked against
//! them so a dangling reference fails resolution instead of producing a
//! class that animates nothing.

mod keyframes;
mod spec;

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use crate::theme::{ThemeTree, ThemeValue};

pub use keyframes::{
    css_property_name, KeyframeOffset, KeyframeSelector, KeyframeSet, KeyframeStep,
};
pub use spec::{Animation, AnimationDirection, AnimationSpec, FillMode, IterationCount, PlayState};

const KEYFRAMES_GROUP: &str = "keyframes";
const ANIMATION_GROUP: &str = "animation";

pub type AnimationResult<T> = std::result::Result<T, AnimationError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnimationError {
    #[error("invalid keyframes at `{path}`: {reason}")]
    InvalidKeyframe { path: String, reason: String },
    #[error("animation `{animation}` references unknown keyframes `{keyframes}`")]
    UnresolvedReference { animation: String, keyframes: String },
    #[error("invalid animation `{name}` (`{value}`): {reason}")]
    InvalidAnimation {
        name: String,
        value: String,
        reason: String,
    },
}

/// Compiled keyframe sets and animations, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnimationTable {
    keyframes: IndexMap<String, KeyframeSet>,
    animations: IndexMap<String, Animation>,
}

impl AnimationTable {
    pub fn keyframes(&self) -> &IndexMap<String, KeyframeSet> {
        &self.keyframes
    }

    pub fn animations(&self) -> &IndexMap<String, Animation> {
        &self.animations
    }

    pub fn get(&self, name: &str) -> Option<&Animation> {
        self.animations.get(name)
    }
}

pub fn compile(theme: &ThemeTree) -> AnimationResult<AnimationTable> {
    let keyframes = match theme.get(KEYFRAMES_GROUP) {
        None => IndexMap::new(),
        Some(ThemeValue::Group(group)) => keyframes::parse_keyframes(group)?,
        Some(_) => {
            return Err(AnimationError::InvalidKeyframe {
                path: KEYFRAMES_GROUP.to_string(),
                reason: "must map keyframe set names to selectors".to_string(),
            })
        }
    };

    let entries = match theme.get(ANIMATION_GROUP) {
        None => None,
        Some(ThemeValue::Group(group)) => Some(group),
        Some(other) => {
            return Err(AnimationError::InvalidAnimation {
                name: ANIMATION_GROUP.to_string(),
                value: describe(other),
                reason: "must map animation names to declarations".to_string(),
            })
        }
    };

    let mut animations = IndexMap::new();
    for (name, value) in entries.into_iter().flat_map(|group| group.iter()) {
        let animation = compile_animation(name, value)?;
        if let Animation::Keyframes(spec) = &animation {
            if !keyframes.contains_key(spec.keyframes()) {
                return Err(AnimationError::UnresolvedReference {
                    animation: name.to_string(),
                    keyframes: spec.keyframes().to_string(),
                });
            }
        }
        animations.insert(name.to_string(), animation);
    }

    tracing::debug!(
        keyframes = keyframes.len(),
        animations = animations.len(),
        "compiled animations"
    );
    Ok(AnimationTable {
        keyframes,
        animations,
    })
}

fn compile_animation(name: &str, value: &ThemeValue) -> AnimationResult<Animation> {
    let parsed = match value {
        ThemeValue::Token(token) => spec::parse_shorthand(token.as_str()),
        ThemeValue::Group(fields) => spec::parse_structured(fields),
        ThemeValue::List(_) => Err("expected a shorthand string or an object".to_string()),
    };
    parsed.map_err(|reason| AnimationError::InvalidAnimation {
        name: name.to_string(),
        value: describe(value),
        reason,
    })
}

fn describe(value: &ThemeValue) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("{value:?}"))
}
