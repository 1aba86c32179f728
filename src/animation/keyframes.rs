use std::fmt;

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use super::{AnimationError, AnimationResult};
use crate::theme::{ThemeTree, ThemeValue};

/// One point on an animation timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyframeOffset {
    From,
    To,
    Percent(f64),
}

impl KeyframeOffset {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("from") {
            return Some(Self::From);
        }
        if raw.eq_ignore_ascii_case("to") {
            return Some(Self::To);
        }
        let percent = raw.strip_suffix('%')?.parse::<f64>().ok()?;
        (percent.is_finite() && (0.0..=100.0).contains(&percent)).then_some(Self::Percent(percent))
    }

    /// Position on the timeline as a fraction in `0.0..=1.0`.
    pub fn progress(self) -> f64 {
        match self {
            Self::From => 0.0,
            Self::To => 1.0,
            Self::Percent(percent) => percent / 100.0,
        }
    }
}

impl fmt::Display for KeyframeOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::From => f.write_str("from"),
            Self::To => f.write_str("to"),
            Self::Percent(percent) => write!(f, "{percent}%"),
        }
    }
}

/// Comma-separated offsets sharing one block, e.g. `0%, 100%`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeSelector(Vec<KeyframeOffset>);

impl KeyframeSelector {
    pub fn parse(raw: &str) -> Option<Self> {
        raw.split(',')
            .map(KeyframeOffset::parse)
            .collect::<Option<Vec<_>>>()
            .map(Self)
    }

    pub fn offsets(&self) -> &[KeyframeOffset] {
        &self.0
    }
}

impl fmt::Display for KeyframeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, offset) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{offset}")?;
        }
        Ok(())
    }
}

impl Serialize for KeyframeSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyframeStep {
    selector: KeyframeSelector,
    declarations: IndexMap<String, String>,
}

impl KeyframeStep {
    pub fn selector(&self) -> &KeyframeSelector {
        &self.selector
    }

    /// CSS declarations with kebab-case property names.
    pub fn declarations(&self) -> &IndexMap<String, String> {
        &self.declarations
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyframeSet {
    name: String,
    steps: Vec<KeyframeStep>,
}

impl KeyframeSet {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[KeyframeStep] {
        &self.steps
    }
}

pub(super) fn parse_keyframes(group: &ThemeTree) -> AnimationResult<IndexMap<String, KeyframeSet>> {
    group
        .iter()
        .map(|(name, value)| -> AnimationResult<(String, KeyframeSet)> {
            let set = parse_set(name, value)?;
            Ok((name.to_string(), set))
        })
        .collect()
}

fn parse_set(name: &str, value: &ThemeValue) -> AnimationResult<KeyframeSet> {
    let path = format!("keyframes.{name}");
    let Some(steps) = value.as_group() else {
        return Err(invalid(&path, "a keyframe set must map selectors to properties"));
    };
    if steps.is_empty() {
        return Err(invalid(&path, "a keyframe set needs at least one selector"));
    }

    let steps = steps
        .iter()
        .map(|(selector, properties)| parse_step(&path, selector, properties))
        .collect::<AnimationResult<Vec<_>>>()?;
    Ok(KeyframeSet {
        name: name.to_string(),
        steps,
    })
}

fn parse_step(set_path: &str, raw: &str, value: &ThemeValue) -> AnimationResult<KeyframeStep> {
    let path = format!("{set_path}.{raw}");
    let selector = KeyframeSelector::parse(raw).ok_or_else(|| {
        invalid(
            &path,
            "selectors must be percentages between 0% and 100% or `from`/`to`",
        )
    })?;
    let Some(properties) = value.as_group() else {
        return Err(invalid(&path, "a keyframe step must be a map of properties"));
    };

    let mut declarations = IndexMap::with_capacity(properties.len());
    for (property, value) in properties.iter() {
        let Some(token) = value.as_token() else {
            return Err(invalid(
                &format!("{path}.{property}"),
                "property values must be plain tokens",
            ));
        };
        if property.trim().is_empty() {
            return Err(invalid(&path, "property names must not be empty"));
        }
        match declarations.entry(css_property_name(property)) {
            Entry::Occupied(entry) => {
                let first = properties
                    .keys()
                    .find(|key| css_property_name(key) == *entry.key())
                    .unwrap_or(property);
                return Err(invalid(
                    &path,
                    &format!("`{first}` and `{property}` both set `{}`", entry.key()),
                ));
            }
            Entry::Vacant(entry) => {
                entry.insert(token.to_string());
            }
        }
    }

    Ok(KeyframeStep {
        selector,
        declarations,
    })
}

/// `animationTimingFunction` -> `animation-timing-function`; custom
/// properties are left alone.
pub fn css_property_name(name: &str) -> String {
    if name.starts_with("--") {
        return name.to_string();
    }
    let mut css = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            css.push('-');
            css.push(ch.to_ascii_lowercase());
        } else {
            css.push(ch);
        }
    }
    css
}

fn invalid(path: &str, reason: &str) -> AnimationError {
    AnimationError::InvalidKeyframe {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: serde_json::Value) -> ThemeTree {
        serde_json::from_value(value).expect("fixture should parse as a theme tree")
    }

    #[test]
    fn offsets_accept_percentages_and_keywords() {
        assert_eq!(KeyframeOffset::parse("from"), Some(KeyframeOffset::From));
        assert_eq!(KeyframeOffset::parse(" TO "), Some(KeyframeOffset::To));
        assert_eq!(
            KeyframeOffset::parse("50%"),
            Some(KeyframeOffset::Percent(50.0))
        );
        assert_eq!(
            KeyframeOffset::parse("12.5%"),
            Some(KeyframeOffset::Percent(12.5))
        );
        assert_eq!(KeyframeOffset::parse("50"), None);
        assert_eq!(KeyframeOffset::parse("150%"), None);
        assert_eq!(KeyframeOffset::parse("-1%"), None);
        assert_eq!(KeyframeOffset::parse("middle"), None);
    }

    #[test]
    fn selector_lists_keep_their_order() {
        let selector = KeyframeSelector::parse("75%, 100%").expect("list should parse");
        assert_eq!(
            selector.offsets(),
            [KeyframeOffset::Percent(75.0), KeyframeOffset::Percent(100.0)]
        );
        assert_eq!(selector.to_string(), "75%, 100%");
        assert!(KeyframeSelector::parse("0%,").is_none());
    }

    #[test]
    fn parse_keyframes_builds_css_declarations() {
        let group = tree(json!({
            "bounce": {
                "0%, 100%": {
                    "transform": "translateY(-25%)",
                    "animationTimingFunction": "cubic-bezier(0.8,0,1,1)"
                }
            },
            "blink": { "50%": { "opacity": 0 } }
        }));

        let sets = parse_keyframes(&group).expect("keyframes should parse");
        assert_eq!(sets.keys().collect::<Vec<_>>(), ["bounce", "blink"]);

        let bounce = &sets["bounce"];
        assert_eq!(bounce.name(), "bounce");
        let step = &bounce.steps()[0];
        assert_eq!(step.selector().to_string(), "0%, 100%");
        assert_eq!(
            step.declarations().get("animation-timing-function").map(String::as_str),
            Some("cubic-bezier(0.8,0,1,1)")
        );

        let blink = &sets["blink"].steps()[0];
        assert_eq!(blink.declarations().get("opacity").map(String::as_str), Some("0"));
    }

    #[test]
    fn properties_with_the_same_css_name_are_rejected() {
        let err = parse_keyframes(&tree(json!({
            "fade": {
                "to": {
                    "animationTimingFunction": "ease-in",
                    "animation-timing-function": "linear"
                }
            }
        })))
        .expect_err("two spellings of one property should fail");

        let AnimationError::InvalidKeyframe { path, reason } = err else {
            panic!("expected an invalid keyframe error");
        };
        assert_eq!(path, "keyframes.fade.to");
        assert!(reason.contains("animationTimingFunction"));
        assert!(reason.contains("`animation-timing-function`"));
    }

    #[test]
    fn empty_sets_and_bad_selectors_are_invalid() {
        let err = parse_keyframes(&tree(json!({ "fade": {} }))).expect_err("empty set should fail");
        assert!(matches!(err, AnimationError::InvalidKeyframe { ref path, .. } if path == "keyframes.fade"));

        let err = parse_keyframes(&tree(json!({ "fade": { "halfway": { "opacity": 0 } } })))
            .expect_err("unknown selector should fail");
        assert!(
            matches!(err, AnimationError::InvalidKeyframe { ref path, .. } if path == "keyframes.fade.halfway")
        );

        let err = parse_keyframes(&tree(json!({ "fade": "opacity 0" })))
            .expect_err("scalar set should fail");
        assert!(matches!(err, AnimationError::InvalidKeyframe { .. }));
    }

    #[test]
    fn nested_property_values_are_invalid() {
        let err = parse_keyframes(&tree(json!({
            "fade": { "to": { "opacity": { "value": 0 } } }
        })))
        .expect_err("nested property should fail");
        assert!(
            matches!(err, AnimationError::InvalidKeyframe { ref path, .. } if path == "keyframes.fade.to.opacity")
        );
    }

    #[test]
    fn property_names_become_kebab_case() {
        assert_eq!(css_property_name("opacity"), "opacity");
        assert_eq!(
            css_property_name("animationTimingFunction"),
            "animation-timing-function"
        );
        assert_eq!(css_property_name("WebkitTransform"), "-webkit-transform");
        assert_eq!(css_property_name("--tw-rotate"), "--tw-rotate");
    }
}
