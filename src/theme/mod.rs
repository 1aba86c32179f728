mod defaults;
mod tokens;

use std::fmt;

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub use defaults::default_theme;
pub use tokens::{is_color, TokenTable};

/// Reserved key holding the union layer of a user theme.
pub const EXTEND_KEY: &str = "extend";

pub type ThemeResult<T> = std::result::Result<T, ThemeError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThemeError {
    #[error("token `{path}` is defined with conflicting shapes")]
    DuplicateToken { path: String },
    #[error("token names must not be empty (in `{path}`)")]
    EmptyName { path: String },
    #[error("invalid color `{value}` for token `{name}`")]
    InvalidColor { name: String, value: String },
    #[error("theme key `{path}` must be a group")]
    NotAGroup { path: String },
}

/// A raw token value. Numbers and booleans are kept in their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TokenVisitor;

        impl Visitor<'_> for TokenVisitor {
            type Value = Token;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string, number or boolean token")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Token, E> {
                Ok(Token::new(value))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<Token, E> {
                Ok(Token(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Token, E> {
                Ok(Token(value.to_string()))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Token, E> {
                Ok(Token(value.to_string()))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Token, E> {
                Ok(Token(value.to_string()))
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<Token, E> {
                Ok(Token(value.to_string()))
            }
        }

        deserializer.deserialize_any(TokenVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeValue {
    Token(Token),
    List(Vec<Token>),
    Group(ThemeTree),
}

impl ThemeValue {
    pub fn as_group(&self) -> Option<&ThemeTree> {
        match self {
            Self::Group(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Self::Token(token) => Some(token),
            _ => None,
        }
    }
}

impl From<&str> for ThemeValue {
    fn from(value: &str) -> Self {
        Self::Token(Token::new(value))
    }
}

impl From<ThemeTree> for ThemeValue {
    fn from(tree: ThemeTree) -> Self {
        Self::Group(tree)
    }
}

/// Ordered tree of theme groups. Declaration order is kept so generated
/// rules follow the order the author wrote them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeTree(IndexMap<String, ThemeValue>);

impl ThemeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ThemeValue> {
        self.0.get(key)
    }

    /// Looks up `key` as a nested group; `Ok(None)` when the key is absent.
    pub fn group(&self, key: &str) -> ThemeResult<Option<&ThemeTree>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(ThemeValue::Group(tree)) => Ok(Some(tree)),
            Some(_) => Err(ThemeError::NotAGroup {
                path: key.to_string(),
            }),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ThemeValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ThemeValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ThemeValue)> for ThemeTree {
    fn from_iter<I: IntoIterator<Item = (String, ThemeValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One user-supplied layer for a single top-level group.
#[derive(Debug, Clone, Copy)]
enum Layer<'a> {
    Override(&'a ThemeValue),
    Extend(&'a ThemeValue),
}

/// Folds a user theme onto the defaults.
///
/// Top-level user groups replace the default group wholesale; groups under
/// `extend` are unioned in afterwards, recursively, so an `extend` entry wins
/// over an override of the same name.
pub fn merge(defaults: &ThemeTree, user: &ThemeTree) -> ThemeResult<ThemeTree> {
    let mut merged = defaults.clone();
    for (group, layer) in layers(user)? {
        fold_layer(&mut merged, group, layer)?;
    }
    Ok(merged)
}

fn layers(user: &ThemeTree) -> ThemeResult<Vec<(&str, Layer<'_>)>> {
    let overrides = user
        .iter()
        .filter(|(key, _)| *key != EXTEND_KEY)
        .map(|(key, value)| (key, Layer::Override(value)));

    let extensions = match user.group(EXTEND_KEY)? {
        Some(extend) => extend
            .iter()
            .map(|(key, value)| (key, Layer::Extend(value)))
            .collect(),
        None => Vec::new(),
    };

    Ok(overrides.chain(extensions).collect())
}

fn fold_layer(merged: &mut ThemeTree, group: &str, layer: Layer<'_>) -> ThemeResult<()> {
    match layer {
        Layer::Override(value) => {
            let replaced = merged.0.insert(group.to_string(), value.clone()).is_some();
            tracing::debug!(group, replaced, "applied theme override");
            Ok(())
        }
        Layer::Extend(value) => {
            tracing::debug!(group, "extending theme group");
            union_entry(merged, group, value, "")
        }
    }
}

fn union_entry(
    target: &mut ThemeTree,
    key: &str,
    incoming: &ThemeValue,
    parent: &str,
) -> ThemeResult<()> {
    let path = if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    };

    match target.0.entry(key.to_string()) {
        Entry::Vacant(slot) => {
            slot.insert(incoming.clone());
        }
        Entry::Occupied(mut slot) => match (slot.get_mut(), incoming) {
            (ThemeValue::Group(existing), ThemeValue::Group(extra)) => {
                for (name, value) in extra.iter() {
                    union_entry(existing, name, value, &path)?;
                }
            }
            (ThemeValue::Group(_), _) | (_, ThemeValue::Group(_)) => {
                return Err(ThemeError::DuplicateToken { path });
            }
            (existing, _) => *existing = incoming.clone(),
        },
    }
    Ok(())
}
