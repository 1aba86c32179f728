use indexmap::IndexMap;
use serde::Serialize;

use super::{ThemeError, ThemeResult, ThemeTree, ThemeValue};

const COLORS_GROUP: &str = "colors";
/// Nested key that names the parent token itself (`red.DEFAULT` -> `red`).
const DEFAULT_SUFFIX: &str = "DEFAULT";

const COLOR_FUNCTIONS: &[&str] = &[
    "rgb", "rgba", "hsl", "hsla", "hwb", "lab", "lch", "oklab", "oklch", "color", "var",
];

/// Flat, ordered mapping from token name to raw value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TokenTable(IndexMap<String, String>);

impl TokenTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a token; a name that is empty or already present is rejected.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> ThemeResult<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(ThemeError::EmptyName { path: name });
        }
        if self.0.contains_key(&name) {
            return Err(ThemeError::DuplicateToken { path: name });
        }
        self.0.insert(name, value.into());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flattens a group into dash-joined names; lists are joined with `, `.
    pub fn flatten(group: &ThemeTree) -> ThemeResult<Self> {
        let mut table = Self::new();
        flatten_into(&mut table, group, "")?;
        Ok(table)
    }

    /// The flattened `colors` group of a merged theme, with every value
    /// checked for a recognizable color form.
    pub fn colors(theme: &ThemeTree) -> ThemeResult<Self> {
        let Some(group) = theme.group(COLORS_GROUP)? else {
            return Ok(Self::new());
        };

        let table = Self::flatten(group)?;
        if let Some((name, value)) = table.iter().find(|(_, value)| !is_color(value)) {
            return Err(ThemeError::InvalidColor {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
        Ok(table)
    }
}

fn flatten_into(table: &mut TokenTable, group: &ThemeTree, prefix: &str) -> ThemeResult<()> {
    for (key, value) in group.iter() {
        if key.is_empty() {
            return Err(ThemeError::EmptyName {
                path: prefix.to_string(),
            });
        }
        let name = match (prefix.is_empty(), key == DEFAULT_SUFFIX) {
            (true, true) => {
                return Err(ThemeError::EmptyName {
                    path: DEFAULT_SUFFIX.to_string(),
                })
            }
            (false, true) => prefix.to_string(),
            (true, false) => key.to_string(),
            (false, false) => format!("{prefix}-{key}"),
        };
        match value {
            ThemeValue::Token(token) => table.insert(name, token.as_str())?,
            ThemeValue::List(items) => {
                let joined = items
                    .iter()
                    .map(|item| item.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                table.insert(name, joined)?;
            }
            ThemeValue::Group(nested) => flatten_into(table, nested, &name)?,
        }
    }
    Ok(())
}

/// Checks the textual form of a color: hex, a color function, or a keyword.
pub fn is_color(value: &str) -> bool {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|ch| ch.is_ascii_hexdigit());
    }
    if let Some((function, arguments)) = value.split_once('(') {
        let function = function.trim().to_ascii_lowercase();
        return COLOR_FUNCTIONS.contains(&function.as_str())
            && arguments.ends_with(')')
            && arguments.len() > 1;
    }
    !value.is_empty() && value.chars().all(|ch| ch.is_ascii_alphabetic())
}
