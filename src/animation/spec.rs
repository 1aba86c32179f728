use std::fmt;

use serde::{Serialize, Serializer};

use crate::theme::ThemeTree;

const TIMING_KEYWORDS: &[&str] = &[
    "ease",
    "ease-in",
    "ease-out",
    "ease-in-out",
    "linear",
    "step-start",
    "step-end",
];
const TIMING_FUNCTIONS: &[&str] = &["cubic-bezier", "steps", "linear"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IterationCount {
    Finite(f64),
    Infinite,
}

impl IterationCount {
    fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("infinite") {
            return Some(Self::Infinite);
        }
        let count = raw.parse::<f64>().ok()?;
        (count.is_finite() && count >= 0.0).then_some(Self::Finite(count))
    }
}

impl fmt::Display for IterationCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(count) => write!(f, "{count}"),
            Self::Infinite => f.write_str("infinite"),
        }
    }
}

impl Serialize for IterationCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Finite(count) => serializer.serialize_f64(*count),
            Self::Infinite => serializer.serialize_str("infinite"),
        }
    }
}

macro_rules! keyword_enum {
    ($name:ident { $($variant:ident => $keyword:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
        pub enum $name {
            #[default]
            $(#[serde(rename = $keyword)] $variant),+
        }

        impl $name {
            fn parse(raw: &str) -> Option<Self> {
                $(if raw.eq_ignore_ascii_case($keyword) {
                    return Some(Self::$variant);
                })+
                None
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $keyword),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

keyword_enum!(AnimationDirection {
    Normal => "normal",
    Reverse => "reverse",
    Alternate => "alternate",
    AlternateReverse => "alternate-reverse",
});

keyword_enum!(FillMode {
    None => "none",
    Forwards => "forwards",
    Backwards => "backwards",
    Both => "both",
});

keyword_enum!(PlayState {
    Running => "running",
    Paused => "paused",
});

/// A fully-qualified animation declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationSpec {
    keyframes: String,
    duration: String,
    timing_function: String,
    iteration_count: IterationCount,
    delay: String,
    direction: AnimationDirection,
    fill_mode: FillMode,
    play_state: PlayState,
}

impl AnimationSpec {
    pub fn keyframes(&self) -> &str {
        &self.keyframes
    }

    pub fn duration(&self) -> &str {
        &self.duration
    }

    pub fn timing_function(&self) -> &str {
        &self.timing_function
    }

    pub fn iteration_count(&self) -> IterationCount {
        self.iteration_count
    }

    pub fn delay(&self) -> &str {
        &self.delay
    }

    pub fn direction(&self) -> AnimationDirection {
        self.direction
    }

    pub fn fill_mode(&self) -> FillMode {
        self.fill_mode
    }

    pub fn play_state(&self) -> PlayState {
        self.play_state
    }

    /// The canonical value of the CSS `animation` property.
    pub fn shorthand(&self) -> String {
        format!(
            "{} {} {} {} {} {} {} {}",
            self.duration,
            self.timing_function,
            self.delay,
            self.iteration_count,
            self.direction,
            self.fill_mode,
            self.play_state,
            self.keyframes
        )
    }
}

/// A compiled entry of the `animation` group.
#[derive(Debug, Clone, PartialEq)]
pub enum Animation {
    /// The literal `none`: the utility disables animation.
    None,
    Keyframes(AnimationSpec),
}

impl Animation {
    pub fn spec(&self) -> Option<&AnimationSpec> {
        match self {
            Self::None => None,
            Self::Keyframes(spec) => Some(spec),
        }
    }

    pub fn shorthand(&self) -> String {
        match self {
            Self::None => "none".to_string(),
            Self::Keyframes(spec) => spec.shorthand(),
        }
    }
}

impl Serialize for Animation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None => serializer.serialize_str("none"),
            Self::Keyframes(spec) => spec.serialize(serializer),
        }
    }
}

/// Collects animation fields, rejecting malformed or repeated values.
#[derive(Debug, Default)]
struct SpecBuilder {
    keyframes: Option<String>,
    duration: Option<String>,
    timing_function: Option<String>,
    iteration_count: Option<IterationCount>,
    delay: Option<String>,
    direction: Option<AnimationDirection>,
    fill_mode: Option<FillMode>,
    play_state: Option<PlayState>,
}

impl SpecBuilder {
    /// Classifies one shorthand token the way the CSS `animation` property does.
    fn accept(&mut self, token: &str) -> Result<(), String> {
        if let Some(seconds) = parse_time(token) {
            if self.duration.is_none() {
                check_duration(token, seconds)?;
                self.duration = Some(token.to_string());
            } else if self.delay.is_none() {
                self.delay = Some(token.to_string());
            } else {
                return Err(format!("unexpected third time value `{token}`"));
            }
            return Ok(());
        }
        if is_timing_function(token) {
            return set_once(&mut self.timing_function, token.to_string(), "timing function");
        }
        if let Some(count) = IterationCount::parse(token) {
            return set_once(&mut self.iteration_count, count, "iteration count");
        }
        if let Some(direction) = AnimationDirection::parse(token) {
            return set_once(&mut self.direction, direction, "direction");
        }
        if let Some(fill_mode) = FillMode::parse(token) {
            return set_once(&mut self.fill_mode, fill_mode, "fill mode");
        }
        if let Some(play_state) = PlayState::parse(token) {
            return set_once(&mut self.play_state, play_state, "play state");
        }
        if is_identifier(token) {
            return set_once(&mut self.keyframes, token.to_string(), "keyframes name");
        }
        Err(format!("unrecognized token `{token}`"))
    }

    fn accept_field(&mut self, field: &str, value: &str) -> Result<(), String> {
        let value = value.trim();
        match field {
            "keyframes" | "name" => {
                if !is_identifier(value) {
                    return Err(format!("`{value}` is not a keyframes name"));
                }
                set_once(&mut self.keyframes, value.to_string(), "keyframes name")
            }
            "duration" | "delay" => {
                let seconds =
                    parse_time(value).ok_or_else(|| format!("`{value}` is not a time value"))?;
                let slot = if field == "duration" {
                    check_duration(value, seconds)?;
                    &mut self.duration
                } else {
                    &mut self.delay
                };
                set_once(slot, value.to_string(), field)
            }
            "timingFunction" => {
                if !is_timing_function(value) {
                    return Err(format!("`{value}` is not a timing function"));
                }
                set_once(&mut self.timing_function, value.to_string(), field)
            }
            "iterationCount" => {
                let count = IterationCount::parse(value)
                    .ok_or_else(|| format!("`{value}` is not an iteration count"))?;
                set_once(&mut self.iteration_count, count, field)
            }
            "direction" => {
                let direction = AnimationDirection::parse(value)
                    .ok_or_else(|| format!("`{value}` is not a direction"))?;
                set_once(&mut self.direction, direction, field)
            }
            "fillMode" => {
                let fill_mode =
                    FillMode::parse(value).ok_or_else(|| format!("`{value}` is not a fill mode"))?;
                set_once(&mut self.fill_mode, fill_mode, field)
            }
            "playState" => {
                let play_state = PlayState::parse(value)
                    .ok_or_else(|| format!("`{value}` is not a play state"))?;
                set_once(&mut self.play_state, play_state, field)
            }
            other => Err(format!("unknown animation field `{other}`")),
        }
    }

    fn finish(self) -> Result<AnimationSpec, String> {
        let keyframes = self
            .keyframes
            .ok_or_else(|| "no keyframes name given".to_string())?;
        Ok(AnimationSpec {
            keyframes,
            duration: self.duration.unwrap_or_else(|| "0s".to_string()),
            timing_function: self.timing_function.unwrap_or_else(|| "ease".to_string()),
            iteration_count: self.iteration_count.unwrap_or(IterationCount::Finite(1.0)),
            delay: self.delay.unwrap_or_else(|| "0s".to_string()),
            direction: self.direction.unwrap_or_default(),
            fill_mode: self.fill_mode.unwrap_or_default(),
            play_state: self.play_state.unwrap_or_default(),
        })
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, what: &str) -> Result<(), String> {
    if slot.is_some() {
        return Err(format!("{what} given more than once"));
    }
    *slot = Some(value);
    Ok(())
}

/// Parses a shorthand such as `blink 1s ease-in-out infinite`.
pub(super) fn parse_shorthand(value: &str) -> Result<Animation, String> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("none") {
        return Ok(Animation::None);
    }

    let mut builder = SpecBuilder::default();
    for token in split_tokens(value) {
        builder.accept(token)?;
    }
    builder.finish().map(Animation::Keyframes)
}

/// Parses the object form, e.g. `{ "keyframes": "blink", "duration": "1s" }`.
pub(super) fn parse_structured(fields: &ThemeTree) -> Result<Animation, String> {
    let mut builder = SpecBuilder::default();
    for (field, value) in fields.iter() {
        let token = value
            .as_token()
            .ok_or_else(|| format!("field `{field}` must be a plain value"))?;
        builder.accept_field(field, token.as_str())?;
    }
    builder.finish().map(Animation::Keyframes)
}

/// Splits on whitespace outside parentheses so `cubic-bezier(0, 0, 1, 1)`
/// stays one token.
fn split_tokens(value: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    for (index, ch) in value.char_indices() {
        match ch {
            '(' => {
                depth += 1;
                start.get_or_insert(index);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                start.get_or_insert(index);
            }
            ch if ch.is_whitespace() && depth == 0 => {
                if let Some(begin) = start.take() {
                    tokens.push(&value[begin..index]);
                }
            }
            _ => {
                start.get_or_insert(index);
            }
        }
    }
    if let Some(begin) = start {
        tokens.push(&value[begin..]);
    }
    tokens
}

/// A CSS `<time>` in seconds; units are case-insensitive.
fn parse_time(token: &str) -> Option<f64> {
    let lower = token.to_ascii_lowercase();
    let (number, scale) = match lower.strip_suffix("ms") {
        Some(number) => (number, 0.001),
        None => (lower.strip_suffix('s')?, 1.0),
    };
    number
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .map(|number| number * scale)
}

/// Delays may be negative, durations may not.
fn check_duration(token: &str, seconds: f64) -> Result<(), String> {
    if seconds < 0.0 {
        return Err(format!("duration `{token}` must not be negative"));
    }
    Ok(())
}

fn is_timing_function(token: &str) -> bool {
    let token = token.to_ascii_lowercase();
    if TIMING_KEYWORDS.contains(&token.as_str()) {
        return true;
    }
    token
        .split_once('(')
        .is_some_and(|(function, rest)| TIMING_FUNCTIONS.contains(&function) && rest.ends_with(')'))
}

fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '-')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
}
