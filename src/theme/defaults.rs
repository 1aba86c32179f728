use std::sync::OnceLock;

use super::{ThemeTree, ThemeValue};

static DEFAULT_THEME: OnceLock<ThemeTree> = OnceLock::new();

/// Framework defaults shared by every resolution in the process.
pub fn default_theme() -> &'static ThemeTree {
    DEFAULT_THEME.get_or_init(build_default_theme)
}

fn build_default_theme() -> ThemeTree {
    [
        ("colors", default_colors()),
        ("keyframes", default_keyframes()),
        ("animation", default_animations()),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value))
    .collect()
}

fn tokens<const N: usize>(entries: [(&str, &str); N]) -> ThemeValue {
    group(entries.map(|(name, value)| (name, ThemeValue::from(value))))
}

fn group<const N: usize>(entries: [(&str, ThemeValue); N]) -> ThemeValue {
    ThemeValue::Group(
        entries
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect(),
    )
}

fn default_colors() -> ThemeValue {
    group([
        ("inherit", "inherit".into()),
        ("current", "currentColor".into()),
        ("transparent", "transparent".into()),
        ("black", "#000".into()),
        ("white", "#fff".into()),
        (
            "gray",
            tokens([
                ("50", "#f9fafb"),
                ("100", "#f3f4f6"),
                ("200", "#e5e7eb"),
                ("300", "#d1d5db"),
                ("400", "#9ca3af"),
                ("500", "#6b7280"),
                ("600", "#4b5563"),
                ("700", "#374151"),
                ("800", "#1f2937"),
                ("900", "#111827"),
                ("950", "#030712"),
            ]),
        ),
        (
            "red",
            tokens([
                ("50", "#fef2f2"),
                ("100", "#fee2e2"),
                ("200", "#fecaca"),
                ("300", "#fca5a5"),
                ("400", "#f87171"),
                ("500", "#ef4444"),
                ("600", "#dc2626"),
                ("700", "#b91c1c"),
                ("800", "#991b1b"),
                ("900", "#7f1d1d"),
                ("950", "#450a0a"),
            ]),
        ),
        (
            "yellow",
            tokens([
                ("50", "#fefce8"),
                ("100", "#fef9c3"),
                ("200", "#fef08a"),
                ("300", "#fde047"),
                ("400", "#facc15"),
                ("500", "#eab308"),
                ("600", "#ca8a04"),
                ("700", "#a16207"),
                ("800", "#854d0e"),
                ("900", "#713f12"),
                ("950", "#422006"),
            ]),
        ),
        (
            "green",
            tokens([
                ("50", "#f0fdf4"),
                ("100", "#dcfce7"),
                ("200", "#bbf7d0"),
                ("300", "#86efac"),
                ("400", "#4ade80"),
                ("500", "#22c55e"),
                ("600", "#16a34a"),
                ("700", "#15803d"),
                ("800", "#166534"),
                ("900", "#14532d"),
                ("950", "#052e16"),
            ]),
        ),
        (
            "blue",
            tokens([
                ("50", "#eff6ff"),
                ("100", "#dbeafe"),
                ("200", "#bfdbfe"),
                ("300", "#93c5fd"),
                ("400", "#60a5fa"),
                ("500", "#3b82f6"),
                ("600", "#2563eb"),
                ("700", "#1d4ed8"),
                ("800", "#1e40af"),
                ("900", "#1e3a8a"),
                ("950", "#172554"),
            ]),
        ),
    ])
}

fn default_keyframes() -> ThemeValue {
    group([
        ("spin", group([("to", tokens([("transform", "rotate(360deg)")]))])),
        (
            "ping",
            group([(
                "75%, 100%",
                tokens([("transform", "scale(2)"), ("opacity", "0")]),
            )]),
        ),
        ("pulse", group([("50%", tokens([("opacity", ".5")]))])),
        (
            "bounce",
            group([
                (
                    "0%, 100%",
                    tokens([
                        ("transform", "translateY(-25%)"),
                        ("animationTimingFunction", "cubic-bezier(0.8,0,1,1)"),
                    ]),
                ),
                (
                    "50%",
                    tokens([
                        ("transform", "none"),
                        ("animationTimingFunction", "cubic-bezier(0,0,0.2,1)"),
                    ]),
                ),
            ]),
        ),
    ])
}

fn default_animations() -> ThemeValue {
    tokens([
        ("none", "none"),
        ("spin", "spin 1s linear infinite"),
        ("ping", "ping 1s cubic-bezier(0, 0, 0.2, 1) infinite"),
        ("pulse", "pulse 2s cubic-bezier(0.4, 0, 0.6, 1) infinite"),
        ("bounce", "bounce 1s infinite"),
    ])
}
