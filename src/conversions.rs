//! Locale-independent conversions between strings and primitive values.
//!
//! Every function here is total: malformed input falls back to the caller's default instead of
//! failing, which lets the typed accessors of [`crate::Section`] and [`crate::IniFile`] stay
//! infallible.

/// Literal pair used when a boolean is written out as text.
///
/// Reading a boolean never depends on the style; see [`bool_from_str`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BooleanStringStyle {
    /// `True` / `False`
    #[default]
    TrueFalse,
    /// `Yes` / `No`
    YesNo,
    /// `true` / `false`
    TrueFalseLowercase,
    /// `yes` / `no`
    YesNoLowercase,
    /// `1` / `0`
    OneZero,
}

impl BooleanStringStyle {
    #[must_use]
    pub fn literals(self) -> (&'static str, &'static str) {
        match self {
            Self::TrueFalse => ("True", "False"),
            Self::YesNo => ("Yes", "No"),
            Self::TrueFalseLowercase => ("true", "false"),
            Self::YesNoLowercase => ("yes", "no"),
            Self::OneZero => ("1", "0"),
        }
    }
}

/// Classify `s` by its first character, ignoring case.
///
/// `t`, `y`, `1`, `a` and `e` (true, yes, approved, enabled...) read as `true`; `n`, `f` and `0`
/// read as `false`. Anything else, including an empty string, yields `default`.
#[must_use]
pub fn bool_from_str(s: &str, default: bool) -> bool {
    let Some(first) = s.chars().next() else {
        return default;
    };

    match first.to_ascii_lowercase() {
        't' | 'y' | '1' | 'a' | 'e' => true,
        'n' | 'f' | '0' => false,
        _ => default,
    }
}

#[must_use]
pub fn bool_to_string(value: bool, style: BooleanStringStyle) -> &'static str {
    let (t, f) = style.literals();
    if value { t } else { f }
}

#[must_use]
pub fn int_from_str(s: &str, default: i32) -> i32 {
    s.trim().parse().unwrap_or(default)
}

/// `inf`, `infinity` and `NaN` are not numbers here and yield `default`.
#[must_use]
pub fn double_from_str(s: &str, default: f64) -> f64 {
    s.trim()
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .unwrap_or(default)
}

/// See [`double_from_str`].
#[must_use]
pub fn float_from_str(s: &str, default: f32) -> f32 {
    s.trim()
        .parse()
        .ok()
        .filter(|v: &f32| v.is_finite())
        .unwrap_or(default)
}

/// Fixed-point rendering with exactly `decimals` digits after the decimal point and no grouping.
#[must_use]
pub fn float_to_string_with_decimals(value: f32, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// Pack flags into bytes, least significant bit first. The final byte is zero-padded.
#[must_use]
pub fn bools_to_bytes(flags: &[bool]) -> Vec<u8> {
    flags
        .chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .filter(|&(_, &set)| set)
                .fold(0u8, |byte, (bit, _)| byte | (1 << bit))
        })
        .collect()
}

/// Inverse of [`bools_to_bytes`]; always yields eight flags per byte.
#[must_use]
pub fn bytes_to_bools(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).map(move |bit| byte & (1 << bit) != 0))
        .collect()
}
