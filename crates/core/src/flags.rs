//! Feature flag table and lookup
//!
//! A [`FeatureFlags`] table maps flag names to values and is immutable once
//! built. A flag counts as enabled only when its value is exactly the
//! boolean `true`; unknown names and non-boolean values are disabled.
//!
//! The built-in table is available process-wide through
//! [`is_feature_enabled`] and [`builtin`]. Callers that also load a flags
//! file build their own table once at startup (see
//! [`crate::config::FlagsConfigLoader`]) and pass it around by reference.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::Serialize;

/// A compile-time handle for a named flag.
///
/// Lets callers write `flags.has::<AiRecommendations>()` instead of
/// repeating the string name at every call site.
pub trait FeatureFlag {
    const NAME: &'static str;
}

pub enum AiRecommendations {}

impl FeatureFlag for AiRecommendations {
    const NAME: &'static str = "AI_RECOMMENDATIONS";
}

pub enum FaceCheckin {}

impl FeatureFlag for FaceCheckin {
    const NAME: &'static str = "FACE_CHECKIN";
}

pub enum AdvancedAnalytics {}

impl FeatureFlag for AdvancedAnalytics {
    const NAME: &'static str = "ADVANCED_ANALYTICS";
}

pub enum PaymentGateway {}

impl FeatureFlag for PaymentGateway {
    const NAME: &'static str = "PAYMENT_GATEWAY";
}

/// Flags shipped with the crate, in table order.
pub const BUILTIN_FLAGS: &[(&str, bool)] = &[
    (AiRecommendations::NAME, true),
    (FaceCheckin::NAME, false),
    (AdvancedAnalytics::NAME, false),
    (PaymentGateway::NAME, false),
];

static BUILTIN: Lazy<FeatureFlags> = Lazy::new(FeatureFlags::builtin);

/// Value stored for a flag.
///
/// Flag files may carry values that are not booleans (`"true"`, `1`, ...).
/// They are kept so they can be reported, but never count as enabled.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Other(serde_json::Value),
}

impl FlagValue {
    /// True only for `FlagValue::Bool(true)`.
    pub fn is_enabled(&self) -> bool {
        matches!(self, FlagValue::Bool(true))
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        FlagValue::Bool(value)
    }
}

impl From<serde_json::Value> for FlagValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(b) => FlagValue::Bool(b),
            other => FlagValue::Other(other),
        }
    }
}

/// Immutable feature flag table.
///
/// Entries keep insertion order. There is no way to mutate a table in
/// place; [`FeatureFlags::with_overrides`] consumes it and returns a new one.
#[derive(Debug, Clone, Default)]
pub struct FeatureFlags {
    entries: IndexMap<String, FlagValue>,
}

/// Tables are equal only when they hold the same entries in the same order.
impl PartialEq for FeatureFlags {
    fn eq(&self, other: &Self) -> bool {
        self.entries.iter().eq(other.entries.iter())
    }
}

impl FeatureFlags {
    /// Build a fresh copy of the built-in table.
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_FLAGS.iter().map(|(name, enabled)| (*name, *enabled)))
    }

    /// Build a table from `(name, value)` pairs.
    ///
    /// A repeated name keeps its first position and takes the last value.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FlagValue>,
    {
        let mut map = IndexMap::new();
        for (name, value) in entries {
            map.insert(name.into(), value.into());
        }
        Self { entries: map }
    }

    /// Layer `overrides` on top of this table.
    ///
    /// Existing names keep their position and take the override's value;
    /// new names are appended in the override's order.
    pub fn with_overrides(mut self, overrides: FeatureFlags) -> Self {
        for (name, value) in overrides.entries {
            self.entries.insert(name, value);
        }
        self
    }

    /// Whether `name` is present with a value of exactly `true`.
    ///
    /// ```
    /// use featgate_core::flags::FeatureFlags;
    ///
    /// let flags = FeatureFlags::builtin();
    /// assert!(flags.is_enabled("AI_RECOMMENDATIONS"));
    /// assert!(!flags.is_enabled("FACE_CHECKIN"));
    /// assert!(!flags.is_enabled("UNDEFINED_FLAG"));
    /// ```
    pub fn is_enabled(&self, name: &str) -> bool {
        self.entries
            .get(name)
            .map(FlagValue::is_enabled)
            .unwrap_or(false)
    }

    /// Typed form of [`FeatureFlags::is_enabled`].
    pub fn has<F: FeatureFlag>(&self) -> bool {
        self.is_enabled(F::NAME)
    }

    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Names of enabled flags in table order.
    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, value)| value.is_enabled())
            .map(|(name, _)| name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The process-wide built-in table.
pub fn builtin() -> &'static FeatureFlags {
    &BUILTIN
}

/// Whether `feature_name` is enabled in the built-in table.
///
/// Unknown names are disabled; this never fails.
pub fn is_feature_enabled(feature_name: &str) -> bool {
    BUILTIN.is_enabled(feature_name)
}
