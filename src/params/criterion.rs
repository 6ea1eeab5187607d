//! Feature selection heuristics and their integer codes.

use std::fmt;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::cast;

/// Heuristic used to pick which detected corners enter the tracker.
///
/// Stored in parameter files as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FeatureSelectionCriterion {
    /// Keep the corners with the best detector response.
    #[default]
    Quality,
    /// Maximise the smallest eigenvalue of the information matrix.
    MinEig,
    /// Maximise the log-determinant of the information matrix.
    LogDet,
    Random,
}

impl FeatureSelectionCriterion {
    pub const ALL: [FeatureSelectionCriterion; 4] = [
        FeatureSelectionCriterion::Quality,
        FeatureSelectionCriterion::MinEig,
        FeatureSelectionCriterion::LogDet,
        FeatureSelectionCriterion::Random,
    ];

    pub const fn code(self) -> i32 {
        match self {
            FeatureSelectionCriterion::Quality => 0,
            FeatureSelectionCriterion::MinEig => 1,
            FeatureSelectionCriterion::LogDet => 2,
            FeatureSelectionCriterion::Random => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| i64::from(c.code()) == code)
    }

    pub const fn name(self) -> &'static str {
        match self {
            FeatureSelectionCriterion::Quality => "QUALITY",
            FeatureSelectionCriterion::MinEig => "MIN_EIG",
            FeatureSelectionCriterion::LogDet => "LOGDET",
            FeatureSelectionCriterion::Random => "RANDOM",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for FeatureSelectionCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

impl Serialize for FeatureSelectionCriterion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.code())
    }
}

impl<'de> Deserialize<'de> for FeatureSelectionCriterion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CriterionVisitor)
    }
}

struct CriterionVisitor;

impl<'de> Visitor<'de> for CriterionVisitor {
    type Value = FeatureSelectionCriterion;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a feature selection criterion code (0-3) or name")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        FeatureSelectionCriterion::from_code(v)
            .ok_or_else(|| E::invalid_value(Unexpected::Signed(v), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .ok()
            .and_then(FeatureSelectionCriterion::from_code)
            .ok_or_else(|| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        cast::integral(v)
            .and_then(FeatureSelectionCriterion::from_code)
            .ok_or_else(|| E::invalid_value(Unexpected::Float(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        FeatureSelectionCriterion::from_name(v)
            .ok_or_else(|| E::invalid_value(Unexpected::Str(v), &self))
    }
}
