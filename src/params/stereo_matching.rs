//! Stereo matching block of the parameter file.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use super::{deserialize_located, ParametersTrait, STEREO_MATCHING_KEY};
use crate::cast;
use crate::compare::field_eq;
use crate::error::Result;

/// Keys of the stereo block, as they appear in parameter files.
pub(crate) const STEREO_KEYS: [&str; 10] = [
    "equalize_image",
    "nominal_baseline",
    "tolerance_template_matching",
    "templ_cols",
    "templ_rows",
    "stripe_extra_rows",
    "min_point_dist",
    "max_point_dist",
    "bidirectional_matching",
    "subpixel_refinement",
];

/// Prefix of stereo keys in error messages.
pub(crate) const STEREO_BLOCK_PREFIX: &str = "stereo_matching_params.";

/// Left/right correspondence search settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StereoMatchingParams {
    /// Histogram-equalise both images before matching.
    #[serde(deserialize_with = "cast::boolean")]
    pub equalize_image: bool,
    /// Expected baseline of the rig.
    #[serde(deserialize_with = "cast::float")]
    pub nominal_baseline: f64,
    #[serde(deserialize_with = "cast::float")]
    pub tolerance_template_matching: f64,
    #[serde(deserialize_with = "cast::int")]
    pub templ_cols: i32,
    #[serde(deserialize_with = "cast::int")]
    pub templ_rows: i32,
    /// Rows added above and below the epipolar line when searching.
    #[serde(deserialize_with = "cast::int")]
    pub stripe_extra_rows: i32,
    /// Closest accepted triangulated point.
    #[serde(deserialize_with = "cast::float")]
    pub min_point_dist: f64,
    /// Farthest accepted triangulated point.
    #[serde(deserialize_with = "cast::float")]
    pub max_point_dist: f64,
    #[serde(deserialize_with = "cast::boolean")]
    pub bidirectional_matching: bool,
    #[serde(deserialize_with = "cast::boolean")]
    pub subpixel_refinement: bool,
}

impl StereoMatchingParams {
    pub const DEFAULT: StereoMatchingParams = StereoMatchingParams {
        equalize_image: false,
        nominal_baseline: 0.11,
        tolerance_template_matching: 0.15,
        templ_cols: 101,
        templ_rows: 11,
        stripe_extra_rows: 0,
        min_point_dist: 0.1,
        max_point_dist: 15.0,
        bidirectional_matching: false,
        subpixel_refinement: false,
    };

    /// Template size as `(cols, rows)`.
    pub fn template_size(&self) -> (i32, i32) {
        (self.templ_cols, self.templ_rows)
    }
}

impl Default for StereoMatchingParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ParametersTrait for StereoMatchingParams {
    const NAME: &'static str = "stereo matching parameters";

    fn from_yaml_mapping(mut root: Mapping) -> Result<Self> {
        let block = match root.remove(STEREO_MATCHING_KEY) {
            Some(Value::Mapping(block)) => block,
            _ => Mapping::new(),
        };
        deserialize_located(block, STEREO_BLOCK_PREFIX)
    }

    fn equals(&self, other: &Self, tol: f64) -> bool {
        let (a, b) = (self, other);
        field_eq("equalize_image", &a.equalize_image, &b.equalize_image, tol)
            && field_eq(
                "nominal_baseline",
                &a.nominal_baseline,
                &b.nominal_baseline,
                tol,
            )
            && field_eq(
                "tolerance_template_matching",
                &a.tolerance_template_matching,
                &b.tolerance_template_matching,
                tol,
            )
            && field_eq("templ_cols", &a.templ_cols, &b.templ_cols, tol)
            && field_eq("templ_rows", &a.templ_rows, &b.templ_rows, tol)
            && field_eq(
                "stripe_extra_rows",
                &a.stripe_extra_rows,
                &b.stripe_extra_rows,
                tol,
            )
            && field_eq("min_point_dist", &a.min_point_dist, &b.min_point_dist, tol)
            && field_eq("max_point_dist", &a.max_point_dist, &b.max_point_dist, tol)
            && field_eq(
                "bidirectional_matching",
                &a.bidirectional_matching,
                &b.bidirectional_matching,
                tol,
            )
            && field_eq(
                "subpixel_refinement",
                &a.subpixel_refinement,
                &b.subpixel_refinement,
                tol,
            )
    }

    fn sanity_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.templ_cols % 2 != 1 || self.templ_rows % 2 != 1 {
            warnings.push(format!(
                "template size {}x{} should be odd in both dimensions",
                self.templ_cols, self.templ_rows
            ));
        }
        if self.stripe_extra_rows % 2 != 0 {
            warnings.push(format!(
                "stripe_extra_rows = {} should be even",
                self.stripe_extra_rows
            ));
        }
        if self.min_point_dist > self.max_point_dist {
            warnings.push(format!(
                "min_point_dist ({}) exceeds max_point_dist ({})",
                self.min_point_dist, self.max_point_dist
            ));
        }
        warnings
    }
}

impl fmt::Display for StereoMatchingParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "** Stereo matching parameters **")?;
        writeln!(f, "equalize_image: {}", self.equalize_image)?;
        writeln!(f, "nominal_baseline: {}", self.nominal_baseline)?;
        writeln!(
            f,
            "tolerance_template_matching: {}",
            self.tolerance_template_matching
        )?;
        writeln!(f, "templ_cols: {}", self.templ_cols)?;
        writeln!(f, "templ_rows: {}", self.templ_rows)?;
        writeln!(f, "stripe_extra_rows: {}", self.stripe_extra_rows)?;
        writeln!(f, "min_point_dist: {}", self.min_point_dist)?;
        writeln!(f, "max_point_dist: {}", self.max_point_dist)?;
        writeln!(f, "bidirectional_matching: {}", self.bidirectional_matching)?;
        writeln!(f, "subpixel_refinement: {}", self.subpixel_refinement)
    }
}
