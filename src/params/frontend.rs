//! The full front-end parameter set.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use super::stereo_matching::STEREO_BLOCK_PREFIX;
use super::{
    deserialize_located, FeatureSelectionCriterion, ParametersTrait, StereoMatchingParams,
    STEREO_MATCHING_KEY,
};
use crate::cast;
use crate::compare::field_eq;
use crate::error::Result;

/// Every tunable of the tracking front end.
///
/// File keys follow the historical names (`maxFeatureAge`, `useRANSAC`, ...);
/// the stereo block is read from `stereo_matching_params`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontEndParams {
    // KLT tracking
    #[serde(deserialize_with = "cast::int")]
    pub klt_win_size: i32,
    #[serde(deserialize_with = "cast::int")]
    pub klt_max_iter: i32,
    /// Highest pyramid level used by the tracker, 0-based.
    #[serde(deserialize_with = "cast::int")]
    pub klt_max_level: i32,
    #[serde(deserialize_with = "cast::float")]
    pub klt_eps: f64,
    /// Frames a feature may be tracked before it is dropped.
    #[serde(rename = "maxFeatureAge", deserialize_with = "cast::int")]
    pub max_feature_age: i32,

    // corner detection
    #[serde(rename = "maxFeaturesPerFrame", deserialize_with = "cast::int")]
    pub max_features_per_frame: i32,
    /// Minimal accepted corner response, relative to the best corner.
    #[serde(deserialize_with = "cast::float")]
    pub quality_level: f64,
    #[serde(deserialize_with = "cast::float")]
    pub min_distance: f64,
    #[serde(deserialize_with = "cast::int")]
    pub block_size: i32,
    #[serde(deserialize_with = "cast::boolean")]
    pub use_harris_detector: bool,
    /// Harris free parameter.
    #[serde(deserialize_with = "cast::float")]
    pub k: f64,

    pub stereo_matching_params: StereoMatchingParams,

    // feature selection
    #[serde(rename = "featureSelectionCriterion")]
    pub feature_selection_criterion: FeatureSelectionCriterion,
    /// Look-ahead of the selector, in seconds.
    #[serde(rename = "featureSelectionHorizon", deserialize_with = "cast::float")]
    pub feature_selection_horizon: f64,
    #[serde(rename = "featureSelectionNrCornersToSelect", deserialize_with = "cast::int")]
    pub feature_selection_nr_corners_to_select: i32,
    #[serde(rename = "featureSelectionImuRate", deserialize_with = "cast::float")]
    pub feature_selection_imu_rate: f64,
    /// Depth assumed for features that were never triangulated.
    #[serde(rename = "featureSelectionDefaultDepth", deserialize_with = "cast::float")]
    pub feature_selection_default_depth: f64,
    #[serde(rename = "featureSelectionCosineNeighborhood", deserialize_with = "cast::float")]
    pub feature_selection_cosine_neighborhood: f64,
    #[serde(rename = "featureSelectionUseLazyEvaluation", deserialize_with = "cast::boolean")]
    pub feature_selection_use_lazy_evaluation: bool,
    #[serde(rename = "useSuccessProbabilities", deserialize_with = "cast::boolean")]
    pub use_success_probabilities: bool,

    // outlier rejection
    #[serde(rename = "useRANSAC", deserialize_with = "cast::boolean")]
    pub use_ransac: bool,
    #[serde(rename = "minNrMonoInliers", deserialize_with = "cast::int")]
    pub min_nr_mono_inliers: i32,
    #[serde(rename = "minNrStereoInliers", deserialize_with = "cast::int")]
    pub min_nr_stereo_inliers: i32,
    #[serde(deserialize_with = "cast::float")]
    pub ransac_threshold_mono: f64,
    #[serde(deserialize_with = "cast::float")]
    pub ransac_threshold_stereo: f64,
    #[serde(deserialize_with = "cast::boolean")]
    pub ransac_use_1point_stereo: bool,
    #[serde(deserialize_with = "cast::boolean")]
    pub ransac_use_2point_mono: bool,
    #[serde(deserialize_with = "cast::int")]
    pub ransac_max_iterations: i32,
    #[serde(deserialize_with = "cast::float")]
    pub ransac_probability: f64,
    #[serde(deserialize_with = "cast::boolean")]
    pub ransac_randomize: bool,

    // keyframes
    /// Seconds between keyframes.
    #[serde(deserialize_with = "cast::float")]
    pub intra_keyframe_time: f64,
    /// A keyframe is forced when fewer features than this are tracked.
    #[serde(deserialize_with = "cast::int")]
    pub min_number_features: i32,
    #[serde(rename = "useStereoTracking", deserialize_with = "cast::boolean")]
    pub use_stereo_tracking: bool,
    /// Milliseconds a debug image stays on screen.
    #[serde(deserialize_with = "cast::int")]
    pub display_time: i32,
    #[serde(rename = "disparityThreshold", deserialize_with = "cast::float")]
    pub disparity_threshold: f64,
}

impl FrontEndParams {
    pub const DEFAULT: FrontEndParams = FrontEndParams {
        klt_win_size: 24,
        klt_max_iter: 30,
        klt_max_level: 4,
        klt_eps: 0.1,
        max_feature_age: 25,

        max_features_per_frame: 1000,
        quality_level: 0.001,
        min_distance: 10.0,
        block_size: 3,
        use_harris_detector: false,
        k: 0.04,

        stereo_matching_params: StereoMatchingParams::DEFAULT,

        feature_selection_criterion: FeatureSelectionCriterion::Quality,
        feature_selection_horizon: 3.0,
        feature_selection_nr_corners_to_select: 1000,
        feature_selection_imu_rate: 0.005,
        feature_selection_default_depth: 5.0,
        // cos(10 deg)
        feature_selection_cosine_neighborhood: 0.984_807_753_012_208,
        feature_selection_use_lazy_evaluation: true,
        use_success_probabilities: true,

        use_ransac: true,
        min_nr_mono_inliers: 10,
        min_nr_stereo_inliers: 5,
        ransac_threshold_mono: 1e-6,
        ransac_threshold_stereo: 1.0,
        ransac_use_1point_stereo: true,
        ransac_use_2point_mono: true,
        ransac_max_iterations: 100,
        ransac_probability: 0.995,
        ransac_randomize: true,

        intra_keyframe_time: 0.2,
        min_number_features: 0,
        use_stereo_tracking: true,
        display_time: 100,
        disparity_threshold: 0.5,
    };

    /// Square KLT search window as `(width, height)`.
    pub fn klt_window(&self) -> (i32, i32) {
        (self.klt_win_size, self.klt_win_size)
    }
}

impl Default for FrontEndParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ParametersTrait for FrontEndParams {
    const NAME: &'static str = "front-end parameters";

    fn from_yaml_mapping(mut root: Mapping) -> Result<Self> {
        let stereo = match root.remove(STEREO_MATCHING_KEY) {
            Some(Value::Mapping(block)) => block,
            _ => Mapping::new(),
        };
        let stereo_matching_params = deserialize_located(stereo, STEREO_BLOCK_PREFIX)?;
        let params: FrontEndParams = deserialize_located(root, "")?;
        Ok(FrontEndParams {
            stereo_matching_params,
            ..params
        })
    }

    fn equals(&self, other: &Self, tol: f64) -> bool {
        let (a, b) = (self, other);
        field_eq("klt_win_size", &a.klt_win_size, &b.klt_win_size, tol)
            && field_eq("klt_max_iter", &a.klt_max_iter, &b.klt_max_iter, tol)
            && field_eq("klt_max_level", &a.klt_max_level, &b.klt_max_level, tol)
            && field_eq("klt_eps", &a.klt_eps, &b.klt_eps, tol)
            && field_eq("maxFeatureAge", &a.max_feature_age, &b.max_feature_age, tol)
            && field_eq(
                "maxFeaturesPerFrame",
                &a.max_features_per_frame,
                &b.max_features_per_frame,
                tol,
            )
            && field_eq("quality_level", &a.quality_level, &b.quality_level, tol)
            && field_eq("min_distance", &a.min_distance, &b.min_distance, tol)
            && field_eq("block_size", &a.block_size, &b.block_size, tol)
            && field_eq(
                "use_harris_detector",
                &a.use_harris_detector,
                &b.use_harris_detector,
                tol,
            )
            && field_eq("k", &a.k, &b.k, tol)
            && a.stereo_matching_params.equals(&b.stereo_matching_params, tol)
            && field_eq(
                "featureSelectionCriterion",
                &a.feature_selection_criterion,
                &b.feature_selection_criterion,
                tol,
            )
            && field_eq(
                "featureSelectionHorizon",
                &a.feature_selection_horizon,
                &b.feature_selection_horizon,
                tol,
            )
            && field_eq(
                "featureSelectionNrCornersToSelect",
                &a.feature_selection_nr_corners_to_select,
                &b.feature_selection_nr_corners_to_select,
                tol,
            )
            && field_eq(
                "featureSelectionImuRate",
                &a.feature_selection_imu_rate,
                &b.feature_selection_imu_rate,
                tol,
            )
            && field_eq(
                "featureSelectionDefaultDepth",
                &a.feature_selection_default_depth,
                &b.feature_selection_default_depth,
                tol,
            )
            && field_eq(
                "featureSelectionCosineNeighborhood",
                &a.feature_selection_cosine_neighborhood,
                &b.feature_selection_cosine_neighborhood,
                tol,
            )
            && field_eq(
                "featureSelectionUseLazyEvaluation",
                &a.feature_selection_use_lazy_evaluation,
                &b.feature_selection_use_lazy_evaluation,
                tol,
            )
            && field_eq(
                "useSuccessProbabilities",
                &a.use_success_probabilities,
                &b.use_success_probabilities,
                tol,
            )
            && field_eq("useRANSAC", &a.use_ransac, &b.use_ransac, tol)
            && field_eq(
                "minNrMonoInliers",
                &a.min_nr_mono_inliers,
                &b.min_nr_mono_inliers,
                tol,
            )
            && field_eq(
                "minNrStereoInliers",
                &a.min_nr_stereo_inliers,
                &b.min_nr_stereo_inliers,
                tol,
            )
            && field_eq(
                "ransac_threshold_mono",
                &a.ransac_threshold_mono,
                &b.ransac_threshold_mono,
                tol,
            )
            && field_eq(
                "ransac_threshold_stereo",
                &a.ransac_threshold_stereo,
                &b.ransac_threshold_stereo,
                tol,
            )
            && field_eq(
                "ransac_use_1point_stereo",
                &a.ransac_use_1point_stereo,
                &b.ransac_use_1point_stereo,
                tol,
            )
            && field_eq(
                "ransac_use_2point_mono",
                &a.ransac_use_2point_mono,
                &b.ransac_use_2point_mono,
                tol,
            )
            && field_eq(
                "ransac_max_iterations",
                &a.ransac_max_iterations,
                &b.ransac_max_iterations,
                tol,
            )
            && field_eq(
                "ransac_probability",
                &a.ransac_probability,
                &b.ransac_probability,
                tol,
            )
            && field_eq(
                "ransac_randomize",
                &a.ransac_randomize,
                &b.ransac_randomize,
                tol,
            )
            && field_eq(
                "intra_keyframe_time",
                &a.intra_keyframe_time,
                &b.intra_keyframe_time,
                tol,
            )
            && field_eq(
                "min_number_features",
                &a.min_number_features,
                &b.min_number_features,
                tol,
            )
            && field_eq(
                "useStereoTracking",
                &a.use_stereo_tracking,
                &b.use_stereo_tracking,
                tol,
            )
            && field_eq("display_time", &a.display_time, &b.display_time, tol)
            && field_eq(
                "disparityThreshold",
                &a.disparity_threshold,
                &b.disparity_threshold,
                tol,
            )
    }

    fn sanity_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let positive = [
            ("klt_win_size", self.klt_win_size),
            ("klt_max_iter", self.klt_max_iter),
            ("maxFeaturesPerFrame", self.max_features_per_frame),
            ("block_size", self.block_size),
            ("ransac_max_iterations", self.ransac_max_iterations),
        ];
        for (name, value) in positive {
            if value <= 0 {
                warnings.push(format!("{} = {} should be positive", name, value));
            }
        }
        for (name, value) in [
            ("klt_max_level", self.klt_max_level),
            ("maxFeatureAge", self.max_feature_age),
        ] {
            if value < 0 {
                warnings.push(format!("{} = {} should not be negative", name, value));
            }
        }
        if !(self.quality_level > 0.0 && self.quality_level <= 1.0) {
            warnings.push(format!("quality_level = {} is outside (0, 1]", self.quality_level));
        }
        if !(self.ransac_probability > 0.0 && self.ransac_probability < 1.0) {
            warnings.push(format!(
                "ransac_probability = {} is outside (0, 1)",
                self.ransac_probability
            ));
        }
        if self.intra_keyframe_time < 0.0 {
            warnings.push(format!(
                "intra_keyframe_time = {} should not be negative",
                self.intra_keyframe_time
            ));
        }
        warnings.extend(self.stereo_matching_params.sanity_warnings());
        warnings
    }
}

impl fmt::Display for FrontEndParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "************* Front-end parameters *************")?;
        writeln!(f, "** KLT tracker parameters **")?;
        writeln!(f, "klt_win_size: {}", self.klt_win_size)?;
        writeln!(f, "klt_max_iter: {}", self.klt_max_iter)?;
        writeln!(f, "klt_max_level: {}", self.klt_max_level)?;
        writeln!(f, "klt_eps: {}", self.klt_eps)?;
        writeln!(f, "maxFeatureAge: {}", self.max_feature_age)?;

        writeln!(f, "** Feature detection parameters **")?;
        writeln!(f, "maxFeaturesPerFrame: {}", self.max_features_per_frame)?;
        writeln!(f, "quality_level: {}", self.quality_level)?;
        writeln!(f, "min_distance: {}", self.min_distance)?;
        writeln!(f, "block_size: {}", self.block_size)?;
        writeln!(f, "use_harris_detector: {}", self.use_harris_detector)?;
        writeln!(f, "k: {}", self.k)?;

        write!(f, "{}", self.stereo_matching_params)?;

        writeln!(f, "** Feature selection parameters **")?;
        writeln!(
            f,
            "featureSelectionCriterion: {}",
            self.feature_selection_criterion
        )?;
        writeln!(
            f,
            "featureSelectionHorizon: {}",
            self.feature_selection_horizon
        )?;
        writeln!(
            f,
            "featureSelectionNrCornersToSelect: {}",
            self.feature_selection_nr_corners_to_select
        )?;
        writeln!(
            f,
            "featureSelectionImuRate: {}",
            self.feature_selection_imu_rate
        )?;
        writeln!(
            f,
            "featureSelectionDefaultDepth: {}",
            self.feature_selection_default_depth
        )?;
        writeln!(
            f,
            "featureSelectionCosineNeighborhood: {}",
            self.feature_selection_cosine_neighborhood
        )?;
        writeln!(
            f,
            "featureSelectionUseLazyEvaluation: {}",
            self.feature_selection_use_lazy_evaluation
        )?;
        writeln!(
            f,
            "useSuccessProbabilities: {}",
            self.use_success_probabilities
        )?;

        writeln!(f, "** RANSAC parameters **")?;
        writeln!(f, "useRANSAC: {}", self.use_ransac)?;
        writeln!(f, "minNrMonoInliers: {}", self.min_nr_mono_inliers)?;
        writeln!(f, "minNrStereoInliers: {}", self.min_nr_stereo_inliers)?;
        writeln!(f, "ransac_threshold_mono: {}", self.ransac_threshold_mono)?;
        writeln!(
            f,
            "ransac_threshold_stereo: {}",
            self.ransac_threshold_stereo
        )?;
        writeln!(
            f,
            "ransac_use_1point_stereo: {}",
            self.ransac_use_1point_stereo
        )?;
        writeln!(f, "ransac_use_2point_mono: {}", self.ransac_use_2point_mono)?;
        writeln!(f, "ransac_max_iterations: {}", self.ransac_max_iterations)?;
        writeln!(f, "ransac_probability: {}", self.ransac_probability)?;
        writeln!(f, "ransac_randomize: {}", self.ransac_randomize)?;

        writeln!(f, "** Keyframe parameters **")?;
        writeln!(f, "intra_keyframe_time: {}", self.intra_keyframe_time)?;
        writeln!(f, "min_number_features: {}", self.min_number_features)?;
        writeln!(f, "useStereoTracking: {}", self.use_stereo_tracking)?;
        writeln!(f, "display_time: {}", self.display_time)?;
        writeln!(f, "disparityThreshold: {}", self.disparity_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::DEFAULT_TOLERANCE;
    use crate::error::ParamsError;

    type FloatField = fn(&mut FrontEndParams) -> &mut f64;

    fn float_fields() -> Vec<(&'static str, FloatField)> {
        let fields: [(&'static str, FloatField); 17] = [
            ("klt_eps", |p| &mut p.klt_eps),
            ("quality_level", |p| &mut p.quality_level),
            ("min_distance", |p| &mut p.min_distance),
            ("k", |p| &mut p.k),
            ("nominal_baseline", |p| &mut p.stereo_matching_params.nominal_baseline),
            ("tolerance_template_matching", |p| {
                &mut p.stereo_matching_params.tolerance_template_matching
            }),
            ("min_point_dist", |p| &mut p.stereo_matching_params.min_point_dist),
            ("max_point_dist", |p| &mut p.stereo_matching_params.max_point_dist),
            ("featureSelectionHorizon", |p| &mut p.feature_selection_horizon),
            ("featureSelectionImuRate", |p| &mut p.feature_selection_imu_rate),
            ("featureSelectionDefaultDepth", |p| &mut p.feature_selection_default_depth),
            ("featureSelectionCosineNeighborhood", |p| {
                &mut p.feature_selection_cosine_neighborhood
            }),
            ("ransac_threshold_mono", |p| &mut p.ransac_threshold_mono),
            ("ransac_threshold_stereo", |p| &mut p.ransac_threshold_stereo),
            ("ransac_probability", |p| &mut p.ransac_probability),
            ("intra_keyframe_time", |p| &mut p.intra_keyframe_time),
            ("disparityThreshold", |p| &mut p.disparity_threshold),
        ];
        fields.to_vec()
    }

    #[test]
    fn default_equals_itself() {
        let p = FrontEndParams::default();
        assert!(p.equals_default_tol(&p));
        assert_eq!(p, FrontEndParams::DEFAULT);
        assert!(p.sanity_warnings().is_empty());
    }

    #[test]
    fn cosine_neighborhood_default_is_ten_degrees() {
        let expected = 10f64.to_radians().cos();
        let actual = FrontEndParams::DEFAULT.feature_selection_cosine_neighborhood;
        assert!((actual - expected).abs() < 1e-12);
    }

    #[test]
    fn each_float_field_is_compared_with_tolerance() {
        let base = FrontEndParams::default();
        for (name, field) in float_fields() {
            let mut moved = base.clone();
            *field(&mut moved) += 1e-6;
            assert!(!base.equals(&moved, DEFAULT_TOLERANCE), "{} change not detected", name);

            let mut nudged = base.clone();
            *field(&mut nudged) += 1e-8;
            assert!(base.equals(&nudged, DEFAULT_TOLERANCE), "{} nudge rejected", name);
        }
    }

    #[test]
    fn exact_fields_are_compared_exactly() {
        let base = FrontEndParams::default();
        let changes: &[fn(&mut FrontEndParams)] = &[
            |p| p.klt_win_size += 1,
            |p| p.klt_max_iter += 1,
            |p| p.klt_max_level += 1,
            |p| p.max_feature_age += 1,
            |p| p.max_features_per_frame += 1,
            |p| p.block_size += 2,
            |p| p.use_harris_detector = !p.use_harris_detector,
            |p| p.stereo_matching_params.equalize_image = true,
            |p| p.stereo_matching_params.templ_cols += 2,
            |p| p.stereo_matching_params.templ_rows += 2,
            |p| p.stereo_matching_params.stripe_extra_rows += 2,
            |p| p.stereo_matching_params.bidirectional_matching = true,
            |p| p.stereo_matching_params.subpixel_refinement = true,
            |p| p.feature_selection_criterion = FeatureSelectionCriterion::LogDet,
            |p| p.feature_selection_nr_corners_to_select += 1,
            |p| p.feature_selection_use_lazy_evaluation = false,
            |p| p.use_success_probabilities = false,
            |p| p.use_ransac = false,
            |p| p.min_nr_mono_inliers += 1,
            |p| p.min_nr_stereo_inliers += 1,
            |p| p.ransac_use_1point_stereo = false,
            |p| p.ransac_use_2point_mono = false,
            |p| p.ransac_max_iterations += 1,
            |p| p.ransac_randomize = false,
            |p| p.min_number_features += 1,
            |p| p.use_stereo_tracking = false,
            |p| p.display_time += 1,
        ];
        for (i, change) in changes.iter().enumerate() {
            let mut other = base.clone();
            change(&mut other);
            assert!(!base.equals(&other, 1.0), "change #{} not detected", i);
        }
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let doc = "klt_win_size: 31\nuseRANSAC: false\nstereo_matching_params:\n  templ_rows: 7\n";
        let p = FrontEndParams::from_yaml_str(doc).unwrap();

        let mut expected = FrontEndParams::default();
        expected.klt_win_size = 31;
        expected.use_ransac = false;
        expected.stereo_matching_params.templ_rows = 7;
        assert!(p.equals_default_tol(&expected));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let doc =
            "klt_eps: 0.01\nsome_future_key: [1, 2, 3]\nstereo_matching_params:\n  rig: left\n";
        let p = FrontEndParams::from_yaml_str(doc).unwrap();
        assert_eq!(p.klt_eps, 0.01);
        assert_eq!(p.stereo_matching_params, StereoMatchingParams::DEFAULT);
    }

    #[test]
    fn flat_stereo_keys_are_read() {
        let doc = "nominal_baseline: 0.2\ntempl_cols: 51\nbidirectional_matching: 1\n";
        let p = FrontEndParams::from_yaml_str(doc).unwrap();
        assert_eq!(p.stereo_matching_params.nominal_baseline, 0.2);
        assert_eq!(p.stereo_matching_params.templ_cols, 51);
        assert!(p.stereo_matching_params.bidirectional_matching);
    }

    #[test]
    fn nested_stereo_key_overrides_flat_one() {
        let doc = "templ_cols: 51\nstereo_matching_params:\n  templ_cols: 7\n";
        let p = FrontEndParams::from_yaml_str(doc).unwrap();
        assert_eq!(p.stereo_matching_params.templ_cols, 7);
    }

    #[test]
    fn empty_document_gives_defaults() {
        let p = FrontEndParams::from_yaml_str("").unwrap();
        assert_eq!(p, FrontEndParams::DEFAULT);
        let p = FrontEndParams::from_yaml_str("%YAML:1.0\n---\n").unwrap();
        assert_eq!(p, FrontEndParams::DEFAULT);
    }

    #[test]
    fn lossless_coercions_are_accepted() {
        let doc = "klt_win_size: 24.0\nmin_distance: 20\nuse_harris_detector: 1\n\
                   featureSelectionCriterion: 2\n";
        let p = FrontEndParams::from_yaml_str(doc).unwrap();
        assert_eq!(p.klt_win_size, 24);
        assert_eq!(p.min_distance, 20.0);
        assert!(p.use_harris_detector);
        assert_eq!(p.feature_selection_criterion, FeatureSelectionCriterion::LogDet);
    }

    #[test]
    fn lossy_values_fail_the_load() {
        for doc in [
            "klt_win_size: 24.5\n",
            "useRANSAC: 2\n",
            "klt_eps: tiny\n",
            "klt_max_iter:\n",
            "featureSelectionCriterion: 9\n",
            "stereo_matching_params:\n  templ_cols: 10.5\n",
            "templ_rows: true\n",
        ] {
            let err = FrontEndParams::from_yaml_str(doc).unwrap_err();
            assert!(matches!(err, ParamsError::Schema(_)), "{:?} for {:?}", err, doc);
        }
    }

    #[test]
    fn schema_error_names_the_key() {
        for (doc, key) in [
            ("useRANSAC: 2\n", "useRANSAC: "),
            (
                "stereo_matching_params:\n  templ_cols: 10.5\n",
                "stereo_matching_params.templ_cols: ",
            ),
            ("klt_eps: 0.1\ntempl_rows: x\n", "stereo_matching_params.templ_rows: "),
            ("klt_eps: .nan\n", "klt_eps: "),
            ("disparityThreshold: .inf\n", "disparityThreshold: "),
            ("featureSelectionCriterion: 9\n", "featureSelectionCriterion: "),
        ] {
            match FrontEndParams::from_yaml_str(doc) {
                Err(ParamsError::Schema(msg)) => assert!(msg.starts_with(key), "{}", msg),
                other => panic!("{:?} for {:?}", other, doc),
            }
        }
    }

    #[test]
    fn loaded_set_always_equals_itself() {
        let doc = "klt_eps: 1.0e+300\nmin_distance: -1.0e+300\n";
        let p = FrontEndParams::from_yaml_str(doc).unwrap();
        assert!(p.equals_default_tol(&p));

        let mut q = FrontEndParams::default();
        q.klt_eps = f64::NAN;
        q.k = f64::INFINITY;
        assert!(q.equals_default_tol(&q));
        assert!(!q.equals_default_tol(&FrontEndParams::default()));
    }

    #[test]
    fn malformed_documents_fail_the_load() {
        for doc in ["klt_win_size: [1\n", "- 1\n", "stereo_matching_params: [1]\n"] {
            assert!(matches!(
                FrontEndParams::from_yaml_str(doc),
                Err(ParamsError::Schema(_))
            ));
        }
    }

    #[test]
    fn written_file_reads_back_equal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frontend.yaml");

        let mut p = FrontEndParams::default();
        p.klt_eps = 0.001;
        p.feature_selection_criterion = FeatureSelectionCriterion::Random;
        p.stereo_matching_params.max_point_dist = 150.0;
        p.use_stereo_tracking = false;
        p.write_yaml(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("stereo_matching_params:"));
        assert!(text.contains("featureSelectionCriterion: 3"));

        let back = FrontEndParams::parse_yaml(&path).unwrap();
        assert!(back.equals_default_tol(&p));
    }

    #[test]
    fn reports_out_of_range_values() {
        let mut p = FrontEndParams::default();
        p.klt_win_size = -1;
        p.quality_level = 1.5;
        p.ransac_probability = 1.0;
        p.stereo_matching_params.templ_rows = 10;
        let warnings = p.sanity_warnings();
        assert_eq!(warnings.len(), 4, "{:?}", warnings);
        assert!(warnings[0].contains("klt_win_size"));
    }

    #[test]
    fn display_lists_every_group() {
        let text = FrontEndParams::default().to_string();
        for header in [
            "KLT",
            "Feature detection",
            "Stereo matching",
            "Feature selection",
            "RANSAC",
            "Keyframe",
        ] {
            assert!(text.contains(header), "missing {}", header);
        }
        assert!(text.contains("featureSelectionCriterion: QUALITY (0)"));
    }

    #[test]
    fn klt_window_is_square() {
        assert_eq!(FrontEndParams::default().klt_window(), (24, 24));
    }
}
