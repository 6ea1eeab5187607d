//! Parameters of a stereo visual-inertial front end.
//!
//! [`FrontEndParams`] gathers the KLT tracker, corner detector, stereo
//! matcher, feature selector and RANSAC settings. It is loaded once from a
//! YAML file, compared with a tolerance and otherwise treated as read-only.
//!
//! ```no_run
//! use vio_frontend_params::{FrontEndParams, ParametersTrait};
//!
//! let params = FrontEndParams::parse_yaml("configs/frontend_params.yaml")?;
//! assert!(params.equals_default_tol(&params));
//! # Ok::<(), vio_frontend_params::ParamsError>(())
//! ```

mod cast;
pub mod compare;
#[cfg(feature = "cv")]
pub mod cv;
mod error;
pub mod params;

pub use compare::{ApproxEq, DEFAULT_TOLERANCE};
pub use error::{ParamsError, Result};
pub use params::{
    FeatureSelectionCriterion, FrontEndParams, ParametersTrait, StereoMatchingParams,
    STEREO_MATCHING_KEY,
};
