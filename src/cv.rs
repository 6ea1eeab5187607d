//! KLT settings in OpenCV form.

use opencv::core::{Size, TermCriteria, TermCriteria_COUNT, TermCriteria_EPS};

use crate::params::FrontEndParams;

/// Arguments of `calc_optical_flow_pyr_lk` derived from the parameters.
#[derive(Debug, Clone, Copy)]
pub struct KltSettings {
    pub window: Size,
    pub max_level: i32,
    pub criteria: TermCriteria,
}

impl KltSettings {
    pub fn from_params(params: &FrontEndParams) -> opencv::Result<Self> {
        let (width, height) = params.klt_window();
        let criteria = TermCriteria::new(
            TermCriteria_EPS + TermCriteria_COUNT,
            params.klt_max_iter,
            params.klt_eps,
        )?;
        Ok(Self {
            window: Size::new(width, height),
            max_level: params.klt_max_level,
            criteria,
        })
    }
}
