//! Front-end parameter sets and their YAML files.

mod criterion;
mod frontend;
mod stereo_matching;

pub use criterion::FeatureSelectionCriterion;
pub use frontend::FrontEndParams;
pub use stereo_matching::StereoMatchingParams;

use std::fmt::Display;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::compare::DEFAULT_TOLERANCE;
use crate::error::{ParamsError, Result};

/// Key of the nested stereo block.
pub const STEREO_MATCHING_KEY: &str = "stereo_matching_params";

/// Directive OpenCV `FileStorage` puts on the first line of its YAML files.
const OPENCV_YAML_DIRECTIVE: &str = "%YAML:";

/// A parameter set that lives in a YAML file.
pub trait ParametersTrait: Sized + Default + Serialize + Display {
    const NAME: &'static str;

    /// Builds the set from a normalised document root.
    ///
    /// The root always carries the stereo block under
    /// [`STEREO_MATCHING_KEY`], whether the file had it nested or flat.
    fn from_yaml_mapping(root: Mapping) -> Result<Self>;

    /// Field-wise comparison, floats within `tol`.
    fn equals(&self, other: &Self, tol: f64) -> bool;

    /// Values outside their sensible range. They are reported, not rejected.
    fn sanity_warnings(&self) -> Vec<String> {
        Vec::new()
    }

    fn equals_default_tol(&self, other: &Self) -> bool {
        self.equals(other, DEFAULT_TOLERANCE)
    }

    fn from_yaml_str(doc: &str) -> Result<Self> {
        Self::from_yaml_mapping(read_document(doc)?)
    }

    fn parse_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let doc = std::fs::read_to_string(path).map_err(|source| ParamsError::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let params = Self::from_yaml_str(&doc)?;
        log::info!("loaded {} from {:?}", Self::NAME, path);
        for warning in params.sanity_warnings() {
            log::warn!("{}: {}", Self::NAME, warning);
        }
        Ok(params)
    }

    fn write_yaml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let doc = serde_yaml::to_string(self)?;
        std::fs::write(path.as_ref(), doc)?;
        Ok(())
    }

    fn print(&self) {
        log::info!("{}", self);
    }
}

/// Parses a parameter document into a mapping with the stereo block nested.
///
/// Stereo keys found at the top level are moved into the block unless the
/// block already defines them.
fn read_document(doc: &str) -> Result<Mapping> {
    let value: Value = serde_yaml::from_str(strip_opencv_directive(doc))?;
    let mut root = match value {
        Value::Null => Mapping::new(),
        Value::Mapping(m) => m,
        other => {
            return Err(ParamsError::Schema(format!(
                "expected a mapping at the document root, found {}",
                value_kind(&other)
            )))
        }
    };

    let mut stereo = match root.remove(STEREO_MATCHING_KEY) {
        None | Some(Value::Null) => Mapping::new(),
        Some(Value::Mapping(m)) => m,
        Some(other) => {
            return Err(ParamsError::Schema(format!(
                "`{}` must be a mapping, found {}",
                STEREO_MATCHING_KEY,
                value_kind(&other)
            )))
        }
    };
    for key in stereo_matching::STEREO_KEYS {
        if let Some(flat) = root.remove(key) {
            if !stereo.contains_key(key) {
                stereo.insert(Value::String(key.to_owned()), flat);
            }
        }
    }
    root.insert(
        Value::String(STEREO_MATCHING_KEY.to_owned()),
        Value::Mapping(stereo),
    );
    Ok(root)
}

/// Deserializes one mapping and names the offending key on failure.
///
/// `prefix` is prepended to the key, e.g. `stereo_matching_params.`.
fn deserialize_located<T: DeserializeOwned>(map: Mapping, prefix: &str) -> Result<T> {
    let value = Value::Mapping(map);
    match T::deserialize(&value) {
        Ok(parsed) => Ok(parsed),
        Err(err) => {
            let key = value.as_mapping().and_then(failing_key::<T>);
            Err(ParamsError::Schema(match key {
                Some(key) => format!("{}{}: {}", prefix, key, err),
                None => err.to_string(),
            }))
        }
    }
}

/// First entry that fails to deserialize when given on its own.
fn failing_key<T: DeserializeOwned>(map: &Mapping) -> Option<String> {
    map.iter().find_map(|(key, value)| {
        let mut single = Mapping::new();
        single.insert(key.clone(), value.clone());
        T::deserialize(&Value::Mapping(single)).err().map(|_| match key {
            Value::String(name) => name.clone(),
            other => format!("{:?}", other),
        })
    })
}

fn strip_opencv_directive(doc: &str) -> &str {
    let trimmed = doc.trim_start();
    if trimmed.starts_with(OPENCV_YAML_DIRECTIVE) {
        trimmed.split_once('\n').map_or("", |(_, rest)| rest)
    } else {
        doc
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_opencv_directive() {
        assert_eq!(strip_opencv_directive("%YAML:1.0\n---\na: 1\n"), "---\na: 1\n");
        assert_eq!(strip_opencv_directive("a: 1\n"), "a: 1\n");
        assert_eq!(strip_opencv_directive("%YAML:1.0"), "");
    }

    #[test]
    fn empty_document_is_an_empty_mapping() {
        let root = read_document("").unwrap();
        assert_eq!(root.len(), 1);
        assert!(matches!(root.get(STEREO_MATCHING_KEY), Some(Value::Mapping(m)) if m.is_empty()));
    }

    #[test]
    fn lifts_flat_stereo_keys() {
        let root = read_document("templ_cols: 51\nklt_eps: 0.1\n").unwrap();
        assert!(root.contains_key("klt_eps"));
        assert!(!root.contains_key("templ_cols"));
        let stereo = root.get(STEREO_MATCHING_KEY).unwrap().as_mapping().unwrap();
        assert_eq!(stereo.get("templ_cols").and_then(Value::as_i64), Some(51));
    }

    #[test]
    fn nested_stereo_key_wins() {
        let doc = "templ_cols: 51\nstereo_matching_params:\n  templ_cols: 7\n";
        let root = read_document(doc).unwrap();
        let stereo = root.get(STEREO_MATCHING_KEY).unwrap().as_mapping().unwrap();
        assert_eq!(stereo.get("templ_cols").and_then(Value::as_i64), Some(7));
    }

    #[test]
    fn schema_errors_name_the_key() {
        let map = read_document("klt_eps: 0.1\ntempl_cols: 10.5\n").unwrap();
        let block = map.get(STEREO_MATCHING_KEY).unwrap().as_mapping().unwrap().clone();
        let err = deserialize_located::<StereoMatchingParams>(block, "stereo.").unwrap_err();
        match err {
            ParamsError::Schema(msg) => {
                assert!(msg.starts_with("stereo.templ_cols: "), "{}", msg);
                assert!(msg.contains("10.5"), "{}", msg);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn rejects_malformed_structure() {
        assert!(matches!(read_document("- 1\n- 2\n"), Err(ParamsError::Schema(_))));
        assert!(matches!(
            read_document("stereo_matching_params: 3\n"),
            Err(ParamsError::Schema(_))
        ));
        assert!(matches!(read_document("a: [1, 2\n"), Err(ParamsError::Schema(_))));
    }
}
