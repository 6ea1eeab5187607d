//! Lossless scalar coercion for parameter files.
//!
//! Files written by OpenCV `FileStorage` store booleans as `0`/`1` and
//! hand-edited files often carry `20` where a float is expected or `24.0`
//! where an integer is. These deserializers accept such values as long as no
//! information is lost and reject everything else.

use std::fmt;

use serde::de::{self, Deserializer, Unexpected, Visitor};

pub(crate) fn int<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(IntVisitor)
}

pub(crate) fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(FloatVisitor)
}

pub(crate) fn boolean<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(BoolVisitor)
}

/// Integral value of a float, if it has one that fits an `i64`.
pub(crate) fn integral(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

struct IntVisitor;

impl<'de> Visitor<'de> for IntVisitor {
    type Value = i32;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer in the i32 range")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i32, E> {
        i32::try_from(v).map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i32, E> {
        i32::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i32, E> {
        integral(v)
            .and_then(|i| i32::try_from(i).ok())
            .ok_or_else(|| E::invalid_value(Unexpected::Float(v), &self))
    }
}

struct FloatVisitor;

impl<'de> Visitor<'de> for FloatVisitor {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a finite number")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
        if v.is_finite() {
            Ok(v)
        } else {
            Err(E::invalid_value(Unexpected::Float(v), &self))
        }
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
        let f = v as f64;
        // 2^63 saturates back to i64::MAX, so it never round-trips
        if f < i64::MAX as f64 && f as i64 == v {
            Ok(f)
        } else {
            Err(E::invalid_value(Unexpected::Signed(v), &self))
        }
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
        let f = v as f64;
        if f < u64::MAX as f64 && f as u64 == v {
            Ok(f)
        } else {
            Err(E::invalid_value(Unexpected::Unsigned(v), &self))
        }
    }
}

struct BoolVisitor;

impl<'de> Visitor<'de> for BoolVisitor {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a boolean or 0/1")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
        match v {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(E::invalid_value(Unexpected::Signed(v), &self)),
        }
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
        match v {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(E::invalid_value(Unexpected::Unsigned(v), &self)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "super::int")]
        i: i32,
        #[serde(deserialize_with = "super::float")]
        f: f64,
        #[serde(deserialize_with = "super::boolean")]
        b: bool,
    }

    fn sample(doc: &str) -> Result<Sample, serde_yaml::Error> {
        serde_yaml::from_str(doc)
    }

    #[test]
    fn accepts_lossless_values() {
        let p = sample("i: 24.0\nf: 20\nb: 1").unwrap();
        assert_eq!(p.i, 24);
        assert_eq!(p.f, 20.0);
        assert!(p.b);

        let p = sample("i: -3\nf: 0.5\nb: false").unwrap();
        assert_eq!(p.i, -3);
        assert_eq!(p.f, 0.5);
        assert!(!p.b);
    }

    #[test]
    fn rejects_lossy_values() {
        assert!(sample("i: 24.5\nf: 1\nb: true").is_err());
        assert!(sample("i: 4294967296\nf: 1\nb: true").is_err());
        assert!(sample("i: 1\nf: 1\nb: 2").is_err());
        assert!(sample("i: 1\nf: one\nb: true").is_err());
        assert!(sample("i: \"7\"\nf: 1\nb: true").is_err());
        assert!(sample("i: 1\nf: 1\nb: yes").is_err());
    }

    #[test]
    fn integers_convert_to_float_only_when_exact() {
        let p = sample("i: 1\nf: 100000000000000000\nb: true").unwrap();
        assert_eq!(p.f, 1e17);
        let p = sample("i: 1\nf: -9007199254740992\nb: true").unwrap();
        assert_eq!(p.f, -9007199254740992.0);

        assert!(sample("i: 1\nf: 9007199254740993\nb: true").is_err());
        assert!(sample("i: 1\nf: 18446744073709551615\nb: true").is_err());
        assert!(sample("i: 1\nf: 9223372036854775807\nb: true").is_err());
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        for f in [".nan", ".inf", "-.inf"] {
            assert!(sample(&format!("i: 1\nf: {}\nb: true", f)).is_err(), "{}", f);
        }
    }

    #[test]
    fn integral_floats() {
        assert_eq!(super::integral(3.0), Some(3));
        assert_eq!(super::integral(-0.0), Some(0));
        assert_eq!(super::integral(0.1), None);
        assert_eq!(super::integral(f64::NAN), None);
        assert_eq!(super::integral(f64::INFINITY), None);
    }
}
