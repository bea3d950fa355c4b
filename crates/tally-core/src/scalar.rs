//! Serde helpers: accept YAML/JSON scalars (string, integer, float, bool) wherever the model
//! stores a string. Config authors write `not_show_args: {size: [64, 128]}` and argument values
//! exported as numbers; both end up as the raw string form.

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct ScalarString(pub(crate) String);

impl<'de> Deserialize<'de> for ScalarString {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ScalarVisitor;

        impl Visitor<'_> for ScalarVisitor {
            type Value = ScalarString;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string, number or boolean")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(ScalarString(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(ScalarString(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(ScalarString(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(ScalarString(v.to_string()))
            }

            // Floats lose their spelling (`1e+6` arrives as 1000000.0); multipliers are
            // therefore matched by value, see `labels::multiplier_value`.
            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(ScalarString(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(ScalarString(v.to_string()))
            }
        }

        d.deserialize_any(ScalarVisitor)
    }
}

pub(crate) fn string_list<'de, D>(d: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<ScalarString> = Vec::deserialize(d)?;
    Ok(raw.into_iter().map(|s| s.0).collect())
}

pub(crate) fn opt_string_list<'de, D>(d: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<ScalarString>> = Option::deserialize(d)?;
    Ok(raw.map(|v| v.into_iter().map(|s| s.0).collect()))
}

pub(crate) fn opt_string<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<ScalarString> = Option::deserialize(d)?;
    Ok(raw.map(|s| s.0))
}

pub(crate) fn string_map<'de, D>(d: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<ScalarString, ScalarString> = BTreeMap::deserialize(d)?;
    Ok(raw.into_iter().map(|(k, v)| (k.0, v.0)).collect())
}

pub(crate) fn string_list_map<'de, D>(d: D) -> Result<BTreeMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<ScalarString, Vec<ScalarString>> = BTreeMap::deserialize(d)?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| (k.0, v.into_iter().map(|s| s.0).collect()))
        .collect())
}

pub(crate) fn opt_string_list_map<'de, D>(
    d: D,
) -> Result<Option<BTreeMap<String, Vec<String>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<ScalarString, Vec<ScalarString>>> = Option::deserialize(d)?;
    Ok(raw.map(|m| {
        m.into_iter()
            .map(|(k, v)| (k.0, v.into_iter().map(|s| s.0).collect()))
            .collect()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "string_list_map")]
        args: BTreeMap<String, Vec<String>>,
        #[serde(default, deserialize_with = "opt_string")]
        base: Option<String>,
    }

    #[test]
    fn test_numbers_become_strings() {
        let h: Holder = serde_yaml::from_str("args:\n  size: [64, 128, big]\nbase: 1\n").unwrap();
        assert_eq!(h.args["size"], vec!["64", "128", "big"]);
        assert_eq!(h.base.as_deref(), Some("1"));
    }

    #[test]
    fn test_integer_map_keys_in_yaml() {
        #[derive(Deserialize)]
        struct Labels {
            #[serde(deserialize_with = "string_map")]
            labels: BTreeMap<String, String>,
        }
        let l: Labels = serde_yaml::from_str("labels:\n  1: one\n  two: 2\n").unwrap();
        assert_eq!(l.labels["1"], "one");
        assert_eq!(l.labels["two"], "2");
    }
}
