use crate::model::{ArgValue, Observation};
use std::collections::{BTreeMap, BTreeSet};

/// Arguments with one and the same value on every observation of a test.
pub type CommonArgs = BTreeMap<String, ArgValue>;

/// Collect the arguments that are present on all passed observations with a single value.
///
/// Common arguments describe the test as a whole and are left out of record identity.
pub fn common_args(observations: &[Observation]) -> CommonArgs {
    let mut seen: BTreeMap<&str, (usize, BTreeSet<&str>)> = BTreeMap::new();
    for obs in observations {
        for (name, value) in &obs.args {
            let entry = seen.entry(name.as_str()).or_default();
            entry.0 += 1;
            entry.1.insert(value.as_str());
        }
    }

    seen.into_iter()
        .filter(|(_, (count, values))| *count == observations.len() && values.len() == 1)
        .filter_map(|(name, (_, values))| {
            values
                .into_iter()
                .next()
                .map(|value| (name.to_string(), ArgValue::parse(value)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetricMeta;

    fn obs(args: &[(&str, &str)]) -> Observation {
        Observation {
            id: 0,
            test_name: "t".into(),
            iteration_id: None,
            result_id: None,
            args: args
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            value: 0.0,
            metric: MetricMeta::default(),
        }
    }

    #[test]
    fn test_only_constant_arguments_are_common() {
        let all = vec![
            obs(&[("host", "a"), ("size", "1"), ("mtu", "1500")]),
            obs(&[("host", "a"), ("size", "2"), ("mtu", "1500")]),
        ];
        let common = common_args(&all);
        assert_eq!(common.len(), 2);
        assert_eq!(common["host"], ArgValue::Text("a".into()));
        assert_eq!(common["mtu"], ArgValue::Int(1500));
    }

    #[test]
    fn test_argument_missing_on_some_iteration_is_not_common() {
        let all = vec![obs(&[("host", "a"), ("opt", "x")]), obs(&[("host", "a")])];
        let common = common_args(&all);
        assert!(common.contains_key("host"));
        assert!(!common.contains_key("opt"));
    }

    #[test]
    fn test_no_observations_no_common_args() {
        assert!(common_args(&[]).is_empty());
    }
}
