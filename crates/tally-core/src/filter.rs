//! Observation filters applied before aggregation.

use crate::config::AxisYClause;
use crate::labels::multiplier_value;
use crate::model::Observation;
use std::collections::BTreeMap;

/// Keep observations matching at least one `axis_y` clause.
///
/// An empty clause list keeps nothing.
pub fn filter_by_axis_y(
    observations: Vec<Observation>,
    clauses: &[AxisYClause],
) -> Vec<Observation> {
    observations
        .into_iter()
        .filter(|obs| clauses.iter().any(|clause| clause_matches(clause, obs)))
        .collect()
}

fn clause_matches(clause: &AxisYClause, obs: &Observation) -> bool {
    let metric = &obs.metric;

    if let Some(tools) = &clause.tool {
        match &metric.tool {
            Some(tool) if tools.contains(tool) => {}
            _ => return false,
        }
    }

    // keys entries are alternatives: one satisfied key is enough
    if let Some(keys) = &clause.keys {
        let any_key = keys.iter().any(|(key, allowed)| {
            metric
                .keys
                .get(key)
                .is_some_and(|value| allowed.contains(value))
        });
        if !any_key {
            return false;
        }
    }

    clause.subjects.iter().all(|(attr, allowed)| {
        metric
            .subject(attr)
            .is_some_and(|value| allowed.iter().any(|a| subject_eq(attr, a, value)))
    })
}

/// Subject values compare as text; multipliers also compare by numeric value, so `1e+6`
/// in a clause matches a metric written as `1000000`.
fn subject_eq(attr: &str, allowed: &str, value: &str) -> bool {
    if allowed == value {
        return true;
    }
    attr == "multiplier"
        && matches!(
            (multiplier_value(allowed), multiplier_value(value)),
            (Some(a), Some(b)) if a == b
        )
}

/// Drop observations whose iteration carries any excluded `(argument, value)` pair.
pub fn filter_by_not_show_args(
    observations: Vec<Observation>,
    not_show_args: &BTreeMap<String, Vec<String>>,
) -> Vec<Observation> {
    if not_show_args.is_empty() {
        return observations;
    }
    observations
        .into_iter()
        .filter(|obs| {
            !not_show_args.iter().any(|(arg, excluded)| {
                obs.arg(arg)
                    .is_some_and(|value| excluded.iter().any(|e| e == value))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetricMeta;

    fn obs(
        id: u64,
        kind: &str,
        tool: Option<&str>,
        keys: &[(&str, &str)],
        args: &[(&str, &str)],
    ) -> Observation {
        Observation {
            id,
            test_name: "t".into(),
            iteration_id: None,
            result_id: None,
            args: args.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            value: 1.0,
            metric: MetricMeta {
                kind: kind.into(),
                tool: tool.map(String::from),
                keys: keys.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
                ..MetricMeta::default()
            },
        }
    }

    fn subjects(pairs: &[(&str, &str)]) -> BTreeMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), vec![v.to_string()]))
            .collect()
    }

    fn ids(observations: &[Observation]) -> Vec<u64> {
        observations.iter().map(|o| o.id).collect()
    }

    #[test]
    fn test_empty_clause_list_keeps_nothing() {
        let all = vec![obs(1, "throughput", None, &[], &[])];
        assert!(filter_by_axis_y(all, &[]).is_empty());
    }

    #[test]
    fn test_clauses_are_alternatives() {
        let all = vec![
            obs(1, "throughput", None, &[], &[]),
            obs(2, "latency", None, &[], &[]),
            obs(3, "cpu", None, &[], &[]),
        ];
        let clauses = vec![
            AxisYClause {
                subjects: subjects(&[("type", "throughput")]),
                ..AxisYClause::default()
            },
            AxisYClause {
                subjects: subjects(&[("type", "latency")]),
                ..AxisYClause::default()
            },
        ];
        assert_eq!(ids(&filter_by_axis_y(all, &clauses)), [1, 2]);
    }

    #[test]
    fn test_overlapping_clauses_keep_each_observation_once() {
        let all = vec![obs(1, "throughput", Some("iperf"), &[], &[])];
        let clauses = vec![
            AxisYClause {
                tool: Some(vec!["iperf".into()]),
                ..AxisYClause::default()
            },
            AxisYClause {
                subjects: subjects(&[("type", "throughput")]),
                ..AxisYClause::default()
            },
        ];
        assert_eq!(ids(&filter_by_axis_y(all, &clauses)), [1]);
    }

    #[test]
    fn test_tool_and_subjects_are_conjunctive() {
        let all = vec![
            obs(1, "throughput", Some("iperf"), &[], &[]),
            obs(2, "throughput", Some("netperf"), &[], &[]),
            obs(3, "latency", Some("iperf"), &[], &[]),
            obs(4, "throughput", None, &[], &[]),
        ];
        let clauses = vec![AxisYClause {
            tool: Some(vec!["iperf".into()]),
            subjects: subjects(&[("type", "throughput")]),
            ..AxisYClause::default()
        }];
        assert_eq!(ids(&filter_by_axis_y(all, &clauses)), [1]);
    }

    #[test]
    fn test_keys_match_any_entry() {
        let all = vec![
            obs(1, "throughput", None, &[("side", "tx")], &[]),
            obs(2, "throughput", None, &[("queue", "4")], &[]),
            obs(3, "throughput", None, &[("side", "rx")], &[]),
            obs(4, "throughput", None, &[], &[]),
        ];
        let clauses = vec![AxisYClause {
            keys: Some(subjects(&[("side", "tx"), ("queue", "4")])),
            ..AxisYClause::default()
        }];
        assert_eq!(ids(&filter_by_axis_y(all, &clauses)), [1, 2]);
    }

    #[test]
    fn test_empty_keys_block_matches_nothing() {
        let all = vec![obs(1, "throughput", None, &[("side", "tx")], &[])];
        let clauses = vec![AxisYClause {
            keys: Some(BTreeMap::new()),
            ..AxisYClause::default()
        }];
        assert!(filter_by_axis_y(all, &clauses).is_empty());
    }

    #[test]
    fn test_multiplier_matches_by_value() {
        let mut mega = obs(1, "throughput", None, &[], &[]);
        mega.metric.multiplier = Some("1e+6".into());
        let mut kilo = obs(2, "throughput", None, &[], &[]);
        kilo.metric.multiplier = Some("1e+3".into());
        let mut binary = obs(3, "throughput", None, &[], &[]);
        binary.metric.multiplier = Some("0x1p20".into());

        // a YAML float 1e+6 reaches the clause as "1000000"
        let clauses = vec![AxisYClause {
            subjects: subjects(&[("multiplier", "1000000")]),
            ..AxisYClause::default()
        }];
        assert_eq!(ids(&filter_by_axis_y(vec![mega, kilo, binary], &clauses)), [1]);
    }

    #[test]
    fn test_other_subjects_compare_as_text() {
        let all = vec![obs(1, "1e3", None, &[], &[])];
        let clauses = vec![AxisYClause {
            subjects: subjects(&[("type", "1000")]),
            ..AxisYClause::default()
        }];
        assert!(filter_by_axis_y(all, &clauses).is_empty());
    }

    #[test]
    fn test_missing_subject_attribute_does_not_match() {
        let all = vec![obs(1, "throughput", None, &[], &[])];
        let clauses = vec![AxisYClause {
            subjects: subjects(&[("aggr", "mean")]),
            ..AxisYClause::default()
        }];
        assert!(filter_by_axis_y(all, &clauses).is_empty());
    }

    #[test]
    fn test_not_show_excludes_on_any_argument() {
        let all = vec![
            obs(1, "t", None, &[], &[("size", "1"), ("mode", "a")]),
            obs(2, "t", None, &[], &[("size", "2"), ("mode", "b")]),
            obs(3, "t", None, &[], &[("size", "3"), ("mode", "a")]),
            obs(4, "t", None, &[], &[("mode", "c")]),
        ];
        let not_show = subjects(&[("size", "1"), ("mode", "b")]);
        assert_eq!(ids(&filter_by_not_show_args(all, &not_show)), [3, 4]);
    }

    #[test]
    fn test_not_show_empty_is_identity() {
        let all = vec![obs(1, "t", None, &[], &[("size", "1")])];
        assert_eq!(filter_by_not_show_args(all, &BTreeMap::new()).len(), 1);
    }
}
