//! Shared helpers for reading the text exposition in integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use prometheus::Registry;
use promcommon::render;

/// One parsed exposition sample line
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub value: f64,
}

/// Parse every sample line of a text exposition, skipping comments
pub fn parse(exposition: &str) -> Vec<Sample> {
    exposition
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Sample {
    let (series, value) = line.rsplit_once(' ').expect("sample line has a value");
    let value = parse_value(value);

    let Some((name, rest)) = series.split_once('{') else {
        return Sample { name: series.to_string(), labels: BTreeMap::new(), value };
    };
    let body = rest.strip_suffix('}').expect("label set is closed");
    let labels = body
        .split(',')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, quoted) = pair.split_once('=').expect("label is key=value");
            (key.to_string(), quoted.trim_matches('"').to_string())
        })
        .collect();

    Sample { name: name.to_string(), labels, value }
}

fn parse_value(raw: &str) -> f64 {
    match raw {
        "+Inf" => f64::INFINITY,
        "-Inf" => f64::NEG_INFINITY,
        other => other.parse().expect("sample value is numeric"),
    }
}

/// Render `registry` and parse the result
pub fn samples(registry: &Registry) -> Vec<Sample> {
    parse(&render(registry).expect("registry renders"))
}

/// Value of the single sample matching `name` and exactly `labels`
pub fn value(samples: &[Sample], name: &str, labels: &[(&str, &str)]) -> Option<f64> {
    let wanted: BTreeMap<String, String> =
        labels.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    samples.iter().find(|s| s.name == name && s.labels == wanted).map(|s| s.value)
}

/// Bucket upper bounds and cumulative counts of one histogram series
///
/// `labels` excludes `le`. Buckets come back sorted by bound, `+Inf` last.
pub fn buckets(samples: &[Sample], histogram: &str, labels: &[(&str, &str)]) -> Vec<(f64, f64)> {
    let name = format!("{histogram}_bucket");
    let mut found: Vec<(f64, f64)> = samples
        .iter()
        .filter(|s| s.name == name)
        .filter(|s| {
            labels.iter().all(|(k, v)| s.labels.get(*k).map(String::as_str) == Some(*v))
                && s.labels.len() == labels.len() + 1
        })
        .map(|s| (parse_value(&s.labels["le"]), s.value))
        .collect();
    found.sort_by(|a, b| a.0.total_cmp(&b.0));
    found
}

/// Names of every metric family present in the exposition
pub fn family_names(exposition: &str) -> Vec<String> {
    exposition
        .lines()
        .filter_map(|line| line.strip_prefix("# TYPE "))
        .filter_map(|rest| rest.split_whitespace().next())
        .map(str::to_string)
        .collect()
}
