// Per-stage tallies, used for the pre-upload breakdown and for verification.

use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

const UNKNOWN: &str = "Unknown";

/// Grouping key taken from a record's `stage` field.
///
/// Keys sort numbers first (by numeric value), then text, then `Unknown`.
/// A missing or null stage and the literal string "Unknown" share the
/// `Unknown` bucket.
#[derive(Debug, Clone)]
pub enum StageKey {
    Number(Number),
    Text(String),
    Unknown,
}

impl StageKey {
    pub fn from_stage(stage: Option<&Value>) -> Self {
        match stage {
            None | Some(Value::Null) => StageKey::Unknown,
            Some(Value::Number(n)) => StageKey::Number(n.clone()),
            Some(Value::String(s)) if s == UNKNOWN => StageKey::Unknown,
            Some(Value::String(s)) => StageKey::Text(s.clone()),
            Some(other) => StageKey::Text(other.to_string()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            StageKey::Number(_) => 0,
            StageKey::Text(_) => 1,
            StageKey::Unknown => 2,
        }
    }
}

impl Ord for StageKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (StageKey::Number(a), StageKey::Number(b)) => compare_numbers(a, b),
            (StageKey::Text(a), StageKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Integers compare exactly; floats (or an integer against a float) go
/// through `f64`.
fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if let (Some(a), Some(b)) = (as_integer(a), as_integer(b)) {
        return a.cmp(&b);
    }
    let a = a.as_f64().unwrap_or(f64::NAN);
    let b = b.as_f64().unwrap_or(f64::NAN);
    a.total_cmp(&b)
}

fn as_integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

impl PartialOrd for StageKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for StageKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for StageKey {}

impl fmt::Display for StageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKey::Number(n) => write!(f, "{}", n),
            StageKey::Text(s) => f.write_str(s),
            StageKey::Unknown => f.write_str(UNKNOWN),
        }
    }
}

/// Record counts per stage, iterated in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageCounts {
    counts: BTreeMap<StageKey, usize>,
}

impl StageCounts {
    pub fn from_stages<'a, I>(stages: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a Value>>,
    {
        let mut counts = BTreeMap::new();
        for stage in stages {
            *counts.entry(StageKey::from_stage(stage)).or_insert(0) += 1;
        }
        StageCounts { counts }
    }

    /// Number of records across all stages.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn get(&self, key: &StageKey) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StageKey, usize)> {
        self.counts.iter().map(|(k, v)| (k, *v))
    }
}
