//! Read-side view over a set of member records.
//!
//! A [`Roster`] is what the administrator browses: it can be narrowed with a
//! free-text query and summarised by course and level. Summaries are derived
//! on demand from the records it holds, so they always agree with them.

use super::{Level, MemberRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Ordered collection of member records in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Roster {
    records: Vec<MemberRecord>,
}

/// Members sharing one (course, level) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseLevelGroup {
    /// Course shared by every member of the group.
    pub course: String,
    /// Level shared by every member of the group.
    pub level: Level,
    /// Members in registration order.
    pub members: Vec<MemberRecord>,
}

/// Number of records carrying a given key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tally<K> {
    /// Grouping key.
    pub key: K,
    /// Number of records with this key.
    pub count: usize,
}

/// Proportion of the roster at one level, for charting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelShare {
    /// Level this slice represents.
    pub level: Level,
    /// Records at this level.
    pub count: usize,
    /// Records in the whole roster.
    pub total: usize,
}

impl LevelShare {
    /// Returns the share as a fraction in `0.0..=1.0`.
    #[expect(
        clippy::cast_precision_loss,
        clippy::float_arithmetic,
        reason = "roster sizes are a few hundred rows and shares are only displayed"
    )]
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count as f64 / self.total as f64
    }

    /// Returns the share as a percentage in `0.0..=100.0`.
    #[expect(clippy::float_arithmetic, reason = "display-only conversion")]
    #[must_use]
    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }
}

impl Roster {
    /// Wraps records that are already in registration order.
    #[must_use]
    pub const fn new(records: Vec<MemberRecord>) -> Self {
        Self { records }
    }

    /// Returns the records in registration order.
    #[must_use]
    pub fn records(&self) -> &[MemberRecord] {
        &self.records
    }

    /// Consumes the roster, returning its records.
    #[must_use]
    pub fn into_records(self) -> Vec<MemberRecord> {
        self.records
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when the roster holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keeps the records where any field contains `query`, ignoring case.
    ///
    /// An empty query keeps every record.
    #[must_use]
    pub fn filter(&self, query: &str) -> Self {
        if query.is_empty() {
            return self.clone();
        }
        let needle = query.to_lowercase();
        let records = self
            .records
            .iter()
            .filter(|record| record_matches(record, &needle))
            .cloned()
            .collect();
        Self { records }
    }

    /// Groups records by (course, level), keys in ascending order.
    #[must_use]
    pub fn groups(&self) -> Vec<CourseLevelGroup> {
        let mut grouped: BTreeMap<(&str, Level), Vec<MemberRecord>> = BTreeMap::new();
        for record in &self.records {
            let details = record.details();
            grouped
                .entry((details.course(), details.level()))
                .or_default()
                .push(record.clone());
        }
        grouped
            .into_iter()
            .map(|((course, level), members)| CourseLevelGroup {
                course: course.to_owned(),
                level,
                members,
            })
            .collect()
    }

    /// Counts records per course, most common first.
    #[must_use]
    pub fn course_counts(&self) -> Vec<Tally<String>> {
        tally(
            self.records
                .iter()
                .map(|record| record.details().course().to_owned()),
        )
    }

    /// Counts records per level, most common first.
    #[must_use]
    pub fn level_counts(&self) -> Vec<Tally<Level>> {
        tally(self.records.iter().map(|record| record.details().level()))
    }

    /// Derives the proportional breakdown by level.
    #[must_use]
    pub fn level_shares(&self) -> Vec<LevelShare> {
        let total = self.records.len();
        self.level_counts()
            .into_iter()
            .map(|Tally { key, count }| LevelShare {
                level: key,
                count,
                total,
            })
            .collect()
    }
}

impl FromIterator<MemberRecord> for Roster {
    fn from_iter<I: IntoIterator<Item = MemberRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn record_matches(record: &MemberRecord, needle: &str) -> bool {
    let details = record.details();
    let timestamp = record.timestamp_text();
    [
        details.name(),
        details.student_id().unwrap_or_default(),
        details.index_number(),
        details.phone(),
        details.residence(),
        details.email().as_str(),
        details.course(),
        details.level().as_str(),
        timestamp.as_str(),
    ]
    .into_iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Counts keys, ordering by count descending then key ascending.
fn tally<K: Ord>(keys: impl Iterator<Item = K>) -> Vec<Tally<K>> {
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    let mut tallies: Vec<Tally<K>> = counts
        .into_iter()
        .map(|(key, count)| Tally { key, count })
        .collect();
    tallies.sort_by(|left, right| right.count.cmp(&left.count));
    tallies
}
