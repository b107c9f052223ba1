//! Failure aggregation across a run

use std::collections::BTreeMap;

use crate::outcome::classify::{classify_error, Category, Classification};
use crate::outcome::record::ScenarioOutcome;

/// Example scenarios kept per category
pub const MAX_EXAMPLES: usize = 3;

/// A failing scenario kept as an example of its category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioExample {
    pub name: String,
    pub location: String,
    pub query: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryStats {
    pub count: usize,
    pub details: BTreeMap<String, usize>,
    pub examples: Vec<ScenarioExample>,
}

impl CategoryStats {
    /// Most frequent sub-details, ties broken alphabetically
    pub fn top_details(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut details: Vec<(&str, usize)> =
            self.details.iter().map(|(d, n)| (d.as_str(), *n)).collect();
        details.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        details.truncate(limit);
        details
    }
}

/// Counts of failing scenarios by category, group and feature
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureBreakdown {
    pub categories: BTreeMap<Category, CategoryStats>,
    pub features: BTreeMap<String, usize>,
    failing: usize,
}

impl FailureBreakdown {
    /// Aggregate every failed or errored scenario
    ///
    /// Each failing scenario is classified by its first error line only; one
    /// with no captured error goes to [`Category::Unclassified`].
    pub fn from_scenarios<'a, I>(scenarios: I) -> Self
    where
        I: IntoIterator<Item = &'a ScenarioOutcome>,
    {
        let mut breakdown = Self::default();
        for scenario in scenarios.into_iter().filter(|s| s.status.is_failure()) {
            breakdown.record(scenario);
        }
        breakdown
    }

    fn record(&mut self, scenario: &ScenarioOutcome) {
        self.failing += 1;
        *self.features.entry(scenario.feature.clone()).or_insert(0) += 1;

        let Classification { category, detail } = match scenario.first_error() {
            Some(line) => classify_error(line),
            None => Classification {
                category: Category::Unclassified,
                detail: None,
            },
        };

        let stats = self.categories.entry(category).or_default();
        stats.count += 1;
        if let Some(detail) = detail.filter(|d| !d.is_empty()) {
            *stats.details.entry(detail).or_insert(0) += 1;
        }
        if stats.examples.len() < MAX_EXAMPLES {
            stats.examples.push(ScenarioExample {
                name: scenario.name.clone(),
                location: scenario.location.clone(),
                query: scenario.query.clone(),
            });
        }
    }

    /// Number of failing scenarios aggregated
    pub fn failing_scenarios(&self) -> usize {
        self.failing
    }

    pub fn count(&self, category: Category) -> usize {
        self.categories.get(&category).map_or(0, |s| s.count)
    }

    /// Categories by descending count, ties in taxonomy order
    pub fn ranked_categories(&self) -> Vec<(Category, &CategoryStats)> {
        let mut ranked: Vec<(Category, &CategoryStats)> =
            self.categories.iter().map(|(c, s)| (*c, s)).collect();
        ranked.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(&b.0)));
        ranked
    }

    /// Per-group totals by descending count
    pub fn groups(&self) -> Vec<(&'static str, usize)> {
        let mut totals: BTreeMap<&'static str, usize> = BTreeMap::new();
        for (category, stats) in &self.categories {
            *totals.entry(category.group()).or_insert(0) += stats.count;
        }
        let mut groups: Vec<(&'static str, usize)> = totals.into_iter().collect();
        groups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        groups
    }

    /// Features with the most failing scenarios
    pub fn top_features(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut features: Vec<(&str, usize)> =
            self.features.iter().map(|(f, n)| (f.as_str(), *n)).collect();
        features.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        features.truncate(limit);
        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::record::ScenarioStatus;

    fn failing(feature: &str, name: &str, error: Option<&str>) -> ScenarioOutcome {
        let mut outcome = ScenarioOutcome::new(feature, name, "");
        outcome.status = ScenarioStatus::Failed;
        outcome.errors.extend(error.map(str::to_string));
        outcome
    }

    #[test]
    fn test_passed_scenarios_are_ignored() {
        let passed = ScenarioOutcome::new("F", "ok", "");
        let breakdown = FailureBreakdown::from_scenarios(&[passed]);
        assert_eq!(breakdown.failing_scenarios(), 0);
        assert!(breakdown.categories.is_empty());
    }

    #[test]
    fn test_counts_and_details() {
        let scenarios = vec![
            failing("Match1", "a", Some(r#"Binding error: VariableNotFound("n")"#)),
            failing("Match1", "b", Some(r#"Binding error: VariableNotFound("m")"#)),
            failing("Match2", "c", Some(r#"Binding error: VariableNotFound("n")"#)),
            failing("Match2", "d", None),
        ];
        let breakdown = FailureBreakdown::from_scenarios(&scenarios);

        assert_eq!(breakdown.failing_scenarios(), 4);
        assert_eq!(breakdown.count(Category::BinderVariableNotFound), 3);
        assert_eq!(breakdown.count(Category::Unclassified), 1);

        let stats = &breakdown.categories[&Category::BinderVariableNotFound];
        assert_eq!(stats.top_details(5), vec![("n", 2), ("m", 1)]);
        assert_eq!(breakdown.top_features(1), vec![("Match1", 2)]);
    }

    #[test]
    fn test_empty_details_are_not_counted() {
        let scenarios = vec![
            failing("F", "blank", Some("   ")),
            failing("F", "bare", Some("Parse error:")),
        ];
        let breakdown = FailureBreakdown::from_scenarios(&scenarios);

        let other = &breakdown.categories[&Category::Other];
        assert_eq!(other.count, 1);
        assert!(other.details.is_empty());
        let parse = &breakdown.categories[&Category::ParseOther];
        assert_eq!(parse.top_details(5), vec![("unknown", 1)]);
    }

    #[test]
    fn test_only_first_error_is_classified() {
        let mut outcome = failing("F", "s", Some("Result mismatch: rows differ"));
        outcome.errors.push("Parse error: UnexpectedToken(X)".to_string());
        let breakdown = FailureBreakdown::from_scenarios(&[outcome]);
        assert_eq!(breakdown.count(Category::ResultMismatch), 1);
        assert_eq!(breakdown.count(Category::ParseUnexpectedToken), 0);
    }

    #[test]
    fn test_examples_are_capped() {
        let scenarios: Vec<ScenarioOutcome> = (0..5)
            .map(|i| failing("F", &format!("s{}", i), Some("NoValidPlan")))
            .collect();
        let breakdown = FailureBreakdown::from_scenarios(&scenarios);
        let stats = &breakdown.categories[&Category::OptimizerNoValidPlan];
        assert_eq!(stats.count, 5);
        assert_eq!(stats.examples.len(), MAX_EXAMPLES);
        assert_eq!(stats.examples[0].name, "s0");
    }

    #[test]
    fn test_groups_and_ranking() {
        let scenarios = vec![
            failing("F", "a", Some("DELETE not supported")),
            failing("F", "b", Some("RuntimeError: boom")),
            failing("F", "c", Some("Parse error: UnexpectedToken(X)")),
        ];
        let breakdown = FailureBreakdown::from_scenarios(&scenarios);
        assert_eq!(breakdown.groups(), vec![("Runtime", 2), ("Parse", 1)]);

        let ranked: Vec<Category> = breakdown.ranked_categories().iter().map(|(c, _)| *c).collect();
        assert_eq!(
            ranked,
            vec![
                Category::ParseUnexpectedToken,
                Category::RuntimeDeleteNotSupported,
                Category::RuntimeOther,
            ]
        );
    }
}
