//! Legacy navigation rules. The format is frozen: existing definitions keep
//! decoding and evaluating, no operators are added.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::answer_type::AnswerType;
use crate::error::{ConfigError, SpecError};
use crate::json;
use crate::result::AnswerResult;

/// Step identifier used when a matching rule names no target.
pub const EXIT_IDENTIFIER: &str = "exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum RuleOperator {
    #[serde(rename = "de")]
    Skip,
    #[serde(rename = "eq")]
    Equal,
    #[serde(rename = "ne")]
    NotEqual,
    #[serde(rename = "lt")]
    LessThan,
    #[serde(rename = "gt")]
    GreaterThan,
    #[serde(rename = "le")]
    LessThanEqual,
    #[serde(rename = "ge")]
    GreaterThanEqual,
    #[serde(rename = "ot")]
    OtherThan,
}

impl RuleOperator {
    pub fn code(&self) -> &'static str {
        match self {
            RuleOperator::Skip => "de",
            RuleOperator::Equal => "eq",
            RuleOperator::NotEqual => "ne",
            RuleOperator::LessThan => "lt",
            RuleOperator::GreaterThan => "gt",
            RuleOperator::LessThanEqual => "le",
            RuleOperator::GreaterThanEqual => "ge",
            RuleOperator::OtherThan => "ot",
        }
    }

    fn compare(&self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (RuleOperator::Equal, Some(ordering)) => ordering == Ordering::Equal,
            (RuleOperator::NotEqual | RuleOperator::OtherThan, Some(ordering)) => {
                ordering != Ordering::Equal
            }
            (RuleOperator::LessThan, Some(ordering)) => ordering == Ordering::Less,
            (RuleOperator::GreaterThan, Some(ordering)) => ordering == Ordering::Greater,
            (RuleOperator::LessThanEqual, Some(ordering)) => ordering != Ordering::Greater,
            (RuleOperator::GreaterThanEqual, Some(ordering)) => ordering != Ordering::Less,
            _ => false,
        }
    }
}

/// Cohorts to add and remove after evaluating rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CohortChanges {
    pub add: BTreeSet<String>,
    pub remove: BTreeSet<String>,
}

impl CohortChanges {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }

    fn merge(&mut self, other: CohortChanges) {
        self.add.extend(other.add);
        self.remove.extend(other.remove);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveyRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_to_identifier: Option<String>,
    #[serde(rename = "matchingAnswer", default, skip_serializing_if = "Option::is_none")]
    pub matching_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_operator: Option<RuleOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cohort: Option<String>,
}

/// Answer value in the form rules compare it.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
enum Comparable {
    Text(String),
    Number(f64),
    Date(DateTime<FixedOffset>),
}

impl SurveyRule {
    pub fn from_value(value: Value) -> Result<Self, SpecError> {
        let rule: SurveyRule = serde_json::from_value(value)?;
        rule.validate()?;
        Ok(rule)
    }

    fn matching_answer(&self) -> Option<&Value> {
        self.matching_value.as_ref().filter(|value| !value.is_null())
    }

    /// The declared operator, else equal, or skip when there is nothing to
    /// match against.
    pub fn effective_operator(&self) -> RuleOperator {
        match (self.rule_operator, self.matching_answer()) {
            (Some(operator), _) => operator,
            (None, Some(_)) => RuleOperator::Equal,
            (None, None) => RuleOperator::Skip,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.skip_to_identifier.is_none()
            && self.matching_value.is_none()
            && self.rule_operator.is_none()
            && self.cohort.is_none()
        {
            return Err(ConfigError::InvalidSurveyRule("rule has no fields"));
        }
        if self.matching_answer().is_none() && self.effective_operator() != RuleOperator::Skip {
            return Err(ConfigError::InvalidSurveyRule(
                "only the skip operator may omit matchingAnswer",
            ));
        }
        Ok(())
    }

    /// Returns the identifier to navigate to when the rule matches `result`.
    pub fn evaluate_rule(&self, result: Option<&AnswerResult>) -> Option<String> {
        if !self.matches(result) {
            return None;
        }
        match self.effective_operator() {
            RuleOperator::Skip => self.skip_to_identifier.clone(),
            _ => Some(
                self.skip_to_identifier
                    .clone()
                    .unwrap_or_else(|| EXIT_IDENTIFIER.to_string()),
            ),
        }
    }

    /// Adds the rule's cohort when it matches, removes it otherwise.
    pub fn evaluate_cohorts(&self, result: Option<&AnswerResult>) -> Option<CohortChanges> {
        let cohort = self.cohort.clone()?;
        let mut changes = CohortChanges::default();
        if self.matches(result) {
            changes.add.insert(cohort);
        } else {
            changes.remove.insert(cohort);
        }
        Some(changes)
    }

    fn matches(&self, result: Option<&AnswerResult>) -> bool {
        let operator = self.effective_operator();
        let Some((result, value)) = result.and_then(|result| {
            result
                .value
                .as_ref()
                .filter(|value| !value.is_null())
                .map(|value| (result, value))
        }) else {
            return operator == RuleOperator::Skip;
        };
        if operator == RuleOperator::Skip {
            return false;
        }
        let Some(expected) = self.matching_answer() else {
            return false;
        };

        let answer_type = result.effective_answer_type();
        if let AnswerType::Array(array) = &answer_type {
            let element_type = AnswerType::from_json_type(array.base_type);
            let (Some(actual), Some(expected)) = (
                comparable_items(value, &element_type),
                comparable_items(expected, &element_type),
            ) else {
                return false;
            };
            let contains_any = expected.iter().any(|item| actual.contains(item));
            return match operator {
                RuleOperator::Equal => contains_any,
                RuleOperator::OtherThan => !contains_any,
                RuleOperator::NotEqual => actual != expected,
                _ => {
                    tracing::debug!(
                        operator = operator.code(),
                        "ordering operators do not apply to array answers"
                    );
                    false
                }
            };
        }

        let (Some(actual), Some(expected)) = (
            comparable(value, &answer_type),
            comparable(expected, &answer_type),
        ) else {
            tracing::debug!(
                answer_type = answer_type.type_name(),
                "answer cannot be compared with matchingAnswer"
            );
            return false;
        };
        operator.compare(actual.partial_cmp(&expected))
    }
}

fn comparable_items(value: &Value, element_type: &AnswerType) -> Option<Vec<Comparable>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| comparable(item, element_type))
            .collect(),
        scalar => comparable(scalar, element_type).map(|item| vec![item]),
    }
}

fn comparable(value: &Value, answer_type: &AnswerType) -> Option<Comparable> {
    match answer_type {
        AnswerType::String => match value {
            Value::Null | Value::Array(_) | Value::Object(_) => None,
            scalar => Some(Comparable::Text(json::describe(scalar))),
        },
        AnswerType::DateTime(date_time) => {
            let coder = date_time.coder().ok()?;
            value.as_str().and_then(|text| coder.parse(text)).map(Comparable::Date)
        }
        AnswerType::Boolean
        | AnswerType::Integer
        | AnswerType::Number
        | AnswerType::Measurement(_) => match value {
            Value::Bool(flag) => Some(Comparable::Number(if *flag { 1.0 } else { 0.0 })),
            Value::Number(number) => number.as_f64().map(Comparable::Number),
            _ => None,
        },
        AnswerType::Object | AnswerType::Null | AnswerType::Array(_) => None,
    }
}

/// Navigation target from a question's rules. Nothing while peeking; the
/// skip-to-if-nil identifier without a result; otherwise the target only
/// when exactly one rule produced one.
pub fn evaluate_survey_rules(
    rules: &[SurveyRule],
    result: Option<&AnswerResult>,
    is_peeking: bool,
    skip_to_if_nil: Option<&str>,
) -> Option<String> {
    if is_peeking {
        return None;
    }
    let Some(result) = result else {
        return skip_to_if_nil.map(str::to_string);
    };
    let mut targets: Vec<String> = rules
        .iter()
        .filter_map(|rule| rule.evaluate_rule(Some(result)))
        .collect();
    if targets.len() == 1 {
        targets.pop()
    } else {
        if targets.len() > 1 {
            tracing::debug!(count = targets.len(), "several survey rules matched");
        }
        None
    }
}

/// Union of the cohort changes of every rule, or `None` when nothing changes.
pub fn evaluate_cohort_rules(
    rules: &[SurveyRule],
    result: Option<&AnswerResult>,
) -> Option<CohortChanges> {
    let mut changes = CohortChanges::default();
    for rule_changes in rules.iter().filter_map(|rule| rule.evaluate_cohorts(result)) {
        changes.merge(rule_changes);
    }
    (!changes.is_empty()).then_some(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::JsonType;
    use serde_json::json;

    fn result(answer_type: AnswerType, value: Value) -> AnswerResult {
        let mut result = AnswerResult::new("foo", Some(answer_type));
        result.value = Some(value);
        result
    }

    fn rule(value: Value) -> SurveyRule {
        serde_json::from_value(value).expect("rule")
    }

    #[test]
    fn missing_operator_defaults_by_matching_answer() {
        assert_eq!(
            rule(json!({"matchingAnswer": 1})).effective_operator(),
            RuleOperator::Equal
        );
        assert_eq!(
            rule(json!({"skipToIdentifier": "bar"})).effective_operator(),
            RuleOperator::Skip
        );
    }

    #[test]
    fn rejects_rule_without_fields_or_value() {
        assert!(SurveyRule::from_value(json!({})).is_err());
        assert!(SurveyRule::from_value(json!({"ruleOperator": "gt", "skipToIdentifier": "a"})).is_err());
    }

    #[test]
    fn skip_rule_matches_only_missing_answers() {
        let skip = rule(json!({"skipToIdentifier": "bar", "ruleOperator": "de"}));
        assert_eq!(skip.evaluate_rule(None).as_deref(), Some("bar"));
        let empty = AnswerResult::new("foo", Some(AnswerType::String));
        assert_eq!(skip.evaluate_rule(Some(&empty)).as_deref(), Some("bar"));
        let answered = result(AnswerType::String, json!("a"));
        assert_eq!(skip.evaluate_rule(Some(&answered)), None);
    }

    #[test]
    fn match_without_target_exits() {
        let equal = rule(json!({"matchingAnswer": "a"}));
        let answered = result(AnswerType::String, json!("a"));
        assert_eq!(equal.evaluate_rule(Some(&answered)).as_deref(), Some(EXIT_IDENTIFIER));
    }

    #[test]
    fn numeric_operators_compare_numbers() {
        let answered = result(AnswerType::Integer, json!(5));
        let cases = [("lt", 6, true), ("gt", 6, false), ("le", 5, true), ("ge", 5, true), ("ne", 5, false)];
        for (operator, expected, matches) in cases {
            let rule = rule(json!({
                "matchingAnswer": expected,
                "ruleOperator": operator,
                "skipToIdentifier": "next"
            }));
            assert_eq!(rule.evaluate_rule(Some(&answered)).is_some(), matches, "{operator}");
        }
    }

    #[test]
    fn boolean_answers_compare_as_numbers() {
        let answered = result(AnswerType::Boolean, json!(true));
        let rule = rule(json!({"matchingAnswer": true, "skipToIdentifier": "yes"}));
        assert_eq!(rule.evaluate_rule(Some(&answered)).as_deref(), Some("yes"));
    }

    #[test]
    fn array_equal_means_any_contained() {
        let answered = result(AnswerType::array(JsonType::Integer), json!([1, 3]));
        let equal = rule(json!({"matchingAnswer": [2, 3], "skipToIdentifier": "hit"}));
        assert_eq!(equal.evaluate_rule(Some(&answered)).as_deref(), Some("hit"));
        let other = rule(json!({"matchingAnswer": 3, "ruleOperator": "ot", "skipToIdentifier": "miss"}));
        assert_eq!(other.evaluate_rule(Some(&answered)), None);
    }

    #[test]
    fn dates_compare_through_coding_format() {
        let answered = result(AnswerType::date_time(Some("yyyy-MM-dd")), json!("2020-04-01"));
        let before = rule(json!({
            "matchingAnswer": "2020-05-01",
            "ruleOperator": "lt",
            "skipToIdentifier": "early"
        }));
        assert_eq!(before.evaluate_rule(Some(&answered)).as_deref(), Some("early"));
    }

    #[test]
    fn survey_rules_need_a_single_target() {
        let rules = vec![
            rule(json!({"matchingAnswer": 1, "ruleOperator": "ge", "skipToIdentifier": "a"})),
            rule(json!({"matchingAnswer": 10, "ruleOperator": "ge", "skipToIdentifier": "b"})),
        ];
        let low = result(AnswerType::Integer, json!(2));
        let high = result(AnswerType::Integer, json!(12));
        assert_eq!(evaluate_survey_rules(&rules, Some(&low), false, None).as_deref(), Some("a"));
        assert_eq!(evaluate_survey_rules(&rules, Some(&high), false, None), None);
        assert_eq!(evaluate_survey_rules(&rules, Some(&low), true, None), None);
        assert_eq!(
            evaluate_survey_rules(&rules, None, false, Some("nil")).as_deref(),
            Some("nil")
        );
    }

    #[test]
    fn cohorts_are_added_and_removed() {
        let rules = vec![
            rule(json!({"matchingAnswer": "a", "cohort": "alpha"})),
            rule(json!({"matchingAnswer": "b", "cohort": "beta"})),
        ];
        let answered = result(AnswerType::String, json!("a"));
        let changes = evaluate_cohort_rules(&rules, Some(&answered)).expect("changes");
        assert!(changes.add.contains("alpha"));
        assert!(changes.remove.contains("beta"));
    }
}
