//! Question definitions: the JSON a step is decoded from.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::answer_type::AnswerType;
use crate::choice::{JsonChoice, infer_base_type, validate_choices};
use crate::error::{ConfigError, SpecError};
use crate::input::{InputItem, InputItemBuilder, InputItemContext, SkipCheckboxInputItem};
use crate::json::JsonType;
use crate::result::AnswerResult;
use crate::survey_rule::{self, CohortChanges, SurveyRule};
use crate::ui_hint::UiHint;

/// Attributes shared by every question type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionFields {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(rename = "optional", default, skip_serializing_if = "Option::is_none")]
    pub is_optional: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub survey_rules: Vec<SurveyRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimpleQuestion {
    #[serde(flatten)]
    pub fields: QuestionFields,
    pub input_item: InputItemBuilder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_checkbox: Option<SkipCheckboxInputItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MultipleInputQuestion {
    #[serde(flatten)]
    pub fields: QuestionFields,
    #[serde(default)]
    pub input_items: Vec<InputItemBuilder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_separator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_checkbox: Option<SkipCheckboxInputItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceQuestion {
    #[serde(flatten)]
    pub fields: QuestionFields,
    #[serde(default)]
    pub choices: Vec<JsonChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<JsonType>,
    #[serde(rename = "singleChoice", default, skip_serializing_if = "Option::is_none")]
    pub is_single_choice: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_hint: Option<UiHint>,
}

impl ChoiceQuestion {
    /// Declared base type, else the type shared by the choice values.
    pub fn base_type(&self) -> JsonType {
        self.base_type
            .unwrap_or_else(|| infer_base_type(&self.choices))
    }

    pub fn is_single_choice(&self) -> bool {
        self.is_single_choice.unwrap_or(true)
    }

    pub fn ui_hint(&self) -> UiHint {
        self.ui_hint.unwrap_or(UiHint::List)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", try_from = "QuestionSpecRepr")]
pub enum QuestionSpec {
    #[serde(rename = "simpleQuestion")]
    Simple(SimpleQuestion),
    #[serde(rename = "multipleInputQuestion")]
    MultipleInput(MultipleInputQuestion),
    #[serde(rename = "choiceQuestion")]
    Choice(ChoiceQuestion),
}

#[derive(Deserialize, JsonSchema)]
#[serde(tag = "type")]
enum QuestionSpecRepr {
    #[serde(rename = "simpleQuestion")]
    Simple(SimpleQuestion),
    #[serde(rename = "multipleInputQuestion")]
    MultipleInput(MultipleInputQuestion),
    #[serde(rename = "choiceQuestion")]
    Choice(ChoiceQuestion),
}

impl TryFrom<QuestionSpecRepr> for QuestionSpec {
    type Error = ConfigError;

    fn try_from(repr: QuestionSpecRepr) -> Result<Self, Self::Error> {
        let question = match repr {
            QuestionSpecRepr::Simple(question) => QuestionSpec::Simple(question),
            QuestionSpecRepr::MultipleInput(question) => QuestionSpec::MultipleInput(question),
            QuestionSpecRepr::Choice(question) => QuestionSpec::Choice(question),
        };
        question.validate().inspect_err(|err| {
            tracing::warn!(
                identifier = question.identifier(),
                error = %err,
                "rejecting question definition"
            );
        })?;
        Ok(question)
    }
}

impl QuestionSpec {
    pub fn from_value(value: Value) -> Result<Self, SpecError> {
        let repr: QuestionSpecRepr = serde_json::from_value(value)?;
        Ok(QuestionSpec::try_from(repr)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, SpecError> {
        Self::from_value(serde_json::from_str(text)?)
    }

    pub fn fields(&self) -> &QuestionFields {
        match self {
            QuestionSpec::Simple(question) => &question.fields,
            QuestionSpec::MultipleInput(question) => &question.fields,
            QuestionSpec::Choice(question) => &question.fields,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.fields().identifier
    }

    pub fn question_type(&self) -> &'static str {
        match self {
            QuestionSpec::Simple(_) => "simpleQuestion",
            QuestionSpec::MultipleInput(_) => "multipleInputQuestion",
            QuestionSpec::Choice(_) => "choiceQuestion",
        }
    }

    pub fn is_optional(&self) -> bool {
        self.fields().is_optional.unwrap_or(false)
    }

    pub fn survey_rules(&self) -> &[SurveyRule] {
        &self.fields().survey_rules
    }

    pub fn skip_checkbox(&self) -> Option<&SkipCheckboxInputItem> {
        match self {
            QuestionSpec::Simple(question) => question.skip_checkbox.as_ref(),
            QuestionSpec::MultipleInput(question) => question.skip_checkbox.as_ref(),
            QuestionSpec::Choice(_) => None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            QuestionSpec::Simple(question) => question.input_item.validate()?,
            QuestionSpec::MultipleInput(question) => {
                let mut seen = BTreeSet::new();
                for item in &question.input_items {
                    item.validate()?;
                    if let Some(identifier) = item.identifier()
                        && !seen.insert(identifier)
                    {
                        return Err(ConfigError::DuplicateIdentifier(identifier.to_string()));
                    }
                }
            }
            QuestionSpec::Choice(question) => {
                validate_choices(&question.choices, question.base_type())?
            }
        }
        for rule in self.survey_rules() {
            rule.validate()?;
        }
        Ok(())
    }

    /// Answer type of the question's result.
    pub fn answer_type(&self) -> AnswerType {
        match self {
            QuestionSpec::Simple(question) => question.input_item.answer_type(),
            QuestionSpec::MultipleInput(_) => AnswerType::Object,
            QuestionSpec::Choice(question) if question.is_single_choice() => {
                AnswerType::from_json_type(question.base_type())
            }
            QuestionSpec::Choice(question) => AnswerType::array(question.base_type()),
        }
    }

    /// Resolved input items, skip checkbox last.
    pub fn build_input_items(&self, context: &InputItemContext) -> Vec<InputItem> {
        let mut items = match self {
            QuestionSpec::Simple(question) => vec![question.input_item.build_input_item(context)],
            QuestionSpec::MultipleInput(question) => question
                .input_items
                .iter()
                .map(|item| item.build_input_item(context))
                .collect(),
            QuestionSpec::Choice(question) => {
                let answer_type = AnswerType::from_json_type(question.base_type());
                question
                    .choices
                    .iter()
                    .map(|choice| InputItem::choice_option(choice, answer_type.clone(), question.ui_hint()))
                    .collect()
            }
        };
        if let Some(skip_checkbox) = self.skip_checkbox() {
            items.push(skip_checkbox.build_input_item());
        }
        items
    }

    /// An empty result for this question.
    pub fn instantiate_answer_result(&self) -> AnswerResult {
        let mut result = AnswerResult::new(self.identifier(), Some(self.answer_type()));
        result.question_text = self.fields().question.clone();
        result
    }

    pub fn evaluate_survey_rules(
        &self,
        result: Option<&AnswerResult>,
        is_peeking: bool,
        skip_to_if_nil: Option<&str>,
    ) -> Option<String> {
        survey_rule::evaluate_survey_rules(self.survey_rules(), result, is_peeking, skip_to_if_nil)
    }

    pub fn evaluate_cohorts(&self, result: Option<&AnswerResult>) -> Option<CohortChanges> {
        survey_rule::evaluate_cohort_rules(self.survey_rules(), result)
    }
}
