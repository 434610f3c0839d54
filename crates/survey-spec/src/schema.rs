use schemars::schema_for;
use serde_json::Value;

use crate::answer_type::AnswerType;
use crate::input::InputItemBuilder;
use crate::question::QuestionSpec;
use crate::survey_rule::SurveyRule;

pub fn input_item_schema() -> Value {
    schema_for!(InputItemBuilder).to_value()
}

pub fn answer_type_schema() -> Value {
    schema_for!(AnswerType).to_value()
}

pub fn question_schema() -> Value {
    schema_for!(QuestionSpec).to_value()
}

pub fn survey_rule_schema() -> Value {
    schema_for!(SurveyRule).to_value()
}
