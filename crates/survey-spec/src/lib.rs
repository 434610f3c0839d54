#![allow(missing_docs)]

pub mod answer_type;
pub mod answer_value;
pub mod choice;
pub mod date_format;
pub mod error;
pub mod input;
pub mod json;
pub mod number_format;
pub mod picker;
pub mod question;
pub mod registry;
pub mod result;
pub mod schema;
pub mod survey_rule;
pub mod ui_hint;
pub mod units;
pub mod validator;

pub use answer_type::{ArrayAnswerType, AnswerType, DateTimeAnswerType, MeasurementAnswerType};
pub use answer_value::{AnswerValue, Measurement};
pub use choice::JsonChoice;
pub use date_format::DateCoder;
pub use error::{ConfigError, InputError, InputErrorKind, ShapeError, SpecError};
pub use input::{InputItem, InputItemBuilder, InputItemContext, InputItemKind, InputItemType};
pub use json::JsonType;
pub use number_format::{NumberFormat, NumberFormatStyle};
pub use picker::PickerSource;
pub use question::QuestionSpec;
pub use registry::{PolymorphicSerializer, answer_type_serializer, input_item_serializer};
pub use result::AnswerResult;
pub use schema::{answer_type_schema, input_item_schema, question_schema, survey_rule_schema};
pub use survey_rule::{
    CohortChanges, EXIT_IDENTIFIER, RuleOperator, SurveyRule, evaluate_cohort_rules,
    evaluate_survey_rules,
};
pub use ui_hint::UiHint;
pub use units::{HumanMeasurementRange, MeasurementSystem, MeasurementUnit};
pub use validator::{TextInputValidator, TextValidator};
