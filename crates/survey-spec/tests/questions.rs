use serde_json::{Value, json};

use survey_spec::{
    AnswerResult, AnswerType, ConfigError, InputItemContext, InputItemKind, JsonType,
    MeasurementSystem, QuestionSpec, SpecError, UiHint, question_schema,
};

fn fixture(name: &str) -> &'static str {
    match name {
        "simple_question" => include_str!("../tests/fixtures/simple_question.json"),
        "multiple_input_question" => {
            include_str!("../tests/fixtures/multiple_input_question.json")
        }
        "choice_question" => include_str!("../tests/fixtures/choice_question.json"),
        _ => panic!("unknown fixture {}", name),
    }
}

fn load(name: &str) -> QuestionSpec {
    QuestionSpec::from_json_str(fixture(name)).expect("question")
}

fn answered(question: &QuestionSpec, value: Value) -> AnswerResult {
    let mut result = question.instantiate_answer_result();
    result.value = Some(value);
    result
}

#[test]
fn simple_question_uses_item_answer_type() {
    let question = load("simple_question");
    assert_eq!(question.identifier(), "age");
    assert_eq!(question.answer_type(), AnswerType::Integer);

    let result = question.instantiate_answer_result();
    assert_eq!(result.identifier, "age");
    assert_eq!(result.question_text.as_deref(), Some("How old are you?"));
    assert_eq!(result.value, None);
}

#[test]
fn simple_question_appends_skip_checkbox() {
    let question = load("simple_question");
    let items = question.build_input_items(&InputItemContext::default());
    assert_eq!(items.len(), 2);
    let skip = &items[1];
    assert!(skip.is_exclusive);
    assert!(matches!(skip.kind, InputItemKind::SkipCheckbox { .. }));
    assert_eq!(skip.json_element(true), Some(json!(-1)));
}

#[test]
fn simple_question_rules_pick_single_target() {
    let question = load("simple_question");
    let minor = answered(&question, json!(10));
    assert_eq!(
        question.evaluate_survey_rules(Some(&minor), false, None).as_deref(),
        Some("minor")
    );

    let adult = answered(&question, json!(40));
    assert_eq!(question.evaluate_survey_rules(Some(&adult), false, None), None);
    let cohorts = question.evaluate_cohorts(Some(&adult)).expect("cohorts");
    assert!(cohorts.remove.contains("declined"));

    // -1 is below 18 as well, so two rules match and neither wins.
    let declined = answered(&question, json!(-1));
    assert_eq!(question.evaluate_survey_rules(Some(&declined), false, None), None);
    let cohorts = question.evaluate_cohorts(Some(&declined)).expect("cohorts");
    assert!(cohorts.add.contains("declined"));

    assert_eq!(question.evaluate_survey_rules(Some(&minor), true, None), None);
    assert_eq!(
        question.evaluate_survey_rules(None, false, Some("next")).as_deref(),
        Some("next")
    );
}

#[test]
fn multiple_input_question_answers_with_object() {
    let question = load("multiple_input_question");
    assert_eq!(question.answer_type(), AnswerType::Object);
    let items = question.build_input_items(&InputItemContext::new(
        MeasurementSystem::Metric,
        chrono::Local::now().fixed_offset(),
    ));
    let identifiers: Vec<_> = items
        .iter()
        .map(|item| item.result_identifier(question.identifier()))
        .collect();
    assert_eq!(identifiers, vec!["firstName", "lastName", "name"]);
}

#[test]
fn multiple_input_question_rejects_duplicate_identifiers() {
    let err = QuestionSpec::from_value(json!({
        "type": "multipleInputQuestion",
        "identifier": "name",
        "inputItems": [
            { "type": "string", "identifier": "part" },
            { "type": "integer", "identifier": "part" }
        ]
    }))
    .expect_err("duplicate");
    match err {
        SpecError::Config(ConfigError::DuplicateIdentifier(identifier)) => {
            assert_eq!(identifier, "part")
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn choice_question_answers_with_array_of_base_type() {
    let question = load("choice_question");
    assert_eq!(question.answer_type(), AnswerType::array(JsonType::Integer));

    let items = question.build_input_items(&InputItemContext::default());
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|item| item.ui_hint == UiHint::Checkmark));
    assert_eq!(items[0].field_label.as_deref(), Some("Cough"));
    assert!(items[2].is_exclusive);
    assert_eq!(items[1].json_element(true), Some(json!(2)));
    assert_eq!(items[1].json_element(false), None);
}

#[test]
fn choice_question_rules_use_any_contained() {
    let question = load("choice_question");
    let result = answered(&question, json!([1, 2]));
    assert_eq!(
        question.evaluate_survey_rules(Some(&result), false, None).as_deref(),
        Some("fever")
    );
}

#[test]
fn choice_question_checks_values_against_base_type() {
    let err = QuestionSpec::from_value(json!({
        "type": "choiceQuestion",
        "identifier": "q",
        "baseType": "string",
        "choices": [{ "value": "a" }, { "value": 2 }]
    }))
    .expect_err("mismatch");
    assert!(matches!(
        err,
        SpecError::Config(ConfigError::ChoiceTypeMismatch { index: 1, .. })
    ));
}

#[test]
fn plain_deserialization_validates_questions() {
    let step = json!([
        {
            "type": "simpleQuestion",
            "identifier": "ok",
            "inputItem": { "type": "string" }
        },
        {
            "type": "choiceQuestion",
            "identifier": "broken",
            "choices": [{ "value": 1 }, { "value": "two" }]
        }
    ]);
    assert!(serde_json::from_value::<Vec<QuestionSpec>>(step).is_err());

    let duplicated = json!({
        "type": "multipleInputQuestion",
        "identifier": "name",
        "inputItems": [
            { "type": "string", "identifier": "part" },
            { "type": "string", "identifier": "part" }
        ]
    });
    assert!(serde_json::from_value::<QuestionSpec>(duplicated).is_err());

    let question: QuestionSpec =
        serde_json::from_str(fixture("choice_question")).expect("valid fixture");
    assert_eq!(question, load("choice_question"));
}

#[test]
fn single_choice_defaults_to_true() {
    let question = QuestionSpec::from_value(json!({
        "type": "choiceQuestion",
        "identifier": "q",
        "choices": [{ "value": "a" }, { "value": "b" }]
    }))
    .expect("question");
    assert_eq!(question.answer_type(), AnswerType::String);
    let items = question.build_input_items(&InputItemContext::default());
    assert!(items.iter().all(|item| item.ui_hint == UiHint::List));
}

#[test]
fn invalid_rules_reject_the_question() {
    let err = QuestionSpec::from_value(json!({
        "type": "simpleQuestion",
        "identifier": "q",
        "inputItem": { "type": "string" },
        "surveyRules": [{ "ruleOperator": "gt", "skipToIdentifier": "x" }]
    }))
    .expect_err("rule");
    assert!(matches!(
        err,
        SpecError::Config(ConfigError::InvalidSurveyRule(_))
    ));
}

#[test]
fn questions_round_trip_through_serde() {
    let question = load("choice_question");
    let encoded = serde_json::to_value(&question).expect("encode");
    let expected: Value = serde_json::from_str(fixture("choice_question")).expect("fixture");
    assert_eq!(encoded, expected);
}

#[test]
fn question_schema_is_an_object() {
    let schema = question_schema();
    assert!(schema.is_object());
}
