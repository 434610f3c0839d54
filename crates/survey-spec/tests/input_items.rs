use chrono::{DateTime, FixedOffset, TimeZone};
use serde_json::{Value, json};

use survey_spec::input::SkipCheckboxInputItem;
use survey_spec::{
    AnswerType, ConfigError, InputItemBuilder, InputItemContext, InputItemKind, InputItemType,
    JsonType, MeasurementSystem, PickerSource, SpecError, UiHint, input_item_serializer,
};

fn fixture(name: &str) -> &'static str {
    match name {
        "input_items" => include_str!("../tests/fixtures/input_items.json"),
        _ => panic!("unknown fixture {}", name),
    }
}

fn now() -> DateTime<FixedOffset> {
    FixedOffset::west_opt(7 * 3600)
        .expect("offset")
        .with_ymd_and_hms(2020, 6, 15, 10, 30, 0)
        .single()
        .expect("date")
}

fn context(system: MeasurementSystem) -> InputItemContext {
    InputItemContext::new(system, now())
}

fn load_items() -> Vec<InputItemBuilder> {
    let values: Vec<Value> = serde_json::from_str(fixture("input_items")).expect("fixture");
    let serializer = input_item_serializer();
    values
        .into_iter()
        .map(|value| serializer.decode(value).expect("decode item"))
        .collect()
}

fn item<'a>(items: &'a [InputItemBuilder], identifier: &str) -> &'a InputItemBuilder {
    items
        .iter()
        .find(|item| item.identifier() == Some(identifier))
        .unwrap_or_else(|| panic!("no item {identifier}"))
}

#[test]
fn fixture_covers_every_builder_type() {
    let items = load_items();
    let mut types: Vec<_> = items.iter().map(InputItemBuilder::input_item_type).collect();
    types.sort_by_key(|item_type| item_type.as_str());
    let mut expected = InputItemType::BUILDERS.to_vec();
    expected.sort_by_key(|item_type| item_type.as_str());
    assert_eq!(types, expected);
}

#[test]
fn items_report_their_answer_types() {
    let items = load_items();
    assert_eq!(item(&items, "temperature").answer_type(), AnswerType::Number);
    assert_eq!(item(&items, "age").answer_type(), AnswerType::Integer);
    assert_eq!(item(&items, "zip").answer_type(), AnswerType::String);
    assert_eq!(item(&items, "birthYear").answer_type(), AnswerType::Integer);
    assert_eq!(
        item(&items, "visit").answer_type(),
        AnswerType::date_time(Some("yyyy-MM-dd"))
    );
    assert_eq!(
        item(&items, "onset").answer_type(),
        AnswerType::date_time(Some("yyyy-MM-dd'T'HH:mm:ss.SSSZZZZZ"))
    );
    assert_eq!(item(&items, "frequency").answer_type(), AnswerType::Integer);
    assert_eq!(item(&items, "consent").answer_type(), AnswerType::Boolean);
    assert_eq!(
        item(&items, "height").answer_type(),
        AnswerType::measurement(Some("cm"))
    );
}

#[test]
fn built_items_resolve_defaults() {
    let items = load_items();
    let ctx = context(MeasurementSystem::Metric);

    let age = item(&items, "age").build_input_item(&ctx);
    assert!(!age.is_optional);
    assert!(!age.is_exclusive);
    assert_eq!(age.ui_hint, UiHint::Textfield);
    assert_eq!(age.placeholder.as_deref(), Some("years"));
    assert!(matches!(
        age.build_picker_source(),
        Some(PickerSource::Number { .. })
    ));

    let zip = item(&items, "zip").build_input_item(&ctx);
    assert!(zip.is_optional);
    assert_eq!(zip.build_picker_source(), None);

    let visit = item(&items, "visit").build_input_item(&ctx);
    assert_eq!(visit.ui_hint, UiHint::Picker);
    assert!(matches!(
        visit.build_picker_source(),
        Some(PickerSource::Date { minimum_date: Some(_), maximum_date: Some(_), .. })
    ));
}

#[test]
fn result_identifier_defaults_to_question() {
    let builder: InputItemBuilder =
        serde_json::from_value(json!({ "type": "string" })).expect("decode");
    let item = builder.build_input_item(&context(MeasurementSystem::Metric));
    assert_eq!(item.result_identifier("question"), "question");

    let items = load_items();
    let zip = item_by_id(&items, "zip");
    assert_eq!(zip.result_identifier("question"), "zip");
}

fn item_by_id(items: &[InputItemBuilder], identifier: &str) -> survey_spec::InputItem {
    item(items, identifier).build_input_item(&context(MeasurementSystem::Metric))
}

#[test]
fn choice_picker_rejects_mixed_value_types() {
    let err = InputItemBuilder::from_value(json!({
        "type": "choicePicker",
        "choices": [
            { "value": 1, "text": "one" },
            { "value": "two", "text": "two" }
        ]
    }))
    .expect_err("mixed choices");
    match err {
        SpecError::Config(ConfigError::ChoiceTypeMismatch { index, expected, found }) => {
            assert_eq!(index, 1);
            assert_eq!(expected, JsonType::Integer);
            assert_eq!(found, JsonType::String);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn plain_deserialization_rejects_mixed_choices() {
    let decoded = serde_json::from_value::<InputItemBuilder>(json!({
        "type": "choicePicker",
        "choices": [{ "value": 1 }, { "value": "two" }]
    }));
    let err = decoded.expect_err("mixed choices");
    assert!(err.to_string().contains("choice 1"), "{err}");
}

#[test]
fn choice_picker_promotes_integers_to_numbers() {
    let builder = InputItemBuilder::from_value(json!({
        "type": "choicePicker",
        "choices": [
            { "value": 1, "text": "one" },
            { "value": 1.5, "text": "one and a half" },
            { "text": "none" }
        ]
    }))
    .expect("decode");
    assert_eq!(builder.answer_type(), AnswerType::Number);
}

#[test]
fn string_choice_picker_uses_text_as_value() {
    let items = load_items();
    let color = item_by_id(&items, "color");
    match color.build_picker_source() {
        Some(PickerSource::Choice { choices }) => {
            assert_eq!(choices.len(), 3);
            assert_eq!(choices[0].matching_value, Some(json!("red")));
        }
        other => panic!("unexpected picker {other:?}"),
    }
}

#[test]
fn checkbox_records_selection() {
    let items = load_items();
    let consent = item_by_id(&items, "consent");
    assert_eq!(consent.kind, InputItemKind::Checkbox);
    assert_eq!(consent.detail.as_deref(), Some("Required to continue"));
    assert_eq!(consent.json_element(true), Some(json!(true)));
    assert_eq!(consent.json_element(false), Some(json!(false)));
}

#[test]
fn skip_checkbox_is_exclusive_with_fixed_value() {
    let skip: SkipCheckboxInputItem = serde_json::from_value(json!({
        "type": "skipCheckbox",
        "fieldLabel": "No answer",
        "value": -1
    }))
    .expect("decode");
    let item = skip.build_input_item();
    assert!(item.is_exclusive);
    assert_eq!(item.answer_type, AnswerType::Null);
    assert_eq!(item.json_element(true), Some(json!(-1)));
    assert_eq!(item.json_element(false), None);
    assert!(skip.matches_answer(Some(&json!(-1))));
    assert_eq!(
        serde_json::to_value(&skip).expect("encode"),
        json!({ "type": "skipCheckbox", "fieldLabel": "No answer", "value": -1 })
    );
}

#[test]
fn height_uses_picker_only_for_imperial_adults() {
    let items = load_items();
    let height = item(&items, "height");

    let metric = height.build_input_item(&context(MeasurementSystem::Metric));
    assert_eq!(metric.ui_hint, UiHint::Textfield);
    assert_eq!(metric.placeholder.as_deref(), Some("centimeters"));
    assert_eq!(metric.build_picker_source(), None);

    let imperial = height.build_input_item(&context(MeasurementSystem::Imperial));
    assert_eq!(imperial.ui_hint, UiHint::Picker);
    assert_eq!(imperial.placeholder.as_deref(), Some("inches"));
    assert_eq!(
        imperial.build_picker_source(),
        Some(PickerSource::imperial_height())
    );
}

#[test]
fn infant_weight_uses_pounds_and_ounces_picker() {
    let items = load_items();
    let weight = item(&items, "birthWeight");
    let imperial = weight.build_input_item(&context(MeasurementSystem::Imperial));
    assert_eq!(imperial.build_picker_source(), Some(PickerSource::infant_mass()));
    assert_eq!(imperial.answer_type, AnswerType::measurement(Some("kg")));
}

#[test]
fn unknown_item_type_is_rejected() {
    let err = input_item_serializer()
        .decode(json!({ "type": "slider" }))
        .expect_err("unknown");
    assert!(matches!(err, SpecError::Config(ConfigError::UnknownType { .. })));
}

#[test]
fn date_bounds_must_match_coding_format() {
    let err = InputItemBuilder::from_value(json!({
        "type": "date",
        "formatOptions": { "minimumDate": "01/02/2020", "codingFormat": "yyyy-MM-dd" }
    }))
    .expect_err("bad bound");
    assert!(matches!(
        err,
        SpecError::Config(ConfigError::UnsupportedDateFormat { .. })
    ));
}

#[test]
fn integer_items_serialize_back_to_definition() {
    let definition = json!({
        "type": "integer",
        "identifier": "age",
        "optional": false,
        "formatOptions": { "minimumValue": 0, "maximumValue": 200 }
    });
    let builder = InputItemBuilder::from_value(definition.clone()).expect("decode");
    assert_eq!(serde_json::to_value(&builder).expect("encode"), definition);
}
