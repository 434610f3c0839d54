use serde_json::{Value, json};

use survey_spec::{
    AnswerResult, AnswerType, AnswerValue, ConfigError, JsonType, Measurement, ShapeError,
    SpecError, answer_type_serializer,
};

fn fixture(name: &str) -> &'static str {
    match name {
        "answer_result" => include_str!("../tests/fixtures/answer_result.json"),
        _ => panic!("unknown fixture {}", name),
    }
}

#[test]
fn documented_examples_round_trip() {
    for (answer_type, value) in AnswerType::examples() {
        let answer = answer_type
            .decode_answer(Some(&value))
            .expect("decode")
            .unwrap_or_else(|| panic!("{} decoded to nothing", answer_type.type_name()));
        let encoded = answer_type.encode_answer(Some(&answer)).expect("encode");
        assert_eq!(encoded, value, "{:?}", answer_type);
    }
}

#[test]
fn answer_types_serialize_with_discriminator() {
    let cases = [
        (AnswerType::Integer, json!({ "type": "integer" })),
        (
            AnswerType::date_time(Some("HH:mm")),
            json!({ "type": "date-time", "codingFormat": "HH:mm" }),
        ),
        (
            AnswerType::array_with_separator(JsonType::Integer, ","),
            json!({ "type": "array", "baseType": "integer", "sequenceSeparator": "," }),
        ),
        (
            AnswerType::measurement(Some("kg")),
            json!({ "type": "measurement", "unit": "kg" }),
        ),
    ];
    for (answer_type, expected) in cases {
        let encoded = serde_json::to_value(&answer_type).expect("serialize");
        assert_eq!(encoded, expected);
        let decoded: AnswerType = serde_json::from_value(expected).expect("deserialize");
        assert_eq!(decoded, answer_type);
    }
}

#[test]
fn array_base_type_defaults_to_string() {
    let decoded: AnswerType = serde_json::from_value(json!({ "type": "array" })).expect("decode");
    assert_eq!(decoded, AnswerType::array(JsonType::String));
}

#[test]
fn boolean_coercion_follows_truthy_rules() {
    let boolean = AnswerType::Boolean;
    let decode = |value: Value| boolean.decode_value(&value).expect("decode");
    assert_eq!(decode(json!(0)), json!(false));
    assert_eq!(decode(json!(7)), json!(true));
    assert_eq!(decode(json!("YES")), json!(true));
    assert_eq!(decode(json!("true")), json!(true));
    assert_eq!(decode(json!("no")), json!(false));
    assert!(boolean.decode_value(&json!([true])).is_err());
}

#[test]
fn integer_coercion_truncates_toward_zero() {
    let integer = AnswerType::Integer;
    assert_eq!(integer.decode_value(&json!(3.9)).expect("decode"), json!(3));
    assert_eq!(integer.decode_value(&json!(-2.7)).expect("decode"), json!(-2));
    assert_eq!(integer.decode_value(&json!("42")).expect("decode"), json!(42));
    assert!(integer.decode_value(&json!({ "a": 1 })).is_err());
}

#[test]
fn string_and_number_coercions() {
    assert_eq!(
        AnswerType::String.decode_value(&json!(12)).expect("decode"),
        json!("12")
    );
    assert_eq!(
        AnswerType::String.decode_value(&json!(true)).expect("decode"),
        json!("true")
    );
    assert_eq!(
        AnswerType::Number.decode_value(&json!("2.5")).expect("decode"),
        json!(2.5)
    );
    assert!(AnswerType::Object.decode_value(&json!("x")).is_err());
}

#[test]
fn null_type_never_decodes() {
    let err = AnswerType::Null
        .decode_value(&Value::Null)
        .expect_err("null type");
    assert!(matches!(err, ShapeError::Decoding { type_name: "null", .. }));
    assert!(AnswerType::Null.decode_answer(None).is_err());
    assert_eq!(
        AnswerType::Null
            .encode_answer(Some(&AnswerValue::from("x")))
            .expect("encode"),
        Value::Null
    );
}

#[test]
fn null_values_pass_through() {
    assert_eq!(
        AnswerType::Integer.decode_value(&Value::Null).expect("decode"),
        Value::Null
    );
    assert_eq!(AnswerType::String.decode_answer(None).expect("decode"), None);
    assert_eq!(AnswerType::String.encode_answer(None).expect("encode"), Value::Null);
}

#[test]
fn separator_arrays_split_and_join() {
    let array = AnswerType::array_with_separator(JsonType::Integer, ",");
    assert_eq!(array.base_type(), JsonType::String);
    let answer = array
        .decode_answer(Some(&json!("1,5")))
        .expect("decode")
        .expect("answer");
    assert_eq!(answer, AnswerValue::Array(vec![json!(1), json!(5)]));
    assert_eq!(
        array
            .encode_answer(Some(&AnswerValue::Array(vec![json!(1), json!(5)])))
            .expect("encode"),
        json!("1,5")
    );
}

#[test]
fn separator_needs_scalar_base() {
    let err = AnswerType::from_value(json!({
        "type": "array",
        "baseType": "object",
        "sequenceSeparator": ","
    }))
    .expect_err("object base");
    assert!(matches!(
        err,
        SpecError::Config(ConfigError::SeparatorWithNonScalarBase { .. })
    ));
}

#[test]
fn plain_deserialization_rejects_inconsistent_answer_types() {
    let object_base = serde_json::from_value::<AnswerType>(json!({
        "type": "array",
        "baseType": "object",
        "sequenceSeparator": ","
    }));
    assert!(object_base.is_err());

    let empty = AnswerType::from_value(json!({ "type": "array", "sequenceSeparator": "" }))
        .expect_err("empty separator");
    assert!(matches!(empty, SpecError::Config(ConfigError::EmptySeparator)));

    let twelve_hour = json!({ "type": "date-time", "codingFormat": "h:mm" });
    assert!(serde_json::from_value::<AnswerType>(twelve_hour).is_err());
}

#[test]
fn unmatched_dates_decode_to_nothing() {
    let date = AnswerType::date_time(Some("yyyy-MM-dd"));
    assert_eq!(date.decode_answer(Some(&json!("June 3rd"))).expect("decode"), None);
    assert!(date.decode_answer(Some(&json!(20200603))).is_err());
}

#[test]
fn measurements_convert_to_the_declared_unit() {
    let height = AnswerType::measurement(Some("cm"));
    let encoded = height
        .encode_answer(Some(&AnswerValue::Measurement(Measurement::new(10.0, "in"))))
        .expect("encode");
    assert_eq!(encoded, json!(25.4));
    assert!(
        height
            .encode_answer(Some(&AnswerValue::Measurement(Measurement::new(1.0, "kg"))))
            .is_err()
    );
    let unitless = AnswerType::measurement(None)
        .decode_answer(Some(&json!(3)))
        .expect("decode");
    assert_eq!(unitless, Some(AnswerValue::Number(3.0)));
}

#[test]
fn encoding_rejects_mismatched_shapes() {
    let err = AnswerType::Integer
        .encode_answer(Some(&AnswerValue::Array(vec![json!(1)])))
        .expect_err("array as integer");
    assert!(matches!(err, ShapeError::Encoding { type_name: "integer", .. }));
}

#[test]
fn encoding_rejects_text_that_does_not_parse() {
    for (answer_type, text) in [
        (AnswerType::Integer, "abc"),
        (AnswerType::Integer, "12 apples"),
        (AnswerType::Number, "1.5kg"),
        (AnswerType::Boolean, "maybe"),
        (AnswerType::measurement(Some("cm")), "tall"),
    ] {
        let err = answer_type
            .encode_answer(Some(&AnswerValue::from(text)))
            .expect_err(text);
        assert!(matches!(err, ShapeError::Encoding { .. }), "{text}");
    }

    let encode = |answer_type: AnswerType, text: &str| {
        answer_type
            .encode_answer(Some(&AnswerValue::from(text)))
            .expect("encode")
    };
    assert_eq!(encode(AnswerType::Integer, " 42 "), json!(42));
    assert_eq!(encode(AnswerType::Number, "2.5"), json!(2.5));
    assert_eq!(encode(AnswerType::Boolean, "Yes"), json!(true));
    assert_eq!(encode(AnswerType::Boolean, "0"), json!(false));
}

#[test]
fn infers_array_base_type_from_elements() {
    assert_eq!(AnswerType::infer(&json!([1, 2])), AnswerType::array(JsonType::Integer));
    assert_eq!(AnswerType::infer(&json!([1, 2.5])), AnswerType::array(JsonType::Number));
    assert_eq!(AnswerType::infer(&json!(["a"])), AnswerType::array(JsonType::String));
    assert_eq!(AnswerType::infer(&json!([1, "a"])), AnswerType::array(JsonType::Object));
    assert_eq!(AnswerType::infer(&json!(true)), AnswerType::Boolean);
}

#[test]
fn registry_dispatches_on_type() {
    let serializer = answer_type_serializer();
    assert_eq!(serializer.type_names().count(), 9);
    let decoded = serializer
        .decode(json!({ "type": "measurement", "unit": "kg" }))
        .expect("decode");
    assert_eq!(decoded, AnswerType::measurement(Some("kg")));

    let unknown = serializer.decode(json!({ "type": "color" })).expect_err("unknown");
    assert!(matches!(unknown, SpecError::Config(ConfigError::UnknownType { .. })));
    let missing = serializer.decode(json!({ "unit": "kg" })).expect_err("missing");
    assert!(matches!(missing, SpecError::Config(ConfigError::MissingType { .. })));
}

#[test]
fn answer_results_store_canonical_values() {
    let value: Value = serde_json::from_str(fixture("answer_result")).expect("fixture");
    let result = AnswerResult::from_value(value.clone()).expect("decode");
    assert_eq!(result.value, Some(json!([1, 5, 9])));
    assert_eq!(
        result.answer().expect("answer"),
        Some(AnswerValue::Array(vec![json!(1), json!(5), json!(9)]))
    );

    let encoded = serde_json::to_value(&result).expect("encode");
    assert_eq!(encoded, value);
    assert!(!result.to_cbor().expect("cbor").is_empty());
}

#[test]
fn answer_results_encode_native_answers() {
    let mut result = AnswerResult::new("when", Some(AnswerType::date_time(Some("yyyy-MM-dd"))));
    result
        .set_answer(Some(&AnswerValue::from("2020-06-15")))
        .expect("set");
    assert_eq!(result.value, Some(json!("2020-06-15")));

    let mut untyped = AnswerResult::new("free", None);
    untyped
        .set_answer(Some(&AnswerValue::from(4_i64)))
        .expect("set");
    assert_eq!(untyped.value, Some(json!(4)));
    assert_eq!(untyped.effective_answer_type(), AnswerType::Integer);

    let inferred = AnswerResult::with_inferred_type("list", json!(["a", "b"]));
    assert_eq!(inferred.answer_type, Some(AnswerType::array(JsonType::String)));
}
