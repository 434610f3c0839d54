use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use survey_spec::{
    AnswerResult, InputItem, InputItemBuilder, InputItemContext, MeasurementSystem, PickerSource,
    QuestionSpec, TextInputValidator, answer_type_schema, answer_type_serializer,
    input_item_schema, input_item_serializer, question_schema, survey_rule_schema,
};
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const QUESTION_TYPES: [&str; 3] = ["simpleQuestion", "multipleInputQuestion", "choiceQuestion"];

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Survey answer definition CLI",
    long_about = "Inspects input item and question definitions, validates participant answers and evaluates survey rules"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Units {
    Metric,
    Imperial,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SchemaTarget {
    InputItem,
    AnswerType,
    Question,
    SurveyRule,
}

#[derive(Subcommand)]
enum Command {
    /// Print the resolved input items of an input item or question definition.
    Describe {
        /// Path to the definition JSON.
        #[arg(long, value_name = "FILE")]
        item: PathBuf,
        /// Unit system (defaults to SURVEY_MEASUREMENT_SYSTEM or metric).
        #[arg(long, value_enum)]
        units: Option<Units>,
    },
    /// Validate participant text against an input item and print the answer result.
    Answer {
        /// Path to the input item definition JSON.
        #[arg(long, value_name = "FILE")]
        item: PathBuf,
        /// Text typed by the participant.
        #[arg(long)]
        text: String,
        /// Result identifier (defaults to the item identifier).
        #[arg(long)]
        identifier: Option<String>,
        /// Unit system (defaults to SURVEY_MEASUREMENT_SYSTEM or metric).
        #[arg(long, value_enum)]
        units: Option<Units>,
    },
    /// Decode a stored value with an answer type.
    Decode {
        /// Answer type JSON, e.g. '{"type":"array","sequenceSeparator":","}'.
        #[arg(long, value_name = "JSON")]
        answer_type: String,
        /// Stored value JSON.
        #[arg(long, value_name = "JSON")]
        value: String,
    },
    /// Evaluate the survey rules of a question against an answer result.
    Rules {
        /// Path to the question definition JSON.
        #[arg(long, value_name = "FILE")]
        question: PathBuf,
        /// Path to the answer result JSON; omitted means unanswered.
        #[arg(long, value_name = "FILE")]
        result: Option<PathBuf>,
        /// Evaluate as a peek at the next step.
        #[arg(long)]
        peeking: bool,
        /// Identifier returned when there is no result.
        #[arg(long, value_name = "ID")]
        skip_to_if_nil: Option<String>,
    },
    /// Print a JSON schema.
    Schema {
        #[arg(long, value_enum, default_value_t = SchemaTarget::InputItem)]
        target: SchemaTarget,
    },
}

fn main() -> CliResult<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Describe { item, units } => run_describe(item, units),
        Command::Answer {
            item,
            text,
            identifier,
            units,
        } => run_answer(item, text, identifier, units),
        Command::Decode { answer_type, value } => run_decode(&answer_type, &value),
        Command::Rules {
            question,
            result,
            peeking,
            skip_to_if_nil,
        } => run_rules(question, result, peeking, skip_to_if_nil),
        Command::Schema { target } => run_schema(target),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn context_for(units: Option<Units>) -> InputItemContext {
    match units {
        Some(Units::Metric) => InputItemContext::current(MeasurementSystem::Metric),
        Some(Units::Imperial) => InputItemContext::current(MeasurementSystem::Imperial),
        None => InputItemContext::from_env(),
    }
}

fn read_json(path: &Path) -> CliResult<Value> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn is_question(definition: &Value) -> bool {
    definition
        .get("type")
        .and_then(Value::as_str)
        .is_some_and(|kind| QUESTION_TYPES.contains(&kind))
}

fn load_item(path: &Path) -> CliResult<InputItemBuilder> {
    let definition = read_json(path)?;
    tracing::debug!(path = %path.display(), "loaded input item definition");
    Ok(input_item_serializer().decode(definition)?)
}

fn run_describe(path: PathBuf, units: Option<Units>) -> CliResult<()> {
    let definition = read_json(&path)?;
    let context = context_for(units);
    let described = describe_definition(definition, &context)?;
    println!("{}", serde_json::to_string_pretty(&described)?);
    Ok(())
}

fn describe_definition(definition: Value, context: &InputItemContext) -> CliResult<Value> {
    if is_question(&definition) {
        let question = QuestionSpec::from_value(definition)?;
        let items: Vec<Value> = question
            .build_input_items(context)
            .iter()
            .map(|item| describe_item(item, question.identifier()))
            .collect();
        Ok(json!({
            "identifier": question.identifier(),
            "type": question.question_type(),
            "answerType": question.answer_type(),
            "inputItems": items,
        }))
    } else {
        let builder = input_item_serializer().decode(definition)?;
        let item = builder.build_input_item(context);
        Ok(describe_item(&item, item.identifier.as_deref().unwrap_or("")))
    }
}

fn describe_item(item: &InputItem, question_identifier: &str) -> Value {
    json!({
        "type": item.input_item_type.map(|kind| kind.as_str()),
        "resultIdentifier": item.result_identifier(question_identifier),
        "fieldLabel": item.field_label,
        "placeholder": item.placeholder,
        "detail": item.detail,
        "uiHint": item.ui_hint,
        "optional": item.is_optional,
        "exclusive": item.is_exclusive,
        "answerType": item.answer_type,
        "picker": item.build_picker_source().as_ref().map(picker_kind),
    })
}

fn picker_kind(picker: &PickerSource) -> &'static str {
    match picker {
        PickerSource::Number { .. } => "number",
        PickerSource::Choice { .. } => "choice",
        PickerSource::Date { .. } => "date",
        PickerSource::ImperialHeight { .. } => "imperialHeight",
        PickerSource::InfantMass { .. } => "infantMass",
    }
}

fn run_answer(
    path: PathBuf,
    text: String,
    identifier: Option<String>,
    units: Option<Units>,
) -> CliResult<()> {
    let builder = load_item(&path)?;
    let item = builder.build_input_item(&context_for(units));
    let validator = item.build_text_validator();

    let answer = match validator.validate_text(Some(text.as_str())) {
        Ok(answer) => answer,
        Err(err) => {
            println!("Invalid answer: {} (code: {})", err.message, err.code());
            return Err("validation failed".into());
        }
    };

    let identifier = identifier
        .or_else(|| item.identifier.clone())
        .unwrap_or_else(|| "answer".to_string());
    let mut result = AnswerResult::new(identifier, Some(item.answer_type.clone()));
    result.question_text = item.field_label.clone();
    result.set_answer(answer.as_ref())?;
    println!("{}", result.to_json_pretty()?);
    Ok(())
}

fn run_decode(answer_type: &str, value: &str) -> CliResult<()> {
    let answer_type = answer_type_serializer().decode_str(answer_type)?;
    let value: Value = serde_json::from_str(value)?;
    let canonical = answer_type.decode_value(&value)?;
    let answer = answer_type.decode_answer(Some(&value))?;
    let output = json!({
        "answerType": answer_type,
        "value": canonical,
        "answer": answer.map(|answer| answer.to_string()),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_rules(
    question_path: PathBuf,
    result_path: Option<PathBuf>,
    peeking: bool,
    skip_to_if_nil: Option<String>,
) -> CliResult<()> {
    let question = QuestionSpec::from_value(read_json(&question_path)?)?;
    tracing::debug!(
        identifier = question.identifier(),
        rules = question.survey_rules().len(),
        "evaluating survey rules"
    );
    let result = match result_path {
        Some(path) => Some(AnswerResult::from_value(read_json(&path)?)?),
        None => None,
    };
    let skip_to = question.evaluate_survey_rules(
        result.as_ref(),
        peeking,
        skip_to_if_nil.as_deref(),
    );
    let cohorts = question.evaluate_cohorts(result.as_ref());
    let output = json!({
        "identifier": question.identifier(),
        "skipToIdentifier": skip_to,
        "cohorts": cohorts,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_schema(target: SchemaTarget) -> CliResult<()> {
    let schema = match target {
        SchemaTarget::InputItem => input_item_schema(),
        SchemaTarget::AnswerType => answer_type_schema(),
        SchemaTarget::Question => question_schema(),
        SchemaTarget::SurveyRule => survey_rule_schema(),
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
