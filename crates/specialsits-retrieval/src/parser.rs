//! Output schemas and structured-output parsing

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use specialsits_core::error::{Result, SpecialSitsError};

/// One named field in an extraction schema
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub name: String,
    pub description: String,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self { name: name.into(), description: description.into() }
    }
}

/// A named set of fields the LLM must fill in
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionSchema {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

impl ExtractionSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), fields: Vec::new() }
    }

    pub fn field(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.fields.push(FieldSpec::new(name, description));
        self
    }

    /// Merge several schemas into one (for joint-mode extraction).
    pub fn merged(name: impl Into<String>, schemas: &[ExtractionSchema]) -> Self {
        let mut merged = Self::new(name);
        for schema in schemas {
            merged.fields.extend(schema.fields.iter().cloned());
        }
        merged
    }

    /// Render machine-readable output-format instructions for the prompt.
    pub fn format_instructions(&self) -> String {
        let mut instructions = String::from(
            "Respond with a single JSON object containing exactly these keys, \
             each with a string value:\n",
        );
        for field in &self.fields {
            instructions.push_str(&format!("- \"{}\": {}\n", field.name, field.description));
        }
        instructions.push_str("Do not include any text outside the JSON object.");
        instructions
    }
}

/// Output parser kinds, one explicit handler per request shape
#[derive(Debug, Clone)]
pub enum OutputParser {
    /// Parse a JSON record against a declared schema
    Structured(ExtractionSchema),
    /// Parse a single datetime value
    Datetime,
    /// Return the raw text unmodified
    Text,
}

impl OutputParser {
    /// Format instructions embedded in the prompt, if this parser needs any.
    pub fn format_instructions(&self) -> Option<String> {
        match self {
            OutputParser::Structured(schema) => Some(schema.format_instructions()),
            OutputParser::Datetime => Some(
                "Respond with only a datetime in ISO 8601 format (YYYY-MM-DDTHH:MM:SS). \
                 Do not include any other text."
                    .to_string(),
            ),
            OutputParser::Text => None,
        }
    }

    /// Validate and coerce the LLM's raw text into a typed value.
    pub fn parse(&self, raw: &str) -> Result<FieldValue> {
        match self {
            OutputParser::Structured(schema) => parse_record(schema, raw).map(FieldValue::Record),
            OutputParser::Datetime => parse_datetime(raw).map(FieldValue::Datetime),
            OutputParser::Text => Ok(FieldValue::Text(raw.to_string())),
        }
    }
}

/// A successfully parsed value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Record(BTreeMap<String, String>),
    Datetime(NaiveDateTime),
    Text(String),
}

/// Outcome for one requested field in isolated-mode extraction
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FieldOutcome {
    Parsed { value: FieldValue },
    Failed { reason: String },
}

impl FieldOutcome {
    pub fn is_parsed(&self) -> bool {
        matches!(self, FieldOutcome::Parsed { .. })
    }
}

/// Aggregated result of a multi-field extraction, keyed by field name
pub type ExtractionResult = BTreeMap<String, FieldOutcome>;

/// Parse a JSON record from raw LLM text, tolerating code fences and
/// surrounding prose.
fn parse_record(schema: &ExtractionSchema, raw: &str) -> Result<BTreeMap<String, String>> {
    let json_slice = extract_json_object(raw).ok_or_else(|| SpecialSitsError::ParseFailure {
        field: schema.name.clone(),
        reason: "response contains no JSON object".to_string(),
    })?;

    let parsed: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json_slice)
        .map_err(|e| SpecialSitsError::ParseFailure {
            field: schema.name.clone(),
            reason: format!("invalid JSON: {}", e),
        })?;

    let mut record = BTreeMap::new();
    for field in &schema.fields {
        let value = parsed.get(&field.name).ok_or_else(|| SpecialSitsError::ParseFailure {
            field: field.name.clone(),
            reason: "missing from response".to_string(),
        })?;
        record.insert(field.name.clone(), value_to_string(value));
    }
    Ok(record)
}

/// Slice from the first `{` to the last `}`.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Accepted datetime formats: RFC 3339, bare ISO datetimes, and the date
/// formats filings commonly use.
fn parse_datetime(raw: &str) -> Result<NaiveDateTime> {
    let cleaned = raw.trim().trim_matches(|c| c == '`' || c == '"' || c == '\'').trim();

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(cleaned) {
        return Ok(dt.naive_utc());
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, format) {
            return Ok(dt);
        }
    }

    for format in ["%Y-%m-%d", "%B %d, %Y", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(cleaned, format) {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return Ok(dt);
            }
        }
    }

    Err(SpecialSitsError::ParseFailure {
        field: "datetime".to_string(),
        reason: format!("unrecognized datetime '{}'", cleaned),
    })
}
