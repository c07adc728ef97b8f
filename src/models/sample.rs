//! Water sample request model

use serde::Serialize;
use serde_json::{json, Map, Value};

/// Number of measurements per sample
pub const FEATURE_COUNT: usize = 9;

/// JSON keys, in the column order the scaler and model were fitted on
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "ph",
    "Hardness",
    "Solids",
    "Chloramines",
    "Sulfate",
    "Conductivity",
    "Organic_Carbon",
    "Trihalomethanes",
    "Turbidity",
];

/// Nine water-quality measurements submitted for a prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterSample {
    pub ph: f64,
    #[serde(rename = "Hardness")]
    pub hardness: f64,
    #[serde(rename = "Solids")]
    pub solids: f64,
    #[serde(rename = "Chloramines")]
    pub chloramines: f64,
    #[serde(rename = "Sulfate")]
    pub sulfate: f64,
    #[serde(rename = "Conductivity")]
    pub conductivity: f64,
    #[serde(rename = "Organic_Carbon")]
    pub organic_carbon: f64,
    #[serde(rename = "Trihalomethanes")]
    pub trihalomethanes: f64,
    #[serde(rename = "Turbidity")]
    pub turbidity: f64,
}

/// One entry of a 422 response body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub loc: Vec<Value>,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
}

impl FieldError {
    fn field(kind: &'static str, name: &str, msg: impl Into<String>, input: Value) -> Self {
        Self {
            kind,
            loc: vec![json!("body"), json!(name)],
            msg: msg.into(),
            input: Some(input),
        }
    }
}

impl WaterSample {
    /// Parse a request body, honouring its `Content-Type`.
    ///
    /// Numbers are accepted as-is, numeric strings are coerced, and every
    /// missing or non-numeric field is reported at once. No range checks.
    /// Only a missing header, `application/json` or `application/*+json`
    /// is JSON-decoded; any other body is rejected as a non-object input.
    pub fn from_request(content_type: Option<&str>, body: &[u8]) -> Result<Self, Vec<FieldError>> {
        if !content_type.map_or(true, is_json_content_type) {
            return Err(vec![not_an_object(Value::String(
                String::from_utf8_lossy(body).into_owned(),
            ))]);
        }

        let value: Value = serde_json::from_slice(body).map_err(|e| {
            vec![FieldError {
                kind: "json_invalid",
                loc: vec![json!("body"), json!(json_error_offset(body, &e))],
                msg: format!("JSON decode error: {}", e),
                input: None,
            }]
        })?;

        let object = value
            .as_object()
            .ok_or_else(|| vec![not_an_object(value.clone())])?;

        Self::from_object(object)
    }

    fn from_object(object: &Map<String, Value>) -> Result<Self, Vec<FieldError>> {
        let mut values = [0.0; FEATURE_COUNT];
        let mut errors = Vec::new();

        for (slot, name) in values.iter_mut().zip(FEATURE_NAMES) {
            match object.get(name) {
                None => errors.push(FieldError::field(
                    "missing",
                    name,
                    "Field required",
                    Value::Object(object.clone()),
                )),
                Some(raw) => match coerce_float(raw) {
                    Ok(v) => *slot = v,
                    Err((kind, msg)) => errors.push(FieldError::field(kind, name, msg, raw.clone())),
                },
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self::from_features(values))
    }

    pub fn from_features(f: [f64; FEATURE_COUNT]) -> Self {
        Self {
            ph: f[0],
            hardness: f[1],
            solids: f[2],
            chloramines: f[3],
            sulfate: f[4],
            conductivity: f[5],
            organic_carbon: f[6],
            trihalomethanes: f[7],
            turbidity: f[8],
        }
    }

    /// Feature vector in `FEATURE_NAMES` order
    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.ph,
            self.hardness,
            self.solids,
            self.chloramines,
            self.sulfate,
            self.conductivity,
            self.organic_carbon,
            self.trihalomethanes,
            self.turbidity,
        ]
    }
}

fn not_an_object(input: Value) -> FieldError {
    FieldError {
        kind: "model_attributes_type",
        loc: vec![json!("body")],
        msg: "Input should be a valid dictionary or object to extract fields from".to_string(),
        input: Some(input),
    }
}

/// `application/json` or any `application/<subtype>+json`, parameters ignored
fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.split_once('/') {
        Some(("application", subtype)) => subtype == "json" || subtype.ends_with("+json"),
        _ => false,
    }
}

fn coerce_float(raw: &Value) -> Result<f64, (&'static str, &'static str)> {
    match raw {
        Value::Number(n) => n
            .as_f64()
            .ok_or(("float_type", "Input should be a valid number")),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
            (
                "float_parsing",
                "Input should be a valid number, unable to parse string as a number",
            )
        }),
        _ => Err(("float_type", "Input should be a valid number")),
    }
}

/// Byte offset of a JSON syntax error, from serde_json's line/column
fn json_error_offset(body: &[u8], err: &serde_json::Error) -> usize {
    let line = err.line().saturating_sub(1);
    let preceding: usize = body
        .split(|b| *b == b'\n')
        .take(line)
        .map(|l| l.len() + 1)
        .sum();
    (preceding + err.column().saturating_sub(1)).min(body.len())
}
