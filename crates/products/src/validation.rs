//! Payload rules for create and update requests.
//!
//! Both modes share one rule table. Create requires every field; update
//! requires at least one. Keys outside the table are rejected. All
//! violations are collected, in table order then key order, with
//! `"<key>" <rule>` phrasing.

use std::ops::RangeInclusive;

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::product::{NewProduct, ProductPatch};

pub const NAME_LEN: RangeInclusive<usize> = 2..=45;
pub const CATEGORY_LEN: RangeInclusive<usize> = 2..=24;

/// Largest magnitude a price may have: 2^53 - 1.
pub const MAX_SAFE_PRICE: f64 = 9_007_199_254_740_991.0;

/// Which rule set to apply.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ValidationMode {
    Create,
    Update,
}

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Offending key, or `value` for whole-payload rules.
    pub field: String,
    pub message: String,
}

/// Outcome of validating one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn messages(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.message.as_str()).collect()
    }

    fn push(&mut self, field: &str, message: String) {
        self.violations.push(Violation {
            field: field.to_string(),
            message,
        });
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Field {
    Name,
    Price,
    Category,
}

impl Field {
    const ALL: [Field; 3] = [Field::Name, Field::Price, Field::Category];

    fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Price => "price",
            Field::Category => "category",
        }
    }

    fn is_known(key: &str) -> bool {
        Self::ALL.iter().any(|f| f.key() == key)
    }
}

#[derive(Debug, Default)]
struct Fields {
    name: Option<String>,
    price: Option<Number>,
    category: Option<String>,
}

/// Validate `payload` against the rules of `mode`.
pub fn validate(payload: &Value, mode: ValidationMode) -> ValidationReport {
    check(payload, mode).err().unwrap_or_default()
}

impl NewProduct {
    /// Validate a create payload and return its normalised fields.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationReport> {
        let fields = check(payload, ValidationMode::Create)?;
        match (fields.name, fields.price, fields.category) {
            (Some(name), Some(price), Some(category)) => Ok(NewProduct {
                name,
                price,
                category,
            }),
            // `check` reports every missing field in create mode.
            _ => Err(ValidationReport::default()),
        }
    }
}

impl ProductPatch {
    /// Validate an update payload and return the supplied fields.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationReport> {
        let fields = check(payload, ValidationMode::Update)?;
        Ok(ProductPatch {
            name: fields.name,
            price: fields.price,
            category: fields.category,
        })
    }
}

fn check(payload: &Value, mode: ValidationMode) -> Result<Fields, ValidationReport> {
    let mut report = ValidationReport::default();

    let Some(object) = payload.as_object() else {
        report.push("value", "\"value\" must be of type object".to_string());
        return Err(report);
    };

    let fields = check_fields(object, mode, &mut report);

    for key in object.keys().filter(|k| !Field::is_known(k)) {
        report.push(key, format!("\"{key}\" is not allowed"));
    }

    if mode == ValidationMode::Update && object.is_empty() {
        report.push("value", "\"value\" must have at least 1 key".to_string());
    }

    if report.is_valid() {
        Ok(fields)
    } else {
        Err(report)
    }
}

fn check_fields(object: &Map<String, Value>, mode: ValidationMode, report: &mut ValidationReport) -> Fields {
    let mut fields = Fields::default();

    for field in Field::ALL {
        let key = field.key();
        let Some(value) = object.get(key) else {
            if mode == ValidationMode::Create {
                report.push(key, format!("\"{key}\" is required"));
            }
            continue;
        };

        let outcome = match field {
            Field::Name => check_text(key, value, NAME_LEN).map(|s| fields.name = Some(s)),
            Field::Price => check_number(key, value).map(|n| fields.price = Some(n)),
            Field::Category => check_text(key, value, CATEGORY_LEN).map(|s| fields.category = Some(s)),
        };
        if let Err(message) = outcome {
            report.push(key, message);
        }
    }

    fields
}

fn check_text(key: &str, value: &Value, len: RangeInclusive<usize>) -> Result<String, String> {
    let Value::String(s) = value else {
        return Err(format!("\"{key}\" must be a string"));
    };

    let count = s.chars().count();
    if count == 0 {
        return Err(format!("\"{key}\" is not allowed to be empty"));
    }
    if count < *len.start() {
        return Err(format!(
            "\"{key}\" length must be at least {} characters long",
            len.start()
        ));
    }
    if count > *len.end() {
        return Err(format!(
            "\"{key}\" length must be less than or equal to {} characters long",
            len.end()
        ));
    }
    Ok(s.clone())
}

/// Numbers pass through untouched; strings holding a decimal number are converted.
/// Either way the magnitude must stay within [`MAX_SAFE_PRICE`].
fn check_number(key: &str, value: &Value) -> Result<Number, String> {
    let number = parse_number(key, value)?;
    if !is_safe(&number) {
        return Err(format!("\"{key}\" must be a safe number"));
    }
    Ok(number)
}

fn is_safe(number: &Number) -> bool {
    if let Some(i) = number.as_i64() {
        return i.unsigned_abs() <= MAX_SAFE_PRICE as u64;
    }
    if let Some(u) = number.as_u64() {
        return u <= MAX_SAFE_PRICE as u64;
    }
    number.as_f64().is_some_and(|f| f.abs() <= MAX_SAFE_PRICE)
}

fn parse_number(key: &str, value: &Value) -> Result<Number, String> {
    let not_a_number = || format!("\"{key}\" must be a number");

    match value {
        Value::Number(n) => Ok(n.clone()),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(not_a_number());
            }
            if let Ok(i) = s.parse::<i64>() {
                return Ok(Number::from(i));
            }
            s.parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .and_then(Number::from_f64)
                .ok_or_else(not_a_number)
        }
        _ => Err(not_a_number()),
    }
}
