//! Field descriptors used to validate request bodies before they reach the
//! document store.

use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::{self, Bson, Document};
use serde_json::{Map, Value};
use thiserror::Error;

pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("El cuerpo de la solicitud debe ser un objeto JSON")]
    NotAnObject,
    #[error("El campo {0} es obligatorio")]
    Missing(&'static str),
    #[error("El campo {0} no puede estar vacío")]
    Empty(&'static str),
    #[error("El campo {field} debe ser {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("Valor '{value}' no permitido para {field}; opciones: {allowed}")]
    InvalidChoice {
        field: &'static str,
        value: String,
        allowed: String,
    },
    #[error("Fecha inválida en {field}: {value}")]
    InvalidTimestamp { field: &'static str, value: String },
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Text,
    Timestamp,
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub enum Fallback {
    None,
    Value(&'static str),
    Now,
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub fallback: Fallback,
}

impl Field {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            fallback: Fallback::None,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            fallback: Fallback::None,
        }
    }

    pub const fn or(self, fallback: Fallback) -> Self {
        Self { fallback, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_i32(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub collection: &'static str,
    pub fields: &'static [Field],
    pub sort_by: (&'static str, SortOrder),
}

impl Schema {
    /// Builds the document for a new record: every required field present and
    /// non-empty, defaults applied, unknown keys dropped.
    pub fn prepare_insert(
        &self,
        body: &Value,
        now: DateTime<Utc>,
    ) -> Result<Document, ValidationError> {
        let object = as_object(body)?;
        let mut document = Document::new();

        for field in self.fields {
            let value = match object.get(field.name) {
                None | Some(Value::Null) => match field.fallback {
                    _ if field.required => return Err(ValidationError::Missing(field.name)),
                    Fallback::None => continue,
                    Fallback::Value(value) => Bson::String(value.to_string()),
                    Fallback::Now => Bson::DateTime(to_bson_datetime(now)),
                },
                Some(raw) => convert(field, raw)?,
            };
            document.insert(field.name, value);
        }

        document.insert(CREATED_AT, to_bson_datetime(now));
        document.insert(UPDATED_AT, to_bson_datetime(now));
        Ok(document)
    }

    /// Builds a `$set` payload from the fields present in `body`. Optional
    /// fields sent as `null` go back to their default, or are cleared when
    /// they have none; required ones may not be nulled.
    pub fn prepare_update(
        &self,
        body: &Value,
        now: DateTime<Utc>,
    ) -> Result<Document, ValidationError> {
        let object = as_object(body)?;
        let mut changes = Document::new();

        for field in self.fields {
            match object.get(field.name) {
                None => {}
                Some(Value::Null) if field.required => {
                    return Err(ValidationError::Empty(field.name));
                }
                Some(Value::Null) => {
                    let reset = match field.fallback {
                        Fallback::None => Bson::Null,
                        Fallback::Value(value) => Bson::String(value.to_string()),
                        Fallback::Now => Bson::DateTime(to_bson_datetime(now)),
                    };
                    changes.insert(field.name, reset);
                }
                Some(raw) => {
                    changes.insert(field.name, convert(field, raw)?);
                }
            }
        }

        changes.insert(UPDATED_AT, to_bson_datetime(now));
        Ok(changes)
    }
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationError> {
    body.as_object().ok_or(ValidationError::NotAnObject)
}

fn convert(field: &Field, raw: &Value) -> Result<Bson, ValidationError> {
    match field.kind {
        FieldKind::Text => {
            let text = text_value(field, raw)?;
            Ok(Bson::String(text))
        }
        FieldKind::Choice(allowed) => {
            let text = text_value(field, raw)?;
            if allowed.contains(&text.as_str()) {
                Ok(Bson::String(text))
            } else {
                Err(ValidationError::InvalidChoice {
                    field: field.name,
                    value: text,
                    allowed: allowed.join(", "),
                })
            }
        }
        FieldKind::Timestamp => parse_timestamp(field.name, raw)
            .map(|value| Bson::DateTime(to_bson_datetime(value))),
    }
}

fn text_value(field: &Field, raw: &Value) -> Result<String, ValidationError> {
    let text = raw
        .as_str()
        .ok_or(ValidationError::WrongType {
            field: field.name,
            expected: "texto",
        })?
        .trim()
        .to_string();
    if field.required && text.is_empty() {
        return Err(ValidationError::Empty(field.name));
    }
    Ok(text)
}

/// Accepts RFC 3339, a bare `YYYY-MM-DD` (midnight UTC) or epoch milliseconds.
pub fn parse_timestamp(field: &'static str, raw: &Value) -> Result<DateTime<Utc>, ValidationError> {
    let invalid = || ValidationError::InvalidTimestamp {
        field,
        value: raw.to_string(),
    };

    match raw {
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(ValidationError::Empty(field));
            }
            if let Ok(value) = DateTime::parse_from_rfc3339(text) {
                return Ok(value.with_timezone(&Utc));
            }
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|value| value.and_utc())
                .ok_or_else(invalid)
        }
        Value::Number(number) => number
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .ok_or_else(invalid),
        _ => Err(ValidationError::WrongType {
            field,
            expected: "una fecha",
        }),
    }
}

pub fn to_bson_datetime(value: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(value.timestamp_millis())
}
