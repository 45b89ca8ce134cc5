use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Int,
    Float,
    Text,
}

#[derive(Clone, Debug, Serialize)]
pub struct FieldDef {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Deserialize)]
pub struct FormToml {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<FieldToml>,
}

#[derive(Deserialize)]
pub struct FieldToml {
    pub name: String,
    #[serde(default)]
    pub label: String,
    pub kind: String,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

#[derive(Debug, Error, PartialEq)]
pub enum PayloadError {
    #[error("field '{field}' expects an integer, got '{value}'")]
    InvalidInt { field: String, value: String },
    #[error("field '{field}' expects a number, got '{value}'")]
    InvalidFloat { field: String, value: String },
}

/// Per-field typing table for the prediction form, resolved once at startup.
/// Submitted values are coerced by declared kind rather than by whether they
/// happen to parse as numbers.
#[derive(Clone, Debug)]
pub struct FormSchema {
    pub name: String,
    pub description: String,
    fields: Vec<FieldDef>,
    kinds: HashMap<String, FieldKind>,
}

impl FormSchema {
    pub fn new(name: impl Into<String>, description: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        let kinds = fields.iter().map(|f| (f.name.clone(), f.kind)).collect();
        Self {
            name: name.into(),
            description: description.into(),
            fields,
            kinds,
        }
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn kind_of(&self, field: &str) -> Option<FieldKind> {
        self.kinds.get(field).copied()
    }

    pub fn load_from_toml(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let form: FormToml = match toml::from_str(&contents) {
            Ok(f) => f,
            Err(e) => {
                warn!("[cardiogauge] Failed to parse {:?}: {}", path, e);
                return None;
            }
        };

        let mut fields = Vec::with_capacity(form.fields.len());
        for field in form.fields {
            let kind = match field.kind.as_str() {
                "int" => FieldKind::Int,
                "float" => FieldKind::Float,
                "string" | "text" => FieldKind::Text,
                other => {
                    warn!("[cardiogauge] Unknown field kind '{}' in {:?}", other, path);
                    return None;
                }
            };
            let label = if field.label.is_empty() {
                field.name.clone()
            } else {
                field.label
            };
            fields.push(FieldDef {
                name: field.name,
                label,
                kind,
                min: field.min,
                max: field.max,
            });
        }

        Some(Self::new(form.name, form.description, fields))
    }

    /// The thirteen input features of the UCI heart disease model, used when
    /// no schema file is present. `oldpeak` is the single fractional field.
    pub fn heart_default() -> Self {
        fn int(name: &str, label: &str, min: f64, max: f64) -> FieldDef {
            FieldDef {
                name: name.to_string(),
                label: label.to_string(),
                kind: FieldKind::Int,
                min: Some(min),
                max: Some(max),
            }
        }

        let fields = vec![
            int("age", "Age (years)", 1.0, 120.0),
            int("sex", "Sex (1 = male, 0 = female)", 0.0, 1.0),
            int("cp", "Chest pain type (0-3)", 0.0, 3.0),
            int("trestbps", "Resting blood pressure (mm Hg)", 80.0, 220.0),
            int("chol", "Serum cholesterol (mg/dl)", 100.0, 600.0),
            int("fbs", "Fasting blood sugar > 120 mg/dl (1 = yes)", 0.0, 1.0),
            int("restecg", "Resting ECG result (0-2)", 0.0, 2.0),
            int("thalach", "Maximum heart rate achieved", 60.0, 220.0),
            int("exang", "Exercise-induced angina (1 = yes)", 0.0, 1.0),
            FieldDef {
                name: "oldpeak".to_string(),
                label: "ST depression induced by exercise".to_string(),
                kind: FieldKind::Float,
                min: Some(0.0),
                max: Some(6.2),
            },
            int("slope", "Slope of peak exercise ST segment (0-2)", 0.0, 2.0),
            int("ca", "Major vessels colored by fluoroscopy (0-3)", 0.0, 3.0),
            int("thal", "Thalassemia (1-3)", 1.0, 3.0),
        ];

        Self::new(
            "heart-disease",
            "UCI heart disease prediction form",
            fields,
        )
    }

    /// Builds the JSON payload for the upstream request. Declared fields are
    /// typed by kind; fields the schema does not know pass through as
    /// strings.
    pub fn build_payload(
        &self,
        submitted: &HashMap<String, String>,
    ) -> Result<Map<String, Value>, PayloadError> {
        let mut payload = Map::new();
        for (name, raw) in submitted {
            let value = match self.kind_of(name) {
                Some(FieldKind::Int) => {
                    let parsed: i64 =
                        raw.trim().parse().map_err(|_| PayloadError::InvalidInt {
                            field: name.clone(),
                            value: raw.clone(),
                        })?;
                    Value::Number(Number::from(parsed))
                }
                Some(FieldKind::Float) => {
                    let parsed: f64 =
                        raw.trim().parse().map_err(|_| PayloadError::InvalidFloat {
                            field: name.clone(),
                            value: raw.clone(),
                        })?;
                    let number =
                        Number::from_f64(parsed).ok_or_else(|| PayloadError::InvalidFloat {
                            field: name.clone(),
                            value: raw.clone(),
                        })?;
                    Value::Number(number)
                }
                Some(FieldKind::Text) | None => Value::String(raw.clone()),
            };
            payload.insert(name.clone(), value);
        }
        Ok(payload)
    }
}
