//! The entity abstraction the pipeline is generic over.
//!
//! An [`Entity`] is a record type with a fixed, statically known field
//! schema. Implementors describe their fields once via
//! [`Entity::field_descriptors`] and expose uniform by-name access, which is
//! what lets a single pipeline extract, transform, and load any conforming
//! type without per-type mapping code.

use crate::catalog::fields_of;
use crate::error::{ModelError, Result};
use crate::field::{FieldDescriptor, FieldValue};

/// A record type processable by the pipeline.
///
/// The `'static` bound is what allows the field catalog to key its cache by
/// [`std::any::TypeId`].
pub trait Entity: Sized + 'static {
    /// The canonical, declaration-ordered field schema of this type.
    ///
    /// Called once per process by the field catalog; use
    /// [`fields_of`](crate::catalog::fields_of) everywhere else.
    fn field_descriptors() -> Vec<FieldDescriptor>;

    /// Read a field by name. Returns `None` for unknown fields.
    fn get(&self, field: &str) -> Option<FieldValue>;

    /// Assign a field by name, coercing from the value's variant.
    fn set(&mut self, field: &str, value: FieldValue) -> Result<()>;

    /// Build a record from values in catalog order, as produced by extraction.
    fn from_values(values: Vec<FieldValue>) -> Result<Self>;
}

/// Capability of rendering a record as one delimited line, used by the
/// duplicate audit writer. Blanket-implemented for every [`Entity`].
pub trait CsvRow {
    fn to_csv_row(&self) -> String;
}

impl<T: Entity> CsvRow for T {
    fn to_csv_row(&self) -> String {
        let mut line = String::new();
        for (idx, descriptor) in fields_of::<T>().iter().enumerate() {
            if idx > 0 {
                line.push(',');
            }
            let value = self.get(&descriptor.name).unwrap_or(FieldValue::Null);
            line.push_str(&escape_csv_field(&value.render()));
        }
        line
    }
}

/// Quote a cell when it would otherwise break the line structure.
pub fn escape_csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Helper for building [`ModelError::Arity`] from a `Vec::try_into` failure.
pub fn arity_error(expected: usize, values: Vec<FieldValue>) -> ModelError {
    ModelError::Arity {
        expected,
        actual: values.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::field::SemanticType;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Reading {
        sensor: Option<String>,
        value: f64,
    }

    impl Entity for Reading {
        fn field_descriptors() -> Vec<FieldDescriptor> {
            vec![
                FieldDescriptor::new("sensor", SemanticType::Text),
                FieldDescriptor::new("value", SemanticType::Decimal),
            ]
        }

        fn get(&self, field: &str) -> Option<FieldValue> {
            match field {
                "sensor" => Some(
                    self.sensor
                        .clone()
                        .map_or(FieldValue::Null, FieldValue::Text),
                ),
                "value" => Some(FieldValue::Decimal(self.value)),
                _ => None,
            }
        }

        fn set(&mut self, field: &str, value: FieldValue) -> Result<()> {
            match field {
                "sensor" => self.sensor = value.into_opt_text(field)?,
                "value" => self.value = value.into_decimal(field)?,
                _ => return Err(ModelError::UnknownField(field.to_string())),
            }
            Ok(())
        }

        fn from_values(values: Vec<FieldValue>) -> Result<Self> {
            let [sensor, value]: [FieldValue; 2] =
                values.try_into().map_err(|v| arity_error(2, v))?;
            Ok(Self {
                sensor: sensor.into_opt_text("sensor")?,
                value: value.into_decimal("value")?,
            })
        }
    }

    #[test]
    fn csv_row_follows_catalog_order() {
        let reading = Reading {
            sensor: Some("probe-1".to_string()),
            value: 1.25,
        };
        assert_eq!(reading.to_csv_row(), "probe-1,1.25");
    }

    #[test]
    fn csv_row_renders_null_as_empty_cell() {
        let reading = Reading {
            sensor: None,
            value: 0.0,
        };
        assert_eq!(reading.to_csv_row(), ",0");
    }

    #[test]
    fn escape_quotes_delimiters_and_doubles_quotes() {
        assert_eq!(escape_csv_field("plain"), "plain");
        assert_eq!(escape_csv_field("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn set_rejects_unknown_field() {
        let mut reading = Reading::default();
        let error = reading
            .set("missing", FieldValue::Integer(1))
            .unwrap_err();
        assert!(matches!(error, ModelError::UnknownField(name) if name == "missing"));
    }

    #[test]
    fn from_values_rejects_wrong_arity() {
        let error = Reading::from_values(vec![FieldValue::Null]).unwrap_err();
        assert!(matches!(
            error,
            ModelError::Arity {
                expected: 2,
                actual: 1
            }
        ));
    }
}
