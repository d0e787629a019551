//! Process-wide field catalog.
//!
//! Field descriptors are computed once per entity type and cached for the
//! process lifetime; the cache is never invalidated. Concurrent readers are
//! cheap (a shared read lock), and population uses a double-checked write so
//! parallel pipelines racing on first use agree on a single descriptor slice.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use crate::entity::Entity;
use crate::field::FieldDescriptor;

static FIELD_CATALOG: OnceLock<RwLock<HashMap<TypeId, &'static [FieldDescriptor]>>> =
    OnceLock::new();

/// Return the cached, declaration-ordered field descriptors for `T`.
///
/// The first call per type invokes [`Entity::field_descriptors`] and leaks
/// the result into the process-lifetime cache; every later call returns the
/// same `'static` slice.
pub fn fields_of<T: Entity>() -> &'static [FieldDescriptor] {
    let catalog = FIELD_CATALOG.get_or_init(|| RwLock::new(HashMap::new()));
    let key = TypeId::of::<T>();
    if let Some(fields) = catalog
        .read()
        .expect("field catalog lock poisoned")
        .get(&key)
    {
        return fields;
    }
    let mut map = catalog.write().expect("field catalog lock poisoned");
    // Re-check under the write lock: another thread may have populated the
    // entry between our read and write sections.
    *map.entry(key)
        .or_insert_with(|| Box::leak(T::field_descriptors().into_boxed_slice()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::{ModelError, Result};
    use crate::field::{FieldValue, SemanticType};

    #[derive(Debug, Default)]
    struct Sample {
        name: Option<String>,
        count: Option<i64>,
        active: Option<bool>,
    }

    impl Entity for Sample {
        fn field_descriptors() -> Vec<FieldDescriptor> {
            vec![
                FieldDescriptor::new("name", SemanticType::Text),
                FieldDescriptor::new("count", SemanticType::Integer),
                FieldDescriptor::new("active", SemanticType::Boolean),
            ]
        }

        fn get(&self, field: &str) -> Option<FieldValue> {
            match field {
                "name" => Some(self.name.clone().map_or(FieldValue::Null, FieldValue::Text)),
                "count" => Some(self.count.map_or(FieldValue::Null, FieldValue::Integer)),
                "active" => Some(self.active.map_or(FieldValue::Null, FieldValue::Boolean)),
                _ => None,
            }
        }

        fn set(&mut self, field: &str, value: FieldValue) -> Result<()> {
            match field {
                "name" => self.name = value.into_opt_text(field)?,
                "count" => self.count = value.into_opt_integer(field)?,
                "active" => {
                    self.active = match value {
                        FieldValue::Null => None,
                        other => Some(other.into_boolean(field)?),
                    }
                }
                _ => return Err(ModelError::UnknownField(field.to_string())),
            }
            Ok(())
        }

        fn from_values(values: Vec<FieldValue>) -> Result<Self> {
            let mut sample = Sample::default();
            let fields = fields_of::<Sample>();
            if values.len() != fields.len() {
                return Err(ModelError::Arity {
                    expected: fields.len(),
                    actual: values.len(),
                });
            }
            for (descriptor, value) in fields.iter().zip(values) {
                sample.set(&descriptor.name, value)?;
            }
            Ok(sample)
        }
    }

    #[test]
    fn order_matches_declaration() {
        let names: Vec<&str> = fields_of::<Sample>()
            .iter()
            .map(|field| field.name.as_str())
            .collect();
        assert_eq!(names, vec!["name", "count", "active"]);
    }

    #[test]
    fn repeated_lookups_return_the_same_slice() {
        let first = fields_of::<Sample>();
        let second = fields_of::<Sample>();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first, second);
    }

    #[test]
    fn concurrent_first_use_agrees_on_one_slice() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| fields_of::<Sample>().as_ptr() as usize))
            .collect();
        let pointers: Vec<usize> = handles
            .into_iter()
            .map(|handle| handle.join().expect("catalog thread panicked"))
            .collect();
        assert!(pointers.windows(2).all(|pair| pair[0] == pair[1]));
    }
}
