//! Named types: the user-facing handle pairing a display name with a
//! descriptor.
//!
//! Handles are immutable and shared; cloning a [`NamedType`] clones the
//! reference, not the type. Every handle ever constructed is recorded in a
//! weak, identity-keyed registry so [`is_named_type_instance`] can tell a
//! live handle apart from anything else.
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, Weak};
use once_cell::sync::Lazy;
use crate::descriptor::Descriptor;
use crate::error::DescriptorError;
use crate::validate::{ValidationResult, Validator, Verbosity};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Clone)]
pub struct NamedType(Arc<NamedTypeInner>);

struct NamedTypeInner {
    name: String,
    descriptor: Descriptor,
}

/// Collects the two constructor parts one at a time, for callers that
/// assemble them dynamically (see [`crate::doc`]).
#[derive(Debug, Default)]
pub struct NamedTypeBuilder {
    name: Option<String>,
    descriptor: Option<Descriptor>,
}

/// Address of the shared allocation → weak handle. Addresses can be reused
/// after a handle dies, so lookups also check the weak pointer is alive.
static INSTANCES: Lazy<RwLock<HashMap<usize, Weak<NamedTypeInner>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl NamedType {
    pub fn new(name: impl Into<String>, descriptor: impl Into<Descriptor>) -> Self {
        let handle = NamedType(Arc::new(NamedTypeInner {
            name: name.into(),
            descriptor: descriptor.into(),
        }));
        register(&handle);
        handle
    }

    pub fn builder() -> NamedTypeBuilder { NamedTypeBuilder::default() }

    pub fn name(&self) -> &str { &self.0.name }
    pub fn descriptor(&self) -> &Descriptor { &self.0.descriptor }

    /// Name of the wrapped descriptor, e.g. `[Interface]` or `(string | null)`.
    pub fn type_name(&self) -> String { crate::name::type_name(&self.0.descriptor) }

    pub fn validate(&self, value: &crate::value::Value) -> ValidationResult {
        let result = Validator::new(Verbosity::Diagnostic).validate_named(self, value, &mut Vec::new());
        if !result.success {
            tracing::debug!(
                named_type = %self.name(),
                field_path = ?result.field_path,
                message = result.message.as_deref().unwrap_or(""),
                "value rejected"
            );
        }
        result
    }

    pub fn is(&self, value: &crate::value::Value) -> bool {
        Validator::new(Verbosity::Brief).validate_named(self, value, &mut Vec::new()).success
    }

    /// Mint a new handle with the same name whose descriptor also accepts
    /// `undefined` (per field for object shapes).
    pub fn partial(&self) -> Result<NamedType, DescriptorError> {
        let inner = crate::builder::partial(self.descriptor())?;
        Ok(NamedType::new(self.name(), inner))
    }

    pub fn ptr_eq(&self, other: &NamedType) -> bool { Arc::ptr_eq(&self.0, &other.0) }

    fn address(&self) -> usize { Arc::as_ptr(&self.0) as usize }
}

impl NamedTypeBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn descriptor(mut self, descriptor: impl Into<Descriptor>) -> Self {
        self.descriptor = Some(descriptor.into());
        self
    }

    pub fn build(self) -> Result<NamedType, DescriptorError> {
        match (self.name, self.descriptor) {
            (Some(name), Some(descriptor)) => Ok(NamedType::new(name, descriptor)),
            (name, descriptor) => Err(DescriptorError::Arity {
                expected: 2,
                received: name.is_some() as usize + descriptor.is_some() as usize,
            }),
        }
    }
}

impl PartialEq for NamedType {
    fn eq(&self, other: &Self) -> bool { self.ptr_eq(other) }
}

impl fmt::Display for NamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Named({:?} = {})", self.name(), self.type_name())
    }
}

impl fmt::Debug for NamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedType")
            .field("name", &self.0.name)
            .field("descriptor", &self.0.descriptor)
            .finish()
    }
}

impl Drop for NamedTypeInner {
    fn drop(&mut self) {
        // the allocation is going away; drop its slot so the address can be reused
        let address = self as *const NamedTypeInner as usize;
        if let Ok(mut instances) = INSTANCES.write() {
            if instances.get(&address).is_some_and(|weak| weak.strong_count() == 0) {
                instances.remove(&address);
            }
        }
    }
}

fn register(handle: &NamedType) {
    let mut instances = match INSTANCES.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    instances.insert(handle.address(), Arc::downgrade(&handle.0));
    tracing::trace!(named_type = %handle.name(), live = instances.len(), "registered named type");
}

/// True when `value` is a [`NamedType`] handle produced by [`NamedType::new`]
/// (or the builder) and still alive.
pub fn is_named_type_instance(value: &dyn Any) -> bool {
    let Some(handle) = value.downcast_ref::<NamedType>() else {
        return false;
    };
    let entry = match INSTANCES.read() {
        Ok(instances) => instances.get(&handle.address()).cloned(),
        Err(poisoned) => poisoned.into_inner().get(&handle.address()).cloned(),
    };
    entry
        .and_then(|weak| weak.upgrade())
        .is_some_and(|live| Arc::ptr_eq(&live, &handle.0))
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Shape;
    use crate::value::Value;
    use serde_json::json;

    fn user() -> NamedType {
        NamedType::new(
            "User",
            Shape::new().field("name", Descriptor::STRING).field("age", Descriptor::NUMBER),
        )
    }

    #[test]
    fn user_accepts_complete_record() {
        let result = user().validate(&Value::from(json!({"name": "Alice", "age": 30})));
        assert!(result.success);
        assert!(result.message.is_none());
        assert!(result.field_path.is_empty());
    }

    #[test]
    fn user_rejects_missing_age_with_prefixed_message() {
        let result = user().validate(&Value::from(json!({"name": "Alice"})));
        assert!(!result.success);
        assert_eq!(result.field_path, vec!["age".to_string()]);
        let message = result.message.unwrap();
        assert!(message.starts_with("User: "), "{message}");
        assert!(message.contains("\"age\""), "{message}");
    }

    #[test]
    fn is_agrees_with_validate() {
        let t = user();
        for v in [json!({"name": "a", "age": 1}), json!({"name": 1}), json!(null), json!("x")] {
            let v = Value::from(v);
            assert_eq!(t.is(&v), t.validate(&v).success);
        }
    }

    #[test]
    fn builder_requires_both_parts() {
        let err = NamedType::builder().name("X").build().unwrap_err();
        assert!(matches!(err, DescriptorError::Arity { expected: 2, received: 1 }));
        let err = NamedType::builder().build().unwrap_err();
        assert!(matches!(err, DescriptorError::Arity { expected: 2, received: 0 }));
        let ok = NamedType::builder().name("X").descriptor(Shape::new()).build().unwrap();
        assert_eq!(ok.name(), "X");
    }

    #[test]
    fn display_embeds_type_name() {
        let t = NamedType::new("Id", Descriptor::Union(vec![Descriptor::STRING, Descriptor::NUMBER]));
        assert_eq!(t.type_name(), "(string | number)");
        assert_eq!(t.to_string(), format!("Named(\"Id\" = {})", t.type_name()));
        assert_eq!(user().to_string(), "Named(\"User\" = [Interface])");
    }

    #[test]
    fn registry_recognises_live_handles_only() {
        let t = user();
        assert!(is_named_type_instance(&t));
        assert!(is_named_type_instance(&t.clone()));
        assert!(!is_named_type_instance(&"User"));
        assert!(!is_named_type_instance(&Descriptor::STRING));
    }

    #[test]
    fn handles_compare_by_identity() {
        let a = user();
        let b = user();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn nested_named_types_stack_prefixes() {
        let address = NamedType::new("Address", Shape::new().field("zip", Descriptor::NUMBER));
        let person = NamedType::new("Person", Shape::new().field("address", &address));
        let result = person.validate(&Value::from(json!({"address": {"zip": "x"}})));
        assert_eq!(result.field_path, vec!["address", "zip"]);
        assert_eq!(
            result.message.as_deref(),
            Some("Person: Address: Field \"address.zip\" is not of type \"number\"")
        );
    }

    #[test]
    fn partial_mints_a_distinct_handle_with_the_same_name() {
        let t = user();
        let p = t.partial().unwrap();
        assert_eq!(p.name(), "User");
        assert_ne!(p, t);
        assert!(p.is(&Value::from(json!({}))));
        assert!(!t.is(&Value::from(json!({}))));
        assert!(NamedType::new("S", Descriptor::STRING).partial().is_err());
    }
}
