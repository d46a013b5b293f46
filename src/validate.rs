//! The recursive validator.
//!
//! One algorithm, two verbosities: [`Verbosity::Diagnostic`] builds messages,
//! [`Verbosity::Brief`] skips all formatting. Decisions and field paths are
//! identical in both modes.
//!
//! Dispatch is depth-first and short-circuiting:
//! - object shapes stop at the first failing field (declared order) and
//!   return that nested result verbatim;
//! - unions stop at the first matching alternative and, when none match,
//!   report at the union's own path.
use serde::Serialize;
use crate::descriptor::{Descriptor, PrimitiveKind, Shape};
use crate::named::NamedType;
use crate::value::{ClassRef, Value, ValueKind};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub field_path: Vec<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    #[default]
    Diagnostic,
    Brief,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    verbosity: Verbosity,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl ValidationResult {
    pub fn pass(field_path: &[String]) -> Self {
        Self { field_path: field_path.to_vec(), success: true, message: None }
    }

    pub fn fail(field_path: &[String], message: Option<String>) -> Self {
        Self { field_path: field_path.to_vec(), success: false, message }
    }

    /// Dotted form of the field path, empty at the root.
    pub fn dotted_path(&self) -> String { self.field_path.join(".") }

    fn prefixed(mut self, name: &str) -> Self {
        if let Some(message) = self.message.take() {
            self.message = Some(format!("{name}: {message}"));
        }
        self
    }
}

impl Validator {
    pub fn new(verbosity: Verbosity) -> Self { Self { verbosity } }

    pub fn verbosity(&self) -> Verbosity { self.verbosity }

    pub fn validate(&self, descriptor: &Descriptor, value: &Value) -> ValidationResult {
        self.validate_at(descriptor, value, &mut Vec::new())
    }

    /// Validate with `path` as the location of `value` inside some outer
    /// value. `path` is restored before returning.
    pub fn validate_at(&self, descriptor: &Descriptor, value: &Value, path: &mut Vec<String>) -> ValidationResult {
        match descriptor {
            Descriptor::Absent => self.check(value.is_absent(), path, || "is not `undefined`".into()),
            Descriptor::Null => self.check(value.is_null(), path, || "is not `null`".into()),
            Descriptor::Primitive(kind) => self.validate_primitive(*kind, value, path),
            Descriptor::Class(class) => self.validate_instance_of(class, value, path),
            Descriptor::Named(handle) => self.validate_named(handle, value, path),
            Descriptor::Object(shape) => self.validate_shape(shape, value, path),
            Descriptor::Union(alternatives) => self.validate_union(descriptor, alternatives, value, path),
        }
    }

    /// Validate through a handle and prefix its name onto a failure message.
    pub(crate) fn validate_named(&self, handle: &NamedType, value: &Value, path: &mut Vec<String>) -> ValidationResult {
        self.validate_at(handle.descriptor(), value, path).prefixed(handle.name())
    }

    fn validate_primitive(&self, kind: PrimitiveKind, value: &Value, path: &[String]) -> ValidationResult {
        let expected = match kind {
            PrimitiveKind::String => ValueKind::String,
            PrimitiveKind::Number => ValueKind::Number,
            PrimitiveKind::Boolean => ValueKind::Boolean,
            PrimitiveKind::Symbol => ValueKind::Symbol,
        };
        self.check(value.kind() == expected, path, || format!("is not of type {:?}", kind.as_str()))
    }

    fn validate_instance_of(&self, class: &ClassRef, value: &Value, path: &[String]) -> ValidationResult {
        self.check(value.is_instance_of(class), path, || {
            format!("is not instance of {:?}", crate::name::class_name(class))
        })
    }

    fn validate_shape(&self, shape: &Shape, value: &Value, path: &mut Vec<String>) -> ValidationResult {
        // nothing to index into
        if value.is_absent() || value.is_null() {
            let message = self.message(|| format!("Expected object value, got `{value}`"));
            return ValidationResult::fail(path, message);
        }
        for (field, descriptor) in shape.iter() {
            path.push(field.to_string());
            let result = self.validate_at(descriptor, value.field(field), path);
            path.pop();
            if !result.success {
                return result;
            }
        }
        ValidationResult::pass(path)
    }

    fn validate_union(&self, union: &Descriptor, alternatives: &[Descriptor], value: &Value, path: &mut Vec<String>) -> ValidationResult {
        let matched = alternatives
            .iter()
            .any(|alternative| self.validate_at(alternative, value, path).success);
        self.check(matched, path, || format!("is not of type {:?}", crate::name::type_name(union)))
    }

    fn check(&self, success: bool, path: &[String], predicate: impl FnOnce() -> String) -> ValidationResult {
        if success {
            return ValidationResult::pass(path);
        }
        let message = self.message(|| format!("{} {}", subject(path), predicate()));
        ValidationResult::fail(path, message)
    }

    fn message(&self, render: impl FnOnce() -> String) -> Option<String> {
        match self.verbosity {
            Verbosity::Diagnostic => Some(render()),
            Verbosity::Brief => None,
        }
    }
}

fn subject(path: &[String]) -> String {
    if path.is_empty() {
        "Value".to_string()
    } else {
        format!("Field {:?}", path.join("."))
    }
}

/// Diagnostic validation from the root.
pub fn validate(descriptor: &Descriptor, value: &Value) -> ValidationResult {
    Validator::default().validate(descriptor, value)
}

/// Diagnostic validation of a value found at `field_path`.
pub fn validate_at(descriptor: &Descriptor, value: &Value, field_path: &[String]) -> ValidationResult {
    Validator::default().validate_at(descriptor, value, &mut field_path.to_vec())
}

// ------------------------------- Tests ------------------------------------ //
