//! Dynamic runtime values checked by the validator.
//!
//! Rust has no `any`, so the crate carries its own: enough of a host value
//! model to express "not supplied", null, the primitive kinds, identity-bearing
//! symbols, arrays and objects that may be instances of a [`Class`].
use std::fmt;
use std::sync::Arc;
use indexmap::IndexMap;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Absent,                  // field not supplied
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Symbol(Symbol),
    Array(Vec<Value>),
    Object(Object),
}

/// Runtime kind tag, the equivalent of a `typeof` check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Absent,
    Null,
    Boolean,
    Number,
    String,
    Symbol,
    Object,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    pub class: Option<ClassRef>,
    pub fields: IndexMap<String, Value>,
}

pub type ClassRef = Arc<Class>;

/// Opaque constructor reference. Compared by identity, never by name.
#[derive(Debug)]
pub struct Class {
    name: Option<String>,
    parent: Option<ClassRef>,
}

/// Unique token; two symbols are equal only if they are the same symbol.
#[derive(Debug, Clone)]
pub struct Symbol(Arc<Option<String>>);

static ABSENT: Value = Value::Absent;

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Absent => ValueKind::Absent,
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Symbol(_) => ValueKind::Symbol,
            Value::Array(_) | Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn is_absent(&self) -> bool { matches!(self, Value::Absent) }
    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }

    /// Read a field the way a property access would: anything that is not
    /// there reads as [`Value::Absent`].
    pub fn field(&self, name: &str) -> &Value {
        match self {
            Value::Object(obj) => obj.fields.get(name).unwrap_or(&ABSENT),
            Value::Array(xs) => name
                .parse::<usize>()
                .ok()
                .and_then(|ix| xs.get(ix))
                .unwrap_or(&ABSENT),
            _ => &ABSENT,
        }
    }

    /// Nominal check across the whole inheritance chain.
    pub fn is_instance_of(&self, class: &ClassRef) -> bool {
        match self {
            Value::Object(Object { class: Some(own), .. }) => own.is_subclass_of(class),
            _ => false,
        }
    }

    pub fn instance(class: &ClassRef, fields: IndexMap<String, Value>) -> Self {
        Value::Object(Object { class: Some(class.clone()), fields })
    }

    pub fn symbol(description: impl Into<String>) -> Self {
        Value::Symbol(Symbol::new(Some(description.into())))
    }
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Absent => "undefined",
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Symbol => "symbol",
            ValueKind::Object => "object",
        }
    }
}

impl Class {
    pub fn new(name: impl Into<String>) -> ClassRef {
        Arc::new(Class { name: Some(name.into()), parent: None })
    }

    pub fn anonymous() -> ClassRef {
        Arc::new(Class { name: None, parent: None })
    }

    pub fn extends(name: impl Into<String>, parent: &ClassRef) -> ClassRef {
        Arc::new(Class { name: Some(name.into()), parent: Some(parent.clone()) })
    }

    pub fn name(&self) -> Option<&str> { self.name.as_deref() }
    pub fn parent(&self) -> Option<&ClassRef> { self.parent.as_ref() }

    pub fn is_subclass_of(&self, other: &ClassRef) -> bool {
        let mut cursor = Some(self);
        while let Some(class) = cursor {
            if std::ptr::eq(class, Arc::as_ptr(other)) {
                return true;
            }
            cursor = class.parent.as_deref();
        }
        false
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool { std::ptr::eq(self, other) }
}

impl Symbol {
    pub fn new(description: Option<String>) -> Self { Symbol(Arc::new(description)) }
    pub fn description(&self) -> Option<&str> { self.0.as_deref() }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.0, &other.0) }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            // every JSON number is representable as f64 (lossy for huge ints)
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(xs) => Value::Array(xs.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => Value::Object(Object {
                class: None,
                fields: map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            }),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self { Value::from(json.clone()) }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::String(s.to_string()) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Value::String(s) }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self { Value::Number(n) }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Symbol(sym) => write!(f, "Symbol({})", sym.description().unwrap_or("")),
            Value::Array(xs) => {
                f.write_str("[")?;
                for (i, x) in xs.iter().enumerate() {
                    if i > 0 { f.write_str(", ")?; }
                    write!(f, "{x}")?;
                }
                f.write_str("]")
            }
            Value::Object(obj) => {
                if let Some(name) = obj.class.as_ref().and_then(|c| c.name()) {
                    write!(f, "{name} ")?;
                }
                f.write_str("{")?;
                for (i, (k, v)) in obj.fields.iter().enumerate() {
                    if i > 0 { f.write_str(", ")?; }
                    write!(f, "{k:?}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_objects_keep_key_order_and_missing_fields_read_absent() {
        let v = Value::from(json!({"b": 1, "a": "x"}));
        let Value::Object(obj) = &v else { panic!("expected object") };
        let keys: Vec<_> = obj.fields.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(v.field("a"), &Value::String("x".into()));
        assert!(v.field("zzz").is_absent());
        assert!(Value::Number(3.0).field("a").is_absent());
    }

    #[test]
    fn array_fields_index_by_position() {
        let v = Value::from(json!([10, 20]));
        assert_eq!(v.field("1"), &Value::Number(20.0));
        assert!(v.field("2").is_absent());
        assert!(v.field("length").is_absent());
    }

    #[test]
    fn instance_of_follows_inheritance() {
        let animal = Class::new("Animal");
        let dog = Class::extends("Dog", &animal);
        let other = Class::new("Animal");

        let rex = Value::instance(&dog, IndexMap::new());
        assert!(rex.is_instance_of(&dog));
        assert!(rex.is_instance_of(&animal));
        // same name, different class
        assert!(!rex.is_instance_of(&other));
        assert!(!Value::from(json!({})).is_instance_of(&animal));
    }

    #[test]
    fn symbols_compare_by_identity() {
        let a = Symbol::new(Some("tag".into()));
        let b = Symbol::new(Some("tag".into()));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn kinds_and_display() {
        assert_eq!(Value::Absent.kind().as_str(), "undefined");
        assert_eq!(Value::from(json!([1])).kind(), ValueKind::Object);
        assert_eq!(Value::Absent.to_string(), "undefined");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(json!({"a": [1, "x"]})).to_string(), r#"{"a": [1, "x"]}"#);
    }
}
