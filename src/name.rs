//! Human-readable names for descriptors.
use std::fmt;
use crate::descriptor::Descriptor;
use crate::value::ClassRef;

/// Render a descriptor the way messages and `Display` show it.
///
/// Object shapes stay `[Interface]` regardless of their fields; unions
/// recurse into every alternative.
pub fn type_name(descriptor: &Descriptor) -> String {
    match descriptor {
        Descriptor::Absent => "undefined".to_string(),
        Descriptor::Null => "null".to_string(),
        Descriptor::Primitive(kind) => kind.as_str().to_string(),
        Descriptor::Class(class) => class_name(class),
        Descriptor::Object(_) => "[Interface]".to_string(),
        Descriptor::Union(alternatives) => {
            let names: Vec<String> = alternatives.iter().map(type_name).collect();
            format!("({})", names.join(" | "))
        }
        Descriptor::Named(handle) => handle.to_string(),
    }
}

pub fn class_name(class: &ClassRef) -> String {
    match class.name() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "[Function]".to_string(),
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&type_name(self))
    }
}
