//! Type descriptors and their classification.
//!
//! A [`Descriptor`] is a closed sum type with one variant per kind of shape.
//! Classification is the variant tag: [`Descriptor::kind`] and the `is_*`
//! predicates answer "what is this" with exactly one `true` per descriptor.
use indexmap::IndexMap;
use crate::named::NamedType;
use crate::value::ClassRef;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    Absent,                  // only the "not supplied" value
    Null,                    // exactly null
    Primitive(PrimitiveKind),
    Class(ClassRef),         // nominal, through inheritance
    Object(Shape),           // open structural check
    Union(Vec<Descriptor>),  // any alternative
    Named(NamedType),        // non-owning reference to a handle
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    Symbol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    Absent,
    Null,
    String,
    Number,
    Boolean,
    Symbol,
    Class,
    ObjectShape,
    Union,
    Named,
}

/// Field name → descriptor, iterated in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    fields: IndexMap<String, Descriptor>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Descriptor {
    pub const STRING: Descriptor = Descriptor::Primitive(PrimitiveKind::String);
    pub const NUMBER: Descriptor = Descriptor::Primitive(PrimitiveKind::Number);
    pub const BOOLEAN: Descriptor = Descriptor::Primitive(PrimitiveKind::Boolean);
    pub const SYMBOL: Descriptor = Descriptor::Primitive(PrimitiveKind::Symbol);

    pub fn kind(&self) -> DescriptorKind {
        match self {
            Descriptor::Absent => DescriptorKind::Absent,
            Descriptor::Null => DescriptorKind::Null,
            Descriptor::Primitive(PrimitiveKind::String) => DescriptorKind::String,
            Descriptor::Primitive(PrimitiveKind::Number) => DescriptorKind::Number,
            Descriptor::Primitive(PrimitiveKind::Boolean) => DescriptorKind::Boolean,
            Descriptor::Primitive(PrimitiveKind::Symbol) => DescriptorKind::Symbol,
            Descriptor::Class(_) => DescriptorKind::Class,
            Descriptor::Object(_) => DescriptorKind::ObjectShape,
            Descriptor::Union(_) => DescriptorKind::Union,
            Descriptor::Named(_) => DescriptorKind::Named,
        }
    }

    pub fn is_absent(&self) -> bool { self.kind() == DescriptorKind::Absent }
    pub fn is_null(&self) -> bool { self.kind() == DescriptorKind::Null }
    pub fn is_string(&self) -> bool { self.kind() == DescriptorKind::String }
    pub fn is_number(&self) -> bool { self.kind() == DescriptorKind::Number }
    pub fn is_boolean(&self) -> bool { self.kind() == DescriptorKind::Boolean }
    pub fn is_symbol(&self) -> bool { self.kind() == DescriptorKind::Symbol }
    pub fn is_class(&self) -> bool { self.kind() == DescriptorKind::Class }
    pub fn is_object_shape(&self) -> bool { self.kind() == DescriptorKind::ObjectShape }
    pub fn is_union(&self) -> bool { self.kind() == DescriptorKind::Union }
    pub fn is_named(&self) -> bool { self.kind() == DescriptorKind::Named }

    pub fn as_named(&self) -> Option<&NamedType> {
        match self {
            Descriptor::Named(handle) => Some(handle),
            _ => None,
        }
    }
}

impl DescriptorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DescriptorKind::Absent => "undefined",
            DescriptorKind::Null => "null",
            DescriptorKind::String => "string",
            DescriptorKind::Number => "number",
            DescriptorKind::Boolean => "boolean",
            DescriptorKind::Symbol => "symbol",
            DescriptorKind::Class => "class",
            DescriptorKind::ObjectShape => "object",
            DescriptorKind::Union => "union",
            DescriptorKind::Named => "named",
        }
    }
}

impl PrimitiveKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Symbol => "symbol",
        }
    }
}

impl Shape {
    pub fn new() -> Self { Self::default() }

    /// Builder-style field declaration. Redeclaring a name keeps its original
    /// position and replaces the descriptor.
    pub fn field(mut self, name: impl Into<String>, descriptor: impl Into<Descriptor>) -> Self {
        self.fields.insert(name.into(), descriptor.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Descriptor> { self.fields.get(name) }
    pub fn len(&self) -> usize { self.fields.len() }
    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Descriptor)> {
        self.fields.iter().map(|(k, d)| (k.as_str(), d))
    }
}

impl<K: Into<String>> FromIterator<(K, Descriptor)> for Shape {
    fn from_iter<I: IntoIterator<Item = (K, Descriptor)>>(iter: I) -> Self {
        Shape { fields: iter.into_iter().map(|(k, d)| (k.into(), d)).collect() }
    }
}

impl From<PrimitiveKind> for Descriptor {
    fn from(kind: PrimitiveKind) -> Self { Descriptor::Primitive(kind) }
}

impl From<ClassRef> for Descriptor {
    fn from(class: ClassRef) -> Self { Descriptor::Class(class) }
}

impl From<&ClassRef> for Descriptor {
    fn from(class: &ClassRef) -> Self { Descriptor::Class(class.clone()) }
}

impl From<Shape> for Descriptor {
    fn from(shape: Shape) -> Self { Descriptor::Object(shape) }
}

impl From<NamedType> for Descriptor {
    fn from(handle: NamedType) -> Self { Descriptor::Named(handle) }
}

impl From<&NamedType> for Descriptor {
    fn from(handle: &NamedType) -> Self { Descriptor::Named(handle.clone()) }
}

// ------------------------------- Tests ------------------------------------ //
