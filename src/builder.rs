//! Convenience constructors: unions and partial types.
use crate::descriptor::{Descriptor, Shape};
use crate::error::DescriptorError;
use crate::named::NamedType;

/// Union of the given alternatives, in order. Nested unions are kept as-is.
pub fn union<I>(alternatives: I) -> Descriptor
where
    I: IntoIterator<Item = Descriptor>,
{
    Descriptor::Union(alternatives.into_iter().collect())
}

impl Descriptor {
    pub fn union<I>(alternatives: I) -> Descriptor
    where
        I: IntoIterator<Item = Descriptor>,
    {
        union(alternatives)
    }
}

/// Make a descriptor additionally accept `undefined`.
///
/// - union: `undefined` is appended as one more alternative
/// - object shape: every field becomes `(field | undefined)`, one level deep
/// - named type: a new handle with the same name wrapping the partial inner type
///
/// Leaves (primitives, null, undefined, classes) have nothing to make optional.
pub fn partial(descriptor: &Descriptor) -> Result<Descriptor, DescriptorError> {
    match descriptor {
        Descriptor::Absent
        | Descriptor::Null
        | Descriptor::Primitive(_)
        | Descriptor::Class(_) => Err(DescriptorError::NotPartializable {
            kind: descriptor.kind().as_str(),
        }),
        Descriptor::Union(alternatives) => {
            let mut alternatives = alternatives.clone();
            alternatives.push(Descriptor::Absent);
            Ok(Descriptor::Union(alternatives))
        }
        Descriptor::Object(shape) => Ok(Descriptor::Object(partial_shape(shape))),
        Descriptor::Named(handle) => Ok(Descriptor::Named(handle.partial()?)),
    }
}

fn partial_shape(shape: &Shape) -> Shape {
    shape
        .iter()
        .map(|(field, d)| (field, union([d.clone(), Descriptor::Absent])))
        .collect()
}

impl NamedType {
    /// Shorthand for `NamedType::new(name, union(alternatives))`.
    pub fn union_of<I>(name: impl Into<String>, alternatives: I) -> NamedType
    where
        I: IntoIterator<Item = Descriptor>,
    {
        NamedType::new(name, union(alternatives))
    }
}
