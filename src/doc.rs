//! Descriptor documents: descriptors written down as JSON data.
//!
//! Every node carries an explicit `kind` tag:
//!
//! ```json
//! {
//!   "types": {
//!     "Address": { "kind": "object", "fields": { "zip": { "kind": "number" } } },
//!     "User": {
//!       "kind": "object",
//!       "fields": {
//!         "name": { "kind": "string" },
//!         "address": { "kind": "partial", "of": { "kind": "ref", "name": "Address" } },
//!         "nick": { "kind": "union", "types": [{ "kind": "string" }, { "kind": "undefined" }] }
//!       }
//!     }
//!   },
//!   "root": "User"
//! }
//! ```
//!
//! A plain map without a recognised `kind` is unclassifiable and rejected
//! with [`DescriptorError::Unclassifiable`], and so is a node carrying a key
//! its kind does not define or an object repeating a field name. A `ref` sees only the types
//! declared before it, so documents cannot describe cyclic types. Classes
//! have no document form.
use std::fmt;
use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use crate::builder::{partial, union};
use crate::descriptor::{Descriptor, Shape};
use crate::error::DescriptorError;
use crate::named::NamedType;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", deny_unknown_fields)]
pub enum DescriptorDoc {
    #[serde(alias = "absent")]
    Undefined,
    Null,
    String,
    Number,
    Boolean,
    Symbol,
    Object {
        #[serde(default, deserialize_with = "unique_fields")]
        fields: IndexMap<String, DescriptorDoc>,
    },
    Union {
        #[serde(default)]
        types: Vec<DescriptorDoc>,
    },
    Partial {
        of: Box<DescriptorDoc>,
    },
    Ref {
        name: String,
    },
    /// Inline named type. Both parts are required; a missing one is an
    /// arity error rather than a parse error.
    Named {
        name: Option<String>,
        #[serde(rename = "type")]
        ty: Option<Box<DescriptorDoc>>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaDoc {
    /// Kept as written, repeats included, so a redeclared name can be reported.
    #[serde(default, deserialize_with = "entries")]
    types: Vec<(String, DescriptorDoc)>,
    root: Option<String>,
}

/// Named types declared by a schema document, in declaration order.
#[derive(Debug, Clone)]
pub struct Schema {
    types: IndexMap<String, NamedType>,
    root: Option<NamedType>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl DescriptorDoc {
    /// Build the descriptor, resolving `ref`s against `scope`.
    pub fn resolve(self, scope: &IndexMap<String, NamedType>) -> Result<Descriptor, DescriptorError> {
        let descriptor = match self {
            DescriptorDoc::Undefined => Descriptor::Absent,
            DescriptorDoc::Null => Descriptor::Null,
            DescriptorDoc::String => Descriptor::STRING,
            DescriptorDoc::Number => Descriptor::NUMBER,
            DescriptorDoc::Boolean => Descriptor::BOOLEAN,
            DescriptorDoc::Symbol => Descriptor::SYMBOL,
            DescriptorDoc::Object { fields } => {
                let shape = fields
                    .into_iter()
                    .map(|(field, doc)| -> Result<(String, Descriptor), DescriptorError> {
                        Ok((field, doc.resolve(scope)?))
                    })
                    .collect::<Result<Shape, _>>()?;
                Descriptor::Object(shape)
            }
            DescriptorDoc::Union { types } => {
                let alternatives = types
                    .into_iter()
                    .map(|doc| doc.resolve(scope))
                    .collect::<Result<Vec<_>, _>>()?;
                union(alternatives)
            }
            DescriptorDoc::Partial { of } => partial(&of.resolve(scope)?)?,
            DescriptorDoc::Ref { name } => match scope.get(&name) {
                Some(handle) => Descriptor::Named(handle.clone()),
                None => return Err(DescriptorError::UnknownReference { name }),
            },
            DescriptorDoc::Named { name, ty } => {
                let mut builder = NamedType::builder();
                if let Some(name) = name {
                    builder = builder.name(name);
                }
                if let Some(ty) = ty {
                    builder = builder.descriptor(ty.resolve(scope)?);
                }
                Descriptor::Named(builder.build()?)
            }
        };
        Ok(descriptor)
    }
}

/// Parse a standalone descriptor. `ref` nodes have nothing to refer to.
pub fn descriptor_from_str(src: &str) -> Result<Descriptor, DescriptorError> {
    let doc: DescriptorDoc = crate::path_de::from_str_with_path(src)?;
    doc.resolve(&IndexMap::new())
}

pub fn descriptor_from_json(value: serde_json::Value) -> Result<Descriptor, DescriptorError> {
    let doc: DescriptorDoc = crate::path_de::from_value_with_path(value)?;
    doc.resolve(&IndexMap::new())
}

impl std::str::FromStr for Schema {
    type Err = DescriptorError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Self::from_doc(crate::path_de::from_str_with_path(src)?)
    }
}

impl Schema {
    pub fn from_json(value: serde_json::Value) -> Result<Self, DescriptorError> {
        Self::from_doc(crate::path_de::from_value_with_path(value)?)
    }

    fn from_doc(doc: SchemaDoc) -> Result<Self, DescriptorError> {
        let mut types = IndexMap::with_capacity(doc.types.len());
        for (name, body) in doc.types {
            if types.contains_key(&name) {
                return Err(DescriptorError::DuplicateType { name });
            }
            let descriptor = body.resolve(&types)?;
            tracing::trace!(named_type = %name, kind = descriptor.kind().as_str(), "resolved schema type");
            let handle = NamedType::new(name.clone(), descriptor);
            types.insert(name, handle);
        }
        let root = match doc.root {
            Some(name) => match types.get(&name) {
                Some(handle) => Some(handle.clone()),
                None => return Err(DescriptorError::UnknownRoot { name }),
            },
            None => None,
        };
        Ok(Schema { types, root })
    }

    pub fn get(&self, name: &str) -> Option<&NamedType> { self.types.get(name) }

    /// The declared root, or the last declared type when there is none.
    pub fn root(&self) -> Option<&NamedType> {
        self.root.as_ref().or_else(|| self.types.values().last())
    }

    pub fn types(&self) -> impl Iterator<Item = &NamedType> { self.types.values() }

    pub fn len(&self) -> usize { self.types.len() }
    pub fn is_empty(&self) -> bool { self.types.is_empty() }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Every entry of a JSON object in document order. Unlike a map type this
/// does not collapse repeated keys.
fn entries<'de, D>(deserializer: D) -> Result<Vec<(String, DescriptorDoc)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Entries;

    impl<'de> Visitor<'de> for Entries {
        type Value = Vec<(String, DescriptorDoc)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of names to descriptors")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, DescriptorDoc>()? {
                out.push(entry);
            }
            Ok(out)
        }
    }

    deserializer.deserialize_map(Entries)
}

fn unique_fields<'de, D>(deserializer: D) -> Result<IndexMap<String, DescriptorDoc>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut fields = IndexMap::new();
    for (name, doc) in entries(deserializer)? {
        if fields.contains_key(&name) {
            return Err(de::Error::custom(format_args!("duplicate field `{name}`")));
        }
        fields.insert(name, doc);
    }
    Ok(fields)
}

// ------------------------------- Tests ------------------------------------ //
