//! Runtime type descriptors and a validator that walks them.
//!
//! Describe a shape (primitive kind, class membership, structural object,
//! union, or a named type), then ask whether a [`Value`] conforms. Failures
//! come back as data, with the path of the offending field and a message
//! prefixed by the named types it passed through.
//!
//! ```
//! use shapecheck::{Descriptor, NamedType, Shape, Value};
//!
//! let user = NamedType::new(
//!     "User",
//!     Shape::new().field("name", Descriptor::STRING).field("age", Descriptor::NUMBER),
//! );
//! let result = user.validate(&Value::from(serde_json::json!({"name": "Alice"})));
//! assert_eq!(result.field_path, ["age"]);
//! assert_eq!(result.message.as_deref(), Some("User: Field \"age\" is not of type \"number\""));
//! ```
pub mod builder;
pub mod descriptor;
pub mod doc;
pub mod error;
pub mod name;
pub mod named;
pub mod path_de;
pub mod validate;
pub mod value;


pub use builder::{partial, union};
pub use descriptor::{Descriptor, DescriptorKind, PrimitiveKind, Shape};
pub use doc::{descriptor_from_json, descriptor_from_str, DescriptorDoc, Schema};
pub use error::DescriptorError;
pub use name::type_name;
pub use named::{is_named_type_instance, NamedType, NamedTypeBuilder};
pub use validate::{validate, validate_at, ValidationResult, Validator, Verbosity};
pub use value::{Class, ClassRef, Object, Symbol, Value, ValueKind};
