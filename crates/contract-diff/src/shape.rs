//! Structural shapes — the comparable form of a spec's input/output schema.
//!
//! A shape records only what matters for compatibility: the type tag of each
//! position, whether it accepts null, which object fields exist and whether
//! they are required, the element shape of arrays, and the allowed values of
//! enums. Shapes are never used to validate runtime data.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The type tag at one position of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    String,
    Number,
    Integer,
    Boolean,
    Null,
    Object,
    Array,
    Enum,
    /// Anything; the schema placed no constraint here.
    Unknown,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeTag::String => "string",
            TypeTag::Number => "number",
            TypeTag::Integer => "integer",
            TypeTag::Boolean => "boolean",
            TypeTag::Null => "null",
            TypeTag::Object => "object",
            TypeTag::Array => "array",
            TypeTag::Enum => "enum",
            TypeTag::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A recursive structural description of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralShape {
    #[serde(rename = "type")]
    pub type_tag: TypeTag,
    #[serde(default, skip_serializing_if = "is_false")]
    pub nullable: bool,
    /// Object fields by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldShape>,
    /// Array element shape; `None` means elements are unconstrained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<StructuralShape>>,
    /// Allowed enum values, sorted and de-duplicated.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

/// One named field of an object shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldShape {
    pub required: bool,
    pub shape: StructuralShape,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl StructuralShape {
    /// A shape with only a type tag.
    pub fn scalar(type_tag: TypeTag) -> Self {
        Self {
            type_tag,
            nullable: false,
            fields: BTreeMap::new(),
            items: None,
            values: Vec::new(),
        }
    }

    pub fn unknown() -> Self {
        Self::scalar(TypeTag::Unknown)
    }

    /// An object shape with no fields yet.
    pub fn object() -> Self {
        Self::scalar(TypeTag::Object)
    }

    /// An array shape with the given element shape.
    pub fn array(items: StructuralShape) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::scalar(TypeTag::Array)
        }
    }

    /// An enum shape over the given values.
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values: Vec<String> = values.into_iter().map(Into::into).collect();
        values.sort();
        values.dedup();
        Self {
            values,
            ..Self::scalar(TypeTag::Enum)
        }
    }

    /// Builder: add a field.
    pub fn field(mut self, name: impl Into<String>, required: bool, shape: StructuralShape) -> Self {
        self.fields.insert(name.into(), FieldShape { required, shape });
        self
    }

    /// Builder: add a required field.
    pub fn required(self, name: impl Into<String>, shape: StructuralShape) -> Self {
        self.field(name, true, shape)
    }

    /// Builder: add an optional field.
    pub fn optional(self, name: impl Into<String>, shape: StructuralShape) -> Self {
        self.field(name, false, shape)
    }

    /// Builder: accept null at this position.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Number of positions in this shape, itself included.
    pub fn size(&self) -> usize {
        1 + self.fields.values().map(|f| f.shape.size()).sum::<usize>()
            + self.items.as_ref().map_or(0, |i| i.size())
    }
}
