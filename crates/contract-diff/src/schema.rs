//! Conversion from declared JSON-Schema-style definitions to structural shapes.
//!
//! Understands the subset emitted for spec IO declarations: `type` (a name or
//! an array of names), `properties`, `required`, `items`, `enum`, `nullable`,
//! and the `anyOf`/`oneOf` "X or null" pattern. `true` and `{}` mean
//! unconstrained.

use serde_json::{Map, Value};

use crate::error::SnapshotError;
use crate::shape::{StructuralShape, TypeTag};

/// Convert a schema value into a [`StructuralShape`].
pub fn shape_from_schema(schema: &Value) -> Result<StructuralShape, SnapshotError> {
    convert(schema, "$")
}

fn invalid(path: &str, detail: impl Into<String>) -> SnapshotError {
    SnapshotError::InvalidSchema {
        path: path.to_string(),
        detail: detail.into(),
    }
}

fn convert(schema: &Value, path: &str) -> Result<StructuralShape, SnapshotError> {
    match schema {
        Value::Bool(_) => Ok(StructuralShape::unknown()),
        Value::Object(map) => convert_object(map, path),
        other => Err(invalid(
            path,
            format!("expected a schema object or boolean, found {other}"),
        )),
    }
}

fn convert_object(map: &Map<String, Value>, path: &str) -> Result<StructuralShape, SnapshotError> {
    let explicit_nullable = map.get("nullable").and_then(Value::as_bool).unwrap_or(false);

    if let Some(values) = map.get("enum") {
        let mut shape = convert_enum(values, path)?;
        shape.nullable |= explicit_nullable;
        return Ok(shape);
    }

    if let Some(branches) = map.get("anyOf").or_else(|| map.get("oneOf")) {
        let mut shape = convert_union(branches, path)?;
        shape.nullable |= explicit_nullable;
        return Ok(shape);
    }

    let (type_tag, type_nullable) = match map.get("type") {
        Some(t) => parse_type(t, path)?,
        None if map.contains_key("properties") => (TypeTag::Object, false),
        None if map.contains_key("items") => (TypeTag::Array, false),
        None => (TypeTag::Unknown, false),
    };

    let mut shape = StructuralShape::scalar(type_tag);
    shape.nullable = explicit_nullable || type_nullable;

    match type_tag {
        TypeTag::Object => {
            let required = required_names(map, path)?;
            if let Some(props) = map.get("properties") {
                let props = props
                    .as_object()
                    .ok_or_else(|| invalid(path, "`properties` must be an object"))?;
                for (name, prop) in props {
                    let child = convert(prop, &format!("{path}.{name}"))?;
                    shape = shape.field(name.clone(), required.contains(&name.as_str()), child);
                }
            }
        }
        TypeTag::Array => {
            if let Some(items) = map.get("items") {
                if items.is_array() {
                    return Err(invalid(path, "tuple-style `items` arrays are not supported"));
                }
                shape.items = Some(Box::new(convert(items, &format!("{path}[]"))?));
            }
        }
        _ => {}
    }

    Ok(shape)
}

fn parse_type(value: &Value, path: &str) -> Result<(TypeTag, bool), SnapshotError> {
    match value {
        Value::String(name) => Ok((type_tag_from_name(name, path)?, false)),
        Value::Array(names) => {
            let mut nullable = false;
            let mut tags = Vec::new();
            for name in names {
                let name = name
                    .as_str()
                    .ok_or_else(|| invalid(path, "`type` array entries must be strings"))?;
                match type_tag_from_name(name, path)? {
                    TypeTag::Null => nullable = true,
                    tag => tags.push(tag),
                }
            }
            match tags.as_slice() {
                [] => Ok((TypeTag::Null, false)),
                [single] => Ok((*single, nullable)),
                _ => Ok((TypeTag::Unknown, nullable)),
            }
        }
        _ => Err(invalid(path, "`type` must be a string or an array of strings")),
    }
}

fn type_tag_from_name(name: &str, path: &str) -> Result<TypeTag, SnapshotError> {
    match name {
        "string" => Ok(TypeTag::String),
        "number" => Ok(TypeTag::Number),
        "integer" => Ok(TypeTag::Integer),
        "boolean" => Ok(TypeTag::Boolean),
        "null" => Ok(TypeTag::Null),
        "object" => Ok(TypeTag::Object),
        "array" => Ok(TypeTag::Array),
        other => Err(invalid(path, format!("unsupported type '{other}'"))),
    }
}

fn required_names<'a>(map: &'a Map<String, Value>, path: &str) -> Result<Vec<&'a str>, SnapshotError> {
    match map.get("required") {
        None => Ok(Vec::new()),
        Some(Value::Array(names)) => names
            .iter()
            .map(|n| {
                n.as_str()
                    .ok_or_else(|| invalid(path, "`required` entries must be strings"))
            })
            .collect(),
        Some(_) => Err(invalid(path, "`required` must be an array")),
    }
}

fn convert_enum(values: &Value, path: &str) -> Result<StructuralShape, SnapshotError> {
    let values = values
        .as_array()
        .ok_or_else(|| invalid(path, "`enum` must be an array"))?;

    let mut nullable = false;
    let mut names = Vec::new();
    for value in values {
        match value {
            Value::Null => nullable = true,
            Value::String(s) => names.push(s.clone()),
            other => names.push(other.to_string()),
        }
    }

    let mut shape = StructuralShape::enumeration(names);
    shape.nullable = nullable;
    Ok(shape)
}

/// `anyOf: [X, {"type": "null"}]` is X made nullable; any other union is
/// treated as unconstrained.
fn convert_union(branches: &Value, path: &str) -> Result<StructuralShape, SnapshotError> {
    let branches = branches
        .as_array()
        .ok_or_else(|| invalid(path, "`anyOf`/`oneOf` must be an array"))?;

    let mut nullable = false;
    let mut rest = Vec::new();
    for branch in branches {
        let shape = convert(branch, path)?;
        if shape.type_tag == TypeTag::Null {
            nullable = true;
        } else {
            rest.push(shape);
        }
    }

    let mut shape = match rest.len() {
        1 => rest.remove(0),
        0 => StructuralShape::scalar(TypeTag::Null),
        _ => StructuralShape::unknown(),
    };
    shape.nullable |= nullable;
    Ok(shape)
}
