//! Type model for tool parameters.
//!
//! [`TypeShape`] is what a tool author declares (ahead of time, no
//! reflection); [`TypeDescriptor`] is the resolved, JSON-Schema-shaped tree
//! the compiler produces from it.

use std::collections::{BTreeMap, HashMap};

use serde_json::{json, Map, Value};

// ─────────────────────────────────────────────
// Declared shapes
// ─────────────────────────────────────────────

/// A declared parameter type, before resolution.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeShape {
    String,
    Integer,
    Number,
    Boolean,
    Null,
    List(Box<TypeShape>),
    /// String-keyed map with uniform values.
    Map(Box<TypeShape>),
    Union(Vec<TypeShape>),
    Optional(Box<TypeShape>),
    /// A fixed set of allowed values.
    Literal(Vec<Value>),
    /// An opaque user type; rendered as a string.
    Named(String),
    Any,
}

impl TypeShape {
    /// Shape of a Rust type.
    ///
    /// ```
    /// use toolweave_agent::schema::TypeShape;
    ///
    /// assert_eq!(TypeShape::of::<Vec<i64>>(), TypeShape::List(Box::new(TypeShape::Integer)));
    /// ```
    pub fn of<T: Described + ?Sized>() -> TypeShape {
        T::shape()
    }

    pub fn list(item: TypeShape) -> Self {
        TypeShape::List(Box::new(item))
    }

    pub fn map(value: TypeShape) -> Self {
        TypeShape::Map(Box::new(value))
    }

    pub fn optional(inner: TypeShape) -> Self {
        TypeShape::Optional(Box::new(inner))
    }

    /// Literal over string values, the common case for mode switches.
    pub fn literal_str<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TypeShape::Literal(values.into_iter().map(|v| Value::String(v.into())).collect())
    }
}

/// Rust types that know their parameter shape.
pub trait Described {
    fn shape() -> TypeShape;
}

macro_rules! described {
    ($shape:expr => $($t:ty),+ $(,)?) => {
        $(impl Described for $t {
            fn shape() -> TypeShape {
                $shape
            }
        })+
    };
}

described!(TypeShape::String => String, str, char);
described!(TypeShape::Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
described!(TypeShape::Number => f32, f64);
described!(TypeShape::Boolean => bool);
described!(TypeShape::Null => ());
described!(TypeShape::Any => Value);

impl<T: Described + ?Sized> Described for &T {
    fn shape() -> TypeShape {
        T::shape()
    }
}

impl<T: Described> Described for Vec<T> {
    fn shape() -> TypeShape {
        TypeShape::list(T::shape())
    }
}

impl<T: Described> Described for [T] {
    fn shape() -> TypeShape {
        TypeShape::list(T::shape())
    }
}

impl<T: Described> Described for Option<T> {
    fn shape() -> TypeShape {
        TypeShape::optional(T::shape())
    }
}

impl<T: Described, S> Described for HashMap<String, T, S> {
    fn shape() -> TypeShape {
        TypeShape::map(T::shape())
    }
}

impl<T: Described> Described for BTreeMap<String, T> {
    fn shape() -> TypeShape {
        TypeShape::map(T::shape())
    }
}

// ─────────────────────────────────────────────
// Resolved descriptors
// ─────────────────────────────────────────────

/// JSON-Schema primitive kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Integer,
    Number,
    Boolean,
    Null,
}

impl PrimitiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Null => "null",
        }
    }

    /// Parse a JSON-Schema `type` name. Container kinds return `None`.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(PrimitiveKind::String),
            "integer" => Some(PrimitiveKind::Integer),
            "number" => Some(PrimitiveKind::Number),
            "boolean" => Some(PrimitiveKind::Boolean),
            "null" => Some(PrimitiveKind::Null),
            _ => None,
        }
    }

    /// Kind of a literal JSON value. Arrays and objects have none.
    pub fn of_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(_) => Some(PrimitiveKind::String),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(PrimitiveKind::Integer),
            Value::Number(_) => Some(PrimitiveKind::Number),
            Value::Bool(_) => Some(PrimitiveKind::Boolean),
            Value::Null => Some(PrimitiveKind::Null),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

/// Resolved parameter type.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeDescriptor {
    Primitive(PrimitiveKind),
    Array(Box<TypeDescriptor>),
    /// Uniform string-keyed map.
    Object(Box<TypeDescriptor>),
    Union(Vec<TypeDescriptor>),
    Enumerated {
        base: PrimitiveKind,
        values: Vec<Value>,
    },
}

impl TypeDescriptor {
    pub fn string() -> Self {
        TypeDescriptor::Primitive(PrimitiveKind::String)
    }

    pub fn null() -> Self {
        TypeDescriptor::Primitive(PrimitiveKind::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TypeDescriptor::Primitive(PrimitiveKind::Null))
    }

    /// JSON-Schema fragment for this descriptor.
    pub fn to_schema(&self) -> Map<String, Value> {
        let mut out = Map::new();
        match self {
            TypeDescriptor::Primitive(kind) => {
                out.insert("type".into(), json!(kind.as_str()));
            }
            TypeDescriptor::Array(item) => {
                out.insert("type".into(), json!("array"));
                out.insert("items".into(), Value::Object(item.to_schema()));
            }
            TypeDescriptor::Object(value) => {
                out.insert("type".into(), json!("object"));
                out.insert(
                    "additionalProperties".into(),
                    Value::Object(value.to_schema()),
                );
            }
            TypeDescriptor::Union(alternatives) => {
                let any_of = alternatives
                    .iter()
                    .map(|alt| Value::Object(alt.to_schema()))
                    .collect();
                out.insert("anyOf".into(), Value::Array(any_of));
            }
            TypeDescriptor::Enumerated { base, values } => {
                out.insert("type".into(), json!(base.as_str()));
                out.insert("enum".into(), Value::Array(values.clone()));
            }
        }
        out
    }
}

// ─────────────────────────────────────────────
// Parameter schema
// ─────────────────────────────────────────────

/// One compiled parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSchema {
    pub name: String,
    pub descriptor: TypeDescriptor,
    pub nullable: bool,
    pub description: String,
    pub default: Option<Value>,
}

impl ParameterSchema {
    /// Property schema: type keywords, then `description`, then `default`.
    pub fn to_json(&self) -> Value {
        let mut schema = self.descriptor.to_schema();

        if self.nullable {
            if let Some(Value::String(kind)) = schema.get("type").cloned() {
                if kind != "null" {
                    schema.insert("type".into(), json!([kind, "null"]));
                }
            } else if let Some(Value::Array(any_of)) = schema.get_mut("anyOf") {
                let has_null = any_of
                    .iter()
                    .any(|alt| alt.get("type") == Some(&json!("null")));
                if !has_null {
                    any_of.push(json!({ "type": "null" }));
                }
            }
        }

        schema.insert("description".into(), json!(self.description));
        if let Some(ref default) = self.default {
            schema.insert("default".into(), default.clone());
        }
        Value::Object(schema)
    }
}
