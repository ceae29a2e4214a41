//! Declared signature → JSON-Schema tool descriptor.
//!
//! Compilation is pure and never fails: shapes that cannot be expressed
//! degrade to `string` and are logged at debug level.

use std::collections::HashMap;

use serde_json::{json, Map, Value};
use tracing::debug;

use toolweave_core::types::ToolDefinition;

use super::docstring::DocBlock;
use super::types::{Described, ParameterSchema, PrimitiveKind, TypeDescriptor, TypeShape};

// ─────────────────────────────────────────────
// Declared signature
// ─────────────────────────────────────────────

/// One declared parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub shape: TypeShape,
    pub default: Option<Value>,
}

impl Param {
    pub fn required(name: impl Into<String>, shape: TypeShape) -> Self {
        Param {
            name: name.into(),
            shape,
            default: None,
        }
    }

    pub fn with_default(name: impl Into<String>, shape: TypeShape, default: impl Into<Value>) -> Self {
        Param {
            name: name.into(),
            shape,
            default: Some(default.into()),
        }
    }

    /// Required parameter whose shape comes from a Rust type.
    pub fn of<T: Described + ?Sized>(name: impl Into<String>) -> Self {
        Param::required(name, TypeShape::of::<T>())
    }
}

/// Everything the compiler needs to know about a tool.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToolSignature {
    pub name: String,
    /// Documentation block; supplies the tool and parameter descriptions.
    pub doc: String,
    pub params: Vec<Param>,
}

impl ToolSignature {
    pub fn new(name: impl Into<String>, doc: impl Into<String>) -> Self {
        ToolSignature {
            name: name.into(),
            doc: doc.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }
}

// ─────────────────────────────────────────────
// Compiled schema
// ─────────────────────────────────────────────

/// Compilation switches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchemaOptions {
    /// Every parameter required, no extra properties, `strict: true`.
    pub strict: bool,
}

/// Compiled tool descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledSchema {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSchema>,
    pub required: Vec<String>,
    pub strict: bool,
}

impl CompiledSchema {
    /// The `parameters` object of a native function descriptor.
    pub fn parameters_json(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.to_json()))
            .collect();

        let mut schema = json!({
            "type": "object",
            "properties": properties,
            "required": self.required,
        });
        if self.strict {
            schema["additionalProperties"] = json!(false);
        }
        schema
    }

    pub fn to_definition(&self) -> ToolDefinition {
        ToolDefinition::new(&self.name, &self.description, self.parameters_json())
            .with_strict(self.strict)
    }

    /// Declared defaults, used to fill arguments the model leaves out.
    pub fn defaults(&self) -> HashMap<String, Value> {
        self.parameters
            .iter()
            .filter_map(|p| p.default.clone().map(|d| (p.name.clone(), d)))
            .collect()
    }
}

// ─────────────────────────────────────────────
// Compiler
// ─────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default)]
pub struct SchemaCompiler {
    options: SchemaOptions,
}

impl SchemaCompiler {
    pub fn new(options: SchemaOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> SchemaOptions {
        self.options
    }

    pub fn compile(&self, signature: &ToolSignature) -> CompiledSchema {
        let doc = DocBlock::parse(&signature.doc);

        let parameters: Vec<ParameterSchema> = signature
            .params
            .iter()
            .map(|param| ParameterSchema {
                name: param.name.clone(),
                descriptor: self.resolve(&param.shape),
                nullable: param.default.is_some(),
                description: doc.param(&param.name).to_string(),
                default: param.default.clone(),
            })
            .collect();

        let required = signature
            .params
            .iter()
            .filter(|p| self.options.strict || p.default.is_none())
            .map(|p| p.name.clone())
            .collect();

        debug!(
            tool = %signature.name,
            params = parameters.len(),
            strict = self.options.strict,
            "compiled tool schema"
        );

        CompiledSchema {
            name: signature.name.clone(),
            description: doc.summary,
            parameters,
            required,
            strict: self.options.strict,
        }
    }

    /// Resolve a declared shape to a descriptor.
    pub fn resolve(&self, shape: &TypeShape) -> TypeDescriptor {
        match shape {
            TypeShape::String => TypeDescriptor::Primitive(PrimitiveKind::String),
            TypeShape::Integer => TypeDescriptor::Primitive(PrimitiveKind::Integer),
            TypeShape::Number => TypeDescriptor::Primitive(PrimitiveKind::Number),
            TypeShape::Boolean => TypeDescriptor::Primitive(PrimitiveKind::Boolean),
            TypeShape::Null => TypeDescriptor::null(),
            TypeShape::List(item) => TypeDescriptor::Array(Box::new(self.resolve(item))),
            TypeShape::Map(value) => TypeDescriptor::Object(Box::new(self.resolve(value))),
            TypeShape::Optional(inner) => {
                self.resolve_union(&[(**inner).clone(), TypeShape::Null])
            }
            TypeShape::Union(alternatives) => self.resolve_union(alternatives),
            TypeShape::Literal(values) => resolve_literal(values),
            TypeShape::Named(name) => {
                debug!(type_name = %name, "opaque parameter type rendered as string");
                TypeDescriptor::string()
            }
            TypeShape::Any => TypeDescriptor::string(),
        }
    }

    fn resolve_union(&self, alternatives: &[TypeShape]) -> TypeDescriptor {
        if alternatives.is_empty() {
            debug!("empty union rendered as string");
            return TypeDescriptor::string();
        }

        let mut flat: Vec<TypeDescriptor> = Vec::new();
        for alt in alternatives {
            match self.resolve(alt) {
                TypeDescriptor::Union(nested) => {
                    for d in nested {
                        push_unique(&mut flat, d);
                    }
                }
                d => push_unique(&mut flat, d),
            }
        }
        TypeDescriptor::Union(flat)
    }
}

fn push_unique(into: &mut Vec<TypeDescriptor>, d: TypeDescriptor) {
    if !into.contains(&d) {
        into.push(d);
    }
}

fn resolve_literal(values: &[Value]) -> TypeDescriptor {
    let Some(first) = values.first() else {
        debug!("empty literal rendered as string");
        return TypeDescriptor::string();
    };
    match PrimitiveKind::of_value(first) {
        Some(base) => TypeDescriptor::Enumerated {
            base,
            values: values.to_vec(),
        },
        None => {
            debug!("literal of containers rendered as string");
            TypeDescriptor::string()
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn add_signature() -> ToolSignature {
        ToolSignature::new(
            "add",
            "Add two integers.\n\nArgs:\n    a (int): first addend\n    b (int): second addend\n",
        )
        .param(Param::of::<i64>("a"))
        .param(Param::of::<i64>("b"))
    }

    #[test]
    fn compiles_add() {
        let compiled = SchemaCompiler::default().compile(&add_signature());
        assert_eq!(compiled.name, "add");
        assert_eq!(compiled.description, "Add two integers.");
        assert_eq!(compiled.required, vec!["a", "b"]);

        let params = compiled.parameters_json();
        assert_eq!(
            params,
            json!({
                "type": "object",
                "properties": {
                    "a": { "type": "integer", "description": "first addend" },
                    "b": { "type": "integer", "description": "second addend" }
                },
                "required": ["a", "b"]
            })
        );
        assert!(compiled.to_definition().function.strict.is_none());
    }

    #[test]
    fn compilation_is_deterministic() {
        let compiler = SchemaCompiler::default();
        let sig = add_signature();
        assert_eq!(compiler.compile(&sig), compiler.compile(&sig));
        assert_eq!(
            serde_json::to_string(&compiler.compile(&sig).to_definition()).unwrap(),
            serde_json::to_string(&compiler.compile(&sig).to_definition()).unwrap()
        );
    }

    #[test]
    fn default_makes_param_optional_and_nullable() {
        let sig = ToolSignature::new("search", "Search.\nArgs:\n    query: text\n    limit: max hits")
            .param(Param::of::<String>("query"))
            .param(Param::with_default("limit", TypeShape::Integer, 10));
        let compiled = SchemaCompiler::default().compile(&sig);

        assert_eq!(compiled.required, vec!["query"]);
        let limit = &compiled.parameters_json()["properties"]["limit"];
        assert_eq!(limit["type"], json!(["integer", "null"]));
        assert_eq!(limit["default"], 10);
        assert_eq!(limit["description"], "max hits");
        assert_eq!(compiled.defaults().get("limit"), Some(&json!(10)));
    }

    #[test]
    fn strict_mode_requires_everything() {
        let sig = ToolSignature::new("search", "")
            .param(Param::of::<String>("query"))
            .param(Param::with_default("limit", TypeShape::Integer, 10));
        let compiled = SchemaCompiler::new(SchemaOptions { strict: true }).compile(&sig);

        assert_eq!(compiled.required, vec!["query", "limit"]);
        let def = compiled.to_definition();
        assert_eq!(def.function.strict, Some(true));
        assert_eq!(def.function.parameters["additionalProperties"], json!(false));
    }

    #[test]
    fn optional_becomes_union_with_null() {
        let compiler = SchemaCompiler::default();
        assert_eq!(
            compiler.resolve(&TypeShape::of::<Option<String>>()),
            TypeDescriptor::Union(vec![TypeDescriptor::string(), TypeDescriptor::null()])
        );
    }

    #[test]
    fn nested_unions_are_flattened_not_collapsed() {
        let compiler = SchemaCompiler::default();
        let shape = TypeShape::Union(vec![
            TypeShape::Integer,
            TypeShape::Union(vec![TypeShape::String, TypeShape::optional(TypeShape::Boolean)]),
        ]);
        assert_eq!(
            compiler.resolve(&shape),
            TypeDescriptor::Union(vec![
                TypeDescriptor::Primitive(PrimitiveKind::Integer),
                TypeDescriptor::string(),
                TypeDescriptor::Primitive(PrimitiveKind::Boolean),
                TypeDescriptor::null(),
            ])
        );

        let single = TypeShape::Union(vec![TypeShape::Integer]);
        assert!(matches!(compiler.resolve(&single), TypeDescriptor::Union(ref v) if v.len() == 1));
    }

    #[test]
    fn containers_resolve_recursively() {
        let compiler = SchemaCompiler::default();
        let shape = TypeShape::of::<Vec<std::collections::HashMap<String, f64>>>();
        assert_eq!(
            Value::Object(compiler.resolve(&shape).to_schema()),
            json!({
                "type": "array",
                "items": { "type": "object", "additionalProperties": { "type": "number" } }
            })
        );
    }

    #[test]
    fn literal_infers_base_from_first_value() {
        let compiler = SchemaCompiler::default();
        assert_eq!(
            compiler.resolve(&TypeShape::Literal(vec![json!(1), json!(2), json!(3)])),
            TypeDescriptor::Enumerated {
                base: PrimitiveKind::Integer,
                values: vec![json!(1), json!(2), json!(3)],
            }
        );
        let modes = compiler.resolve(&TypeShape::literal_str(["fast", "slow"]));
        assert_eq!(
            Value::Object(modes.to_schema()),
            json!({ "type": "string", "enum": ["fast", "slow"] })
        );
    }

    #[test]
    fn malformed_shapes_degrade_to_string() {
        let compiler = SchemaCompiler::default();
        for shape in [
            TypeShape::Union(vec![]),
            TypeShape::Literal(vec![]),
            TypeShape::Literal(vec![json!([1, 2])]),
            TypeShape::Literal(vec![json!({"k": 1})]),
            TypeShape::Named("Location".into()),
            TypeShape::Any,
        ] {
            assert_eq!(compiler.resolve(&shape), TypeDescriptor::string(), "{shape:?}");
        }
    }

    #[test]
    fn undocumented_params_get_empty_description() {
        let sig = ToolSignature::new("get_current_time", "Return the current local time.")
            .param(Param::of::<String>("zone"));
        let compiled = SchemaCompiler::default().compile(&sig);
        assert_eq!(compiled.description, "Return the current local time.");
        assert_eq!(compiled.parameters[0].description, "");
    }

    #[test]
    fn property_order_follows_declaration() {
        let sig = ToolSignature::new("t", "")
            .param(Param::of::<String>("zeta"))
            .param(Param::of::<String>("alpha"))
            .param(Param::of::<String>("mid"));
        let params = SchemaCompiler::default().compile(&sig).parameters_json();
        let keys: Vec<&String> = params["properties"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }
}
