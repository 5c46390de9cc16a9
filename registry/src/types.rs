//! Schema definition types.

use graft_core::{CompareOp, FieldPath, RelationId, TypeId, Value};
use std::collections::HashMap;
use std::fmt;

/// Scalar type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrType {
    String,
    Int,
    Float,
    Boolean,
    Timestamp,
    Uuid,
}

impl AttrType {
    /// Parse the schema spelling of a type (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_lowercase().as_str() {
            "string" | "text" => AttrType::String,
            "int" | "integer" => AttrType::Int,
            "float" | "double" => AttrType::Float,
            "boolean" | "bool" => AttrType::Boolean,
            "timestamp" => AttrType::Timestamp,
            "uuid" => AttrType::Uuid,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            AttrType::String => "string",
            AttrType::Int => "int",
            AttrType::Float => "float",
            AttrType::Boolean => "boolean",
            AttrType::Timestamp => "timestamp",
            AttrType::Uuid => "uuid",
        }
    }

    /// Check whether a value may be stored in an attribute of this type.
    /// Null fits every type; Int fits Float and Timestamp.
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (AttrType::String | AttrType::Uuid, Value::String(_)) => true,
            (AttrType::Int | AttrType::Timestamp, Value::Int(_)) => true,
            (AttrType::Float, Value::Float(_) | Value::Int(_)) => true,
            (AttrType::Boolean, Value::Bool(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute definition within an entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrDef {
    /// Attribute name.
    pub name: String,
    /// Scalar type.
    pub attr_type: AttrType,
}

impl AttrDef {
    pub fn new(name: impl Into<String>, attr_type: AttrType) -> Self {
        Self {
            name: name.into(),
            attr_type,
        }
    }
}

/// Entity type definition.
#[derive(Debug, Clone)]
pub struct EntityTypeDef {
    /// Unique identifier.
    pub id: TypeId,
    /// Type name.
    pub name: String,
    /// Attribute definitions.
    pub attributes: HashMap<String, AttrDef>,
    /// Relations owned by this type, by name.
    pub relations: HashMap<String, RelationId>,
}

impl EntityTypeDef {
    pub fn new(id: TypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            attributes: HashMap::new(),
            relations: HashMap::new(),
        }
    }

    /// Get an attribute definition by name.
    pub fn get_attr(&self, name: &str) -> Option<&AttrDef> {
        self.attributes.get(name)
    }

    /// Check if this type has an attribute.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Check if this type has a relation.
    pub fn has_relation(&self, name: &str) -> bool {
        self.relations.contains_key(name)
    }

    /// Get all attribute names.
    pub fn attr_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(|s| s.as_str())
    }
}

/// A named, directed relation between two entity types.
#[derive(Debug, Clone)]
pub struct RelationDef {
    /// Unique identifier.
    pub id: RelationId,
    /// Relation name on the source type (e.g. "addresses").
    pub name: String,
    /// Owning type.
    pub source: TypeId,
    /// Linked type.
    pub target: TypeId,
    /// One-to-many when true, one-to-one otherwise.
    pub multiple: bool,
    /// The same relation seen from the target side.
    pub inverse: Option<RelationId>,
}

/// Parameter of a predefined query.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDef {
    /// Parameter name, as used in the `-match` mapping.
    pub name: String,
    /// Whether callers must supply it.
    pub required: bool,
    /// Value bound when an optional parameter is omitted.
    pub default: Option<Value>,
}

impl ParamDef {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            default: None,
        }
    }

    pub fn optional(name: impl Into<String>, default: Option<Value>) -> Self {
        Self {
            name: name.into(),
            required: false,
            default,
        }
    }
}

/// One condition of a predefined query; the operand is a parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCondition {
    pub path: FieldPath,
    pub op: CompareOp,
    /// Name of the parameter supplying the operand.
    pub param: String,
}

/// A server-declared, named, parameterized match predicate.
#[derive(Debug, Clone)]
pub struct QueryDef {
    /// Query name (unique across the registry).
    pub name: String,
    /// Entity type the query selects.
    pub entity_type: TypeId,
    /// Declared parameters, in declaration order.
    pub params: Vec<ParamDef>,
    /// Conditions, all of which must hold.
    pub conditions: Vec<QueryCondition>,
}

impl QueryDef {
    /// Get a parameter definition by name.
    pub fn get_param(&self, name: &str) -> Option<&ParamDef> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Names of all declared parameters.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }
}
