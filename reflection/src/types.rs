//! Class, property and RPC descriptors

use serde::{Deserialize, Serialize};

/// Replication role of a class inside channel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    #[default]
    Actor,
    /// Actor components carry a `removed` flag in their state message.
    Component,
    /// Game states are stored once per channel instead of per net GUID.
    GameState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDescriptor {
    /// Engine name without the C++ prefix, e.g. `MyActor` or `BP_Door_C`.
    pub name: String,
    #[serde(default)]
    pub cpp_prefix: String,
    /// Full class path; this is the class reference used everywhere else.
    pub path: String,
    #[serde(default)]
    pub package: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default)]
    pub blueprint: bool,
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
    #[serde(default)]
    pub rpcs: Vec<RpcDescriptor>,
    /// Class references of the components owned by instances of this class.
    #[serde(default)]
    pub components: Vec<String>,
}

impl ClassDescriptor {
    /// Name of the C++ type, e.g. `AMyActor`.
    pub fn cpp_name(&self) -> String {
        format!("{}{}", self.cpp_prefix, self.name)
    }

    pub fn is_singleton(&self) -> bool {
        self.kind == ClassKind::GameState
    }

    pub fn is_component(&self) -> bool {
        self.kind == ClassKind::Component
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyAccess {
    #[default]
    Public,
    Protected,
    Private,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: PropertyType,
    #[serde(default)]
    pub access: PropertyAccess,
}

/// A named, typed slot: struct member or RPC parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: PropertyType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PropertyType {
    Bool,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Byte,
    Float,
    Double,
    String,
    Name,
    Text,
    Vector,
    Rotator,
    Object {
        class: String,
    },
    Enum {
        name: String,
    },
    Struct {
        name: String,
        #[serde(default)]
        fields: Vec<FieldDescriptor>,
    },
    Array {
        element: Box<PropertyType>,
    },
}

impl PropertyType {
    /// Canonical text form, stable across runs; used to compare shapes.
    pub fn type_key(&self) -> String {
        match self {
            PropertyType::Bool => "bool".to_string(),
            PropertyType::Int32 => "int32".to_string(),
            PropertyType::Uint32 => "uint32".to_string(),
            PropertyType::Int64 => "int64".to_string(),
            PropertyType::Uint64 => "uint64".to_string(),
            PropertyType::Byte => "byte".to_string(),
            PropertyType::Float => "float".to_string(),
            PropertyType::Double => "double".to_string(),
            PropertyType::String => "string".to_string(),
            PropertyType::Name => "name".to_string(),
            PropertyType::Text => "text".to_string(),
            PropertyType::Vector => "vector".to_string(),
            PropertyType::Rotator => "rotator".to_string(),
            PropertyType::Object { class } => format!("object<{}>", class),
            PropertyType::Enum { name } => format!("enum<{}>", name),
            PropertyType::Struct { name, .. } => format!("struct<{}>", name),
            PropertyType::Array { element } => format!("array<{}>", element.type_key()),
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, PropertyType::Array { .. })
    }

    /// Struct types referenced by this type, outermost first.
    pub fn structs(&self) -> Vec<(&str, &[FieldDescriptor])> {
        match self {
            PropertyType::Struct { name, fields } => {
                let mut found = vec![(name.as_str(), fields.as_slice())];
                for field in fields {
                    found.extend(field.ty.structs());
                }
                found
            }
            PropertyType::Array { element } => element.structs(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RpcKind {
    Server,
    Client,
    Multicast,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcDescriptor {
    pub name: String,
    pub kind: RpcKind,
    #[serde(default)]
    pub reliable: bool,
    #[serde(default)]
    pub params: Vec<FieldDescriptor>,
}
