//! Property and RPC normalization.
//!
//! Maps reflected property types to their C++ and protobuf forms and emits
//! the statements that move a value between a C++ lvalue and a protobuf
//! message field. Message accessors are passed with their operator
//! included (`"DeltaState->"`, `"Msg."`) so the same snippets serve both
//! pointers and references.

use crate::actor::REMOVED_FIELD_NUMBER;
use replicator_reflection::utils::{is_identifier, to_snake_case};
use replicator_reflection::{
    FieldDescriptor, PropertyAccess, PropertyDescriptor, PropertyType, RpcDescriptor, RpcKind,
};
use std::collections::{HashMap, HashSet};

pub const UNREAL_PROTO_PACKAGE: &str = "unrealpb";

/// A replicated property, ready for templating.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplicatedProperty {
    /// Name as reflected; used for runtime property lookup.
    pub source_name: String,
    /// Identifier-safe C++ name.
    pub name: String,
    pub field: String,
    pub number: u32,
    pub ty: PropertyType,
    /// Public native members are accessed directly; everything else goes
    /// through a property pointer resolved when the replicator is created.
    pub direct: bool,
    /// Protobuf merges append repeated fields, so channel data has to clear
    /// the destination field before merging.
    pub requires_custom_merge: bool,
}

impl ReplicatedProperty {
    pub fn cpp_type(&self) -> String {
        cpp_type(&self.ty)
    }

    pub fn pointer_name(&self) -> String {
        format!("{}Ptr", self.name)
    }

    pub fn pointer_declaration(&self) -> String {
        format!("{}* {} = nullptr;", self.cpp_type(), self.pointer_name())
    }

    /// C++ lvalue of the property on the replicated instance.
    pub fn value_expr(&self, instance: &str) -> String {
        if self.direct {
            format!("{}->{}", instance, self.name)
        } else {
            format!("(*{})", self.pointer_name())
        }
    }

    pub fn assign_pointer_code(&self, instance: &str) -> String {
        format!(
            "{{\n\tFProperty* Property = {instance}->GetClass()->FindPropertyByName(FName(TEXT(\"{source}\")));\n\t{ptr} = Property->ContainerPtrToValuePtr<{ty}>({instance}.Get());\n\tcheck({ptr});\n}}\n",
            instance = instance,
            source = self.source_name,
            ptr = self.pointer_name(),
            ty = self.cpp_type(),
        )
    }

    pub fn proto_field_definition(&self, package: &str) -> String {
        field_definition(&self.ty, &self.field, self.number, package)
    }

    pub fn set_delta_state_code(&self, instance: &str) -> String {
        delta_code(&self.ty, &self.value_expr(instance), &self.field)
    }

    pub fn on_state_change_code(&self, instance: &str, world: &str) -> String {
        format!(
            "if ({cond})\n{{\n{body}}}\n",
            cond = has_condition(&self.ty, "NewState->", &self.field),
            body = indent(
                &read_code(&self.ty, "NewState->", &self.field, &self.value_expr(instance), world),
                1
            ),
        )
    }
}

/// One RPC parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplicatedParam {
    pub name: String,
    pub field: String,
    pub number: u32,
    pub ty: PropertyType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplicatedRpc {
    pub name: String,
    pub kind: RpcKind,
    pub reliable: bool,
    pub params: Vec<ReplicatedParam>,
    /// Protobuf message carrying the parameters.
    pub message: String,
}

impl ReplicatedRpc {
    /// Parameter layout key; RPCs with equal keys can share a C++ struct.
    pub fn shape_key(&self) -> String {
        self.params
            .iter()
            .map(|p| format!("{}:{}", p.name, p.ty.type_key()))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }

    pub fn local_struct_name(&self) -> String {
        format!("{}Params", self.name)
    }
}

/// Normalize the replicated properties of a class. Unsupported types are
/// dropped with a warning, illegal names become `_IllegalNameProp_{n}_`.
pub fn normalize_properties(
    properties: &[PropertyDescriptor],
    native: bool,
    first_field: u32,
) -> Vec<ReplicatedProperty> {
    let mut illegal = 0;
    let mut number = first_field;
    let mut fields = FieldNames::default();
    if first_field > REMOVED_FIELD_NUMBER {
        fields.reserve("removed");
    }
    let mut result = Vec::with_capacity(properties.len());

    for property in properties {
        if !is_supported(&property.ty) {
            tracing::warn!(
                property = %property.name,
                ty = %property.ty.type_key(),
                "unsupported property type, skipping"
            );
            continue;
        }

        let name = legal_name(&property.name, &mut illegal, "_IllegalNameProp_");
        result.push(ReplicatedProperty {
            source_name: property.name.clone(),
            field: fields.assign(&name),
            name,
            number,
            ty: property.ty.clone(),
            direct: native && property.access == PropertyAccess::Public,
            requires_custom_merge: property.ty.is_array(),
        });
        number += 1;
    }

    result
}

/// Normalize the RPCs of a class; `message_prefix` scopes the parameter
/// messages, which share the class's protobuf package.
pub fn normalize_rpcs(rpcs: &[RpcDescriptor], message_prefix: &str) -> Vec<ReplicatedRpc> {
    let mut illegal = 0;

    rpcs.iter()
        .filter_map(|rpc| {
            if !is_identifier(&rpc.name) {
                tracing::warn!(rpc = %rpc.name, "RPC name is not a legal identifier, skipping RPC");
                return None;
            }
            if let Some(bad) = rpc.params.iter().find(|p| !is_supported(&p.ty)) {
                tracing::warn!(
                    rpc = %rpc.name,
                    param = %bad.name,
                    "unsupported RPC parameter type, skipping RPC"
                );
                return None;
            }

            let mut fields = FieldNames::default();
            let params = rpc
                .params
                .iter()
                .zip(1u32..)
                .map(|(param, number)| {
                    let name = legal_name(&param.name, &mut illegal, "_IllegalNameParam_");
                    ReplicatedParam {
                        field: fields.assign(&name),
                        name,
                        number,
                        ty: param.ty.clone(),
                    }
                })
                .collect();

            Some(ReplicatedRpc {
                name: rpc.name.clone(),
                kind: rpc.kind,
                reliable: rpc.reliable,
                params,
                message: format!("{}_{}Params", message_prefix, rpc.name),
            })
        })
        .collect()
}

/// Protobuf field names already used within one message. A name whose
/// snake case form is taken, ignoring case, gets `_1`, `_2` and so on.
#[derive(Debug, Default)]
struct FieldNames {
    taken: HashSet<String>,
    counters: HashMap<String, u32>,
}

impl FieldNames {
    fn reserve(&mut self, field: &str) {
        self.taken.insert(field.to_lowercase());
    }

    fn assign(&mut self, name: &str) -> String {
        let base = to_snake_case(name);
        if self.taken.insert(base.to_lowercase()) {
            return base;
        }
        let mut counter = self.counters.get(&base).copied().unwrap_or(0);
        let field = loop {
            counter += 1;
            let candidate = format!("{}_{}", base, counter);
            if self.taken.insert(candidate.to_lowercase()) {
                break candidate;
            }
        };
        self.counters.insert(base, counter);
        field
    }
}

fn legal_name(name: &str, illegal: &mut u32, prefix: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        *illegal += 1;
        format!("{}{}_", prefix, illegal)
    }
}

/// Nested arrays have no protobuf representation.
pub fn is_supported(ty: &PropertyType) -> bool {
    match ty {
        PropertyType::Array { element } => !element.is_array() && is_supported(element),
        PropertyType::Struct { fields, .. } => fields.iter().all(|f| is_supported(&f.ty)),
        _ => true,
    }
}

pub fn cpp_type(ty: &PropertyType) -> String {
    match ty {
        PropertyType::Bool => "bool".to_string(),
        PropertyType::Int32 => "int32".to_string(),
        PropertyType::Uint32 => "uint32".to_string(),
        PropertyType::Int64 => "int64".to_string(),
        PropertyType::Uint64 => "uint64".to_string(),
        PropertyType::Byte => "uint8".to_string(),
        PropertyType::Float => "float".to_string(),
        PropertyType::Double => "double".to_string(),
        PropertyType::String => "FString".to_string(),
        PropertyType::Name => "FName".to_string(),
        PropertyType::Text => "FText".to_string(),
        PropertyType::Vector => "FVector".to_string(),
        PropertyType::Rotator => "FRotator".to_string(),
        PropertyType::Object { class } => format!("TObjectPtr<{}>", class),
        PropertyType::Enum { name } => format!("TEnumAsByte<{}>", name),
        PropertyType::Struct { name, .. } => format!("F{}", name),
        PropertyType::Array { element } => format!("TArray<{}>", cpp_type(element)),
    }
}

/// Protobuf message name of a reflected struct type.
pub fn struct_message(name: &str) -> String {
    format!("{}StructState", name)
}

pub fn proto_type(ty: &PropertyType, package: &str) -> String {
    match ty {
        PropertyType::Bool => "bool".to_string(),
        PropertyType::Int32 => "int32".to_string(),
        PropertyType::Uint32 | PropertyType::Byte | PropertyType::Enum { .. } => {
            "uint32".to_string()
        }
        PropertyType::Int64 => "int64".to_string(),
        PropertyType::Uint64 => "uint64".to_string(),
        PropertyType::Float => "float".to_string(),
        PropertyType::Double => "double".to_string(),
        PropertyType::String | PropertyType::Name | PropertyType::Text => "string".to_string(),
        PropertyType::Vector | PropertyType::Rotator => format!("{}.FVector", UNREAL_PROTO_PACKAGE),
        PropertyType::Object { .. } => format!("{}.UnrealObjectRef", UNREAL_PROTO_PACKAGE),
        PropertyType::Struct { name, .. } => format!("{}.{}", package, struct_message(name)),
        PropertyType::Array { element } => proto_type(element, package),
    }
}

pub fn field_definition(ty: &PropertyType, field: &str, number: u32, package: &str) -> String {
    let label = match ty {
        PropertyType::Array { .. } => "repeated ",
        _ if is_scalar(ty) => "optional ",
        _ => "",
    };
    format!("{}{} {} = {};", label, proto_type(ty, package), field, number)
}

/// Whether the type maps to a protobuf scalar.
pub fn is_scalar(ty: &PropertyType) -> bool {
    !matches!(
        ty,
        PropertyType::Vector
            | PropertyType::Rotator
            | PropertyType::Object { .. }
            | PropertyType::Struct { .. }
            | PropertyType::Array { .. }
    )
}

/// Whether the type needs definitions from `unreal_common.proto`.
pub fn uses_unreal_common(ty: &PropertyType) -> bool {
    match ty {
        PropertyType::Vector | PropertyType::Rotator | PropertyType::Object { .. } => true,
        PropertyType::Array { element } => uses_unreal_common(element),
        PropertyType::Struct { fields, .. } => fields.iter().any(|f| uses_unreal_common(&f.ty)),
        _ => false,
    }
}

/// Whether the type needs definitions from the global struct schema.
pub fn uses_global_structs(ty: &PropertyType) -> bool {
    !ty.structs().is_empty()
}

fn scalar_to_proto(ty: &PropertyType, value: &str) -> String {
    match ty {
        PropertyType::Byte | PropertyType::Enum { .. } => format!("static_cast<uint32>({})", value),
        PropertyType::String => format!("std::string(TCHAR_TO_UTF8(*{}))", value),
        PropertyType::Name | PropertyType::Text => {
            format!("std::string(TCHAR_TO_UTF8(*{}.ToString()))", value)
        }
        _ => value.to_string(),
    }
}

fn scalar_from_proto(ty: &PropertyType, value: &str) -> String {
    match ty {
        PropertyType::Byte => format!("static_cast<uint8>({})", value),
        PropertyType::Enum { name } => format!("static_cast<{}>({})", name, value),
        PropertyType::String => format!("FString(UTF8_TO_TCHAR({}.c_str()))", value),
        PropertyType::Name => format!("FName(UTF8_TO_TCHAR({}.c_str()))", value),
        PropertyType::Text => format!("FText::FromString(UTF8_TO_TCHAR({}.c_str()))", value),
        _ => value.to_string(),
    }
}

/// Condition under which a received state carries a value for `field`.
pub fn has_condition(ty: &PropertyType, acc: &str, field: &str) -> String {
    match ty {
        PropertyType::Array { .. } => format!("{}{}_size() > 0", acc, field),
        _ => format!("{}has_{}()", acc, field),
    }
}

/// Statements writing `value` into message field `field`.
pub fn write_code(ty: &PropertyType, acc: &str, field: &str, value: &str) -> String {
    match ty {
        PropertyType::Vector | PropertyType::Rotator => {
            format!("ChanneldUtils::SetIfNotSame({}mutable_{}(), {});\n", acc, field, value)
        }
        PropertyType::Object { .. } => format!(
            "{}mutable_{}()->CopyFrom(*ChanneldUtils::GetRefOfObject({}));\n",
            acc, field, value
        ),
        PropertyType::Struct { name, .. } => format!(
            "ChanneldGlobalStruct::Write{}({}, {}mutable_{}());\n",
            name, value, acc, field
        ),
        PropertyType::Array { element } => {
            let add = match element.as_ref() {
                PropertyType::Vector | PropertyType::Rotator => {
                    format!("ChanneldUtils::SetIfNotSame({}add_{}(), Elem);\n", acc, field)
                }
                PropertyType::Object { .. } => format!(
                    "{}add_{}()->CopyFrom(*ChanneldUtils::GetRefOfObject(Elem));\n",
                    acc, field
                ),
                PropertyType::Struct { name, .. } => format!(
                    "ChanneldGlobalStruct::Write{}(Elem, {}add_{}());\n",
                    name, acc, field
                ),
                scalar => format!("{}add_{}({});\n", acc, field, scalar_to_proto(scalar, "Elem")),
            };
            format!(
                "{acc}clear_{field}();\nfor (const auto& Elem : {value})\n{{\n{add}}}\n",
                acc = acc,
                field = field,
                value = value,
                add = indent(&add, 1),
            )
        }
        scalar => format!("{}set_{}({});\n", acc, field, scalar_to_proto(scalar, value)),
    }
}

/// Statements reading message field `field` into the lvalue `target`.
pub fn read_code(ty: &PropertyType, acc: &str, field: &str, target: &str, world: &str) -> String {
    let source = format!("{}{}()", acc, field);
    match ty {
        PropertyType::Vector => format!("{} = ChanneldUtils::GetVector({});\n", target, source),
        PropertyType::Rotator => format!("{} = ChanneldUtils::GetRotator({});\n", target, source),
        PropertyType::Object { class } => format!(
            "{} = Cast<{}>(ChanneldUtils::GetObjectByRef(&{}, {}));\n",
            target,
            strip_object_ptr(class),
            source,
            world
        ),
        PropertyType::Struct { name, .. } => format!(
            "ChanneldGlobalStruct::Read{}({}, {}, {});\n",
            name, source, target, world
        ),
        PropertyType::Array { element } => {
            let add = match element.as_ref() {
                PropertyType::Vector => format!("{}.Add(ChanneldUtils::GetVector(Elem));\n", target),
                PropertyType::Rotator => {
                    format!("{}.Add(ChanneldUtils::GetRotator(Elem));\n", target)
                }
                PropertyType::Object { class } => format!(
                    "{}.Add(Cast<{}>(ChanneldUtils::GetObjectByRef(&Elem, {})));\n",
                    target,
                    strip_object_ptr(class),
                    world
                ),
                PropertyType::Struct { name, .. } => format!(
                    "ChanneldGlobalStruct::Read{}(Elem, {}.AddDefaulted_GetRef(), {});\n",
                    name, target, world
                ),
                scalar => format!("{}.Add({});\n", target, scalar_from_proto(scalar, "Elem")),
            };
            format!(
                "{target}.Empty();\nfor (const auto& Elem : {source})\n{{\n{add}}}\n",
                target = target,
                source = source,
                add = indent(&add, 1),
            )
        }
        scalar => format!("{} = {};\n", target, scalar_from_proto(scalar, &source)),
    }
}

fn strip_object_ptr(class: &str) -> &str {
    class.trim_end_matches('*').trim()
}

/// Statements comparing `value` with `FullState` and recording differences
/// in `DeltaState`, setting `bStateChanged` when anything changed.
pub fn delta_code(ty: &PropertyType, value: &str, field: &str) -> String {
    match ty {
        PropertyType::Struct { name, .. } => format!(
            "if (ChanneldGlobalStruct::Merge{name}({value}, FullState->has_{field}() ? &FullState->{field}() : nullptr, DeltaState->mutable_{field}()))\n{{\n\tbStateChanged = true;\n}}\nelse\n{{\n\tDeltaState->clear_{field}();\n}}\n",
            name = name,
            value = value,
            field = field,
        ),
        PropertyType::Array { .. } => format!(
            "{write}if (ChanneldUtils::IsSameRepeated(DeltaState->{field}(), FullState->{field}()))\n{{\n\tDeltaState->clear_{field}();\n}}\nelse\n{{\n\tbStateChanged = true;\n}}\n",
            write = write_code(ty, "DeltaState->", field, value),
            field = field,
        ),
        _ if is_scalar(ty) => {
            let converted = scalar_to_proto(ty, value);
            format!(
                "if (!FullState->has_{field}() || {converted} != FullState->{field}())\n{{\n\tDeltaState->set_{field}({converted});\n\tbStateChanged = true;\n}}\n",
                field = field,
                converted = converted,
            )
        }
        _ => format!(
            "if (!FullState->has_{field}() || !ChanneldUtils::IsSame(FullState->{field}(), {value}))\n{{\n{write}\tbStateChanged = true;\n}}\n",
            field = field,
            value = value,
            write = indent(&write_code(ty, "DeltaState->", field, value), 1),
        ),
    }
}

/// Prefix every non-empty line with `levels` tabs.
pub fn indent(code: &str, levels: usize) -> String {
    let prefix = "\t".repeat(levels);
    let mut out = String::with_capacity(code.len() + levels * 8);
    for line in code.split_inclusive('\n') {
        if line.trim().is_empty() {
            out.push_str(line.trim_start_matches([' ', '\t']));
        } else {
            out.push_str(&prefix);
            out.push_str(line);
        }
    }
    out
}

/// Reflected struct members as parameters of the global struct helpers.
pub fn struct_members(fields: &[FieldDescriptor]) -> Vec<ReplicatedParam> {
    let mut names = FieldNames::default();
    fields
        .iter()
        .filter(|f| {
            let ok = is_identifier(&f.name);
            if !ok {
                tracing::warn!(member = %f.name, "struct member is not a legal identifier, skipping");
            }
            ok
        })
        .zip(1u32..)
        .map(|(f, number)| ReplicatedParam {
            name: f.name.clone(),
            field: names.assign(&f.name),
            number,
            ty: f.ty.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(name: &str, ty: PropertyType, access: PropertyAccess) -> PropertyDescriptor {
        PropertyDescriptor {
            name: name.to_string(),
            ty,
            access,
        }
    }

    #[test]
    fn test_normalize_properties_numbering_and_access() {
        let props = vec![
            prop("Health", PropertyType::Float, PropertyAccess::Public),
            prop("Ammo", PropertyType::Int32, PropertyAccess::Protected),
            prop(
                "Tags",
                PropertyType::Array {
                    element: Box::new(PropertyType::Name),
                },
                PropertyAccess::Public,
            ),
        ];

        let normalized = normalize_properties(&props, true, 2);
        assert_eq!(normalized.len(), 3);
        assert_eq!(normalized[0].number, 2);
        assert_eq!(normalized[2].number, 4);
        assert!(normalized[0].direct);
        assert!(!normalized[1].direct);
        assert!(normalized[2].requires_custom_merge);
        assert!(!normalized[0].requires_custom_merge);
        assert_eq!(normalized[0].field, "health");
    }

    #[test]
    fn test_blueprint_properties_are_indirect() {
        let props = vec![prop("bOpen", PropertyType::Bool, PropertyAccess::Public)];
        let normalized = normalize_properties(&props, false, 1);
        assert!(!normalized[0].direct);
        assert_eq!(normalized[0].value_expr("Actor"), "(*bOpenPtr)");
    }

    #[test]
    fn test_illegal_and_unsupported_properties() {
        let props = vec![
            prop("My Value", PropertyType::Int32, PropertyAccess::Public),
            prop(
                "Grid",
                PropertyType::Array {
                    element: Box::new(PropertyType::Array {
                        element: Box::new(PropertyType::Int32),
                    }),
                },
                PropertyAccess::Public,
            ),
            prop("Other Value", PropertyType::Int32, PropertyAccess::Public),
        ];
        let normalized = normalize_properties(&props, true, 1);
        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0].name, "_IllegalNameProp_1_");
        assert_eq!(normalized[0].source_name, "My Value");
        assert_eq!(normalized[1].name, "_IllegalNameProp_2_");
        assert_eq!(normalized[1].number, 2);
    }

    #[test]
    fn test_proto_field_definitions() {
        assert_eq!(
            field_definition(&PropertyType::Float, "health", 2, "gamepb"),
            "optional float health = 2;"
        );
        assert_eq!(
            field_definition(&PropertyType::Vector, "target", 3, "gamepb"),
            "unrealpb.FVector target = 3;"
        );
        assert_eq!(
            field_definition(
                &PropertyType::Array {
                    element: Box::new(PropertyType::Struct {
                        name: "WeaponSlot".to_string(),
                        fields: vec![],
                    }),
                },
                "loadout",
                4,
                "gamepb"
            ),
            "repeated gamepb.WeaponSlotStructState loadout = 4;"
        );
        assert_eq!(
            field_definition(
                &PropertyType::Enum {
                    name: "EPhase".to_string()
                },
                "phase",
                1,
                "gamepb"
            ),
            "optional uint32 phase = 1;"
        );
    }

    #[test]
    fn test_scalar_delta_code() {
        let code = delta_code(&PropertyType::String, "Actor->Nick", "nick");
        assert!(code.contains("std::string(TCHAR_TO_UTF8(*Actor->Nick)) != FullState->nick()"));
        assert!(code.contains("DeltaState->set_nick("));
        assert!(code.contains("bStateChanged = true;"));
    }

    #[test]
    fn test_array_write_and_read() {
        let ty = PropertyType::Array {
            element: Box::new(PropertyType::Name),
        };
        let write = write_code(&ty, "Msg->", "tags", "Params->Tags");
        assert!(write.starts_with("Msg->clear_tags();"));
        assert!(write.contains("\tMsg->add_tags(std::string(TCHAR_TO_UTF8(*Elem.ToString())));"));

        let read = read_code(&ty, "Msg.", "tags", "Params->Tags", "World");
        assert!(read.starts_with("Params->Tags.Empty();"));
        assert!(read.contains("for (const auto& Elem : Msg.tags())"));
        assert!(read.contains("Params->Tags.Add(FName(UTF8_TO_TCHAR(Elem.c_str())));"));
    }

    #[test]
    fn test_rpc_normalization() {
        let rpcs = vec![RpcDescriptor {
            name: "ServerFire".to_string(),
            kind: RpcKind::Server,
            reliable: true,
            params: vec![
                FieldDescriptor {
                    name: "Target".to_string(),
                    ty: PropertyType::Vector,
                },
                FieldDescriptor {
                    name: "Power".to_string(),
                    ty: PropertyType::Float,
                },
            ],
        }];
        let normalized = normalize_rpcs(&rpcs, "Character");
        assert_eq!(normalized[0].message, "Character_ServerFireParams");
        assert_eq!(normalized[0].shape_key(), "Target:vector,Power:float");
        assert_eq!(normalized[0].params[1].number, 2);
        assert_eq!(normalized[0].params[1].field, "power");
    }

    #[test]
    fn test_colliding_field_names_get_suffix() {
        let props = vec![
            prop("Health", PropertyType::Float, PropertyAccess::Public),
            prop("health", PropertyType::Float, PropertyAccess::Public),
            prop("bIsOpen", PropertyType::Bool, PropertyAccess::Public),
            prop("b_is_open", PropertyType::Bool, PropertyAccess::Public),
        ];
        let fields: Vec<String> = normalize_properties(&props, true, 1)
            .into_iter()
            .map(|p| p.field)
            .collect();
        assert_eq!(fields, vec!["health", "health_1", "b_is_open", "b_is_open_1"]);
    }

    #[test]
    fn test_property_named_removed_skips_flag_field() {
        let props = vec![prop("Removed", PropertyType::Bool, PropertyAccess::Public)];
        assert_eq!(normalize_properties(&props, true, 2)[0].field, "removed_1");
        assert_eq!(normalize_properties(&props, true, 1)[0].field, "removed");
    }

    #[test]
    fn test_colliding_param_and_member_names_get_suffix() {
        let rpcs = vec![RpcDescriptor {
            name: "ServerAim".to_string(),
            kind: RpcKind::Server,
            reliable: false,
            params: vec![
                FieldDescriptor {
                    name: "Pitch".to_string(),
                    ty: PropertyType::Float,
                },
                FieldDescriptor {
                    name: "pitch".to_string(),
                    ty: PropertyType::Float,
                },
            ],
        }];
        let normalized = normalize_rpcs(&rpcs, "Character");
        assert_eq!(normalized[0].params[0].field, "pitch");
        assert_eq!(normalized[0].params[1].field, "pitch_1");

        let members = struct_members(&rpcs[0].params);
        assert_eq!(members[1].field, "pitch_1");
    }

    #[test]
    fn test_illegal_rpc_name_is_skipped() {
        let rpc = |name: &str| RpcDescriptor {
            name: name.to_string(),
            kind: RpcKind::Multicast,
            reliable: false,
            params: vec![],
        };
        let normalized = normalize_rpcs(&[rpc("Server Fire"), rpc("MulticastHit")], "Character");
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].message, "Character_MulticastHitParams");
    }

    #[test]
    fn test_indent() {
        assert_eq!(indent("a;\n\nb;\n", 2), "\t\ta;\n\n\t\tb;\n");
    }
}
