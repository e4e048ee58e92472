//! Run-wide artifacts: shared RPC parameter structs, blueprint class path
//! constants, the registration table and the global struct helpers.

use super::{include_line, BANNER};
use crate::actor::ActorDescriptor;
use crate::naming::{GLOBAL_STRUCT_HEADER_FILE, TYPE_DEFINITIONS_HEADER_FILE, UNREAL_COMMON_SCHEMA_FILE};
use crate::property::{
    cpp_type, delta_code, field_definition, indent, read_code, struct_members, struct_message,
    uses_unreal_common, write_code, ReplicatedParam, ReplicatedRpc,
};
use replicator_reflection::FieldDescriptor;
use std::collections::{HashMap, HashSet};

/// RPC parameter layouts used by more than one RPC in a run. Each gets a
/// single `FChanneldRpcParams{n}` struct in the type definitions header;
/// single-use layouts stay local to their replicator.
#[derive(Debug, Default)]
pub struct RpcParamStructs {
    by_shape: HashMap<String, String>,
    structs: Vec<(String, Vec<ReplicatedParam>)>,
}

impl RpcParamStructs {
    pub fn collect(actors: &[ActorDescriptor]) -> Self {
        let rpcs = || {
            actors
                .iter()
                .flat_map(|a| a.rpcs.iter())
                .filter(|r| r.has_params())
        };

        let mut counts: HashMap<String, usize> = HashMap::new();
        for rpc in rpcs() {
            *counts.entry(rpc.shape_key()).or_default() += 1;
        }

        let mut shared = Self::default();
        for rpc in rpcs() {
            let key = rpc.shape_key();
            if counts[&key] < 2 || shared.by_shape.contains_key(&key) {
                continue;
            }
            let name = format!("FChanneldRpcParams{}", shared.structs.len() + 1);
            shared.by_shape.insert(key, name.clone());
            shared.structs.push((name, rpc.params.clone()));
        }
        shared
    }

    /// Shared struct for this RPC's parameters, if its layout is shared.
    pub fn struct_for(&self, rpc: &ReplicatedRpc) -> Option<&str> {
        self.by_shape.get(&rpc.shape_key()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.structs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
    }
}

/// C++ struct mirroring an RPC's parameter layout.
pub fn render_param_struct(name: &str, params: &[ReplicatedParam]) -> String {
    let members: String = params
        .iter()
        .map(|p| format!("\t{} {};\n", cpp_type(&p.ty), p.name))
        .collect();
    format!("struct {}\n{{\n{}}};\n", name, members)
}

fn unique_includes(actors: &[ActorDescriptor]) -> String {
    let mut seen = HashSet::new();
    actors
        .iter()
        .filter(|a| seen.insert(a.header.include_path.as_str()))
        .map(|a| include_line(&a.header.include_path))
        .collect()
}

pub fn render_type_definitions_header(actors: &[ActorDescriptor], shared: &RpcParamStructs) -> String {
    let structs: String = shared
        .structs
        .iter()
        .map(|(name, params)| format!("\n{}", render_param_struct(name, params)))
        .collect();

    let declarations: String = actors
        .iter()
        .filter(|a| a.blueprint)
        .map(|a| format!("{}\n", a.class_path_declaration()))
        .collect();

    format!(
        r#"{banner}#pragma once

#include "CoreMinimal.h"
{includes}{structs}
{declarations}"#,
        banner = BANNER,
        includes = unique_includes(actors),
        structs = structs,
        declarations = declarations,
    )
}

pub fn render_type_definitions_body(actors: &[ActorDescriptor]) -> String {
    let definitions: String = actors
        .iter()
        .filter(|a| a.blueprint)
        .map(|a| format!("{}\n", a.class_path_definition()))
        .collect();

    format!(
        "{}{}\n{}",
        BANNER,
        include_line(TYPE_DEFINITIONS_HEADER_FILE),
        definitions
    )
}

/// The line registering one replicator with the replication runtime.
pub fn registration_line(actor: &ActorDescriptor) -> String {
    if actor.blueprint {
        format!(
            "REGISTER_REPLICATOR_BP({}, \"{}\");",
            actor.names.replicator_class, actor.class_path
        )
    } else {
        format!(
            "REGISTER_REPLICATOR({}, {}::StaticClass());",
            actor.names.replicator_class, actor.target_cpp_type
        )
    }
}

pub struct RegistrationInput<'a> {
    pub actors: &'a [ActorDescriptor],
    pub channel_data_header: &'a str,
    pub channel_data_message: &'a str,
    pub processor_namespace: &'a str,
    pub schema_package: &'a str,
}

pub fn render_registration_header(input: &RegistrationInput<'_>) -> String {
    let includes: String = input
        .actors
        .iter()
        .map(|a| include_line(&a.names.header_file))
        .collect();
    let registrations: String = input
        .actors
        .iter()
        .map(|a| format!("\t\t{}\n", registration_line(a)))
        .collect();

    format!(
        r#"{banner}#pragma once

#include "ChanneldReplication.h"
{types}{includes}{channel_data}
namespace ChanneldReplicatorRegistration
{{
	inline void RegisterAll()
	{{
{registrations}		ChanneldReplication::RegisterChannelDataProcessor(TEXT("{package}.{message}"), new {namespace}::FChannelDataProcessor());
	}}
}}
"#,
        banner = BANNER,
        types = include_line(TYPE_DEFINITIONS_HEADER_FILE),
        includes = includes,
        channel_data = include_line(input.channel_data_header),
        registrations = registrations,
        package = input.schema_package,
        message = input.channel_data_message,
        namespace = input.processor_namespace,
    )
}

/// Distinct struct types used anywhere in the run, first appearance wins.
pub fn collect_struct_types(actors: &[ActorDescriptor]) -> Vec<(String, Vec<FieldDescriptor>)> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();
    for actor in actors {
        for (name, fields) in actor.struct_types() {
            if seen.insert(name.to_string()) {
                found.push((name.to_string(), fields.to_vec()));
            }
        }
    }
    found
}

pub fn render_global_struct_header(
    actors: &[ActorDescriptor],
    structs: &[(String, Vec<FieldDescriptor>)],
    schema_package: &str,
) -> String {
    let mut declarations = String::new();
    let mut definitions = String::new();

    for (name, fields) in structs {
        let message = format!("{}::{}", schema_package, struct_message(name));
        let members = struct_members(fields);
        let signature_write = format!("inline void Write{}(const F{}& In, {}* Out)", name, name, message);
        let signature_read = format!(
            "inline void Read{}(const {}& In, F{}& Out, UWorld* World)",
            name, message, name
        );
        let signature_merge = format!(
            "inline bool Merge{}(const F{}& In, const {}* FullState, {}* DeltaState)",
            name, name, message, message
        );

        declarations.push_str(&format!(
            "\t{};\n\t{};\n\t{};\n",
            signature_write, signature_read, signature_merge
        ));

        let write: String = members
            .iter()
            .map(|m| write_code(&m.ty, "Out->", &m.field, &format!("In.{}", m.name)))
            .collect();
        let read: String = members
            .iter()
            .map(|m| read_code(&m.ty, "In.", &m.field, &format!("Out.{}", m.name), "World"))
            .collect();
        let merge: String = members
            .iter()
            .map(|m| delta_code(&m.ty, &format!("In.{}", m.name), &m.field))
            .collect();

        definitions.push_str(&format!(
            r#"
	{signature_write}
	{{
{write}	}}

	{signature_read}
	{{
{read}	}}

	{signature_merge}
	{{
		if (FullState == nullptr)
		{{
			Write{name}(In, DeltaState);
			return true;
		}}
		bool bStateChanged = false;
{merge}		return bStateChanged;
	}}
"#,
            signature_write = signature_write,
            signature_read = signature_read,
            signature_merge = signature_merge,
            name = name,
            write = indent(&write, 2),
            read = indent(&read, 2),
            merge = indent(&merge, 2),
        ));
    }

    format!(
        r#"{banner}#pragma once

#include "CoreMinimal.h"
#include "ChanneldUtils.h"
#include "ChanneldGlobalStructs.pb.h"
{includes}
namespace ChanneldGlobalStruct
{{
{declarations}{definitions}}}
"#,
        banner = BANNER,
        includes = unique_includes(actors),
        declarations = declarations,
        definitions = definitions,
    )
}

pub fn render_global_struct_schema(
    structs: &[(String, Vec<FieldDescriptor>)],
    schema_package: &str,
    go_package: &str,
) -> String {
    let needs_common = structs
        .iter()
        .any(|(_, fields)| fields.iter().any(|f| uses_unreal_common(&f.ty)));
    let import = if needs_common {
        format!("import \"{}\";\n", UNREAL_COMMON_SCHEMA_FILE)
    } else {
        String::new()
    };

    let messages: String = structs
        .iter()
        .map(|(name, fields)| {
            let body: String = struct_members(fields)
                .iter()
                .map(|m| {
                    format!(
                        "    {}\n",
                        field_definition(&m.ty, &m.field, m.number, schema_package)
                    )
                })
                .collect();
            format!("\nmessage {} {{\n{}}}\n", struct_message(name), body)
        })
        .collect();

    format!(
        "{banner}syntax = \"proto3\";\n\npackage {package};\n\n{import}option go_package = \"{go}\";\n{messages}",
        banner = BANNER,
        package = schema_package,
        import = import,
        go = go_package,
        messages = messages,
    )
}

/// Includes needed by a replicator body for shared definitions.
pub fn shared_includes(actor: &ActorDescriptor) -> String {
    let mut out = include_line(TYPE_DEFINITIONS_HEADER_FILE);
    if actor.uses_global_structs() {
        out.push_str(&include_line(GLOBAL_STRUCT_HEADER_FILE));
    }
    out
}
