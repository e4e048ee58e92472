//! Channel data: the per-module message aggregating every replicated state,
//! and the processor that merges, reads and writes those states.

use super::{include_line, BANNER};
use crate::actor::ActorDescriptor;
use crate::naming::{channel_data_schema_file, module_symbol, PB_HEADER_EXTENSION, SCHEMA_EXTENSION, TYPE_DEFINITIONS_HEADER_FILE};
use crate::property::indent;
use std::collections::HashSet;

/// Names of the channel data message and processor for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDataNames {
    pub message: String,
    pub processor_namespace: String,
    pub pb_header_file: String,
}

impl ChannelDataNames {
    pub fn for_module(module_name: &str) -> Self {
        let symbol = module_symbol(module_name);
        let schema = channel_data_schema_file(module_name);
        let stem = schema.trim_end_matches(SCHEMA_EXTENSION);
        Self {
            message: format!("{}ChannelData", symbol),
            processor_namespace: format!("{}ChannelDataProcessor", symbol),
            pb_header_file: format!("{}{}", stem, PB_HEADER_EXTENSION),
        }
    }
}

/// Owned components of `parent` that are part of the run, without
/// singletons (those are never removed from channel data).
pub fn owned_children<'a>(parent: &ActorDescriptor, run: &'a [ActorDescriptor]) -> Vec<&'a ActorDescriptor> {
    let mut fields = HashSet::new();
    run.iter()
        .filter(|a| !a.is_singleton() && parent.components.contains(&a.class_path))
        .filter(|a| fields.insert(a.channel_data_field()))
        .collect()
}

fn clear_custom_merge_fields(actor: &ActorDescriptor, source: &str, target: &str) -> String {
    actor
        .properties
        .iter()
        .filter(|p| p.requires_custom_merge)
        .map(|p| {
            format!(
                "if ({source}.{field}_size() > 0)\n{{\n\t{target}clear_{field}();\n}}\n",
                source = source,
                target = target,
                field = p.field,
            )
        })
        .collect()
}

fn erase_code(actor: &ActorDescriptor, children: &[&ActorDescriptor], map_owner: &str, key: &str) -> String {
    std::iter::once(actor)
        .chain(children.iter().copied())
        .map(|a| format!("{}->mutable_{}()->erase({});\n", map_owner, a.channel_data_field(), key))
        .collect()
}

/// Merge of this class's states from `Src` into `Dst`.
pub fn merge_fragment(actor: &ActorDescriptor, children: &[&ActorDescriptor]) -> String {
    let field = actor.channel_data_field();

    if actor.is_singleton() {
        let clear = clear_custom_merge_fields(actor, &format!("Src->{}()", field), &format!("Dst->mutable_{}()->", field));
        return format!(
            "if (Src->has_{field}())\n{{\n{clear}\tDst->mutable_{field}()->MergeFrom(Src->{field}());\n}}\n",
            field = field,
            clear = indent(&clear, 1),
        );
    }

    let do_merge = format!(
        "auto& Entry = (*Dst->mutable_{field}())[Pair.first];\n{clear}Entry.MergeFrom(Pair.second);\n",
        field = field,
        clear = clear_custom_merge_fields(actor, "Pair.second", "Entry."),
    );

    let inner = if actor.has_removed_flag() {
        format!(
            "if (Pair.second.removed())\n{{\n{erase}}}\nelse\n{{\n{merge}}}\n",
            erase = indent(&erase_code(actor, children, "Dst", "Pair.first"), 1),
            merge = indent(&do_merge, 1),
        )
    } else {
        do_merge
    };

    format!(
        "for (auto& Pair : Src->{field}())\n{{\n{inner}}}\n",
        field = field,
        inner = indent(&inner, 1),
    )
}

/// Lookup of this class's state for one net GUID.
pub fn get_state_fragment(actor: &ActorDescriptor) -> String {
    let field = actor.channel_data_field();
    let body = if actor.is_singleton() {
        format!(
            "if (TypedChannelData->has_{field}())\n{{\n\treturn &TypedChannelData->{field}();\n}}\nreturn nullptr;\n",
            field = field
        )
    } else {
        format!(
            r#"auto It = TypedChannelData->{field}().find(NetGUID);
if (It == TypedChannelData->{field}().end())
{{
	bIsRemoved = true;
	return nullptr;
}}
return &It->second;
"#,
            field = field
        )
    };
    format!(
        "if ({cond})\n{{\n{body}}}\n",
        cond = actor.target_condition(),
        body = indent(&body, 1),
    )
}

/// Store of one state for one net GUID.
pub fn set_state_fragment(actor: &ActorDescriptor, children: &[&ActorDescriptor]) -> String {
    let field = actor.channel_data_field();
    let cast = format!(
        "auto TypedState = static_cast<const {package}::{state}*>(State);\n",
        package = actor.schema_package,
        state = actor.names.state_message,
    );

    let store = if actor.is_singleton() {
        format!("TypedChannelData->mutable_{}()->CopyFrom(*TypedState);\n", field)
    } else {
        let assign = format!("(*TypedChannelData->mutable_{}())[NetGUID] = *TypedState;\n", field);
        if actor.has_removed_flag() {
            format!(
                "if (TypedState->removed())\n{{\n{erase}}}\nelse\n{{\n{assign}}}\n",
                erase = indent(&erase_code(actor, children, "TypedChannelData", "NetGUID"), 1),
                assign = indent(&assign, 1),
            )
        } else {
            assign
        }
    };

    format!(
        "if ({cond})\n{{\n{body}}}\n",
        cond = actor.target_condition(),
        body = indent(&format!("{}{}return;\n", cast, store), 1),
    )
}

/// Per-class fragments, in run order.
#[derive(Debug, Clone)]
pub struct ProcessorFragments {
    pub merge: String,
    pub get_state: String,
    pub set_state: String,
}

pub fn render_processor_header(
    actors: &[ActorDescriptor],
    fragments: &[ProcessorFragments],
    names: &ChannelDataNames,
    schema_package: &str,
) -> String {
    let includes: String = actors
        .iter()
        .map(|a| include_line(&a.names.pb_header_file))
        .collect();
    let merge: String = fragments.iter().map(|f| f.merge.as_str()).collect();
    let get_state: String = fragments.iter().map(|f| f.get_state.as_str()).collect();
    let set_state: String = fragments.iter().map(|f| f.set_state.as_str()).collect();

    format!(
        r#"{banner}#pragma once

#include "CoreMinimal.h"
#include "ChannelDataInterfaces.h"
#include "ChanneldReplication.h"
{types}{channel_data_pb}{includes}
namespace {namespace}
{{
	class FChannelDataProcessor : public IChannelDataProcessor
	{{
	public:
		virtual bool Merge(const google::protobuf::Message* SrcMsg, google::protobuf::Message* DstMsg) override
		{{
			auto Src = static_cast<const {package}::{message}*>(SrcMsg);
			auto Dst = static_cast<{package}::{message}*>(DstMsg);
{merge}			return true;
		}}

		virtual const google::protobuf::Message* GetStateFromChannelData(google::protobuf::Message* ChannelData, UClass* TargetClass, uint32 NetGUID, bool& bIsRemoved) override
		{{
			auto TypedChannelData = static_cast<{package}::{message}*>(ChannelData);
			bIsRemoved = false;
{get_state}			return nullptr;
		}}

		virtual void SetStateToChannelData(const google::protobuf::Message* State, google::protobuf::Message* ChannelData, UClass* TargetClass, uint32 NetGUID) override
		{{
			auto TypedChannelData = static_cast<{package}::{message}*>(ChannelData);
{set_state}		}}
	}};
}}
"#,
        banner = BANNER,
        types = include_line(TYPE_DEFINITIONS_HEADER_FILE),
        channel_data_pb = include_line(&names.pb_header_file),
        includes = includes,
        namespace = names.processor_namespace,
        package = schema_package,
        message = names.message,
        merge = indent(&merge, 3),
        get_state = indent(&get_state, 3),
        set_state = indent(&set_state, 3),
    )
}

/// Field definition of one class inside the channel data message.
pub fn schema_field(actor: &ActorDescriptor, number: u32) -> String {
    let state = format!("{}.{}", actor.schema_package, actor.names.state_message);
    if actor.is_singleton() {
        format!("{} {} = {};", state, actor.channel_data_field(), number)
    } else {
        format!("map<uint32, {}> {} = {};", state, actor.channel_data_field(), number)
    }
}

pub fn render_schema(
    actors: &[ActorDescriptor],
    names: &ChannelDataNames,
    schema_package: &str,
    go_package: &str,
) -> String {
    let imports: String = actors
        .iter()
        .map(|a| format!("import \"{}\";\n", a.names.schema_file))
        .collect();
    let fields: String = actors
        .iter()
        .zip(1u32..)
        .map(|(a, number)| format!("    {}\n", schema_field(a, number)))
        .collect();

    format!(
        "{banner}syntax = \"proto3\";\n\npackage {package};\n\n{imports}\noption go_package = \"{go}\";\n\nmessage {message} {{\n{fields}}}\n",
        banner = BANNER,
        package = schema_package,
        imports = imports,
        go = go_package,
        message = names.message,
        fields = fields,
    )
}
