//! Per-class protobuf schema.

use super::BANNER;
use crate::actor::{ActorDescriptor, REMOVED_FIELD_NUMBER};
use crate::naming::{GLOBAL_STRUCT_SCHEMA_FILE, UNREAL_COMMON_SCHEMA_FILE};

pub fn render_schema(actor: &ActorDescriptor) -> String {
    let mut imports = String::new();
    if actor.uses_unreal_common() {
        imports.push_str(&format!("import \"{}\";\n", UNREAL_COMMON_SCHEMA_FILE));
    }
    if actor.uses_global_structs() {
        imports.push_str(&format!("import \"{}\";\n", GLOBAL_STRUCT_SCHEMA_FILE));
    }
    if !imports.is_empty() {
        imports.push('\n');
    }

    let mut state_fields = String::new();
    if actor.has_removed_flag() {
        state_fields.push_str(&format!("    optional bool removed = {};\n", REMOVED_FIELD_NUMBER));
    }
    for property in &actor.properties {
        state_fields.push_str(&format!(
            "    {}\n",
            property.proto_field_definition(&actor.schema_package)
        ));
    }

    let rpc_messages: String = actor
        .rpcs
        .iter()
        .filter(|r| r.has_params())
        .map(|rpc| {
            let fields: String = rpc
                .params
                .iter()
                .map(|p| {
                    format!(
                        "    {}\n",
                        crate::property::field_definition(&p.ty, &p.field, p.number, &actor.schema_package)
                    )
                })
                .collect();
            format!("\nmessage {} {{\n{}}}\n", rpc.message, fields)
        })
        .collect();

    format!(
        r#"{banner}syntax = "proto3";

package {package};

{imports}option go_package = "{go_package}";

message {state} {{
{state_fields}}}
{rpc_messages}"#,
        banner = BANNER,
        package = actor.schema_package,
        imports = imports,
        go_package = actor.go_package,
        state = actor.names.state_message,
        state_fields = state_fields,
        rpc_messages = rpc_messages,
    )
}
