//! Per-class replicator header and body.

use super::shared::{render_param_struct, shared_includes};
use super::{include_line, RpcParamStructs, BANNER};
use crate::actor::ActorDescriptor;
use crate::property::{indent, read_code, write_code, ReplicatedRpc};

fn params_type(actor: &ActorDescriptor, rpc: &ReplicatedRpc, shared: &RpcParamStructs) -> String {
    match shared.struct_for(rpc) {
        Some(name) => name.to_string(),
        None => format!(
            "{}::{}",
            actor.names.rpc_param_namespace,
            rpc.local_struct_name()
        ),
    }
}

fn authority_expr(actor: &ActorDescriptor) -> String {
    if actor.is_component() {
        format!("{}->GetOwner()->HasAuthority()", actor.instance_name())
    } else {
        format!("{}->HasAuthority()", actor.instance_name())
    }
}

fn overrides_net_guid(actor: &ActorDescriptor) -> bool {
    actor.is_singleton() || actor.is_component()
}

pub fn render_header(actor: &ActorDescriptor, shared: &RpcParamStructs) -> String {
    let local_structs: String = actor
        .rpcs
        .iter()
        .filter(|r| r.has_params() && shared.struct_for(r).is_none())
        .map(|r| indent(&render_param_struct(&r.local_struct_name(), &r.params), 1))
        .collect::<Vec<_>>()
        .join("\n");
    let param_namespace = if local_structs.is_empty() {
        String::new()
    } else {
        format!(
            "\nnamespace {}\n{{\n{}}}\n",
            actor.names.rpc_param_namespace, local_structs
        )
    };

    let net_guid = if overrides_net_guid(actor) {
        "\tvirtual uint32 GetNetGUID() override;\n"
    } else {
        ""
    };

    let pointers: String = actor
        .properties
        .iter()
        .filter(|p| !p.direct)
        .map(|p| format!("\t{}\n", p.pointer_declaration()))
        .collect();
    let private = if pointers.is_empty() {
        String::new()
    } else {
        format!("\nprivate:\n{}", pointers)
    };

    format!(
        r#"{banner}#pragma once

#include "CoreMinimal.h"
#include "Replication/ChanneldReplicatorBase.h"
{target_include}{shared_types}{pb_include}{param_namespace}
class {class} : public FChanneldReplicatorBase
{{
public:
	{class}(UObject* InTargetObj);
	virtual ~{class}() override;

	//~Begin FChanneldReplicatorBase Interface
	virtual UClass* GetTargetClass() override {{ return {target}::StaticClass(); }}
	virtual google::protobuf::Message* GetDeltaState() override;
	virtual void ClearState() override;
	virtual void Tick(float DeltaTime) override;
	virtual void OnStateChanged(const google::protobuf::Message* NewState) override;
{net_guid}	//~End FChanneldReplicatorBase Interface

	virtual TSharedPtr<google::protobuf::Message> SerializeFunctionParams(UFunction* Func, void* Params, FOutParmRec* OutParams, bool& bSuccess) override;
	virtual TSharedPtr<void> DeserializeFunctionParams(UFunction* Func, const std::string& ParamsPayload, bool& bSuccess, bool& bDelayRPC) override;

protected:
	TWeakObjectPtr<{target}> {instance};
	{package}::{state}* FullState;
	{package}::{state}* DeltaState;
{private}}};
"#,
        banner = BANNER,
        target_include = include_line(&actor.header.include_path),
        shared_types = include_line(crate::naming::TYPE_DEFINITIONS_HEADER_FILE),
        pb_include = include_line(&actor.names.pb_header_file),
        param_namespace = param_namespace,
        class = actor.names.replicator_class,
        target = actor.target_cpp_type,
        net_guid = net_guid,
        instance = actor.instance_name(),
        package = actor.schema_package,
        state = actor.names.state_message,
        private = private,
    )
}

fn render_serialize_rpcs(actor: &ActorDescriptor, shared: &RpcParamStructs) -> String {
    actor
        .rpcs
        .iter()
        .map(|rpc| {
            let body = if rpc.has_params() {
                let writes: String = rpc
                    .params
                    .iter()
                    .map(|p| write_code(&p.ty, "Msg->", &p.field, &format!("TypedParams->{}", p.name)))
                    .collect();
                format!(
                    "{ty}* TypedParams = static_cast<{ty}*>(Params);\nauto Msg = MakeShared<{package}::{message}>();\n{writes}return Msg;\n",
                    ty = params_type(actor, rpc, shared),
                    package = actor.schema_package,
                    message = rpc.message,
                    writes = writes,
                )
            } else {
                "return nullptr;\n".to_string()
            };
            format!(
                "if (Func->GetFName() == FName(\"{}\"))\n{{\n{}}}\n",
                rpc.name,
                indent(&body, 1)
            )
        })
        .collect::<Vec<_>>()
        .join("else ")
}

fn render_deserialize_rpcs(actor: &ActorDescriptor, shared: &RpcParamStructs) -> String {
    actor
        .rpcs
        .iter()
        .map(|rpc| {
            let body = if rpc.has_params() {
                let reads: String = rpc
                    .params
                    .iter()
                    .map(|p| {
                        read_code(
                            &p.ty,
                            "Msg.",
                            &p.field,
                            &format!("Params->{}", p.name),
                            &actor.world_expr(),
                        )
                    })
                    .collect();
                format!(
                    r#"{package}::{message} Msg;
if (!Msg.ParseFromString(ParamsPayload))
{{
	UE_LOG(LogChanneld, Warning, TEXT("Failed to parse {rpc} params"));
	bSuccess = false;
	return nullptr;
}}
auto Params = MakeShared<{ty}>();
{reads}return Params;
"#,
                    package = actor.schema_package,
                    message = rpc.message,
                    rpc = rpc.name,
                    ty = params_type(actor, rpc, shared),
                    reads = reads,
                )
            } else {
                "return nullptr;\n".to_string()
            };
            format!(
                "if (Func->GetFName() == FName(\"{}\"))\n{{\n{}}}\n",
                rpc.name,
                indent(&body, 1)
            )
        })
        .collect::<Vec<_>>()
        .join("else ")
}

fn render_net_guid(actor: &ActorDescriptor) -> String {
    if actor.is_singleton() {
        format!(
            "\nuint32 {class}::GetNetGUID()\n{{\n\t// Game state is a singleton in channel data.\n\treturn 1;\n}}\n",
            class = actor.names.replicator_class
        )
    } else if actor.is_component() {
        format!(
            r#"
uint32 {class}::GetNetGUID()
{{
	if (!NetGUID.IsValid() && {instance}.IsValid())
	{{
		if (UWorld* World = {instance}->GetWorld())
		{{
			if (UNetDriver* NetDriver = World->GetNetDriver())
			{{
				NetGUID = NetDriver->GuidCache->GetNetGUID({instance}->GetOwner());
			}}
		}}
	}}
	return NetGUID.Value;
}}
"#,
            class = actor.names.replicator_class,
            instance = actor.instance_name(),
        )
    } else {
        String::new()
    }
}

pub fn render_body(actor: &ActorDescriptor, shared: &RpcParamStructs) -> String {
    let instance = actor.instance_name();

    let assign_pointers: String = actor
        .properties
        .iter()
        .filter(|p| !p.direct)
        .map(|p| p.assign_pointer_code(instance))
        .collect();
    let delta: String = actor
        .properties
        .iter()
        .map(|p| p.set_delta_state_code(instance))
        .collect();
    let on_change: String = actor
        .properties
        .iter()
        .map(|p| p.on_state_change_code(instance, &actor.world_expr()))
        .collect();

    let mut extra_includes = shared_includes(actor);
    if actor.is_component() {
        extra_includes.push_str(&include_line("Engine/PackageMapClient.h"));
    }

    format!(
        r#"{banner}{own_header}#include "ChanneldUtils.h"
#include "Net/UnrealNetwork.h"
{extra_includes}
{class}::{class}(UObject* InTargetObj) : FChanneldReplicatorBase(InTargetObj)
{{
	{instance} = CastChecked<{target}>(InTargetObj);
	FullState = new {package}::{state};
	DeltaState = new {package}::{state};
{assign_pointers}}}

{class}::~{class}()
{{
	delete FullState;
	delete DeltaState;
}}

google::protobuf::Message* {class}::GetDeltaState()
{{
	return DeltaState;
}}

void {class}::ClearState()
{{
	DeltaState->Clear();
	bStateChanged = false;
}}

void {class}::Tick(float DeltaTime)
{{
	if (!{instance}.IsValid())
	{{
		return;
	}}
	if (!{authority})
	{{
		return;
	}}

{delta}
	FullState->MergeFrom(*DeltaState);
}}

void {class}::OnStateChanged(const google::protobuf::Message* InNewState)
{{
	if (!{instance}.IsValid())
	{{
		return;
	}}

	const {package}::{state}* NewState = static_cast<const {package}::{state}*>(InNewState);
	FullState->MergeFrom(*NewState);
	bStateChanged = false;

{on_change}}}
{net_guid}
TSharedPtr<google::protobuf::Message> {class}::SerializeFunctionParams(UFunction* Func, void* Params, FOutParmRec* OutParams, bool& bSuccess)
{{
	bSuccess = true;
{serialize}	bSuccess = false;
	return nullptr;
}}

TSharedPtr<void> {class}::DeserializeFunctionParams(UFunction* Func, const std::string& ParamsPayload, bool& bSuccess, bool& bDelayRPC)
{{
	bSuccess = true;
	bDelayRPC = false;
{deserialize}	bSuccess = false;
	return nullptr;
}}
"#,
        banner = BANNER,
        own_header = include_line(&actor.names.header_file),
        extra_includes = extra_includes,
        class = actor.names.replicator_class,
        instance = instance,
        target = actor.target_cpp_type,
        package = actor.schema_package,
        state = actor.names.state_message,
        assign_pointers = indent(&assign_pointers, 1),
        authority = authority_expr(actor),
        delta = indent(&delta, 1),
        on_change = indent(&on_change, 1),
        net_guid = render_net_guid(actor),
        serialize = indent(&render_serialize_rpcs(actor, shared), 1),
        deserialize = indent(&render_deserialize_rpcs(actor, shared), 1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::tests::descriptor;
    use crate::property::{normalize_properties, normalize_rpcs};
    use replicator_reflection::{
        ClassKind, FieldDescriptor, PropertyAccess, PropertyDescriptor, PropertyType,
        RpcDescriptor, RpcKind,
    };

    fn character() -> ActorDescriptor {
        let mut actor = descriptor("Character", ClassKind::Actor);
        actor.properties = normalize_properties(
            &[
                PropertyDescriptor {
                    name: "Health".to_string(),
                    ty: PropertyType::Float,
                    access: PropertyAccess::Public,
                },
                PropertyDescriptor {
                    name: "Ammo".to_string(),
                    ty: PropertyType::Int32,
                    access: PropertyAccess::Protected,
                },
            ],
            true,
            1,
        );
        actor.rpcs = normalize_rpcs(
            &[
                RpcDescriptor {
                    name: "ServerFire".to_string(),
                    kind: RpcKind::Server,
                    reliable: true,
                    params: vec![FieldDescriptor {
                        name: "Power".to_string(),
                        ty: PropertyType::Float,
                    }],
                },
                RpcDescriptor {
                    name: "ClientReset".to_string(),
                    kind: RpcKind::Client,
                    reliable: false,
                    params: vec![],
                },
            ],
            "Character",
        );
        actor
    }

    #[test]
    fn test_header_declares_replicator() {
        let actor = character();
        let header = render_header(&actor, &RpcParamStructs::default());
        assert!(header.starts_with(BANNER));
        assert!(header.contains("#include \"Character.h\""));
        assert!(header.contains("#include \"Character.pb.h\""));
        assert!(header.contains("class FChanneldCharacterReplicator : public FChanneldReplicatorBase"));
        assert!(header.contains("namespace channeldcharacterreplicator_rpcparamstruct"));
        assert!(header.contains("\tstruct ServerFireParams\n"));
        assert!(header.contains("\tint32* AmmoPtr = nullptr;"));
        assert!(!header.contains("HealthPtr"));
        assert!(!header.contains("GetNetGUID"));
    }

    #[test]
    fn test_body_covers_properties_and_rpcs() {
        let actor = character();
        let body = render_body(&actor, &RpcParamStructs::default());
        assert!(body.contains("Actor->HasAuthority()"));
        assert!(body.contains("FindPropertyByName(FName(TEXT(\"Ammo\")))"));
        assert!(body.contains("Actor->Health != FullState->health()"));
        assert!(body.contains("(*AmmoPtr) = NewState->ammo();"));
        assert!(body.contains("channeldcharacterreplicator_rpcparamstruct::ServerFireParams* TypedParams"));
        assert!(body.contains("Msg->set_power(TypedParams->Power);"));
        assert!(body.contains("else if (Func->GetFName() == FName(\"ClientReset\"))"));
        assert!(body.contains("Params->Power = Msg.power();"));
    }

    #[test]
    fn test_component_and_game_state_override_net_guid() {
        let component = descriptor("Inventory", ClassKind::Component);
        let header = render_header(&component, &RpcParamStructs::default());
        let body = render_body(&component, &RpcParamStructs::default());
        assert!(header.contains("virtual uint32 GetNetGUID() override;"));
        assert!(header.contains("TWeakObjectPtr<AInventory> Component;"));
        assert!(body.contains("Component->GetOwner()->HasAuthority()"));
        assert!(body.contains("GuidCache->GetNetGUID(Component->GetOwner())"));

        let game_state = descriptor("Match", ClassKind::GameState);
        let body = render_body(&game_state, &RpcParamStructs::default());
        assert!(body.contains("uint32 FChanneldMatchReplicator::GetNetGUID()"));
        assert!(body.contains("\treturn 1;"));
    }
}
