//! Normalized per-class view used by every renderer.

use crate::naming::ArtifactNames;
use crate::property::{uses_global_structs, uses_unreal_common, ReplicatedProperty, ReplicatedRpc};
use crate::resolver::HeaderLocation;
use replicator_reflection::{ClassKind, FieldDescriptor, PropertyType};

/// Proto field number of the `removed` flag, when present.
pub const REMOVED_FIELD_NUMBER: u32 = 1;

#[derive(Debug, Clone)]
pub struct ActorDescriptor {
    /// Generated identifier, unique within the run.
    pub id: String,
    pub class_path: String,
    /// Engine name, e.g. `BP_Door_C`.
    pub class_name: String,
    /// C++ type the replicator casts its target to. For blueprint classes
    /// this is the nearest native ancestor.
    pub target_cpp_type: String,
    pub kind: ClassKind,
    pub blueprint: bool,
    pub header: HeaderLocation,
    /// Owned component class references.
    pub components: Vec<String>,
    pub properties: Vec<ReplicatedProperty>,
    pub rpcs: Vec<ReplicatedRpc>,
    pub names: ArtifactNames,
    pub schema_package: String,
    pub go_package: String,
}

impl ActorDescriptor {
    pub fn is_singleton(&self) -> bool {
        self.kind == ClassKind::GameState
    }

    pub fn is_component(&self) -> bool {
        self.kind == ClassKind::Component
    }

    /// Non-singleton components and component owners carry a `removed`
    /// flag; channel data uses it to drop entries.
    pub fn has_removed_flag(&self) -> bool {
        !self.is_singleton() && (self.is_component() || !self.components.is_empty())
    }

    /// Variable holding the replicated instance in generated code.
    pub fn instance_name(&self) -> &'static str {
        if self.is_component() {
            "Component"
        } else {
            "Actor"
        }
    }

    pub fn world_expr(&self) -> String {
        format!("{}->GetWorld()", self.instance_name())
    }

    /// Field of the channel-data message that stores this class's state.
    pub fn channel_data_field(&self) -> String {
        let suffix = if self.is_singleton() { "" } else { "s" };
        format!("{}{}", self.names.state_message, suffix).to_lowercase()
    }

    /// C++ condition selecting this class in the channel-data processor.
    pub fn target_condition(&self) -> String {
        if self.blueprint {
            format!(
                "ChanneldReplication::FindReplicatorStateInProto(TargetClass)->TargetClassPathFName == {}",
                self.names.class_path_var
            )
        } else {
            format!("TargetClass == {}::StaticClass()", self.target_cpp_type)
        }
    }

    pub fn class_path_declaration(&self) -> String {
        format!("extern const FName {};", self.names.class_path_var)
    }

    pub fn class_path_definition(&self) -> String {
        format!(
            "const FName {} = FName(\"{}\");",
            self.names.class_path_var, self.class_path
        )
    }

    pub fn uses_unreal_common(&self) -> bool {
        self.property_types().any(uses_unreal_common)
    }

    pub fn uses_global_structs(&self) -> bool {
        self.property_types().any(uses_global_structs)
    }

    /// Struct types referenced by properties and RPC parameters, outermost
    /// first, in declaration order. May contain repeats.
    pub fn struct_types(&self) -> Vec<(&str, &[FieldDescriptor])> {
        self.property_types().flat_map(|ty| ty.structs()).collect()
    }

    fn property_types(&self) -> impl Iterator<Item = &PropertyType> {
        self.properties
            .iter()
            .map(|p| &p.ty)
            .chain(self.rpcs.iter().flat_map(|r| r.params.iter().map(|p| &p.ty)))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::PathBuf;

    pub(crate) fn descriptor(id: &str, kind: ClassKind) -> ActorDescriptor {
        ActorDescriptor {
            id: id.to_string(),
            class_path: format!("/Script/Game.{}", id),
            class_name: id.to_string(),
            target_cpp_type: format!("A{}", id),
            kind,
            blueprint: false,
            header: HeaderLocation {
                module: "Game".to_string(),
                path: PathBuf::from(format!("/proj/Source/Game/Public/{}.h", id)),
                include_path: format!("{}.h", id),
            },
            components: vec![],
            properties: vec![],
            rpcs: vec![],
            names: ArtifactNames::for_id(id),
            schema_package: "gamepb".to_string(),
            go_package: "example.com/game/gamepb".to_string(),
        }
    }

    #[test]
    fn test_channel_data_field() {
        assert_eq!(
            descriptor("Door", ClassKind::Actor).channel_data_field(),
            "doorstates"
        );
        assert_eq!(
            descriptor("MatchState", ClassKind::GameState).channel_data_field(),
            "matchstatestate"
        );
    }

    #[test]
    fn test_removed_flag() {
        assert!(!descriptor("Door", ClassKind::Actor).has_removed_flag());
        assert!(descriptor("Hinge", ClassKind::Component).has_removed_flag());

        let mut owner = descriptor("Door", ClassKind::Actor);
        owner.components.push("/Script/Game.Hinge".to_string());
        assert!(owner.has_removed_flag());

        let mut game_state = descriptor("Match", ClassKind::GameState);
        game_state.components.push("/Script/Game.Hinge".to_string());
        assert!(!game_state.has_removed_flag());
    }

    #[test]
    fn test_target_condition() {
        let native = descriptor("Door", ClassKind::Actor);
        assert_eq!(native.target_condition(), "TargetClass == ADoor::StaticClass()");

        let mut blueprint = descriptor("BP_Door_C", ClassKind::Actor);
        blueprint.blueprint = true;
        assert!(blueprint
            .target_condition()
            .ends_with("TargetClassPathFName == ChanneldClassPath_BP_Door_C"));
        assert_eq!(
            blueprint.class_path_definition(),
            "const FName ChanneldClassPath_BP_Door_C = FName(\"/Script/Game.BP_Door_C\");"
        );
    }
}
