//! Generated identifiers and the artifact naming convention.
//!
//! Other tooling relies on these names: a replicator for identifier `X`
//! always lives in `ChanneldXReplicator.h` / `ChanneldXReplicator.cpp` and
//! its schema in `X.proto`, which protoc turns into `X.pb.h` / `X.pb.cc`.

use replicator_reflection::utils::is_identifier;
use std::collections::{HashMap, HashSet};

pub const HEADER_EXTENSION: &str = ".h";
pub const BODY_EXTENSION: &str = ".cpp";
pub const SCHEMA_EXTENSION: &str = ".proto";
pub const PB_HEADER_EXTENSION: &str = ".pb.h";
pub const PB_BODY_EXTENSION: &str = ".pb.cc";

pub const TYPE_DEFINITIONS_HEADER_FILE: &str = "ChanneldReplicatorTypes.h";
pub const TYPE_DEFINITIONS_BODY_FILE: &str = "ChanneldReplicatorTypes.cpp";
pub const REGISTRATION_HEADER_FILE: &str = "ChanneldReplicatorRegistration.h";
pub const GLOBAL_STRUCT_HEADER_FILE: &str = "ChanneldGlobalStructs.h";
pub const GLOBAL_STRUCT_SCHEMA_FILE: &str = "ChanneldGlobalStructs.proto";
pub const UNREAL_COMMON_SCHEMA_FILE: &str = "unreal_common.proto";

/// Pattern matching generated replicator headers; group 1 is the identifier.
pub const REPLICATOR_HEADER_PATTERN: &str = r"^Channeld(\w+)Replicator\.h$";

/// Hands out collision-free identifiers for one generation run.
///
/// First occurrences of a legal identifier are returned unchanged. Repeats
/// get `_1`, `_2`, ... per base name. Names that are not legal identifiers
/// are replaced by `_IllegalClassName_{n}_` with a run-wide counter.
///
/// Names are compared case-insensitively: channel data fields lowercase the
/// identifier, and file names must not clash on case-insensitive disks.
#[derive(Debug, Default)]
pub struct NameDeduplicator {
    taken: HashSet<String>,
    counters: HashMap<String, u32>,
    illegal_count: u32,
}

impl NameDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, base_name: &str) -> String {
        if !is_identifier(base_name) {
            loop {
                self.illegal_count += 1;
                let candidate = format!("_IllegalClassName_{}_", self.illegal_count);
                if self.take(&candidate) {
                    return candidate;
                }
            }
        }

        if self.take(base_name) {
            return base_name.to_string();
        }

        let mut counter = self.counters.get(base_name).copied().unwrap_or(0);
        let assigned = loop {
            counter += 1;
            let candidate = format!("{}_{}", base_name, counter);
            if self.take(&candidate) {
                break candidate;
            }
        };
        self.counters.insert(base_name.to_string(), counter);
        assigned
    }

    fn take(&mut self, name: &str) -> bool {
        self.taken.insert(name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}

/// Every name derived from a generated identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    pub replicator_class: String,
    pub header_file: String,
    pub body_file: String,
    pub schema_file: String,
    pub pb_header_file: String,
    pub state_message: String,
    pub class_path_var: String,
    pub rpc_param_namespace: String,
}

impl ArtifactNames {
    pub fn for_id(id: &str) -> Self {
        let stem = replicator_stem(id);
        Self {
            replicator_class: format!("F{}", stem),
            header_file: format!("{}{}", stem, HEADER_EXTENSION),
            body_file: format!("{}{}", stem, BODY_EXTENSION),
            schema_file: format!("{}{}", id, SCHEMA_EXTENSION),
            pb_header_file: format!("{}{}", id, PB_HEADER_EXTENSION),
            state_message: format!("{}State", id),
            class_path_var: format!("ChanneldClassPath_{}", id),
            rpc_param_namespace: format!("{}_rpcparamstruct", stem).to_lowercase(),
        }
    }
}

fn replicator_stem(id: &str) -> String {
    format!("Channeld{}Replicator", id)
}

/// The five files generated (directly or by protoc) for one class.
pub fn generated_files_for(id: &str) -> [String; 5] {
    let stem = replicator_stem(id);
    [
        format!("{}{}", stem, BODY_EXTENSION),
        format!("{}{}", stem, HEADER_EXTENSION),
        format!("{}{}", id, SCHEMA_EXTENSION),
        format!("{}{}", id, PB_HEADER_EXTENSION),
        format!("{}{}", id, PB_BODY_EXTENSION),
    ]
}

/// Identifier-safe form of a module name, for C++ and protobuf symbols.
pub fn module_symbol(module_name: &str) -> String {
    let symbol: String = module_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if symbol.starts_with(|c: char| c.is_ascii_digit()) || symbol.is_empty() {
        format!("_{}", symbol)
    } else {
        symbol
    }
}

pub fn channel_data_header_file(module_name: &str) -> String {
    format!("ChannelData_{}{}", module_name, HEADER_EXTENSION)
}

pub fn channel_data_schema_file(module_name: &str) -> String {
    format!("ChannelData_{}{}", module_name, SCHEMA_EXTENSION)
}
