//! Text renderers. Each output format has one function taking descriptor
//! data and returning the file contents; nothing here touches the disk.

pub mod channel_data;
pub mod proto;
pub mod replicator;
pub mod shared;

pub use shared::RpcParamStructs;

/// First line of every generated file; C++ and protobuf share the comment syntax.
pub const BANNER: &str = "// Generated by the ChanneldUE replicator generator. Do not edit.\n";

pub(crate) fn include_line(path: &str) -> String {
    format!("#include \"{}\"\n", path)
}
