//! Read-only access to reflected classes

use crate::error::ReflectionError;
use crate::types::ClassDescriptor;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Source of class metadata for a generation run.
pub trait ReflectionProvider {
    /// Look up a class by its reference (class path).
    fn class(&self, path: &str) -> Option<&ClassDescriptor>;

    /// Whether the class was excluded from replicator generation.
    fn is_ignored(&self, class: &ClassDescriptor) -> bool;
}

/// Classes excluded from generation, by exact reference or by path pattern.
///
/// Patterns use `*` as a wildcard and must match the whole class path.
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    classes: HashSet<String>,
    patterns: Vec<Regex>,
}

impl IgnoreList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, path: impl Into<String>) -> Self {
        self.classes.insert(path.into());
        self
    }

    pub fn with_path_pattern(mut self, pattern: &str) -> Result<Self, ReflectionError> {
        self.patterns.push(glob_to_regex(pattern)?);
        Ok(self)
    }

    pub fn contains(&self, class: &ClassDescriptor) -> bool {
        self.classes.contains(&class.path) || self.patterns.iter().any(|p| p.is_match(&class.path))
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.patterns.is_empty()
    }
}

fn glob_to_regex(pattern: &str) -> Result<Regex, ReflectionError> {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("^{}$", body)).map_err(|source| ReflectionError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// In-memory provider backed by an exported reflection snapshot.
#[derive(Debug, Clone, Default)]
pub struct ReflectionSnapshot {
    classes: Vec<ClassDescriptor>,
    index: HashMap<String, usize>,
    ignore: IgnoreList,
}

impl ReflectionSnapshot {
    pub fn new(classes: Vec<ClassDescriptor>) -> Result<Self, ReflectionError> {
        let mut index = HashMap::with_capacity(classes.len());
        for (i, class) in classes.iter().enumerate() {
            if index.insert(class.path.clone(), i).is_some() {
                return Err(ReflectionError::DuplicateClass(class.path.clone()));
            }
        }

        Ok(Self {
            classes,
            index,
            ignore: IgnoreList::default(),
        })
    }

    pub fn with_ignore_list(mut self, ignore: IgnoreList) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn classes(&self) -> &[ClassDescriptor] {
        &self.classes
    }

    /// Class references in snapshot order.
    pub fn class_paths(&self) -> Vec<String> {
        self.classes.iter().map(|c| c.path.clone()).collect()
    }

    /// Find a class by reference, C++ name or bare name, in that order.
    pub fn find(&self, name: &str) -> Option<&ClassDescriptor> {
        self.class(name).or_else(|| {
            self.classes
                .iter()
                .find(|c| c.cpp_name() == name)
                .or_else(|| self.classes.iter().find(|c| c.name == name))
        })
    }
}

impl ReflectionProvider for ReflectionSnapshot {
    fn class(&self, path: &str) -> Option<&ClassDescriptor> {
        self.index.get(path).map(|&i| &self.classes[i])
    }

    fn is_ignored(&self, class: &ClassDescriptor) -> bool {
        self.ignore.contains(class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClassKind;

    fn class(name: &str, path: &str) -> ClassDescriptor {
        ClassDescriptor {
            name: name.to_string(),
            cpp_prefix: "A".to_string(),
            path: path.to_string(),
            package: String::new(),
            module: None,
            parent: None,
            kind: ClassKind::Actor,
            blueprint: false,
            properties: vec![],
            rpcs: vec![],
            components: vec![],
        }
    }

    #[test]
    fn test_ignore_by_exact_reference() {
        let ignore = IgnoreList::new().with_class("/Script/Game.Door");
        assert!(ignore.contains(&class("Door", "/Script/Game.Door")));
        assert!(!ignore.contains(&class("Window", "/Script/Game.Window")));
    }

    #[test]
    fn test_ignore_by_path_pattern() {
        let ignore = IgnoreList::new()
            .with_path_pattern("/Game/Test/*")
            .expect("pattern should compile");
        assert!(ignore.contains(&class("BP_Probe_C", "/Game/Test/BP_Probe.BP_Probe_C")));
        assert!(!ignore.contains(&class("BP_Door_C", "/Game/Maps/BP_Door.BP_Door_C")));
    }

    #[test]
    fn test_pattern_metacharacters_are_literal() {
        let ignore = IgnoreList::new()
            .with_path_pattern("/Script/Game.Door")
            .expect("pattern should compile");
        assert!(!ignore.contains(&class("Door", "/Script/GameXDoor")));
    }

    #[test]
    fn test_snapshot_rejects_duplicate_paths() {
        let result = ReflectionSnapshot::new(vec![
            class("Door", "/Script/Game.Door"),
            class("Door", "/Script/Game.Door"),
        ]);
        assert!(matches!(result, Err(ReflectionError::DuplicateClass(p)) if p == "/Script/Game.Door"));
    }

    #[test]
    fn test_snapshot_find() {
        let snapshot = ReflectionSnapshot::new(vec![class("Door", "/Script/Game.Door")])
            .expect("snapshot should build");
        assert!(snapshot.find("/Script/Game.Door").is_some());
        assert!(snapshot.find("ADoor").is_some());
        assert!(snapshot.find("Door").is_some());
        assert!(snapshot.find("Window").is_none());
    }
}
