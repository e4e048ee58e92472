//! Per-run context: header resolution and identifier assignment.

use crate::actor::{ActorDescriptor, REMOVED_FIELD_NUMBER};
use crate::error::{GenError, Result};
use crate::naming::{ArtifactNames, NameDeduplicator};
use crate::property::{normalize_properties, normalize_rpcs};
use crate::resolver::ModuleResolver;
use replicator_reflection::{ClassDescriptor, ReflectionProvider};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy)]
pub struct DescribeOptions {
    pub init_properties_and_rpcs: bool,
    pub dedupe: bool,
}

impl Default for DescribeOptions {
    fn default() -> Self {
        Self {
            init_properties_and_rpcs: true,
            dedupe: true,
        }
    }
}

impl DescribeOptions {
    /// Names and header only; nothing is recorded in the run.
    pub fn preview() -> Self {
        Self {
            init_properties_and_rpcs: false,
            dedupe: false,
        }
    }
}

/// State scoped to one generation run. Created fresh for every assembly
/// and dropped with it, so identifiers never leak between runs.
pub struct Run<'a> {
    provider: &'a dyn ReflectionProvider,
    resolver: ModuleResolver,
    names: NameDeduplicator,
}

impl<'a> Run<'a> {
    pub fn new(provider: &'a dyn ReflectionProvider, resolver: ModuleResolver) -> Self {
        Self {
            provider,
            resolver,
            names: NameDeduplicator::new(),
        }
    }

    pub fn provider(&self) -> &'a dyn ReflectionProvider {
        self.provider
    }

    pub fn describe(
        &mut self,
        class: &ClassDescriptor,
        schema_package: &str,
        go_package: &str,
        options: DescribeOptions,
    ) -> Result<ActorDescriptor> {
        if self.provider.is_ignored(class) {
            return Err(GenError::Ignored(class.path.clone()));
        }

        let native = self.native_ancestor(class)?;
        let target_cpp_type = native.cpp_name();
        let header = match self.resolver.resolve(&target_cpp_type) {
            Ok(location) => location.clone(),
            Err(GenError::NotFound(_)) => {
                return Err(GenError::HeaderNotFound {
                    class: class.path.clone(),
                })
            }
            Err(e) => return Err(e),
        };

        let id = if options.dedupe {
            self.names.assign(&class.name)
        } else {
            class.name.clone()
        };

        let mut descriptor = ActorDescriptor {
            names: ArtifactNames::for_id(&id),
            id,
            class_path: class.path.clone(),
            class_name: class.name.clone(),
            target_cpp_type,
            kind: class.kind,
            blueprint: class.blueprint,
            header,
            components: class.components.clone(),
            properties: Vec::new(),
            rpcs: Vec::new(),
            schema_package: schema_package.to_string(),
            go_package: go_package.to_string(),
        };

        if options.init_properties_and_rpcs {
            let first_field = if descriptor.has_removed_flag() {
                REMOVED_FIELD_NUMBER + 1
            } else {
                1
            };
            descriptor.properties =
                normalize_properties(&class.properties, !class.blueprint, first_field);
            descriptor.rpcs = normalize_rpcs(&class.rpcs, &descriptor.id);
        }

        tracing::debug!(
            class = %class.path,
            id = %descriptor.id,
            header = %descriptor.header.include_path,
            "class described"
        );
        Ok(descriptor)
    }

    /// The class itself when native, otherwise the closest native parent.
    fn native_ancestor<'c>(&self, class: &'c ClassDescriptor) -> Result<&'c ClassDescriptor>
    where
        'a: 'c,
    {
        let provider = self.provider;
        let mut current = class;
        let mut visited = HashSet::new();

        while current.blueprint {
            if !visited.insert(current.path.as_str()) {
                break;
            }
            match current.parent.as_deref().and_then(|p| provider.class(p)) {
                Some(parent) => current = parent,
                None => break,
            }
        }

        if current.blueprint {
            return Err(GenError::HeaderNotFound {
                class: class.path.clone(),
            });
        }
        Ok(current)
    }
}
