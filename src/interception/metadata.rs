// src/interception/metadata.rs
//! Interceptor declarations attached to target types
//!
//! Two places can declare interceptor kinds for a type:
//!
//! - the type itself, through [`Intercepted`] (usually via
//!   [`declare_interceptors!`](crate::declare_interceptors))
//! - an external mapping of type name to kinds, such as the `declarations`
//!   section of the configuration ([`ConfiguredDeclarations`])

use crate::interception::engine::Target;
use crate::interception::registry::InterceptorKind;
use std::collections::HashMap;

/// A (target type, interceptor kind) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterceptorDeclaration {
    pub target_type: String,
    pub kind: InterceptorKind,
}

/// Declarative interceptor metadata on a target type
pub trait Intercepted: Target {
    /// Kinds declared on the type, in declaration order
    fn declared_interceptors() -> Vec<InterceptorKind> {
        Vec::new()
    }

    fn declarations() -> Vec<InterceptorDeclaration> {
        Self::declared_interceptors()
            .into_iter()
            .map(|kind| InterceptorDeclaration {
                target_type: Self::TYPE_NAME.to_string(),
                kind,
            })
            .collect()
    }
}

/// Declare the interceptor kinds of a target type.
///
/// ```ignore
/// declare_interceptors!(Calculator => ["logging", InterceptorKind::of::<AuditInterceptor>()]);
/// ```
#[macro_export]
macro_rules! declare_interceptors {
    ($target:ty => [$($kind:expr),* $(,)?]) => {
        impl $crate::interception::Intercepted for $target {
            fn declared_interceptors() -> Vec<$crate::interception::InterceptorKind> {
                vec![$($crate::interception::InterceptorKind::from($kind)),*]
            }
        }
    };
}

/// External source of declarations keyed by type name
pub trait MetadataSource: Send + Sync {
    fn declared_kinds(&self, type_name: &str) -> Vec<InterceptorKind>;
}

/// Declarations read from configuration; type names match case-insensitively
#[derive(Debug, Clone, Default)]
pub struct ConfiguredDeclarations {
    by_type: HashMap<String, Vec<InterceptorKind>>,
}

impl ConfiguredDeclarations {
    /// Type names differing only in case are merged, in sorted key order
    pub fn new(declarations: &HashMap<String, Vec<String>>) -> Self {
        let mut type_names: Vec<&String> = declarations.keys().collect();
        type_names.sort();

        let mut by_type: HashMap<String, Vec<InterceptorKind>> = HashMap::new();
        for type_name in type_names {
            by_type
                .entry(type_name.to_lowercase())
                .or_default()
                .extend(declarations[type_name].iter().map(|k| InterceptorKind::from(k.as_str())));
        }

        Self { by_type }
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

impl MetadataSource for ConfiguredDeclarations {
    fn declared_kinds(&self, type_name: &str) -> Vec<InterceptorKind> {
        self.by_type
            .get(&type_name.to_lowercase())
            .cloned()
            .unwrap_or_default()
    }
}
