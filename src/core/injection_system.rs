//! # Injection System
//!
//! This module provides a type-keyed registry for the collaborators the chunk
//! pipeline depends on but does not own: the terrain generator and the buffer
//! device. Collaborators are registered once at startup and resolved when the
//! engine is built; a missing collaborator is a fatal startup error rather than a
//! panic deep inside a worker thread.
//!
//! ## Usage
//! ```
//! use std::sync::Arc;
//! use voxel_chunk_engine::core::injection_system::MtInjectionSystem;
//!
//! let injector = MtInjectionSystem::new();
//! injector.insert(42u32);
//!
//! let value: Arc<u32> = injector.get::<u32>().unwrap();
//! assert_eq!(*value, 42);
//! assert!(injector.get::<String>().is_err());
//! ```

use super::MtResource;
use crate::engine_state::error::EngineError;
use std::{
    any::{type_name, Any, TypeId},
    collections::HashMap,
    sync::Arc,
};

/// A thread-safe dependency injection container for pipeline collaborators.
///
/// `MtInjectionSystem` stores one value per type. Trait-object collaborators are
/// registered as `Arc<dyn Trait>` values, which makes the concrete implementation
/// swappable without the engine knowing about it.
///
/// Clones share the same underlying registry.
pub struct MtInjectionSystem {
    systems: MtResource<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl MtInjectionSystem {
    /// Creates a new, empty `MtInjectionSystem`.
    pub fn new() -> Self {
        Self {
            systems: MtResource::new(HashMap::new()),
        }
    }

    /// Inserts a new system into the container.
    ///
    /// If a system of the same type already exists, it will be replaced.
    ///
    /// # Returns
    /// A shared handle to the inserted system
    pub fn insert<T: Send + Sync + 'static>(&self, system: T) -> Arc<T> {
        let system = Arc::new(system);
        let erased: Arc<dyn Any + Send + Sync> = system.clone();
        self.systems.get_mut().insert(TypeId::of::<T>(), erased);
        log::debug!("Registered collaborator {}", type_name::<T>());

        system
    }

    /// Retrieves a system of type `T` from the container.
    ///
    /// # Returns
    /// The shared handle, or `EngineError::MissingCollaborator` naming the type
    pub fn get<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, EngineError> {
        let system = self
            .systems
            .get()
            .get(&TypeId::of::<T>())
            .cloned()
            .ok_or(EngineError::MissingCollaborator(type_name::<T>()))?;

        system
            .downcast::<T>()
            .map_err(|_| EngineError::MissingCollaborator(type_name::<T>()))
    }

    /// Whether a system of type `T` has been registered.
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.systems.get().contains_key(&TypeId::of::<T>())
    }
}

impl Default for MtInjectionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MtInjectionSystem {
    fn clone(&self) -> Self {
        Self {
            systems: self.systems.clone(),
        }
    }
}
