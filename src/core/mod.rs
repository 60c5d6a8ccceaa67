//! # Core Module
//!
//! This module provides the concurrency primitives shared by every part of the
//! chunk pipeline.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking
//! - `MtInjectionSystem`: Thread-safe registry for pipeline collaborators
//!
//! ## Usage
//! ```
//! use voxel_chunk_engine::core::{injection_system::MtInjectionSystem, MtResource};
//!
//! let counter = MtResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//!
//! let injector = MtInjectionSystem::new();
//! injector.insert(42u32);
//! assert_eq!(*injector.get::<u32>().unwrap(), 42);
//! ```

pub mod injection_system;
pub mod mt_resource;

pub use mt_resource::MtResource;
