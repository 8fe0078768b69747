//! Component identity and the factory registry for the Harrier agent.
//!
//! Defines the closed set of component kinds, the `type[/instance]` ID
//! scheme, the [`Factory`] contract (default config + validation per
//! component type), and the build-once [`FactoryRegistry`] with aggregated
//! duplicate detection.
//!
//! The registry is an explicit object passed by reference to every
//! consumer (there is no global factory list), so tests can assemble a
//! registry from a minimal fake component set.

pub mod error;
pub mod factory;
pub mod id;
pub mod registry;

pub use error::{ComponentError, DuplicateFactory, RegistryError, Result};
pub use factory::{Factory, InvalidConfig};
pub use id::{ComponentId, ComponentKind, SignalType};
pub use registry::{FactoryLists, FactoryRegistry};
