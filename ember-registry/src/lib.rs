//! Block states and their light properties.

pub mod blocks;
pub mod vanilla_blocks;

pub use blocks::*;

/// Registries that stop accepting entries once the world is running.
pub trait RegistryExt {
    /// Freezes the registry. Registering afterwards panics.
    fn freeze(&mut self);
}
