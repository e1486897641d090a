//! Log apply side of the replicated document.

pub mod applier;

pub use applier::ConfigApplier;
