//! fnplan-resolve — turns a `DeploymentConfig` into a `ResolvedDescriptor`.
//!
//! Each concern is a small pure resolver that can be tested on its own;
//! `FunctionAssembler` runs them in order and merges the results.
//!
//! # Resolution order
//!
//! ```text
//! entry → network → identity (if a log destination is set)
//!       → concurrency → observability → merge
//! ```
//!
//! The first failing rule aborts assembly with a typed `ConfigError`.
//! Named-lookup destinations stay deferred unless a `ParameterStore` is
//! attached to the assembler.

pub mod assembler;
pub mod concurrency;
pub mod entry;
pub mod identity;
pub mod network;
pub mod observability;
pub mod report;

pub use assembler::FunctionAssembler;
pub use concurrency::compose_concurrency;
pub use entry::{EntryLocator, FsEntryLocator, StaticEntryLocator, resolve_entry};
pub use identity::{InMemoryParameterStore, ParameterStore, Resolve, materialize};
pub use network::resolve_network;
pub use observability::compose_observability;
