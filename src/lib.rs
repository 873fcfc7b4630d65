//! # Pooled Connection Factory Compiler
//!
//! Compiles a declarative pooled JMS connection factory definition into the
//! configuration graph a JCA-style resource-adapter runtime activates:
//! direction-partitioned config properties, a transport descriptor and a
//! connection pool descriptor.
//!
//! The compiler is a pure, synchronous transformation. Named references
//! (connectors, discovery groups, credential references) are answered by
//! resolver traits injected at construction, so the same compiler runs
//! against a live broker registry or test fakes.
//!
//! ## Pipeline
//!
//! 1. **Validation**: transport selection and option names are checked
//!    against the [`AttributeSchema`](core::AttributeSchema) before any
//!    resolver is consulted.
//! 2. **Transport**: connectors or a discovery group become
//!    `connector-classname` / `connection-parameters` or discovery properties.
//! 3. **Pool**: pool bounds and transaction support select a plain or XA pool
//!    with fixed flush, validation and recovery policies.
//! 4. **Properties**: options are partitioned into generic, inbound and
//!    outbound lists in schema order, with a finite reconnect default.
//! 5. **Credentials**: a credential reference is resolved into `password`.
//!
//! ```rust,ignore
//! use pooled_cf_compiler::core::{Compiler, ConnectionFactorySpec, ConnectorConfig};
//! use pooled_cf_compiler::infra::InMemoryRegistry;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(InMemoryRegistry::new());
//! registry.register_connector("in-vm", ConnectorConfig::new("org.InVM").with_param("serverId", "0"));
//!
//! let compiler = Compiler::new(registry.clone(), registry.clone(), registry);
//! let spec = ConnectionFactorySpec::new("activemq-ra")
//!     .with_entries(["java:/JmsXA"])
//!     .with_connectors(["in-vm"])
//!     .with_transaction("xa");
//! let compiled = compiler.compile(&spec)?;
//! assert!(compiled.pool.is_xa());
//! ```
//!
//! Whole configuration documents compile with
//! [`compile_factories`](builders::compile_factories).

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Attribute schema, data model, resolvers and the compiler facade.
pub mod core;
/// Configuration documents for connectors, discovery groups and factories.
pub mod config;
/// Builders for transport, pool and property sections.
pub mod builders;
/// Infrastructure adapters implementing the resolver traits.
pub mod infra;
/// Shared utilities.
pub mod util;

pub use crate::core::{CompileError, CompiledResult, Compiler, ConnectionFactorySpec};
