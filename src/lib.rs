//! Multiple-dispatch method table and specialization engine.
//!
//! Given a generic function name and a tuple of runtime argument types,
//! [`dispatch::apply_generic`] selects the most-specific matching method,
//! instantiates (and caches) a specialized variant, and returns it. The
//! [`method_table::MethodTable`] maintains table consistency as new
//! definitions arrive — ambiguity detection, redefinition warnings, and
//! cache invalidation all happen at insertion time
//! ([`method_table::MethodTable::table_insert`]).
//!
//! Modules are layered leaves-first: `types` is the subtype-lattice facade
//! everything else builds on; `method`/`typemap`/`specialization` hold the
//! data model; `method_table` and `dispatch` are the hot path; `inference`,
//! `precompile`, and `tracer` are the surrounding services; `runtime` ties
//! the concurrency primitives together into one embeddable context.

pub mod config;
pub mod dispatch;
pub mod inference;
pub mod method;
pub mod method_table;
pub mod precompile;
pub mod runtime;
pub mod specialization;
pub mod tracer;
pub mod typemap;
pub mod types;

pub use config::{CompileMode, EngineConfig};
pub use dispatch::{apply_generic, arg_type_tuple, invoke, Resolved, TypedValue};
pub use method::{Method, MethodId};
pub use method_table::{InsertOutcome, MethodTable};
pub use runtime::{CallsiteId, Runtime};
pub use specialization::{CodeHandle, LambdaInfo};
pub use types::{JuliaType, MethodError};
