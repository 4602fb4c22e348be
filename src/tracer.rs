//! Tracer callbacks and diagnostics.
//!
//! Redefinition and ambiguity warnings go through a pluggable
//! `DiagnosticSink`, following the same env-gated
//! `dispatch_debug_log`/`SJULIA_DISPATCH_DEBUG`-shaped pattern rather than
//! reaching for a logging framework.

use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

use crate::method::{Method, MethodId};

/// Where diagnostic text goes. The default implementation writes to stderr,
/// matching `dispatch_debug_log`'s behavior; embedders can swap in their own
/// sink (collecting warnings into a buffer for tests, routing through their
/// own logger, etc).
pub trait DiagnosticSink: Send + Sync {
    fn warn(&self, message: &str);
}

/// Stderr sink, gated the same way `SJULIA_DISPATCH_DEBUG` is gated: an env
/// var checked once via `OnceLock`, not a logging framework.
#[derive(Debug, Default)]
pub struct StderrSink;

fn dispatch_tracing_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var("GF_DISPATCH_DEBUG").is_ok())
}

impl DiagnosticSink for StderrSink {
    fn warn(&self, message: &str) {
        if dispatch_tracing_enabled() {
            eprintln!("{message}");
        }
    }
}

/// Signature formatting shared by redefinition/ambiguity diagnostics.
pub fn format_sig(name: &str, sig: &[crate::types::JuliaType]) -> String {
    let params: Vec<_> = sig.iter().map(|t| format!("::{t}")).collect();
    format!("{name}({})", params.join(", "))
}

pub fn redefinition_warning(name: &str, sig: &[crate::types::JuliaType], at: &str) -> String {
    format!(
        "WARNING: Method definition {} overwritten at {}.",
        format_sig(name, sig),
        at
    )
}

pub fn ambiguity_warning(
    name: &str,
    a: &[crate::types::JuliaType],
    b: &[crate::types::JuliaType],
) -> String {
    format!(
        "WARNING: {} is ambiguous with {}.",
        format_sig(name, a),
        format_sig(name, b)
    )
}

type MethodCallback = Box<dyn Fn(MethodId) + Send + Sync>;
type LinfoCallback = Box<dyn Fn(MethodId, &[crate::types::JuliaType]) + Send + Sync>;

/// The three callback slots named in method-creation,
/// linfo-creation, linfo-compile.
#[derive(Default)]
pub struct Tracers {
    pub on_method_created: Vec<MethodCallback>,
    pub on_linfo_created: Vec<LinfoCallback>,
    pub on_linfo_compiled: Vec<LinfoCallback>,
    pub sink: Option<Box<dyn DiagnosticSink>>,
}

impl Tracers {
    fn sink_warn(&self, message: &str) {
        match &self.sink {
            Some(s) => s.warn(message),
            None => StderrSink.warn(message),
        }
    }

    /// Run every registered method-creation callback under
    /// `catch_unwind` ( a callback panic is caught, reported, and
    /// swallowed — this crate's rendition of `JL_TRY/JL_CATCH` around
    /// embedder-supplied closures).
    pub fn fire_method_created(&self, id: MethodId) {
        for cb in &self.on_method_created {
            if panic::catch_unwind(AssertUnwindSafe(|| cb(id))).is_err() {
                self.sink_warn(&format!("tracer callback panicked for method {}", id.0));
            }
        }
    }

    pub fn fire_linfo_created(&self, id: MethodId, spec_types: &[crate::types::JuliaType]) {
        for cb in &self.on_linfo_created {
            if panic::catch_unwind(AssertUnwindSafe(|| cb(id, spec_types))).is_err() {
                self.sink_warn(&format!(
                    "tracer callback panicked for specialization of method {}",
                    id.0
                ));
            }
        }
    }

    pub fn fire_linfo_compiled(&self, id: MethodId, spec_types: &[crate::types::JuliaType]) {
        for cb in &self.on_linfo_compiled {
            if panic::catch_unwind(AssertUnwindSafe(|| cb(id, spec_types))).is_err() {
                self.sink_warn(&format!(
                    "tracer callback panicked compiling specialization of method {}",
                    id.0
                ));
            }
        }
    }

    pub fn warn(&self, message: &str) {
        self.sink_warn(message);
    }
}

/// RAII guard for `in_pure_callback`: asserted for the duration of a tracer
/// invocation so reentrant dispatch inside a callback can tell it must not
/// mutate the table. Releases on `Drop` so a callback panic unwinding
/// through still restores the flag.
pub struct PureCallbackGuard<'a> {
    flag: &'a std::sync::atomic::AtomicBool,
}

impl<'a> PureCallbackGuard<'a> {
    pub fn enter(flag: &'a std::sync::atomic::AtomicBool) -> Self {
        flag.store(true, std::sync::atomic::Ordering::SeqCst);
        Self { flag }
    }
}

impl Drop for PureCallbackGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, std::sync::atomic::Ordering::SeqCst);
    }
}

/// Mark/unmark a method as traced (`trace_method`/`untrace_method`,).
pub fn trace_method(method: &Method) {
    method.traced.set(true);
}

pub fn untrace_method(method: &Method) {
    method.traced.set(false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JuliaType;

    #[test]
    fn callback_panic_is_caught_and_does_not_propagate() {
        let mut tracers = Tracers::default();
        tracers
            .on_method_created
            .push(Box::new(|_id| panic!("boom")));
        // Should not unwind out of this call.
        tracers.fire_method_created(MethodId(0));
    }

    #[test]
    fn redefinition_warning_mentions_signature() {
        let msg = redefinition_warning("f", &[JuliaType::Int64], "repl:1");
        assert!(msg.contains("f(::Int64)"));
    }
}
