//! Concurrency control and process-wide state: the callsite
//! micro-cache, the codegen/inference locks, and the tracer callback slots.
//!
//! Uses a `Lazy<RwLock<..>>`-style global-registry idiom, but instantiated
//! explicitly via `Runtime::new()` rather than hidden behind a `static`:
//! this is a library crate embedders construct, not a process-owned VM with
//! exactly one instance.

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use crate::config::{EngineConfig, N_CALL_CACHE};
use crate::method::MethodId;
use crate::tracer::Tracers;
use crate::types::JuliaType;

/// One slot of the per-callsite micro-cache: which typemap entry (by owning
/// method and cache key) was last found here, if any.
#[derive(Debug, Clone, Default)]
pub struct CacheSlot {
    pub entry: Option<(MethodId, Vec<JuliaType>)>,
}

/// Opaque token identifying a call site, supplied by the embedder. Stands
/// in for a return-address-derived fingerprint; this crate has no
/// return-address/unwind access, so the embedder is responsible for handing
/// back a stable identity per call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallsiteId(pub u64);

/// The per-callsite micro-cache: `N_CALL_CACHE` slots per distinct call
/// site, with a `pick_which` byte steering round-robin replacement across
/// the four-way rotation.
#[derive(Debug, Default)]
pub struct MicroCache {
    slots: HashMap<CallsiteId, [CacheSlot; N_CALL_CACHE]>,
    pick_which: HashMap<CallsiteId, Cell<u8>>,
}

impl MicroCache {
    /// Accept a slot only if its arity matches and every position is
    /// type-identical to the query — a slot is only ever installed from a
    /// pure-leaf cache entry, so full-tuple equality here is equivalent to a
    /// pointer-equality fast path once types are interned rather than
    /// structurally compared.
    pub fn lookup(&self, site: CallsiteId, query: &[JuliaType]) -> Option<&(MethodId, Vec<JuliaType>)> {
        let slots = self.slots.get(&site)?;
        slots
            .iter()
            .filter_map(|s| s.entry.as_ref())
            .find(|(_, sig)| sig.as_slice() == query)
    }

    /// Arity-only probe used where the caller doesn't have (or doesn't
    /// need) the full query, e.g. tests asserting a slot got populated.
    pub fn has_entry_of_arity(&self, site: CallsiteId, n: usize) -> bool {
        self.slots.get(&site).is_some_and(|slots| {
            slots
                .iter()
                .filter_map(|s| s.entry.as_ref())
                .any(|(_, sig)| sig.len() == n)
        })
    }

    /// Install `entry` into one of the four slots for `site`, chosen by the
    /// rotating `pick_which` counter.
    pub fn install(&mut self, site: CallsiteId, entry: (MethodId, Vec<JuliaType>)) {
        let slots = self.slots.entry(site).or_default();
        let which = self
            .pick_which
            .entry(site)
            .or_insert_with(|| Cell::new(0));
        let idx = (which.get() as usize) & (N_CALL_CACHE - 1);
        which.set(which.get().wrapping_add(1));
        slots[idx] = CacheSlot { entry: Some(entry) };
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.pick_which.clear();
    }

    /// Drop any slot whose cached method id appears in `shadowed` — the
    /// micro-cache's half of conflict-scoped invalidation;
    /// the table-level typemap cache does the rest.
    pub fn invalidate_methods(&mut self, shadowed: &[MethodId]) {
        for slots in self.slots.values_mut() {
            for slot in slots.iter_mut() {
                if let Some((id, _)) = &slot.entry {
                    if shadowed.contains(id) {
                        slot.entry = None;
                    }
                }
            }
        }
    }
}

/// Interning table standing in for a hash-consed type identity. `JuliaType`
/// here is a plain Rust enum (no hash-consing), so a pointer-equality fast
/// path is replaced with an interned `TypeId(u32)` identity test — see
/// `DESIGN.md` for the reasoning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub u32);

#[derive(Debug, Default)]
pub struct TypeInterner {
    table: Vec<JuliaType>,
}

impl TypeInterner {
    pub fn intern(&mut self, ty: &JuliaType) -> TypeId {
        if let Some(i) = self.table.iter().position(|t| t == ty) {
            return TypeId(i as u32);
        }
        self.table.push(ty.clone());
        TypeId((self.table.len() - 1) as u32)
    }
}

/// RAII guard for the signal-atomic section `table_insert` runs inside.
/// On this crate's target there are no POSIX signal handlers to race
/// against, so this reduces to holding the codegen mutex for the duration —
/// documented here rather than pretending to block real async-signal
/// delivery.
pub struct AtomicSection<'a> {
    _guard: std::sync::MutexGuard<'a, ()>,
}

/// Process-embeddable context for one dispatch engine instance: the
/// micro-cache, the two serializing locks, tracer callback slots, and the
/// type interner.
pub struct Runtime {
    pub config: EngineConfig,
    micro_cache: Mutex<MicroCache>,
    codegen_lock: Mutex<()>,
    typeinf_lock: Mutex<()>,
    pub(crate) tracers: RwLock<Tracers>,
    interner: Mutex<TypeInterner>,
    /// Set while any thread is inside `type_infer`, guarding against
    /// recursive entry into inference's own methods ().
    inferring: Mutex<bool>,
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            micro_cache: Mutex::new(MicroCache::default()),
            codegen_lock: Mutex::new(()),
            typeinf_lock: Mutex::new(()),
            tracers: RwLock::new(Tracers::default()),
            interner: Mutex::new(TypeInterner::default()),
            inferring: Mutex::new(false),
        }
    }

    pub fn micro_cache(&self) -> std::sync::MutexGuard<'_, MicroCache> {
        self.micro_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn atomic_section(&self) -> AtomicSection<'_> {
        AtomicSection {
            _guard: self
                .codegen_lock
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        }
    }

    pub fn codegen_lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.codegen_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn typeinf_lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.typeinf_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn intern(&self, ty: &JuliaType) -> TypeId {
        self.interner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .intern(ty)
    }

    pub(crate) fn inferring_flag(&self) -> std::sync::MutexGuard<'_, bool> {
        self.inferring
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
