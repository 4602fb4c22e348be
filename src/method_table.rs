//! The method table: holds a generic function's definitions, its
//! dispatch cache, and `max_args`.
//!
//! `table_insert`'s equal-signature overwrite path replaces the definition
//! in place (`self.methods[pos] = sig`), generalized with ambiguity-graph
//! bookkeeping and conflict-scoped cache invalidation in place of a blunt
//! full `dispatch_cache.borrow_mut().clear()` on every redefinition.

use crate::method::signature::{cache_method, sig_intersect};
use crate::method::{ambiguity, Method, MethodId};
use crate::runtime::Runtime;
use crate::tracer::redefinition_warning;
use crate::typemap::{MatchMode, Typemap, TypemapEntry, TypemapPayload};
use crate::types::JuliaType;

/// Report handed back from `table_insert` for the caller (or tests) to
/// inspect without re-deriving it.
#[derive(Debug, Default)]
pub struct InsertOutcome {
    pub id: MethodId,
    pub overwrote: Option<MethodId>,
    pub shadowed: Vec<MethodId>,
    pub new_ambiguities: Vec<(MethodId, MethodId)>,
}

pub struct MethodTable {
    pub name: String,
    pub module: String,
    methods: Vec<Method>,
    cache: Typemap,
    pub max_args: usize,
    pub kwsorter: Option<Box<MethodTable>>,
}

impl MethodTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: String::from("Main"),
            methods: Vec::new(),
            cache: Typemap::new(),
            max_args: 0,
            kwsorter: None,
        }
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn method(&self, id: MethodId) -> &Method {
        &self.methods[id.0]
    }

    pub fn method_mut(&mut self, id: MethodId) -> &mut Method {
        &mut self.methods[id.0]
    }

    /// `table_insert(MT, method, simplesig)`.
    pub fn table_insert(&mut self, runtime: &Runtime, method: Method) -> InsertOutcome {
        let _atomic = runtime.atomic_section();

        let existing_equal = self
            .methods
            .iter()
            .position(|m| m.sig == method.sig && m.tvars == method.tvars);

        let (id, overwrote) = if let Some(pos) = existing_equal {
            let old_ambig = std::mem::take(&mut self.methods[pos].ambig);
            let mut new_method = method;
            new_method.ambig = old_ambig;
            self.methods[pos] = new_method;
            runtime.tracers.read().unwrap_or_else(|p| p.into_inner()).warn(&redefinition_warning(
                &self.name,
                &self.methods[pos].sig,
                "redefinition",
            ));
            (MethodId(pos), Some(MethodId(pos)))
        } else {
            self.methods.push(method);
            (MethodId(self.methods.len() - 1), None)
        };

        let (shadowed, new_ambiguities) = if overwrote.is_some() {
            (vec![id], Vec::new())
        } else {
            let existing: Vec<(MethodId, &[JuliaType])> = self
                .methods
                .iter()
                .enumerate()
                .filter(|(i, _)| MethodId(*i) != id)
                .map(|(i, m)| (MethodId(i), m.sig.as_slice()))
                .collect();
            let report = ambiguity::record_insertion(id, &self.methods[id.0].sig, &existing);
            for (a, b) in &report.new_ambiguities {
                ambiguity::link_ambiguous(&mut self.methods, *a, *b);
            }
            (report.shadowed, report.new_ambiguities)
        };

        self.invalidate_conflicting(&shadowed, &self.methods[id.0].sig.clone());
        runtime.micro_cache().invalidate_methods(&shadowed);

        let new_sig = &self.methods[id.0].sig;
        let arity = if matches!(new_sig.last(), Some(JuliaType::Vararg(_, _))) {
            new_sig.len().saturating_sub(1)
        } else {
            new_sig.len()
        };
        self.max_args = self.max_args.max(arity);

        InsertOutcome {
            id,
            overwrote,
            shadowed,
            new_ambiguities,
        }
    }

    /// Remove cache entries whose payload method is shadowed and whose
    /// cached signature intersects the newly inserted signature — a
    /// conflict-scoped replacement for an unconditional whole-cache clear.
    fn invalidate_conflicting(&mut self, shadowed: &[MethodId], new_sig: &[JuliaType]) {
        if shadowed.is_empty() {
            return;
        }
        self.cache.remove_by(|entry| {
            shadowed.contains(&entry.payload.method_id()) && sig_intersect(&entry.sig, new_sig).is_some()
        });
    }

    /// `method_exists(MT, types)`.
    pub fn method_exists(&self, types: &[JuliaType]) -> bool {
        self.methods
            .iter()
            .any(|m| crate::method::signature::sig_subtype(types, &m.sig))
    }

    /// `matching_methods(types, lim, include_ambiguous)`.
    pub fn matching_methods(
        &self,
        types: &[JuliaType],
        lim: Option<usize>,
        include_ambiguous: bool,
    ) -> Vec<MethodId> {
        let mut out = Vec::new();
        for (i, m) in self.methods.iter().enumerate() {
            if sig_intersect(types, &m.sig).is_none() {
                continue;
            }
            if !include_ambiguous && !m.ambig.is_empty() {
                let ambiguous_here = m.ambig.iter().any(|other| {
                    sig_intersect(types, &self.methods[other.0].sig).is_some()
                });
                if ambiguous_here {
                    continue;
                }
            }
            out.push(MethodId(i));
            if lim.is_some_and(|l| out.len() >= l) {
                break;
            }
        }
        out
    }

    /// Look up a definition by exact or subtype signature match
    /// (`assoc_by_type` over the definition map, used by `invoke`, C7).
    pub fn find_by_type(&self, types: &[JuliaType], exact: bool) -> Option<MethodId> {
        if exact {
            self.methods
                .iter()
                .position(|m| m.sig == types)
                .map(MethodId)
        } else {
            let mut best: Option<(MethodId, u32)> = None;
            for (i, m) in self.methods.iter().enumerate() {
                if !crate::method::signature::sig_subtype(types, &m.sig) {
                    continue;
                }
                let score = crate::method::signature::sig_specificity(&m.sig);
                if best.is_none_or(|(_, s)| score > s) {
                    best = Some((MethodId(i), score));
                }
            }
            best.map(|(id, _)| id)
        }
    }

    /// By-type lookup used on the hot path after a definition-map miss:
    /// returns the single most-specific matching definition, or `None`,
    /// delegating scoring to `sig_specificity`.
    pub fn dispatch_by_type(&self, types: &[JuliaType]) -> Option<MethodId> {
        self.find_by_type(types, false)
    }

    pub fn cache_lookup_exact(&self, key: &[JuliaType]) -> Option<&TypemapEntry> {
        self.cache.assoc_exact(key)
    }

    pub fn cache_lookup_by_type(&self, key: &[JuliaType]) -> Option<&TypemapEntry> {
        self.cache.assoc_by_type(key, MatchMode::Inexact)
    }

    /// Canonicalize and install a dispatch-cache entry for a method that
    /// just resolved a call (+ the typemap-insert half of).
    pub fn cache_insert(&mut self, method_id: MethodId, matched_tt: &[JuliaType]) -> Vec<JuliaType> {
        let method = &self.methods[method_id.0];
        let other_sigs: Vec<&[JuliaType]> = self
            .methods
            .iter()
            .enumerate()
            .filter(|(i, _)| MethodId(*i) != method_id)
            .map(|(_, m)| m.sig.as_slice())
            .collect();

        let canon = cache_method(
            &method.sig,
            matched_tt,
            &method.called,
            &method.any_slots,
            !method.tvars.is_empty(),
            self.max_args,
            &other_sigs,
            self.cfg_max_unspecialized_conflicts(),
        );

        let isleafsig = canon.cache_key.iter().all(|t| t.is_leaf());
        let key = canon.cache_key.clone();
        self.cache.insert(TypemapEntry {
            sig: canon.cache_key,
            simplesig: canon.simplesig,
            guardsigs: canon.guardsigs,
            isleafsig,
            payload: TypemapPayload::Specialization {
                method: method_id,
                spec_types: canon.origtype,
            },
        });
        key
    }

    fn cfg_max_unspecialized_conflicts(&self) -> usize {
        crate::config::MAX_UNSPECIALIZED_CONFLICTS
    }

    pub fn clear_cache(&mut self) {
        self.cache = Typemap::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JuliaType;

    fn sig(types: &[JuliaType]) -> Vec<JuliaType> {
        types.to_vec()
    }

    #[test]
    fn overwrite_preserves_method_id_and_warns() {
        let runtime = Runtime::new();
        let mut mt = MethodTable::new("f");
        let o1 = mt.table_insert(&runtime, Method::new(sig(&[JuliaType::Int64]), vec![]));
        assert!(o1.overwrote.is_none());
        let o2 = mt.table_insert(&runtime, Method::new(sig(&[JuliaType::Int64]), vec![]));
        assert_eq!(o2.overwrote, Some(o1.id));
        assert_eq!(mt.methods().len(), 1);
    }

    #[test]
    fn ambiguous_pair_is_linked_symmetrically() {
        let runtime = Runtime::new();
        let mut mt = MethodTable::new("g");
        let a = mt.table_insert(
            &runtime,
            Method::new(sig(&[JuliaType::Number, JuliaType::Int64]), vec![]),
        );
        let b = mt.table_insert(
            &runtime,
            Method::new(sig(&[JuliaType::Int64, JuliaType::Number]), vec![]),
        );
        assert!(mt.method(a.id).ambig.contains(&b.id));
        assert!(mt.method(b.id).ambig.contains(&a.id));
    }

    #[test]
    fn more_specific_definition_shadows_without_ambiguity() {
        let runtime = Runtime::new();
        let mut mt = MethodTable::new("h");
        let any = mt.table_insert(&runtime, Method::new(sig(&[JuliaType::Any]), vec![]));
        let specific = mt.table_insert(&runtime, Method::new(sig(&[JuliaType::Int64]), vec![]));
        assert!(mt.method(any.id).ambig.is_empty());
        assert!(mt.method(specific.id).ambig.is_empty());
        assert!(specific.shadowed.contains(&any.id) || specific.shadowed.is_empty());
    }

    #[test]
    fn method_exists_respects_subtyping() {
        let runtime = Runtime::new();
        let mut mt = MethodTable::new("f");
        mt.table_insert(&runtime, Method::new(sig(&[JuliaType::Number]), vec![]));
        assert!(mt.method_exists(&[JuliaType::Int64]));
        assert!(!mt.method_exists(&[JuliaType::String]));
    }
}
