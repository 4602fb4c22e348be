//! Tuple-signature operations layered on top of the per-element lattice ops
//! in `types::`, plus the signature canonicalizer (`cache_method`).
//!
//! `JuliaType::is_subtype_of`/`intersect` only compare `TupleOf` of equal
//! length; dispatch needs arity-aware comparison that understands a trailing
//! `Vararg` tail can absorb a variable number of trailing arguments, so that
//! lives here rather than in `types::`, built around the same
//! vararg-param/arity-check shape a variadic dispatch scan needs.

use crate::types::JuliaType;

fn split_vararg(sig: &[JuliaType]) -> (&[JuliaType], Option<(&JuliaType, Option<usize>)>) {
    match sig.last() {
        Some(JuliaType::Vararg(elem, n)) => (&sig[..sig.len() - 1], Some((elem.as_ref(), *n))),
        _ => (sig, None),
    }
}

/// Whether every argument tuple matching `a` also matches `b` (`a ⊑ b` on
/// tuple signatures), accounting for a vararg tail on either side.
pub fn sig_subtype(a: &[JuliaType], b: &[JuliaType]) -> bool {
    let (a_fixed, a_tail) = split_vararg(a);
    let (b_fixed, b_tail) = split_vararg(b);

    match (a_tail, b_tail) {
        (None, None) => {
            a_fixed.len() == b_fixed.len()
                && a_fixed
                    .iter()
                    .zip(b_fixed)
                    .all(|(x, y)| x.is_subtype_of(y))
        }
        (Some((ae, an)), Some((be, bn))) => {
            a_fixed.len() == b_fixed.len()
                && a_fixed
                    .iter()
                    .zip(b_fixed)
                    .all(|(x, y)| x.is_subtype_of(y))
                && JuliaType::Vararg(Box::new(ae.clone()), an)
                    .is_subtype_of(&JuliaType::Vararg(Box::new(be.clone()), bn))
        }
        (None, Some((be, bn))) => {
            a_fixed.len() >= b_fixed.len()
                && a_fixed
                    .iter()
                    .zip(b_fixed)
                    .all(|(x, y)| x.is_subtype_of(y))
                && a_fixed[b_fixed.len()..].iter().all(|x| x.is_subtype_of(be))
                && match bn {
                    Some(n) => a_fixed.len() - b_fixed.len() == n,
                    None => true,
                }
        }
        (Some(_), None) => false,
    }
}

/// `a` is strictly more specific than `b`: every call `a` accepts, `b`
/// accepts too, but not vice versa. Used by the ambiguity analyzer
/// to decide shadowing versus ambiguity.
pub fn more_specific(a: &[JuliaType], b: &[JuliaType]) -> bool {
    sig_subtype(a, b) && !sig_subtype(b, a)
}

/// Sum of per-position specificity, with the usual vararg penalty: a
/// trailing unbounded tail is slightly less specific than a fixed arity of
/// the same length (a `saturating_sub(1)` adjustment on the tail element's
/// score).
pub fn sig_specificity(sig: &[JuliaType]) -> u32 {
    let (fixed, tail) = split_vararg(sig);
    let base: u32 = fixed.iter().map(|t| t.specificity() as u32).sum();
    match tail {
        None => base,
        Some((elem, Some(_))) => base + elem.specificity() as u32,
        Some((elem, None)) => base + (elem.specificity() as u32).saturating_sub(1),
    }
}

/// Arity compatibility only (ignores element types) — the cheap filter the
/// hot dispatch path applies before paying for the elementwise subtype
/// check.
pub fn arity_matches(sig: &[JuliaType], n: usize) -> bool {
    let (fixed, tail) = split_vararg(sig);
    match tail {
        None => fixed.len() == n,
        Some((_, Some(count))) => n == fixed.len() + count,
        Some((_, None)) => n >= fixed.len(),
    }
}

/// Greatest lower bound of two tuple signatures in the subtype lattice, or
/// `None` if they're disjoint (either arity-incompatible, or some position
/// intersects to `Bottom`). Used by the ambiguity analyzer and the
/// canonicalizer's guard-set computation.
pub fn sig_intersect(a: &[JuliaType], b: &[JuliaType]) -> Option<Vec<JuliaType>> {
    let (a_fixed, a_tail) = split_vararg(a);
    let (b_fixed, b_tail) = split_vararg(b);

    let common_len = a_fixed.len().min(b_fixed.len());
    let mut out = Vec::with_capacity(a_fixed.len().max(b_fixed.len()) + 1);
    for i in 0..common_len {
        let t = a_fixed[i].intersect(&b_fixed[i]);
        if matches!(t, JuliaType::Bottom) {
            return None;
        }
        out.push(t);
    }

    match (a_tail, b_tail) {
        (None, None) => {
            if a_fixed.len() != b_fixed.len() {
                return None;
            }
            Some(out)
        }
        (Some((elem, n)), None) => {
            if b_fixed.len() < a_fixed.len() {
                return None;
            }
            for extra in &b_fixed[a_fixed.len()..] {
                let t = elem.intersect(extra);
                if matches!(t, JuliaType::Bottom) {
                    return None;
                }
                out.push(t);
            }
            if n.is_some_and(|n| n != b_fixed.len() - a_fixed.len()) {
                return None;
            }
            Some(out)
        }
        (None, Some(_)) => sig_intersect(b, a),
        (Some((ae, an)), Some((be, bn))) => {
            if a_fixed.len() != b_fixed.len() {
                return None;
            }
            let elem = ae.intersect(be);
            if matches!(elem, JuliaType::Bottom) {
                return None;
            }
            let n = match (an, bn) {
                (Some(x), Some(y)) if x == y => Some(x),
                (Some(_), Some(_)) => return None,
                (Some(x), None) | (None, Some(x)) => Some(x),
                (None, None) => None,
            };
            out.push(JuliaType::Vararg(Box::new(elem), n));
            Some(out)
        }
    }
}

/// Outcome of the signature canonicalizer: the key the dispatch
/// cache should be populated under, and whether guard entries had to be
/// computed to make that key safe.
#[derive(Debug, Clone)]
pub struct CanonicalSignature {
    /// The original matched argument tuple, unmodified.
    pub origtype: Vec<JuliaType>,
    /// The (possibly despecialized) cache key.
    pub cache_key: Vec<JuliaType>,
    /// Present when rule 5 (uncalled function arguments) fired.
    pub simplesig: Option<Vec<JuliaType>>,
    /// Other definitions' signatures that must be checked and rejected
    /// before this cache entry may be trusted.
    pub guardsigs: Vec<Vec<JuliaType>>,
}

/// Compute the cache key for a dispatched call (`cache_method`,).
///
/// `decl` is the matched method's declared signature, `tt` is the actual
/// argument-type tuple that matched it, `other_sigs` is every other
/// definition's signature in the owning table (for guard computation),
/// `max_args` is the table's current `max_args`, and `called`/`any_slots`/
/// `tvars` mirror the matched `Method`'s corresponding fields.
pub fn cache_method(
    decl: &[JuliaType],
    tt: &[JuliaType],
    called: &[bool],
    any_slots: &[bool],
    tvars_nonempty: bool,
    max_args: usize,
    other_sigs: &[&[JuliaType]],
    max_unspecialized_conflicts: usize,
) -> CanonicalSignature {
    let origtype = tt.to_vec();
    let mut key = tt.to_vec();
    let mut need_guards = false;
    let mut simplesig = None;

    let fixed_len = if matches!(decl.last(), Some(JuliaType::Vararg(_, _))) {
        decl.len() - 1
    } else {
        decl.len()
    };

    for i in 0..key.len().min(fixed_len) {
        let decl_i = &decl[i];

        // Rule 4: a slot declared exactly `Any` gains nothing from caching
        // under the argument's concrete runtime type; collapse it back.
        if any_slots.get(i).copied().unwrap_or(false) && key[i] != JuliaType::Any {
            key[i] = JuliaType::Any;
            need_guards = true;
            continue;
        }

        // Rule 3: Type{T<:Tuple} de-specializes to Type{<:Tuple} unless the
        // declaration itself dispatches on Type.
        if let JuliaType::TypeOf(inner) = &key[i] {
            if inner.is_tuple() && !matches!(decl_i, JuliaType::TypeOf(_)) {
                key[i] = JuliaType::TypeOf(Box::new(JuliaType::Tuple));
                need_guards = true;
                continue;
            }
        }

        // Rule 5: uncalled function-typed arguments despecialize to Function.
        let decl_is_function_like = matches!(decl_i, JuliaType::Any | JuliaType::Function)
            || matches!(decl_i, JuliaType::Union(ts) if ts.iter().any(|t| matches!(t, JuliaType::Function | JuliaType::DataType)));
        if i < 8
            && !called.get(i).copied().unwrap_or(false)
            && decl_is_function_like
            && key[i].is_subtype_of(&JuliaType::Function)
        {
            key[i] = JuliaType::Function;
            need_guards = true;
            if simplesig.is_none() {
                simplesig = Some(decl.to_vec());
            }
            if let Some(s) = simplesig.as_mut() {
                if i < s.len() {
                    s[i] = JuliaType::Any;
                }
            }
            continue;
        }

        // Rule 6: bound Type{Type{..}} nesting depth.
        if let JuliaType::TypeOf(inner) = &key[i] {
            if matches!(inner.as_ref(), JuliaType::TypeOf(_)) {
                key[i] = inner.intersect(&JuliaType::TypeOf(Box::new(JuliaType::Any)));
                if !tvars_nonempty {
                    key[i] = JuliaType::TypeOf(Box::new(JuliaType::Any));
                }
                need_guards = true;
                continue;
            }
        }

        // Rule 7: very general Type slots collapse Type{X} to Type{T}.
        if matches!(decl_i, JuliaType::Any | JuliaType::Type) && !tvars_nonempty {
            if let JuliaType::TypeOf(_) = &key[i] {
                key[i] = JuliaType::TypeOf(Box::new(JuliaType::Any));
                need_guards = true;
            }
        }
    }

    // Rule 8: variadic cap.
    if key.len() > max_args {
        if let Some(JuliaType::Vararg(elem, _)) = decl.last() {
            let last_type = key[max_args..].last().cloned();
            let all_same = last_type
                .as_ref()
                .is_some_and(|lt| key[max_args..].iter().all(|t| t == lt));
            key.truncate(max_args + 1);
            if all_same {
                if let Some(lt) = last_type {
                    key[max_args] = lt;
                    key.push(JuliaType::Vararg(Box::new(key[max_args].clone()), None));
                    key.truncate(max_args + 1);
                }
            } else {
                key[max_args] = JuliaType::Vararg(elem.clone(), None);
            }
            need_guards = true;
        }
    }

    let mut guardsigs = Vec::new();
    if need_guards {
        for other in other_sigs {
            if *other == decl {
                continue;
            }
            if sig_intersect(&key, other).is_some() {
                guardsigs.push(other.to_vec());
            }
            if guardsigs.len() > max_unspecialized_conflicts {
                // Too many conflicts or a typevar match would be required:
                // give up on despecializing and cache the exact call.
                return CanonicalSignature {
                    origtype: origtype.clone(),
                    cache_key: origtype,
                    simplesig: None,
                    guardsigs: Vec::new(),
                };
            }
        }
        if tvars_nonempty && !guardsigs.is_empty() {
            return CanonicalSignature {
                origtype: origtype.clone(),
                cache_key: origtype,
                simplesig: None,
                guardsigs: Vec::new(),
            };
        }
    }

    CanonicalSignature {
        origtype,
        cache_key: key,
        simplesig,
        guardsigs,
    }
}
