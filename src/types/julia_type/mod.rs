//! `JuliaType`: the dispatch engine's view of Julia's type lattice.
//!
//! This is deliberately a small slice of the real hierarchy: just enough of
//! the numeric tower, the compound/parametric shapes, and the abstract
//! supertypes that `is_subtype_of`/`specificity`/`intersect` need to make
//! dispatch decisions. Concrete object models, struct field layout, and
//! anything about *values* are out of scope — an embedder's value type
//! implements `TypedValue` (see `dispatch.rs`) and hands back one of these.
//!
//! ```text
//! Any
//!  ├── Number
//!  │    ├── Real
//!  │    │    ├── Integer
//!  │    │    │    ├── Signed   (Int8..Int128, BigInt)
//!  │    │    │    └── Unsigned (UInt8..UInt128)
//!  │    │    └── AbstractFloat (Float16..Float64, BigFloat)
//!  ├── AbstractString
//!  │    └── String
//!  ├── AbstractArray
//!  │    └── Array, VectorOf(T), MatrixOf(T)
//!  └── Function
//! ```
//!
//! # Sub-modules
//!
//! - `comparison`: subtyping and specificity
//! - `display`: type names

mod comparison;
mod display;

use serde::{Deserialize, Serialize};

/// A type in the dispatch lattice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JuliaType {
    // Concrete numeric tower.
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    BigInt,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    UInt128,
    Bool,
    Float16,
    Float32,
    Float64,
    BigFloat,

    String,
    Array,
    VectorOf(Box<JuliaType>),
    MatrixOf(Box<JuliaType>),
    Tuple,
    TupleOf(Vec<JuliaType>),

    /// A user-defined (nominal) type, compared by name only: no parametric
    /// substructure, no parent-name lookup.
    Struct(std::string::String),

    /// Abstract supertype of all type objects.
    Type,
    /// The concrete type of type objects (`typeof(Int64)`).
    DataType,

    // Abstract supertypes.
    Any,
    Number,
    Real,
    Integer,
    Signed,
    Unsigned,
    AbstractFloat,
    AbstractString,
    AbstractArray,
    Function,

    /// Type variable bound by a method's `where` clause. The bound, if any,
    /// is a structural `JuliaType` rather than a name to be looked up later.
    TypeVar(std::string::String, Option<Box<JuliaType>>),

    /// The empty type (`Union{}`): subtype of everything, supertype of
    /// nothing.
    Bottom,

    /// `Union{T1, T2, ...}`. An empty union is `Bottom`, not `Union(vec![])`.
    Union(Vec<JuliaType>),

    /// `Type{T}`: matches type objects, not values of type `T`.
    TypeOf(Box<JuliaType>),

    /// An existentially-quantified type: `body` with `var` free, optionally
    /// bounded. Example: `Vector{T} where T<:Number`.
    UnionAll {
        var: std::string::String,
        bound: Option<Box<JuliaType>>,
        body: Box<JuliaType>,
    },

    /// The trailing parameter of a method signature that accepts zero or
    /// more arguments of type `T`. `None` means unbounded (`f(xs...)`);
    /// `Some(n)` means exactly `n` trailing arguments (`Vararg{T,N}`).
    ///
    /// Only ever appears as the last element of a signature; dispatch and
    /// the canonicalizer treat it specially rather than as an ordinary
    /// parameter type (see `Method::vararg_tail`).
    Vararg(Box<JuliaType>, Option<usize>),
}

impl JuliaType {
    /// Whether this type is concrete (a leaf in the type hierarchy).
    pub fn is_concrete(&self) -> bool {
        matches!(
            self,
            JuliaType::Int8
                | JuliaType::Int16
                | JuliaType::Int32
                | JuliaType::Int64
                | JuliaType::Int128
                | JuliaType::BigInt
                | JuliaType::UInt8
                | JuliaType::UInt16
                | JuliaType::UInt32
                | JuliaType::UInt64
                | JuliaType::UInt128
                | JuliaType::Bool
                | JuliaType::Float16
                | JuliaType::Float32
                | JuliaType::Float64
                | JuliaType::BigFloat
                | JuliaType::String
                | JuliaType::Array
                | JuliaType::VectorOf(_)
                | JuliaType::MatrixOf(_)
                | JuliaType::Tuple
                | JuliaType::TupleOf(_)
                | JuliaType::DataType
                | JuliaType::Struct(_)
                | JuliaType::TypeOf(_)
        ) || matches!(self, JuliaType::Vararg(elem, _) if elem.is_concrete())
    }

    /// Whether this is a variadic tail (`Vararg{T}` / `Vararg{T,N}`).
    pub fn is_vararg(&self) -> bool {
        matches!(self, JuliaType::Vararg(_, _))
    }

    /// Substitute a type variable with a concrete type, the building block
    /// for instantiating a `UnionAll`.
    ///
    /// If the variable name matches a nested `UnionAll`'s own bound
    /// variable, that `UnionAll` is returned unchanged (shadowing).
    ///
    /// ```
    /// use gf_dispatch::types::JuliaType;
    ///
    /// let vec_t = JuliaType::VectorOf(Box::new(JuliaType::TypeVar("T".to_string(), None)));
    /// let vec_int = vec_t.substitute("T", &JuliaType::Int64);
    /// assert!(matches!(vec_int, JuliaType::VectorOf(elem) if matches!(*elem, JuliaType::Int64)));
    /// ```
    pub fn substitute(&self, var_name: &str, replacement: &JuliaType) -> JuliaType {
        match self {
            JuliaType::TypeVar(name, _) if name == var_name => replacement.clone(),
            JuliaType::TypeVar(_, _) => self.clone(),
            JuliaType::VectorOf(elem) => {
                JuliaType::VectorOf(Box::new(elem.substitute(var_name, replacement)))
            }
            JuliaType::MatrixOf(elem) => {
                JuliaType::MatrixOf(Box::new(elem.substitute(var_name, replacement)))
            }
            JuliaType::TupleOf(types) => JuliaType::TupleOf(
                types
                    .iter()
                    .map(|t| t.substitute(var_name, replacement))
                    .collect(),
            ),
            JuliaType::Union(types) => JuliaType::Union(
                types
                    .iter()
                    .map(|t| t.substitute(var_name, replacement))
                    .collect(),
            ),
            JuliaType::TypeOf(inner) => {
                JuliaType::TypeOf(Box::new(inner.substitute(var_name, replacement)))
            }
            JuliaType::Vararg(elem, n) => {
                JuliaType::Vararg(Box::new(elem.substitute(var_name, replacement)), *n)
            }
            JuliaType::UnionAll { var, bound, body } => {
                if var == var_name {
                    self.clone()
                } else {
                    JuliaType::UnionAll {
                        var: var.clone(),
                        bound: bound.clone(),
                        body: Box::new(body.substitute(var_name, replacement)),
                    }
                }
            }
            _ => self.clone(),
        }
    }

    /// Instantiate a `UnionAll` with a concrete type argument, e.g.
    /// `Vector{T} where T` instantiated with `Int64` gives `Vector{Int64}`.
    pub fn instantiate(&self, arg: &JuliaType) -> JuliaType {
        match self {
            JuliaType::UnionAll { var, body, .. } => body.substitute(var, arg),
            _ => self.clone(),
        }
    }
}
