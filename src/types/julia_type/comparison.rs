//! Subtype checking and specificity for `JuliaType`.

use super::JuliaType;

impl JuliaType {
    /// Check if `self` is a subtype of `other` (`self <: other`).
    ///
    /// ```
    /// use gf_dispatch::types::JuliaType;
    ///
    /// assert!(JuliaType::Int64.is_subtype_of(&JuliaType::Integer));
    /// assert!(JuliaType::Int64.is_subtype_of(&JuliaType::Number));
    /// assert!(JuliaType::Int64.is_subtype_of(&JuliaType::Any));
    /// assert!(!JuliaType::Int64.is_subtype_of(&JuliaType::Float64));
    /// ```
    pub fn is_subtype_of(&self, other: &JuliaType) -> bool {
        if self == other {
            return true;
        }
        if matches!(self, JuliaType::Bottom) {
            return true;
        }
        // Union{T1, T2, ...} <: U iff T1 <: U and T2 <: U
        if let JuliaType::Union(self_types) = self {
            return self_types.iter().all(|t| t.is_subtype_of(other));
        }
        // T <: Union{T1, T2, ...} iff T <: T1 or T <: T2 or ...
        if let JuliaType::Union(other_types) = other {
            return other_types.iter().any(|t| self.is_subtype_of(t));
        }
        match other {
            JuliaType::Any => true,
            JuliaType::Bottom => false,
            JuliaType::TypeOf(inner) => {
                if let JuliaType::TypeOf(si) = self {
                    si.is_subtype_of(inner)
                } else {
                    false
                }
            }
            JuliaType::Number => matches!(
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
                    | JuliaType::Integer
                    | JuliaType::Signed
                    | JuliaType::Unsigned
                    | JuliaType::Real
                    | JuliaType::AbstractFloat
                    | JuliaType::Number
            ),
            JuliaType::Real => matches!(
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
                    | JuliaType::Integer
                    | JuliaType::Signed
                    | JuliaType::Unsigned
                    | JuliaType::AbstractFloat
                    | JuliaType::Real
            ),
            JuliaType::Integer => matches!(
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
                    | JuliaType::Signed
                    | JuliaType::Unsigned
                    | JuliaType::Integer
            ),
            JuliaType::Signed => matches!(
                self,
                JuliaType::Int8
                    | JuliaType::Int16
                    | JuliaType::Int32
                    | JuliaType::Int64
                    | JuliaType::Int128
                    | JuliaType::BigInt
                    | JuliaType::Signed
            ),
            JuliaType::Unsigned => matches!(
                self,
                JuliaType::UInt8
                    | JuliaType::UInt16
                    | JuliaType::UInt32
                    | JuliaType::UInt64
                    | JuliaType::UInt128
                    | JuliaType::Unsigned
            ),
            JuliaType::AbstractFloat => matches!(
                self,
                JuliaType::Float16
                    | JuliaType::Float32
                    | JuliaType::Float64
                    | JuliaType::BigFloat
                    | JuliaType::AbstractFloat
            ),
            JuliaType::AbstractString => {
                matches!(self, JuliaType::String | JuliaType::AbstractString)
            }
            JuliaType::Function => matches!(self, JuliaType::Function),
            JuliaType::Type => matches!(
                self,
                JuliaType::DataType | JuliaType::Type | JuliaType::TypeOf(_)
            ),
            JuliaType::AbstractArray => matches!(
                self,
                JuliaType::Array
                    | JuliaType::VectorOf(_)
                    | JuliaType::MatrixOf(_)
                    | JuliaType::AbstractArray
            ),
            JuliaType::Array => matches!(
                self,
                JuliaType::VectorOf(_) | JuliaType::MatrixOf(_) | JuliaType::Array
            ),
            JuliaType::Tuple => matches!(self, JuliaType::TupleOf(_) | JuliaType::Tuple),
            JuliaType::Struct(other_name) => {
                matches!(self, JuliaType::Struct(self_name) if self_name == other_name)
            }
            JuliaType::TupleOf(other_types) => {
                if let JuliaType::TupleOf(self_types) = self {
                    self_types.len() == other_types.len()
                        && self_types
                            .iter()
                            .zip(other_types.iter())
                            .all(|(s, o)| s.is_subtype_of(o))
                } else {
                    false
                }
            }
            JuliaType::VectorOf(oe) => {
                if let JuliaType::VectorOf(se) = self {
                    se == oe
                } else {
                    false
                }
            }
            JuliaType::MatrixOf(oe) => {
                if let JuliaType::MatrixOf(se) = self {
                    se == oe
                } else {
                    false
                }
            }
            JuliaType::Vararg(other_elem, other_n) => match self {
                JuliaType::Vararg(self_elem, self_n) => {
                    self_elem.is_subtype_of(other_elem)
                        && match (self_n, other_n) {
                            (_, None) => true,
                            (Some(a), Some(b)) => a == b,
                            (None, Some(_)) => false,
                        }
                }
                _ => self.is_subtype_of(other_elem),
            },
            JuliaType::TypeVar(_, bound) => match bound {
                None => true,
                Some(bt) => self.is_subtype_of(bt),
            },
            JuliaType::UnionAll { bound, body, .. } => match bound {
                None => self.is_subtype_of(body),
                Some(bt) => self.is_subtype_of(bt) && self.is_subtype_of(body),
            },
            _ => false,
        }
    }

    /// Get specificity score (higher = more specific).
    pub fn specificity(&self) -> u8 {
        match self {
            JuliaType::Any => 0,
            JuliaType::Number | JuliaType::AbstractString | JuliaType::AbstractArray | JuliaType::Function => 1,
            JuliaType::Real => 2,
            JuliaType::Integer | JuliaType::AbstractFloat => 3,
            JuliaType::Signed | JuliaType::Unsigned => 4,
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
            | JuliaType::Tuple
            | JuliaType::Type
            | JuliaType::DataType
            | JuliaType::Struct(_) => 5,
            JuliaType::TupleOf(elems) => {
                if elems.is_empty() {
                    5
                } else {
                    elems.iter().map(|t| t.specificity()).sum::<u8>()
                }
            }
            JuliaType::VectorOf(e) | JuliaType::MatrixOf(e) => e.specificity(),
            JuliaType::TypeVar(_, _) | JuliaType::Bottom => 0,
            JuliaType::Union(_) => 1,
            JuliaType::TypeOf(inner) => {
                if inner.specificity() == 0 {
                    1
                } else {
                    5
                }
            }
            JuliaType::UnionAll { body, .. } => body.specificity().saturating_sub(1).max(1),
            // A fixed-count vararg is nearly as specific as the element type repeated;
            // an unbounded one is strictly less specific than any fixed arity.
            JuliaType::Vararg(elem, Some(_)) => elem.specificity(),
            JuliaType::Vararg(elem, None) => elem.specificity().saturating_sub(1),
        }
    }
}
