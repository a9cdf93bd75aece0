//! Port-type compatibility.
//!
//! Two ports may be wired together when their types are equal or either side
//! is `Any`. There is no widening and no coercion at this layer: a NUMBER
//! never feeds a STRING input and a STRING never feeds a DATE input. Literal
//! strings only become dates through [`crate::literal::infer_literal_type`].

use rulegraph_core::types::PortType;

/// Returns `true` if a value of type `a` may flow into a port of type `b`.
///
/// Symmetric and reflexive. `Any` matches everything but is not compared any
/// further, so `Any` never makes two concrete types compatible with each other.
pub fn compatible(a: PortType, b: PortType) -> bool {
    a == PortType::Any || b == PortType::Any || a == b
}
