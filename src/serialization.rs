//! Byte-level encoding primitives for scalars and group elements.
//!
//! All transcript values serialize through these cursor-based helpers:
//! scalars as big-endian fixed-width integers, group elements through their
//! canonical compressed encoding. Readers advance the input slice and return
//! `None` on truncated or non-canonical data so callers can map failures to
//! a transcript error.

use ff::PrimeField;
use group::prime::PrimeGroup;

/// Serialized length of a group element in bytes.
pub fn element_serialized_len<G: PrimeGroup>() -> usize {
    G::Repr::default().as_ref().len()
}

/// Serialized length of a scalar in bytes.
pub fn scalar_serialized_len<F: PrimeField>() -> usize {
    F::Repr::default().as_ref().len()
}

/// Append the canonical compressed encoding of each element to `out`.
pub fn write_elements<'a, G: PrimeGroup>(
    elements: impl IntoIterator<Item = &'a G>,
    out: &mut Vec<u8>,
) {
    for element in elements {
        out.extend_from_slice(element.to_bytes().as_ref());
    }
}

/// Serialize a slice of group elements into a byte vector.
pub fn serialize_elements<'a, G: PrimeGroup>(elements: impl IntoIterator<Item = &'a G>) -> Vec<u8> {
    let mut bytes = Vec::new();
    write_elements(elements, &mut bytes);
    bytes
}

/// Append the big-endian encoding of each scalar to `out`.
pub fn write_scalars<'a, F: PrimeField>(scalars: impl IntoIterator<Item = &'a F>, out: &mut Vec<u8>) {
    for scalar in scalars {
        let mut scalar_bytes = scalar.to_repr().as_ref().to_vec();
        scalar_bytes.reverse();
        out.extend_from_slice(&scalar_bytes);
    }
}

/// Serialize a slice of scalars into a byte vector, big-endian.
pub fn serialize_scalars<'a, F: PrimeField>(scalars: impl IntoIterator<Item = &'a F>) -> Vec<u8> {
    let mut bytes = Vec::new();
    write_scalars(scalars, &mut bytes);
    bytes
}

/// Read one group element from the front of `data`, advancing the cursor.
///
/// Returns `None` if the data is too short or the encoding is not a valid
/// point.
pub fn read_element<G: PrimeGroup>(data: &mut &[u8]) -> Option<G> {
    let mut repr = G::Repr::default();
    let len = repr.as_ref().len();
    let (head, rest) = data.split_at_checked(len)?;
    repr.as_mut().copy_from_slice(head);
    *data = rest;
    Option::from(G::from_bytes(&repr))
}

/// Read one big-endian scalar from the front of `data`, advancing the cursor.
///
/// Returns `None` if the data is too short or the value is not a canonical
/// field element.
pub fn read_scalar<F: PrimeField>(data: &mut &[u8]) -> Option<F> {
    let mut repr = F::Repr::default();
    let len = repr.as_ref().len();
    let (head, rest) = data.split_at_checked(len)?;
    repr.as_mut().copy_from_slice(head);
    repr.as_mut().reverse();
    *data = rest;
    F::from_repr_vartime(repr)
}

/// Append a length prefix as a big-endian `u32`.
pub fn write_len(len: usize, out: &mut Vec<u8>) {
    out.extend_from_slice(&(len as u32).to_be_bytes());
}

/// Read a big-endian `u32` length prefix, advancing the cursor.
pub fn read_len(data: &mut &[u8]) -> Option<usize> {
    let (head, rest) = data.split_at_checked(4)?;
    let mut buf = [0u8; 4];
    buf.copy_from_slice(head);
    *data = rest;
    Some(u32::from_be_bytes(buf) as usize)
}

/// Read `len` raw bytes, advancing the cursor.
pub fn read_bytes<'a>(data: &mut &'a [u8], len: usize) -> Option<&'a [u8]> {
    let (head, rest) = data.split_at_checked(len)?;
    *data = rest;
    Some(head)
}
