//! Transcript message types and their wire encoding.
//!
//! A three-move proof exchanges an [`Announcement`], a challenge scalar, and
//! a [`Response`]; the triple forms a [`Transcript`]. Composite fragments
//! additionally transmit a [`SendFirstValue`] ahead of their delegated
//! subprotocols, and that value participates in announcement equality, so a
//! proof cannot be reinterpreted under a different first message.
//!
//! Announcements and responses serialize as ordered lists: the send-first
//! value, then one entry per declared variable or child, children always in
//! lexicographic order of their registered names. Both parties derive the
//! same spec from the same public inputs, so list positions line up without
//! names ever appearing on the wire.

use std::collections::BTreeMap;

use group::prime::PrimeGroup;

use crate::errors::Error;
use crate::serialization::{
    read_bytes, read_element, read_len, read_scalar, write_elements, write_len, write_scalars,
};
use crate::variable::VariableValue;

/// The challenge of a Sigma protocol, drawn from the scalar field.
pub type Challenge<G> = <G as group::Group>::Scalar;

/// A value the prover transmits before its delegated subprotocols run.
///
/// May be empty. The encoding is self-describing (tag plus length), so a
/// fragment can restore it from a cursor without out-of-band shape
/// information.
#[derive(Clone, Debug, PartialEq)]
pub enum SendFirstValue<G: PrimeGroup> {
    /// No first message.
    Empty,
    /// A list of group elements.
    Elements(Vec<G>),
    /// A list of scalars.
    Scalars(Vec<G::Scalar>),
    /// Raw bytes.
    Bytes(Vec<u8>),
}

const SEND_FIRST_EMPTY: u8 = 0;
const SEND_FIRST_ELEMENTS: u8 = 1;
const SEND_FIRST_SCALARS: u8 = 2;
const SEND_FIRST_BYTES: u8 = 3;

impl<G: PrimeGroup> SendFirstValue<G> {
    /// Whether this is the empty first message.
    pub fn is_empty(&self) -> bool {
        matches!(self, SendFirstValue::Empty)
    }

    /// Appends the encoding of this value to `out`.
    pub fn serialize_into(&self, out: &mut Vec<u8>) {
        match self {
            SendFirstValue::Empty => out.push(SEND_FIRST_EMPTY),
            SendFirstValue::Elements(elements) => {
                out.push(SEND_FIRST_ELEMENTS);
                write_len(elements.len(), out);
                write_elements(elements, out);
            }
            SendFirstValue::Scalars(scalars) => {
                out.push(SEND_FIRST_SCALARS);
                write_len(scalars.len(), out);
                write_scalars(scalars, out);
            }
            SendFirstValue::Bytes(bytes) => {
                out.push(SEND_FIRST_BYTES);
                write_len(bytes.len(), out);
                out.extend_from_slice(bytes);
            }
        }
    }

    /// Serializes this value into a fresh byte vector.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.serialize_into(&mut out);
        out
    }

    /// Reads a send-first value from the front of `data`.
    pub fn read(data: &mut &[u8]) -> Result<Self, Error> {
        let tag = read_bytes(data, 1).ok_or(Error::InvalidTranscript)?[0];
        match tag {
            SEND_FIRST_EMPTY => Ok(SendFirstValue::Empty),
            SEND_FIRST_ELEMENTS => {
                let len = read_len(data).ok_or(Error::InvalidTranscript)?;
                let mut elements = Vec::with_capacity(len);
                for _ in 0..len {
                    elements.push(read_element::<G>(data).ok_or(Error::InvalidTranscript)?);
                }
                Ok(SendFirstValue::Elements(elements))
            }
            SEND_FIRST_SCALARS => {
                let len = read_len(data).ok_or(Error::InvalidTranscript)?;
                let mut scalars = Vec::with_capacity(len);
                for _ in 0..len {
                    scalars.push(read_scalar::<G::Scalar>(data).ok_or(Error::InvalidTranscript)?);
                }
                Ok(SendFirstValue::Scalars(scalars))
            }
            SEND_FIRST_BYTES => {
                let len = read_len(data).ok_or(Error::InvalidTranscript)?;
                let bytes = read_bytes(data, len).ok_or(Error::InvalidTranscript)?;
                Ok(SendFirstValue::Bytes(bytes.to_vec()))
            }
            _ => Err(Error::InvalidTranscript),
        }
    }
}

/// The first message of a fragment.
#[derive(Clone, Debug, PartialEq)]
pub enum Announcement<G: PrimeGroup> {
    /// A leaf fragment's single commitment element.
    Element(G),
    /// A composite fragment's first message: its send-first value and the
    /// announcement of every child, keyed by registered name.
    Composite {
        /// The value sent ahead of the delegated subprotocols.
        send_first: SendFirstValue<G>,
        /// Child announcements in lexicographic name order.
        children: BTreeMap<String, Announcement<G>>,
    },
}

impl<G: PrimeGroup> Announcement<G> {
    /// Appends the wire encoding of this announcement to `out`.
    pub fn serialize_into(&self, out: &mut Vec<u8>) {
        match self {
            Announcement::Element(element) => write_elements([element], out),
            Announcement::Composite {
                send_first,
                children,
            } => {
                send_first.serialize_into(out);
                for child in children.values() {
                    child.serialize_into(out);
                }
            }
        }
    }

    /// Serializes this announcement into a fresh byte vector.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.serialize_into(&mut out);
        out
    }
}

/// The third message of a fragment.
#[derive(Clone, Debug, PartialEq)]
pub enum Response<G: PrimeGroup> {
    /// A leaf fragment that declares no variables responds with nothing.
    Empty,
    /// A composite fragment's response: one value per declared variable plus
    /// the response of every child, keyed by registered name.
    Composite {
        /// Responses for this fragment's own variables.
        own: BTreeMap<String, VariableValue<G>>,
        /// Child responses in lexicographic name order.
        children: BTreeMap<String, Response<G>>,
    },
}

impl<G: PrimeGroup> Response<G> {
    /// Appends the wire encoding of this response to `out`.
    ///
    /// Own values encode in lexicographic variable order, each in its own
    /// domain's encoding; the reader recovers the kinds from the spec.
    pub fn serialize_into(&self, out: &mut Vec<u8>) {
        match self {
            Response::Empty => {}
            Response::Composite { own, children } => {
                for value in own.values() {
                    match value {
                        VariableValue::Scalar(s) => write_scalars([s], out),
                        VariableValue::Element(e) => write_elements([e], out),
                    }
                }
                for child in children.values() {
                    child.serialize_into(out);
                }
            }
        }
    }

    /// Serializes this response into a fresh byte vector.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.serialize_into(&mut out);
        out
    }
}

/// A complete three-move transcript.
#[derive(Clone, Debug, PartialEq)]
pub struct Transcript<G: PrimeGroup> {
    /// The prover's first message.
    pub announcement: Announcement<G>,
    /// The verifier's challenge.
    pub challenge: Challenge<G>,
    /// The prover's response.
    pub response: Response<G>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve25519_dalek::{RistrettoPoint, Scalar};
    use group::Group;
    use rand::rngs::OsRng;

    type G = RistrettoPoint;

    #[test]
    fn send_first_round_trip() {
        let mut rng = OsRng;
        let values = [
            SendFirstValue::<G>::Empty,
            SendFirstValue::Elements(vec![G::random(&mut rng), G::random(&mut rng)]),
            SendFirstValue::Scalars(vec![Scalar::random(&mut rng)]),
            SendFirstValue::Bytes(b"ad hoc".to_vec()),
        ];
        for value in values {
            let bytes = value.serialize();
            let mut cursor = bytes.as_slice();
            let back = SendFirstValue::<G>::read(&mut cursor).unwrap();
            assert_eq!(value, back);
            assert!(cursor.is_empty());
        }
    }

    #[test]
    fn send_first_rejects_unknown_tag() {
        let mut cursor: &[u8] = &[9u8];
        assert!(matches!(
            SendFirstValue::<G>::read(&mut cursor),
            Err(Error::InvalidTranscript)
        ));
    }

    #[test]
    fn announcements_with_different_send_first_differ() {
        let a = Announcement::<G>::Composite {
            send_first: SendFirstValue::Empty,
            children: BTreeMap::new(),
        };
        let b = Announcement::<G>::Composite {
            send_first: SendFirstValue::Bytes(vec![1]),
            children: BTreeMap::new(),
        };
        assert_ne!(a, b);
        assert_ne!(a.serialize(), b.serialize());
    }
}
