//! Bitcoin transaction parsing and serialization.
//!
//! Both the legacy layout and the BIP144 segwit layout are understood. In the
//! segwit layout a `0x00` marker and `0x01` flag follow the version, and one
//! witness stack per input follows the outputs.

use crate::codec::{encode_var_bytes, encode_varint, Reader};
use crate::error::ParseError;
use crate::hash::Hash256;

/// Smallest possible serialized input: outpoint, empty script, sequence.
const MIN_INPUT_SIZE: usize = 32 + 4 + 1 + 4;
/// Smallest possible serialized output: value, empty script.
const MIN_OUTPUT_SIZE: usize = 8 + 1;

/// Reference to a previous transaction output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutPoint {
    /// Txid of the funding transaction (display byte order).
    pub txid: Hash256,
    pub vout: u32,
}

/// A witness stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Witness(Vec<Vec<u8>>);

impl Witness {
    pub fn new(items: Vec<Vec<u8>>) -> Self {
        Witness(items)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn items(&self) -> &[Vec<u8>] {
        &self.0
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl From<Vec<Vec<u8>>> for Witness {
    fn from(items: Vec<Vec<u8>>) -> Self {
        Witness(items)
    }
}

/// A transaction input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxIn {
    pub previous_output: OutPoint,
    pub script_sig: Vec<u8>,
    pub sequence: u32,
    pub witness: Witness,
}

/// A transaction output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOut {
    /// Value in satoshis.
    pub value: u64,
    pub script_pubkey: Vec<u8>,
}

/// A transaction, with the layout it serializes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub version: i32,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    pub lock_time: u32,
    /// Serialize with the segwit marker, flag and witness section.
    pub segwit: bool,
}

impl Transaction {
    /// Parse a transaction from its wire encoding.
    ///
    /// The whole buffer must be consumed.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ParseError> {
        let mut reader = Reader::new(data);

        let version = reader.read_i32_le()?;

        let segwit = reader.peek(0) == Some(0x00);
        if segwit {
            reader.read_u8()?;
            let flag = reader.read_u8()?;
            if flag != 0x01 {
                return Err(ParseError::InvalidSegwitFlag(flag));
            }
        }

        let input_count = read_count(&mut reader, "input", MIN_INPUT_SIZE)?;
        let mut inputs = Vec::with_capacity(input_count);
        for _ in 0..input_count {
            let txid = Hash256::from_wire(&reader.read_array()?);
            let vout = reader.read_u32_le()?;
            let script_sig = reader.read_var_bytes()?.to_vec();
            let sequence = reader.read_u32_le()?;
            inputs.push(TxIn {
                previous_output: OutPoint { txid, vout },
                script_sig,
                sequence,
                witness: Witness::default(),
            });
        }

        let output_count = read_count(&mut reader, "output", MIN_OUTPUT_SIZE)?;
        let mut outputs = Vec::with_capacity(output_count);
        for _ in 0..output_count {
            let value = reader.read_u64_le()?;
            let script_pubkey = reader.read_var_bytes()?.to_vec();
            outputs.push(TxOut { value, script_pubkey });
        }

        if segwit {
            for input in inputs.iter_mut() {
                let item_count = read_count(&mut reader, "witness item", 1)?;
                let mut items = Vec::with_capacity(item_count);
                for _ in 0..item_count {
                    items.push(reader.read_var_bytes()?.to_vec());
                }
                input.witness = Witness(items);
            }
        }

        let lock_time = reader.read_u32_le()?;

        if reader.remaining() != 0 {
            return Err(ParseError::TrailingData(reader.remaining()));
        }

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time,
            segwit,
        })
    }

    pub fn from_hex(s: &str) -> Result<Self, ParseError> {
        Self::from_bytes(&hex::decode(s.trim())?)
    }

    /// Serialize in the layout selected by `self.segwit`.
    pub fn serialize(&self) -> Vec<u8> {
        self.encode(self.segwit)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.serialize())
    }

    /// Transaction ID: hash of the legacy serialization, display order.
    pub fn txid(&self) -> Hash256 {
        Hash256::hash(&self.encode(false))
    }

    /// Witness transaction ID: hash of the serialization as it would be sent.
    pub fn wtxid(&self) -> Hash256 {
        Hash256::hash(&self.serialize())
    }

    pub fn has_witness(&self) -> bool {
        self.inputs.iter().any(|input| !input.witness.is_empty())
    }

    fn encode(&self, segwit: bool) -> Vec<u8> {
        let mut raw_tx = Vec::with_capacity(256);

        raw_tx.extend_from_slice(&self.version.to_le_bytes());

        if segwit {
            raw_tx.push(0x00); // Marker
            raw_tx.push(0x01); // Flag
        }

        encode_varint(self.inputs.len() as u64, &mut raw_tx);
        for input in &self.inputs {
            raw_tx.extend_from_slice(&input.previous_output.txid.to_wire());
            raw_tx.extend_from_slice(&input.previous_output.vout.to_le_bytes());
            encode_var_bytes(&input.script_sig, &mut raw_tx);
            raw_tx.extend_from_slice(&input.sequence.to_le_bytes());
        }

        encode_varint(self.outputs.len() as u64, &mut raw_tx);
        for output in &self.outputs {
            raw_tx.extend_from_slice(&output.value.to_le_bytes());
            encode_var_bytes(&output.script_pubkey, &mut raw_tx);
        }

        if segwit {
            for input in &self.inputs {
                encode_varint(input.witness.len() as u64, &mut raw_tx);
                for item in input.witness.items() {
                    encode_var_bytes(item, &mut raw_tx);
                }
            }
        }

        raw_tx.extend_from_slice(&self.lock_time.to_le_bytes());

        raw_tx
    }
}

/// Read an element count, rejecting counts the remaining bytes cannot hold.
fn read_count(
    reader: &mut Reader<'_>,
    what: &'static str,
    min_size: usize,
) -> Result<usize, ParseError> {
    let count = reader.read_varint()?;
    if count > (reader.remaining() / min_size) as u64 {
        return Err(ParseError::CountTooLarge { what, count });
    }
    Ok(count as usize)
}
