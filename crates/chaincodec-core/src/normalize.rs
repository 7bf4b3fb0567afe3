//! Witness normalization of relayed transactions.
//!
//! Peers disagree on whether to attach a placeholder witness, a single
//! all-zero 32-byte item, to inputs that carry no witness data. Normalized
//! transactions drop the placeholder and are always written in the segwit
//! layout, so the same transaction serializes identically whichever peer
//! supplied it.

use log::trace;

use crate::error::Result;
use crate::network::WITNESS_PLACEHOLDER_LEN;
use crate::transaction::{Transaction, Witness};

/// Whether `witness` is the all-zero placeholder meaning "no witness data".
pub fn is_placeholder_witness(witness: &Witness) -> bool {
    match witness.items() {
        [item] => item.len() == WITNESS_PLACEHOLDER_LEN && item.iter().all(|b| *b == 0),
        _ => false,
    }
}

/// Clear placeholder witnesses and mark the transaction as segwit.
pub fn normalize(mut tx: Transaction) -> Transaction {
    let mut stripped = 0usize;
    for input in tx.inputs.iter_mut() {
        if is_placeholder_witness(&input.witness) {
            input.witness.clear();
            stripped += 1;
        }
    }
    if stripped > 0 {
        trace!("stripped {} placeholder witness(es) from {}", stripped, tx.txid());
    }
    tx.segwit = true;
    tx
}

/// Parse raw transaction hex, normalize it and re-serialize to lowercase hex.
pub fn normalize_transaction(raw_tx_hex: &str) -> Result<String> {
    let tx = Transaction::from_hex(raw_tx_hex)?;
    Ok(normalize(tx).to_hex())
}
