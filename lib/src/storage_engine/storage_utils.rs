// lib/src/storage_engine/storage_utils.rs

use bincode::config::{self, BigEndian, Configuration, Fixint};
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;

use crate::errors::Result;

/// Provides a standard bincode configuration.
/// Big-endian fixed-width integers keep numeric keys byte-ordered.
pub fn bincode_config() -> Configuration<BigEndian, Fixint> {
    config::standard()
        .with_big_endian()
        .with_fixed_int_encoding()
}

/// Helper to serialize a stored record to bytes using bincode.
pub fn serialize_record<T: Serialize>(record: &T) -> Result<Vec<u8>> {
    Ok(encode_to_vec(record, bincode_config())?)
}

/// Helper to deserialize bytes to a stored record using bincode.
pub fn deserialize_record<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let (record, _) = decode_from_slice(bytes, bincode_config())?;
    Ok(record)
}

/// Byte key for a numeric id. Big-endian so sled iterates in id order.
pub fn id_key(id: u64) -> [u8; 8] {
    id.to_be_bytes()
}

/// Composite key: the owner's id followed by the record's id.
pub fn owned_key(owner_id: u64, id: u64) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&owner_id.to_be_bytes());
    key[8..].copy_from_slice(&id.to_be_bytes());
    key
}

/// Next record id. sled's counter starts at zero; public ids start at one.
pub fn next_id(db: &Db) -> Result<u64> {
    Ok(db.generate_id()? + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_order_keys_numerically() {
        assert!(id_key(2) < id_key(10));
        assert!(owned_key(1, 99) < owned_key(2, 1));
        assert_eq!(&owned_key(7, 3)[..8], &id_key(7));
    }

    #[test]
    fn should_hand_out_increasing_ids_from_one() {
        let db = sled::Config::new().temporary(true).open().unwrap();
        let first = next_id(&db).unwrap();
        let second = next_id(&db).unwrap();
        assert_eq!(first, 1);
        assert!(second > first);
    }
}
