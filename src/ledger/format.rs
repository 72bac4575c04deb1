//! Row codec: CRC32-prefixed JSON.
//!
//! Every row in the games and players keyspaces is stored as a 4-byte
//! little-endian CRC32 of the JSON body followed by the body itself, so a
//! damaged row surfaces as [`StoreError::Corrupt`] instead of a confusing
//! deserialization error.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::StoreError;

/// Length of the checksum prefix.
const CRC_LEN: usize = 4;

/// Encode a row as checksum-prefixed JSON bytes.
pub fn encode_row<T: Serialize>(row: &T) -> Result<Vec<u8>, StoreError> {
    let body = serde_json::to_vec(row)?;
    let mut buf = Vec::with_capacity(CRC_LEN + body.len());
    buf.extend_from_slice(&crc32fast::hash(&body).to_le_bytes());
    buf.extend_from_slice(&body);
    Ok(buf)
}

/// Decode a checksum-prefixed row. `key` is only used in error reporting.
pub fn decode_row<T: DeserializeOwned>(key: &str, buf: &[u8]) -> Result<T, StoreError> {
    let (crc_bytes, body) = buf.split_at(CRC_LEN.min(buf.len()));
    let crc_bytes: [u8; CRC_LEN] = crc_bytes
        .try_into()
        .map_err(|_| StoreError::InvalidFormat(format!("row '{}' is too short", key)))?;
    if u32::from_le_bytes(crc_bytes) != crc32fast::hash(body) {
        return Err(StoreError::Corrupt {
            key: key.to_string(),
        });
    }
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::PlayerAggregate;

    fn sample() -> PlayerAggregate {
        PlayerAggregate {
            player_id: "p1".to_string(),
            score_raw_total: 40000,
            score_adj_total: 30000,
            rank_total: 1,
            game_total: 1,
        }
    }

    #[test]
    fn roundtrip() {
        let row = sample();
        let buf = encode_row(&row).unwrap();
        let decoded: PlayerAggregate = decode_row("p1", &buf).unwrap();
        assert_eq!(row, decoded);
    }

    #[test]
    fn detects_corruption() {
        let mut buf = encode_row(&sample()).unwrap();
        if let Some(byte) = buf.last_mut() {
            *byte ^= 0xff;
        }
        let err = decode_row::<PlayerAggregate>("p1", &buf).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn rejects_short_buffer() {
        let err = decode_row::<PlayerAggregate>("p1", &[0x01, 0x02]).unwrap_err();
        assert!(matches!(err, StoreError::InvalidFormat(_)));
    }
}
