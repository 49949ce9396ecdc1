// src/crypto/padding.rs
//! PKCS#5 and ISO 10126 block padding

use rand::RngCore;

use crate::enums::Padding;
use crate::error::{CipherError, Result};

/// Bytes to append after `data_len` bytes of plaintext.
///
/// Always between 1 and `block_size` bytes, so a full block of padding is
/// added when the plaintext is already aligned.
pub(crate) fn padding_bytes(padding: Padding, block_size: usize, data_len: u64) -> Vec<u8> {
    // block_size <= 16, so the remainder and pad length fit in a u8
    let pad_len = block_size - (data_len % block_size as u64) as usize;
    match padding {
        Padding::NoPadding => Vec::new(),
        Padding::Pkcs5 => vec![pad_len as u8; pad_len],
        Padding::Iso10126 => {
            let mut out = vec![0u8; pad_len];
            rand::rng().fill_bytes(&mut out[..pad_len - 1]);
            out[pad_len - 1] = pad_len as u8;
            out
        }
    }
}

/// Number of plaintext bytes to keep from the final decrypted block
pub(crate) fn unpadded_len(padding: Padding, last_block: &[u8]) -> Result<usize> {
    let block_size = last_block.len();
    let Some(&last) = last_block.last() else {
        return Err(CipherError::DecryptionFailed(
            "no final block to remove padding from".into(),
        ));
    };
    let pad_len = last as usize;
    if pad_len == 0 || pad_len > block_size {
        return Err(CipherError::DecryptionFailed(format!(
            "invalid padding length {pad_len} (wrong key or IV?)"
        )));
    }

    match padding {
        Padding::NoPadding => Ok(block_size),
        Padding::Pkcs5 => {
            let tail = &last_block[block_size - pad_len..];
            if tail.iter().any(|&b| b != last) {
                return Err(CipherError::DecryptionFailed(
                    "malformed PKCS#5 padding (wrong key or IV?)".into(),
                ));
            }
            Ok(block_size - pad_len)
        }
        // filler bytes are random; only the length byte is checkable
        Padding::Iso10126 => Ok(block_size - pad_len),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pkcs5_adds_full_block_when_aligned() {
        assert_eq!(padding_bytes(Padding::Pkcs5, 16, 32), vec![16u8; 16]);
        assert_eq!(padding_bytes(Padding::Pkcs5, 8, 5), vec![3u8; 3]);
    }

    #[test]
    fn iso10126_ends_with_length() {
        let pad = padding_bytes(Padding::Iso10126, 16, 3);
        assert_eq!(pad.len(), 13);
        assert_eq!(*pad.last().unwrap(), 13);
    }

    #[test]
    fn pkcs5_rejects_inconsistent_tail() {
        let mut block = [4u8; 8];
        block[5] = 9;
        assert!(matches!(
            unpadded_len(Padding::Pkcs5, &block),
            Err(CipherError::DecryptionFailed(_))
        ));
        assert!(unpadded_len(Padding::Pkcs5, &[0u8; 8]).is_err());
        assert_eq!(unpadded_len(Padding::Pkcs5, &[1, 2, 3, 5, 5, 5, 5, 5]).unwrap(), 3);
    }
}
