// tests/vector_tests.rs
//! Published known-answer vectors (NIST SP 800-38A, FIPS-197, FIPS 81 DES)
mod support;

use file_cipher::{
    encrypt_stream, Algorithm, CipherProfile, InitializationVector, KeyMaterial, Mode, Padding,
};
use support::hex;

const SP800_38A_KEY: &str = "2b7e151628aed2a6abf7158809cf4f3c";
const BLOCK_1: &str = "6bc1bee22e409f96e93d7e117393172a";
const BLOCK_2: &str = "ae2d8a571e03ac9c9eb76fac45af8e51";
const IV: &str = "000102030405060708090a0b0c0d0e0f";
const CTR_IV: &str = "f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff";

fn encrypt(algorithm: Algorithm, mode: Mode, padding: Padding, key: &str, iv: &str, plain: &[u8]) -> Vec<u8> {
    let profile = CipherProfile::new(algorithm, mode, padding).unwrap();
    let key = KeyMaterial::from_bytes(algorithm, hex(key)).unwrap();
    let iv = if iv.is_empty() {
        InitializationVector::none()
    } else {
        InitializationVector::from_bytes(hex(iv))
    };
    let mut out = Vec::new();
    encrypt_stream(&profile, &key, &iv, plain, &mut out, 4096).unwrap();
    out
}

fn aes128(mode: Mode, padding: Padding, iv: &str, plain: &[u8]) -> Vec<u8> {
    encrypt(Algorithm::Aes, mode, padding, SP800_38A_KEY, iv, plain)
}

#[test]
fn aes128_ecb() {
    let ct = aes128(Mode::Ecb, Padding::Pkcs5, "", &hex(BLOCK_1));
    assert_eq!(ct.len(), 32);
    assert_eq!(&ct[..16], hex("3ad77bb40d7a3660a89ecaf32466ef97").as_slice());
}

#[test]
fn aes128_cbc() {
    let ct = aes128(Mode::Cbc, Padding::Pkcs5, IV, &hex(BLOCK_1));
    assert_eq!(&ct[..16], hex("7649abac8119b246cee98e9b12e9197d").as_slice());
}

#[test]
fn aes128_cfb() {
    let plain = [hex(BLOCK_1), hex(BLOCK_2)].concat();
    let ct = aes128(Mode::Cfb, Padding::NoPadding, IV, &plain);
    assert_eq!(
        ct,
        hex("3b3fd92eb72dad20333449f8e83cfb4ac8a64537a0b3a93fcde3cdad9f1ce58b")
    );
}

#[test]
fn aes128_ofb() {
    let plain = [hex(BLOCK_1), hex(BLOCK_2)].concat();
    let ct = aes128(Mode::Ofb, Padding::NoPadding, IV, &plain);
    assert_eq!(
        ct,
        hex("3b3fd92eb72dad20333449f8e83cfb4a7789508d16918f03f53c52dac54ed825")
    );
}

#[test]
fn aes128_ctr() {
    let plain = [hex(BLOCK_1), hex(BLOCK_2)].concat();
    let ct = aes128(Mode::Ctr, Padding::NoPadding, CTR_IV, &plain);
    assert_eq!(
        ct,
        hex("874d6191b620e3261bef6864990db6ce9806f66b7970fdff8617187bb9fffdff")
    );
}

#[test]
fn aes128_cfb8() {
    let plain = hex("6bc1bee22e409f96e93d7e117393172aae2d");
    let expected = hex("3b79424c9c0dd436bace9e0ed4586a4f32b9");
    assert_eq!(aes128(Mode::Cfb8, Padding::NoPadding, IV, &plain), expected);

    // byte-granular mode: odd chunking gives the same stream
    let profile = CipherProfile::new(Algorithm::Aes, Mode::Cfb8, Padding::NoPadding).unwrap();
    let key = KeyMaterial::from_bytes(Algorithm::Aes, hex(SP800_38A_KEY)).unwrap();
    let mut out = Vec::new();
    encrypt_stream(&profile, &key, &InitializationVector::from_bytes(hex(IV)), plain.as_slice(), &mut out, 3)
        .unwrap();
    assert_eq!(out, expected);
}

#[test]
fn aes128_eight_bit_feedback_modes_share_first_byte() {
    let plain = hex(BLOCK_1);
    let cfb8 = aes128(Mode::Cfb8, Padding::NoPadding, IV, &plain);
    let ofb8 = aes128(Mode::Ofb8, Padding::NoPadding, IV, &plain);
    assert_eq!(cfb8[0], 0x3b);
    assert_eq!(ofb8[0], 0x3b);
    assert_eq!(cfb8.len(), 16);
    assert_eq!(ofb8.len(), 16);
}

#[test]
fn aes192_and_aes256_single_block() {
    let plain = hex("00112233445566778899aabbccddeeff");
    let ct192 = encrypt(
        Algorithm::Aes,
        Mode::Ecb,
        Padding::Pkcs5,
        "000102030405060708090a0b0c0d0e0f1011121314151617",
        "",
        &plain,
    );
    assert_eq!(&ct192[..16], hex("dda97ca4864cdfe06eaf70a0ec0d7191").as_slice());

    let ct256 = encrypt(
        Algorithm::Aes,
        Mode::Ecb,
        Padding::Pkcs5,
        "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
        "",
        &plain,
    );
    assert_eq!(&ct256[..16], hex("8ea2b7ca516745bfeafc49904b496089").as_slice());
}

#[test]
fn des_single_block() {
    let ct = encrypt(
        Algorithm::Des,
        Mode::Ecb,
        Padding::Pkcs5,
        "133457799bbcdff1",
        "",
        &hex("0123456789abcdef"),
    );
    assert_eq!(ct.len(), 16);
    assert_eq!(&ct[..8], hex("85e813540f0ab405").as_slice());
}

const FIPS81_KEY: &str = "0123456789abcdef";
const FIPS81_PLAIN: &[u8] = b"Now is the time for all ";

#[test]
fn des_cbc() {
    let ct = encrypt(
        Algorithm::Des,
        Mode::Cbc,
        Padding::Pkcs5,
        FIPS81_KEY,
        "1234567890abcdef",
        FIPS81_PLAIN,
    );
    assert_eq!(ct.len(), 32);
    assert_eq!(
        &ct[..24],
        hex("e5c7cdde872bf27c43e934008c389c0f683788499a7c05f6").as_slice()
    );
}

#[test]
fn des_ctr_counter_wraps_at_sixty_four_bits() {
    let ct = encrypt(
        Algorithm::Des,
        Mode::Ctr,
        Padding::NoPadding,
        FIPS81_KEY,
        "fffffffffffffffe",
        FIPS81_PLAIN,
    );
    assert_eq!(
        ct,
        hex("f2201e6b2ca51527311603229a02bb26b3bb3dd74104512d")
    );
}
