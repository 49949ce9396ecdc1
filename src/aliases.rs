// src/aliases.rs
//! Secret containers backed by secure-gate
//!
//! Raw key bytes never live in a bare `Vec<u8>`: they sit in a
//! zeroize-on-drop wrapper and must be exposed explicitly.

pub use secure_gate::dynamic_alias;

// Variable-length symmetric key bytes (8, 16, 24 or 32 bytes)
dynamic_alias!(KeyBytes, Vec<u8>);
