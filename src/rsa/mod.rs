// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod artifact;
pub mod bigint;
pub mod decrypt;
pub mod encrypt;
pub mod error;
pub mod keygen;
pub mod padding;
pub mod randstate;
pub mod sign;

pub use artifact::{read_private, read_public, write_private, write_public, PublicKeyArtifact};
pub use decrypt::{decrypt_bytes, decrypt_int, decrypt_stream, CiphertextLines};
pub use encrypt::{encrypt_bytes, encrypt_int, encrypt_stream, EncryptBlocks};
pub use error::{RsaError, RsaResult};
pub use keygen::{generate_keypair, KeyMaterial, RsaPrivateKey, RsaPublicKey};
pub use randstate::RandState;
pub use sign::{identity_to_int, sign, verify, MAX_IDENTITY_LEN};
