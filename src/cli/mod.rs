// Command line drivers for key generation, encryption and decryption

pub mod app;
