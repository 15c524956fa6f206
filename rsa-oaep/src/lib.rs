#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod mgf;
mod oaep;

pub use crate::{
    mgf::mgf1,
    oaep::{decode, decode_mgf1, encode, encode_mgf1},
};

use core::fmt;

/// OAEP padding errors.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Message is too long for the given encoded message size.
    DataTooLarge,

    /// Encoded message is too small to hold both hashes, the separator and
    /// the leading zero byte for the chosen digest.
    KeySizeTooSmall,

    /// The random number generator failed while producing the seed.
    RandomGeneration,

    /// Decoding failed.
    ///
    /// Deliberately carries no detail about which padding check failed.
    Decoding,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DataTooLarge => f.write_str("data too large for encoded message size"),
            Error::KeySizeTooSmall => f.write_str("encoded message too small for digest"),
            Error::RandomGeneration => f.write_str("random number generator failure"),
            Error::Decoding => f.write_str("decoding error"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type with the `rsa-oaep` crate's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
