#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

#[cfg(feature = "std")]
extern crate std;

pub use num_bigint::BigUint;

pub mod errors;

mod key;

pub use crate::{
    errors::{Error, Result},
    key::KeyMaterial,
};
