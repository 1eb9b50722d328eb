//! Error types.

/// Alias for [`core::result::Result`] with the `rsa-keycheck` [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// The reasons a piece of key material can fail validation.
///
/// [`KeyMaterial::validate`][crate::KeyMaterial::validate] reports the first
/// violated condition; [`KeyMaterial::is_valid`][crate::KeyMaterial::is_valid]
/// flattens all of them to `false`.
#[non_exhaustive]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// One of the five key components has never been supplied.
    MissingComponent,

    /// A stored prime factor is not actually prime.
    InvalidPrime,

    /// The modulus is not the product of the stored prime factors.
    InvalidModulus,

    /// The public exponent is not coprime to the totient, so no private
    /// exponent can exist for it.
    InvalidExponent,

    /// The public exponent is below the smallest admissible value.
    PublicExponentTooSmall,

    /// The public exponent is not a proper residue of the modulus.
    PublicExponentTooLarge,

    /// The private exponent is not a proper residue of the modulus.
    PrivateExponentTooLarge,

    /// The private exponent is not the modular inverse of the public
    /// exponent.
    InvalidPrivateExponent,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::MissingComponent => write!(f, "missing key component"),
            Error::InvalidPrime => write!(f, "invalid prime value"),
            Error::InvalidModulus => write!(f, "invalid modulus"),
            Error::InvalidExponent => write!(f, "invalid exponent"),
            Error::PublicExponentTooSmall => write!(f, "public exponent too small"),
            Error::PublicExponentTooLarge => write!(f, "public exponent too large"),
            Error::PrivateExponentTooLarge => write!(f, "private exponent too large"),
            Error::InvalidPrivateExponent => write!(f, "invalid private exponent"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
