//! RSA key material and its consistency check.

use core::cmp::Ordering;

use num_bigint::prime::probably_prime;
use num_bigint::{BigUint, IntoBigUint, ModInverse};
use num_integer::Integer;
use num_traits::{One, Zero};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::errors::{Error, Result};

/// Number of Miller-Rabin rounds applied on top of the Baillie-PSW test when
/// checking the stored prime factors.
const PRIME_TEST_ROUNDS: usize = 20;

/// Private half of the key: the modulus and the private exponent.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct PrivateKeyData {
    /// Modulus
    n: Option<BigUint>,
    /// Private exponent
    d: Option<BigUint>,
}

impl Zeroize for PrivateKeyData {
    fn zeroize(&mut self) {
        self.n.zeroize();
        self.d.zeroize();
    }
}

impl Drop for PrivateKeyData {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// RSA key material under construction.
///
/// Every component is optional, so the type can hold a partially supplied
/// key while it is being assembled. Setters normalize their input (absent
/// and zero values collapse to unset, the prime pair is stored larger
/// factor first), but the RSA relations between the components are only
/// enforced by [`validate`](KeyMaterial::validate) and
/// [`is_valid`](KeyMaterial::is_valid).
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyMaterial {
    priv_key: PrivateKeyData,
    /// Public exponent
    e: Option<BigUint>,
    /// Larger prime factor of the modulus
    p: Option<BigUint>,
    /// Smaller prime factor of the modulus
    q: Option<BigUint>,
    /// Euler totient of the modulus
    #[cfg_attr(feature = "serde", serde(skip))]
    phi: Option<BigUint>,
}

impl KeyMaterial {
    /// Minimum admissible public exponent.
    pub const MIN_PUB_EXPONENT: u64 = 3;

    /// Creates key material with every component unset.
    pub fn new() -> KeyMaterial {
        KeyMaterial::default()
    }

    /// Creates key material from the five components of a complete key.
    ///
    /// Each value passes through the corresponding setter, so the usual
    /// normalization applies: zeros collapse to unset, and the prime pair is
    /// reordered or rejected as in [`set_primes`](KeyMaterial::set_primes).
    pub fn from_components(
        prime1: Option<BigUint>,
        prime2: Option<BigUint>,
        n: Option<BigUint>,
        e: Option<BigUint>,
        d: Option<BigUint>,
    ) -> KeyMaterial {
        let mut key = KeyMaterial::new();
        key.set_modulus(n);
        key.set_private_exponent(d);
        key.set_public_exponent(e);
        key.set_primes(prime1, prime2);
        key
    }

    /// Returns the modulus.
    pub fn modulus(&self) -> Option<&BigUint> {
        self.priv_key.n.as_ref()
    }

    /// Returns the private exponent.
    pub fn private_exponent(&self) -> Option<&BigUint> {
        self.priv_key.d.as_ref()
    }

    /// Returns the public exponent.
    pub fn public_exponent(&self) -> Option<&BigUint> {
        self.e.as_ref()
    }

    /// Returns the larger prime factor.
    pub fn prime_one(&self) -> Option<&BigUint> {
        self.p.as_ref()
    }

    /// Returns the smaller prime factor.
    pub fn prime_two(&self) -> Option<&BigUint> {
        self.q.as_ref()
    }

    /// Returns the stored totient.
    pub fn totient(&self) -> Option<&BigUint> {
        self.phi.as_ref()
    }

    /// Returns the larger prime factor minus one, or `None` when it is unset.
    pub fn prime_one_minus_one(&self) -> Option<BigUint> {
        self.p.as_ref().map(|p| p - BigUint::one())
    }

    /// Returns the smaller prime factor minus one, or `None` when it is unset.
    pub fn prime_two_minus_one(&self) -> Option<BigUint> {
        self.q.as_ref().map(|q| q - BigUint::one())
    }

    /// Sets the modulus.
    pub fn set_modulus(&mut self, n: Option<BigUint>) {
        self.priv_key.n = weed_out(n);
    }

    /// Sets the private exponent.
    pub fn set_private_exponent(&mut self, d: Option<BigUint>) {
        self.priv_key.d = weed_out(d);
    }

    /// Sets the public exponent.
    ///
    /// No range checking happens here; an out-of-range exponent is only
    /// caught by [`validate`](KeyMaterial::validate).
    pub fn set_public_exponent(&mut self, e: Option<BigUint>) {
        self.e = weed_out(e);
    }

    /// Sets the prime factors, larger factor first regardless of argument
    /// order.
    ///
    /// If either input is absent or zero, or the two are equal (a modulus
    /// with a repeated factor is never a valid two-prime key), the call
    /// leaves the previously stored pair unchanged.
    pub fn set_primes(&mut self, prime1: Option<BigUint>, prime2: Option<BigUint>) {
        let (a, b) = match (weed_out(prime1), weed_out(prime2)) {
            (Some(a), Some(b)) => (a, b),
            _ => return,
        };

        match a.cmp(&b) {
            Ordering::Greater => {
                self.p = Some(a);
                self.q = Some(b);
            }
            Ordering::Less => {
                self.p = Some(b);
                self.q = Some(a);
            }
            Ordering::Equal => {}
        }
    }

    /// Sets the totient.
    ///
    /// The stored value is overwritten by the next validity check; storing a
    /// divergent value is useful for exercising tampered keys.
    pub fn set_totient(&mut self, phi: Option<BigUint>) {
        self.phi = weed_out(phi);
    }

    /// Recomputes the stored totient as `(p - 1) * (q - 1)`.
    ///
    /// The totient becomes unset when either prime factor is missing.
    pub fn compute_totient(&mut self) -> Option<&BigUint> {
        self.phi = match (self.prime_one_minus_one(), self.prime_two_minus_one()) {
            (Some(pm1), Some(qm1)) => Some(pm1 * qm1),
            _ => None,
        };
        self.phi.as_ref()
    }

    /// Checks that the stored components form a consistent RSA key,
    /// reporting the first violated condition.
    ///
    /// The totient is rederived from the prime factors as a side effect,
    /// overwriting any previously stored value.
    pub fn validate(&mut self) -> Result<()> {
        let (p, q) = match (self.p.clone(), self.q.clone()) {
            (Some(p), Some(q)) => (p, q),
            _ => return Err(Error::MissingComponent),
        };
        let (n, d) = match (self.priv_key.n.clone(), self.priv_key.d.clone()) {
            (Some(n), Some(d)) => (n, d),
            _ => return Err(Error::MissingComponent),
        };
        let e = match self.e.clone() {
            Some(e) => e,
            None => return Err(Error::MissingComponent),
        };

        if !probably_prime(&p, PRIME_TEST_ROUNDS) || !probably_prime(&q, PRIME_TEST_ROUNDS) {
            return Err(Error::InvalidPrime);
        }

        // Rederive the totient from the factors, clobbering any value a
        // caller may have stored.
        let phi = match self.compute_totient() {
            Some(phi) => phi.clone(),
            None => return Err(Error::MissingComponent),
        };

        if &p * &q != n {
            return Err(Error::InvalidModulus);
        }

        check_public_exponent(&e, &n)?;

        if !e.gcd(&phi).is_one() {
            return Err(Error::InvalidExponent);
        }

        if d >= n {
            return Err(Error::PrivateExponentTooLarge);
        }

        match e.mod_inverse(&phi).and_then(|inverse| inverse.into_biguint()) {
            Some(inverse) if inverse == d => Ok(()),
            _ => Err(Error::InvalidPrivateExponent),
        }
    }

    /// Returns `true` when the stored components form a consistent RSA key.
    ///
    /// Same check as [`validate`](KeyMaterial::validate), collapsed to the
    /// plain verdict.
    pub fn is_valid(&mut self) -> bool {
        self.validate().is_ok()
    }
}

impl PartialEq for KeyMaterial {
    #[inline]
    fn eq(&self, other: &KeyMaterial) -> bool {
        self.priv_key.n == other.priv_key.n
            && self.priv_key.d == other.priv_key.d
            && self.e == other.e
            && self.p == other.p
            && self.q == other.q
    }
}

impl Zeroize for KeyMaterial {
    fn zeroize(&mut self) {
        self.priv_key.zeroize();
        self.e.zeroize();
        self.p.zeroize();
        self.q.zeroize();
        self.phi.zeroize();
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Collapses an absent or zero value to the unset state.
fn weed_out(value: Option<BigUint>) -> Option<BigUint> {
    value.filter(|v| !v.is_zero())
}

/// Checks that the public exponent lies in the admissible range
/// `MIN_PUB_EXPONENT..n`.
fn check_public_exponent(e: &BigUint, n: &BigUint) -> Result<()> {
    if *e < BigUint::from(KeyMaterial::MIN_PUB_EXPONENT) {
        return Err(Error::PublicExponentTooSmall);
    }

    if e >= n {
        return Err(Error::PublicExponentTooLarge);
    }

    Ok(())
}
