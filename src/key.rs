//! Reconstruction of RSA public keys from published JWKS records

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use jsonwebtoken::DecodingKey;
use rsa::traits::PublicKeyParts;
use rsa::BigUint;
use rsa::RsaPublicKey;
use serde::Deserialize;

use crate::error::key_decode_error;
use crate::error::Result;

/// Largest modulus accepted from a provider, in bits
const MAX_MODULUS_BITS: usize = 16384;

/// Key set as published on the provider's key endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SigningKeySet {
    pub keys: Vec<SigningKeyRecord>,
}

impl SigningKeySet {
    /// First record whose key id matches
    pub fn find(&self, key_id: &str) -> Option<&SigningKeyRecord> {
        self.keys.iter().find(|record| record.key_id == key_id)
    }
}

/// A single published key
///
/// Fields are kept verbatim; nothing is decoded until [`PublicKey::decode`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SigningKeyRecord {
    #[serde(rename = "kid", default)]
    pub key_id: String,
    #[serde(rename = "alg", default)]
    pub algorithm: String,
    #[serde(rename = "kty", default)]
    pub key_type: String,
    /// Base64url modulus, possibly unpadded
    #[serde(rename = "n", default)]
    pub modulus: String,
    /// Base64url exponent, possibly unpadded
    #[serde(rename = "e", default)]
    pub exponent: String,
    #[serde(rename = "use", default)]
    pub usage: String,
}

/// An RSA public key ready for signature verification
#[derive(Clone)]
pub struct PublicKey {
    key_id: String,
    inner: RsaPublicKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicKey")
            .field("key_id", &self.key_id)
            .field("modulus_bits", &self.inner.n().bits())
            .field("exponent", self.inner.e())
            .finish()
    }
}

impl PublicKey {
    /// Build a public key from a published record
    ///
    /// # Errors
    /// Returns `Error::KeyDecode` on bad base64, empty fields, a non-RSA key
    /// type or an unusable modulus/exponent pair
    pub fn decode(record: &SigningKeyRecord) -> Result<Self> {
        if !record.key_type.is_empty() && record.key_type != "RSA" {
            return Err(key_decode_error("kty", format!("unsupported key type {:?}", record.key_type)));
        }

        let modulus = decode_modulus(&record.modulus)?;
        let exponent = decode_exponent(&record.exponent)?;

        let inner = RsaPublicKey::new_with_max_size(modulus, BigUint::from(exponent), MAX_MODULUS_BITS)
            .map_err(|e| key_decode_error("n/e", e))?;

        let exponent_bytes = exponent.to_be_bytes();
        let first_significant = exponent_bytes
            .iter()
            .position(|byte| *byte != 0)
            .unwrap_or(exponent_bytes.len() - 1);
        let decoding_key =
            DecodingKey::from_rsa_raw_components(&inner.n().to_bytes_be(), &exponent_bytes[first_significant..]);

        Ok(Self {
            key_id: record.key_id.clone(),
            inner,
            decoding_key,
        })
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn modulus(&self) -> &BigUint {
        self.inner.n()
    }

    pub fn exponent(&self) -> &BigUint {
        self.inner.e()
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

/// Decode a big-endian unsigned modulus
pub fn decode_modulus(encoded: &str) -> Result<BigUint> {
    let bytes = decode_base64url("n", encoded)?;
    Ok(BigUint::from_bytes_be(&bytes))
}

/// Decode a public exponent into a 32-bit integer
///
/// Short encodings (commonly `01 00 01`) are left-padded with zeros; longer
/// ones are read from their first four bytes.
pub fn decode_exponent(encoded: &str) -> Result<u32> {
    let bytes = decode_base64url("e", encoded)?;

    let mut buf = [0u8; 4];
    if bytes.len() < 4 {
        buf[4 - bytes.len()..].copy_from_slice(&bytes);
    } else {
        buf.copy_from_slice(&bytes[..4]);
    }

    Ok(u32::from_be_bytes(buf))
}

fn decode_base64url(field: &str, encoded: &str) -> Result<Vec<u8>> {
    if encoded.is_empty() {
        return Err(key_decode_error(field, "field is empty"));
    }

    let mut padded = encoded.to_string();
    while padded.len() % 4 != 0 {
        padded.push('=');
    }

    let bytes = URL_SAFE
        .decode(padded.as_bytes())
        .map_err(|e| key_decode_error(field, e))?;

    if bytes.is_empty() {
        return Err(key_decode_error(field, "decodes to no bytes"));
    }

    Ok(bytes)
}
