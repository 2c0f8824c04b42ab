//! Request authentication.
//!
//! Relays authenticate searchers by recovering an address from the
//! `X-Flashbots-Signature` header. The header is
//! `<address>:<signature>`, where the signature is an EIP-191 personal-message
//! signature over the `0x`-prefixed hex of `keccak256(body)`.
//!
//! The relay re-derives the message from the raw body bytes it receives, so
//! the signed bytes must be exactly the bytes sent on the wire.
use crate::SigningError;
use alloy::{
    primitives::{keccak256, Address, Signature},
    signers::{Signer, SignerSync},
};

/// Header carrying the signature credential.
pub const SIGNATURE_HEADER: &str = "x-flashbots-signature";

/// Compute the message that gets personal-signed for `payload`: the
/// `0x`-prefixed lowercase hex of `keccak256(payload)`.
pub fn signing_message(payload: &[u8]) -> String {
    hex::encode_prefixed(keccak256(payload))
}

/// Encode a signature as 65 bytes `r || s || v`, with `v` as the raw recovery
/// id (0 or 1).
fn encode_signature(sig: &Signature) -> String {
    let mut bytes = sig.as_bytes();
    bytes[64] = sig.v() as u8;
    hex::encode_prefixed(bytes)
}

/// A [`PayloadSigner`] produces the signature credential for a serialized
/// request payload.
pub trait PayloadSigner {
    /// The address the relay will recover from the credential.
    fn address(&self) -> Address;

    /// Sign `payload`, returning `"<address>:<0x-hex-signature>"`.
    fn sign_payload(&self, payload: &[u8]) -> Result<String, SigningError>;
}

impl<T> PayloadSigner for T
where
    T: Signer + SignerSync,
{
    fn address(&self) -> Address {
        Signer::address(self)
    }

    fn sign_payload(&self, payload: &[u8]) -> Result<String, SigningError> {
        let message = signing_message(payload);
        let sig = self.sign_message_sync(message.as_bytes())?;
        Ok(format!("{}:{}", PayloadSigner::address(self), encode_signature(&sig)))
    }
}

/// Recover the signer address from a credential, verifying it against
/// `payload` the same way a relay does.
///
/// Returns `None` if the credential is malformed or does not recover to the
/// address it claims.
pub fn verify_credential(credential: &str, payload: &[u8]) -> Option<Address> {
    let (claimed, sig) = credential.split_once(':')?;
    let claimed: Address = claimed.parse().ok()?;

    let bytes = hex::decode(sig).ok()?;
    if bytes.len() != 65 {
        return None;
    }
    let sig = Signature::from_raw(&bytes).ok()?;

    let recovered = sig.recover_address_from_msg(signing_message(payload)).ok()?;
    (recovered == claimed).then_some(recovered)
}
