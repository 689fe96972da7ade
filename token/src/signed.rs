//! Delegation by signed message.
//!
//! A holder who cannot (or does not want to) submit a transaction signs a
//! typed [`DelegationMessage`] off-line; anyone may then relay it. The message
//! is bound to one ledger (its address is part of the signed digest), carries
//! the signer's next nonce so it can be used once, and an expiry time.

use crate::error::LedgerError;
use crate::ledger::VotingLedger;
use gavel_crypto::{blake2b_256_multi, derive_address, sign_message, verify_signature};
use gavel_types::{Address, PrivateKey, PublicKey, Signature, Timestamp};
use serde::{Deserialize, Serialize};

/// Domain tag mixed into every delegation digest.
const DELEGATION_DOMAIN: &[u8] = b"gavel/delegation/v1";

/// The typed payload a holder signs to delegate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationMessage {
    pub delegatee: Address,
    pub nonce: u64,
    pub expiry: Timestamp,
}

impl DelegationMessage {
    /// The 32-byte digest that is actually signed, scoped to `ledger`.
    pub fn digest(&self, ledger: &Address) -> [u8; 32] {
        let ledger = ledger.as_str().as_bytes();
        let delegatee = self.delegatee.as_str().as_bytes();
        let ledger_len = (ledger.len() as u64).to_le_bytes();
        let delegatee_len = (delegatee.len() as u64).to_le_bytes();
        blake2b_256_multi(&[
            DELEGATION_DOMAIN,
            &ledger_len,
            ledger,
            &delegatee_len,
            delegatee,
            &self.nonce.to_le_bytes(),
            &self.expiry.as_secs().to_le_bytes(),
        ])
    }

    pub fn sign(&self, ledger: &Address, key: &PrivateKey) -> Signature {
        sign_message(&self.digest(ledger), key)
    }
}

impl VotingLedger {
    /// Apply a delegation signed by the holder of `public_key`.
    ///
    /// The holder is the address derived from `public_key`. On success the
    /// holder's nonce advances, so the same message can never be replayed.
    pub fn delegate_by_sig(
        &mut self,
        message: &DelegationMessage,
        public_key: &PublicKey,
        signature: &Signature,
    ) -> Result<Address, LedgerError> {
        if !verify_signature(&message.digest(&self.address), signature, public_key) {
            return Err(LedgerError::InvalidSignature);
        }
        let signer = derive_address(public_key);
        let expected = self.nonce(&signer);
        if message.nonce != expected {
            return Err(LedgerError::InvalidNonce {
                expected,
                got: message.nonce,
            });
        }
        let now = self.clock.timestamp();
        if now > message.expiry {
            return Err(LedgerError::SignatureExpired {
                expiry: message.expiry,
                now,
            });
        }
        self.delegate(&signer, &message.delegatee)?;
        self.state.nonces.insert(signer.clone(), expected + 1);
        Ok(signer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TokenParams;
    use gavel_crypto::keypair_from_seed;
    use gavel_nullables::NullChain;
    use gavel_types::{EventBus, KeyPair, TokenAmount};
    use std::rc::Rc;

    fn addr(name: &str) -> Address {
        Address::new(format!("gvl_{name}"))
    }

    fn setup() -> (Rc<NullChain>, VotingLedger, KeyPair, Address) {
        let chain = Rc::new(NullChain::new(1, 1_000));
        let key = keypair_from_seed(&[11u8; 32]);
        let signer = derive_address(&key.public);
        let ledger = VotingLedger::new(
            TokenParams {
                address: addr("token"),
                name: "Token".into(),
                symbol: "TKN".into(),
                initial_holder: signer.clone(),
                initial_supply: TokenAmount::from_tokens(500),
                minter: addr("minter"),
                minting_allowed_after: Timestamp::new(0),
                change_implementation_after: Timestamp::new(0),
                transfer_paused: false,
            },
            chain.clone(),
            Rc::new(EventBus::new()),
        );
        (chain, ledger, key, signer)
    }

    fn message(nonce: u64) -> DelegationMessage {
        DelegationMessage {
            delegatee: addr("bob"),
            nonce,
            expiry: Timestamp::new(2_000),
        }
    }

    #[test]
    fn valid_signature_delegates_and_consumes_nonce() {
        let (_chain, mut ledger, key, signer) = setup();
        let msg = message(0);
        let sig = msg.sign(ledger.address(), &key.private);

        let who = ledger.delegate_by_sig(&msg, &key.public, &sig).unwrap();
        assert_eq!(who, signer);
        assert_eq!(ledger.delegates(&signer), addr("bob"));
        assert_eq!(ledger.current_votes(&addr("bob")), TokenAmount::from_tokens(500));
        assert_eq!(ledger.nonce(&signer), 1);
    }

    #[test]
    fn replayed_message_is_rejected() {
        let (_chain, mut ledger, key, _) = setup();
        let msg = message(0);
        let sig = msg.sign(ledger.address(), &key.private);
        ledger.delegate_by_sig(&msg, &key.public, &sig).unwrap();
        assert_eq!(
            ledger.delegate_by_sig(&msg, &key.public, &sig),
            Err(LedgerError::InvalidNonce {
                expected: 1,
                got: 0
            })
        );
    }

    #[test]
    fn expired_message_is_rejected() {
        let (chain, mut ledger, key, signer) = setup();
        let msg = message(0);
        let sig = msg.sign(ledger.address(), &key.private);
        chain.set_time(2_001);
        assert!(matches!(
            ledger.delegate_by_sig(&msg, &key.public, &sig),
            Err(LedgerError::SignatureExpired { .. })
        ));
        assert_eq!(ledger.nonce(&signer), 0);
    }

    #[test]
    fn signature_for_another_ledger_is_rejected() {
        let (_chain, mut ledger, key, _) = setup();
        let msg = message(0);
        let sig = msg.sign(&addr("other_token"), &key.private);
        assert_eq!(
            ledger.delegate_by_sig(&msg, &key.public, &sig),
            Err(LedgerError::InvalidSignature)
        );
    }

    #[test]
    fn tampered_message_is_rejected() {
        let (_chain, mut ledger, key, _) = setup();
        let sig = message(0).sign(ledger.address(), &key.private);
        let mut tampered = message(0);
        tampered.delegatee = addr("mallory");
        assert_eq!(
            ledger.delegate_by_sig(&tampered, &key.public, &sig),
            Err(LedgerError::InvalidSignature)
        );
    }
}
