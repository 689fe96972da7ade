//! The ledger as a timelock call target.
//!
//! Governance reaches the ledger only through the timelock, so `ctx.caller`
//! is the timelock's address. Administrative calls succeed once the ledger's
//! minting authority has been handed to that timelock.

use crate::error::LedgerError;
use crate::ledger::VotingLedger;
use gavel_types::{decode_args, Address, CallContext, CallError, CallTarget, TokenAmount};

/// Function signatures the ledger answers to.
pub mod signatures {
    pub const MINT: &str = "mint(address,uint96)";
    pub const SET_MINTER: &str = "setMinter(address)";
    pub const PAUSE_TRANSFER: &str = "pauseTransfer()";
    pub const UNPAUSE_TRANSFER: &str = "unpauseTransfer()";
    pub const CHANGE_NAME: &str = "changeName(string)";
    pub const CHANGE_SYMBOL: &str = "changeSymbol(string)";
    pub const TRANSFER: &str = "transfer(address,uint96)";
    pub const APPROVE: &str = "approve(address,uint96)";
    pub const DELEGATE: &str = "delegate(address)";
}

fn reverted(err: LedgerError) -> CallError {
    CallError::Reverted(err.to_string())
}

impl CallTarget for VotingLedger {
    fn invoke(&mut self, ctx: &CallContext, signature: &str, data: &[u8]) -> Result<(), CallError> {
        if ctx.value != 0 {
            return Err(CallError::Reverted("ledger does not accept native value".into()));
        }
        let caller = &ctx.caller;
        match signature {
            signatures::MINT => {
                let (to, amount): (Address, TokenAmount) = decode_args(data)?;
                self.mint(caller, &to, amount).map_err(reverted)
            }
            signatures::SET_MINTER => {
                let new_minter: Address = decode_args(data)?;
                self.set_minter(caller, &new_minter).map_err(reverted)
            }
            signatures::PAUSE_TRANSFER => self.set_transfer_paused(caller, true).map_err(reverted),
            signatures::UNPAUSE_TRANSFER => {
                self.set_transfer_paused(caller, false).map_err(reverted)
            }
            signatures::CHANGE_NAME => {
                let name: String = decode_args(data)?;
                self.rename(caller, name).map_err(reverted)
            }
            signatures::CHANGE_SYMBOL => {
                let symbol: String = decode_args(data)?;
                self.rebrand(caller, symbol).map_err(reverted)
            }
            signatures::TRANSFER => {
                let (to, amount): (Address, TokenAmount) = decode_args(data)?;
                self.transfer(caller, &to, amount).map_err(reverted)
            }
            signatures::APPROVE => {
                let (spender, amount): (Address, TokenAmount) = decode_args(data)?;
                self.approve(caller, &spender, amount);
                Ok(())
            }
            signatures::DELEGATE => {
                let delegatee: Address = decode_args(data)?;
                self.delegate(caller, &delegatee).map_err(reverted)
            }
            other => Err(CallError::UnknownSignature(other.to_string())),
        }
    }

    fn save_state(&self) -> Result<Vec<u8>, CallError> {
        self.snapshot().map_err(|e| CallError::State(e.to_string()))
    }

    fn load_state(&mut self, bytes: &[u8]) -> Result<(), CallError> {
        self.restore(bytes).map_err(|e| CallError::State(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TokenParams;
    use gavel_nullables::NullChain;
    use gavel_types::{encode_args, EventBus, Timestamp};
    use std::rc::Rc;

    fn addr(name: &str) -> Address {
        Address::new(format!("gvl_{name}"))
    }

    fn ledger() -> VotingLedger {
        VotingLedger::new(
            TokenParams {
                address: addr("token"),
                name: "Token".into(),
                symbol: "TKN".into(),
                initial_holder: addr("timelock"),
                initial_supply: TokenAmount::from_tokens(100),
                minter: addr("timelock"),
                minting_allowed_after: Timestamp::new(0),
                change_implementation_after: Timestamp::new(0),
                transfer_paused: false,
            },
            Rc::new(NullChain::new(1, 10)),
            Rc::new(EventBus::new()),
        )
    }

    fn ctx(caller: &str) -> CallContext {
        CallContext {
            caller: addr(caller),
            value: 0,
        }
    }

    #[test]
    fn minter_can_be_reassigned_by_call() {
        let mut l = ledger();
        let data = encode_args(&addr("new_minter")).unwrap();
        l.invoke(&ctx("timelock"), signatures::SET_MINTER, &data).unwrap();
        assert_eq!(l.minter(), &addr("new_minter"));
    }

    #[test]
    fn unauthorized_call_reverts() {
        let mut l = ledger();
        let result = l.invoke(&ctx("stranger"), signatures::PAUSE_TRANSFER, &[]);
        assert!(matches!(result, Err(CallError::Reverted(_))));
        assert!(!l.transfer_paused());
    }

    #[test]
    fn mint_and_transfer_by_call() {
        let mut l = ledger();
        let data = encode_args(&(addr("alice"), TokenAmount::from_tokens(5))).unwrap();
        l.invoke(&ctx("timelock"), signatures::MINT, &data).unwrap();
        l.invoke(&ctx("timelock"), signatures::TRANSFER, &data).unwrap();
        assert_eq!(l.balance_of(&addr("alice")), TokenAmount::from_tokens(10));
    }

    #[test]
    fn unknown_signature_and_bad_arguments() {
        let mut l = ledger();
        assert_eq!(
            l.invoke(&ctx("timelock"), "burn(uint96)", &[]),
            Err(CallError::UnknownSignature("burn(uint96)".into()))
        );
        assert!(matches!(
            l.invoke(&ctx("timelock"), signatures::MINT, &[1, 2]),
            Err(CallError::BadArguments(_))
        ));
    }

    #[test]
    fn native_value_is_refused() {
        let mut l = ledger();
        let call = CallContext {
            caller: addr("timelock"),
            value: 1,
        };
        assert!(l.invoke(&call, signatures::PAUSE_TRANSFER, &[]).is_err());
    }

    #[test]
    fn saved_state_round_trips_through_target_interface() {
        let mut l = ledger();
        let saved = l.save_state().unwrap();
        l.invoke(&ctx("timelock"), signatures::PAUSE_TRANSFER, &[]).unwrap();
        l.load_state(&saved).unwrap();
        assert!(!l.transfer_paused());
    }
}
