//! Deployment: build the ledger, the delay queue and the governor and connect them.
//!
//! Wiring follows the reference deployment. The timelock is the ledger's
//! minting authority, the governor is the timelock's admin, and both the
//! ledger and the governor's settings are registered as timelock targets.
//! Every reference is explicit; nothing is global.

use std::cell::RefCell;
use std::rc::Rc;

use gavel_crypto::{blake2b_256, derive_address};
use gavel_governance::{GovernorParams, ProposalEngine};
use gavel_timelock::{DelayQueue, TimelockParams};
use gavel_token::{TokenParams, VotingLedger};
use gavel_types::{Address, ChainClock, EventBus, PublicKey, Timestamp, TokenAmount, WallClock};
use tracing::info;

use crate::config::SystemConfig;
use crate::logging::{audit_listener, init_logging};
use crate::SystemError;

/// Deterministic address for a named component of this deployment.
pub fn component_address(label: &str) -> Address {
    derive_address(&PublicKey(blake2b_256(format!("gavel/component/{label}").as_bytes())))
}

pub struct GovernanceSystem {
    config: SystemConfig,
    events: Rc<EventBus>,
    ledger: Rc<RefCell<VotingLedger>>,
    queue: Rc<RefCell<DelayQueue>>,
    engine: ProposalEngine,
}

impl GovernanceSystem {
    /// Validate `config` and deploy. The whole initial supply goes to `holder`.
    pub fn deploy<C: ChainClock + 'static>(
        config: SystemConfig,
        holder: Address,
        guardian: Option<Address>,
        clock: Rc<C>,
    ) -> Result<Self, SystemError> {
        config.validate()?;
        let events = Rc::new(EventBus::new());
        if config.logging.audit {
            events.subscribe(audit_listener());
        }

        let token_address = component_address("token");
        let timelock_address = component_address("timelock");
        let governor_address = component_address("governor");

        let ledger = Rc::new(RefCell::new(VotingLedger::new(
            TokenParams {
                address: token_address.clone(),
                name: config.token.name.clone(),
                symbol: config.token.symbol.clone(),
                initial_holder: holder.clone(),
                initial_supply: TokenAmount::from_tokens(config.token.initial_supply),
                minter: timelock_address.clone(),
                minting_allowed_after: Timestamp::new(config.token.minting_allowed_after),
                change_implementation_after: Timestamp::new(
                    config.token.change_implementation_after,
                ),
                transfer_paused: config.token.transfer_paused,
            },
            clock.clone() as Rc<dyn ChainClock>,
            events.clone(),
        )));

        let queue = Rc::new(RefCell::new(DelayQueue::new(
            TimelockParams {
                address: timelock_address.clone(),
                admin: governor_address.clone(),
                delay: config.timelock.delay,
                grace_period: config.timelock.grace_period,
            },
            clock.clone() as Rc<dyn WallClock>,
            events.clone(),
        )?));
        queue
            .borrow_mut()
            .register_target(token_address.clone(), ledger.clone());

        let engine = ProposalEngine::new(
            GovernorParams {
                address: governor_address.clone(),
                voting_delay: config.governor.voting_delay,
                voting_period: config.governor.voting_period,
                proposal_threshold: TokenAmount::from_tokens(config.governor.proposal_threshold),
                quorum: TokenAmount::from_tokens(config.governor.quorum),
                guardian,
            },
            ledger.clone(),
            queue.clone(),
            clock as Rc<dyn ChainClock>,
            events.clone(),
        )?;

        info!(
            token = %token_address,
            timelock = %timelock_address,
            governor = %governor_address,
            holder = %holder,
            "governance system deployed"
        );
        Ok(Self {
            config,
            events,
            ledger,
            queue,
            engine,
        })
    }

    /// Install the global subscriber described by the `[logging]` table.
    pub fn init_logging(&self) -> Result<(), SystemError> {
        init_logging(self.config.logging.format, &self.config.logging.level)
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn events(&self) -> &Rc<EventBus> {
        &self.events
    }

    pub fn ledger(&self) -> &Rc<RefCell<VotingLedger>> {
        &self.ledger
    }

    pub fn queue(&self) -> &Rc<RefCell<DelayQueue>> {
        &self.queue
    }

    pub fn engine(&self) -> &ProposalEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ProposalEngine {
        &mut self.engine
    }

    pub fn token_address(&self) -> Address {
        self.ledger.borrow().address().clone()
    }

    pub fn timelock_address(&self) -> Address {
        self.queue.borrow().address().clone()
    }

    pub fn governor_address(&self) -> &Address {
        self.engine.address()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gavel_nullables::NullChain;

    #[test]
    fn component_addresses_are_distinct_and_valid() {
        let token = component_address("token");
        let timelock = component_address("timelock");
        assert_ne!(token, timelock);
        assert!(token.is_valid());
        assert_eq!(token, component_address("token"));
    }

    #[test]
    fn deploy_wires_roles() {
        let holder = Address::new("gvl_holder");
        let system = GovernanceSystem::deploy(
            SystemConfig::default(),
            holder.clone(),
            None,
            Rc::new(NullChain::new(1, 1_700_000_000)),
        )
        .unwrap();

        let ledger = system.ledger().borrow();
        assert_eq!(ledger.minter(), &system.timelock_address());
        assert_eq!(ledger.balance_of(&holder), TokenAmount::from_tokens(10_000_000));
        assert_eq!(system.queue().borrow().admin(), system.governor_address());
        assert_eq!(system.queue().borrow().delay(), 259_200);
        assert_eq!(system.engine().voting_period(), 6_000);
    }

    #[test]
    fn deploy_can_start_paused() {
        let mut config = SystemConfig::default();
        config.token.transfer_paused = true;
        config.token.change_implementation_after = 1_700_000_500;
        let system = GovernanceSystem::deploy(
            config,
            Address::new("gvl_holder"),
            None,
            Rc::new(NullChain::new(1, 1_700_000_000)),
        )
        .unwrap();

        let ledger = system.ledger().borrow();
        assert!(ledger.transfer_paused());
        assert_eq!(ledger.change_implementation_after(), Timestamp::new(1_700_000_500));
    }

    #[test]
    fn logging_is_installed_from_the_config_once() {
        let mut config = SystemConfig::default();
        config.logging.level = "warn".into();
        let system = GovernanceSystem::deploy(
            config,
            Address::new("gvl_holder"),
            None,
            Rc::new(NullChain::new(1, 0)),
        )
        .unwrap();

        system.init_logging().unwrap();
        assert!(matches!(system.init_logging(), Err(SystemError::Logging(_))));
    }

    #[test]
    fn deploy_rejects_invalid_config() {
        let mut config = SystemConfig::default();
        config.timelock.delay = 0;
        let result = GovernanceSystem::deploy(
            config,
            Address::new("gvl_holder"),
            None,
            Rc::new(NullChain::new(1, 0)),
        );
        assert!(matches!(result, Err(SystemError::Config(_))));
    }
}
