//! The delay queue.
//!
//! A queued action is identified only by the hash of its fields and eta. The
//! queue knows nothing about proposals: whoever holds the admin role may
//! schedule, execute and cancel. Its own parameters (delay, admin) change only
//! through actions that target the queue's own address, so they are subject
//! to the same delay as everything else.

use crate::error::TimelockError;
use crate::params::{check_delay, TimelockParams};
use gavel_crypto::hash_action;
use gavel_types::{
    decode_args, Action, ActionHash, Address, CallContext, CallError, CallTarget, Event, EventBus,
    Timestamp, WallClock,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Signatures the queue answers when an action targets its own address.
pub mod signatures {
    pub const SET_DELAY: &str = "setDelay(uint64)";
    pub const TRANSFER_ADMIN: &str = "transferAdmin(address)";
}

/// A component reachable by queued actions.
pub type SharedTarget = Rc<RefCell<dyn CallTarget>>;

#[derive(Clone)]
struct QueueState {
    admin: Address,
    delay: u64,
    queued: HashMap<ActionHash, Timestamp>,
    balance: u128,
}

pub struct DelayQueue {
    address: Address,
    grace_period: u64,
    state: QueueState,
    targets: HashMap<Address, SharedTarget>,
    clock: Rc<dyn WallClock>,
    events: Rc<EventBus>,
}

impl DelayQueue {
    pub fn new(
        params: TimelockParams,
        clock: Rc<dyn WallClock>,
        events: Rc<EventBus>,
    ) -> Result<Self, TimelockError> {
        check_delay(params.delay)?;
        Ok(Self {
            address: params.address,
            grace_period: params.grace_period,
            state: QueueState {
                admin: params.admin,
                delay: params.delay,
                queued: HashMap::new(),
                balance: 0,
            },
            targets: HashMap::new(),
            clock,
            events,
        })
    }

    /// Make `target` reachable by actions addressed to `address`.
    pub fn register_target(&mut self, address: Address, target: SharedTarget) {
        debug!(target = %address, "call target registered");
        self.targets.insert(address, target);
    }

    /// Credit native value that executed actions may forward.
    pub fn deposit(&mut self, amount: u128) -> Result<(), TimelockError> {
        self.state.balance = self
            .state
            .balance
            .checked_add(amount)
            .ok_or(TimelockError::Overflow)?;
        Ok(())
    }

    // ── Reads ───────────────────────────────────────────────────────────

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn admin(&self) -> &Address {
        &self.state.admin
    }

    pub fn delay(&self) -> u64 {
        self.state.delay
    }

    pub fn grace_period(&self) -> u64 {
        self.grace_period
    }

    pub fn balance(&self) -> u128 {
        self.state.balance
    }

    pub fn is_queued(&self, hash: &ActionHash) -> bool {
        self.state.queued.contains_key(hash)
    }

    pub fn queued_eta(&self, hash: &ActionHash) -> Option<Timestamp> {
        self.state.queued.get(hash).copied()
    }

    pub fn queued_count(&self) -> usize {
        self.state.queued.len()
    }

    /// Hash under which `action` is (or would be) queued for `eta`.
    pub fn hash_of(&self, action: &Action, eta: Timestamp) -> ActionHash {
        hash_action(action, eta)
    }

    // ── Scheduling ──────────────────────────────────────────────────────

    /// Queue one action to become executable at `eta`.
    pub fn schedule(
        &mut self,
        caller: &Address,
        action: &Action,
        eta: Timestamp,
    ) -> Result<ActionHash, TimelockError> {
        self.require_admin(caller)?;
        self.check_eta(eta)?;
        let hash = hash_action(action, eta);
        if self.is_queued(&hash) {
            return Err(TimelockError::AlreadyQueued(hash));
        }
        self.enqueue(hash, action, eta);
        Ok(hash)
    }

    /// Queue several actions under one eta. Either all are queued or none.
    pub fn schedule_batch(
        &mut self,
        caller: &Address,
        actions: &[Action],
        eta: Timestamp,
    ) -> Result<Vec<ActionHash>, TimelockError> {
        self.require_admin(caller)?;
        self.check_eta(eta)?;
        let mut seen = HashSet::with_capacity(actions.len());
        let hashes: Vec<ActionHash> = actions.iter().map(|a| hash_action(a, eta)).collect();
        for hash in &hashes {
            if self.is_queued(hash) || !seen.insert(*hash) {
                return Err(TimelockError::AlreadyQueued(*hash));
            }
        }
        for (action, hash) in actions.iter().zip(&hashes) {
            self.enqueue(*hash, action, eta);
        }
        Ok(hashes)
    }

    /// Remove a queued action without executing it.
    pub fn cancel(&mut self, caller: &Address, hash: &ActionHash) -> Result<(), TimelockError> {
        self.require_admin(caller)?;
        if self.state.queued.remove(hash).is_none() {
            return Err(TimelockError::NotQueued(*hash));
        }
        info!(hash = %hash, "action canceled");
        self.events.emit(Event::ActionCanceled { hash: *hash });
        Ok(())
    }

    // ── Execution ───────────────────────────────────────────────────────

    /// Execute one queued action.
    ///
    /// The hash is removed before the call is made. If the call reverts the
    /// error is `ActionReverted` and the action stays unqueued; it has to be
    /// scheduled again.
    pub fn execute(
        &mut self,
        caller: &Address,
        action: &Action,
        eta: Timestamp,
    ) -> Result<ActionHash, TimelockError> {
        self.require_admin(caller)?;
        let hash = self.check_executable(action, eta)?;
        self.state.queued.remove(&hash);
        self.dispatch(hash, action, eta)?;
        Ok(hash)
    }

    /// Execute several actions queued under one eta, all or nothing.
    ///
    /// Timing and membership are checked for every action before the first
    /// call. If any call reverts, the queue, every target touched by the
    /// batch and the buffered events are restored to their prior state.
    pub fn execute_batch(
        &mut self,
        caller: &Address,
        actions: &[Action],
        eta: Timestamp,
    ) -> Result<Vec<ActionHash>, TimelockError> {
        self.require_admin(caller)?;
        let hashes = actions
            .iter()
            .map(|action| self.check_executable(action, eta))
            .collect::<Result<Vec<_>, _>>()?;

        let saved_queue = self.state.clone();
        let saved_targets = self.save_targets(actions)?;
        self.events.begin();

        let mut outcome = Ok(());
        for (action, hash) in actions.iter().zip(&hashes) {
            if self.state.queued.remove(hash).is_none() {
                outcome = Err(TimelockError::NotQueued(*hash));
                break;
            }
            if let Err(err) = self.dispatch(*hash, action, eta) {
                outcome = Err(err);
                break;
            }
        }

        match outcome {
            Ok(()) => {
                self.events.commit();
                Ok(hashes)
            }
            Err(err) => {
                self.events.rollback();
                self.state = saved_queue;
                let mut restore_failure = None;
                for (target, bytes) in saved_targets {
                    if let Err(e) = target.borrow_mut().load_state(&bytes) {
                        warn!(error = %e, "target state not restored");
                        restore_failure.get_or_insert(TimelockError::TargetState(e.to_string()));
                    }
                }
                warn!(error = %err, actions = actions.len(), "batch rolled back");
                match restore_failure {
                    Some(failure) => Err(failure),
                    None => Err(err),
                }
            }
        }
    }

    // ── Self-administration ─────────────────────────────────────────────

    /// Change the delay. Only the queue itself may call this, which in
    /// practice means through an executed action targeting its address.
    pub fn set_delay(&mut self, caller: &Address, delay: u64) -> Result<(), TimelockError> {
        self.require_self(caller)?;
        self.apply_delay(delay)
    }

    /// Hand the admin role to `new_admin`. Same restriction as [`Self::set_delay`].
    pub fn transfer_admin(
        &mut self,
        caller: &Address,
        new_admin: &Address,
    ) -> Result<(), TimelockError> {
        self.require_self(caller)?;
        self.apply_admin(new_admin.clone());
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn require_admin(&self, caller: &Address) -> Result<(), TimelockError> {
        if caller != &self.state.admin {
            return Err(TimelockError::NotAuthorized {
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    fn require_self(&self, caller: &Address) -> Result<(), TimelockError> {
        if caller != &self.address {
            return Err(TimelockError::NotAuthorized {
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    fn check_eta(&self, eta: Timestamp) -> Result<(), TimelockError> {
        let now = self.clock.timestamp();
        match now.checked_add_secs(self.state.delay) {
            Some(earliest) if eta >= earliest => Ok(()),
            earliest => Err(TimelockError::EtaTooSoon {
                eta,
                earliest: earliest.unwrap_or(Timestamp::new(u64::MAX)),
            }),
        }
    }

    fn enqueue(&mut self, hash: ActionHash, action: &Action, eta: Timestamp) {
        self.state.queued.insert(hash, eta);
        info!(
            hash = %hash,
            target = %action.target,
            signature = %action.signature,
            eta = %eta,
            "action scheduled"
        );
        self.events.emit(Event::ActionScheduled { hash, eta });
    }

    fn check_executable(
        &self,
        action: &Action,
        eta: Timestamp,
    ) -> Result<ActionHash, TimelockError> {
        let hash = hash_action(action, eta);
        if !self.is_queued(&hash) {
            return Err(TimelockError::NotQueued(hash));
        }
        let now = self.clock.timestamp();
        if now < eta {
            return Err(TimelockError::TooEarly { eta, now });
        }
        if let Some(deadline) = eta.checked_add_secs(self.grace_period) {
            if now > deadline {
                return Err(TimelockError::TooLate { deadline, now });
            }
        }
        Ok(hash)
    }

    fn dispatch(
        &mut self,
        hash: ActionHash,
        action: &Action,
        eta: Timestamp,
    ) -> Result<(), TimelockError> {
        let result = if action.target == self.address {
            self.invoke_self(&action.signature, &action.data)
        } else {
            self.invoke_target(action)
        };
        match result {
            Ok(()) => {
                info!(
                    hash = %hash,
                    target = %action.target,
                    signature = %action.signature,
                    "action executed"
                );
                self.events.emit(Event::ActionExecuted {
                    hash,
                    target: action.target.clone(),
                    signature: action.signature.clone(),
                    eta,
                });
                Ok(())
            }
            Err(err) => {
                warn!(hash = %hash, target = %action.target, error = %err, "action reverted");
                Err(TimelockError::ActionReverted {
                    hash,
                    reason: err.to_string(),
                })
            }
        }
    }

    /// Forward the call and its value; the value is refunded if the call reverts.
    fn invoke_target(&mut self, action: &Action) -> Result<(), CallError> {
        let target = self
            .targets
            .get(&action.target)
            .cloned()
            .ok_or_else(|| CallError::NoTarget(action.target.clone()))?;
        if action.value > self.state.balance {
            return Err(CallError::InsufficientValue {
                needed: action.value,
                available: self.state.balance,
            });
        }
        self.state.balance -= action.value;
        let ctx = CallContext {
            caller: self.address.clone(),
            value: action.value,
        };
        let result = target
            .borrow_mut()
            .invoke(&ctx, &action.signature, &action.data);
        if result.is_err() {
            self.state.balance += action.value;
        }
        result
    }

    fn invoke_self(&mut self, signature: &str, data: &[u8]) -> Result<(), CallError> {
        match signature {
            signatures::SET_DELAY => {
                let delay: u64 = decode_args(data)?;
                self.apply_delay(delay)
                    .map_err(|e| CallError::Reverted(e.to_string()))
            }
            signatures::TRANSFER_ADMIN => {
                let admin: Address = decode_args(data)?;
                self.apply_admin(admin);
                Ok(())
            }
            other => Err(CallError::UnknownSignature(other.to_string())),
        }
    }

    fn apply_delay(&mut self, delay: u64) -> Result<(), TimelockError> {
        check_delay(delay)?;
        let previous = std::mem::replace(&mut self.state.delay, delay);
        info!(previous, current = delay, "queue delay changed");
        self.events.emit(Event::DelayChanged {
            previous,
            current: delay,
        });
        Ok(())
    }

    fn apply_admin(&mut self, admin: Address) {
        let previous = std::mem::replace(&mut self.state.admin, admin.clone());
        info!(previous = %previous, current = %admin, "queue admin changed");
        self.events.emit(Event::AdminChanged {
            previous,
            current: admin,
        });
    }

    /// Snapshot every distinct registered target the batch will call.
    fn save_targets(
        &self,
        actions: &[Action],
    ) -> Result<Vec<(SharedTarget, Vec<u8>)>, TimelockError> {
        let mut seen = HashSet::new();
        let mut saved = Vec::new();
        for action in actions {
            if action.target == self.address || !seen.insert(&action.target) {
                continue;
            }
            if let Some(target) = self.targets.get(&action.target) {
                let bytes = target
                    .borrow()
                    .save_state()
                    .map_err(|e| TimelockError::TargetState(e.to_string()))?;
                saved.push((Rc::clone(target), bytes));
            }
        }
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{DEFAULT_GRACE_PERIOD, MINIMUM_DELAY};
    use gavel_nullables::{NullChain, RecordingTarget};
    use gavel_types::encode_args;

    const DELAY: u64 = 172_800;
    const START: u64 = 1_000_000;

    fn addr(name: &str) -> Address {
        Address::new(format!("gvl_{name}"))
    }

    struct Fixture {
        chain: Rc<NullChain>,
        queue: DelayQueue,
        target: Rc<RefCell<RecordingTarget>>,
        events: Rc<RefCell<Vec<Event>>>,
    }

    fn fixture_with(target: RecordingTarget) -> Fixture {
        let chain = Rc::new(NullChain::new(1, START));
        let bus = Rc::new(EventBus::new());
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        bus.subscribe(Box::new(move |e| sink.borrow_mut().push(e.clone())));
        let mut queue = DelayQueue::new(
            TimelockParams {
                address: addr("timelock"),
                admin: addr("admin"),
                delay: DELAY,
                grace_period: DEFAULT_GRACE_PERIOD,
            },
            chain.clone(),
            bus,
        )
        .unwrap();
        let target = Rc::new(RefCell::new(target));
        queue.register_target(addr("target"), target.clone());
        Fixture {
            chain,
            queue,
            target,
            events,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(RecordingTarget::new())
    }

    fn ping() -> Action {
        Action::new(addr("target"), "ping()", vec![])
    }

    fn eta() -> Timestamp {
        Timestamp::new(START + DELAY)
    }

    #[test]
    fn construction_rejects_delay_out_of_range() {
        let result = DelayQueue::new(
            TimelockParams {
                address: addr("timelock"),
                admin: addr("admin"),
                delay: MINIMUM_DELAY - 1,
                grace_period: DEFAULT_GRACE_PERIOD,
            },
            Rc::new(NullChain::new(1, 0)),
            Rc::new(EventBus::new()),
        );
        assert!(matches!(result, Err(TimelockError::DelayOutOfRange { .. })));
    }

    #[test]
    fn schedule_requires_admin() {
        let mut f = fixture();
        assert_eq!(
            f.queue.schedule(&addr("mallory"), &ping(), eta()),
            Err(TimelockError::NotAuthorized {
                caller: addr("mallory")
            })
        );
    }

    #[test]
    fn schedule_rejects_eta_before_delay() {
        let mut f = fixture();
        let too_soon = Timestamp::new(START + DELAY - 1);
        assert!(matches!(
            f.queue.schedule(&addr("admin"), &ping(), too_soon),
            Err(TimelockError::EtaTooSoon { .. })
        ));
        assert_eq!(f.queue.queued_count(), 0);
    }

    #[test]
    fn schedule_twice_is_already_queued() {
        let mut f = fixture();
        let hash = f.queue.schedule(&addr("admin"), &ping(), eta()).unwrap();
        assert!(f.queue.is_queued(&hash));
        assert_eq!(f.queue.queued_eta(&hash), Some(eta()));
        assert_eq!(
            f.queue.schedule(&addr("admin"), &ping(), eta()),
            Err(TimelockError::AlreadyQueued(hash))
        );
    }

    #[test]
    fn schedule_batch_is_all_or_nothing() {
        let mut f = fixture();
        let other = Action::new(addr("target"), "pong()", vec![]);
        let hash = f.queue.schedule(&addr("admin"), &other, eta()).unwrap();
        assert_eq!(
            f.queue.schedule_batch(&addr("admin"), &[ping(), other], eta()),
            Err(TimelockError::AlreadyQueued(hash))
        );
        assert_eq!(f.queue.queued_count(), 1);
    }

    #[test]
    fn execute_honours_eta_and_grace_window() {
        let mut f = fixture();
        f.queue.schedule(&addr("admin"), &ping(), eta()).unwrap();

        f.chain.set_time(eta().as_secs() - 1);
        assert!(matches!(
            f.queue.execute(&addr("admin"), &ping(), eta()),
            Err(TimelockError::TooEarly { .. })
        ));

        f.chain.set_time(eta().as_secs() + DEFAULT_GRACE_PERIOD + 1);
        assert!(matches!(
            f.queue.execute(&addr("admin"), &ping(), eta()),
            Err(TimelockError::TooLate { .. })
        ));

        f.chain.set_time(eta().as_secs() + DEFAULT_GRACE_PERIOD);
        let hash = f.queue.execute(&addr("admin"), &ping(), eta()).unwrap();
        assert!(!f.queue.is_queued(&hash));
        assert_eq!(f.target.borrow().call_count("ping()"), 1);
        assert_eq!(f.target.borrow().calls()[0].caller, addr("timelock"));
    }

    #[test]
    fn execute_unknown_action_is_not_queued() {
        let mut f = fixture();
        f.chain.set_time(eta().as_secs());
        assert!(matches!(
            f.queue.execute(&addr("admin"), &ping(), eta()),
            Err(TimelockError::NotQueued(_))
        ));
    }

    #[test]
    fn reverted_action_stays_unqueued() {
        let mut f = fixture_with(RecordingTarget::new().fail_on("ping()"));
        let hash = f.queue.schedule(&addr("admin"), &ping(), eta()).unwrap();
        f.chain.set_time(eta().as_secs());
        assert!(matches!(
            f.queue.execute(&addr("admin"), &ping(), eta()),
            Err(TimelockError::ActionReverted { .. })
        ));
        assert!(!f.queue.is_queued(&hash));
    }

    #[test]
    fn unregistered_target_reverts() {
        let mut f = fixture();
        let action = Action::new(addr("nowhere"), "ping()", vec![]);
        f.queue.schedule(&addr("admin"), &action, eta()).unwrap();
        f.chain.set_time(eta().as_secs());
        let err = f.queue.execute(&addr("admin"), &action, eta()).unwrap_err();
        assert!(matches!(err, TimelockError::ActionReverted { .. }));
    }

    #[test]
    fn value_is_forwarded_from_balance() {
        let mut f = fixture();
        f.queue.deposit(100).unwrap();
        let paid = ping().with_value(60);
        f.queue.schedule(&addr("admin"), &paid, eta()).unwrap();
        let overpaid = Action::new(addr("target"), "pong()", vec![]).with_value(60);
        f.queue.schedule(&addr("admin"), &overpaid, eta()).unwrap();
        f.chain.set_time(eta().as_secs());

        f.queue.execute(&addr("admin"), &paid, eta()).unwrap();
        assert_eq!(f.queue.balance(), 40);
        assert_eq!(f.target.borrow().received_value(), 60);

        assert!(f.queue.execute(&addr("admin"), &overpaid, eta()).is_err());
        assert_eq!(f.queue.balance(), 40);
    }

    #[test]
    fn cancel_removes_and_rejects_unknown() {
        let mut f = fixture();
        let hash = f.queue.schedule(&addr("admin"), &ping(), eta()).unwrap();
        f.queue.cancel(&addr("admin"), &hash).unwrap();
        assert!(!f.queue.is_queued(&hash));
        assert_eq!(
            f.queue.cancel(&addr("admin"), &hash),
            Err(TimelockError::NotQueued(hash))
        );
        assert!(f
            .events
            .borrow()
            .iter()
            .any(|e| matches!(e, Event::ActionCanceled { .. })));
    }

    #[test]
    fn delay_and_admin_only_change_through_self_call() {
        let mut f = fixture();
        assert!(matches!(
            f.queue.set_delay(&addr("admin"), MINIMUM_DELAY),
            Err(TimelockError::NotAuthorized { .. })
        ));
        assert!(f.queue.transfer_admin(&addr("admin"), &addr("new")).is_err());

        let set_delay = Action::new(
            addr("timelock"),
            signatures::SET_DELAY,
            encode_args(&MINIMUM_DELAY).unwrap(),
        );
        let transfer = Action::new(
            addr("timelock"),
            signatures::TRANSFER_ADMIN,
            encode_args(&addr("new_admin")).unwrap(),
        );
        f.queue
            .schedule_batch(&addr("admin"), &[set_delay.clone(), transfer.clone()], eta())
            .unwrap();
        f.chain.set_time(eta().as_secs());
        f.queue
            .execute_batch(&addr("admin"), &[set_delay, transfer], eta())
            .unwrap();

        assert_eq!(f.queue.delay(), MINIMUM_DELAY);
        assert_eq!(f.queue.admin(), &addr("new_admin"));
        let events = f.events.borrow();
        assert!(events.contains(&Event::DelayChanged {
            previous: DELAY,
            current: MINIMUM_DELAY
        }));
    }

    #[test]
    fn self_call_with_bad_delay_reverts() {
        let mut f = fixture();
        let action = Action::new(
            addr("timelock"),
            signatures::SET_DELAY,
            encode_args(&1u64).unwrap(),
        );
        f.queue.schedule(&addr("admin"), &action, eta()).unwrap();
        f.chain.set_time(eta().as_secs());
        assert!(matches!(
            f.queue.execute(&addr("admin"), &action, eta()),
            Err(TimelockError::ActionReverted { .. })
        ));
        assert_eq!(f.queue.delay(), DELAY);
    }

    #[test]
    fn failed_batch_restores_queue_targets_and_events() {
        let mut f = fixture_with(RecordingTarget::new().fail_on("boom()"));
        let boom = Action::new(addr("target"), "boom()", vec![]);
        let batch = [ping(), boom];
        let hashes = f.queue.schedule_batch(&addr("admin"), &batch, eta()).unwrap();
        f.chain.set_time(eta().as_secs());
        f.events.borrow_mut().clear();

        assert!(matches!(
            f.queue.execute_batch(&addr("admin"), &batch, eta()),
            Err(TimelockError::ActionReverted { .. })
        ));
        assert!(hashes.iter().all(|h| f.queue.is_queued(h)));
        assert!(f.target.borrow().calls().is_empty());
        assert!(f.events.borrow().is_empty());
    }

    #[test]
    fn batch_checks_timing_before_any_call() {
        let mut f = fixture();
        let late_eta = Timestamp::new(eta().as_secs() + 10);
        f.queue.schedule(&addr("admin"), &ping(), eta()).unwrap();
        let pong = Action::new(addr("target"), "pong()", vec![]);
        f.queue.schedule(&addr("admin"), &pong, late_eta).unwrap();
        f.chain.set_time(eta().as_secs());
        assert!(matches!(
            f.queue.execute_batch(&addr("admin"), &[ping(), pong], eta()),
            Err(TimelockError::NotQueued(_))
        ));
        assert!(f.target.borrow().calls().is_empty());
    }

    /// Accepts every call but can never be rolled back.
    struct Unrestorable;

    impl CallTarget for Unrestorable {
        fn invoke(&mut self, _: &CallContext, _: &str, _: &[u8]) -> Result<(), CallError> {
            Ok(())
        }

        fn save_state(&self) -> Result<Vec<u8>, CallError> {
            Ok(Vec::new())
        }

        fn load_state(&mut self, _: &[u8]) -> Result<(), CallError> {
            Err(CallError::State("no rollback".into()))
        }
    }

    #[test]
    fn failed_restore_still_restores_remaining_targets() {
        let mut f = fixture_with(RecordingTarget::new().fail_on("boom()"));
        f.queue
            .register_target(addr("unrestorable"), Rc::new(RefCell::new(Unrestorable)));
        let batch = [
            Action::new(addr("unrestorable"), "noop()", vec![]),
            ping(),
            Action::new(addr("target"), "boom()", vec![]),
        ];
        let hashes = f.queue.schedule_batch(&addr("admin"), &batch, eta()).unwrap();
        f.chain.set_time(eta().as_secs());

        assert!(matches!(
            f.queue.execute_batch(&addr("admin"), &batch, eta()),
            Err(TimelockError::TargetState(_))
        ));
        assert!(f.target.borrow().calls().is_empty());
        assert!(hashes.iter().all(|h| f.queue.is_queued(h)));
    }
}
