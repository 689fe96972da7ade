use proptest::prelude::*;
use std::collections::HashMap;
use std::rc::Rc;

use gavel_nullables::NullChain;
use gavel_token::{CheckpointHistory, TokenParams, VotingLedger};
use gavel_types::{Address, BlockClock, BlockNumber, EventBus, Timestamp, TokenAmount};

const ACCOUNTS: [&str; 4] = ["gvl_alice", "gvl_bob", "gvl_carol", "gvl_dave"];

#[derive(Clone, Debug)]
enum Op {
    Transfer { from: usize, to: usize, pct: u8 },
    Delegate { holder: usize, to: usize },
    Mine,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..4usize, 0..4usize, 0u8..=100)
            .prop_map(|(from, to, pct)| Op::Transfer { from, to, pct }),
        (0..4usize, 0..4usize).prop_map(|(holder, to)| Op::Delegate { holder, to }),
        Just(Op::Mine),
    ]
}

fn account(i: usize) -> Address {
    Address::new(ACCOUNTS[i])
}

/// Linear reference lookup for the binary search in `votes_at`.
fn votes_at_linear(history: &CheckpointHistory, block: BlockNumber) -> TokenAmount {
    history
        .iter()
        .filter(|c| c.block <= block)
        .last()
        .map(|c| c.votes)
        .unwrap_or(TokenAmount::ZERO)
}

proptest! {
    /// Binary search must agree with a linear scan for every query block.
    #[test]
    fn checkpoint_lookup_matches_linear_scan(
        gaps in prop::collection::vec(0u64..5, 1..60),
        query in 0u64..400,
    ) {
        let mut history = CheckpointHistory::new();
        let mut block = 1;
        for (i, gap) in gaps.iter().enumerate() {
            block += gap;
            history.write(BlockNumber::new(block), TokenAmount::from_tokens(i as u32 + 1));
        }
        let query = BlockNumber::new(query);
        prop_assert_eq!(history.votes_at(query), votes_at_linear(&history, query));
    }

    /// At every finalised block, a delegate's recorded votes equal the sum of
    /// the balances of the accounts delegating to it at the end of that block.
    #[test]
    fn delegated_votes_equal_delegator_balances(
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        let chain = Rc::new(NullChain::new(1, 0));
        let mut ledger = VotingLedger::new(
            TokenParams {
                address: Address::new("gvl_token"),
                name: "Token".into(),
                symbol: "TKN".into(),
                initial_holder: account(0),
                initial_supply: TokenAmount::from_tokens(1_000_000),
                minter: Address::new("gvl_minter"),
                minting_allowed_after: Timestamp::new(0),
                change_implementation_after: Timestamp::new(0),
                transfer_paused: false,
            },
            chain.clone(),
            Rc::new(EventBus::new()),
        );

        // expected[block][delegate] = votes at the end of block
        let mut expected: Vec<(BlockNumber, HashMap<Address, u128>)> = Vec::new();
        let mut record = |ledger: &VotingLedger, block: BlockNumber| {
            let mut totals = HashMap::new();
            for i in 0..ACCOUNTS.len() {
                let holder = account(i);
                *totals.entry(ledger.delegates(&holder)).or_insert(0u128) +=
                    ledger.balance_of(&holder).raw();
            }
            expected.push((block, totals));
        };

        for op in ops {
            match op {
                Op::Transfer { from, to, pct } => {
                    let balance = ledger.balance_of(&account(from)).raw();
                    let amount = TokenAmount::from_raw(balance / 100 * pct as u128).unwrap();
                    ledger.transfer(&account(from), &account(to), amount).unwrap();
                }
                Op::Delegate { holder, to } => {
                    ledger.delegate(&account(holder), &account(to)).unwrap();
                }
                Op::Mine => {
                    record(&ledger, chain.block_number());
                    chain.mine(1);
                }
            }
        }
        record(&ledger, chain.block_number());
        chain.mine(1);

        for (block, totals) in &expected {
            for i in 0..ACCOUNTS.len() {
                let delegate = account(i);
                let want = totals.get(&delegate).copied().unwrap_or(0);
                prop_assert_eq!(ledger.prior_votes(&delegate, *block).unwrap().raw(), want);
            }
        }
    }
}
