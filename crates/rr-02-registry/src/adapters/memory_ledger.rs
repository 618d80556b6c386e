//! In-memory token ledger implementing [`FundsTransfer`].

use crate::domain::value_objects::{Identity, TokenId};
use crate::errors::TransferError;
use crate::ports::outbound::FundsTransfer;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::debug;

/// Per-(token, account) balances.
#[derive(Default)]
pub struct InMemoryLedger {
    balances: RwLock<HashMap<(TokenId, Identity), u128>>,
    unavailable: AtomicBool,
    transfers: AtomicU64,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` of `token` to `account` out of thin air.
    pub fn mint(&self, token: TokenId, account: Identity, amount: u128) {
        let mut balances = self.balances.write();
        let balance = balances.entry((token, account)).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    pub fn balance_of(&self, token: TokenId, account: Identity) -> u128 {
        self.balances
            .read()
            .get(&(token, account))
            .copied()
            .unwrap_or(0)
    }

    /// Make every transfer fail with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Successful transfers so far.
    pub fn transfers(&self) -> u64 {
        self.transfers.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl FundsTransfer for InMemoryLedger {
    async fn transfer(
        &self,
        token: TokenId,
        from: Identity,
        to: Identity,
        amount: u128,
    ) -> Result<(), TransferError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(TransferError::Unavailable("ledger offline".into()));
        }

        let mut balances = self.balances.write();
        let available = balances.get(&(token, from)).copied().unwrap_or(0);
        if available < amount {
            return Err(TransferError::Insufficient {
                required: amount,
                available,
            });
        }
        balances.insert((token, from), available - amount);
        let credit = balances.entry((token, to)).or_insert(0);
        *credit = credit.saturating_add(amount);
        drop(balances);

        self.transfers.fetch_add(1, Ordering::Relaxed);
        debug!(%token, %from, %to, amount, "transfer applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: Identity = Identity::new([0x70; 32]);
    const ALICE: Identity = Identity::new([0x01; 32]);
    const BOB: Identity = Identity::new([0x02; 32]);

    #[tokio::test]
    async fn test_transfer_moves_balance() {
        let ledger = InMemoryLedger::new();
        ledger.mint(TOKEN, ALICE, 100);
        ledger.transfer(TOKEN, ALICE, BOB, 40).await.unwrap();
        assert_eq!(ledger.balance_of(TOKEN, ALICE), 60);
        assert_eq!(ledger.balance_of(TOKEN, BOB), 40);
        assert_eq!(ledger.transfers(), 1);
    }

    #[tokio::test]
    async fn test_insufficient_balance() {
        let ledger = InMemoryLedger::new();
        ledger.mint(TOKEN, ALICE, 10);
        assert_eq!(
            ledger.transfer(TOKEN, ALICE, BOB, 11).await,
            Err(TransferError::Insufficient {
                required: 11,
                available: 10
            })
        );
        assert_eq!(ledger.balance_of(TOKEN, ALICE), 10);
    }

    #[tokio::test]
    async fn test_balances_are_per_token() {
        let ledger = InMemoryLedger::new();
        let other = Identity::new([0x71; 32]);
        ledger.mint(other, ALICE, 100);
        assert!(ledger.transfer(TOKEN, ALICE, BOB, 1).await.is_err());
    }

    #[tokio::test]
    async fn test_unavailable() {
        let ledger = InMemoryLedger::new();
        ledger.mint(TOKEN, ALICE, 100);
        ledger.set_unavailable(true);
        assert!(matches!(
            ledger.transfer(TOKEN, ALICE, BOB, 1).await,
            Err(TransferError::Unavailable(_))
        ));
    }
}
