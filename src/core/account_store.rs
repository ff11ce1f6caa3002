//! Concurrent account storage
//!
//! This module provides [`AccountStore`], the authoritative mapping from
//! account id to account state.
//!
//! # Design
//!
//! Each account lives in a slot holding an immutable `Arc<Account>`
//! snapshot. A write never edits a snapshot; it builds the next one with
//! [`StatementProcessor`] and swaps it in, so a reader either sees the
//! account before a statement or after it, never a history without the
//! matching balance.
//!
//! Two write strategies are available (see [`WriteStrategy`]):
//!
//! - **Locked**: a per-account mutex queues writers to the same account.
//!   The writer holding it computes the next snapshot and installs it.
//! - **Optimistic**: the writer takes the current `Arc`, computes without
//!   any lock, and installs the result only if the slot still holds that
//!   same `Arc`. Otherwise it retries, up to `max_attempts` times.
//!
//! # Thread Safety
//!
//! Slots sit in a sharded `DashMap`, so there is no global lock. Neither
//! strategy computes while holding a shard lock or the snapshot lock: those
//! are only held long enough to clone or swap an `Arc`. Readers never wait
//! for a statement to be computed.

use super::processor::StatementProcessor;
use super::traits::{Clock, IdGenerator, RandomIdGenerator, SystemClock};
use crate::types::{Account, AccountId, LedgerError, NewAccount, StatementInput};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// How concurrent writes to the same account are serialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteStrategy {
    /// Per-account critical section
    #[default]
    Locked,

    /// Compare-and-swap on the snapshot pointer with bounded retries
    Optimistic,
}

/// Configuration for the account store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    pub write_strategy: WriteStrategy,
    max_attempts: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            write_strategy: WriteStrategy::Locked,
            max_attempts: 64,
        }
    }
}

impl StoreConfig {
    /// Create a StoreConfig, falling back to the default attempt budget for zero
    pub fn new(write_strategy: WriteStrategy, max_attempts: usize) -> Self {
        let default = Self::default();

        let max_attempts = if max_attempts == 0 {
            tracing::warn!(
                max_attempts,
                fallback = default.max_attempts,
                "Invalid max_attempts, using default"
            );
            default.max_attempts
        } else {
            max_attempts
        };

        Self {
            write_strategy,
            max_attempts,
        }
    }

    /// Attempts per optimistic write before giving up with `WriteContention`
    ///
    /// Always at least one. Ignored by the locked strategy.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }
}

/// One account: its current snapshot and the lock queuing locked writers
#[derive(Debug)]
struct AccountSlot {
    writer: Mutex<()>,
    current: RwLock<Arc<Account>>,
}

impl AccountSlot {
    fn new(account: Account) -> Self {
        Self {
            writer: Mutex::new(()),
            current: RwLock::new(Arc::new(account)),
        }
    }

    fn load(&self) -> Arc<Account> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current)
    }

    fn install(&self, next: Arc<Account>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = next;
    }

    /// Install `next` only if `expected` is still the current snapshot
    fn compare_and_swap(&self, expected: &Arc<Account>, next: Arc<Account>) -> bool {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);

        // `expected` keeps its allocation alive, so pointer equality
        // means nobody committed since it was loaded
        if Arc::ptr_eq(&current, expected) {
            *current = next;
            true
        } else {
            false
        }
    }
}

/// Thread-safe account store
///
/// Share it behind an `Arc`; every method takes `&self`.
pub struct AccountStore {
    accounts: DashMap<AccountId, Arc<AccountSlot>>,
    config: StoreConfig,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl AccountStore {
    /// Create an empty store with explicit environment
    pub fn new(config: StoreConfig, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            accounts: DashMap::new(),
            config,
            clock,
            ids,
        }
    }

    /// Create an empty store with the system clock and random UUIDs
    pub fn with_config(config: StoreConfig) -> Self {
        Self::new(
            config,
            Arc::new(SystemClock::new()),
            Arc::new(RandomIdGenerator),
        )
    }

    /// Store a new account
    ///
    /// A fresh id is generated when `new_account.id` is `None`. Seeded
    /// statements are stored verbatim and are not checked against the
    /// balance; only the balance itself must be non-negative.
    ///
    /// # Errors
    ///
    /// - `NegativeBalance` if the initial balance is below zero
    /// - `DuplicateAccount` if the caller-supplied id is already taken
    pub fn create(&self, new_account: NewAccount) -> Result<Account, LedgerError> {
        if new_account.balance < Decimal::ZERO {
            return Err(LedgerError::negative_balance(new_account.balance));
        }

        let id = new_account.id.unwrap_or_else(|| self.ids.next_id());

        match self.accounts.entry(id) {
            Entry::Occupied(_) => Err(LedgerError::duplicate_account(id)),
            Entry::Vacant(slot) => {
                let account = new_account.into_account(id);
                slot.insert(Arc::new(AccountSlot::new(account.clone())));
                tracing::debug!(account = %id, balance = %account.balance, "Account created");
                Ok(account)
            }
        }
    }

    fn slot(&self, id: &AccountId) -> Result<Arc<AccountSlot>, LedgerError> {
        self.accounts
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| LedgerError::account_not_found(*id))
    }

    /// Current snapshot of an account, shared with the store
    pub fn snapshot(&self, id: &AccountId) -> Result<Arc<Account>, LedgerError> {
        self.slot(id).map(|slot| slot.load())
    }

    /// Owned copy of an account's current state
    pub fn get(&self, id: &AccountId) -> Result<Account, LedgerError> {
        self.snapshot(id).map(|account| Account::clone(&account))
    }

    /// Apply one statement to an account atomically
    ///
    /// On success the returned account is the committed snapshot: previous
    /// history plus the new statement, stamped by the store's clock. On any
    /// error nothing is committed.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if no account has this id
    /// - `InsufficientBalance` if a withdrawal exceeds the balance
    /// - `WriteContention` if the optimistic strategy ran out of attempts
    /// - `InvariantViolation` / `ArithmeticOverflow` from the processor
    pub fn apply_statement(
        &self,
        id: &AccountId,
        input: StatementInput,
    ) -> Result<Account, LedgerError> {
        let slot = self.slot(id)?;

        match self.config.write_strategy {
            WriteStrategy::Locked => self.apply_locked(id, &slot, input),
            WriteStrategy::Optimistic => self.apply_optimistic(id, &slot, input),
        }
    }

    fn apply_locked(
        &self,
        id: &AccountId,
        slot: &AccountSlot,
        input: StatementInput,
    ) -> Result<Account, LedgerError> {
        let _writer = slot.writer.lock().unwrap_or_else(PoisonError::into_inner);

        // Stamped while holding the writer lock: commit order == date order
        let current = slot.load();
        let next = Arc::new(StatementProcessor::apply(&current, input, self.clock.now())?);
        slot.install(Arc::clone(&next));

        tracing::debug!(account = %id, balance = %next.balance, "Statement committed");
        Ok(Account::clone(&next))
    }

    fn apply_optimistic(
        &self,
        id: &AccountId,
        slot: &AccountSlot,
        input: StatementInput,
    ) -> Result<Account, LedgerError> {
        let max_attempts = self.config.max_attempts();

        for attempt in 1..=max_attempts {
            let current = slot.load();
            let next = Arc::new(StatementProcessor::apply(&current, input, self.clock.now())?);

            if slot.compare_and_swap(&current, Arc::clone(&next)) {
                tracing::debug!(
                    account = %id,
                    attempt,
                    balance = %next.balance,
                    "Statement committed"
                );
                return Ok(Account::clone(&next));
            }

            tracing::debug!(account = %id, attempt, "Concurrent commit detected, retrying");
            std::thread::yield_now();
        }

        tracing::warn!(
            account = %id,
            attempts = max_attempts,
            "Optimistic write exhausted its attempts"
        );
        Err(LedgerError::write_contention(*id, max_attempts))
    }

    /// Copies of all accounts, sorted by id
    pub fn accounts(&self) -> Vec<Account> {
        let mut snapshots: Vec<Arc<Account>> = self
            .accounts
            .iter()
            .map(|entry| entry.value().load())
            .collect();
        snapshots.sort_by_key(|account| account.id);

        snapshots
            .iter()
            .map(|account| Account::clone(account))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::with_config(StoreConfig::default())
    }
}

impl fmt::Debug for AccountStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountStore")
            .field("accounts", &self.accounts.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
