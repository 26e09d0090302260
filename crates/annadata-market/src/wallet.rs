use annadata_core::error::AnnadataError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cart::Cart;
use crate::money::format_inr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Credit,
    Debit,
}

/// One wallet movement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub kind: TransactionKind,
    /// Amount in paise.
    pub amount: u64,
    pub note: String,
    pub balance_after: u64,
    pub at: DateTime<Utc>,
}

/// Prepaid wallet with an append-only transaction log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Wallet {
    balance: u64,
    transactions: Vec<Transaction>,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance in paise.
    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Oldest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Add funds. Returns the new balance.
    pub fn credit(&mut self, amount: u64, note: &str) -> Result<u64, AnnadataError> {
        if amount == 0 {
            return Err(AnnadataError::Market("credit amount must be positive".into()));
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| AnnadataError::Market("wallet balance overflow".into()))?;
        self.record(TransactionKind::Credit, amount, note);
        Ok(self.balance)
    }

    /// Spend funds. Returns the new balance.
    pub fn debit(&mut self, amount: u64, note: &str) -> Result<u64, AnnadataError> {
        if amount == 0 {
            return Err(AnnadataError::Market("debit amount must be positive".into()));
        }
        if amount > self.balance {
            return Err(AnnadataError::Market(format!(
                "insufficient balance: need \u{20b9}{}, have \u{20b9}{}",
                format_inr(amount),
                format_inr(self.balance)
            )));
        }
        self.balance -= amount;
        self.record(TransactionKind::Debit, amount, note);
        Ok(self.balance)
    }

    /// Pay for the whole cart and empty it. Returns the amount paid.
    /// On failure neither the wallet nor the cart changes.
    pub fn pay_for(&mut self, cart: &mut Cart) -> Result<u64, AnnadataError> {
        if cart.is_empty() {
            return Err(AnnadataError::Market("cart is empty".into()));
        }
        let total = cart.total()?;
        let note = format!("order of {} items", cart.item_count());
        self.debit(total, &note)?;
        cart.clear();
        info!("wallet: paid \u{20b9}{} for cart", format_inr(total));
        Ok(total)
    }

    fn record(&mut self, kind: TransactionKind, amount: u64, note: &str) {
        self.transactions.push(Transaction {
            kind,
            amount,
            note: note.to_string(),
            balance_after: self.balance,
            at: Utc::now(),
        });
    }
}
