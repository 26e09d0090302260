//! # annadata-market
//!
//! In-memory cart and wallet state. All amounts are integer paise.

pub mod cart;
pub mod money;
pub mod wallet;

pub use cart::{Cart, CartItem};
pub use wallet::{Transaction, TransactionKind, Wallet};
