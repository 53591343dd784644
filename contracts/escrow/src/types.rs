/*!
 * Type definitions for the escrow settlement contract: the trade ledger
 * record, its status machine, storage keys, errors, and event topics.
 */

use soroban_sdk::{contracterror, contracttype, symbol_short, Address, String, Symbol};

/// Lifecycle of a trade. Transitions form a fixed DAG and never revisit an
/// earlier status:
///
/// ```text
/// Holding   --deliver (correct delivery code)-->   Delivered
/// Holding   --cancel (buyer or seller)-->          Cancelled
/// Holding   --expire (past deadline)-->            Refunded
/// Delivered --confirm (correct receiving code)-->  Completed
/// ```
///
/// Completed, Cancelled, and Refunded are terminal.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TradeStatus {
    /// Buyer funds are locked in the contract, awaiting delivery.
    Holding,
    /// Seller proved shipment with the delivery code; awaiting the buyer's
    /// receiving code.
    Delivered,
    /// Funds released to the seller.
    Completed,
    /// Voluntarily cancelled from Holding; funds returned to the buyer.
    Cancelled,
    /// Expired out of Holding past its deadline; funds returned to the buyer.
    Refunded,
}

/// The ledger record, one per initiated trade. Identity fields (id, parties,
/// product, price) are fixed at creation; only status, custody, and the
/// timestamp fields mutate afterwards.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EscrowTrade {
    pub id: u64,
    pub product_id: u64,
    pub quantity: u32,
    pub buyer: Address,
    /// Resolved from the catalog at creation, never caller-supplied.
    pub seller: Address,
    /// Catalog price at initiation. Later catalog repricing does not touch
    /// an in-flight trade.
    pub unit_price: i128,
    /// `unit_price * quantity`, computed once at creation.
    pub total_locked: i128,
    pub shipping_address: String,
    pub reference_hash: String,
    /// 6-digit secret the seller must present to mark delivery.
    pub delivery_code: String,
    /// 4-digit secret the buyer must present to release funds.
    pub receiving_code: String,
    pub status: TradeStatus,
    /// Mirrors the custody held for this trade: equals `total_locked` while
    /// Holding or Delivered, zero once terminal.
    pub locked_amount: i128,
    pub created_at: u64,
    /// Deadline after which a Holding trade may be expired and refunded.
    pub expires_at: u64,
    /// Sentinel 0 until the trade reaches Delivered.
    pub delivered_at: u64,
    /// Sentinel 0 until the trade reaches Completed.
    pub completed_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Admin,
    /// Settlement token contract.
    Token,
    /// Profile registry collaborator.
    Registry,
    /// Product catalog collaborator.
    Catalog,
    Paused,
    /// Seconds from creation to `expires_at` for new trades.
    TradeExpiration,
    /// Last assigned trade id.
    TradeCounter,
    Trade(u64),
    BuyerTrades(Address),
    SellerTrades(Address),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    TradeNotFound = 1,
    /// Caller is not the party this transition belongs to.
    Unauthorized = 2,
    /// The transition is not valid from the trade's current status.
    InvalidStatus = 3,
    /// Supplied code does not match the stored code.
    CodeMismatch = 4,
    /// Caller has no active Buyer profile.
    NotBuyer = 5,
    ProductUnavailable = 6,
    InsufficientStock = 7,
    InsufficientBalance = 8,
    InvalidQuantity = 9,
    AmountOverflow = 10,
    AlreadyInitialized = 11,
    NotInitialized = 12,
    ContractPaused = 13,
    /// The trade's deadline has not passed yet.
    NotExpired = 14,
    InvalidExpiration = 15,
}

/// Event topics, one per state transition.
pub const TRADE_INITIATED: Symbol = symbol_short!("initiated");
pub const ORDER_DELIVERED: Symbol = symbol_short!("delivered");
pub const TRADE_COMPLETED: Symbol = symbol_short!("completed");
pub const TRADE_CANCELLED: Symbol = symbol_short!("cancelled");
pub const TRADE_REFUNDED: Symbol = symbol_short!("refunded");
