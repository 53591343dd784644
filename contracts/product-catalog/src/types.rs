use soroban_sdk::{contracterror, contracttype, symbol_short, Address, String, Symbol};

/// A catalog listing. `unit_price` is in the marketplace token's smallest
/// unit; `quantity` is the stock still available for new trades.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Product {
    pub id: u64,
    pub seller: Address,
    pub name: String,
    pub description: String,
    pub unit_price: i128,
    pub quantity: u32,
    pub available: bool,
    pub listed_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Admin,
    Registry,
    /// Escrow contract allowed to call `decrement_stock`.
    Marketplace,
    Product(u64),
    ProductCounter,
    SellerProducts(Address),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    ProductNotFound = 3,
    Unauthorized = 4,
    NotSeller = 5,
    InvalidPrice = 6,
    InvalidQuantity = 7,
    InsufficientStock = 8,
    MarketplaceNotSet = 9,
    QuantityOverflow = 10,
}

/// Event topics.
pub const PRODUCT_LISTED: Symbol = symbol_short!("listed");
pub const PRICE_UPDATED: Symbol = symbol_short!("price_upd");
pub const PRODUCT_RESTOCKED: Symbol = symbol_short!("restocked");
pub const STOCK_DECREMENTED: Symbol = symbol_short!("stock_dec");
pub const AVAILABILITY_SET: Symbol = symbol_short!("avail_set");
