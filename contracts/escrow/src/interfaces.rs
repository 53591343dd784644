//! Client interfaces for the collaborator contracts. The escrow core only
//! ever touches the registry and catalog through these narrow surfaces.

use soroban_sdk::{contractclient, Address, Env};

/// Authorization oracle: profile existence and the buyer-role check.
#[contractclient(name = "RegistryClient")]
pub trait IdentityRegistry {
    fn profile_exists(env: Env, account: Address) -> bool;
    fn is_buyer(env: Env, account: Address) -> bool;
}

/// Catalog reads consumed at trade initiation, plus the stock reservation
/// write. `unit_price` and `seller_of` trap on unknown products, so they are
/// only called after `is_available` has vouched for the id.
#[contractclient(name = "CatalogClient")]
pub trait ProductCatalog {
    fn is_available(env: Env, product_id: u64) -> bool;
    fn quantity_available(env: Env, product_id: u64) -> u32;
    fn unit_price(env: Env, product_id: u64) -> i128;
    fn seller_of(env: Env, product_id: u64) -> Address;
    fn decrement_stock(env: Env, product_id: u64, quantity: u32);
}
