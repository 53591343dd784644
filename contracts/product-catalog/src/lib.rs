/*!
 * Product Catalog Contract
 *
 * Holds the marketplace's listings: seller, unit price, remaining stock,
 * and an availability flag per product. Sellers manage their own listings;
 * the escrow contract reads price/availability at trade initiation and is
 * the only party allowed to decrement stock, so reservations happen inside
 * the same atomic invocation that locks the buyer's funds.
 */

#![no_std]

mod interfaces;
mod types;


use soroban_sdk::{contract, contractimpl, vec, Address, Env, String, Vec};

use interfaces::RegistryClient;
pub use types::{DataKey, Error, Product};
use types::{
    AVAILABILITY_SET, PRICE_UPDATED, PRODUCT_LISTED, PRODUCT_RESTOCKED, STOCK_DECREMENTED,
};

#[contract]
pub struct ProductCatalog;

#[contractimpl]
impl ProductCatalog {
    pub fn initialize(env: Env, admin: Address, registry: Address) -> Result<(), Error> {
        admin.require_auth();
        if env.storage().persistent().has(&DataKey::Admin) {
            return Err(Error::AlreadyInitialized);
        }
        env.storage().persistent().set(&DataKey::Admin, &admin);
        env.storage().persistent().set(&DataKey::Registry, &registry);
        Ok(())
    }

    /// Registers the escrow contract allowed to reserve stock. Admin only.
    pub fn set_marketplace(env: Env, marketplace: Address) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .persistent()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();
        env.storage()
            .persistent()
            .set(&DataKey::Marketplace, &marketplace);
        Ok(())
    }

    /// Creates a listing owned by `seller`. The caller must hold an active
    /// Seller profile in the registry.
    ///
    /// # Errors
    /// - `NotSeller`: no active Seller profile for the caller
    /// - `InvalidPrice` / `InvalidQuantity`: non-positive price or zero stock
    pub fn list_product(
        env: Env,
        seller: Address,
        name: String,
        description: String,
        unit_price: i128,
        quantity: u32,
    ) -> Result<u64, Error> {
        seller.require_auth();

        let registry: Address = env
            .storage()
            .persistent()
            .get(&DataKey::Registry)
            .ok_or(Error::NotInitialized)?;
        if !RegistryClient::new(&env, &registry).is_seller(&seller) {
            return Err(Error::NotSeller);
        }
        if unit_price <= 0 {
            return Err(Error::InvalidPrice);
        }
        if quantity == 0 {
            return Err(Error::InvalidQuantity);
        }

        let product_id = env
            .storage()
            .persistent()
            .get(&DataKey::ProductCounter)
            .unwrap_or(0u64)
            .checked_add(1)
            .ok_or(Error::QuantityOverflow)?;
        env.storage()
            .persistent()
            .set(&DataKey::ProductCounter, &product_id);

        let product = Product {
            id: product_id,
            seller: seller.clone(),
            name,
            description,
            unit_price,
            quantity,
            available: true,
            listed_at: env.ledger().timestamp(),
        };
        env.storage()
            .persistent()
            .set(&DataKey::Product(product_id), &product);

        let index_key = DataKey::SellerProducts(seller.clone());
        let mut index: Vec<u64> = env
            .storage()
            .persistent()
            .get(&index_key)
            .unwrap_or(vec![&env]);
        index.push_back(product_id);
        env.storage().persistent().set(&index_key, &index);

        env.events()
            .publish((PRODUCT_LISTED, seller), (product_id, unit_price, quantity));
        Ok(product_id)
    }

    /// Reprices a listing. In-flight escrow trades are unaffected: they
    /// locked the price at initiation.
    pub fn update_price(
        env: Env,
        seller: Address,
        product_id: u64,
        new_price: i128,
    ) -> Result<(), Error> {
        seller.require_auth();
        if new_price <= 0 {
            return Err(Error::InvalidPrice);
        }
        let mut product = Self::load_owned(&env, &seller, product_id)?;
        product.unit_price = new_price;
        env.storage()
            .persistent()
            .set(&DataKey::Product(product_id), &product);
        env.events()
            .publish((PRICE_UPDATED, seller), (product_id, new_price));
        Ok(())
    }

    pub fn restock(
        env: Env,
        seller: Address,
        product_id: u64,
        additional: u32,
    ) -> Result<(), Error> {
        seller.require_auth();
        if additional == 0 {
            return Err(Error::InvalidQuantity);
        }
        let mut product = Self::load_owned(&env, &seller, product_id)?;
        product.quantity = product
            .quantity
            .checked_add(additional)
            .ok_or(Error::QuantityOverflow)?;
        env.storage()
            .persistent()
            .set(&DataKey::Product(product_id), &product);
        env.events()
            .publish((PRODUCT_RESTOCKED, seller), (product_id, product.quantity));
        Ok(())
    }

    /// Delists or relists a product without touching its stock.
    pub fn set_availability(
        env: Env,
        seller: Address,
        product_id: u64,
        available: bool,
    ) -> Result<(), Error> {
        seller.require_auth();
        let mut product = Self::load_owned(&env, &seller, product_id)?;
        product.available = available;
        env.storage()
            .persistent()
            .set(&DataKey::Product(product_id), &product);
        env.events()
            .publish((AVAILABILITY_SET, seller), (product_id, available));
        Ok(())
    }

    /// Reserves stock for a trade. Only the registered marketplace contract
    /// may call this; the authorization is satisfied by invoker-contract
    /// auth when the escrow contract cross-calls.
    pub fn decrement_stock(env: Env, product_id: u64, quantity: u32) -> Result<(), Error> {
        let marketplace: Address = env
            .storage()
            .persistent()
            .get(&DataKey::Marketplace)
            .ok_or(Error::MarketplaceNotSet)?;
        marketplace.require_auth();

        if quantity == 0 {
            return Err(Error::InvalidQuantity);
        }
        let mut product = Self::load(&env, product_id)?;
        product.quantity = product
            .quantity
            .checked_sub(quantity)
            .ok_or(Error::InsufficientStock)?;
        env.storage()
            .persistent()
            .set(&DataKey::Product(product_id), &product);
        env.events()
            .publish((STOCK_DECREMENTED, marketplace), (product_id, quantity));
        Ok(())
    }

    pub fn get_product(env: Env, product_id: u64) -> Result<Product, Error> {
        Self::load(&env, product_id)
    }

    /// False for unknown products rather than an error, so callers can
    /// treat "missing" and "delisted" uniformly.
    pub fn is_available(env: Env, product_id: u64) -> bool {
        match Self::load(&env, product_id) {
            Ok(p) => p.available,
            Err(_) => false,
        }
    }

    pub fn quantity_available(env: Env, product_id: u64) -> u32 {
        match Self::load(&env, product_id) {
            Ok(p) => p.quantity,
            Err(_) => 0,
        }
    }

    pub fn unit_price(env: Env, product_id: u64) -> Result<i128, Error> {
        Ok(Self::load(&env, product_id)?.unit_price)
    }

    pub fn seller_of(env: Env, product_id: u64) -> Result<Address, Error> {
        Ok(Self::load(&env, product_id)?.seller)
    }

    pub fn get_products_for_seller(env: Env, seller: Address) -> Vec<u64> {
        env.storage()
            .persistent()
            .get(&DataKey::SellerProducts(seller))
            .unwrap_or(vec![&env])
    }

    pub fn get_product_count(env: Env) -> u64 {
        env.storage()
            .persistent()
            .get(&DataKey::ProductCounter)
            .unwrap_or(0)
    }

    fn load(env: &Env, product_id: u64) -> Result<Product, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Product(product_id))
            .ok_or(Error::ProductNotFound)
    }

    fn load_owned(env: &Env, seller: &Address, product_id: u64) -> Result<Product, Error> {
        let product = Self::load(env, product_id)?;
        if product.seller != *seller {
            return Err(Error::Unauthorized);
        }
        Ok(product)
    }
}
