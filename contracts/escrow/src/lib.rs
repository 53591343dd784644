/*!
 * Escrow Settlement Contract
 *
 * The marketplace's settlement core. A buyer initiates a trade against a
 * catalog product: the full price is withdrawn from the buyer into the
 * contract's custody, stock is reserved, and the trade record is stamped
 * with two short secret codes. The seller proves shipment by presenting the
 * delivery code; the buyer proves receipt by presenting the receiving code,
 * which releases the locked funds to the seller. Until delivery is marked,
 * either party may cancel for a full refund, and anyone may expire a trade
 * that has sat in Holding past its deadline.
 *
 * Custody invariant: a trade's locked amount equals its total price while
 * the trade is Holding or Delivered, and is zero once the trade reaches a
 * terminal status. Release and refund are total and atomic; every transfer
 * happens in the same invocation as the status flip, so a trapped transfer
 * rolls the transition back with it.
 */

#![no_std]

mod codes;
mod interfaces;
mod types;


use soroban_sdk::{contract, contractimpl, log, token, vec, Address, Env, String, Vec};

use codes::{generate_delivery_code, generate_receiving_code};
use interfaces::{CatalogClient, RegistryClient};
pub use types::{DataKey, Error, EscrowTrade, TradeStatus};
use types::{
    ORDER_DELIVERED, TRADE_CANCELLED, TRADE_COMPLETED, TRADE_INITIATED, TRADE_REFUNDED,
};

// Window a trade may sit in Holding before anyone can expire it.
const DEFAULT_TRADE_EXPIRATION: u64 = 604_800; // 7 days
const MIN_TRADE_EXPIRATION: u64 = 3_600; // 1 hour
const MAX_TRADE_EXPIRATION: u64 = 2_592_000; // 30 days

#[contract]
pub struct EscrowContract;

#[contractimpl]
impl EscrowContract {
    /// Wires the contract to its settlement token and its two collaborators.
    /// Callable once.
    pub fn initialize(
        env: Env,
        admin: Address,
        token: Address,
        registry: Address,
        catalog: Address,
    ) -> Result<(), Error> {
        admin.require_auth();
        if env.storage().persistent().has(&DataKey::Admin) {
            return Err(Error::AlreadyInitialized);
        }
        env.storage().persistent().set(&DataKey::Admin, &admin);
        env.storage().persistent().set(&DataKey::Token, &token);
        env.storage().persistent().set(&DataKey::Registry, &registry);
        env.storage().persistent().set(&DataKey::Catalog, &catalog);
        Ok(())
    }

    /// Opens a trade: locks `unit_price * quantity` of the buyer's tokens in
    /// the contract, reserves stock, and creates the ledger record in
    /// Holding with freshly generated delivery/receiving codes.
    ///
    /// The seller is resolved from the catalog, never taken from the caller.
    /// The price is captured here once; later catalog repricing does not
    /// affect this trade. All preconditions are checked before any effect,
    /// and the fund lock, stock reservation, and record creation share one
    /// atomic invocation.
    ///
    /// # Errors
    /// - `NotBuyer`: caller has no active Buyer profile
    /// - `InvalidQuantity`: quantity is zero
    /// - `ProductUnavailable`: unknown or delisted product
    /// - `InsufficientStock`: fewer than `quantity` units available
    /// - `InsufficientBalance`: buyer cannot cover the total
    pub fn initiate_trade(
        env: Env,
        buyer: Address,
        product_id: u64,
        quantity: u32,
        shipping_address: String,
        reference_hash: String,
    ) -> Result<u64, Error> {
        Self::_require_not_paused(&env)?;
        buyer.require_auth();

        if quantity == 0 {
            return Err(Error::InvalidQuantity);
        }

        let registry = RegistryClient::new(&env, &Self::_registry(&env)?);
        if !registry.profile_exists(&buyer) || !registry.is_buyer(&buyer) {
            return Err(Error::NotBuyer);
        }

        let catalog = CatalogClient::new(&env, &Self::_catalog(&env)?);
        if !catalog.is_available(&product_id) {
            return Err(Error::ProductUnavailable);
        }
        if catalog.quantity_available(&product_id) < quantity {
            return Err(Error::InsufficientStock);
        }
        let unit_price = catalog.unit_price(&product_id);
        let seller = catalog.seller_of(&product_id);

        let total = unit_price
            .checked_mul(quantity as i128)
            .ok_or(Error::AmountOverflow)?;

        let token_client = token::Client::new(&env, &Self::_token(&env)?);
        if token_client.balance(&buyer) < total {
            return Err(Error::InsufficientBalance);
        }

        // Effects: lock funds, reserve stock, then write the record.
        token_client.transfer(&buyer, &env.current_contract_address(), &total);
        catalog.decrement_stock(&product_id, &quantity);

        let trade_id = env
            .storage()
            .persistent()
            .get(&DataKey::TradeCounter)
            .unwrap_or(0u64)
            .checked_add(1)
            .ok_or(Error::AmountOverflow)?;
        env.storage()
            .persistent()
            .set(&DataKey::TradeCounter, &trade_id);

        let now = env.ledger().timestamp();
        let expires_at = now
            .checked_add(Self::get_trade_expiration(env.clone()))
            .ok_or(Error::AmountOverflow)?;
        let trade = EscrowTrade {
            id: trade_id,
            product_id,
            quantity,
            buyer: buyer.clone(),
            seller: seller.clone(),
            unit_price,
            total_locked: total,
            shipping_address,
            reference_hash,
            delivery_code: generate_delivery_code(&env),
            receiving_code: generate_receiving_code(&env),
            status: TradeStatus::Holding,
            locked_amount: total,
            created_at: now,
            expires_at,
            delivered_at: 0,
            completed_at: 0,
        };
        Self::_put_trade(&env, &trade);

        Self::_append_index(&env, DataKey::BuyerTrades(buyer.clone()), trade_id);
        Self::_append_index(&env, DataKey::SellerTrades(seller.clone()), trade_id);

        env.events().publish(
            (TRADE_INITIATED, buyer, seller),
            (trade_id, product_id, total),
        );
        log!(&env, "trade {} holding {}", trade_id, total);
        Ok(trade_id)
    }

    /// Marks a Holding trade as delivered. Only the trade's seller may call,
    /// and only with the exact delivery code. A wrong code leaves the record
    /// untouched; retries are unlimited.
    pub fn deliver_order(
        env: Env,
        seller: Address,
        trade_id: u64,
        delivery_code: String,
    ) -> Result<(), Error> {
        Self::_require_not_paused(&env)?;
        seller.require_auth();

        let mut trade = Self::_load_trade(&env, trade_id)?;
        if seller != trade.seller {
            return Err(Error::Unauthorized);
        }
        if trade.status != TradeStatus::Holding {
            return Err(Error::InvalidStatus);
        }
        if delivery_code != trade.delivery_code {
            return Err(Error::CodeMismatch);
        }

        trade.status = TradeStatus::Delivered;
        trade.delivered_at = env.ledger().timestamp();
        Self::_put_trade(&env, &trade);

        env.events().publish((ORDER_DELIVERED, seller), (trade_id,));
        Ok(())
    }

    /// Confirms receipt and releases the locked funds to the seller. Only
    /// the trade's buyer may call, only from Delivered, and only with the
    /// exact receiving code. This is the single point where value changes
    /// hands: the status flip and the payout share one atomic invocation.
    pub fn confirm_delivery_and_release(
        env: Env,
        buyer: Address,
        trade_id: u64,
        receiving_code: String,
    ) -> Result<(), Error> {
        Self::_require_not_paused(&env)?;
        buyer.require_auth();

        let mut trade = Self::_load_trade(&env, trade_id)?;
        if buyer != trade.buyer {
            return Err(Error::Unauthorized);
        }
        if trade.status != TradeStatus::Delivered {
            return Err(Error::InvalidStatus);
        }
        if receiving_code != trade.receiving_code {
            return Err(Error::CodeMismatch);
        }

        let payout = trade.locked_amount;
        trade.status = TradeStatus::Completed;
        trade.locked_amount = 0;
        trade.completed_at = env.ledger().timestamp();
        Self::_put_trade(&env, &trade);

        let token_client = token::Client::new(&env, &Self::_token(&env)?);
        token_client.transfer(&env.current_contract_address(), &trade.seller, &payout);

        env.events()
            .publish((TRADE_COMPLETED, trade.seller), (trade_id, payout));
        log!(&env, "trade {} released {}", trade_id, payout);
        Ok(())
    }

    /// Cancels a Holding trade and refunds the buyer in full. Either party
    /// may cancel; once the trade is Delivered the only forward path is
    /// `confirm_delivery_and_release`.
    pub fn cancel_escrow_order(
        env: Env,
        caller: Address,
        trade_id: u64,
        reason: String,
    ) -> Result<(), Error> {
        Self::_require_not_paused(&env)?;
        caller.require_auth();

        let mut trade = Self::_load_trade(&env, trade_id)?;
        if caller != trade.buyer && caller != trade.seller {
            return Err(Error::Unauthorized);
        }
        if trade.status != TradeStatus::Holding {
            return Err(Error::InvalidStatus);
        }

        let refund = trade.locked_amount;
        trade.status = TradeStatus::Cancelled;
        trade.locked_amount = 0;
        Self::_put_trade(&env, &trade);

        let token_client = token::Client::new(&env, &Self::_token(&env)?);
        token_client.transfer(&env.current_contract_address(), &trade.buyer, &refund);

        env.events()
            .publish((TRADE_CANCELLED, caller), (trade_id, refund, reason));
        log!(&env, "trade {} cancelled, refunded {}", trade_id, refund);
        Ok(())
    }

    /// Expires a trade stuck in Holding past its deadline and refunds the
    /// buyer. Callable by anyone, so a vanished counterparty cannot keep
    /// funds locked forever. Delivered trades do not expire: delivery was
    /// proven, and the forward path stays with the buyer's confirmation.
    pub fn expire_and_refund(env: Env, trade_id: u64) -> Result<(), Error> {
        Self::_require_not_paused(&env)?;

        let mut trade = Self::_load_trade(&env, trade_id)?;
        if trade.status != TradeStatus::Holding {
            return Err(Error::InvalidStatus);
        }
        if env.ledger().timestamp() < trade.expires_at {
            return Err(Error::NotExpired);
        }

        let refund = trade.locked_amount;
        trade.status = TradeStatus::Refunded;
        trade.locked_amount = 0;
        Self::_put_trade(&env, &trade);

        let token_client = token::Client::new(&env, &Self::_token(&env)?);
        token_client.transfer(&env.current_contract_address(), &trade.buyer, &refund);

        env.events()
            .publish((TRADE_REFUNDED, trade.buyer.clone()), (trade_id, refund));
        log!(&env, "trade {} expired, refunded {}", trade_id, refund);
        Ok(())
    }

    /// Halts all write entry points. Views stay readable. Admin only.
    pub fn pause(env: Env) -> Result<(), Error> {
        Self::_require_admin(&env)?;
        env.storage().persistent().set(&DataKey::Paused, &true);
        Ok(())
    }

    /// Admin only.
    pub fn unpause(env: Env) -> Result<(), Error> {
        Self::_require_admin(&env)?;
        env.storage().persistent().set(&DataKey::Paused, &false);
        Ok(())
    }

    /// Sets the Holding deadline window for trades created afterwards.
    /// Bounded to [1 hour, 30 days]. Admin only.
    pub fn update_trade_expiration(env: Env, expiration_seconds: u64) -> Result<(), Error> {
        Self::_require_admin(&env)?;
        if !(MIN_TRADE_EXPIRATION..=MAX_TRADE_EXPIRATION).contains(&expiration_seconds) {
            return Err(Error::InvalidExpiration);
        }
        env.storage()
            .persistent()
            .set(&DataKey::TradeExpiration, &expiration_seconds);
        Ok(())
    }

    // ---- Views ----------------------------------------------------------

    pub fn get_trade(env: Env, trade_id: u64) -> Result<EscrowTrade, Error> {
        Self::_load_trade(&env, trade_id)
    }

    pub fn get_status(env: Env, trade_id: u64) -> Result<TradeStatus, Error> {
        Ok(Self::_load_trade(&env, trade_id)?.status)
    }

    pub fn get_delivery_code(env: Env, trade_id: u64) -> Result<String, Error> {
        Ok(Self::_load_trade(&env, trade_id)?.delivery_code)
    }

    pub fn get_receiving_code(env: Env, trade_id: u64) -> Result<String, Error> {
        Ok(Self::_load_trade(&env, trade_id)?.receiving_code)
    }

    pub fn get_locked_amount(env: Env, trade_id: u64) -> Result<i128, Error> {
        Ok(Self::_load_trade(&env, trade_id)?.locked_amount)
    }

    /// Trade ids the account has participated in as buyer, oldest first.
    /// Append-only history; cancelled and refunded trades stay listed.
    pub fn get_trades_for_buyer(env: Env, account: Address) -> Vec<u64> {
        env.storage()
            .persistent()
            .get(&DataKey::BuyerTrades(account))
            .unwrap_or(vec![&env])
    }

    /// Trade ids the account has participated in as seller, oldest first.
    pub fn get_trades_for_seller(env: Env, account: Address) -> Vec<u64> {
        env.storage()
            .persistent()
            .get(&DataKey::SellerTrades(account))
            .unwrap_or(vec![&env])
    }

    /// Number of trades ever initiated; also the highest assigned id.
    pub fn get_trade_count(env: Env) -> u64 {
        env.storage()
            .persistent()
            .get(&DataKey::TradeCounter)
            .unwrap_or(0)
    }

    pub fn get_admin(env: Env) -> Result<Address, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)
    }

    pub fn get_token(env: Env) -> Result<Address, Error> {
        Self::_token(&env)
    }

    pub fn get_registry(env: Env) -> Result<Address, Error> {
        Self::_registry(&env)
    }

    pub fn get_catalog(env: Env) -> Result<Address, Error> {
        Self::_catalog(&env)
    }

    pub fn get_trade_expiration(env: Env) -> u64 {
        env.storage()
            .persistent()
            .get(&DataKey::TradeExpiration)
            .unwrap_or(DEFAULT_TRADE_EXPIRATION)
    }

    pub fn is_paused(env: Env) -> bool {
        Self::_is_paused(&env)
    }

    // ---- Internal guards and storage helpers ----------------------------

    fn _require_admin(env: &Env) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .persistent()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();
        Ok(())
    }

    fn _is_paused(env: &Env) -> bool {
        env.storage()
            .persistent()
            .get(&DataKey::Paused)
            .unwrap_or(false)
    }

    fn _require_not_paused(env: &Env) -> Result<(), Error> {
        if Self::_is_paused(env) {
            return Err(Error::ContractPaused);
        }
        Ok(())
    }

    fn _token(env: &Env) -> Result<Address, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Token)
            .ok_or(Error::NotInitialized)
    }

    fn _registry(env: &Env) -> Result<Address, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Registry)
            .ok_or(Error::NotInitialized)
    }

    fn _catalog(env: &Env) -> Result<Address, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Catalog)
            .ok_or(Error::NotInitialized)
    }

    fn _load_trade(env: &Env, trade_id: u64) -> Result<EscrowTrade, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Trade(trade_id))
            .ok_or(Error::TradeNotFound)
    }

    fn _put_trade(env: &Env, trade: &EscrowTrade) {
        env.storage()
            .persistent()
            .set(&DataKey::Trade(trade.id), trade);
    }

    fn _append_index(env: &Env, key: DataKey, trade_id: u64) {
        let mut ids: Vec<u64> = env.storage().persistent().get(&key).unwrap_or(vec![env]);
        ids.push_back(trade_id);
        env.storage().persistent().set(&key, &ids);
    }
}
