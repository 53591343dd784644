/*!
 * Profile Registry Contract
 *
 * Maps an account to its marketplace identity: a display name, a role
 * (buyer or seller), and an active flag. The product catalog and the escrow
 * contract consult this registry for authorization; it performs no value
 * transfers of its own.
 */

#![no_std]

mod types;


use soroban_sdk::{contract, contractimpl, Address, Env, String};

pub use types::{DataKey, Error, Profile, Role};
use types::{PROFILE_DEACTIVATED, PROFILE_REACTIVATED, PROFILE_REGISTERED};

#[contract]
pub struct ProfileRegistry;

#[contractimpl]
impl ProfileRegistry {
    /// Registers a profile for `account`. One profile per address; the role
    /// is fixed for the lifetime of the profile.
    ///
    /// # Errors
    /// - `AlreadyRegistered`: the address already holds a profile
    /// - `InvalidName`: empty display name
    pub fn register_profile(
        env: Env,
        account: Address,
        name: String,
        role: Role,
    ) -> Result<(), Error> {
        account.require_auth();

        if name.len() == 0 {
            return Err(Error::InvalidName);
        }
        let key = DataKey::Profile(account.clone());
        if env.storage().persistent().has(&key) {
            return Err(Error::AlreadyRegistered);
        }

        let profile = Profile {
            account: account.clone(),
            name,
            role,
            active: true,
            registered_at: env.ledger().timestamp(),
        };
        env.storage().persistent().set(&key, &profile);

        env.events()
            .publish((PROFILE_REGISTERED, account), (role,));
        Ok(())
    }

    /// Marks the caller's profile inactive. Role checks fail for inactive
    /// profiles; the record itself is kept.
    pub fn deactivate_profile(env: Env, account: Address) -> Result<(), Error> {
        account.require_auth();
        let mut profile = Self::load(&env, &account)?;
        profile.active = false;
        env.storage()
            .persistent()
            .set(&DataKey::Profile(account.clone()), &profile);
        env.events().publish((PROFILE_DEACTIVATED, account), ());
        Ok(())
    }

    /// Restores an inactive profile.
    pub fn reactivate_profile(env: Env, account: Address) -> Result<(), Error> {
        account.require_auth();
        let mut profile = Self::load(&env, &account)?;
        profile.active = true;
        env.storage()
            .persistent()
            .set(&DataKey::Profile(account.clone()), &profile);
        env.events().publish((PROFILE_REACTIVATED, account), ());
        Ok(())
    }

    pub fn profile_exists(env: Env, account: Address) -> bool {
        env.storage().persistent().has(&DataKey::Profile(account))
    }

    /// True when the account holds an active Buyer profile.
    pub fn is_buyer(env: Env, account: Address) -> bool {
        match Self::load(&env, &account) {
            Ok(p) => p.active && p.role == Role::Buyer,
            Err(_) => false,
        }
    }

    /// True when the account holds an active Seller profile.
    pub fn is_seller(env: Env, account: Address) -> bool {
        match Self::load(&env, &account) {
            Ok(p) => p.active && p.role == Role::Seller,
            Err(_) => false,
        }
    }

    pub fn role_of(env: Env, account: Address) -> Result<Role, Error> {
        Ok(Self::load(&env, &account)?.role)
    }

    pub fn get_profile(env: Env, account: Address) -> Result<Profile, Error> {
        Self::load(&env, &account)
    }

    fn load(env: &Env, account: &Address) -> Result<Profile, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Profile(account.clone()))
            .ok_or(Error::ProfileNotFound)
    }
}
