use soroban_sdk::{contractclient, Address, Env};

/// The slice of the profile registry this contract consumes. Listing a
/// product requires an active Seller profile.
#[contractclient(name = "RegistryClient")]
pub trait IdentityRegistry {
    fn is_seller(env: Env, account: Address) -> bool;
}
