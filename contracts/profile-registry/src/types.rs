use soroban_sdk::{contracterror, contracttype, symbol_short, Address, String, Symbol};

/// Marketplace role. Fixed at registration; an address never holds both.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Buyer,
    Seller,
}

/// One profile per address. `active` gates every role check, so
/// deactivating a profile withdraws its marketplace capabilities without
/// erasing the historical record.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Profile {
    pub account: Address,
    pub name: String,
    pub role: Role,
    pub active: bool,
    pub registered_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Profile(Address),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyRegistered = 1,
    ProfileNotFound = 2,
    InvalidName = 3,
}

/// Event topics. Contains: (account, role) / (account,).
pub const PROFILE_REGISTERED: Symbol = symbol_short!("prof_reg");
pub const PROFILE_DEACTIVATED: Symbol = symbol_short!("prof_deac");
pub const PROFILE_REACTIVATED: Symbol = symbol_short!("prof_reac");
