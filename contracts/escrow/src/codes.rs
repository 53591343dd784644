//! Delivery and receiving code generation.
//!
//! Each trade gets two short numeric secrets drawn from the environment PRNG
//! at creation and persisted only in the ledger record. The ranges guarantee
//! fixed width with no leading zero: the delivery code is always exactly six
//! digits, the receiving code exactly four. The parties exchange them
//! out-of-band; the state machine consumes each one in a transition that
//! cannot repeat.

use soroban_sdk::{Env, String};

const DELIVERY_CODE_MIN: u64 = 100_000;
const DELIVERY_CODE_MAX: u64 = 999_999;
const RECEIVING_CODE_MIN: u64 = 1_000;
const RECEIVING_CODE_MAX: u64 = 9_999;

/// 6-digit code the seller presents to mark a trade delivered.
pub fn generate_delivery_code(env: &Env) -> String {
    let n: u64 = env.prng().gen_range(DELIVERY_CODE_MIN..=DELIVERY_CODE_MAX);
    to_decimal_string(env, n, 6)
}

/// 4-digit code the buyer presents to release the locked funds.
pub fn generate_receiving_code(env: &Env) -> String {
    let n: u64 = env.prng().gen_range(RECEIVING_CODE_MIN..=RECEIVING_CODE_MAX);
    to_decimal_string(env, n, 4)
}

// Soroban String carries no formatting machinery in no_std, so the digits
// are rendered by hand. `width` must cover `n`.
fn to_decimal_string(env: &Env, mut n: u64, width: usize) -> String {
    let mut buf = [0u8; 8];
    let mut i = width;
    while i > 0 {
        i -= 1;
        buf[i] = b'0' + (n % 10) as u8;
        n /= 10;
    }
    String::from_bytes(env, &buf[..width])
}
