#![allow(ambiguous_glob_reexports)]

pub mod share_math;

pub mod initialize_farm;
pub mod create_strategy;
pub mod deposit;
pub mod withdraw;
pub mod stake;
pub mod redeem;

pub use initialize_farm::*;
pub use create_strategy::*;
pub use deposit::*;
pub use withdraw::*;
pub use stake::*;
pub use redeem::*;
