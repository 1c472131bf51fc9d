#![no_std]
extern crate alloc;
// The barycentric cache lives in a process-wide `std::sync` map.
extern crate std;

pub mod fiat_shamir;
pub mod parameters;
pub mod poly;
pub mod relations;
pub mod sumcheck;
