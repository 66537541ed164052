#![forbid(unsafe_code)]

#[macro_use]
pub mod prelude;

pub mod college;
pub mod pattern;
pub mod repr;
pub mod traits;
