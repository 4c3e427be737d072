#![forbid(unsafe_code)]

pub mod pak;
