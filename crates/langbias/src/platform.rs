pub mod cli;

#[cfg(feature = "browser")]
pub mod browser;
