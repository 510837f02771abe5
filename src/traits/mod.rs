pub mod std_ops;

#[cfg(feature = "serde")]
pub mod serde_support;
