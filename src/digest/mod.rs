pub mod builder;
pub mod classifier;

pub use builder::DigestBuilder;
