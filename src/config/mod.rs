pub mod breeding;

pub use breeding::CrossbreedConfig;
