mod seed;

pub use seed::{SeedError, SeedSource};
