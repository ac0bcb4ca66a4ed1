pub mod fixtures;
pub mod helpers;
pub mod mocks;
