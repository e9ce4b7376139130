pub mod record;
pub mod shops;
pub mod stats;
