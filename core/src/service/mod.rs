pub mod drink_service;
pub mod stats_service;
