mod memory;
mod postgres;
mod traits;

pub use memory::InMemoryDriverLocationRepository;
pub use postgres::PgDriverLocationRepository;
pub use traits::DriverLocationRepository;
