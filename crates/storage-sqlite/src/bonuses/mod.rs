mod model;
mod repository;

pub use model::BonusDB;
pub use repository::BonusRepository;
