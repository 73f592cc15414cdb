mod mockup;

pub use mockup::APIData;
pub use mockup::Behaviour;
pub use mockup::MockGecko;
