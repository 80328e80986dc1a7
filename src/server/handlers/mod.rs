pub mod challenge;
pub mod health;
pub mod home;

pub use self::health::health;
pub use self::home::root;
