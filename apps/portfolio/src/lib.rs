pub mod api;
pub mod config;
pub mod contact;
pub mod errors;
pub mod loader;
pub mod models;
pub mod normalize;
pub mod seed;
pub mod session;
pub mod shell;

pub use api::{ContentClient, ContentSource, Resource};
pub use contact::{ContactError, ContactFlow, ContactStatus};
pub use loader::{ResourceLoader, ResourceState};
pub use session::PortfolioSession;
pub use shell::PortfolioView;
