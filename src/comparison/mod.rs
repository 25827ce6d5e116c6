pub mod history;
pub mod models;
pub mod session;

pub use history::*;
pub use models::*;
pub use session::*;
