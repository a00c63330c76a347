// Dashboard context - data model, state snapshots and the live session
pub mod schema;
pub mod session;
pub mod state;

pub use schema::*;
pub use session::DashboardSession;
pub use state::{DashboardState, RequestKind, RequestTag};
