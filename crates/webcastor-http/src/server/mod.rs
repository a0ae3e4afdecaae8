pub mod context;
pub mod health;
pub mod lifecycle;
pub mod routes;

pub use context::AppContext;
pub use health::{health_check_handler, HealthStatus};
pub use lifecycle::{serve, start_server};
pub use routes::{build_router, CreateChannelRequest, CreatedChannel};
