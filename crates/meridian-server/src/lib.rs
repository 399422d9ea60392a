pub mod engine;
pub mod registry;
pub mod router;
pub mod server;
pub mod session;

pub use engine::RpcEngine;
pub use registry::{SessionRegistry, TokenConflict};
pub use server::{build_router, start, AppState, ServerConfig, ServerHandle};
pub use session::{SessionHandle, SessionStream};
