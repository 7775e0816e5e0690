pub mod downloads;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod ws;

pub use routes::create_router;
pub use ws::WsMessage;
