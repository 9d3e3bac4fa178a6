pub mod handlers;
pub mod layout;
pub mod routes;
pub mod templates;
pub mod toast;

pub use routes::create_router;
