mod routes;
mod session;

pub use routes::Routes;
pub use session::Session;
