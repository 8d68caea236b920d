pub mod routes;
pub mod startup;
pub mod state;
pub mod session;
pub mod wire;
pub mod errors;
pub mod openapi;

pub use startup::run;
