pub mod errors;
pub mod db;
pub mod category;
pub mod product;
pub mod banner;
pub mod user;
pub mod user_credentials;
pub mod profile;
pub mod session;

#[cfg(test)]
mod tests;
