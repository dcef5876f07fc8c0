pub mod assignment;
pub mod geo;
pub mod route;
