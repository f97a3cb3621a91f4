mod db;
pub mod routes;
mod startup;
mod utils;

pub use db::*;
pub use routes::*;
pub use startup::*;
pub use utils::*;
