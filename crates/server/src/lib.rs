pub mod cli;

mod assets;
pub use assets::*;

mod errors;
pub use errors::*;

mod routes;
pub use routes::*;
