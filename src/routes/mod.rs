mod healthcheck;
mod logout;

pub use healthcheck::*;
pub use logout::*;
