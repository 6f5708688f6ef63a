mod cancel;
mod config;
mod gradient_descent;
pub mod sweep;

pub use cancel::*;
pub use config::*;
pub use gradient_descent::*;
pub use sweep::sweep;
