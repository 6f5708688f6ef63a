mod dense;
mod functional;
mod product;
mod slicing;

pub use dense::*;
pub use product::*;

pub type Value = f64;
