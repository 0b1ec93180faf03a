//! Model module containing data structures

mod forecast;
mod window;

pub use forecast::Forecast;
pub use window::Window;
