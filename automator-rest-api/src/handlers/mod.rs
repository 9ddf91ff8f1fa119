pub mod health;
pub mod processes;
pub mod tasks;

pub use health::*;
pub use processes::*;
pub use tasks::*;
