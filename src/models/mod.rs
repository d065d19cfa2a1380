mod grocery;
mod order;
mod user;

pub use grocery::*;
pub use order::*;
pub use user::*;
