pub mod error;
pub mod model;
pub mod requestable;
pub mod value_object;
