pub mod commands;
pub mod entities;
pub mod enums;
pub mod value_objects;
