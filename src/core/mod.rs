pub mod builder;
pub mod config;
pub mod constants;
pub mod geo;
pub mod geometry;
pub mod lifecycle;
pub mod map;
pub mod selection;
pub mod viewport;
