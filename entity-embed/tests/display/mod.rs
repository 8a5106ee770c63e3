//! Display registry and display plugin tests

mod applicability;
mod image;
