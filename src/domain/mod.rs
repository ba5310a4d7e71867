//! Storefront domain: wire aggregates, value objects and view events.
pub mod aggregates;
pub mod events;
pub mod value_objects;
