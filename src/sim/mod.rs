pub mod clock;
pub mod event;
pub mod step;
pub mod store;
pub mod world;
