pub mod event;
pub mod progression;
pub mod step;
pub mod world;
