pub mod rng;
pub mod smoothing;
pub mod time;
