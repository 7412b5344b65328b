//! API route modules, one per lifecycle surface.

pub mod disputes;
pub mod jobs;
pub mod settlement;
