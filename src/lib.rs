pub mod app;
pub mod graph;
pub mod notes;
pub mod physics;
pub mod similarity;
pub mod util;
pub mod view;
pub mod viewport;
