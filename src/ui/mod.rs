pub mod canvas;
pub mod input;
pub mod keys;
pub mod renderer;
pub mod theme;
