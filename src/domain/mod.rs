pub mod catch;
pub mod entity;
pub mod visual;
