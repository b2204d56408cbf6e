pub mod demo;
pub mod entities;
pub mod simulate;
pub mod status;
