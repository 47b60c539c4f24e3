pub mod backend;
pub mod cpu;
pub mod recording;
pub mod slide;
pub mod text;
