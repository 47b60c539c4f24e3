pub mod ffmpeg;
pub mod mux;
pub mod sink;
