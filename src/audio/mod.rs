pub mod pcm;
pub mod tone;
