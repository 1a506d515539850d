//! Audio decoding and encoding

pub mod decoder;
pub mod encoder;

pub use decoder::decode_stereo;
pub use encoder::{encode, mp3_bitrate, SUPPORTED_BITRATES};
