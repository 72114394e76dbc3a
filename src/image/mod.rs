pub mod color;
pub mod f32;
pub mod io;

pub use self::color::{
    channel_mean, extract_channel, gray_mean, resize_to_width, suppress_dark_pixels, Channel,
};
pub use self::f32::ImageF32;
