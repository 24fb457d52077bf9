pub mod f32;
pub mod io;
pub mod pixels;
pub mod traits;

pub use self::f32::ImageF32;
pub use self::pixels::PixelBuffer;
pub use self::traits::{ImageView, ImageViewMut, Rows};
