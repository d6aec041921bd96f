mod context;
mod render;
mod texture;

pub use context::{GpuContext, GpuError};
pub use render::BlitPipeline;
pub use texture::FrameTexture;
