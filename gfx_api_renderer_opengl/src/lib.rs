/*!
# gfx_api - OpenGL Backend

OpenGL implementation of the gfx_api resource traits.

Native calls go through the `GlDevice` trait, implemented for `glow::Context`
(a real driver, current on the calling thread) and for `SoftwareDevice` (a CPU
emulation used for headless runs and tests). Resources hold a shared handle on
the device, so they stay on the thread that owns the GL context.

# Example

```
use gfx_api::gfx::render::{BufferUsage, PixelFormat};
use gfx_api::gfx::{Config, Context};
use gfx_api_renderer_opengl::{OpenGlContext, SoftwareDevice};

let context = OpenGlContext::new(SoftwareDevice::new(), Config::default());
let texture = context.create_texture(64, 64, PixelFormat::Rgba, "albedo")?;
assert_eq!(texture.info().mip_levels, 7);

let mut vertices = context.create_buffer(BufferUsage::VertexBuffer)?;
vertices.upload(12, Some(&[0u8; 12]));
assert_eq!(vertices.size(), 12);
# Ok::<(), gfx_api::gfx::Error>(())
```
*/

// OpenGL implementation modules
mod gl_context;
mod gl_texture;
mod gl_buffer;
mod gl_device;
mod software_device;

pub mod gl_format;

pub use gl_context::OpenGlContext;
pub use gl_texture::Texture as OpenGlTexture;
pub use gl_buffer::Buffer as OpenGlBuffer;
pub use gl_device::{error_name, DeviceCaps, GlDevice};
pub use software_device::{LevelSnapshot, SoftwareDevice};
