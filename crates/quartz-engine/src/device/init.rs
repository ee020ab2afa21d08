/// Surface setup for [`Gpu::new`](super::Gpu::new).
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB surface format when one exists. Pixmaps hold sRGB bytes,
    /// so an sRGB target shows them unchanged.
    pub prefer_srgb: bool,

    /// Pace presentation to the display refresh. The clock repaints once per
    /// presented frame, so turning this off spins as fast as the GPU allows.
    pub vsync: bool,

    /// Frames the surface may queue ahead (hint).
    pub max_frame_latency: u32,
}

impl GpuInit {
    pub fn vsync(mut self, on: bool) -> Self {
        self.vsync = on;
        self
    }

    pub(crate) fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync { wgpu::PresentMode::Fifo } else { wgpu::PresentMode::AutoNoVsync }
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self { prefer_srgb: true, vsync: true, max_frame_latency: 2 }
    }
}
