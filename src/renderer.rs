//! Drawing a scene from a camera.
//!
//! [`Renderer`] owns the GPU [`Context`] together with everything a frame
//! needs: render targets, the normal-material pipelines, the camera uniform and
//! one [`GpuMesh`] per scene mesh. Meshes are uploaded the first time they are
//! seen; afterwards only their transforms are rewritten each frame.
//!
//! Antialiasing renders into a 4x multisampled target that is resolved into the
//! surface texture. If the adapter can't do 4x for the surface format the
//! renderer falls back to single sampling and logs it.

use std::{collections::HashMap, fmt, iter, time::Duration};

use anyhow::{Context as _, anyhow};
use wgpu::util::DeviceExt;

use crate::{
    camera::{CameraUniform, PerspectiveCamera},
    context::Context,
    data_structures::{
        mesh::GpuMesh,
        scene::{MeshId, Scene},
        texture::Texture,
    },
    pipelines::normal::{NormalPipelines, mk_camera_bind_group_layout},
};

pub const MSAA_SAMPLES: u32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RendererOptions {
    pub antialias: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self { antialias: true }
    }
}

/// Why a frame could not be drawn to the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceError {
    /// Acquiring the next texture timed out; try again next frame.
    Timeout,
    /// The window is hidden; nothing to draw into.
    Occluded,
    /// The surface no longer matches the window and must be reconfigured.
    Outdated,
    Lost,
    /// wgpu rejected the surface configuration.
    Validation,
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Timeout => "timed out acquiring the surface texture",
            Self::Occluded => "surface is occluded",
            Self::Outdated => "surface is outdated",
            Self::Lost => "surface was lost",
            Self::Validation => "surface texture failed validation",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for SurfaceError {}

pub struct Renderer {
    ctx: Context,
    sample_count: u32,
    depth_texture: Texture,
    msaa_texture: Option<Texture>,
    pipelines: NormalPipelines,
    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    meshes: HashMap<MeshId, GpuMesh>,
}

impl Renderer {
    pub fn new(ctx: Context, options: RendererOptions) -> Self {
        let sample_count = match (options.antialias, ctx.msaa_x4) {
            (true, true) => MSAA_SAMPLES,
            (true, false) => {
                log::warn!(
                    "{:?} does not support {}x MSAA, rendering without antialiasing",
                    ctx.config.format,
                    MSAA_SAMPLES
                );
                1
            }
            (false, _) => 1,
        };

        let camera_uniform = CameraUniform::new();
        let camera_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group_layout = mk_camera_bind_group_layout(&ctx.device);
        let camera_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let pipelines = NormalPipelines::new(
            &ctx.device,
            ctx.config.format,
            sample_count,
            &camera_bind_group_layout,
        );

        let size = [ctx.config.width, ctx.config.height];
        let depth_texture =
            Texture::create_depth_texture(&ctx.device, size, sample_count, "depth_texture");
        let msaa_texture = (sample_count > 1).then(|| {
            Texture::create_msaa_texture(&ctx.device, size, ctx.config.format, sample_count)
        });
        log::info!(
            "renderer ready: {}x{} {:?}, {} sample(s)",
            size[0],
            size[1],
            ctx.config.format,
            sample_count
        );

        Self {
            ctx,
            sample_count,
            depth_texture,
            msaa_texture,
            pipelines,
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            meshes: HashMap::new(),
        }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn size(&self) -> (u32, u32) {
        self.ctx.size()
    }

    /// Resize the drawing area. Zero sizes are ignored.
    pub fn set_size(&mut self, width: u32, height: u32) {
        if !self.ctx.resize(width, height) {
            log::debug!("skipping resize to {}x{}", width, height);
            return;
        }
        let size = [width, height];
        self.depth_texture = Texture::create_depth_texture(
            &self.ctx.device,
            size,
            self.sample_count,
            "depth_texture",
        );
        if self.sample_count > 1 {
            self.msaa_texture = Some(Texture::create_msaa_texture(
                &self.ctx.device,
                size,
                self.ctx.config.format,
                self.sample_count,
            ));
        }
        log::debug!("renderer resized to {}x{}", width, height);
    }

    /// Draw `scene` as seen from `camera` and present it.
    ///
    /// Without a surface the frame is drawn into a throwaway offscreen target.
    pub fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<(), SurfaceError> {
        self.prepare(scene, camera);

        match &self.ctx.surface {
            Some(surface) => {
                let (output, suboptimal) = match surface.get_current_texture() {
                    wgpu::CurrentSurfaceTexture::Success(output) => (output, false),
                    wgpu::CurrentSurfaceTexture::Suboptimal(output) => (output, true),
                    wgpu::CurrentSurfaceTexture::Timeout => return Err(SurfaceError::Timeout),
                    wgpu::CurrentSurfaceTexture::Occluded => return Err(SurfaceError::Occluded),
                    wgpu::CurrentSurfaceTexture::Outdated => return Err(SurfaceError::Outdated),
                    wgpu::CurrentSurfaceTexture::Lost => return Err(SurfaceError::Lost),
                    wgpu::CurrentSurfaceTexture::Validation => {
                        return Err(SurfaceError::Validation);
                    }
                };
                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                let encoder = self.encode(&view, scene);
                self.ctx.queue.submit(iter::once(encoder.finish()));
                output.present();
                if suboptimal {
                    // Still presentable, but the next frame should use a fresh configuration.
                    let (width, height) = self.size();
                    self.ctx.resize(width, height);
                }
            }
            None => {
                let target = Texture::create_capture_texture(
                    &self.ctx.device,
                    [self.ctx.config.width, self.ctx.config.height],
                    self.ctx.config.format,
                );
                let encoder = self.encode(&target.view, scene);
                self.ctx.queue.submit(iter::once(encoder.finish()));
            }
        }
        Ok(())
    }

    /// Draw a frame offscreen and read it back as RGBA.
    pub async fn capture(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> anyhow::Result<image::RgbaImage> {
        self.prepare(scene, camera);

        let (width, height) = self.size();
        let target = Texture::create_capture_texture(
            &self.ctx.device,
            [width, height],
            self.ctx.config.format,
        );
        let mut encoder = self.encode(&target.view, scene);

        let bytes_per_pixel = 4;
        let unpadded_bytes_per_row = width * bytes_per_pixel;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;

        let output_buffer = self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Capture Buffer"),
            size: (padded_bytes_per_row * height) as wgpu::BufferAddress,
            // this tells wpgu that we want to read this buffer from the cpu
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        let submission = self.ctx.queue.submit(iter::once(encoder.finish()));

        // NOTE: the mapping has to be requested before device.poll(), otherwise
        // the receiver never resolves.
        let buffer_slice = output_buffer.slice(..);
        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            tx.send(result).ok();
        });
        self.ctx
            .device
            .poll(wgpu::PollType::Wait {
                submission_index: Some(submission),
                timeout: Some(Duration::from_secs(3)),
            })
            .map_err(|e| anyhow!("waiting for the GPU failed: {:?}", e))?;
        rx.receive()
            .await
            .context("capture buffer mapping was dropped")?
            .context("failed to map the capture buffer")?;

        let swap_red_blue = matches!(
            self.ctx.config.format,
            wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
        );
        let pixels = {
            let data = buffer_slice.get_mapped_range();
            let mut pixels = Vec::with_capacity((unpadded_bytes_per_row * height) as usize);
            for row in data.chunks(padded_bytes_per_row as usize) {
                for px in row[..unpadded_bytes_per_row as usize].chunks(4) {
                    if swap_red_blue {
                        pixels.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
                    } else {
                        pixels.extend_from_slice(px);
                    }
                }
            }
            pixels
        };
        output_buffer.unmap();

        image::RgbaImage::from_raw(width, height, pixels)
            .ok_or_else(|| anyhow!("captured {}x{} frame has the wrong size", width, height))
    }

    /// Upload new meshes and write this frame's camera and transforms.
    fn prepare(&mut self, scene: &Scene, camera: &PerspectiveCamera) {
        self.camera_uniform.update_view_proj(camera);
        self.ctx.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );

        for (id, mesh) in scene.meshes() {
            let device = &self.ctx.device;
            let gpu_mesh = self.meshes.entry(id).or_insert_with(|| {
                log::debug!("uploading mesh {:?}", id);
                GpuMesh::new(device, mesh, &format!("Mesh {}", id.index()))
            });
            gpu_mesh.write_transform(&self.ctx.queue, mesh);
        }
    }

    fn encode(&self, target: &wgpu::TextureView, scene: &Scene) -> wgpu::CommandEncoder {
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            // With MSAA we draw into the multisampled texture and resolve into `target`.
            let (view, resolve_target, store) = match &self.msaa_texture {
                Some(msaa) => (&msaa.view, Some(target), wgpu::StoreOp::Discard),
                None => (target, None, wgpu::StoreOp::Store),
            };
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(scene.background),
                        store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            for (id, mesh) in scene.meshes() {
                let Some(gpu_mesh) = self.meshes.get(&id) else {
                    continue;
                };
                let wireframe = mesh.material.wireframe;
                render_pass.set_pipeline(self.pipelines.get(wireframe));
                render_pass.set_vertex_buffer(0, gpu_mesh.vertex_buffer.slice(..));
                render_pass.set_vertex_buffer(1, gpu_mesh.instance_buffer.slice(..));
                if wireframe {
                    render_pass
                        .set_index_buffer(gpu_mesh.edge_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..gpu_mesh.num_edges, 0, 0..1);
                } else {
                    render_pass
                        .set_index_buffer(gpu_mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..gpu_mesh.num_indices, 0, 0..1);
                }
            }
        }
        encoder
    }
}
