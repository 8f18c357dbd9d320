//! wgpu renderer shared by the web and native front-ends.
//!
//! One [`GpuContext`] (adapter/device/queue) serves every surface on the page.
//! Each surface gets its own [`RenderSurface`] and [`SceneRenderer`], so
//! dropping a scene's renderer releases everything uploaded for it.

mod helpers;

use crate::constants::linear_from_srgb;
use crate::scene::{NodeId, SceneHost};
use fnv::FnvHashMap;
use glam::Mat4;
use wgpu::util::DeviceExt;

pub use helpers::DEPTH_FORMAT;

pub static SCENE_WGSL: &str = include_str!("../../shaders/scene.wgsl");

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct FrameUniforms {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    key_dir: [f32; 4],
    ambient_env: [f32; 4],
    env_tint: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ObjectUniforms {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
    tint: [f32; 4],
}

pub struct GpuContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    pub async fn new(
        instance: wgpu::Instance,
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> anyhow::Result<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }
}

/// A configured surface plus its depth buffer.
pub struct RenderSurface {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    depth_tex: wgpu::Texture,
    depth_view: wgpu::TextureView,
}

impl RenderSurface {
    pub fn new(
        ctx: &GpuContext,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> Self {
        let caps = surface.get_capabilities(&ctx.adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .unwrap_or(wgpu::TextureFormat::Bgra8Unorm);
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&ctx.device, &config);
        let (depth_tex, depth_view) =
            helpers::create_depth_texture(&ctx.device, "depth", config.width, config.height);
        Self {
            surface,
            config,
            depth_tex,
            depth_view,
        }
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Reconfigure after the backing size changed. Zero-sized requests are ignored.
    pub fn resize_if_needed(&mut self, device: &wgpu::Device, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        if width == self.config.width && height == self.config.height {
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(device, &self.config);
        (self.depth_tex, self.depth_view) =
            helpers::create_depth_texture(device, "depth", width, height);
        true
    }

    /// Reconfigure with the current size, e.g. after `SurfaceError::Lost`.
    pub fn reconfigure(&mut self, device: &wgpu::Device) {
        self.surface.configure(device, &self.config);
    }
}

struct GpuModel {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Draws one [`SceneHost`] into one [`RenderSurface`].
pub struct SceneRenderer {
    pipeline: wgpu::RenderPipeline,
    object_bgl: wgpu::BindGroupLayout,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    models: FnvHashMap<NodeId, GpuModel>,
}

impl SceneRenderer {
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });
        let frame_bgl = helpers::uniform_bind_group_layout(device, "frame_bgl");
        let object_bgl = helpers::uniform_bind_group_layout(device, "object_bgl");
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&frame_bgl, &object_bgl],
            push_constant_ranges: &[],
        });
        let pipeline = helpers::make_mesh_pipeline(device, &layout, &shader, color_format);
        let (frame_buffer, frame_bind_group) = helpers::uniform_buffer_and_group(
            device,
            &frame_bgl,
            "frame_uniforms",
            std::mem::size_of::<FrameUniforms>() as u64,
        );
        Self {
            pipeline,
            object_bgl,
            frame_buffer,
            frame_bind_group,
            models: FnvHashMap::default(),
        }
    }

    /// Upload nodes that finished loading since the last call.
    pub fn sync(&mut self, device: &wgpu::Device, scene: &SceneHost) {
        for (id, node) in scene.nodes() {
            if self.models.contains_key(&id) {
                continue;
            }
            let Some(model) = node.model() else {
                continue;
            };
            let mut vertices: Vec<GpuVertex> = model
                .mesh
                .vertices
                .iter()
                .map(|v| GpuVertex {
                    position: v.position,
                    normal: v.normal,
                    color: crate::constants::DEFAULT_BASE_COLOR,
                })
                .collect();
            for prim in &model.mesh.primitives {
                let range = prim.indices.start as usize..prim.indices.end as usize;
                for &ix in &model.mesh.indices[range] {
                    if let Some(v) = vertices.get_mut(ix as usize) {
                        v.color = prim.base_color;
                    }
                }
            }
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("model_vb"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("model_ib"),
                contents: bytemuck::cast_slice(&model.mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            let (uniform_buffer, bind_group) = helpers::uniform_buffer_and_group(
                device,
                &self.object_bgl,
                "object_uniforms",
                std::mem::size_of::<ObjectUniforms>() as u64,
            );
            log::debug!(
                "[render] {} uploaded {} ({} vertices)",
                scene.label(),
                node.asset().id,
                vertices.len()
            );
            self.models.insert(
                id,
                GpuModel {
                    vertex_buffer,
                    index_buffer,
                    index_count: model.mesh.indices.len() as u32,
                    uniform_buffer,
                    bind_group,
                },
            );
        }
    }

    pub fn render(
        &mut self,
        ctx: &GpuContext,
        target: &RenderSurface,
        scene: &SceneHost,
    ) -> Result<(), wgpu::SurfaceError> {
        self.sync(&ctx.device, scene);

        let camera = scene.camera();
        let lights = scene.lights();
        let key_dir = lights.key_position.normalize_or_zero();
        let [tr, tg, tb] = lights.environment_tint;
        let frame_uniforms = FrameUniforms {
            view_proj: camera.view_proj().to_cols_array_2d(),
            eye: camera.eye.extend(1.0).to_array(),
            key_dir: key_dir.extend(lights.key_intensity).to_array(),
            ambient_env: [lights.ambient, lights.environment_intensity, 0.0, 0.0],
            env_tint: [tr, tg, tb, 1.0],
        };
        ctx.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame_uniforms));

        // opaque first so dimmed models blend over the backdrop
        let mut draws: Vec<(NodeId, f32)> = scene
            .nodes()
            .filter(|(id, _)| self.models.contains_key(id))
            .map(|(id, n)| (id, n.opacity()))
            .collect();
        draws.sort_by(|a, b| b.1.total_cmp(&a.1));

        for (id, opacity) in &draws {
            let (Some(node), Some(gpu)) = (scene.node(*id), self.models.get(id)) else {
                continue;
            };
            let model = node.world_transform();
            let object = ObjectUniforms {
                model: model.to_cols_array_2d(),
                normal: normal_matrix(model).to_cols_array_2d(),
                tint: [1.0, 1.0, 1.0, *opacity],
            };
            ctx.queue
                .write_buffer(&gpu.uniform_buffer, 0, bytemuck::bytes_of(&object));
        }

        let frame = target.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let [r, g, b] = linear_from_srgb(scene.clear_color());
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &target.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.frame_bind_group, &[]);
            for (id, _) in &draws {
                let Some(gpu) = self.models.get(id) else {
                    continue;
                };
                rpass.set_bind_group(1, &gpu.bind_group, &[]);
                rpass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
                rpass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..gpu.index_count, 0, 0..1);
            }
        }
        ctx.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn normal_matrix(model: Mat4) -> Mat4 {
    if model.determinant().abs() > f32::EPSILON {
        model.inverse().transpose()
    } else {
        model
    }
}
