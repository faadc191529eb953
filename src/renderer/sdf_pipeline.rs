//! SDF-based WebGPU render pipeline
//!
//! Renders the entire scene in fragment shader using signed distance fields:
//! sky and grass backdrop, every active duck, and the crosshair on top.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{DuckState, GameState};

/// Maximum number of ducks drawn per frame
pub const MAX_DUCKS: usize = 128;

/// Wing flaps per second while flying
const FLAP_RATE: f32 = 8.0;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Globals {
    resolution: [f32; 2], // offset 0
    play_size: [f32; 2],  // offset 8
    crosshair: [f32; 2],  // offset 16
    time: f32,            // offset 24
    duck_count: u32,      // offset 28
    crosshair_scale: f32, // offset 32
    duck_size: f32,       // offset 36
    game_over: u32,       // offset 40
    high_contrast: u32,   // offset 44
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct DuckData {
    pub pos: [f32; 2],
    /// -1 when facing left
    pub facing: f32,
    /// 0 = flying, 1 = falling
    pub falling: u32,
    /// Wing animation frame (0..3)
    pub frame: f32,
    pub _pad: [u32; 3], // Pad to 32 bytes
}

/// Pack the globals uniform for this frame
pub fn build_globals(state: &GameState, settings: &Settings, size: (u32, u32), time: f32) -> Globals {
    Globals {
        resolution: [size.0 as f32, size.1 as f32],
        play_size: [PLAY_WIDTH, PLAY_HEIGHT],
        crosshair: [state.crosshair.x, state.crosshair.y],
        time,
        duck_count: state.active_ducks().count().min(MAX_DUCKS) as u32,
        crosshair_scale: settings.crosshair_scale,
        duck_size: DUCK_SIZE,
        game_over: state.game_over as u32,
        high_contrast: settings.high_contrast as u32,
    }
}

/// Pack active ducks for the storage buffer (always `MAX_DUCKS` long)
pub fn pack_ducks(state: &GameState, time: f32) -> Vec<DuckData> {
    let mut ducks = vec![DuckData::default(); MAX_DUCKS];
    for (slot, duck) in ducks.iter_mut().zip(state.active_ducks()) {
        let (falling, frame) = match duck.state {
            // Three-frame flap loop, offset per duck so a batch doesn't flap in sync
            DuckState::Flying => (0, ((time * FLAP_RATE) as u32 + duck.id) % 3),
            _ => (1, 3),
        };
        *slot = DuckData {
            pos: [duck.pos.x, duck.pos.y],
            facing: if duck.flip_x { -1.0 } else { 1.0 },
            falling,
            frame: frame as f32,
            _pad: [0; 3],
        };
    }
    ducks
}

// ============================================================================
// SDF RENDER STATE
// ============================================================================

pub struct SdfRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    globals_buffer: wgpu::Buffer,
    ducks_buffer: wgpu::Buffer,

    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
    start_time: f64,
}

impl SdfRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("duck-hunt-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sdf_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sdf_shader.wgsl").into()),
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals {
                resolution: [width as f32, height as f32],
                play_size: [PLAY_WIDTH, PLAY_HEIGHT],
                crosshair: [PLAY_WIDTH / 2.0, PLAY_HEIGHT / 2.0],
                time: 0.0,
                duck_count: 0,
                crosshair_scale: 0.5,
                duck_size: DUCK_SIZE,
                game_over: 0,
                high_contrast: 0,
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let ducks_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ducks"),
            size: (std::mem::size_of::<DuckData>() * MAX_DUCKS) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sdf_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sdf_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: ducks_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sdf_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            ducks_buffer,
            bind_group,
            size: (width, height),
            start_time: 0.0,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn set_start_time(&mut self, time: f64) {
        self.start_time = time;
    }

    /// Update GPU buffers from game state and render
    pub fn render(
        &mut self,
        state: &GameState,
        settings: &Settings,
        time: f64,
    ) -> Result<(), wgpu::SurfaceError> {
        // time is ms from requestAnimationFrame
        let elapsed = ((time - self.start_time) / 1000.0) as f32;

        let globals = build_globals(state, settings, self.size, elapsed);
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let ducks = pack_ducks(state, elapsed);
        self.queue
            .write_buffer(&self.ducks_buffer, 0, bytemuck::cast_slice(&ducks));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sdf_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sdf_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::hit_duck;

    #[test]
    fn test_gpu_struct_sizes() {
        assert_eq!(std::mem::size_of::<Globals>(), 48);
        assert_eq!(std::mem::size_of::<DuckData>(), 32);
    }

    #[test]
    fn test_pack_ducks_active_only() {
        let mut state = GameState::new(11);
        let shot_id = state.ducks[0].id;
        hit_duck(&mut state, shot_id);
        state.ducks[1].state = DuckState::Gone;

        let packed = pack_ducks(&state, 0.0);
        assert_eq!(packed.len(), MAX_DUCKS);

        let globals = build_globals(&state, &Settings::default(), (800, 600), 0.0);
        assert_eq!(globals.duck_count, 5);

        // Falling duck keeps its slot and uses the fall frame
        assert_eq!(packed[0].falling, 1);
        assert_eq!(packed[0].frame, 3.0);
        // The gone duck is skipped
        assert_eq!(packed[1].pos, [state.ducks[2].pos.x, state.ducks[2].pos.y]);
        assert_eq!(packed[5], DuckData::default());
    }

    #[test]
    fn test_pack_facing_and_flap() {
        let state = GameState::new(4);
        for (slot, duck) in pack_ducks(&state, 1.3).iter().zip(&state.ducks) {
            assert_eq!(slot.facing < 0.0, duck.flip_x);
            assert_eq!(slot.falling, 0);
            assert!(slot.frame < 3.0);
        }
    }
}
