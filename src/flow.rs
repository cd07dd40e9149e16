//! Flow control and application event loop.
//!
//! A "flow" sets up a scene once and then updates it every frame. This module
//! owns the winit loop that drives it: it creates the window and the renderer,
//! forwards window events, keeps the camera in sync with the window size and
//! redraws as fast as the display allows.
//!
//! # User-facing types
//!
//! - [`SceneFlow`] is the trait a scene implements
//! - [`Stage`] bundles the scene, the camera and the flow, without any GPU state
//! - [`run`] opens the window and runs a flow until the window is closed
//!
//! # Lifecycle
//!
//! 1. `on_init` once, before the first frame
//! 2. On `Resized`: camera aspect, projection update, renderer resize
//! 3. On `RedrawRequested`: `on_update`, render, request the next redraw

use std::sync::Arc;

use cgmath::Deg;
use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use crate::{
    camera::PerspectiveCamera,
    config::SceneConfig,
    context::Context,
    data_structures::scene::Scene,
    renderer::{Renderer, RendererOptions, SurfaceError},
};

/// A scene and the logic that animates it.
pub trait SceneFlow {
    /// Populate the scene and place the camera. Called once before the first frame.
    fn on_init(&mut self, scene: &mut Scene, camera: &mut PerspectiveCamera);

    /// Called once per frame, right before rendering.
    fn on_update(&mut self, scene: &mut Scene, camera: &mut PerspectiveCamera, dt: Duration);

    /// Window events that the loop does not consume itself.
    fn on_window_events(
        &mut self,
        _scene: &mut Scene,
        _camera: &mut PerspectiveCamera,
        _event: &WindowEvent,
    ) {
    }
}

/// Scene, camera and flow. Everything a frame changes, and nothing that needs a GPU.
pub struct Stage<F> {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub flow: F,
    frames: u64,
}

impl<F: SceneFlow> Stage<F> {
    /// The camera starts with a square aspect; the first resize fixes it up.
    pub fn new(config: &SceneConfig, flow: F) -> Self {
        let camera = PerspectiveCamera::new(Deg(config.fov_degrees), 1.0, config.near, config.far);
        let mut scene = Scene::new();
        scene.background = config.clear_colour;
        Self {
            scene,
            camera,
            flow,
            frames: 0,
        }
    }

    pub fn init(&mut self) {
        self.flow.on_init(&mut self.scene, &mut self.camera);
    }

    pub fn update(&mut self, dt: Duration) {
        self.flow.on_update(&mut self.scene, &mut self.camera, dt);
        self.frames += 1;
    }

    /// Match the camera to a new drawing area.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
        self.camera.update_projection_matrix();
    }

    pub fn window_event(&mut self, event: &WindowEvent) {
        self.flow
            .on_window_events(&mut self.scene, &mut self.camera, event);
    }

    /// Number of updates so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

pub(crate) enum FlowEvent {
    #[allow(dead_code)]
    Initialized(anyhow::Result<Renderer>),
}

pub(crate) struct App<F: SceneFlow + 'static> {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[allow(dead_code)]
    proxy: winit::event_loop::EventLoopProxy<FlowEvent>,
    config: SceneConfig,
    stage: Stage<F>,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    last_time: Instant,
    error: Option<anyhow::Error>,
}

impl<F: SceneFlow + 'static> App<F> {
    fn new(
        event_loop: &EventLoop<FlowEvent>,
        config: SceneConfig,
        flow: F,
    ) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        let mut stage = Stage::new(&config, flow);
        stage.init();
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            config,
            stage,
            window: None,
            renderer: None,
            last_time: Instant::now(),
            error: None,
        })
    }

    fn on_renderer(&mut self, event_loop: &ActiveEventLoop, renderer: anyhow::Result<Renderer>) {
        match renderer {
            Ok(renderer) => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.stage.resize(size.width, size.height);
                    window.request_redraw();
                }
                self.renderer = Some(renderer);
                self.last_time = Instant::now();
            }
            Err(e) => {
                log::error!("App initialization failed. Cannot create the renderer: {:#}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) else {
            return;
        };
        let dt = self.last_time.elapsed();
        self.last_time = Instant::now();
        self.stage.update(dt);

        match renderer.render(&self.stage.scene, &self.stage.camera) {
            Ok(()) => {}
            // Reconfigure the surface if it's lost or outdated
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                log::warn!("surface lost or outdated, reconfiguring");
                let size = window.inner_size();
                renderer.set_size(size.width, size.height);
            }
            Err(e @ (SurfaceError::Timeout | SurfaceError::Occluded)) => {
                log::debug!("skipping frame: {}", e);
            }
            Err(SurfaceError::Validation) => {
                log::error!("Unable to render {}, shutting down", SurfaceError::Validation);
                event_loop.exit();
                return;
            }
        }
        // next frame, the requestAnimationFrame of this loop
        window.request_redraw();
    }
}

impl<F: SceneFlow + 'static> ApplicationHandler<FlowEvent> for App<F> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title(&self.config.title);

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowAttributesExtWebSys;
            // Let winit create the canvas and append it to the document body.
            window_attributes = window_attributes.with_append(true);
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Cannot create a window: {}", e);
                self.error = Some(e.into());
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let options = RendererOptions {
            antialias: self.config.antialias,
        };
        let init_future = async move {
            let ctx = Context::new(window).await?;
            anyhow::Ok(Renderer::new(ctx, options))
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            let renderer = self.async_runtime.block_on(init_future);
            self.on_renderer(event_loop, renderer);
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let renderer = init_future.await;
                if proxy.send_event(FlowEvent::Initialized(renderer)).is_err() {
                    log::error!("event loop closed before the renderer was ready");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            // This is the message from our wasm `spawn_local`
            FlowEvent::Initialized(renderer) => self.on_renderer(event_loop, renderer),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.stage.resize(size.width, size.height);
                if let Some(renderer) = &mut self.renderer {
                    renderer.set_size(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            other => self.stage.window_event(&other),
        }
    }
}

/// Open a window and run `flow` in it until the window is closed.
pub fn run<F: SceneFlow + 'static>(config: SceneConfig, flow: F) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config, flow)?;

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
