use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::InputState;
use crate::time::{FpsCounter, FrameClock, FrameTime};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Physical pixels, so world coordinates map 1:1 to surface pixels.
    pub initial_size: PhysicalSize<u32>,
    /// Append `[NN.NN FPS]` to the title once per FPS sample.
    pub show_fps: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "glint".to_string(),
            initial_size: PhysicalSize::new(1600, 900),
            show_fps: true,
        }
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.commands.push(Command::SetTitle(title.into()));
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }
}

enum Command {
    SetTitle(String),
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    clock: FrameClock,
    fps: FpsCounter,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    title: String,
    exit_requested: bool,
    failure: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        let title = config.title.clone();
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            title,
            exit_requested: false,
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure = Some(err);
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        WindowEntryTryBuilder {
            input_state: InputState::default(),
            clock: FrameClock::default(),
            fps: FpsCounter::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, mut ctx: RuntimeCtx) {
        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::SetTitle(title) => {
                    self.title = title;
                    if let Some(entry) = &self.entry {
                        entry.with_window(|w| w.set_title(&self.title));
                    }
                }
                Command::Exit => self.exit_requested = true,
            }
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (app, config, title) = (&mut self.app, &self.config, &self.title);
        let Some(entry) = self.entry.as_mut() else { return };

        let mut runtime_ctx = RuntimeCtx::default();
        let mut app_control = AppControl::Continue;

        entry.with_mut(|fields| {
            let ft: FrameTime = fields.clock.tick();

            if let Some(sample) = fields.fps.frame(ft.now) {
                app.on_fixed_update(sample);
                if config.show_fps {
                    fields.window.set_title(&format!("{title} [{:.2} FPS]", sample.fps));
                }
            }

            let mut ctx = FrameCtx {
                window: WindowCtx { window: fields.window },
                gpu: fields.gpu,
                input: fields.input_state,
                time: ft,
                runtime: &mut runtime_ctx,
            };

            app_control = app.on_frame(&mut ctx);
        });

        if app_control == AppControl::Exit {
            runtime_ctx.exit();
        }

        self.apply_commands(event_loop, runtime_ctx);
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        let entry = match self.create_window_entry(event_loop) {
            Ok(entry) => entry,
            Err(e) => return self.fail(event_loop, e),
        };

        if let Err(e) = entry.with_gpu(|gpu| self.app.on_init(gpu)) {
            return self.fail(event_loop, e.context("application init failed"));
        }

        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Continuous redraw; the demo animates every frame.
        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, entry) = (&mut self.app, &mut self.entry);
        let Some(entry) = entry.as_mut() else { return };

        if let Some(ev) = translate_window_event(&event) {
            let control = entry.with_input_state_mut(|input| {
                input.apply_event(&ev);
                app.on_input(&ev, input)
            });
            if control == AppControl::Exit {
                self.exit_requested = true;
                event_loop.exit();
                return;
            }
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.exit_requested = true;
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                entry.with_clock_mut(|clock| clock.reset());
                app.on_resize(new_size.width, new_size.height);
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                app.on_resize(new_size.width, new_size.height);
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}
