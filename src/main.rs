use glium::glutin;
use glium::texture::SrgbTexture2d;
use glium::{implement_vertex, uniform, DrawParameters, Program, Surface as _};
use winit::event::KeyboardInput;
use winit::event::VirtualKeyCode;
use winit::{
    dpi::PhysicalSize,
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use anyhow::{anyhow, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::path::PathBuf;
use std::time::{Duration, Instant};

mod collision;
mod config;
mod game;
mod input;
mod interpolation;
mod level;
mod math;
mod node;
mod render;
mod replay;
mod texture;
mod trail;

use config::GameConfig;
use game::{FrameInput, Game};
use input::{Input, InputCollection};
use render::Renderer;
use replay::{Recorder, Replay};
use texture::{Surface, Texture, WrapMode};

fn main() {
    init_tracing();

    if let Err(error) = start() {
        tracing::error!("{:#}", error);
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn start() -> Result<()> {
    let mut config = match std::env::args_os().nth(1) {
        Some(path) => {
            tracing::info!(path = ?path, "loading config");
            GameConfig::load(path)?
        }
        None => GameConfig::default(),
    };

    let replay = match config.replay_input.clone() {
        Some(path) => {
            let replay = Replay::load(&path)?;
            if replay.seed() != config.seed {
                tracing::warn!(
                    config = config.seed,
                    replay = replay.seed(),
                    "replay was recorded with another seed, using the replay's"
                );
                config.seed = replay.seed();
            }
            tracing::info!(path = %path.display(), frames = replay.remaining(), "replaying input");
            Some(replay)
        }
        None => None,
    };

    let recorder = config.record_input.as_ref().map(|path| {
        tracing::info!(path = %path.display(), "recording input");
        (path.clone(), Recorder::new(config.seed))
    });

    let ground: Box<dyn Surface> = match config.ground_texture.as_ref() {
        Some(path) => Box::new(Texture::load_png(path, WrapMode::Repeat)?),
        None => render::solid_ground(),
    };

    let gilrs = match gilrs::Gilrs::new() {
        Ok(gilrs) => Some(gilrs),
        Err(error) => {
            tracing::warn!("gamepad support unavailable: {}", error);
            None
        }
    };

    let session = Session {
        game: Game::new(&config),
        renderer: Renderer::new(
            config.window_width,
            config.window_height,
            &config.view,
            ground,
        ),
        input: InputCollection::new(),
        gilrs,
        replay,
        recorder,
        last_frame: Instant::now(),
        fps: FpsCounter::new(),
    };

    let event_loop = EventLoop::new();
    let window = Window::new(&event_loop, &config)?;

    run(event_loop, window, session)
}

/// Everything the frame loop owns besides the window.
struct Session {
    game: Game,
    renderer: Renderer,
    input: InputCollection,
    gilrs: Option<gilrs::Gilrs>,
    replay: Option<Replay>,
    recorder: Option<(PathBuf, Recorder)>,
    last_frame: Instant,
    fps: FpsCounter,
}

impl Session {
    /// Advances one frame. Returns `false` once a replay has run out.
    fn frame(&mut self) -> bool {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f64() * 1000.0;
        self.last_frame = now;

        if let Some(gilrs) = self.gilrs.as_mut() {
            self.input.poll_gamepads(gilrs);
        }

        if self.input.was_just_pressed(Input::Key(VirtualKeyCode::Z)) {
            let mode = self.renderer.cycle_mode();
            tracing::info!(?mode, "display mode");
        }
        if self.input.was_just_pressed(Input::Key(VirtualKeyCode::E)) {
            self.screenshot();
        }

        let (dt, frame_input) = match self.replay.as_mut() {
            Some(replay) => match replay.next() {
                Some(record) => (record.dt, record.input),
                None => {
                    tracing::info!("replay finished");
                    return false;
                }
            },
            None => (dt, self.input.frame_input()),
        };

        self.step(dt, frame_input);
        self.input.end_frame();

        true
    }

    fn step(&mut self, dt: f64, frame_input: FrameInput) {
        if let Some((_, recorder)) = self.recorder.as_mut() {
            recorder.push(dt, frame_input);
        }

        let report = self.game.update(dt, frame_input);
        if report.sampled {
            tracing::trace!(len = self.game.trail().len(), "trail sampled");
        }

        self.renderer.draw(&self.game);
        if self.fps.tick(dt) {
            tracing::debug!(fps = self.fps.fps, score = self.game.score(), "frame rate");
        }
    }

    fn title(&self) -> String {
        let agent = self.game.agent();
        format!(
            "Lava Snake | {:.1} fps | heading {:.2} | x {:.1} z {:.1} | score {}",
            self.fps.fps,
            agent.heading,
            agent.position.x(),
            agent.position.z(),
            self.game.score()
        )
    }

    fn screenshot(&self) {
        let path = screenshot_path(std::time::SystemTime::now());
        match self.renderer.canvas().dump(&path) {
            Ok(()) => tracing::info!(path = %path, "screenshot saved"),
            Err(error) => tracing::warn!("{:#}", error),
        }
    }

    fn finish(&mut self) {
        if let Some((path, recorder)) = self.recorder.take() {
            match recorder.save(&path) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), frames = recorder.len(), "input saved")
                }
                Err(error) => tracing::error!("{:#}", error),
            }
        }
    }
}

/// Millisecond resolution so quick repeated exports don't overwrite each other.
fn screenshot_path(now: std::time::SystemTime) -> String {
    let millis = now
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_else(|e| e.duration())
        .as_millis();
    format!("./export/snake_{}.png", millis)
}

struct FpsCounter {
    frames: u32,
    elapsed_ms: f64,
    fps: f64,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            frames: 0,
            elapsed_ms: 0.0,
            fps: 0.0,
        }
    }

    /// Returns true once per second when a fresh value is available.
    fn tick(&mut self, dt: f64) -> bool {
        self.frames += 1;
        self.elapsed_ms += dt;
        if self.elapsed_ms < 1000.0 {
            return false;
        }

        self.fps = self.frames as f64 * 1000.0 / self.elapsed_ms;
        self.frames = 0;
        self.elapsed_ms = 0.0;
        true
    }
}

struct Window {
    display: glium::Display,
    program: Program,
    vertex_buffer: glium::VertexBuffer<Vertex>,
}

impl Window {
    fn new(event_loop: &EventLoop<()>, config: &GameConfig) -> Result<Self> {
        let window_size = PhysicalSize::new(config.window_width, config.window_height);

        let window_builder = WindowBuilder::new()
            .with_inner_size(window_size)
            .with_title("Lava Snake");

        let context_builder = glutin::ContextBuilder::new()
            .with_vsync(true)
            .with_srgb(true)
            .with_gl_profile(glutin::GlProfile::Core)
            .with_gl(glutin::GlRequest::Specific(glutin::Api::OpenGl, (3, 3)));

        let display = glium::Display::new(window_builder, context_builder, event_loop)
            .map_err(|e| anyhow!("unable to create display: {}", e))?;
        let program = Program::from_source(&display, VERTEX_SRC, FRAGMENT_SRC, None)
            .map_err(|e| anyhow!("unable to create gl program: {}", e))?;
        let vertex_buffer = glium::VertexBuffer::new(&display, &QUAD)
            .map_err(|e| anyhow!("unable to create vertex buffer: {}", e))?;

        tracing::info!(
            width = config.window_width,
            height = config.window_height,
            "window created"
        );

        Ok(Self {
            display,
            program,
            vertex_buffer,
        })
    }

    fn present(&self, canvas: &render::Canvas) -> Result<()> {
        let data = glium::texture::RawImage2d {
            data: canvas.to_rgb_bytes().into(),
            width: canvas.width(),
            height: canvas.height(),
            format: glium::texture::ClientFormat::U8U8U8,
        };
        let texture = SrgbTexture2d::new(&self.display, data)
            .map_err(|e| anyhow!("unable to create texture: {}", e))?;

        let mut frame = self.display.draw();
        frame.clear_color(0.0, 0.0, 0.0, 1.0);

        let uniforms = uniform! {
            quad_texture: texture.sampled()
        };

        let drawn = frame.draw(
            &self.vertex_buffer,
            glium::index::NoIndices(glium::index::PrimitiveType::TriangleStrip),
            &self.program,
            &uniforms,
            &DrawParameters::default(),
        );
        // The frame has to be finished even when drawing failed.
        let finished = frame.finish();

        drawn.map_err(|e| anyhow!("unable to draw frame: {}", e))?;
        finished.map_err(|e| anyhow!("unable to finish frame: {}", e))?;
        Ok(())
    }

    fn request_redraw(&self) {
        self.display.gl_window().window().request_redraw();
    }

    fn set_title(&self, title: &str) {
        self.display.gl_window().window().set_title(title);
    }
}

const TITLE_INTERVAL: Duration = Duration::from_secs(1);

fn run(event_loop: EventLoop<()>, window: Window, mut session: Session) -> ! {
    let mut last_title = Instant::now();

    event_loop.run(move |event, _window, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                *control_flow = ControlFlow::Exit;
            }
            Event::WindowEvent {
                event:
                    WindowEvent::KeyboardInput {
                        input:
                            KeyboardInput {
                                virtual_keycode: Some(key),
                                state,
                                ..
                            },
                        ..
                    },
                ..
            } => {
                if key == VirtualKeyCode::Escape {
                    *control_flow = ControlFlow::Exit;
                } else {
                    session.input.key(key, state);
                }
            }
            Event::MainEventsCleared => {
                if !session.frame() {
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                if last_title.elapsed() >= TITLE_INTERVAL {
                    window.set_title(&session.title());
                    last_title = Instant::now();
                }

                window.request_redraw();
            }
            Event::RedrawRequested(_) => {
                if let Err(error) = window.present(session.renderer.canvas()) {
                    tracing::error!("{:#}", error);
                    *control_flow = ControlFlow::Exit;
                }
            }
            Event::LoopDestroyed => {
                session.finish();
                tracing::info!(score = session.game.score(), "exiting");
            }
            _ => (),
        }
    })
}

#[derive(Copy, Clone, Debug)]
struct Vertex {
    position: (f32, f32),
    uv: (f32, f32),
}

implement_vertex!(Vertex, position, uv);

const QUAD: [Vertex; 4] = [
    Vertex {
        position: (-1.0, -1.0),
        uv: (0.0, 0.0),
    },
    Vertex {
        position: (-1.0, 1.0),
        uv: (0.0, 1.0),
    },
    Vertex {
        position: (1.0, -1.0),
        uv: (1.0, 0.0),
    },
    Vertex {
        position: (1.0, 1.0),
        uv: (1.0, 1.0),
    },
];

const VERTEX_SRC: &'static str = "
#version 330

in vec2 position;
in vec2 uv;

out vec2 v_uv;

void main() {
   v_uv = uv;
   gl_Position = vec4(position.x, position.y, 1.0, 1.0);
}";

const FRAGMENT_SRC: &'static str = "
#version 330

in vec2 v_uv;

out vec4 f_color;

uniform sampler2D quad_texture;

void main () {
   f_color = texture(quad_texture, v_uv);
}";
