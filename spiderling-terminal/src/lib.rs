//! Terminal viewer: event loop, input handling and frame pacing
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::debug;
use nalgebra::Matrix4;
use spiderling_core::{Camera, DisplayMode, Mesh, Transform};
use std::io::{self, stdout, Write};
use std::time::Duration;

pub mod config;
pub mod renderer;
pub mod timer;

pub use config::ViewerConfig;
pub use renderer::AsciiRenderer;
pub use timer::FrameTimer;

/// Radians per Left/Right key press
const ORBIT_STEP: f32 = 0.2;
const MIN_RADIUS: f32 = 1.2;
const MAX_RADIUS: f32 = 20.0;

/// Main application struct for terminal 3D rendering
pub struct Viewer {
    mesh: Mesh,
    model_matrix: Matrix4<f32>,
    title: String,
    status: Option<String>,
    camera: Camera,
    renderer: AsciiRenderer,
    mode: DisplayMode,
    theta: f32,
    radius: f32,
    spin_speed: f32,
    spinning: bool,
    running: bool,
    timer: FrameTimer,
}

impl Viewer {
    pub fn new(mesh: Mesh, title: impl Into<String>, config: &ViewerConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(
            mesh,
            title,
            config,
            width as usize,
            height as usize,
        ))
    }

    /// Build a viewer for a screen of `width` x `height` cells
    pub fn with_size(
        mesh: Mesh,
        title: impl Into<String>,
        config: &ViewerConfig,
        width: usize,
        height: usize,
    ) -> Self {
        // Centre and scale into a unit sphere so any model fits the orbit
        let model_matrix = mesh
            .bounds()
            .map(|bounds| Transform::fit_matrix(&bounds, 1.0))
            .unwrap_or_else(Matrix4::identity);

        let mut viewer = Self {
            mesh,
            model_matrix,
            title: title.into(),
            status: None,
            camera: Camera::default(),
            renderer: AsciiRenderer::new(width, height),
            mode: config.display_mode,
            theta: 0.0,
            radius: config.orbit_radius.clamp(MIN_RADIUS, MAX_RADIUS),
            spin_speed: config.spin_speed,
            spinning: true,
            running: true,
            timer: FrameTimer::new(config.fps),
        };
        viewer.resize(width, height);
        viewer
    }

    /// Extra line shown in the overlay, e.g. skipped lines or a load error
    pub fn with_status(mut self, status: Option<String>) -> Self {
        self.status = status;
        self
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        self.timer.begin_frame();

        while self.running {
            let delta = self.timer.begin_frame();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.update(delta);
            self.render()?;

            let delay = self.timer.end_frame();
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => self.resize(width as usize, height as usize),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Left => self.theta -= ORBIT_STEP,
            KeyCode::Right => self.theta += ORBIT_STEP,
            KeyCode::Up => self.radius = (self.radius * 0.9).max(MIN_RADIUS),
            KeyCode::Down => self.radius = (self.radius * 1.1).min(MAX_RADIUS),
            KeyCode::Char(' ') => self.spinning = !self.spinning,
            KeyCode::Char('m') | KeyCode::Tab => self.set_mode(self.mode.next()),
            KeyCode::Char('1') => self.set_mode(DisplayMode::Solid),
            KeyCode::Char('2') => self.set_mode(DisplayMode::Wireframe),
            KeyCode::Char('3') => self.set_mode(DisplayMode::Points),
            other => debug!("Unhandled key: {:?}", other),
        }
    }

    fn set_mode(&mut self, mode: DisplayMode) {
        debug!("Display mode: {}", mode);
        self.mode = mode;
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.renderer.resize(width, height);
        // Terminal cells are roughly twice as tall as they are wide
        self.camera.resize(width as u32, height as u32 * 2);
    }

    fn update(&mut self, delta: Duration) {
        if self.spinning {
            self.theta += self.spin_speed * delta.as_secs_f32();
        }
        self.camera.orbit(self.theta, self.radius);
    }

    /// Rasterize the current frame into the renderer's buffers
    pub fn draw_frame(&mut self) {
        self.renderer.clear();
        self.renderer
            .render_mesh(&self.mesh, &self.model_matrix, &self.camera, self.mode);
    }

    fn render(&mut self) -> io::Result<()> {
        self.draw_frame();

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "{} | {} triangles | {} | FPS: {:.1} | Arrows=Orbit/Zoom M/1-3=Mode Space=Spin Q=Quit",
                self.title,
                self.mesh.len(),
                self.mode,
                self.timer.fps()
            )),
            ResetColor
        )?;

        if let Some(status) = &self.status {
            queue!(
                stdout,
                cursor::MoveTo(0, 1),
                terminal::Clear(ClearType::CurrentLine),
                SetForegroundColor(Color::Red),
                Print(status),
                ResetColor
            )?;
        }

        stdout.flush()?;
        Ok(())
    }
}
