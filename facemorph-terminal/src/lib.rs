/// Terminal face viewer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use facemorph_core::{
    render_pass, Face, IlluminationModel, LambertianModel, LightSource, OrthographicProjector,
    PerspectiveProjector, Point, ProjectionMode, Projector, Rgb, Rotation, Settings, Shading,
    Transform,
};
use log::{debug, warn};
use nalgebra::Matrix4;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::Canvas;

/// Which light currently shines on the face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightMode {
    Directional,
    Point,
}

/// What a key press asks the viewer to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    Rotate(Rotation),
    ZoomIn,
    ZoomOut,
    Project(ProjectionMode),
    Light(LightMode),
    ToggleShading,
}

impl Action {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        let action = match code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Up => Action::Rotate(Rotation::Up),
            KeyCode::Down => Action::Rotate(Rotation::Down),
            KeyCode::Left => Action::Rotate(Rotation::Left),
            KeyCode::Right => Action::Rotate(Rotation::Right),
            KeyCode::PageDown => Action::Rotate(Rotation::Clockwise),
            KeyCode::PageUp => Action::Rotate(Rotation::CounterClockwise),
            KeyCode::Char('w') => Action::ZoomIn,
            KeyCode::Char('s') => Action::ZoomOut,
            KeyCode::Char('p') => Action::Project(ProjectionMode::Perspective),
            KeyCode::Char('o') => Action::Project(ProjectionMode::Orthographic),
            KeyCode::Char('d') => Action::Light(LightMode::Directional),
            KeyCode::Char('f') => Action::Light(LightMode::Point),
            KeyCode::Char('m') => Action::ToggleShading,
            _ => return None,
        };
        Some(action)
    }
}

/// The face on screen together with the strategies used to draw it.
pub struct Viewer {
    face: Face,
    settings: Settings,
    projector: Box<dyn Projector>,
    /// Focal distance of the perspective projector, kept across zooms.
    focal: f64,
    illumination: LambertianModel,
    light: LightSource,
    light_mode: LightMode,
    lit: bool,
    canvas: Canvas,
}

impl Viewer {
    /// Fit `face` onto a canvas of the given pixel size and light it from the viewer.
    pub fn new(mut face: Face, settings: Settings, canvas: Canvas) -> Self {
        let cx = canvas.width() as f64 / 2.0;
        let cy = canvas.height() as f64 / 2.0;

        // Screen y grows downwards, hence the negative scale.
        let radius = face
            .points()
            .iter()
            .map(|p| p.x().abs().max(p.y().abs()))
            .fold(0.0, f64::max);
        if radius > 0.0 {
            face.scale(-settings.screen_fit_factor * cx.min(cy) / radius);
        }
        face.set_center(Point::at(cx, cy, 0.0));

        let view = Point::at(cx, cy, i32::MIN as f64);
        let illumination = LambertianModel::new(settings.diffuse, view);
        let light = Self::directional_light(&settings, cx, cy);
        let focal = settings.perspective_focal;
        let mut viewer = Self {
            face,
            settings,
            projector: Box::new(OrthographicProjector),
            focal,
            illumination,
            light,
            light_mode: LightMode::Directional,
            lit: true,
            canvas,
        };
        viewer.illumination.add_source(light);
        viewer
    }

    fn directional_light(settings: &Settings, cx: f64, cy: f64) -> LightSource {
        LightSource::directional(cx, cy, i32::MIN as f64, Rgb::from(settings.lighting))
    }

    fn point_light(settings: &Settings) -> LightSource {
        let [x, y, z] = settings.point_light;
        LightSource::point(x, y, z, Rgb::from(settings.lighting))
    }

    pub fn face(&self) -> &Face {
        &self.face
    }

    pub fn projection_mode(&self) -> ProjectionMode {
        self.projector.mode()
    }

    pub fn light_mode(&self) -> LightMode {
        self.light_mode
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Apply one action. Returns `false` once the viewer should close.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return false,
            Action::Rotate(rotation) => {
                let m = rotation.matrix(self.settings.rotation_step);
                self.transform(&m);
            }
            Action::ZoomIn => self.zoom(1.0),
            Action::ZoomOut => self.zoom(-1.0),
            Action::Project(mode) => self.set_projection(mode),
            Action::Light(mode) => self.set_light(mode),
            Action::ToggleShading => self.lit = !self.lit,
        }
        true
    }

    fn transform(&mut self, m: &Matrix4<f64>) {
        if let Err(e) = self.face.transform_about_center(m) {
            warn!("transform skipped: {}", e);
        }
    }

    fn zoom(&mut self, direction: f64) {
        match self.projector.mode() {
            ProjectionMode::Perspective => {
                let focal = self.focal + direction * self.settings.focal_step;
                match PerspectiveProjector::new(focal) {
                    Ok(projector) => {
                        self.focal = focal;
                        self.projector = Box::new(projector);
                    }
                    Err(e) => debug!("zoom skipped: {}", e),
                }
            }
            ProjectionMode::Orthographic => {
                let factor = 1.0 + direction * self.settings.zoom_step;
                self.transform(&Transform::scale_matrix(factor));
            }
        }
    }

    fn set_projection(&mut self, mode: ProjectionMode) {
        if self.projector.mode() == mode {
            return;
        }
        self.projector = match mode {
            ProjectionMode::Perspective => {
                match PerspectiveProjector::new(self.settings.perspective_focal) {
                    Ok(projector) => {
                        self.focal = self.settings.perspective_focal;
                        Box::new(projector)
                    }
                    Err(e) => {
                        warn!("projection unchanged: {}", e);
                        return;
                    }
                }
            }
            ProjectionMode::Orthographic => Box::new(OrthographicProjector),
        };
        debug!("projection switched to {:?}", mode);
    }

    fn set_light(&mut self, mode: LightMode) {
        if self.light_mode == mode {
            return;
        }
        self.illumination.remove_source(&self.light);
        self.light = match mode {
            LightMode::Directional => Self::directional_light(
                &self.settings,
                self.canvas.width() as f64 / 2.0,
                self.canvas.height() as f64 / 2.0,
            ),
            LightMode::Point => Self::point_light(&self.settings),
        };
        self.illumination.add_source(self.light);
        self.light_mode = mode;
        debug!("light switched to {:?}", mode);
    }

    /// Paint the face onto the canvas.
    pub fn render(&mut self) {
        let shading = if self.lit {
            Shading::Lit(&self.illumination)
        } else {
            Shading::Preview
        };
        let commands = render_pass(&self.face, self.projector.as_ref(), shading);
        self.canvas.clear();
        self.canvas.paint(&commands);
    }
}

/// Main application struct for terminal face viewing
pub struct TerminalApp {
    viewer: Viewer,
    running: bool,
    dirty: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(face: Face, settings: Settings) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        // keep the top row for the status line
        let canvas = Canvas::for_terminal(width as usize, height.saturating_sub(1) as usize);

        Ok(Self {
            viewer: Viewer::new(face, settings, canvas),
            running: true,
            dirty: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
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
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            if event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            // The face only changes on input, so idle frames skip the redraw
            if self.dirty {
                self.render()?;
                self.dirty = false;
                self.frame_count += 1;
            }

            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
            if kind == KeyEventKind::Release {
                return Ok(());
            }
            if let Some(action) = Action::from_key(code) {
                self.running = self.viewer.apply(action);
                self.dirty = true;
            }
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        self.viewer.render();

        let mut stdout = stdout();
        // row 0 holds the status line
        self.viewer.canvas().draw(&mut stdout, 1)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "facemorph | {:?} | {:?} light | {} | FPS: {:.1} | Arrows/PgUp/PgDn=Rotate W/S=Zoom O/P=Projection D/F=Light M=Shading Q=Quit",
                self.viewer.projection_mode(),
                self.viewer.light_mode(),
                if self.viewer.is_lit() { "lit" } else { "preview" },
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
