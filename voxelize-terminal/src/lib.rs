/// Terminal front end: interactive voxel viewer and the `voxelize` command line
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::warn;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use voxelize_core::{
    Axis, ColorScheme, Resolution, RotationState, Session, SliceParams, ViewParams,
};

pub mod cli;
pub mod renderer;

pub use renderer::AsciiRenderer;

/// What the viewer currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Points,
    Slice,
}

/// Main application struct for the interactive terminal viewer
pub struct TerminalApp {
    session: Session,
    view: ViewParams,
    slice: SliceParams,
    mode: ViewMode,
    rotation: RotationState,
    renderer: AsciiRenderer,
    auto_rotate: bool,
    running: bool,
    status: Option<String>,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(session: Session, view: ViewParams, slice: SliceParams) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            session,
            view,
            slice,
            mode: ViewMode::Points,
            rotation: RotationState::default(),
            renderer: AsciiRenderer::new(width as usize, height.saturating_sub(1) as usize),
            auto_rotate: true,
            running: true,
            status: None,
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

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            if self.auto_rotate && self.mode == ViewMode::Points {
                self.rotation.rotate(0.0, 0.0, 0.02);
            }

            self.render()?;

            // Frame timing
            self.frame_count += 1;
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

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => {
                self.renderer
                    .resize(width as usize, height.saturating_sub(1) as usize);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('w') | KeyCode::Up => self.rotation.rotate(0.1, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => self.rotation.rotate(-0.1, 0.0, 0.0),
            KeyCode::Char('a') | KeyCode::Left => self.rotation.rotate(0.0, 0.0, -0.1),
            KeyCode::Char('d') | KeyCode::Right => self.rotation.rotate(0.0, 0.0, 0.1),
            KeyCode::Char('e') => self.rotation.rotate(0.0, 0.1, 0.0),
            KeyCode::Char('r') => self.rotation.rotate(0.0, -0.1, 0.0),
            KeyCode::Char(' ') => self.auto_rotate = !self.auto_rotate,
            KeyCode::Char('c') => self.view.color_mode = self.view.color_mode.next(),
            KeyCode::Char('n') => {
                self.view.color_scheme = next_scheme(self.view.color_scheme);
                self.slice.color_scheme = self.view.color_scheme;
            }
            KeyCode::Char('v') => {
                self.mode = match self.mode {
                    ViewMode::Points => ViewMode::Slice,
                    ViewMode::Slice => ViewMode::Points,
                };
            }
            KeyCode::Char('x') => self.set_axis(Axis::X),
            KeyCode::Char('y') => self.set_axis(Axis::Y),
            KeyCode::Char('z') => self.set_axis(Axis::Z),
            KeyCode::Char(',') => self.step_slice(-1),
            KeyCode::Char('.') => self.step_slice(1),
            KeyCode::Char('[') => self.step_resolution(-10),
            KeyCode::Char(']') => self.step_resolution(10),
            _ => {}
        }
    }

    fn set_axis(&mut self, axis: Axis) {
        self.slice.axis = axis;
        self.slice.index = None;
    }

    fn step_slice(&mut self, delta: i64) {
        let Some(max) = self.session.max_slice_index(self.slice.axis) else {
            return;
        };
        let current = self
            .slice
            .index
            .unwrap_or_else(|| voxelize_core::slice::default_index(self.session.grid(), self.slice.axis));
        let next = (current as i64 + delta).clamp(0, max as i64) as usize;
        self.slice.index = Some(next);
    }

    fn step_resolution(&mut self, delta: i64) {
        let current = self.session.resolution().get() as i64;
        let target = (current + delta).clamp(Resolution::MIN as i64, Resolution::MAX as i64) as u32;
        let result = Resolution::new(target)
            .and_then(|resolution| self.session.revoxelize(resolution, self.session.fill()));
        match result {
            Ok(()) => {
                // Slice indices are only meaningful for the grid they were picked on
                self.slice.index = None;
                self.status = None;
            }
            Err(e) => {
                warn!("{}", e);
                self.status = Some(e.to_string());
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();

        let mut message = self.status.clone();
        match self.mode {
            ViewMode::Points => {
                if self.session.grid().is_empty() {
                    message = Some("No voxels found in the mesh".to_string());
                } else {
                    self.renderer
                        .render_points(self.session.grid(), &self.view, &self.rotation);
                }
            }
            ViewMode::Slice => match self.session.slice(&self.slice) {
                Ok(slice) => self.renderer.render_slice(&slice, self.slice.color_scheme),
                Err(e) => message = Some(e.to_string()),
            },
        }

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 1))?;
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let header = match self.mode {
            ViewMode::Points => format!(
                "{} | res {} | {} on {} | FPS {:.1} | WASD rotate, space spin, c color, n scheme, [ ] res, v slice, q quit",
                self.session.stem(),
                self.session.resolution().get(),
                self.view.color_mode,
                self.view.color_scheme,
                self.fps
            ),
            ViewMode::Slice => {
                let index = self.slice.index.unwrap_or_else(|| {
                    voxelize_core::slice::default_index(self.session.grid(), self.slice.axis)
                });
                format!(
                    "{} | res {} | {}-slice {} | x/y/z axis, , . index, [ ] res, v 3D, q quit",
                    self.session.stem(),
                    self.session.resolution().get(),
                    self.slice.axis,
                    index
                )
            }
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(header),
            ResetColor
        )?;
        if let Some(message) = message {
            queue!(
                stdout,
                cursor::MoveTo(0, 1),
                SetForegroundColor(Color::Red),
                Print(message),
                ResetColor
            )?;
        }

        stdout.flush()?;
        Ok(())
    }
}

fn next_scheme(current: ColorScheme) -> ColorScheme {
    let all = ColorScheme::ALL;
    let pos = all.iter().position(|&s| s == current).unwrap_or(0);
    all[(pos + 1) % all.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_scheme_wraps() {
        assert_eq!(next_scheme(ColorScheme::Viridis), ColorScheme::Plasma);
        assert_eq!(next_scheme(ColorScheme::Thermal), ColorScheme::Viridis);
    }
}
