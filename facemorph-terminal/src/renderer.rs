/// Painter's-algorithm canvas for 24-bit color terminals
use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use facemorph_core::{DrawCommand, Outline, Rgb};
use std::io::Write;

/// Upper half block: the foreground paints the top pixel, the background the bottom one.
const HALF_BLOCK: char = '▀';

/// A pixel grid filled polygon by polygon, later polygons over earlier ones.
///
/// Each terminal cell shows two vertically stacked pixels, so pixels come
/// out roughly square.
pub struct Canvas {
    width: usize,
    height: usize,
    background: [u8; 3],
    pixels: Vec<[u8; 3]>,
}

impl Canvas {
    /// A canvas covering `columns` x `rows` terminal cells.
    pub fn for_terminal(columns: usize, rows: usize) -> Self {
        Self::new(columns, rows * 2)
    }

    pub fn new(width: usize, height: usize) -> Self {
        let background = [255, 255, 255];
        Self {
            width,
            height,
            background,
            pixels: vec![background; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        let background = self.background;
        self.pixels.iter_mut().for_each(|p| *p = background);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Fill the commands in order, without any depth test.
    pub fn paint(&mut self, commands: &[DrawCommand]) {
        for command in commands {
            self.fill(&command.outline, command.color);
        }
    }

    /// Fill a triangular outline. Outlines that lost vertices to projection
    /// cover no area and are skipped.
    pub fn fill(&mut self, outline: &Outline, color: Rgb) {
        if outline.is_degenerate() {
            return;
        }
        let v: Vec<(f64, f64)> = outline.vertices.iter().map(|p| (p.x, p.y)).collect();
        let (v0, v1, v2) = (v[0], v[1], v[2]);
        if !(v0.0.is_finite() && v1.0.is_finite() && v2.0.is_finite())
            || !(v0.1.is_finite() && v1.1.is_finite() && v2.1.is_finite())
        {
            return;
        }
        let rgb = color.to_bytes();

        // Bounding box, clipped to the canvas
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i64).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i64).min(self.width as i64 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i64).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i64).min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f64 + 0.5, y as f64 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.pixels[y as usize * self.width + x as usize] = rgb;
                    }
                }
            }
        }
    }

    /// Draw the canvas with its first cell row at terminal row `top`. Rows are
    /// positioned with cursor moves, so the last one never scrolls the screen.
    pub fn draw<W: Write>(&self, writer: &mut W, top: u16) -> std::io::Result<()> {
        for row in 0..self.height / 2 {
            writer.queue(MoveTo(0, top.saturating_add(row as u16)))?;
            for x in 0..self.width {
                let top = self.pixels[2 * row * self.width + x];
                let bottom = self.pixels[(2 * row + 1) * self.width + x];
                writer.queue(SetForegroundColor(rgb(top)))?;
                writer.queue(SetBackgroundColor(rgb(bottom)))?;
                writer.queue(Print(HALF_BLOCK))?;
            }
            writer.queue(ResetColor)?;
        }
        Ok(())
    }
}

fn rgb(c: [u8; 3]) -> Color {
    Color::Rgb {
        r: c[0],
        g: c[1],
        b: c[2],
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f64, f64),
    v1: (f64, f64),
    v2: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn outline(points: &[(f64, f64)]) -> Outline {
        Outline {
            vertices: points.iter().map(|&(x, y)| Point2::new(x, y)).collect(),
        }
    }

    #[test]
    fn test_fill_covers_interior_only() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill(&outline(&[(0.0, 0.0), (8.0, 0.0), (0.0, 8.0)]), Rgb::new(255, 0, 0));
        assert_eq!(canvas.pixel(1, 1), Some([255, 0, 0]));
        assert_eq!(canvas.pixel(8, 8), Some([255, 255, 255]));
    }

    #[test]
    fn test_winding_does_not_matter() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill(&outline(&[(0.0, 0.0), (0.0, 8.0), (8.0, 0.0)]), Rgb::new(0, 255, 0));
        assert_eq!(canvas.pixel(2, 2), Some([0, 255, 0]));
    }

    #[test]
    fn test_later_commands_paint_over_earlier() {
        let mut canvas = Canvas::new(10, 10);
        let big = outline(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]);
        let small = outline(&[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)]);
        canvas.paint(&[
            DrawCommand { outline: big, color: Rgb::new(0, 0, 255) },
            DrawCommand { outline: small, color: Rgb::new(255, 0, 0) },
        ]);
        assert_eq!(canvas.pixel(1, 1), Some([255, 0, 0]));
        assert_eq!(canvas.pixel(6, 2), Some([0, 0, 255]));
    }

    #[test]
    fn test_degenerate_and_offscreen_outlines() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill(&outline(&[(0.0, 0.0), (3.0, 3.0)]), Rgb::BLACK);
        canvas.fill(&outline(&[(-50.0, -50.0), (-40.0, -50.0), (-50.0, -40.0)]), Rgb::BLACK);
        canvas.fill(&outline(&[(f64::INFINITY, 0.0), (3.0, 0.0), (0.0, 3.0)]), Rgb::BLACK);
        assert!((0..4).all(|y| (0..4).all(|x| canvas.pixel(x, y) == Some([255, 255, 255]))));
    }

    #[test]
    fn test_low_colors_saturate() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill(
            &outline(&[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)]),
            Rgb::from_raw(-30, 128, 400),
        );
        assert_eq!(canvas.pixel(0, 0), Some([0, 128, 255]));
    }

    #[test]
    fn test_terminal_canvas_doubles_rows() {
        let canvas = Canvas::for_terminal(80, 24);
        assert_eq!((canvas.width(), canvas.height()), (80, 48));
    }

    #[test]
    fn test_draw_positions_rows_without_newlines() {
        let canvas = Canvas::new(3, 4);
        let mut out = Vec::new();
        canvas.draw(&mut out, 1).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains('\n'));
        // terminal rows 1 and 2, one-based in the escape sequence
        assert!(text.contains("\x1b[2;1H"));
        assert!(text.contains("\x1b[3;1H"));
        assert!(!text.contains("\x1b[4;1H"));
        assert_eq!(text.matches(HALF_BLOCK).count(), 6);
    }
}
