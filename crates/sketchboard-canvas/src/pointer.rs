#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// On-screen size the surface is rendered at, which may differ from its
/// internal bitmap resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySize {
    pub width: f32,
    pub height: f32,
}

impl DisplaySize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Maps a display-space position (relative to the surface's top-left
    /// corner) into bitmap coordinates.
    pub fn to_canvas(&self, position: Point, canvas_width: u32, canvas_height: u32) -> Point {
        let scale = |canvas: u32, display: f32| {
            if display > 0.0 {
                canvas as f32 / display
            } else {
                1.0
            }
        };
        Point {
            x: position.x * scale(canvas_width, self.width),
            y: position.y * scale(canvas_height, self.height),
        }
    }
}
