//! SVG path primitives shared by series renderers

use dq_core::PixelPoint;
use std::fmt::Write;

// ============================================================================
// STRATEGY PATTERN: Path Generator Trait
// ============================================================================

/// Strategy trait for path generation
pub trait PathGenerator: Send + Sync {
    fn generate(&self, points: &[PixelPoint]) -> String;
}

/// Straight segments between consecutive points
#[derive(Debug, Clone, Default)]
pub struct LinePath;

impl PathGenerator for LinePath {
    fn generate(&self, points: &[PixelPoint]) -> String {
        let Some((first, rest)) = points.split_first() else {
            return String::new();
        };

        rest.iter()
            .fold(PathBuilder::new().move_to(first.x, first.y), |b, p| b.line_to(p.x, p.y))
            .build()
    }
}

/// Step path generator; the value holds until the next sample
#[derive(Debug, Clone, Default)]
pub struct StepPath {
    pub step_position: StepPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepPosition {
    #[default]
    After,
    Before,
    Middle,
}

impl PathGenerator for StepPath {
    fn generate(&self, points: &[PixelPoint]) -> String {
        let Some((first, _)) = points.split_first() else {
            return String::new();
        };

        let mut builder = PathBuilder::new().move_to(first.x, first.y);
        for pair in points.windows(2) {
            let (p0, p1) = (pair[0], pair[1]);
            builder = match self.step_position {
                StepPosition::After => builder.horizontal_to(p1.x).vertical_to(p1.y),
                StepPosition::Before => builder.vertical_to(p1.y).horizontal_to(p1.x),
                StepPosition::Middle => {
                    let mid_x = (p0.x + p1.x) / 2.0;
                    builder.horizontal_to(mid_x).vertical_to(p1.y).horizontal_to(p1.x)
                }
            };
        }
        builder.build()
    }
}

// ============================================================================
// PATH BUILDER (fluent API)
// ============================================================================

/// SVG path builder with fluent API
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    commands: String,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self {
            commands: String::with_capacity(256),
        }
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "M{:.2},{:.2}", x, y);
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "L{:.2},{:.2}", x, y);
        self
    }

    pub fn horizontal_to(mut self, x: f64) -> Self {
        let _ = write!(self.commands, "H{:.2}", x);
        self
    }

    pub fn vertical_to(mut self, y: f64) -> Self {
        let _ = write!(self.commands, "V{:.2}", y);
        self
    }

    pub fn close(mut self) -> Self {
        self.commands.push('Z');
        self
    }

    pub fn build(self) -> String {
        self.commands
    }
}

// ============================================================================
// AREA PATH GENERATOR
// ============================================================================

/// Closed area under `outline` down to `baseline_y`
pub fn area_path(outline: &[PixelPoint], baseline_y: f64, generator: &dyn PathGenerator) -> String {
    let (Some(first), Some(last)) = (outline.first(), outline.last()) else {
        return String::new();
    };

    let top = generator.generate(outline);
    // Reuse the outline but start from the baseline.
    let body = top.strip_prefix('M').map(|rest| format!("L{rest}")).unwrap_or(top);

    let mut path = PathBuilder::new().move_to(first.x, baseline_y).build();
    path.push_str(&body);
    path.push_str(&PathBuilder::new().line_to(last.x, baseline_y).close().build());
    path
}

/// Generate line path (non-closed)
pub fn line_path(points: &[PixelPoint]) -> String {
    LinePath.generate(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<PixelPoint> {
        raw.iter().map(|&(x, y)| PixelPoint::new(x, y)).collect()
    }

    #[test]
    fn test_path_builder() {
        let path = PathBuilder::new()
            .move_to(0.0, 0.0)
            .line_to(100.0, 100.0)
            .close()
            .build();

        assert!(path.contains("M0.00,0.00"));
        assert!(path.contains("L100.00,100.00"));
        assert!(path.ends_with('Z'));
    }

    #[test]
    fn test_line_path_generator() {
        let path = line_path(&pts(&[(0.0, 0.0), (50.0, 50.0), (100.0, 0.0)]));
        assert_eq!(path, "M0.00,0.00L50.00,50.00L100.00,0.00");
        assert!(line_path(&[]).is_empty());
    }

    #[test]
    fn test_step_path() {
        let path = StepPath::default().generate(&pts(&[(0.0, 10.0), (5.0, 20.0)]));
        assert_eq!(path, "M0.00,10.00H5.00V20.00");

        let middle = StepPath { step_position: StepPosition::Middle };
        let path = middle.generate(&pts(&[(0.0, 10.0), (10.0, 20.0)]));
        assert_eq!(path, "M0.00,10.00H5.00V20.00H10.00");
    }

    #[test]
    fn test_area_path() {
        let path = area_path(&pts(&[(0.0, 10.0), (10.0, 5.0)]), 50.0, &LinePath);
        assert_eq!(path, "M0.00,50.00L0.00,10.00L10.00,5.00L10.00,50.00Z");
    }
}
