//! Polyline paths that agents track within a radius.

use alloc::string::String;
use alloc::vec::Vec;

use crate::vector::Vector2;

pub const DEFAULT_PATH_RADIUS: f32 = 16.0;

/// Slack for the segment bounding-box test, so projections onto axis-aligned
/// segments are not rejected over rounding noise.
const BOX_EPSILON: f32 = 0.0001;

#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub position: Vector2,
    pub label: Option<String>,
}

/// One straight piece of a path, from waypoint `index` to the next one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub start: Vector2,
    pub end: Vector2,
}

impl Segment {
    pub fn direction(&self) -> Vector2 {
        (self.end - self.start).normalize()
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// Orthogonal projection of `point` onto the segment's infinite line.
    pub fn normal_point(&self, point: Vector2) -> Vector2 {
        let along = self.direction();
        self.start + along * (point - self.start).dot(&along)
    }

    /// Whether `point` lies inside the segment's bounding box on both axes.
    pub fn bounds_contain(&self, point: Vector2) -> bool {
        let (min_x, max_x) = (self.start.x.min(self.end.x), self.start.x.max(self.end.x));
        let (min_y, max_y) = (self.start.y.min(self.end.y), self.start.y.max(self.end.y));
        point.x >= min_x - BOX_EPSILON
            && point.x <= max_x + BOX_EPSILON
            && point.y >= min_y - BOX_EPSILON
            && point.y <= max_y + BOX_EPSILON
    }
}

/// Where an agent's predicted position meets the path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathProjection {
    /// The predicted position that was projected.
    pub future: Vector2,
    /// Nearest point on the path, clamped to its segment.
    pub normal: Vector2,
    /// `normal` pushed forward along the path; the point to seek.
    pub target: Vector2,
    /// Distance from `future` to `normal`.
    pub distance: f32,
    /// Index of the segment `normal` was found on.
    pub segment: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    waypoints: Vec<Waypoint>,
    radius: f32,
    closed: bool,
}

impl Default for Path {
    fn default() -> Self {
        Self::new(DEFAULT_PATH_RADIUS)
    }
}

impl Path {
    pub fn new(radius: f32) -> Self {
        Self {
            waypoints: Vec::new(),
            radius,
            closed: false,
        }
    }

    /// Treat the last waypoint as connected back to the first.
    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    pub fn add_point(&mut self, x: f32, y: f32) -> &mut Self {
        self.waypoints.push(Waypoint {
            position: Vector2::new(x, y),
            label: None,
        });
        self
    }

    pub fn add_labeled_point(&mut self, x: f32, y: f32, label: impl Into<String>) -> &mut Self {
        self.waypoints.push(Waypoint {
            position: Vector2::new(x, y),
            label: Some(label.into()),
        });
        self
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    fn segment_count(&self) -> usize {
        match self.waypoints.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }

    fn segment(&self, index: usize) -> Segment {
        let n = self.waypoints.len();
        Segment {
            index,
            start: self.waypoints[index].position,
            end: self.waypoints[(index + 1) % n].position,
        }
    }

    /// Non-degenerate segments in order, including the closing one for a
    /// closed path.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        (0..self.segment_count())
            .map(|i| self.segment(i))
            .filter(|s| !s.is_degenerate())
    }

    /// The first non-degenerate segment that starts where `index` ends.
    fn segment_after(&self, index: usize) -> Option<Segment> {
        let count = self.segment_count();
        (1..count)
            .map(|step| index + step)
            .take_while(|&next| self.closed || next < count)
            .map(|next| self.segment(next % count))
            .find(|s| !s.is_degenerate())
    }

    /// Projects `future` onto the nearest segment.
    ///
    /// A projection that falls outside its segment's bounding box is replaced
    /// by the segment's end point. The target is then offset by
    /// `target_offset` along the segment that continues from the chosen point:
    /// the segment itself when the projection was on it, otherwise the
    /// following segment (or the segment itself at the end of an open path).
    ///
    /// Returns `None` when the path has no usable segment.
    pub fn project(&self, future: Vector2, target_offset: f32) -> Option<PathProjection> {
        let mut best: Option<PathProjection> = None;

        for segment in self.segments() {
            let projected = segment.normal_point(future);
            let (normal, direction) = if segment.bounds_contain(projected) {
                (projected, segment.direction())
            } else {
                let ahead = self.segment_after(segment.index).unwrap_or(segment);
                (segment.end, ahead.direction())
            };

            let distance = future.distance(&normal);
            if best.map_or(true, |b| distance < b.distance) {
                best = Some(PathProjection {
                    future,
                    normal,
                    target: normal + direction * target_offset,
                    distance,
                    segment: segment.index,
                });
            }
        }

        best
    }
}
