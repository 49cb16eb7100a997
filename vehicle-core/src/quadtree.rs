//! Region quadtree over 2D points.
//!
//! A node stores up to `capacity` points directly. The first point that
//! arrives while a node is full splits it into four quadrants (NW, NE, SW, SE)
//! and is handed to the first quadrant that accepts it. Subdivision is lazy,
//! so sparse regions stay shallow.
//!
//! Screen coordinates are assumed: y grows downward, so the NW quadrant sits at
//! `(cx - hw/2, cy - hh/2)`.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::error::GeometryError;
use crate::vector::Vector2;

pub const DEFAULT_CAPACITY: usize = 4;
/// Nodes at this depth never subdivide. Bounds the recursion when many
/// points coincide.
pub const DEFAULT_MAX_DEPTH: u32 = 16;

/// A point held by the index, with the radius a host uses to draw it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, radius: 2.0 }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn position(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }
}

impl From<Vector2> for Point {
    fn from(v: Vector2) -> Self {
        Point::new(v.x, v.y)
    }
}

/// Axis-aligned region given by its center and half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    x: f32,
    y: f32,
    half_width: f32,
    half_height: f32,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, half_width: f32, half_height: f32) -> Result<Self, GeometryError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(GeometryError::NonFiniteCoordinate { x, y });
        }
        if !(half_width.is_finite() && half_height.is_finite())
            || half_width <= 0.0
            || half_height <= 0.0
        {
            return Err(GeometryError::InvalidExtent {
                width: half_width,
                height: half_height,
            });
        }
        Ok(Self {
            x,
            y,
            half_width,
            half_height,
        })
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn half_width(&self) -> f32 {
        self.half_width
    }

    pub fn half_height(&self) -> f32 {
        self.half_height
    }

    pub fn left(&self) -> f32 {
        self.x - self.half_width
    }

    pub fn right(&self) -> f32 {
        self.x + self.half_width
    }

    pub fn top(&self) -> f32 {
        self.y - self.half_height
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.half_height
    }

    /// Half-open containment: `[left, right) x [top, bottom)`.
    pub fn contains(&self, point: &Point) -> bool {
        self.contains_xy(point.x, point.y)
    }

    pub fn contains_xy(&self, x: f32, y: f32) -> bool {
        x >= self.left() && x < self.right() && y >= self.top() && y < self.bottom()
    }

    pub fn intersects(&self, other: &Rectangle) -> bool {
        other.left() < self.right()
            && self.left() < other.right()
            && other.top() < self.bottom()
            && self.top() < other.bottom()
    }

    pub fn intersects_circle(&self, center: Vector2, radius: f32) -> bool {
        let nearest_x = center.x.clamp(self.left(), self.right());
        let nearest_y = center.y.clamp(self.top(), self.bottom());
        let dx = center.x - nearest_x;
        let dy = center.y - nearest_y;
        dx * dx + dy * dy <= radius * radius
    }

    /// Index into [`Rectangle::quadrants`] of the quadrant holding `(x, y)`:
    /// west of the center is `x < cx`, north is `y < cy`.
    pub fn quadrant_of(&self, x: f32, y: f32) -> usize {
        let east = usize::from(x >= self.x);
        let south = usize::from(y >= self.y);
        south * 2 + east
    }

    /// The four quadrants in NW, NE, SW, SE order.
    pub fn quadrants(&self) -> [Rectangle; 4] {
        let hw = self.half_width / 2.0;
        let hh = self.half_height / 2.0;
        let quadrant = |x: f32, y: f32| Rectangle {
            x,
            y,
            half_width: hw,
            half_height: hh,
        };
        [
            quadrant(self.x - hw, self.y - hh),
            quadrant(self.x + hw, self.y - hh),
            quadrant(self.x - hw, self.y + hh),
            quadrant(self.x + hw, self.y + hh),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct QuadTree {
    boundary: Rectangle,
    capacity: usize,
    points: Vec<Point>,
    children: Option<Box<[QuadTree; 4]>>,
    depth: u32,
    max_depth: u32,
}

impl QuadTree {
    pub fn new(boundary: Rectangle) -> Self {
        Self::node(boundary, DEFAULT_CAPACITY, 0, DEFAULT_MAX_DEPTH)
    }

    pub fn with_capacity(boundary: Rectangle, capacity: usize) -> Result<Self, GeometryError> {
        if capacity == 0 {
            return Err(GeometryError::ZeroCapacity);
        }
        Ok(Self::node(boundary, capacity, 0, DEFAULT_MAX_DEPTH))
    }

    /// Overrides the depth limit of this node and every node below it.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.set_max_depth(max_depth);
        self
    }

    fn set_max_depth(&mut self, max_depth: u32) {
        self.max_depth = max_depth;
        if let Some(children) = self.children.as_deref_mut() {
            for child in children.iter_mut() {
                child.set_max_depth(max_depth);
            }
        }
    }

    fn node(boundary: Rectangle, capacity: usize, depth: u32, max_depth: u32) -> Self {
        Self {
            boundary,
            capacity,
            points: Vec::new(),
            children: None,
            depth,
            max_depth,
        }
    }

    pub fn boundary(&self) -> &Rectangle {
        &self.boundary
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Depth of this node below the root it was created from.
    pub fn level(&self) -> u32 {
        self.depth
    }

    pub fn is_subdivided(&self) -> bool {
        self.children.is_some()
    }

    /// Points stored directly in this node, excluding descendants.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn children(&self) -> Option<&[QuadTree; 4]> {
        self.children.as_deref()
    }

    /// Inserts `point`, returning `false` when it lies outside the boundary
    /// (or lands in a full node at the depth limit). Rejection never mutates
    /// the tree.
    pub fn insert(&mut self, point: Point) -> bool {
        self.boundary.contains(&point) && self.place(point)
    }

    /// Stores a point already known to lie in this node. The child is picked
    /// by the node center, not by the children's rounded rectangles.
    fn place(&mut self, point: Point) -> bool {
        if self.points.len() < self.capacity {
            self.points.push(point);
            return true;
        }

        if self.children.is_none() {
            if self.depth >= self.max_depth {
                log::debug!(
                    "quadtree node at depth {} is full, rejecting ({}, {})",
                    self.depth,
                    point.x,
                    point.y
                );
                return false;
            }
            self.subdivide();
        }

        let quadrant = self.boundary.quadrant_of(point.x, point.y);
        match self.children.as_deref_mut() {
            Some(children) => children[quadrant].place(point),
            None => false,
        }
    }

    fn subdivide(&mut self) {
        if self.children.is_some() {
            return;
        }
        let [nw, ne, sw, se] = self.boundary.quadrants();
        let (capacity, depth, max_depth) = (self.capacity, self.depth + 1, self.max_depth);
        let child = |boundary| Self::node(boundary, capacity, depth, max_depth);
        self.children = Some(Box::new([child(nw), child(ne), child(sw), child(se)]));
        log::debug!(
            "subdivided node centered at ({}, {}) into depth {}",
            self.boundary.x,
            self.boundary.y,
            depth
        );
    }

    /// Depth-first walk over this node and its descendants, parents before
    /// children and quadrants in NW, NE, SW, SE order.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes { stack: alloc::vec![self] }
    }

    /// All stored points in traversal order: a node's own points, then each
    /// quadrant's subtree in turn.
    pub fn iter(&self) -> impl Iterator<Item = &Point> + '_ {
        self.nodes().flat_map(|node| node.points.iter())
    }

    pub fn len(&self) -> usize {
        self.nodes().map(|node| node.points.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes().all(|node| node.points.is_empty())
    }

    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    /// Number of levels below this node (0 for a leaf).
    pub fn depth(&self) -> u32 {
        self.nodes()
            .map(|node| node.depth - self.depth)
            .max()
            .unwrap_or(0)
    }

    pub fn query(&self, range: &Rectangle) -> Vec<Point> {
        let mut found = Vec::new();
        self.collect_in_rect(range, &mut found);
        found
    }

    fn collect_in_rect(&self, range: &Rectangle, found: &mut Vec<Point>) {
        if !self.boundary.intersects(range) {
            return;
        }
        found.extend(self.points.iter().filter(|p| range.contains(p)).copied());
        if let Some(children) = self.children.as_deref() {
            for child in children {
                child.collect_in_rect(range, found);
            }
        }
    }

    /// Points within `radius` of `center` (inclusive). Empty for a negative
    /// or NaN radius.
    pub fn query_circle(&self, center: Vector2, radius: f32) -> Vec<Point> {
        let mut found = Vec::new();
        if radius.is_nan() || radius < 0.0 {
            return found;
        }
        self.collect_in_circle(center, radius, &mut found);
        found
    }

    fn collect_in_circle(&self, center: Vector2, radius: f32, found: &mut Vec<Point>) {
        if !self.boundary.intersects_circle(center, radius) {
            return;
        }
        let r2 = radius * radius;
        found.extend(
            self.points
                .iter()
                .filter(|p| (p.position() - center).magnitude_squared() <= r2)
                .copied(),
        );
        if let Some(children) = self.children.as_deref() {
            for child in children {
                child.collect_in_circle(center, radius, found);
            }
        }
    }

    /// Drops every point and quadrant, keeping boundary and capacity.
    pub fn clear(&mut self) {
        self.points.clear();
        self.children = None;
    }
}

pub struct Nodes<'a> {
    stack: Vec<&'a QuadTree>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a QuadTree;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(children) = node.children.as_deref() {
            self.stack.extend(children.iter().rev());
        }
        Some(node)
    }
}
