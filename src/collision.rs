//! Rectangle and circle collision primitives.
//!
//! A primitive only stores its shape parameters. Its world-space bound is
//! derived from the owning sprite's [`Transform2D`] every time it is queried,
//! so a primitive can never go stale or point at another sprite's transform.

use crate::components::Transform2D;
use crate::math::{Rect, Vector2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CollisionPrimitive {
    /// Transform bounds grown by `inflate` pixels on every side.
    Rect { inflate: f32 },
    /// Circle centred on the transform bounds, radius scaled by the larger scale axis.
    Circle { radius: f32 },
}

impl CollisionPrimitive {
    pub fn rect() -> Self {
        Self::Rect { inflate: 0.0 }
    }

    pub fn circle(radius: f32) -> Self {
        Self::Circle { radius }
    }

    pub fn bound(&self, transform: &Transform2D) -> BoundPrimitive {
        let bounds = transform.bounds();
        match *self {
            Self::Rect { inflate } => BoundPrimitive::Rect(bounds.inflate(inflate)),
            Self::Circle { radius } => BoundPrimitive::Circle(Circle {
                center: bounds.center(),
                radius: radius * transform.scale.x.max(transform.scale.y),
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Vector2,
    pub radius: f32,
}

impl Circle {
    pub fn intersects_circle(&self, other: &Circle) -> bool {
        self.center.distance(other.center) < self.radius + other.radius
    }

    /// Closest point on `rect` to the centre, compared strictly against the radius.
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        let closest = rect.closest_point(self.center);
        (self.center - closest).length_squared() < self.radius * self.radius
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }
}

/// World-space shape produced by a [`CollisionPrimitive`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundPrimitive {
    Rect(Rect),
    Circle(Circle),
}

impl BoundPrimitive {
    pub fn intersects(&self, other: &BoundPrimitive) -> bool {
        match (self, other) {
            (Self::Rect(a), Self::Rect(b)) => a.intersects(b),
            (Self::Rect(r), Self::Circle(c)) | (Self::Circle(c), Self::Rect(r)) => {
                c.intersects_rect(r)
            }
            (Self::Circle(a), Self::Circle(b)) => a.intersects_circle(b),
        }
    }

    pub fn bounding_rect(&self) -> Rect {
        match self {
            Self::Rect(r) => *r,
            Self::Circle(c) => c.bounding_rect(),
        }
    }
}

/// Which face of an obstacle a moving rectangle is pressed against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactSide {
    Top,
    Bottom,
    Left,
    Right,
}

/// Classifies an overlap by the axis of least penetration.
/// Returns `None` when the rectangles do not intersect.
pub fn contact_side(mover: &Rect, obstacle: &Rect) -> Option<ContactSide> {
    if !mover.intersects(obstacle) {
        return None;
    }

    let overlap_x = mover.right().min(obstacle.right()) - mover.left().max(obstacle.left());
    let overlap_y = mover.bottom().min(obstacle.bottom()) - mover.top().max(obstacle.top());
    let mover_center = mover.center();
    let obstacle_center = obstacle.center();

    if overlap_y <= overlap_x {
        if mover_center.y < obstacle_center.y {
            Some(ContactSide::Top)
        } else {
            Some(ContactSide::Bottom)
        }
    } else if mover_center.x < obstacle_center.x {
        Some(ContactSide::Left)
    } else {
        Some(ContactSide::Right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_bound(x: f32, y: f32, w: f32, h: f32) -> BoundPrimitive {
        BoundPrimitive::Rect(Rect::new(x, y, w, h))
    }

    fn circle_bound(x: f32, y: f32, radius: f32) -> BoundPrimitive {
        BoundPrimitive::Circle(Circle {
            center: Vector2::new(x, y),
            radius,
        })
    }

    #[test]
    fn rect_bound_follows_transform_and_inflate() {
        let transform = Transform2D::new(Vector2::new(10.0, 20.0), Vector2::new(30.0, 40.0));
        assert_eq!(
            CollisionPrimitive::rect().bound(&transform),
            rect_bound(10.0, 20.0, 30.0, 40.0)
        );
        assert_eq!(
            CollisionPrimitive::Rect { inflate: 2.0 }.bound(&transform),
            rect_bound(8.0, 18.0, 34.0, 44.0)
        );
    }

    #[test]
    fn circle_bound_is_centred_and_scaled() {
        let transform = Transform2D::new(Vector2::new(100.0, 100.0), Vector2::new(30.0, 30.0))
            .with_origin(Vector2::new(15.0, 15.0))
            .with_scale(Vector2::new(1.0, 2.0));
        match CollisionPrimitive::circle(15.0).bound(&transform) {
            BoundPrimitive::Circle(c) => {
                assert_eq!(c.center, Vector2::new(100.0, 100.0));
                assert_eq!(c.radius, 30.0);
            }
            other => panic!("expected circle, got {other:?}"),
        }
    }

    #[test]
    fn circle_at_corner_with_zero_radius_never_intersects() {
        let rect = rect_bound(0.0, 0.0, 10.0, 10.0);
        for (x, y) in [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0)] {
            assert!(!circle_bound(x, y, 0.0).intersects(&rect));
            assert!(!rect.intersects(&circle_bound(x, y, 0.0)));
        }
    }

    #[test]
    fn circle_centred_inside_rect_intersects() {
        let rect = rect_bound(0.0, 0.0, 10.0, 10.0);
        assert!(circle_bound(5.0, 5.0, 0.5).intersects(&rect));
        assert!(circle_bound(0.1, 9.9, 0.01).intersects(&rect));
    }

    #[test]
    fn circle_tangent_to_rect_does_not_intersect() {
        let rect = rect_bound(0.0, 0.0, 10.0, 10.0);
        assert!(!circle_bound(15.0, 5.0, 5.0).intersects(&rect));
        assert!(circle_bound(14.9, 5.0, 5.0).intersects(&rect));
    }

    #[test]
    fn circles_use_summed_radii() {
        assert!(circle_bound(0.0, 0.0, 5.0).intersects(&circle_bound(9.0, 0.0, 5.0)));
        assert!(!circle_bound(0.0, 0.0, 5.0).intersects(&circle_bound(10.0, 0.0, 5.0)));
    }

    #[test]
    fn bound_intersection_is_symmetric() {
        let shapes = [
            rect_bound(0.0, 0.0, 10.0, 10.0),
            rect_bound(10.0, 0.0, 10.0, 10.0),
            rect_bound(5.0, 5.0, 2.0, 2.0),
            circle_bound(12.0, 5.0, 3.0),
            circle_bound(-1.0, -1.0, 1.0),
        ];
        for a in &shapes {
            for b in &shapes {
                assert_eq!(a.intersects(b), b.intersects(a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn contact_side_picks_least_penetration_axis() {
        let platform = Rect::new(100.0, 725.0, 39.0, 39.0);
        let landing = Rect::new(100.0, 672.0, 49.0, 54.0);
        assert_eq!(contact_side(&landing, &platform), Some(ContactSide::Top));

        let bumping_head = Rect::new(100.0, 760.0, 20.0, 54.0);
        assert_eq!(contact_side(&bumping_head, &platform), Some(ContactSide::Bottom));

        let from_left = Rect::new(62.0, 720.0, 40.0, 54.0);
        assert_eq!(contact_side(&from_left, &platform), Some(ContactSide::Left));

        let from_right = Rect::new(137.0, 720.0, 40.0, 54.0);
        assert_eq!(contact_side(&from_right, &platform), Some(ContactSide::Right));

        let apart = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(contact_side(&apart, &platform), None);
    }
}
