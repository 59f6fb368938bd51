// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Example components
//!
//! A plain 2D vector and the two components built on it that the docs,
//! tests and benchmarks use: [`Position`] and [`Velocity`]. They carry no
//! behavior the store relies on; any type implementing
//! [`Component`] works the same way.

use crate::ecs::Component;
use crate::pool::Poolable;
use std::ops::{Add, AddAssign, Mul, Sub};

/// 2D vector with single-precision coordinates
///
/// # Examples
///
/// ```
/// use ecs_store::ecs::components::Vec2;
///
/// let v = Vec2::new(3.0, 4.0);
/// assert_eq!(v.length(), 5.0);
/// assert_eq!(v + Vec2::new(1.0, 1.0), Vec2::new(4.0, 5.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate
    pub y: f32,
}

impl Vec2 {
    /// Create a new vector
    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    /// The zero vector
    pub const fn zero() -> Self {
        Vec2::new(0.0, 0.0)
    }

    /// Euclidean length
    pub fn length(&self) -> f32 {
        self.dot(*self).sqrt()
    }

    /// Dot product
    pub fn dot(&self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Unit vector in the same direction, or zero for the zero vector
    pub fn normalized(&self) -> Vec2 {
        let len = self.length();
        if len == 0.0 {
            Vec2::zero()
        } else {
            *self * (1.0 / len)
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

macro_rules! vec2_component {
    ($(#[$meta:meta])* $name:ident, $key:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        pub struct $name(pub Vec2);

        impl $name {
            /// Create a new value with the given coordinates
            pub const fn new(x: f32, y: f32) -> Self {
                $name(Vec2::new(x, y))
            }

            /// Get the x coordinate
            pub fn x(&self) -> f32 {
                self.0.x
            }

            /// Get the y coordinate
            pub fn y(&self) -> f32 {
                self.0.y
            }

            /// Set the x coordinate
            pub fn set_x(&mut self, x: f32) {
                self.0.x = x;
            }

            /// Set the y coordinate
            pub fn set_y(&mut self, y: f32) {
                self.0.y = y;
            }
        }

        impl Component for $name {
            const NAME: &'static str = $key;
        }

        impl Poolable for $name {}
    };
}

vec2_component!(
    /// Location of an entity in 2D space
    Position,
    "Position"
);

vec2_component!(
    /// Rate of change of [`Position`] per unit of time
    Velocity,
    "Velocity"
);

impl Position {
    /// Move by `velocity` scaled by `dt`
    pub fn advance(&mut self, velocity: &Velocity, dt: f32) {
        self.0 += velocity.0 * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_arithmetic() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, -1.0);
        assert_eq!(a + b, Vec2::new(4.0, 1.0));
        assert_eq!(a - b, Vec2::new(-2.0, 3.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(a.dot(b), 1.0);
    }

    #[test]
    fn test_vec2_normalized() {
        assert_eq!(Vec2::new(0.0, 2.0).normalized(), Vec2::new(0.0, 1.0));
        assert_eq!(Vec2::zero().normalized(), Vec2::zero());
    }

    #[test]
    fn test_position_advance() {
        let mut pos = Position::new(1.0, 1.0);
        pos.advance(&Velocity::new(2.0, -4.0), 0.5);
        assert_eq!(pos, Position::new(2.0, -1.0));
    }

    #[test]
    fn test_component_names() {
        assert_eq!(Position::NAME, "Position");
        assert_eq!(Velocity::NAME, "Velocity");
    }
}
