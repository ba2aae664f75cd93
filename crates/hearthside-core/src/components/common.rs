//! Common components shared across colonist entities.

use serde::{Deserialize, Serialize};

/// 3D vector for positions and movement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3 { x, y, z }
    }

    pub fn distance_squared(&self, other: &Vec3) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn distance(&self, other: &Vec3) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn normalize(&self) -> Vec3 {
        let len = self.length();
        if len > 0.0 {
            Vec3::new(self.x / len, self.y / len, self.z / len)
        } else {
            Vec3::ZERO
        }
    }
}

impl std::ops::Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, scalar: f32) -> Vec3 {
        Vec3::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

/// Where a colonist stands on the map.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position(pub Vec3);

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Position(Vec3::new(x, y, 0.0))
    }

    /// Step toward `target` by at most `max_step`, returning the distance
    /// still remaining after the move.
    pub fn step_toward(&mut self, target: Vec3, max_step: f32) -> f32 {
        let to_target = target - self.0;
        let distance = to_target.length();
        if distance <= max_step {
            self.0 = target;
            0.0
        } else {
            self.0 = self.0 + to_target.normalize() * max_step;
            distance - max_step
        }
    }
}

/// A colonist's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Name {
    pub given: String,
    pub family: String,
    pub nickname: Option<String>,
}

impl Name {
    pub fn new(given: impl Into<String>, family: impl Into<String>) -> Self {
        Name {
            given: given.into(),
            family: family.into(),
            nickname: None,
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.given, self.family)
    }

    /// Nickname when one exists, otherwise the given name.
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.given)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec3_distance() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 4.0, 0.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(a.distance_squared(&b), 25.0);
    }

    #[test]
    fn vec3_normalize_zero_is_zero() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    }

    #[test]
    fn step_toward_converges() {
        let mut pos = Position::new(0.0, 0.0);
        let target = Vec3::new(10.0, 0.0, 0.0);
        let remaining = pos.step_toward(target, 4.0);
        assert_eq!(remaining, 6.0);
        assert_eq!(pos.0.x, 4.0);
    }

    #[test]
    fn step_toward_clamps_overshoot() {
        let mut pos = Position::new(9.5, 0.0);
        let target = Vec3::new(10.0, 0.0, 0.0);
        let remaining = pos.step_toward(target, 4.0);
        assert_eq!(remaining, 0.0);
        assert_eq!(pos.0, target);
    }

    #[test]
    fn name_display() {
        let name = Name::new("Margaret", "Hale");
        assert_eq!(name.full_name(), "Margaret Hale");
        assert_eq!(name.display_name(), "Margaret");

        let nicknamed = Name::new("Margaret", "Hale").with_nickname("Peggy");
        assert_eq!(nicknamed.display_name(), "Peggy");
        assert_eq!(nicknamed.full_name(), "Margaret Hale");
    }
}
