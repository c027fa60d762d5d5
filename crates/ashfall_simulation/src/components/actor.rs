//! Базовые capability акторов: Actor (тело), Health, VisualHint
//!
//! Player и Enemy не наследуют общий base: каждый агент содержит `Actor`
//! и `Health` как поля и отдаёт их через `ActorView`.

use bevy::prelude::*;

/// Тело актора: позиция, скорость, ориентация, размеры спрайта
///
/// Bounds не хранятся: всегда вычисляются из position + extents × scale.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct Actor {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Радианы. Спрайты смотрят "вверх", поэтому facing = atan2 + π/2
    pub rotation: f32,
    pub scale: Vec2,
    /// Размер спрайта без scale
    pub extents: Vec2,
    pub active: bool,
    pub tint: VisualHint,
}

impl Actor {
    pub fn new(position: Vec2, extents: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            extents,
            active: true,
            tint: VisualHint::Normal,
        }
    }

    /// position += velocity × dt (неактивные акторы не двигаются)
    pub fn integrate(&mut self, delta: f32) {
        if !self.active {
            return;
        }
        self.position += self.velocity * delta;
    }

    /// Axis-aligned bounds вокруг центра спрайта
    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.position, self.extents * self.scale)
    }

    /// Развернуть спрайт по направлению движения
    pub fn face_towards(&mut self, direction: Vec2) {
        if direction.length_squared() > 0.0 {
            self.rotation = facing_rotation(direction);
        }
    }
}

/// Rotation спрайта для направления (спрайт смотрит вверх)
pub fn facing_rotation(direction: Vec2) -> f32 {
    direction.y.atan2(direction.x) + std::f32::consts::FRAC_PI_2
}

/// Визуальная подсказка для рендера (tint / flash)
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub enum VisualHint {
    #[default]
    Normal,
    /// Красная вспышка, flash ∈ [0, 1]
    Hurt { flash: f32 },
    Dodging,
    PerfectDodge,
    Dying,
}

/// Здоровье
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Вычитает урон (floor 0), возвращает фактически снятое HP
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let actual = amount.max(0.0).min(self.current);
        self.current -= actual;
        actual
    }

    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).clamp(0.0, self.max);
    }

    /// Доля HP для HUD bars
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }
}

/// Общий read-only доступ к capability агента
pub trait ActorView {
    fn actor(&self) -> &Actor;
    fn health(&self) -> &Health;

    fn is_active(&self) -> bool {
        self.actor().active
    }

    fn position(&self) -> Vec2 {
        self.actor().position
    }
}

/// Пересечение bounds двух активных акторов
pub fn actors_overlap(a: &impl ActorView, b: &impl ActorView) -> bool {
    let (a, b) = (a.actor(), b.actor());
    if !a.active || !b.active {
        return false;
    }
    !a.bounds().intersect(b.bounds()).is_empty()
}
