//! Combo chains: таблицы шагов по классу оружия + resolver
//!
//! Resolver хранит текущий индекс и follow-up window таймер.
//! Последний шаг каждой таблицы имеет window = 0 → цепочка терминальна.

use bevy::prelude::*;
use super::weapon::WeaponClass;

/// Один шаг комбо (immutable descriptor)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ComboStep {
    pub index: usize,
    pub damage_multiplier: f32,
    pub speed_multiplier: f32,
    pub range_multiplier: f32,
    pub knockback_multiplier: f32,
    /// Сколько секунд можно продолжить цепочку после этого шага
    pub window: f32,
}

impl ComboStep {
    pub const fn new(
        index: usize,
        damage_multiplier: f32,
        speed_multiplier: f32,
        range_multiplier: f32,
        knockback_multiplier: f32,
        window: f32,
    ) -> Self {
        Self {
            index,
            damage_multiplier,
            speed_multiplier,
            range_multiplier,
            knockback_multiplier,
            window,
        }
    }

    /// Fallback для оружия без таблицы (1.0 везде)
    pub const NEUTRAL: ComboStep = ComboStep::new(0, 1.0, 1.0, 1.0, 1.0, 0.5);
}

const SWORD_COMBO: [ComboStep; 3] = [
    ComboStep::new(0, 1.0, 1.0, 1.0, 1.0, 0.5),
    ComboStep::new(1, 1.2, 0.9, 1.1, 1.2, 0.4),
    ComboStep::new(2, 1.5, 0.8, 1.2, 1.5, 0.0),
];

const AXE_COMBO: [ComboStep; 3] = [
    ComboStep::new(0, 1.2, 0.8, 1.0, 1.3, 0.6),
    ComboStep::new(1, 1.4, 0.7, 1.1, 1.5, 0.5),
    ComboStep::new(2, 2.0, 0.6, 1.3, 2.0, 0.0),
];

const HAMMER_COMBO: [ComboStep; 3] = [
    ComboStep::new(0, 1.5, 0.6, 0.9, 1.5, 0.7),
    ComboStep::new(1, 1.8, 0.5, 1.0, 1.8, 0.6),
    ComboStep::new(2, 2.5, 0.4, 1.2, 2.5, 0.0),
];

const DAGGER_COMBO: [ComboStep; 4] = [
    ComboStep::new(0, 0.7, 1.5, 0.8, 0.5, 0.3),
    ComboStep::new(1, 0.8, 1.4, 0.8, 0.6, 0.3),
    ComboStep::new(2, 0.9, 1.3, 0.9, 0.7, 0.3),
    ComboStep::new(3, 1.2, 1.2, 1.0, 1.0, 0.0),
];

/// Таблица комбо для класса (None = класс без комбо)
pub fn combo_steps(class: WeaponClass) -> Option<&'static [ComboStep]> {
    match class {
        WeaponClass::Sword => Some(&SWORD_COMBO),
        WeaponClass::Axe => Some(&AXE_COMBO),
        WeaponClass::Hammer => Some(&HAMMER_COMBO),
        WeaponClass::Dagger => Some(&DAGGER_COMBO),
        WeaponClass::Staff => None,
    }
}

/// Решает какой шаг комбо следующий
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct ComboResolver {
    current_index: usize,
    window_timer: f32,
    /// Window последнего выбранного шага (для hold_window)
    last_window: f32,
}

impl ComboResolver {
    /// Следующий шаг комбо.
    ///
    /// - не в атаке или window истёк → индекс 0
    /// - иначе индекс + 1 (clamp на последний шаг таблицы)
    ///
    /// Side effect: window таймер = window выбранного шага.
    pub fn next_step(&mut self, class: WeaponClass, is_attacking: bool) -> ComboStep {
        let Some(steps) = combo_steps(class) else {
            return ComboStep::NEUTRAL;
        };

        if !is_attacking || self.window_timer <= 0.0 {
            self.current_index = 0;
        } else {
            self.current_index = (self.current_index + 1).min(steps.len() - 1);
        }

        let step = steps[self.current_index];
        self.window_timer = step.window;
        self.last_window = step.window;
        step
    }

    pub fn tick(&mut self, delta: f32) {
        if self.window_timer > 0.0 {
            self.window_timer = (self.window_timer - delta).max(0.0);
        }
    }

    /// Держать window полным (пока swing шага ещё в полёте)
    pub fn hold_window(&mut self) {
        self.window_timer = self.last_window;
    }

    pub fn reset(&mut self) {
        self.current_index = 0;
        self.window_timer = 0.0;
        self.last_window = 0.0;
    }

    pub fn is_in_combo(&self) -> bool {
        self.window_timer > 0.0
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn window_remaining(&self) -> f32 {
        self.window_timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_CLASSES: [WeaponClass; 5] = [
        WeaponClass::Sword,
        WeaponClass::Axe,
        WeaponClass::Hammer,
        WeaponClass::Dagger,
        WeaponClass::Staff,
    ];

    #[test]
    fn test_fresh_resolver_starts_at_zero() {
        for class in ALL_CLASSES {
            let mut resolver = ComboResolver::default();
            assert_eq!(resolver.next_step(class, true).index, 0, "{:?}", class);

            let mut resolver = ComboResolver::default();
            assert_eq!(resolver.next_step(class, false).index, 0, "{:?}", class);
        }
    }

    #[test]
    fn test_chain_advances_and_clamps() {
        let mut resolver = ComboResolver::default();
        let indices: Vec<usize> = (0..6)
            .map(|_| resolver.next_step(WeaponClass::Dagger, true).index)
            .collect();

        // 0..3, затем терминальный шаг (window 0) → сброс
        assert_eq!(indices, vec![0, 1, 2, 3, 0, 1]);
    }

    #[test]
    fn test_index_never_exceeds_table() {
        for class in ALL_CLASSES {
            let max_index = combo_steps(class).map(|s| s.len() - 1).unwrap_or(0);
            let mut resolver = ComboResolver::default();
            for _ in 0..20 {
                let step = resolver.next_step(class, true);
                assert!(step.index <= max_index);
                assert!(resolver.current_index() <= max_index);
            }
        }
    }

    #[test]
    fn test_final_step_window_is_zero() {
        for class in ALL_CLASSES {
            if let Some(steps) = combo_steps(class) {
                let last = steps[steps.len() - 1];
                assert_eq!(last.window, 0.0, "{:?}", class);
                assert!(steps[..steps.len() - 1].iter().all(|s| s.window > 0.0));
            }
        }
    }

    #[test]
    fn test_reset_when_not_attacking() {
        let mut resolver = ComboResolver::default();
        resolver.next_step(WeaponClass::Sword, true);
        assert_eq!(resolver.next_step(WeaponClass::Sword, true).index, 1);

        assert_eq!(resolver.next_step(WeaponClass::Sword, false).index, 0);
    }

    #[test]
    fn test_reset_when_window_expired() {
        let mut resolver = ComboResolver::default();
        resolver.next_step(WeaponClass::Axe, true);
        assert_eq!(resolver.next_step(WeaponClass::Axe, true).index, 1);

        // window шага 1 = 0.5
        resolver.tick(0.3);
        assert!(resolver.is_in_combo());
        resolver.tick(0.3);
        assert!(!resolver.is_in_combo());

        assert_eq!(resolver.next_step(WeaponClass::Axe, true).index, 0);
    }

    #[test]
    fn test_next_step_sets_window() {
        let mut resolver = ComboResolver::default();
        let step = resolver.next_step(WeaponClass::Hammer, true);
        assert_eq!(resolver.window_remaining(), step.window);
        assert_eq!(step.window, 0.7);
    }

    #[test]
    fn test_hold_window_refills() {
        let mut resolver = ComboResolver::default();
        resolver.next_step(WeaponClass::Sword, true);
        resolver.tick(0.4);
        resolver.hold_window();
        assert_eq!(resolver.window_remaining(), 0.5);
    }

    #[test]
    fn test_unknown_class_is_neutral() {
        let mut resolver = ComboResolver::default();
        let step = resolver.next_step(WeaponClass::Staff, true);
        assert_eq!(step, ComboStep::NEUTRAL);
        assert_eq!(step.damage_multiplier, 1.0);
        assert_eq!(step.speed_multiplier, 1.0);
        assert_eq!(step.range_multiplier, 1.0);
        assert_eq!(step.knockback_multiplier, 1.0);
    }
}
