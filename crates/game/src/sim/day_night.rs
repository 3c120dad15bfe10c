use rand::Rng;

use super::config::{CycleConfig, GameConfig, ZombieConfig};
use super::zombie::Zombie;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Day,
    Night,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Day => "DAY",
            Phase::Night => "NIGHT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DirectorReport {
    /// Phase entered this tick, if any.
    pub transition: Option<Phase>,
    pub spawned: Option<(SpawnSide, f32)>,
    /// Zombies removed because night ended.
    pub cleared: usize,
}

/// Drives the day/night cycle, spawns zombies at night and purges them when
/// day returns.
#[derive(Debug, Clone, PartialEq)]
pub struct DayNightDirector {
    phase: Phase,
    phase_started_ms: u64,
    last_spawn_ms: u64,
    cycle: CycleConfig,
    zombie: ZombieConfig,
    spawn_offset_px: f32,
    world_width_px: f32,
}

impl DayNightDirector {
    pub fn new(config: &GameConfig, now_ms: u64) -> Self {
        Self::with_phase(config, Phase::Day, now_ms)
    }

    pub fn with_phase(config: &GameConfig, phase: Phase, now_ms: u64) -> Self {
        Self {
            phase,
            phase_started_ms: now_ms,
            last_spawn_ms: now_ms,
            cycle: config.cycle.clone(),
            zombie: config.zombie.clone(),
            spawn_offset_px: config.screen_width as f32,
            world_width_px: config.world_width_px(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn phase_elapsed(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.phase_started_ms)
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        now_ms: u64,
        player_x: f32,
        zombies: &mut Vec<Zombie>,
        rng: &mut R,
    ) -> DirectorReport {
        let mut report = DirectorReport::default();
        let elapsed = self.phase_elapsed(now_ms);

        match self.phase {
            Phase::Day if elapsed >= self.cycle.day_ms => {
                self.enter(Phase::Night, now_ms);
                report.transition = Some(Phase::Night);
            }
            Phase::Night if elapsed >= self.cycle.night_ms => {
                self.enter(Phase::Day, now_ms);
                report.transition = Some(Phase::Day);
                report.cleared = zombies.len();
                zombies.clear();
            }
            _ => {}
        }

        if self.phase == Phase::Night
            && now_ms.saturating_sub(self.last_spawn_ms) >= self.cycle.spawn_interval_ms
        {
            let side = if rng.random_bool(0.5) {
                SpawnSide::Left
            } else {
                SpawnSide::Right
            };
            let x = self.spawn_x(side, player_x);
            zombies.push(Zombie::new(x, 0.0, &self.zombie));
            self.last_spawn_ms = now_ms;
            report.spawned = Some((side, x));
        }

        report
    }

    /// One screen width away from the player, kept inside the world.
    pub fn spawn_x(&self, side: SpawnSide, player_x: f32) -> f32 {
        match side {
            SpawnSide::Left => (player_x - self.spawn_offset_px).max(0.0),
            SpawnSide::Right => {
                (self.world_width_px - self.zombie.width).min(player_x + self.spawn_offset_px)
            }
        }
    }

    fn enter(&mut self, phase: Phase, now_ms: u64) {
        self.phase = phase;
        self.phase_started_ms = now_ms;
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn day_turns_to_night_after_exactly_day_duration() {
        let config = GameConfig::default();
        let mut director = DayNightDirector::new(&config, 0);
        let mut zombies = Vec::new();
        let mut rng = rng();

        let report = director.update(19_999, 200.0, &mut zombies, &mut rng);
        assert_eq!(report.transition, None);
        assert_eq!(director.phase(), Phase::Day);

        let report = director.update(20_000, 200.0, &mut zombies, &mut rng);
        assert_eq!(report.transition, Some(Phase::Night));
        assert_eq!(director.phase(), Phase::Night);
        assert_eq!(director.phase_elapsed(20_500), 500);
    }

    #[test]
    fn no_spawns_during_day() {
        let config = GameConfig::default();
        let mut director = DayNightDirector::new(&config, 0);
        let mut zombies = Vec::new();
        let mut rng = rng();
        for now in (0..20_000).step_by(100) {
            let report = director.update(now, 200.0, &mut zombies, &mut rng);
            assert!(report.spawned.is_none());
        }
        assert!(zombies.is_empty());
    }

    #[test]
    fn night_spawns_once_per_interval_without_cap() {
        let config = GameConfig::default();
        let mut director = DayNightDirector::with_phase(&config, Phase::Night, 0);
        let mut zombies = Vec::new();
        let mut rng = rng();

        assert!(director
            .update(3_999, 200.0, &mut zombies, &mut rng)
            .spawned
            .is_none());
        assert!(director
            .update(4_000, 200.0, &mut zombies, &mut rng)
            .spawned
            .is_some());
        assert!(director
            .update(4_100, 200.0, &mut zombies, &mut rng)
            .spawned
            .is_none());
        for now in [8_000, 12_000, 16_000, 20_000, 24_000] {
            director.update(now, 200.0, &mut zombies, &mut rng);
        }
        assert_eq!(zombies.len(), 6);
        assert!(zombies.iter().all(|zombie| zombie.rect().y == 0.0));
    }

    #[test]
    fn first_night_spawn_happens_at_nightfall() {
        let config = GameConfig::default();
        let mut director = DayNightDirector::new(&config, 0);
        let mut zombies = Vec::new();
        let report = director.update(20_000, 200.0, &mut zombies, &mut rng());
        assert_eq!(report.transition, Some(Phase::Night));
        assert!(report.spawned.is_some());
        assert_eq!(zombies.len(), 1);
    }

    #[test]
    fn night_ending_clears_every_zombie() {
        let config = GameConfig::default();
        let mut director = DayNightDirector::with_phase(&config, Phase::Night, 0);
        let mut zombies: Vec<Zombie> = (0..250)
            .map(|i| Zombie::new(i as f32 * 10.0, 0.0, &config.zombie))
            .collect();

        let report = director.update(24_999, 200.0, &mut zombies, &mut rng());
        assert_eq!(report.transition, None);
        assert!(zombies.len() >= 250);

        let count = zombies.len();
        let report = director.update(25_000, 200.0, &mut zombies, &mut rng());
        assert_eq!(report.transition, Some(Phase::Day));
        assert_eq!(report.cleared, count);
        assert!(report.spawned.is_none());
        assert!(zombies.is_empty());
    }

    #[test]
    fn spawn_positions_are_clamped_to_world() {
        let config = GameConfig::default();
        let director = DayNightDirector::new(&config, 0);

        assert_eq!(director.spawn_x(SpawnSide::Left, 200.0), 0.0);
        assert_eq!(director.spawn_x(SpawnSide::Left, 2_000.0), 1_040.0);
        assert_eq!(director.spawn_x(SpawnSide::Right, 200.0), 1_160.0);
        assert_eq!(director.spawn_x(SpawnSide::Right, 9_000.0), 9_572.0);
    }

    #[test]
    fn phase_labels() {
        assert_eq!(Phase::Day.label(), "DAY");
        assert_eq!(Phase::Night.label(), "NIGHT");
    }
}
