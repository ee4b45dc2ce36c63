use asteroids_arcade_core::constants::MAX_BULLETS;
use asteroids_arcade_core::geometry::direction_to_angle;
use asteroids_arcade_core::{FrameInput, WorldSnapshot};
use glam::Vec2;

pub trait AutopilotBot: Send {
    fn id(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn reset(&mut self, seed: u64);
    fn next_input(&mut self, world: &WorldSnapshot) -> FrameInput;
}

struct IdleBot;

impl AutopilotBot for IdleBot {
    fn id(&self) -> &'static str {
        "idle"
    }

    fn description(&self) -> &'static str {
        "Never touches the controls."
    }

    fn reset(&mut self, _seed: u64) {}

    fn next_input(&mut self, _world: &WorldSnapshot) -> FrameInput {
        FrameInput::IDLE
    }
}

struct SpinnerBot;

impl AutopilotBot for SpinnerBot {
    fn id(&self) -> &'static str {
        "spinner"
    }

    fn description(&self) -> &'static str {
        "Turns right forever with the trigger held."
    }

    fn reset(&mut self, _seed: u64) {}

    fn next_input(&mut self, _world: &WorldSnapshot) -> FrameInput {
        FrameInput {
            right: true,
            fire: true,
            ..FrameInput::IDLE
        }
    }
}

const HUNTER_AIM_TOLERANCE_DEG: f32 = 6.0;
const HUNTER_TURN_DEADBAND_DEG: f32 = 2.5;
const HUNTER_THRUST_CONE_DEG: f32 = 25.0;
const HUNTER_CHASE_DISTANCE: f32 = 260.0;
const HUNTER_SPEED_CAP: f32 = 140.0;
const HUNTER_DANGER_GAP: f32 = 14.0;
const HUNTER_HYPERSPACE_COOLDOWN_FRAMES: u32 = 90;

/// Turns toward the nearest target, closes distance when far, fires once
/// aligned and jumps to hyperspace when something is about to hit.
struct HunterBot {
    hyperspace_cooldown: u32,
}

#[derive(Clone, Copy, Debug)]
struct Contact {
    pos: Vec2,
    gap: f32,
}

impl HunterBot {
    fn new() -> Self {
        Self {
            hyperspace_cooldown: 0,
        }
    }

    fn nearest_target(world: &WorldSnapshot) -> Option<Contact> {
        let ship = world.ship.pos;
        let asteroids = world
            .asteroids
            .iter()
            .map(|asteroid| (asteroid.pos, asteroid.radius));
        let ufos = world.ufos.iter().map(|ufo| (ufo.pos, ufo.radius));

        asteroids
            .chain(ufos)
            .map(|(pos, radius)| Contact {
                pos,
                gap: pos.distance(ship) - radius,
            })
            .min_by(|a, b| a.gap.total_cmp(&b.gap))
    }

    fn closest_threat_gap(world: &WorldSnapshot) -> f32 {
        let ship = &world.ship;
        let bodies = world
            .asteroids
            .iter()
            .map(|asteroid| (asteroid.pos, asteroid.radius))
            .chain(world.ufos.iter().map(|ufo| (ufo.pos, ufo.radius)))
            .chain(
                world
                    .enemy_bullets
                    .iter()
                    .map(|bullet| (bullet.pos, bullet.radius)),
            );

        bodies
            .map(|(pos, radius)| pos.distance(ship.pos) - radius - ship.radius)
            .fold(f32::INFINITY, f32::min)
    }
}

impl AutopilotBot for HunterBot {
    fn id(&self) -> &'static str {
        "hunter"
    }

    fn description(&self) -> &'static str {
        "Aims at the nearest rock or saucer, fires when lined up, jumps when cornered."
    }

    fn reset(&mut self, _seed: u64) {
        self.hyperspace_cooldown = 0;
    }

    fn next_input(&mut self, world: &WorldSnapshot) -> FrameInput {
        let ship = &world.ship;
        let mut input = FrameInput::IDLE;
        self.hyperspace_cooldown = self.hyperspace_cooldown.saturating_sub(1);

        let exposed = ship.invulnerable <= 0.0 && world.safe_spawn <= 0.0;
        if exposed
            && self.hyperspace_cooldown == 0
            && Self::closest_threat_gap(world) < HUNTER_DANGER_GAP
        {
            self.hyperspace_cooldown = HUNTER_HYPERSPACE_COOLDOWN_FRAMES;
            input.hyperspace = true;
            return input;
        }

        let Some(target) = Self::nearest_target(world) else {
            return input;
        };

        let bearing = direction_to_angle(target.pos - ship.pos);
        let error = signed_angle_delta(ship.angle, bearing);
        if error > HUNTER_TURN_DEADBAND_DEG {
            input.right = true;
        } else if error < -HUNTER_TURN_DEADBAND_DEG {
            input.left = true;
        }

        input.thrust = error.abs() < HUNTER_THRUST_CONE_DEG
            && target.gap > HUNTER_CHASE_DISTANCE
            && ship.vel.length() < HUNTER_SPEED_CAP;

        input.fire = error.abs() < HUNTER_AIM_TOLERANCE_DEG
            && ship.cooldown <= 0.0
            && world.bullets.len() < MAX_BULLETS;

        input
    }
}

/// Shortest signed turn from `current` to `target`, in (-180, 180].
#[inline]
fn signed_angle_delta(current: f32, target: f32) -> f32 {
    let delta = (target - current).rem_euclid(360.0);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

const BOT_IDS: [&str; 3] = ["idle", "spinner", "hunter"];

pub fn bot_ids() -> &'static [&'static str] {
    &BOT_IDS
}

pub fn create_bot(id: &str) -> Option<Box<dyn AutopilotBot>> {
    match id {
        "idle" => Some(Box::new(IdleBot)),
        "spinner" => Some(Box::new(SpinnerBot)),
        "hunter" => Some(Box::new(HunterBot::new())),
        _ => None,
    }
}

pub fn describe_bots() -> Vec<(&'static str, &'static str)> {
    bot_ids()
        .iter()
        .filter_map(|id| create_bot(id))
        .map(|bot| (bot.id(), bot.description()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use asteroids_arcade_core::World;

    #[test]
    fn every_listed_bot_can_be_created() {
        for id in bot_ids() {
            let bot = create_bot(id).expect("listed bot exists");
            assert_eq!(bot.id(), *id);
        }
        assert!(create_bot("nope").is_none());
        assert_eq!(describe_bots().len(), bot_ids().len());
    }

    #[test]
    fn angle_delta_takes_the_short_way_round() {
        assert_eq!(signed_angle_delta(-90.0, 0.0), 90.0);
        assert_eq!(signed_angle_delta(170.0, -170.0), 20.0);
        assert_eq!(signed_angle_delta(-170.0, 170.0), -20.0);
        assert_eq!(signed_angle_delta(0.0, 180.0), 180.0);
    }

    #[test]
    fn hunter_turns_toward_a_target_on_its_right() {
        let world = World::with_seed(3);
        let mut snapshot = world.snapshot();
        // Nose points up; put the only target straight to the east.
        snapshot.asteroids.truncate(1);
        snapshot.asteroids[0].pos = snapshot.ship.pos + Vec2::new(200.0, 0.0);
        snapshot.ufos.clear();

        let mut bot = HunterBot::new();
        let input = bot.next_input(&snapshot);
        assert!(input.right && !input.left);
        assert!(!input.fire);
    }

    #[test]
    fn hunter_fires_when_lined_up() {
        let world = World::with_seed(3);
        let mut snapshot = world.snapshot();
        snapshot.asteroids.truncate(1);
        snapshot.asteroids[0].pos = snapshot.ship.pos + Vec2::new(0.0, -120.0);

        let mut bot = HunterBot::new();
        let input = bot.next_input(&snapshot);
        assert!(input.fire);
        assert!(!input.left && !input.right);
    }

    #[test]
    fn hunter_jumps_when_exposed_and_crowded() {
        let world = World::with_seed(3);
        let mut snapshot = world.snapshot();
        snapshot.safe_spawn = 0.0;
        snapshot.ship.invulnerable = 0.0;
        snapshot.asteroids[0].pos = snapshot.ship.pos + Vec2::new(30.0, 0.0);

        let mut bot = HunterBot::new();
        assert!(bot.next_input(&snapshot).hyperspace);
        assert!(!bot.next_input(&snapshot).hyperspace, "cooldown applies");
    }
}
