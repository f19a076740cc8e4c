use crate::collision::{sphere_sphere, Sphere};
use crate::config::GameConfig;
use crate::level::Level;
use crate::math::{F, M4, PI, TAU, V3};
use crate::node::Node;
use crate::trail::Trail;

/// Trail entries directly behind the head never count as a self collision.
const SELF_COLLISION_SKIP: usize = 2;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct FrameInput {
    pub turn_left: bool,
    pub turn_right: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Crash {
    Obstacle,
    OwnBody,
}

/// What happened during one call to [`Game::update`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct FrameReport {
    pub sampled: bool,
    pub crash: Option<Crash>,
    pub ate: bool,
}

#[derive(Debug, Clone)]
pub struct Agent {
    pub position: V3,
    /// Radians, kept in `(-TAU, TAU)`.
    pub heading: F,
    pub speed: F,
    pub radius: F,
    pub turn_rate: F,
    /// Arc length travelled since the last trail sample.
    pub distance: F,
}

impl Agent {
    pub fn new(speed: F, radius: F, turn_rate: F) -> Self {
        Self {
            position: V3::zero(),
            heading: 0.0,
            speed,
            radius,
            turn_rate,
            distance: 0.0,
        }
    }

    pub fn steer(&mut self, input: FrameInput) {
        if input.turn_left {
            self.heading = (self.heading + self.turn_rate) % TAU;
        } else if input.turn_right {
            self.heading = (self.heading - self.turn_rate) % TAU;
        }
    }

    /// Moves along the heading for `dt` milliseconds and returns the offset.
    pub fn advance(&mut self, dt: f64) -> V3 {
        let step = (self.speed as f64 * dt / 1000.0) as F;
        let delta = self.direction() * step;

        self.position += delta;
        delta
    }

    pub fn direction(&self) -> V3 {
        let (sin, cos) = self.heading.sin_cos();
        V3::new(cos, 0.0, -sin)
    }

    pub fn sphere(&self) -> Sphere {
        Sphere::new(self.position, self.radius)
    }
}

/// All mutable state of a run. Advanced once per frame by [`Game::update`]
/// and read immutably by the renderer.
pub struct Game {
    agent: Agent,
    trail: Trail,
    level: Level,
    food: V3,
    food_radius: F,
    score: u32,
    rng: fastrand::Rng,
}

impl Game {
    pub fn new(config: &GameConfig) -> Self {
        let level = Level::new(&config.arena, &config.food);
        Self::with_level(config, level)
    }

    pub fn with_level(config: &GameConfig, level: Level) -> Self {
        let agent = Agent::new(
            config.agent.speed,
            config.agent.radius,
            config.agent.turn_rate,
        );

        let mut game = Self {
            agent,
            trail: Trail::new(config.agent.trail_capacity),
            level,
            food: V3::zero(),
            food_radius: config.food.radius,
            score: 0,
            rng: fastrand::Rng::with_seed(config.seed),
        };
        game.place_food();

        tracing::debug!(
            obstacles = game.level.obstacles.len(),
            trail_capacity = game.trail.capacity(),
            food = ?game.food,
            "game initialized"
        );

        game
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn obstacles(&self) -> &[Sphere] {
        &self.level.obstacles
    }

    pub fn food(&self) -> Sphere {
        Sphere::new(self.food, self.food_radius)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// World transform of the head. Its local +Z points along the heading.
    pub fn head_transform(&self) -> M4 {
        let mut pose = Node::default();
        pose.set_translation(self.agent.position);
        pose.set_rotation_y(self.agent.heading + PI / 2.0);
        pose.transform()
    }

    /// Trail samples drawn as body segments, newest first.
    pub fn visible_body(&self) -> impl Iterator<Item = V3> + '_ {
        self.trail.iter().take(self.score as usize + 1)
    }

    /// Advances the simulation by `dt` milliseconds.
    pub fn update(&mut self, dt: f64, input: FrameInput) -> FrameReport {
        let mut report = FrameReport::default();

        self.agent.steer(input);
        let delta = self.agent.advance(dt);
        self.agent.distance += delta.length();

        if self.agent.distance > 2.0 * self.agent.radius {
            self.trail.push(self.agent.position);
            self.agent.distance = 0.0;
            report.sampled = true;
        }

        let head = self.agent.sphere();
        if self.level.obstacles.iter().any(|o| head.intersects(o)) {
            self.crash(Crash::Obstacle);
            report.crash = Some(Crash::Obstacle);
        }

        if self.hits_own_body() {
            self.crash(Crash::OwnBody);
            report.crash = Some(Crash::OwnBody);
        }

        if sphere_sphere(
            self.agent.position,
            self.agent.radius,
            self.food,
            self.food_radius,
        ) {
            self.score += 1;
            self.resample_food();
            report.ate = true;
            tracing::info!(score = self.score, food = ?self.food, "food eaten");
        }

        report
    }

    fn hits_own_body(&self) -> bool {
        if self.trail.is_empty() {
            return false;
        }

        let end = (self.score as usize).min(self.trail.len());
        let position = self.agent.position;
        let radius = self.agent.radius;

        (SELF_COLLISION_SKIP..end)
            .filter_map(|i| self.trail.get(i))
            .any(|segment| sphere_sphere(position, radius, segment, radius))
    }

    fn crash(&mut self, crash: Crash) {
        tracing::info!(?crash, score = self.score, position = ?self.agent.position, "crashed");
        self.agent.position = V3::zero();
        self.score = 0;
    }

    fn random_cell(&mut self, extent: i32) -> V3 {
        let x = self.rng.i32(-extent..extent) as F;
        let z = self.rng.i32(-extent..extent) as F;
        V3::new(x, 0.0, z)
    }

    fn place_food(&mut self) {
        let clearance = self.level.clearance;
        let extent = self.level.placement_extent;
        let agent = self.agent.position;

        // Keeps sampling only while the food is close on both axes.
        self.food = V3::zero();
        while (agent.x() - self.food.x()).abs() < clearance
            && (agent.z() - self.food.z()).abs() < clearance
        {
            self.food = self.random_cell(extent);
        }
    }

    fn resample_food(&mut self) {
        let clearance = self.level.clearance;
        let extent = self.level.resample_extent;

        // Keeps sampling while the food is close on either axis, which is
        // stricter than the initial placement.
        loop {
            self.food = self.random_cell(extent);
            let d = (self.agent.position - self.food).abs();
            if d.x() >= clearance && d.z() >= clearance {
                break;
            }
        }
    }
}

#[cfg(test)]
impl Game {
    fn set_food(&mut self, food: V3) {
        self.food = food;
    }

    fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    fn trail_mut(&mut self) -> &mut Trail {
        &mut self.trail
    }
}
