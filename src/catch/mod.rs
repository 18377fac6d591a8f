//! Catch / whack ball game.
//!
//! Enemy balls rain in from the top at an accelerating rate and bounce around
//! the field. The player steers a bat with the pointer: enemy balls glance off
//! it, and holding the button fires player balls upward. A player ball that
//! touches an enemy ball knocks it out for a point. Too many enemy balls on the
//! field ends the game.

pub mod params;
pub mod shell;

use std::f64::consts::PI;

pub use params::CatchParams;

pub const PALETTE: [&str; 6] = ["#FF5252", "#FFEB3B", "#4CAF50", "#2196F3", "#9C27B0", "#FF9800"];
pub const PLAYER_COLOUR: &str = "#4CAF50";

/// Seeded linear congruential generator; plenty for spawn jitter.
#[derive(Clone, Debug)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed ^ 0x9E37_79B9_7F4A_7C15 }
    }

    /// Uniform in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 11) as f64 / (1u64 << 53) as f64
    }

    pub fn index(&mut self, len: usize) -> usize {
        ((self.next_f64() * len as f64) as usize).min(len.saturating_sub(1))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ball {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
    pub colour: &'static str,
    /// Knocked out; removed on the next tick.
    pub clicked: bool,
    /// Fired by the player rather than spawned.
    pub player: bool,
}

impl Ball {
    /// Enemy ball dropping in just above the top edge at a random column.
    fn spawn(params: &CatchParams, rng: &mut Lcg) -> Self {
        let radius = rng.next_f64() * params.radius_span + params.min_radius;
        let x = rng.next_f64() * (params.width - radius * 2.0) + radius;
        let colour = PALETTE[rng.index(PALETTE.len())];
        let vx = (rng.next_f64() - 0.5) * 5.0;
        let vy = rng.next_f64() * 2.0;
        Self { x, y: -radius, vx, vy, radius, colour, clicked: false, player: false }
    }

    fn shot(params: &CatchParams, bat: &Bat, rng: &mut Lcg) -> Self {
        let radius = rng.next_f64() * params.radius_span + params.min_radius;
        let vx = (rng.next_f64() - 0.5) * 3.0;
        Self {
            x: bat.x,
            y: bat.y - bat.height / 2.0 - params.shot_offset,
            vx,
            vy: -params.shot_power,
            radius,
            colour: PLAYER_COLOUR,
            clicked: false,
            player: true,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.x - x).hypot(self.y - y) <= self.radius
    }

    fn overlaps_bat(&self, bat: &Bat) -> bool {
        self.x + self.radius > bat.x - bat.width / 2.0
            && self.x - self.radius < bat.x + bat.width / 2.0
            && self.y + self.radius > bat.y - bat.height / 2.0
            && self.y - self.radius < bat.y + bat.height / 2.0
    }

    // gravity, drag, move, then bounce off the four walls
    fn integrate(&mut self, params: &CatchParams) {
        self.vy += params.gravity;
        self.vx *= params.friction;
        self.vy *= params.friction;
        self.x += self.vx;
        self.y += self.vy;

        if self.x + self.radius > params.width {
            self.x = params.width - self.radius;
            self.vx *= -params.bounce;
        } else if self.x - self.radius < 0.0 {
            self.x = self.radius;
            self.vx *= -params.bounce;
        }
        if self.y + self.radius > params.height {
            self.y = params.height - self.radius;
            self.vy *= -params.bounce;
        } else if self.y - self.radius < 0.0 {
            self.y = self.radius;
            self.vy *= -params.bounce;
        }
    }

    /// Send an enemy ball back up. Hitting off-centre angles it up to 60 degrees.
    fn deflect_off(&mut self, bat: &Bat, params: &CatchParams) {
        let hit = ((self.x - bat.x) / (bat.width / 2.0)).clamp(-1.0, 1.0);
        let angle = hit * PI / 3.0;
        let speed = self.vx.hypot(self.vy).max(params.min_bounce_speed) * params.bounce;
        self.vx = angle.sin() * speed;
        self.vy = -angle.cos() * speed;
        self.y = bat.y - bat.height / 2.0 - self.radius - 1.0;
    }
}

/// The pointer-driven paddle. `x`/`y` is its centre.
#[derive(Clone, Debug, PartialEq)]
pub struct Bat {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Frames until the next shot is allowed.
    pub cooldown: u32,
    /// Player balls currently on the field.
    pub shots_live: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    GameOver,
}

#[derive(Clone, Debug)]
pub struct CatchGame {
    params: CatchParams,
    rng: Lcg,
    balls: Vec<Ball>,
    bat: Bat,
    pointer: (f64, f64),
    pointer_down: bool,
    score: u32,
    game_over: bool,
    last_spawn_ms: f64,
    spawn_interval_ms: f64,
}

impl CatchGame {
    pub fn new(params: CatchParams, seed: u64) -> Self {
        let pointer = (params.width / 2.0, params.height - params.bat_margin);
        let bat = Bat {
            x: pointer.0,
            y: pointer.1,
            width: params.bat_width,
            height: params.bat_height,
            cooldown: 0,
            shots_live: 0,
        };
        let spawn_interval_ms = params.spawn_interval_ms;
        Self {
            params,
            rng: Lcg::new(seed),
            balls: Vec::new(),
            bat,
            pointer,
            pointer_down: false,
            score: 0,
            game_over: false,
            last_spawn_ms: 0.0,
            spawn_interval_ms,
        }
    }

    /// Clear the field and score. The pointer keeps its last position.
    pub fn reset(&mut self) {
        log::debug!("catch game reset (score was {})", self.score);
        self.balls.clear();
        self.score = 0;
        self.game_over = false;
        self.last_spawn_ms = 0.0;
        self.spawn_interval_ms = self.params.spawn_interval_ms;
        self.bat.cooldown = 0;
        self.bat.shots_live = 0;
    }

    /// Pointer position in field coordinates, clamped so the bat stays inside.
    pub fn set_pointer(&mut self, x: f64, y: f64) {
        let half_w = self.params.bat_width / 2.0;
        let half_h = self.params.bat_height / 2.0;
        self.pointer = (
            x.clamp(half_w, self.params.width - half_w),
            y.clamp(half_h, self.params.height - half_h),
        );
    }

    pub fn set_pointer_down(&mut self, down: bool) {
        self.pointer_down = down;
    }

    /// Advance one frame. `now_ms` is the animation-frame timestamp.
    pub fn tick(&mut self, now_ms: f64) -> TickOutcome {
        if self.game_over {
            return TickOutcome::GameOver;
        }

        (self.bat.x, self.bat.y) = self.pointer;
        if self.bat.cooldown > 0 {
            self.bat.cooldown -= 1;
        }
        if self.pointer_down && self.bat.cooldown == 0 {
            self.shoot();
        }

        if now_ms - self.last_spawn_ms > self.spawn_interval_ms {
            let ball = Ball::spawn(&self.params, &mut self.rng);
            self.balls.push(ball);
            self.last_spawn_ms = now_ms;
            self.spawn_interval_ms =
                (self.spawn_interval_ms - self.params.spawn_interval_step_ms).max(self.params.min_spawn_interval_ms);
        }

        self.balls.retain(|b| !b.clicked);
        self.bat.shots_live = self.balls.iter().filter(|b| b.player).count();

        if self.enemy_count() >= self.params.enemy_limit {
            log::info!("catch game over with score {}", self.score);
            self.game_over = true;
            return TickOutcome::GameOver;
        }

        self.update_balls();
        TickOutcome::Running
    }

    fn shoot(&mut self) {
        if self.bat.cooldown > 0 || self.bat.shots_live >= self.params.max_shots {
            return;
        }
        let ball = Ball::shot(&self.params, &self.bat, &mut self.rng);
        self.balls.push(ball);
        self.bat.shots_live += 1;
        self.bat.cooldown = self.params.cooldown_frames;
    }

    fn update_balls(&mut self) {
        let params = &self.params;
        for i in 0..self.balls.len() {
            if self.balls[i].clicked {
                continue;
            }
            let ball = &mut self.balls[i];
            ball.integrate(params);
            if !ball.player && ball.overlaps_bat(&self.bat) {
                ball.deflect_off(&self.bat, params);
            }

            for j in 0..self.balls.len() {
                if j == i || self.balls[j].clicked {
                    continue;
                }
                let (me, other) = pair_mut(&mut self.balls, i, j);
                let dx = other.x - me.x;
                let dy = other.y - me.y;
                let min_dist = me.radius + other.radius;
                if dx.hypot(dy) >= min_dist {
                    continue;
                }
                // Nudge both apart in proportion to the overlap.
                let angle = dy.atan2(dx);
                let ax = (me.x + angle.cos() * min_dist - other.x) * params.separation_gain;
                let ay = (me.y + angle.sin() * min_dist - other.y) * params.separation_gain;
                me.vx -= ax;
                me.vy -= ay;
                other.vx += ax;
                other.vy += ay;

                if me.player && !other.player {
                    other.clicked = true;
                    self.score += 1;
                }
            }
        }
    }

    pub fn params(&self) -> &CatchParams {
        &self.params
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn bat(&self) -> &Bat {
        &self.bat
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn enemy_count(&self) -> usize {
        self.balls.iter().filter(|b| !b.player).count()
    }

    /// Fraction of the shot cooldown still to run, 0 when ready.
    pub fn cooldown_ratio(&self) -> f64 {
        if self.params.cooldown_frames == 0 {
            return 0.0;
        }
        self.bat.cooldown as f64 / self.params.cooldown_frames as f64
    }

    /// Put a ball on the field directly.
    pub fn push_ball(&mut self, ball: Ball) {
        self.balls.push(ball);
    }
}

fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(i, j);
    if i < j {
        let (head, tail) = items.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}
