//! Robot Runner game logic: input, physics, spawning, collision, scoring.
//!
//! One call to `step_session` is one tick. Phases run in a fixed order:
//! physics, spawner (with obstacle movement), collision, scoring.

use super::difficulty;
use super::types::*;
use crate::constants::{GROUND_EPSILON, SPAWN_MARGIN, VIEWPORT_WIDTH};
use rand::Rng;

/// UI-agnostic input actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerInput {
    Jump,  // Space or Up arrow
    Quit,  // Esc or q
    Other, // Any other key
}

/// What an input did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Ignored,
    JumpQueued,
    QuitRequested,
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still running. `scored` is true if the score went up this tick.
    Running { scored: bool },
    /// The player hit `obstacle_id`; the session is over with `score`.
    Collided { obstacle_id: u64, score: u32 },
    /// The session had already ended; nothing changed.
    Stopped,
}

/// Record player intent. Never touches physics directly.
///
/// Jump is only accepted while alive and grounded. Quit is always accepted.
pub fn process_input(session: &mut Session, input: RunnerInput) -> InputOutcome {
    match input {
        RunnerInput::Quit => InputOutcome::QuitRequested,
        RunnerInput::Jump => {
            if session.running
                && session.player.grounded
                && session.player.state != PlayerState::Died
            {
                session.jump_requested = true;
                InputOutcome::JumpQueued
            } else {
                InputOutcome::Ignored
            }
        }
        RunnerInput::Other => InputOutcome::Ignored,
    }
}

/// Advance the session by one tick.
pub fn step_session<R: Rng>(session: &mut Session, rng: &mut R) -> TickOutcome {
    if !session.running {
        return TickOutcome::Stopped;
    }

    apply_physics(session);
    update_spawner(session, rng);
    move_obstacles(session);

    if let Some(obstacle_id) = detect_collision(session) {
        session.player.state = PlayerState::Died;
        session.running = false;
        session.jump_requested = false;
        return TickOutcome::Collided {
            obstacle_id,
            score: session.score,
        };
    }

    let scored = update_score(session);
    TickOutcome::Running { scored }
}

/// Consume jump intent, integrate vertical motion, resolve landing.
pub fn apply_physics(session: &mut Session) {
    let gravity = session.tuning.gravity;
    let jump_force = session.tuning.jump_force;
    let player = &mut session.player;

    if player.state == PlayerState::Died {
        return;
    }

    // Idle only lasts until the first tick
    if player.state == PlayerState::Idle {
        player.state = PlayerState::Run;
    }

    if session.jump_requested {
        session.jump_requested = false;
        if player.grounded {
            player.dy = jump_force;
            player.grounded = false;
            player.state = PlayerState::Jump;
        }
    }

    player.y += player.dy;
    player.dy += gravity;

    let ground_y = player.ground_y();
    if player.y >= ground_y - GROUND_EPSILON {
        player.y = ground_y;
        player.dy = 0.0;
        player.grounded = true;
        if player.state == PlayerState::Jump {
            player.state = PlayerState::Run;
        }
    }
}

/// Count down the spawn timer and spawn when it runs out.
pub fn update_spawner<R: Rng>(session: &mut Session, rng: &mut R) {
    session.spawn_timer = session.spawn_timer.saturating_sub(1);
    if session.spawn_timer <= 0 {
        spawn_obstacle(session, rng);
        session.spawn_timer =
            difficulty::next_spawn_timer(&session.tuning, session.score, session.scroll_speed);
    }
}

/// Add one obstacle of a random kind just past the right edge.
pub fn spawn_obstacle<R: Rng>(session: &mut Session, rng: &mut R) {
    let kind = ObstacleKind::from_roll(rng.gen::<f64>());
    let id = session.next_obstacle_id;
    session.next_obstacle_id += 1;
    session
        .obstacles
        .push(Obstacle::new(id, kind, VIEWPORT_WIDTH + SPAWN_MARGIN));
}

/// Scroll every obstacle left and drop the ones fully past the left edge.
pub fn move_obstacles(session: &mut Session) {
    let speed = session.scroll_speed;
    for obstacle in &mut session.obstacles {
        obstacle.x -= speed;
    }
    session.obstacles.retain(|o| !o.is_off_screen());
}

/// Id of the first obstacle (oldest first) overlapping the player.
pub fn detect_collision(session: &Session) -> Option<u64> {
    let player = session.player.hitbox();
    session
        .obstacles
        .iter()
        .find(|o| player.overlaps(&o.hitbox()))
        .map(|o| o.id)
}

/// Count the tick and award a point every `score_interval_ticks`.
///
/// Returns true if the score changed.
pub fn update_score(session: &mut Session) -> bool {
    session.tick_count += 1;
    if session.tick_count % session.tuning.score_interval_ticks == 0 {
        session.score = session.score.saturating_add(1);
        apply_difficulty(session);
        true
    } else {
        false
    }
}

/// Recompute speed and spawn delay from the current score.
///
/// A countdown longer than the new delay is cut short; a shorter one is left alone.
pub fn apply_difficulty(session: &mut Session) {
    session.scroll_speed = difficulty::scroll_speed(&session.tuning, session.score);
    session.spawn_delay = difficulty::target_spawn_delay(&session.tuning, session.score);
    if session.spawn_timer > session.spawn_delay {
        session.spawn_timer = session.spawn_delay;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn create_test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(12345)
    }

    /// Session with spawning pushed far into the future.
    fn quiet_session() -> Session {
        let mut session = Session::default();
        session.spawn_timer = 10_000;
        session
    }

    fn obstacle_on_player(kind: ObstacleKind) -> Obstacle {
        Obstacle::new(99, kind, PLAYER_X + 10.0)
    }

    // ── Input tests ──

    #[test]
    fn test_jump_queues_when_grounded() {
        let mut session = quiet_session();
        assert_eq!(
            process_input(&mut session, RunnerInput::Jump),
            InputOutcome::JumpQueued
        );
        assert!(session.jump_requested);
        // Intent only: physics untouched until the next tick
        assert!(session.player.grounded);
        assert!((session.player.dy - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_jump_ignored_while_airborne() {
        let mut session = quiet_session();
        session.player.grounded = false;
        assert_eq!(
            process_input(&mut session, RunnerInput::Jump),
            InputOutcome::Ignored
        );
        assert!(!session.jump_requested);
    }

    #[test]
    fn test_jump_ignored_after_death() {
        let mut session = quiet_session();
        session.running = false;
        session.player.state = PlayerState::Died;
        assert_eq!(
            process_input(&mut session, RunnerInput::Jump),
            InputOutcome::Ignored
        );
    }

    #[test]
    fn test_quit_always_accepted() {
        let mut session = quiet_session();
        assert_eq!(
            process_input(&mut session, RunnerInput::Quit),
            InputOutcome::QuitRequested
        );
        session.running = false;
        assert_eq!(
            process_input(&mut session, RunnerInput::Quit),
            InputOutcome::QuitRequested
        );
    }

    #[test]
    fn test_other_input_ignored() {
        let mut session = quiet_session();
        assert_eq!(
            process_input(&mut session, RunnerInput::Other),
            InputOutcome::Ignored
        );
        assert!(!session.jump_requested);
    }

    // ── Physics tests ──

    #[test]
    fn test_first_tick_leaves_idle() {
        let mut session = quiet_session();
        assert_eq!(session.player.state, PlayerState::Idle);
        step_session(&mut session, &mut create_test_rng());
        assert_eq!(session.player.state, PlayerState::Run);
    }

    #[test]
    fn test_grounded_player_stays_put() {
        let mut session = quiet_session();
        let y = session.player.y;
        for _ in 0..10 {
            step_session(&mut session, &mut create_test_rng());
        }
        assert!(session.player.grounded);
        assert!((session.player.y - y).abs() < f64::EPSILON);
        assert!((session.player.dy - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_jump_applies_impulse_next_tick() {
        let mut session = quiet_session();
        process_input(&mut session, RunnerInput::Jump);
        step_session(&mut session, &mut create_test_rng());

        assert_eq!(session.player.state, PlayerState::Jump);
        assert!(!session.player.grounded);
        assert!(!session.jump_requested);
        // y moved by the impulse, then gravity was added
        assert!((session.player.y - (session.player.ground_y() + JUMP_FORCE)).abs() < 1e-9);
        assert!((session.player.dy - (JUMP_FORCE + GRAVITY)).abs() < 1e-9);
    }

    #[test]
    fn test_jump_lands_back_in_run() {
        let mut session = quiet_session();
        process_input(&mut session, RunnerInput::Jump);
        let mut rng = create_test_rng();
        let mut apex = session.player.y;

        for _ in 0..200 {
            step_session(&mut session, &mut rng);
            apex = apex.min(session.player.y);
            if session.player.grounded {
                break;
            }
        }

        assert!(apex < session.player.ground_y());
        assert!(session.player.grounded);
        assert_eq!(session.player.state, PlayerState::Run);
        assert!((session.player.y - session.player.ground_y()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_double_jump() {
        let mut session = quiet_session();
        let mut rng = create_test_rng();
        process_input(&mut session, RunnerInput::Jump);
        step_session(&mut session, &mut rng);

        // Airborne jump requests are refused at input time
        assert_eq!(
            process_input(&mut session, RunnerInput::Jump),
            InputOutcome::Ignored
        );

        // Even a forced request is not honoured mid-air
        session.jump_requested = true;
        let dy_before = session.player.dy;
        step_session(&mut session, &mut rng);
        assert!((session.player.dy - (dy_before + GRAVITY)).abs() < 1e-9);
    }

    #[test]
    fn test_dead_player_does_not_move() {
        let mut session = quiet_session();
        session.player.state = PlayerState::Died;
        session.player.y = 10.0;
        session.player.dy = 3.0;
        session.player.grounded = false;
        apply_physics(&mut session);
        assert!((session.player.y - 10.0).abs() < f64::EPSILON);
        assert!((session.player.dy - 3.0).abs() < f64::EPSILON);
    }

    // ── Spawner tests ──

    #[test]
    fn test_first_tick_spawns() {
        let mut session = Session::default();
        step_session(&mut session, &mut create_test_rng());
        assert_eq!(session.obstacles.len(), 1);
        let ob = &session.obstacles[0];
        // Spawned at width + margin, then moved once
        assert!((ob.x - (VIEWPORT_WIDTH + SPAWN_MARGIN - BASE_SPEED)).abs() < 1e-9);
        assert_eq!(session.spawn_timer, START_SPAWN);
    }

    #[test]
    fn test_spawn_timer_counts_down() {
        let mut session = Session::default();
        session.spawn_timer = 5;
        let mut rng = create_test_rng();
        for expected in (1..5).rev() {
            update_spawner(&mut session, &mut rng);
            assert_eq!(session.spawn_timer, expected);
            assert!(session.obstacles.is_empty());
        }
        update_spawner(&mut session, &mut rng);
        assert_eq!(session.obstacles.len(), 1);
    }

    #[test]
    fn test_obstacle_ids_unique_and_ordered() {
        let mut session = Session::default();
        let mut rng = create_test_rng();
        for _ in 0..5 {
            spawn_obstacle(&mut session, &mut rng);
        }
        let ids: Vec<u64> = session.obstacles.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_kind_distribution_roughly_matches_weights() {
        let mut session = Session::default();
        let mut rng = create_test_rng();
        for _ in 0..10_000 {
            spawn_obstacle(&mut session, &mut rng);
        }
        let count = |kind| session.obstacles.iter().filter(|o| o.kind == kind).count();
        let small = count(ObstacleKind::Small);
        let tall = count(ObstacleKind::Tall);
        let flying = count(ObstacleKind::Flying);
        assert!((6_500..7_500).contains(&small), "small {}", small);
        assert!((2_000..3_000).contains(&tall), "tall {}", tall);
        assert!((200..800).contains(&flying), "flying {}", flying);
    }

    // ── Movement tests ──

    #[test]
    fn test_obstacles_move_left_at_scroll_speed() {
        let mut session = quiet_session();
        session.obstacles.push(Obstacle::new(0, ObstacleKind::Tall, 300.0));
        session.scroll_speed = 7.5;
        move_obstacles(&mut session);
        assert!((session.obstacles[0].x - 292.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_off_screen_obstacles_removed_in_order() {
        let mut session = quiet_session();
        session.obstacles.push(Obstacle::new(0, ObstacleKind::Small, -24.0));
        session.obstacles.push(Obstacle::new(1, ObstacleKind::Small, 50.0));
        session.obstacles.push(Obstacle::new(2, ObstacleKind::Small, 200.0));
        move_obstacles(&mut session);
        let ids: Vec<u64> = session.obstacles.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    // ── Collision tests ──

    #[test]
    fn test_collision_with_ground_obstacle() {
        let mut session = quiet_session();
        session.obstacles.push(obstacle_on_player(ObstacleKind::Small));
        assert_eq!(detect_collision(&session), Some(99));
    }

    #[test]
    fn test_flying_obstacle_clips_standing_head() {
        // Flying spans y 110..128, standing player spans 126..190
        let mut session = quiet_session();
        session.obstacles.push(obstacle_on_player(ObstacleKind::Flying));
        assert!(detect_collision(&session).is_some());
    }

    #[test]
    fn test_jumping_player_clears_small_obstacle() {
        let mut session = quiet_session();
        session.player.y = 50.0;
        session.player.grounded = false;
        session.obstacles.push(obstacle_on_player(ObstacleKind::Small));
        assert_eq!(detect_collision(&session), None);
    }

    #[test]
    fn test_no_collision_horizontal_miss() {
        let mut session = quiet_session();
        session
            .obstacles
            .push(Obstacle::new(0, ObstacleKind::Tall, PLAYER_X + PLAYER_WIDTH));
        assert_eq!(detect_collision(&session), None);
    }

    #[test]
    fn test_first_overlap_in_creation_order_wins() {
        let mut session = quiet_session();
        session.obstacles.push(Obstacle::new(3, ObstacleKind::Tall, PLAYER_X));
        session.obstacles.push(Obstacle::new(4, ObstacleKind::Small, PLAYER_X));
        assert_eq!(detect_collision(&session), Some(3));
    }

    #[test]
    fn test_collision_ends_session() {
        let mut session = quiet_session();
        session.score = 4;
        // Placed so it still overlaps after one tick of movement
        session
            .obstacles
            .push(Obstacle::new(7, ObstacleKind::Small, PLAYER_X + 20.0));

        let outcome = step_session(&mut session, &mut create_test_rng());

        assert_eq!(
            outcome,
            TickOutcome::Collided {
                obstacle_id: 7,
                score: 4
            }
        );
        assert!(!session.running);
        assert_eq!(session.player.state, PlayerState::Died);
    }

    #[test]
    fn test_stopped_session_is_frozen() {
        let mut session = quiet_session();
        session.obstacles.push(Obstacle::new(0, ObstacleKind::Small, 300.0));
        session.running = false;
        let before_x = session.obstacles[0].x;
        let before_ticks = session.tick_count;

        assert_eq!(
            step_session(&mut session, &mut create_test_rng()),
            TickOutcome::Stopped
        );
        assert!((session.obstacles[0].x - before_x).abs() < f64::EPSILON);
        assert_eq!(session.tick_count, before_ticks);
    }

    // ── Scoring and difficulty tests ──

    #[test]
    fn test_score_every_interval() {
        let mut session = quiet_session();
        let mut rng = create_test_rng();
        for _ in 0..89 {
            step_session(&mut session, &mut rng);
        }
        assert_eq!(session.score, 0);
        assert_eq!(
            step_session(&mut session, &mut rng),
            TickOutcome::Running { scored: true }
        );
        assert_eq!(session.score, 1);
    }

    #[test]
    fn test_score_raises_speed() {
        let mut session = quiet_session();
        session.tick_count = SCORE_INTERVAL_TICKS - 1;
        assert!(update_score(&mut session));
        assert!((session.scroll_speed - (BASE_SPEED + SPEED_PER_POINT)).abs() < 1e-9);
        assert_eq!(session.spawn_delay, START_SPAWN - 1);
    }

    #[test]
    fn test_difficulty_clamps_long_countdown_down() {
        let mut session = quiet_session();
        session.score = 30;
        session.spawn_timer = 85;
        apply_difficulty(&mut session);
        assert_eq!(session.spawn_delay, 60);
        assert_eq!(session.spawn_timer, 60);
    }

    #[test]
    fn test_difficulty_never_lengthens_short_countdown() {
        let mut session = quiet_session();
        session.score = 30;
        session.spawn_timer = 12;
        apply_difficulty(&mut session);
        assert_eq!(session.spawn_timer, 12);
    }

    #[test]
    fn test_difficulty_follows_current_score_only() {
        let mut session = quiet_session();
        session.score = 50;
        apply_difficulty(&mut session);
        assert!(session.scroll_speed > BASE_SPEED);

        session.score = 0;
        apply_difficulty(&mut session);
        assert!((session.scroll_speed - BASE_SPEED).abs() < f64::EPSILON);
        assert_eq!(session.spawn_delay, START_SPAWN);
    }
}
