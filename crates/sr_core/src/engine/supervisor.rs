//! Match Supervisor
//!
//! The tick dispatcher: owns all match state (arena index, victim registry,
//! robot records, clock, inbound mailbox) and evaluates one pass per fixed
//! simulation tick. Ordering within a tick is fixed and significant:
//! checkpoints, swamps, telemetry/exit, victim identification, stall
//! relocation, operator command, outbound update, end check, clock advance.
//!
//! The supervisor runs on a single logical thread; external collaborators
//! (telemetry provider, controller host, status sink) are passed by mutable
//! reference into each call rather than held globally.

use crate::error::ConfigError;
use crate::models::{ArenaConfig, ArenaIndex, Vec3, VictimRegistry};
use crate::report;

use super::clock::MatchClock;
use super::commands::{
    extract_robot_name, ControllerHost, OperatorCommand, StatusSink, StatusUpdate,
};
use super::constants::{
    DEFAULT_MAX_SPEED, IDENT_HOLD_SECONDS, RELOCATE_Y_OFFSET, STALL_RELOCATE_SECONDS,
    SWAMP_MAX_SPEED,
};
use super::robot::RobotState;
use super::scoring::{
    apply_delta, exit_completion_bonus, score_event, CHECKPOINT_AWARD, EXIT_AWARD,
    LACK_OF_PROGRESS_PENALTY, MISIDENTIFICATION_PENALTY, TYPE_MATCH_BONUS,
};
use super::telemetry::{decode_packet, RobotId, TelemetryMailbox, TelemetryProvider, ROBOT_COUNT};

/// Lateral offset from the start-zone center used at robot insertion, so
/// two robots never spawn on the same spot.
const SPAWN_X_OFFSET: f64 = 0.05;

pub struct MatchSupervisor {
    config: ArenaConfig,
    arena: ArenaIndex,
    victims: VictimRegistry,
    clock: MatchClock,
    robots: [RobotState; ROBOT_COUNT],
    mailbox: TelemetryMailbox,
    /// Set by the first `run`; controller loading is refused afterwards.
    started: bool,
    finished: bool,
    terminate_requested: bool,
    pending_report: Option<String>,
}

impl MatchSupervisor {
    pub fn new(config: ArenaConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let arena = config.build_arena();
        let victims = config.build_victims();
        let robots = Self::build_robots(&arena);

        Ok(Self {
            config,
            arena,
            victims,
            clock: MatchClock::new(),
            robots,
            mailbox: TelemetryMailbox::default(),
            started: false,
            finished: false,
            terminate_requested: false,
            pending_report: None,
        })
    }

    /// Fresh robot records with the start zone pre-seeded: already visited
    /// (no credit for the start tile) and the initial relocation target.
    fn build_robots(arena: &ArenaIndex) -> [RobotState; ROBOT_COUNT] {
        let mut robots = [RobotState::new(), RobotState::new()];
        if let Some((id, zone)) = arena.first_start_zone() {
            for robot in &mut robots {
                robot.assign_start_zone(id, zone.center);
            }
        }
        robots
    }

    /// Announce the operator channel is live. Sent once after construction
    /// and again after a reset reinitializes the world.
    pub fn startup(&self, sink: &mut dyn StatusSink) {
        sink.send(StatusUpdate::Startup);
    }

    /// Insert a robot into the simulation, slightly offset from the
    /// start-zone center so the two robots never overlap.
    pub fn add_robot(
        &mut self,
        robot: RobotId,
        telemetry: &mut dyn TelemetryProvider,
        sink: &mut dyn StatusSink,
    ) {
        if robot >= ROBOT_COUNT || self.robots[robot].present {
            return;
        }
        self.robots[robot].present = true;

        if let Some(id) = self.robots[robot].start_zone {
            let center = self.arena.zone(id).center;
            let side = if robot == 0 { -SPAWN_X_OFFSET } else { SPAWN_X_OFFSET };
            telemetry.set_position(robot, Vec3::new(center.x + side, center.y, center.z));
        }
        sink.send(StatusUpdate::RobotInSimulation { robot });
        log::info!("robot {} entered the simulation", robot);
    }

    /// Queue a raw telemetry packet. Single-slot: a newer packet replaces
    /// an unread one.
    pub fn post_packet(&mut self, packet: &[u8]) {
        self.mailbox.post(packet);
    }

    /// External terminate signal; the next step emits `ended`.
    pub fn terminate(&mut self) {
        self.terminate_requested = true;
    }

    /// One evaluation pass over `frame_delta` seconds of simulated time.
    pub fn step(
        &mut self,
        frame_delta: f64,
        telemetry: &mut dyn TelemetryProvider,
        host: &mut dyn ControllerHost,
        sink: &mut dyn StatusSink,
        command: Option<&str>,
    ) {
        if !self.finished {
            self.update_stall_trackers(frame_delta, telemetry);
            self.checkpoint_pass(telemetry, sink);
            self.swamp_pass(telemetry, sink);
            self.telemetry_pass(telemetry, sink);
            self.victim_pass(telemetry, sink);
            self.stall_pass(telemetry, sink);
        }

        if let Some(line) = command {
            self.handle_command(line, telemetry, host, sink);
        }

        sink.send(StatusUpdate::Update {
            score0: self.robots[0].score(),
            score1: self.robots[1].score(),
            elapsed: self.clock.elapsed(),
        });

        if !self.finished && (self.clock.is_expired() || self.terminate_requested) {
            self.finished = true;
            self.pending_report = Some(report::render(&self.robots[0]));
            sink.send(StatusUpdate::Ended);
            log::info!("match ended at {:.1}s", self.clock.elapsed());
        }

        if !self.finished {
            self.clock.tick(frame_delta);
        }
    }

    // ------------------------------------------------------------------
    // Per-tick evaluation passes
    // ------------------------------------------------------------------

    /// Stall time is simulated continuous time; it only advances while the
    /// match clock runs (the external simulation is frozen otherwise).
    fn update_stall_trackers(&mut self, frame_delta: f64, telemetry: &dyn TelemetryProvider) {
        let dt = if self.clock.is_running() { frame_delta } else { 0.0 };
        for i in 0..ROBOT_COUNT {
            if self.robots[i].present {
                let velocity = telemetry.velocity(i);
                self.robots[i].stall.update(velocity, dt);
            }
        }
    }

    fn checkpoint_pass(&mut self, telemetry: &dyn TelemetryProvider, sink: &mut dyn StatusSink) {
        for i in 0..ROBOT_COUNT {
            if !self.robots[i].present {
                continue;
            }
            let pos = telemetry.position(i);
            match self.arena.checkpoint_containing(pos) {
                Some((id, zone)) => {
                    self.robots[i].in_checkpoint = true;
                    self.robots[i].last_checkpoint = zone.center;
                    // Credited at most once per match, by zone identity.
                    if self.robots[i].visited_zones.insert(id) {
                        let remaining = self.clock.remaining_mmss();
                        score_event(
                            &mut self.robots[i],
                            CHECKPOINT_AWARD,
                            "Found checkpoint  +10",
                            &remaining,
                        );
                        self.broadcast_history(sink);
                    }
                }
                None => self.robots[i].in_checkpoint = false,
            }
        }
    }

    fn swamp_pass(&mut self, telemetry: &mut dyn TelemetryProvider, sink: &mut dyn StatusSink) {
        for i in 0..ROBOT_COUNT {
            if !self.robots[i].present {
                continue;
            }
            let pos = telemetry.position(i);
            let in_swamp = self.arena.swamp_containing(pos).is_some();
            if in_swamp == self.robots[i].in_swamp {
                continue;
            }
            self.robots[i].in_swamp = in_swamp;
            if in_swamp {
                telemetry.set_speed_cap(i, SWAMP_MAX_SPEED);
                let remaining = self.clock.remaining_mmss();
                self.robots[i].history.push("Entered swamp", &remaining);
                self.broadcast_history(sink);
            } else {
                // No history entry on exit; only the cap is restored.
                telemetry.set_speed_cap(i, DEFAULT_MAX_SPEED);
            }
        }
    }

    /// Decode the pending packet (if any) into the target robot's message
    /// slot, then handle exit intent.
    fn telemetry_pass(&mut self, telemetry: &mut dyn TelemetryProvider, sink: &mut dyn StatusSink) {
        if let Some(raw) = self.mailbox.take() {
            match decode_packet(&raw) {
                Some(msg) if self.robots[msg.robot_id].present => {
                    let robot_id = msg.robot_id;
                    self.robots[robot_id].pending_message = Some(msg);
                }
                Some(msg) => {
                    log::debug!("dropping packet for absent robot {}", msg.robot_id);
                }
                None => log::debug!("dropping malformed telemetry packet"),
            }
        }

        for i in 0..ROBOT_COUNT {
            if !self.robots[i].present {
                continue;
            }
            let is_exit =
                self.robots[i].pending_message.as_ref().is_some_and(|m| m.is_exit());
            if !is_exit {
                continue;
            }
            // The exit message is consumed whether or not it succeeds.
            self.robots[i].take_message();

            let pos = telemetry.position(i);
            let in_start = self.robots[i]
                .start_zone
                .is_some_and(|id| self.arena.zone(id).contains(pos));
            if in_start {
                self.quit_robot(i, false, telemetry, sink);
                apply_delta(&mut self.robots[i], EXIT_AWARD);
                let bonus = exit_completion_bonus(self.robots[i].score());
                apply_delta(&mut self.robots[i], bonus);
            }
            // Outside the start zone the request is silently dropped.
        }
    }

    fn victim_pass(&mut self, telemetry: &dyn TelemetryProvider, sink: &mut dyn StatusSink) {
        for i in 0..ROBOT_COUNT {
            if !self.robots[i].present
                || self.robots[i].stall.duration() < IDENT_HOLD_SECONDS
                || self.robots[i].pending_message.is_none()
            {
                continue;
            }
            // Consumed unconditionally once eligible, matched or not.
            let msg = match self.robots[i].take_message() {
                Some(msg) => msg,
                None => continue,
            };

            let pos = telemetry.position(i);
            let remaining = self.clock.remaining_mmss();
            let mut dirty = false;
            // At most one misidentification penalty per tick, however many
            // unidentified victims happen to be in range.
            let mut penalized = false;

            for victim in self.victims.iter_mut() {
                if victim.identified || !victim.within_radius(pos) {
                    continue;
                }
                if victim.within_radius(msg.estimate) {
                    if victim.on_visible_side(pos) {
                        if victim.kind.matches_code(msg.type_code) {
                            score_event(
                                &mut self.robots[i],
                                TYPE_MATCH_BONUS,
                                "Successful Victim Type Correct Bonus  + 10",
                                &remaining,
                            );
                        }
                        score_event(
                            &mut self.robots[i],
                            victim.score_value,
                            &format!(
                                "Successful Victim Identification  +{}",
                                victim.score_value
                            ),
                            &remaining,
                        );
                        victim.identified = true;
                        dirty = true;
                    }
                } else if !penalized {
                    score_event(
                        &mut self.robots[i],
                        MISIDENTIFICATION_PENALTY,
                        "Misidentification of victim  - 5",
                        &remaining,
                    );
                    penalized = true;
                    dirty = true;
                }
            }

            if dirty {
                self.broadcast_history(sink);
            }
        }
    }

    fn stall_pass(&mut self, telemetry: &mut dyn TelemetryProvider, sink: &mut dyn StatusSink) {
        for i in 0..ROBOT_COUNT {
            if self.robots[i].present
                && self.robots[i].stall.duration() >= STALL_RELOCATE_SECONDS
            {
                self.relocate(i, telemetry, sink);
                self.robots[i].stall.reset();
            }
        }
    }

    // ------------------------------------------------------------------
    // Operator commands
    // ------------------------------------------------------------------

    fn handle_command(
        &mut self,
        line: &str,
        telemetry: &mut dyn TelemetryProvider,
        host: &mut dyn ControllerHost,
        sink: &mut dyn StatusSink,
    ) {
        let command = match OperatorCommand::parse(line) {
            Some(command) => command,
            None => {
                log::debug!("ignoring unknown operator command: {:?}", line);
                return;
            }
        };

        // After the terminal state only reset is honored; housekeeping
        // ticks must not mutate score or history.
        if self.finished && command != OperatorCommand::Reset {
            return;
        }

        match command {
            OperatorCommand::Run => {
                self.clock.start();
                self.started = true;
            }
            OperatorCommand::Pause => self.clock.pause(),
            OperatorCommand::Reset => self.reset(host, sink),
            OperatorCommand::LoadController { robot, source } => {
                if self.started {
                    log::info!("controllers must be chosen before the match starts");
                    return;
                }
                host.load(robot, &source);
                let name = extract_robot_name(&source);
                if let Some(name) = &name {
                    self.robots[robot].name = name.clone();
                }
                sink.send(StatusUpdate::Loaded {
                    robot,
                    name: name.unwrap_or_else(|| "None".to_string()),
                });
            }
            OperatorCommand::UnloadController { robot } => {
                if !self.started {
                    host.unload(robot);
                    sink.send(StatusUpdate::Unloaded { robot });
                }
            }
            OperatorCommand::Relocate { robot } => {
                if self.robots[robot].present {
                    self.relocate(robot, telemetry, sink);
                }
            }
            OperatorCommand::Quit { robot } => {
                if self.started {
                    self.quit_robot(robot, true, telemetry, sink);
                }
            }
        }
    }

    /// Halt evaluation, flush the report, and rebuild the world from the
    /// original configuration. Robots re-enter via `add_robot`.
    fn reset(&mut self, host: &mut dyn ControllerHost, sink: &mut dyn StatusSink) {
        log::info!("match reset");
        self.pending_report = Some(report::render(&self.robots[0]));

        host.unload(0);
        host.unload(1);

        self.victims.reset_identified();
        self.robots = Self::build_robots(&self.arena);
        self.clock = MatchClock::new();
        self.mailbox.clear();
        self.started = false;
        self.finished = false;
        self.terminate_requested = false;

        self.startup(sink);
    }

    // ------------------------------------------------------------------
    // Shared event routines
    // ------------------------------------------------------------------

    /// Put the robot back on its last checkpoint with a canonical heading,
    /// at the fixed floor height, and apply the penalty.
    fn relocate(
        &mut self,
        robot: RobotId,
        telemetry: &mut dyn TelemetryProvider,
        sink: &mut dyn StatusSink,
    ) {
        let target = self.robots[robot].last_checkpoint;
        telemetry.set_position(robot, Vec3::new(target.x, RELOCATE_Y_OFFSET, target.z));
        telemetry.set_rotation_yaw(robot, 0.0);

        let remaining = self.clock.remaining_mmss();
        self.robots[robot].history.push("Lack of Progress - 5", &remaining);
        self.robots[robot].history.push("Relocating to checkpoint", &remaining);
        apply_delta(&mut self.robots[robot], LACK_OF_PROGRESS_PENALTY);
        self.broadcast_history(sink);
    }

    /// Remove a robot from the simulation. `manual` distinguishes an
    /// operator-initiated quit from a telemetry-initiated exit.
    fn quit_robot(
        &mut self,
        robot: RobotId,
        manual: bool,
        telemetry: &mut dyn TelemetryProvider,
        sink: &mut dyn StatusSink,
    ) {
        if !self.robots[robot].present {
            return;
        }
        telemetry.remove(robot);
        self.robots[robot].present = false;

        let remaining = self.clock.remaining_mmss();
        let text = if manual { "Manual Exit" } else { "Successful Exit" };
        self.robots[robot].history.push(text, &remaining);

        sink.send(StatusUpdate::RobotNotInSimulation { robot });
        self.broadcast_history(sink);
        log::info!("robot {} left the simulation ({})", robot, text);
    }

    fn broadcast_history(&self, sink: &mut dyn StatusSink) {
        sink.send(StatusUpdate::HistoryUpdate {
            feeds: [self.robots[0].history.recent.to_csv(), self.robots[1].history.recent.to_csv()],
        });
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn robot(&self, robot: RobotId) -> &RobotState {
        &self.robots[robot]
    }

    pub fn victims(&self) -> &VictimRegistry {
        &self.victims
    }

    pub fn clock(&self) -> &MatchClock {
        &self.clock
    }

    pub fn arena(&self) -> &ArenaIndex {
        &self.arena
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Report text produced by the latest reset or match end, if any.
    /// Persisting it is the caller's concern.
    pub fn take_report(&mut self) -> Option<String> {
        self.pending_report.take()
    }

    /// Render the robot-0 report for the current state on demand.
    pub fn render_report(&self) -> String {
        report::render(&self.robots[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::ZoneConfig;
    use crate::models::ZoneKind;

    #[derive(Default)]
    struct FixedTelemetry {
        positions: [Vec3; ROBOT_COUNT],
        removed: [bool; ROBOT_COUNT],
    }

    impl TelemetryProvider for FixedTelemetry {
        fn position(&self, robot: RobotId) -> Vec3 {
            self.positions[robot]
        }
        fn set_position(&mut self, robot: RobotId, pos: Vec3) {
            self.positions[robot] = pos;
        }
        fn set_rotation_yaw(&mut self, _robot: RobotId, _yaw: f64) {}
        fn velocity(&self, _robot: RobotId) -> Vec3 {
            Vec3::default()
        }
        fn set_speed_cap(&mut self, _robot: RobotId, _cap: f64) {}
        fn remove(&mut self, robot: RobotId) {
            self.removed[robot] = true;
        }
    }

    fn start_only_config() -> ArenaConfig {
        ArenaConfig {
            schema_version: 1,
            zones: vec![ZoneConfig {
                kind: ZoneKind::Start,
                min: (-0.5, -0.5),
                max: (0.5, 0.5),
                center_y: 0.0,
            }],
            victims: Vec::new(),
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = start_only_config();
        config.zones.clear();
        assert!(MatchSupervisor::new(config).is_err());
    }

    #[test]
    fn test_robots_spawn_offset_from_start_center() {
        let mut supervisor = MatchSupervisor::new(start_only_config()).unwrap();
        let mut telemetry = FixedTelemetry::default();
        let mut sink: Vec<StatusUpdate> = Vec::new();

        supervisor.add_robot(0, &mut telemetry, &mut sink);
        supervisor.add_robot(1, &mut telemetry, &mut sink);

        assert_eq!(telemetry.positions[0].x, -SPAWN_X_OFFSET);
        assert_eq!(telemetry.positions[1].x, SPAWN_X_OFFSET);
        assert_ne!(telemetry.positions[0].x, telemetry.positions[1].x);
    }

    #[test]
    fn test_add_robot_is_idempotent() {
        let mut supervisor = MatchSupervisor::new(start_only_config()).unwrap();
        let mut telemetry = FixedTelemetry::default();
        let mut sink: Vec<StatusUpdate> = Vec::new();

        supervisor.add_robot(0, &mut telemetry, &mut sink);
        supervisor.add_robot(0, &mut telemetry, &mut sink);
        supervisor.add_robot(9, &mut telemetry, &mut sink);

        let entries = sink
            .iter()
            .filter(|u| matches!(u, StatusUpdate::RobotInSimulation { .. }))
            .count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_terminate_signal_ends_match_once() {
        let mut supervisor = MatchSupervisor::new(start_only_config()).unwrap();
        let mut telemetry = FixedTelemetry::default();
        let mut host = super::super::commands::NullControllerHost;
        let mut sink: Vec<StatusUpdate> = Vec::new();

        supervisor.terminate();
        supervisor.step(0.032, &mut telemetry, &mut host, &mut sink, None);
        supervisor.step(0.032, &mut telemetry, &mut host, &mut sink, None);

        let ended = sink.iter().filter(|u| matches!(u, StatusUpdate::Ended)).count();
        assert_eq!(ended, 1);
        assert!(supervisor.is_finished());
        assert!(supervisor.take_report().is_some());
        assert!(supervisor.take_report().is_none());
    }
}
