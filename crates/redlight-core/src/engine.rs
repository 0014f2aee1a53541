//! Round engine - main entry point for running one round of the freeze game.
//!
//! `RoundEngine::new` assembles the corridor and populates the scene world;
//! `update` is called once per rendered frame. All mutation happens inside
//! `update` on the calling thread: trigger callbacks only queue messages,
//! which are drained at the start of the next tick. The observation
//! director and the tension meter run on unscaled delta time so pausing or
//! slowing simulation time never freezes the horror direction.

use hecs::World;
use rand::rngs::StdRng;
use rand::SeedableRng;

use redlight_logic::builder::{assemble_layout, AssemblyError, CorridorChain};
use redlight_logic::modules::ModuleKind;
use redlight_logic::observation::{
    ExitDecision, ObservationDirector, Outcome, Phase, PhaseEvent,
};
use redlight_logic::tension::TensionMeter;

use crate::components::{
    FlickerLight, Module, Placement, Player, TriggerKind, TriggerVolume,
};
use crate::events::{RoundEvent, TriggerMsg};
use crate::scene::SceneContext;

/// Delay before reloading the scene when no jumpscare rig exists.
const FALLBACK_RELOAD_DELAY: f32 = 2.5;
/// Flicker burst length when a watching window opens.
const WATCH_FLICKER_SECS: f32 = 0.6;
/// Smallest tension change worth reporting to the overlay.
const TENSION_EPSILON: f32 = 0.005;

/// Per-frame player state from the host's locomotion provider.
#[derive(Debug, Clone, Copy)]
pub struct PlayerInput {
    pub x: f32,
    pub z: f32,
}

/// One round of the freeze game.
pub struct RoundEngine {
    /// ECS world containing modules, player, triggers, and lights.
    pub world: World,
    scene: SceneContext,
    chain: CorridorChain,
    director: ObservationDirector,
    tension: TensionMeter,
    player: hecs::Entity,
    rng: StdRng,

    // Clocks
    sim_time: f64,
    real_time: f64,
    time_scale: f32,

    // Tick state
    inbound: Vec<TriggerMsg>,
    stinger_timer: f32,
    last_reported_tension: f32,
    reload_timer: Option<f32>,
    reload_fired: bool,
}

impl RoundEngine {
    /// Assemble the corridor and build the scene world.
    ///
    /// Configuration errors (bad layout, missing prototype) are fatal —
    /// no partial scene is ever constructed.
    pub fn new(scene: SceneContext) -> Result<Self, AssemblyError> {
        let chain = assemble_layout(&scene.layout, &scene.catalog, &scene.assembly)?;
        let mut world = World::new();

        for m in &chain.modules {
            world.spawn((
                Placement { pose: m.pose },
                Module {
                    index: m.index,
                    kind: m.kind,
                    length: m.length,
                    width: m.width,
                },
                FlickerLight::new(1.0),
            ));

            // Doorways double as scare beats.
            if m.kind == ModuleKind::Doorway {
                world.spawn((TriggerVolume::new(
                    TriggerKind::ScareZone,
                    m.pose.x,
                    m.pose.z,
                    m.width / 2.0,
                    m.length / 2.0,
                ),));
            }
        }

        // Exit gate at the far end of the chain.
        if let Some(end) = chain.end_pose() {
            world.spawn((TriggerVolume::new(
                TriggerKind::ExitGate,
                end.x,
                end.z,
                1.5,
                1.5,
            ),));
        }

        let start = chain.start_pose().unwrap_or(scene.assembly.origin);
        let player = world.spawn((
            Placement { pose: start },
            Player {
                prev_x: start.x,
                prev_z: start.z,
                speed: 0.0,
            },
        ));

        let mut rng = StdRng::seed_from_u64(scene.seed);
        let director = ObservationDirector::new(scene.observation, &mut rng);
        let tension = TensionMeter::new(scene.tension);
        let stinger_timer = tension.stinger_interval();
        let last_reported_tension = tension.value();

        Ok(Self {
            world,
            scene,
            chain,
            director,
            tension,
            player,
            rng,
            sim_time: 0.0,
            real_time: 0.0,
            time_scale: 1.0,
            inbound: Vec::new(),
            stinger_timer,
            last_reported_tension,
            reload_timer: None,
            reload_fired: false,
        })
    }

    /// Queue a trigger message from a host callback. Processed at the
    /// start of the next tick, never immediately.
    pub fn queue_trigger(&mut self, msg: TriggerMsg) {
        self.inbound.push(msg);
    }

    /// Advance the round by one frame.
    pub fn update(&mut self, dt: f32, input: PlayerInput) -> Vec<RoundEvent> {
        let dt = dt.max(0.0);
        let scaled_dt = dt * self.time_scale;
        self.real_time += dt as f64;
        self.sim_time += scaled_dt as f64;

        let mut events = Vec::new();

        // 1. Messages queued since the last tick.
        let msgs = std::mem::take(&mut self.inbound);
        for msg in msgs {
            self.handle_trigger(msg, &mut events);
        }

        // 2. Locomotion sample from the host-supplied position.
        let speed = self.update_player(dt, input);

        // 3. Observation director, unscaled time.
        if !self.director.is_ended() {
            let phase_events = self.director.step(dt, speed, &mut self.rng);
            for pe in phase_events {
                self.apply_phase_event(pe, &mut events);
            }
        }

        // 4. Tension, unscaled time.
        let progress = self.chain.progress(input.x, input.z);
        let value = self
            .tension
            .update(dt, progress, self.director.is_watching());
        if (value - self.last_reported_tension).abs() > TENSION_EPSILON {
            self.last_reported_tension = value;
            events.push(RoundEvent::TensionChanged(value));
        }

        // 5. Stinger cadence, quiet once the round is over.
        if !self.director.is_ended() {
            self.stinger_timer -= dt;
            if self.stinger_timer <= 0.0 {
                events.push(RoundEvent::StingerFired);
                self.stinger_timer = self.tension.stinger_interval();
            }
        }

        // 6. Scene-side effects run on scaled time.
        for (_, light) in self.world.query_mut::<&mut FlickerLight>() {
            light.update(scaled_dt);
        }

        // 7. Edge-triggered volume detection feeds the next tick's queue.
        self.detect_triggers(input.x, input.z);

        // 8. Delayed reload; checks the terminal flag before firing.
        if let Some(remaining) = self.reload_timer.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 && !self.reload_fired && self.director.is_ended() {
                self.reload_fired = true;
                events.push(RoundEvent::SceneReloadRequested {
                    scene: self.scene.scene_name.clone(),
                    delay_secs: 0.0,
                });
            }
        }

        events
    }

    fn handle_trigger(&mut self, msg: TriggerMsg, events: &mut Vec<RoundEvent>) {
        // Messages that arrive after the round ended are observed and dropped.
        if self.director.is_ended() {
            return;
        }
        match msg {
            TriggerMsg::ReachedExit => match self.director.on_reached_exit() {
                ExitDecision::Accepted => {
                    events.push(RoundEvent::PhaseChanged(Phase::Ended(Outcome::Win)));
                    events.push(RoundEvent::RoundEnded(Outcome::Win));
                    self.push_hud_status(events);
                }
                ExitDecision::Rejected {
                    collected,
                    required,
                } => {
                    events.push(RoundEvent::ExitRejected {
                        collected,
                        required,
                    });
                    self.push_hud_status(events);
                }
            },
            TriggerMsg::EnteredScareZone => {
                self.burst_lights(events);
                // Pull the next stinger in close behind the scare.
                self.stinger_timer = self.stinger_timer.min(1.0);
            }
        }
    }

    fn apply_phase_event(&mut self, pe: PhaseEvent, events: &mut Vec<RoundEvent>) {
        match pe {
            PhaseEvent::PhaseChanged(phase) => {
                events.push(RoundEvent::PhaseChanged(phase));
                if phase == Phase::Watching {
                    self.burst_lights(events);
                }
                self.push_hud_status(events);
            }
            PhaseEvent::SampleCollected { total } => {
                events.push(RoundEvent::SampleCollected { total });
                self.push_hud_status(events);
            }
            PhaseEvent::ViolationDetected { .. } => {
                // The failure itself arrives as RoundEnded(Fail).
            }
            PhaseEvent::RoundEnded(outcome) => {
                events.push(RoundEvent::RoundEnded(outcome));
                if outcome == Outcome::Fail {
                    match self.scene.jumpscare {
                        Some(rig) => {
                            events.push(RoundEvent::JumpscareStarted);
                            self.reload_timer = Some(rig.duration_secs);
                        }
                        None => {
                            self.reload_timer = Some(FALLBACK_RELOAD_DELAY);
                        }
                    }
                }
            }
        }
    }

    fn update_player(&mut self, dt: f32, input: PlayerInput) -> f32 {
        let mut speed = 0.0;
        if let Ok(mut query) = self
            .world
            .query_one::<(&mut Player, &mut Placement)>(self.player)
        {
            if let Some((player, placement)) = query.get() {
                if dt > 0.0 {
                    let dx = input.x - player.prev_x;
                    let dz = input.z - player.prev_z;
                    player.speed = (dx * dx + dz * dz).sqrt() / dt;
                }
                player.prev_x = input.x;
                player.prev_z = input.z;
                placement.pose.x = input.x;
                placement.pose.z = input.z;
                speed = player.speed;
            }
        }
        speed
    }

    fn detect_triggers(&mut self, x: f32, z: f32) {
        for (_, trigger) in self.world.query_mut::<&mut TriggerVolume>() {
            let inside = trigger.contains(x, z);
            if inside && !trigger.occupied {
                let msg = match trigger.kind {
                    TriggerKind::ExitGate => TriggerMsg::ReachedExit,
                    TriggerKind::ScareZone => TriggerMsg::EnteredScareZone,
                };
                self.inbound.push(msg);
            }
            trigger.occupied = inside;
        }
    }

    fn burst_lights(&mut self, events: &mut Vec<RoundEvent>) {
        for (_, light) in self.world.query_mut::<&mut FlickerLight>() {
            light.burst(WATCH_FLICKER_SECS);
        }
        events.push(RoundEvent::FlickerBurst);
    }

    fn push_hud_status(&self, events: &mut Vec<RoundEvent>) {
        if !self.scene.hud {
            return;
        }
        let label = match self.director.phase() {
            Phase::FreeMove => "MOVE",
            Phase::Watching => "DON'T MOVE",
            Phase::Ended(Outcome::Win) => "ESCAPED",
            Phase::Ended(Outcome::Fail) => "CAUGHT",
        };
        events.push(RoundEvent::HudStatus {
            line: format!(
                "{} - samples {}/{}",
                label,
                self.director.collected_samples(),
                self.director.config().required_samples
            ),
        });
    }

    /// Set time scale (1.0 = real-time). Director and tension are
    /// unaffected by design — only scene-side effects scale.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Scaled simulation time in seconds.
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Wall-clock time the round has been running, seconds.
    pub fn real_time(&self) -> f64 {
        self.real_time
    }

    pub fn phase(&self) -> Phase {
        self.director.phase()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.director.outcome()
    }

    pub fn tension(&self) -> f32 {
        self.tension.value()
    }

    pub fn collected_samples(&self) -> u32 {
        self.director.collected_samples()
    }

    pub fn chain(&self) -> &CorridorChain {
        &self.chain
    }

    pub fn scene(&self) -> &SceneContext {
        &self.scene
    }

    /// Count placed corridor modules in the world.
    pub fn module_count(&self) -> usize {
        self.world.query::<&Module>().iter().count()
    }

    /// Corridor progress of the player, in [0, 1].
    pub fn player_progress(&self) -> f32 {
        if let Ok(mut query) = self.world.query_one::<&Player>(self.player) {
            if let Some(player) = query.get() {
                return self.chain.progress(player.prev_x, player.prev_z);
            }
        }
        0.0
    }

    pub(crate) fn snapshot_parts(
        &self,
    ) -> (
        &SceneContext,
        &CorridorChain,
        &ObservationDirector,
        &TensionMeter,
    ) {
        (&self.scene, &self.chain, &self.director, &self.tension)
    }

    pub(crate) fn restore(
        scene: SceneContext,
        chain: CorridorChain,
        director: ObservationDirector,
        tension: TensionMeter,
        clocks: RestoredClocks,
    ) -> Result<Self, AssemblyError> {
        // Rebuild the world from the restored chain, then overwrite the
        // derived state with the snapshot's.
        let mut engine = Self::new(scene)?;
        engine.chain = chain;
        engine.director = director;
        engine.stinger_timer = tension.stinger_interval();
        engine.last_reported_tension = tension.value();
        engine.tension = tension;
        engine.sim_time = clocks.sim_time;
        engine.real_time = clocks.real_time;
        engine.time_scale = clocks.time_scale;
        engine.reload_timer = clocks.reload_timer;
        engine.reload_fired = clocks.reload_fired;
        Ok(engine)
    }

    pub(crate) fn clocks(&self) -> RestoredClocks {
        RestoredClocks {
            sim_time: self.sim_time,
            real_time: self.real_time,
            time_scale: self.time_scale,
            reload_timer: self.reload_timer,
            reload_fired: self.reload_fired,
        }
    }
}

/// Clock and callback state carried through a snapshot.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RestoredClocks {
    pub sim_time: f64,
    pub real_time: f64,
    pub time_scale: f32,
    pub reload_timer: Option<f32>,
    pub reload_fired: bool,
}
