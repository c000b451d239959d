use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::json;

use crate::config::{BreakpointReference, GridConfig, ResolvedConfig};
use crate::error::Result;
use crate::layout::{LayoutPass, TrackPlan, plan_tracks};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv, json_str};
use crate::metrics::PassMetrics;
use crate::registry::StyleRegistry;
use crate::surface::{ElementId, Measurement, PositionStyle, Surface, SurfaceScan};

pub mod debounce;
pub mod diagnostics;
pub mod driver;

use debounce::ResizeDebouncer;

/// Configuration knobs for the pass coordinator.
#[derive(Clone)]
pub struct RuntimeConfig {
    /// Trailing delay between a resize signal and the pass it triggers.
    /// Signal bursts inside the window collapse into a single fire.
    pub resize_debounce: Duration,
    /// Optional structured logger used by the runtime.
    pub logger: Option<Logger>,
    /// Metrics accumulator used for periodic snapshots.
    pub metrics: Option<Arc<Mutex<PassMetrics>>>,
    /// Interval between metrics snapshot emissions. Zero disables snapshots.
    pub metrics_interval: Duration,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            resize_debounce: Duration::from_millis(10),
            logger: None,
            metrics: None,
            metrics_interval: Duration::from_secs(5),
            metrics_target: "bento::runtime.metrics".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(PassMetrics::new())));
        }
    }

    /// Disable metrics collection and prevent further snapshots.
    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<PassMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Coordinator lifecycle. `Recomputing` is only observable from within a
/// pass (observer hooks, surface callbacks); between calls the runtime
/// rests in `Uninitialized` or `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeState {
    /// No pass has completed yet, typically because the surface was not
    /// measurable at construction.
    Uninitialized,
    Ready,
    Recomputing,
}

/// What caused a pass attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassTrigger {
    /// The attempt made at construction.
    Initial,
    /// An explicit [`BentoRuntime::recalculate`] call.
    Recalculate,
    /// A debounced resize fire.
    Resize,
}

impl PassTrigger {
    pub fn as_str(self) -> &'static str {
        match self {
            PassTrigger::Initial => "initial",
            PassTrigger::Recalculate => "recalculate",
            PassTrigger::Resize => "resize",
        }
    }
}

/// Why a triggered pass did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The surface has no usable width. Previous geometry stays up and
    /// the next trigger retries.
    Unmeasurable,
    /// A resize fire resolved to the column count of the previous pass,
    /// so a full relayout would reproduce what is already on screen.
    ColumnsUnchanged,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::Unmeasurable => "unmeasurable",
            SkipReason::ColumnsUnchanged => "columns_unchanged",
        }
    }
}

/// Summary of one completed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    pub trigger: PassTrigger,
    pub total_columns: usize,
    pub max_row: usize,
    pub items_placed: usize,
    /// Items whose position style changed and was actually rewritten.
    pub items_restyled: usize,
    pub fillers_emitted: usize,
    pub swaps_performed: usize,
}

/// Result of one pass attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    Completed(PassReport),
    Skipped(SkipReason),
}

impl PassOutcome {
    pub fn report(&self) -> Option<&PassReport> {
        match self {
            PassOutcome::Completed(report) => Some(report),
            PassOutcome::Skipped(_) => None,
        }
    }
}

/// Hook for consumers that follow the pass lifecycle without owning the
/// runtime loop. Every method defaults to a no-op.
pub trait PassObserver: Send {
    fn pass_completed(&mut self, _report: &PassReport) {}

    fn pass_skipped(&mut self, _trigger: PassTrigger, _reason: SkipReason) {}
}

/// Scripted runtime events for deterministic clock-driven runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// A resize landed on the host surface.
    Resize,
    /// An explicit recalculation request.
    Recalculate,
    /// Idle time passing, which lets a pending debounce fire.
    Tick,
}

/// Owns a [`Surface`] and coordinates layout passes over it.
///
/// One runtime serves one grid container for its whole life: construction
/// attempts the first pass, after which passes run only on explicit
/// recalculation or on debounced resize fires. A pass is atomic with
/// respect to triggers because every entry point takes `&mut self`.
pub struct BentoRuntime<S: Surface> {
    surface: S,
    grid: GridConfig,
    config: RuntimeConfig,
    registry: StyleRegistry,
    debouncer: ResizeDebouncer,
    scan: SurfaceScan,
    prev_total_columns: Option<usize>,
    observers: Vec<Box<dyn PassObserver>>,
    state: RuntimeState,
    last_report: Option<PassReport>,
    start_instant: Instant,
    last_metrics_emit: Instant,
}

impl<S: Surface> BentoRuntime<S> {
    /// Construct with default runtime settings.
    pub fn new(surface: S, grid: GridConfig) -> Result<Self> {
        Self::with_config(surface, grid, RuntimeConfig::default())
    }

    /// Validate the configuration, adopt the surface contents and attempt
    /// the initial pass.
    ///
    /// An unmeasurable surface is not an error here: the runtime comes up
    /// `Uninitialized`, keeps the scan it took, and the first trigger that
    /// finds a usable width completes initialization.
    pub fn with_config(surface: S, grid: GridConfig, config: RuntimeConfig) -> Result<Self> {
        grid.validate()?;
        let now = Instant::now();
        let debouncer = ResizeDebouncer::new(config.resize_debounce);
        let mut runtime = Self {
            surface,
            grid,
            config,
            registry: StyleRegistry::new(),
            debouncer,
            scan: SurfaceScan::default(),
            prev_total_columns: None,
            observers: Vec::new(),
            state: RuntimeState::Uninitialized,
            last_report: None,
            start_instant: now,
            last_metrics_emit: now,
        };
        runtime.ensure_metrics_initialized();
        runtime.scan = runtime.surface.scan()?;
        runtime.surface.hide_templates()?;
        runtime.log_runtime_event(
            LogLevel::Info,
            "runtime_started",
            [
                json_kv("items", json!(runtime.scan.items.len())),
                json_kv("templates", json!(runtime.scan.templates.len())),
            ],
        );
        runtime.attempt_pass(PassTrigger::Initial)?;
        Ok(runtime)
    }

    pub fn config_mut(&mut self) -> &mut RuntimeConfig {
        &mut self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn grid_config(&self) -> &GridConfig {
        &self.grid
    }

    pub fn state(&self) -> RuntimeState {
        self.state
    }

    /// Report of the most recent completed pass, if any.
    pub fn last_report(&self) -> Option<&PassReport> {
        self.last_report.as_ref()
    }

    pub fn register_observer<O>(&mut self, observer: O)
    where
        O: PassObserver + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Re-read the surface contents and run a full pass unconditionally.
    ///
    /// The entry point for hosts whose item list changed: elements added,
    /// removed, or toggled visible.
    pub fn recalculate(&mut self) -> Result<PassOutcome> {
        self.scan = self.surface.scan()?;
        self.attempt_pass(PassTrigger::Recalculate)
    }

    /// Record a resize signal at `now`. The pass itself runs from a later
    /// [`tick`](Self::tick) once the debounce delay has elapsed.
    pub fn signal_resize(&mut self, now: Instant) {
        let coalesced = self.debouncer.signal(now);
        if coalesced {
            self.record_coalesced_signal_metric();
        }
        self.log_runtime_event(
            LogLevel::Debug,
            "resize_signaled",
            [json_kv("coalesced", json!(coalesced))],
        );
    }

    /// Deadline of the pending debounced pass, for hosts that poll with a
    /// timeout.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Advance the runtime clock: emit due metrics snapshots and run the
    /// debounced pass once its deadline has passed.
    pub fn tick(&mut self, now: Instant) -> Result<Option<PassOutcome>> {
        self.maybe_emit_metrics(now);
        if self.debouncer.fire(now) {
            return self.attempt_pass(PassTrigger::Resize).map(Some);
        }
        Ok(None)
    }

    /// Drive the runtime through a scripted event sequence on a synthetic
    /// clock. Each step advances the clock by its delay, then delivers its
    /// event. Returns the outcome of every pass attempt, in order.
    pub fn run_scripted<I>(&mut self, steps: I) -> Result<Vec<PassOutcome>>
    where
        I: IntoIterator<Item = (Duration, RuntimeEvent)>,
    {
        let mut clock = Instant::now();
        let mut outcomes = Vec::new();
        for (delay, event) in steps {
            clock += delay;
            match event {
                RuntimeEvent::Resize => {
                    self.signal_resize(clock);
                    if let Some(outcome) = self.tick(clock)? {
                        outcomes.push(outcome);
                    }
                }
                RuntimeEvent::Recalculate => outcomes.push(self.recalculate()?),
                RuntimeEvent::Tick => {
                    if let Some(outcome) = self.tick(clock)? {
                        outcomes.push(outcome);
                    }
                }
            }
        }
        Ok(outcomes)
    }

    fn attempt_pass(&mut self, trigger: PassTrigger) -> Result<PassOutcome> {
        let measurement = match self.surface.measure() {
            Some(measurement) if measurement.container_width > 0.0 => measurement,
            _ => return Ok(self.skip_pass(trigger, SkipReason::Unmeasurable)),
        };
        let active = self.grid.resolve(self.reference_width(&measurement));
        let tracks = plan_tracks(&active, measurement.container_width)?;
        // Track styling happens on every measurable attempt, including
        // fires that end up skipping the relayout.
        self.surface.apply_tracks(&tracks)?;
        if trigger == PassTrigger::Resize && self.prev_total_columns == Some(tracks.total_columns) {
            return Ok(self.skip_pass(trigger, SkipReason::ColumnsUnchanged));
        }
        self.execute_pass(trigger, tracks, active)
    }

    fn skip_pass(&mut self, trigger: PassTrigger, reason: SkipReason) -> PassOutcome {
        self.record_skip_metric();
        let level = match reason {
            SkipReason::Unmeasurable => LogLevel::Warn,
            SkipReason::ColumnsUnchanged => LogLevel::Debug,
        };
        self.log_runtime_event(
            level,
            "pass_skipped",
            [
                json_str("trigger", trigger.as_str()),
                json_str("reason", reason.as_str()),
            ],
        );
        for observer in &mut self.observers {
            observer.pass_skipped(trigger, reason);
        }
        PassOutcome::Skipped(reason)
    }

    fn execute_pass(
        &mut self,
        trigger: PassTrigger,
        tracks: TrackPlan,
        active: ResolvedConfig,
    ) -> Result<PassOutcome> {
        let resting_state = self.state;
        self.state = RuntimeState::Recomputing;
        match self.run_pass(trigger, tracks, active) {
            Ok(report) => {
                self.state = RuntimeState::Ready;
                self.last_report = Some(report);
                self.record_pass_metric(&report);
                self.log_runtime_event(
                    LogLevel::Info,
                    "pass_completed",
                    [
                        json_str("trigger", report.trigger.as_str()),
                        json_kv("total_columns", json!(report.total_columns)),
                        json_kv("max_row", json!(report.max_row)),
                        json_kv("items_placed", json!(report.items_placed)),
                        json_kv("items_restyled", json!(report.items_restyled)),
                        json_kv("fillers_emitted", json!(report.fillers_emitted)),
                        json_kv("swaps_performed", json!(report.swaps_performed)),
                    ],
                );
                for observer in &mut self.observers {
                    observer.pass_completed(&report);
                }
                Ok(PassOutcome::Completed(report))
            }
            Err(error) => {
                self.state = resting_state;
                // The surface may hold only part of the pass's writes;
                // forget the style cache so the next pass rewrites them.
                self.registry.clear();
                Err(error)
            }
        }
    }

    /// One full relayout. Stale clones never survive into the new
    /// geometry; the fillers inserted below replace them wholesale.
    fn run_pass(
        &mut self,
        trigger: PassTrigger,
        tracks: TrackPlan,
        active: ResolvedConfig,
    ) -> Result<PassReport> {
        self.surface.remove_cloned_fillers()?;

        let plan = LayoutPass::new(tracks, &self.scan.items, &self.scan.templates)
            .with_balancing(active.balance_fillers)
            .solve()?;

        let styles: Vec<(ElementId, PositionStyle)> = plan
            .placements
            .iter()
            .map(|placement| {
                (
                    placement.id,
                    PositionStyle::new(placement.origin, placement.span),
                )
            })
            .collect();
        let dirty: HashSet<ElementId> = self
            .registry
            .diff_items(styles.iter().map(|(id, style)| (*id, style)))
            .into_iter()
            .collect();
        let mut items_restyled = 0;
        for (id, style) in &styles {
            if dirty.contains(id) {
                self.surface.apply_item_position(*id, style)?;
                items_restyled += 1;
            }
        }

        self.surface.apply_row_template(&plan.tracks, plan.max_row)?;

        for filler in &plan.fillers {
            let style = PositionStyle::new(filler.origin, filler.span);
            self.surface.insert_filler(filler.template, &style)?;
        }

        let report = PassReport {
            trigger,
            total_columns: plan.tracks.total_columns,
            max_row: plan.max_row,
            items_placed: plan.placements.len(),
            items_restyled,
            fillers_emitted: plan.fillers.len(),
            swaps_performed: plan.swaps_performed,
        };
        self.surface.pass_complete(&plan)?;
        // Recorded only once the pass fully lands: a failed pass must not
        // arm the same-column skip for the next resize fire.
        self.prev_total_columns = Some(plan.tracks.total_columns);
        Ok(report)
    }

    fn reference_width(&self, measurement: &Measurement) -> f64 {
        match self.grid.reference {
            BreakpointReference::Container => measurement.container_width,
            BreakpointReference::Window => measurement.window_width,
        }
    }

    fn ensure_metrics_initialized(&mut self) {
        if self.config.metrics.is_none() && self.config.metrics_interval > Duration::from_millis(0)
        {
            self.config.metrics = Some(Arc::new(Mutex::new(PassMetrics::new())));
        }
    }

    fn log_runtime_event<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, "bento::runtime", message, fields);
            let _ = logger.log_event(event);
        }
    }

    fn record_pass_metric(&mut self, report: &PassReport) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_pass(
                    report.items_placed,
                    report.fillers_emitted,
                    report.swaps_performed,
                );
            }
        }
    }

    fn record_skip_metric(&mut self) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_skip();
            }
        }
    }

    fn record_coalesced_signal_metric(&mut self) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_coalesced_signal();
            }
        }
    }

    fn maybe_emit_metrics(&mut self, now: Instant) {
        if self.config.metrics.is_none() {
            return;
        }

        if self.config.metrics_interval == Duration::from_millis(0) {
            return;
        }

        if now.duration_since(self.last_metrics_emit) < self.config.metrics_interval {
            return;
        }
        self.last_metrics_emit = now;

        let uptime = now.duration_since(self.start_instant);
        if let (Some(logger), Some(metrics)) =
            (self.config.logger.as_ref(), self.config.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let target = self.config.metrics_target.as_str();
                let snapshot_event = guard.snapshot(uptime).to_log_event(target);
                let _ = logger.log_event(snapshot_event);
            }
        }
    }
}
