//! Arc state machine
//!
//! Each employee is in one of three situations: no arc, an arc running, or
//! cooling down after an arc. The daily step runs once per employee per day:
//!
//! 1. History decays (cooldown first, then the retrigger multiplier recovers).
//! 2. A running arc gains a day and moves on once the stage's `max_days` is
//!    reached; finishing the last stage completes the arc.
//! 3. With no arc running and no cooldown left, an arc-capable major trait
//!    whose start condition holds rolls `start_chance * retrigger_multiplier`.

use ahash::AHashMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::arcs::definition::{ArcDefinition, ArcStage};
use crate::arcs::state::{ActiveArc, ArcHistory, ArcSnapshot, ArcState};
use crate::core::types::{ArcId, Day, EmployeeId};
use crate::traits::catalog::TraitCatalog;
use crate::traits::context::EmployeeConditionContext;
use crate::traits::definition::TraitDefinition;
use crate::traits::modifier::Modifier;

/// Transitions produced by a daily step
#[derive(Debug, Clone, PartialEq)]
pub enum ArcEvent {
    Started { arc_id: ArcId },
    StageAdvanced { arc_id: ArcId, stage_index: usize },
    Completed { arc_id: ArcId },
}

/// Owner of every employee's arc state
#[derive(Debug, Clone)]
pub struct ArcManager {
    rng: ChaCha8Rng,
    states: AHashMap<EmployeeId, ArcState>,
    last_processed: AHashMap<EmployeeId, Day>,
}

impl ArcManager {
    pub fn new(seed: u64) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_rng(rng: ChaCha8Rng) -> Self {
        Self {
            rng,
            states: AHashMap::new(),
            last_processed: AHashMap::new(),
        }
    }

    /// Run the daily step for one employee
    ///
    /// A second call for the same employee and day does nothing.
    pub fn process_day(
        &mut self,
        catalog: &TraitCatalog,
        employee: EmployeeId,
        major: Option<&TraitDefinition>,
        ctx: &EmployeeConditionContext,
        day: Day,
    ) -> Vec<ArcEvent> {
        if self.last_processed.get(&employee) == Some(&day) {
            return Vec::new();
        }
        self.last_processed.insert(employee, day);

        let mut events = Vec::new();
        let arc = major.and_then(|m| catalog.arc_for(m));
        if arc.is_none() && !self.states.contains_key(&employee) {
            return events;
        }

        let state = self.states.entry(employee).or_default();
        if let Some(history) = state.history.as_mut() {
            history.decay_one_day();
        }

        if state.active.is_some() {
            advance_active(state, catalog, employee, &mut events);
        } else if let Some(arc) = arc {
            try_start(state, arc, ctx, day, &mut self.rng, employee, &mut events);
        }

        if state.is_empty() {
            self.states.remove(&employee);
        }
        events
    }

    pub fn active_arc(&self, employee: EmployeeId) -> Option<&ActiveArc> {
        self.states.get(&employee).and_then(|s| s.active.as_ref())
    }

    pub fn history(&self, employee: EmployeeId) -> Option<&ArcHistory> {
        self.states.get(&employee).and_then(|s| s.history.as_ref())
    }

    /// Stage the employee's running arc is in
    pub fn current_stage<'c>(&self, catalog: &'c TraitCatalog, employee: EmployeeId) -> Option<&'c ArcStage> {
        let active = self.active_arc(employee)?;
        catalog
            .arc(active.arc_id.as_str())
            .and_then(|arc| arc.stage(active.stage_index))
    }

    /// Modifiers of the current stage; empty with no arc or a stale stage index
    pub fn active_arc_modifiers<'c>(&self, catalog: &'c TraitCatalog, employee: EmployeeId) -> &'c [Modifier] {
        self.current_stage(catalog, employee)
            .map(|stage| stage.modifiers.as_slice())
            .unwrap_or(&[])
    }

    /// Copy of one employee's state
    pub fn arc_state(&self, employee: EmployeeId) -> ArcState {
        self.states.get(&employee).cloned().unwrap_or_default()
    }

    /// Replace one employee's state
    ///
    /// The loaded state has not seen any day yet, so the next step for this
    /// employee always runs.
    pub fn load_arc_state(&mut self, employee: EmployeeId, state: ArcState) {
        self.last_processed.remove(&employee);
        if state.is_empty() {
            self.states.remove(&employee);
        } else {
            self.states.insert(employee, state);
        }
    }

    /// Drop everything tracked for an employee
    pub fn forget(&mut self, employee: EmployeeId) {
        self.states.remove(&employee);
        self.last_processed.remove(&employee);
    }

    pub fn snapshot(&self) -> ArcSnapshot {
        ArcSnapshot {
            states: self
                .states
                .iter()
                .filter(|(_, s)| !s.is_empty())
                .map(|(id, s)| (*id, s.clone()))
                .collect(),
        }
    }

    /// Replace all tracked state with a snapshot
    pub fn restore(&mut self, snapshot: ArcSnapshot) {
        self.states = snapshot.states;
        self.last_processed.clear();
    }

    /// Employees with any tracked state
    pub fn tracked_count(&self) -> usize {
        self.states.len()
    }

    /// Employees with an arc currently running
    pub fn active_count(&self) -> usize {
        self.states.values().filter(|s| s.active.is_some()).count()
    }
}

fn advance_active(
    state: &mut ArcState,
    catalog: &TraitCatalog,
    employee: EmployeeId,
    events: &mut Vec<ArcEvent>,
) {
    let Some(active) = state.active.as_mut() else {
        return;
    };
    let Some(arc) = catalog.arc(active.arc_id.as_str()) else {
        tracing::warn!(
            "Employee {} has unknown arc '{}'; dropping it",
            employee,
            active.arc_id
        );
        state.active = None;
        return;
    };

    active.days_in_stage += 1;
    let finished_stage = match arc.stage(active.stage_index) {
        Some(stage) => active.days_in_stage >= stage.max_days,
        None => true,
    };
    if !finished_stage {
        return;
    }

    if active.stage_index + 1 < arc.stages.len() {
        active.stage_index += 1;
        active.days_in_stage = 0;
        tracing::debug!(
            "Employee {} arc '{}' advanced to stage {}",
            employee,
            arc.id,
            active.stage_index
        );
        events.push(ArcEvent::StageAdvanced {
            arc_id: arc.id.clone(),
            stage_index: active.stage_index,
        });
        return;
    }

    complete(state, arc, employee, events);
}

fn complete(state: &mut ArcState, arc: &ArcDefinition, employee: EmployeeId, events: &mut Vec<ArcEvent>) {
    state.active = None;
    state.history = Some(ArcHistory::on_completion(arc, state.history.as_ref()));
    tracing::debug!("Employee {} completed arc '{}'", employee, arc.id);
    events.push(ArcEvent::Completed {
        arc_id: arc.id.clone(),
    });
}

fn try_start(
    state: &mut ArcState,
    arc: &ArcDefinition,
    ctx: &EmployeeConditionContext,
    day: Day,
    rng: &mut impl Rng,
    employee: EmployeeId,
    events: &mut Vec<ArcEvent>,
) {
    let multiplier = match &state.history {
        Some(history) if history.arc_id == arc.id => {
            if history.in_cooldown() {
                return;
            }
            history.retrigger_multiplier
        }
        _ => 1.0,
    };

    if !arc.start_condition.evaluate(ctx) {
        return;
    }

    let chance = (arc.start_chance_per_day * multiplier).clamp(0.0, 1.0);
    if rng.gen::<f32>() < chance {
        state.active = Some(ActiveArc::new(arc.id.clone(), day));
        tracing::debug!(
            "Employee {} started arc '{}' (chance {:.3})",
            employee,
            arc.id,
            chance
        );
        events.push(ArcEvent::Started {
            arc_id: arc.id.clone(),
        });
    }
}
