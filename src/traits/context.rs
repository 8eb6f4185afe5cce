//! Per-evaluation snapshot of everything a condition can test
//!
//! The caller builds a fresh context for each employee on each evaluation.
//! Nothing here is persisted.

use serde::{Deserialize, Serialize};

/// Phase of the project the employee is currently assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPhase {
    #[default]
    None,
    Planning,
    Development,
    Polish,
    Crunch,
    Release,
    Maintenance,
}

/// Numeric context fields a condition can compare against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextField {
    /// Morale fraction (0.0 to 1.0)
    Morale,
    /// Stress fraction (0.0 to 1.0)
    Stress,
    /// Energy fraction (0.0 to 1.0)
    Energy,
    /// Fraction of the deadline window still remaining (1.0 = just started)
    DeadlineRemaining,
    /// Project completion fraction
    ProjectProgress,
    TeamSize,
    TenureDays,
    /// Consecutive days spent crunching
    CrunchDays,
    /// Skill level (0.0 to 1.0)
    SkillLevel,
    /// Current project quality estimate (0.0 to 1.0)
    ProjectQuality,
}

impl ContextField {
    pub const ALL: [ContextField; 10] = [
        ContextField::Morale,
        ContextField::Stress,
        ContextField::Energy,
        ContextField::DeadlineRemaining,
        ContextField::ProjectProgress,
        ContextField::TeamSize,
        ContextField::TenureDays,
        ContextField::CrunchDays,
        ContextField::SkillLevel,
        ContextField::ProjectQuality,
    ];
}

/// Boolean context fields a condition can check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextFlag {
    UsingNewTech,
    UsingLegacyTech,
    IsProjectLead,
    IsCrunching,
    IsMentoring,
    OnProject,
    IsSolo,
}

/// Snapshot of an employee's and project's measurable state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeConditionContext {
    pub morale: f32,
    pub stress: f32,
    pub energy: f32,
    pub deadline_remaining: f32,
    pub project_progress: f32,
    pub project_phase: ProjectPhase,
    pub team_size: u32,
    pub tenure_days: u32,
    pub crunch_days: u32,
    pub skill_level: f32,
    pub project_quality: f32,
    pub using_new_tech: bool,
    pub using_legacy_tech: bool,
    pub is_project_lead: bool,
    pub is_mentoring: bool,
}

impl Default for EmployeeConditionContext {
    fn default() -> Self {
        Self {
            morale: 0.5,
            stress: 0.0,
            energy: 1.0,
            deadline_remaining: 1.0,
            project_progress: 0.0,
            project_phase: ProjectPhase::None,
            team_size: 0,
            tenure_days: 0,
            crunch_days: 0,
            skill_level: 0.5,
            project_quality: 0.5,
            using_new_tech: false,
            using_legacy_tech: false,
            is_project_lead: false,
            is_mentoring: false,
        }
    }
}

impl EmployeeConditionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a numeric field
    pub fn numeric(&self, field: ContextField) -> f32 {
        match field {
            ContextField::Morale => self.morale,
            ContextField::Stress => self.stress,
            ContextField::Energy => self.energy,
            ContextField::DeadlineRemaining => self.deadline_remaining,
            ContextField::ProjectProgress => self.project_progress,
            ContextField::TeamSize => self.team_size as f32,
            ContextField::TenureDays => self.tenure_days as f32,
            ContextField::CrunchDays => self.crunch_days as f32,
            ContextField::SkillLevel => self.skill_level,
            ContextField::ProjectQuality => self.project_quality,
        }
    }

    /// Read a boolean field
    pub fn flag(&self, flag: ContextFlag) -> bool {
        match flag {
            ContextFlag::UsingNewTech => self.using_new_tech,
            ContextFlag::UsingLegacyTech => self.using_legacy_tech,
            ContextFlag::IsProjectLead => self.is_project_lead,
            ContextFlag::IsCrunching => {
                self.project_phase == ProjectPhase::Crunch || self.crunch_days > 0
            }
            ContextFlag::IsMentoring => self.is_mentoring,
            ContextFlag::OnProject => self.project_phase != ProjectPhase::None,
            ContextFlag::IsSolo => self.team_size == 1,
        }
    }
}
