//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose planner use cases to Dart via FRB as sync functions.
//! - Translate core results into flat response envelopes.
//! - Keep one planner service alive for the whole process.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - The store is opened and the snapshot loaded once per process; later calls
//!   reuse the live state, so an auto theme is picked once per launch.
//! - Calls are serialized by the service mutex.
//! - The focus session lives in that service and survives between calls.

use log::warn;
use planner_core::db::open_db;
use planner_core::logging::events;
use planner_core::model::goal::Goal;
use planner_core::model::habit::Habit;
use planner_core::model::review::{ReflectionTemplate, ScoreDefinition};
use planner_core::model::shop::Reward;
use planner_core::model::task::Task;
use planner_core::model::theme::ThemeOption;
use planner_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    FocusSession, FocusTarget, NewItemKind, PlannerService, RedeemOutcome,
    SqliteSnapshotRepository,
};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

const PLANNER_DB_FILE_NAME: &str = "planner_store.sqlite3";
const PLANNER_DB_PATH_ENV: &str = "PLANNER_DB_PATH";
static PLANNER_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

type FfiPlannerService = PlannerService<SqliteSnapshotRepository<Connection>>;

static PLANNER_SERVICE: Mutex<Option<FfiPlannerService>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
/// Repeating the same `level + log_dir` is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic response envelope for planner calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Created or affected id, JSON payload, or scalar result, per call.
    pub value: Option<String>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl PlannerActionResponse {
    fn success(message: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            ok: true,
            value: Some(value.into()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            value: None,
            message: message.into(),
        }
    }

    fn from_result(op: &str, result: Result<(String, String), String>) -> Self {
        match result {
            Ok((message, value)) => Self::success(message, value),
            Err(err) => {
                warn!("event={} module=ffi status=error op={op}", events::FFI_CALL);
                Self::failure(format!("{op} failed: {err}"))
            }
        }
    }
}

/// Returns the full state graph as compact JSON in `value`.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_state_json() -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        serde_json::to_string(service.state())
            .map(|json| ("State loaded.".to_string(), json))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_state_json", result)
}

/// Flips completion (or advances the count) of every instance of `task_id`.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_toggle_task(task_id: String) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        service
            .toggle_task_complete(task_id.trim())
            .map(|count| ("Task toggled.".to_string(), count.to_string()))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_toggle_task", result)
}

/// Adds the library template to `active_date`, or removes it when present.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_toggle_instance(template_id: String, active_date: u32) -> PlannerActionResponse {
    let result = with_planner_service(Some(active_date), |service| {
        service
            .add_or_retract_instance(template_id.trim())
            .map(|toggle| match toggle {
                planner_core::ops::tasks::InstanceToggle::Added(id) => {
                    ("Task added.".to_string(), id)
                }
                planner_core::ops::tasks::InstanceToggle::Retracted(id) => {
                    ("Task removed.".to_string(), id)
                }
            })
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_toggle_instance", result)
}

/// Moves an instance to `hour` on its day.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_assign_slot(task_id: String, hour: u32) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        service
            .assign_task_slot(task_id.trim(), hour)
            .map(|()| ("Task scheduled.".to_string(), task_id.trim().to_string()))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_assign_slot", result)
}

/// Schedules or unschedules a habit at `hour` on `active_date`.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_schedule_habit(
    habit_id: String,
    hour: u32,
    active_date: u32,
) -> PlannerActionResponse {
    let result = with_planner_service(Some(active_date), |service| {
        service
            .schedule_habit(habit_id.trim(), hour)
            .map(|toggle| match toggle {
                planner_core::ops::habits::HabitScheduleToggle::Scheduled(id) => {
                    ("Habit scheduled.".to_string(), id)
                }
                planner_core::ops::habits::HabitScheduleToggle::Unscheduled(id) => {
                    ("Habit unscheduled.".to_string(), id)
                }
            })
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_schedule_habit", result)
}

/// Flips a scheduled habit instance on `active_date`; `value` is the new flag.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_toggle_habit_instance(
    instance_id: String,
    active_date: u32,
) -> PlannerActionResponse {
    let result = with_planner_service(Some(active_date), |service| {
        service
            .toggle_habit_instance(instance_id.trim())
            .map(|completed| ("Habit toggled.".to_string(), completed.to_string()))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_toggle_habit_instance", result)
}

/// Redeems a reward. Insufficient balance is reported with `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_redeem_reward(reward_id: String) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        match service
            .redeem_reward(reward_id.trim())
            .map_err(|err| err.to_string())?
        {
            RedeemOutcome::Redeemed(receipt_id) => Ok(("Reward redeemed.".to_string(), receipt_id)),
            RedeemOutcome::InsufficientBalance { balance, cost } => Err(format!(
                "insufficient balance: have {balance}, need {cost}"
            )),
        }
    });
    PlannerActionResponse::from_result("planner_redeem_reward", result)
}

/// Creates an entity of `kind` (`task|habit|goal|temp_task|reward`).
#[flutter_rust_bridge::frb(sync)]
pub fn planner_create_item(
    kind: String,
    title: String,
    category: String,
    active_date: u32,
) -> PlannerActionResponse {
    let Some(kind) = NewItemKind::parse(&kind) else {
        return PlannerActionResponse::failure(format!(
            "planner_create_item failed: unsupported kind `{}`",
            kind.trim()
        ));
    };
    let day_scoped = (kind == NewItemKind::TempTask).then_some(active_date);
    let result = with_planner_service(day_scoped, |service| {
        service
            .create_item(kind, &title, &category)
            .map(|created| ("Item created.".to_string(), created.id().to_string()))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_create_item", result)
}

/// Replaces all day-scoped data with a fresh current week.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_clear_schedule() -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        service.clear_schedule();
        Ok((
            "Schedule cleared.".to_string(),
            service.state().days.len().to_string(),
        ))
    });
    PlannerActionResponse::from_result("planner_clear_schedule", result)
}

/// Sets the reflection text of day `date`; empty text clears it.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_set_reflection(date: u32, text: String) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        service
            .set_reflection(date, &text)
            .map(|()| ("Reflection saved.".to_string(), date.to_string()))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_set_reflection", result)
}

/// Records score `value` (-2..=2) on axis `definition_id` for day `date`.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_set_day_score(date: u32, definition_id: String, value: i32) -> PlannerActionResponse {
    let Ok(value) = i8::try_from(value) else {
        return PlannerActionResponse::failure(format!(
            "planner_set_day_score failed: score {value} out of range"
        ));
    };
    let result = with_planner_service(None, |service| {
        service
            .set_day_score(date, definition_id.trim(), value)
            .map(|()| ("Score saved.".to_string(), value.to_string()))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_set_day_score", result)
}

/// Current balance as a decimal string in `value`.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_balance() -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        Ok(("Balance loaded.".to_string(), service.balance().to_string()))
    });
    PlannerActionResponse::from_result("planner_balance", result)
}

/// Pretty-printed backup snapshot in `value`, for the clipboard.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_backup_json() -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        service
            .backup_text()
            .map(|text| ("Backup ready.".to_string(), text))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_backup_json", result)
}

/// Merges backup `text` into the stored state. `value` lists applied keys.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_restore(text: String) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        let report = service.restore(&text).map_err(|err| err.to_string())?;
        let message = if report.skipped_keys.is_empty() {
            "Backup restored.".to_string()
        } else {
            format!("Backup restored; skipped {}.", report.skipped_keys.join(","))
        };
        Ok((message, report.applied_keys.join(",")))
    });
    PlannerActionResponse::from_result("planner_restore", result)
}

/// Writes a full task value (camelCase JSON) back into the graph.
///
/// Template edits reach every instance; instance edits reach the template and
/// its other instances.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_update_task(task_json: String) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        let task = serde_json::from_str::<Task>(task_json.trim())
            .map_err(|err| format!("invalid task JSON: {err}"))?;
        let id = task.id.clone();
        service
            .update_task(task)
            .map(|()| ("Task updated.".to_string(), id))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_update_task", result)
}

/// Deletes a library template and its instances; `value` is the removed
/// instance count.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_delete_library_task(task_id: String) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        service
            .delete_library_task(task_id.trim())
            .map(|removed| ("Task deleted.".to_string(), removed.to_string()))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_delete_library_task", result)
}

/// Takes an instance off the hour grid; it stays on its day.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_retract_task(task_id: String) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        service
            .retract_task(task_id.trim())
            .map(|()| ("Task unscheduled.".to_string(), task_id.trim().to_string()))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_retract_task", result)
}

/// Flips one subtask; `value` is its new flag.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_toggle_subtask(task_id: String, subtask_id: String) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        service
            .toggle_subtask(task_id.trim(), subtask_id.trim())
            .map(|completed| ("Subtask toggled.".to_string(), completed.to_string()))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_toggle_subtask", result)
}

#[flutter_rust_bridge::frb(sync)]
pub fn planner_update_habit(habit_json: String) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        let habit = serde_json::from_str::<Habit>(habit_json.trim())
            .map_err(|err| format!("invalid habit JSON: {err}"))?;
        let id = habit.id.clone();
        service
            .update_habit(habit)
            .map(|()| ("Habit updated.".to_string(), id))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_update_habit", result)
}

/// Deletes a habit and its scheduled instances; `value` is the instance count.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_delete_habit(habit_id: String) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        service
            .delete_habit(habit_id.trim())
            .map(|removed| ("Habit deleted.".to_string(), removed.to_string()))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_delete_habit", result)
}

#[flutter_rust_bridge::frb(sync)]
pub fn planner_update_goal(goal_json: String) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        let goal = serde_json::from_str::<Goal>(goal_json.trim())
            .map_err(|err| format!("invalid goal JSON: {err}"))?;
        let id = goal.id.clone();
        service
            .update_goal(goal)
            .map(|()| ("Goal updated.".to_string(), id))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_update_goal", result)
}

/// Deletes a goal. Links from tasks and habits to its key results dangle.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_delete_goal(goal_id: String) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        service
            .delete_goal(goal_id.trim())
            .map(|()| ("Goal deleted.".to_string(), goal_id.trim().to_string()))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_delete_goal", result)
}

/// Appends a key result; `value` is its new id.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_add_key_result(goal_id: String, title: String) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        service
            .add_key_result(goal_id.trim(), &title)
            .map(|kr_id| ("Key result added.".to_string(), kr_id))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_add_key_result", result)
}

#[flutter_rust_bridge::frb(sync)]
pub fn planner_remove_key_result(goal_id: String, kr_id: String) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        service
            .remove_key_result(goal_id.trim(), kr_id.trim())
            .map(|()| ("Key result removed.".to_string(), kr_id.trim().to_string()))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_remove_key_result", result)
}

/// Live progress (0..=100) of a key result from its linked items.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_key_result_progress(kr_id: String) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        Ok((
            "Progress loaded.".to_string(),
            service.key_result_progress(kr_id.trim()).to_string(),
        ))
    });
    PlannerActionResponse::from_result("planner_key_result_progress", result)
}

/// Sorted category names as a JSON array in `value`.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_categories() -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        serde_json::to_string(&service.categories())
            .map(|json| ("Categories loaded.".to_string(), json))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_categories", result)
}

/// Inserts or replaces a catalog reward. Receipts are untouched.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_upsert_reward(reward_json: String) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        let reward = serde_json::from_str::<Reward>(reward_json.trim())
            .map_err(|err| format!("invalid reward JSON: {err}"))?;
        let id = reward.id.clone();
        service
            .upsert_reward(reward)
            .map(|()| ("Reward saved.".to_string(), id))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_upsert_reward", result)
}

#[flutter_rust_bridge::frb(sync)]
pub fn planner_delete_reward(reward_id: String) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        service
            .delete_reward(reward_id.trim())
            .map(|()| ("Reward deleted.".to_string(), reward_id.trim().to_string()))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_delete_reward", result)
}

/// Appends a reflection template's text to day `date`.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_append_reflection_template(date: u32, template_id: String) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        service
            .append_reflection_template(date, template_id.trim())
            .map(|()| ("Template applied.".to_string(), date.to_string()))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_append_reflection_template", result)
}

#[flutter_rust_bridge::frb(sync)]
pub fn planner_upsert_reflection_template(template_json: String) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        let template = serde_json::from_str::<ReflectionTemplate>(template_json.trim())
            .map_err(|err| format!("invalid reflection template JSON: {err}"))?;
        let id = template.id.clone();
        service
            .upsert_reflection_template(template)
            .map(|()| ("Template saved.".to_string(), id))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_upsert_reflection_template", result)
}

#[flutter_rust_bridge::frb(sync)]
pub fn planner_delete_reflection_template(template_id: String) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        service
            .delete_reflection_template(template_id.trim())
            .map(|()| ("Template deleted.".to_string(), template_id.trim().to_string()))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_delete_reflection_template", result)
}

/// Inserts or replaces a scoring axis; labels are keyed `"-2"`..`"2"`.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_upsert_score_definition(definition_json: String) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        let definition = serde_json::from_str::<ScoreDefinition>(definition_json.trim())
            .map_err(|err| format!("invalid score definition JSON: {err}"))?;
        let id = definition.id.clone();
        service
            .upsert_score_definition(definition)
            .map(|()| ("Score axis saved.".to_string(), id))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_upsert_score_definition", result)
}

/// Deletes a scoring axis. Recorded day scores stay.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_delete_score_definition(definition_id: String) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        service
            .delete_score_definition(definition_id.trim())
            .map(|()| ("Score axis deleted.".to_string(), definition_id.trim().to_string()))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_delete_score_definition", result)
}

/// Replaces the theme with `{name, color, lightColor}`.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_set_theme(theme_json: String) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        let theme = serde_json::from_str::<ThemeOption>(theme_json.trim())
            .map_err(|err| format!("invalid theme JSON: {err}"))?;
        let name = theme.name.clone();
        service.set_theme(theme);
        Ok(("Theme saved.".to_string(), name))
    });
    PlannerActionResponse::from_result("planner_set_theme", result)
}

/// Turns the random launch theme on or off. The current theme is kept.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_set_auto_theme(enabled: bool) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        service.set_auto_theme(enabled);
        Ok(("Auto theme saved.".to_string(), enabled.to_string()))
    });
    PlannerActionResponse::from_result("planner_set_auto_theme", result)
}

/// Snapshot of the running focus session for the timer view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusSessionView {
    pub target_id: String,
    /// `task` or `habit`.
    pub target_kind: String,
    pub title: String,
    pub target_minutes: u32,
    pub elapsed_seconds: u64,
    pub running: bool,
    pub progress_percent: u32,
    /// `MM:SS`.
    pub clock_label: String,
}

fn focus_session_view(session: &FocusSession) -> FocusSessionView {
    let target_kind = match session.target {
        FocusTarget::Task => "task",
        FocusTarget::Habit => "habit",
    };
    FocusSessionView {
        target_id: session.target_id.clone(),
        target_kind: target_kind.to_string(),
        title: session.title.clone(),
        target_minutes: session.target_minutes,
        elapsed_seconds: session.elapsed_seconds,
        running: session.running,
        progress_percent: session.progress_percent(),
        clock_label: session.clock_label(),
    }
}

/// Starts a focus session on a task instance of `active_date` or on a habit.
/// `target_kind` is `task` or `habit`; `value` is the session length in
/// minutes.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_focus_start(
    target_id: String,
    target_kind: String,
    active_date: u32,
) -> PlannerActionResponse {
    let Some(target) = FocusTarget::parse(&target_kind) else {
        return PlannerActionResponse::failure(format!(
            "planner_focus_start failed: unsupported target `{}`",
            target_kind.trim()
        ));
    };
    let day_scoped = (target == FocusTarget::Task).then_some(active_date);
    let result = with_planner_service(day_scoped, |service| {
        service
            .start_focus(target_id.trim(), target)
            .map(|session| ("Focus started.".to_string(), session.target_minutes.to_string()))
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_focus_start", result)
}

/// Current focus session, if one is active.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_focus_session() -> Option<FocusSessionView> {
    with_planner_service(None, |service| {
        Ok(service.focus_session().map(focus_session_view))
    })
    .ok()
    .flatten()
}

/// Advances a running session by `seconds`; `value` is the elapsed total.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_focus_tick(seconds: u32) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        service
            .tick_focus(u64::from(seconds))
            .map(|elapsed| ("Focus ticked.".to_string(), elapsed.to_string()))
            .ok_or_else(|| "no active focus session".to_string())
    });
    PlannerActionResponse::from_result("planner_focus_tick", result)
}

/// Pauses or resumes; `value` is the new running flag.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_focus_toggle_pause() -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        service
            .toggle_focus_pause()
            .map(|running| ("Focus toggled.".to_string(), running.to_string()))
            .ok_or_else(|| "no active focus session".to_string())
    });
    PlannerActionResponse::from_result("planner_focus_toggle_pause", result)
}

/// Drops the session without credit; `value` says whether one was active.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_focus_cancel() -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        Ok(("Focus cancelled.".to_string(), service.cancel_focus().to_string()))
    });
    PlannerActionResponse::from_result("planner_focus_cancel", result)
}

/// Ends the session. With `save`, whole minutes are credited and `value` is
/// the credited minute count. A target that no longer exists fails and keeps
/// the session.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_focus_finish(save: bool) -> PlannerActionResponse {
    let result = with_planner_service(None, |service| {
        if service.focus_session().is_none() {
            return Err("no active focus session".to_string());
        }
        service
            .finish_focus(save)
            .map(|credit| {
                let minutes = credit.map_or(0, |credit| credit.minutes);
                ("Focus finished.".to_string(), minutes.to_string())
            })
            .map_err(|err| err.to_string())
    });
    PlannerActionResponse::from_result("planner_focus_finish", result)
}

fn resolve_planner_db_path() -> PathBuf {
    PLANNER_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(PLANNER_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(PLANNER_DB_FILE_NAME)
        })
        .clone()
}

fn open_planner_service() -> Result<FfiPlannerService, String> {
    let db_path = resolve_planner_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("planner DB open failed: {err}"))?;
    let repo = SqliteSnapshotRepository::try_new(conn)
        .map_err(|err| format!("planner repo init failed: {err}"))?;
    Ok(PlannerService::open(repo))
}

/// Runs `f` on the process-wide service, opening it on first use.
///
/// A failed open leaves the slot empty so the next call retries.
fn with_planner_service<T>(
    active_date: Option<u32>,
    f: impl FnOnce(&mut FfiPlannerService) -> Result<T, String>,
) -> Result<T, String> {
    let mut slot = PLANNER_SERVICE
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if slot.is_none() {
        *slot = Some(open_planner_service()?);
    }
    let Some(service) = slot.as_mut() else {
        return Err("planner service unavailable".to_string());
    };
    if let Some(date) = active_date {
        service.set_active_date(date).map_err(|err| err.to_string())?;
    }
    f(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Local};
    use serde_json::{json, Value};
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn created_reward_appears_in_state_json() {
        let reward_id = created_id("reward", &unique_token("reward"), "");

        let rewards = state()["rewards"].as_array().cloned().expect("rewards array");
        assert!(rewards.iter().any(|reward| reward["id"] == reward_id.as_str()));
    }

    #[test]
    fn create_item_rejects_unknown_kind() {
        let response = planner_create_item(
            "project".to_string(),
            "x".to_string(),
            String::new(),
            Local::now().day(),
        );
        assert!(!response.ok);
        assert!(response.message.contains("unsupported kind"));
    }

    #[test]
    fn unknown_task_and_out_of_range_score_fail_cleanly() {
        assert!(!planner_toggle_task(unique_token("missing")).ok);
        let response = planner_set_day_score(Local::now().day(), "s1".to_string(), 300);
        assert!(!response.ok);
        assert!(response.message.contains("out of range"));
    }

    #[test]
    fn restore_rejects_non_json_and_applies_present_keys() {
        assert!(!planner_restore("clipboard junk".to_string()).ok);

        let backup: Value = serde_json::from_str(&ok_value(planner_backup_json())).unwrap();
        let partial = json!({ "purchaseHistory": backup["purchaseHistory"] });

        let restored = planner_restore(partial.to_string());
        assert!(restored.ok, "{}", restored.message);
        assert_eq!(restored.value.as_deref(), Some("purchaseHistory"));
    }

    #[test]
    fn balance_is_numeric() {
        assert!(ok_value(planner_balance()).parse::<i64>().is_ok());
    }

    #[test]
    fn task_template_edits_and_instances_round_trip_through_json() {
        let category = unique_token("cat");
        let template_id = created_id("task", &unique_token("task"), &category);
        let date = first_day();

        let mut template = find_by_id(&state()["library"], &template_id);
        template["title"] = json!("Renamed");
        template["subtasks"] = json!([{ "id": "s1", "title": "outline", "completed": false }]);
        assert!(planner_update_task(template.to_string()).ok);

        let instance_id = ok_value(planner_toggle_instance(template_id.clone(), date));
        assert!(planner_assign_slot(instance_id.clone(), 9).ok);
        assert_eq!(
            ok_value(planner_toggle_subtask(instance_id.clone(), "s1".to_string())),
            "true"
        );
        assert!(planner_retract_task(instance_id.clone()).ok);

        let state = state();
        let day = state["days"]
            .as_array()
            .and_then(|days| days.iter().find(|day| day["date"] == date))
            .cloned()
            .expect("active day");
        let instance = find_by_id(&day["tasks"], &instance_id);
        assert_eq!(instance["title"], "Renamed");
        assert!(instance.get("time").map_or(true, Value::is_null));
        let categories: Vec<String> =
            serde_json::from_str(&ok_value(planner_categories())).unwrap();
        assert!(categories.contains(&category));

        assert_eq!(ok_value(planner_delete_library_task(template_id.clone())), "1");
        assert!(!planner_delete_library_task(template_id).ok);
        assert!(!planner_update_task("{ not json".to_string()).ok);
    }

    #[test]
    fn habit_and_goal_edits_with_key_results() {
        let habit_id = created_id("habit", &unique_token("habit"), "Health");
        let goal_id = created_id("goal", &unique_token("goal"), "Health");
        let kr_id = ok_value(planner_add_key_result(goal_id.clone(), "Run 5k".to_string()));

        let mut habit = find_by_id(&state()["habits"], &habit_id);
        habit["krId"] = json!(kr_id);
        habit["completedToday"] = json!(true);
        assert!(planner_update_habit(habit.to_string()).ok);
        assert_eq!(ok_value(planner_key_result_progress(kr_id.clone())), "100");

        let mut goal = find_by_id(&state()["goals"], &goal_id);
        goal["title"] = json!("Renamed goal");
        assert!(planner_update_goal(goal.to_string()).ok);
        assert!(planner_remove_key_result(goal_id.clone(), kr_id.clone()).ok);
        assert!(!planner_remove_key_result(goal_id.clone(), kr_id.clone()).ok);
        assert_eq!(ok_value(planner_key_result_progress(kr_id)), "100");

        assert!(planner_delete_goal(goal_id.clone()).ok);
        assert_eq!(ok_value(planner_delete_habit(habit_id.clone())), "0");
        let state = state();
        assert!(!contains_id(&state["goals"], &goal_id));
        assert!(!contains_id(&state["habits"], &habit_id));
    }

    #[test]
    fn catalog_and_review_definitions_are_editable() {
        let reward_id = unique_token("reward");
        let reward = json!({ "id": reward_id, "title": "Movie night", "cost": 40, "icon": "Film" });
        assert!(planner_upsert_reward(reward.to_string()).ok);
        assert!(!planner_upsert_reward(json!({ "id": "r", "title": "x", "cost": -1 }).to_string()).ok);

        let template_id = unique_token("tpl");
        let template = json!({ "id": template_id, "name": "Gratitude", "text": "Three good things:" });
        assert!(planner_upsert_reflection_template(template.to_string()).ok);
        assert!(planner_append_reflection_template(first_day(), template_id.clone()).ok);

        let axis_id = unique_token("axis");
        let axis = json!({ "id": axis_id, "label": "Sleep", "labels": { "-2": "awful", "2": "great" } });
        assert!(planner_upsert_score_definition(axis.to_string()).ok);

        let state = state();
        assert!(contains_id(&state["rewards"], &reward_id));
        assert!(contains_id(&state["reflectionTemplates"], &template_id));
        assert_eq!(find_by_id(&state["scoreDefs"], &axis_id)["labels"]["2"], "great");

        assert!(planner_delete_reward(reward_id.clone()).ok);
        assert!(planner_delete_reflection_template(template_id.clone()).ok);
        assert!(planner_delete_score_definition(axis_id.clone()).ok);
        let state = self::state();
        assert!(!contains_id(&state["rewards"], &reward_id));
        assert!(!contains_id(&state["reflectionTemplates"], &template_id));
        assert!(!contains_id(&state["scoreDefs"], &axis_id));
    }

    #[test]
    fn theme_is_stable_between_calls_until_set() {
        assert!(planner_set_auto_theme(true).ok);
        let theme = state()["theme"].clone();
        for text in ["one", "two", "three"] {
            assert!(planner_set_reflection(first_day(), text.to_string()).ok);
            assert_eq!(state()["theme"], theme);
        }

        let custom = json!({ "name": "Custom", "color": "#123456", "lightColor": "#abcdef" });
        assert_eq!(ok_value(planner_set_theme(custom.to_string())), "Custom");
        assert_eq!(state()["theme"], custom);
        assert!(planner_set_auto_theme(false).ok);
        assert_eq!(state()["isAutoTheme"], false);
    }

    #[test]
    fn focus_session_persists_across_calls_and_credits_habit() {
        let habit_id = created_id("habit", &unique_token("focus"), "Health");
        assert!(!planner_focus_start(habit_id.clone(), "goal".to_string(), 1).ok);

        assert_eq!(
            ok_value(planner_focus_start(habit_id.clone(), "habit".to_string(), 0)),
            "1"
        );
        assert_eq!(ok_value(planner_focus_tick(90)), "90");
        assert_eq!(ok_value(planner_focus_toggle_pause()), "false");
        assert_eq!(ok_value(planner_focus_tick(60)), "90");
        assert_eq!(ok_value(planner_focus_toggle_pause()), "true");
        assert_eq!(ok_value(planner_focus_tick(30)), "120");

        let view = planner_focus_session().expect("session");
        assert_eq!(view.target_id, habit_id);
        assert_eq!(view.target_kind, "habit");
        assert_eq!(view.clock_label, "02:00");
        assert_eq!(view.progress_percent, 100);

        assert_eq!(ok_value(planner_focus_finish(true)), "2");
        assert!(planner_focus_session().is_none());
        assert!(!planner_focus_finish(true).ok);
        assert_eq!(ok_value(planner_focus_cancel()), "false");
        assert_eq!(find_by_id(&state()["habits"], &habit_id)["accumulatedCount"], 2);
    }

    fn ok_value(response: PlannerActionResponse) -> String {
        assert!(response.ok, "{}", response.message);
        response.value.expect("value")
    }

    fn created_id(kind: &str, title: &str, category: &str) -> String {
        ok_value(planner_create_item(
            kind.to_string(),
            title.to_string(),
            category.to_string(),
            Local::now().day(),
        ))
    }

    fn state() -> Value {
        serde_json::from_str(&ok_value(planner_state_json())).expect("valid json")
    }

    fn first_day() -> u32 {
        state()["days"][0]["date"]
            .as_u64()
            .and_then(|date| u32::try_from(date).ok())
            .expect("stored week has days")
    }

    fn find_by_id(list: &Value, id: &str) -> Value {
        list.as_array()
            .and_then(|entries| entries.iter().find(|entry| entry["id"] == id))
            .cloned()
            .unwrap_or_else(|| panic!("{id} not found"))
    }

    fn contains_id(list: &Value, id: &str) -> bool {
        list.as_array()
            .is_some_and(|entries| entries.iter().any(|entry| entry["id"] == id))
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
