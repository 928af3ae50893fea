// Audit helpers that emit structured facts across the conversion stages.
//
// Side-effects:
// - Emits JSON facts via `FactsEmitter` for `phase` transitions, per-`action` results,
//   the `actions.summary`, and each `rollback` step plus the `rollback.summary`.
// - Ensures a minimal envelope is present on every fact: `schema_version`, `ts`, `run_id`,
//   `analysis`.
// - Applies redaction in analysis mode to zero timestamps and drop volatile fields.
use crate::logging::{redact_event, FactsEmitter};
use serde_json::{json, Value};

pub(crate) const SCHEMA_VERSION: i64 = 1;
pub(crate) const SUBSYSTEM: &str = "distroswap";

#[derive(Clone, Debug, Default)]
pub(crate) struct AuditMode {
    pub analysis: bool,
    pub redact: bool,
}

pub(crate) struct AuditCtx<'a> {
    pub facts: &'a dyn FactsEmitter,
    pub run_id: String,
    pub ts: String,
    pub mode: AuditMode,
}

impl<'a> AuditCtx<'a> {
    pub(crate) fn new(
        facts: &'a dyn FactsEmitter,
        run_id: String,
        ts: String,
        mode: AuditMode,
    ) -> Self {
        Self {
            facts,
            run_id,
            ts,
            mode,
        }
    }
}

/// Stage for typed audit emission.
#[derive(Clone, Copy, Debug)]
pub enum Stage {
    Phase,
    Action,
    ActionsSummary,
    Rollback,
    RollbackSummary,
}

impl Stage {
    fn as_event(&self) -> &'static str {
        match self {
            Stage::Phase => "phase",
            Stage::Action => "action",
            Stage::ActionsSummary => "actions.summary",
            Stage::Rollback => "rollback",
            Stage::RollbackSummary => "rollback.summary",
        }
    }
}

/// Decision severity for audit events.
#[derive(Clone, Copy, Debug)]
pub enum Decision {
    Success,
    Failure,
    Warn,
}

impl Decision {
    fn as_str(&self) -> &'static str {
        match self {
            Decision::Success => "success",
            Decision::Failure => "failure",
            Decision::Warn => "warn",
        }
    }
}

/// Builder facade over audit emission with centralized envelope+redaction.
pub struct StageLogger<'a> {
    ctx: &'a AuditCtx<'a>,
}

impl<'a> StageLogger<'a> {
    pub(crate) fn new(ctx: &'a AuditCtx<'a>) -> Self {
        Self { ctx }
    }

    pub fn phase(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::Phase)
    }
    pub fn action(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::Action)
    }
    pub fn actions_summary(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::ActionsSummary)
    }
    pub fn rollback(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::Rollback)
    }
    pub fn rollback_summary(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::RollbackSummary)
    }
}

pub struct EventBuilder<'a> {
    ctx: &'a AuditCtx<'a>,
    stage: Stage,
    fields: serde_json::Map<String, Value>,
}

impl<'a> EventBuilder<'a> {
    fn new(ctx: &'a AuditCtx<'a>, stage: Stage) -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert("stage".to_string(), json!(stage.as_event()));
        Self { ctx, stage, fields }
    }

    pub fn action_id(mut self, action_id: impl Into<String>) -> Self {
        self.fields.insert("action_id".into(), json!(action_id.into()));
        self
    }

    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn merge(mut self, extra: Value) -> Self {
        if let Some(obj) = extra.as_object() {
            for (k, v) in obj {
                self.fields.insert(k.clone(), v.clone());
            }
        }
        self
    }

    pub fn emit(self, decision: Decision) {
        let mut fields = Value::Object(self.fields);
        if let Some(obj) = fields.as_object_mut() {
            obj.entry("decision").or_insert(json!(decision.as_str()));
        }
        redact_and_emit(self.ctx, self.stage.as_event(), decision.as_str(), fields);
    }

    pub fn emit_success(self) {
        self.emit(Decision::Success);
    }
    pub fn emit_failure(self) {
        self.emit(Decision::Failure);
    }
    pub fn emit_warn(self) {
        self.emit(Decision::Warn);
    }
}

fn redact_and_emit(ctx: &AuditCtx<'_>, event: &str, decision: &str, mut fields: Value) {
    if let Some(obj) = fields.as_object_mut() {
        obj.entry("schema_version").or_insert(json!(SCHEMA_VERSION));
        obj.entry("ts").or_insert(json!(ctx.ts));
        obj.entry("run_id").or_insert(json!(ctx.run_id));
        obj.entry("analysis").or_insert(json!(ctx.mode.analysis));
    }
    let out = if ctx.mode.redact {
        redact_event(fields)
    } else {
        fields
    };
    ctx.facts.emit(SUBSYSTEM, event, decision, out);
}
