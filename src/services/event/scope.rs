//! Scoped deletion of recurring events: one occurrence, this and following,
//! or the whole series.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::recurrence::parse_rule;
use super::remote::{EventPatch, RemoteCalendar, RemoteError};
use crate::models::event::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteScope {
    /// Only the clicked occurrence
    Instance,
    /// The clicked occurrence and every later one
    Following,
    /// The whole series
    All,
}

/// What the remote side needs to carry out a scoped delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeRequest {
    /// Remote id of the clicked event
    pub event_id: String,
    pub scope: DeleteScope,
    pub recurring_event_id: Option<String>,
    pub original_start_time: Option<NaiveDateTime>,
}

impl ScopeRequest {
    pub fn for_event(event: &Event, remote_id: impl Into<String>, scope: DeleteScope) -> Self {
        Self {
            event_id: remote_id.into(),
            scope,
            recurring_event_id: event.recurring_event_id.clone(),
            original_start_time: event.original_start_time,
        }
    }

    fn master_id(&self) -> &str {
        self.recurring_event_id.as_deref().unwrap_or(&self.event_id)
    }
}

/// Carry out a scoped delete against the remote calendar.
///
/// "Following" ends the series just before the clicked occurrence by
/// rewriting the master's rules with an UNTIL one second before it. When the
/// boundary cannot be determined the whole series is deleted instead.
pub async fn delete_recurring_scope(
    remote: &dyn RemoteCalendar,
    request: &ScopeRequest,
) -> Result<(), RemoteError> {
    match request.scope {
        DeleteScope::Instance => remote.delete_event(&request.event_id).await,
        DeleteScope::All => remote.delete_event(request.master_id()).await,
        DeleteScope::Following => {
            let master_id = request.master_id();
            let (Some(_), Some(instance_start)) =
                (&request.recurring_event_id, request.original_start_time)
            else {
                log::warn!(
                    "No series boundary for {}; deleting the whole series",
                    request.event_id
                );
                return remote.delete_event(master_id).await;
            };

            let master = remote.get_event(master_id).await?;
            let rules = master.recurrence.unwrap_or_default();
            match end_rules_before(&rules, instance_start) {
                Some(rules) => {
                    log::info!("Ending series {} before {}", master_id, instance_start);
                    remote
                        .update_event(master_id, &EventPatch::recurrence(rules))
                        .await
                        .map(|_| ())
                }
                None => {
                    log::warn!(
                        "Series {} has no usable RRULE; deleting the whole series",
                        master_id
                    );
                    remote.delete_event(master_id).await
                }
            }
        }
    }
}

/// Rewrite every RRULE line to end one second before `instance_start`.
///
/// Other lines (EXDATE, RDATE) pass through. Returns `None` when there is no
/// RRULE line or one of them cannot be parsed.
pub fn end_rules_before(rules: &[String], instance_start: NaiveDateTime) -> Option<Vec<String>> {
    let until = instance_start - Duration::seconds(1);
    let mut saw_rule = false;
    let mut rewritten = Vec::with_capacity(rules.len());

    for line in rules {
        if !line.trim().to_ascii_uppercase().starts_with("RRULE") {
            rewritten.push(line.clone());
            continue;
        }
        saw_rule = true;
        match parse_rule(line) {
            Ok(rule) => rewritten.push(rule.with_until(until).to_rrule_string()),
            Err(err) => {
                log::debug!("Cannot rewrite rule {:?}: {}", line, err);
                return None;
            }
        }
    }

    saw_rule.then_some(rewritten)
}

/// Whether `candidate` disappears locally when `target` is deleted with `scope`.
pub fn is_removed_locally(target: &Event, scope: DeleteScope, candidate: &Event) -> bool {
    if candidate.id == target.id {
        return true;
    }
    match scope {
        DeleteScope::Instance => false,
        DeleteScope::All => {
            let series = target
                .recurring_event_id
                .as_deref()
                .or(target.remote_id.as_deref());
            series.is_some()
                && (candidate.recurring_event_id.as_deref() == series
                    || candidate.remote_id.as_deref() == series)
        }
        DeleteScope::Following => {
            match (&target.recurring_event_id, target.original_start_time) {
                (Some(series), Some(boundary)) => {
                    candidate.recurring_event_id.as_ref() == Some(series)
                        && candidate
                            .original_start_time
                            .map_or(false, |at| at >= boundary)
                }
                _ => false,
            }
        }
    }
}
