//! Transfer Protocol
//!
//! State machine for one drag gesture at a time:
//! `start -> evaluate* -> commit? -> cleanup`.
//!
//! Source-pool drags negotiate under a candidate id for a clone that does
//! not exist yet; the clone is only materialized on commit, so aborted
//! drags leave nothing behind.

use crate::config::BoardConfig;
use crate::domain::{Board, BoardSnapshot, ContainerId, GradeMark, Item, ItemId, ItemIdentity, ItemSnapshot, Purpose};
use crate::error::{RejectReason, TransferError, TransferResult};
use crate::hasher::{IdentityHasher, PolynomialHasher};
use crate::host::{ActionRecord, HostBridge, Verdict, ACTION_ADD};
use crate::ids::IdGenerator;
use crate::side_table::DragSideTable;
use crate::transport::{
    parse_tag_key, tag_key, DragTransport, FORMAT_GROUP, FORMAT_ORIGINAL, FORMAT_ORIGIN_CONTAINER, FORMAT_PRIMARY,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Dragging,
    /// Last hover evaluated `target`
    EvaluatingDrop { target: ContainerId, allow: bool },
    Committing,
}

/// The gesture in flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub candidate_id: ItemId,
    /// Item the pointer picked up
    pub original_id: ItemId,
    pub origin_container_id: ContainerId,
    pub group: String,
    /// Candidate names a clone still to be created
    pub clone: bool,
    /// Identity snapshot for materializing the clone
    pub identity: ItemIdentity,
    pub hash: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOutcome {
    pub candidate_id: ItemId,
    pub hash: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub allow: bool,
    pub reason: Option<RejectReason>,
}

impl Evaluation {
    fn allowed() -> Self {
        Self { allow: true, reason: None }
    }

    fn rejected(reason: RejectReason) -> Self {
        Self { allow: false, reason: Some(reason) }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// Item now lives in a destination
    Placed {
        item_id: ItemId,
        cloned_from: Option<ItemId>,
        /// Clone origin vanished; default-initialized content kept
        degraded: bool,
        /// Oldest child removed by the overflow limit
        evicted: Option<ItemSnapshot>,
    },
    /// Dropped into a trashcan or a source: deleted
    Discarded { item_id: ItemId, purpose: Purpose },
    Rejected(RejectReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackOutcome {
    Marked { item_id: ItemId, verdict: Verdict },
    Delegated,
    /// "Add" feedback for an item that is gone
    Stale,
}

pub struct TransferProtocol<H: HostBridge> {
    board: Board,
    side_table: DragSideTable,
    host: H,
    ids: Box<dyn IdGenerator>,
    hasher: Box<dyn IdentityHasher>,
    separator: String,
    phase: Phase,
    session: Option<DragSession>,
    /// (target, allow) of the latest evaluate
    last_evaluation: Option<(ContainerId, bool)>,
}

impl<H: HostBridge> TransferProtocol<H> {
    /// Build the board from `config` and initialize nested components
    pub fn new(config: &BoardConfig, mut host: H, mut ids: Box<dyn IdGenerator>) -> TransferResult<Self> {
        let mut board = Board::from_config(config, ids.as_mut())?;
        let component_items: Vec<(ItemId, String)> = board
            .containers()
            .iter()
            .flat_map(|c| c.children.iter())
            .filter_map(|id| board.item(id))
            .filter_map(|item| Some((item.id.clone(), item.identity.component.clone()?)))
            .filter(|(_, component)| host.is_component(component))
            .collect();

        for (item_id, component) in component_items {
            if let Some(item) = board.item_mut(&item_id) {
                if item.children.is_empty() {
                    item.children = host.default_children(&component);
                }
                host.initialize_component(item, &component);
            }
        }

        Ok(Self::with_board(board, host, ids).with_separator(&config.id_separator))
    }

    pub fn with_board(board: Board, host: H, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            board,
            side_table: DragSideTable::new(),
            host,
            ids,
            hasher: Box::new(PolynomialHasher),
            separator: "_".to_string(),
            phase: Phase::Idle,
            session: None,
            last_evaluation: None,
        }
    }

    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    pub fn with_hasher(mut self, hasher: Box<dyn IdentityHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for host-driven state changes, such as a
    /// learner typing into a nested component.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.board.snapshot()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn side_table(&self) -> &DragSideTable {
        &self.side_table
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn hash(&self, candidate_id: &str) -> i32 {
        self.hasher.hash(candidate_id)
    }

    fn container_enabled(&self, id: &str) -> bool {
        self.board.container(id).map_or(false, |c| c.enabled) && self.host.is_enabled(id)
    }

    /// Begin dragging `item_id` out of `origin_container_id`.
    ///
    /// Writes group, origin and candidate metadata to the transport and
    /// registers the candidate in the side-table. Returns `None` when the
    /// drag is not allowed; the board is never mutated here.
    pub fn start(
        &mut self,
        item_id: &str,
        origin_container_id: &str,
        transport: &mut dyn DragTransport,
    ) -> Option<StartOutcome> {
        if !self.container_enabled(origin_container_id) {
            tracing::debug!(item = item_id, origin = origin_container_id, "drag refused: origin disabled");
            return None;
        }
        let origin = self.board.container(origin_container_id).ok()?;
        let Some(item) = self.board.item(item_id).filter(|i| i.owner == origin.id) else {
            tracing::warn!(item = item_id, origin = origin_container_id, "drag refused: item not in origin");
            return None;
        };
        if !item.draggable {
            tracing::debug!(item = item_id, "drag refused: item locked");
            return None;
        }

        let group = origin.group.clone();
        let clone = origin.purpose == Purpose::Source;
        let candidate_id = if clone {
            format!("{}{}{}", item.id, self.separator, self.ids.next_id())
        } else {
            item.id.clone()
        };
        let identity = item.identity.clone();
        let hash = self.hasher.hash(&candidate_id);

        if let Some(stale) = self.session.take() {
            tracing::warn!(stale = %stale.candidate_id, "drag started while another was in flight");
        }
        self.side_table.begin(hash, &candidate_id, &group, origin_container_id);

        transport.set_data(FORMAT_PRIMARY, &candidate_id);
        transport.set_data(FORMAT_GROUP, &group);
        transport.set_data(FORMAT_ORIGIN_CONTAINER, origin_container_id);
        transport.set_data(FORMAT_ORIGINAL, item_id);
        transport.set_data(&tag_key(hash), &candidate_id);

        tracing::debug!(candidate = %candidate_id, clone, group = %group, "drag started");
        self.session = Some(DragSession {
            candidate_id: candidate_id.clone(),
            original_id: item_id.to_string(),
            origin_container_id: origin_container_id.to_string(),
            group,
            clone,
            identity,
            hash,
        });
        self.phase = Phase::Dragging;
        Some(StartOutcome { candidate_id, hash })
    }

    /// Decide whether the drag described by `transport` may drop on
    /// `target_id`. Updates the target's valid-drop cue.
    pub fn evaluate(&mut self, transport: &dyn DragTransport, target_id: &str) -> Evaluation {
        let evaluation = match self.check_drop(transport, target_id) {
            Ok(()) => Evaluation::allowed(),
            Err(reason) => Evaluation::rejected(reason),
        };

        if let Ok(target) = self.board.container_mut(target_id) {
            target.drop_candidate = evaluation.allow;
        }
        self.last_evaluation = Some((target_id.to_string(), evaluation.allow));
        self.phase = Phase::EvaluatingDrop {
            target: target_id.to_string(),
            allow: evaluation.allow,
        };
        evaluation
    }

    fn check_drop(&self, transport: &dyn DragTransport, target_id: &str) -> Result<(), RejectReason> {
        if !self.container_enabled(target_id) {
            return Err(RejectReason::Disabled);
        }
        let target = self.board.container(target_id).map_err(|_| RejectReason::Disabled)?;
        if target.is_full() {
            return Err(RejectReason::CardinalityReached);
        }
        if !transport.has_type(FORMAT_GROUP) {
            return Err(RejectReason::NotManaged);
        }

        let (group, origin) = self.resolve_origin(transport).ok_or(RejectReason::Unresolved)?;
        if group != target.group {
            return Err(RejectReason::GroupMismatch);
        }
        if origin == target.id {
            return Err(RejectReason::SelfDrop);
        }
        if target.purpose == Purpose::Source {
            return Err(RejectReason::SourceTarget);
        }
        Ok(())
    }

    /// (group, origin container) from the payload when readable, else via
    /// the side-table marker.
    fn resolve_origin(&self, transport: &dyn DragTransport) -> Option<(String, String)> {
        if let (Some(group), Some(origin)) = (
            transport.get_data(FORMAT_GROUP),
            transport.get_data(FORMAT_ORIGIN_CONTAINER),
        ) {
            return Some((group, origin));
        }
        transport
            .types()
            .iter()
            .filter_map(|t| parse_tag_key(t))
            .find_map(|hash| self.side_table.lookup(hash))
            .map(|entry| (entry.group.clone(), entry.origin_container_id.clone()))
    }

    /// Candidate id carried by `transport`, via the side-table when the
    /// primary payload is withheld.
    pub fn resolve_candidate(&self, transport: &dyn DragTransport) -> Option<ItemId> {
        if let Some(id) = transport.get_data(FORMAT_PRIMARY).filter(|id| !id.is_empty()) {
            return Some(id);
        }
        transport
            .types()
            .iter()
            .filter_map(|t| parse_tag_key(t))
            .find_map(|hash| self.side_table.lookup(hash))
            .map(|entry| entry.id.clone())
    }

    /// Pointer left `target_id`: drop its cue. The latest evaluation is
    /// kept; `drop` only reaches a target whose last `dragover` accepted.
    pub fn leave(&mut self, target_id: &str) {
        if let Ok(target) = self.board.container_mut(target_id) {
            target.drop_candidate = false;
        }
        if matches!(&self.phase, Phase::EvaluatingDrop { target, .. } if target == target_id) {
            self.phase = Phase::Dragging;
        }
    }

    /// Drop onto `target_id`: resolve the candidate from the drop-time
    /// payload, commit it, then end the gesture. The dragged node may be
    /// gone before its `dragend`, so cleanup happens here as well.
    pub fn complete_drop(&mut self, transport: &dyn DragTransport, target_id: &str) -> Option<CommitOutcome> {
        let candidate = self.resolve_candidate(transport)?;
        let outcome = self.commit(&candidate, target_id);
        self.cleanup(&candidate);
        Some(outcome)
    }

    /// Apply the drop of `candidate_id` onto `target_id`
    pub fn commit(&mut self, candidate_id: &str, target_id: &str) -> CommitOutcome {
        self.phase = Phase::Committing;
        let evaluated = matches!(&self.last_evaluation, Some((t, true)) if t == target_id);

        let outcome = if !evaluated {
            CommitOutcome::Rejected(RejectReason::NotEvaluated)
        } else if !self.container_enabled(target_id) {
            CommitOutcome::Rejected(RejectReason::Disabled)
        } else {
            match self.apply_commit(candidate_id, target_id) {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::warn!(candidate = candidate_id, target = target_id, %err, "commit abandoned");
                    CommitOutcome::Rejected(RejectReason::Unresolved)
                }
            }
        };

        if let Ok(target) = self.board.container_mut(target_id) {
            target.drop_candidate = false;
        }
        self.last_evaluation = None;
        self.session = None;
        self.phase = Phase::Idle;
        outcome
    }

    fn apply_commit(&mut self, candidate_id: &str, target_id: &str) -> TransferResult<CommitOutcome> {
        let mut cloned_from = None;
        let mut degraded = false;

        if self.board.contains_item(candidate_id) {
            self.board.move_item(candidate_id, target_id)?;
        } else {
            let session = self
                .session
                .clone()
                .filter(|s| s.clone && s.candidate_id == candidate_id)
                .ok_or_else(|| TransferError::UnknownCandidate(candidate_id.to_string()))?;
            degraded = !self.materialize_clone(&session, target_id)?;
            cloned_from = Some(session.original_id);
        }

        let purpose = self.board.container(target_id)?.purpose;
        match purpose {
            Purpose::Trashcan | Purpose::Source => {
                self.board.remove_item(candidate_id)?;
                tracing::info!(item = candidate_id, target = target_id, purpose = purpose.as_str(), "item discarded");
                Ok(CommitOutcome::Discarded {
                    item_id: candidate_id.to_string(),
                    purpose,
                })
            }
            Purpose::Destination => {
                let enabled = self.board.container(target_id)?.enabled;
                if let Some(item) = self.board.item_mut(candidate_id) {
                    item.clear_grade();
                    item.draggable = enabled;
                }
                self.board.remove_disabled(candidate_id)?;
                self.host
                    .record_action(&ActionRecord::new(target_id, ACTION_ADD, candidate_id));

                let evicted = if self.board.container(target_id)?.is_overflowing() {
                    self.board.evict_oldest(target_id)?.map(|item| ItemSnapshot::from(&item))
                } else {
                    None
                };
                tracing::info!(
                    item = candidate_id,
                    target = target_id,
                    cloned = cloned_from.is_some(),
                    evicted = evicted.as_ref().map(|e| e.id.as_str()),
                    "item placed"
                );
                Ok(CommitOutcome::Placed {
                    item_id: candidate_id.to_string(),
                    cloned_from,
                    degraded,
                    evicted,
                })
            }
        }
    }

    /// Create the clone for `session` under `target_id`. Returns false when
    /// the origin item is gone and reconciliation was skipped.
    fn materialize_clone(&mut self, session: &DragSession, target_id: &str) -> TransferResult<bool> {
        let mut clone = Item::shallow_clone(&session.candidate_id, &session.identity, &session.original_id);
        let component = session.identity.component.clone();
        if let Some(component) = &component {
            clone.children = self.host.default_children(component);
        }

        let reconciled = match self.board.item_mut(&session.original_id) {
            Some(origin) => {
                clone.reconcile_with(&origin.children);
                // The origin stays reusable for later drags
                origin.clear_grade();
                true
            }
            None => {
                tracing::warn!(
                    origin = %session.original_id,
                    candidate = %session.candidate_id,
                    "clone origin missing, keeping default content"
                );
                false
            }
        };
        clone.clear_grade();

        if let Some(component) = component.filter(|c| self.host.is_component(c)) {
            self.host.initialize_component(&mut clone, &component);
        }
        self.board.attach(clone, target_id)?;
        Ok(reconciled)
    }

    /// Drag ended, with or without a drop. Idempotent.
    pub fn cleanup(&mut self, candidate_id: &str) {
        let hash = self.hasher.hash(candidate_id);
        self.side_table.end(hash);

        if self.session.as_ref().map_or(true, |s| s.candidate_id == candidate_id) {
            self.session = None;
            self.last_evaluation = None;
            self.phase = Phase::Idle;
            for id in self.board.containers().iter().map(|c| c.id.clone()).collect::<Vec<_>>() {
                if let Ok(container) = self.board.container_mut(&id) {
                    container.drop_candidate = false;
                }
            }
        }
        tracing::debug!(candidate = candidate_id, "drag cleaned up");
    }

    pub fn set_enabled(&mut self, container_id: &str, enabled: bool) {
        if let Err(err) = self.board.set_enabled(container_id, enabled) {
            tracing::warn!(%err, "set_enabled ignored");
        }
    }

    pub fn set_disabled(&mut self, item_id: &str) {
        if let Err(err) = self.board.set_disabled(item_id) {
            tracing::warn!(%err, "set_disabled ignored");
        }
    }

    pub fn remove_disabled(&mut self, item_id: &str) {
        if let Err(err) = self.board.remove_disabled(item_id) {
            tracing::warn!(%err, "remove_disabled ignored");
        }
    }

    /// Grading feedback for a recorded action (showCorrect / showInCorrect)
    pub fn apply_feedback(&mut self, record: &ActionRecord, verdict: Verdict) -> FeedbackOutcome {
        if record.action != ACTION_ADD {
            self.host.default_feedback(record, verdict);
            return FeedbackOutcome::Delegated;
        }

        let lock = self.board.lock_on_correct();
        let Some(item) = self.board.item_mut(&record.input) else {
            tracing::debug!(item = %record.input, "feedback for a removed item");
            return FeedbackOutcome::Stale;
        };
        match verdict {
            Verdict::Correct => {
                item.grade = Some(GradeMark::Correct);
                if lock {
                    item.draggable = false;
                }
            }
            Verdict::Incorrect => item.grade = Some(GradeMark::Incorrect),
        }
        FeedbackOutcome::Marked {
            item_id: record.input.clone(),
            verdict,
        }
    }

    /// Emit a `SetChildren` action per container
    pub fn export_configuration(&mut self) {
        self.board.export_configuration(&mut self.host);
    }
}
