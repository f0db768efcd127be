//! Board
//!
//! Owns every container and item. Membership changes go through here so
//! an item always has exactly one owner.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::container::{Container, Purpose};
use super::entity::{position_of, ContainerId, ItemId};
use super::item::{GradeMark, Item, ItemIdentity, ItemNode, Origin};
use crate::config::{BoardConfig, LimitAttr};
use crate::error::{TransferError, TransferResult};
use crate::host::{ActionRecord, HostBridge, ACTION_SET_CHILDREN};
use crate::ids::IdGenerator;

#[derive(Debug, Default)]
pub struct Board {
    containers: Vec<Container>,
    items: HashMap<ItemId, Item>,
    lock_on_correct: bool,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep items graded correct non-draggable across re-enables
    pub fn with_lock_on_correct(mut self, lock: bool) -> Self {
        self.lock_on_correct = lock;
        self
    }

    pub fn lock_on_correct(&self) -> bool {
        self.lock_on_correct
    }

    /// Build a board from declarations, minting ids where absent
    pub fn from_config(config: &BoardConfig, ids: &mut dyn IdGenerator) -> TransferResult<Self> {
        if config.id_separator.is_empty() {
            return Err(TransferError::InvalidConfig("idSeparator must not be empty".to_string()));
        }
        let mut board = Board::new().with_lock_on_correct(config.lock_on_correct);

        for decl in &config.containers {
            if decl.id.as_deref().is_some_and(|id| id.trim().is_empty()) {
                return Err(TransferError::InvalidConfig("container id must not be blank".to_string()));
            }
            let id = decl.id.clone().unwrap_or_else(|| ids.next_id());
            let purpose = decl.purpose.as_deref().map(Purpose::from_attr).unwrap_or_default();
            let mut container = Container::new(id.clone(), config.group_or_default(decl), purpose);
            container.cardinality_limit = decl.cardinality_limit.as_ref().and_then(LimitAttr::resolve);
            container.overflow_limit = decl.overflow_limit.as_ref().and_then(LimitAttr::resolve);
            board.add_container(container)?;

            for item_decl in &decl.items {
                let item_id = item_decl.id.clone().unwrap_or_else(|| ids.next_id());
                let identity = ItemIdentity {
                    tag: item_decl.tag.clone(),
                    classes: item_decl.classes.clone(),
                    component: item_decl.component.clone(),
                };
                let mut children = Vec::with_capacity(item_decl.children.len() + 1);
                if !item_decl.content.is_empty() {
                    children.push(ItemNode::text(item_decl.content.clone()));
                }
                children.extend(item_decl.children.iter().cloned());

                board.attach(Item::new(item_id.clone(), id.clone(), identity).with_children(children), &id)?;
                // Source-pool items stay locked until placed
                if purpose == Purpose::Source {
                    board.set_disabled(&item_id)?;
                }
            }

            if !decl.enabled {
                board.set_enabled(&id, false)?;
            }
        }

        tracing::debug!(
            containers = board.containers.len(),
            items = board.items.len(),
            "board initialized"
        );
        Ok(board)
    }

    pub fn add_container(&mut self, container: Container) -> TransferResult<()> {
        if position_of(&self.containers, &container.id).is_some() {
            return Err(TransferError::DuplicateId(container.id));
        }
        self.containers.push(container);
        Ok(())
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    pub fn container(&self, id: &str) -> TransferResult<&Container> {
        position_of(&self.containers, id)
            .map(|i| &self.containers[i])
            .ok_or_else(|| TransferError::UnknownContainer(id.to_string()))
    }

    pub fn container_mut(&mut self, id: &str) -> TransferResult<&mut Container> {
        position_of(&self.containers, id)
            .map(move |i| &mut self.containers[i])
            .ok_or_else(|| TransferError::UnknownContainer(id.to_string()))
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn item_mut(&mut self, id: &str) -> Option<&mut Item> {
        self.items.get_mut(id)
    }

    pub fn contains_item(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Give a new item to `container_id`
    pub fn attach(&mut self, mut item: Item, container_id: &str) -> TransferResult<()> {
        if self.items.contains_key(&item.id) {
            return Err(TransferError::DuplicateId(item.id));
        }
        let container = self.container_mut(container_id)?;
        container.children.push(item.id.clone());
        item.owner = container.id.clone();
        item.draggable = container.enabled && item.draggable;
        self.items.insert(item.id.clone(), item);
        Ok(())
    }

    /// Reassign ownership of an existing item
    pub fn move_item(&mut self, item_id: &str, target_id: &str) -> TransferResult<()> {
        // Validate the target before detaching anything
        self.container(target_id)?;
        let owner = self
            .items
            .get(item_id)
            .map(|item| item.owner.clone())
            .ok_or_else(|| TransferError::UnknownItem(item_id.to_string()))?;

        if let Ok(old) = self.container_mut(&owner) {
            old.children.retain(|c| c != item_id);
        }
        let target = self.container_mut(target_id)?;
        target.children.push(item_id.to_string());
        let target_id: ContainerId = target.id.clone();

        if let Some(item) = self.items.get_mut(item_id) {
            item.owner = target_id;
        }
        Ok(())
    }

    /// Delete an item from its owner and from the board
    pub fn remove_item(&mut self, item_id: &str) -> TransferResult<Item> {
        let item = self
            .items
            .remove(item_id)
            .ok_or_else(|| TransferError::UnknownItem(item_id.to_string()))?;
        if let Ok(owner) = self.container_mut(&item.owner) {
            owner.children.retain(|c| c != item_id);
        }
        Ok(item)
    }

    /// Remove the first (oldest) child of a container
    pub fn evict_oldest(&mut self, container_id: &str) -> TransferResult<Option<Item>> {
        let oldest = self.container(container_id)?.children.first().cloned();
        match oldest {
            Some(id) => self.remove_item(&id).map(Some),
            None => Ok(None),
        }
    }

    /// Toggle a container and propagate draggability to its children.
    /// With lock-on-correct, correct items stay non-draggable.
    pub fn set_enabled(&mut self, container_id: &str, enabled: bool) -> TransferResult<()> {
        let lock = self.lock_on_correct;
        let container = self.container_mut(container_id)?;
        container.enabled = enabled;
        if !enabled {
            container.drop_candidate = false;
        }
        let children = container.children.clone();

        for id in &children {
            if let Some(item) = self.items.get_mut(id) {
                let locked = lock && item.grade == Some(GradeMark::Correct);
                item.draggable = enabled && !locked;
            }
        }
        tracing::debug!(container = container_id, enabled, "container enablement changed");
        Ok(())
    }

    /// Disable an item and its entire subtree
    pub fn set_disabled(&mut self, item_id: &str) -> TransferResult<()> {
        self.item_mut(item_id)
            .ok_or_else(|| TransferError::UnknownItem(item_id.to_string()))?
            .set_disabled_deep(true);
        Ok(())
    }

    /// Re-enable an item and its entire subtree
    pub fn remove_disabled(&mut self, item_id: &str) -> TransferResult<()> {
        self.item_mut(item_id)
            .ok_or_else(|| TransferError::UnknownItem(item_id.to_string()))?
            .set_disabled_deep(false);
        Ok(())
    }

    /// Report every container's contents as one `SetChildren` action with
    /// the sorted, `;`-joined child ids.
    pub fn export_configuration(&self, host: &mut dyn HostBridge) {
        for container in &self.containers {
            let mut ids: Vec<&str> = container.children.iter().map(String::as_str).collect();
            ids.sort_unstable();
            host.record_action(&ActionRecord::new(container.id.clone(), ACTION_SET_CHILDREN, ids.join(";")));
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            containers: self
                .containers
                .iter()
                .map(|c| ContainerSnapshot {
                    id: c.id.clone(),
                    group: c.group.clone(),
                    purpose: c.purpose,
                    enabled: c.enabled,
                    drop_candidate: c.drop_candidate,
                    cardinality_limit: c.cardinality_limit,
                    overflow_limit: c.overflow_limit,
                    items: c.children.iter().filter_map(|id| self.items.get(id)).map(ItemSnapshot::from).collect(),
                })
                .collect(),
        }
    }
}

/// Read-only view of the board for rendering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub containers: Vec<ContainerSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSnapshot {
    pub id: ContainerId,
    pub group: String,
    pub purpose: Purpose,
    pub enabled: bool,
    pub drop_candidate: bool,
    pub cardinality_limit: Option<usize>,
    pub overflow_limit: Option<usize>,
    pub items: Vec<ItemSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub id: ItemId,
    pub owner: ContainerId,
    pub tag: String,
    pub classes: Vec<String>,
    pub component: Option<String>,
    pub origin_id: Option<ItemId>,
    pub source_of_origin: Origin,
    pub draggable: bool,
    pub disabled: bool,
    pub grade: Option<GradeMark>,
    pub children: Vec<ItemNode>,
}

impl From<&Item> for ItemSnapshot {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            owner: item.owner.clone(),
            tag: item.identity.tag.clone(),
            classes: item.identity.classes.clone(),
            component: item.identity.component.clone(),
            origin_id: item.origin_id.clone(),
            source_of_origin: item.source_of_origin,
            draggable: item.draggable,
            disabled: item.disabled,
            grade: item.grade,
            children: item.children.clone(),
        }
    }
}
