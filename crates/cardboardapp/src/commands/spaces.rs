//! Spaces and their display groups.
//!
//! A group is only a label on each space; there is no group document. Renaming
//! or deleting a group touches every space carrying that label.

use super::{topics, CascadeReport};
use crate::error::{CardboardError, Result};
use crate::model::{new_id, normalize_group, Space};
use crate::store::{BatchReport, DataStore, SpacePatch};

/// Spaces sharing one group label, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceGroup {
    pub name: String,
    pub spaces: Vec<Space>,
}

fn require_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CardboardError::Validation("space name must not be empty".into()));
    }
    Ok(trimmed.to_string())
}

/// Creates a space at the end of the display order.
///
/// `order` is `max + 1` over existing spaces, `0` for the first one. It is
/// advisory: two concurrent creators may pick the same value.
pub fn create<S: DataStore>(store: &mut S, name: &str, group: &str) -> Result<Space> {
    let name = require_name(name)?;
    let order = store
        .list_spaces()?
        .iter()
        .map(|s| s.order)
        .max()
        .map_or(0, |max| max + 1);

    let space = Space {
        id: new_id(),
        name,
        group: normalize_group(group),
        order,
    };
    store.save_space(&space)?;
    tracing::debug!(space = %space.id, order, "space created");
    Ok(space)
}

pub fn list<S: DataStore>(store: &S) -> Result<Vec<Space>> {
    store.list_spaces()
}

/// Spaces clustered by group, groups sorted by name.
pub fn grouped<S: DataStore>(store: &S) -> Result<Vec<SpaceGroup>> {
    let mut groups: Vec<SpaceGroup> = Vec::new();
    for space in store.list_spaces()? {
        let name = space.display_group();
        match groups.iter_mut().find(|g| g.name == name) {
            Some(group) => group.spaces.push(space),
            None => groups.push(SpaceGroup {
                name,
                spaces: vec![space],
            }),
        }
    }
    groups.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(groups)
}

pub fn rename<S: DataStore>(store: &mut S, id: &str, name: &str) -> Result<()> {
    let name = require_name(name)?;
    store.update_space(
        id,
        &SpacePatch {
            name: Some(name),
            ..Default::default()
        },
    )?;
    tracing::debug!(space = id, "space renamed");
    Ok(())
}

/// Moves a space to another group; a blank group means the default one.
pub fn set_group<S: DataStore>(store: &mut S, id: &str, group: &str) -> Result<()> {
    store.update_space(
        id,
        &SpacePatch {
            group: Some(normalize_group(group)),
            ..Default::default()
        },
    )
}

/// Rewrites `order` to each space's 0-based position in `ordered_ids`.
///
/// Unknown ids fail before anything is written.
pub fn reorder<S: DataStore>(store: &mut S, ordered_ids: &[String]) -> Result<BatchReport> {
    let spaces = store.list_spaces()?;
    if let Some(unknown) = ordered_ids
        .iter()
        .find(|id| !spaces.iter().any(|s| &s.id == *id))
    {
        return Err(CardboardError::SpaceNotFound(unknown.clone()));
    }

    let report = BatchReport::gather(ordered_ids.iter().cloned(), |id| {
        let order = ordered_ids.iter().position(|o| o == id).map_or(0, |p| p as i64);
        store.update_space(
            id,
            &SpacePatch {
                order: Some(order),
                ..Default::default()
            },
        )
    });
    Ok(report)
}

/// Relabels every space in group `from` to group `to`.
pub fn rename_group<S: DataStore>(store: &mut S, from: &str, to: &str) -> Result<BatchReport> {
    let from = normalize_group(from);
    let to = normalize_group(to);
    let members = members_of(store, &from)?;
    if members.is_empty() {
        return Err(CardboardError::Validation(format!("no spaces in group '{}'", from)));
    }

    let report = BatchReport::gather(members, |id| {
        store.update_space(
            id,
            &SpacePatch {
                group: Some(to.clone()),
                ..Default::default()
            },
        )
    });
    tracing::debug!(from = %from, to = %to, renamed = report.succeeded.len(), "group renamed");
    Ok(report)
}

fn members_of<S: DataStore>(store: &S, group: &str) -> Result<Vec<String>> {
    Ok(store
        .list_spaces()?
        .into_iter()
        .filter(|s| s.display_group() == group)
        .map(|s| s.id)
        .collect())
}

/// Deletes a space with all its topics and their flashcards.
///
/// Children go first and the space document last. Nothing is rolled back on
/// failure; running the delete again picks up whatever is left.
pub fn delete<S: DataStore>(store: &mut S, id: &str) -> Result<CascadeReport> {
    let mut report = CascadeReport::default();
    for topic in store.list_topics(id)? {
        report.absorb(topics::delete(store, &topic.id)?);
    }
    store.delete_space(id)?;
    report.spaces += 1;
    tracing::info!(
        space = id,
        topics = report.topics,
        flashcards = report.flashcards,
        "space deleted"
    );
    Ok(report)
}

/// Deletes every space in a group, cascading to their topics and cards.
pub fn delete_group<S: DataStore>(store: &mut S, group: &str) -> Result<CascadeReport> {
    let mut report = CascadeReport::default();
    for id in members_of(store, &normalize_group(group))? {
        report.absorb(delete(store, &id)?);
    }
    Ok(report)
}
