//! Topic positions on the canvas.
//!
//! Positions are written once per drag, on release. Pointer moves in between
//! only change what is drawn.

use crate::error::Result;
use crate::gesture::{DragRelease, Point, PointerDrag};
use crate::store::{DataStore, TopicPatch};

/// Stores a topic's position as given.
pub fn move_topic<S: DataStore>(store: &mut S, topic_id: &str, x: f64, y: f64) -> Result<()> {
    store.update_topic(
        topic_id,
        &TopicPatch {
            pos_x: Some(x),
            pos_y: Some(y),
            ..Default::default()
        },
    )?;
    tracing::debug!(topic = topic_id, x, y, "topic moved");
    Ok(())
}

/// Ends a canvas drag: clicks write nothing, moves persist the new position.
pub fn release_drag<S: DataStore>(
    store: &mut S,
    topic_id: &str,
    drag: &PointerDrag,
    pointer: Point,
) -> Result<DragRelease> {
    let release = drag.release(pointer);
    if let DragRelease::Moved { x, y } = release {
        move_topic(store, topic_id, x, y)?;
    }
    Ok(release)
}
