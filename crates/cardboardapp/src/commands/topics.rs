use super::CascadeReport;
use crate::error::{CardboardError, Result};
use crate::model::{new_id, Topic};
use crate::store::{DataStore, TopicPatch};

/// Fields of a topic being created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTopic {
    pub space_id: String,
    pub title: String,
    pub content: String,
    pub pos_x: f64,
    pub pos_y: f64,
}

fn require_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CardboardError::Validation("topic title must not be empty".into()));
    }
    Ok(trimmed.to_string())
}

/// Creates a topic at the given canvas position.
///
/// Positions are taken as given; overlapping topics are the caller's concern.
pub fn create<S: DataStore>(store: &mut S, new: NewTopic) -> Result<Topic> {
    let title = require_title(&new.title)?;
    store.get_space(&new.space_id)?;

    let topic = Topic {
        id: new_id(),
        space_id: new.space_id,
        title,
        content: new.content,
        pos_x: new.pos_x,
        pos_y: new.pos_y,
        success_average: None,
    };
    store.save_topic(&topic)?;
    tracing::debug!(topic = %topic.id, space = %topic.space_id, "topic created");
    Ok(topic)
}

pub fn get<S: DataStore>(store: &S, id: &str) -> Result<Topic> {
    store.get_topic(id)
}

pub fn list<S: DataStore>(store: &S, space_id: &str) -> Result<Vec<Topic>> {
    let mut topics = store.list_topics(space_id)?;
    topics.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
    Ok(topics)
}

/// Updates title and/or content, leaving unspecified fields alone.
pub fn update<S: DataStore>(
    store: &mut S,
    id: &str,
    title: Option<&str>,
    content: Option<&str>,
) -> Result<Topic> {
    let patch = TopicPatch {
        title: title.map(require_title).transpose()?,
        content: content.map(str::to_string),
        ..Default::default()
    };
    store.update_topic(id, &patch)?;
    tracing::debug!(topic = id, "topic updated");
    store.get_topic(id)
}

/// Deletes a topic's flashcards, then the topic itself.
///
/// Safe to repeat: a topic whose document is already gone still has any
/// leftover cards swept.
pub fn delete<S: DataStore>(store: &mut S, id: &str) -> Result<CascadeReport> {
    let mut report = CascadeReport::default();
    for card in store.list_flashcards(id)? {
        store.delete_flashcard(id, &card.id)?;
        report.flashcards += 1;
    }

    let existed = match store.get_topic(id) {
        Ok(_) => true,
        Err(e) if e.is_not_found() => false,
        Err(e) => return Err(e),
    };
    store.delete_topic(id)?;
    if existed {
        report.topics += 1;
    }
    tracing::debug!(topic = id, flashcards = report.flashcards, "topic deleted");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CardStatus;
    use crate::store::memory::fixtures::StoreFixture;

    fn new_topic(space_id: &str, title: &str) -> NewTopic {
        NewTopic {
            space_id: space_id.into(),
            title: title.into(),
            content: String::new(),
            pos_x: 120.5,
            pos_y: -30.0,
        }
    }

    #[test]
    fn create_keeps_given_position() {
        let mut store = StoreFixture::new().with_space("s", "", 0).build();
        let topic = create(&mut store, new_topic("s", "Cells")).unwrap();

        let stored = get(&store, &topic.id).unwrap();
        assert_eq!(stored.pos_x, 120.5);
        assert_eq!(stored.pos_y, -30.0);
        assert_eq!(stored.success_average, None);
    }

    #[test]
    fn create_in_unknown_space_is_not_found() {
        let mut store = StoreFixture::new().build();
        let err = create(&mut store, new_topic("nope", "Cells")).unwrap_err();
        assert!(matches!(err, CardboardError::SpaceNotFound(_)));
    }

    #[test]
    fn create_requires_title() {
        let mut store = StoreFixture::new().with_space("s", "", 0).build();
        assert!(matches!(
            create(&mut store, new_topic("s", " ")),
            Err(CardboardError::Validation(_))
        ));
    }

    #[test]
    fn list_is_scoped_to_space() {
        let mut store = StoreFixture::new()
            .with_space("s", "", 0)
            .with_space("o", "", 1)
            .build();
        create(&mut store, new_topic("s", "Beta")).unwrap();
        create(&mut store, new_topic("s", "Alpha")).unwrap();
        create(&mut store, new_topic("o", "Other")).unwrap();

        let titles: Vec<String> = list(&store, "s").unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn update_changes_only_given_fields() {
        let mut store = StoreFixture::new()
            .with_space("s", "", 0)
            .with_topic("t", "s")
            .build();

        let topic = update(&mut store, "t", None, Some("notes")).unwrap();
        assert_eq!(topic.title, "Topic t");
        assert_eq!(topic.content, "notes");
        assert_eq!(topic.pos_x, 50.0);

        assert!(update(&mut store, "t", Some(""), None).is_err());
        assert!(update(&mut store, "ghost", Some("x"), None)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn delete_removes_cards_then_topic() {
        let mut store = StoreFixture::new()
            .with_space("s", "", 0)
            .with_topic("t", "s")
            .with_cards("t", &[("a", CardStatus::New), ("b", CardStatus::Learning)])
            .build();

        let report = delete(&mut store, "t").unwrap();
        assert_eq!(report.topics, 1);
        assert_eq!(report.flashcards, 2);
        assert!(get(&store, "t").unwrap_err().is_not_found());
        assert!(store.list_flashcards("t").unwrap().is_empty());

        // Repeating is harmless.
        assert_eq!(delete(&mut store, "t").unwrap(), CascadeReport::default());
    }

    #[test]
    fn card_failure_keeps_topic_for_retry() {
        let mut store = StoreFixture::new()
            .with_space("s", "", 0)
            .with_topic("t", "s")
            .with_cards("t", &[("a", CardStatus::New), ("b", CardStatus::New)])
            .build();
        store.backend().fail_writes_for("b");

        assert!(delete(&mut store, "t").is_err());
        assert!(get(&store, "t").is_ok());

        store.backend().clear_write_failures();
        let report = delete(&mut store, "t").unwrap();
        assert_eq!(report.flashcards, 1);
        assert_eq!(report.topics, 1);
    }
}
