use super::{ContentBlock, Message};
use crate::error::PromptError;
use crate::units::{ImageTable, UnitId};

/// Render pre-labeled example units into user messages
///
/// Produces at most two messages (good examples, then bad examples); an
/// empty id list contributes no message.
pub fn create_fewshot_messages(
    images: &ImageTable,
    good_ids: &[UnitId],
    bad_ids: &[UnitId],
) -> Result<Vec<Message>, PromptError> {
    let mut messages = Vec::new();

    for (caption, ids) in [
        ("Few examples of good spikes", good_ids),
        ("Few examples of bad spikes", bad_ids),
    ] {
        if ids.is_empty() {
            continue;
        }

        let mut content = vec![ContentBlock::Text(caption.to_string())];
        for &id in ids {
            let unit_images = images.get(id).ok_or(PromptError::UnknownExample(id))?;
            content.extend(unit_images.iter().cloned().map(ContentBlock::Image));
        }
        messages.push(Message::user(content));
    }

    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Modality;
    use crate::prompt::Role;
    use crate::units::ImagePayload;

    fn table() -> ImageTable {
        let mut table = ImageTable::new();
        for id in [1, 2, 3] {
            table.insert(
                id,
                vec![
                    ImagePayload {
                        modality: Modality::WaveformSingle,
                        media_type: "image/png",
                        data: format!("wf{}", id).into(),
                    },
                    ImagePayload {
                        modality: Modality::Autocorr,
                        media_type: "image/png",
                        data: format!("acg{}", id).into(),
                    },
                ],
            );
        }
        table
    }

    #[test]
    fn test_no_examples() {
        let messages = create_fewshot_messages(&table(), &[], &[]).unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn test_good_and_bad_examples() {
        let messages = create_fewshot_messages(&table(), &[1], &[2, 3]).unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().all(|m| m.role == Role::User));
        assert_eq!(
            messages[0].content[0],
            ContentBlock::Text("Few examples of good spikes".to_string())
        );
        assert_eq!(messages[0].image_count(), 2);
        assert_eq!(messages[1].image_count(), 4);
    }

    #[test]
    fn test_only_bad_examples() {
        let messages = create_fewshot_messages(&table(), &[], &[3]).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0].content[0],
            ContentBlock::Text("Few examples of bad spikes".to_string())
        );
    }

    #[test]
    fn test_unknown_example() {
        let err = create_fewshot_messages(&table(), &[42], &[]).unwrap_err();
        assert!(matches!(err, PromptError::UnknownExample(42)));
    }
}
