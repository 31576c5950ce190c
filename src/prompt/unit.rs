use super::{ContentBlock, Message};
use crate::units::{ImagePayload, UnitMetrics};

/// Messages describing the unit under review
pub fn create_unit_messages(images: &[ImagePayload], metrics: Option<&UnitMetrics>) -> Vec<Message> {
    let mut content = vec![ContentBlock::Text(
        "These are the images of unit for you to determine:".to_string(),
    )];
    content.extend(images.iter().cloned().map(ContentBlock::Image));

    let mut messages = vec![Message::user(content)];

    if let Some(metrics) = metrics {
        messages.push(Message::user(vec![ContentBlock::Text(format!(
            "These are the quality metrics of this unit - {}",
            metrics.describe()
        ))]));
    }

    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Modality;

    fn images() -> Vec<ImagePayload> {
        vec![ImagePayload {
            modality: Modality::AmplitudePlot,
            media_type: "image/jpeg",
            data: "abc".into(),
        }]
    }

    #[test]
    fn test_images_only() {
        let messages = create_unit_messages(&images(), None);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].image_count(), 1);
    }

    #[test]
    fn test_with_metrics() {
        let metrics = UnitMetrics {
            values: vec![("snr".to_string(), 4.5), ("presence_ratio".to_string(), 0.9)],
        };
        let messages = create_unit_messages(&images(), Some(&metrics));
        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages[1].content,
            vec![ContentBlock::Text(
                "These are the quality metrics of this unit - snr: 4.50000,presence_ratio: 0.90000"
                    .to_string()
            )]
        );
    }
}
