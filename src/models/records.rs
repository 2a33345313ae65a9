use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::style::RewriteStyle;

/// One rewrite invocation. Append-only; never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteRecord {
    pub id: String,
    pub article_id: String,
    pub original_title: String,
    pub rewritten_title: String,
    pub original_content: String,
    pub rewritten_content: String,
    pub style: RewriteStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_prompt: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

impl PublicationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PublicationStatus::Pending => "Publishing",
            PublicationStatus::Success => "Published",
            PublicationStatus::Failed => "Failed",
        }
    }
}

/// `view_count`/`like_count` are set iff `status` is `Success`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationRecord {
    pub id: String,
    pub article_id: String,
    pub account_id: String,
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub status: PublicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
}

/// Terminal outcome applied to a pending publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationUpdate {
    pub status: PublicationStatus,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
}

impl PublicationUpdate {
    pub fn success(view_count: u64, like_count: u64) -> Self {
        Self {
            status: PublicationStatus::Success,
            view_count: Some(view_count),
            like_count: Some(like_count),
        }
    }

    pub fn failed() -> Self {
        Self {
            status: PublicationStatus::Failed,
            view_count: None,
            like_count: None,
        }
    }

    pub fn apply(self, record: &mut PublicationRecord) {
        record.status = self.status;
        if self.status == PublicationStatus::Success {
            record.view_count = self.view_count;
            record.like_count = self.like_count;
        } else {
            record.view_count = None;
            record.like_count = None;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStatus {
    #[default]
    Generating,
    Completed,
    Failed,
}

impl ImageStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ImageStatus::Generating => "Generating",
            ImageStatus::Completed => "Completed",
            ImageStatus::Failed => "Failed",
        }
    }
}

/// `url` is empty while `status` is `Generating`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub id: String,
    pub article_id: String,
    pub url: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_paragraph: Option<usize>,
    pub created_at: DateTime<Utc>,
    pub status: ImageStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUpdate {
    pub url: Option<String>,
    pub prompt: Option<String>,
    pub associated_paragraph: Option<usize>,
    pub status: Option<ImageStatus>,
}

impl ImageUpdate {
    pub fn completed(url: String) -> Self {
        Self {
            url: Some(url),
            status: Some(ImageStatus::Completed),
            ..Self::default()
        }
    }

    pub fn failed() -> Self {
        Self {
            status: Some(ImageStatus::Failed),
            ..Self::default()
        }
    }

    pub fn generating() -> Self {
        Self {
            status: Some(ImageStatus::Generating),
            ..Self::default()
        }
    }

    pub fn apply(self, image: &mut GeneratedImage) {
        if let Some(url) = self.url {
            image.url = url;
        }
        if let Some(prompt) = self.prompt {
            image.prompt = prompt;
        }
        if let Some(paragraph) = self.associated_paragraph {
            image.associated_paragraph = Some(paragraph);
        }
        if let Some(status) = self.status {
            image.status = status;
        }
        if image.status == ImageStatus::Generating {
            image.url.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn publication() -> PublicationRecord {
        PublicationRecord {
            id: "pub-1".to_string(),
            article_id: "a".to_string(),
            account_id: "1".to_string(),
            title: "t".to_string(),
            published_at: Utc::now(),
            status: PublicationStatus::Pending,
            view_count: None,
            like_count: None,
        }
    }

    #[test]
    fn counts_only_survive_on_success() {
        let mut record = publication();
        PublicationUpdate::success(120, 12).apply(&mut record);
        assert_eq!(record.view_count, Some(120));

        PublicationUpdate {
            status: PublicationStatus::Failed,
            view_count: Some(1),
            like_count: Some(1),
        }
        .apply(&mut record);
        assert_eq!(record.status, PublicationStatus::Failed);
        assert_eq!(record.view_count, None);
        assert_eq!(record.like_count, None);
    }

    #[test]
    fn regenerating_clears_the_url() {
        let mut image = GeneratedImage {
            id: "img-1".to_string(),
            article_id: "a".to_string(),
            url: "/placeholder.svg?query=x".to_string(),
            prompt: "x".to_string(),
            associated_paragraph: Some(2),
            created_at: Utc::now(),
            status: ImageStatus::Completed,
        };

        ImageUpdate::generating().apply(&mut image);

        assert_eq!(image.status, ImageStatus::Generating);
        assert!(image.url.is_empty());
        assert_eq!(image.associated_paragraph, Some(2));
    }

    #[test]
    fn failed_publication_omits_counts_in_json() {
        let mut record = publication();
        PublicationUpdate::failed().apply(&mut record);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "failed");
        assert!(json.get("viewCount").is_none());
    }
}
