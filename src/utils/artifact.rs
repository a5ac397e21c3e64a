//! Utility functions for creating A2A Artifact objects.

use crate::types::{Artifact, Part};
use crate::utils::parts::get_text_parts;
use serde_json::Value;

/// Creates a new `Artifact` at index 0, not appended, not the last chunk.
///
/// Callers assembling a streamed artifact should set `index`/`append`/
/// `last_chunk` directly on the returned value as subsequent chunks arrive.
///
/// ```
/// use a2a_core::types::Part;
/// use a2a_core::utils::new_artifact;
///
/// let parts = vec![Part::Text { text: "Sample text".to_string(), metadata: None }];
/// let artifact = new_artifact(parts, "My Artifact", Some("This is a test artifact."));
/// assert_eq!(artifact.name, Some("My Artifact".to_string()));
/// ```
pub fn new_artifact(parts: Vec<Part>, name: impl Into<String>, description: Option<impl Into<String>>) -> Artifact {
    Artifact {
        name: Some(name.into()),
        description: description.map(|d| d.into()),
        parts,
        index: 0,
        append: false,
        last_chunk: false,
        metadata: None,
    }
}

/// Creates a new `Artifact` containing only a single text part.
///
/// ```
/// use a2a_core::utils::new_text_artifact;
///
/// let artifact = new_text_artifact("Text Artifact", "Hello, world!", Some("A greeting"));
/// assert_eq!(artifact.name, Some("Text Artifact".to_string()));
/// ```
pub fn new_text_artifact(name: impl Into<String>, text: impl Into<String>, description: Option<impl Into<String>>) -> Artifact {
    let part = Part::Text {
        text: text.into(),
        metadata: None,
    };
    new_artifact(vec![part], name, description)
}

/// Creates a new `Artifact` containing only a single data part.
///
/// ```
/// use a2a_core::utils::new_data_artifact;
/// use serde_json::json;
///
/// let data = json!({"key": "value", "number": 123});
/// let artifact = new_data_artifact("Data Artifact", data, Some("Sample data"));
/// assert_eq!(artifact.name, Some("Data Artifact".to_string()));
/// ```
pub fn new_data_artifact(name: impl Into<String>, data: Value, description: Option<impl Into<String>>) -> Artifact {
    let part = Part::Data { data, metadata: None };
    new_artifact(vec![part], name, description)
}

/// Extracts and joins all text content from an Artifact's parts.
///
/// ```
/// use a2a_core::types::Part;
/// use a2a_core::utils::{new_artifact, get_artifact_text};
///
/// let parts = vec![
///     Part::Text { text: "First line".to_string(), metadata: None },
///     Part::Text { text: "Second line".to_string(), metadata: None },
/// ];
/// let artifact = new_artifact(parts, "Multi-line", None::<String>);
/// let text = get_artifact_text(&artifact, "\n");
/// assert_eq!(text, "First line\nSecond line");
/// ```
pub fn get_artifact_text(artifact: &Artifact, delimiter: &str) -> String {
    get_text_parts(&artifact.parts).join(delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_artifact_starts_at_index_zero_unappended() {
        let parts = vec![Part::Text {
            text: "Sample text".to_string(),
            metadata: None,
        }];
        let artifact = new_artifact(parts, "test_artifact", None::<String>);
        assert_eq!(artifact.index, 0);
        assert!(!artifact.append);
        assert!(!artifact.last_chunk);
    }

    #[test]
    fn test_new_text_artifact() {
        let artifact = new_text_artifact("My Artifact", "Hello, world!", Some("A greeting"));
        assert_eq!(artifact.name, Some("My Artifact".to_string()));
        assert_eq!(artifact.description, Some("A greeting".to_string()));
        assert_eq!(artifact.parts.len(), 1);
    }

    #[test]
    fn test_new_data_artifact() {
        let data = json!({"key": "value"});
        let artifact = new_data_artifact("Data Artifact", data.clone(), None::<String>);
        assert_eq!(artifact.name, Some("Data Artifact".to_string()));
        assert_eq!(artifact.parts.len(), 1);
    }

    #[test]
    fn test_get_artifact_text_empty() {
        let artifact = new_artifact(vec![], "Empty", None::<String>);
        assert_eq!(get_artifact_text(&artifact, "\n"), "");
    }
}
