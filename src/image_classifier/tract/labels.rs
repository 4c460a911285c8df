use std::path::{Path, PathBuf};

/// Labels live next to the model as `<model stem>.txt`, one class per line.
pub fn labels_path(model_path: &Path) -> PathBuf {
    model_path.with_extension("txt")
}

pub fn load_labels(model_path: &Path) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
    let path = labels_path(model_path);
    if !path.exists() {
        return Ok(vec![]);
    }
    let contents = std::fs::read_to_string(&path)?;
    Ok(parse_labels(&contents))
}

/// Accepts both `Late blight` and the indexed `0 Late blight` style.
pub fn parse_labels(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.split_once(' ') {
            Some((index, rest)) if index.chars().all(|c| c.is_ascii_digit()) => {
                rest.trim().to_string()
            }
            _ => line.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_indexed_labels() {
        let labels = parse_labels("0 Tomato late blight\n1 Tomato healthy\n\n");

        assert_eq!(labels, vec!["Tomato late blight", "Tomato healthy"]);
    }

    #[test]
    fn test_parse_plain_labels() {
        let labels = parse_labels("Apple scab\r\n  Apple healthy  \n");

        assert_eq!(labels, vec!["Apple scab", "Apple healthy"]);
    }

    #[test]
    fn test_labels_path_replaces_extension() {
        assert_eq!(
            labels_path(Path::new("models/Tomato_model_unquant.tflite")),
            PathBuf::from("models/Tomato_model_unquant.txt")
        );
    }

    #[test]
    fn test_missing_labels_file_is_empty() {
        let labels = load_labels(Path::new("does/not/exist.onnx")).unwrap();

        assert!(labels.is_empty());
    }
}
