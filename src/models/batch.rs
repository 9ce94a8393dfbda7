use serde::Serialize;
use std::path::PathBuf;

/// An image that has been durably written. Only ever built from a successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredImage {
    pub identifier: String,
    pub path: PathBuf,
}

/// Terminal state of one prompt in a batch.
#[derive(Debug, Clone)]
pub enum GenerationResult {
    Success {
        index: usize,
        image: StoredImage,
        payload: Vec<u8>,
    },
    Failure {
        index: usize,
        prompt: String,
        error: String,
    },
}

impl GenerationResult {
    pub fn index(&self) -> usize {
        match self {
            GenerationResult::Success { index, .. } | GenerationResult::Failure { index, .. } => {
                *index
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Success { .. })
    }

    pub fn stored_image(&self) -> Option<&StoredImage> {
        match self {
            GenerationResult::Success { image, .. } => Some(image),
            GenerationResult::Failure { .. } => None,
        }
    }
}

/// Ordered outcome of a batch; position `i` belongs to prompt `i`.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub results: Vec<GenerationResult>,
}

impl BatchReport {
    pub fn new(results: Vec<GenerationResult>) -> Self {
        Self { results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn stored_images(&self) -> Vec<Option<&StoredImage>> {
        self.results.iter().map(|r| r.stored_image()).collect()
    }

    pub fn successful_paths(&self) -> Vec<&PathBuf> {
        self.results
            .iter()
            .filter_map(|r| r.stored_image())
            .map(|image| &image.path)
            .collect()
    }

    /// `(index, error)` for every failed prompt.
    pub fn failures(&self) -> Vec<(usize, &str)> {
        self.results
            .iter()
            .filter_map(|r| match r {
                GenerationResult::Failure { index, error, .. } => Some((*index, error.as_str())),
                GenerationResult::Success { .. } => None,
            })
            .collect()
    }

    pub fn summary_line(&self) -> String {
        format!(
            "Generated {}/{} images successfully",
            self.success_count(),
            self.len()
        )
    }
}
