use derive_more::{AsRef, Deref, From, Into};
use serde::{Deserialize, Serialize};

/// An ordered, fixed-length sequence of floats produced by a provider.
///
/// The vector is immutable once produced; it only exposes shared access to
/// its components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[derive(AsRef, Deref, From, Into)]
#[serde(transparent)]
pub struct EmbeddingVector(Vec<f64>);

impl EmbeddingVector {
    /// Creates a new vector from its components.
    pub fn new(components: Vec<f64>) -> Self {
        Self(components)
    }

    /// Returns the number of dimensions.
    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    /// Converts single-precision components, as returned by some providers.
    pub fn from_f32(components: &[f32]) -> Self {
        Self(components.iter().map(|&c| f64::from(c)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_array() {
        let vector = EmbeddingVector::new(vec![0.5, -1.0]);
        assert_eq!(serde_json::to_string(&vector).unwrap(), "[0.5,-1.0]");
        assert_eq!(vector.dimensions(), 2);
    }

    #[test]
    fn widens_single_precision() {
        let vector = EmbeddingVector::from_f32(&[0.25, 1.0]);
        assert_eq!(&*vector, &[0.25, 1.0]);
    }
}
