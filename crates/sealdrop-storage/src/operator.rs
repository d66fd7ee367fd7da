//! OpenDAL Operator factory for the upload directories

use anyhow::{Context, Result};
use opendal::Operator;
use std::path::Path;

/// Build a filesystem-backed operator rooted at `root`, creating the
/// directory if needed.
pub fn build_fs_operator(root: &Path) -> Result<Operator> {
    std::fs::create_dir_all(root)
        .with_context(|| format!("creating storage dir: {}", root.display()))?;

    let root_str = root
        .to_str()
        .with_context(|| format!("storage dir is not valid UTF-8: {}", root.display()))?;

    // opendal 0.55: builders take `self` and return `Self`
    let builder = opendal::services::Fs::default().root(root_str);

    let op = Operator::new(builder)
        .with_context(|| format!("creating OpenDAL fs operator at {}", root.display()))?
        .layer(opendal::layers::LoggingLayer::default())
        .finish();

    Ok(op)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("uploads");
        assert!(build_fs_operator(&root).is_ok());
        assert!(root.is_dir());
    }

    #[tokio::test]
    async fn test_operator_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let op = build_fs_operator(dir.path()).unwrap();
        op.write("123", b"abc".to_vec()).await.unwrap();
        assert_eq!(op.read("123").await.unwrap().to_vec(), b"abc");
        assert!(dir.path().join("123").is_file());
    }
}
