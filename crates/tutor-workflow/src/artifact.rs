// Delivery of generated documents

use crate::error::Result;
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tutor_types::Topic;

/// A downloadable document produced by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Artifact named `KTP_<topic name>.pdf`
    pub fn for_topic(topic: &Topic, bytes: Vec<u8>) -> Self {
        Self {
            file_name: topic.document_file_name(),
            bytes,
        }
    }

    /// File name with path separators replaced, so it always names a single
    /// entry inside the download directory
    pub fn safe_file_name(&self) -> String {
        self.file_name
            .chars()
            .map(|c| match c {
                '/' | '\\' | '\0' => '_',
                c => c,
            })
            .collect()
    }
}

/// Destination for generated artifacts (the "download")
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Deliver the artifact once, returning where it ended up
    async fn deliver(&self, artifact: Artifact) -> Result<PathBuf>;
}

/// Saves artifacts into a download directory.
///
/// Bytes are written to a temporary file inside the directory and then
/// renamed into place. The temporary handle is released on every path: on
/// success it becomes the final file, on failure it is deleted when dropped.
pub struct DirectorySink {
    directory: PathBuf,
}

impl DirectorySink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

#[async_trait]
impl ArtifactSink for DirectorySink {
    async fn deliver(&self, artifact: Artifact) -> Result<PathBuf> {
        let directory = self.directory.clone();

        let target = tokio::task::spawn_blocking(move || write_artifact(&directory, &artifact))
            .await
            .map_err(std::io::Error::other)??;

        tracing::info!(path = %target.display(), "KTP saved");
        Ok(target)
    }
}

fn write_artifact(directory: &Path, artifact: &Artifact) -> Result<PathBuf> {
    std::fs::create_dir_all(directory)?;
    let target = directory.join(artifact.safe_file_name());

    let mut temp = tempfile::NamedTempFile::new_in(directory)?;
    temp.write_all(&artifact.bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(&target).map_err(|e| e.error)?;

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_for_topic() {
        let artifact = Artifact::for_topic(&Topic::new(1, "Fashion and Clothing"), vec![1, 2]);
        assert_eq!(artifact.file_name, "KTP_Fashion and Clothing.pdf");
        assert_eq!(artifact.safe_file_name(), "KTP_Fashion and Clothing.pdf");
    }

    #[test]
    fn test_safe_file_name_strips_separators() {
        let artifact = Artifact::for_topic(&Topic::new(1, "../etc/passwd"), Vec::new());
        assert_eq!(artifact.safe_file_name(), "KTP_.._etc_passwd.pdf");
    }

    #[tokio::test]
    async fn test_directory_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("downloads"));

        let artifact = Artifact::for_topic(&Topic::new(2, "Education"), b"%PDF-1.4".to_vec());
        let path = sink.deliver(artifact).await.unwrap();

        assert_eq!(path, dir.path().join("downloads").join("KTP_Education.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");

        // Only the final file remains; the temporary handle is gone
        let entries: Vec<_> = std::fs::read_dir(sink.directory()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_directory_sink_overwrites_previous_download() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());
        let topic = Topic::new(2, "Education");

        sink.deliver(Artifact::for_topic(&topic, b"old".to_vec())).await.unwrap();
        let path = sink.deliver(Artifact::for_topic(&topic, b"new".to_vec())).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_directory_sink_failure_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A directory occupying the target name makes the final rename fail
        std::fs::create_dir(dir.path().join("KTP_Family.pdf")).unwrap();
        std::fs::write(dir.path().join("KTP_Family.pdf").join("keep"), b"x").unwrap();

        let sink = DirectorySink::new(dir.path());
        let result = sink
            .deliver(Artifact::for_topic(&Topic::new(5, "Family"), b"pdf".to_vec()))
            .await;

        assert!(result.is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
