use std::collections::BTreeSet;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::future::join_all;

/// Tried in this order, the first existing file wins.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Yearly composite image of one water body.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryImage {
    pub year: i32,
    pub path: PathBuf,
}

impl GalleryImage {
    /// URI understood by the egui file loader.
    pub fn uri(&self) -> String {
        format!("file://{}", self.path.display())
    }
}

/// Look for `<year>.<ext>` in `dir` for every distinct year. Years are probed
/// concurrently and the result is sorted by year; years without an image are left out.
pub async fn probe_gallery(dir: &Path, years: &[i32], timeout: Duration) -> Vec<GalleryImage> {
    probe_with(dir, years, timeout, |path| async move { tokio::fs::try_exists(&path).await }).await
}

/// [`probe_gallery`] with a pluggable existence check. A check that does not
/// finish within `timeout` counts as "no such file".
async fn probe_with<F, Fut>(dir: &Path, years: &[i32], timeout: Duration, exists: F) -> Vec<GalleryImage>
where
    F: Fn(PathBuf) -> Fut,
    Fut: Future<Output = io::Result<bool>>,
{
    let years: BTreeSet<i32> = years.iter().copied().collect();
    let probes = years
        .into_iter()
        .map(|year| probe_year(dir, year, timeout, &exists));

    let found: Vec<GalleryImage> = join_all(probes).await.into_iter().flatten().collect();
    log::debug!("found {} gallery images in {}", found.len(), dir.display());
    found
}

async fn probe_year<F, Fut>(dir: &Path, year: i32, timeout: Duration, exists: &F) -> Option<GalleryImage>
where
    F: Fn(PathBuf) -> Fut,
    Fut: Future<Output = io::Result<bool>>,
{
    for ext in IMAGE_EXTENSIONS {
        let path = dir.join(format!("{year}.{ext}"));
        match tokio::time::timeout(timeout, exists(path.clone())).await {
            Ok(Ok(true)) => return Some(GalleryImage { year, path }),
            Ok(Ok(false)) => {}
            Ok(Err(e)) => log::debug!("cannot probe {}: {e}", path.display()),
            Err(_) => log::warn!("probing {} timed out after {timeout:?}", path.display()),
        }
    }
    None
}
