//! Service endpoint URLs built from configured base URLs.

use anyhow::{Context, Result};
use url::Url;

/// Resolve `path` below `base_url`, keeping any path prefix of the base.
///
/// `https://host/nominatim` and `https://host/nominatim/` both give
/// `https://host/nominatim/<path>`.
pub(crate) fn endpoint_url(base_url: &str, path: &str) -> Result<Url> {
    let mut base =
        Url::parse(base_url).with_context(|| format!("Invalid service URL '{}'", base_url))?;
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path)
        .with_context(|| format!("Invalid endpoint '{}' below '{}'", path, base_url))
}
