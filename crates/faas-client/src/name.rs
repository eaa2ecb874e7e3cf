//! Function name derivation.
//!
//! A function's name is its fully-qualified domain. When none is given it is
//! read off the directory layout: the function directory is the leaf label
//! and each parent directory adds one label, so `…/example.com/admin`
//! becomes `admin.example.com`.

use crate::{Error, Result};
use std::path::{Component, Path};

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Derive the fully-qualified name of the function rooted at `root`.
///
/// The last segment of `root` is the leaf label. Up to `limit` ancestor
/// segments are appended, nearest first, so the most distant one becomes
/// the outermost suffix. The walk ends early at the filesystem root, and
/// after a segment that already contains a dot: that segment is the
/// registered domain and nothing above it is consulted. A dotted leaf
/// therefore names itself.
///
/// `root` must be absolute and clean; see
/// [`ClientConfig::absolute_root`](crate::ClientConfig::absolute_root).
/// The result is lowercased and must be a valid domain of at least two
/// labels.
pub fn derive_name(root: &Path, limit: usize) -> Result<String> {
    let unresolvable = |reason: String| Error::NameUnresolvable {
        root: root.to_path_buf(),
        limit,
        reason,
    };

    if !root.is_absolute() {
        return Err(unresolvable("path is not absolute".to_string()));
    }

    let mut components = root.components().rev();
    let leaf = match components.next() {
        Some(Component::Normal(leaf)) => leaf.to_str().ok_or_else(|| {
            unresolvable("leaf directory name is not valid UTF-8".to_string())
        })?,
        _ => return Err(unresolvable("path has no usable leaf directory".to_string())),
    };

    let mut labels = vec![leaf];
    if !leaf.contains('.') {
        for component in components.take(limit) {
            let segment = match component {
                Component::Normal(segment) => segment.to_str().ok_or_else(|| {
                    unresolvable("ancestor directory name is not valid UTF-8".to_string())
                })?,
                Component::RootDir | Component::Prefix(_) => break,
                Component::CurDir | Component::ParentDir => {
                    return Err(unresolvable("path contains relative segments".to_string()));
                }
            };
            labels.push(segment);
            if segment.contains('.') {
                break;
            }
        }
    }

    let name = labels.join(".").to_ascii_lowercase();
    check_domain(&name).map_err(|reason| unresolvable(format!("'{}' {}", name, reason)))?;
    Ok(name)
}

/// Check that `name` is usable as a function's fully-qualified name
pub fn validate_name(name: &str) -> Result<()> {
    check_domain(name)
        .map_err(|reason| Error::InvalidArgument(format!("name '{}' {}", name, reason)))
}

fn check_domain(name: &str) -> std::result::Result<(), String> {
    if name.len() > MAX_NAME_LEN {
        return Err(format!("exceeds {} characters", MAX_NAME_LEN));
    }

    let labels: Vec<&str> = name.split('.').collect();
    if labels.len() < 2 {
        return Err("is not a fully-qualified domain".to_string());
    }

    for label in labels {
        if label.is_empty() {
            return Err("contains an empty label".to_string());
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(format!("has a label longer than {} characters", MAX_LABEL_LEN));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(format!("has an invalid label '{}'", label));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(format!("has a label '{}' with a leading or trailing hyphen", label));
        }
    }

    Ok(())
}
