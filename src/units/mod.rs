//! Unit data: plot images and quality metrics per spike-sorted unit
//!
//! Images are laid out as `<image_dir>/<unit_id>/<modality>.<ext>`; each
//! file is read once and kept base64-encoded for the lifetime of a run.

mod metrics;

pub use metrics::{load_metrics, MetricsTable, UnitMetrics};

use crate::config::Modality;
use crate::error::DataError;
use base64::Engine;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub type UnitId = u32;

const IMAGE_EXTENSIONS: [(&str, &str); 3] = [
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
];

/// One encoded plot image
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePayload {
    pub modality: Modality,
    pub media_type: &'static str,
    /// Base64 (standard alphabet) encoded file contents
    pub data: Arc<str>,
}

impl ImagePayload {
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// Images per unit, in requested-modality order, keyed by unit id
#[derive(Debug, Clone, Default)]
pub struct ImageTable {
    rows: BTreeMap<UnitId, Vec<ImagePayload>>,
}

impl ImageTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, unit: UnitId, images: Vec<ImagePayload>) {
        self.rows.insert(unit, images);
    }

    pub fn get(&self, unit: UnitId) -> Option<&[ImagePayload]> {
        self.rows.get(&unit).map(|v| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// List unit ids present under `image_dir` (sub-directories with numeric names)
pub fn discover_units(image_dir: &Path) -> Result<Vec<UnitId>, DataError> {
    let entries = std::fs::read_dir(image_dir).map_err(|e| DataError::Read {
        path: image_dir.to_path_buf(),
        source: e,
    })?;

    let mut ids = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DataError::Read {
            path: image_dir.to_path_buf(),
            source: e,
        })?;
        if !entry.path().is_dir() {
            continue;
        }
        match entry.file_name().to_str().and_then(|n| n.parse::<UnitId>().ok()) {
            Some(id) => ids.push(id),
            None => debug!("Ignoring non-unit directory {:?}", entry.path()),
        }
    }

    ids.sort_unstable();
    Ok(ids)
}

/// Load and encode the requested modalities for each unit
pub fn load_image_table(
    image_dir: &Path,
    unit_ids: &[UnitId],
    modalities: &[Modality],
) -> Result<ImageTable, DataError> {
    let mut table = ImageTable::new();

    for &unit in unit_ids {
        let unit_dir = image_dir.join(unit.to_string());
        let mut images = Vec::with_capacity(modalities.len());

        for &modality in modalities {
            let (path, media_type) =
                find_image(&unit_dir, modality).ok_or_else(|| DataError::MissingImage {
                    unit,
                    modality: modality.to_string(),
                    dir: unit_dir.clone(),
                })?;

            let bytes = std::fs::read(&path).map_err(|e| DataError::Read {
                path: path.clone(),
                source: e,
            })?;

            images.push(ImagePayload {
                modality,
                media_type,
                data: base64::engine::general_purpose::STANDARD.encode(bytes).into(),
            });
        }

        table.insert(unit, images);
    }

    debug!(
        "Loaded {} units x {} modalities from {:?}",
        table.len(),
        modalities.len(),
        image_dir
    );
    Ok(table)
}

fn find_image(unit_dir: &Path, modality: Modality) -> Option<(PathBuf, &'static str)> {
    IMAGE_EXTENSIONS.iter().find_map(|(ext, media_type)| {
        let path = unit_dir.join(format!("{}.{}", modality.as_str(), ext));
        path.is_file().then_some((path, *media_type))
    })
}
