use std::{collections::HashMap, path::PathBuf, sync::Arc};

use crate::{font_slot::FontSlot, metrics::FontMetrics};

/// Font discovery and parsing for hosts that measure text with real fonts.
///
/// Faces are indexed by `fontdb`; a face is parsed with `fontdue` the first
/// time its metrics are requested and kept afterwards. The storage is the
/// loading side of a [`FontSlot`]: it turns a face and a pixel size into a
/// [`FontMetrics`] snapshot and publishes it.
pub struct FontStorage {
    font_db: fontdb::Database,
    /// Parsed faces. Not every face in `font_db` is necessarily parsed.
    loaded_font: HashMap<fontdb::ID, Arc<fontdue::Font>, fxhash::FxBuildHasher>,
}

impl Default for FontStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl FontStorage {
    /// Creates an empty font storage.
    pub fn new() -> Self {
        Self {
            font_db: fontdb::Database::new(),
            loaded_font: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
        }
    }

    /// Loads fonts from in-memory data.
    pub fn load_font_binary(&mut self, data: impl Into<Vec<u8>>) {
        self.font_db.load_font_data(data.into());
    }

    /// Loads a font file.
    pub fn load_font_file(&mut self, path: PathBuf) -> Result<(), std::io::Error> {
        self.font_db.load_font_file(path)
    }

    /// Loads every font found under `dir`.
    pub fn load_fonts_dir(&mut self, dir: PathBuf) {
        self.font_db.load_fonts_dir(dir)
    }

    /// Loads the system fonts.
    pub fn load_system_fonts(&mut self) {
        self.font_db.load_system_fonts();
    }

    /// Adds a face description, returning the id it was stored under.
    pub fn push_face_info(&mut self, info: fontdb::FaceInfo) -> fontdb::ID {
        self.font_db.push_face_info(info)
    }

    /// Forgets a face together with its parsed font.
    pub fn remove_face(&mut self, id: fontdb::ID) {
        self.font_db.remove_face(id);
        self.loaded_font.remove(&id);
    }

    /// Checks if the storage has no faces.
    pub fn is_empty(&self) -> bool {
        self.font_db.is_empty()
    }

    /// Number of indexed faces.
    pub fn len(&self) -> usize {
        self.font_db.len()
    }

    /// Iterates over every indexed face.
    pub fn faces(&self) -> impl Iterator<Item = &fontdb::FaceInfo> {
        self.font_db.faces()
    }
}

/// Font lookup
impl FontStorage {
    /// Finds the best face for `query` and returns it parsed.
    pub fn query(&mut self, query: &fontdb::Query) -> Option<(fontdb::ID, Arc<fontdue::Font>)> {
        let id = self.font_db.query(query)?;
        self.font(id).map(|font| (id, font))
    }

    /// Returns the parsed font for `id`, parsing it on first use.
    pub fn font(&mut self, id: fontdb::ID) -> Option<Arc<fontdue::Font>> {
        use std::collections::hash_map::Entry;

        match self.loaded_font.entry(id) {
            Entry::Occupied(entry) => Some(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let font_result = self.font_db.with_face_data(id, |data, index| {
                    fontdue::Font::from_bytes(
                        data,
                        fontdue::FontSettings {
                            collection_index: index,
                            ..Default::default()
                        },
                    )
                })?;

                match font_result {
                    Ok(font) => Some(Arc::clone(entry.insert(Arc::new(font)))),
                    Err(e) => {
                        log::error!("Failed to load font (id: {:?}): {}", id, e);
                        None
                    }
                }
            }
        }
    }
}

/// Metrics snapshots
impl FontStorage {
    /// Builds layout metrics for face `id` at `px` pixels per em.
    pub fn metrics(&mut self, id: fontdb::ID, px: f32) -> Option<FontMetrics> {
        self.font(id).map(|font| FontMetrics::new(font, px))
    }

    /// Resolves `query` and builds metrics for the matching face.
    pub fn query_metrics(&mut self, query: &fontdb::Query, px: f32) -> Option<FontMetrics> {
        self.query(query).map(|(_, font)| FontMetrics::new(font, px))
    }

    /// Publishes metrics for face `id` into `slot`.
    ///
    /// Returns `false`, leaving the slot untouched, when the face cannot be
    /// parsed. Layouts bound to the slot keep waiting in that case.
    pub fn publish_to(&mut self, slot: &FontSlot, id: fontdb::ID, px: f32) -> bool {
        match self.metrics(id, px) {
            Some(metrics) => {
                slot.publish(metrics);
                true
            }
            None => {
                log::warn!("No metrics for face {:?}; font slot left unchanged.", id);
                false
            }
        }
    }
}
