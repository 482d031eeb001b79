use super::{ModelError, RecurrenceModel};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use tracing::info;

fn cache() -> &'static Mutex<HashMap<PathBuf, Arc<RecurrenceModel>>> {
    static MODELS: OnceLock<Mutex<HashMap<PathBuf, Arc<RecurrenceModel>>>> = OnceLock::new();
    MODELS.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Loads the artifact at `path` once per process and hands out shared
/// handles afterwards. The lock is held across the load so concurrent
/// first calls cannot both read the file.
pub fn cached_model<P: AsRef<Path>>(path: P) -> Result<Arc<RecurrenceModel>, ModelError> {
    let path = path.as_ref();
    let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

    let mut models = cache().lock().map_err(|_| ModelError::CachePoisoned)?;
    if let Some(model) = models.get(&key) {
        return Ok(Arc::clone(model));
    }

    let model = Arc::new(RecurrenceModel::from_path(path)?);
    info!(path = %key.display(), model = %model.describe(), "recurrence model loaded");
    models.insert(key, Arc::clone(&model));
    Ok(model)
}
