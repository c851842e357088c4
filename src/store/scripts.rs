use super::{Result, Storage, StoreError};

const SCRIPT_PREFIX: &str = "script:";
const INDEX_KEY: &str = "scripts_index";

/// Name -> text mapping on top of a [`Storage`], with an ordered name index.
///
/// The index and the bodies are written separately. Saving writes the body
/// before extending the index and deleting shrinks the index before removing
/// the body, so an interrupted write leaves at worst an orphan body.
pub struct ScriptStore<S: Storage> {
    storage: S,
}

impl<S: Storage> ScriptStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn body_key(name: &str) -> String {
        format!("{SCRIPT_PREFIX}{name}")
    }

    fn read_index(&self) -> Result<Vec<String>> {
        match self.storage.get(INDEX_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_index(&mut self, index: &[String]) -> Result<()> {
        let raw = serde_json::to_string(index)?;
        self.storage.set(INDEX_KEY, &raw)
    }

    /// Known script names in the order they were first saved
    pub fn list_names(&self) -> Result<Vec<String>> {
        self.read_index()
    }

    pub fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.read_index()?.iter().any(|n| n == name))
    }

    /// Store `text` under `name`, adding the name to the index if new
    pub fn save(&mut self, name: &str, text: &str) -> Result<()> {
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }

        self.storage.set(&Self::body_key(name), text)?;

        let mut index = self.read_index()?;
        if !index.iter().any(|n| n == name) {
            index.push(name.to_string());
            self.write_index(&index)?;
        }

        tracing::info!(name, bytes = text.len(), "saved script");
        Ok(())
    }

    /// Text stored under `name`, or an empty string if there is none
    pub fn load(&self, name: &str) -> Result<String> {
        Ok(self
            .storage
            .get(&Self::body_key(name))?
            .unwrap_or_default())
    }

    pub fn delete(&mut self, name: &str) -> Result<()> {
        let mut index = self.read_index()?;
        let before = index.len();
        index.retain(|n| n != name);
        if index.len() != before {
            self.write_index(&index)?;
        }

        self.storage.remove(&Self::body_key(name))?;

        tracing::info!(name, "deleted script");
        Ok(())
    }
}
