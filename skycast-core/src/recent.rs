//! Recent-cities shortcut list, persisted as a JSON array on disk.

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Capacity of the recent-cities list.
pub const MAX_RECENT: usize = 10;

/// Ordered list of recently searched cities: most recent first, no
/// case-insensitive duplicates, at most [`MAX_RECENT`] entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentCities {
    cities: Vec<String>,
}

impl RecentCities {
    /// Records a successful search. Re-searching a known city moves it to
    /// the front and keeps the newly typed casing.
    pub fn record(&mut self, city: &str) {
        let normalized = city.to_lowercase();
        self.cities
            .retain(|existing| existing.to_lowercase() != normalized);
        self.cities.insert(0, city.to_string());
        self.cities.truncate(MAX_RECENT);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.cities.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.cities
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Load the list from its platform location, or return an empty list if
    /// it was never written.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::store_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read recent cities file: {}", path.display()))?;

        let mut cities: Vec<String> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse recent cities file: {}", path.display()))?;
        cities.truncate(MAX_RECENT);

        Ok(Self { cities })
    }

    /// Rewrite the stored list, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::store_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }

        let json =
            serde_json::to_string(&self.cities).context("Failed to serialize recent cities")?;

        fs::write(path, json)
            .with_context(|| format!("Failed to write recent cities file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the recent-cities file.
    pub fn store_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

        Ok(dirs.data_dir().join("recent.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_most_recent_first() {
        let mut recent = RecentCities::default();
        recent.record("Paris");
        recent.record("London");
        recent.record("Tokyo");

        assert_eq!(recent.as_slice(), ["Tokyo", "London", "Paris"]);
    }

    #[test]
    fn record_deduplicates_case_insensitively() {
        let mut recent = RecentCities::default();
        recent.record("paris");
        recent.record("London");
        recent.record("PARIS");

        assert_eq!(recent.as_slice(), ["PARIS", "London"]);
    }

    #[test]
    fn record_caps_the_list() {
        let mut recent = RecentCities::default();
        for i in 0..15 {
            recent.record(&format!("city-{i}"));
        }

        assert_eq!(recent.len(), MAX_RECENT);
        assert_eq!(recent.as_slice()[0], "city-14");
        assert_eq!(recent.as_slice()[MAX_RECENT - 1], "city-5");
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("recent.json");

        let mut recent = RecentCities::default();
        recent.record("Paris");
        recent.record("London");
        recent.save_to(&path).expect("save must succeed");

        let loaded = RecentCities::load_from(&path).expect("load must succeed");
        assert_eq!(loaded, recent);
    }

    #[test]
    fn load_from_missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded = RecentCities::load_from(&dir.path().join("absent.json")).expect("load");
        assert!(loaded.is_empty());
    }

    #[test]
    fn load_truncates_oversized_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("recent.json");

        let oversized: Vec<String> = (0..20).map(|i| format!("city-{i}")).collect();
        fs::write(&path, serde_json::to_string(&oversized).expect("json")).expect("write");

        let loaded = RecentCities::load_from(&path).expect("load must succeed");
        assert_eq!(loaded.len(), MAX_RECENT);
    }
}
