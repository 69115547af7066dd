use serde::de::DeserializeOwned;
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

mod models;

pub use models::*;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Could not find file with name: {0}")]
    FileNotFound(String),
}

pub struct Config {
    pub buses_file_name: String,
    pub routes_file_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            buses_file_name: "buses.csv".into(),
            routes_file_name: "routes.csv".into(),
        }
    }
}

#[derive(Default)]
pub enum StorageType {
    #[default]
    None,
    Dir(PathBuf),
}

/// Fleet configuration source: the static bus and route records a store is
/// seeded with, one CSV file per collection.
#[derive(Default)]
pub struct Fleet {
    config: Config,
    storage: StorageType,
}

impl Fleet {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            storage: Default::default(),
        }
    }

    pub fn from_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.storage = StorageType::Dir(path.as_ref().to_path_buf());
        self
    }

    pub fn stream_buses<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, FleetBus)),
    {
        match &self.storage {
            StorageType::None => Ok(()),
            StorageType::Dir(path) => {
                stream_from_dir::<FleetBus, F>(path, &self.config.buses_file_name, f)
            }
        }
    }

    pub fn stream_routes<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, FleetRoute)),
    {
        match &self.storage {
            StorageType::None => Ok(()),
            StorageType::Dir(path) => {
                stream_from_dir::<FleetRoute, F>(path, &self.config.routes_file_name, f)
            }
        }
    }
}

fn stream_from_dir<T, F>(dir: &Path, file_name: &str, f: F) -> Result<(), self::Error>
where
    T: DeserializeOwned,
    F: FnMut((usize, T)),
{
    let path = dir.join(file_name);
    if !path.is_file() {
        return Err(self::Error::FileNotFound(file_name.to_string()));
    }
    let mut reader = csv::Reader::from_path(path)?;
    reader
        .deserialize()
        .filter_map(|record| record.ok())
        .enumerate()
        .for_each(f);
    Ok(())
}
