mod parser;

use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::workflows::load_search::domain::LoadRecord;
use crate::workflows::load_search::service::LoadSource;

use parser::RowError;

#[derive(Debug)]
pub enum LoadImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: u64, message: String },
}

impl std::fmt::Display for LoadImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadImportError::Io(err) => write!(f, "failed to read load export: {}", err),
            LoadImportError::Csv(err) => write!(f, "invalid load CSV data: {}", err),
            LoadImportError::InvalidRow { line, message } => {
                write!(f, "invalid load on line {}: {}", line, message)
            }
        }
    }
}

impl std::error::Error for LoadImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadImportError::Io(err) => Some(err),
            LoadImportError::Csv(err) => Some(err),
            LoadImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for LoadImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for LoadImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<RowError> for LoadImportError {
    fn from(err: RowError) -> Self {
        match err {
            RowError::Csv(err) => Self::Csv(err),
            RowError::Invalid { line, message } => Self::InvalidRow { line, message },
        }
    }
}

/// Snapshot of the loads currently offered on the board.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadInventory {
    loads: Vec<LoadRecord>,
}

impl LoadInventory {
    pub fn new(loads: Vec<LoadRecord>) -> Self {
        Self { loads }
    }

    pub fn records(&self) -> &[LoadRecord] {
        &self.loads
    }

    pub fn len(&self) -> usize {
        self.loads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }
}

impl LoadSource for LoadInventory {
    fn loads(&self) -> Vec<LoadRecord> {
        self.loads.clone()
    }
}

/// Reads load board exports into a [`LoadInventory`].
pub struct LoadInventoryImporter;

impl LoadInventoryImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<LoadInventory, LoadImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<LoadInventory, LoadImportError> {
        let loads = parser::parse_loads(reader)?;
        info!(rows = loads.len(), "imported load inventory");
        Ok(LoadInventory::new(loads))
    }
}
