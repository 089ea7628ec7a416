//! Column-keyed JSON view of a row

use contracts::{Layout, Row};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Serializes a row as `{ column: value, ... }` in layout order
pub(crate) struct KeyedRow<'a> {
    pub layout: &'a Layout,
    pub row: &'a Row,
}

impl Serialize for KeyedRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.layout.column_count()))?;
        for (column, value) in self.layout.columns().iter().zip(self.row.iter()) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
