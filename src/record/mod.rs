pub mod dynamic;
pub mod value;

pub use dynamic::DynamicRecord;
pub use value::FieldValue;

/// A row the list engine can filter, search, sort and project.
///
/// Fields are looked up by name; typed entities answer through a
/// [`FieldTable`], dynamic JSON records through their object map.
pub trait ListRecord {
    /// Stable identifier used by detail routes and row keys
    fn id(&self) -> String;

    /// Value of `name`, or `None` when the record has no such field
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Fields the free-text search looks at
    fn searchable_fields(&self) -> &'static [&'static str];

    /// Column keys in display order
    fn columns(&self) -> Vec<String>;
}

/// Accessor for a single named field
pub type FieldAccessor<T> = fn(&T) -> FieldValue;

/// Static lookup table from field name to accessor
pub struct FieldTable<T: 'static> {
    entries: &'static [(&'static str, FieldAccessor<T>)],
}

impl<T: 'static> FieldTable<T> {
    pub const fn new(entries: &'static [(&'static str, FieldAccessor<T>)]) -> Self {
        Self { entries }
    }

    pub fn get(&self, record: &T, name: &str) -> Option<FieldValue> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, accessor)| accessor(record))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| *key == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }
}
