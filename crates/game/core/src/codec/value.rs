//! Dynamic value tree consumed by the encoder.

/// Key of a [`Table`] entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Index(i64),
    Name(String),
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<i64> for Key {
    fn from(index: i64) -> Self {
        Key::Index(index)
    }
}

/// Encodable value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Table(Table),
}

/// Ordered key/value collection.
///
/// A single type covers both sequences and mappings; the encoder decides the
/// rendered shape from the keys. Entry order is insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    entries: Vec<(Key, Value)>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table keyed `1..=n` from the items, in iteration order.
    pub fn sequence<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let entries = items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (Key::Index(i as i64 + 1), v.into()))
            .collect();
        Self { entries }
    }

    /// Appends a named field (builder pattern).
    #[must_use]
    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(Key::from(name), value);
        self
    }

    /// Appends or replaces an entry.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(Key, Value)] {
        &self.entries
    }

    /// Returns the values in index order when the keys are exactly `1..=n`.
    ///
    /// An empty table counts as a (zero-length) sequence.
    pub fn as_dense_sequence(&self) -> Option<Vec<&Value>> {
        let n = self.entries.len();
        let mut slots: Vec<Option<&Value>> = vec![None; n];
        for (key, value) in &self.entries {
            let Key::Index(index) = key else {
                return None;
            };
            if *index < 1 || *index as usize > n {
                return None;
            }
            let slot = &mut slots[*index as usize - 1];
            if slot.is_some() {
                return None;
            }
            *slot = Some(value);
        }
        slots.into_iter().collect()
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! int_into_value {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(v as i64)
            }
        })*
    };
}

int_into_value!(i8, i16, i32, i64, u8, u16, u32, usize);

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        // Seeds and frame counters fit comfortably; saturate rather than wrap.
        Value::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Table> for Value {
    fn from(v: Table) -> Self {
        Value::Table(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}
