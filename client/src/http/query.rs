use serde_json::Value;

/// A value that may or may not end up in a query string.
///
/// `None`, JSON `null` and empty strings produce no parameter at all.
pub trait QueryValue {
    fn to_query_value(&self) -> Option<String>;
}

impl QueryValue for str {
    fn to_query_value(&self) -> Option<String> {
        (!self.is_empty()).then(|| self.to_string())
    }
}

impl QueryValue for String {
    fn to_query_value(&self) -> Option<String> {
        self.as_str().to_query_value()
    }
}

impl<T: QueryValue + ?Sized> QueryValue for &T {
    fn to_query_value(&self) -> Option<String> {
        (**self).to_query_value()
    }
}

impl<T: QueryValue> QueryValue for Option<T> {
    fn to_query_value(&self) -> Option<String> {
        self.as_ref().and_then(QueryValue::to_query_value)
    }
}

impl QueryValue for Value {
    fn to_query_value(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::String(s) => s.to_query_value(),
            other => Some(other.to_string()),
        }
    }
}

macro_rules! display_query_value {
    ($($t:ty),*) => {
        $(impl QueryValue for $t {
            fn to_query_value(&self) -> Option<String> {
                Some(self.to_string())
            }
        })*
    };
}

display_query_value!(bool, i32, i64, u32, u64, usize, f64);

/// Ordered query parameters. Setting a key twice keeps the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl QueryValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl QueryValue) {
        let Some(value) = value.to_query_value() else {
            return;
        };
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Appends the parameters to `url`, percent-encoding keys and values.
    pub fn apply_to(&self, url: &mut url::Url) {
        if self.pairs.is_empty() {
            return;
        }
        let mut pairs = url.query_pairs_mut();
        for (k, v) in &self.pairs {
            pairs.append_pair(k, v);
        }
    }
}
