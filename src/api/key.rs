//! Cache Keys
//!
//! Keys must be string-typed. Callers holding dynamic values (JSON, numbers)
//! can pass them straight in; anything that is not a string is rejected and
//! the cache operation returns `None`.

use serde_json::Value;

/// A value that may be used as a cache key.
pub trait CacheKey {
    /// Returns the key text, or None when the value is not string-typed.
    fn as_key(&self) -> Option<&str>;
}

impl CacheKey for str {
    fn as_key(&self) -> Option<&str> {
        Some(self)
    }
}

impl CacheKey for String {
    fn as_key(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl CacheKey for Value {
    fn as_key(&self) -> Option<&str> {
        self.as_str()
    }
}

impl<K: CacheKey + ?Sized> CacheKey for &K {
    fn as_key(&self) -> Option<&str> {
        (**self).as_key()
    }
}

// Numbers are never keys
macro_rules! reject_key {
    ($($t:ty),*) => {
        $(
            impl CacheKey for $t {
                fn as_key(&self) -> Option<&str> {
                    None
                }
            }
        )*
    };
}

reject_key!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_keys() {
        assert_eq!("a".as_key(), Some("a"));
        assert_eq!(String::from("b").as_key(), Some("b"));
        assert_eq!((&&"c").as_key(), Some("c"));
        assert_eq!("".as_key(), Some(""));
    }

    #[test]
    fn test_json_keys() {
        assert_eq!(json!("a").as_key(), Some("a"));
        assert_eq!(json!(1).as_key(), None);
        assert_eq!(json!(null).as_key(), None);
        assert_eq!(json!({"k": "v"}).as_key(), None);
    }

    #[test]
    fn test_non_string_keys() {
        assert_eq!(1i32.as_key(), None);
        assert_eq!(7u64.as_key(), None);
        assert_eq!(2.5f64.as_key(), None);
        assert_eq!(true.as_key(), None);
    }
}
