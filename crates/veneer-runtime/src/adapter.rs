//! Null-safe adaptation
//!
//! Generated forwarding code adapts every value crossing a replacement
//! boundary. A missing value adapts to the destination's default without
//! reaching the adapter.

/// Converts a source value into a destination type
pub trait TypeAdapter<S: ?Sized, D> {
    fn adapt(&self, source: &S) -> D;
}

impl<S: ?Sized, D, F> TypeAdapter<S, D> for F
where
    F: Fn(&S) -> D,
{
    fn adapt(&self, source: &S) -> D {
        self(source)
    }
}

/// Adapt an optional value; `None` yields `D::default()`
pub fn adapt_null<S, D, A>(adapter: &A, source: Option<&S>) -> D
where
    S: ?Sized,
    D: Default,
    A: TypeAdapter<S, D> + ?Sized,
{
    match source {
        Some(source) => adapter.adapt(source),
        None => D::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Counting {
        calls: Cell<usize>,
    }

    impl TypeAdapter<str, Option<String>> for Counting {
        fn adapt(&self, source: &str) -> Option<String> {
            self.calls.set(self.calls.get() + 1);
            Some(source.to_uppercase())
        }
    }

    #[test]
    fn test_none_skips_adapter() {
        let adapter = Counting { calls: Cell::new(0) };
        let adapted: Option<String> = adapt_null(&adapter, None::<&str>);
        assert_eq!(adapted, None);
        assert_eq!(adapter.calls.get(), 0);
    }

    #[test]
    fn test_some_calls_adapter_once() {
        let adapter = Counting { calls: Cell::new(0) };
        let adapted = adapt_null(&adapter, Some("tint"));
        assert_eq!(adapted.as_deref(), Some("TINT"));
        assert_eq!(adapter.calls.get(), 1);
    }

    #[test]
    fn test_closure_adapter() {
        let to_len = |s: &String| s.len();
        assert_eq!(adapt_null(&to_len, Some(&"abc".to_string())), 3);
        assert_eq!(adapt_null(&to_len, None::<&String>), 0);
    }
}
