#[macro_export]
macro_rules! json {
    // Handle null
    (null) => {
        $crate::JsonValue::Null
    };

    // Handle true
    (true) => {
        $crate::JsonValue::Bool(true)
    };

    // Handle false
    (false) => {
        $crate::JsonValue::Bool(false)
    };

    // Handle empty array
    ([]) => {
        $crate::JsonValue::Array(vec![])
    };

    // Handle non-empty array
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::JsonValue::Array(vec![$($crate::json!($elem)),*])
    };

    // Array whose elements are arbitrary expressions
    ([ $($elem:expr),* $(,)? ]) => {
        $crate::JsonValue::Array(vec![$($crate::JsonValue::from($elem)),*])
    };

    // Handle empty object
    ({}) => {
        $crate::JsonValue::Object(vec![])
    };

    // Handle non-empty object; entries keep their written order
    ({ $($key:literal : $value:tt),* $(,)? }) => {
        $crate::JsonValue::Object(vec![
            $(($crate::JsonValue::from($key), $crate::json!($value))),*
        ])
    };

    // Object whose values are arbitrary expressions
    ({ $($key:literal : $value:expr),* $(,)? }) => {
        $crate::JsonValue::Object(vec![
            $(($crate::JsonValue::from($key), $crate::JsonValue::from($value))),*
        ])
    };

    // Fallback for any expression with a From conversion
    ($other:expr) => {
        $crate::JsonValue::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{JsonValue, Number};

    #[test]
    fn test_json_macro_primitives() {
        assert_eq!(json!(null), JsonValue::Null);
        assert_eq!(json!(true), JsonValue::Bool(true));
        assert_eq!(json!(false), JsonValue::Bool(false));
        assert_eq!(json!(42), JsonValue::Number(Number::Int(42)));
        assert_eq!(json!(3.5), JsonValue::Number(Number::Float(3.5)));
        assert_eq!(json!("hello"), JsonValue::String("hello".to_string()));
    }

    #[test]
    fn test_json_macro_arrays() {
        assert_eq!(json!([]), JsonValue::Array(vec![]));

        let arr = json!([1, 2, 3]);
        match arr {
            JsonValue::Array(vec) => {
                assert_eq!(vec.len(), 3);
                assert_eq!(vec[0], JsonValue::Number(Number::Int(1)));
                assert_eq!(vec[2], JsonValue::Number(Number::Int(3)));
            }
            _ => panic!("Expected array"),
        }
    }

    #[test]
    fn test_json_macro_objects() {
        assert_eq!(json!({}), JsonValue::Object(vec![]));

        let obj = json!({
            "name": "Alice",
            "age": 30
        });

        match obj {
            JsonValue::Object(entries) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].0.as_str(), Some("name"));
                assert_eq!(entries[0].1.as_str(), Some("Alice"));
                assert_eq!(entries[1].0.as_str(), Some("age"));
                assert_eq!(entries[1].1.as_i64(), Some(30));
            }
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_json_macro_nesting() {
        let value = json!({
            "items": [1, [2, 3], {"inner": null}],
            "ok": true
        });
        assert!(value.is_object());
    }

    #[test]
    fn test_json_macro_expression_elements() {
        fn answer() -> JsonValue {
            JsonValue::from(42)
        }

        let arr = json!([answer(), JsonValue::Null]);
        match arr {
            JsonValue::Array(vec) => {
                assert_eq!(vec[0].as_i64(), Some(42));
                assert_eq!(vec[1], JsonValue::Null);
            }
            _ => panic!("Expected array"),
        }

        let obj = json!({ "computed": answer() });
        match obj {
            JsonValue::Object(entries) => {
                assert_eq!(entries[0].1.as_i64(), Some(42));
            }
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_json_macro_numeric_key() {
        let obj = json!({ 7: "seven" });
        match obj {
            JsonValue::Object(entries) => {
                assert_eq!(entries[0].0.as_i64(), Some(7));
            }
            _ => panic!("Expected object"),
        }
    }
}
