use super::*;
use rtt_common::ClassId;

fn list_of(arg: RuntimeType) -> RuntimeType {
    RuntimeType::interface(ClassId(10), vec![arg])
}

#[test]
fn test_equal_constants_share_an_id() {
    let mut pool = ConstantPool::new();
    let a = pool.type_constant(list_of(RuntimeType::DYNAMIC));
    let b = pool.type_constant(list_of(RuntimeType::DYNAMIC));
    let c = pool.type_constant(list_of(RuntimeType::Null));
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(pool.len(), 2);
}

#[test]
fn test_kinds_do_not_collide() {
    let mut pool = ConstantPool::new();
    let number = pool.i32(7);
    let text = pool.string("7");
    let bytes = pool.bytes(&[7]);
    assert_ne!(number, text);
    assert_ne!(text, bytes);
    assert_eq!(pool.string("7"), text);
}

#[test]
fn test_nested_array_value() {
    let mut pool = ConstantPool::new();
    let inner = pool.type_array(vec![RuntimeType::Never, RuntimeType::Null]);
    let outer = pool.array(vec![inner, inner]);

    let Some(Value::Array(rows)) = pool.value(outer) else {
        panic!("expected an array value");
    };
    assert_eq!(rows.len(), 2);
    let Value::Array(row) = &rows[0] else {
        panic!("expected a nested array");
    };
    assert_eq!(row[0], Value::ty(RuntimeType::Never));
    assert_eq!(row[1], Value::ty(RuntimeType::Null));
}

#[test]
fn test_named_parameter_value() {
    let mut pool = ConstantPool::new();
    let id = pool.named_parameter(NamedParameter {
        name: Arc::from("flag"),
        ty: RuntimeType::DYNAMIC,
        required: true,
    });
    match pool.value(id) {
        Some(Value::NamedParameter(param)) => {
            assert_eq!(&*param.name, "flag");
            assert!(param.required);
        }
        other => panic!("unexpected value {other:?}"),
    }
}

#[test]
fn test_unknown_constant() {
    let pool = ConstantPool::new();
    assert!(pool.try_get(ConstId(3)).is_none());
    assert!(pool.value(ConstId(3)).is_none());
}

#[test]
#[should_panic(expected = "internal compiler error")]
fn test_get_unknown_constant_is_fatal() {
    let pool = ConstantPool::new();
    pool.get(ConstId(0));
}
