//! The process-wide map; kept in its own test binary so no other test
//! initializes it first

use std::any::TypeId;
use veneer_runtime::{global, RegistryError};

trait Greeter {
    fn greet(&self) -> String;
}

struct Host;

struct HostProxy {
    _instance: Host,
}

impl Greeter for HostProxy {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

#[test]
fn test_explicit_one_time_initialization() {
    assert!(global::get().is_none());

    let map = global::initialize(|map| {
        map.add::<Host, dyn Greeter, HostProxy, _>(|instance| {
            Box::new(HostProxy { _instance: instance })
        });
    })
    .unwrap();
    assert_eq!(map.len(), 1);

    let mut ran = false;
    let again = global::initialize(|_| ran = true);
    assert_eq!(again.err(), Some(RegistryError::AlreadyInitialized));
    assert!(!ran);

    let map = global::get().unwrap();
    assert_eq!(
        map.abstraction_for_target(TypeId::of::<Host>()),
        Some(TypeId::of::<dyn Greeter>())
    );
    let greeter = map.create_proxy::<dyn Greeter, _>(Host).unwrap();
    assert_eq!(greeter.greet(), "hello");
}
