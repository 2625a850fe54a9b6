//! Initializing the process-wide map from inside its own registration;
//! kept in its own test binary so the global starts empty

use std::sync::mpsc;
use std::time::Duration;
use veneer_runtime::{global, RegistryError};

struct Host;
struct HostProxy;

trait Marker {}
impl Marker for HostProxy {}

#[test]
fn test_nested_initialize_returns_already_initialized() {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut nested = None;
        let outer = global::initialize(|map| {
            map.add::<Host, dyn Marker, HostProxy, _>(|_| Box::new(HostProxy));
            nested = Some(global::initialize(|_| {}).err());
        })
        .map(|map| map.len());
        let _ = tx.send((outer, nested));
    });

    let (outer, nested) = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("nested initialize must not block");
    assert_eq!(outer, Ok(1));
    assert_eq!(nested, Some(Some(RegistryError::AlreadyInitialized)));
    assert_eq!(global::get().map(|map| map.len()), Some(1));
}
