//! Registration races and concurrent reads on a shared `ProxyMap`

use std::any::TypeId;
use std::sync::Arc;
use std::thread;
use veneer_runtime::{ProxyMap, RegistryError};

trait Shape: Send {
    fn area(&self) -> f64;
}

struct Square {
    side: f64,
}

struct SquareProxy {
    instance: Square,
}

impl Shape for SquareProxy {
    fn area(&self) -> f64 {
        self.instance.side * self.instance.side
    }
}

struct ScaledSquareProxy {
    instance: Square,
}

impl Shape for ScaledSquareProxy {
    fn area(&self) -> f64 {
        self.instance.side * self.instance.side * 100.0
    }
}

fn register_from_startup(map: &ProxyMap) -> bool {
    map.add::<Square, dyn Shape, SquareProxy, _>(|instance| Box::new(SquareProxy { instance }))
}

fn register_from_plugin(map: &ProxyMap) -> bool {
    map.add::<Square, dyn Shape, ScaledSquareProxy, _>(|instance| {
        Box::new(ScaledSquareProxy { instance })
    })
}

#[test]
fn test_second_registration_is_silent_noop() {
    let map = ProxyMap::new();
    assert!(register_from_startup(&map));
    let first = map.factory_for(TypeId::of::<dyn Shape>()).unwrap();

    assert!(!register_from_plugin(&map));
    let after = map.factory_for(TypeId::of::<dyn Shape>()).unwrap();
    assert!(Arc::ptr_eq(&first, &after));

    // The plugin's proxy type is still known, mapped to the same abstraction.
    assert_eq!(
        map.abstraction_for_proxy(TypeId::of::<ScaledSquareProxy>()),
        Some(TypeId::of::<dyn Shape>())
    );

    let shape = map.create_proxy::<dyn Shape, _>(Square { side: 3.0 }).unwrap();
    assert_eq!(shape.area(), 9.0);
}

#[test]
fn test_concurrent_registration_keeps_one_factory() {
    let map = Arc::new(ProxyMap::new());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                if i % 2 == 0 {
                    register_from_startup(&map)
                } else {
                    register_from_plugin(&map)
                }
            })
        })
        .collect();

    let wins = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|&inserted| inserted)
        .count();
    assert_eq!(wins, 1);
    assert_eq!(map.len(), 1);
}

#[test]
fn test_concurrent_reads() {
    let map = Arc::new(ProxyMap::new());
    register_from_startup(&map);
    let expected = map.factory_for(TypeId::of::<dyn Shape>()).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let map = Arc::clone(&map);
            let expected = Arc::clone(&expected);
            thread::spawn(move || {
                for _ in 0..100 {
                    let factory = map.factory_for(TypeId::of::<dyn Shape>()).unwrap();
                    assert!(Arc::ptr_eq(&factory, &expected));
                    assert_eq!(
                        map.target_for_abstraction(TypeId::of::<dyn Shape>()),
                        Some(TypeId::of::<Square>())
                    );
                }
                let shape = map
                    .create_proxy::<dyn Shape, _>(Square { side: i as f64 })
                    .unwrap();
                shape.area()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let side = i as f64;
        assert_eq!(handle.join().unwrap(), side * side);
    }
}

#[test]
fn test_create_unregistered_abstraction() {
    let map = ProxyMap::new();
    let err = map.create_proxy::<dyn Shape, _>(Square { side: 1.0 }).err();
    assert_eq!(
        err,
        Some(RegistryError::NoFactory {
            abstraction: TypeId::of::<dyn Shape>()
        })
    );
}
