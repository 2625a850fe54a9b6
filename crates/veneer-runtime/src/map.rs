//! Proxy map
//!
//! Four lookup tables keyed by [`TypeId`]: target → abstraction,
//! proxy → abstraction, abstraction → target and abstraction → factory.
//! Registration is first-write-wins; a repeated registration for the same
//! key leaves the existing entry in place.

use dashmap::DashMap;
use std::any::{type_name, Any, TypeId};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::error::RegistryError;

/// Type-erased factory: a boxed target in, a boxed `Box<A>` out
pub type ProxyFactory =
    Arc<dyn Fn(Box<dyn Any>) -> Result<Box<dyn Any>, RegistryError> + Send + Sync>;

/// Registry of targets, their abstractions and proxy factories
pub struct ProxyMap {
    target_to_abstraction: DashMap<TypeId, TypeId>,
    proxy_to_abstraction: DashMap<TypeId, TypeId>,
    abstraction_to_target: DashMap<TypeId, TypeId>,
    factories: DashMap<TypeId, ProxyFactory>,
}

impl ProxyMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self {
            target_to_abstraction: DashMap::new(),
            proxy_to_abstraction: DashMap::new(),
            abstraction_to_target: DashMap::new(),
            factories: DashMap::new(),
        }
    }

    /// Register target `T`, abstraction `A` and proxy `P`
    ///
    /// Returns `false` when a factory for `A` already existed; that factory
    /// is kept.
    pub fn add<T, A, P, F>(&self, factory: F) -> bool
    where
        T: 'static,
        A: ?Sized + 'static,
        P: 'static,
        F: Fn(T) -> Box<A> + Send + Sync + 'static,
    {
        let target = TypeId::of::<T>();
        let abstraction = TypeId::of::<A>();

        self.target_to_abstraction.entry(target).or_insert(abstraction);
        self.proxy_to_abstraction
            .entry(TypeId::of::<P>())
            .or_insert(abstraction);
        self.abstraction_to_target.entry(abstraction).or_insert(target);

        let mut inserted = false;
        self.factories.entry(abstraction).or_insert_with(|| {
            inserted = true;
            let erased: ProxyFactory = Arc::new(move |instance: Box<dyn Any>| {
                let instance = instance.downcast::<T>().map_err(|_| RegistryError::TypeMismatch {
                    expected: type_name::<T>(),
                })?;
                Ok(Box::new(factory(*instance)) as Box<dyn Any>)
            });
            erased
        });

        if inserted {
            debug!(target_type = type_name::<T>(), abstraction = type_name::<A>(), "registered proxy");
        } else {
            trace!(abstraction = type_name::<A>(), "proxy already registered");
        }
        inserted
    }

    pub fn abstraction_for_target(&self, target: TypeId) -> Option<TypeId> {
        self.target_to_abstraction.get(&target).map(|entry| *entry)
    }

    pub fn abstraction_for_proxy(&self, proxy: TypeId) -> Option<TypeId> {
        self.proxy_to_abstraction.get(&proxy).map(|entry| *entry)
    }

    pub fn target_for_abstraction(&self, abstraction: TypeId) -> Option<TypeId> {
        self.abstraction_to_target.get(&abstraction).map(|entry| *entry)
    }

    /// The registered factory; repeated calls return the same `Arc`
    pub fn factory_for(&self, abstraction: TypeId) -> Option<ProxyFactory> {
        self.factories.get(&abstraction).map(|entry| entry.clone())
    }

    /// Wrap a boxed target with the factory registered for `abstraction`
    ///
    /// The result holds a `Box<A>`.
    pub fn create(
        &self,
        abstraction: TypeId,
        instance: Box<dyn Any>,
    ) -> Result<Box<dyn Any>, RegistryError> {
        let factory = self
            .factory_for(abstraction)
            .ok_or(RegistryError::NoFactory { abstraction })?;
        factory(instance)
    }

    /// Typed form of [`ProxyMap::create`]
    pub fn create_proxy<A, T>(&self, target: T) -> Result<Box<A>, RegistryError>
    where
        A: ?Sized + 'static,
        T: 'static,
    {
        let proxy = self.create(TypeId::of::<A>(), Box::new(target))?;
        proxy
            .downcast::<Box<A>>()
            .map(|proxy| *proxy)
            .map_err(|_| RegistryError::TypeMismatch {
                expected: type_name::<A>(),
            })
    }

    /// Number of registered abstractions
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for ProxyMap {
    fn default() -> Self {
        Self::new()
    }
}
