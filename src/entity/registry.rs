//! Memoized descriptor resolution.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::{Entity, EntityDescriptor};
use crate::error::RelqResult;

/// Caches one resolved [`EntityDescriptor`] per entity type.
///
/// Resolution is idempotent, so a racing double-insert is harmless; the last
/// writer wins and both callers hold equivalent descriptors.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    cache: RwLock<HashMap<TypeId, Arc<EntityDescriptor>>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the descriptor for `T`, building and caching it on first use.
    pub fn resolve<T: Entity>(&self) -> RelqResult<Arc<EntityDescriptor>> {
        let key = TypeId::of::<T>();
        {
            let cache = self
                .cache
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(descriptor) = cache.get(&key) {
                return Ok(Arc::clone(descriptor));
            }
        }
        let descriptor = Arc::new(EntityDescriptor::from_mapping(&T::mapping())?);
        let mut cache = self
            .cache
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        cache.insert(key, Arc::clone(&descriptor));
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FieldKind, Value};
    use crate::entity::{EntityMapping, FieldMapping};

    struct Widget;

    impl Entity for Widget {
        fn mapping() -> EntityMapping {
            EntityMapping::new("Widget").field(FieldMapping::new("Name", FieldKind::Text))
        }
        fn values(&self) -> Vec<Value> {
            vec![Value::String("w".into())]
        }
    }

    #[test]
    fn resolve_is_memoized() {
        let registry = EntityRegistry::new();
        let a = registry.resolve::<Widget>().unwrap();
        let b = registry.resolve::<Widget>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
