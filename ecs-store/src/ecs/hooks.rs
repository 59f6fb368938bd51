// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Factory and recycler hooks
//!
//! Callers may take over how component instances are built and what happens
//! to them once detached, and may observe entity creation and destruction.
//! Without hooks a component is built with `Default` and dropped on detach.

use crate::ecs::component::{BoxedComponent, Component, ComponentId};
use crate::ecs::Entity;

type FactoryFn = Box<dyn FnMut() -> BoxedComponent>;
type RecyclerFn = Box<dyn FnMut(BoxedComponent)>;

/// Callback invoked with an entity handle
pub(crate) type EntityHook = Box<dyn FnMut(Entity)>;

#[derive(Default)]
struct ComponentHooks {
    factory: Option<FactoryFn>,
    recycler: Option<RecyclerFn>,
}

/// Hook table of one manager, indexed by [`ComponentId`]
#[derive(Default)]
pub(crate) struct HookTable {
    components: Vec<ComponentHooks>,
    entity_factory: Option<EntityHook>,
    entity_recycler: Option<EntityHook>,
}

impl HookTable {
    fn slot(&mut self, id: ComponentId) -> &mut ComponentHooks {
        if id.index() >= self.components.len() {
            self.components.resize_with(id.index() + 1, ComponentHooks::default);
        }
        &mut self.components[id.index()]
    }

    pub(crate) fn set_factory<T, F>(&mut self, id: ComponentId, mut factory: F)
    where
        T: Component,
        F: FnMut() -> T + 'static,
    {
        self.slot(id).factory = Some(Box::new(move || Box::new(factory()) as BoxedComponent));
    }

    /// Install `T::default` unless a factory is already present
    pub(crate) fn ensure_default_factory<T: Component + Default>(&mut self, id: ComponentId) {
        let slot = self.slot(id);
        if slot.factory.is_none() {
            slot.factory = Some(Box::new(|| Box::new(T::default()) as BoxedComponent));
        }
    }

    pub(crate) fn set_recycler<T, F>(&mut self, id: ComponentId, mut recycler: F)
    where
        T: Component,
        F: FnMut(T) + 'static,
    {
        self.slot(id).recycler = Some(Box::new(move |instance: BoxedComponent| {
            if let Ok(value) = instance.downcast::<T>() {
                recycler(*value);
            }
        }));
    }

    /// Build an instance with the installed factory
    pub(crate) fn build(&mut self, id: ComponentId) -> Option<BoxedComponent> {
        let factory = self.components.get_mut(id.index())?.factory.as_mut()?;
        Some(factory())
    }

    /// Hand a detached instance to its recycler, or drop it
    pub(crate) fn recycle(&mut self, id: ComponentId, instance: BoxedComponent) {
        if let Some(recycler) = self
            .components
            .get_mut(id.index())
            .and_then(|hooks| hooks.recycler.as_mut())
        {
            recycler(instance);
        }
    }

    pub(crate) fn set_entity_factory(&mut self, hook: EntityHook) {
        self.entity_factory = Some(hook);
    }

    pub(crate) fn set_entity_recycler(&mut self, hook: EntityHook) {
        self.entity_recycler = Some(hook);
    }

    pub(crate) fn entity_created(&mut self, entity: Entity) {
        if let Some(hook) = self.entity_factory.as_mut() {
            hook(entity);
        }
    }

    pub(crate) fn entity_recycled(&mut self, entity: Entity) {
        if let Some(hook) = self.entity_recycler.as_mut() {
            hook(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default, PartialEq)]
    struct Score(u32);

    impl Component for Score {
        const NAME: &'static str = "Score";
    }

    #[test]
    fn test_default_factory_is_not_overridden() {
        let id = ComponentId::new(0);
        let mut hooks = HookTable::default();
        hooks.set_factory(id, || Score(9));
        hooks.ensure_default_factory::<Score>(id);

        let built = hooks.build(id).unwrap();
        assert_eq!(built.downcast_ref::<Score>(), Some(&Score(9)));
    }

    #[test]
    fn test_recycler_receives_typed_value() {
        let id = ComponentId::new(2);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut hooks = HookTable::default();
        hooks.set_recycler(id, move |score: Score| sink.borrow_mut().push(score.0));
        hooks.recycle(id, Box::new(Score(4)));

        assert_eq!(*seen.borrow(), vec![4]);
    }

    #[test]
    fn test_missing_hooks() {
        let id = ComponentId::new(1);
        let mut hooks = HookTable::default();
        assert!(hooks.build(id).is_none());
        // No recycler installed: the instance is simply dropped
        hooks.recycle(id, Box::new(Score(1)));
    }
}
