//! Multi-class scenarios through the public API only.

use std::sync::Arc;
use std::thread;

use rtti_reflect::registry::{Describe, TypeBuilder, TypeRegistryArc};
use rtti_reflect::{Identity, ReflectError, TypeName, Value};
use rtti_reflect::{auto_register, impl_reflected, reflect_property};

// -----------------------------------------------------------------------------
// Base / Derived

#[derive(Default)]
struct Base {
    id: i32,
}

#[derive(Default)]
struct Derived {
    base: Base,
    score: f32,
}

impl Derived {
    fn add_score(&mut self, amount: f32) -> f32 {
        self.score += amount;
        self.score
    }
}

impl_reflected!(Base);
impl_reflected!(Derived, parent = base);

impl Describe for Base {
    fn describe(builder: &mut TypeBuilder<'_, Self>) {
        reflect_property!(builder, Base, id);
        builder.default_factory();
    }
}

impl Describe for Derived {
    fn describe(builder: &mut TypeBuilder<'_, Self>) {
        builder
            .parent::<Base>()
            .property("score", |d| &d.score, |d| &mut d.score)
            .method("AddScore", Derived::add_score)
            .default_factory();
    }
}

#[test]
fn base_derived_end_to_end() {
    let registry = TypeRegistryArc::new();
    registry.register::<Derived>();

    let derived = registry.find_type_by_name("Derived").unwrap();
    let base = registry.find_type_by_name("Base").unwrap();

    assert!(derived.is_a(Identity::of("Base")));
    assert!(!base.is_a(Identity::of("Derived")));
    assert!(derived.is_child_of(&base));

    let mut instance = derived.create_instance().unwrap();
    let id = base.get_property("id").unwrap();
    id.set(&mut *instance, Value::new(7_i32));
    assert_eq!(id.get(&*instance).downcast_ref::<i32>(), Some(&7));

    let add_score = derived.get_method("AddScore").unwrap();
    add_score.invoke(&mut *instance, &[Value::new(2.5_f32)]);
    let score = add_score.invoke(&mut *instance, &[Value::new(2.5_f32)]);
    assert_eq!(score.downcast_ref::<f32>(), Some(&5.0));

    let derived_instance = instance.downcast::<Derived>().unwrap();
    assert_eq!(derived_instance.base.id, 7);
    assert_eq!(derived_instance.score, 5.0);
}

#[test]
fn registry_lookups_agree() {
    let registry = TypeRegistryArc::new();
    registry.register::<Derived>();

    assert_eq!(registry.type_count(), 2);
    for ty in registry.all_types() {
        let by_id = registry.find_type_by_id(ty.identity()).unwrap();
        assert!(Arc::ptr_eq(&ty, &by_id));
        assert_eq!(ty.identity(), Identity::of(ty.name()));
    }
    assert!(registry.find_type_by_name("Unknown").is_none());
    assert!(registry.find_type_by_id(Identity::of("Unknown")).is_none());

    let instance = registry.create_instance("Derived").unwrap();
    let ty = registry.type_of(&*instance).unwrap();
    assert_eq!(ty.name(), "Derived");
    assert_eq!(
        registry.try_create_instance("Unknown").unwrap_err(),
        ReflectError::UnknownType("Unknown".into())
    );
}

#[test]
fn descriptors_reject_foreign_instances() {
    let registry = TypeRegistryArc::new();
    let derived = registry.register::<Derived>();

    let mut base = Base::default();
    let score = derived.get_property("score").unwrap();
    assert!(!score.get(&base).is_valid());
    score.set(&mut base, Value::new(1.0_f32));

    let add_score = derived.get_method("AddScore").unwrap();
    assert!(matches!(
        add_score.try_invoke(&mut base, &[Value::new(1.0_f32)]),
        Err(ReflectError::InstanceMismatch {
            expected: "Derived",
            actual: "Base",
        })
    ));
}

// -----------------------------------------------------------------------------
// GameObject / Actor

#[derive(Default)]
struct GameObject {
    name: String,
}

#[derive(Default)]
struct Actor {
    object: GameObject,
    health: f32,
    speed: f32,
}

impl GameObject {
    fn rename(&mut self, name: String) {
        self.name = name;
    }
}

impl Actor {
    fn take_damage(&mut self, amount: f32) -> f32 {
        self.health = (self.health - amount).max(0.0);
        self.health
    }

    fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

impl_reflected!(GameObject as "game::GameObject");
impl_reflected!(Actor as "game::Actor", parent = object);

impl Describe for GameObject {
    fn describe(builder: &mut TypeBuilder<'_, Self>) {
        builder
            .property("name", |o| &o.name, |o| &mut o.name)
            .method("rename", GameObject::rename)
            .default_factory();
    }
}

impl Describe for Actor {
    fn describe(builder: &mut TypeBuilder<'_, Self>) {
        builder.parent::<GameObject>();
        reflect_property!(builder, Actor, "health" => health);
        reflect_property!(builder, Actor, "speed" => speed);
        builder
            .method("take_damage", Actor::take_damage)
            .method("is_alive", Actor::is_alive)
            .default_factory();
    }
}

auto_register!(GameObject, Actor);

#[test]
fn actor_by_name() {
    let registry = TypeRegistryArc::new();
    let actor = registry.register::<Actor>();

    assert_eq!(actor.name(), "game::Actor");
    assert_eq!(actor.size(), size_of::<Actor>());
    assert!(actor.is::<GameObject>());

    let names: Vec<_> = actor.properties().iter().map(|p| p.name()).collect();
    assert_eq!(names, ["health", "speed"]);

    let mut hero = registry.create_instance("game::Actor").unwrap();
    actor.set_value(&mut *hero, "name", Value::new(String::from("Hero")));
    actor.set_value(&mut *hero, "health", Value::new(100.0_f32));

    let left = actor.invoke(&mut *hero, "take_damage", &[Value::new(30.0_f32)]);
    assert_eq!(left.downcast_ref::<f32>(), Some(&70.0));

    let alive = actor.invoke(&mut *hero, "is_alive", &[]);
    assert_eq!(alive.downcast_ref::<bool>(), Some(&true));
    assert!(actor.find_method("is_alive").unwrap().is_const());

    let shared: &_ = &*hero;
    let alive = actor.invoke_ref(shared, "is_alive", &[]);
    assert_eq!(alive.downcast_ref::<bool>(), Some(&true));
    assert_eq!(
        actor.try_invoke_ref(shared, "take_damage", &[Value::new(1.0_f32)]).unwrap_err(),
        ReflectError::NotConst("take_damage")
    );

    let renamed = actor.invoke(&mut *hero, "rename", &[Value::new(String::from("Knight"))]);
    assert!(!renamed.is_valid());
    let name = actor.get_value(&*hero, "name");
    assert_eq!(name.downcast_ref::<String>().map(String::as_str), Some("Knight"));

    // Wrong argument type: nothing happens.
    actor.invoke(&mut *hero, "take_damage", &[Value::new(30.0_f64)]);
    let health = actor.get_value(&*hero, "health");
    assert_eq!(health.downcast_ref::<f32>(), Some(&70.0));
}

#[test]
fn auto_registration() {
    let registry = TypeRegistryArc::new();
    let submitted = registry.auto_register();

    if cfg!(feature = "auto_register") {
        assert!(submitted >= 2);
        assert!(registry.contains("game::GameObject"));
        assert!(registry.contains("game::Actor"));

        let count = registry.type_count();
        registry.auto_register();
        assert_eq!(registry.type_count(), count);
    } else {
        assert_eq!(submitted, 0);
    }
}

// -----------------------------------------------------------------------------
// Concurrency

#[test]
fn concurrent_registration_converges() {
    let registry = TypeRegistryArc::new();

    let types: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || registry.register::<Actor>())
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    for ty in &types {
        assert!(Arc::ptr_eq(ty, &types[0]));
    }
    assert_eq!(registry.type_count(), 2);
    let parent = types[0].parent().unwrap();
    assert!(Arc::ptr_eq(parent, &registry.find_type_by_name("game::GameObject").unwrap()));
}

#[test]
fn concurrent_lookup_and_instances() {
    let registry = TypeRegistryArc::new();
    registry.register::<Derived>();

    thread::scope(|scope| {
        for n in 0..4_i32 {
            let registry = &registry;
            scope.spawn(move || {
                let ty = registry.find_type_by_name("Derived").unwrap();
                let mut instance = ty.create_instance().unwrap();
                ty.set_value(&mut *instance, "id", Value::new(n));
                let id = ty.get_value(&*instance, "id");
                assert_eq!(id.downcast_ref::<i32>(), Some(&n));
                assert_eq!(instance.reflect_identity(), Derived::identity());
            });
        }
    });
}

#[test]
fn static_type_is_registered_once() {
    let first = Derived::static_type();
    let second = Derived::static_type();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(rtti_reflect::registry::global().contains("Base"));
}
