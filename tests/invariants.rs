//! Randomised operation sequences checked against a simple model after
//! every step.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

use owl_ecs::{
    ecs::{Component, EcsError, EntityId, Signature, System},
    EcsConfig, World,
};
use rand::{seq::IteratorRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const TYPES: usize = 3;

trait Tagged: Component + Copy + PartialEq + Debug {
    const SLOT: usize;
    fn new(value: u32) -> Self;
    fn value(&self) -> u32;
}

macro_rules! tagged {
    ($name:ident, $slot:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq)]
        struct $name(u32);
        impl Component for $name {}
        impl Tagged for $name {
            const SLOT: usize = $slot;
            fn new(value: u32) -> Self {
                Self(value)
            }
            fn value(&self) -> u32 {
                self.0
            }
        }
    };
}

tagged!(Alpha, 0);
tagged!(Beta, 1);
tagged!(Gamma, 2);

struct NeedsAlphaBeta;
impl System for NeedsAlphaBeta {}
struct NeedsGamma;
impl System for NeedsGamma {}
struct NeedsBetaGamma;
impl System for NeedsBetaGamma {}
struct NeedsNothing;
impl System for NeedsNothing {}

#[derive(Default)]
struct Model {
    alive: BTreeSet<EntityId>,
    values: [BTreeMap<EntityId, u32>; TYPES],
}

impl Model {
    fn signature_bits(&self, entity: EntityId) -> [bool; TYPES] {
        [0, 1, 2].map(|slot| self.values[slot].contains_key(&entity))
    }
}

fn build_world(max_entities: usize) -> World {
    let mut world = World::new(EcsConfig {
        max_entities,
        ..EcsConfig::default()
    })
    .unwrap();
    let a = world.register_component::<Alpha>().unwrap();
    let b = world.register_component::<Beta>().unwrap();
    let c = world.register_component::<Gamma>().unwrap();
    assert_eq!([a, b, c], [0, 1, 2]);

    world.register_system(NeedsAlphaBeta).unwrap();
    world.register_system(NeedsGamma).unwrap();
    world.register_system(NeedsBetaGamma).unwrap();
    world.register_system(NeedsNothing).unwrap();
    world
        .set_system_signature::<NeedsAlphaBeta>(Signature::new().with(a).with(b))
        .unwrap();
    world
        .set_system_signature::<NeedsGamma>(Signature::new().with(c))
        .unwrap();
    world
        .set_system_signature::<NeedsBetaGamma>([b, c].into_iter().collect())
        .unwrap();
    world
}

fn add_or_remove<T: Tagged>(
    world: &mut World,
    model: &mut Model,
    entity: EntityId,
    rng: &mut ChaCha8Rng,
) {
    let held = model.values[T::SLOT].contains_key(&entity);
    if rng.gen_bool(0.6) {
        let value = rng.gen::<u32>();
        let result = world.add_component(entity, T::new(value));
        if held {
            assert!(matches!(result, Err(EcsError::DuplicateComponent { .. })));
        } else {
            result.unwrap();
            model.values[T::SLOT].insert(entity, value);
        }
    } else {
        let result = world.remove_component::<T>(entity);
        match model.values[T::SLOT].remove(&entity) {
            Some(expected) => assert_eq!(result.unwrap().value(), expected),
            None => assert!(matches!(result, Err(EcsError::MissingComponent { .. }))),
        }
    }
}

fn check_storage<T: Tagged>(world: &World, model: &Model) {
    let stored: BTreeMap<EntityId, u32> = world
        .components::<T>()
        .unwrap()
        .map(|(entity, component)| (entity, component.value()))
        .collect();
    assert_eq!(stored, model.values[T::SLOT]);
    assert_eq!(world.component_count::<T>().unwrap(), stored.len());
}

fn check_system<S: System>(world: &World, model: &Model) {
    let required = world.system_signature::<S>().unwrap();
    let expected: BTreeSet<EntityId> = model
        .alive
        .iter()
        .copied()
        .filter(|&entity| world.signature(entity).unwrap().contains(required))
        .collect();
    assert_eq!(world.system_entities::<S>().unwrap(), &expected);
}

fn check(world: &World, model: &Model) {
    assert_eq!(world.living_entity_count(), model.alive.len());
    for &entity in &model.alive {
        let signature = world.signature(entity).unwrap();
        let bits = model.signature_bits(entity);
        for (slot, expected) in bits.iter().enumerate() {
            assert_eq!(signature.test(slot as u8), *expected, "{entity} slot {slot}");
        }
        assert_eq!(signature.count() as usize, bits.iter().filter(|b| **b).count());
    }

    check_storage::<Alpha>(world, model);
    check_storage::<Beta>(world, model);
    check_storage::<Gamma>(world, model);

    check_system::<NeedsAlphaBeta>(world, model);
    check_system::<NeedsGamma>(world, model);
    check_system::<NeedsBetaGamma>(world, model);
    check_system::<NeedsNothing>(world, model);
}

fn run_sequence(seed: u64, steps: usize, max_entities: usize) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut world = build_world(max_entities);
    let mut model = Model::default();

    for _ in 0..steps {
        let roll = rng.gen_range(0..100);
        if roll < 20 || model.alive.is_empty() {
            match world.create_entity() {
                Ok(entity) => {
                    assert!(model.alive.insert(entity));
                }
                Err(err) => {
                    assert_eq!(model.alive.len(), max_entities);
                    assert_eq!(
                        err,
                        EcsError::EntityLimitExceeded {
                            capacity: max_entities
                        }
                    );
                }
            }
        } else if roll < 30 {
            let entity = *model.alive.iter().choose(&mut rng).unwrap();
            world.destroy_entity(entity).unwrap();
            model.alive.remove(&entity);
            for values in &mut model.values {
                values.remove(&entity);
            }
        } else {
            let entity = *model.alive.iter().choose(&mut rng).unwrap();
            match rng.gen_range(0..TYPES) {
                0 => add_or_remove::<Alpha>(&mut world, &mut model, entity, &mut rng),
                1 => add_or_remove::<Beta>(&mut world, &mut model, entity, &mut rng),
                _ => add_or_remove::<Gamma>(&mut world, &mut model, entity, &mut rng),
            }
        }
        check(&world, &model);
    }
}

#[test]
fn signatures_storage_and_systems_stay_consistent() {
    for seed in 0..8 {
        run_sequence(seed, 600, 24);
    }
}

#[test]
fn consistency_holds_under_pool_pressure() {
    run_sequence(0xBEEF, 1500, 6);
}

#[test]
fn removal_compacts_dense_storage() {
    let mut world = build_world(16);
    let entities: Vec<EntityId> = (0..6).map(|_| world.create_entity().unwrap()).collect();
    for (i, &entity) in entities.iter().enumerate() {
        world.add_component(entity, Alpha(i as u32 * 10)).unwrap();
    }

    let victim = entities[1];
    let last_holder = entities[5];
    world.remove_component::<Alpha>(victim).unwrap();

    assert_eq!(world.component_count::<Alpha>().unwrap(), 5);
    let order: Vec<(EntityId, u32)> = world
        .components::<Alpha>()
        .unwrap()
        .map(|(entity, alpha)| (entity, alpha.0))
        .collect();
    // the last holder now sits in the freed slot with its value intact
    assert_eq!(order[1], (last_holder, 50));
    assert_eq!(
        order,
        vec![
            (entities[0], 0),
            (last_holder, 50),
            (entities[2], 20),
            (entities[3], 30),
            (entities[4], 40),
        ]
    );
    assert_eq!(world.get_component::<Alpha>(last_holder).unwrap(), &Alpha(50));
}

#[test]
fn removing_the_last_holder_keeps_order() {
    let mut world = build_world(8);
    let a = world.create_entity().unwrap();
    let b = world.create_entity().unwrap();
    world.add_component(a, Beta(1)).unwrap();
    world.add_component(b, Beta(2)).unwrap();

    world.remove_component::<Beta>(b).unwrap();
    let order: Vec<_> = world
        .components::<Beta>()
        .unwrap()
        .map(|(entity, beta)| (entity, *beta))
        .collect();
    assert_eq!(order, vec![(a, Beta(1))]);
}
