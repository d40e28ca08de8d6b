//! Species-specific behaviour layered over the base `Animal` moves.

use crate::animal::{Animal, AnimalKind, HUNGER_DECAY, MAX_HUNGER, TURN_JITTER};
use crate::population::{centroid, Handle, Pools};
use eco_core::{Bounds, Emotion, EntityId, Position, Species};
use rand_chacha::ChaCha8Rng;
use std::f32::consts::FRAC_PI_4;

/// Reach for every bite, strike and flight trigger between animals
pub const STRIKE_RANGE: f32 = 20.0;

const CARNIVORE_HUNGER_DECAY: f32 = 0.1;
/// Carnivores at or above this hunger coast instead of roaming
const ROAM_HUNGER: f32 = 60.0;
const HUMAN_ATTACK_DAMAGE: f32 = 45.0;
const HUMAN_KILL_MEAL: f32 = 55.0;

const PACK_QUORUM: usize = 3;
const PACK_RADIUS: f32 = 20.0;
const PACK_STEP: f32 = 2.0;

const HUMAN_HUNGER_DECAY: f32 = 0.05;
const HUMAN_HUNT_HUNGER: f32 = 50.0;
const HUMAN_RUSH_HUNGER: f32 = 55.0;
const HUMAN_RUSH_SPEED: f32 = 3.0;
const HUMAN_FLEE_SPEED: f32 = 3.0;
const FEARFUL_TURN_CHANCE: f64 = 0.05;
const PREDATOR_HIT_DAMAGE: f32 = 50.0;
const PREDATOR_HIT_MEAL: f32 = 50.0;
const KILL_BLOW: f32 = 100.0;

/// Herbivores and rabbits turn from threats inside this radius
pub const GRAZER_ALERT_RANGE: f32 = 30.0;
const BIRD_ALERT_RANGE: f32 = 70.0;
const BIRD_TURN_CHANCE: f64 = 0.6;

/// A strike that dropped its target's health to zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kill {
    pub hunter: EntityId,
    pub hunter_species: Species,
    pub prey: EntityId,
    pub prey_species: Species,
}

impl Kill {
    fn new(hunter: &Animal, prey: &Animal) -> Self {
        Self {
            hunter: hunter.id,
            hunter_species: hunter.species(),
            prey: prey.id,
            prey_species: prey.species(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    Nearest,
    Largest,
}

#[derive(Debug, Clone, Copy)]
struct HuntProfile {
    /// Hunts only while hunger is below this
    threshold: f32,
    selection: Selection,
    damage: f32,
}

fn hunt_profile(species: Species) -> Option<HuntProfile> {
    let profile = match species {
        Species::Predator => HuntProfile {
            threshold: 50.0,
            selection: Selection::Nearest,
            damage: KILL_BLOW,
        },
        Species::Lion => HuntProfile {
            threshold: 60.0,
            selection: Selection::Largest,
            damage: KILL_BLOW,
        },
        Species::Tiger => HuntProfile {
            threshold: 60.0,
            selection: Selection::Nearest,
            damage: 80.0,
        },
        _ => return None,
    };
    Some(profile)
}

/// Carnivore hunt over grazing prey. Strikes inside `STRIKE_RANGE`, otherwise
/// only turns towards the target; closing in is left to movement.
pub fn hunt(hunter: &mut Animal, prey: &mut Pools<'_>) -> Option<Kill> {
    let profile = hunt_profile(hunter.species())?;
    if hunter.hunger >= profile.threshold {
        return None;
    }

    let target = match profile.selection {
        Selection::Nearest => prey.nearest(&hunter.position).map(|(handle, _)| handle),
        Selection::Largest => prey.largest(),
    }?;
    let victim = prey.get_mut(target)?;

    if hunter.distance_to(&victim.position) < STRIKE_RANGE {
        let killed = victim.hurt(profile.damage);
        hunter.hunger = MAX_HUNGER;
        killed.then(|| Kill::new(hunter, victim))
    } else {
        hunter.face(&victim.position);
        None
    }
}

/// One carnivore tick: roam and hunt while peckish, coast when fed, then
/// maul any human in reach.
pub fn carnivore_step(
    me: &mut Animal,
    prey: &mut Pools<'_>,
    humans: &mut [Animal],
    bounds: Bounds,
    rng: &mut ChaCha8Rng,
) -> Vec<Kill> {
    let mut kills = Vec::new();

    if me.hunger < ROAM_HUNGER {
        me.wander(bounds, rng);
        me.drain_hunger(CARNIVORE_HUNGER_DECAY);
        if me.is_alive() {
            kills.extend(hunt(me, prey));
        }
    } else {
        me.drain_hunger(CARNIVORE_HUNGER_DECAY);
        me.coast(bounds, rng);
    }

    if !me.is_alive() {
        return kills;
    }

    for human in humans.iter_mut().filter(|h| h.is_alive()) {
        if me.distance_to(&human.position) < STRIKE_RANGE && human.hurt(HUMAN_ATTACK_DAMAGE) {
            me.satiate(HUMAN_KILL_MEAL);
            kills.push(Kill::new(me, human));
        }
    }

    kills
}

/// Rally point for the pride, present once enough lions are alive
pub fn pack_centroid(lions: &[Animal]) -> Option<Position> {
    let alive = lions.iter().filter(|l| l.is_alive()).count();
    if alive < PACK_QUORUM {
        return None;
    }
    centroid(lions)
}

pub fn regroup(lion: &mut Animal, rally: &Position) {
    if lion.distance_to(rally) > PACK_RADIUS {
        lion.move_towards(rally, PACK_STEP);
    }
}

/// Emotion-modulated walk
pub fn human_move(me: &mut Animal, bounds: Bounds, rng: &mut ChaCha8Rng) {
    let AnimalKind::Human { emotion, greedy } = me.kind else {
        me.wander(bounds, rng);
        return;
    };

    me.speed = match emotion {
        Emotion::Happy => 1.5,
        Emotion::Sad => 1.0,
        Emotion::Angry => 2.0,
        Emotion::Fearful => 1.0,
    };
    if emotion == Emotion::Fearful {
        me.maybe_turn(FEARFUL_TURN_CHANCE, FRAC_PI_4, rng);
    }
    if greedy || me.hunger < HUMAN_RUSH_HUNGER {
        me.speed = me.speed.max(HUMAN_RUSH_SPEED);
    }

    me.wander(bounds, rng);
    me.drain_hunger(HUMAN_HUNGER_DECAY);
}

fn grazer(animal: &Animal) -> bool {
    !animal.species().is_carnivore()
}

fn carnivore(animal: &Animal) -> bool {
    animal.species().is_carnivore()
}

/// Emotion-driven hunt. `quarry` must hold grazers and carnivores; humans
/// never target birds or each other.
pub fn human_hunt(
    me: &mut Animal,
    quarry: &mut Pools<'_>,
    bounds: Bounds,
    rng: &mut ChaCha8Rng,
) -> Vec<Kill> {
    let mut kills = Vec::new();
    let Some(emotion) = me.emotion() else {
        return kills;
    };
    if !me.is_alive() {
        return kills;
    }

    match emotion {
        Emotion::Fearful => {
            flee_carnivores(me, quarry, bounds, rng);
            kills.extend(hunt_nearest(me, quarry, grazer));
        }
        Emotion::Angry => {
            kills.extend(strike_carnivore(me, quarry));
            kills.extend(hunt_nearest(me, quarry, |_| true));
        }
        Emotion::Happy | Emotion::Sad => {
            kills.extend(hunt_nearest(me, quarry, grazer));
        }
    }

    kills
}

/// Bolt away from the first carnivore in reach. The boosted speed sticks
/// until the next emotion-driven move.
fn flee_carnivores(me: &mut Animal, quarry: &Pools<'_>, bounds: Bounds, rng: &mut ChaCha8Rng) {
    let Some(threat) = quarry
        .first_within(&me.position, STRIKE_RANGE, carnivore)
        .and_then(|handle| quarry.get(handle))
        .map(|a| a.position)
    else {
        return;
    };

    me.speed = HUMAN_FLEE_SPEED;
    me.face_away_from(&threat);
    me.wander(bounds, rng);
    me.drain_hunger(HUMAN_HUNGER_DECAY);
}

fn strike_carnivore(me: &mut Animal, quarry: &mut Pools<'_>) -> Option<Kill> {
    let handle = quarry.first_within(&me.position, STRIKE_RANGE, carnivore)?;
    let target = quarry.get_mut(handle)?;
    let killed = target.hurt(PREDATOR_HIT_DAMAGE);
    me.satiate(PREDATOR_HIT_MEAL);
    killed.then(|| Kill::new(me, target))
}

fn hunt_nearest<F>(me: &mut Animal, quarry: &mut Pools<'_>, accept: F) -> Option<Kill>
where
    F: Fn(&Animal) -> bool,
{
    if me.hunger >= HUMAN_HUNT_HUNGER {
        return None;
    }
    let (handle, distance): (Handle, f32) = quarry.nearest_matching(&me.position, accept)?;
    let target = quarry.get_mut(handle)?;

    if distance < STRIKE_RANGE {
        let killed = target.hurt(KILL_BLOW);
        me.hunger = MAX_HUNGER;
        killed.then(|| Kill::new(me, target))
    } else {
        me.face(&target.position);
        None
    }
}

/// Flight-biased bird movement; no hunger-dependent branches
pub fn bird_move(me: &mut Animal, threats: &[Position], bounds: Bounds, rng: &mut ChaCha8Rng) {
    me.flee_from(threats, BIRD_ALERT_RANGE);
    me.advance(me.speed);
    me.reflect_off_edges(bounds);
    me.maybe_turn(BIRD_TURN_CHANCE, TURN_JITTER, rng);
    me.position = bounds.clamp(me.position);
    me.drain_hunger(HUNGER_DECAY);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn bounds() -> Bounds {
        Bounds::new(1600.0, 900.0)
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    fn at(species: Species, x: f32, y: f32, rng: &mut ChaCha8Rng) -> Animal {
        Animal::new(species, Position::new(x, y), rng)
    }

    fn human(emotion: Emotion, greedy: bool, x: f32, y: f32, rng: &mut ChaCha8Rng) -> Animal {
        let mut h = at(Species::Human, x, y, rng);
        h.kind = AnimalKind::Human { emotion, greedy };
        h
    }

    #[test]
    fn test_predator_kills_adjacent_rabbit() {
        let mut rng = rng();
        let mut predator = at(Species::Predator, 100.0, 100.0, &mut rng);
        predator.hunger = 40.0;
        let mut herbivores: Vec<Animal> = Vec::new();
        let mut rabbits = vec![at(Species::Rabbit, 105.0, 100.0, &mut rng)];
        let rabbit_id = rabbits[0].id;

        let mut prey = Pools::new(vec![herbivores.as_mut_slice(), rabbits.as_mut_slice()]);
        let kill = hunt(&mut predator, &mut prey).unwrap();
        assert_eq!(kill.prey, rabbit_id);
        assert_eq!(kill.prey_species, Species::Rabbit);
        assert_eq!(predator.hunger, 100.0);
        assert!(!rabbits[0].is_alive());
    }

    #[test]
    fn test_predator_turns_towards_distant_prey() {
        let mut rng = rng();
        let mut predator = at(Species::Predator, 100.0, 100.0, &mut rng);
        predator.hunger = 40.0;
        let mut herbivores = vec![at(Species::Herbivore, 100.0, 200.0, &mut rng)];
        let mut prey = Pools::new(vec![herbivores.as_mut_slice()]);

        assert!(hunt(&mut predator, &mut prey).is_none());
        assert!((predator.heading - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(predator.position, Position::new(100.0, 100.0));
        assert_eq!(predator.hunger, 40.0);
    }

    #[test]
    fn test_sated_predator_ignores_prey() {
        let mut rng = rng();
        let mut predator = at(Species::Predator, 100.0, 100.0, &mut rng);
        predator.hunger = 55.0;
        let mut rabbits = vec![at(Species::Rabbit, 101.0, 100.0, &mut rng)];
        let mut prey = Pools::new(vec![rabbits.as_mut_slice()]);
        assert!(hunt(&mut predator, &mut prey).is_none());
        assert!(rabbits[0].is_alive());
    }

    #[test]
    fn test_tiger_wounds_without_killing() {
        let mut rng = rng();
        let mut tiger = at(Species::Tiger, 100.0, 100.0, &mut rng);
        tiger.hunger = 59.0;
        let mut herbivores = vec![at(Species::Herbivore, 110.0, 100.0, &mut rng)];
        let mut prey = Pools::new(vec![herbivores.as_mut_slice()]);

        assert!(hunt(&mut tiger, &mut prey).is_none());
        assert_eq!(tiger.hunger, 100.0);
        assert_eq!(herbivores[0].health, 20.0);
    }

    #[test]
    fn test_lion_targets_largest() {
        let mut rng = rng();
        let mut lion = at(Species::Lion, 100.0, 100.0, &mut rng);
        lion.hunger = 30.0;
        let mut herbivores = vec![
            at(Species::Herbivore, 105.0, 100.0, &mut rng),
            at(Species::Herbivore, 300.0, 100.0, &mut rng),
        ];
        herbivores[0].size = 2.0;
        herbivores[1].size = 8.0;
        let mut prey = Pools::new(vec![herbivores.as_mut_slice()]);

        // The big one is out of reach, so the small one next door survives
        assert!(hunt(&mut lion, &mut prey).is_none());
        assert!(lion.heading.abs() < 1e-6);
        assert!(herbivores.iter().all(|h| h.is_alive()));
    }

    #[test]
    fn test_carnivore_coasts_when_fed() {
        let mut rng = rng();
        let mut predator = at(Species::Predator, 800.0, 450.0, &mut rng);
        predator.hunger = 80.0;
        let mut rabbits = vec![at(Species::Rabbit, 801.0, 450.0, &mut rng)];
        let mut prey = Pools::new(vec![rabbits.as_mut_slice()]);

        let kills = carnivore_step(&mut predator, &mut prey, &mut [], bounds(), &mut rng);
        assert!(kills.is_empty());
        assert!((predator.hunger - 79.9).abs() < 1e-4);
        assert!(rabbits[0].is_alive());
    }

    #[test]
    fn test_carnivore_mauls_humans() {
        let mut rng = rng();
        let mut predator = at(Species::Predator, 800.0, 450.0, &mut rng);
        predator.hunger = 80.0;
        predator.speed = 0.0;
        let mut humans = vec![
            at(Species::Human, 805.0, 450.0, &mut rng),
            at(Species::Human, 805.0, 455.0, &mut rng),
        ];
        humans[1].health = 30.0;
        let mut prey = Pools::empty();

        let kills = carnivore_step(&mut predator, &mut prey, &mut humans, bounds(), &mut rng);
        assert_eq!(kills.len(), 1);
        assert_eq!(kills[0].prey_species, Species::Human);
        assert_eq!(humans[0].health, 55.0);
        assert!(!humans[1].is_alive());
        assert_eq!(predator.hunger, 100.0);
    }

    #[test]
    fn test_pack_needs_quorum() {
        let mut rng = rng();
        let mut lions = vec![
            at(Species::Lion, 0.0, 0.0, &mut rng),
            at(Species::Lion, 60.0, 0.0, &mut rng),
        ];
        assert!(pack_centroid(&lions).is_none());

        lions.push(at(Species::Lion, 30.0, 90.0, &mut rng));
        let rally = pack_centroid(&lions).unwrap();
        assert_eq!(rally, Position::new(30.0, 30.0));

        regroup(&mut lions[0], &rally);
        assert!(lions[0].distance_to(&rally) < 30.0 * 2f32.sqrt());
        let close = lions[2].position;
        regroup(&mut lions[2], &Position::new(close.x, close.y + 10.0));
        assert_eq!(lions[2].position, close);
    }

    #[test]
    fn test_human_move_speeds() {
        let mut rng = rng();
        let mut sad = human(Emotion::Sad, false, 800.0, 450.0, &mut rng);
        human_move(&mut sad, bounds(), &mut rng);
        assert_eq!(sad.speed, 1.0);
        assert!((sad.hunger - 99.9).abs() < 1e-4);

        let mut greedy = human(Emotion::Happy, true, 800.0, 450.0, &mut rng);
        human_move(&mut greedy, bounds(), &mut rng);
        assert_eq!(greedy.speed, 3.0);

        let mut hungry = human(Emotion::Angry, false, 800.0, 450.0, &mut rng);
        hungry.hunger = 40.0;
        human_move(&mut hungry, bounds(), &mut rng);
        assert_eq!(hungry.speed, 3.0);
    }

    #[test]
    fn test_fearful_human_flees() {
        let mut rng = rng();
        let mut me = human(Emotion::Fearful, false, 100.0, 100.0, &mut rng);
        let mut predators = vec![at(Species::Predator, 115.0, 100.0, &mut rng)];
        let mut quarry = Pools::new(vec![predators.as_mut_slice()]);

        human_hunt(&mut me, &mut quarry, bounds(), &mut rng);
        assert_eq!(me.speed, 3.0);
        assert!(me.position.x < 100.0);
        assert!(predators[0].is_alive());
        // Flight is a full human step: base plus human hunger drain
        assert!((me.hunger - 99.9).abs() < 1e-4);
    }

    #[test]
    fn test_angry_human_hits_predator() {
        let mut rng = rng();
        let mut me = human(Emotion::Angry, false, 100.0, 100.0, &mut rng);
        me.hunger = 30.0;
        let mut herbivores = vec![at(Species::Herbivore, 500.0, 500.0, &mut rng)];
        let mut tigers = vec![at(Species::Tiger, 110.0, 100.0, &mut rng)];
        let mut quarry = Pools::new(vec![herbivores.as_mut_slice(), tigers.as_mut_slice()]);

        let kills = human_hunt(&mut me, &mut quarry, bounds(), &mut rng);
        // 50 from the hit takes hunger to 80, above the hunting threshold
        assert!(kills.is_empty());
        assert_eq!(tigers[0].health, 50.0);
        assert_eq!(me.hunger, 80.0);
        assert!(herbivores[0].is_alive());
    }

    #[test]
    fn test_happy_human_hunts_grazers_only() {
        let mut rng = rng();
        let mut me = human(Emotion::Happy, false, 100.0, 100.0, &mut rng);
        me.hunger = 20.0;
        let mut rabbits = vec![at(Species::Rabbit, 112.0, 100.0, &mut rng)];
        let mut predators = vec![at(Species::Predator, 101.0, 100.0, &mut rng)];
        let mut quarry = Pools::new(vec![rabbits.as_mut_slice(), predators.as_mut_slice()]);

        let kills = human_hunt(&mut me, &mut quarry, bounds(), &mut rng);
        assert_eq!(kills.len(), 1);
        assert_eq!(kills[0].prey_species, Species::Rabbit);
        assert_eq!(me.hunger, 100.0);
        assert!(predators[0].is_alive());
    }

    #[test]
    fn test_bird_turns_from_threats() {
        let mut rng = rng();
        let mut bird = at(Species::Bird, 400.0, 400.0, &mut rng);
        bird.speed = 3.0;
        let before = bird.position;
        let threat = Position::new(450.0, 400.0);

        bird_move(&mut bird, &[threat], bounds(), &mut rng);
        assert!(bird.position.x < before.x);
        assert!((bird.hunger - 99.95).abs() < 1e-4);
    }
}
